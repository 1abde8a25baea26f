/// Deepest sub-chain nesting a chain definition may use (top-level stages are depth 1)
pub const MAX_NESTING_DEPTH: usize = 32;
/// Name given to a chain definition that does not set one
pub const DEFAULT_CHAIN_NAME: &str = "chain";
