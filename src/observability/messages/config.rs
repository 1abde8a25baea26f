// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for chain definition loading and validation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A chain definition was read from disk.
///
/// # Log Level
/// `info!` - Happens once per process
///
/// # Example
/// ```
/// use the_layercake::observability::messages::config::ChainLoaded;
///
/// let msg = ChainLoaded {
///     path: "chains/greeting.yaml",
///     name: "greeting",
///     stage_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ChainLoaded<'a> {
    pub path: &'a str,
    pub name: &'a str,
    pub stage_count: usize,
}

impl Display for ChainLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded chain '{}' from {} with {} top-level stages",
            self.name, self.path, self.stage_count
        )
    }
}

impl StructuredLog for ChainLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            chain = self.name,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "chain_loaded",
            span_name = name,
            path = self.path,
            chain = self.name,
        )
    }
}

/// A sub-chain with nothing piped onto it.
///
/// # Log Level
/// `warn!` - Legal, but almost certainly a mistake in the definition
pub struct EmptySubChain<'a> {
    /// `"filter"` or `"parallel"`
    pub kind: &'a str,
    pub path: &'a str,
}

impl Display for EmptySubChain<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} stage '{}' has no stages piped onto it",
            self.kind, self.path
        )
    }
}

impl StructuredLog for EmptySubChain<'_> {
    fn log(&self) {
        tracing::warn!(kind = self.kind, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "empty_sub_chain",
            span_name = name,
            kind = self.kind,
            path = self.path,
        )
    }
}

/// Validation rejected a chain definition.
///
/// # Log Level
/// `error!` - The chain cannot be built
pub struct ValidationFailed<'a> {
    pub name: &'a str,
    pub error_count: usize,
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chain '{}' failed validation with {} errors",
            self.name, self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            chain = self.name,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "validation_failed",
            span_name = name,
            chain = self.name,
            error_count = self.error_count,
        )
    }
}
