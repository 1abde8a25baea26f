pub mod executable;
pub mod matcher;
pub mod merger;
pub mod pipeable;
pub mod stage;

pub use executable::{Executable, ExecuteStrategy, Settle};
pub use matcher::{MatchStrategy, Matcher};
pub use merger::{MergeStrategy, Merger};
pub use pipeable::Pipeable;
pub use stage::{stage_fn, Next, Stage, StageFn};
