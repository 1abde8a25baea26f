// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // built-in components
pub mod config;     // chain definitions + registry
pub mod engine;     // pipeline, filter, parallel, task
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // stage and component abstractions

pub use engine::{Filter, Parallel, Pipeline, Task};
pub use errors::{BoxError, ConfigError, PipelineError, StageResult};
pub use traits::{
    stage_fn, Executable, ExecuteStrategy, MatchStrategy, Matcher, MergeStrategy, Merger, Next, Pipeable, Settle,
    Stage, StageFn,
};
