// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage kinds and the pipeline that drives them.

pub(crate) mod branch;
pub mod filter;
pub(crate) mod guard;
pub mod parallel;
pub mod pipeline;
pub mod task;

pub use filter::Filter;
pub use parallel::Parallel;
pub use pipeline::Pipeline;
pub use task::Task;
