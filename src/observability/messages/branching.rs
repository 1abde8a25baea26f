// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the stages that host other stages.
//!
//! This module contains message types for logging events related to:
//! * Filter condition evaluation
//! * Parallel fan-out and the two merge points
//! * Panics caught in caller code

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A filter evaluated its matcher.
///
/// # Log Level
/// `debug!` - Explains which path a value took
///
/// # Example
/// ```
/// use the_layercake::observability::messages::branching::FilterEvaluated;
///
/// let msg = FilterEvaluated {
///     matched: true,
///     sub_stage_count: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FilterEvaluated {
    pub matched: bool,
    pub sub_stage_count: usize,
}

impl Display for FilterEvaluated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.matched {
            write!(f, "Filter matched, running {} sub-stages", self.sub_stage_count)
        } else {
            write!(f, "Filter did not match, skipping {} sub-stages", self.sub_stage_count)
        }
    }
}

impl StructuredLog for FilterEvaluated {
    fn log(&self) {
        tracing::debug!(
            matched = self.matched,
            sub_stage_count = self.sub_stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "filter",
            span_name = name,
            matched = self.matched,
            sub_stage_count = self.sub_stage_count,
        )
    }
}

/// A parallel stage started all of its branches.
///
/// # Log Level
/// `debug!` - One line per parallel invocation
pub struct ParallelFanOut {
    pub branch_count: usize,
}

impl Display for ParallelFanOut {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Parallel fan-out to {} branches", self.branch_count)
    }
}

impl StructuredLog for ParallelFanOut {
    fn log(&self) {
        tracing::debug!(branch_count = self.branch_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "parallel",
            span_name = name,
            branch_count = self.branch_count,
        )
    }
}

/// All branches of a parallel stage finished one phase and were merged.
///
/// # Log Level
/// `debug!` - Two lines per parallel invocation
pub struct ParallelPhaseJoined<'a> {
    /// `"in"` or `"out"`
    pub phase: &'a str,
    pub branch_count: usize,
    /// False when no merger is configured and the phase input passed through.
    pub merged: bool,
}

impl Display for ParallelPhaseJoined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let how = if self.merged { "merged" } else { "passed through" };
        write!(
            f,
            "Parallel '{}' phase joined {} branches, results {}",
            self.phase, self.branch_count, how
        )
    }
}

impl StructuredLog for ParallelPhaseJoined<'_> {
    fn log(&self) {
        tracing::debug!(
            phase = self.phase,
            branch_count = self.branch_count,
            merged = self.merged,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "parallel_join",
            span_name = name,
            phase = self.phase,
            branch_count = self.branch_count,
        )
    }
}

/// Caller code panicked and the panic was turned into a rejection.
///
/// # Log Level
/// `error!` - A stage, matcher, merger or executable is broken
///
/// # Example
/// ```
/// use the_layercake::observability::messages::branching::PanicCaught;
///
/// let msg = PanicCaught {
///     context: "filter matcher",
///     message: "index out of bounds",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct PanicCaught<'a> {
    pub context: &'a str,
    pub message: &'a str,
}

impl Display for PanicCaught<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Caught panic in {}: {}", self.context, self.message)
    }
}

impl StructuredLog for PanicCaught<'_> {
    fn log(&self) {
        tracing::error!(
            context = self.context,
            panic_message = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "panic_caught",
            span_name = name,
            context = self.context,
        )
    }
}
