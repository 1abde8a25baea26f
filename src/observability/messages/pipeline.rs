// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline runs.
//!
//! This module contains message types for logging events related to:
//! * Run lifecycle (start, completion, failure)
//! * Hand-offs from one stage to the next
//! * Reaching the end of a chain

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A pipeline run started.
///
/// # Log Level
/// `debug!` - Runs are frequent; one line per run
///
/// # Example
/// ```
/// use the_layercake::observability::messages::pipeline::RunStarted;
///
/// let msg = RunStarted {
///     pipeline: "checkout",
///     stage_count: 4,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' run started with {} stages",
            self.pipeline, self.stage_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pipeline_run",
            span_name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// A pipeline run resolved.
///
/// # Log Level
/// `debug!` - Runs are frequent; one line per run
pub struct RunCompleted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' run completed: {} stages in {:?}",
            self.pipeline, self.stage_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "run_completed",
            span_name = name,
            pipeline = self.pipeline,
            duration = ?self.duration,
        )
    }
}

/// A pipeline run rejected.
///
/// # Log Level
/// `warn!` - The caller gets the error back; this records where it surfaced
///
/// # Example
/// ```
/// use the_layercake::observability::messages::pipeline::RunFailed;
/// use the_layercake::PipelineError;
///
/// let error = PipelineError::reject("card declined");
/// let msg = RunFailed {
///     pipeline: "checkout",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub pipeline: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline '{}' run failed: {}", self.pipeline, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "run_failed",
            span_name = name,
            pipeline = self.pipeline,
            error = %self.error,
        )
    }
}

/// Control moved to the stage at `position`.
///
/// # Log Level
/// `trace!` - One line per stage per run
pub struct StageEntered<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub position: usize,
}

impl Display for StageEntered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' entering stage {} ({})",
            self.pipeline, self.position, self.stage
        )
    }
}

impl StructuredLog for StageEntered<'_> {
    fn log(&self) {
        tracing::trace!(
            pipeline = self.pipeline,
            stage = self.stage,
            position = self.position,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "stage",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            position = self.position,
        )
    }
}

/// The cursor moved past the last stage.
///
/// # Log Level
/// `trace!` - One line per run
pub struct ChainEndReached<'a> {
    pub pipeline: &'a str,
    /// True when the end hands control to an enclosing chain instead of resolving.
    pub delegated: bool,
}

impl Display for ChainEndReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.delegated {
            write!(
                f,
                "Pipeline '{}' reached its end, handing over to the enclosing chain",
                self.pipeline
            )
        } else {
            write!(f, "Pipeline '{}' reached its end, resolving", self.pipeline)
        }
    }
}

impl StructuredLog for ChainEndReached<'_> {
    fn log(&self) {
        tracing::trace!(
            pipeline = self.pipeline,
            delegated = self.delegated,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "chain_end",
            span_name = name,
            pipeline = self.pipeline,
            delegated = self.delegated,
        )
    }
}
