// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The single rejection channel shared by every stage, matcher, merger and executable.

use std::error::Error;
use thiserror::Error;

/// Opaque rejection reason supplied by caller code.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Outcome of a stage, a continuation or a whole run: `Ok` resolves, `Err` rejects.
pub type StageResult<T> = Result<T, PipelineError>;

/// Why a run (or a single stage) failed.
///
/// The engine relays these outward untouched. The only variants it produces
/// itself describe contract breaches it can detect (`Panicked`, `Unsettled`,
/// `BranchSkippedContinuation`, `Abandoned`); everything a stage rejects with
/// travels as `Rejected`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage or executable rejected with a caller-defined reason.
    #[error("{0}")]
    Rejected(BoxError),

    /// Caller code panicked; the panic was caught and turned into a rejection.
    #[error("{context} panicked: {message}")]
    Panicked { context: String, message: String },

    /// A callback executable dropped its settle handle without resolving or rejecting.
    #[error("{context} dropped its settle handle without resolving or rejecting")]
    Unsettled { context: String },

    /// A parallel branch resolved without ever calling its continuation.
    #[error("parallel branch {branch} resolved without calling its continuation")]
    BranchSkippedContinuation { branch: usize },

    /// The driver awaiting a parked continuation went away before releasing it.
    #[error("continuation abandoned before it was released")]
    Abandoned,
}

impl PipelineError {
    /// Reject with an arbitrary reason (anything convertible into a boxed error,
    /// including `&str` and `String`).
    pub fn reject(reason: impl Into<BoxError>) -> Self {
        Self::Rejected(reason.into())
    }

    /// The caller-supplied reason, when this is a plain rejection.
    pub fn reason(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Rejected(reason) => Some(reason.as_ref()),
            _ => None,
        }
    }
}
