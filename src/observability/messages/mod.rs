// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct with a `Display` implementation for the
//! human-readable line and a [`StructuredLog`] implementation that emits the
//! same event with its fields attached, at the level the message belongs to.
//!
//! # Organization
//!
//! * `pipeline` - run lifecycle and stage hand-offs
//! * `branching` - filter decisions, parallel fan-out/join, caught panics
//! * `config` - chain definition loading and validation
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_layercake::observability::messages::{pipeline::RunStarted, StructuredLog};
//!
//! let msg = RunStarted {
//!     pipeline: "checkout",
//!     stage_count: 3,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod branching;
pub mod config;
pub mod pipeline;

/// A log message that knows its own level and fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
