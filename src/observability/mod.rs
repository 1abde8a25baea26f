// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output of the engine goes through the message types in
//! [`messages`]. Message types follow a struct-based pattern with a `Display`
//! implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between events and spans
//! * Keep the log level of an event next to its wording
//!
//! # Usage
//!
//! ```rust
//! use the_layercake::observability::messages::{branching::FilterEvaluated, StructuredLog};
//!
//! FilterEvaluated {
//!     matched: false,
//!     sub_stage_count: 2,
//! }
//! .log();
//! ```
//!
//! Nothing is printed unless the application installs a subscriber; the
//! bundled binary uses `tracing-subscriber` with an `EnvFilter` read from
//! `RUST_LOG`.

pub mod messages;
