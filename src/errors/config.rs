// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a chain definition against a component registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A task references an executable that is not registered
    UnknownExecutable {
        /// Location of the stage in the chain, e.g. `stages[1].stages[0]`
        path: String,
        name: String,
    },
    /// A filter references a matcher that is not registered
    UnknownMatcher { path: String, name: String },
    /// A parallel stage references a merger that is not registered
    UnknownMerger { path: String, name: String },
    /// Sub-chains are nested deeper than the supported limit
    NestingTooDeep { path: String, max_depth: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownExecutable { path, name } => {
                write!(f, "Stage '{}' uses unknown executable '{}'", path, name)
            }
            ValidationError::UnknownMatcher { path, name } => {
                write!(f, "Filter '{}' uses unknown matcher '{}'", path, name)
            }
            ValidationError::UnknownMerger { path, name } => {
                write!(f, "Parallel '{}' uses unknown merger '{}'", path, name)
            }
            ValidationError::NestingTooDeep { path, max_depth } => {
                write!(
                    f,
                    "Stage '{}' is nested deeper than the maximum of {} levels",
                    path, max_depth
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a chain definition and turning it into a pipeline.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read chain file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported chain file extension for '{}' (expected yaml, yml, json or toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse YAML chain definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON chain definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML chain definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("chain definition is invalid: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("failed to build {kind} '{name}': {reason}")]
    Component {
        kind: &'static str,
        name: String,
        reason: String,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
