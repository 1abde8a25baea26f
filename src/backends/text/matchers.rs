// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::traits::MatchStrategy;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainsConfig {
    pub needle: String,
}

/// Matches values containing `needle` anywhere.
pub struct ContainsText {
    config: ContainsConfig,
}

impl ContainsText {
    pub fn new(config: ContainsConfig) -> Self {
        Self { config }
    }
}

impl MatchStrategy<String> for ContainsText {
    fn matches(&self, input: &String) -> bool {
        input.contains(&self.config.needle)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartsWithConfig {
    pub prefix: String,
}

/// Matches values that begin with `prefix`.
pub struct StartsWithText {
    config: StartsWithConfig,
}

impl StartsWithText {
    pub fn new(config: StartsWithConfig) -> Self {
        Self { config }
    }
}

impl MatchStrategy<String> for StartsWithText {
    fn matches(&self, input: &String) -> bool {
        input.starts_with(&self.config.prefix)
    }
}

/// Matches any value with at least one character.
pub struct NonEmptyText;

impl MatchStrategy<String> for NonEmptyText {
    fn matches(&self, input: &String) -> bool {
        !input.is_empty()
    }
}
