// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::traits::MergeStrategy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConcatenateConfig {
    #[serde(default)]
    pub separator: String,
}

/// Joins the merge input followed by every branch result, in pipe order.
pub struct Concatenate {
    separator: String,
}

impl Concatenate {
    pub fn new(config: ConcatenateConfig) -> Self {
        Self {
            separator: config.separator,
        }
    }
}

impl MergeStrategy<String> for Concatenate {
    fn merge(&self, input: String, results: Vec<String>) -> String {
        let mut parts = Vec::with_capacity(results.len() + 1);
        parts.push(input);
        parts.extend(results);
        parts.join(&self.separator)
    }
}

/// Keeps the first branch's result, or the input when there are no branches.
pub struct FirstResult;

impl MergeStrategy<String> for FirstResult {
    fn merge(&self, input: String, results: Vec<String>) -> String {
        results.into_iter().next().unwrap_or(input)
    }
}

/// Keeps the longest of the input and the branch results; earlier values win ties.
pub struct LongestResult;

impl MergeStrategy<String> for LongestResult {
    fn merge(&self, input: String, results: Vec<String>) -> String {
        results
            .into_iter()
            .fold(input, |longest, candidate| {
                if candidate.chars().count() > longest.chars().count() {
                    candidate
                } else {
                    longest
                }
            })
    }
}
