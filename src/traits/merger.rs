// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

/// Combines the results of a parallel stage's branches into one value.
///
/// `input` is the value every branch started from (for the "in" merge) or the
/// continuation's output (for the "out" merge); `results` holds one value per
/// branch, in the order the branches were piped.
pub trait MergeStrategy<T>: Send + Sync {
    fn merge(&self, input: T, results: Vec<T>) -> T;
}

/// A merge step: either a plain function or a [`MergeStrategy`].
pub enum Merger<T> {
    Callback(Arc<dyn Fn(T, Vec<T>) -> T + Send + Sync>),
    Strategy(Arc<dyn MergeStrategy<T>>),
}

impl<T> Merger<T> {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(T, Vec<T>) -> T + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    pub fn strategy<S>(strategy: S) -> Self
    where
        S: MergeStrategy<T> + 'static,
    {
        Self::Strategy(Arc::new(strategy))
    }

    pub fn merge(&self, input: T, results: Vec<T>) -> T {
        match self {
            Self::Callback(f) => f(input, results),
            Self::Strategy(strategy) => strategy.merge(input, results),
        }
    }
}

impl<T> Clone for Merger<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
            Self::Strategy(strategy) => Self::Strategy(Arc::clone(strategy)),
        }
    }
}

impl<T> fmt::Debug for Merger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Merger::Callback"),
            Self::Strategy(_) => f.write_str("Merger::Strategy"),
        }
    }
}
