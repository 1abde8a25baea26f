// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

/// Decides whether a filter's sub-chain runs for a given value.
pub trait MatchStrategy<T>: Send + Sync {
    fn matches(&self, input: &T) -> bool;
}

/// A filter condition: either a plain predicate or a [`MatchStrategy`].
pub enum Matcher<T> {
    Callback(Arc<dyn Fn(&T) -> bool + Send + Sync>),
    Strategy(Arc<dyn MatchStrategy<T>>),
}

impl<T> Matcher<T> {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    pub fn strategy<S>(strategy: S) -> Self
    where
        S: MatchStrategy<T> + 'static,
    {
        Self::Strategy(Arc::new(strategy))
    }

    pub fn matches(&self, input: &T) -> bool {
        match self {
            Self::Callback(f) => f(input),
            Self::Strategy(strategy) => strategy.matches(input),
        }
    }
}

impl<T> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
            Self::Strategy(strategy) => Self::Strategy(Arc::clone(strategy)),
        }
    }
}

impl<T> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Matcher::Callback"),
            Self::Strategy(_) => f.write_str("Matcher::Strategy"),
        }
    }
}
