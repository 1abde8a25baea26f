// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

use crate::errors::StageResult;

/// One layer of the onion.
///
/// `invoke` receives the current value and the continuation to the rest of the
/// chain. Everything the stage does before calling `next` is its "in" phase,
/// everything it does with the continuation's output is its "out" phase.
/// Returning `Ok` resolves the stage, returning `Err` rejects it; since the
/// future completes once, a stage settles exactly once.
///
/// A stage that never calls `next` short-circuits: no later stage runs.
#[async_trait]
pub trait Stage<T: Send + 'static>: Send + Sync {
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T>;

    /// Label used in logs and panic reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Continuation to the remainder of a chain.
///
/// Consumed by [`Next::call`], so a stage can hand control inward at most once.
pub struct Next<T> {
    call: Box<dyn FnOnce(T) -> BoxFuture<'static, StageResult<T>> + Send>,
}

impl<T: Send + 'static> Next<T> {
    /// Build a continuation from an async closure.
    ///
    /// Useful for driving a single stage outside a pipeline:
    ///
    /// ```
    /// use the_layercake::Next;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let next = Next::new(|input: String| async move { Ok(format!("{input}-next")) });
    /// assert_eq!(next.call("input".to_string()).await.unwrap(), "input-next");
    /// # });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = StageResult<T>> + Send + 'static,
    {
        Self {
            call: Box::new(move |input| Box::pin(f(input))),
        }
    }

    /// Continuation that resolves immediately with whatever it is given.
    pub fn resolve() -> Self {
        Self::new(|input| async move { Ok(input) })
    }

    pub(crate) fn from_boxed<F>(f: F) -> Self
    where
        F: FnOnce(T) -> BoxFuture<'static, StageResult<T>> + Send + 'static,
    {
        Self { call: Box::new(f) }
    }

    /// Hand `input` to the rest of the chain.
    ///
    /// The continuation body runs as part of this call; the returned future
    /// settles with the output of everything further in.
    pub fn call(self, input: T) -> BoxFuture<'static, StageResult<T>> {
        (self.call)(input)
    }
}

impl<T> fmt::Debug for Next<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Stage backed by a closure, see [`stage_fn`].
pub struct StageFn<F> {
    f: F,
    name: &'static str,
}

/// Turn an async closure `(input, next) -> StageResult<T>` into a [`Stage`].
pub fn stage_fn<T, F, Fut>(f: F) -> StageFn<F>
where
    T: Send + 'static,
    F: Fn(T, Next<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = StageResult<T>> + Send + 'static,
{
    StageFn { f, name: "stage_fn" }
}

impl<F> StageFn<F> {
    /// Give the stage a label for logs.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl<T, F, Fut> Stage<T> for StageFn<F>
where
    T: Send + 'static,
    F: Fn(T, Next<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = StageResult<T>> + Send + 'static,
{
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T> {
        (self.f)(input, next).await
    }

    fn name(&self) -> &str {
        self.name
    }
}
