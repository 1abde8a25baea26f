// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::engine::guard;
use crate::errors::{BoxError, PipelineError, StageResult};

/// One half of a [`Task`](crate::engine::Task): transforms a value on the way in or out.
#[async_trait]
pub trait ExecuteStrategy<T: Send + 'static>: Send + Sync {
    async fn execute(&self, input: T) -> StageResult<T>;
}

/// Settle handle handed to callback executables.
///
/// Consumed by whichever method is called, so a callback settles at most once.
/// Dropping it unsettled rejects the task with [`PipelineError::Unsettled`].
pub struct Settle<T> {
    tx: oneshot::Sender<StageResult<T>>,
}

impl<T> Settle<T> {
    fn channel() -> (Self, oneshot::Receiver<StageResult<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, reason: impl Into<BoxError>) {
        self.settle(Err(PipelineError::reject(reason)));
    }

    pub fn settle(self, result: StageResult<T>) {
        // the task only stops listening once its run is gone
        let _ = self.tx.send(result);
    }
}

impl<T> fmt::Debug for Settle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settle").finish_non_exhaustive()
    }
}

/// An executable: either a callback `(input, settle)` or an [`ExecuteStrategy`].
pub enum Executable<T: Send + 'static> {
    Callback(Arc<dyn Fn(T, Settle<T>) + Send + Sync>),
    Strategy(Arc<dyn ExecuteStrategy<T>>),
}

impl<T: Send + 'static> Executable<T> {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(T, Settle<T>) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    pub fn strategy<S>(strategy: S) -> Self
    where
        S: ExecuteStrategy<T> + 'static,
    {
        Self::Strategy(Arc::new(strategy))
    }

    /// Run the executable to completion. `context` labels panics and unsettled callbacks.
    pub async fn execute(&self, input: T, context: &str) -> StageResult<T> {
        match self {
            Self::Callback(f) => {
                let (settle, settled) = Settle::channel();
                guard::catch_panic_sync(context, || f(input, settle))?;
                settled.await.unwrap_or_else(|_| {
                    Err(PipelineError::Unsettled {
                        context: context.to_string(),
                    })
                })
            }
            Self::Strategy(strategy) => guard::catch_panic(context, strategy.execute(input)).await,
        }
    }
}

impl<T: Send + 'static> Clone for Executable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
            Self::Strategy(strategy) => Self::Strategy(Arc::clone(strategy)),
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Executable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Executable::Callback"),
            Self::Strategy(_) => f.write_str("Executable::Strategy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn callback_can_settle_from_another_task() {
        let executable = Executable::callback(|input: String, settle: Settle<String>| {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                settle.resolve(format!("{input}-later"));
            });
        });

        let output = executable.execute("value".to_string(), "test").await.unwrap();
        assert_eq!(output, "value-later");
    }

    #[tokio::test]
    async fn dropped_settle_is_reported() {
        let executable = Executable::callback(|_input: String, _settle: Settle<String>| {});

        let error = executable.execute("value".to_string(), "task in").await.unwrap_err();
        assert!(matches!(error, PipelineError::Unsettled { ref context } if context == "task in"));
    }

    #[tokio::test]
    async fn panicking_callback_becomes_a_rejection() {
        let executable = Executable::callback(|_input: String, _settle: Settle<String>| {
            panic!("callback exploded");
        });

        let error = executable.execute("value".to_string(), "task out").await.unwrap_err();
        match error {
            PipelineError::Panicked { context, message } => {
                assert_eq!(context, "task out");
                assert_eq!(message, "callback exploded");
            }
            other => panic!("expected a caught panic, got {other:?}"),
        }
    }
}
