// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Keeps caller code from taking the process down: panics become rejections,
//! and each cursor step runs on its own task so chain length never turns into
//! native stack depth.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::errors::{PipelineError, StageResult};
use crate::observability::messages::{branching::PanicCaught, StructuredLog};

/// Await `future`, turning a panic raised while polling it into `PipelineError::Panicked`.
pub(crate) async fn catch_panic<T, F>(context: &str, future: F) -> StageResult<T>
where
    F: Future<Output = StageResult<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(panicked(context, payload)),
    }
}

/// Run `f`, turning a panic into `PipelineError::Panicked`.
pub(crate) fn catch_panic_sync<R>(context: &str, f: impl FnOnce() -> R) -> StageResult<R> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panicked(context, payload))
}

/// Run `future` on a fresh tokio task and await its result.
///
/// The awaiting side only polls a `JoinHandle`, so a continuation chain of any
/// length keeps a flat poll stack. Dropping the returned future aborts the task.
/// Outside a tokio runtime the future is awaited in place.
pub(crate) async fn hop<T: Send + 'static>(
    context: &str,
    future: BoxFuture<'static, StageResult<T>>,
) -> StageResult<T> {
    let Ok(handle) = Handle::try_current() else {
        return future.await;
    };

    let mut task = AbortOnDrop(handle.spawn(future.in_current_span()));
    match (&mut task.0).await {
        Ok(result) => result,
        Err(error) if error.is_panic() => Err(panicked(context, error.into_panic())),
        Err(_) => Err(PipelineError::Abandoned),
    }
}

struct AbortOnDrop<R>(JoinHandle<R>);

impl<R> Drop for AbortOnDrop<R> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panicked(context: &str, payload: Box<dyn Any + Send>) -> PipelineError {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    PanicCaught {
        context,
        message: &message,
    }
    .log();

    PipelineError::Panicked {
        context: context.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_panics_keep_their_message() {
        let error = catch_panic_sync("merge up", || -> u32 { panic!("bad merge {}", 7) }).unwrap_err();
        match error {
            PipelineError::Panicked { context, message } => {
                assert_eq!(context, "merge up");
                assert_eq!(message, "bad merge 7");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn sync_values_pass_through() {
        assert_eq!(catch_panic_sync("matcher", || 5).unwrap(), 5);
    }

    #[tokio::test]
    async fn async_panics_are_caught() {
        let error = catch_panic("stage", async {
            tokio::task::yield_now().await;
            if true {
                panic!("boom");
            }
            Ok::<u32, PipelineError>(1)
        })
        .await
        .unwrap_err();

        assert!(matches!(error, PipelineError::Panicked { ref message, .. } if message == "boom"));
    }

    #[tokio::test]
    async fn async_errors_are_not_rewrapped() {
        let error = catch_panic("stage", async { Err::<u32, _>(PipelineError::reject("declined")) })
            .await
            .unwrap_err();
        assert_eq!(error.reason().map(|r| r.to_string()), Some("declined".to_string()));
    }

    #[tokio::test]
    async fn hop_returns_the_task_result() {
        let result = hop("step", Box::pin(async { Ok::<u32, PipelineError>(7) })).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn hop_reports_panics_in_the_spawned_task() {
        let error = hop::<u32>(
            "step",
            Box::pin(async {
                if true {
                    panic!("task died");
                }
                Ok::<u32, PipelineError>(0)
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            error,
            PipelineError::Panicked { ref context, ref message } if context == "step" && message == "task died"
        ));
    }

    #[test]
    fn hop_runs_inline_without_a_runtime() {
        let result = futures::executor::block_on(hop("step", Box::pin(async { Ok::<u32, PipelineError>(3) })));
        assert_eq!(result.unwrap(), 3);
    }
}
