// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-branch coordinator for [`Parallel`](crate::engine::Parallel).
//!
//! A branch's stage is handed a continuation that, instead of running anything,
//! reports the stage's "in" value to the parallel stage and parks until the
//! parallel stage releases it with the output of the enclosing chain. That
//! splits every branch into an "in" half and an "out" half the parallel stage
//! can join separately.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::engine::guard;
use crate::errors::{PipelineError, StageResult};
use crate::traits::{Next, Stage};

pub(crate) struct ParallelBranch<T: Send + 'static> {
    index: usize,
    stage: Arc<dyn Stage<T>>,
}

/// Channels and completion future of one branch for one invocation.
pub(crate) struct BranchRun<T> {
    /// Receives the value the stage passed to its continuation.
    pub(crate) parked: oneshot::Receiver<T>,
    /// Releases the parked continuation with the enclosing chain's output.
    pub(crate) release: oneshot::Sender<T>,
    /// Settles with the branch stage's own result (its "out" value).
    pub(crate) completion: BoxFuture<'static, StageResult<T>>,
}

impl<T: Send + 'static> ParallelBranch<T> {
    pub(crate) fn new(index: usize, stage: Arc<dyn Stage<T>>) -> Self {
        Self { index, stage }
    }

    /// Start the branch's stage on `input`.
    ///
    /// All channel state is created here, per invocation, so the same branch can
    /// take part in any number of concurrent runs.
    pub(crate) fn start(&self, input: T) -> BranchRun<T> {
        let (park, parked) = oneshot::channel();
        let (release, released) = oneshot::channel();
        let continued = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&continued);
        let next = Next::new(move |value: T| {
            flag.store(true, Ordering::Release);
            // the parallel stage stops listening only once it is being torn down
            let _ = park.send(value);
            async move { released.await.map_err(|_| PipelineError::Abandoned) }
        });

        let index = self.index;
        let stage = Arc::clone(&self.stage);
        let completion = Box::pin(async move {
            let output = guard::catch_panic(stage.name(), stage.invoke(input, next)).await?;
            if continued.load(Ordering::Acquire) {
                Ok(output)
            } else {
                Err(PipelineError::BranchSkippedContinuation { branch: index })
            }
        });

        BranchRun {
            parked,
            release,
            completion,
        }
    }
}
