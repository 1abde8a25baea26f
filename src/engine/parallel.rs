// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use std::sync::Arc;

use crate::engine::branch::{BranchRun, ParallelBranch};
use crate::engine::guard;
use crate::errors::{PipelineError, StageResult};
use crate::observability::messages::{branching::*, StructuredLog};
use crate::traits::{Merger, Next, Pipeable, Stage};

/// Stage that runs its branches concurrently around the rest of the chain.
///
/// Every branch starts from the same input. Once each branch has called its
/// continuation, the "in" values are merged (`merge_up`) and the enclosing
/// chain continues once with the result. Its output is then handed to every
/// branch for their "out" phases, and those results are merged (`merge_down`)
/// into the value this stage resolves with.
///
/// Without a merger a phase passes its input through: the original input on the
/// way in, the continuation's output on the way out. Result vectors handed to a
/// merger are in pipe order, whatever order the branches finished in.
///
/// Branches are polled together on the invoking task.
pub struct Parallel<T: Send + 'static> {
    branches: Vec<ParallelBranch<T>>,
    merge_up: Option<Merger<T>>,
    merge_down: Option<Merger<T>>,
}

impl<T: Clone + Send + 'static> Parallel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_mergers(None, None)
    }

    #[must_use]
    pub fn with_mergers(merge_up: Option<Merger<T>>, merge_down: Option<Merger<T>>) -> Self {
        Self {
            branches: Vec::new(),
            merge_up,
            merge_down,
        }
    }

    /// Merge applied to the branches' "in" values before the chain continues.
    #[must_use]
    pub fn merge_up(mut self, merger: Merger<T>) -> Self {
        self.merge_up = Some(merger);
        self
    }

    /// Merge applied to the branches' "out" values before this stage resolves.
    #[must_use]
    pub fn merge_down(mut self, merger: Merger<T>) -> Self {
        self.merge_down = Some(merger);
        self
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}

impl<T: Clone + Send + 'static> Pipeable<T> for Parallel<T> {
    fn pipe_shared(mut self, stage: Arc<dyn Stage<T>>) -> Self {
        let index = self.branches.len();
        self.branches.push(ParallelBranch::new(index, stage));
        self
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> Stage<T> for Parallel<T> {
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T> {
        let branch_count = self.branches.len();
        ParallelFanOut { branch_count }.log();

        let mut parked = Vec::with_capacity(branch_count);
        let mut releases = Vec::with_capacity(branch_count);
        let mut completions: Vec<BoxFuture<'static, StageResult<T>>> = Vec::with_capacity(branch_count);
        for branch in &self.branches {
            let BranchRun {
                parked: up,
                release,
                completion,
            } = branch.start(input.clone());
            parked.push(up);
            releases.push(release);
            completions.push(completion);
        }

        let merge_up = self.merge_up.as_ref();
        let continuation = async move {
            let mut values = Vec::with_capacity(parked.len());
            for up in parked {
                match up.await {
                    Ok(value) => values.push(value),
                    // Only reached once a branch has dropped its continuation unused.
                    // That branch's completion then always fails, with its own
                    // rejection or BranchSkippedContinuation, and try_join! returns
                    // that error. Waiting here keeps it from racing an Abandoned.
                    Err(_) => return future::pending().await,
                }
            }

            let merged = merge(merge_up, input, values, "in")?;
            let output = next.call(merged).await?;

            for release in releases {
                // a branch that already settled no longer listens
                let _ = release.send(output.clone());
            }
            Ok::<T, PipelineError>(output)
        };

        let (outputs, continued) = tokio::try_join!(future::try_join_all(completions), continuation)?;

        merge(self.merge_down.as_ref(), continued, outputs, "out")
    }

    fn name(&self) -> &str {
        "parallel"
    }
}

impl<T: Clone + Send + 'static> Default for Parallel<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn merge<T>(merger: Option<&Merger<T>>, input: T, results: Vec<T>, phase: &str) -> StageResult<T> {
    let joined = ParallelPhaseJoined {
        phase,
        branch_count: results.len(),
        merged: merger.is_some(),
    };
    joined.log();

    match merger {
        Some(merger) => guard::catch_panic_sync(&format!("parallel merge {phase}"), || merger.merge(input, results)),
        None => Ok(input),
    }
}
