// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::engine::guard;
use crate::errors::StageResult;
use crate::observability::messages::{pipeline::*, StructuredLog};
use crate::traits::{Next, Pipeable, Stage};

const DEFAULT_NAME: &str = "pipeline";

/// Ordered chain of stages driven in onion order.
///
/// Each stage receives the value plus a continuation to the rest of the chain.
/// Stage k's "in" work runs before stage k+1's, and stage k's "out" work runs
/// after stage k+1 has fully completed. Past the last stage, the run resolves
/// with the value it reached (or, for [`run_with`](Pipeline::run_with), hands
/// it to the supplied continuation).
///
/// The stage list is fixed once built; every run gets its own cursor, so one
/// instance can be run any number of times, concurrently or re-entrantly.
///
/// Inside a tokio runtime each step of a run is driven on its own task, so chain
/// length and nesting cost heap, not stack.
///
/// # Examples
///
/// ```
/// use the_layercake::{stage_fn, Next, Pipeable, Pipeline};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let pipeline = Pipeline::named("brackets")
///     .pipe(stage_fn(|input: String, next: Next<String>| async move {
///         let output = next.call(format!("[{input}")).await?;
///         Ok(format!("{output}]"))
///     }))
///     .pipe(stage_fn(|input: String, next: Next<String>| async move {
///         next.call(input.to_uppercase()).await
///     }));
///
/// assert_eq!(pipeline.run("abc".to_string()).await.unwrap(), "[ABC]");
/// # });
/// ```
pub struct Pipeline<T: Send + 'static> {
    name: Arc<str>,
    stages: Arc<Vec<Arc<dyn Stage<T>>>>,
}

impl<T: Send + 'static> Pipeline<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::named(DEFAULT_NAME)
    }

    /// Create an empty pipeline with a label used in logs.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            stages: Arc::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the chain from its first stage. Resolves once every stage has completed
    /// both phases, rejects with the first failure that reaches the outermost stage.
    pub async fn run(&self, input: T) -> StageResult<T> {
        self.execute(input, Terminal::Resolve).await
    }

    /// Run the chain, handing the value to `on_complete` instead of resolving
    /// once the last stage calls its continuation.
    ///
    /// This nests the chain inside an enclosing one: its "in" phases run, then the
    /// enclosing chain continues, then its "out" phases run on the way back.
    pub async fn run_with(&self, input: T, on_complete: Next<T>) -> StageResult<T> {
        self.execute(input, Terminal::Delegate(on_complete)).await
    }

    async fn execute(&self, input: T, terminal: Terminal<T>) -> StageResult<T> {
        let started = RunStarted {
            pipeline: &self.name,
            stage_count: self.stages.len(),
        };
        let span = started.span("run");
        started.log();

        let start_time = Instant::now();
        let cursor = Cursor {
            pipeline: Arc::clone(&self.name),
            stages: Arc::clone(&self.stages),
            position: 0,
            terminal,
        };
        let result = cursor.advance(input).instrument(span).await;

        match &result {
            Ok(_) => RunCompleted {
                pipeline: &self.name,
                stage_count: self.stages.len(),
                duration: start_time.elapsed(),
            }
            .log(),
            Err(error) => RunFailed {
                pipeline: &self.name,
                error,
            }
            .log(),
        }

        result
    }
}

impl<T: Send + 'static> Pipeable<T> for Pipeline<T> {
    fn pipe_shared(mut self, stage: Arc<dyn Stage<T>>) -> Self {
        Arc::make_mut(&mut self.stages).push(stage);
        self
    }
}

/// A pipeline piped into another chain behaves like an unconditional filter:
/// its stages wrap whatever follows it in the enclosing chain.
#[async_trait]
impl<T: Send + 'static> Stage<T> for Pipeline<T> {
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T> {
        self.run_with(input, next).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Send + 'static> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// What happens when the cursor moves past the last stage.
enum Terminal<T> {
    /// Resolve with the value that reached the end.
    Resolve,
    /// Hand the value to an enclosing chain's continuation.
    Delegate(Next<T>),
}

/// Run-scoped position in a chain. Each continuation owns the cursor of the
/// stage it leads to, so positions only ever move forward within a run.
///
/// Every step runs on its own task (see `guard::hop`); a stage awaiting its
/// continuation only awaits a join handle, never the rest of the chain inline.
struct Cursor<T: Send + 'static> {
    pipeline: Arc<str>,
    stages: Arc<Vec<Arc<dyn Stage<T>>>>,
    position: usize,
    terminal: Terminal<T>,
}

impl<T: Send + 'static> Cursor<T> {
    fn advance(self, input: T) -> BoxFuture<'static, StageResult<T>> {
        let pipeline = Arc::clone(&self.pipeline);
        Box::pin(async move { guard::hop(&pipeline, self.step(input)).await })
    }

    fn step(self, input: T) -> BoxFuture<'static, StageResult<T>> {
        Box::pin(async move {
            let Some(stage) = self.stages.get(self.position).cloned() else {
                ChainEndReached {
                    pipeline: &self.pipeline,
                    delegated: matches!(self.terminal, Terminal::Delegate(_)),
                }
                .log();

                return match self.terminal {
                    Terminal::Resolve => Ok(input),
                    Terminal::Delegate(next) => next.call(input).await,
                };
            };

            StageEntered {
                pipeline: &self.pipeline,
                stage: stage.name(),
                position: self.position,
            }
            .log();

            let next = Cursor {
                position: self.position + 1,
                ..self
            }
            .into_next();

            guard::catch_panic(stage.name(), stage.invoke(input, next)).await
        })
    }

    fn into_next(self) -> Next<T> {
        Next::from_boxed(move |input| self.advance(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PipelineError;
    use crate::traits::stage_fn;
    use std::sync::Mutex;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Stage that records its "in" and "out" turns and the value it saw.
    fn recording(label: &'static str, journal: &Journal) -> impl Stage<String> {
        let journal = Arc::clone(journal);
        stage_fn(move |input: String, next: Next<String>| {
            let journal = Arc::clone(&journal);
            async move {
                journal.lock().unwrap().push(format!("{label}:in:{input}"));
                let output = next.call(input).await?;
                journal.lock().unwrap().push(format!("{label}:out"));
                Ok(output)
            }
        })
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn stages_run_in_onion_order() {
        let journal = Journal::default();
        let pipeline = Pipeline::new()
            .pipe(recording("s1", &journal))
            .pipe(recording("s2", &journal))
            .pipe(recording("s3", &journal));

        let output = pipeline.run("test".to_string()).await.unwrap();

        assert_eq!(output, "test");
        assert_eq!(
            entries(&journal),
            vec![
                "s1:in:test",
                "s2:in:test",
                "s3:in:test",
                "s3:out",
                "s2:out",
                "s1:out",
            ]
        );
    }

    #[tokio::test]
    async fn empty_pipeline_resolves_with_its_input() {
        let pipeline: Pipeline<String> = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run("x".to_string()).await.unwrap(), "x");
    }

    #[tokio::test]
    async fn stage_without_next_short_circuits() {
        let journal = Journal::default();
        let pipeline = Pipeline::new()
            .pipe(recording("s1", &journal))
            .pipe(stage_fn(|input: String, _next: Next<String>| async move {
                Ok(format!("{input}-stopped"))
            }))
            .pipe(recording("s3", &journal));

        let output = pipeline.run("test".to_string()).await.unwrap();

        assert_eq!(output, "test-stopped");
        assert_eq!(entries(&journal), vec!["s1:in:test", "s1:out"]);
    }

    #[tokio::test]
    async fn rejection_skips_outer_out_phases() {
        let journal = Journal::default();
        let pipeline = Pipeline::new()
            .pipe(recording("s1", &journal))
            .pipe(stage_fn(|_input: String, _next: Next<String>| async move {
                Err(PipelineError::reject("broken"))
            }));

        let error = pipeline.run("test".to_string()).await.unwrap_err();

        assert_eq!(error.to_string(), "broken");
        assert_eq!(entries(&journal), vec!["s1:in:test"]);
    }

    #[tokio::test]
    async fn stage_may_recover_from_a_rejection_further_in() {
        let pipeline = Pipeline::new()
            .pipe(stage_fn(|input: String, next: Next<String>| async move {
                match next.call(input.clone()).await {
                    Ok(output) => Ok(output),
                    Err(_) => Ok(format!("{input}-fallback")),
                }
            }))
            .pipe(stage_fn(|_input: String, _next: Next<String>| async move {
                Err(PipelineError::reject("broken"))
            }));

        assert_eq!(pipeline.run("test".to_string()).await.unwrap(), "test-fallback");
    }

    #[tokio::test]
    async fn panicking_stage_is_reported_as_a_rejection() {
        let pipeline = Pipeline::new().pipe(
            stage_fn(|_input: String, _next: Next<String>| async move {
                if true {
                    panic!("stage blew up");
                }
                Ok(String::new())
            })
            .named("exploding"),
        );

        let error = pipeline.run("test".to_string()).await.unwrap_err();
        match error {
            PipelineError::Panicked { context, message } => {
                assert_eq!(context, "exploding");
                assert_eq!(message, "stage blew up");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_runs_keep_separate_cursors() {
        let pipeline = Pipeline::new()
            .pipe(stage_fn(|input: String, next: Next<String>| async move {
                tokio::task::yield_now().await;
                let output = next.call(format!("{input}-a")).await?;
                Ok(format!("{output}-A"))
            }))
            .pipe(stage_fn(|input: String, next: Next<String>| async move {
                tokio::task::yield_now().await;
                next.call(format!("{input}-b")).await
            }));

        let (first, second) = tokio::join!(
            pipeline.run("one".to_string()),
            pipeline.run("two".to_string())
        );

        assert_eq!(first.unwrap(), "one-a-b-A");
        assert_eq!(second.unwrap(), "two-a-b-A");
    }

    #[tokio::test]
    async fn runs_are_repeatable() {
        let pipeline = Pipeline::new().pipe(stage_fn(|input: u64, next: Next<u64>| async move {
            next.call(input + 1).await
        }));

        for value in 0..3 {
            assert_eq!(pipeline.run(value).await.unwrap(), value + 1);
        }
    }

    #[tokio::test]
    async fn run_with_hands_the_end_to_the_given_continuation() {
        let journal = Journal::default();
        let pipeline = Pipeline::new().pipe(recording("inner", &journal));
        let outer = Arc::clone(&journal);
        let on_complete = Next::new(move |input: String| async move {
            outer.lock().unwrap().push("outer".to_string());
            Ok(format!("{input}-outer"))
        });

        let output = pipeline.run_with("v".to_string(), on_complete).await.unwrap();

        assert_eq!(output, "v-outer");
        assert_eq!(entries(&journal), vec!["inner:in:v", "outer", "inner:out"]);
    }

    #[tokio::test]
    async fn nested_pipeline_wraps_the_rest_of_the_parent() {
        let journal = Journal::default();
        let inner = Pipeline::named("inner")
            .pipe(recording("i1", &journal))
            .pipe(recording("i2", &journal));
        let pipeline = Pipeline::named("outer")
            .pipe(inner)
            .pipe(recording("o1", &journal));

        pipeline.run("v".to_string()).await.unwrap();

        assert_eq!(
            entries(&journal),
            vec!["i1:in:v", "i2:in:v", "o1:in:v", "o1:out", "i2:out", "i1:out"]
        );
    }

    fn increment() -> impl Stage<u64> {
        stage_fn(|input: u64, next: Next<u64>| async move { next.call(input + 1).await })
    }

    #[tokio::test]
    async fn long_chains_resolve() {
        let mut pipeline = Pipeline::new();
        for _ in 0..20_000 {
            pipeline = pipeline.pipe(increment());
        }

        assert_eq!(pipeline.len(), 20_000);
        assert_eq!(pipeline.run(0).await.unwrap(), 20_000);
    }

    #[tokio::test]
    async fn long_chains_unwind_their_out_phases() {
        let mut pipeline = Pipeline::new();
        for _ in 0..10_000 {
            pipeline = pipeline.pipe(stage_fn(|input: u64, next: Next<u64>| async move {
                let output = next.call(input).await?;
                Ok(output + 1)
            }));
        }

        assert_eq!(pipeline.run(0).await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn deeply_nested_pipelines_resolve() {
        let mut pipeline: Pipeline<u64> = Pipeline::new().pipe(increment());
        for _ in 0..2_000 {
            pipeline = Pipeline::new().pipe(pipeline).pipe(increment());
        }

        assert_eq!(pipeline.run(0).await.unwrap(), 2_001);
    }

    #[tokio::test]
    async fn rejection_deep_in_a_long_chain_reaches_the_caller() {
        let mut pipeline = Pipeline::new();
        for _ in 0..10_000 {
            pipeline = pipeline.pipe(increment());
        }
        let pipeline = pipeline.pipe(stage_fn(|input: u64, _next: Next<u64>| async move {
            Err(PipelineError::reject(format!("stopped at {input}")))
        }));

        let error = pipeline.run(0).await.unwrap_err();
        assert_eq!(error.to_string(), "stopped at 10000");
    }
}
