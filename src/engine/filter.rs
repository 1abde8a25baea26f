// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::guard;
use crate::engine::pipeline::Pipeline;
use crate::errors::StageResult;
use crate::observability::messages::{branching::FilterEvaluated, StructuredLog};
use crate::traits::{Matcher, Next, Pipeable, Stage};

/// Stage that runs a nested sub-chain only when its matcher accepts the value.
///
/// On a match the sub-chain wraps the rest of the enclosing chain: its "in"
/// phases run, the enclosing chain continues, and its "out" phases run on the way
/// back. Without a match (or without a matcher at all) the value goes straight
/// to the enclosing continuation and the sub-chain is skipped entirely.
pub struct Filter<T: Send + 'static> {
    matcher: Option<Matcher<T>>,
    sub_chain: Pipeline<T>,
}

impl<T: Send + 'static> Filter<T> {
    #[must_use]
    pub fn new(matcher: Matcher<T>) -> Self {
        Self::with_matcher(Some(matcher))
    }

    /// A filter whose matcher may be absent; an absent matcher never matches.
    #[must_use]
    pub fn with_matcher(matcher: Option<Matcher<T>>) -> Self {
        Self {
            matcher,
            sub_chain: Pipeline::named("filter"),
        }
    }

    /// Shorthand for a filter driven by a plain predicate.
    #[must_use]
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(Matcher::callback(predicate))
    }

    fn matches(&self, input: &T) -> StageResult<bool> {
        match &self.matcher {
            Some(matcher) => guard::catch_panic_sync("filter matcher", || matcher.matches(input)),
            None => Ok(false),
        }
    }
}

impl<T: Send + 'static> Pipeable<T> for Filter<T> {
    fn pipe_shared(mut self, stage: Arc<dyn Stage<T>>) -> Self {
        self.sub_chain = self.sub_chain.pipe_shared(stage);
        self
    }
}

#[async_trait]
impl<T: Send + 'static> Stage<T> for Filter<T> {
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T> {
        let matched = self.matches(&input)?;

        FilterEvaluated {
            matched,
            sub_stage_count: self.sub_chain.len(),
        }
        .log();

        if matched {
            self.sub_chain.run_with(input, next).await
        } else {
            next.call(input).await
        }
    }

    fn name(&self) -> &str {
        "filter"
    }
}

impl<T: Send + 'static> Default for Filter<T> {
    fn default() -> Self {
        Self::with_matcher(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PipelineError;
    use crate::traits::{stage_fn, MatchStrategy};

    fn wrapping(up: &'static str, down: &'static str) -> impl Stage<String> {
        stage_fn(move |input: String, next: Next<String>| async move {
            let output = next.call(format!("{input}{up}")).await?;
            Ok(format!("{output}{down}"))
        })
    }

    fn regular() -> impl Stage<String> {
        stage_fn(|input: String, _next: Next<String>| async move {
            Ok(format!("{input}-regularStage"))
        })
    }

    struct Fixed(bool);

    impl MatchStrategy<String> for Fixed {
        fn matches(&self, _input: &String) -> bool {
            self.0
        }
    }

    async fn run_with_matcher(matcher: Option<Matcher<String>>) -> StageResult<String> {
        Pipeline::new()
            .pipe(Filter::with_matcher(matcher).pipe(wrapping("-filterStageUp", "-filterStageDown")))
            .pipe(regular())
            .run("input".to_string())
            .await
    }

    #[tokio::test]
    async fn skips_sub_chain_when_callback_rejects_the_value() {
        let output = run_with_matcher(Some(Matcher::callback(|_: &String| false)))
            .await
            .unwrap();
        assert_eq!(output, "input-regularStage");
    }

    #[tokio::test]
    async fn wraps_the_parent_chain_when_callback_matches() {
        let output = run_with_matcher(Some(Matcher::callback(|_: &String| true)))
            .await
            .unwrap();
        assert_eq!(output, "input-filterStageUp-regularStage-filterStageDown");
    }

    #[tokio::test]
    async fn strategy_matchers_are_consulted() {
        let matched = run_with_matcher(Some(Matcher::strategy(Fixed(true)))).await.unwrap();
        let skipped = run_with_matcher(Some(Matcher::strategy(Fixed(false)))).await.unwrap();

        assert_eq!(matched, "input-filterStageUp-regularStage-filterStageDown");
        assert_eq!(skipped, "input-regularStage");
    }

    #[tokio::test]
    async fn missing_matcher_never_matches() {
        let output = run_with_matcher(None).await.unwrap();
        assert_eq!(output, "input-regularStage");
    }

    #[tokio::test]
    async fn matcher_sees_the_current_value() {
        let pipeline = Pipeline::new()
            .pipe(wrapping("-vip", ""))
            .pipe(Filter::when(|input: &String| input.ends_with("-vip")).pipe(wrapping("-discount", "")));

        let output = pipeline.run("order".to_string()).await.unwrap();
        assert_eq!(output, "order-vip-discount");
    }

    #[tokio::test]
    async fn nested_sub_chain_runs_in_order() {
        let filter = Filter::when(|_: &String| true)
            .pipe(wrapping("-a", "-A"))
            .pipe(wrapping("-b", "-B"));
        let output = Pipeline::new()
            .pipe(filter)
            .pipe(wrapping("-c", "-C"))
            .run("x".to_string())
            .await
            .unwrap();

        assert_eq!(output, "x-a-b-c-C-B-A");
    }

    #[tokio::test]
    async fn rejection_inside_sub_chain_reaches_the_caller() {
        let filter = Filter::when(|_: &String| true).pipe(stage_fn(
            |_input: String, _next: Next<String>| async move { Err(PipelineError::reject("filtered out")) },
        ));
        let error = Pipeline::new()
            .pipe(filter)
            .pipe(regular())
            .run("input".to_string())
            .await
            .unwrap_err();

        assert_eq!(error.reason().map(|r| r.to_string()), Some("filtered out".to_string()));
    }

    #[tokio::test]
    async fn panicking_matcher_rejects_the_run() {
        let filter = Filter::when(|_: &String| panic!("matcher broke")).pipe(regular());
        let error = Pipeline::new()
            .pipe(filter)
            .run("input".to_string())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            PipelineError::Panicked { ref context, ref message }
                if context == "filter matcher" && message == "matcher broke"
        ));
    }
}
