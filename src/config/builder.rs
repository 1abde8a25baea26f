// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::loader::{ChainConfig, StageConfig};
use crate::config::registry::ComponentRegistry;
use crate::engine::{Filter, Parallel, Pipeline, Task};
use crate::errors::ConfigError;
use crate::traits::{Pipeable, Stage};

/// Turns chain definitions into runnable pipelines, resolving component names
/// through a [`ComponentRegistry`].
///
/// Building does not re-validate; unknown names surface as
/// [`ConfigError::Component`] at the first stage that uses one.
pub struct ChainBuilder<'a, T: Send + 'static> {
    registry: &'a ComponentRegistry<T>,
}

impl<'a, T: Clone + Send + 'static> ChainBuilder<'a, T> {
    pub fn new(registry: &'a ComponentRegistry<T>) -> Self {
        Self { registry }
    }

    pub fn build(&self, config: &ChainConfig) -> Result<Pipeline<T>, ConfigError> {
        self.fill(Pipeline::named(&config.name), &config.stages)
    }

    /// Pipe every stage in `stages` onto `target`, in order.
    fn fill<P: Pipeable<T>>(&self, target: P, stages: &[StageConfig]) -> Result<P, ConfigError> {
        stages
            .iter()
            .try_fold(target, |target, stage| Ok(target.pipe_shared(self.build_stage(stage)?)))
    }

    fn build_stage(&self, stage: &StageConfig) -> Result<Arc<dyn Stage<T>>, ConfigError> {
        let registry = self.registry;
        let built: Arc<dyn Stage<T>> = match stage {
            StageConfig::Task {
                execute_in,
                execute_out,
            } => Arc::new(Task::with_executables(
                execute_in.as_ref().map(|c| registry.build_executable(c)).transpose()?,
                execute_out.as_ref().map(|c| registry.build_executable(c)).transpose()?,
            )),
            StageConfig::Filter { matcher, stages } => {
                let matcher = matcher.as_ref().map(|c| registry.build_matcher(c)).transpose()?;
                Arc::new(self.fill(Filter::with_matcher(matcher), stages)?)
            }
            StageConfig::Parallel {
                merge_up,
                merge_down,
                stages,
            } => {
                let parallel = Parallel::with_mergers(
                    merge_up.as_ref().map(|c| registry.build_merger(c)).transpose()?,
                    merge_down.as_ref().map(|c| registry.build_merger(c)).transpose()?,
                );
                Arc::new(self.fill(parallel, stages)?)
            }
            StageConfig::Pipeline { name, stages } => {
                let pipeline = name.as_deref().map_or_else(Pipeline::new, Pipeline::named);
                Arc::new(self.fill(pipeline, stages)?)
            }
        };
        Ok(built)
    }
}
