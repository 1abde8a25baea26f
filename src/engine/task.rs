// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::StageResult;
use crate::traits::{Executable, Next, Stage};

/// Stage built from an optional "in" and an optional "out" executable.
///
/// The "in" executable transforms the value before the chain continues, the
/// "out" executable transforms the continuation's output. A missing executable
/// passes its value through unchanged, so an empty task is a no-op layer.
#[derive(Debug)]
pub struct Task<T: Send + 'static> {
    execute_in: Option<Executable<T>>,
    execute_out: Option<Executable<T>>,
}

impl<T: Send + 'static> Task<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_executables(None, None)
    }

    #[must_use]
    pub fn with_executables(execute_in: Option<Executable<T>>, execute_out: Option<Executable<T>>) -> Self {
        Self {
            execute_in,
            execute_out,
        }
    }

    #[must_use]
    pub fn execute_in(mut self, executable: Executable<T>) -> Self {
        self.execute_in = Some(executable);
        self
    }

    #[must_use]
    pub fn execute_out(mut self, executable: Executable<T>) -> Self {
        self.execute_out = Some(executable);
        self
    }
}

async fn run_phase<T: Send + 'static>(executable: Option<&Executable<T>>, input: T, context: &str) -> StageResult<T> {
    match executable {
        Some(executable) => executable.execute(input, context).await,
        None => Ok(input),
    }
}

#[async_trait]
impl<T: Send + 'static> Stage<T> for Task<T> {
    async fn invoke(&self, input: T, next: Next<T>) -> StageResult<T> {
        let entered = run_phase(self.execute_in.as_ref(), input, "task in").await?;
        let output = next.call(entered).await?;
        run_phase(self.execute_out.as_ref(), output, "task out").await
    }

    fn name(&self) -> &str {
        "task"
    }
}

impl<T: Send + 'static> Default for Task<T> {
    fn default() -> Self {
        Self::new()
    }
}
