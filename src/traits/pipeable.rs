// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::traits::Stage;

/// Anything stages can be piped onto: a pipeline, a filter's sub-chain or a
/// parallel stage's branch list.
pub trait Pipeable<T: Send + 'static>: Sized {
    /// Append a stage that may also be piped elsewhere.
    #[must_use]
    fn pipe_shared(self, stage: Arc<dyn Stage<T>>) -> Self;

    /// Append a stage. Insertion order is execution order.
    #[must_use]
    fn pipe<S>(self, stage: S) -> Self
    where
        S: Stage<T> + 'static,
    {
        self.pipe_shared(Arc::new(stage))
    }
}
