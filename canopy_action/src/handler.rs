// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use canopy_feature::Feature;

use crate::context::EvaluationContext;
use crate::error::HandlerError;
use crate::layer::MapLayer;

/// Something to run for a feature under the click.
///
/// Handlers are shared between threads that dispatch concurrently, so they
/// take `&self` and keep any mutable state behind their own synchronization.
pub trait ActionHandler: Send + Sync {
    /// Runs the action for `feature` of `layer`.
    ///
    /// `context` is built for this call alone and holds the click variables.
    fn run(
        &self,
        layer: &dyn MapLayer,
        feature: &Feature,
        context: &EvaluationContext,
    ) -> Result<(), HandlerError>;
}

/// Adapts a closure into an [`ActionHandler`].
///
/// ```rust
/// use canopy_action::{ActionHandler, FnAction, HandlerError};
///
/// let reject = FnAction::new(|_, feature, _| {
///     Err(HandlerError::new(format!("feature {} is read-only", feature.id())))
/// });
/// # let _: &dyn ActionHandler = &reject;
/// ```
pub struct FnAction<F> {
    f: F,
}

impl<F> FnAction<F>
where
    F: Fn(&dyn MapLayer, &Feature, &EvaluationContext) -> Result<(), HandlerError> + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ActionHandler for FnAction<F>
where
    F: Fn(&dyn MapLayer, &Feature, &EvaluationContext) -> Result<(), HandlerError> + Send + Sync,
{
    fn run(
        &self,
        layer: &dyn MapLayer,
        feature: &Feature,
        context: &EvaluationContext,
    ) -> Result<(), HandlerError> {
        (self.f)(layer, feature, context)
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}
