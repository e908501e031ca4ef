// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The click-to-action pipeline.
//!
//! A dispatch moves through fixed states:
//!
//! ```text
//! Idle -> Validating -> Transforming -> Querying -> Dispatching -> Done
//!                            \_____________________________/
//!                              undefined transform: no query
//! ```
//!
//! Validation failures end the dispatch with a [`DispatchError`] before any
//! query runs. Everything after validation always completes with a
//! [`DispatchReport`]: an undefined coordinate transform degrades to an empty
//! result, and a failing handler is recorded without stopping the others.

use std::fmt;
use std::sync::Arc;

use canopy_crs::TransformUndefined;
use canopy_feature::{Feature, FeatureId, FeatureRequest, FeatureStore};
use canopy_view2d::MapViewport;
use kurbo::{Point, Rect};

use crate::config::DispatchConfig;
use crate::context::{ScopeProvider, build_context};
use crate::error::{DispatchError, HandlerFailure};
use crate::layer::{LayerProvider, MapLayer};
use crate::registry::ActionRegistry;
use crate::resolve::{has_usable_actions, resolve};
use crate::view::MapView;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DispatchState {
    Idle,
    Validating,
    Transforming,
    Querying,
    Dispatching,
    Done,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a completed dispatch ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// At least one handler ran (successfully or not).
    Dispatched,
    /// No feature intersected the search region, or the region could not be
    /// computed.
    ZeroFeaturesMatched,
    /// Features matched, but no handler resolved for any of them.
    NoHandlerResolved,
}

/// What happened during one dispatch.
#[derive(Debug)]
pub struct DispatchReport {
    /// The click in map coordinates.
    pub map_point: Point,
    /// The search region in layer coordinates, or `None` if the transform was
    /// undefined.
    pub search_rect: Option<Rect>,
    /// Why the search region could not be computed, if it could not.
    pub transform_undefined: Option<TransformUndefined>,
    /// Features returned by the query.
    pub matched: usize,
    /// Features a handler ran for.
    pub dispatched: usize,
    /// Features for which no handler resolved.
    pub unmatched: Vec<FeatureId>,
    /// Handlers that reported an error.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    fn new(map_point: Point) -> Self {
        Self {
            map_point,
            search_rect: None,
            transform_undefined: None,
            matched: 0,
            dispatched: 0,
            unmatched: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Summary of the dispatch.
    pub fn outcome(&self) -> Outcome {
        if self.dispatched > 0 {
            Outcome::Dispatched
        } else if self.matched == 0 {
            Outcome::ZeroFeaturesMatched
        } else {
            Outcome::NoHandlerResolved
        }
    }
}

/// The collaborators one dispatch reads from.
#[derive(Clone, Copy)]
pub struct DispatchEnv<'a> {
    /// Active layer and visibility.
    pub layers: &'a dyn LayerProvider,
    /// Feature source.
    pub store: &'a dyn FeatureStore,
    /// The map canvas the click happened on.
    pub view: &'a MapView,
    /// Outer context scopes.
    pub scopes: &'a dyn ScopeProvider,
}

impl fmt::Debug for DispatchEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEnv")
            .field("view", self.view)
            .finish_non_exhaustive()
    }
}

/// Runs the action bound to each feature under a click.
///
/// The dispatcher keeps no per-click state, so one instance can serve
/// concurrent dispatches from several threads.
#[derive(Clone, Debug)]
pub struct FeatureActionDispatcher {
    registry: Arc<ActionRegistry>,
    config: DispatchConfig,
}

impl FeatureActionDispatcher {
    /// Creates a dispatcher with the default configuration.
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    /// Creates a dispatcher with an explicit configuration.
    pub fn with_config(registry: Arc<ActionRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// The configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The action registry consulted after layer defaults.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Handles a click at `device` (pixels) on the active layer.
    pub fn dispatch(
        &self,
        env: &DispatchEnv<'_>,
        device: Point,
    ) -> Result<DispatchReport, DispatchError> {
        let mut state = DispatchState::Idle;
        transition(&mut state, DispatchState::Validating);
        let layer = self.validate(env.layers)?;

        transition(&mut state, DispatchState::Transforming);
        let map_point = env.view.to_map_point(device);
        let radius = self.config.search_radius().to_map_units(env.view);
        let map_rect = MapViewport::search_rect(map_point, radius);
        let mut report = DispatchReport::new(map_point);

        match env.view.to_layer_rect(map_rect, layer.crs()) {
            Ok(rect) => {
                report.search_rect = Some(rect);
                transition(&mut state, DispatchState::Querying);
                let request = FeatureRequest::new()
                    .with_filter_rect(rect)
                    .with_flags(self.config.request_flags());
                let features = env.store.query(layer.id(), &request);
                transition(&mut state, DispatchState::Dispatching);
                for feature in features {
                    self.dispatch_feature(env, layer, map_point, &feature, &mut report);
                }
            }
            Err(err) => {
                log::debug!("{}: search region undefined, no features: {err}", layer.id());
                report.transform_undefined = Some(err);
                transition(&mut state, DispatchState::Dispatching);
            }
        }

        transition(&mut state, DispatchState::Done);
        log::debug!(
            "{}: {} matched, {} dispatched, {} unhandled, {} failed",
            layer.id(),
            report.matched,
            report.dispatched,
            report.unmatched.len(),
            report.failures.len()
        );
        if report.outcome() == Outcome::ZeroFeaturesMatched {
            log::info!("no features at map position {map_point:?}");
        }
        Ok(report)
    }

    fn validate<'a>(&self, layers: &'a dyn LayerProvider) -> Result<&'a dyn MapLayer, DispatchError> {
        let layer = layers.current_layer().ok_or(DispatchError::NoActiveLayer)?;
        if !layer.kind().is_feature_bearing() {
            return Err(DispatchError::WrongLayerType(layer.kind()));
        }
        if !layers.is_layer_visible(layer) {
            return Err(DispatchError::LayerHidden(layer.id()));
        }
        if !has_usable_actions(layer, &self.registry, self.config.scope()) {
            return Err(DispatchError::NoActionsConfigured(layer.id()));
        }
        Ok(layer)
    }

    fn dispatch_feature(
        &self,
        env: &DispatchEnv<'_>,
        layer: &dyn MapLayer,
        map_point: Point,
        feature: &Feature,
        report: &mut DispatchReport,
    ) {
        report.matched += 1;
        let scope = self.config.scope();
        let Some(resolved) = resolve(layer, &self.registry, scope) else {
            report.unmatched.push(feature.id());
            return;
        };
        let context = build_context(
            env.scopes.global_scope(),
            env.scopes.project_scope(),
            env.scopes.view_scope(env.view),
            map_point,
            scope,
        );
        report.dispatched += 1;
        if let Err(error) = resolved.handler().run(layer, feature, &context) {
            log::warn!(
                "action \"{}\" failed for feature {} of {}: {error}",
                resolved.name(),
                feature.id(),
                layer.id()
            );
            report.failures.push(HandlerFailure {
                feature: feature.id(),
                action: resolved.name().to_owned(),
                error,
            });
        }
    }
}

fn transition(state: &mut DispatchState, next: DispatchState) {
    log::trace!("dispatch {state} -> {next}");
    *state = next;
}
