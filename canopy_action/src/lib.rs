// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Action: run the action bound to the features under a map click.
//!
//! ## Overview
//!
//! A click on a map canvas becomes a list of handler invocations:
//!
//! 1. Validate: there is an active, visible, feature-bearing layer that offers
//!    at least one action.
//! 2. Transform: the click becomes a map point and a square search region of
//!    the configured [`SearchRadius`], which is projected into the layer's
//!    coordinate system. If that projection is undefined the dispatch goes on
//!    with no features.
//! 3. Query: the [`FeatureStore`](canopy_feature::FeatureStore) returns the
//!    features whose geometry intersects the region.
//! 4. Dispatch: for every feature, [`resolve`] picks the layer's default
//!    action for the scope or else the registry's default for the layer, and
//!    [`build_context`] stacks global, project, view and click variables for
//!    that single call.
//!
//! [`FeatureActionDispatcher`] runs these steps and returns a
//! [`DispatchReport`]. [`FeatureActionTool`] wraps it for pointer events and
//! turns outcomes into user-facing messages.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use canopy_action::{
//!     ActionRegistry, DispatchEnv, FeatureActionDispatcher, FnAction, MapLayers, MapView,
//!     Outcome, SearchRadius, DispatchConfig, StaticScopes, VectorLayer,
//! };
//! use canopy_crs::Crs;
//! use canopy_feature::{Feature, FeatureId, LayerId, MemoryFeatureStore};
//! use canopy_precise_hit::Polygon;
//! use canopy_view2d::MapViewport;
//! use kurbo::{Point, Rect};
//!
//! // One parcel covering [0, 0]-[10, 10].
//! let id = LayerId(1);
//! let mut store = MemoryFeatureStore::new();
//! store.insert(
//!     id,
//!     Feature::new(FeatureId(1)).with_geometry(Polygon::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0))),
//! );
//!
//! // The layer's default canvas action records the clicked map x coordinate.
//! let clicks = Arc::new(Mutex::new(Vec::new()));
//! let seen = Arc::clone(&clicks);
//! let mut parcels = VectorLayer::new(id, "parcels", Crs::Local);
//! let open = parcels.actions_mut().add_action(
//!     "open",
//!     ["Canvas"],
//!     FnAction::new(move |_, _, ctx| {
//!         seen.lock().unwrap().push(ctx.variable("click_x").cloned());
//!         Ok(())
//!     }),
//! );
//! parcels.actions_mut().set_default_action("Canvas", open).unwrap();
//!
//! let mut layers = MapLayers::new();
//! layers.add(Arc::new(parcels));
//! layers.set_current(Some(id));
//!
//! // A 100x100 pixel canvas showing [0, 0]-[10, 10].
//! let mut viewport = MapViewport::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! viewport.fit_extent(Rect::new(0.0, 0.0, 10.0, 10.0));
//! let view = MapView::new(viewport, Crs::Local);
//!
//! let dispatcher = FeatureActionDispatcher::with_config(
//!     Arc::new(ActionRegistry::new()),
//!     DispatchConfig::new().with_search_radius(SearchRadius::MapUnits(0.0)),
//! );
//! let scopes = StaticScopes::default();
//! let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };
//!
//! // The canvas center is map point (5, 5).
//! let report = dispatcher.dispatch(&env, Point::new(50.0, 50.0)).unwrap();
//! assert_eq!(report.outcome(), Outcome::Dispatched);
//! assert_eq!(clicks.lock().unwrap().len(), 1);
//! ```
//!
//! ## Design notes
//!
//! - Nothing is global: the registry, layers, store, and scopes are passed in.
//! - Every handler call gets a fresh [`EvaluationContext`].
//! - Handler failures are collected in the report; they never stop the
//!   remaining features.

mod bindings;
mod command;
mod config;
mod context;
mod dispatcher;
mod error;
mod handler;
mod layer;
mod registry;
mod resolve;
mod tool;
mod view;

pub use bindings::{Action, ActionId, LayerActions};
pub use command::CommandAction;
pub use config::{CANVAS_SCOPE, DispatchConfig, SearchRadius};
pub use context::{
    ACTION_SCOPE, CLICK_X, CLICK_Y, EvaluationContext, Scope, ScopeProvider, StaticScopes,
    build_context,
};
pub use dispatcher::{DispatchEnv, DispatchReport, FeatureActionDispatcher, Outcome};
pub use error::{BindingError, DispatchError, HandlerError, HandlerFailure};
pub use handler::{ActionHandler, FnAction};
pub use layer::{ActionBindable, LayerKind, LayerProvider, MapLayer, MapLayers, VectorLayer};
pub use registry::{ActionRegistry, LayerTargets, RegistryAction, RegistryActionId};
pub use resolve::{Resolved, has_usable_actions, resolve};
pub use tool::{FeatureActionTool, MessageLevel, NO_FEATURES_MESSAGE, StatusMessage, StatusSink};
pub use view::{DEFAULT_OUTPUT_DPI, MapView};
