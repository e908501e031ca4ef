// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer handling and user-facing messages of the feature action tool.

use std::sync::Arc;

use canopy_action::{
    ActionRegistry, DispatchConfig, DispatchEnv, FeatureActionDispatcher, FeatureActionTool,
    FnAction, HandlerError, MapLayers, MapView, MessageLevel, NO_FEATURES_MESSAGE, SearchRadius,
    StaticScopes, StatusMessage, VectorLayer,
};
use canopy_crs::Crs;
use canopy_feature::{Feature, FeatureId, LayerId, MemoryFeatureStore};
use canopy_precise_hit::Polygon;
use canopy_view2d::MapViewport;
use kurbo::{Point, Rect};

const LAYER: LayerId = LayerId(3);

struct Canvas {
    layers: MapLayers,
    store: MemoryFeatureStore,
    view: MapView,
    scopes: StaticScopes,
}

impl Canvas {
    fn new(layer: VectorLayer) -> Self {
        let mut layers = MapLayers::new();
        layers.add(Arc::new(layer));
        layers.set_current(Some(LAYER));
        let mut store = MemoryFeatureStore::new();
        store.insert(
            LAYER,
            Feature::new(FeatureId(1))
                .with_geometry(Polygon::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0))),
        );
        let vp = MapViewport::new(Rect::new(0.0, 0.0, 200.0, 200.0));
        Self {
            layers,
            store,
            view: MapView::new(vp, Crs::Local),
            scopes: StaticScopes::default(),
        }
    }

    fn env(&self) -> DispatchEnv<'_> {
        DispatchEnv {
            layers: &self.layers,
            store: &self.store,
            view: &self.view,
            scopes: &self.scopes,
        }
    }

    fn device(&self, x: f64, y: f64) -> Point {
        self.view.viewport().map_to_device_point(Point::new(x, y))
    }
}

fn layer_with(result: Result<(), &'static str>) -> VectorLayer {
    let mut layer = VectorLayer::new(LAYER, "parcels", Crs::Local);
    let id = layer.actions_mut().add_action(
        "open",
        ["Canvas"],
        FnAction::new(move |_, _, _| result.map_err(HandlerError::new)),
    );
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    layer
}

fn tool() -> FeatureActionTool {
    FeatureActionTool::new(FeatureActionDispatcher::with_config(
        Arc::new(ActionRegistry::new()),
        DispatchConfig::new().with_search_radius(SearchRadius::Pixels(1.0)),
    ))
}

#[test]
fn inactive_tool_ignores_release() {
    let canvas = Canvas::new(layer_with(Ok(())));
    let mut tool = tool();
    let mut sink = Vec::new();
    assert!(
        tool.pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink)
            .is_none()
    );

    tool.activate();
    assert!(tool.is_active());
    tool.pointer_press(canvas.device(5.0, 5.0));
    tool.pointer_move(canvas.device(6.0, 6.0));
    let report = tool
        .pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink)
        .unwrap();
    assert_eq!(report.dispatched, 1);
    assert!(sink.is_empty());

    tool.deactivate();
    assert!(!tool.is_active());
}

#[test]
fn empty_click_shows_status_message() {
    let canvas = Canvas::new(layer_with(Ok(())));
    let mut tool = tool();
    tool.activate();
    let mut sink = Vec::new();
    tool.pointer_release(&canvas.env(), canvas.device(50.0, 50.0), &mut sink);
    assert_eq!(sink, vec![StatusMessage::Status(NO_FEATURES_MESSAGE.into())]);
}

#[test]
fn handler_failures_become_warnings() {
    let canvas = Canvas::new(layer_with(Err("form is locked")));
    let mut tool = tool();
    tool.activate();
    let mut sink = Vec::new();
    tool.pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink);
    assert_eq!(
        sink,
        vec![StatusMessage::Message(
            MessageLevel::Warning,
            "action \"open\" failed for feature 1: form is locked".into()
        )]
    );
}

#[test]
fn validation_failures_are_reported_except_hidden_layers() {
    let mut canvas = Canvas::new(VectorLayer::new(LAYER, "bare", Crs::Local));
    let mut tool = tool();
    tool.activate();

    let mut sink = Vec::new();
    tool.pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink);
    assert_eq!(
        sink,
        vec![StatusMessage::Message(
            MessageLevel::Info,
            "The active vector layer has no defined actions".into()
        )]
    );

    canvas.layers.set_visible(LAYER, false);
    let mut sink = Vec::new();
    assert!(
        tool.pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink)
            .is_none()
    );
    assert!(sink.is_empty());

    canvas.layers.set_current(None);
    tool.pointer_release(&canvas.env(), canvas.device(5.0, 5.0), &mut sink);
    assert_eq!(
        sink,
        vec![StatusMessage::Message(
            MessageLevel::Info,
            "To run an action, you must choose an active vector layer.".into()
        )]
    );
}
