// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end click dispatch against an in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use canopy_action::{
    ACTION_SCOPE, ActionHandler, ActionRegistry, CLICK_X, CLICK_Y, DispatchConfig, DispatchEnv,
    DispatchError, EvaluationContext, FeatureActionDispatcher, FnAction, HandlerError,
    LayerKind, LayerTargets, MapLayer, MapLayers, MapView, Outcome, Scope, SearchRadius,
    StaticScopes, VectorLayer,
};
use canopy_crs::{AUTHALIC_SPHERE_RADIUS, Crs, UndefinedReason};
use canopy_feature::{Feature, FeatureId, LayerId, MemoryFeatureStore, Value};
use canopy_precise_hit::Polygon;
use canopy_view2d::MapViewport;
use kurbo::{Point, Rect};

const PARCELS: LayerId = LayerId(1);

type Calls = Arc<Mutex<Vec<(FeatureId, EvaluationContext)>>>;

fn recorder(calls: Calls) -> impl ActionHandler {
    FnAction::new(move |_, feature, ctx| {
        calls.lock().unwrap().push((feature.id(), ctx.clone()));
        Ok(())
    })
}

fn square(id: u64, x0: f64, y0: f64, x1: f64, y1: f64) -> Feature {
    Feature::new(FeatureId(id)).with_geometry(Polygon::from_rect(Rect::new(x0, y0, x1, y1)))
}

/// Canvas of 200x200 pixels at one map unit per pixel, centered on the origin.
fn local_view() -> MapView {
    let vp = MapViewport::new(Rect::new(0.0, 0.0, 200.0, 200.0)).with_center(Point::ORIGIN);
    MapView::new(vp, Crs::Local)
}

fn device_at(view: &MapView, map: Point) -> Point {
    view.viewport().map_to_device_point(map)
}

fn single_layer(layer: VectorLayer) -> MapLayers {
    let id = layer.id();
    let mut layers = MapLayers::new();
    layers.add(Arc::new(layer));
    layers.set_current(Some(id));
    layers
}

fn parcels_with_default(calls: &Calls) -> VectorLayer {
    let mut layer = VectorLayer::new(PARCELS, "parcels", Crs::Local);
    let id = layer
        .actions_mut()
        .add_action("open", ["Canvas"], recorder(Arc::clone(calls)));
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    layer
}

fn dispatcher(radius: f64) -> FeatureActionDispatcher {
    FeatureActionDispatcher::with_config(
        Arc::new(ActionRegistry::new()),
        DispatchConfig::new().with_search_radius(SearchRadius::MapUnits(radius)),
    )
}

#[test]
fn click_inside_polygon_runs_default_with_click_variables() {
    let calls = Calls::default();
    let layers = single_layer(parcels_with_default(&calls));
    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, 0.0, 0.0, 10.0, 10.0));
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = dispatcher(0.0)
        .dispatch(&env, device_at(&view, Point::new(5.0, 5.0)))
        .unwrap();

    assert_eq!(report.outcome(), Outcome::Dispatched);
    assert_eq!((report.matched, report.dispatched), (1, 1));
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (feature, ctx) = &calls[0];
    assert_eq!(*feature, FeatureId(1));
    assert_eq!(ctx.variable(CLICK_X), Some(&Value::Double(5.0)));
    assert_eq!(ctx.variable(CLICK_Y), Some(&Value::Double(5.0)));
    assert_eq!(ctx.variable(ACTION_SCOPE), Some(&Value::from("Canvas")));
    // The view scope sits below the click scope.
    assert!(ctx.variable("map_units_per_pixel").is_some());
}

#[test]
fn click_far_from_features_matches_nothing() {
    let calls = Calls::default();
    let layers = single_layer(parcels_with_default(&calls));
    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, 0.0, 0.0, 10.0, 10.0));
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = dispatcher(1.0)
        .dispatch(&env, device_at(&view, Point::new(100.0, 100.0)))
        .unwrap();

    assert_eq!(report.outcome(), Outcome::ZeroFeaturesMatched);
    assert_eq!(report.search_rect, Some(Rect::new(99.0, 99.0, 101.0, 101.0)));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn undefined_transform_degrades_to_zero_matches() {
    let calls = Calls::default();
    let mut layer = VectorLayer::new(PARCELS, "world", Crs::Geographic);
    let id = layer
        .actions_mut()
        .add_action("open", ["Canvas"], recorder(Arc::clone(&calls)));
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    let layers = single_layer(layer);

    // A feature covering the whole globe: only a missing search region can miss it.
    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, -180.0, -90.0, 180.0, 90.0));

    // An equal-area map whose center is past the edge of the projected globe.
    let off_globe = Point::new(2.0 * AUTHALIC_SPHERE_RADIUS + 1_000_000.0, 0.0);
    let vp = MapViewport::new(Rect::new(0.0, 0.0, 200.0, 200.0))
        .with_center(off_globe)
        .with_map_units_per_pixel(1_000.0);
    let view = MapView::new(vp, Crs::US_NATIONAL_ATLAS);
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = FeatureActionDispatcher::new(Arc::new(ActionRegistry::new()))
        .dispatch(&env, Point::new(100.0, 100.0))
        .unwrap();

    assert_eq!(report.outcome(), Outcome::ZeroFeaturesMatched);
    assert!(report.search_rect.is_none());
    assert_eq!(
        report.transform_undefined.map(|e| e.reason),
        Some(UndefinedReason::OutsideProjectionDomain)
    );
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn projected_click_reaches_geographic_layer() {
    let calls = Calls::default();
    let mut layer = VectorLayer::new(PARCELS, "counties", Crs::Geographic);
    let id = layer
        .actions_mut()
        .add_action("open", ["Canvas"], recorder(Arc::clone(&calls)));
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    let layers = single_layer(layer);

    let mut store = MemoryFeatureStore::with_grid(1.0);
    store.insert(PARCELS, square(7, -101.0, 44.0, -99.0, 46.0));
    store.insert(PARCELS, square(8, -91.0, 44.0, -89.0, 46.0));

    // The map is centered on the projection center, 100 W 45 N.
    let vp = MapViewport::new(Rect::new(0.0, 0.0, 200.0, 200.0)).with_map_units_per_pixel(500.0);
    let view = MapView::new(vp, Crs::US_NATIONAL_ATLAS);
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = FeatureActionDispatcher::new(Arc::new(ActionRegistry::new()))
        .dispatch(&env, Point::new(100.0, 100.0))
        .unwrap();

    assert_eq!(report.outcome(), Outcome::Dispatched);
    let rect = report.search_rect.unwrap();
    assert!(rect.contains(Point::new(-100.0, 45.0)));
    let calls = calls.lock().unwrap();
    let ids: Vec<_> = calls.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![FeatureId(7)]);
    // Click variables are map coordinates, not layer coordinates.
    assert_eq!(calls[0].1.variable(CLICK_X), Some(&Value::Double(0.0)));
}

#[test]
fn registry_fallback_runs_once_when_layer_has_no_default() {
    let calls = Calls::default();
    let layer = VectorLayer::new(PARCELS, "parcels", Crs::Local);
    let mut registry = ActionRegistry::new();
    let identify = registry.add_action(
        "identify",
        LayerTargets::Kinds(vec![LayerKind::Vector]),
        recorder(Arc::clone(&calls)),
    );
    registry.set_default_action_for_layer(&layer, identify).unwrap();
    let layers = single_layer(layer);

    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, 0.0, 0.0, 10.0, 10.0));
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = FeatureActionDispatcher::with_config(
        Arc::new(registry),
        DispatchConfig::new().with_search_radius(SearchRadius::MapUnits(0.0)),
    )
    .dispatch(&env, device_at(&view, Point::new(5.0, 5.0)))
    .unwrap();

    assert_eq!(report.dispatched, 1);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn scoped_default_is_always_preferred_over_registry() {
    let layer_calls = Calls::default();
    let registry_calls = Calls::default();
    let layer = parcels_with_default(&layer_calls);
    let mut registry = ActionRegistry::new();
    let shared = registry.add_action("identify", LayerTargets::All, recorder(Arc::clone(&registry_calls)));
    registry.set_default_action_for_layer(&layer, shared).unwrap();
    let layers = single_layer(layer);

    let mut store = MemoryFeatureStore::new();
    for i in 0..5 {
        store.insert(PARCELS, square(i, 0.0, 0.0, 10.0, 10.0));
    }
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };
    let dispatcher = FeatureActionDispatcher::new(Arc::new(registry));

    for _ in 0..3 {
        dispatcher
            .dispatch(&env, device_at(&view, Point::new(5.0, 5.0)))
            .unwrap();
    }
    assert_eq!(layer_calls.lock().unwrap().len(), 15);
    assert!(registry_calls.lock().unwrap().is_empty());
}

#[test]
fn click_variables_shadow_project_variables() {
    let calls = Calls::default();
    let layers = single_layer(parcels_with_default(&calls));
    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, 0.0, 0.0, 10.0, 10.0));
    let view = local_view();
    let scopes = StaticScopes::new(
        Scope::new("Global").with_variable(ACTION_SCOPE, "global"),
        Scope::new("Project")
            .with_variable(CLICK_X, -1.0)
            .with_variable("project_title", "Parks"),
    );
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    dispatcher(0.0)
        .dispatch(&env, device_at(&view, Point::new(3.0, 4.0)))
        .unwrap();

    let calls = calls.lock().unwrap();
    let ctx = &calls[0].1;
    assert_eq!(ctx.variable(CLICK_X), Some(&Value::Double(3.0)));
    assert_eq!(ctx.variable(ACTION_SCOPE), Some(&Value::from("Canvas")));
    assert_eq!(ctx.variable("project_title"), Some(&Value::from("Parks")));
}

#[test]
fn failing_handler_does_not_stop_other_features() {
    let ran = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&ran);
    let mut layer = VectorLayer::new(PARCELS, "parcels", Crs::Local);
    let id = layer.actions_mut().add_action(
        "flaky",
        ["Canvas"],
        FnAction::new(move |_, feature, _| {
            seen.lock().unwrap().push(feature.id());
            if feature.id() == FeatureId(2) {
                Err(HandlerError::new("cannot open"))
            } else {
                Ok(())
            }
        }),
    );
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    let layers = single_layer(layer);

    let mut store = MemoryFeatureStore::new();
    for i in 1..=3 {
        store.insert(PARCELS, square(i, 0.0, 0.0, 10.0, 10.0));
    }
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = dispatcher(0.5)
        .dispatch(&env, device_at(&view, Point::new(5.0, 5.0)))
        .unwrap();

    assert_eq!(*ran.lock().unwrap(), vec![FeatureId(1), FeatureId(2), FeatureId(3)]);
    assert_eq!(report.dispatched, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].feature, FeatureId(2));
    assert_eq!(report.failures[0].action, "flaky");
    assert_eq!(report.outcome(), Outcome::Dispatched);
}

#[test]
fn features_without_a_resolvable_handler_are_unmatched() {
    let mut layer = VectorLayer::new(PARCELS, "parcels", Crs::Local);
    // Offered in the canvas scope but not the default.
    layer
        .actions_mut()
        .add_action("open", ["Canvas"], FnAction::new(|_, _, _| Ok(())));
    let layers = single_layer(layer);
    let mut store = MemoryFeatureStore::new();
    store.insert(PARCELS, square(1, 0.0, 0.0, 10.0, 10.0));
    let view = local_view();
    let scopes = StaticScopes::default();
    let env = DispatchEnv { layers: &layers, store: &store, view: &view, scopes: &scopes };

    let report = dispatcher(0.0)
        .dispatch(&env, device_at(&view, Point::new(5.0, 5.0)))
        .unwrap();

    assert_eq!(report.outcome(), Outcome::NoHandlerResolved);
    assert_eq!(report.unmatched, vec![FeatureId(1)]);
}

struct Imagery;

impl MapLayer for Imagery {
    fn id(&self) -> LayerId {
        LayerId(9)
    }
    fn name(&self) -> &str {
        "imagery"
    }
    fn kind(&self) -> LayerKind {
        LayerKind::Raster
    }
    fn crs(&self) -> Crs {
        Crs::Local
    }
}

#[test]
fn validation_failures_stop_before_querying() {
    let store = MemoryFeatureStore::new();
    let view = local_view();
    let scopes = StaticScopes::default();
    let click = Point::new(100.0, 100.0);
    let d = dispatcher(1.0);

    let none = MapLayers::new();
    let env = DispatchEnv { layers: &none, store: &store, view: &view, scopes: &scopes };
    assert_eq!(d.dispatch(&env, click).unwrap_err(), DispatchError::NoActiveLayer);

    let mut raster = MapLayers::new();
    raster.add(Arc::new(Imagery));
    raster.set_current(Some(LayerId(9)));
    let env = DispatchEnv { layers: &raster, store: &store, view: &view, scopes: &scopes };
    assert_eq!(
        d.dispatch(&env, click).unwrap_err(),
        DispatchError::WrongLayerType(LayerKind::Raster)
    );

    let calls = Calls::default();
    let mut hidden = single_layer(parcels_with_default(&calls));
    hidden.set_visible(PARCELS, false);
    let env = DispatchEnv { layers: &hidden, store: &store, view: &view, scopes: &scopes };
    let err = d.dispatch(&env, click).unwrap_err();
    assert_eq!(err, DispatchError::LayerHidden(PARCELS));
    assert!(err.is_silent());

    let bare = single_layer(VectorLayer::new(PARCELS, "bare", Crs::Local));
    let env = DispatchEnv { layers: &bare, store: &store, view: &view, scopes: &scopes };
    assert_eq!(
        d.dispatch(&env, click).unwrap_err(),
        DispatchError::NoActionsConfigured(PARCELS)
    );
}

#[test]
fn concurrent_dispatches_use_independent_contexts() {
    let mismatches = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let (bad, count) = (Arc::clone(&mismatches), Arc::clone(&total));

    let mut layer = VectorLayer::new(PARCELS, "grid", Crs::Local);
    let id = layer.actions_mut().add_action(
        "check",
        ["Canvas"],
        FnAction::new(move |_, feature, ctx| {
            // Feature n covers [n, n + 1) on both axes; the click must be inside it.
            let x = ctx.variable(CLICK_X).and_then(Value::as_f64).unwrap_or(f64::NAN);
            #[allow(clippy::cast_precision_loss, reason = "small test ids")]
            let n = feature.id().0 as f64;
            if !(n..=n + 1.0).contains(&x) {
                bad.fetch_add(1, Ordering::Relaxed);
            }
            count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }),
    );
    layer.actions_mut().set_default_action("Canvas", id).unwrap();
    let layers = single_layer(layer);

    let mut store = MemoryFeatureStore::with_grid(4.0);
    for n in 0..40_u32 {
        let v = f64::from(n) * 2.0;
        store.insert(PARCELS, square(u64::from(n) * 2, v, v, v + 1.0, v + 1.0));
    }
    let view = local_view();
    let scopes = StaticScopes::default();
    let d = dispatcher(0.0);

    std::thread::scope(|s| {
        for t in 0..4_u32 {
            let (layers, store, view, scopes, d) = (&layers, &store, &view, &scopes, &d);
            s.spawn(move || {
                let env = DispatchEnv { layers, store, view, scopes };
                for k in 0..20_u32 {
                    let n = f64::from((k * 4 + t) % 40) * 2.0;
                    let click = device_at(view, Point::new(n + 0.5, n + 0.5));
                    let report = d.dispatch(&env, click).unwrap();
                    assert_eq!(report.dispatched, 1);
                }
            });
        }
    });

    assert_eq!(total.load(Ordering::Relaxed), 80);
    assert_eq!(mismatches.load(Ordering::Relaxed), 0);
}
