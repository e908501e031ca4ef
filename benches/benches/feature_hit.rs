// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use canopy_action::{
    ActionRegistry, DispatchConfig, DispatchEnv, FeatureActionDispatcher, FnAction, MapLayers,
    MapView, SearchRadius, StaticScopes, VectorLayer,
};
use canopy_crs::Crs;
use canopy_feature::{
    Feature, FeatureId, FeatureRequest, FeatureStore, LayerId, MemoryFeatureStore, RequestFlags,
};
use canopy_precise_hit::{Polygon, Ring};
use canopy_view2d::MapViewport;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

const LAYER: LayerId = LayerId(1);

/// Diamond-shaped lots on a grid; a lot's bounding box covers twice its area,
/// so bbox-only hits disagree with exact ones near the corners.
fn diamond_lots(store: &mut MemoryFeatureStore, n: usize, lot: f64) {
    let half = lot / 2.0;
    for y in 0..n {
        for x in 0..n {
            let c = Point::new(x as f64 * lot + half, y as f64 * lot + half);
            let ring = Ring::new([
                (c.x, c.y - half),
                (c.x + half, c.y),
                (c.x, c.y + half),
                (c.x - half, c.y),
            ]);
            let id = FeatureId((y * n + x) as u64);
            store.insert(LAYER, Feature::new(id).with_geometry(Polygon::new(ring)));
        }
    }
}

fn clicks(n: usize, lot: f64) -> Vec<Point> {
    let extent = n as f64 * lot;
    (0..256)
        .map(|i| {
            let t = i as f64 / 256.0;
            Point::new((t * 7.3).fract() * extent, (t * 3.1).fract() * extent)
        })
        .collect()
}

fn store_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_query");
    for &n in &[32usize, 128] {
        let mut store = MemoryFeatureStore::with_grid(20.0);
        diamond_lots(&mut store, n, 20.0);
        let points = clicks(n, 20.0);
        group.throughput(Throughput::Elements(points.len() as u64));
        for (label, flags) in [
            ("exact", RequestFlags::EXACT_INTERSECT),
            ("bbox", RequestFlags::empty()),
        ] {
            group.bench_function(BenchmarkId::new(label, n), |b| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for p in &points {
                        let request = FeatureRequest::new()
                            .with_filter_rect(Rect::from_center_size(*p, (2.0, 2.0)))
                            .with_flags(flags);
                        hits += store.query(LAYER, &request).count();
                    }
                    black_box(hits)
                });
            });
        }
    }
    group.finish();
}

fn dispatch_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_click");
    for &n in &[32usize, 128] {
        let mut store = MemoryFeatureStore::with_grid(20.0);
        diamond_lots(&mut store, n, 20.0);

        let mut layer = VectorLayer::new(LAYER, "lots", Crs::Local);
        let id = layer.actions_mut().add_action(
            "noop",
            ["Canvas"],
            FnAction::new(|_, feature, ctx| {
                black_box((feature.id(), ctx.scopes().len()));
                Ok(())
            }),
        );
        layer
            .actions_mut()
            .set_default_action("Canvas", id)
            .expect("action was just added");
        let mut layers = MapLayers::new();
        layers.add(Arc::new(layer));
        layers.set_current(Some(LAYER));

        let extent = n as f64 * 20.0;
        let mut viewport = MapViewport::new(Rect::new(0.0, 0.0, 1024.0, 768.0));
        viewport.fit_extent(Rect::new(0.0, 0.0, extent, extent));
        let view = MapView::new(viewport, Crs::Local);
        let scopes = StaticScopes::default();
        let env = DispatchEnv {
            layers: &layers,
            store: &store,
            view: &view,
            scopes: &scopes,
        };
        let dispatcher = FeatureActionDispatcher::with_config(
            Arc::new(ActionRegistry::new()),
            DispatchConfig::new().with_search_radius(SearchRadius::Pixels(4.0)),
        );
        let devices: Vec<Point> = clicks(n, 20.0)
            .into_iter()
            .map(|p| view.viewport().map_to_device_point(p))
            .collect();

        group.throughput(Throughput::Elements(devices.len() as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                let mut dispatched = 0usize;
                for d in &devices {
                    if let Ok(report) = dispatcher.dispatch(&env, *d) {
                        dispatched += report.dispatched;
                    }
                }
                black_box(dispatched)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, store_query, dispatch_click);
criterion_main!(benches);
