// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature actions on a Web Mercator canvas.
//!
//! Two geographic layers are shown on a Web Mercator map. Clicking a parcel
//! runs the parcel layer's own default action; clicking a road falls back to
//! an action from the shared registry. Each action is a command template that
//! is printed instead of executed.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p canopy_demos`

use std::error::Error;
use std::sync::Arc;

use canopy_action::{
    ActionRegistry, CommandAction, DispatchConfig, DispatchEnv, FeatureActionDispatcher,
    FeatureActionTool, HandlerError, LayerKind, LayerTargets, MapLayers, MapView, MessageLevel,
    Scope, SearchRadius, StaticScopes, StatusSink, VectorLayer,
};
use canopy_crs::Crs;
use canopy_feature::{Feature, FeatureId, LayerId, MemoryFeatureStore};
use canopy_precise_hit::{LineString, Polygon};
use canopy_view2d::MapViewport;
use kurbo::{Point, Rect};

const PARCELS: LayerId = LayerId(1);
const ROADS: LayerId = LayerId(2);

struct Console;

impl StatusSink for Console {
    fn message(&mut self, level: MessageLevel, text: &str) {
        println!("[{level:?}] {text}");
    }

    fn status(&mut self, text: &str) {
        println!("[status] {text}");
    }
}

fn print_command(command: &str) -> Result<(), HandlerError> {
    println!("  would run: {command}");
    Ok(())
}

fn parcel(id: u64, lon: f64, lat: f64, owner: &str) -> Feature {
    let cell = Rect::new(lon, lat, lon + 0.002, lat + 0.001);
    Feature::new(FeatureId(id))
        .with_geometry(Polygon::from_rect(cell))
        .with_attribute("owner", owner)
        .with_attribute("area_m2", 9_400.0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut store = MemoryFeatureStore::with_grid(0.001);
    store.insert(PARCELS, parcel(1, 13.400, 52.500, "Schmidt"));
    store.insert(PARCELS, parcel(2, 13.402, 52.500, "Weber"));
    store.insert(PARCELS, parcel(3, 13.404, 52.500, "Becker"));
    store.insert(
        ROADS,
        Feature::new(FeatureId(10))
            .with_geometry(LineString::new([(13.400, 52.5015), (13.406, 52.5015)]))
            .with_attribute("name", "Parkallee"),
    );

    let mut parcels = VectorLayer::new(PARCELS, "parcels", Crs::Geographic);
    let open = parcels.actions_mut().add_action(
        "Open cadastre",
        ["Canvas"],
        CommandAction::new(
            "xdg-open https://cadastre.example/parcel/[% $id %]?owner=[% owner %]",
            print_command,
        ),
    );
    parcels.actions_mut().set_default_action("Canvas", open)?;
    let roads = VectorLayer::new(ROADS, "roads", Crs::Geographic);

    let mut registry = ActionRegistry::new();
    let report = registry.add_action(
        "Report an issue",
        LayerTargets::Kinds(vec![LayerKind::Vector]),
        CommandAction::new(
            "mail roads@city.example -s \"[% \"name\" %] near [% @click_x %], [% @click_y %]\"",
            print_command,
        ),
    );
    registry.set_default_action_for_layer(&roads, report)?;

    let mut layers = MapLayers::new();
    layers.add(Arc::new(parcels));
    layers.add(Arc::new(roads));

    let mercator = Crs::WebMercator;
    let sw = mercator.from_geographic(Point::new(13.399, 52.499))?;
    let ne = mercator.from_geographic(Point::new(13.407, 52.502))?;
    let mut viewport = MapViewport::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    viewport.fit_extent(Rect::from_points(sw, ne));
    let view = MapView::new(viewport, mercator).with_map_id("demo");

    let scopes = StaticScopes::new(
        Scope::new("Global").with_variable("user_account_name", "demo"),
        Scope::new("Project").with_variable("project_title", "Cadastre"),
    );
    let dispatcher = FeatureActionDispatcher::with_config(
        Arc::new(registry),
        DispatchConfig::new().with_search_radius(SearchRadius::Pixels(3.0)),
    );
    let mut tool = FeatureActionTool::new(dispatcher);
    tool.activate();

    let clicks = [
        (PARCELS, Point::new(13.4030, 52.5005)),
        (ROADS, Point::new(13.4030, 52.5015)),
        (PARCELS, Point::new(13.4060, 52.5019)),
    ];
    let mut console = Console;
    for (layer, geo) in clicks {
        layers.set_current(Some(layer));
        let device = view.viewport().map_to_device_point(mercator.from_geographic(geo)?);
        println!("click on {layer} at {geo:?} (device {device:?})");
        let env = DispatchEnv {
            layers: &layers,
            store: &store,
            view: &view,
            scopes: &scopes,
        };
        tool.pointer_press(device);
        if let Some(report) = tool.pointer_release(&env, device, &mut console) {
            log::info!(
                "{} matched, {} dispatched",
                report.matched,
                report.dispatched
            );
        }
    }

    layers.set_visible(PARCELS, false);
    layers.set_current(Some(PARCELS));
    println!("hidden layers are skipped without a message");
    let env = DispatchEnv {
        layers: &layers,
        store: &store,
        view: &view,
        scopes: &scopes,
    };
    tool.pointer_release(&env, Point::new(400.0, 300.0), &mut console);

    Ok(())
}
