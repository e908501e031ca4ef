// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers as the dispatcher sees them, and where the active one comes from.

use std::fmt;
use std::sync::Arc;

use canopy_crs::Crs;
use canopy_feature::LayerId;
use hashbrown::HashSet;

use crate::bindings::LayerActions;

/// What a layer holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Features with geometry and attributes.
    Vector,
    /// Gridded cell values.
    Raster,
    /// Rendered by an external plugin.
    Plugin,
    /// Unstructured mesh.
    Mesh,
}

impl LayerKind {
    /// Returns `true` if layers of this kind can be queried for features.
    pub fn is_feature_bearing(self) -> bool {
        matches!(self, Self::Vector)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vector => "vector",
            Self::Raster => "raster",
            Self::Plugin => "plugin",
            Self::Mesh => "mesh",
        })
    }
}

/// A layer shown on a map.
pub trait MapLayer: Send + Sync {
    /// Identifier, also used to query the feature store.
    fn id(&self) -> LayerId;

    /// Display name.
    fn name(&self) -> &str;

    /// What the layer holds.
    fn kind(&self) -> LayerKind;

    /// Coordinate system of the layer's data.
    fn crs(&self) -> Crs;

    /// The layer's own action bindings, if it supports them.
    fn as_action_bindable(&self) -> Option<&dyn ActionBindable> {
        None
    }
}

/// Capability of layers that carry their own scoped actions.
pub trait ActionBindable {
    /// The layer's action bindings.
    fn actions(&self) -> &LayerActions;
}

/// Source of the active layer and the view's layer visibility.
pub trait LayerProvider {
    /// The layer clicks should act on.
    fn current_layer(&self) -> Option<&dyn MapLayer>;

    /// Returns `true` if `layer` is part of what the view shows.
    fn is_layer_visible(&self, layer: &dyn MapLayer) -> bool;
}

/// A feature layer with its own action bindings.
#[derive(Debug)]
pub struct VectorLayer {
    id: LayerId,
    name: String,
    crs: Crs,
    actions: LayerActions,
}

impl VectorLayer {
    /// Creates a layer with no actions.
    pub fn new(id: LayerId, name: impl Into<String>, crs: Crs) -> Self {
        Self {
            id,
            name: name.into(),
            crs,
            actions: LayerActions::new(),
        }
    }

    /// Mutable access to the layer's bindings.
    pub fn actions_mut(&mut self) -> &mut LayerActions {
        &mut self.actions
    }
}

impl MapLayer for VectorLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Vector
    }

    fn crs(&self) -> Crs {
        self.crs
    }

    fn as_action_bindable(&self) -> Option<&dyn ActionBindable> {
        Some(self)
    }
}

impl ActionBindable for VectorLayer {
    fn actions(&self) -> &LayerActions {
        &self.actions
    }
}

/// The layers of one map view, which of them are visible, and which is active.
///
/// Layers are added visible.
#[derive(Default)]
pub struct MapLayers {
    layers: Vec<Arc<dyn MapLayer>>,
    hidden: HashSet<LayerId>,
    current: Option<LayerId>,
}

impl MapLayers {
    /// Creates an empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer, replacing any layer with the same id.
    pub fn add(&mut self, layer: Arc<dyn MapLayer>) {
        let id = layer.id();
        self.layers.retain(|l| l.id() != id);
        self.layers.push(layer);
    }

    /// Removes a layer. If it was active, no layer is active afterwards.
    pub fn remove(&mut self, id: LayerId) -> Option<Arc<dyn MapLayer>> {
        let pos = self.layers.iter().position(|l| l.id() == id)?;
        self.hidden.remove(&id);
        if self.current == Some(id) {
            self.current = None;
        }
        Some(self.layers.remove(pos))
    }

    /// Looks up a layer.
    pub fn get(&self, id: LayerId) -> Option<&Arc<dyn MapLayer>> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Makes a layer active. Unknown ids clear the selection.
    pub fn set_current(&mut self, id: Option<LayerId>) {
        self.current = id.filter(|id| self.get(*id).is_some());
    }

    /// Shows or hides a layer.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if visible {
            self.hidden.remove(&id);
        } else {
            self.hidden.insert(id);
        }
    }
}

impl LayerProvider for MapLayers {
    fn current_layer(&self) -> Option<&dyn MapLayer> {
        self.current
            .and_then(|id| self.get(id))
            .map(|l| l.as_ref())
    }

    fn is_layer_visible(&self, layer: &dyn MapLayer) -> bool {
        let id = layer.id();
        self.get(id).is_some() && !self.hidden.contains(&id)
    }
}

impl fmt::Debug for MapLayers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<LayerId> = self.layers.iter().map(|l| l.id()).collect();
        f.debug_struct("MapLayers")
            .field("layers", &ids)
            .field("hidden", &self.hidden)
            .field("current", &self.current)
            .finish()
    }
}
