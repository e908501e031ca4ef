// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory feature store over a [`canopy_index`] spatial index.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use canopy_index::backends::GridF64;
use canopy_index::{Aabb2D, Index, IndexGeneric, Key};
use canopy_precise_hit::RectIntersect;
use hashbrown::HashMap;
use kurbo::Rect;

use crate::feature::{Feature, FeatureId};
use crate::request::{FeatureRequest, RequestFlags};
use crate::store::{FeatureIter, FeatureStore, LayerId};

/// Which index backend new layers use.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Backing {
    Flat,
    Grid(f64),
}

enum LayerIndex {
    Flat(Index<f64, FeatureId>),
    Grid(IndexGeneric<f64, FeatureId, GridF64>),
}

impl LayerIndex {
    fn new(backing: Backing) -> Self {
        match backing {
            Backing::Flat => Self::Flat(Index::new()),
            Backing::Grid(cell) => Self::Grid(IndexGeneric::with_grid(cell)),
        }
    }

    fn insert(&mut self, aabb: Aabb2D<f64>, id: FeatureId) -> Key {
        match self {
            Self::Flat(i) => i.insert(aabb, id),
            Self::Grid(i) => i.insert(aabb, id),
        }
    }

    fn remove(&mut self, key: Key) {
        match self {
            Self::Flat(i) => {
                i.remove(key);
            }
            Self::Grid(i) => {
                i.remove(key);
            }
        }
    }

    fn candidates(&self, aabb: Aabb2D<f64>) -> Vec<FeatureId> {
        let mut out = Vec::new();
        match self {
            Self::Flat(i) => i.visit_rect(aabb, |_, id| out.push(*id)),
            Self::Grid(i) => i.visit_rect(aabb, |_, id| out.push(*id)),
        }
        out
    }
}

struct LayerFeatures {
    features: BTreeMap<FeatureId, (Feature, Option<Key>)>,
    index: LayerIndex,
}

impl LayerFeatures {
    fn new(backing: Backing) -> Self {
        Self {
            features: BTreeMap::new(),
            index: LayerIndex::new(backing),
        }
    }
}

fn to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::from_corners(r.x0, r.y0, r.x1, r.y1)
}

/// Owned features for any number of layers, each with its own spatial index.
///
/// Queries with a filter rectangle first collect index candidates by bounding
/// box, then test each candidate lazily as the returned iterator advances.
/// Results come in ascending [`FeatureId`] order.
pub struct MemoryFeatureStore {
    layers: HashMap<LayerId, LayerFeatures>,
    backing: Backing,
}

impl Default for MemoryFeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFeatureStore {
    /// Creates a store whose layers use a flat (linear scan) index.
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            backing: Backing::Flat,
        }
    }

    /// Creates a store whose layers use a uniform grid index with the given
    /// cell size, in layer units.
    pub fn with_grid(cell: f64) -> Self {
        Self {
            layers: HashMap::new(),
            backing: Backing::Grid(cell),
        }
    }

    /// Adds or replaces a feature, returning the feature it replaced.
    pub fn insert(&mut self, layer: LayerId, feature: Feature) -> Option<Feature> {
        let backing = self.backing;
        let entry = self
            .layers
            .entry(layer)
            .or_insert_with(|| LayerFeatures::new(backing));
        let id = feature.id();
        let key = feature
            .geometry()
            .and_then(|g| g.bounding_box())
            .map(|b| entry.index.insert(to_aabb(b), id));
        let old = entry.features.insert(id, (feature, key));
        old.map(|(old, old_key)| {
            if let Some(k) = old_key {
                entry.index.remove(k);
            }
            old
        })
    }

    /// Removes a feature.
    pub fn remove(&mut self, layer: LayerId, id: FeatureId) -> Option<Feature> {
        let entry = self.layers.get_mut(&layer)?;
        let (feature, key) = entry.features.remove(&id)?;
        if let Some(k) = key {
            entry.index.remove(k);
        }
        Some(feature)
    }

    /// Looks up one feature.
    pub fn feature(&self, layer: LayerId, id: FeatureId) -> Option<&Feature> {
        self.layers
            .get(&layer)
            .and_then(|l| l.features.get(&id))
            .map(|(f, _)| f)
    }

    /// Number of features in a layer.
    pub fn len(&self, layer: LayerId) -> usize {
        self.layers.get(&layer).map_or(0, |l| l.features.len())
    }

    /// Returns `true` if the layer has no features.
    pub fn is_empty(&self, layer: LayerId) -> bool {
        self.len(layer) == 0
    }

    /// Drops every feature of a layer.
    pub fn clear_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
    }
}

impl FeatureStore for MemoryFeatureStore {
    fn query(&self, layer: LayerId, request: &FeatureRequest) -> FeatureIter<'_> {
        let Some(entry) = self.layers.get(&layer) else {
            return FeatureIter::empty();
        };
        let request = *request;
        let strip = request.flags().contains(RequestFlags::NO_GEOMETRY);
        let finish = move |f: &Feature| {
            let f = f.clone();
            if strip { f.without_geometry() } else { f }
        };

        match request.filter_rect() {
            None => FeatureIter::new(entry.features.values().map(move |(f, _)| finish(f))),
            Some(rect) => {
                let mut ids = entry.index.candidates(to_aabb(rect));
                ids.sort_unstable();
                log::trace!(
                    "{layer}: {} index candidates for {rect:?}",
                    ids.len()
                );
                let features = &entry.features;
                FeatureIter::new(ids.into_iter().filter_map(move |id| {
                    let (f, _) = features.get(&id)?;
                    request.accepts(f.geometry()).then(|| finish(f))
                }))
            }
        }
    }
}

impl fmt::Debug for MemoryFeatureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features: usize = self.layers.values().map(|l| l.features.len()).sum();
        f.debug_struct("MemoryFeatureStore")
            .field("layers", &self.layers.len())
            .field("features", &features)
            .field("backing", &self.backing)
            .finish()
    }
}
