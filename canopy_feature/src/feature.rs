// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use canopy_precise_hit::Geometry;

use crate::value::{Attributes, Value};

/// Identifier of a feature within its layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one record of a layer.
///
/// Query results are owned copies: changing the store after a query does not
/// affect features already handed out.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: Option<Geometry>,
    attributes: Attributes,
}

impl Feature {
    /// Creates a feature with no geometry and no attributes.
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            geometry: None,
            attributes: Attributes::new(),
        }
    }

    /// Sets the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: impl Into<Geometry>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Sets one attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Feature identifier.
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Geometry, if the feature has one and it was requested.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// All attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// One attribute value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub(crate) fn without_geometry(mut self) -> Self {
        self.geometry = None;
        self
    }
}
