// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

use crate::feature::Feature;
use crate::request::FeatureRequest;

/// Identifier of a layer, shared between the store and whatever owns the layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.0)
    }
}

/// Source of feature snapshots.
///
/// Every call to [`query`](Self::query) starts a fresh, independent sequence:
/// implementations must not keep cursor state between calls, so concurrent
/// callers each drain their own iterator.
pub trait FeatureStore {
    /// Features of `layer` selected by `request`.
    ///
    /// Unknown layers yield an empty sequence. The order is implementation
    /// defined but stable for unchanged data.
    fn query(&self, layer: LayerId, request: &FeatureRequest) -> FeatureIter<'_>;
}

/// Lazy sequence of features returned by [`FeatureStore::query`].
pub struct FeatureIter<'a> {
    inner: Box<dyn Iterator<Item = Feature> + 'a>,
}

impl<'a> FeatureIter<'a> {
    /// Wraps any feature iterator.
    pub fn new(inner: impl Iterator<Item = Feature> + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// An empty sequence.
    pub fn empty() -> Self {
        Self::new(core::iter::empty())
    }
}

impl Iterator for FeatureIter<'_> {
    type Item = Feature;

    fn next(&mut self) -> Option<Feature> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for FeatureIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureIter").finish_non_exhaustive()
    }
}
