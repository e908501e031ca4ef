// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload-carrying index over a pluggable [`Backend`].

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::FlatVec;
use crate::types::{Aabb2D, Key};

#[derive(Clone, Debug)]
struct Entry<T, P> {
    generation: u32,
    live: Option<(Aabb2D<T>, P)>,
}

/// A spatial index storing one box and one payload per entry.
///
/// Updates apply immediately to the backend, so queries always observe the
/// latest state. The index holds no cursor state: every query starts fresh.
pub struct IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    B: Backend<T>,
{
    entries: Vec<Entry<T, P>>,
    free: Vec<usize>,
    len: usize,
    backend: B,
}

/// Index using the default [`FlatVec`] backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T>>;

impl<T, P> IndexGeneric<T, P, FlatVec<T>>
where
    T: Copy + PartialOrd + Debug,
{
    /// Creates an empty index with a flat vector backend.
    pub fn new() -> Self {
        Self::with_backend(FlatVec::default())
    }
}

impl<T, P> Default for IndexGeneric<T, P, FlatVec<T>>
where
    T: Copy + PartialOrd + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "backend_grid")]
impl<P> IndexGeneric<f64, P, crate::backends::GridF64> {
    /// Creates an empty index with a uniform grid backend of the given cell size.
    pub fn with_grid(cell: f64) -> Self {
        Self::with_backend(crate::backends::GridF64::new(cell))
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    B: Backend<T>,
{
    /// Creates an empty index over the given backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
            backend,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a box with its payload and returns its key.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "slot counts beyond u32::MAX are unsupported"
    )]
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let slot = if let Some(slot) = self.free.pop() {
            let e = &mut self.entries[slot];
            e.generation = e.generation.wrapping_add(1);
            e.live = Some((aabb, payload));
            slot
        } else {
            self.entries.push(Entry {
                generation: 1,
                live: Some((aabb, payload)),
            });
            self.entries.len() - 1
        };
        self.backend.insert(slot, aabb);
        self.len += 1;
        Key::new(slot as u32, self.entries[slot].generation)
    }

    /// Replaces the box of a live entry. Returns `false` for stale keys.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) -> bool {
        match self.entry_mut(key) {
            Some((b, _)) => {
                *b = aabb;
                self.backend.update(key.idx(), aabb);
                true
            }
            None => false,
        }
    }

    /// Removes a live entry and returns its payload.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        let e = self.entries.get_mut(key.idx())?;
        if e.generation != key.generation() {
            return None;
        }
        let (_, payload) = e.live.take()?;
        self.backend.remove(key.idx());
        self.free.push(key.idx());
        self.len -= 1;
        Some(payload)
    }

    /// Removes every entry. Outstanding keys become stale.
    pub fn clear(&mut self) {
        for (slot, e) in self.entries.iter_mut().enumerate() {
            if e.live.take().is_some() {
                self.free.push(slot);
            }
        }
        self.backend.clear();
        self.len = 0;
    }

    /// Returns the box and payload of a live entry.
    pub fn get(&self, key: Key) -> Option<(&Aabb2D<T>, &P)> {
        let e = self.entries.get(key.idx())?;
        if e.generation != key.generation() {
            return None;
        }
        e.live.as_ref().map(|(b, p)| (b, p))
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut (Aabb2D<T>, P)> {
        let e = self.entries.get_mut(key.idx())?;
        if e.generation != key.generation() {
            return None;
        }
        e.live.as_mut()
    }

    fn key_for(&self, slot: usize) -> Option<(Key, &P)> {
        let e = self.entries.get(slot)?;
        let (_, p) = e.live.as_ref()?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "slots are created from u32 keys"
        )]
        let key = Key::new(slot as u32, e.generation);
        Some((key, p))
    }

    /// Visits entries whose box contains the point.
    pub fn visit_point<F: FnMut(Key, &P)>(&self, x: T, y: T, mut f: F) {
        self.backend.visit_point(x, y, |slot| {
            if let Some((k, p)) = self.key_for(slot) {
                f(k, p);
            }
        });
    }

    /// Visits entries whose box intersects `rect` (edges inclusive).
    pub fn visit_rect<F: FnMut(Key, &P)>(&self, rect: Aabb2D<T>, mut f: F) {
        self.backend.visit_rect(rect, |slot| {
            if let Some((k, p)) = self.key_for(slot) {
                f(k, p);
            }
        });
    }

    /// Collects entries whose box intersects `rect`.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> Vec<(Key, &P)> {
        let mut out = Vec::new();
        for slot in self.backend.query_rect(rect) {
            if let Some(hit) = self.key_for(slot) {
                out.push(hit);
            }
        }
        out
    }
}

impl<T, P, B> Debug for IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    B: Backend<T> + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexGeneric")
            .field("len", &self.len)
            .field("free_slots", &self.free.len())
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn stale_keys_do_not_alias_reused_slots() {
        let mut idx = Index::<f64, &str>::new();
        let a = idx.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), "a");
        assert_eq!(idx.remove(a), Some("a"));
        let b = idx.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), "b");

        assert_ne!(a, b);
        assert!(idx.get(a).is_none());
        assert_eq!(idx.remove(a), None);
        assert_eq!(idx.get(b).map(|(_, p)| *p), Some("b"));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn update_moves_entry() {
        let mut idx = Index::<i64, u32>::new();
        let k = idx.insert(Aabb2D::new(0, 0, 1, 1), 7);
        assert!(idx.update(k, Aabb2D::new(10, 10, 11, 11)));

        let mut hits = vec![];
        idx.visit_point(0, 0, |_, p| hits.push(*p));
        assert!(hits.is_empty());
        idx.visit_point(10, 10, |_, p| hits.push(*p));
        assert_eq!(hits, vec![7]);
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut idx = Index::<f64, u8>::new();
        let k = idx.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), 1);
        idx.clear();
        assert!(idx.is_empty());
        assert!(idx.get(k).is_none());
        assert!(idx.query_rect(Aabb2D::new(-5.0, -5.0, 5.0, 5.0)).is_empty());
    }
}
