// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for `f64` coordinates.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::Aabb2D;

type Cell = (i64, i64);

/// Boxes touching more cells than this are kept in a side list instead.
const MAX_CELLS_PER_BOX: u128 = 1024;

/// Uniform grid backend: each slot is bucketed into every cell its box touches.
///
/// Good for layers with many small, evenly spread features (points of interest,
/// parcels). Queries that would walk more cells than there are live slots fall
/// back to a linear scan, so very large query boxes stay bounded.
///
/// Visit order is unspecified; each slot is reported at most once per visit.
pub struct GridF64 {
    cell: f64,
    boxes: Vec<Option<Aabb2D<f64>>>,
    cells: HashMap<Cell, SmallVec<[usize; 4]>>,
    oversized: Vec<usize>,
    alive: usize,
}

impl GridF64 {
    /// Creates a grid with square cells of side `cell` (in index units).
    ///
    /// Non-finite or non-positive sizes fall back to `1.0`.
    pub fn new(cell: f64) -> Self {
        let cell = if cell.is_finite() && cell > 0.0 {
            cell
        } else {
            1.0
        };
        Self {
            cell,
            boxes: Vec::new(),
            cells: HashMap::new(),
            oversized: Vec::new(),
            alive: 0,
        }
    }

    /// Side length of a grid cell.
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "saturating float to int conversion is the intended cell clamp"
    )]
    fn cell_coord(&self, v: f64) -> i64 {
        let q = v / self.cell;
        let t = q as i64;
        // `as` truncates toward zero; step down for negative fractions.
        if (t as f64) > q { t - 1 } else { t }
    }

    fn cell_range(&self, aabb: &Aabb2D<f64>) -> (Cell, Cell) {
        (
            (self.cell_coord(aabb.min_x), self.cell_coord(aabb.min_y)),
            (self.cell_coord(aabb.max_x), self.cell_coord(aabb.max_y)),
        )
    }

    fn cell_count(lo: Cell, hi: Cell) -> u128 {
        let w = u128::from(hi.0.abs_diff(lo.0)) + 1;
        let h = u128::from(hi.1.abs_diff(lo.1)) + 1;
        w * h
    }

    fn bucket(&mut self, slot: usize, aabb: &Aabb2D<f64>) {
        let (lo, hi) = self.cell_range(aabb);
        if Self::cell_count(lo, hi) > MAX_CELLS_PER_BOX {
            self.oversized.push(slot);
            return;
        }
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                self.cells.entry((cx, cy)).or_default().push(slot);
            }
        }
    }

    fn unbucket(&mut self, slot: usize, aabb: &Aabb2D<f64>) {
        let (lo, hi) = self.cell_range(aabb);
        if Self::cell_count(lo, hi) > MAX_CELLS_PER_BOX {
            self.oversized.retain(|s| *s != slot);
            return;
        }
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                if let Some(list) = self.cells.get_mut(&(cx, cy)) {
                    list.retain(|s| *s != slot);
                    if list.is_empty() {
                        self.cells.remove(&(cx, cy));
                    }
                }
            }
        }
    }
}

impl Debug for GridF64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridF64")
            .field("cell", &self.cell)
            .field("alive", &self.alive)
            .field("occupied_cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}

impl Backend<f64> for GridF64 {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        if self.boxes.len() <= slot {
            self.boxes.resize_with(slot + 1, || None);
        }
        if let Some(old) = self.boxes[slot].take() {
            self.unbucket(slot, &old);
            self.alive -= 1;
        }
        if !aabb.is_empty() {
            self.bucket(slot, &aabb);
        }
        self.boxes[slot] = Some(aabb);
        self.alive += 1;
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        if matches!(self.boxes.get(slot), Some(Some(_))) {
            self.insert(slot, aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.boxes.get_mut(slot).and_then(Option::take) {
            self.unbucket(slot, &old);
            self.alive -= 1;
        }
    }

    fn clear(&mut self) {
        self.boxes.clear();
        self.cells.clear();
        self.oversized.clear();
        self.alive = 0;
    }

    fn visit_point<F: FnMut(usize)>(&self, x: f64, y: f64, mut f: F) {
        let cell = (self.cell_coord(x), self.cell_coord(y));
        let bucketed = self.cells.get(&cell).map(|l| l.as_slice()).unwrap_or(&[]);
        for &slot in bucketed.iter().chain(&self.oversized) {
            if let Some(Some(a)) = self.boxes.get(slot)
                && a.contains_point(x, y)
            {
                f(slot);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<f64>, mut f: F) {
        if rect.is_empty() || self.alive == 0 {
            return;
        }
        let (lo, hi) = self.cell_range(&rect);
        if Self::cell_count(lo, hi) > self.alive as u128 {
            for (slot, a) in self.boxes.iter().enumerate() {
                if let Some(a) = a
                    && a.overlaps(&rect)
                {
                    f(slot);
                }
            }
            return;
        }

        let mut seen = HashSet::new();
        for &slot in &self.oversized {
            if let Some(Some(a)) = self.boxes.get(slot)
                && a.overlaps(&rect)
                && seen.insert(slot)
            {
                f(slot);
            }
        }
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                let Some(list) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &slot in list {
                    if let Some(Some(a)) = self.boxes.get(slot)
                        && a.overlaps(&rect)
                        && seen.insert(slot)
                    {
                        f(slot);
                    }
                }
            }
        }
    }
}
