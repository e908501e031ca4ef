// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Direction of the map's y axis relative to device space.
///
/// Device space always grows downwards. Most map coordinate systems grow
/// northwards, so the default flips y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum YAxis {
    /// Map y grows upwards on screen (north-up maps).
    #[default]
    Up,
    /// Map y grows downwards on screen, like device space (image or scene coordinates).
    Down,
}

impl YAxis {
    pub(crate) fn sign(self) -> f64 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
        }
    }
}
