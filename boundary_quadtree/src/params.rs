// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameters identifying one boundary computation.

use core::fmt;

use crate::types::{RegionArea, RegionId, side_of_level};
use crate::visited::MAX_HEIGHT;

/// Resolution and iteration budget of a search.
///
/// The search covers `[0, 2^vertical_power)` in both axes. `max_iterations` is opaque to the
/// quadtree crates and only passed through to the classifier and persisted files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryParameters {
    /// Log2 of the number of regions per side.
    pub vertical_power: u32,
    /// Iteration budget for the classifier.
    pub max_iterations: u32,
}

impl Default for BoundaryParameters {
    fn default() -> Self {
        Self {
            vertical_power: 8,
            max_iterations: 1024,
        }
    }
}

impl BoundaryParameters {
    /// Parameters with the given resolution and iteration budget.
    ///
    /// `vertical_power` is clamped to the tallest tree the accumulator supports.
    pub fn new(vertical_power: u32, max_iterations: u32) -> Self {
        Self {
            vertical_power: vertical_power.min(MAX_HEIGHT),
            max_iterations,
        }
    }

    /// Regions per side.
    pub fn side(&self) -> u32 {
        side_of_level(self.vertical_power)
    }

    /// The searched area.
    pub fn area(&self) -> RegionArea {
        RegionArea::of_node(RegionId::new(0, 0), self.vertical_power)
    }
}

impl fmt::Display for BoundaryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}-i{}", self.vertical_power, self.max_iterations)
    }
}
