// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for a search run.

/// How the search schedules its work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    /// Classify the four children of a quadrant on the rayon pool. When false, every
    /// classification runs on the calling thread.
    pub parallel: bool,
    /// Node slots reserved up front by [`BoundaryCalculator::search`](crate::BoundaryCalculator::search).
    pub initial_capacity: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            initial_capacity: 1 << 12,
        }
    }
}

impl SearchSettings {
    /// Settings that keep all work on the calling thread.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
