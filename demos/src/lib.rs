// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the runnable demos: a toy escape-time classifier and logging setup.

use std::convert::Infallible;

use boundary_quadtree::{BoundaryParameters, PlaneMapping, RegionArea, RegionId};
use boundary_search::{RegionClassifier, RegionVerdict};
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Samples the escape-time iteration at the corners and centre of each region.
///
/// - Samples that all agree (all escape, or all stay bounded) reject the region.
/// - Escaping corners around a bounded centre mark a filament passing through.
/// - Anything else is border.
///
/// Areas entirely outside the radius-2 disk are rejected without sampling.
#[derive(Copy, Clone, Debug)]
pub struct EscapeTimeClassifier {
    /// Placement of the region grid on the plane.
    pub mapping: PlaneMapping,
}

impl EscapeTimeClassifier {
    /// Classifier over the default `[-2, 2]²` window at `vertical_power`.
    pub fn new(vertical_power: u32) -> Self {
        Self {
            mapping: PlaneMapping::new(vertical_power),
        }
    }
}

/// Whether `c` stays bounded for `max_iterations` steps of `z ← z² + c`.
pub fn is_bounded(c: Point, max_iterations: u32) -> bool {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    for _ in 0..max_iterations {
        let t = x * x - y * y + c.x;
        y = 2.0 * x * y + c.y;
        x = t;
        if x * x + y * y > 4.0 {
            return false;
        }
    }
    true
}

fn distance_to_origin(rect: Rect) -> f64 {
    let axis = |lo: f64, hi: f64| {
        if lo > 0.0 {
            lo
        } else if hi < 0.0 {
            -hi
        } else {
            0.0
        }
    };
    axis(rect.x0, rect.x1).hypot(axis(rect.y0, rect.y1))
}

impl RegionClassifier for EscapeTimeClassifier {
    type Error = Infallible;

    fn classify(
        &self,
        params: &BoundaryParameters,
        region: RegionId,
    ) -> Result<RegionVerdict, Self::Error> {
        let rect = self.mapping.region_rect(region);
        let bounded = |p: Point| is_bounded(p, params.max_iterations);
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
        ];
        let inside = corners.into_iter().filter(|&p| bounded(p)).count();
        let centre = bounded(rect.center());
        Ok(match (inside, centre) {
            (0, false) | (4, true) => RegionVerdict::Rejected,
            (0, true) => RegionVerdict::Filament,
            _ => RegionVerdict::Border,
        })
    }

    fn classify_area(
        &self,
        _: &BoundaryParameters,
        area: RegionArea,
    ) -> Result<RegionVerdict, Self::Error> {
        Ok(if distance_to_origin(self.mapping.area_rect(area)) > 2.0 {
            RegionVerdict::Rejected
        } else {
            RegionVerdict::Border
        })
    }
}
