// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query a compressed boundary through plane-coordinate viewports.
//!
//! Run:
//! - `cargo run -p boundary_demos --example plane_viewport`

use boundary_demos::{EscapeTimeClassifier, init_logging};
use boundary_quadtree::{BoundaryParameters, QuadtreeCompressor};
use boundary_search::BoundaryCalculator;
use kurbo::Rect;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let params = BoundaryParameters::new(8, 200);
    let classifier = EscapeTimeClassifier::new(params.vertical_power);
    let (visited, _) = BoundaryCalculator::new(params, classifier).search()?;
    let lookup = QuadtreeCompressor::compress(&visited);

    // Zoom toward the neck between the main cardioid and the period-2 bulb.
    for half in [1.0, 0.25, 0.05] {
        let viewport = Rect::new(-0.75 - half, -half, -0.75 + half, half);
        let rects = lookup.visible_rects(&classifier.mapping, viewport);
        let area: f64 = rects.iter().map(|(r, _)| r.area()).sum();
        println!(
            "viewport {viewport:?}: {} uniform rects covering {area:.4}",
            rects.len()
        );
    }
    Ok(())
}
