// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compare the boundary found with two iteration budgets.
//!
//! Regions that became border with the larger budget show up as `EmptyToBorder`; regions whose
//! classification changed in other ways show up as `EmptyToFilament` or `MixedDiff`.
//!
//! Run:
//! - `cargo run -p boundary_demos --example iteration_diff`

use std::collections::BTreeMap;

use boundary_demos::{EscapeTimeClassifier, init_logging};
use boundary_quadtree::{BoundaryParameters, QuadtreeCompressor};
use boundary_search::BoundaryCalculator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let coarse = BoundaryParameters::new(8, 24);
    let fine = BoundaryParameters::new(8, 512);
    let classifier = EscapeTimeClassifier::new(coarse.vertical_power);

    let (coarse_visited, _) = BoundaryCalculator::new(coarse, classifier).search()?;
    let (fine_visited, _) = BoundaryCalculator::new(fine, classifier).search()?;
    let reference = QuadtreeCompressor::compress(&coarse_visited);
    let diff = QuadtreeCompressor::diff_visited(&fine_visited, &reference);

    let mut counts = BTreeMap::new();
    for (area, t) in diff.visible_areas(diff.extent()) {
        *counts.entry(format!("{t:?}")).or_insert(0_u64) += area.region_count();
    }
    println!("{coarse} vs {fine}: {} diff nodes", diff.node_count());
    for (t, n) in counts {
        println!("  {t:>16}: {n}");
    }
    Ok(())
}
