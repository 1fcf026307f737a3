// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render a compressed boundary as text, one scanline per row, north at the top.
//!
//! Run:
//! - `cargo run -p boundary_demos --example ascii_render`

use boundary_demos::{EscapeTimeClassifier, init_logging};
use boundary_quadtree::{BoundaryParameters, LookupRegionType, QuadtreeCompressor};
use boundary_search::BoundaryCalculator;

fn glyph(t: LookupRegionType) -> char {
    match t {
        LookupRegionType::Empty => ' ',
        LookupRegionType::Border => '#',
        LookupRegionType::Filament => '.',
        LookupRegionType::EmptyToBorder => '+',
        LookupRegionType::EmptyToFilament => ':',
        LookupRegionType::MixedDiff => '%',
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let params = BoundaryParameters::new(6, 128);
    let classifier = EscapeTimeClassifier::new(params.vertical_power);
    let (visited, _) = BoundaryCalculator::new(params, classifier).search()?;
    let lookup = QuadtreeCompressor::compress(&visited);

    for y in (0..params.side()).rev() {
        let line: String = lookup.scanline(y, 0..params.side()).map(glyph).collect();
        println!("{}", line.trim_end());
    }
    Ok(())
}
