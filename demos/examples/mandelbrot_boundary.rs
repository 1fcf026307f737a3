// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search the Mandelbrot boundary, compress it, query it and save it to disk.
//!
//! Run:
//! - `cargo run -p boundary_demos --example mandelbrot_boundary`
//! - `RUST_LOG=debug cargo run -p boundary_demos --example mandelbrot_boundary` for growth and
//!   pruning events.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use boundary_demos::{EscapeTimeClassifier, init_logging};
use boundary_quadtree::{BoundaryParameters, LookupRegionType, QuadtreeCompressor, persist};
use boundary_search::BoundaryCalculator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let params = BoundaryParameters::new(9, 256);
    let classifier = EscapeTimeClassifier::new(params.vertical_power);
    let calc = BoundaryCalculator::new(params, classifier);
    let (visited, report) = calc.search()?;
    println!(
        "{params}: {} border regions, {} areas pruned, {} accumulator nodes",
        report.stats.border_regions,
        report.stats.areas_pruned,
        visited.node_count()
    );

    let lookup = QuadtreeCompressor::compress(&visited);
    println!(
        "lookup: height {}, {} nodes",
        lookup.height(),
        lookup.node_count()
    );

    // The real axis crosses the set between -2 and 1/4.
    let row = params.side() / 2;
    let runs: Vec<_> = lookup.scanline(row, 0..params.side()).runs().collect();
    println!("row {row}: {} runs", runs.len());
    let border_on_axis: u32 = runs
        .iter()
        .filter(|(t, _)| *t == LookupRegionType::Border)
        .map(|(_, n)| n)
        .sum();
    println!("row {row}: {border_on_axis} border regions");

    let dir = std::env::temp_dir();
    let lookup_path = dir.join(format!("boundary-{params}.bqlk"));
    let regions_path = dir.join(format!("boundary-{params}.bqrs"));
    persist::save_lookup(BufWriter::new(File::create(&lookup_path)?), &params, &lookup)?;
    persist::save_boundary_regions(
        BufWriter::new(File::create(&regions_path)?),
        &params,
        &visited.boundary_regions().collect::<Vec<_>>(),
    )?;

    let loaded = persist::load_lookup(BufReader::new(File::open(&lookup_path)?))?;
    assert_eq!(loaded.lookup, lookup);
    let regions = persist::load_boundary_regions(BufReader::new(File::open(&regions_path)?))?;
    println!(
        "saved and reloaded {} ({} nodes) and {} ({} regions)",
        lookup_path.display(),
        loaded.lookup.node_count(),
        regions_path.display(),
        regions.regions.len()
    );
    Ok(())
}
