// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=boundary_quadtree --heading-base-level=0

//! Boundary Quadtree: region quadtrees for charting the boundary of the Mandelbrot set.
//!
//! The plane is divided into a `2^V × 2^V` grid of unit regions. A search classifies each
//! region and records the result in two cooperating trees:
//!
//! - [`VisitedRegions`]: the mutable accumulator written during a search. It grows toward
//!   positive coordinates on demand and subdivides only where a write needs it.
//! - [`RegionLookup`]: the compressed, read-only result. [`QuadtreeCompressor`] builds it by
//!   hash-consing, so identical subtrees share storage and every branch carries a condensed
//!   summary of its contents.
//!
//! Two lookups (for example at two iteration budgets) can be combined with
//! [`QuadtreeCompressor::diff`], which marks regions that changed with the
//! `EmptyTo*` and `MixedDiff` types.
//!
//! # Example
//!
//! ```rust
//! use boundary_quadtree::{
//!     LookupRegionType, QuadtreeCompressor, RegionId, VisitedRegionType, VisitedRegions,
//! };
//!
//! let mut visited = VisitedRegions::new();
//! visited.set_region_type(RegionId::new(0, 0), VisitedRegionType::Border);
//! visited.set_region_type(RegionId::new(1, 0), VisitedRegionType::Rejected);
//!
//! let lookup = QuadtreeCompressor::compress(&visited);
//! assert_eq!(lookup.region_type(RegionId::new(0, 0)), LookupRegionType::Border);
//! assert_eq!(lookup.region_type(RegionId::new(1, 0)), LookupRegionType::Empty);
//! assert_eq!(lookup.boundary_regions(), [RegionId::new(0, 0)]);
//! ```
//!
//! Lookups persist to a compact little-endian container:
//!
//! ```rust
//! use boundary_quadtree::{persist, BoundaryParameters, RegionLookup};
//!
//! let mut buf = Vec::new();
//! let params = BoundaryParameters::new(4, 500);
//! persist::save_lookup(&mut buf, &params, &RegionLookup::empty()).unwrap();
//! let loaded = persist::load_lookup(buf.as_slice()).unwrap();
//! assert_eq!(loaded.parameters, params);
//! ```
//!
//! ## Coordinates
//!
//! Region `(0, 0)` is the south-west corner and `y` grows north. Children of a node are
//! stored in four consecutive slots in [`Quadrant`] order: SW, SE, NW, NE.
//! [`PlaneMapping`] places the grid on the complex plane.

pub mod compressor;
pub mod encoding;
pub mod error;
pub mod lookup;
pub mod node;
pub mod params;
pub mod persist;
pub mod plane;
pub mod run_length;
pub mod types;
pub mod visited;

pub use compressor::QuadtreeCompressor;
pub use error::{CorruptDataError, PersistError};
pub use lookup::RegionLookup;
pub use node::{NodeIndex, RegionNode, VisitNode};
pub use params::BoundaryParameters;
pub use plane::PlaneMapping;
pub use run_length::RunLengthQueue;
pub use types::{
    LookupRegionType, Quad, Quadrant, RegionArea, RegionId, VisitedRegionType, side_of_level,
};
pub use visited::{BoundaryRegions, MAX_HEIGHT, VisitedRegions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_compress_and_query() {
        let mut visited = VisitedRegions::new();
        for (x, y) in [(3, 0), (3, 1), (2, 2), (1, 3)] {
            visited.set_region_type(RegionId::new(x, y), VisitedRegionType::Border);
        }
        visited.set_region_type(RegionId::new(0, 0), VisitedRegionType::Filament);
        let lookup = QuadtreeCompressor::compress(&visited);

        let mut from_visited: Vec<_> = visited.boundary_regions().collect();
        let mut from_lookup = lookup.boundary_regions();
        from_visited.sort_by_key(|r| (r.y, r.x));
        from_lookup.sort_by_key(|r| (r.y, r.x));
        assert_eq!(from_visited, from_lookup);
        assert_eq!(lookup.region_type(RegionId::new(0, 0)), LookupRegionType::Filament);
        assert_eq!(lookup.root().region_type(), LookupRegionType::EmptyToFilament);
    }

    #[test]
    fn diff_of_two_runs_marks_new_border() {
        let mut first = VisitedRegions::new();
        first.set_region_type(RegionId::new(0, 0), VisitedRegionType::Border);
        let mut second = first.clone();
        second.set_region_type(RegionId::new(1, 1), VisitedRegionType::Border);

        let reference = QuadtreeCompressor::compress(&first);
        let diff = QuadtreeCompressor::diff_visited(&second, &reference);
        assert_eq!(diff.region_type(RegionId::new(0, 0)), LookupRegionType::Border);
        assert_eq!(diff.region_type(RegionId::new(1, 1)), LookupRegionType::EmptyToBorder);
        assert_eq!(diff.region_type(RegionId::new(1, 0)), LookupRegionType::Empty);
    }
}
