// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=boundary_search --heading-base-level=0

//! Boundary Search: a recursive quadrant search for the boundary of the Mandelbrot set.
//!
//! [`BoundaryCalculator`] walks the `2^V × 2^V` region grid from the top down. It asks a
//! [`RegionClassifier`] about each quadrant, records rejected quadrants as whole blocks, and
//! subdivides everything else until single regions are classified. Results accumulate in a
//! [`VisitedRegions`](boundary_quadtree::VisitedRegions), ready for
//! [`QuadtreeCompressor`](boundary_quadtree::QuadtreeCompressor).
//!
//! - Classification of sibling quadrants runs on the rayon pool; all writes happen on the
//!   calling thread, in a deterministic order.
//! - A [`CancelToken`] stops a run between quadrants, keeping what was written so far.
//! - Classifier errors end the run and are returned unchanged.
//!
//! The numeric classifier itself is not part of this crate.
//!
//! # Example
//!
//! ```rust
//! use boundary_quadtree::{BoundaryParameters, QuadtreeCompressor, RegionId};
//! use boundary_search::{BoundaryCalculator, RegionClassifier, RegionVerdict, SearchOutcome};
//!
//! /// The diagonal is the "boundary"; nothing else is.
//! struct Diagonal;
//!
//! impl RegionClassifier for Diagonal {
//!     type Error = std::convert::Infallible;
//!
//!     fn classify(
//!         &self,
//!         _: &BoundaryParameters,
//!         region: RegionId,
//!     ) -> Result<RegionVerdict, Self::Error> {
//!         Ok(if region.x == region.y {
//!             RegionVerdict::Border
//!         } else {
//!             RegionVerdict::Rejected
//!         })
//!     }
//! }
//!
//! let calc = BoundaryCalculator::new(BoundaryParameters::new(3, 100), Diagonal);
//! let (visited, report) = calc.search().unwrap();
//! assert_eq!(report.outcome, SearchOutcome::Completed);
//! assert_eq!(report.stats.border_regions, 8);
//!
//! let lookup = QuadtreeCompressor::compress(&visited);
//! assert_eq!(lookup.boundary_regions().len(), 8);
//! ```

mod calculator;
mod cancel;
mod classifier;
mod settings;

pub use calculator::{BoundaryCalculator, SearchOutcome, SearchReport, SearchStats};
pub use cancel::CancelToken;
pub use classifier::{RegionClassifier, RegionVerdict};
pub use settings::SearchSettings;
