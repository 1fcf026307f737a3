// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The classification capability consumed by the search.

use boundary_quadtree::{BoundaryParameters, RegionArea, RegionId, VisitedRegionType};

/// What a classifier concluded about a region or an area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionVerdict {
    /// Proven to contain no part of the boundary.
    Rejected,
    /// Reached only through thin filaments of the set.
    Filament,
    /// Contains part of the boundary, or could not be ruled out.
    Border,
}

impl From<RegionVerdict> for VisitedRegionType {
    fn from(verdict: RegionVerdict) -> Self {
        match verdict {
            RegionVerdict::Rejected => Self::Rejected,
            RegionVerdict::Filament => Self::Filament,
            RegionVerdict::Border => Self::Border,
        }
    }
}

/// Decides which regions of the plane belong to the boundary.
///
/// The search calls a classifier from several threads at once, so implementations are
/// `Sync`, and must be deterministic: the same input always yields the same verdict.
///
/// ## Areas
///
/// [`classify_area`](Self::classify_area) is asked about coarse, aligned blocks before the
/// search descends into them. Only [`Rejected`](RegionVerdict::Rejected) has an effect: the
/// whole block is recorded as rejected and never subdivided. Any other verdict means "look
/// closer". The default implementation cannot prove anything and answers
/// [`Border`](RegionVerdict::Border), which makes the search visit every region.
pub trait RegionClassifier: Sync {
    /// Failure reported by the classifier; returned unchanged from the search.
    type Error: Send;

    /// Classify a single region.
    fn classify(
        &self,
        parameters: &BoundaryParameters,
        region: RegionId,
    ) -> Result<RegionVerdict, Self::Error>;

    /// Classify a whole block of regions at once.
    fn classify_area(
        &self,
        parameters: &BoundaryParameters,
        area: RegionArea,
    ) -> Result<RegionVerdict, Self::Error> {
        let _ = (parameters, area);
        Ok(RegionVerdict::Border)
    }
}

impl<C: RegionClassifier + ?Sized> RegionClassifier for &C {
    type Error = C::Error;

    fn classify(
        &self,
        parameters: &BoundaryParameters,
        region: RegionId,
    ) -> Result<RegionVerdict, Self::Error> {
        (**self).classify(parameters, region)
    }

    fn classify_area(
        &self,
        parameters: &BoundaryParameters,
        area: RegionArea,
    ) -> Result<RegionVerdict, Self::Error> {
        (**self).classify_area(parameters, area)
    }
}
