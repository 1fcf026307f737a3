// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recursive boundary search.

use core::fmt;

use boundary_quadtree::{
    BoundaryParameters, Quad, Quadrant, RegionArea, VisitedRegionType, VisitedRegions,
};
use tracing::{Span, debug, info, info_span, warn};

use crate::cancel::CancelToken;
use crate::classifier::{RegionClassifier, RegionVerdict};
use crate::settings::SearchSettings;

/// How a search run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every quadrant was classified.
    Completed,
    /// The cancel token fired; the accumulator holds everything written before that.
    Cancelled,
}

/// Work counters for one search run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls to [`RegionClassifier::classify`].
    pub regions_classified: u64,
    /// Calls to [`RegionClassifier::classify_area`].
    pub areas_classified: u64,
    /// Coarse areas recorded as rejected without subdividing.
    pub areas_pruned: u64,
    /// Unit regions written as border.
    pub border_regions: u64,
}

/// Result of [`BoundaryCalculator::run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// How the run ended.
    pub outcome: SearchOutcome,
    /// What it did.
    pub stats: SearchStats,
}

/// Searches `[0, 2^V)²` for border regions, writing every verdict into a [`VisitedRegions`].
///
/// The search starts from the whole area and descends depth-first in quadrant order.
/// A coarse quadrant the classifier rejects is recorded as one block and pruned; any other
/// quadrant is split and its four children are classified together, in parallel unless
/// [`SearchSettings::parallel`] is off. Only the calling thread writes to the accumulator.
pub struct BoundaryCalculator<C> {
    parameters: BoundaryParameters,
    classifier: C,
    settings: SearchSettings,
    cancel: CancelToken,
}

impl<C> fmt::Debug for BoundaryCalculator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryCalculator")
            .field("parameters", &self.parameters)
            .field("settings", &self.settings)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl<C: RegionClassifier> BoundaryCalculator<C> {
    /// A calculator with default settings and a fresh cancel token.
    pub fn new(parameters: BoundaryParameters, classifier: C) -> Self {
        Self {
            parameters,
            classifier,
            settings: SearchSettings::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Observe `cancel` instead of the calculator's own token.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A clone of the token this calculator observes.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The parameters being searched.
    pub fn parameters(&self) -> &BoundaryParameters {
        &self.parameters
    }

    /// Run a search into a fresh accumulator sized by [`SearchSettings::initial_capacity`].
    pub fn search(&self) -> Result<(VisitedRegions, SearchReport), C::Error> {
        let mut visited = VisitedRegions::with_capacity(self.settings.initial_capacity);
        let report = self.run(&mut visited)?;
        Ok((visited, report))
    }

    /// Run a search, writing into `visited`.
    ///
    /// Classifier errors abort the run and are returned unchanged; whatever was written
    /// before the error stays in `visited`.
    pub fn run(&self, visited: &mut VisitedRegions) -> Result<SearchReport, C::Error> {
        let p = &self.parameters;
        let _span = info_span!(
            "boundary_search",
            vertical_power = p.vertical_power,
            max_iterations = p.max_iterations,
            parallel = self.settings.parallel,
        )
        .entered();
        info!("starting boundary search");

        let mut stats = SearchStats::default();
        let root = p.area();
        let verdict = self.classify(root, p.vertical_power, &mut stats)?;
        let outcome = self.visit(visited, root, p.vertical_power, verdict, &mut stats)?;

        match outcome {
            SearchOutcome::Completed => info!(
                regions_classified = stats.regions_classified,
                areas_classified = stats.areas_classified,
                areas_pruned = stats.areas_pruned,
                border_regions = stats.border_regions,
                nodes = visited.node_count(),
                "boundary search finished"
            ),
            SearchOutcome::Cancelled => warn!(
                regions_classified = stats.regions_classified,
                border_regions = stats.border_regions,
                "boundary search cancelled"
            ),
        }
        Ok(SearchReport { outcome, stats })
    }

    fn visit(
        &self,
        visited: &mut VisitedRegions,
        area: RegionArea,
        level: u32,
        verdict: RegionVerdict,
        stats: &mut SearchStats,
    ) -> Result<SearchOutcome, C::Error> {
        if self.cancel.is_cancelled() {
            return Ok(SearchOutcome::Cancelled);
        }
        if level == 0 {
            visited.set_region_type(area.origin(), verdict.into());
            if verdict == RegionVerdict::Border {
                stats.border_regions += 1;
            }
            return Ok(SearchOutcome::Completed);
        }
        if verdict == RegionVerdict::Rejected {
            visited.set_area_type(level, area.origin(), VisitedRegionType::Rejected);
            stats.areas_pruned += 1;
            debug!(level, x = area.x0, y = area.y0, "pruned rejected area");
            return Ok(SearchOutcome::Completed);
        }

        let children = Quad::from_array(Quadrant::ALL.map(|q| area.quadrant(q)));
        let verdicts = self.classify_children(children, level - 1, stats)?;
        for q in Quadrant::ALL {
            let outcome = self.visit(visited, children.get(q), level - 1, verdicts.get(q), stats)?;
            if outcome == SearchOutcome::Cancelled {
                return Ok(outcome);
            }
        }
        Ok(SearchOutcome::Completed)
    }

    fn classify(
        &self,
        area: RegionArea,
        level: u32,
        stats: &mut SearchStats,
    ) -> Result<RegionVerdict, C::Error> {
        if level == 0 {
            stats.regions_classified += 1;
        } else {
            stats.areas_classified += 1;
        }
        self.classify_uncounted(area, level)
    }

    fn classify_uncounted(&self, area: RegionArea, level: u32) -> Result<RegionVerdict, C::Error> {
        if level == 0 {
            self.classifier.classify(&self.parameters, area.origin())
        } else {
            self.classifier.classify_area(&self.parameters, area)
        }
    }

    /// Classify four sibling areas, fanning out to the rayon pool when enabled.
    ///
    /// All four verdicts are joined before returning. On failure the error of the first
    /// failing quadrant in quadrant order is returned.
    fn classify_children(
        &self,
        children: Quad<RegionArea>,
        level: u32,
        stats: &mut SearchStats,
    ) -> Result<Quad<RegionVerdict>, C::Error> {
        if !self.settings.parallel {
            let mut verdicts = Quad::splat(RegionVerdict::Border);
            for q in Quadrant::ALL {
                let verdict = self.classify(children.get(q), level, stats)?;
                verdicts = verdicts.with(q, verdict);
            }
            return Ok(verdicts);
        }

        if level == 0 {
            stats.regions_classified += 4;
        } else {
            stats.areas_classified += 4;
        }
        let (tx, rx) = crossbeam_channel::bounded(4);
        let parent = Span::current();
        rayon::scope(|scope| {
            for q in Quadrant::ALL {
                let tx = tx.clone();
                let parent = parent.clone();
                let area = children.get(q);
                scope.spawn(move |_| {
                    let _entered = parent.enter();
                    // The receiver outlives the scope, so sending cannot fail.
                    let _ = tx.send((q, self.classify_uncounted(area, level)));
                });
            }
        });
        drop(tx);

        let mut received: Vec<_> = rx.iter().collect();
        debug_assert_eq!(received.len(), 4, "every classification reports back");
        received.sort_by_key(|(q, _)| q.ordinal());
        let mut verdicts = Quad::splat(RegionVerdict::Border);
        for (q, result) in received {
            verdicts = verdicts.with(q, result?);
        }
        Ok(verdicts)
    }
}
