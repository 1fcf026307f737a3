// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compressed, immutable region lookup and its queries.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::CorruptDataError;
use crate::node::{NodeIndex, RegionNode};
use crate::run_length::RunLengthQueue;
use crate::types::{LookupRegionType, Quadrant, RegionArea, RegionId, side_of_level};
use crate::visited::MAX_HEIGHT;

/// Canonical, hash-consed quadtree of [`LookupRegionType`]s.
///
/// Produced by [`QuadtreeCompressor`](crate::QuadtreeCompressor) or loaded from disk, and
/// never mutated afterwards. Node 0 is the root, covering `[0, 2^height)` in both axes.
/// Structurally identical subtrees share one slot, so the node array is a DAG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionLookup {
    nodes: Vec<RegionNode>,
    height: u32,
}

impl Default for RegionLookup {
    fn default() -> Self {
        Self::empty()
    }
}

impl RegionLookup {
    /// A lookup where every region is empty.
    pub fn empty() -> Self {
        Self {
            nodes: vec![RegionNode::EMPTY],
            height: 1,
        }
    }

    /// Assemble a lookup from nodes produced by the compressor.
    pub(crate) fn from_parts(height: u32, nodes: Vec<RegionNode>) -> Self {
        debug_assert!(!nodes.is_empty(), "lookup needs a root");
        Self { nodes, height }
    }

    /// Assemble a lookup from untrusted nodes, checking every structural invariant.
    ///
    /// Every branch reachable from the root must address four slots inside the array and
    /// must sit above level 0.
    pub fn from_nodes(height: u32, nodes: Vec<RegionNode>) -> Result<Self, CorruptDataError> {
        if nodes.is_empty() {
            return Err(CorruptDataError::EmptyNodeArray);
        }
        if height > MAX_HEIGHT {
            return Err(CorruptDataError::HeightInconsistent {
                height,
                detail: format!("height exceeds the maximum of {MAX_HEIGHT}"),
            });
        }
        for (index, node) in nodes.iter().enumerate() {
            if let Some(child) = node.child_index() {
                let child = child as usize;
                if child == 0 || child + 4 > nodes.len() {
                    return Err(CorruptDataError::ChildIndexOutOfBounds {
                        index,
                        child_index: child,
                        node_count: nodes.len(),
                    });
                }
            }
        }

        // Walk reachable (slot, level) pairs once each; a branch at level 0 means the data is
        // deeper than its height allows (this also catches cycles).
        let mut seen: HashSet<(usize, u32)> = HashSet::new();
        let mut stack = vec![(0_usize, height)];
        while let Some((index, level)) = stack.pop() {
            if !seen.insert((index, level)) {
                continue;
            }
            if let Some(child) = nodes[index].child_index() {
                if level == 0 {
                    return Err(CorruptDataError::HeightInconsistent {
                        height,
                        detail: format!("branch at slot {index} below the finest level"),
                    });
                }
                for q in Quadrant::ALL {
                    stack.push((child as usize + q.ordinal(), level - 1));
                }
            }
        }
        Ok(Self { nodes, height })
    }

    /// Height of the tree; the root covers `2^height` regions per side.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of node slots.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node slots; index 0 is the root.
    pub fn nodes(&self) -> &[RegionNode] {
        &self.nodes
    }

    /// The root node.
    pub fn root(&self) -> RegionNode {
        self.nodes[0]
    }

    /// Area covered by the root.
    pub fn extent(&self) -> RegionArea {
        RegionArea::of_node(RegionId::new(0, 0), self.height)
    }

    fn child(&self, child_index: NodeIndex, quadrant: Quadrant) -> RegionNode {
        self.nodes[child_index as usize + quadrant.ordinal()]
    }

    /// Type of a single region. Regions outside the extent are empty.
    pub fn region_type(&self, region: RegionId) -> LookupRegionType {
        if !self.extent().contains(region) {
            return LookupRegionType::Empty;
        }
        let mut node = self.root();
        let mut level = self.height;
        while let RegionNode::Branch(_, child) = node {
            node = self.child(child, Quadrant::containing(region, level));
            level -= 1;
        }
        node.region_type()
    }

    /// Every region whose type is [`Border`](LookupRegionType::Border), depth-first in
    /// quadrant order.
    pub fn boundary_regions(&self) -> Vec<RegionId> {
        let mut out = Vec::new();
        self.collect_boundary(self.root(), self.height, RegionId::new(0, 0), &mut out);
        out
    }

    fn collect_boundary(
        &self,
        node: RegionNode,
        level: u32,
        origin: RegionId,
        out: &mut Vec<RegionId>,
    ) {
        match node {
            RegionNode::Leaf(LookupRegionType::Border) => {
                out.extend(RegionArea::of_node(origin, level).regions());
            }
            RegionNode::Leaf(_) => {}
            RegionNode::Branch(t, child) => {
                // Summaries that cannot contain a border leaf prune the walk.
                if t == LookupRegionType::Empty || t == LookupRegionType::Filament {
                    return;
                }
                let area = RegionArea::of_node(origin, level);
                for q in Quadrant::ALL {
                    let sub = area.quadrant(q);
                    self.collect_boundary(self.child(child, q), level - 1, sub.origin(), out);
                }
            }
        }
    }

    /// Uniform, non-empty areas overlapping `query`.
    ///
    /// A branch is entered only when its area intersects the query, and descent stops at the
    /// first uniform node, whose whole (unclipped) area is returned. Results come out in
    /// depth-first quadrant order.
    pub fn visible_areas(&self, query: RegionArea) -> Vec<(RegionArea, LookupRegionType)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root(), self.extent())];
        while let Some((node, area)) = stack.pop() {
            if !area.intersects(&query) {
                continue;
            }
            match node {
                RegionNode::Leaf(LookupRegionType::Empty) => {}
                RegionNode::Leaf(t) => out.push((area, t)),
                RegionNode::Branch(_, child) => {
                    for q in Quadrant::ALL.into_iter().rev() {
                        stack.push((self.child(child, q), area.quadrant(q)));
                    }
                }
            }
        }
        out
    }

    /// Types along row `y` for columns in `columns`, as runs from west to east.
    ///
    /// Columns outside the extent read as empty.
    pub fn scanline(&self, y: u32, columns: Range<u32>) -> RunLengthQueue<LookupRegionType> {
        let mut runs = RunLengthQueue::new();
        if columns.is_empty() {
            return runs;
        }
        let row = RegionArea::new(columns.start, y, columns.end, y.saturating_add(1));
        let mut covered = columns.start;
        if self.extent().intersects(&row) {
            self.scan(self.root(), self.extent(), &row, &mut runs, &mut covered);
        }
        runs.add(LookupRegionType::Empty, columns.end - covered);
        runs
    }

    fn scan(
        &self,
        node: RegionNode,
        area: RegionArea,
        row: &RegionArea,
        runs: &mut RunLengthQueue<LookupRegionType>,
        covered: &mut u32,
    ) {
        match node {
            RegionNode::Leaf(t) => {
                let span = area.intersect(row);
                runs.add(t, span.width());
                *covered = span.x1;
            }
            RegionNode::Branch(_, child) => {
                // West before east within the half that holds the row.
                let (west, east) = if row.y0 < area.quadrant(Quadrant::NW).y0 {
                    (Quadrant::SW, Quadrant::SE)
                } else {
                    (Quadrant::NW, Quadrant::NE)
                };
                for q in [west, east] {
                    let sub = area.quadrant(q);
                    if sub.intersects(row) {
                        self.scan(self.child(child, q), sub, row, runs, covered);
                    }
                }
            }
        }
    }

    /// Number of regions per side covered by the root.
    pub fn side(&self) -> u32 {
        side_of_level(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LookupRegionType::*;

    /// Height-2 lookup: SW quad is (Border, Empty, Filament, Empty); the rest empty.
    fn sample() -> RegionLookup {
        RegionLookup::from_nodes(
            2,
            vec![
                RegionNode::branch(EmptyToFilament, 5),
                RegionNode::leaf(Border),
                RegionNode::EMPTY,
                RegionNode::leaf(Filament),
                RegionNode::EMPTY,
                RegionNode::branch(EmptyToFilament, 1),
                RegionNode::EMPTY,
                RegionNode::EMPTY,
                RegionNode::EMPTY,
            ],
        )
        .unwrap()
    }

    #[test]
    fn point_queries() {
        let l = sample();
        assert_eq!(l.region_type(RegionId::new(0, 0)), Border);
        assert_eq!(l.region_type(RegionId::new(1, 0)), Empty);
        assert_eq!(l.region_type(RegionId::new(0, 1)), Filament);
        assert_eq!(l.region_type(RegionId::new(3, 3)), Empty);
        assert_eq!(l.region_type(RegionId::new(100, 0)), Empty);
    }

    #[test]
    fn boundary_regions_walks_border_leaves() {
        assert_eq!(sample().boundary_regions(), [RegionId::new(0, 0)]);
        assert!(RegionLookup::empty().boundary_regions().is_empty());
    }

    #[test]
    fn visible_areas_stop_at_uniform_nodes() {
        let l = sample();
        let all = l.visible_areas(l.extent());
        assert_eq!(
            all,
            [
                (RegionArea::new(0, 0, 1, 1), Border),
                (RegionArea::new(0, 1, 1, 2), Filament),
            ]
        );
        // A query that misses the south-west quad never descends into it.
        assert!(l.visible_areas(RegionArea::new(2, 2, 4, 4)).is_empty());
        // A partial overlap returns the whole leaf area.
        let uniform = RegionLookup::from_nodes(3, vec![RegionNode::leaf(Border)]).unwrap();
        assert_eq!(
            uniform.visible_areas(RegionArea::new(1, 1, 2, 2)),
            [(RegionArea::new(0, 0, 8, 8), Border)]
        );
    }

    #[test]
    fn scanline_runs() {
        let l = sample();
        let row0: Vec<_> = l.scanline(0, 0..6).collect();
        assert_eq!(row0, [Border, Empty, Empty, Empty, Empty, Empty]);
        let row1 = l.scanline(1, 0..4);
        assert_eq!(row1.runs().collect::<Vec<_>>(), [(Filament, 1), (Empty, 3)]);
        assert!(l.scanline(9, 0..0).is_empty());
    }

    #[test]
    fn rejects_out_of_bounds_child() {
        let err = RegionLookup::from_nodes(1, vec![RegionNode::branch(Border, 1)]).unwrap_err();
        assert!(matches!(
            err,
            CorruptDataError::ChildIndexOutOfBounds { index: 0, .. }
        ));
        assert_eq!(
            RegionLookup::from_nodes(1, Vec::new()).unwrap_err(),
            CorruptDataError::EmptyNodeArray
        );
    }

    #[test]
    fn rejects_tree_deeper_than_height() {
        let mut nodes = sample().nodes().to_vec();
        nodes.truncate(9);
        let err = RegionLookup::from_nodes(1, nodes).unwrap_err();
        assert!(matches!(err, CorruptDataError::HeightInconsistent { height: 1, .. }));
    }

    #[test]
    fn rejects_cycles() {
        let nodes = vec![
            RegionNode::branch(MixedDiff, 1),
            RegionNode::branch(MixedDiff, 1),
            RegionNode::EMPTY,
            RegionNode::EMPTY,
            RegionNode::EMPTY,
        ];
        assert!(matches!(
            RegionLookup::from_nodes(4, nodes),
            Err(CorruptDataError::HeightInconsistent { .. })
        ));
    }
}
