// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash-consing compression of a [`VisitedRegions`] into a [`RegionLookup`], and the
//! combination of two lookups into a diff.

use std::collections::HashMap;

use tracing::{info, info_span};

use crate::lookup::RegionLookup;
use crate::node::{NodeIndex, RegionNode, VisitNode};
use crate::types::{LookupRegionType, Quad, Quadrant, VisitedRegionType};
use crate::visited::VisitedRegions;

/// Builds canonical lookup trees.
///
/// Every branch is created through [`make_quad`](Self::make_quad), which returns the
/// existing node for a quad it has seen before, so structurally identical subtrees share
/// one slot. Slot 0 is reserved for the root and filled when a tree is finished.
#[derive(Debug)]
pub struct QuadtreeCompressor {
    nodes: Vec<RegionNode>,
    cache: HashMap<Quad<RegionNode>, RegionNode>,
}

impl Default for QuadtreeCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadtreeCompressor {
    /// A compressor with an empty cache.
    pub fn new() -> Self {
        Self {
            nodes: vec![RegionNode::EMPTY],
            cache: HashMap::new(),
        }
    }

    /// Number of slots allocated so far, including the root slot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The canonical node for four children.
    ///
    /// Four equal leaves are that leaf. Otherwise the cached branch for this exact quad is
    /// returned, or four consecutive slots are allocated and a branch carrying the condensed
    /// type of the children is created.
    pub fn make_quad(&mut self, children: Quad<RegionNode>) -> RegionNode {
        if let Some(node) = children.uniform()
            && node.is_leaf()
        {
            return node;
        }
        if let Some(&node) = self.cache.get(&children) {
            return node;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "lookup trees stay far below 2^28 slots"
        )]
        let first = self.nodes.len() as NodeIndex;
        self.nodes.extend(children.to_array());
        let summary = LookupRegionType::condense_quad(children.map(|n| n.region_type()));
        let node = RegionNode::branch(summary, first);
        self.cache.insert(children, node);
        node
    }

    fn finish(mut self, root: RegionNode, height: u32) -> RegionLookup {
        self.nodes[0] = root;
        RegionLookup::from_parts(height, self.nodes)
    }

    /// Compress a search accumulator.
    ///
    /// `Unknown` and `Rejected` both become `Empty`. The result is anchored at the smallest
    /// south-west subtree outside of which nothing is set, so its height may be lower than
    /// the accumulator's.
    pub fn compress(visited: &VisitedRegions) -> RegionLookup {
        let _span = info_span!("compress", visited_nodes = visited.node_count()).entered();
        let mut compressor = Self::new();
        let (node, level) = narrowed_root(visited);
        let root = compressor.compress_node(visited.nodes(), node, level);
        let lookup = compressor.finish(root, level);
        info!(
            visited_nodes = visited.node_count(),
            lookup_nodes = lookup.node_count(),
            height = lookup.height(),
            normalized_size = normalized_size(lookup.node_count(), visited.node_count()),
            "compressed visited regions"
        );
        lookup
    }

    fn compress_node(&mut self, nodes: &[VisitNode], node: VisitNode, level: u32) -> RegionNode {
        match node {
            VisitNode::Leaf(t) => RegionNode::leaf(t.to_lookup()),
            VisitNode::LeafQuad(types) => {
                self.make_quad(types.map(|t| RegionNode::leaf(t.to_lookup())))
            }
            VisitNode::Branch(child) => {
                debug_assert!(level > 1, "branch at level {level}");
                let children = Quad::from_array(Quadrant::ALL.map(|q| {
                    let child = nodes[child as usize + q.ordinal()];
                    self.compress_node(nodes, child, level - 1)
                }));
                self.make_quad(children)
            }
        }
    }

    /// Combine two lookups region by region with [`LookupRegionType::combine`].
    ///
    /// The shorter tree is padded to the taller height with its content kept in the
    /// south-west, so both trees address regions from the same origin.
    pub fn diff(left: &RegionLookup, right: &RegionLookup) -> RegionLookup {
        let _span = info_span!("diff").entered();
        let height = left.height().max(right.height());
        let mut compressor = Self::new();
        let mut memo = HashMap::new();
        let root = compressor.diff_node(
            &mut memo,
            (left.nodes(), right.nodes()),
            Cursor::root(left, height),
            Cursor::root(right, height),
        );
        let lookup = compressor.finish(root, height);
        info!(
            left_nodes = left.node_count(),
            right_nodes = right.node_count(),
            diff_nodes = lookup.node_count(),
            "combined lookups"
        );
        lookup
    }

    /// Compress `visited` and diff it against `reference`.
    pub fn diff_visited(visited: &VisitedRegions, reference: &RegionLookup) -> RegionLookup {
        Self::diff(&Self::compress(visited), reference)
    }

    fn diff_node(
        &mut self,
        memo: &mut HashMap<(Cursor, Cursor), RegionNode>,
        sources: (&[RegionNode], &[RegionNode]),
        left: Cursor,
        right: Cursor,
    ) -> RegionNode {
        if let (Some(a), Some(b)) = (left.leaf(), right.leaf()) {
            return RegionNode::leaf(a.combine(b));
        }
        if let Some(&node) = memo.get(&(left, right)) {
            return node;
        }
        let children = Quad::from_array(Quadrant::ALL.map(|q| {
            let (l, r) = (left.child(sources.0, q), right.child(sources.1, q));
            self.diff_node(memo, sources, l, r)
        }));
        let node = self.make_quad(children);
        memo.insert((left, right), node);
        node
    }
}

/// Root of the smallest south-west anchored subtree holding every border or filament.
fn narrowed_root(visited: &VisitedRegions) -> (VisitNode, u32) {
    let nodes = visited.nodes();
    let mut node = visited.root();
    let mut level = visited.height();
    while level > 1
        && let VisitNode::Branch(child) = node
    {
        let child = child as usize;
        let others_empty = Quadrant::ALL[1..]
            .iter()
            .all(|q| is_empty_subtree(nodes, nodes[child + q.ordinal()]));
        if !others_empty {
            break;
        }
        node = nodes[child];
        level -= 1;
    }
    (node, level)
}

fn is_empty_subtree(nodes: &[VisitNode], node: VisitNode) -> bool {
    let empty = |t: VisitedRegionType| t.to_lookup() == LookupRegionType::Empty;
    match node {
        VisitNode::Leaf(t) => empty(t),
        VisitNode::LeafQuad(types) => types.to_array().into_iter().all(empty),
        VisitNode::Branch(child) => {
            (0..4).all(|i| is_empty_subtree(nodes, nodes[child as usize + i]))
        }
    }
}

/// Lookup slots per accumulator slot, for logging.
fn normalized_size(lookup_nodes: usize, visited_nodes: usize) -> f64 {
    #[allow(clippy::cast_precision_loss, reason = "a ratio for logs only")]
    let ratio = lookup_nodes as f64 / visited_nodes.max(1) as f64;
    ratio
}

/// Position in a lookup during a diff, possibly above its root.
///
/// `pad` counts virtual levels above the real root; within them the real content sits in
/// the south-west and everything else is empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Cursor {
    node: RegionNode,
    pad: u32,
}

impl Cursor {
    fn root(lookup: &RegionLookup, height: u32) -> Self {
        Self::new(lookup.root(), height - lookup.height())
    }

    fn new(node: RegionNode, pad: u32) -> Self {
        // Padding around an empty tree is still empty.
        let pad = if node == RegionNode::EMPTY { 0 } else { pad };
        Self { node, pad }
    }

    fn leaf(&self) -> Option<LookupRegionType> {
        match (self.node, self.pad) {
            (RegionNode::Leaf(t), 0) => Some(t),
            _ => None,
        }
    }

    fn child(&self, nodes: &[RegionNode], quadrant: Quadrant) -> Self {
        if self.pad > 0 {
            return match quadrant {
                Quadrant::SW => Self::new(self.node, self.pad - 1),
                _ => Self::new(RegionNode::EMPTY, 0),
            };
        }
        match self.node {
            RegionNode::Leaf(_) => *self,
            RegionNode::Branch(_, child) => {
                Self::new(nodes[child as usize + quadrant.ordinal()], 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionId;
    use LookupRegionType::*;

    fn leaf(t: LookupRegionType) -> RegionNode {
        RegionNode::leaf(t)
    }

    #[test]
    fn uniform_empty_quad_is_the_canonical_leaf() {
        let mut c = QuadtreeCompressor::new();
        assert_eq!(c.make_quad(Quad::splat(RegionNode::EMPTY)), RegionNode::EMPTY);
        assert_eq!(c.make_quad(Quad::splat(leaf(Border))), leaf(Border));
        assert_eq!(c.node_count(), 1);
    }

    #[test]
    fn identical_quads_share_a_slot() {
        let mut c = QuadtreeCompressor::new();
        let q = Quad::new(leaf(Border), leaf(Empty), leaf(Empty), leaf(Empty));
        let a = c.make_quad(q);
        let b = c.make_quad(q);
        assert_eq!(a, b);
        assert_eq!(a, RegionNode::branch(EmptyToBorder, 1));
        assert_eq!(c.node_count(), 5);
        // A different arrangement gets its own slots.
        let other = c.make_quad(Quad::new(leaf(Empty), leaf(Border), leaf(Empty), leaf(Empty)));
        assert_eq!(other.child_index(), Some(5));
    }

    #[test]
    fn branch_summaries_condense_children() {
        let mut c = QuadtreeCompressor::new();
        let mixed = c.make_quad(Quad::new(leaf(Border), leaf(Filament), leaf(Border), leaf(Border)));
        assert_eq!(mixed.region_type(), MixedDiff);
        let parent = c.make_quad(Quad::new(mixed, RegionNode::EMPTY, RegionNode::EMPTY, RegionNode::EMPTY));
        assert_eq!(parent.region_type(), MixedDiff);
    }

    #[test]
    fn single_border_compresses_to_five_nodes() {
        let mut v = VisitedRegions::new();
        v.set_region_type(RegionId::new(0, 0), VisitedRegionType::Border);
        v.set_region_type(RegionId::new(1, 0), VisitedRegionType::Rejected);
        v.set_region_type(RegionId::new(0, 1), VisitedRegionType::Rejected);
        v.set_region_type(RegionId::new(1, 1), VisitedRegionType::Rejected);
        let l = QuadtreeCompressor::compress(&v);
        assert_eq!(l.node_count(), 5);
        assert_eq!(l.height(), 1);
        assert_eq!(l.root(), RegionNode::branch(EmptyToBorder, 1));
        assert_eq!(l.boundary_regions(), [RegionId::new(0, 0)]);
    }

    #[test]
    fn uniform_input_compresses_to_one_node() {
        let v = VisitedRegions::new();
        let l = QuadtreeCompressor::compress(&v);
        assert_eq!(l.node_count(), 1);
        assert_eq!(l.root(), RegionNode::EMPTY);

        let mut rejected = VisitedRegions::new();
        rejected.set_area_type(2, RegionId::new(0, 0), VisitedRegionType::Rejected);
        assert_eq!(QuadtreeCompressor::compress(&rejected).node_count(), 1);
    }

    #[test]
    fn compression_preserves_classifications() {
        let mut v = VisitedRegions::new();
        let writes = [
            ((0, 0), VisitedRegionType::Border),
            ((5, 2), VisitedRegionType::Filament),
            ((6, 7), VisitedRegionType::Border),
            ((3, 3), VisitedRegionType::Rejected),
        ];
        for ((x, y), t) in writes {
            v.set_region_type(RegionId::new(x, y), t);
        }
        let l = QuadtreeCompressor::compress(&v);
        for y in 0..8 {
            for x in 0..8 {
                let r = RegionId::new(x, y);
                assert_eq!(l.region_type(r), v.region_type(r).to_lookup(), "{r}");
            }
        }
    }

    #[test]
    fn repeated_patterns_are_shared() {
        let mut v = VisitedRegions::new();
        // The same 2x2 pattern in all sixteen level-1 blocks of an 8x8 area.
        for by in 0..4 {
            for bx in 0..4 {
                v.set_region_type(RegionId::new(bx * 2, by * 2), VisitedRegionType::Border);
                v.set_region_type(RegionId::new(bx * 2 + 1, by * 2 + 1), VisitedRegionType::Filament);
            }
        }
        let l = QuadtreeCompressor::compress(&v);
        // One slot for the root plus one quad per level.
        assert_eq!(l.node_count(), 1 + 4 * 3);
        assert!(l.node_count() < v.node_count());
    }

    #[test]
    fn narrowing_keeps_south_west_content() {
        let mut v = VisitedRegions::new();
        v.set_region_type(RegionId::new(100, 100), VisitedRegionType::Rejected);
        v.set_region_type(RegionId::new(1, 0), VisitedRegionType::Border);
        assert!(v.height() > 1);
        let l = QuadtreeCompressor::compress(&v);
        assert_eq!(l.height(), 1);
        assert_eq!(l.region_type(RegionId::new(1, 0)), Border);
        assert_eq!(l.region_type(RegionId::new(100, 100)), Empty);
    }

    fn lookup_of(writes: &[((u32, u32), VisitedRegionType)]) -> RegionLookup {
        let mut v = VisitedRegions::new();
        for &((x, y), t) in writes {
            v.set_region_type(RegionId::new(x, y), t);
        }
        QuadtreeCompressor::compress(&v)
    }

    #[test]
    fn diff_combines_region_by_region() {
        let a = lookup_of(&[((0, 0), VisitedRegionType::Border), ((1, 1), VisitedRegionType::Filament)]);
        let b = lookup_of(&[((0, 0), VisitedRegionType::Border), ((6, 6), VisitedRegionType::Border)]);
        let d = QuadtreeCompressor::diff(&a, &b);
        assert_eq!(d.height(), b.height());
        for y in 0..8 {
            for x in 0..8 {
                let r = RegionId::new(x, y);
                assert_eq!(d.region_type(r), a.region_type(r).combine(b.region_type(r)), "{r}");
            }
        }
        assert_eq!(d.region_type(RegionId::new(0, 0)), Border);
        assert_eq!(d.region_type(RegionId::new(1, 1)), EmptyToFilament);
        assert_eq!(d.region_type(RegionId::new(6, 6)), EmptyToBorder);
    }

    #[test]
    fn diff_with_itself_is_identity() {
        let a = lookup_of(&[((2, 3), VisitedRegionType::Border), ((3, 0), VisitedRegionType::Filament)]);
        let d = QuadtreeCompressor::diff(&a, &a);
        assert_eq!(d, a);
    }

    #[test]
    fn diff_against_empty_marks_everything_as_changed() {
        let mut v = VisitedRegions::new();
        v.set_region_type(RegionId::new(3, 2), VisitedRegionType::Border);
        let d = QuadtreeCompressor::diff_visited(&v, &RegionLookup::empty());
        assert_eq!(d.region_type(RegionId::new(3, 2)), EmptyToBorder);
        assert_eq!(d.region_type(RegionId::new(0, 0)), Empty);
        assert!(d.boundary_regions().is_empty());
    }
}
