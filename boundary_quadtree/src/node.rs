// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node values for the working tree ([`VisitNode`]) and the compressed tree ([`RegionNode`]).
//!
//! Both are plain tagged values stored in an arena and addressed by index. A branch names
//! the first of four consecutive child slots laid out in [`Quadrant`] order.
//! Raw bit layouts live in [`encoding`](crate::encoding) and are only used at the
//! persistence boundary.

use crate::types::{LookupRegionType, Quad, Quadrant, VisitedRegionType};

/// Index of a node within an arena.
pub type NodeIndex = u32;

/// Node of the search accumulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisitNode {
    /// Every region under the node has the same classification.
    Leaf(VisitedRegionType),
    /// Each quadrant is uniform, stored inline without child slots.
    LeafQuad(Quad<VisitedRegionType>),
    /// Index of the first of four children.
    Branch(NodeIndex),
}

impl Default for VisitNode {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl VisitNode {
    /// The canonical unvisited leaf.
    pub const UNKNOWN: Self = Self::Leaf(VisitedRegionType::Unknown);

    /// Uniform node.
    pub const fn leaf(region_type: VisitedRegionType) -> Self {
        Self::Leaf(region_type)
    }

    /// Non-uniform node holding four classifications inline.
    ///
    /// Four equal classifications produce the canonical [`Leaf`](Self::Leaf) instead.
    pub fn leaf_quad(
        sw: VisitedRegionType,
        se: VisitedRegionType,
        nw: VisitedRegionType,
        ne: VisitedRegionType,
    ) -> Self {
        Self::from_quad(Quad::new(sw, se, nw, ne))
    }

    /// Pointer node to four children starting at `child_index`.
    pub const fn branch(child_index: NodeIndex) -> Self {
        Self::Branch(child_index)
    }

    fn from_quad(quad: Quad<VisitedRegionType>) -> Self {
        match quad.uniform() {
            Some(t) => Self::Leaf(t),
            None => Self::LeafQuad(quad),
        }
    }

    /// True for uniform leaves.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// True for leaf quads.
    pub const fn is_leaf_quad(&self) -> bool {
        matches!(self, Self::LeafQuad(_))
    }

    /// True for branches.
    pub const fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// Classification of a uniform leaf.
    pub const fn region_type(&self) -> Option<VisitedRegionType> {
        match self {
            Self::Leaf(t) => Some(*t),
            _ => None,
        }
    }

    /// First child slot of a branch.
    pub const fn child_index(&self) -> Option<NodeIndex> {
        match self {
            Self::Branch(i) => Some(*i),
            _ => None,
        }
    }

    /// Slot of the child in `quadrant`, for branches.
    pub const fn child_index_of(&self, quadrant: Quadrant) -> Option<NodeIndex> {
        match self {
            Self::Branch(i) => Some(*i + quadrant as NodeIndex),
            _ => None,
        }
    }

    /// Classification stored for `quadrant` of a leaf or leaf quad.
    pub fn quadrant_type(&self, quadrant: Quadrant) -> Option<VisitedRegionType> {
        match self {
            Self::Leaf(t) => Some(*t),
            Self::LeafQuad(q) => Some(q.get(quadrant)),
            Self::Branch(_) => None,
        }
    }

    /// The four quadrant classifications of a leaf or leaf quad.
    pub fn quadrant_types(&self) -> Option<Quad<VisitedRegionType>> {
        match self {
            Self::Leaf(t) => Some(Quad::splat(*t)),
            Self::LeafQuad(q) => Some(*q),
            Self::Branch(_) => None,
        }
    }

    /// Copy of this node with one quadrant reclassified.
    ///
    /// A leaf is promoted to a leaf quad keeping its type in the other quadrants, and a leaf
    /// quad whose quadrants all agree collapses back to a leaf. Branches are returned unchanged;
    /// callers descend into their children instead.
    #[must_use]
    pub fn with_quadrant(self, quadrant: Quadrant, region_type: VisitedRegionType) -> Self {
        match self.quadrant_types() {
            Some(quad) => Self::from_quad(quad.with(quadrant, region_type)),
            None => {
                debug_assert!(false, "with_quadrant called on a branch");
                self
            }
        }
    }

    /// [`with_quadrant`](Self::with_quadrant) for the south-west quadrant.
    #[must_use]
    pub fn with_sw(self, region_type: VisitedRegionType) -> Self {
        self.with_quadrant(Quadrant::SW, region_type)
    }

    /// [`with_quadrant`](Self::with_quadrant) for the south-east quadrant.
    #[must_use]
    pub fn with_se(self, region_type: VisitedRegionType) -> Self {
        self.with_quadrant(Quadrant::SE, region_type)
    }

    /// [`with_quadrant`](Self::with_quadrant) for the north-west quadrant.
    #[must_use]
    pub fn with_nw(self, region_type: VisitedRegionType) -> Self {
        self.with_quadrant(Quadrant::NW, region_type)
    }

    /// [`with_quadrant`](Self::with_quadrant) for the north-east quadrant.
    #[must_use]
    pub fn with_ne(self, region_type: VisitedRegionType) -> Self {
        self.with_quadrant(Quadrant::NE, region_type)
    }
}

/// Node of a compressed [`RegionLookup`](crate::RegionLookup).
///
/// Branches carry the condensed type of their whole subtree so queries can stop early.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionNode {
    /// Every region under the node has this type.
    Leaf(LookupRegionType),
    /// Summary type and the index of the first of four children.
    Branch(LookupRegionType, NodeIndex),
}

impl Default for RegionNode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RegionNode {
    /// The canonical empty leaf.
    pub const EMPTY: Self = Self::Leaf(LookupRegionType::Empty);

    /// Uniform node.
    pub const fn leaf(region_type: LookupRegionType) -> Self {
        Self::Leaf(region_type)
    }

    /// Branch with a summary type.
    pub const fn branch(region_type: LookupRegionType, child_index: NodeIndex) -> Self {
        Self::Branch(region_type, child_index)
    }

    /// True for uniform leaves.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Leaf type, or the condensed summary of a branch.
    pub const fn region_type(&self) -> LookupRegionType {
        match self {
            Self::Leaf(t) | Self::Branch(t, _) => *t,
        }
    }

    /// First child slot of a branch.
    pub const fn child_index(&self) -> Option<NodeIndex> {
        match self {
            Self::Branch(_, i) => Some(*i),
            Self::Leaf(_) => None,
        }
    }

    /// Slot of the child in `quadrant`, for branches.
    pub const fn child_index_of(&self, quadrant: Quadrant) -> Option<NodeIndex> {
        match self {
            Self::Branch(_, i) => Some(*i + quadrant as NodeIndex),
            Self::Leaf(_) => None,
        }
    }
}
