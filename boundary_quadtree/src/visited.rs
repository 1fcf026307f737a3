// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutable search accumulator.

use core::fmt;

use tracing::{debug, warn};

use crate::node::{NodeIndex, VisitNode};
use crate::types::{Quad, Quadrant, RegionId, VisitedRegionType, side_of_level};

/// Tallest tree supported; coordinates must stay below `2^MAX_HEIGHT`.
pub const MAX_HEIGHT: u32 = 31;

/// Working quadtree of region classifications, grown lazily in depth and breadth.
///
/// Node 0 is always the root, which covers `[0, 2^height)` in both axes.
/// Nodes at level 1 hold their four unit regions inline, so unit regions never
/// occupy a slot of their own.
///
/// All mutation goes through one owner; the search calls in from a single
/// coordinating thread even when classification runs in parallel.
#[derive(Clone)]
pub struct VisitedRegions {
    nodes: Vec<VisitNode>,
    height: u32,
}

impl fmt::Debug for VisitedRegions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitedRegions")
            .field("height", &self.height)
            .field("node_count", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl Default for VisitedRegions {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitedRegions {
    /// Create an accumulator whose root is a branch over four unvisited leaves.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an accumulator with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(5));
        nodes.push(VisitNode::branch(1));
        nodes.extend([VisitNode::UNKNOWN; 4]);
        Self { nodes, height: 2 }
    }

    /// Current height; the root covers `2^height` regions per side.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of node slots allocated so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node slots; index 0 is the root.
    pub fn nodes(&self) -> &[VisitNode] {
        &self.nodes
    }

    /// The root node.
    pub fn root(&self) -> VisitNode {
        self.nodes[0]
    }

    /// Whether `region` lies inside the current extent.
    pub fn contains(&self, region: RegionId) -> bool {
        let side = side_of_level(self.height);
        region.x < side && region.y < side
    }

    /// Record the classification of a single region.
    ///
    /// Coordinates outside the current extent grow the tree first. Returns `false`, writing
    /// nothing, for coordinates at or beyond `2^MAX_HEIGHT`.
    pub fn set_region_type(&mut self, region: RegionId, region_type: VisitedRegionType) -> bool {
        self.set_area_type(0, region, region_type)
    }

    /// Record a uniform classification for the aligned block at `level` containing `origin`.
    ///
    /// Level 0 is a single region. Anything previously recorded inside the block is replaced.
    /// A block at or above the current height covers the whole tree and becomes the root.
    ///
    /// Returns `false`, writing nothing, when `level` exceeds [`MAX_HEIGHT`] or `origin` lies
    /// at or beyond `2^MAX_HEIGHT` in either axis.
    ///
    /// Slots of a replaced branch stay allocated and are still counted by
    /// [`node_count`](Self::node_count), though nothing reaches them. Replacing the root
    /// releases every slot.
    pub fn set_area_type(
        &mut self,
        level: u32,
        origin: RegionId,
        region_type: VisitedRegionType,
    ) -> bool {
        if level > MAX_HEIGHT || origin.x >> MAX_HEIGHT != 0 || origin.y >> MAX_HEIGHT != 0 {
            warn!(level, %origin, "ignored write beyond the maximum height");
            return false;
        }
        while !self.contains(origin) {
            self.grow();
        }
        if level >= self.height {
            self.nodes.truncate(1);
            self.nodes[0] = VisitNode::leaf(region_type);
            self.height = level;
            return true;
        }

        let mut index = 0_usize;
        let mut node_level = self.height;
        loop {
            let quadrant = Quadrant::containing(origin, node_level);
            let node = self.nodes[index];
            if node_level == level + 1 {
                // The target is a quadrant of this node.
                match node {
                    VisitNode::Branch(child) => {
                        let slot = child as usize + quadrant.ordinal();
                        self.nodes[slot] = VisitNode::leaf(region_type);
                    }
                    _ => {
                        self.nodes[index] = node.with_quadrant(quadrant, region_type);
                    }
                }
                return true;
            }
            let child = match node {
                VisitNode::Branch(child) => child,
                _ => {
                    // The quadrant types are known to be present for non-branches.
                    let types = node.quadrant_types().unwrap_or_default();
                    if types.get(quadrant) == region_type {
                        // Already uniform at the requested type.
                        return true;
                    }
                    self.subdivide(index, types)
                }
            };
            index = child as usize + quadrant.ordinal();
            node_level -= 1;
        }
    }

    /// Classification of a single region; regions outside the extent are `Unknown`.
    pub fn region_type(&self, region: RegionId) -> VisitedRegionType {
        if !self.contains(region) {
            return VisitedRegionType::Unknown;
        }
        let mut node = self.nodes[0];
        let mut level = self.height;
        loop {
            let quadrant = Quadrant::containing(region, level);
            match node {
                VisitNode::Branch(child) => {
                    node = self.nodes[child as usize + quadrant.ordinal()];
                    level -= 1;
                }
                other => return other.quadrant_type(quadrant).unwrap_or_default(),
            }
        }
    }

    /// Lazily enumerate every region classified as [`Border`](VisitedRegionType::Border).
    ///
    /// Regions are produced depth-first in quadrant order. The iterator is single-pass.
    pub fn boundary_regions(&self) -> BoundaryRegions<'_> {
        BoundaryRegions {
            nodes: &self.nodes,
            stack: vec![Frame::Node {
                node: self.nodes[0],
                level: self.height,
                origin: RegionId::new(0, 0),
            }],
        }
    }

    /// Replace the leaf at `index` with a branch over four children carrying `types`.
    fn subdivide(&mut self, index: usize, types: Quad<VisitedRegionType>) -> NodeIndex {
        let child = self.allocate_quad(types.map(VisitNode::leaf));
        self.nodes[index] = VisitNode::branch(child);
        child
    }

    fn allocate_quad(&mut self, children: Quad<VisitNode>) -> NodeIndex {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Node arenas are addressed with 32-bit indices."
        )]
        let first = self.nodes.len() as NodeIndex;
        self.nodes.extend(children.to_array());
        first
    }

    /// Add a level on top: the old root becomes the south-west child of a new root.
    fn grow(&mut self) {
        let old_root = self.nodes[0];
        let child = self.allocate_quad(Quad::new(
            old_root,
            VisitNode::UNKNOWN,
            VisitNode::UNKNOWN,
            VisitNode::UNKNOWN,
        ));
        self.nodes[0] = VisitNode::branch(child);
        self.height += 1;
        debug!(height = self.height, nodes = self.nodes.len(), "grew visited regions");
    }
}

#[derive(Copy, Clone, Debug)]
enum Frame {
    Node {
        node: VisitNode,
        level: u32,
        origin: RegionId,
    },
    /// Remaining regions of a uniform border block, row-major from `next`.
    Block {
        origin: RegionId,
        side: u32,
        next: u64,
    },
}

/// Iterator over border regions returned by [`VisitedRegions::boundary_regions`].
#[derive(Clone, Debug)]
pub struct BoundaryRegions<'a> {
    nodes: &'a [VisitNode],
    stack: Vec<Frame>,
}

impl BoundaryRegions<'_> {
    fn push_children(&mut self, quad: Quad<Frame>) {
        // Reverse so SW pops first.
        for frame in quad.to_array().into_iter().rev() {
            self.stack.push(frame);
        }
    }
}

impl Iterator for BoundaryRegions<'_> {
    type Item = RegionId;

    fn next(&mut self) -> Option<RegionId> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Block { origin, side, next } => {
                    let total = u64::from(side) * u64::from(side);
                    if next + 1 < total {
                        self.stack.push(Frame::Block {
                            origin,
                            side,
                            next: next + 1,
                        });
                    }
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "Offsets are below the block side, which fits in u32."
                    )]
                    let (dx, dy) = ((next % u64::from(side)) as u32, (next / u64::from(side)) as u32);
                    return Some(RegionId::new(origin.x + dx, origin.y + dy));
                }
                Frame::Node {
                    node,
                    level,
                    origin,
                } => {
                    let child_side = side_of_level(level - 1);
                    let child_origin = |q: Quadrant| {
                        let (dx, dy) = q.offset();
                        RegionId::new(origin.x + dx * child_side, origin.y + dy * child_side)
                    };
                    match node {
                        VisitNode::Branch(child) => {
                            let frames = Quad::from_array(Quadrant::ALL).map(|q| Frame::Node {
                                node: self.nodes[child as usize + q.ordinal()],
                                level: level - 1,
                                origin: child_origin(q),
                            });
                            self.push_children(frames);
                        }
                        VisitNode::Leaf(VisitedRegionType::Border) => {
                            self.stack.push(Frame::Block {
                                origin,
                                side: side_of_level(level),
                                next: 0,
                            });
                        }
                        VisitNode::LeafQuad(types) => {
                            for q in Quadrant::ALL.into_iter().rev() {
                                if types.get(q) == VisitedRegionType::Border {
                                    self.stack.push(Frame::Block {
                                        origin: child_origin(q),
                                        side: child_side,
                                        next: 0,
                                    });
                                }
                            }
                        }
                        VisitNode::Leaf(_) => {}
                    }
                }
            }
        }
        None
    }
}
