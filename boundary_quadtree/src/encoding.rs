// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-width `u32` encodings of [`VisitNode`] and [`RegionNode`].
//!
//! Layouts (bit 0 is least significant):
//!
//! `VisitNode`
//! - bits 0–1: tag (`0` leaf, `1` leaf quad, `2` branch)
//! - leaf: type in bits 2–3
//! - leaf quad: 2-bit types for SW, SE, NW, NE in bits 2–9
//! - branch: child index in bits 2–31
//!
//! `RegionNode`
//! - bit 0: branch flag
//! - bits 1–3: type
//! - bits 4–31: child index (zero for leaves)
//!
//! Decoding is strict: unknown tags, unknown type codes and stray bits are rejected so
//! that corrupt input surfaces at load time.

use crate::node::{NodeIndex, RegionNode, VisitNode};
use crate::types::{LookupRegionType, Quad, VisitedRegionType};

/// Largest child index a [`VisitNode`] branch can encode.
pub const MAX_VISIT_CHILD_INDEX: NodeIndex = (1 << 30) - 1;

/// Largest child index a [`RegionNode`] branch can encode.
pub const MAX_REGION_CHILD_INDEX: NodeIndex = (1 << 28) - 1;

const VISIT_TAG_LEAF: u32 = 0;
const VISIT_TAG_QUAD: u32 = 1;
const VISIT_TAG_BRANCH: u32 = 2;

const fn visited_code(t: VisitedRegionType) -> u32 {
    match t {
        VisitedRegionType::Unknown => 0,
        VisitedRegionType::Border => 1,
        VisitedRegionType::Filament => 2,
        VisitedRegionType::Rejected => 3,
    }
}

const fn visited_from_code(code: u32) -> VisitedRegionType {
    match code & 3 {
        0 => VisitedRegionType::Unknown,
        1 => VisitedRegionType::Border,
        2 => VisitedRegionType::Filament,
        _ => VisitedRegionType::Rejected,
    }
}

const fn lookup_code(t: LookupRegionType) -> u32 {
    match t {
        LookupRegionType::Empty => 0,
        LookupRegionType::Border => 1,
        LookupRegionType::Filament => 2,
        LookupRegionType::EmptyToBorder => 3,
        LookupRegionType::EmptyToFilament => 4,
        LookupRegionType::MixedDiff => 5,
    }
}

const fn lookup_from_code(code: u32) -> Option<LookupRegionType> {
    Some(match code {
        0 => LookupRegionType::Empty,
        1 => LookupRegionType::Border,
        2 => LookupRegionType::Filament,
        3 => LookupRegionType::EmptyToBorder,
        4 => LookupRegionType::EmptyToFilament,
        5 => LookupRegionType::MixedDiff,
        _ => return None,
    })
}

impl VisitNode {
    /// Encode into the fixed-width representation.
    ///
    /// Child indices above [`MAX_VISIT_CHILD_INDEX`] do not fit and are truncated in release
    /// builds.
    pub fn to_bits(self) -> u32 {
        match self {
            Self::Leaf(t) => VISIT_TAG_LEAF | visited_code(t) << 2,
            Self::LeafQuad(q) => {
                let packed = q
                    .to_array()
                    .iter()
                    .enumerate()
                    .fold(0, |acc, (i, &t)| acc | visited_code(t) << (2 * i));
                VISIT_TAG_QUAD | packed << 2
            }
            Self::Branch(i) => {
                debug_assert!(i <= MAX_VISIT_CHILD_INDEX, "child index {i} too large");
                VISIT_TAG_BRANCH | i << 2
            }
        }
    }

    /// Decode the fixed-width representation.
    pub fn from_bits(bits: u32) -> Option<Self> {
        let payload = bits >> 2;
        match bits & 3 {
            VISIT_TAG_LEAF => (payload <= 3).then(|| Self::Leaf(visited_from_code(payload))),
            VISIT_TAG_QUAD => {
                if payload > 0xFF {
                    return None;
                }
                let quad = Quad::new(
                    visited_from_code(payload),
                    visited_from_code(payload >> 2),
                    visited_from_code(payload >> 4),
                    visited_from_code(payload >> 6),
                );
                // A uniform quad always encodes as a leaf.
                quad.uniform().is_none().then_some(Self::LeafQuad(quad))
            }
            VISIT_TAG_BRANCH => Some(Self::Branch(payload)),
            _ => None,
        }
    }
}

impl RegionNode {
    /// Encode into the fixed-width representation.
    ///
    /// Child indices above [`MAX_REGION_CHILD_INDEX`] do not fit and are truncated in release
    /// builds.
    pub fn to_bits(self) -> u32 {
        match self {
            Self::Leaf(t) => lookup_code(t) << 1,
            Self::Branch(t, i) => {
                debug_assert!(i <= MAX_REGION_CHILD_INDEX, "child index {i} too large");
                1 | lookup_code(t) << 1 | i << 4
            }
        }
    }

    /// Decode the fixed-width representation.
    pub fn from_bits(bits: u32) -> Option<Self> {
        let region_type = lookup_from_code((bits >> 1) & 7)?;
        let index = bits >> 4;
        if bits & 1 == 1 {
            Some(Self::Branch(region_type, index))
        } else {
            (index == 0).then_some(Self::Leaf(region_type))
        }
    }
}
