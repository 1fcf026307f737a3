// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region identifiers, quadrants, areas and classification vocabularies.

use core::fmt;

/// Integer coordinate of a unit region at the finest subdivision level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RegionId {
    /// Column, growing east.
    pub x: u32,
    /// Row, growing north.
    pub y: u32,
}

impl RegionId {
    /// Create a region identifier.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for RegionId {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// One of the four sub-cells of a node.
///
/// The ordinals are fixed: child `q` of a branch lives at `child_index + q as usize`.
/// Bit 0 of the ordinal selects the east half, bit 1 the north half.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Quadrant {
    /// South-west (low x, low y).
    SW = 0,
    /// South-east (high x, low y).
    SE = 1,
    /// North-west (low x, high y).
    NW = 2,
    /// North-east (high x, high y).
    NE = 3,
}

impl Quadrant {
    /// All quadrants in canonical order.
    pub const ALL: [Self; 4] = [Self::SW, Self::SE, Self::NW, Self::NE];

    /// Position of this quadrant within a group of four children.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Quadrant for an ordinal in `0..4`.
    #[inline]
    pub const fn from_ordinal(ordinal: usize) -> Self {
        match ordinal & 3 {
            0 => Self::SW,
            1 => Self::SE,
            2 => Self::NW,
            _ => Self::NE,
        }
    }

    /// `(x, y)` offset of this quadrant in units of the child side.
    #[inline]
    pub const fn offset(self) -> (u32, u32) {
        let o = self as u32;
        (o & 1, o >> 1)
    }

    /// Quadrant of a node at `level` that contains `region`.
    ///
    /// `level` must be at least 1; the node covers `2^level` regions per side.
    #[inline]
    pub const fn containing(region: RegionId, level: u32) -> Self {
        let shift = level - 1;
        let east = (region.x >> shift) & 1;
        let north = (region.y >> shift) & 1;
        Self::from_ordinal((east | (north << 1)) as usize)
    }
}

/// Four values stored in canonical quadrant order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Quad<T> {
    /// South-west value.
    pub sw: T,
    /// South-east value.
    pub se: T,
    /// North-west value.
    pub nw: T,
    /// North-east value.
    pub ne: T,
}

impl<T: Copy> Quad<T> {
    /// Create a quad from its four values.
    pub const fn new(sw: T, se: T, nw: T, ne: T) -> Self {
        Self { sw, se, nw, ne }
    }

    /// A quad holding the same value four times.
    pub fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    /// Build a quad from the canonical array order.
    pub fn from_array([sw, se, nw, ne]: [T; 4]) -> Self {
        Self::new(sw, se, nw, ne)
    }

    /// The values in canonical array order.
    pub fn to_array(self) -> [T; 4] {
        [self.sw, self.se, self.nw, self.ne]
    }

    /// Value in `quadrant`.
    #[inline]
    pub fn get(&self, quadrant: Quadrant) -> T {
        match quadrant {
            Quadrant::SW => self.sw,
            Quadrant::SE => self.se,
            Quadrant::NW => self.nw,
            Quadrant::NE => self.ne,
        }
    }

    /// Copy of this quad with `quadrant` replaced.
    #[inline]
    #[must_use]
    pub fn with(mut self, quadrant: Quadrant, value: T) -> Self {
        match quadrant {
            Quadrant::SW => self.sw = value,
            Quadrant::SE => self.se = value,
            Quadrant::NW => self.nw = value,
            Quadrant::NE => self.ne = value,
        }
        self
    }

    /// Apply `f` to each value.
    pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> Quad<U> {
        Quad::new(f(self.sw), f(self.se), f(self.nw), f(self.ne))
    }
}

impl<T: Copy + PartialEq> Quad<T> {
    /// The shared value when all four are equal.
    pub fn uniform(&self) -> Option<T> {
        (self.sw == self.se && self.sw == self.nw && self.sw == self.ne).then_some(self.sw)
    }
}

/// Half-open rectangle of regions: `x0 <= x < x1`, `y0 <= y < y1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RegionArea {
    /// Minimum column (inclusive).
    pub x0: u32,
    /// Minimum row (inclusive).
    pub y0: u32,
    /// Maximum column (exclusive).
    pub x1: u32,
    /// Maximum row (exclusive).
    pub y1: u32,
}

impl RegionArea {
    /// Create an area from its corners.
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Square area of `side` regions anchored at `origin`.
    pub const fn square(origin: RegionId, side: u32) -> Self {
        Self {
            x0: origin.x,
            y0: origin.y,
            x1: origin.x.saturating_add(side),
            y1: origin.y.saturating_add(side),
        }
    }

    /// Area covered by a node at `level` whose south-west region is `origin`.
    pub const fn of_node(origin: RegionId, level: u32) -> Self {
        Self::square(origin, side_of_level(level))
    }

    /// South-west region of the area.
    pub const fn origin(&self) -> RegionId {
        RegionId::new(self.x0, self.y0)
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// True if the area covers no region.
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Whether the area contains the region.
    pub const fn contains(&self, region: RegionId) -> bool {
        self.x0 <= region.x && region.x < self.x1 && self.y0 <= region.y && region.y < self.y1
    }

    /// The intersection of two areas (possibly empty).
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    /// Whether the two areas share at least one region.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Number of regions covered.
    pub fn region_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Sub-area in `quadrant` of a square area with an even (or unit) side.
    pub const fn quadrant(&self, quadrant: Quadrant) -> Self {
        let half = self.width() / 2;
        let (dx, dy) = quadrant.offset();
        Self::square(
            RegionId::new(self.x0 + dx * half, self.y0 + dy * half),
            half,
        )
    }

    /// Iterate over every region in row-major order.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| RegionId::new(x, y)))
    }
}

/// Side length, in regions, of a node at `level`.
#[inline]
pub const fn side_of_level(level: u32) -> u32 {
    1 << level
}

/// Classification recorded by the search for each region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum VisitedRegionType {
    /// Not visited yet.
    #[default]
    Unknown,
    /// The boundary passes through the region.
    Border,
    /// Near the boundary but not confidently on it.
    Filament,
    /// Confidently inside or outside the set.
    Rejected,
}

impl VisitedRegionType {
    /// Lookup vocabulary for this classification.
    pub const fn to_lookup(self) -> LookupRegionType {
        match self {
            Self::Unknown | Self::Rejected => LookupRegionType::Empty,
            Self::Border => LookupRegionType::Border,
            Self::Filament => LookupRegionType::Filament,
        }
    }
}

/// Classification stored in a compressed lookup.
///
/// The `EmptyTo*` members and [`MixedDiff`](Self::MixedDiff) summarize subtrees whose
/// descendants differ, or label regions that differ between two runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LookupRegionType {
    /// Nothing of interest.
    #[default]
    Empty,
    /// Boundary region.
    Border,
    /// Filament region.
    Filament,
    /// Ranges over empty and border regions.
    EmptyToBorder,
    /// Ranges over empty and filament regions (and possibly border ones).
    EmptyToFilament,
    /// Any mixture the other labels cannot express.
    MixedDiff,
}

impl LookupRegionType {
    /// All lookup types.
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Border,
        Self::Filament,
        Self::EmptyToBorder,
        Self::EmptyToFilament,
        Self::MixedDiff,
    ];

    /// True for `Empty`, `Border` and `Filament`.
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Empty | Self::Border | Self::Filament)
    }

    // Types as closed intervals over Empty < Border < Filament; MixedDiff has none.
    const fn span(self) -> Option<(u8, u8)> {
        match self {
            Self::Empty => Some((0, 0)),
            Self::Border => Some((1, 1)),
            Self::Filament => Some((2, 2)),
            Self::EmptyToBorder => Some((0, 1)),
            Self::EmptyToFilament => Some((0, 2)),
            Self::MixedDiff => None,
        }
    }

    const fn from_span(lo: u8, hi: u8) -> Self {
        match (lo, hi) {
            (0, 0) => Self::Empty,
            (1, 1) => Self::Border,
            (2, 2) => Self::Filament,
            (0, 1) => Self::EmptyToBorder,
            (0, 2) => Self::EmptyToFilament,
            _ => Self::MixedDiff,
        }
    }

    /// Tightest label covering both `self` and `other`.
    ///
    /// Used for pairing two runs' leaves in a diff and, folded over four
    /// children, for [`condense`](Self::condense).
    pub const fn combine(self, other: Self) -> Self {
        match (self.span(), other.span()) {
            (Some((alo, ahi)), Some((blo, bhi))) => {
                let lo = if alo < blo { alo } else { blo };
                let hi = if ahi > bhi { ahi } else { bhi };
                Self::from_span(lo, hi)
            }
            _ => Self::MixedDiff,
        }
    }

    /// Summary label for a node whose children have the given (already condensed) types.
    ///
    /// - all four equal: that type;
    /// - only empty and border: [`EmptyToBorder`](Self::EmptyToBorder);
    /// - empty reaching up to filament: [`EmptyToFilament`](Self::EmptyToFilament);
    /// - anything else: [`MixedDiff`](Self::MixedDiff).
    pub const fn condense(sw: Self, se: Self, nw: Self, ne: Self) -> Self {
        sw.combine(se).combine(nw).combine(ne)
    }

    /// [`condense`](Self::condense) over a quad.
    pub const fn condense_quad(quad: Quad<Self>) -> Self {
        Self::condense(quad.sw, quad.se, quad.nw, quad.ne)
    }
}

impl From<VisitedRegionType> for LookupRegionType {
    fn from(t: VisitedRegionType) -> Self {
        t.to_lookup()
    }
}
