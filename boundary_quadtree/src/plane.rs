// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between region coordinates and the complex plane.

use kurbo::{Point, Rect};

use crate::lookup::RegionLookup;
use crate::types::{LookupRegionType, RegionArea, RegionId, side_of_level};

/// Places the region grid on the complex plane.
///
/// Region `(0, 0)` has its lower-left corner at `origin`, and the whole grid of
/// `2^vertical_power` regions per side spans `side` plane units. The x axis is the real
/// part and y the imaginary part, both increasing with region coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapping {
    /// Plane position of the south-west corner of region `(0, 0)`.
    pub origin: Point,
    /// Side length of the whole grid in plane units.
    pub side: f64,
    /// Log2 of the number of regions per side.
    pub vertical_power: u32,
}

impl Default for PlaneMapping {
    fn default() -> Self {
        Self::new(8)
    }
}

impl PlaneMapping {
    /// Mapping of `[-2, 2] × [-2, 2]` onto a grid of `2^vertical_power` regions per side.
    pub fn new(vertical_power: u32) -> Self {
        Self {
            origin: Point::new(-2.0, -2.0),
            side: 4.0,
            vertical_power,
        }
    }

    /// Regions per side.
    pub fn regions_per_side(&self) -> u32 {
        side_of_level(self.vertical_power)
    }

    /// Side of one region in plane units.
    pub fn region_side(&self) -> f64 {
        self.side / f64::from(self.regions_per_side())
    }

    /// Plane rectangle covered by a region.
    pub fn region_rect(&self, region: RegionId) -> Rect {
        self.area_rect(RegionArea::square(region, 1))
    }

    /// Plane rectangle covered by an area.
    pub fn area_rect(&self, area: RegionArea) -> Rect {
        let s = self.region_side();
        Rect::new(
            self.origin.x + f64::from(area.x0) * s,
            self.origin.y + f64::from(area.y0) * s,
            self.origin.x + f64::from(area.x1) * s,
            self.origin.y + f64::from(area.y1) * s,
        )
    }

    /// Plane position of the centre of a region.
    pub fn region_center(&self, region: RegionId) -> Point {
        self.region_rect(region).center()
    }

    /// Smallest area of regions covering `rect`, clipped to the grid.
    pub fn area_covering(&self, rect: Rect) -> RegionArea {
        let rect = rect.abs();
        let s = self.region_side();
        let max = self.regions_per_side();
        let column = |v: f64| to_region(v, max);
        RegionArea::new(
            column(((rect.x0 - self.origin.x) / s).floor()),
            column(((rect.y0 - self.origin.y) / s).floor()),
            column(((rect.x1 - self.origin.x) / s).ceil()),
            column(((rect.y1 - self.origin.y) / s).ceil()),
        )
    }
}

fn to_region(v: f64, max: u32) -> u32 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, f64::from(max)) };
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to [0, max] above"
    )]
    let r = v as u32;
    r
}

impl RegionLookup {
    /// [`visible_areas`](Self::visible_areas) in plane coordinates.
    pub fn visible_rects(
        &self,
        mapping: &PlaneMapping,
        viewport: Rect,
    ) -> Vec<(Rect, LookupRegionType)> {
        self.visible_areas(mapping.area_covering(viewport))
            .into_iter()
            .map(|(area, t)| (mapping.area_rect(area), t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RegionNode;

    #[test]
    fn default_covers_the_classic_square() {
        let m = PlaneMapping::new(2);
        assert_eq!(m.region_side(), 1.0);
        assert_eq!(m.region_rect(RegionId::new(0, 0)), Rect::new(-2.0, -2.0, -1.0, -1.0));
        assert_eq!(m.region_center(RegionId::new(3, 3)), Point::new(1.5, 1.5));
        assert_eq!(
            m.area_rect(RegionArea::new(0, 0, 4, 4)),
            Rect::new(-2.0, -2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn covering_area_rounds_outward_and_clips() {
        let m = PlaneMapping::new(2);
        assert_eq!(
            m.area_covering(Rect::new(-1.5, -0.5, 0.5, 0.5)),
            RegionArea::new(0, 1, 3, 3)
        );
        assert_eq!(
            m.area_covering(Rect::new(-10.0, -10.0, 10.0, 10.0)),
            RegionArea::new(0, 0, 4, 4)
        );
        assert!(m.area_covering(Rect::new(5.0, 5.0, 6.0, 6.0)).is_empty());
    }

    #[test]
    fn visible_rects_follow_area_query() {
        let lookup = RegionLookup::from_nodes(
            1,
            vec![
                RegionNode::branch(LookupRegionType::EmptyToBorder, 1),
                RegionNode::leaf(LookupRegionType::Border),
                RegionNode::EMPTY,
                RegionNode::EMPTY,
                RegionNode::EMPTY,
            ],
        )
        .unwrap();
        let m = PlaneMapping::new(1);
        let rects = lookup.visible_rects(&m, Rect::new(-2.0, -2.0, 2.0, 2.0));
        assert_eq!(
            rects,
            [(Rect::new(-2.0, -2.0, 0.0, 0.0), LookupRegionType::Border)]
        );
        assert!(lookup.visible_rects(&m, Rect::new(0.5, 0.5, 1.0, 1.0)).is_empty());
    }
}
