// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::convert::Infallible;

use boundary_quadtree::{BoundaryParameters, QuadtreeCompressor, RegionArea, RegionId};
use boundary_search::{BoundaryCalculator, RegionClassifier, RegionVerdict, SearchSettings};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// Escape-time test on region centres with a coarse rejection test for areas outside the
/// radius-2 disk.
struct EscapeTime {
    side: f64,
}

impl EscapeTime {
    fn to_plane(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.side * 4.0 - 2.0, y / self.side * 4.0 - 2.0)
    }

    fn escapes(&self, re: f64, im: f64, max_iterations: u32) -> bool {
        let (mut zr, mut zi) = (0.0_f64, 0.0_f64);
        for _ in 0..max_iterations {
            let t = zr * zr - zi * zi + re;
            zi = 2.0 * zr * zi + im;
            zr = t;
            if zr * zr + zi * zi > 4.0 {
                return true;
            }
        }
        false
    }
}

impl RegionClassifier for EscapeTime {
    type Error = Infallible;

    fn classify(
        &self,
        params: &BoundaryParameters,
        region: RegionId,
    ) -> Result<RegionVerdict, Self::Error> {
        let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let inside = corners
            .iter()
            .filter(|(dx, dy)| {
                let (re, im) = self.to_plane(f64::from(region.x) + dx, f64::from(region.y) + dy);
                !self.escapes(re, im, params.max_iterations)
            })
            .count();
        Ok(match inside {
            0 => RegionVerdict::Rejected,
            4 => RegionVerdict::Filament,
            _ => RegionVerdict::Border,
        })
    }

    fn classify_area(
        &self,
        _: &BoundaryParameters,
        area: RegionArea,
    ) -> Result<RegionVerdict, Self::Error> {
        let (x0, y0) = self.to_plane(f64::from(area.x0), f64::from(area.y0));
        let (x1, y1) = self.to_plane(f64::from(area.x1), f64::from(area.y1));
        let nx = if x0 > 0.0 { x0 } else if x1 < 0.0 { -x1 } else { 0.0 };
        let ny = if y0 > 0.0 { y0 } else if y1 < 0.0 { -y1 } else { 0.0 };
        Ok(if nx.hypot(ny) > 2.0 {
            RegionVerdict::Rejected
        } else {
            RegionVerdict::Border
        })
    }
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for &v in &[6_u32, 8] {
        let params = BoundaryParameters::new(v, 64);
        let classifier = EscapeTime {
            side: f64::from(params.side()),
        };
        for (name, settings) in [
            ("parallel", SearchSettings::default()),
            ("serial", SearchSettings::serial()),
        ] {
            group.bench_function(format!("{name}_v{v}"), |b| {
                b.iter(|| {
                    let calc = BoundaryCalculator::new(params, &classifier).with_settings(settings);
                    let (visited, report) = calc.search().unwrap();
                    black_box((visited.node_count(), report.stats.border_regions));
                })
            });
        }
    }
    group.finish();
}

fn bench_search_and_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_compress");
    group.sample_size(10);
    let params = BoundaryParameters::new(8, 64);
    let classifier = EscapeTime {
        side: f64::from(params.side()),
    };
    group.bench_function("v8", |b| {
        b.iter(|| {
            let (visited, _) = BoundaryCalculator::new(params, &classifier).search().unwrap();
            black_box(QuadtreeCompressor::compress(&visited).node_count());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_search, bench_search_and_compress);
criterion_main!(benches);
