// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use boundary_quadtree::{
    QuadtreeCompressor, RegionArea, RegionId, RegionLookup, VisitedRegionType, VisitedRegions,
};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: u32) -> u32 {
        (self.next_u64() % u64::from(n)) as u32
    }
}

/// Regions on a ring, the rest of the grid rejected: roughly what a search leaves behind.
fn ring_writes(side: u32) -> Vec<(RegionId, VisitedRegionType)> {
    let c = f64::from(side) / 2.0;
    let r = c * 0.6;
    let mut out = Vec::with_capacity((side * side) as usize);
    for y in 0..side {
        for x in 0..side {
            let d = (f64::from(x) + 0.5 - c).hypot(f64::from(y) + 0.5 - c);
            let t = if (d - r).abs() < 0.75 {
                VisitedRegionType::Border
            } else if d < r {
                VisitedRegionType::Filament
            } else {
                VisitedRegionType::Rejected
            };
            out.push((RegionId::new(x, y), t));
        }
    }
    out
}

fn random_writes(side: u32, count: usize) -> Vec<(RegionId, VisitedRegionType)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let types = [
        VisitedRegionType::Border,
        VisitedRegionType::Filament,
        VisitedRegionType::Rejected,
    ];
    (0..count)
        .map(|_| {
            let region = RegionId::new(rng.below(side), rng.below(side));
            (region, types[rng.below(3) as usize])
        })
        .collect()
}

fn accumulate(writes: &[(RegionId, VisitedRegionType)]) -> VisitedRegions {
    let mut v = VisitedRegions::new();
    for &(region, t) in writes {
        v.set_region_type(region, t);
    }
    v
}

fn bench_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("visited_writes");
    for &side in &[64_u32, 256, 1024] {
        let writes = random_writes(side, 10_000);
        group.throughput(Throughput::Elements(writes.len() as u64));
        group.bench_function(format!("random_side{side}"), |b| {
            b.iter_batched(
                VisitedRegions::new,
                |mut v| {
                    for &(region, t) in &writes {
                        v.set_region_type(region, t);
                    }
                    black_box(v.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for &side in &[128_u32, 512] {
        let visited = accumulate(&ring_writes(side));
        group.throughput(Throughput::Elements(visited.node_count() as u64));
        group.bench_function(format!("ring_side{side}"), |b| {
            b.iter(|| black_box(QuadtreeCompressor::compress(&visited).node_count()))
        });
    }
    let visited = accumulate(&random_writes(512, 20_000));
    group.bench_function("random_side512", |b| {
        b.iter(|| black_box(QuadtreeCompressor::compress(&visited).node_count()))
    });
    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    let a = QuadtreeCompressor::compress(&accumulate(&ring_writes(512)));
    let mut shifted = ring_writes(512);
    for (region, _) in &mut shifted {
        region.x = (region.x + 3) % 512;
    }
    let b_lookup = QuadtreeCompressor::compress(&accumulate(&shifted));
    group.bench_function("ring_vs_self", |b| {
        b.iter(|| black_box(QuadtreeCompressor::diff(&a, &a).node_count()))
    });
    group.bench_function("ring_vs_shifted", |b| {
        b.iter(|| black_box(QuadtreeCompressor::diff(&a, &b_lookup).node_count()))
    });
    group.bench_function("ring_vs_empty", |b| {
        b.iter(|| black_box(QuadtreeCompressor::diff(&a, &RegionLookup::empty()).node_count()))
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_queries");
    let side = 512_u32;
    let lookup = QuadtreeCompressor::compress(&accumulate(&ring_writes(side)));
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let points: Vec<_> = (0..4096)
        .map(|_| RegionId::new(rng.below(side), rng.below(side)))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("point", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for &p in &points {
                hits += usize::from(lookup.region_type(p).is_base());
            }
            black_box(hits);
        })
    });
    group.bench_function("visible_areas_quarter", |b| {
        b.iter(|| black_box(lookup.visible_areas(RegionArea::new(0, 0, side / 2, side / 2)).len()))
    });
    group.bench_function("scanline_full_rows", |b| {
        b.iter(|| {
            let mut runs = 0_usize;
            for y in (0..side).step_by(16) {
                runs += lookup.scanline(y, 0..side).runs().count();
            }
            black_box(runs);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_writes, bench_compress, bench_diff, bench_queries);
criterion_main!(benches);
