// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_map_mode::{
    AppFont, IntPoint, MapMode, MapUnit, MappingMetrics, Rational, combine,
};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_i64(&mut self, magnitude: i64) -> i64 {
        let span = (2 * magnitude + 1) as u64;
        (u64::from(self.next_u32()) % span) as i64 - magnitude
    }
}

fn operands(count: usize, magnitude: i64, seed: u64) -> Vec<[i64; 4]> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let mut nonzero = || {
                let v = rng.gen_i64(magnitude);
                if v == 0 { 1 } else { v }
            };
            [nonzero(), nonzero(), nonzero(), nonzero()]
        })
        .collect()
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_map_mode/combine");

    // Small operands never need halving; large ones force several rounds.
    for &(label, magnitude) in &[("small", 1_000_i64), ("large", 4_000_000_000_000_i64)] {
        let ops = operands(1024, magnitude, 0xC0FF_EE00_0000_0001);
        group.bench_with_input(BenchmarkId::from_parameter(label), &ops, |b, ops| {
            b.iter(|| {
                let mut acc = Rational::ONE;
                for &[n1, n2, d1, d2] in ops {
                    acc = combine(n1, n2, d1, d2);
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_map_mode/convert");
    let mut rng = Lcg::new(0x5EED_0000_0000_0002);
    let points: Vec<IntPoint> = (0..1024)
        .map(|_| IntPoint::new(rng.gen_i64(1_000_000), rng.gen_i64(1_000_000)))
        .collect();

    for unit in [MapUnit::Pixel, MapUnit::Point, MapUnit::HundredthMm, MapUnit::Twip] {
        let mode = MapMode::new(unit).with_origin(IntPoint::new(-37, 91));
        let metrics = MappingMetrics::compute(&mode, 96, 96, AppFont::default);
        group.bench_with_input(
            BenchmarkId::new("logic_to_pixel", unit.name()),
            &points,
            |b, points| {
                b.iter(|| {
                    for &p in points {
                        black_box(metrics.logic_to_pixel(p, 96, 96));
                    }
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("pixel_to_logic", unit.name()),
            &points,
            |b, points| {
                b.iter(|| {
                    for &p in points {
                        black_box(metrics.pixel_to_logic(p, 96, 96));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_relative_chain(c: &mut Criterion) {
    let base = MappingMetrics::compute(&MapMode::new(MapUnit::TenthMm), 96, 96, AppFont::default);
    let zoom_in =
        MapMode::relative(IntPoint::new(5, -5), Rational::new(3, 2), Rational::new(3, 2)).unwrap();
    let zoom_out =
        MapMode::relative(IntPoint::new(-5, 5), Rational::new(2, 3), Rational::new(2, 3)).unwrap();

    c.bench_function("understory_map_mode/relative_chain(64)", |b| {
        b.iter(|| {
            let mut metrics = base;
            for i in 0..64 {
                let step = if i % 2 == 0 { &zoom_in } else { &zoom_out };
                metrics = metrics.compute_relative(step, 96, 96, AppFont::default);
            }
            black_box(metrics)
        });
    });
}

criterion_group!(benches, bench_combine, bench_conversion, bench_relative_chain);
criterion_main!(benches);
