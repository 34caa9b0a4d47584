// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_map_mode::{IntPoint, IntRect, IntSize, MapMode, MapUnit, Rational};
use understory_surface::{HeadlessDevice, Region, Surface};

fn clipped_surface(rects: i64) -> Surface {
    let mut surface =
        Surface::with_device(HeadlessDevice::new(IntSize::new(1920, 1080), 96, 96));
    surface.set_map_mode(MapMode::new(MapUnit::Point));
    let clip: Region = (0..rects)
        .map(|i| IntRect::new(i * 40, i * 20, i * 40 + 30, i * 20 + 400))
        .collect();
    surface.set_clip_region(Some(&clip));
    surface
}

fn bench_prepare_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_surface/prepare_draw");

    // Steady state: every draw only checks that transform and clip are current.
    group.bench_function("steady(1000 draws)", |b| {
        let mut surface = clipped_surface(4);
        b.iter(|| {
            for i in 0..1000 {
                if let Some(ctx) = surface.prepare_draw() {
                    black_box(ctx.to_device(IntPoint::new(i, i)));
                }
            }
        });
    });

    // Origin scrolling between draws: metrics shortcut, transform rebuild and
    // clip re-realization each time.
    group.bench_function("scroll_each_draw(100 draws)", |b| {
        b.iter_batched(
            || clipped_surface(4),
            |mut surface| {
                for i in 0..100 {
                    surface.set_map_mode(
                        MapMode::new(MapUnit::Point).with_origin(IntPoint::new(-i, 0)),
                    );
                    if let Some(ctx) = surface.prepare_draw() {
                        black_box(ctx.transform());
                    }
                }
                surface
            },
            BatchSize::SmallInput,
        );
    });

    // Zoom in and back out through relative modes.
    group.bench_function("relative_zoom(100 draws)", |b| {
        let zoom_in =
            MapMode::relative(IntPoint::ZERO, Rational::new(5, 4), Rational::new(5, 4)).unwrap();
        let zoom_out =
            MapMode::relative(IntPoint::ZERO, Rational::new(4, 5), Rational::new(4, 5)).unwrap();
        b.iter_batched(
            || clipped_surface(1),
            |mut surface| {
                for i in 0..100 {
                    surface.set_map_mode(if i % 2 == 0 { zoom_in } else { zoom_out });
                    if let Some(ctx) = surface.prepare_draw() {
                        black_box(ctx.transform());
                    }
                }
                surface
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_clip_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_surface/clip");

    group.bench_function("intersect_and_realize", |b| {
        b.iter_batched(
            || clipped_surface(16),
            |mut surface| {
                for i in 0..16 {
                    surface.intersect_clip_rect(IntRect::new(i, i, 1000 - i, 600 - i));
                    surface.realize_clip();
                }
                surface
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_prepare_draw, bench_clip_mutation);
criterion_main!(benches);
