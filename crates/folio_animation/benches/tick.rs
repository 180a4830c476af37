//! Scheduler tick benchmarks
//!
//! Run with: cargo bench -p folio_animation --bench tick

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use folio_animation::{AnimatedTween, AnimationScheduler, Easing, Repeat, Tween, VisualProps};
use std::hint::black_box;

fn card_tween(i: usize) -> Tween {
    Tween::new(
        VisualProps::new().with_opacity(0.0).with_translate_y(60.0),
        VisualProps::new().with_opacity(1.0).with_translate_y(0.0),
        800,
    )
    .easing(Easing::Power3Out)
    .delay((i % 8) as u32 * 50)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");

    for count in [16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let scheduler = AnimationScheduler::new();
            let mut tweens: Vec<AnimatedTween> = (0..count)
                .map(|i| {
                    AnimatedTween::new(scheduler.handle(), card_tween(i).repeat(Repeat::forever()))
                })
                .collect();
            for tween in &mut tweens {
                tween.start();
            }

            b.iter(|| black_box(scheduler.tick_by(black_box(16.0))));
        });
    }

    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let scheduler = AnimationScheduler::new();
    let mut tween = AnimatedTween::new(scheduler.handle(), card_tween(0));
    tween.start();
    scheduler.tick_by(300.0);

    c.bench_function("sample_in_flight", |b| {
        b.iter(|| black_box(tween.sample()));
    });
}

criterion_group!(benches, bench_tick, bench_sample);
criterion_main!(benches);
