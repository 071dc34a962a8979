//! Benchmarks for chain planning, propagation and full choreography cycles.
//!
//! Run with: cargo bench -p recents-motion

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use recents_core::{Axis, Spring, SpringParams};
use recents_layout::{TileId, TileLayout, Viewport};
use recents_motion::testing::{FRAME, RecordingSink, run_until_idle};
use recents_motion::{ChainBuilder, Choreographer, DragRelease, MotionConfig, SpringChain, link_params};

fn carousel(count: u32) -> TileLayout {
    TileLayout::uniform_carousel(
        count,
        300.0,
        500.0,
        Viewport::new(1_000.0).with_page_spacing(40.0),
    )
}

fn bench_settle_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/settle_plan");
    for count in [5, 20, 100] {
        let layout = carousel(count);
        let pivot = TileId::new(count / 2);
        group.bench_with_input(BenchmarkId::new("carousel", count), &layout, |b, layout| {
            b.iter(|| black_box(ChainBuilder::new(layout).settle_plan(pivot)))
        });
    }
    let grid = TileLayout::uniform_grid(2, 20, 300.0, 240.0, Viewport::new(1_000.0));
    group.bench_function("grid", |b| {
        b.iter(|| black_box(ChainBuilder::new(&grid).settle_plan(TileId::new(10))))
    });
    group.finish();
}

fn bench_chain_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/step");
    let params = SpringParams::new(800.0, 0.6).expect("valid parameters");
    for count in [5, 20, 100] {
        let layout = carousel(count);
        let plan = ChainBuilder::new(&layout).settle_plan(TileId::new(count / 2));
        group.bench_with_input(BenchmarkId::new("links", plan.len()), &plan, |b, plan| {
            b.iter_batched(
                || {
                    let mut chain = SpringChain::from_plan(
                        Axis::Secondary,
                        Spring::resting(params, 0.0),
                        plan,
                        |planned| Spring::resting(link_params(params, planned.offset, 0.05), 0.0),
                        |_| false,
                    );
                    chain.root_mut().launch(1_200.0);
                    chain
                },
                |mut chain| {
                    for _ in 0..60 {
                        chain.step(FRAME);
                    }
                    black_box(chain)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_dismiss_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("choreographer/dismiss_cycle");
    for count in [5, 20] {
        group.bench_function(BenchmarkId::new("carousel", count), |b| {
            b.iter_batched(
                || {
                    Choreographer::new(carousel(count), RecordingSink::new(), MotionConfig::default())
                        .expect("default config is valid")
                },
                |mut engine| {
                    engine.release(DragRelease::new(count / 2, 300.0).dismissing().with_velocity(1_500.0));
                    black_box(run_until_idle(&mut engine, 2_000))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_settle_plan, bench_chain_step, bench_dismiss_cycle);
criterion_main!(benches);
