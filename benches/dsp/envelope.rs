//! Benchmarks for the exponential decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_piano::dsp::envelope::Envelope;
use saavy_piano::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::new(48_000.0, 261.63);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Fresh strike, multiplying down from peak
        let mut env = Envelope::exponential(0.5, 0.001, 1.5);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Settled at the floor
        let mut env = Envelope::exponential(0.5, 0.001, 0.001);
        env.note_on(&ctx);
        for _ in 0..200 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("floor", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
