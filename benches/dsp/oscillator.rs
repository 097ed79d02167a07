//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_piano::dsp::oscillator::OscillatorBlock;
use saavy_piano::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::new(48_000.0, 261.63);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let shapes = [
            ("sine", OscillatorBlock::sine()),
            ("triangle", OscillatorBlock::triangle()),
            ("sawtooth", OscillatorBlock::sawtooth()),
            ("square", OscillatorBlock::square()),
        ];

        for (name, mut osc) in shapes {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
