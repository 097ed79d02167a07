//! Benchmarks for the piano voice and the voice pool.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use saavy_piano::{
    graph::node::{GraphNode, RenderCtx},
    synth::{PolySynth, ToneHandle, ToneMessage, ToneShape},
    voices,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;
/// C major across three octaves, the kind of spread two hands make.
const CHORD: &[f32] = &[130.81, 164.81, 196.0, 261.63, 329.63, 392.0, 523.25, 659.25];

pub fn bench_piano_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/piano_voice");
    let ctx = RenderCtx::new(SAMPLE_RATE, 261.63);
    let shape = ToneShape::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut voice = voices::piano(&shape);
        voice.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("struck", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}

pub fn bench_poly_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/poly_synth");
    let shape = ToneShape::default();
    // Long enough that no voice frees itself mid-benchmark
    let sounding = u64::MAX / 2;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for &notes in &[1usize, 8, 32] {
            let rx: VecDeque<ToneMessage> = (0..notes)
                .map(|i| ToneMessage::Play {
                    tone: ToneHandle(i as u64),
                    frequency: CHORD[i % CHORD.len()] * (1 + i / CHORD.len()) as f32,
                })
                .collect();
            let mut synth = PolySynth::new(
                SAMPLE_RATE,
                32,
                sounding,
                move || voices::piano(&shape),
                rx,
            );

            group.bench_with_input(
                BenchmarkId::new(format!("{notes}_notes"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        synth.render_block(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
