use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use pdr_core::{GroundTruthPoint, InertialSample, PdrEngine};

fn synthetic_walk(n: usize) -> Vec<InertialSample> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.02;
            InertialSample {
                accx: (t * 1.3).sin() * 300.0,
                accy: (t * 0.9).cos() * 300.0,
                accz: 8192.0 + (t * 2.0 * std::f64::consts::PI).sin() * 2500.0,
                gyrox: (t * 0.4).sin() * 0.2,
                gyroy: 0.05,
                gyroz: (t * 0.7).cos() * 0.3,
                timestamp_ms: i as i64 * 20,
            }
        })
        .collect()
}

fn bench_trace(c: &mut Criterion) {
    let run = synthetic_walk(10_000);
    let engine = PdrEngine::builder()
        .with_params(1.2, 0.6)
        .with_ground_truth(vec![
            GroundTruthPoint {
                step: 0,
                x: 0.0,
                y: 0.0,
            },
            GroundTruthPoint {
                step: 1,
                x: 0.0,
                y: 50.0,
            },
            GroundTruthPoint {
                step: 2,
                x: 30.0,
                y: 50.0,
            },
        ])
        .build()
        .unwrap();

    c.bench_function("trace_10k_samples", |b| {
        b.iter(|| engine.trace(black_box(&run)))
    });
}

criterion_group!(benches, bench_trace);
criterion_main!(benches);
