// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Neurogram throughput over channel and repetition counts

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hearing_periphery_model::Stimulus;
use hearing_periphery_neurogram::Neurogram;

fn bench_create(c: &mut Criterion) {
    let stimulus = match Stimulus::ramped_sine_wave(0.05, 0.06, 100_000, 2.5e-3, 5e-3, 2000.0, 60.0)
    {
        Ok(s) => s,
        Err(e) => panic!("benchmark stimulus: {}", e),
    };

    let mut group = c.benchmark_group("neurogram_create");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(5));

    for (channels, repetitions) in [(4usize, 1usize), (4, 16), (16, 4)] {
        group.throughput(Throughput::Elements((channels * repetitions) as u64));
        let id = format!("{}ch_x_{}rep", channels, repetitions);
        group.bench_with_input(BenchmarkId::from_parameter(id), &channels, |b, &n| {
            let mut ng = match Neurogram::new(n) {
                Ok(ng) => ng,
                Err(e) => panic!("neurogram: {}", e),
            };
            ng.set_bin_width(1e-4);
            b.iter(|| {
                ng.create(black_box(&stimulus), repetitions).ok();
                black_box(ng.get_output().ok().map(|m| m.sum()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create);
criterion_main!(benches);
