use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_pipeline::{FnSink, IterSource, MapTransform, PipelineBuilder};
use std::time::Duration;

/// End-to-end runs at different buffer capacities. Tight capacities force
/// the producer to block on every handoff, which is the backpressure cost
/// being measured.
fn benchmark_capacity_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity_sweep");
    for capacity in [1usize, 10, 100] {
        group.bench_function(format!("capacity_{capacity}_500_frames"), |b| {
            b.iter(|| {
                let pipeline = PipelineBuilder::new()
                    .capacity(capacity)
                    .cutoff(500)
                    .build(
                        IterSource::new("frames", 0u64..),
                        MapTransform::new("inc", |n: u64| Ok(n.wrapping_add(1))),
                        FnSink::new("drop", |n: u64| {
                            black_box(n);
                            Ok(())
                        }),
                    )
                    .expect("build failed");

                pipeline.run().expect("run failed");
            });
        });
    }
    group.finish();
}

fn benchmark_slow_consumer(c: &mut Criterion) {
    c.bench_function("slow_consumer_capacity_1", |b| {
        b.iter(|| {
            let pipeline = PipelineBuilder::new()
                .capacity(1)
                .cutoff(100)
                .build(
                    IterSource::new("frames", 0u64..),
                    MapTransform::new("inc", |n: u64| Ok(n.wrapping_add(1))),
                    FnSink::new("slow", |n: u64| {
                        black_box(n);
                        std::thread::sleep(Duration::from_micros(10));
                        Ok(())
                    }),
                )
                .expect("build failed");

            pipeline.run().expect("run failed");
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = benchmark_capacity_sweep, benchmark_slow_consumer
);
criterion_main!(benches);
