use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_pipeline::{BoundedBuffer, FnSink, IdentityTransform, IterSource, PipelineBuilder};
use std::time::Duration;

fn benchmark_buffer_handoff(c: &mut Criterion) {
    c.bench_function("buffer_put_get_1000", |b| {
        b.iter(|| {
            let buffer = BoundedBuffer::new(1000).expect("capacity");
            for i in 0..1000u64 {
                buffer.put(black_box(i));
            }
            for _ in 0..1000 {
                black_box(buffer.get());
            }
        });
    });
}

fn benchmark_pipeline_throughput(c: &mut Criterion) {
    c.bench_function("pipeline_1000_frames", |b| {
        b.iter(|| {
            let pipeline = PipelineBuilder::new()
                .capacity(100)
                .cutoff(1000)
                .build(
                    IterSource::new("frames", (0u64..).map(|i| vec![i as u8; 64])),
                    IdentityTransform::new(),
                    FnSink::new("drop", |frame: Vec<u8>| {
                        black_box(frame);
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
    targets = benchmark_buffer_handoff, benchmark_pipeline_throughput
);
criterion_main!(benches);
