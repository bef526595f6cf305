use frame_pipeline::{
    FnSink, IdentityTransform, IterSource, MapTransform, PipelineBuilder, PipelineError,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// A sink that appends every consumed frame to a shared vector.
fn collecting_sink<T: Send + 'static>(
    seen: &Arc<Mutex<Vec<T>>>,
) -> FnSink<T, impl FnMut(T) -> frame_pipeline::Result<()>> {
    let seen = Arc::clone(seen);
    FnSink::new("collect", move |frame| {
        seen.lock().push(frame);
        Ok(())
    })
}

#[test]
fn test_end_to_end_in_order_capacity_one() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pipeline = PipelineBuilder::new()
        .capacity(1)
        .build(
            IterSource::new("nums", [1, 2, 3].into_iter()),
            IdentityTransform::new(),
            collecting_sink(&seen),
        )
        .expect("pipeline build failed");

    let summary = pipeline.run().expect("pipeline run failed");

    assert_eq!(*seen.lock(), vec![1, 2, 3]);
    assert_eq!(summary.produced, 3);
    assert_eq!(summary.transformed, 3);
    assert_eq!(summary.consumed, 3);
}

#[test]
fn test_identity_round_trip_across_capacities() {
    for capacity in [1, 2, 10] {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let pipeline = PipelineBuilder::new()
            .capacity(capacity)
            .build(
                IterSource::new("nums", 0..100),
                IdentityTransform::new(),
                collecting_sink(&seen),
            )
            .expect("pipeline build failed");

        pipeline.run().expect("pipeline run failed");

        // No drops, no duplicates, no reordering.
        let expected: Vec<i32> = (0..100).collect();
        assert_eq!(*seen.lock(), expected, "capacity {capacity}");
    }
}

#[test]
fn test_cutoff_limits_unbounded_source() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pipeline = PipelineBuilder::new()
        .cutoff(5)
        .build(
            IterSource::new("endless", 0u64..),
            IdentityTransform::new(),
            collecting_sink(&seen),
        )
        .expect("pipeline build failed");

    let summary = pipeline.run().expect("pipeline run failed");

    assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    assert_eq!(summary.consumed, 5);
}

#[test]
fn test_transform_applied_in_source_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pipeline = PipelineBuilder::new()
        .capacity(2)
        .build(
            IterSource::new("nums", 0..50),
            MapTransform::new("double", |n: i32| Ok(n * 2)),
            collecting_sink(&seen),
        )
        .expect("pipeline build failed");

    pipeline.run().expect("pipeline run failed");

    let expected: Vec<i32> = (0..50).map(|n| n * 2).collect();
    assert_eq!(*seen.lock(), expected);
}

#[test]
fn test_heterogeneous_frame_types() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pipeline = PipelineBuilder::new()
        .build(
            IterSource::new(
                "words",
                ["a", "bc", "def"].into_iter().map(String::from),
            ),
            MapTransform::new("len", |word: String| Ok(word.len())),
            collecting_sink(&seen),
        )
        .expect("pipeline build failed");

    pipeline.run().expect("pipeline run failed");

    assert_eq!(*seen.lock(), vec![1, 2, 3]);
}

#[test]
fn test_sink_error_propagates_out_of_run() {
    let pipeline = PipelineBuilder::new()
        .build(
            IterSource::new("nums", 0..3),
            IdentityTransform::new(),
            FnSink::new("broken", |_: i32| {
                Err(PipelineError::Sink("display gone".into()))
            }),
        )
        .expect("pipeline build failed");

    let result = pipeline.run();
    assert!(matches!(result, Err(PipelineError::Sink(_))));
}

#[test]
fn test_quit_signal_terminates_without_consuming() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let pipeline = PipelineBuilder::new()
        .cutoff(20)
        .build(
            IterSource::new("endless", 0u64..),
            IdentityTransform::new(),
            collecting_sink(&seen),
        )
        .expect("pipeline build failed");

    // Quit before the first frame arrives: everything drains, nothing is
    // handed to the sink, and the pipeline still terminates.
    pipeline
        .quit_signal()
        .store(true, std::sync::atomic::Ordering::Relaxed);

    let summary = pipeline.run().expect("pipeline run failed");

    assert!(seen.lock().is_empty());
    assert_eq!(summary.produced, 20);
    assert_eq!(summary.consumed, 0);
}

#[test]
fn test_finite_source_always_terminates() {
    // Deadlock-freedom smoke test: tight capacity, many frames, a slow
    // sink. A correctly terminated source must still drive the pipeline
    // to completion.
    let pipeline = PipelineBuilder::new()
        .capacity(1)
        .build(
            IterSource::new("nums", 0..200),
            MapTransform::new("inc", |n: i32| Ok(n + 1)),
            FnSink::new("slow", |_: i32| {
                std::thread::sleep(std::time::Duration::from_micros(50));
                Ok(())
            }),
        )
        .expect("pipeline build failed");

    let summary = pipeline.run().expect("pipeline run failed");
    assert_eq!(summary.consumed, 200);
}

#[test]
fn test_metrics_observable_during_run() {
    let pipeline = PipelineBuilder::new()
        .build(
            IterSource::new("nums", 0..10),
            IdentityTransform::new(),
            FnSink::new("drop", |_: i32| Ok(())),
        )
        .expect("pipeline build failed");

    let sink_metrics = pipeline.sink_metrics();
    pipeline.run().expect("pipeline run failed");

    assert_eq!(sink_metrics.total_processed(), 10);
    assert!(sink_metrics.snapshot().throughput_fps > 0.0);
}
