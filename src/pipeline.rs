use crate::buffer::BoundedBuffer;
use crate::error::{PipelineError, Result};
use crate::metrics::StageMetrics;
use crate::stage::{FrameSink, FrameSource, FrameTransform, SinkRunner, SourceRunner, TransformRunner};
use log::debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::spawn;

/// Default capacity for both handoff buffers
pub const DEFAULT_CAPACITY: usize = 10;

/// Configuration for a three-stage pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capacity of each handoff buffer (must be at least 1)
    pub capacity: usize,
    /// Maximum number of frames the source stage emits; `None` runs the
    /// source until it is exhausted
    pub cutoff: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            cutoff: None,
        }
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Start from an explicit configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Set the capacity of both handoff buffers
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Cap the number of frames the source stage emits
    pub fn cutoff(mut self, max_frames: u64) -> Self {
        self.config.cutoff = Some(max_frames);
        self
    }

    /// Wire source -> buffer -> transform -> buffer -> sink.
    ///
    /// Both buffers are allocated here; a zero capacity is rejected with
    /// [`PipelineError::InvalidCapacity`].
    pub fn build<S, X, K>(self, source: S, transform: X, sink: K) -> Result<Pipeline<S, X, K>>
    where
        S: FrameSource,
        X: FrameTransform<Input = S::Frame>,
        K: FrameSink<Frame = X::Output>,
    {
        let raw = BoundedBuffer::new(self.config.capacity)?;
        let transformed = BoundedBuffer::new(self.config.capacity)?;

        Ok(Pipeline {
            source: SourceRunner::new(source, raw.clone(), self.config.cutoff),
            transform: TransformRunner::new(transform, raw, transformed.clone()),
            sink: SinkRunner::new(sink, transformed),
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed three-stage pipeline: source -> transform -> sink, decoupled by
/// two bounded handoff buffers.
///
/// The pipeline owns its buffers and stage runners from construction until
/// [`run`](Pipeline::run) returns.
pub struct Pipeline<S, X, K>
where
    S: FrameSource,
    X: FrameTransform<Input = S::Frame>,
    K: FrameSink<Frame = X::Output>,
{
    source: SourceRunner<S>,
    transform: TransformRunner<X>,
    sink: SinkRunner<K>,
}

impl<S, X, K> Pipeline<S, X, K>
where
    S: FrameSource,
    X: FrameTransform<Input = S::Frame>,
    K: FrameSink<Frame = X::Output>,
{
    /// Get the quit flag shared with the sink stage. Setting it makes the
    /// sink stop consuming while still draining to end-of-stream, so the
    /// pipeline winds down promptly instead of stalling upstream stages.
    pub fn quit_signal(&self) -> Arc<AtomicBool> {
        self.sink.quit_signal()
    }

    /// Shared handle to the source stage's frame counter
    pub fn source_metrics(&self) -> StageMetrics {
        self.source.metrics()
    }

    /// Shared handle to the transform stage's frame counter
    pub fn transform_metrics(&self) -> StageMetrics {
        self.transform.metrics()
    }

    /// Shared handle to the sink stage's frame counter
    pub fn sink_metrics(&self) -> StageMetrics {
        self.sink.metrics()
    }

    /// Run the pipeline to completion.
    ///
    /// Spawns one thread per stage and blocks until all three have
    /// finished, which under normal operation means the sink has observed
    /// end-of-stream. Returns per-stage frame counts, or the first stage
    /// error.
    ///
    /// There is deliberately no timeout: if a collaborator blocks forever,
    /// so does `run`.
    pub fn run(self) -> Result<PipelineSummary> {
        let Pipeline {
            mut source,
            mut transform,
            mut sink,
        } = self;

        let source_metrics = source.metrics();
        let transform_metrics = transform.metrics();
        let sink_metrics = sink.metrics();

        debug!("pipeline started");
        let handles = [
            spawn(move || source.run()),
            spawn(move || transform.run()),
            spawn(move || sink.run()),
        ];

        let mut first_error = None;
        for handle in handles {
            let outcome = handle
                .join()
                .map_err(|_| PipelineError::ThreadError("join failed".into()));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(stage_error)) => {
                    first_error.get_or_insert(stage_error);
                }
                Err(join_error) => {
                    first_error.get_or_insert(join_error);
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        let summary = PipelineSummary {
            produced: source_metrics.total_processed(),
            transformed: transform_metrics.total_processed(),
            consumed: sink_metrics.total_processed(),
        };
        debug!(
            "pipeline finished: produced {}, transformed {}, consumed {}",
            summary.produced, summary.transformed, summary.consumed
        );
        Ok(summary)
    }
}

/// Per-stage frame counts reported after a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Frames emitted by the source stage
    pub produced: u64,
    /// Frames transformed by the middle stage
    pub transformed: u64,
    /// Frames handed to the sink collaborator
    pub consumed: u64,
}
