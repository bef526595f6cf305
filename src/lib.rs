//! A bounded-buffer frame pipeline for staged stream processing.
//!
//! This crate provides a fixed three-stage pipeline — source, transform,
//! sink — where adjacent stages are decoupled by fixed-capacity handoff
//! buffers with blocking `put`/`get`. A full buffer blocks the producer and
//! an empty one blocks the consumer, so backpressure is built in and no
//! frame is ever dropped, duplicated, or reordered.
//!
//! # Features
//!
//! - Blocking bounded FIFO handoff buffers (mutex + condvar, no spinning)
//! - Typed end-of-stream marker that propagates through the chain
//! - Collaborator traits for frame acquisition, transformation, and output
//! - One OS thread per stage; `run()` blocks until end-to-end termination
//! - Per-stage frame counters for diagnostics
//!
//! # Example
//!
//! ```
//! use frame_pipeline::{FnSink, IdentityTransform, IterSource, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .capacity(10)
//!     .cutoff(5)
//!     .build(
//!         IterSource::new("numbers", 0u64..),
//!         IdentityTransform::new(),
//!         FnSink::new("print", |n| {
//!             println!("{n}");
//!             Ok(())
//!         }),
//!     )
//!     .expect("valid configuration");
//!
//! let summary = pipeline.run().expect("pipeline run");
//! assert_eq!(summary.consumed, 5);
//! ```

pub mod buffer;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod stage;

// Re-exports for convenience
pub use buffer::BoundedBuffer;
pub use error::{PipelineError, Result};
pub use metrics::{MetricsSnapshot, StageMetrics};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, PipelineSummary, DEFAULT_CAPACITY};
pub use stage::{
    FnSink, FrameSink, FrameSource, FrameTransform, IdentityTransform, IterSource, MapTransform,
    Message, SinkRunner, SourceRunner, StageState, TransformRunner,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
