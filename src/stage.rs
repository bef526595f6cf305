use crate::buffer::BoundedBuffer;
use crate::error::Result;
use crate::metrics::StageMetrics;
use log::{debug, trace};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An item travelling through a handoff buffer.
///
/// The end-of-stream marker is a variant rather than an in-band sentinel
/// value, so a payload can never be mistaken for it: stages classify by
/// matching on the variant, strictly before touching the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<T> {
    /// A frame to be processed
    Frame(T),
    /// No further frames will arrive on this buffer
    EndOfStream,
}

/// Lifecycle of a stage runner
///
/// `Running` while frames are flowing, `Draining` while the end-of-stream
/// marker is being handed off, `Terminated` once the stage has finished.
/// There are no transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Running,
    Draining,
    Terminated,
}

/// Produces the frames entering the pipeline
pub trait FrameSource: Send + 'static {
    /// The frame type this source yields
    type Frame: Send + 'static;

    /// Yield the next frame, or `None` once the source is exhausted.
    /// An `Err` aborts the source stage.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Get a human-readable name for this source
    fn name(&self) -> &str {
        "source"
    }
}

/// Transforms each frame in the middle of the pipeline
///
/// Expected to be pure and synchronous; the pipeline never retries a
/// failed transform.
pub trait FrameTransform: Send + 'static {
    /// The frame type consumed
    type Input: Send + 'static;
    /// The frame type produced
    type Output: Send + 'static;

    /// Transform one frame. An `Err` aborts the transform stage.
    fn transform(&mut self, frame: Self::Input) -> Result<Self::Output>;

    /// Get a human-readable name for this transform
    fn name(&self) -> &str {
        "transform"
    }
}

/// Consumes the transformed frames at the end of the pipeline
pub trait FrameSink: Send + 'static {
    /// The frame type consumed
    type Frame: Send + 'static;

    /// Consume one frame (render, write, ...). An `Err` aborts the sink
    /// stage.
    fn consume(&mut self, frame: Self::Frame) -> Result<()>;

    /// Get a human-readable name for this sink
    fn name(&self) -> &str {
        "sink"
    }
}

/// A source backed by any iterator
#[derive(Debug)]
pub struct IterSource<I> {
    name: String,
    iter: I,
}

impl<I> IterSource<I> {
    /// Create a source yielding the iterator's items in order
    pub fn new(name: impl Into<String>, iter: I) -> Self {
        Self {
            name: name.into(),
            iter,
        }
    }
}

impl<I> FrameSource for IterSource<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    type Frame = I::Item;

    fn next_frame(&mut self) -> Result<Option<I::Item>> {
        Ok(self.iter.next())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A transform that applies a function to each frame
pub struct MapTransform<T, U, F>
where
    F: FnMut(T) -> Result<U>,
{
    name: String,
    mapper: F,
    _marker: PhantomData<fn(T) -> U>,
}

impl<T, U, F> MapTransform<T, U, F>
where
    F: FnMut(T) -> Result<U>,
{
    /// Create a new map transform
    pub fn new(name: impl Into<String>, mapper: F) -> Self {
        Self {
            name: name.into(),
            mapper,
            _marker: PhantomData,
        }
    }
}

impl<T, U, F> FrameTransform for MapTransform<T, U, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Result<U> + Send + 'static,
{
    type Input = T;
    type Output = U;

    fn transform(&mut self, frame: T) -> Result<U> {
        (self.mapper)(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A transform that passes every frame through unchanged
#[derive(Debug)]
pub struct IdentityTransform<T> {
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> IdentityTransform<T> {
    /// Create a new identity transform
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for IdentityTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> FrameTransform for IdentityTransform<T> {
    type Input = T;
    type Output = T;

    fn transform(&mut self, frame: T) -> Result<T> {
        Ok(frame)
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// A sink that hands each frame to a function
pub struct FnSink<T, F>
where
    F: FnMut(T) -> Result<()>,
{
    name: String,
    consumer: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> FnSink<T, F>
where
    F: FnMut(T) -> Result<()>,
{
    /// Create a new function sink
    pub fn new(name: impl Into<String>, consumer: F) -> Self {
        Self {
            name: name.into(),
            consumer,
            _marker: PhantomData,
        }
    }
}

impl<T, F> FrameSink for FnSink<T, F>
where
    T: Send + 'static,
    F: FnMut(T) -> Result<()> + Send + 'static,
{
    type Frame = T;

    fn consume(&mut self, frame: T) -> Result<()> {
        (self.consumer)(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Runs the upstream stage: pull frames from the source collaborator and
/// push them into the first handoff buffer.
pub struct SourceRunner<S: FrameSource> {
    source: S,
    output: BoundedBuffer<Message<S::Frame>>,
    cutoff: Option<u64>,
    metrics: StageMetrics,
    state: StageState,
}

impl<S: FrameSource> SourceRunner<S> {
    /// Create a runner emitting at most `cutoff` frames (`None` for
    /// unbounded).
    pub fn new(source: S, output: BoundedBuffer<Message<S::Frame>>, cutoff: Option<u64>) -> Self {
        Self {
            source,
            output,
            cutoff,
            metrics: StageMetrics::new(),
            state: StageState::Running,
        }
    }

    /// Get a shared handle to this stage's metrics
    pub fn metrics(&self) -> StageMetrics {
        self.metrics.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Drain the source until it is exhausted or the cutoff is reached,
    /// then enqueue the end-of-stream marker.
    ///
    /// On a source error the stage aborts without enqueueing the marker;
    /// downstream stages never unblock, which is how an abort is observed.
    pub fn run(&mut self) -> Result<()> {
        let mut emitted: u64 = 0;
        loop {
            if self.cutoff.is_some_and(|max| emitted >= max) {
                break;
            }
            match self.source.next_frame()? {
                Some(frame) => {
                    self.output.put(Message::Frame(frame));
                    emitted += 1;
                    self.metrics.record_processed();
                    trace!("{}: emitted frame {}", self.source.name(), emitted);
                }
                None => break,
            }
        }
        self.state = StageState::Draining;
        self.output.put(Message::EndOfStream);
        self.state = StageState::Terminated;
        debug!("{}: end of stream after {} frames", self.source.name(), emitted);
        Ok(())
    }
}

/// Runs the middle stage: drain one handoff buffer, transform, fill the
/// next.
pub struct TransformRunner<X: FrameTransform> {
    transform: X,
    input: BoundedBuffer<Message<X::Input>>,
    output: BoundedBuffer<Message<X::Output>>,
    metrics: StageMetrics,
    state: StageState,
}

impl<X: FrameTransform> TransformRunner<X> {
    /// Create a runner between two handoff buffers
    pub fn new(
        transform: X,
        input: BoundedBuffer<Message<X::Input>>,
        output: BoundedBuffer<Message<X::Output>>,
    ) -> Self {
        Self {
            transform,
            input,
            output,
            metrics: StageMetrics::new(),
            state: StageState::Running,
        }
    }

    /// Get a shared handle to this stage's metrics
    pub fn metrics(&self) -> StageMetrics {
        self.metrics.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Transform frames until the end-of-stream marker arrives, then
    /// forward the marker downstream.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.input.get() {
                Message::EndOfStream => {
                    self.state = StageState::Draining;
                    self.output.put(Message::EndOfStream);
                    self.state = StageState::Terminated;
                    debug!(
                        "{}: end of stream after {} frames",
                        self.transform.name(),
                        self.metrics.total_processed()
                    );
                    return Ok(());
                }
                Message::Frame(frame) => {
                    let out = self.transform.transform(frame)?;
                    self.output.put(Message::Frame(out));
                    self.metrics.record_processed();
                    trace!(
                        "{}: transformed frame {}",
                        self.transform.name(),
                        self.metrics.total_processed()
                    );
                }
            }
        }
    }
}

/// Runs the downstream stage: drain the last handoff buffer into the sink
/// collaborator.
pub struct SinkRunner<K: FrameSink> {
    sink: K,
    input: BoundedBuffer<Message<K::Frame>>,
    quit: Arc<AtomicBool>,
    metrics: StageMetrics,
    state: StageState,
}

impl<K: FrameSink> SinkRunner<K> {
    /// Create a runner draining `input` into the sink
    pub fn new(sink: K, input: BoundedBuffer<Message<K::Frame>>) -> Self {
        Self {
            sink,
            input,
            quit: Arc::new(AtomicBool::new(false)),
            metrics: StageMetrics::new(),
            state: StageState::Running,
        }
    }

    /// Get a shared handle to this stage's metrics
    pub fn metrics(&self) -> StageMetrics {
        self.metrics.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Get the quit flag. Once set, the runner stops handing frames to
    /// the sink but keeps draining its buffer, so upstream stages still
    /// unblock and the pipeline terminates.
    pub fn quit_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }

    /// Consume frames until the end-of-stream marker arrives. The marker
    /// is consumed, not forwarded; there is no further buffer.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.input.get() {
                Message::EndOfStream => {
                    // Terminal stage: the marker is consumed, not forwarded.
                    self.state = StageState::Terminated;
                    debug!(
                        "{}: end of stream after {} frames",
                        self.sink.name(),
                        self.metrics.total_processed()
                    );
                    return Ok(());
                }
                Message::Frame(frame) => {
                    if self.quit.load(Ordering::Relaxed) {
                        // Quit requested: drain without consuming so the
                        // producer side is never left blocked.
                        continue;
                    }
                    self.sink.consume(frame)?;
                    self.metrics.record_processed();
                    trace!(
                        "{}: consumed frame {}",
                        self.sink.name(),
                        self.metrics.total_processed()
                    );
                }
            }
        }
    }
}
