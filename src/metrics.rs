use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-stage frame counter for diagnostics
///
/// Cloning is cheap and shares the underlying counter, so a handle can be
/// kept outside the pipeline while the stage thread records into it.
#[derive(Debug, Clone)]
pub struct StageMetrics {
    /// Number of frames this stage has processed
    frames_processed: Arc<AtomicU64>,
    /// Creation time for throughput calculation
    start_time: Instant,
}

impl StageMetrics {
    /// Create a new metrics collector for a stage
    pub fn new() -> Self {
        Self {
            frames_processed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Record a processed frame
    pub fn record_processed(&self) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of frames processed
    pub fn total_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::Relaxed)
    }

    /// Calculate current throughput in frames per second
    pub fn throughput_fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed();
        if elapsed.as_secs_f64() == 0.0 {
            0.0
        } else {
            self.total_processed() as f64 / elapsed.as_secs_f64()
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_processed: self.total_processed(),
            throughput_fps: self.throughput_fps(),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for StageMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of one stage's metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub total_processed: u64,
    pub throughput_fps: f64,
    pub elapsed: Duration,
}

impl MetricsSnapshot {
    /// Format metrics as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "Frames: {}, Throughput: {:.2} fps, Elapsed: {:.2}s",
            self.total_processed,
            self.throughput_fps,
            self.elapsed.as_secs_f64()
        )
    }
}
