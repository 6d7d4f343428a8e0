//! Codec Metrics
//!
//! Counters for frame traffic and rejected input, collected with relaxed
//! atomics so any number of connections can share one instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::info;

/// Metrics collector for frame codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Frames split off the inbound stream
    pub frames_decoded: AtomicU64,
    /// Frames written to the outbound stream
    pub frames_encoded: AtomicU64,
    /// Body bytes of decoded frames
    pub bytes_received: AtomicU64,
    /// Body bytes of encoded frames
    pub bytes_sent: AtomicU64,
    /// Frames rejected for declaring a length above the ceiling
    pub oversized_frames: AtomicU64,
    /// Frames rejected for an unterminated length prefix
    pub malformed_frames: AtomicU64,
    start_time: Instant,
}

impl CodecMetrics {
    pub fn new() -> Self {
        Self {
            frames_decoded: AtomicU64::new(0),
            frames_encoded: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            oversized_frames: AtomicU64::new(0),
            malformed_frames: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn frame_decoded(&self, byte_count: u64) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn frame_encoded(&self, byte_count: u64) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn oversized_frame(&self) {
        self.oversized_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn malformed_frame(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            oversized_frames: self.oversized_frames.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            frames_decoded = snapshot.frames_decoded,
            frames_encoded = snapshot.frames_encoded,
            bytes_received = snapshot.bytes_received,
            bytes_sent = snapshot.bytes_sent,
            oversized_frames = snapshot.oversized_frames,
            malformed_frames = snapshot.malformed_frames,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_decoded: u64,
    pub frames_encoded: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub oversized_frames: u64,
    pub malformed_frames: u64,
    pub uptime_seconds: u64,
}

static METRICS: OnceLock<Arc<CodecMetrics>> = OnceLock::new();

/// Process-wide metrics instance, shared by codecs built without their own
pub fn global_metrics() -> Arc<CodecMetrics> {
    METRICS.get_or_init(|| Arc::new(CodecMetrics::new())).clone()
}
