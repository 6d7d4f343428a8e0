//! # Utility Modules
//!
//! Supporting pieces shared by the codec and the packet layer.
//!
//! ## Components
//! - **Buffer Pool**: scoped scratch buffers for length-prefixed writes
//! - **Logging**: `tracing-subscriber` setup driven by [`crate::config::LoggingConfig`]
//! - **Metrics**: thread-safe frame counters

pub mod buffer_pool;
pub mod logging;
pub mod metrics;

pub use buffer_pool::{ScratchBuffer, ScratchPool};
pub use metrics::{global_metrics, CodecMetrics};
