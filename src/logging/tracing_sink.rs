//! [`crate::DiagnosticSink`] backed by the `tracing` crate, for desktop test
//! harnesses and the replay binary where blocking the "audio thread" for a
//! `tracing` dispatch is not a concern.

use crate::collaborators::{DiagnosticSink, LogRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&mut self, record: LogRecord) {
        match record {
            LogRecord::Threshold {
                sample_index,
                baseline,
            } => {
                tracing::debug!(sample_index, baseline, "adaptive threshold");
            }
            LogRecord::Detection {
                sample_index,
                detections,
            } => {
                tracing::info!(sample_index, flags = detections.0, "detection");
            }
            LogRecord::BufferFull {
                sample_index,
                evicted,
            } => {
                tracing::debug!(sample_index, evicted, "peak buffer full");
            }
            LogRecord::PeakAccepted {
                sample_index,
                height,
                width,
            } => {
                tracing::trace!(sample_index, height, width, "peak accepted");
            }
        }
    }
}
