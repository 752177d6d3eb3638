//! Streaming acoustic event detector: knock-pattern and sustained-bell
//! detection over a 16 kHz mono PCM stream, built for a single-threaded,
//! allocation-free audio path (§1, §5).
//!
//! The pipeline runs six fixed stages per sample — decorrelation,
//! normalization, windowed summing, peak extraction, adaptive thresholding,
//! and a bell bandpass feeding a periodic knock/bell classifier — see
//! [`dsp`] for each stage and [`Detector`] for how they're composed.

pub mod collaborators;
pub mod config;
pub mod detector;
pub mod dsp;
pub mod flags;
pub mod logging;

#[cfg(test)]
mod testsignal;

pub use collaborators::{DiagnosticSink, LogRecord, NullSink, SampleSource};
pub use config::{ConfigError, DetectorConfig, Sensitivity};
pub use detector::Detector;
pub use flags::{Detections, ScanFlags};
pub use logging::{RingLogSink, TracingSink};

/// Pull batches of `batch_size` samples from `source` through `detector`
/// until the source is exhausted, OR-ing every returned bitmask together.
///
/// A convenience composition of a [`SampleSource`] + [`Detector`] + optional
/// [`DiagnosticSink`] (§6) — the loop an embedded `main` or an offline replay
/// tool would otherwise hand-write.
pub fn run_to_completion(
    detector: &mut Detector,
    source: &mut impl SampleSource,
    flags: ScanFlags,
    sink: &mut impl DiagnosticSink,
    batch_size: usize,
) -> Detections {
    let mut detections = Detections::NONE;
    let mut buf = vec![0i16; batch_size.max(1)];
    loop {
        let n = source.next_batch(&mut buf);
        if n == 0 {
            break;
        }
        detections |= detector.scan(&buf[..n], None, flags, sink);
    }
    detections
}
