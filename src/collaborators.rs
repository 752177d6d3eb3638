//! Traits for the two external collaborators named in §1 and §6: a sample
//! source and a diagnostic sink. The core depends on neither concretely, so
//! an I2S capture ISR, a WAV-replay harness, or a unit test fixture can each
//! supply their own implementation.

use crate::flags::ScanFlags;

/// Delivers monotonic PCM frames at a fixed rate.
///
/// Implementors may return fewer samples than `buf.len()` (e.g. end of a
/// recorded file); returning `0` signals exhaustion.
pub trait SampleSource {
    fn next_batch(&mut self, buf: &mut [i16]) -> usize;
}

/// One diagnostic record, carrying enough to format however the sink likes
/// (a UART text line, an in-memory ring for a test, a `tracing` event).
#[derive(Debug, Clone, Copy)]
pub enum LogRecord {
    /// Adaptive threshold sampled every 10 s of sample time (`DISP_THRESHOLDS`).
    Threshold { sample_index: u64, baseline: f32 },
    /// A detection fired (`DISP_EVENTS`).
    Detection { sample_index: u64, detections: ScanFlags },
    /// The peak buffer was full when a new peak closed (`DISP_EVENTS`).
    BufferFull {
        sample_index: u64,
        evicted: bool,
    },
    /// A peak was accepted into the buffer (`DISP_PEAKS`).
    PeakAccepted {
        sample_index: u64,
        height: i32,
        width: i32,
    },
}

/// Receives detection flags and diagnostic log records.
///
/// Must tolerate back-to-back calls without blocking the detector for more
/// than a few ms (§6) — implementations should buffer internally rather than
/// do blocking I/O directly from `log`.
pub trait DiagnosticSink {
    fn log(&mut self, record: LogRecord);
}

/// A sink that discards everything; the default when no diagnostics are
/// wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    #[inline]
    fn log(&mut self, _record: LogRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSource {
        remaining: usize,
    }

    impl SampleSource for CountingSource {
        fn next_batch(&mut self, buf: &mut [i16]) -> usize {
            let n = buf.len().min(self.remaining);
            for slot in buf.iter_mut().take(n) {
                *slot = 0;
            }
            self.remaining -= n;
            n
        }
    }

    #[test]
    fn source_reports_exhaustion() {
        let mut src = CountingSource { remaining: 10 };
        let mut buf = [0i16; 4];
        assert_eq!(src.next_batch(&mut buf), 4);
        assert_eq!(src.next_batch(&mut buf), 4);
        assert_eq!(src.next_batch(&mut buf), 2);
        assert_eq!(src.next_batch(&mut buf), 0);
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.log(LogRecord::Threshold {
            sample_index: 0,
            baseline: 30.0,
        });
    }
}
