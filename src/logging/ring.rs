//! Lock-free single-producer/single-consumer log ring, adapted from this
//! lineage's feature-gated UnsafeCell-based logger into an always-available
//! [`crate::DiagnosticSink`].
//!
//! Formatting happens at push time into a fixed-size byte buffer — no heap
//! allocation on the audio path — and a separate consumer (a UART-draining
//! task, a test assertion) drains at its own pace.

use std::cell::UnsafeCell;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collaborators::{DiagnosticSink, LogRecord};

const LOG_MSG_MAX: usize = 128;

#[derive(Copy, Clone)]
struct LogEntry {
    len: u8,
    bytes: [u8; LOG_MSG_MAX],
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            len: 0,
            bytes: [0; LOG_MSG_MAX],
        }
    }
}

struct FixedBuf {
    buf: [u8; LOG_MSG_MAX],
    len: usize,
}

impl FixedBuf {
    fn new() -> Self {
        Self {
            buf: [0; LOG_MSG_MAX],
            len: 0,
        }
    }

    fn into_entry(self) -> LogEntry {
        let mut entry = LogEntry::default();
        entry.len = self.len.min(LOG_MSG_MAX) as u8;
        entry.bytes[..entry.len as usize].copy_from_slice(&self.buf[..entry.len as usize]);
        entry
    }
}

impl fmt::Write for FixedBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let avail = LOG_MSG_MAX - self.len;
        if avail == 0 {
            return Ok(());
        }
        let bytes = s.as_bytes();
        let n = bytes.len().min(avail);
        self.buf[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        Ok(())
    }
}

/// Single-producer/single-consumer ring of formatted diagnostic lines.
///
/// `push` (the `DiagnosticSink::log` side) and `drain` (the consumer side)
/// are safe to call from different threads, as long as there is at most one
/// of each: the same contract the sample-source ring buffer relies on (§5).
pub struct RingLogSink {
    head: AtomicUsize,
    tail: AtomicUsize,
    buf: Box<[UnsafeCell<LogEntry>]>,
}

unsafe impl Sync for RingLogSink {}
unsafe impl Send for RingLogSink {}

impl RingLogSink {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut v = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            v.push(UnsafeCell::new(LogEntry::default()));
        }
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            buf: v.into_boxed_slice(),
        }
    }

    fn push_entry(&self, entry: LogEntry) {
        let cap = self.buf.len();
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % cap;
        if next == self.tail.load(Ordering::Acquire) {
            return; // full; drop rather than block the audio thread
        }
        unsafe {
            *self.buf[head].get() = entry;
        }
        self.head.store(next, Ordering::Release);
    }

    /// Pop and format the oldest pending line, if any.
    pub fn drain_one(&self) -> Option<String> {
        let cap = self.buf.len();
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let entry = unsafe { *self.buf[tail].get() };
        self.tail.store((tail + 1) % cap, Ordering::Release);
        let len = entry.len as usize;
        Some(String::from_utf8_lossy(&entry.bytes[..len]).into_owned())
    }

    /// Drain every pending line into `out`, in order.
    pub fn drain_all(&self, out: &mut Vec<String>) {
        while let Some(line) = self.drain_one() {
            out.push(line);
        }
    }
}

impl Default for RingLogSink {
    fn default() -> Self {
        Self::new(256)
    }
}

impl DiagnosticSink for RingLogSink {
    fn log(&mut self, record: LogRecord) {
        let mut buf = FixedBuf::new();
        let _ = format_record(&mut buf, &record);
        self.push_entry(buf.into_entry());
    }
}

fn format_record(buf: &mut FixedBuf, record: &LogRecord) -> fmt::Result {
    match *record {
        LogRecord::Threshold {
            sample_index,
            baseline,
        } => write!(buf, "[{sample_index}] threshold={baseline:.2}"),
        LogRecord::Detection {
            sample_index,
            detections,
        } => write!(buf, "[{sample_index}] detection flags=0x{:x}", detections.0),
        LogRecord::BufferFull {
            sample_index,
            evicted,
        } => write!(buf, "[{sample_index}] peak buffer full evicted={evicted}"),
        LogRecord::PeakAccepted {
            sample_index,
            height,
            width,
        } => write!(buf, "[{sample_index}] peak height={height} width={width}"),
    }
}
