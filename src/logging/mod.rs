//! Concrete [`crate::DiagnosticSink`] implementations.
//!
//! - [`ring::RingLogSink`] — a lock-free single-producer/single-consumer ring
//!   of formatted lines, suitable for a UART debug port on an embedded host
//!   that must never block the audio thread.
//! - [`tracing_sink::TracingSink`] — routes records through the `tracing`
//!   crate, suitable for desktop test harnesses and the replay binary.

pub mod ring;
pub mod tracing_sink;

pub use ring::RingLogSink;
pub use tracing_sink::TracingSink;
