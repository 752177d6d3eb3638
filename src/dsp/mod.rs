//! DSP stages of the detection pipeline, in the order samples pass through
//! them (§2):
//!
//! 1. [`decorrelator`] — one-pole adaptive decorrelation
//! 2. [`normalizer`] — level tracking and normalization
//! 3. [`window`] — rectangular sliding-window summer
//! 4. [`peak`] — peak extraction and the bounded peak buffer
//! 5. [`threshold`] — adaptive peak-acceptance threshold
//! 6. [`biquad`] + [`classifier`] — bell bandpass and the periodic
//!    knock/bell classifier
//!
//! [`level`] is the shared one-pole tracker underlying both the normalizer's
//! decorrelated-level estimate and the classifier's bell-level estimate.

pub mod biquad;
pub mod classifier;
pub mod decorrelator;
pub mod level;
pub mod normalizer;
pub mod peak;
pub mod threshold;
pub mod window;

pub use biquad::Biquad;
pub use classifier::Classifier;
pub use decorrelator::Decorrelator;
pub use normalizer::Normalizer;
pub use peak::{ExtractorEvent, InsertOutcome, Peak, PeakBuffer, PeakExtractor};
pub use threshold::AdaptiveThreshold;
pub use window::WindowSummer;
