//! Detector configuration.
//!
//! Bell coefficients were compiled in by the source this was distilled from
//! (770 Hz default, 785 Hz alternate). Here they are derived at construction
//! time from [`DetectorConfig`], so the bell fundamental is a runtime choice
//! rather than a recompile.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of peak records ever held at once; see the data-model
/// invariant `0 <= num_peaks <= 16`. [`DetectorConfig::peak_buffer_capacity`]
/// may tune this down for a more constrained host but never up.
pub const MAX_PEAKS: usize = 16;

/// Samples per second the detector is specified against.
pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 16_000.0;

/// Default bell fundamental (Hz).
pub const DEFAULT_BELL_FREQ_HZ: f32 = 770.0;

/// Q of the bell bandpass biquad; a narrow resonance around the fundamental.
pub const BELL_FILTER_Q: f32 = 100.0;

/// Gain premultiplied into the bandpass's feedforward coefficients at init.
pub const BELL_FILTER_GAIN: f32 = 4.0;

/// Sample count of one analysis tick (100 ms at 16 kHz).
pub const ANALYSIS_TICK_SAMPLES: u64 = 1_600;

/// Errors rejected at construction time, before any audio flows.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive, got {0}")]
    ZeroSampleRate(f32),
    #[error("bell frequency {freq} Hz must be below Nyquist ({nyquist} Hz)")]
    BellFrequencyTooHigh { freq: f32, nyquist: f32 },
    #[error("bell frequency must be positive, got {0}")]
    NonPositiveBellFrequency(f32),
    #[error("peak buffer capacity must be in 1..={MAX_PEAKS}, got {0}")]
    InvalidBufferCapacity(usize),
}

/// Detector sensitivity mode. Loosens the knock-matching gates; see §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensitivity {
    Normal,
    High,
}

impl Sensitivity {
    /// Acceptance gate multiplier over the adaptive baseline.
    pub(crate) fn scaling(self) -> f32 {
        match self {
            Sensitivity::Normal => 1.5,
            Sensitivity::High => 1.25,
        }
    }

    /// Max allowed inter-knock spacing ratio.
    pub(crate) fn knock_max_ratio(self) -> f32 {
        match self {
            Sensitivity::Normal => 1.1,
            Sensitivity::High => 1.2,
        }
    }

    /// Cluster-rejection height fraction.
    pub(crate) fn reject_ratio(self) -> f32 {
        match self {
            Sensitivity::Normal => 0.5,
            Sensitivity::High => 0.75,
        }
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Sensitivity::Normal
    }
}

/// Runtime configuration for a [`crate::Detector`].
///
/// Construct with [`DetectorConfig::default`] and override fields, then call
/// [`DetectorConfig::validate`] (also run implicitly by
/// `Detector::with_config`) before handing it to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub sample_rate_hz: f32,
    pub bell_freq_hz: f32,
    pub sensitivity: Sensitivity,
    pub peak_buffer_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            bell_freq_hz: DEFAULT_BELL_FREQ_HZ,
            sensitivity: Sensitivity::Normal,
            peak_buffer_capacity: MAX_PEAKS,
        }
    }
}

impl DetectorConfig {
    /// High-sensitivity variant of the default config, useful for tests and
    /// environments known to produce weaker transients.
    pub fn high_sensitivity() -> Self {
        Self {
            sensitivity: Sensitivity::High,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz <= 0.0 {
            return Err(ConfigError::ZeroSampleRate(self.sample_rate_hz));
        }
        if self.bell_freq_hz <= 0.0 {
            return Err(ConfigError::NonPositiveBellFrequency(self.bell_freq_hz));
        }
        let nyquist = self.sample_rate_hz / 2.0;
        if self.bell_freq_hz >= nyquist {
            return Err(ConfigError::BellFrequencyTooHigh {
                freq: self.bell_freq_hz,
                nyquist,
            });
        }
        if self.peak_buffer_capacity == 0 || self.peak_buffer_capacity > MAX_PEAKS {
            return Err(ConfigError::InvalidBufferCapacity(self.peak_buffer_capacity));
        }
        Ok(())
    }
}
