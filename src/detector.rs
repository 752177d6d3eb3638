//! The detector: wires the six pipeline stages (§2) together behind the
//! `init`/`scan` public interface (§6).

use crate::collaborators::{DiagnosticSink, LogRecord};
use crate::config::{
    ConfigError, DetectorConfig, Sensitivity, ANALYSIS_TICK_SAMPLES, BELL_FILTER_GAIN,
    BELL_FILTER_Q,
};
use crate::dsp::level::LevelTracker;
use crate::dsp::{
    AdaptiveThreshold, Biquad, Classifier, Decorrelator, ExtractorEvent, InsertOutcome, Normalizer,
    PeakBuffer, PeakExtractor, WindowSummer,
};
use crate::flags::{Detections, ScanFlags};

/// Idle reduction point for `sample_index` (§4.8): 24 h of samples at the
/// configured sample rate.
fn wrap_threshold(sample_rate_hz: f32) -> u64 {
    (86_400.0 * sample_rate_hz as f64) as u64
}

/// Sample count between `DISP_THRESHOLDS` log lines (10 s of sample time).
fn threshold_log_period(sample_rate_hz: f32) -> u64 {
    (10.0 * sample_rate_hz as f64) as u64
}

/// Per-sample diagnostic tap values, in `OUTP_TAP_ORDER`.
#[derive(Debug, Default, Clone, Copy)]
struct Taps {
    decorr_audio: i16,
    decorr_level: i16,
    normal_audio: i16,
    window_level: i16,
    filter_audio: i16,
    filter_level: i16,
}

/// Streaming acoustic event detector (§2–§6).
///
/// Owns all pipeline state; not safe to share across execution contexts
/// (§5). Construct with [`Detector::with_config`] (or [`Detector::new`] for
/// the default config) and drive it with repeated [`Detector::scan`] calls.
pub struct Detector {
    config: DetectorConfig,

    sample_index: u64,
    since_last_tick: u64,
    since_last_threshold_log: u64,

    decorrelator: Decorrelator,
    normalizer: Normalizer,
    window: WindowSummer,
    extractor: PeakExtractor,
    threshold: AdaptiveThreshold,
    bell_filter: Biquad,
    bell_level: LevelTracker,
    classifier: Classifier,
    peaks: PeakBuffer,
}

impl Detector {
    /// Construct with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default()).expect("default config is always valid")
    }

    /// Construct with a custom configuration, validating it first (§7).
    pub fn with_config(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DetectorConfig) -> Self {
        let bell_filter = Biquad::bandpass(
            config.bell_freq_hz,
            BELL_FILTER_Q,
            BELL_FILTER_GAIN,
            config.sample_rate_hz,
        );
        Self {
            sample_index: 0,
            since_last_tick: 0,
            since_last_threshold_log: 0,
            decorrelator: Decorrelator::new(),
            normalizer: Normalizer::new(),
            window: WindowSummer::new(),
            extractor: PeakExtractor::new(),
            threshold: AdaptiveThreshold::new(),
            bell_filter,
            bell_level: LevelTracker::new(1.0),
            classifier: Classifier::new(config.sensitivity),
            peaks: PeakBuffer::new(config.peak_buffer_capacity),
            config,
        }
    }

    /// Reset all state to the same place a fresh construction would leave it
    /// (§3 "Lifecycle"), keeping the current configuration.
    pub fn init(&mut self) {
        let config = self.config;
        *self = Self::build(config);
    }

    /// Alias for [`Detector::init`].
    pub fn reset(&mut self) {
        self.init();
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Current sample index (§4.8); wraps at 24 h of sample time while idle.
    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    /// Process `input.len()` samples, returning the OR of all detections
    /// raised during this call (§6).
    ///
    /// If `flags` enables any `OUTP_*` tap, `output` must hold at least
    /// `input.len() * flags.enabled_tap_count()` samples (§5 "Resource
    /// lifetime") — the caller owns and pre-sizes this buffer so `scan`
    /// itself never allocates. Each enabled tap writes one value per input
    /// sample, in `ScanFlags::OUTP_TAP_ORDER`; writes beyond the end of
    /// `output` are silently dropped rather than panicking the audio thread.
    pub fn scan(
        &mut self,
        input: &[i16],
        output: Option<&mut [i16]>,
        flags: ScanFlags,
        sink: &mut impl DiagnosticSink,
    ) -> Detections {
        #[cfg(feature = "debug")]
        {
            assert_no_alloc::assert_no_alloc(|| self.scan_inner(input, output, flags, sink))
        }
        #[cfg(not(feature = "debug"))]
        {
            self.scan_inner(input, output, flags, sink)
        }
    }

    fn scan_inner(
        &mut self,
        input: &[i16],
        mut output: Option<&mut [i16]>,
        flags: ScanFlags,
        sink: &mut impl DiagnosticSink,
    ) -> Detections {
        let mut detections = Detections::NONE;
        let sensitivity = if flags.contains(ScanFlags::HIGH_SENSITIVITY) {
            Sensitivity::High
        } else {
            Sensitivity::Normal
        };
        self.classifier.set_sensitivity(sensitivity);
        let scaling = sensitivity.scaling();

        let mut out_pos = 0usize;
        for &raw in input {
            let (tick_detections, taps) = self.tick(raw, flags, scaling, sink);
            detections |= tick_detections;
            if let Some(out) = output.as_deref_mut() {
                out_pos = write_taps(out, out_pos, flags, &taps);
            }
        }

        detections
    }

    /// Advance the pipeline by exactly one sample (§2, §4.1–§4.8).
    fn tick(
        &mut self,
        raw: i16,
        flags: ScanFlags,
        scaling: f32,
        sink: &mut impl DiagnosticSink,
    ) -> (Detections, Taps) {
        let decorrelated = self.decorrelator.process(raw);
        let normalized = self.normalizer.process(decorrelated);
        let window_level = self.window.process(normalized);

        let bell_out = self.bell_filter.process(normalized);
        let filtered_level = self.bell_level.update(bell_out);

        let taps = Taps {
            decorr_audio: decorrelated,
            decorr_level: clamp_to_i16(self.normalizer.decorrelated_level()),
            normal_audio: clamp_to_i16(normalized),
            window_level: clamp_to_i16(window_level as f32),
            filter_audio: clamp_to_i16(bell_out),
            filter_level: clamp_to_i16(filtered_level),
        };

        let mut detections = Detections::NONE;

        if let ExtractorEvent::Closed(peak) =
            self.extractor
                .process(self.sample_index, window_level, filtered_level)
        {
            if self.threshold.evaluate(peak.height, scaling) {
                let outcome = self.peaks.insert(peak);
                match outcome {
                    InsertOutcome::Inserted | InsertOutcome::Evicted => {
                        if flags.contains(ScanFlags::DISP_PEAKS) {
                            sink.log(LogRecord::PeakAccepted {
                                sample_index: self.sample_index,
                                height: peak.height,
                                width: peak.width,
                            });
                        }
                        if outcome == InsertOutcome::Evicted && flags.contains(ScanFlags::DISP_EVENTS)
                        {
                            sink.log(LogRecord::BufferFull {
                                sample_index: self.sample_index,
                                evicted: true,
                            });
                        }
                    }
                    InsertOutcome::DroppedSmallest => {
                        if flags.contains(ScanFlags::DISP_EVENTS) {
                            sink.log(LogRecord::BufferFull {
                                sample_index: self.sample_index,
                                evicted: false,
                            });
                        }
                    }
                }
            }
        }

        self.since_last_tick += 1;
        if self.since_last_tick >= ANALYSIS_TICK_SAMPLES {
            self.since_last_tick = 0;
            self.threshold.on_analysis_tick();
            let tick_detections =
                self.classifier
                    .tick(&mut self.peaks, self.sample_index, filtered_level);
            detections |= tick_detections;
            if !tick_detections.is_none() && flags.contains(ScanFlags::DISP_EVENTS) {
                sink.log(LogRecord::Detection {
                    sample_index: self.sample_index,
                    detections: ScanFlags(tick_detections.0),
                });
            }
        }

        if flags.contains(ScanFlags::DISP_THRESHOLDS) {
            self.since_last_threshold_log += 1;
            if self.since_last_threshold_log >= threshold_log_period(self.config.sample_rate_hz) {
                self.since_last_threshold_log = 0;
                sink.log(LogRecord::Threshold {
                    sample_index: self.sample_index,
                    baseline: self.threshold.baseline(),
                });
            }
        }

        self.sample_index += 1;
        self.maybe_wrap_sample_index();

        (detections, taps)
    }

    /// Index wrap (§4.8): only when idle, so no in-flight comparison
    /// straddles the wrap.
    fn maybe_wrap_sample_index(&mut self) {
        let threshold = wrap_threshold(self.config.sample_rate_hz);
        if self.sample_index > threshold && self.peaks.is_empty() && !self.extractor.is_open() {
            self.sample_index %= threshold;
        }
    }
}

fn clamp_to_i16(value: f32) -> i16 {
    value.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Write this sample's enabled taps starting at `pos`, returning the
/// position after the last written value. Stops writing (but keeps
/// advancing the conceptual position) once `out` is exhausted.
fn write_taps(out: &mut [i16], pos: usize, flags: ScanFlags, taps: &Taps) -> usize {
    let mut pos = pos;
    let mut write = |value: i16, pos: &mut usize| {
        if let Some(slot) = out.get_mut(*pos) {
            *slot = value;
        }
        *pos += 1;
    };
    if flags.contains(ScanFlags::OUTP_DECORR_AUDIO) {
        write(taps.decorr_audio, &mut pos);
    }
    if flags.contains(ScanFlags::OUTP_DECORR_LEVEL) {
        write(taps.decorr_level, &mut pos);
    }
    if flags.contains(ScanFlags::OUTP_NORMAL_AUDIO) {
        write(taps.normal_audio, &mut pos);
    }
    if flags.contains(ScanFlags::OUTP_WINDOW_LEVEL) {
        write(taps.window_level, &mut pos);
    }
    if flags.contains(ScanFlags::OUTP_FILTER_AUDIO) {
        write(taps.filter_audio, &mut pos);
    }
    if flags.contains(ScanFlags::OUTP_FILTER_LEVEL) {
        write(taps.filter_level, &mut pos);
    }
    pos
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::NullSink;

    #[test]
    fn silence_never_detects() {
        let mut d = Detector::new();
        let mut sink = NullSink;
        let input = vec![0i16; 160_000];
        let detections = d.scan(&input, None, ScanFlags::NONE, &mut sink);
        assert_eq!(detections, Detections::NONE);
    }

    #[test]
    fn taps_write_one_value_per_enabled_flag() {
        let mut d = Detector::new();
        let mut sink = NullSink;
        let flags = ScanFlags::OUTP_DECORR_AUDIO | ScanFlags::OUTP_FILTER_LEVEL;
        let input = vec![100i16; 50];
        let mut out = vec![0i16; input.len() * 2];
        d.scan(&input, Some(&mut out), flags, &mut sink);
        assert!(out.iter().any(|&v| v != 0));
    }

    #[test]
    fn reset_restores_initial_threshold_baseline() {
        let mut d = Detector::new();
        let mut sink = NullSink;
        let input = vec![2000i16; 32_000];
        d.scan(&input, None, ScanFlags::NONE, &mut sink);
        d.reset();
        assert_eq!(d.threshold.baseline(), 30.0);
    }

    #[test]
    fn batching_does_not_change_total_detections() {
        let mut whole = Detector::new();
        let mut batched = Detector::new();
        let mut sink = NullSink;

        let input: Vec<i16> = (0..48_000)
            .map(|n| ((n % 400) * 80) as i16)
            .collect();

        let whole_result = whole.scan(&input, None, ScanFlags::NONE, &mut sink);

        let mut batched_result = Detections::NONE;
        for chunk in input.chunks(37) {
            batched_result |= batched.scan(chunk, None, ScanFlags::NONE, &mut sink);
        }

        assert_eq!(whole_result, batched_result);
    }
}
