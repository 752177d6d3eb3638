//! End-to-end scenarios exercising the public `Detector` API (§8 scenario
//! table), plus the diagnostic-tap append-count tests from the same section.

mod common;

use common::{knock_stream, sine_burst, silence, SAMPLE_RATE_HZ};
use knockbell::{DetectorConfig, Detections, Detector, NullSink, ScanFlags};

const KNOCK_PULSE_AMPLITUDE: i16 = 20_000;

#[test]
fn scenario_1_evenly_spaced_knock_is_detected() {
    let mut input = knock_stream(2.45, &[2.00, 2.15, 2.30], KNOCK_PULSE_AMPLITUDE);
    input.extend(silence((0.20 * SAMPLE_RATE_HZ) as usize));

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::NONE, &mut sink);

    assert!(detections.contains(Detections::KNOCK));
    assert!(!detections.contains(Detections::BELL));
}

#[test]
fn scenario_2_oversized_span_has_no_detection() {
    // t = 2.00, 2.10, 2.80 s: span = 0.80 s = 12800 samples (over the 12000
    // sample ceiling) and d1 = 1600 samples, d2 = 11200 samples (ratio 7.0).
    let input = knock_stream(3.1, &[2.00, 2.10, 2.80], KNOCK_PULSE_AMPLITUDE);

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::NONE, &mut sink);

    assert_eq!(detections, Detections::NONE);
}

#[test]
fn scenario_3_borderline_ratio_rejected_in_normal_mode() {
    // d1 = 2400 samples, d2 = 2760 samples, ratio = 1.15 > 1.1.
    let onsets = [2.00, 2.15, 2.3225];
    let input = knock_stream(2.6, &onsets, KNOCK_PULSE_AMPLITUDE);

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::NONE, &mut sink);

    assert_eq!(detections, Detections::NONE);
}

#[test]
fn scenario_4_same_ratio_accepted_in_high_sensitivity_mode() {
    let onsets = [2.00, 2.15, 2.3225];
    let input = knock_stream(2.6, &onsets, KNOCK_PULSE_AMPLITUDE);

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::HIGH_SENSITIVITY, &mut sink);

    assert!(detections.contains(Detections::KNOCK));
}

#[test]
fn scenario_5_pulse_then_sustained_bell_tone_confirms_bell() {
    let mut input = silence((2.0 * SAMPLE_RATE_HZ) as usize);
    let pulse_width = (0.005 * SAMPLE_RATE_HZ) as usize;
    common::pulse(&mut input, input.len() - pulse_width, pulse_width, 20_000);
    input.extend(sine_burst(770.0, SAMPLE_RATE_HZ, SAMPLE_RATE_HZ as usize, 8000.0));

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::NONE, &mut sink);

    assert!(detections.contains(Detections::BELL));
    assert!(!detections.contains(Detections::KNOCK));
}

#[test]
fn scenario_6_brief_bell_tone_does_not_confirm() {
    let mut input = silence((2.0 * SAMPLE_RATE_HZ) as usize);
    let pulse_width = (0.005 * SAMPLE_RATE_HZ) as usize;
    common::pulse(&mut input, input.len() - pulse_width, pulse_width, 20_000);
    input.extend(sine_burst(
        770.0,
        SAMPLE_RATE_HZ,
        (0.3 * SAMPLE_RATE_HZ) as usize,
        8000.0,
    ));

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let detections = detector.scan(&input, None, ScanFlags::NONE, &mut sink);

    assert!(!detections.contains(Detections::BELL));
}

#[test]
fn scenario_7_white_noise_settles_into_a_low_detection_rate() {
    // Small deterministic xorshift PRNG; no external dependency needed for a
    // synthetic noise fixture.
    let mut state: u32 = 0x1234_5678;
    let mut next_sample = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        ((state as i32 % 4000) - 2000) as i16
    };

    let n = (60.0 * SAMPLE_RATE_HZ) as usize;
    let input: Vec<i16> = (0..n).map(|_| next_sample()).collect();

    let mut detector = Detector::new();
    let mut sink = NullSink;
    // Scan in 1-second batches so detection rate can be measured over time.
    let batch = SAMPLE_RATE_HZ as usize;
    let mut total_detections = 0u32;
    for chunk in input.chunks(batch) {
        let detections = detector.scan(chunk, None, ScanFlags::NONE, &mut sink);
        if !detections.is_none() {
            total_detections += 1;
        }
    }

    // Fewer than 1 detecting second per 10 s over the 60 s run.
    assert!(total_detections < 6);
}

#[test]
fn diagnostic_taps_append_n_samples_per_enabled_bit() {
    let input = vec![100i16; 37];
    let cases: [(ScanFlags, usize); 6] = [
        (ScanFlags::OUTP_DECORR_AUDIO, 1),
        (ScanFlags::OUTP_DECORR_LEVEL, 1),
        (ScanFlags::OUTP_NORMAL_AUDIO, 1),
        (ScanFlags::OUTP_WINDOW_LEVEL, 1),
        (ScanFlags::OUTP_FILTER_AUDIO, 1),
        (ScanFlags::OUTP_FILTER_LEVEL, 1),
    ];

    for (flag, taps) in cases {
        let mut detector = Detector::new();
        let mut sink = NullSink;
        let mut out = vec![i16::MIN; input.len() * taps];
        detector.scan(&input, Some(&mut out), flag, &mut sink);
        assert!(out.iter().all(|&v| v != i16::MIN));
    }

    let mut detector = Detector::new();
    let mut sink = NullSink;
    let combined = ScanFlags::OUTP_DECORR_AUDIO
        | ScanFlags::OUTP_NORMAL_AUDIO
        | ScanFlags::OUTP_FILTER_LEVEL;
    let mut out = vec![i16::MIN; input.len() * 3];
    detector.scan(&input, Some(&mut out), combined, &mut sink);
    assert!(out.iter().all(|&v| v != i16::MIN));
}

#[test]
fn rejects_bell_frequency_above_nyquist_at_construction() {
    let config = DetectorConfig {
        bell_freq_hz: 9_000.0,
        ..DetectorConfig::default()
    };
    assert!(Detector::with_config(config).is_err());
}
