//! Synthetic PCM generators shared by the integration tests. These exercise
//! the public `Detector` API from outside the crate, so they can't reach the
//! internal `#[cfg(test)]` testsignal module and keep their own small copy.

use std::f32::consts::PI;

pub fn silence(n: usize) -> Vec<i16> {
    vec![0; n]
}

pub fn pulse(buf: &mut [i16], onset: usize, width: usize, amplitude: i16) {
    for sample in buf.iter_mut().skip(onset).take(width) {
        *sample = amplitude;
    }
}

pub fn sine_burst(freq_hz: f32, sample_rate_hz: f32, n: usize, amplitude: f32) -> Vec<i16> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate_hz;
            (amplitude * (2.0 * PI * freq_hz * t).sin()) as i16
        })
        .collect()
}

pub const SAMPLE_RATE_HZ: f32 = 16_000.0;

/// A buffer of `total_secs` seconds of silence, with a 5 ms unit-amplitude
/// pulse stamped at each offset (seconds) in `onsets_secs`.
pub fn knock_stream(total_secs: f32, onsets_secs: &[f32], amplitude: i16) -> Vec<i16> {
    let total = (total_secs * SAMPLE_RATE_HZ) as usize;
    let width = (0.005 * SAMPLE_RATE_HZ) as usize;
    let mut buf = vec![0i16; total];
    for &onset_secs in onsets_secs {
        let onset = (onset_secs * SAMPLE_RATE_HZ) as usize;
        pulse(&mut buf, onset, width, amplitude);
    }
    buf
}
