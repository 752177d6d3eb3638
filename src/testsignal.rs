//! Synthetic PCM generators shared by the in-crate unit tests. No runtime use
//! outside tests, hence the `cfg(test)` gate.

use std::f32::consts::PI;

/// `n` samples of digital silence.
pub fn silence(n: usize) -> Vec<i16> {
    vec![0; n]
}

/// A single rectangular pulse of `amplitude` for `width` samples, surrounded
/// by silence out to `total` samples, starting at `onset`.
pub fn pulse(total: usize, onset: usize, width: usize, amplitude: i16) -> Vec<i16> {
    let mut buf = vec![0i16; total];
    for sample in buf.iter_mut().skip(onset).take(width) {
        *sample = amplitude;
    }
    buf
}

/// A sine burst at `freq_hz`, `amplitude`, lasting `n` samples at
/// `sample_rate_hz`.
pub fn sine_burst(freq_hz: f32, sample_rate_hz: f32, n: usize, amplitude: f32) -> Vec<i16> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate_hz;
            (amplitude * (2.0 * PI * freq_hz * t).sin()) as i16
        })
        .collect()
}

/// Three pulses at `onsets_ms` (milliseconds from the start of the buffer),
/// each `width` samples wide, embedded in a `total`-sample silent buffer.
pub fn pulse_train(
    total: usize,
    onsets_ms: [f32; 3],
    width: usize,
    amplitude: i16,
    sample_rate_hz: f32,
) -> Vec<i16> {
    let mut buf = vec![0i16; total];
    for onset_ms in onsets_ms {
        let onset = (onset_ms / 1000.0 * sample_rate_hz) as usize;
        for sample in buf.iter_mut().skip(onset).take(width) {
            *sample = amplitude;
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_places_amplitude_in_the_requested_window() {
        let buf = pulse(100, 10, 5, 1000);
        assert_eq!(buf[9], 0);
        assert_eq!(buf[10], 1000);
        assert_eq!(buf[14], 1000);
        assert_eq!(buf[15], 0);
    }

    #[test]
    fn pulse_train_places_three_onsets() {
        let buf = pulse_train(32_000, [0.0, 150.0, 300.0], 32, 2000, 16_000.0);
        assert_eq!(buf[0], 2000);
        assert_eq!(buf[(0.150 * 16_000.0) as usize], 2000);
        assert_eq!(buf[(0.300 * 16_000.0) as usize], 2000);
    }
}
