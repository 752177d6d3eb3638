//! Narrow bandpass biquad used as the bell-fundamental filter (§4.6).
//!
//! Direct-form-I recurrence with explicit input and output delay lines, as
//! the spec's biquad-state data model names them (five coefficients, two
//! input/two output history values) rather than a transposed form that folds
//! the history into fewer registers.

use std::f32::consts::PI;

/// Direct-form-I biquad filter.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    a0: f32,
    a1: f32,
    a2: f32,
    b1: f32,
    b2: f32,

    in_d1: f32,
    in_d2: f32,
    out_d1: f32,
    out_d2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
            in_d1: 0.0,
            in_d2: 0.0,
            out_d1: 0.0,
            out_d2: 0.0,
        }
    }

    /// Design a narrow bandpass (RBJ constant-0dB-peak-gain form), with the
    /// feedforward coefficients premultiplied by `gain` per §4.6.
    pub fn bandpass(freq_hz: f32, q: f32, gain: f32, sample_rate_hz: f32) -> Self {
        let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
        let alpha = w0.sin() / (2.0 * q.max(1e-6));
        let cos_w0 = w0.cos();

        let raw_a0 = alpha;
        let raw_a2 = -alpha;
        let b0 = 1.0 + alpha;
        let inv_b0 = 1.0 / b0;

        let mut filt = Self::new();
        filt.a0 = raw_a0 * inv_b0 * gain;
        filt.a1 = 0.0;
        filt.a2 = raw_a2 * inv_b0 * gain;
        filt.b1 = (-2.0 * cos_w0) * inv_b0;
        filt.b2 = (1.0 - alpha) * inv_b0;
        filt
    }

    /// Process a single sample through the direct-form-I recurrence.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = self.a0 * input + self.a1 * self.in_d1 + self.a2 * self.in_d2
            - self.b1 * self.out_d1
            - self.b2 * self.out_d2;

        self.in_d2 = self.in_d1;
        self.in_d1 = input;
        self.out_d2 = self.out_d1;
        self.out_d1 = out;

        out
    }

    pub fn reset_state(&mut self) {
        self.in_d1 = 0.0;
        self.in_d2 = 0.0;
        self.out_d1 = 0.0;
        self.out_d2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
