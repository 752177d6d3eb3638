//! Periodic classifier: knock-pattern matching and bell confirmation (§4.7).
//!
//! Runs once per analysis tick (100 ms of sample time). Knock is searched
//! before bell, matching spec §9's resolution of the mutual-exclusion open
//! question; either one clears the whole buffer, so at most one fires per
//! tick even if both patterns would otherwise qualify.

use super::peak::{Peak, PeakBuffer};
use crate::config::Sensitivity;
use crate::flags::Detections;

/// Full knock pattern duration must exceed this many samples (0.25 s).
const KNOCK_MIN_SPAN: i64 = 4_000;
/// Full knock pattern duration must stay under this many samples (0.75 s).
const KNOCK_MAX_SPAN: i64 = 12_000;
/// Widest accepted width for any of the three knock peaks.
const KNOCK_MAX_WIDTH: i32 = 512;

/// Expire buffered peaks this long past the max knock span.
const EXPIRE_AFTER: i64 = 2 * KNOCK_MAX_SPAN;

/// Bell confirmation window: only peaks within this many samples of onset
/// are watched for sustained bell-band energy.
const BELL_CONFIRM_WINDOW: i64 = 16_000;
/// Bell-level must exceed `2 * baseline + BELL_MARGIN` to count as a hit.
const BELL_LEVEL_FACTOR: f32 = 2.0;
const BELL_MARGIN: f32 = 50.0;
/// Consecutive analysis-tick hits required to confirm BELL (>= ~500 ms).
const BELL_HITS_REQUIRED: u8 = 5;

/// Runs the periodic knock/bell scan over the buffered peaks.
pub struct Classifier {
    sensitivity: Sensitivity,
}

impl Classifier {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self { sensitivity }
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
    }

    /// Run one analysis tick: expire stale peaks, search for a knock, then
    /// watch for bell confirmation. Returns any detection raised.
    pub fn tick(
        &self,
        buffer: &mut PeakBuffer,
        sample_index: u64,
        filtered_level: f32,
    ) -> Detections {
        buffer.expire_front_while(|p| {
            (p.time as i64) + EXPIRE_AFTER < sample_index as i64
        });

        if let Some(knock) = self.find_knock(buffer, sample_index) {
            let _ = knock;
            buffer.clear();
            return Detections::KNOCK;
        }

        if self.confirm_bell(buffer, sample_index, filtered_level) {
            buffer.clear();
            return Detections::BELL;
        }

        Detections::NONE
    }

    /// Search every ordered triple for a qualifying knock pattern (§4.7).
    fn find_knock(&self, buffer: &PeakBuffer, sample_index: u64) -> Option<(usize, usize, usize)> {
        let peaks = buffer.as_slice();
        let n = peaks.len();
        let max_ratio = self.sensitivity.knock_max_ratio();
        let reject_ratio = self.sensitivity.reject_ratio();

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    if self.triple_matches(peaks, i, j, k, sample_index, max_ratio, reject_ratio) {
                        return Some((i, j, k));
                    }
                }
            }
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn triple_matches(
        &self,
        peaks: &[Peak],
        i: usize,
        j: usize,
        k: usize,
        sample_index: u64,
        max_ratio: f32,
        reject_ratio: f32,
    ) -> bool {
        let (p1, p2, p3) = (&peaks[i], &peaks[j], &peaks[k]);
        let span = p3.time as i64 - p1.time as i64;

        if !(span > KNOCK_MIN_SPAN && span < KNOCK_MAX_SPAN) {
            return false;
        }
        if p1.width >= KNOCK_MAX_WIDTH || p2.width >= KNOCK_MAX_WIDTH || p3.width >= KNOCK_MAX_WIDTH {
            return false;
        }
        if (p3.time as i64) + span / 2 >= sample_index as i64 {
            return false;
        }

        let d1 = (p2.time as i64 - p1.time as i64) as f32;
        let d2 = (p3.time as i64 - p2.time as i64) as f32;
        let ratio = d1.max(d2) / d1.min(d2);
        if !(ratio < max_ratio) {
            return false;
        }

        let min_h = (p1.height.min(p2.height).min(p3.height) as f32 * reject_ratio) as i32;
        let window_lo = p1.time as i64 - span / 3;
        let window_hi = p3.time as i64 + span / 3;

        for (idx, other) in peaks.iter().enumerate() {
            if idx == i || idx == j || idx == k {
                continue;
            }
            let t = other.time as i64;
            if t > window_lo && t < window_hi && other.height > min_h {
                return false;
            }
        }

        true
    }

    /// Advance `filter_hits` on peaks still within the confirmation window;
    /// report true (and which peak) the first time one reaches the required
    /// hit count.
    fn confirm_bell(&self, buffer: &mut PeakBuffer, sample_index: u64, filtered_level: f32) -> bool {
        for peak in buffer.as_mut_slice() {
            if (peak.time as i64) + BELL_CONFIRM_WINDOW <= sample_index as i64 {
                continue;
            }
            if filtered_level > BELL_LEVEL_FACTOR * peak.filtered_level_at_start + BELL_MARGIN {
                peak.filter_hits += 1;
                if peak.filter_hits >= BELL_HITS_REQUIRED {
                    return true;
                }
            }
        }
        false
    }
}
