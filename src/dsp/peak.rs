//! Peak records and the bounded peak buffer (§3 "Peak record", §3 "Peak
//! buffer", §4.4).

use crate::config::MAX_PEAKS;

/// One closed transient excursion of the windowed level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Sample index at which the excursion's maximum was observed — the
    /// location of the peak, not its onset.
    pub time: u64,
    pub height: i32,
    pub area: i64,
    /// `area / height`, computed when the peak closes — a coarse,
    /// dominance-weighted duration.
    pub width: i32,
    /// Bell-level value sampled when the excursion opened.
    pub filtered_level_at_start: f32,
    /// Advances when bell-level later exceeds the baseline by the §4.7
    /// factor; reaching 5 confirms BELL.
    pub filter_hits: u8,
}

/// Tracks the single in-flight excursion of the windowed level, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakExtractor {
    open: Option<OpenPeak>,
}

#[derive(Debug, Clone, Copy)]
struct OpenPeak {
    time: u64,
    height: i32,
    area: i64,
    filtered_level_at_start: f32,
}

/// Outcome of feeding one sample into the extractor.
pub enum ExtractorEvent {
    None,
    Closed(Peak),
}

impl PeakExtractor {
    pub fn new() -> Self {
        Self { open: None }
    }

    /// Feed one sample's windowed level and current bell-level baseline.
    #[inline]
    pub fn process(
        &mut self,
        sample_index: u64,
        window_level: i32,
        filtered_level: f32,
    ) -> ExtractorEvent {
        match &mut self.open {
            None => {
                if window_level > 0 {
                    self.open = Some(OpenPeak {
                        time: sample_index,
                        height: window_level,
                        area: window_level as i64,
                        filtered_level_at_start: filtered_level,
                    });
                }
                ExtractorEvent::None
            }
            Some(peak) => {
                if window_level > 0 {
                    if window_level > peak.height {
                        peak.time = sample_index;
                        peak.height = window_level;
                    }
                    peak.area += window_level as i64;
                    ExtractorEvent::None
                } else {
                    let closed = Peak {
                        time: peak.time,
                        height: peak.height,
                        area: peak.area,
                        width: if peak.height > 0 {
                            (peak.area / peak.height as i64) as i32
                        } else {
                            0
                        },
                        filtered_level_at_start: peak.filtered_level_at_start,
                        filter_hits: 0,
                    };
                    self.open = None;
                    ExtractorEvent::Closed(closed)
                }
            }
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn reset(&mut self) {
        self.open = None;
    }
}

/// Outcome of [`PeakBuffer::insert`], for diagnostics under `DISP_EVENTS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    /// Buffer was full; an existing (smaller) peak was evicted to make room.
    Evicted,
    /// Buffer was full and the incoming peak was itself the smallest; it was
    /// dropped rather than evicting anything (see spec §9 open question).
    DroppedSmallest,
}

/// Bounded, time-ordered buffer of accepted peaks.
#[derive(Debug, Clone)]
pub struct PeakBuffer {
    peaks: [Peak; MAX_PEAKS],
    len: usize,
    cap: usize,
}

const ZERO_PEAK: Peak = Peak {
    time: 0,
    height: 0,
    area: 0,
    width: 0,
    filtered_level_at_start: 0.0,
    filter_hits: 0,
};

impl PeakBuffer {
    pub fn new(cap: usize) -> Self {
        debug_assert!(cap >= 1 && cap <= MAX_PEAKS);
        Self {
            peaks: [ZERO_PEAK; MAX_PEAKS],
            len: 0,
            cap: cap.clamp(1, MAX_PEAKS),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Peak] {
        &self.peaks[..self.len]
    }

    /// Insert a newly closed peak, which always has the latest `time` of any
    /// entry (peaks close in time order).
    pub fn insert(&mut self, peak: Peak) -> InsertOutcome {
        if self.len < self.cap {
            self.peaks[self.len] = peak;
            self.len += 1;
            return InsertOutcome::Inserted;
        }

        let (min_idx, min_height) = self.peaks[..self.len]
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.height)
            .map(|(i, p)| (i, p.height))
            .expect("buffer at capacity is nonempty");

        if peak.height <= min_height {
            return InsertOutcome::DroppedSmallest;
        }

        // Evict the smallest, then shift to keep ascending time order with
        // the new peak appended at the end.
        for i in min_idx..self.len - 1 {
            self.peaks[i] = self.peaks[i + 1];
        }
        self.peaks[self.len - 1] = peak;
        InsertOutcome::Evicted
    }

    /// Drop expired entries from the front while `pred` holds.
    pub fn expire_front_while(&mut self, mut pred: impl FnMut(&Peak) -> bool) {
        let mut drop_count = 0;
        while drop_count < self.len && pred(&self.peaks[drop_count]) {
            drop_count += 1;
        }
        if drop_count == 0 {
            return;
        }
        self.peaks.copy_within(drop_count..self.len, 0);
        self.len -= drop_count;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Mutable access for the bell-confirmation pass, which advances
    /// `filter_hits` on individual entries.
    pub fn as_mut_slice(&mut self) -> &mut [Peak] {
        &mut self.peaks[..self.len]
    }
}
