//! One-pole exponential level tracker shared by the decorrelated-level and
//! bell-level estimates (§4.2, §4.6).
//!
//! Time constant is fixed at the spec's 256-sample / (255/256, 1/256) step;
//! only the initial value and the hardened minimum differ between uses.

/// Smallest value the tracker is allowed to decay to. The normalizer divides
/// by this value (§4.2); the spec notes it "never reaches 0... given nonzero
/// input history" but requires implementations to clamp as a hardened
/// safeguard against that assumption failing (§7).
pub const LEVEL_FLOOR: f32 = 1.0;

const DECAY: f32 = 255.0 / 256.0;
const STEP: f32 = 1.0 / 256.0;

/// Exponentially decaying estimate of a signal's absolute magnitude.
#[derive(Debug, Clone, Copy)]
pub struct LevelTracker {
    level: f32,
}

impl LevelTracker {
    pub fn new(initial: f32) -> Self {
        Self {
            level: initial.max(LEVEL_FLOOR),
        }
    }

    #[inline]
    pub fn update(&mut self, sample: f32) -> f32 {
        self.level = (self.level * DECAY + sample.abs() * STEP).max(LEVEL_FLOOR);
        self.level
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self, initial: f32) {
        self.level = initial.max(LEVEL_FLOOR);
    }
}
