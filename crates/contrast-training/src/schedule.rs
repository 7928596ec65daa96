//! Learning-rate decay.
//!
//! The rate falls quickly at first and flattens out towards `lr_min`:
//!
//! ```text
//! lr(p) = lr_min + (lr_max - lr_min) / (1 + k * p²)      p ∈ [0, 1]
//! ```
//!
//! With the defaults (`0.1`, `0.005`, `19`) the rate is `0.1` at the start,
//! roughly `0.024` half way through and `0.0095` at the end.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningRateSchedule {
    pub lr_max: f32,
    pub lr_min: f32,
    /// Decay steepness.
    pub k: f32,
}

impl Default for LearningRateSchedule {
    fn default() -> Self {
        Self {
            lr_max: 0.1,
            lr_min: 0.005,
            k: 19.0,
        }
    }
}

impl LearningRateSchedule {
    /// Learning rate at `progress` (clamped to `[0, 1]`).
    #[must_use]
    pub fn rate(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        self.lr_min + (self.lr_max - self.lr_min) / (1.0 + self.k * p * p)
    }

    /// Learning rate for the `current`-th (1-based) unit of work out of `total`.
    #[must_use]
    pub fn rate_at(&self, current: usize, total: usize) -> f32 {
        self.rate(progress(current, total))
    }
}

/// Fraction of the run completed when the `current`-th (1-based) of `total`
/// units is being processed: `0` for the first, `1` for the last.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn progress(current: usize, total: usize) -> f32 {
    if total <= 1 {
        return 0.0;
    }
    let done = current.saturating_sub(1).min(total - 1);
    done as f32 / (total - 1) as f32
}
