use serde::{Deserialize, Serialize};

const SETTLE_EPSILON: f64 = 1e-4;

/// Smoothed follower of a section's pushed progress.
///
/// The displayed value closes ~95% of the gap within `lag_seconds`; a lag of
/// zero follows the target immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrubState {
    lag_seconds: f64,
    target: f64,
    current: f64,
}

impl ScrubState {
    #[must_use]
    pub fn new(lag_seconds: f64) -> Self {
        Self {
            lag_seconds: if lag_seconds.is_finite() {
                lag_seconds.max(0.0)
            } else {
                0.0
            },
            target: 0.0,
            current: 0.0,
        }
    }

    #[must_use]
    pub fn lag_seconds(self) -> f64 {
        self.lag_seconds
    }

    #[must_use]
    pub fn target(self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn current(self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn is_settled(self) -> bool {
        self.current == self.target
    }

    /// Sets a new target. Returns `true` when the displayed value moved.
    pub fn push(&mut self, target: f64) -> bool {
        self.target = target;
        if self.lag_seconds == 0.0 {
            let moved = self.current != target;
            self.current = target;
            return moved;
        }
        false
    }

    /// Advances the follower. Returns `true` when the displayed value moved.
    pub fn step(&mut self, delta_seconds: f64) -> bool {
        if self.is_settled() || delta_seconds.is_nan() || delta_seconds <= 0.0 {
            return false;
        }
        let alpha = 1.0 - (-delta_seconds * 3.0 / self.lag_seconds).exp();
        self.current += (self.target - self.current) * alpha;
        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
        true
    }

    /// Drops any in-flight catch-up and jumps to the target.
    pub fn settle(&mut self) {
        self.current = self.target;
    }

    /// Forces both values; used when a timeline is (re)attached.
    pub fn reset(&mut self, progress: f64) {
        self.target = progress;
        self.current = progress;
    }
}
