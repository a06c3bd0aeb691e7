use serde::{Deserialize, Serialize};

use crate::core::Ease;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    Idle,
    /// The user holds an active scroll/drag gesture; snapping waits for release.
    Dragging,
    /// A snap glide is moving the viewport.
    Gliding,
}

/// Tuning for the glide that carries the viewport to a snap target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapGlideConfig {
    /// Shortest glide, in seconds.
    pub duration_min: f64,
    /// Longest glide, in seconds.
    pub duration_max: f64,
    /// Pause between gesture release and glide start, in seconds.
    pub delay_seconds: f64,
    pub ease: Ease,
}

impl Default for SnapGlideConfig {
    fn default() -> Self {
        Self {
            duration_min: 0.15,
            duration_max: 0.35,
            delay_seconds: 0.0,
            ease: Ease::Power2Out,
        }
    }
}

impl SnapGlideConfig {
    /// Duration grows with travelled distance (one viewport height reaches
    /// the maximum) and is clamped to `[duration_min, duration_max]`.
    #[must_use]
    pub fn duration_for(self, distance: f64, viewport_height: f64) -> f64 {
        let ratio = if viewport_height > 0.0 {
            (distance.abs() / viewport_height).min(1.0)
        } else {
            1.0
        };
        (self.duration_min + (self.duration_max - self.duration_min) * ratio)
            .clamp(self.duration_min, self.duration_max)
    }
}

/// Public snap glide runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGlide {
    pub from_offset: f64,
    pub to_offset: f64,
    pub duration: f64,
    pub elapsed: f64,
    pub delay_remaining: f64,
    pub ease: Ease,
}

impl SnapGlide {
    #[must_use]
    pub fn offset(self) -> f64 {
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        self.from_offset + (self.to_offset - self.from_offset) * self.ease.apply(t)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.delay_remaining <= 0.0 && self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    mode: GestureMode,
    glide_config: SnapGlideConfig,
    glide: Option<SnapGlide>,
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new(SnapGlideConfig::default())
    }
}

impl GestureState {
    #[must_use]
    pub fn new(glide_config: SnapGlideConfig) -> Self {
        Self {
            mode: GestureMode::Idle,
            glide_config,
            glide: None,
        }
    }

    #[must_use]
    pub fn mode(self) -> GestureMode {
        self.mode
    }

    #[must_use]
    pub fn glide_config(self) -> SnapGlideConfig {
        self.glide_config
    }

    pub fn set_glide_config(&mut self, config: SnapGlideConfig) {
        self.glide_config = config;
    }

    #[must_use]
    pub fn glide(self) -> Option<SnapGlide> {
        self.glide
    }

    /// Starts a user gesture, cancelling any running glide.
    pub fn on_gesture_start(&mut self) {
        self.glide = None;
        self.mode = GestureMode::Dragging;
    }

    pub fn on_gesture_end(&mut self) {
        self.mode = GestureMode::Idle;
    }

    pub fn start_glide(&mut self, from_offset: f64, to_offset: f64, viewport_height: f64) {
        let config = self.glide_config;
        self.glide = Some(SnapGlide {
            from_offset,
            to_offset,
            duration: config.duration_for(to_offset - from_offset, viewport_height),
            elapsed: 0.0,
            delay_remaining: config.delay_seconds.max(0.0),
            ease: config.ease,
        });
        self.mode = GestureMode::Gliding;
    }

    pub fn cancel_glide(&mut self) {
        self.glide = None;
        if self.mode == GestureMode::Gliding {
            self.mode = GestureMode::Idle;
        }
    }

    /// Advances the glide and returns the offset to apply.
    ///
    /// Returns `None` when no glide is running or while its delay elapses.
    pub fn step_glide(&mut self, delta_seconds: f64) -> Option<f64> {
        let mut glide = self.glide?;
        let mut remaining = delta_seconds.max(0.0);
        if glide.delay_remaining > 0.0 {
            let consumed = remaining.min(glide.delay_remaining);
            glide.delay_remaining -= consumed;
            remaining -= consumed;
            if glide.delay_remaining > 0.0 {
                self.glide = Some(glide);
                return None;
            }
        }

        glide.elapsed = (glide.elapsed + remaining).min(glide.duration);
        let offset = glide.offset();
        if glide.is_finished() {
            self.glide = None;
            self.mode = GestureMode::Idle;
        } else {
            self.glide = Some(glide);
        }
        Some(offset)
    }
}
