use tracing::debug;

use crate::core::{denormalize_position, normalize_offset};
use crate::interaction::{GestureMode, SnapGlide};
use crate::render::Renderer;

use super::{PinnedEntry, PinnedRangeSummary, StageEngine};

/// Releases closer than this to their snap target do not start a glide.
const MIN_GLIDE_DISTANCE_PX: f64 = 0.5;

impl<R: Renderer> StageEngine<R> {
    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    #[must_use]
    pub fn snap_glide(&self) -> Option<SnapGlide> {
        self.gesture.glide()
    }

    /// Starts a user scroll gesture; a running glide is cancelled.
    pub fn gesture_start(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.gesture.on_gesture_start();
    }

    /// Ends the gesture and starts a glide toward the snap target.
    ///
    /// Returns the target offset when a glide was started.
    pub fn gesture_end(&mut self) -> Option<f64> {
        self.gesture.on_gesture_end();
        if !self.is_mounted() || !self.coordinator.is_installed() {
            return None;
        }
        let max_scroll = self.max_scroll()?;
        let position = normalize_offset(self.scroll_offset, max_scroll)?;
        let target = self.coordinator.compute_snap_target(position);
        let target_offset = denormalize_position(target, max_scroll);
        if (target_offset - self.scroll_offset).abs() < MIN_GLIDE_DISTANCE_PX {
            return None;
        }

        self.gesture
            .start_glide(self.scroll_offset, target_offset, self.viewport.height_px());
        debug!(
            from = self.scroll_offset,
            to = target_offset,
            position,
            target,
            "snap glide started"
        );
        Some(target_offset)
    }

    /// Pinned ranges normalized against the installed rule; empty when inert.
    #[must_use]
    pub fn snap_summaries(&self) -> &[PinnedRangeSummary] {
        self.coordinator
            .rule()
            .map(|rule| rule.summaries())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pinned_ranges(&self) -> Vec<PinnedEntry> {
        self.registry.list()
    }
}
