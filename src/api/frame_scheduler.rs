use tracing::trace;

use crate::error::{StageError, StageResult};
use crate::render::Renderer;

use super::StageEngine;

impl<R: Renderer> StageEngine<R> {
    /// Advances timers and tweens by `delta_seconds` and renders what moved.
    ///
    /// Order per tick: settle countdown, snap glide, scrub catch-up, intro
    /// playback, render.
    pub fn frame(&mut self, delta_seconds: f64) -> StageResult<()> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(StageError::InvalidData(format!(
                "frame delta must be finite and >= 0, got {delta_seconds}"
            )));
        }
        self.clock_seconds += delta_seconds;
        if !self.is_mounted() {
            return Ok(());
        }

        self.advance_settle_timer(delta_seconds);

        if let Some(offset) = self.gesture.step_glide(delta_seconds) {
            trace!(offset, "glide step");
            self.scroll_offset = offset;
            self.update_progress(false);
        }

        for section in &mut self.sections {
            if section.scrub.step(delta_seconds) {
                section.dirty = true;
            }
            if let Some(intro) = section.intro.as_mut().filter(|intro| intro.is_running()) {
                intro.elapsed = (intro.elapsed + delta_seconds).min(intro.duration_seconds);
                section.dirty = true;
            }
        }

        self.render_dirty()
    }
}
