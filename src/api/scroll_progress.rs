use tracing::trace;

use crate::core::{
    Phase, SectionId, TimelineSample, boundary_progress, local_progress, normalize_offset,
};
use crate::error::{StageError, StageResult};
use crate::render::{Renderer, StageFrame, TargetFrame};

use super::StageEngine;

impl<R: Renderer> StageEngine<R> {
    /// Applies a raw scroll offset reported by the host.
    ///
    /// Offsets are clamped to the scrollable extent. While unmounted the
    /// offset is only recorded. A host-driven offset cancels a running snap
    /// glide, so hosts must not echo glide positions back through here.
    pub fn scroll_to(&mut self, offset: f64) -> StageResult<()> {
        if !offset.is_finite() {
            return Err(StageError::InvalidData(format!(
                "scroll offset must be finite, got {offset}"
            )));
        }
        self.scroll_offset = match self.max_scroll() {
            Some(max_scroll) => offset.clamp(0.0, max_scroll),
            None => offset.max(0.0),
        };
        if !self.is_mounted() {
            return Ok(());
        }
        if self.gesture.glide().is_some() {
            trace!(offset = self.scroll_offset, "host scroll cancels glide");
            self.gesture.cancel_glide();
        }
        self.update_progress(false);
        self.render_dirty()
    }

    /// Normalized document position in `[0, 1]`; `None` without overflow.
    #[must_use]
    pub fn normalized_scroll(&self) -> Option<f64> {
        self.max_scroll()
            .and_then(|max_scroll| normalize_offset(self.scroll_offset, max_scroll))
    }

    /// Local progress last pushed by the scroll source.
    #[must_use]
    pub fn section_progress(&self, id: &SectionId) -> Option<f64> {
        self.section(id).map(|section| section.scrub.target())
    }

    /// Progress currently rendered; trails `section_progress` while scrubbing.
    #[must_use]
    pub fn section_displayed_progress(&self, id: &SectionId) -> Option<f64> {
        self.section(id).map(|section| section.scrub.current())
    }

    #[must_use]
    pub fn section_phase(&self, id: &SectionId) -> Option<Phase> {
        self.section(id)
            .map(|section| section.timeline.phase_at(section.scrub.current()))
    }

    /// Visual states the section would render right now.
    #[must_use]
    pub fn section_sample(&self, id: &SectionId) -> Option<TimelineSample> {
        self.section(id).map(|section| section.sample(self.viewport))
    }

    /// Pushes progress to every listening section with a measured range.
    ///
    /// Inside its range a section receives its local progress. Once the
    /// offset leaves the range it receives the crossed boundary once and is
    /// then left alone. `force` resets displayed progress without scrubbing.
    pub(super) fn update_progress(&mut self, force: bool) {
        let offset = self.scroll_offset;
        for section in self.sections.iter_mut().filter(|section| section.listening) {
            let Some(range) = section.trigger else {
                continue;
            };
            let progress = if range.is_degenerate() {
                0.0
            } else if range.contains(offset) {
                local_progress(offset, range)
            } else {
                match boundary_progress(offset, range) {
                    Some(boundary) => boundary,
                    None => continue,
                }
            };

            if force {
                section.scrub.reset(progress);
                section.dirty = true;
            } else if section.scrub.target() != progress {
                trace!(section = %section.id, progress, "progress pushed");
                if section.scrub.push(progress) {
                    section.dirty = true;
                }
            }
        }
    }

    /// Renders every section whose displayed state changed since the last
    /// frame. Nothing reaches the renderer when no section is dirty.
    pub(super) fn render_dirty(&mut self) -> StageResult<()> {
        let viewport = self.viewport;
        let mut frame = StageFrame::new(viewport, self.scroll_offset);
        for section in self.sections.iter_mut().filter(|section| section.dirty) {
            for (target, state) in section.sample(viewport) {
                frame.targets.push(TargetFrame {
                    section: section.id.clone(),
                    target,
                    state,
                });
            }
            section.dirty = false;
        }

        if !frame.is_empty() {
            self.renderer.render(&frame)?;
        }
        for intro in self
            .sections
            .iter_mut()
            .filter_map(|section| section.intro.as_mut())
        {
            intro.finish_if_complete();
        }
        Ok(())
    }
}
