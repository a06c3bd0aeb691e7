use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{LayoutInput, SectionId, SectionKind, StageLayout, Viewport, measure_layout};
use crate::error::{StageError, StageResult};
use crate::render::Renderer;

use super::StageEngine;
use super::section_runtime::SectionRuntime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Unmounted,
    /// Mounted; the snap rule waits for the settle delay or `layout_ready`.
    Settling,
    /// Mounted with the snap rule evaluated.
    Ready,
}

/// Count of live resources owned by a mount cycle.
///
/// Every field is zero once the engine is unmounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandleAudit {
    pub scroll_listeners: usize,
    pub resize_listeners: usize,
    pub running_tweens: usize,
    pub pending_timers: usize,
    pub snap_rules: usize,
    pub registered_pins: usize,
}

impl HandleAudit {
    #[must_use]
    pub fn total(self) -> usize {
        self.scroll_listeners
            + self.resize_listeners
            + self.running_tweens
            + self.pending_timers
            + self.snap_rules
            + self.registered_pins
    }
}

/// Cancellable countdown before the snap rule is installed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SettleTimer {
    remaining: f64,
}

impl SettleTimer {
    fn new(seconds: f64) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    fn is_expired(self) -> bool {
        self.remaining <= 0.0
    }
}

impl<R: Renderer> StageEngine<R> {
    #[must_use]
    pub fn lifecycle(&self) -> LifecyclePhase {
        self.lifecycle
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle != LifecyclePhase::Unmounted
    }

    /// Attaches every section, starts intros and the settle countdown, and
    /// renders the initial frame. Mounting twice is a no-op.
    pub fn mount(&mut self) -> StageResult<()> {
        if self.is_mounted() {
            trace!("mount ignored: already mounted");
            return Ok(());
        }

        self.relayout()?;
        self.resize_listener = true;
        for section in &mut self.sections {
            section.listening = !matches!(section.kind, SectionKind::Static);
            if let Some(intro) = section.intro.as_mut() {
                intro.start();
                section.dirty = true;
            }
        }
        self.settle_timer = Some(SettleTimer::new(self.config.settle_delay_seconds));
        self.lifecycle = LifecyclePhase::Settling;
        debug!(
            sections = self.sections.len(),
            pinned = self.registry.len(),
            settle_delay = self.config.settle_delay_seconds,
            "stage mounted"
        );

        self.try_install_after_settle();
        self.update_progress(true);
        self.render_dirty()
    }

    /// Releases every listener, tween, timer and the snap rule.
    ///
    /// Safe at any point, including mid-transition or before the settle
    /// delay fired. Returns the post-teardown audit.
    pub fn unmount(&mut self) -> HandleAudit {
        if !self.is_mounted() {
            return self.handle_audit();
        }

        let timer_cancelled = self.settle_timer.take().is_some();
        let rule_dropped = self.coordinator.teardown();
        let pins_released = self.registry.clear();
        let glide_cancelled = self.gesture.glide().is_some();
        self.gesture.cancel_glide();
        self.gesture.on_gesture_end();
        self.resize_listener = false;
        for section in &mut self.sections {
            section.listening = false;
            section.dirty = false;
            section.scrub.settle();
            if let Some(intro) = section.intro.as_mut() {
                intro.cancel();
            }
        }
        self.lifecycle = LifecyclePhase::Unmounted;

        let audit = self.handle_audit();
        debug!(
            timer_cancelled,
            rule_dropped,
            pins_released,
            glide_cancelled,
            remaining_handles = audit.total(),
            "stage unmounted"
        );
        audit
    }

    #[must_use]
    pub fn handle_audit(&self) -> HandleAudit {
        let section_tweens: usize = self
            .sections
            .iter()
            .map(SectionRuntime::running_tweens)
            .sum();
        HandleAudit {
            scroll_listeners: self
                .sections
                .iter()
                .filter(|section| section.listening)
                .count(),
            resize_listeners: usize::from(self.resize_listener),
            running_tweens: section_tweens + usize::from(self.gesture.glide().is_some()),
            pending_timers: usize::from(self.settle_timer.is_some()),
            snap_rules: usize::from(self.coordinator.is_installed()),
            registered_pins: self.registry.len(),
        }
    }

    /// Stores a host-measured content height for a section declared with a
    /// measured height, then re-measures when mounted.
    pub fn report_content_height(
        &mut self,
        section: &SectionId,
        height_px: f64,
    ) -> StageResult<()> {
        if !height_px.is_finite() || height_px < 0.0 {
            return Err(StageError::InvalidData(format!(
                "content height of `{section}` must be finite and >= 0, got {height_px}"
            )));
        }
        let runtime = self
            .sections
            .iter_mut()
            .find(|runtime| &runtime.id == section)
            .ok_or_else(|| StageError::UnknownSection(section.clone()))?;
        runtime.content_height = Some(height_px);
        trace!(section = %section, height_px, "content height reported");

        if !self.is_mounted() {
            return Ok(());
        }
        self.relayout()?;
        self.refresh_snap_after_layout();
        self.update_progress(true);
        self.render_dirty()
    }

    /// Host signal that every section has measured.
    ///
    /// Installs the snap rule immediately instead of waiting for the settle
    /// delay. Returns `false` while unmounted or while a height is missing.
    pub fn layout_ready(&mut self) -> bool {
        if self.lifecycle != LifecyclePhase::Settling {
            return self.lifecycle == LifecyclePhase::Ready;
        }
        if !self.layout.as_ref().is_some_and(StageLayout::is_complete) {
            debug!("layout_ready ignored: sections still unmeasured");
            return false;
        }
        self.install_snap_rule();
        true
    }

    /// Re-measures every section for a new viewport and republishes the
    /// pinned ranges as one batch.
    pub fn resize(&mut self, viewport: Viewport) -> StageResult<()> {
        viewport.validate()?;
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        self.config.viewport = viewport;
        if !self.resize_listener {
            return Ok(());
        }

        self.gesture.cancel_glide();
        self.relayout()?;
        self.refresh_snap_after_layout();
        if let Some(max_scroll) = self.max_scroll() {
            self.scroll_offset = self.scroll_offset.clamp(0.0, max_scroll);
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            generation = self.registry.generation(),
            "stage resized"
        );
        self.update_progress(true);
        self.render_dirty()
    }

    pub(super) fn advance_settle_timer(&mut self, delta_seconds: f64) {
        if let Some(timer) = self.settle_timer.as_mut() {
            timer.remaining = (timer.remaining - delta_seconds).max(0.0);
        }
        self.try_install_after_settle();
    }

    /// Installs once the countdown ran out and every section has measured.
    fn try_install_after_settle(&mut self) {
        let expired = self.settle_timer.is_some_and(SettleTimer::is_expired);
        let complete = self.layout.as_ref().is_some_and(StageLayout::is_complete);
        if self.lifecycle == LifecyclePhase::Settling && expired && complete {
            self.install_snap_rule();
        }
    }

    fn refresh_snap_after_layout(&mut self) {
        match self.lifecycle {
            LifecyclePhase::Ready => self.install_snap_rule(),
            LifecyclePhase::Settling => self.try_install_after_settle(),
            LifecyclePhase::Unmounted => {}
        }
    }

    fn install_snap_rule(&mut self) {
        self.settle_timer = None;
        self.lifecycle = LifecyclePhase::Ready;
        let max_scroll = self.max_scroll();
        match max_scroll {
            Some(max_scroll) if self.config.snap.enabled => {
                self.coordinator.install(
                    &self.registry,
                    max_scroll,
                    self.config.snap.tolerance,
                );
            }
            _ => {
                self.coordinator.teardown();
                debug!(enabled = self.config.snap.enabled, "snap rule skipped");
            }
        }
    }

    /// Measures all sections and publishes the pinned ranges in one commit.
    fn relayout(&mut self) -> StageResult<()> {
        let viewport = self.viewport;
        let inputs: Vec<LayoutInput> = self
            .sections
            .iter()
            .map(|section| LayoutInput {
                id: section.id.clone(),
                kind: section.kind,
                natural_height: section.natural_height(viewport),
            })
            .collect();
        let layout = measure_layout(&inputs, viewport)?;

        let mut batch = self.registry.begin_batch();
        batch.clear();
        for (section, range) in layout.pinned() {
            batch.register(section.clone(), range);
        }
        self.registry.commit(batch)?;

        for (section, placement) in self.sections.iter_mut().zip(&layout.sections) {
            section.trigger = placement.trigger;
        }
        self.layout = Some(layout);
        Ok(())
    }
}
