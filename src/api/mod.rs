mod engine_config;
mod engine_snapshot;
mod frame_scheduler;
mod gesture_controller;
mod lifecycle;
mod pin_registry;
mod scroll_progress;
mod section_config;
mod section_runtime;
mod snap_coordinator;

pub use engine_config::{SnapBehavior, StageEngineConfig};
pub use engine_snapshot::{
    STAGE_SNAPSHOT_JSON_SCHEMA_V1, SectionSnapshot, StageSnapshot, StageSnapshotJsonContractV1,
};
pub use lifecycle::{HandleAudit, LifecyclePhase};
pub use pin_registry::{PinBatch, PinRegistry, PinnedEntry};
pub use section_config::{
    BindingSpec, IntroSpec, STAGE_MANIFEST_JSON_SCHEMA_V1, SectionSpec, StageManifest,
};
pub use snap_coordinator::{PinnedRangeSummary, SnapCoordinator, SnapRule, summarize_pins};

use std::collections::HashSet;

use tracing::debug;

use crate::core::{ScrollRange, SectionId, SectionTimeline, StageLayout, Viewport};
use crate::error::{StageError, StageResult};
use crate::interaction::GestureState;
use crate::render::Renderer;

use lifecycle::SettleTimer;
use section_runtime::SectionRuntime;

/// Scroll-to-timeline coordinator for one page.
///
/// The engine owns every section timeline, the pin registry and the global
/// snap rule for a mount cycle. Hosts feed it scroll offsets, resizes,
/// gestures and frame ticks; it pushes resolved visual states to `R`.
pub struct StageEngine<R: Renderer> {
    renderer: R,
    config: StageEngineConfig,
    viewport: Viewport,
    sections: Vec<SectionRuntime>,
    layout: Option<StageLayout>,
    registry: PinRegistry,
    coordinator: SnapCoordinator,
    gesture: GestureState,
    lifecycle: LifecyclePhase,
    settle_timer: Option<SettleTimer>,
    resize_listener: bool,
    scroll_offset: f64,
    clock_seconds: f64,
}

impl<R: Renderer> StageEngine<R> {
    /// Validates config and builds every section timeline.
    ///
    /// Malformed bindings are configuration errors: the engine refuses to
    /// start rather than clamp them.
    pub fn new(
        renderer: R,
        config: StageEngineConfig,
        sections: Vec<SectionSpec>,
    ) -> StageResult<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(sections.len());
        for spec in &sections {
            if !seen.insert(spec.id.clone()) {
                return Err(StageError::DuplicateSection(spec.id.clone()));
            }
        }

        let sections = sections
            .iter()
            .map(|spec| SectionRuntime::from_spec(spec, &config))
            .collect::<StageResult<Vec<_>>>()?;
        debug!(sections = sections.len(), "stage engine created");

        Ok(Self {
            renderer,
            config,
            viewport: config.viewport,
            sections,
            layout: None,
            registry: PinRegistry::new(),
            coordinator: SnapCoordinator::new(),
            gesture: GestureState::new(config.snap.glide),
            lifecycle: LifecyclePhase::Unmounted,
            settle_timer: None,
            resize_listener: false,
            scroll_offset: 0.0,
            clock_seconds: 0.0,
        })
    }

    pub fn from_manifest(renderer: R, manifest: StageManifest) -> StageResult<Self> {
        Self::new(renderer, manifest.config, manifest.sections)
    }

    #[must_use]
    pub fn config(&self) -> &StageEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Seconds accumulated from frame ticks since construction.
    #[must_use]
    pub fn clock_seconds(&self) -> f64 {
        self.clock_seconds
    }

    #[must_use]
    pub fn layout(&self) -> Option<&StageLayout> {
        self.layout.as_ref()
    }

    /// Maximum scroll offset, known once every section has measured.
    #[must_use]
    pub fn max_scroll(&self) -> Option<f64> {
        self.layout.as_ref().and_then(StageLayout::max_scroll)
    }

    #[must_use]
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|section| section.id.clone()).collect()
    }

    fn section(&self, id: &SectionId) -> Option<&SectionRuntime> {
        self.sections.iter().find(|section| &section.id == id)
    }

    #[must_use]
    pub fn section_trigger(&self, id: &SectionId) -> Option<ScrollRange> {
        self.section(id).and_then(|section| section.trigger)
    }

    #[must_use]
    pub fn section_timeline(&self, id: &SectionId) -> Option<&SectionTimeline> {
        self.section(id).map(|section| &section.timeline)
    }

    #[must_use]
    pub fn pin_registry(&self) -> &PinRegistry {
        &self.registry
    }

    #[must_use]
    pub fn snap_coordinator(&self) -> &SnapCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn has_snap_rule(&self) -> bool {
        self.coordinator.is_installed()
    }

    /// Snap destination for a normalized position; identity without a rule.
    #[must_use]
    pub fn compute_snap_target(&self, value: f64) -> f64 {
        self.coordinator.compute_snap_target(value)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
