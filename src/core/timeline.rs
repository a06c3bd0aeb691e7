use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::{
    Ease, KeyframeBinding, Phase, PhaseTemplate, ProgressWindow, Property, PropertySet,
    SectionId, TargetId, Viewport, VisualState,
};
use crate::error::StageResult;

/// Resolved target states for one progress value, in first-binding order.
pub type TimelineSample = IndexMap<TargetId, VisualState>;

/// Phase-based animation program keyed to a section's local progress.
///
/// Bindings are validated once at construction; sampling never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTimeline {
    section: SectionId,
    template: PhaseTemplate,
    bindings: Vec<KeyframeBinding>,
    // Binding indices per target, ordered by window start (stable).
    tracks: IndexMap<TargetId, SmallVec<[usize; 4]>>,
}

impl SectionTimeline {
    pub fn new(
        section: SectionId,
        template: PhaseTemplate,
        bindings: Vec<KeyframeBinding>,
    ) -> StageResult<Self> {
        template.validate()?;
        for binding in &bindings {
            binding.validate()?;
        }

        let mut tracks: IndexMap<TargetId, SmallVec<[usize; 4]>> = IndexMap::new();
        for (index, binding) in bindings.iter().enumerate() {
            tracks
                .entry(binding.target().clone())
                .or_default()
                .push(index);
        }
        for indices in tracks.values_mut() {
            indices.sort_by_key(|index| OrderedFloat(bindings[*index].window().start()));
        }

        Ok(Self {
            section,
            template,
            bindings,
            tracks,
        })
    }

    /// Timeline without bindings; used by sections that only pin.
    #[must_use]
    pub fn empty(section: SectionId, template: PhaseTemplate) -> Self {
        Self {
            section,
            template,
            bindings: Vec::new(),
            tracks: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    #[must_use]
    pub fn template(&self) -> PhaseTemplate {
        self.template
    }

    #[must_use]
    pub fn bindings(&self) -> &[KeyframeBinding] {
        &self.bindings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.tracks.keys()
    }

    #[must_use]
    pub fn phase_at(&self, progress: f64) -> Phase {
        self.template.phase_at(progress)
    }

    /// Bindings whose window contains `progress`.
    pub fn active_bindings(&self, progress: f64) -> impl Iterator<Item = &KeyframeBinding> {
        self.bindings
            .iter()
            .filter(move |binding| binding.window().contains(progress))
    }

    #[must_use]
    pub fn sample(&self, progress: f64, viewport: Viewport) -> TimelineSample {
        self.tracks
            .keys()
            .filter_map(|target| {
                self.sample_target(target, progress, viewport)
                    .map(|state| (target.clone(), state))
            })
            .collect()
    }

    /// Resolves one target at `progress`.
    ///
    /// Per property, the latest-starting binding that has started governs; if
    /// none has started yet, the earliest binding holds its from-state.
    #[must_use]
    pub fn sample_target(
        &self,
        target: &TargetId,
        progress: f64,
        viewport: Viewport,
    ) -> Option<VisualState> {
        let indices = self.tracks.get(target)?;
        let progress = progress.clamp(0.0, 1.0);
        let mut state = VisualState::default();

        for property in Property::ALL {
            let mut earliest = None;
            let mut governing = None;
            for binding in indices
                .iter()
                .map(|index| &self.bindings[*index])
                .filter(|binding| binding.from_state().has(property))
            {
                earliest.get_or_insert(binding);
                if binding.has_started(progress) {
                    governing = Some(binding);
                }
            }
            if let Some(value) = governing
                .or(earliest)
                .and_then(|binding| binding.value_at(property, progress, viewport))
            {
                state.set(property, value);
            }
        }

        Some(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Phase(Phase),
    PhaseFrom(Phase, f64),
    Window(f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
struct PendingBinding {
    target: TargetId,
    from: PropertySet,
    to: PropertySet,
    placement: Placement,
    ease: Ease,
}

/// Builds a [`SectionTimeline`] from phase-relative placements.
///
/// Entrance bindings default to `power1.out`, exit bindings to `power2.in`
/// and explicit windows to linear; `eased` overrides the last binding added.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    section: SectionId,
    template: PhaseTemplate,
    pending: Vec<PendingBinding>,
}

impl TimelineBuilder {
    #[must_use]
    pub fn new(section: impl Into<SectionId>, template: PhaseTemplate) -> Self {
        Self {
            section: section.into(),
            template,
            pending: Vec::new(),
        }
    }

    fn push(
        mut self,
        target: impl Into<TargetId>,
        placement: Placement,
        from: PropertySet,
        to: PropertySet,
    ) -> Self {
        let ease = match placement {
            Placement::Phase(Phase::Entrance) | Placement::PhaseFrom(Phase::Entrance, _) => {
                Ease::Power1Out
            }
            Placement::Phase(Phase::Exit) | Placement::PhaseFrom(Phase::Exit, _) => Ease::Power2In,
            _ => Ease::Linear,
        };
        self.pending.push(PendingBinding {
            target: target.into(),
            from,
            to,
            placement,
            ease,
        });
        self
    }

    #[must_use]
    pub fn enter(self, target: impl Into<TargetId>, from: PropertySet, to: PropertySet) -> Self {
        self.push(target, Placement::Phase(Phase::Entrance), from, to)
    }

    #[must_use]
    pub fn enter_at(
        self,
        target: impl Into<TargetId>,
        start: f64,
        from: PropertySet,
        to: PropertySet,
    ) -> Self {
        self.push(target, Placement::PhaseFrom(Phase::Entrance, start), from, to)
    }

    #[must_use]
    pub fn exit(self, target: impl Into<TargetId>, from: PropertySet, to: PropertySet) -> Self {
        self.push(target, Placement::Phase(Phase::Exit), from, to)
    }

    #[must_use]
    pub fn exit_at(
        self,
        target: impl Into<TargetId>,
        start: f64,
        from: PropertySet,
        to: PropertySet,
    ) -> Self {
        self.push(target, Placement::PhaseFrom(Phase::Exit, start), from, to)
    }

    /// Places a binding in `phase`, optionally starting later than the phase does.
    #[must_use]
    pub fn in_phase(
        self,
        target: impl Into<TargetId>,
        phase: Phase,
        start: Option<f64>,
        from: PropertySet,
        to: PropertySet,
    ) -> Self {
        let placement = match start {
            Some(start) => Placement::PhaseFrom(phase, start),
            None => Placement::Phase(phase),
        };
        self.push(target, placement, from, to)
    }

    /// Per-section exception outside the phase template.
    #[must_use]
    pub fn window(
        self,
        target: impl Into<TargetId>,
        start: f64,
        end: f64,
        from: PropertySet,
        to: PropertySet,
    ) -> Self {
        self.push(target, Placement::Window(start, end), from, to)
    }

    /// Places each target at `first_start + i * step` within `phase`.
    #[must_use]
    pub fn stagger<T, I>(
        mut self,
        targets: I,
        phase: Phase,
        first_start: f64,
        step: f64,
        from: PropertySet,
        to: PropertySet,
    ) -> Self
    where
        T: Into<TargetId>,
        I: IntoIterator<Item = T>,
    {
        for (i, target) in targets.into_iter().enumerate() {
            let start = first_start + step * i as f64;
            self = self.push(target, Placement::PhaseFrom(phase, start), from, to);
        }
        self
    }

    #[must_use]
    pub fn eased(mut self, ease: Ease) -> Self {
        if let Some(last) = self.pending.last_mut() {
            last.ease = ease;
        }
        self
    }

    pub fn build(self) -> StageResult<SectionTimeline> {
        let template = self.template;
        let bindings = self
            .pending
            .into_iter()
            .map(|pending| {
                let window = match pending.placement {
                    Placement::Phase(phase) => template.window(phase)?,
                    Placement::PhaseFrom(phase, start) => template.window_from(phase, start)?,
                    Placement::Window(start, end) => ProgressWindow::new(start, end)?,
                };
                KeyframeBinding::new(pending.target, pending.from, pending.to, window, pending.ease)
            })
            .collect::<StageResult<Vec<_>>>()?;
        SectionTimeline::new(self.section, template, bindings)
    }
}
