use crate::core::{
    ScrollRange, ScrubState, SectionId, SectionKind, SectionTimeline, TimelineSample, Viewport,
};
use crate::error::StageResult;

use super::{SectionSpec, StageEngineConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IntroState {
    Pending,
    Running,
    Finished,
    Cancelled,
}

/// Time-driven intro timeline (hero load animation).
#[derive(Debug, Clone, PartialEq)]
pub(super) struct IntroPlayback {
    pub(super) timeline: SectionTimeline,
    pub(super) duration_seconds: f64,
    pub(super) elapsed: f64,
    pub(super) state: IntroState,
}

impl IntroPlayback {
    pub(super) fn start(&mut self) {
        self.elapsed = 0.0;
        self.state = IntroState::Running;
    }

    pub(super) fn cancel(&mut self) {
        if self.state == IntroState::Running {
            self.state = IntroState::Cancelled;
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.state == IntroState::Running
    }

    pub(super) fn progress(&self) -> f64 {
        (self.elapsed / self.duration_seconds).clamp(0.0, 1.0)
    }

    /// Marks the playback finished once the full duration was rendered.
    pub(super) fn finish_if_complete(&mut self) {
        if self.is_running() && self.elapsed >= self.duration_seconds {
            self.state = IntroState::Finished;
        }
    }
}

/// Per-section state owned by the engine for one mount cycle.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SectionRuntime {
    pub(super) id: SectionId,
    pub(super) kind: SectionKind,
    pub(super) height_vh: Option<f64>,
    pub(super) content_height: Option<f64>,
    pub(super) timeline: SectionTimeline,
    pub(super) intro: Option<IntroPlayback>,
    pub(super) trigger: Option<ScrollRange>,
    pub(super) scrub: ScrubState,
    pub(super) listening: bool,
    pub(super) dirty: bool,
}

impl SectionRuntime {
    pub(super) fn from_spec(spec: &SectionSpec, config: &StageEngineConfig) -> StageResult<Self> {
        spec.validate()?;
        let timeline = spec.build_timeline(config.phase_template)?;
        let intro = match (spec.build_intro_timeline()?, &spec.intro) {
            (Some(timeline), Some(intro)) => Some(IntroPlayback {
                timeline,
                duration_seconds: intro.duration_seconds,
                elapsed: 0.0,
                state: IntroState::Pending,
            }),
            _ => None,
        };
        let default_lag = match spec.kind {
            SectionKind::Pinned { .. } => config.pinned_scrub_lag_seconds,
            SectionKind::Reveal { .. } | SectionKind::Static => config.reveal_scrub_lag_seconds,
        };

        Ok(Self {
            id: spec.id.clone(),
            kind: spec.kind,
            height_vh: spec.height_vh,
            content_height: None,
            timeline,
            intro,
            trigger: None,
            scrub: ScrubState::new(spec.scrub_lag_seconds.unwrap_or(default_lag)),
            listening: false,
            dirty: false,
        })
    }

    pub(super) fn natural_height(&self, viewport: Viewport) -> Option<f64> {
        self.height_vh
            .map(|vh| vh * viewport.height_px())
            .or(self.content_height)
    }

    /// Scroll-driven sample with a running intro layered on top.
    pub(super) fn sample(&self, viewport: Viewport) -> TimelineSample {
        let mut sample = self.timeline.sample(self.scrub.current(), viewport);
        if let Some(intro) = self.intro.as_ref().filter(|intro| intro.is_running()) {
            for (target, state) in intro.timeline.sample(intro.progress(), viewport) {
                sample.insert(target, state);
            }
        }
        sample
    }

    /// Scrub catch-up and intro playback each count as one tween.
    pub(super) fn running_tweens(&self) -> usize {
        usize::from(!self.scrub.is_settled())
            + usize::from(self.intro.as_ref().is_some_and(IntroPlayback::is_running))
    }
}
