use serde::{Deserialize, Serialize};

use crate::core::{
    Ease, Phase, PhaseTemplate, PropertySet, SectionId, SectionKind, SectionTimeline, TargetId,
    TimelineBuilder,
};
use crate::error::{StageError, StageResult};

use super::StageEngineConfig;
use super::engine_config::validate_non_negative;

pub const STAGE_MANIFEST_JSON_SCHEMA_V1: u32 = 1;

fn default_section_kind() -> SectionKind {
    SectionKind::pinned()
}

fn default_height_vh() -> Option<f64> {
    Some(1.0)
}

/// One keyframe binding as authored in a manifest.
///
/// Placement is either `phase` (optionally delayed by `start`) or an explicit
/// `window` for per-section exceptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub target: TargetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<[f64; 2]>,
    pub from: PropertySet,
    pub to: PropertySet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
}

impl BindingSpec {
    fn apply(&self, builder: TimelineBuilder) -> StageResult<TimelineBuilder> {
        let builder = match (self.window, self.phase) {
            (Some([start, end]), None) if self.start.is_none() => builder.window(
                self.target.clone(),
                start,
                end,
                self.from,
                self.to,
            ),
            (None, Some(phase)) => {
                builder.in_phase(self.target.clone(), phase, self.start, self.from, self.to)
            }
            _ => {
                return Err(StageError::InvalidData(format!(
                    "binding for `{}` needs either `phase` (with optional `start`) or `window`",
                    self.target
                )));
            }
        };
        Ok(match self.ease {
            Some(ease) => builder.eased(ease),
            None => builder,
        })
    }
}

/// Time-driven timeline played once after mount.
///
/// Binding windows are fractions of `duration_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroSpec {
    pub duration_seconds: f64,
    pub bindings: Vec<BindingSpec>,
}

/// Declared section, read once at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: SectionId,
    #[serde(default = "default_section_kind")]
    pub kind: SectionKind,
    /// Natural height in viewport heights; `null` when the host reports a
    /// measured content height instead.
    #[serde(default = "default_height_vh")]
    pub height_vh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrub_lag_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_template: Option<PhaseTemplate>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<IntroSpec>,
}

impl SectionSpec {
    #[must_use]
    pub fn pinned(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            kind: SectionKind::pinned(),
            height_vh: default_height_vh(),
            scrub_lag_seconds: None,
            phase_template: None,
            bindings: Vec::new(),
            intro: None,
        }
    }

    #[must_use]
    pub fn reveal(id: impl Into<SectionId>, height_vh: f64) -> Self {
        Self {
            kind: SectionKind::reveal(),
            height_vh: Some(height_vh),
            ..Self::pinned(id)
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: SectionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Natural height comes from `StageEngine::report_content_height`.
    #[must_use]
    pub fn with_measured_height(mut self) -> Self {
        self.height_vh = None;
        self
    }

    #[must_use]
    pub fn with_height_vh(mut self, height_vh: f64) -> Self {
        self.height_vh = Some(height_vh);
        self
    }

    #[must_use]
    pub fn with_scrub_lag(mut self, seconds: f64) -> Self {
        self.scrub_lag_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_phase_template(mut self, template: PhaseTemplate) -> Self {
        self.phase_template = Some(template);
        self
    }

    #[must_use]
    pub fn with_binding(mut self, binding: BindingSpec) -> Self {
        self.bindings.push(binding);
        self
    }

    #[must_use]
    pub fn with_intro(mut self, intro: IntroSpec) -> Self {
        self.intro = Some(intro);
        self
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.id.as_str().is_empty() {
            return Err(StageError::InvalidData(
                "section id must not be empty".to_owned(),
            ));
        }
        self.kind.validate()?;
        if let Some(height_vh) = self.height_vh {
            validate_non_negative("section height_vh", height_vh)?;
        }
        if let Some(lag) = self.scrub_lag_seconds {
            validate_non_negative("section scrub_lag_seconds", lag)?;
        }
        if let Some(intro) = &self.intro {
            if !intro.duration_seconds.is_finite() || intro.duration_seconds <= 0.0 {
                return Err(StageError::InvalidData(format!(
                    "intro of `{}` needs a positive duration",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Builds the scroll timeline against the section or default template.
    pub fn build_timeline(&self, default_template: PhaseTemplate) -> StageResult<SectionTimeline> {
        let template = self.phase_template.unwrap_or(default_template);
        build_from_specs(self.id.clone(), template, &self.bindings)
    }

    pub fn build_intro_timeline(&self) -> StageResult<Option<SectionTimeline>> {
        self.intro
            .as_ref()
            .map(|intro| {
                build_from_specs(self.id.clone(), PhaseTemplate::default(), &intro.bindings)
            })
            .transpose()
    }
}

fn build_from_specs(
    section: SectionId,
    template: PhaseTemplate,
    specs: &[BindingSpec],
) -> StageResult<SectionTimeline> {
    specs
        .iter()
        .try_fold(TimelineBuilder::new(section, template), |builder, spec| {
            spec.apply(builder)
        })?
        .build()
}

/// Versioned JSON document carrying engine config and sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageManifest {
    pub schema_version: u32,
    pub config: StageEngineConfig,
    pub sections: Vec<SectionSpec>,
}

impl StageManifest {
    #[must_use]
    pub fn new(config: StageEngineConfig, sections: Vec<SectionSpec>) -> Self {
        Self {
            schema_version: STAGE_MANIFEST_JSON_SCHEMA_V1,
            config,
            sections,
        }
    }

    pub fn from_json_str(input: &str) -> StageResult<Self> {
        let manifest: Self = serde_json::from_str(input).map_err(|e| {
            StageError::InvalidData(format!("failed to parse stage manifest: {e}"))
        })?;
        if manifest.schema_version != STAGE_MANIFEST_JSON_SCHEMA_V1 {
            return Err(StageError::InvalidData(format!(
                "unsupported stage manifest schema version: {}",
                manifest.schema_version
            )));
        }
        manifest.config.validate()?;
        for section in &manifest.sections {
            section.validate()?;
        }
        Ok(manifest)
    }

    pub fn to_json_pretty(&self) -> StageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            StageError::InvalidData(format!("failed to serialize stage manifest: {e}"))
        })
    }
}
