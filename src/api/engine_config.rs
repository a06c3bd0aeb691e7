use serde::{Deserialize, Serialize};

use crate::core::{Ease, PhaseTemplate, Viewport};
use crate::error::{StageError, StageResult};
use crate::interaction::SnapGlideConfig;

fn default_true() -> bool {
    true
}

fn default_snap_tolerance() -> f64 {
    0.02
}

fn default_settle_delay_seconds() -> f64 {
    0.5
}

fn default_pinned_scrub_lag_seconds() -> f64 {
    0.6
}

/// Global snapping policy handed to the scroll-physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapBehavior {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Normalized margin added to both ends of every pinned range.
    #[serde(default = "default_snap_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub glide: SnapGlideConfig,
}

impl Default for SnapBehavior {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: default_snap_tolerance(),
            glide: SnapGlideConfig::default(),
        }
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can ship stage setup next to the section manifest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub snap: SnapBehavior,
    /// Fallback wait after mount before the snap rule is installed.
    #[serde(default = "default_settle_delay_seconds")]
    pub settle_delay_seconds: f64,
    #[serde(default)]
    pub phase_template: PhaseTemplate,
    #[serde(default = "default_pinned_scrub_lag_seconds")]
    pub pinned_scrub_lag_seconds: f64,
    #[serde(default)]
    pub reveal_scrub_lag_seconds: f64,
}

impl StageEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            snap: SnapBehavior::default(),
            settle_delay_seconds: default_settle_delay_seconds(),
            phase_template: PhaseTemplate::default(),
            pinned_scrub_lag_seconds: default_pinned_scrub_lag_seconds(),
            reveal_scrub_lag_seconds: 0.0,
        }
    }

    #[must_use]
    pub fn with_snap(mut self, snap: SnapBehavior) -> Self {
        self.snap = snap;
        self
    }

    #[must_use]
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, seconds: f64) -> Self {
        self.settle_delay_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_phase_template(mut self, template: PhaseTemplate) -> Self {
        self.phase_template = template;
        self
    }

    /// Sets the scrub lag for pinned and reveal sections alike.
    #[must_use]
    pub fn with_scrub_lag(mut self, seconds: f64) -> Self {
        self.pinned_scrub_lag_seconds = seconds;
        self.reveal_scrub_lag_seconds = seconds;
        self
    }

    pub fn validate(&self) -> StageResult<()> {
        self.viewport.validate()?;
        self.phase_template.validate()?;
        validate_snap_behavior(self.snap)?;
        validate_non_negative("settle_delay_seconds", self.settle_delay_seconds)?;
        validate_non_negative("pinned_scrub_lag_seconds", self.pinned_scrub_lag_seconds)?;
        validate_non_negative("reveal_scrub_lag_seconds", self.reveal_scrub_lag_seconds)?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> StageResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| StageError::InvalidData(format!("failed to parse stage config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> StageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            StageError::InvalidData(format!("failed to serialize stage config: {e}"))
        })
    }
}

pub(super) fn validate_non_negative(name: &str, value: f64) -> StageResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StageError::InvalidData(format!(
            "{name} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

fn validate_snap_behavior(snap: SnapBehavior) -> StageResult<()> {
    validate_non_negative("snap tolerance", snap.tolerance)?;
    if snap.tolerance > 0.5 {
        return Err(StageError::InvalidData(
            "snap tolerance must be <= 0.5".to_owned(),
        ));
    }
    let glide = snap.glide;
    validate_non_negative("snap duration_min", glide.duration_min)?;
    validate_non_negative("snap duration_max", glide.duration_max)?;
    validate_non_negative("snap delay_seconds", glide.delay_seconds)?;
    if glide.duration_min > glide.duration_max {
        return Err(StageError::InvalidData(format!(
            "snap duration range is inverted: min={}, max={}",
            glide.duration_min, glide.duration_max
        )));
    }
    if glide.ease == Ease::Linear {
        tracing::debug!("snap glide uses a linear ease; the stop will not decelerate");
    }
    Ok(())
}
