use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

/// Monotonic interpolation curves addressed by their `powerN.dir` names.
///
/// `power1` is quadratic, `power2` cubic and `power3` quartic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Ease {
    #[default]
    #[serde(rename = "none")]
    Linear,
    #[serde(rename = "power1.in")]
    Power1In,
    #[serde(rename = "power1.out")]
    Power1Out,
    #[serde(rename = "power1.inOut")]
    Power1InOut,
    #[serde(rename = "power2.in")]
    Power2In,
    #[serde(rename = "power2.out")]
    Power2Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    #[serde(rename = "power3.in")]
    Power3In,
    #[serde(rename = "power3.out")]
    Power3Out,
    #[serde(rename = "power3.inOut")]
    Power3InOut,
}

impl Ease {
    pub const ALL: [Self; 10] = [
        Self::Linear,
        Self::Power1In,
        Self::Power1Out,
        Self::Power1InOut,
        Self::Power2In,
        Self::Power2Out,
        Self::Power2InOut,
        Self::Power3In,
        Self::Power3Out,
        Self::Power3InOut,
    ];

    /// Maps a fraction in `[0, 1]` onto the curve. Input is clamped first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Power1In => ease_in(t, 2),
            Self::Power1Out => ease_out(t, 2),
            Self::Power1InOut => ease_in_out(t, 2),
            Self::Power2In => ease_in(t, 3),
            Self::Power2Out => ease_out(t, 3),
            Self::Power2InOut => ease_in_out(t, 3),
            Self::Power3In => ease_in(t, 4),
            Self::Power3Out => ease_out(t, 4),
            Self::Power3InOut => ease_in_out(t, 4),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "none",
            Self::Power1In => "power1.in",
            Self::Power1Out => "power1.out",
            Self::Power1InOut => "power1.inOut",
            Self::Power2In => "power2.in",
            Self::Power2Out => "power2.out",
            Self::Power2InOut => "power2.inOut",
            Self::Power3In => "power3.in",
            Self::Power3Out => "power3.out",
            Self::Power3InOut => "power3.inOut",
        }
    }
}

fn ease_in(t: f64, power: i32) -> f64 {
    t.powi(power)
}

fn ease_out(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

fn ease_in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let name = match s {
            "linear" => "none",
            "power1" => "power1.out",
            "power2" => "power2.out",
            "power3" => "power3.out",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|ease| ease.name() == name)
            .ok_or_else(|| StageError::InvalidData(format!("unknown ease `{s}`")))
    }
}
