use serde::{Deserialize, Serialize};

use crate::core::{ScrollRange, SectionId, Viewport};
use crate::error::{StageError, StageResult};

/// How a section takes part in scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SectionKind {
    /// Locked to the viewport for `extension_vh` viewport heights of scroll.
    Pinned {
        #[serde(default = "default_pin_extension_vh")]
        extension_vh: f64,
    },
    /// Scrolls normally; its timeline runs while the section top travels from
    /// `start_ratio` to `end_ratio` of the viewport height.
    Reveal {
        #[serde(default = "default_reveal_start_ratio")]
        start_ratio: f64,
        #[serde(default = "default_reveal_end_ratio")]
        end_ratio: f64,
    },
    Static,
}

fn default_pin_extension_vh() -> f64 {
    1.3
}

fn default_reveal_start_ratio() -> f64 {
    0.8
}

fn default_reveal_end_ratio() -> f64 {
    0.5
}

impl SectionKind {
    #[must_use]
    pub fn pinned() -> Self {
        Self::Pinned {
            extension_vh: default_pin_extension_vh(),
        }
    }

    #[must_use]
    pub fn reveal() -> Self {
        Self::Reveal {
            start_ratio: default_reveal_start_ratio(),
            end_ratio: default_reveal_end_ratio(),
        }
    }

    #[must_use]
    pub fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned { .. })
    }

    pub fn validate(self) -> StageResult<()> {
        match self {
            Self::Pinned { extension_vh } => {
                if !extension_vh.is_finite() || extension_vh < 0.0 {
                    return Err(StageError::InvalidData(format!(
                        "pin extension must be finite and >= 0, got {extension_vh}"
                    )));
                }
            }
            Self::Reveal {
                start_ratio,
                end_ratio,
            } => {
                if !start_ratio.is_finite() || !end_ratio.is_finite() || start_ratio < end_ratio {
                    return Err(StageError::InvalidData(format!(
                        "reveal ratios must be finite with start >= end, got {start_ratio}/{end_ratio}"
                    )));
                }
            }
            Self::Static => {}
        }
        Ok(())
    }
}

/// Layout input for one section in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInput {
    pub id: SectionId,
    pub kind: SectionKind,
    /// Natural height in scroll units; `None` until the host measures it.
    pub natural_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPlacement {
    pub id: SectionId,
    pub pinned: bool,
    pub top: Option<f64>,
    /// Scroll range driving the section timeline.
    pub trigger: Option<ScrollRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub viewport: Viewport,
    pub sections: Vec<SectionPlacement>,
    /// Total document height including pin spacers; `None` until complete.
    pub document_height: Option<f64>,
}

impl StageLayout {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.document_height.is_some()
    }

    /// Maximum scroll offset, `None` while any section is unmeasured.
    #[must_use]
    pub fn max_scroll(&self) -> Option<f64> {
        self.document_height
            .map(|height| (height - self.viewport.height_px()).max(0.0))
    }

    pub fn pinned(&self) -> impl Iterator<Item = (&SectionId, ScrollRange)> {
        self.sections
            .iter()
            .filter(|placement| placement.pinned)
            .filter_map(|placement| placement.trigger.map(|range| (&placement.id, range)))
    }
}

/// Stacks sections in document order.
///
/// A pinned section at top `t` owns `[t, t + extension * vh]` and pushes every
/// later section down by its extension. Once a height is unknown, every later
/// section stays unplaced.
pub fn measure_layout(inputs: &[LayoutInput], viewport: Viewport) -> StageResult<StageLayout> {
    viewport.validate()?;
    let vh = viewport.height_px();
    let mut top = Some(0.0_f64);
    let mut sections = Vec::with_capacity(inputs.len());

    for input in inputs {
        input.kind.validate()?;
        if let Some(height) = input.natural_height {
            if !height.is_finite() || height < 0.0 {
                return Err(StageError::InvalidData(format!(
                    "section `{}` has invalid natural height {height}",
                    input.id
                )));
            }
        }

        let placed_top = top;
        let trigger = match (placed_top, input.kind) {
            (Some(t), SectionKind::Pinned { extension_vh }) => {
                Some(ScrollRange::new(t, t + extension_vh * vh)?)
            }
            (
                Some(t),
                SectionKind::Reveal {
                    start_ratio,
                    end_ratio,
                },
            ) => Some(ScrollRange::new(t - start_ratio * vh, t - end_ratio * vh)?),
            _ => None,
        };
        let spacer = match input.kind {
            SectionKind::Pinned { extension_vh } => extension_vh * vh,
            _ => 0.0,
        };
        top = match (top, input.natural_height) {
            (Some(t), Some(height)) => Some(t + height + spacer),
            _ => None,
        };

        sections.push(SectionPlacement {
            id: input.id.clone(),
            pinned: input.kind.is_pinned(),
            top: placed_top,
            trigger,
        });
    }

    Ok(StageLayout {
        viewport,
        sections,
        document_height: top,
    })
}
