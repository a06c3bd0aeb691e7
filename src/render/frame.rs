use serde::{Deserialize, Serialize};

use crate::core::{SectionId, TargetId, Viewport, VisualState};
use crate::error::{StageError, StageResult};

/// Resolved state for one animated element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFrame {
    pub section: SectionId,
    pub target: TargetId,
    pub state: VisualState,
}

impl TargetFrame {
    pub fn validate(&self) -> StageResult<()> {
        if !self.state.is_finite() {
            return Err(StageError::InvalidData(format!(
                "target `{}` in section `{}` resolved to a non-finite state",
                self.target, self.section
            )));
        }
        Ok(())
    }
}

/// Backend-agnostic batch of visual updates for one scroll or frame tick.
///
/// Only sections whose displayed progress moved are included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFrame {
    pub viewport: Viewport,
    pub scroll_offset: f64,
    pub targets: Vec<TargetFrame>,
}

impl StageFrame {
    #[must_use]
    pub fn new(viewport: Viewport, scroll_offset: f64) -> Self {
        Self {
            viewport,
            scroll_offset,
            targets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetFrame) -> Self {
        self.targets.push(target);
        self
    }

    pub fn validate(&self) -> StageResult<()> {
        self.viewport.validate()?;
        if !self.scroll_offset.is_finite() {
            return Err(StageError::InvalidData(
                "frame scroll offset must be finite".to_owned(),
            ));
        }
        for target in &self.targets {
            target.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn state_of(&self, section: &SectionId, target: &TargetId) -> Option<VisualState> {
        self.targets
            .iter()
            .find(|frame| &frame.section == section && &frame.target == target)
            .map(|frame| frame.state)
    }
}
