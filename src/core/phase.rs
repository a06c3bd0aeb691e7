use serde::{Deserialize, Serialize};

use crate::core::ProgressWindow;
use crate::error::{StageError, StageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Entrance,
    Settle,
    Exit,
}

/// Named split of local progress into entrance / settle / exit.
///
/// The settle window carries no visual change, so a pause mid-section always
/// rests on a stable frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub entrance_end: f64,
    pub exit_start: f64,
}

impl Default for PhaseTemplate {
    fn default() -> Self {
        Self::ENTER_SETTLE_EXIT
    }
}

impl PhaseTemplate {
    /// 0-30% entrance, 30-70% settle, 70-100% exit.
    pub const ENTER_SETTLE_EXIT: Self = Self {
        entrance_end: 0.30,
        exit_start: 0.70,
    };

    pub fn new(entrance_end: f64, exit_start: f64) -> StageResult<Self> {
        let template = Self {
            entrance_end,
            exit_start,
        };
        template.validate()?;
        Ok(template)
    }

    pub fn validate(self) -> StageResult<()> {
        if !self.entrance_end.is_finite()
            || !self.exit_start.is_finite()
            || self.entrance_end < 0.0
            || self.exit_start > 1.0
            || self.entrance_end > self.exit_start
        {
            return Err(StageError::InvalidWindow {
                start: self.entrance_end,
                end: self.exit_start,
            });
        }
        Ok(())
    }

    pub fn window(self, phase: Phase) -> StageResult<ProgressWindow> {
        match phase {
            Phase::Entrance => ProgressWindow::new(0.0, self.entrance_end),
            Phase::Settle => ProgressWindow::new(self.entrance_end, self.exit_start),
            Phase::Exit => ProgressWindow::new(self.exit_start, 1.0),
        }
    }

    /// Window that starts at `start` and runs to the end of `phase`.
    pub fn window_from(self, phase: Phase, start: f64) -> StageResult<ProgressWindow> {
        let phase_window = self.window(phase)?;
        if start < phase_window.start() || start > phase_window.end() {
            return Err(StageError::InvalidWindow {
                start,
                end: phase_window.end(),
            });
        }
        ProgressWindow::new(start, phase_window.end())
    }

    #[must_use]
    pub fn phase_at(self, progress: f64) -> Phase {
        if progress < self.entrance_end {
            Phase::Entrance
        } else if progress < self.exit_start {
            Phase::Settle
        } else {
            Phase::Exit
        }
    }
}
