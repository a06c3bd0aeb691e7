use crate::error::StageResult;
use crate::render::{Renderer, StageFrame};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frames and keeps the last one so tests can inspect the
/// resolved target states.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_target_count: usize,
    pub last_frame: Option<StageFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &StageFrame) -> StageResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_target_count = frame.targets.len();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
