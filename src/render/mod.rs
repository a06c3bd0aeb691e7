mod frame;
mod null_renderer;

pub use frame::{StageFrame, TargetFrame};
pub use null_renderer::NullRenderer;

use crate::error::StageResult;

/// Contract implemented by any host that applies visual states.
///
/// Hosts receive a fully resolved `StageFrame`, so DOM or scene-graph code
/// stays isolated from progress, phase and snapping logic.
pub trait Renderer {
    fn render(&mut self, frame: &StageFrame) -> StageResult<()>;
}
