mod frame;
mod null_renderer;

pub use frame::{RenderFrame, TooltipFrame};
pub use null_renderer::NullRenderer;

use crate::error::TendencyResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully derived `RenderFrame`; all scale, tick and
/// tooltip decisions are made before drawing.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> TendencyResult<()>;
}
