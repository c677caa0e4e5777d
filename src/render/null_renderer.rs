use crate::error::TendencyResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer used by tests and hosts without a drawing backend.
///
/// Frames are still validated so invalid geometry is caught early.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_visible_line_count: usize,
    pub last_tick_count: usize,
    pub last_tooltip_visible: bool,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> TendencyResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_visible_line_count = frame.visible_lines().count();
        self.last_tick_count = frame.ticks.len();
        self.last_tooltip_visible = frame
            .tooltip
            .as_ref()
            .is_some_and(|tooltip| tooltip.placement.visible);
        Ok(())
    }
}
