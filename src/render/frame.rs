use crate::api::{
    ActivePoint, AxisModel, ChartConfig, ChartState, GuideLine, LayoutOffset, LineSlice,
    LineVisibility, TextMetrics, TickInfo, TooltipPlacement, estimate_tooltip_size, place_tooltip,
};
use crate::core::{Viewport, XValue};
use crate::error::{TendencyError, TendencyResult};

const TOOLTIP_GUIDE_COLOR: &str = "#505765";
const TOOLTIP_GUIDE_WIDTH: f64 = 1.0;

/// Tooltip box, contents and the vertical guide under the active tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipFrame {
    pub placement: TooltipPlacement,
    pub label: Option<XValue>,
    pub points: Vec<ActivePoint>,
    pub guide: Option<GuideLine>,
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub layout: LayoutOffset,
    pub x_axis: AxisModel,
    pub y_axis: AxisModel,
    pub ticks: Vec<TickInfo>,
    pub lines: Vec<LineSlice>,
    pub visibility: Vec<LineVisibility>,
    pub line_stroke_width: f64,
    pub tooltip: Option<TooltipFrame>,
    pub split_lines: Vec<GuideLine>,
    pub custom_lines: Vec<GuideLine>,
}

impl RenderFrame {
    /// Materializes `state`. The tooltip frame is present only when the
    /// config enables tooltips.
    #[must_use]
    pub fn from_state(state: &ChartState, config: &ChartConfig, metrics: Option<&mut TextMetrics>) -> Self {
        let tooltip = config.tooltip.show.then(|| {
            let label = state.tooltip.tick.as_ref().map(|tick| tick.value.clone());
            let label_text = label.as_ref().map(ToString::to_string).unwrap_or_default();
            let size = estimate_tooltip_size(&label_text, &state.tooltip.points, metrics);
            let anchor = state.tooltip.coordinate.filter(|_| state.tooltip.active);
            TooltipFrame {
                placement: place_tooltip(anchor, size, &state.layout, config.tooltip.transition),
                label,
                points: state.tooltip.points.clone(),
                guide: anchor.map(|anchor| GuideLine {
                    x1: anchor.x + 0.5,
                    y1: state.layout.top,
                    x2: anchor.x + 0.5,
                    y2: state.layout.plot_bottom(),
                    stroke_width: TOOLTIP_GUIDE_WIDTH,
                    stroke_color: TOOLTIP_GUIDE_COLOR.to_owned(),
                }),
            }
        });

        Self {
            viewport: config.viewport(),
            layout: state.layout,
            x_axis: state.x_axis.clone(),
            y_axis: state.y_axis.clone(),
            ticks: state.ticks.clone(),
            lines: state.lines.clone(),
            visibility: state.visibility.clone(),
            line_stroke_width: config.line_stroke_width,
            tooltip,
            split_lines: state.split_lines.clone(),
            custom_lines: state.custom_lines.clone(),
        }
    }

    /// Line slices whose series is active, paired with their visibility.
    pub fn visible_lines(&self) -> impl Iterator<Item = (&LineSlice, &LineVisibility)> {
        self.lines
            .iter()
            .zip(&self.visibility)
            .filter(|(_, visibility)| visibility.active)
    }

    pub fn validate(&self) -> TendencyResult<()> {
        if !self.viewport.is_valid() {
            return Err(TendencyError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.line_stroke_width.is_finite() || self.line_stroke_width < 0.0 {
            return Err(TendencyError::InvalidData(
                "line stroke width must be finite and >= 0".to_owned(),
            ));
        }

        for tick in self.ticks.iter().chain(&self.y_axis.ticks) {
            ensure_finite("tick coordinate", tick.coordinate)?;
        }
        for point in self.lines.iter().flat_map(|line| &line.points) {
            ensure_finite("point x", point.x)?;
            ensure_finite("point y", point.y)?;
        }
        for guide in self
            .split_lines
            .iter()
            .chain(&self.custom_lines)
            .chain(self.tooltip.as_ref().and_then(|tooltip| tooltip.guide.as_ref()))
        {
            for value in [guide.x1, guide.y1, guide.x2, guide.y2, guide.stroke_width] {
                ensure_finite("guide line", value)?;
            }
        }
        Ok(())
    }
}

fn ensure_finite(what: &str, value: f64) -> TendencyResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TendencyError::InvalidData(format!("{what} must be finite")))
    }
}
