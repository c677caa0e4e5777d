use serde::{Deserialize, Serialize};

use super::active_point::{ActivePoint, TooltipCoordinate};
use super::chart_config::TransitionHint;
use super::layout::LayoutOffset;
use super::measure::{TextMetrics, TextSize, measure_or_zero};

pub const TOOLTIP_OFFSET: f64 = 10.0;

const BOX_PADDING: f64 = 5.0;
const LABEL_FONT_SIZE: f64 = 16.0;
const LABEL_MARGIN_BOTTOM: f64 = 10.0;
const ROW_FONT_SIZE: f64 = 14.0;
const ROW_PADDING: f64 = 2.0;
const SWATCH_WIDTH: f64 = 15.0;

/// Parking position for a hidden tooltip.
pub const HIDDEN_TOOLTIP_POSITION: TooltipCoordinate = TooltipCoordinate {
    x: -1000.0,
    y: -1000.0,
};

/// Translation of the tooltip box relative to the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipPlacement {
    pub translate_x: f64,
    pub translate_y: f64,
    pub visible: bool,
    pub transition: TransitionHint,
}

/// Places a `size` box next to `anchor`, flipping to the other side on any
/// axis where it would overflow the plot. A flipped box never moves left of
/// or above the plot.
#[must_use]
pub fn place_tooltip(
    anchor: Option<TooltipCoordinate>,
    size: TextSize,
    plot: &LayoutOffset,
    transition: TransitionHint,
) -> TooltipPlacement {
    let visible = anchor.is_some();
    let anchor = anchor.unwrap_or(HIDDEN_TOOLTIP_POSITION);

    TooltipPlacement {
        translate_x: translate_axis(anchor.x, size.width, plot.left, plot.plot_right()),
        translate_y: translate_axis(anchor.y, size.height, plot.top, plot.plot_bottom()),
        visible,
        transition,
    }
}

/// Approximate box size for a label line followed by one row per point.
#[must_use]
pub fn estimate_tooltip_size(
    label: &str,
    points: &[ActivePoint],
    mut metrics: Option<&mut TextMetrics>,
) -> TextSize {
    let heading = measure_or_zero(&mut metrics, label, LABEL_FONT_SIZE, None);
    let mut width = heading.width;
    let mut height = heading.height + LABEL_MARGIN_BOTTOM;

    for point in points {
        let row = measure_or_zero(
            &mut metrics,
            &format!("{} : {}", point.name, point.value),
            ROW_FONT_SIZE,
            None,
        );
        width = width.max(SWATCH_WIDTH + row.width + ROW_PADDING * 2.0);
        height += row.height + ROW_PADDING * 2.0;
    }

    TextSize::new(width + BOX_PADDING * 2.0, height + BOX_PADDING * 2.0)
}

fn translate_axis(position: f64, extent: f64, low: f64, high: f64) -> f64 {
    if position + extent + TOOLTIP_OFFSET > high {
        (position - TOOLTIP_OFFSET - extent).max(low)
    } else {
        position + TOOLTIP_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::translate_axis;

    #[test]
    fn flips_before_overflowing() {
        assert_eq!(translate_axis(50.0, 20.0, 0.0, 100.0), 60.0);
        assert_eq!(translate_axis(90.0, 20.0, 0.0, 100.0), 60.0);
        assert_eq!(translate_axis(15.0, 200.0, 5.0, 100.0), 5.0);
    }
}
