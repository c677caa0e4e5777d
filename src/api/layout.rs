use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, XValue};

use super::chart_config::{AxisLineConfig, ChartConfig};
use super::measure::{TextMetrics, TextSize, measure_or_zero};

const AXIS_LABEL_FONT_SIZE: f64 = 10.0;
const Y_LABEL_TICK_COUNT: usize = 10;

/// Plot rectangle inside the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOffset {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub x_axis_line: AxisLineConfig,
    pub y_axis_line: AxisLineConfig,
}

impl LayoutOffset {
    #[must_use]
    pub fn plot_right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn plot_bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.plot_right() && y >= self.top && y <= self.plot_bottom()
    }
}

/// Formats a y bound the way tick labels are formatted.
#[must_use]
pub fn format_value_label(domain: (f64, f64), value: f64) -> String {
    LinearScale::lenient(domain, (0.0, 1.0)).format_tick(value, Y_LABEL_TICK_COUNT)
}

/// Derives the plot rectangle from the container size and label extents.
///
/// An explicit grid box replaces the measured margins.
#[must_use]
pub fn compute_layout(
    config: &ChartConfig,
    last_x_label: Option<&XValue>,
    y_domain: (f64, f64),
    mut metrics: Option<&mut TextMetrics>,
) -> LayoutOffset {
    let x_line = config.x_axis.axis_line;
    let y_line = config.y_axis.axis_line;
    let stroke = config.line_stroke_width;

    let (top, right, bottom, left) = match config.grid {
        Some(grid) => (grid.top, grid.right, grid.bottom, grid.left),
        None => {
            let last_x = last_x_label
                .map(|label| {
                    measure_or_zero(&mut metrics, &label.to_string(), AXIS_LABEL_FONT_SIZE, None)
                })
                .unwrap_or_default();
            let y_label = widest_value_label(y_domain, &mut metrics);

            (
                (stroke / 2.0).max(y_label.height / 2.0),
                (stroke / 2.0).max(last_x.width / 2.0),
                x_line.tick_size + x_line.tick_padding + last_x.height,
                y_line.tick_size + y_line.tick_padding + y_label.width,
            )
        }
    };

    let half_tick = x_line.tick_stroke_width / 2.0;
    LayoutOffset {
        top,
        right,
        bottom,
        left,
        width: (config.width - left - right - half_tick).max(0.0),
        height: (config.height - top - bottom - half_tick).max(0.0),
        x_axis_line: x_line,
        y_axis_line: y_line,
    }
}

fn widest_value_label(domain: (f64, f64), metrics: &mut Option<&mut TextMetrics>) -> TextSize {
    let low = measure_or_zero(
        metrics,
        &format_value_label(domain, domain.0),
        AXIS_LABEL_FONT_SIZE,
        None,
    );
    let high = measure_or_zero(
        metrics,
        &format_value_label(domain, domain.1),
        AXIS_LABEL_FONT_SIZE,
        None,
    );
    if high.width >= low.width { high } else { low }
}
