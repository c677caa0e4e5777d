use serde::{Deserialize, Serialize};
use tracing::debug;

use super::axis_model::AxisModel;
use super::chart_config::{CustomLine, SplitLineConfig};
use super::layout::LayoutOffset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub stroke_color: String,
}

/// Grid lines: vertical at each labelled x value, horizontal at each y tick.
#[must_use]
pub fn split_lines(
    x_axis: &AxisModel,
    y_axis: &AxisModel,
    layout: &LayoutOffset,
    x_split: &SplitLineConfig,
    y_split: &SplitLineConfig,
) -> Vec<GuideLine> {
    let mut out = Vec::new();

    if x_split.show {
        out.extend(
            x_axis
                .tick_values
                .iter()
                .filter_map(|value| x_axis.scale.map(value))
                .map(|x| GuideLine {
                    x1: x,
                    y1: layout.top,
                    x2: x,
                    y2: layout.plot_bottom(),
                    stroke_width: x_split.stroke_width,
                    stroke_color: x_split.stroke_color.clone(),
                }),
        );
    }

    if y_split.show {
        out.extend(y_axis.ticks.iter().map(|tick| GuideLine {
            x1: layout.left,
            y1: tick.coordinate,
            x2: layout.plot_right(),
            y2: tick.coordinate,
            stroke_width: y_split.stroke_width,
            stroke_color: y_split.stroke_color.clone(),
        }));
    }

    out
}

/// Vertical markers at caller-chosen x labels. Labels the x axis cannot place,
/// or that land outside the plot, are skipped.
#[must_use]
pub fn custom_lines(x_axis: &AxisModel, layout: &LayoutOffset, lines: &[CustomLine]) -> Vec<GuideLine> {
    lines
        .iter()
        .filter_map(|line| {
            let x = x_axis
                .scale
                .map(&line.tick_value)
                .filter(|x| *x >= layout.left && *x <= layout.plot_right());
            if x.is_none() {
                debug!(tick_value = %line.tick_value, "custom line outside the x domain");
            }
            x.map(|x| GuideLine {
                x1: x,
                y1: layout.top,
                x2: x,
                y2: layout.plot_bottom(),
                stroke_width: line.stroke_width,
                stroke_color: line.stroke_color.clone(),
            })
        })
        .collect()
}
