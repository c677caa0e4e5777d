use tracing::debug;

use crate::core::{DataIndex, IndexRequest, ReferencePolicy, Series, normalize};

use super::active_point::{TooltipSource, TooltipState, collect_active_points, resolve_tooltip};
use super::axis_model::{
    AxisModel, TickInfo, build_x_axis, build_y_axis, resolve_value_domain, window_labels,
};
use super::chart_config::ChartConfig;
use super::guide_lines::{GuideLine, custom_lines, split_lines};
use super::layout::{LayoutOffset, compute_layout};
use super::line_visibility::{LineVisibility, build_line_visibility, toggle};
use super::measure::TextMetrics;
use super::series_projection::{LineSlice, project_dataset};

/// Everything a chart derives from its dataset, config and window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub index: DataIndex,
    pub layout: LayoutOffset,
    pub x_axis: AxisModel,
    pub y_axis: AxisModel,
    pub ticks: Vec<TickInfo>,
    pub lines: Vec<LineSlice>,
    pub visibility: Vec<LineVisibility>,
    pub tooltip: TooltipState,
    pub split_lines: Vec<GuideLine>,
    pub custom_lines: Vec<GuideLine>,
}

/// Inputs of one recompute.
#[derive(Debug, Clone, Copy)]
pub struct ChartInputs<'a> {
    pub dataset: &'a [Series],
    pub config: &'a ChartConfig,
    pub request: IndexRequest,
    pub previous_visibility: &'a [LineVisibility],
    pub legend_present: bool,
}

/// Derives a fresh [`ChartState`]. The tooltip always starts hidden.
#[must_use]
pub fn compute_chart_state(inputs: ChartInputs<'_>, mut metrics: Option<&mut TextMetrics>) -> ChartState {
    let ChartInputs {
        dataset,
        config,
        request,
        previous_visibility,
        legend_present,
    } = inputs;

    let reference = ReferencePolicy::for_linear(config.x_axis.linear).select(dataset);
    let index = normalize(request, reference, &config.window_policy());
    let labels = window_labels(reference, index);
    let y_domain = resolve_value_domain(dataset, index, config);

    let layout = compute_layout(config, labels.last(), y_domain, metrics.as_deref_mut());
    let x_axis = build_x_axis(&labels, &layout, &config.x_axis, metrics.as_deref_mut());
    let y_axis = build_y_axis(y_domain, &layout, &config.y_axis);
    let lines = project_dataset(dataset, index, &x_axis, &y_axis);
    let visibility = build_line_visibility(
        dataset,
        &config.line_colors,
        previous_visibility,
        legend_present,
    );
    let split = split_lines(
        &x_axis,
        &y_axis,
        &layout,
        &config.x_axis.split_line,
        &config.y_axis.split_line,
    );
    let custom = custom_lines(&x_axis, &layout, &config.x_axis.custom_lines);

    debug!(
        start = index.start_index,
        end = index.end_index,
        total = index.total,
        series = dataset.len(),
        "chart state recomputed"
    );

    ChartState {
        index,
        layout,
        ticks: x_axis.ticks.clone(),
        x_axis,
        y_axis,
        lines,
        visibility,
        tooltip: TooltipState::inactive(),
        split_lines: split,
        custom_lines: custom,
    }
}

impl ChartState {
    /// Resolves and stores the tooltip for `source`.
    pub fn apply_tooltip(&mut self, source: TooltipSource<'_>) -> &TooltipState {
        self.tooltip = resolve_tooltip(
            source,
            &self.ticks,
            &self.lines,
            &self.visibility,
            &self.layout,
        );
        &self.tooltip
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip = TooltipState::inactive();
    }

    /// Toggles line `index`, refreshing visible tooltip points.
    pub fn toggle_line(&mut self, index: usize) -> bool {
        if !toggle(&mut self.visibility, index) {
            return false;
        }
        if let Some(tick) = self.tooltip.tick.clone() {
            self.tooltip.points = collect_active_points(&self.lines, &self.visibility, tick.index);
        }
        true
    }

    #[must_use]
    pub fn active_line_count(&self) -> usize {
        self.visibility.iter().filter(|line| line.active).count()
    }
}
