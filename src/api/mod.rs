pub mod active_point;
pub mod axis_model;
pub mod chart_config;
pub mod chart_state;
pub mod guide_lines;
pub mod json_contract;
pub mod layout;
pub mod line_visibility;
pub mod measure;
pub mod series_projection;
pub mod tick_selector;
pub mod tooltip_layout;

pub use active_point::{
    ActivePoint, NO_TICK_INDEX, TooltipCoordinate, TooltipSignal, TooltipSource, TooltipState,
    collect_active_points, nearest_tick_index, resolve_tooltip,
};
pub use axis_model::{
    AxisModel, AxisPlacement, AxisScale, LINEAR_X_TICK_COUNT, ScaleKind, TickInfo, build_x_axis,
    build_y_axis, resolve_value_domain, scan_value_domain, window_labels,
};
pub use chart_config::{
    AxisLineConfig, BrushConfig, ChartConfig, ChartConfigPatch, CustomLine, GridBox,
    SplitLineConfig, TooltipConfig, TransitionHint, TransitionTiming, XAxisConfig, YAxisConfig,
};
pub use chart_state::{ChartInputs, ChartState, compute_chart_state};
pub use guide_lines::{GuideLine, custom_lines, split_lines};
pub use json_contract::{BUS_EVENT_JSON_SCHEMA_V1, BusEventJsonContractV1};
pub use layout::{LayoutOffset, compute_layout, format_value_label};
pub use line_visibility::{DEFAULT_LINE_COLOR, LineVisibility, build_line_visibility, toggle};
pub use measure::{MonospaceMeasurer, TextMeasurer, TextMetrics, TextMetricsStats, TextSize};
pub use series_projection::{LineSlice, ProjectedPoint, project_dataset};
pub use tick_selector::{DiscreteTick, resolve_tick_positions, select_discrete_ticks};
pub use tooltip_layout::{
    HIDDEN_TOOLTIP_POSITION, TOOLTIP_OFFSET, TooltipPlacement, estimate_tooltip_size,
    place_tooltip,
};
