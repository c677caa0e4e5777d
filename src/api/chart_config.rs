use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{IndexFormatterFn, IndexRequest, Viewport, WindowPolicy, XValue};
use crate::error::{TendencyError, TendencyResult};

/// Tick line geometry shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLineConfig {
    #[serde(default = "default_tick_stroke_width")]
    pub tick_stroke_width: f64,
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
    #[serde(default = "default_tick_padding")]
    pub tick_padding: f64,
}

impl Default for AxisLineConfig {
    fn default() -> Self {
        Self {
            tick_stroke_width: default_tick_stroke_width(),
            tick_size: default_tick_size(),
            tick_padding: default_tick_padding(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLineConfig {
    #[serde(default)]
    pub show: bool,
    #[serde(default = "default_split_line_width")]
    pub stroke_width: f64,
    #[serde(default = "default_split_line_color")]
    pub stroke_color: String,
}

impl Default for SplitLineConfig {
    fn default() -> Self {
        Self {
            show: false,
            stroke_width: default_split_line_width(),
            stroke_color: default_split_line_color(),
        }
    }
}

/// Vertical marker drawn at a given x label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLine {
    pub tick_value: XValue,
    #[serde(default = "default_split_line_width")]
    pub stroke_width: f64,
    #[serde(default = "default_custom_line_color")]
    pub stroke_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisConfig {
    /// Minimum index interval between candidate discrete ticks. Values `<= 0`
    /// fall back to 2.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: i64,
    /// Upper bound on discrete labels. Values `<= 0` disable the cap.
    #[serde(default = "default_x_tick_number")]
    pub tick_number: i64,
    #[serde(default)]
    pub linear: bool,
    #[serde(default)]
    pub axis_line: AxisLineConfig,
    #[serde(default)]
    pub split_line: SplitLineConfig,
    #[serde(default)]
    pub custom_lines: Vec<CustomLine>,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            tick_number: default_x_tick_number(),
            linear: false,
            axis_line: AxisLineConfig::default(),
            split_line: SplitLineConfig::default(),
            custom_lines: Vec::new(),
        }
    }
}

impl XAxisConfig {
    #[must_use]
    pub fn min_index_interval(&self) -> usize {
        if self.tick_interval > 0 {
            self.tick_interval as usize
        } else {
            2
        }
    }

    #[must_use]
    pub fn max_tick_count(&self) -> Option<usize> {
        (self.tick_number > 0).then_some(self.tick_number as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisConfig {
    #[serde(default = "default_y_tick_number")]
    pub tick_number: usize,
    /// Anchors the scanned value domain at zero.
    #[serde(default = "default_true")]
    pub include_zero: bool,
    #[serde(default)]
    pub axis_line: AxisLineConfig,
    #[serde(default)]
    pub split_line: SplitLineConfig,
}

impl Default for YAxisConfig {
    fn default() -> Self {
        Self {
            tick_number: default_y_tick_number(),
            include_zero: true,
            axis_line: AxisLineConfig::default(),
            split_line: SplitLineConfig::default(),
        }
    }
}

/// Explicit plot box margins; bypasses label measurement when set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionTiming {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Animation hint forwarded to renderers; the engine never animates itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionHint {
    pub duration_ms: u32,
    pub timing: TransitionTiming,
}

impl Default for TransitionHint {
    fn default() -> Self {
        Self {
            duration_ms: 400,
            timing: TransitionTiming::Ease,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipConfig {
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub transition: TransitionHint,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            show: false,
            transition: TransitionHint::default(),
        }
    }
}

/// Chart bootstrap configuration.
///
/// Serializable so hosts can load chart setup from JSON. The optional index
/// formatter is runtime-only and never serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub grid: Option<GridBox>,
    #[serde(default = "default_line_stroke_width")]
    pub line_stroke_width: f64,
    #[serde(default)]
    pub line_colors: Vec<String>,
    #[serde(default = "default_start_index")]
    pub start_index: Option<i64>,
    #[serde(default)]
    pub end_index: Option<i64>,
    /// Skips the value scan when both bounds are given.
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub x_axis: XAxisConfig,
    #[serde(default)]
    pub y_axis: YAxisConfig,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(skip)]
    pub index_formatter: Option<IndexFormatterFn>,
}

impl fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("grid", &self.grid)
            .field("line_stroke_width", &self.line_stroke_width)
            .field("line_colors", &self.line_colors)
            .field("start_index", &self.start_index)
            .field("end_index", &self.end_index)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .field("tooltip", &self.tooltip)
            .field("index_formatter", &self.index_formatter.is_some())
            .finish()
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            grid: None,
            line_stroke_width: default_line_stroke_width(),
            line_colors: Vec::new(),
            start_index: default_start_index(),
            end_index: None,
            min_value: None,
            max_value: None,
            x_axis: XAxisConfig::default(),
            y_axis: YAxisConfig::default(),
            tooltip: TooltipConfig::default(),
            index_formatter: None,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> TendencyResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| TendencyError::InvalidConfig(format!("failed to parse chart config: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> TendencyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TendencyError::InvalidConfig(format!("failed to serialize chart config: {e}"))
        })
    }

    /// Rejects non-drawable container sizes and inverted explicit bounds.
    pub fn validate(self) -> TendencyResult<Self> {
        let viewport = self.viewport();
        if !viewport.is_valid() {
            return Err(TendencyError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !self.line_stroke_width.is_finite() || self.line_stroke_width < 0.0 {
            return Err(TendencyError::InvalidConfig(
                "line stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(TendencyError::InvalidConfig(format!(
                    "min value {min} exceeds max value {max}"
                )));
            }
        }
        if self.y_axis.tick_number == 0 {
            return Err(TendencyError::InvalidConfig(
                "y axis tick number must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Window requested by the configured start/end index.
    #[must_use]
    pub fn index_request(&self) -> IndexRequest {
        IndexRequest::new(self.start_index, self.end_index)
    }

    #[must_use]
    pub fn window_policy(&self) -> WindowPolicy {
        match &self.index_formatter {
            Some(formatter) => WindowPolicy::Custom(formatter.clone()),
            None => WindowPolicy::StepAligned,
        }
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridBox) -> Self {
        self.grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_line_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.line_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_line_stroke_width(mut self, width: f64) -> Self {
        self.line_stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_index_range(mut self, start_index: Option<i64>, end_index: Option<i64>) -> Self {
        self.start_index = start_index;
        self.end_index = end_index;
        self
    }

    /// Sets explicit value bounds, skipping the value scan.
    #[must_use]
    pub fn with_value_domain(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: XAxisConfig) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_linear_x(mut self, linear: bool) -> Self {
        self.x_axis.linear = linear;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: YAxisConfig) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    #[must_use]
    pub fn with_index_formatter(mut self, formatter: IndexFormatterFn) -> Self {
        self.index_formatter = Some(formatter);
        self
    }
}

/// Chart overrides carried by a brush move.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_stroke_width: Option<f64>,
}

impl ChartConfigPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_value.is_none() && self.max_value.is_none() && self.line_stroke_width.is_none()
    }

    /// Applies every present field on top of `config`.
    pub fn apply(&self, config: &mut ChartConfig) {
        if let Some(min_value) = self.min_value {
            config.min_value = Some(min_value);
        }
        if let Some(max_value) = self.max_value {
            config.max_value = Some(max_value);
        }
        if let Some(width) = self.line_stroke_width {
            config.line_stroke_width = width;
        }
    }
}

/// Overview brush configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushConfig {
    #[serde(default = "default_brush_width")]
    pub width: f64,
    #[serde(default = "default_brush_height")]
    pub height: f64,
    #[serde(default = "default_handle_width")]
    pub handle_width: f64,
    #[serde(default = "default_brush_font_size")]
    pub font_size: f64,
    #[serde(default = "default_text_margin")]
    pub text_margin: f64,
    /// Overrides the total derived from the preview dataset.
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub start_index: Option<i64>,
    #[serde(default)]
    pub end_index: Option<i64>,
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default = "default_true")]
    pub auto_dispatch_when_range_change: bool,
    #[serde(default)]
    pub auto_adjust_range_when_click: bool,
    #[serde(default)]
    pub linear: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            width: default_brush_width(),
            height: default_brush_height(),
            handle_width: default_handle_width(),
            font_size: default_brush_font_size(),
            text_margin: default_text_margin(),
            length: None,
            start_index: None,
            end_index: None,
            step: default_step(),
            auto_dispatch_when_range_change: true,
            auto_adjust_range_when_click: false,
            linear: false,
        }
    }
}

impl BrushConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step.max(1);
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start_index: Option<i64>, end_index: Option<i64>) -> Self {
        self.start_index = start_index;
        self.end_index = end_index;
        self
    }

    #[must_use]
    pub fn with_auto_dispatch(mut self, enabled: bool) -> Self {
        self.auto_dispatch_when_range_change = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_adjust_on_click(mut self, enabled: bool) -> Self {
        self.auto_adjust_range_when_click = enabled;
        self
    }
}

fn default_width() -> f64 {
    500.0
}

fn default_height() -> f64 {
    400.0
}

fn default_start_index() -> Option<i64> {
    Some(0)
}

fn default_line_stroke_width() -> f64 {
    2.0
}

fn default_tick_stroke_width() -> f64 {
    1.0
}

fn default_tick_size() -> f64 {
    8.0
}

fn default_tick_padding() -> f64 {
    5.0
}

fn default_split_line_width() -> f64 {
    1.0
}

fn default_split_line_color() -> String {
    "#ccc".to_owned()
}

fn default_custom_line_color() -> String {
    "#505765".to_owned()
}

fn default_tick_interval() -> i64 {
    -1
}

fn default_x_tick_number() -> i64 {
    -1
}

fn default_y_tick_number() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_brush_width() -> f64 {
    500.0
}

fn default_brush_height() -> f64 {
    50.0
}

fn default_handle_width() -> f64 {
    6.0
}

fn default_brush_font_size() -> f64 {
    12.0
}

fn default_text_margin() -> f64 {
    3.0
}

fn default_step() -> usize {
    1
}
