use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    DataIndex, Datum, LinearScale, PointScale, Series, XValue, domain_by_step, slice_window,
};

use super::chart_config::{ChartConfig, XAxisConfig, YAxisConfig};
use super::layout::LayoutOffset;
use super::measure::TextMetrics;
use super::tick_selector::{resolve_tick_positions, select_discrete_ticks};

/// Tick count used when labelling linear x axes.
pub const LINEAR_X_TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Point(PointScale),
}

impl AxisScale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Point(_) => ScaleKind::Point,
        }
    }

    /// Pixel position of `value`, or `None` when the scale cannot place it.
    #[must_use]
    pub fn map(&self, value: &XValue) -> Option<f64> {
        match self {
            Self::Linear(scale) => value.as_f64().map(|x| scale.map(x)),
            Self::Point(scale) => scale.map(value),
        }
    }
}

/// Hover grid entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickInfo {
    pub coordinate: f64,
    pub value: XValue,
    pub index: usize,
}

/// Where the axis line is drawn, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPlacement {
    pub x: f64,
    pub y: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisModel {
    pub kind: ScaleKind,
    pub scale: AxisScale,
    pub domain: Vec<XValue>,
    pub range: (f64, f64),
    pub ticks: Vec<TickInfo>,
    pub tick_values: Vec<XValue>,
    pub placement: AxisPlacement,
}

/// X labels of the windowed reference slice. Empty text falls back to the
/// positional index.
#[must_use]
pub fn window_labels(reference: &[Datum], index: DataIndex) -> Vec<XValue> {
    slice_window(reference, index.start_index, index.end_index)
        .iter()
        .enumerate()
        .map(|(position, datum)| match &datum.text {
            XValue::Text(text) if text.is_empty() => XValue::from(position),
            other => other.clone(),
        })
        .collect()
}

/// Builds the x axis over `labels` spanning `[layout.left, layout.left + layout.width]`.
///
/// Point axes label the output of [`select_discrete_ticks`]; linear axes
/// label nice stops of `[min(x), max(x)]`.
#[must_use]
pub fn build_x_axis(
    labels: &[XValue],
    layout: &LayoutOffset,
    config: &XAxisConfig,
    metrics: Option<&mut TextMetrics>,
) -> AxisModel {
    let range = (layout.left, layout.left + layout.width);
    let placement = AxisPlacement {
        x: layout.left,
        y: layout.top + layout.height,
        length: layout.width,
    };

    let mut axis = if config.linear {
        let (min, max) = labels
            .iter()
            .filter_map(XValue::as_f64)
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                None => Some((x, x)),
            })
            .unwrap_or((0.0, 0.0));
        let scale = LinearScale::lenient((min, max), range);
        let tick_values = if labels.is_empty() {
            Vec::new()
        } else {
            scale
                .ticks(LINEAR_X_TICK_COUNT)
                .into_iter()
                .map(XValue::number)
                .collect()
        };
        AxisModel {
            kind: ScaleKind::Linear,
            scale: AxisScale::Linear(scale),
            domain: labels.to_vec(),
            range,
            ticks: Vec::new(),
            tick_values,
            placement,
        }
    } else {
        let scale = PointScale::new(labels.iter().cloned(), range);
        let tick_values = select_discrete_ticks(
            labels,
            layout.width,
            config.min_index_interval(),
            config.max_tick_count(),
            metrics,
        )
        .into_iter()
        .map(|tick| tick.label)
        .collect();
        AxisModel {
            kind: ScaleKind::Point,
            scale: AxisScale::Point(scale),
            domain: labels.to_vec(),
            range,
            ticks: Vec::new(),
            tick_values,
            placement,
        }
    };

    axis.ticks = resolve_tick_positions(&axis);
    trace!(
        kind = ?axis.kind,
        labels = labels.len(),
        tick_values = axis.tick_values.len(),
        "x axis built"
    );
    axis
}

/// Value domain before nice expansion.
///
/// Explicit bounds win. Missing bounds come from scanning every series inside
/// the window; `include_zero` seeds the scan with zero.
#[must_use]
pub fn scan_value_domain(dataset: &[Series], index: DataIndex, config: &ChartConfig) -> (f64, f64) {
    if let (Some(min), Some(max)) = (config.min_value, config.max_value) {
        return (min, max);
    }

    let seed = config.y_axis.include_zero.then_some((0.0, 0.0));
    let scanned = dataset
        .iter()
        .flat_map(|series| slice_window(&series.data, index.start_index, index.end_index))
        .map(|datum| datum.value)
        .filter(|value| value.is_finite())
        .fold(seed, |acc, value| match acc {
            Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
            None => Some((value, value)),
        })
        .unwrap_or((0.0, 0.0));

    (
        config.min_value.unwrap_or(scanned.0),
        config.max_value.unwrap_or(scanned.1),
    )
}

/// Scanned domain expanded outward to multiples of the nice tick step.
#[must_use]
pub fn resolve_value_domain(dataset: &[Series], index: DataIndex, config: &ChartConfig) -> (f64, f64) {
    let (min, max) = scan_value_domain(dataset, index, config);
    domain_by_step(min, max, config.y_axis.tick_number)
}

/// Builds the value axis over `[top + height, top]`.
#[must_use]
pub fn build_y_axis(domain: (f64, f64), layout: &LayoutOffset, config: &YAxisConfig) -> AxisModel {
    let range = (layout.top + layout.height, layout.top);
    let scale = LinearScale::lenient(domain, range);
    let stops = scale.ticks(config.tick_number);
    let ticks = stops
        .iter()
        .enumerate()
        .map(|(index, value)| TickInfo {
            coordinate: scale.map(*value),
            value: XValue::number(*value),
            index,
        })
        .collect();

    AxisModel {
        kind: ScaleKind::Linear,
        scale: AxisScale::Linear(scale),
        domain: vec![XValue::number(domain.0), XValue::number(domain.1)],
        range,
        ticks,
        tick_values: stops.into_iter().map(XValue::number).collect(),
        placement: AxisPlacement {
            x: layout.left,
            y: layout.top,
            length: layout.height,
        },
    }
}
