use serde::{Deserialize, Serialize};

use crate::core::XValue;

use super::axis_model::TickInfo;
use super::layout::LayoutOffset;
use super::line_visibility::LineVisibility;
use super::series_projection::LineSlice;

/// Wire value for "no tick".
pub const NO_TICK_INDEX: i64 = -1;

/// Index of the tick owning `pointer` under a midpoint partition of `ticks`.
///
/// The first tick owns everything up to the first midpoint, the last tick
/// everything past the final midpoint. Returns the owning tick's `index`.
#[must_use]
pub fn nearest_tick_index(pointer: f64, ticks: &[TickInfo]) -> Option<usize> {
    let (first, rest) = ticks.split_first()?;
    if rest.is_empty() {
        return Some(first.index);
    }

    for pair in ticks.windows(2) {
        let mid = (pair[0].coordinate + pair[1].coordinate) / 2.0;
        if pointer <= mid {
            return Some(pair[0].index);
        }
    }
    ticks.last().map(|tick| tick.index)
}

/// Series value under the active tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePoint {
    pub value: f64,
    pub text: XValue,
    pub name: XValue,
    pub color: String,
}

/// Active series points at `tick_index`, in dataset order.
#[must_use]
pub fn collect_active_points(
    lines: &[LineSlice],
    visibility: &[LineVisibility],
    tick_index: usize,
) -> Vec<ActivePoint> {
    lines
        .iter()
        .zip(visibility)
        .filter(|(_, line)| line.active)
        .filter_map(|(slice, line)| {
            slice.point_at(tick_index).map(|point| ActivePoint {
                value: point.origin.value,
                text: point.origin.text.clone(),
                name: line.name.clone(),
                color: line.color.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Tooltip broadcast shared between charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipSignal {
    pub is_tooltip_active: bool,
    pub active_tick_index: i64,
    #[serde(default)]
    pub active_tick: Option<TickInfo>,
    #[serde(default)]
    pub tooltip_coordinate: Option<TooltipCoordinate>,
}

impl TooltipSignal {
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            is_tooltip_active: false,
            active_tick_index: NO_TICK_INDEX,
            active_tick: None,
            tooltip_coordinate: None,
        }
    }

    #[must_use]
    pub fn tick_index(&self) -> Option<usize> {
        usize::try_from(self.active_tick_index).ok()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TooltipSource<'a> {
    Pointer { x: f64, y: f64 },
    Relayed(&'a TooltipSignal),
}

/// Tooltip contents resolved by one chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub active: bool,
    pub tick: Option<TickInfo>,
    pub points: Vec<ActivePoint>,
    pub coordinate: Option<TooltipCoordinate>,
}

impl TooltipState {
    #[must_use]
    pub fn inactive() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn to_signal(&self) -> TooltipSignal {
        if !self.active {
            return TooltipSignal::inactive();
        }
        TooltipSignal {
            is_tooltip_active: true,
            active_tick_index: self
                .tick
                .as_ref()
                .and_then(|tick| i64::try_from(tick.index).ok())
                .unwrap_or(NO_TICK_INDEX),
            active_tick: self.tick.clone(),
            tooltip_coordinate: self.coordinate,
        }
    }
}

/// Resolves the tooltip for a local pointer or a signal relayed by a peer.
///
/// Relayed signals are re-resolved against local ticks; their y is clamped to
/// the bottom of the local plot.
#[must_use]
pub fn resolve_tooltip(
    source: TooltipSource<'_>,
    ticks: &[TickInfo],
    lines: &[LineSlice],
    visibility: &[LineVisibility],
    layout: &LayoutOffset,
) -> TooltipState {
    let (tick_index, y) = match source {
        TooltipSource::Pointer { x, y } => match nearest_tick_index(x, ticks) {
            Some(index) => (index, y),
            None => return TooltipState::inactive(),
        },
        TooltipSource::Relayed(signal) => {
            if !signal.is_tooltip_active {
                return TooltipState::inactive();
            }
            let Some(index) = signal.tick_index() else {
                return TooltipState::inactive();
            };
            let y = signal
                .tooltip_coordinate
                .map_or(layout.top, |coordinate| coordinate.y)
                .min(layout.plot_bottom());
            (index, y)
        }
    };

    let Some(tick) = ticks.iter().find(|tick| tick.index == tick_index) else {
        return TooltipState::inactive();
    };

    TooltipState {
        active: true,
        tick: Some(tick.clone()),
        points: collect_active_points(lines, visibility, tick_index),
        coordinate: Some(TooltipCoordinate {
            x: tick.coordinate,
            y,
        }),
    }
}
