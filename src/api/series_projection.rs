#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{DataIndex, Datum, Series, XValue, slice_window};

use super::axis_model::{AxisModel, AxisScale};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub origin: Datum,
}

/// Windowed pixel geometry for one series, in dataset order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSlice {
    pub series_index: usize,
    pub points: Vec<ProjectedPoint>,
}

impl LineSlice {
    #[must_use]
    pub fn point_at(&self, position: usize) -> Option<&ProjectedPoint> {
        self.points.get(position)
    }
}

/// Projects every series of `dataset` inside `index` through the axes.
///
/// Linear x axes place each point at its own numeric x and drop points past
/// the domain maximum. Point x axes place point `i` at domain label `i`.
#[must_use]
pub fn project_dataset(
    dataset: &[Series],
    index: DataIndex,
    x_axis: &AxisModel,
    y_axis: &AxisModel,
) -> Vec<LineSlice> {
    #[cfg(feature = "parallel-projection")]
    {
        dataset
            .par_iter()
            .enumerate()
            .map(|(series_index, series)| project_series(series_index, series, index, x_axis, y_axis))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        dataset
            .iter()
            .enumerate()
            .map(|(series_index, series)| project_series(series_index, series, index, x_axis, y_axis))
            .collect()
    }
}

fn project_series(
    series_index: usize,
    series: &Series,
    index: DataIndex,
    x_axis: &AxisModel,
    y_axis: &AxisModel,
) -> LineSlice {
    let window = slice_window(&series.data, index.start_index, index.end_index);
    let mut points = Vec::with_capacity(window.len());

    for (position, datum) in window.iter().enumerate() {
        let Some(x) = project_x(position, datum, x_axis) else {
            continue;
        };
        let Some(y) = project_y(datum.value, y_axis) else {
            continue;
        };
        points.push(ProjectedPoint {
            x,
            y,
            origin: datum.clone(),
        });
    }

    if points.len() < window.len() {
        trace!(
            series_index,
            dropped = window.len() - points.len(),
            "projection dropped points outside the x domain"
        );
    }

    LineSlice {
        series_index,
        points,
    }
}

fn project_x(position: usize, datum: &Datum, x_axis: &AxisModel) -> Option<f64> {
    match &x_axis.scale {
        AxisScale::Linear(scale) => {
            let x = datum.text.as_f64()?;
            if x > scale.domain().1 {
                return None;
            }
            Some(scale.map(x))
        }
        AxisScale::Point(scale) => scale.map(x_axis.domain.get(position)?),
    }
}

fn project_y(value: f64, y_axis: &AxisModel) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    y_axis.scale.map(&XValue::number(value))
}
