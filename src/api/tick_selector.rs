use serde::{Deserialize, Serialize};

use crate::core::XValue;

use super::axis_model::{AxisModel, AxisScale, TickInfo};
use super::measure::{TextMetrics, measure_or_zero};

pub(super) const X_LABEL_FONT_SIZE: f64 = 10.0;
pub(super) const X_LABEL_CACHE_GROUP: &str = "xaxis";
pub(super) const DEFAULT_MIN_INDEX_INTERVAL: usize = 2;

/// Label chosen for a discrete axis, with its position in the windowed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteTick {
    pub index: usize,
    pub label: XValue,
}

/// Greedy overlap-free label selection for point axes.
///
/// The first label is always kept. Candidates are visited every
/// `min_index_interval` positions and admitted only when their half-width
/// plus the previously admitted half-width fits strictly inside the pixel gap
/// between them, and the same holds against the final label. When more than
/// `max_tick_count` labels survive, the admitted list is re-sampled evenly.
/// The final label is always appended last.
#[must_use]
pub fn select_discrete_ticks(
    labels: &[XValue],
    pixel_width: f64,
    min_index_interval: usize,
    max_tick_count: Option<usize>,
    mut metrics: Option<&mut TextMetrics>,
) -> Vec<DiscreteTick> {
    let total = labels.len();
    if total == 0 {
        return Vec::new();
    }
    if total == 1 {
        return vec![DiscreteTick {
            index: 0,
            label: labels[0].clone(),
        }];
    }

    let offset = pixel_width.max(0.0) / total as f64;
    let mut half_width = |label: &XValue| {
        measure_or_zero(
            &mut metrics,
            &label.to_string(),
            X_LABEL_FONT_SIZE,
            Some(X_LABEL_CACHE_GROUP),
        )
        .width
            / 2.0
    };

    let final_index = total - 1;
    let final_half = half_width(&labels[final_index]);

    let mut admitted = vec![0usize];
    let mut last_half = half_width(&labels[0]);
    let mut last_index = 0usize;
    let interval = if min_index_interval > 0 {
        min_index_interval
    } else {
        DEFAULT_MIN_INDEX_INTERVAL
    };

    let mut i = interval;
    while i < final_index {
        let half = half_width(&labels[i]);
        let fits_previous = last_half + half < offset * (i - last_index) as f64;
        let fits_final = final_half + half < offset * (final_index - i) as f64;
        if fits_previous && fits_final {
            admitted.push(i);
            last_half = half;
            last_index = i;
        }
        i += interval;
    }

    let admitted = match max_tick_count {
        Some(max) if max > 0 && admitted.len() > max => {
            let stride = (admitted.len() / max).max(1);
            admitted
                .iter()
                .copied()
                .take(admitted.len() - 1)
                .step_by(stride)
                .collect()
        }
        _ => admitted,
    };

    admitted
        .into_iter()
        .chain(std::iter::once(final_index))
        .map(|index| DiscreteTick {
            index,
            label: labels[index].clone(),
        })
        .collect()
}

/// Hover grid for an x axis.
///
/// Point axes yield one tick per distinct domain entry. Linear axes yield one
/// tick per windowed x value, in positional order, so tick `i` lines up with
/// projected point `i`.
#[must_use]
pub fn resolve_tick_positions(axis: &AxisModel) -> Vec<TickInfo> {
    match &axis.scale {
        AxisScale::Point(scale) => scale
            .domain()
            .enumerate()
            .filter_map(|(index, value)| {
                scale.map(value).map(|coordinate| TickInfo {
                    coordinate,
                    value: value.clone(),
                    index,
                })
            })
            .collect(),
        AxisScale::Linear(scale) => axis
            .domain
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                value.as_f64().map(|x| TickInfo {
                    coordinate: scale.map(x),
                    value: value.clone(),
                    index,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::select_discrete_ticks;
    use crate::api::measure::TextMetrics;
    use crate::core::XValue;

    fn labels(count: usize) -> Vec<XValue> {
        (0..count).map(|i| XValue::text(format!("{i:02}"))).collect()
    }

    #[test]
    fn without_measurement_every_interval_is_admitted() {
        let ticks = select_discrete_ticks(&labels(7), 700.0, 2, None, None);
        let indices: Vec<usize> = ticks.iter().map(|tick| tick.index).collect();
        assert_eq!(indices, vec![0, 2, 4, 6]);
    }

    #[test]
    fn cap_resamples_admitted_labels() {
        let mut metrics = TextMetrics::monospace();
        let ticks = select_discrete_ticks(&labels(21), 2100.0, 2, Some(3), Some(&mut metrics));
        let indices: Vec<usize> = ticks.iter().map(|tick| tick.index).collect();
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&20));
        assert!(indices.len() <= 5);
    }
}
