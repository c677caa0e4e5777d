use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Series, XValue};

pub const DEFAULT_LINE_COLOR: &str = "#000000";

/// Per-series display state shared between charts and the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineVisibility {
    pub color: String,
    pub name: XValue,
    pub active: bool,
    #[serde(default)]
    pub uses_default_color: bool,
}

/// One entry per series, in dataset order.
///
/// `active` carries over from `previous` at the same position only when a
/// legend is present, the names match, and the colors match or the previous
/// entry fell back to the default color. Everything else starts active.
#[must_use]
pub fn build_line_visibility(
    dataset: &[Series],
    colors: &[String],
    previous: &[LineVisibility],
    legend_present: bool,
) -> Vec<LineVisibility> {
    dataset
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let (color, uses_default_color) = match colors.get(index) {
                Some(color) if !color.is_empty() => (color.clone(), false),
                _ => (DEFAULT_LINE_COLOR.to_owned(), true),
            };
            let name = series.name.clone().unwrap_or_else(|| XValue::from(index));

            let active = previous
                .get(index)
                .filter(|prev| {
                    legend_present
                        && prev.name == name
                        && (prev.color == color || prev.uses_default_color)
                })
                .map_or(true, |prev| prev.active);

            LineVisibility {
                color,
                name,
                active,
                uses_default_color,
            }
        })
        .collect()
}

/// Flips `active` for line `index`. Returns `false` when the index is unknown.
pub fn toggle(lines: &mut [LineVisibility], index: usize) -> bool {
    match lines.get_mut(index) {
        Some(line) => {
            line.active = !line.active;
            true
        }
        None => {
            debug!(index, lines = lines.len(), "legend toggle ignored for unknown line");
            false
        }
    }
}
