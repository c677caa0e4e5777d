use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// X label of a datum: either a number or free text.
///
/// Serialized untagged so `3` and `"Mon"` are both accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl XValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric view used by linear x axes. Text is parsed when it looks numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value.0).filter(|v| v.is_finite()),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value.0),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for XValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i64> for XValue {
    fn from(value: i64) -> Self {
        Self::number(value as f64)
    }
}

impl From<usize> for XValue {
    fn from(value: usize) -> Self {
        Self::number(value as f64)
    }
}

impl From<&str> for XValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for XValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub text: XValue,
    pub value: f64,
}

impl Datum {
    #[must_use]
    pub fn new(text: impl Into<XValue>, value: f64) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// Named ordered sequence of data. Owned by the caller and never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: Option<XValue>,
    #[serde(default)]
    pub data: Vec<Datum>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<XValue>, data: Vec<Datum>) -> Self {
        Self {
            name: Some(name.into()),
            data,
        }
    }

    #[must_use]
    pub fn unnamed(data: Vec<Datum>) -> Self {
        Self { name: None, data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub type Dataset = Vec<Series>;

/// Strategy for picking the series that defines the shared x domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferencePolicy {
    /// Series with the numerically largest final x value (linear axes).
    LargestFinalX,
    /// Series with the most points (point axes).
    LongestSeries,
}

impl ReferencePolicy {
    #[must_use]
    pub fn for_linear(linear: bool) -> Self {
        if linear {
            Self::LargestFinalX
        } else {
            Self::LongestSeries
        }
    }

    /// Returns the reference data for `dataset`, or an empty slice when no
    /// series qualifies. Ties keep the earliest series.
    #[must_use]
    pub fn select(self, dataset: &[Series]) -> &[Datum] {
        match self {
            Self::LargestFinalX => {
                let mut best: Option<(f64, &[Datum])> = None;
                for series in dataset {
                    let final_x = series
                        .data
                        .last()
                        .and_then(|datum| datum.text.as_f64())
                        .unwrap_or(0.0);
                    match best {
                        Some((current, _)) if final_x <= current => {}
                        _ => best = Some((final_x, series.data.as_slice())),
                    }
                }
                best.map(|(_, data)| data).unwrap_or(&[])
            }
            Self::LongestSeries => {
                let mut best: &[Datum] = &[];
                for series in dataset {
                    if series.data.len() > best.len() {
                        best = series.data.as_slice();
                    }
                }
                best
            }
        }
    }
}
