//! Index arithmetic for the displayed window of a long series.
//!
//! Everything here is pure: a request goes in, a [`DataIndex`] satisfying
//! `0 <= start_index <= end_index < total` (for `total > 0`) comes out.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::Datum;

/// Resolved window over a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIndex {
    pub start_index: usize,
    pub end_index: usize,
    pub step: usize,
    pub total: usize,
}

impl Default for DataIndex {
    fn default() -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            step: 1,
            total: 0,
        }
    }
}

impl DataIndex {
    #[must_use]
    pub fn range(self) -> IndexRange {
        IndexRange {
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }

    /// Number of positions covered by the window, inclusive on both ends.
    #[must_use]
    pub fn len(self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.end_index - self.start_index + 1
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn same_range(self, other: Self) -> bool {
        self.start_index == other.start_index && self.end_index == other.end_index
    }
}

/// Start/end pair produced by a custom index formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRange {
    pub start_index: usize,
    pub end_index: usize,
}

/// Raw window request. Every field is optional; indices are signed so pointer
/// derived values left of the data can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    #[serde(default)]
    pub start_index: Option<i64>,
    #[serde(default)]
    pub end_index: Option<i64>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub step: Option<usize>,
}

impl IndexRequest {
    #[must_use]
    pub fn new(start_index: Option<i64>, end_index: Option<i64>) -> Self {
        Self {
            start_index,
            end_index,
            total: None,
            step: None,
        }
    }

    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self
    }
}

impl From<DataIndex> for IndexRequest {
    fn from(index: DataIndex) -> Self {
        Self {
            start_index: Some(index.start_index as i64),
            end_index: Some(index.end_index as i64),
            total: Some(index.total),
            step: Some(index.step),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignKind {
    Start,
    End,
}

/// Caller supplied override: receives the clamped index and the reference
/// series, returns the window to display.
pub type IndexFormatterFn = Arc<dyn Fn(&DataIndex, &[Datum]) -> IndexRange + Send + Sync + 'static>;

#[derive(Clone)]
pub enum WindowPolicy {
    StepAligned,
    Custom(IndexFormatterFn),
}

impl fmt::Debug for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepAligned => f.write_str("StepAligned"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::StepAligned
    }
}

/// Snaps an index to the step grid.
///
/// `End` keeps the final position reachable: any index at or past
/// `total - 1` resolves to exactly `total - 1`.
#[must_use]
pub fn align_index(kind: AlignKind, index: usize, step: usize, total: usize) -> usize {
    let step = step.max(1);
    let max_index = total.saturating_sub(1);
    let aligned = match kind {
        AlignKind::Start => index - (index % step),
        AlignKind::End => {
            if index >= max_index {
                max_index
            } else {
                index - (index % step)
            }
        }
    };
    aligned.min(max_index)
}

/// Normalizes a raw request against a reference series.
///
/// Steps: default missing bounds to the full range, swap reversed bounds,
/// clamp into `[0, total - 1]`, apply the policy, re-clamp, then enforce
/// `end > start` by bumping the end one step.
#[must_use]
pub fn normalize(request: IndexRequest, reference: &[Datum], policy: &WindowPolicy) -> DataIndex {
    let total = request.total.unwrap_or(reference.len());
    let step = request.step.unwrap_or(1).max(1);
    if total == 0 {
        return DataIndex {
            start_index: 0,
            end_index: 0,
            step,
            total,
        };
    }
    let max_index = total - 1;

    let start = request
        .start_index
        .filter(|index| *index >= 0)
        .map_or(0, |index| index as u64);
    let end = request
        .end_index
        .filter(|index| *index >= 0)
        .map_or(max_index as u64, |index| index as u64);
    let (start, end) = ordered(start, end);
    let start = clamp_to(start, max_index);
    let end = clamp_to(end, max_index);

    let clamped = DataIndex {
        start_index: start,
        end_index: end,
        step,
        total,
    };

    let range = match policy {
        WindowPolicy::StepAligned => IndexRange {
            start_index: align_index(AlignKind::Start, start, step, total),
            end_index: align_index(AlignKind::End, end, step, total),
        },
        WindowPolicy::Custom(formatter) => {
            let range = formatter(&clamped, reference);
            trace!(
                start = range.start_index,
                end = range.end_index,
                "custom index formatter applied"
            );
            range
        }
    };

    let (start, end) = ordered(range.start_index as u64, range.end_index as u64);
    let mut start = clamp_to(start, max_index);
    let mut end = clamp_to(end, max_index);

    if end <= start {
        end = start.saturating_add(step).min(max_index);
        if end <= start {
            start = end.saturating_sub(step);
        }
    }

    DataIndex {
        start_index: start,
        end_index: end,
        step,
        total,
    }
}

/// Inclusive slice `[start, end]` of `data`, clamped to its length.
#[must_use]
pub fn slice_window<T>(data: &[T], start: usize, end: usize) -> &[T] {
    if data.is_empty() || start >= data.len() || end < start {
        return &[];
    }
    let end = end.min(data.len() - 1);
    &data[start..=end]
}

fn ordered(a: u64, b: u64) -> (u64, u64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn clamp_to(index: u64, max_index: usize) -> usize {
    usize::try_from(index).map_or(max_index, |index| index.min(max_index))
}
