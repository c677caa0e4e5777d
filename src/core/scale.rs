use serde::{Deserialize, Serialize};

use crate::core::tick_step::{get_tick_step, linear_ticks, step_precision};
use crate::error::{TendencyError, TendencyResult};

/// Continuous scale mapping `domain` proportionally onto `range`.
///
/// A degenerate domain (`d0 == d1`) maps every value to the middle of the
/// range instead of failing, so empty windows still produce a drawable axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> TendencyResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(TendencyError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(TendencyError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Like [`LinearScale::new`] but replaces non-finite bounds with zero.
    #[must_use]
    pub fn lenient(domain: (f64, f64), range: (f64, f64)) -> Self {
        let finite = |value: f64| if value.is_finite() { value } else { 0.0 };
        Self {
            domain_start: finite(domain.0),
            domain_end: finite(domain.1),
            range_start: finite(range.0),
            range_end: finite(range.1),
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (pixel - self.range_start) / span
        };
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Nice stops inside the domain for roughly `count` intervals.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain_start, self.domain_end, count)
    }

    /// Decimal places used when labelling `ticks(count)`.
    #[must_use]
    pub fn tick_format_precision(self, count: usize) -> usize {
        step_precision(get_tick_step(self.domain_start, self.domain_end, count))
    }

    /// Formats `value` with the precision of `ticks(count)`.
    #[must_use]
    pub fn format_tick(self, value: f64, count: usize) -> String {
        format!("{:.*}", self.tick_format_precision(count), value)
    }
}
