use indexmap::IndexSet;

use crate::core::types::XValue;

/// Discrete scale placing each distinct label at an evenly spaced position.
///
/// With a single label the position is the middle of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: IndexSet<XValue>,
    range: (f64, f64),
}

impl PointScale {
    /// Builds the scale from labels in order; repeated labels keep their first
    /// position.
    #[must_use]
    pub fn new<I>(labels: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = XValue>,
    {
        Self {
            domain: labels.into_iter().collect(),
            range,
        }
    }

    #[must_use]
    pub fn domain(&self) -> impl ExactSizeIterator<Item = &XValue> {
        self.domain.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between adjacent labels.
    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.domain.len();
        let span = self.range.1 - self.range.0;
        span / (n.saturating_sub(1).max(1) as f64)
    }

    #[must_use]
    pub fn position_of(&self, ordinal: usize) -> Option<f64> {
        let n = self.domain.len();
        if ordinal >= n {
            return None;
        }
        if n == 1 {
            return Some((self.range.0 + self.range.1) / 2.0);
        }
        Some(self.range.0 + self.step() * ordinal as f64)
    }

    #[must_use]
    pub fn map(&self, label: &XValue) -> Option<f64> {
        self.domain
            .get_index_of(label)
            .and_then(|ordinal| self.position_of(ordinal))
    }

    #[must_use]
    pub fn label_at(&self, ordinal: usize) -> Option<&XValue> {
        self.domain.get_index(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::PointScale;
    use crate::core::types::XValue;

    #[test]
    fn repeated_labels_share_first_position() {
        let scale = PointScale::new(
            ["a", "b", "a", "c"].into_iter().map(XValue::from),
            (0.0, 100.0),
        );
        assert_eq!(scale.len(), 3);
        assert_eq!(scale.map(&XValue::from("a")), Some(0.0));
        assert_eq!(scale.map(&XValue::from("c")), Some(100.0));
    }
}
