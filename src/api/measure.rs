use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Text measurement capability supplied by the host (DOM, font rasterizer, ...).
///
/// Implementations must be deterministic for identical input.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font_size: f64) -> TextSize;
}

/// Fixed-advance approximation for headless hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub char_width_ratio: f64,
    pub line_height_ratio: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_text(&self, text: &str, font_size: f64) -> TextSize {
        let chars = text.chars().count() as f64;
        TextSize {
            width: chars * font_size * self.char_width_ratio,
            height: font_size * self.line_height_ratio,
        }
    }
}

/// Runtime metrics exposed by the measurement cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetricsStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TextCacheKey {
    /// Group keyed measurements collapse text to its length.
    Grouped { group: String, text_len: usize },
    Exact { text: String, font_size_bits: u64 },
}

/// Bounded measurement cache owned by the caller.
///
/// Entries are dropped wholesale once the cache holds `MAX_ENTRIES` items.
pub struct TextMetrics {
    measurer: Box<dyn TextMeasurer>,
    entries: HashMap<TextCacheKey, TextSize>,
    hits: u64,
    misses: u64,
}

impl fmt::Debug for TextMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMetrics")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

impl TextMetrics {
    pub const MAX_ENTRIES: usize = 1000;

    #[must_use]
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn monospace() -> Self {
        Self::new(MonospaceMeasurer::default())
    }

    /// Measures `text`. With a `group`, the cache key is the group plus the
    /// text length, which assumes glyph widths are uniform for that group.
    pub fn measure(&mut self, text: &str, font_size: f64, group: Option<&str>) -> TextSize {
        let key = match group {
            Some(group) => TextCacheKey::Grouped {
                group: group.to_owned(),
                text_len: text.chars().count(),
            },
            None => TextCacheKey::Exact {
                text: text.to_owned(),
                font_size_bits: font_size.to_bits(),
            },
        };

        if let Some(size) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return *size;
        }

        let size = self.measurer.measure_text(text, font_size);
        self.misses = self.misses.saturating_add(1);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries.insert(key, size);
        size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> TextMetricsStats {
        TextMetricsStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

/// Measures through `metrics` when present; missing measurement yields zero.
pub(crate) fn measure_or_zero(
    metrics: &mut Option<&mut TextMetrics>,
    text: &str,
    font_size: f64,
    group: Option<&str>,
) -> TextSize {
    match metrics {
        Some(metrics) => metrics.measure(text, font_size, group),
        None => TextSize::default(),
    }
}
