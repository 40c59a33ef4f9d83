//! Count -> font size and word -> color mapping.
//!
//! # Responsibility
//! - Interpolate global counts linearly into the configured font range.
//! - Lift the minimum size for sparse vocabularies.
//! - Resolve stable ordinal colors that stay readable on a dark background.
//!
//! # Invariants
//! - Sizes are non-decreasing in count and lie in `[effective_min, max]`.
//! - All-equal counts map to the middle of `[effective_min, max]`.
//! - Resolved colors are `#rrggbb`; too-dark or unparseable entries become
//!   the fallback color.

use crate::config::CloudConfig;
use crate::store::frequency::WordCounts;
use log::warn;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `#rgb` or `#rrggbb` (case-insensitive).
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|ch| {
                let digit = ch.to_digit(16).unwrap_or(0) as u8;
                digit * 17
            });
            Some(Rgb {
                r: channels.next()?,
                g: channels.next()?,
                b: channels.next()?,
            })
        }
        6 => Some(Rgb {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        }),
        _ => None,
    }
}

/// Fraction in `[0, 1]` by which the minimum font size moves toward the
/// middle of the range: `(threshold - unique) / (threshold - 1)`.
pub fn sparse_boost(unique_words: usize, threshold: Option<usize>) -> f64 {
    let Some(threshold) = threshold.filter(|value| *value >= 2) else {
        return 0.0;
    };
    let boost = (threshold as f64 - unique_words as f64) / (threshold as f64 - 1.0);
    boost.clamp(0.0, 1.0)
}

/// Bounded linear count -> font size scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    min_count: u64,
    max_count: u64,
    effective_min: f64,
    max_font: f64,
}

impl FontScale {
    pub fn new(
        min_count: u64,
        max_count: u64,
        unique_words: usize,
        min_font: f64,
        max_font: f64,
        boost_threshold: Option<usize>,
    ) -> Self {
        let midpoint = (min_font + max_font) / 2.0;
        let boost = sparse_boost(unique_words, boost_threshold);
        Self {
            min_count: min_count.min(max_count),
            max_count: max_count.max(min_count),
            effective_min: min_font + (midpoint - min_font) * boost,
            max_font,
        }
    }

    /// Scale over a count table; `None` when the table is empty.
    pub fn for_counts(counts: &WordCounts, config: &CloudConfig) -> Option<Self> {
        let (min_count, max_count) = counts.count_range()?;
        Some(Self::new(
            min_count,
            max_count,
            counts.len(),
            config.min_font_size,
            config.max_font_size,
            config.sparse_boost_threshold,
        ))
    }

    pub fn effective_min(&self) -> f64 {
        self.effective_min
    }

    pub fn max_font(&self) -> f64 {
        self.max_font
    }

    pub fn size(&self, count: u64) -> f64 {
        if self.max_count == self.min_count {
            return (self.effective_min + self.max_font) / 2.0;
        }
        let clamped = count.clamp(self.min_count, self.max_count);
        let t = (clamped - self.min_count) as f64 / (self.max_count - self.min_count) as f64;
        (self.effective_min + t * (self.max_font - self.effective_min))
            .clamp(self.effective_min, self.max_font)
    }
}

/// Ordinal palette with a dark-background contrast guard.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    entries: Vec<String>,
    darkness_threshold: u8,
    fallback: String,
}

impl ColorPalette {
    pub fn from_config(config: &CloudConfig) -> Self {
        let fallback = parse_hex_color(&config.fallback_color)
            .map(Rgb::to_hex)
            .unwrap_or_else(|| crate::config::DEFAULT_FALLBACK_COLOR.to_string());
        Self {
            entries: config.palette.clone(),
            darkness_threshold: config.darkness_threshold,
            fallback,
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Color for the word at `ordinal` (its first-seen position).
    pub fn color_for(&self, ordinal: usize) -> String {
        if self.entries.is_empty() {
            return self.fallback.clone();
        }
        let raw = &self.entries[ordinal % self.entries.len()];
        self.guard(raw)
    }

    fn guard(&self, raw: &str) -> String {
        match parse_hex_color(raw) {
            Some(rgb) if self.is_too_dark(rgb) => self.fallback.clone(),
            Some(rgb) => rgb.to_hex(),
            None => {
                warn!(
                    "event=color_resolve module=layout status=fallback reason=unparseable value_len={}",
                    raw.len()
                );
                self.fallback.clone()
            }
        }
    }

    fn is_too_dark(&self, rgb: Rgb) -> bool {
        let threshold = self.darkness_threshold;
        rgb.r < threshold && rgb.g < threshold && rgb.b < threshold
    }
}
