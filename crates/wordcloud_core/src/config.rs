//! Engine configuration.
//!
//! # Responsibility
//! - Hold every tunable of sizing, coloring, packing and dedup behavior.
//! - Validate numeric ranges once, before any layout pass uses them.
//!
//! # Invariants
//! - `0 < min_font_size <= max_font_size`.
//! - `fallback_color` is always a parseable `#rrggbb` color.
//! - Palette entries may be unparseable; those resolve to `fallback_color`
//!   at render time instead of failing the pass.

use crate::layout::style::parse_hex_color;
use crate::text::dedup::DedupPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Categorical palette used when none is configured (d3 category10).
pub const DEFAULT_PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Light gray substituted for colors that would vanish on a dark background.
pub const DEFAULT_FALLBACK_COLOR: &str = "#d3d3d3";

/// Distinct-word threshold used by [`CloudConfig::rich`].
pub const RICH_SPARSE_BOOST_THRESHOLD: usize = 20;

/// Discrete rotation choices for cloud labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationSet {
    /// Horizontal or vertical labels.
    #[default]
    Orthogonal,
    /// -45 to 45 degrees in 15 degree steps.
    Fine,
}

impl RotationSet {
    pub fn angles(self) -> &'static [f64] {
        match self {
            Self::Orthogonal => &[0.0, 90.0],
            Self::Fine => &[-45.0, -30.0, -15.0, 0.0, 15.0, 30.0, 45.0],
        }
    }
}

/// Complete engine configuration; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Below this many distinct words the minimum font size is lifted toward
    /// the middle of the range. `None` disables the lift.
    pub sparse_boost_threshold: Option<usize>,
    /// Clearance added around every label box before collision tests.
    pub padding: f64,
    /// Outer margin removed from the viewport before grid partitioning.
    pub margin: f64,
    /// Bars shown in chart mode.
    pub top_k: usize,
    pub rotation: RotationSet,
    /// Seed of the rotation source; equal seeds give equal layouts.
    pub seed: u64,
    pub palette: Vec<String>,
    /// Colors with every channel below this value are replaced.
    pub darkness_threshold: u8,
    pub fallback_color: String,
    pub dedup: DedupPolicy,
    /// Glyph advance as a fraction of font size, per display column.
    pub char_width_factor: f64,
    /// Line box height as a fraction of font size.
    pub line_height_factor: f64,
    /// Spiral angle increment per candidate, in radians.
    pub spiral_step: f64,
    /// Spiral radius growth per radian, in pixels.
    pub spiral_growth: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            min_font_size: 24.0,
            max_font_size: 120.0,
            sparse_boost_threshold: None,
            padding: 2.0,
            margin: 10.0,
            top_k: 20,
            rotation: RotationSet::Orthogonal,
            seed: 0x5eed,
            palette: DEFAULT_PALETTE.iter().map(|value| value.to_string()).collect(),
            darkness_threshold: 50,
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            dedup: DedupPolicy::Unbounded,
            char_width_factor: 0.6,
            line_height_factor: 1.0,
            spiral_step: 0.1,
            spiral_growth: 1.0,
        }
    }
}

impl CloudConfig {
    /// Richer cloud preset: fine rotations and sparse-vocabulary boost.
    pub fn rich() -> Self {
        Self {
            rotation: RotationSet::Fine,
            sparse_boost_threshold: Some(RICH_SPARSE_BOOST_THRESHOLD),
            ..Self::default()
        }
    }

    /// Checks numeric ranges and required colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_font_size > 0.0) || !(self.max_font_size >= self.min_font_size) {
            return Err(ConfigError::InvalidFontRange {
                min: self.min_font_size,
                max: self.max_font_size,
            });
        }
        for (field, value) in [
            ("char_width_factor", self.char_width_factor),
            ("line_height_factor", self.line_height_factor),
            ("spiral_step", self.spiral_step),
            ("spiral_growth", self.spiral_growth),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value) in [("padding", self.padding), ("margin", self.margin)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if let Some(threshold) = self.sparse_boost_threshold {
            if threshold < 2 {
                return Err(ConfigError::InvalidBoostThreshold(threshold));
            }
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if parse_hex_color(&self.fallback_color).is_none() {
            return Err(ConfigError::InvalidFallbackColor(self.fallback_color.clone()));
        }
        if let DedupPolicy::Recent { capacity: 0 } = self.dedup {
            return Err(ConfigError::ZeroDedupCapacity);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidFontRange { min: f64, max: f64 },
    NonPositive { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    ZeroTopK,
    InvalidBoostThreshold(usize),
    EmptyPalette,
    InvalidFallbackColor(String),
    ZeroDedupCapacity,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFontRange { min, max } => {
                write!(f, "font range [{min}, {max}] must satisfy 0 < min <= max")
            }
            Self::NonPositive { field, value } => {
                write!(f, "`{field}` must be a positive number, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "`{field}` cannot be negative, got {value}")
            }
            Self::ZeroTopK => write!(f, "`top_k` must be at least 1"),
            Self::InvalidBoostThreshold(value) => {
                write!(f, "`sparse_boost_threshold` must be at least 2, got {value}")
            }
            Self::EmptyPalette => write!(f, "`palette` must contain at least one color"),
            Self::InvalidFallbackColor(value) => {
                write!(f, "`fallback_color` is not a #rrggbb color: `{value}`")
            }
            Self::ZeroDedupCapacity => write!(f, "recent-id dedup capacity must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{CloudConfig, ConfigError, RotationSet};

    #[test]
    fn default_and_rich_presets_are_valid() {
        CloudConfig::default().validate().expect("default config");
        let rich = CloudConfig::rich();
        rich.validate().expect("rich config");
        assert_eq!(rich.rotation, RotationSet::Fine);
        assert_eq!(rich.sparse_boost_threshold, Some(20));
    }

    #[test]
    fn validate_rejects_reversed_font_range() {
        let config = CloudConfig {
            min_font_size: 80.0,
            max_font_size: 40.0,
            ..CloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFontRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_degenerate_boost_threshold() {
        let config = CloudConfig {
            sparse_boost_threshold: Some(1),
            ..CloudConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidBoostThreshold(1)));
    }
}
