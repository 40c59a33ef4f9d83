//! Ranked bar chart over global word counts.
//!
//! # Responsibility
//! - Select the top-K words by count.
//! - Describe the categorical (band) and linear scales a bar renderer needs.
//! - Allocate fixed-width bands inside a viewport.
//!
//! # Invariants
//! - Bars are ordered by count descending; ties keep first-seen order.
//! - The linear domain is `[0, max(top count, 1)]`.

use crate::model::frame::Viewport;
use crate::store::frequency::FrequencySnapshot;
use serde::{Deserialize, Serialize};

/// Inner padding of band scale, as a fraction of the band step.
pub const BAND_PADDING: f64 = 0.1;

/// One chart bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub text: String,
    pub count: u64,
}

/// Chart-mode frame payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub bars: Vec<Bar>,
    /// Band scale domain (bar order).
    pub band_domain: Vec<String>,
    /// Linear scale domain.
    pub value_domain: (u64, u64),
}

/// Positioned bar in viewport coordinates; `y` grows downward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub text: String,
    pub count: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Builds the top-`top_k` bar list from a global snapshot.
pub fn build_chart(snapshot: &FrequencySnapshot, top_k: usize) -> ChartData {
    let bars = snapshot
        .sorted_entries()
        .into_iter()
        .take(top_k)
        .map(|(text, count)| Bar { text, count })
        .collect::<Vec<_>>();
    let max_count = bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);
    ChartData {
        band_domain: bars.iter().map(|bar| bar.text.clone()).collect(),
        value_domain: (0, max_count),
        bars,
    }
}

/// Categorical position scale with fixed-width bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Splits `[start, end]` into `count` bands with [`BAND_PADDING`].
    pub fn new(count: usize, start: f64, end: f64) -> Self {
        let span = (end - start).max(0.0);
        let step = if count == 0 {
            0.0
        } else {
            span / (count as f64 + BAND_PADDING)
        };
        Self {
            start: start + step * BAND_PADDING,
            step,
            bandwidth: step * (1.0 - BAND_PADDING),
        }
    }

    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Linear map from `[0, max]` onto `[0, extent]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    max: f64,
    extent: f64,
}

impl LinearScale {
    pub fn new(domain_max: u64, extent: f64) -> Self {
        Self {
            max: domain_max.max(1) as f64,
            extent: extent.max(0.0),
        }
    }

    pub fn scale(&self, value: u64) -> f64 {
        (value as f64 / self.max).min(1.0) * self.extent
    }
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Vertical bars across `viewport` minus `margin` on each side.
    pub fn bar_geometry(&self, viewport: Viewport, margin: f64) -> Vec<BarGeometry> {
        let inner_width = viewport.width - 2.0 * margin;
        let inner_height = viewport.height - 2.0 * margin;
        if !(inner_width > 0.0) || !(inner_height > 0.0) {
            return Vec::new();
        }
        let band = BandScale::new(self.bars.len(), margin, margin + inner_width);
        let linear = LinearScale::new(self.value_domain.1, inner_height);
        let baseline = margin + inner_height;

        self.bars
            .iter()
            .enumerate()
            .map(|(index, bar)| {
                let height = linear.scale(bar.count);
                BarGeometry {
                    text: bar.text.clone(),
                    count: bar.count,
                    x: band.position(index),
                    y: baseline - height,
                    width: band.bandwidth(),
                    height,
                }
            })
            .collect()
    }
}
