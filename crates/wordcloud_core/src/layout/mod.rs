//! Cloud layout: grid partitioning, per-category spiral packing, styling.
//!
//! # Responsibility
//! - Split the viewport into one cell per populated category.
//! - Pack every cell independently (in parallel) and merge the results into
//!   viewport coordinates.
//! - Attach font sizes from global counts and stable ordinal colors.
//!
//! # Invariants
//! - Cell passes share no mutable state; each owns an RNG seeded from the
//!   configured seed and its category id.
//! - Merged output lists cells in category order, labels largest first.

pub mod grid;
pub mod spatial;
pub mod spiral;
pub mod style;

use crate::config::CloudConfig;
use crate::model::frame::{CategoryId, PlacedLabel, Viewport};
use crate::store::AggregateSnapshot;
use grid::GridCell;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use spiral::{LayoutItem, RegionLayout, SpiralParams};
use std::error::Error;
use std::fmt::{Display, Formatter};
use style::{ColorPalette, FontScale};

/// Geometry failures that skip a whole layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    DegenerateCell { width: f64, height: f64 },
    DegenerateRegion { width: f64, height: f64 },
    InvalidSpiral { step: f64, growth: f64 },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateCell { width, height } => {
                write!(f, "grid cell has non-positive size {width}x{height}")
            }
            Self::DegenerateRegion { width, height } => {
                write!(f, "layout region has non-positive size {width}x{height}")
            }
            Self::InvalidSpiral { step, growth } => {
                write!(f, "spiral never expands (step={step}, growth={growth})")
            }
        }
    }
}

impl Error for LayoutError {}

/// Merged cloud layout for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudLayout {
    pub labels: Vec<PlacedLabel>,
    pub cells: Vec<GridCell>,
    /// Labels that found no position this pass.
    pub dropped: usize,
}

/// Lays out every populated category of `snapshot` inside `viewport`.
///
/// Returns an empty layout when no category holds words.
///
/// # Errors
/// - Any [`LayoutError`] from partitioning or packing; no partial output is
///   returned in that case.
pub fn layout_cloud(
    snapshot: &AggregateSnapshot,
    viewport: Viewport,
    config: &CloudConfig,
) -> Result<CloudLayout, LayoutError> {
    let categories = snapshot.populated_categories();
    let cells = grid::partition(&categories, viewport, config.margin)?;
    let Some(font_scale) = FontScale::for_counts(&snapshot.global, config) else {
        return Ok(CloudLayout::default());
    };
    let params = SpiralParams::from_config(config);

    let regions = cells
        .par_iter()
        .map(|cell| layout_cell(snapshot, cell, &font_scale, &params, config.seed))
        .collect::<Result<Vec<_>, _>>()?;

    let palette = ColorPalette::from_config(config);
    let mut merged = CloudLayout {
        labels: Vec::new(),
        cells: cells.clone(),
        dropped: 0,
    };
    for (cell, region) in cells.iter().zip(regions) {
        let (center_x, center_y) = cell.center();
        merged.dropped += region.dropped.len();
        for placement in region.placed {
            let ordinal = snapshot.global.ordinal(&placement.text).unwrap_or(0);
            merged.labels.push(PlacedLabel {
                color: palette.color_for(ordinal),
                x: placement.x + center_x,
                y: placement.y + center_y,
                rotation_degrees: placement.rotation_degrees,
                font_size: placement.font_size,
                text: placement.text,
                category_id: cell.category,
            });
        }
    }

    debug!(
        "event=cloud_layout module=layout status=ok cells={} placed={} dropped={}",
        merged.cells.len(),
        merged.labels.len(),
        merged.dropped
    );
    Ok(merged)
}

fn layout_cell(
    snapshot: &AggregateSnapshot,
    cell: &GridCell,
    font_scale: &FontScale,
    params: &SpiralParams,
    seed: u64,
) -> Result<RegionLayout, LayoutError> {
    let items = snapshot
        .categories
        .get(&cell.category)
        .map(|counts| {
            counts
                .iter()
                .map(|(word, _)| LayoutItem::new(word, font_scale.size(snapshot.global.get(word))))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut rng = StdRng::seed_from_u64(cell_seed(seed, cell.category));
    spiral::layout(&items, cell.cell_width, cell.cell_height, params, &mut rng)
}

fn cell_seed(seed: u64, category: CategoryId) -> u64 {
    seed ^ category.0.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
