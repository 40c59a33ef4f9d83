//! Near-square grid partitioning of the viewport, one cell per category.
//!
//! # Invariants
//! - `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`, so `cols * rows >= n`.
//! - Cells are assigned row-major in the given category order.
//! - Every returned cell has strictly positive width and height.

use super::LayoutError;
use crate::model::frame::{CategoryId, Viewport};
use serde::Serialize;

/// Column/row count for `n` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    /// Returns `None` for zero cells.
    pub fn for_count(n: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let cols = ceil_sqrt(n);
        let rows = n.div_ceil(cols);
        Some(Self { cols, rows })
    }
}

/// Sub-region assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub category: CategoryId,
    pub row: usize,
    pub col: usize,
    pub offset_x: f64,
    pub offset_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridCell {
    /// Cell center in viewport coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.offset_x + self.cell_width / 2.0,
            self.offset_y + self.cell_height / 2.0,
        )
    }
}

/// Splits `viewport` (minus `margin` on each side) into one cell per category.
///
/// Returns no cells for an empty category list.
///
/// # Errors
/// - [`LayoutError::DegenerateCell`] when a computed cell dimension is <= 0.
pub fn partition(
    categories: &[CategoryId],
    viewport: Viewport,
    margin: f64,
) -> Result<Vec<GridCell>, LayoutError> {
    let Some(shape) = GridShape::for_count(categories.len()) else {
        return Ok(Vec::new());
    };

    let cell_width = (viewport.width - 2.0 * margin) / shape.cols as f64;
    let cell_height = (viewport.height - 2.0 * margin) / shape.rows as f64;
    if !(cell_width > 0.0) || !(cell_height > 0.0) {
        return Err(LayoutError::DegenerateCell {
            width: cell_width,
            height: cell_height,
        });
    }

    Ok(categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let row = index / shape.cols;
            let col = index % shape.cols;
            GridCell {
                category: *category,
                row,
                col,
                offset_x: margin + col as f64 * cell_width,
                offset_y: margin + row as f64 * cell_height,
                cell_width,
                cell_height,
            }
        })
        .collect())
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root < n {
        root += 1;
    }
    while root > 1 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root.max(1)
}
