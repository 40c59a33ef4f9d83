//! Archimedean-spiral packing of sized labels inside one rectangular region.
//!
//! # Responsibility
//! - Measure each label into a (rotated) bounding box.
//! - Place labels largest first, walking an expanding spiral from the region
//!   center until the padded box is free and inside the region.
//!
//! # Invariants
//! - Coordinates are relative to the region center; `y` grows downward.
//! - No two accepted padded boxes strictly overlap.
//! - Every accepted box lies inside the region.
//! - The search for one label stops once the spiral radius passes the
//!   region's half diagonal; such a label is dropped for this pass.
//! - Given equal inputs and an equally seeded `rng`, output is identical.

use super::spatial::{QuadTree, Rect};
use super::LayoutError;
use crate::config::CloudConfig;
use rand::Rng;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Label to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub text: String,
    pub font_size: f64,
}

impl LayoutItem {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// Label accepted by one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub text: String,
    pub font_size: f64,
    /// Label center, relative to the region center.
    pub x: f64,
    pub y: f64,
    pub rotation_degrees: f64,
    /// Rotated box around the label, without padding.
    pub bounds: Rect,
}

/// Result of one region pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionLayout {
    pub placed: Vec<Placement>,
    /// Labels that found no free position, in attempt order.
    pub dropped: Vec<String>,
}

/// Measurement and search tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    pub padding: f64,
    pub char_width_factor: f64,
    pub line_height_factor: f64,
    pub spiral_step: f64,
    pub spiral_growth: f64,
    pub rotations: &'static [f64],
}

impl SpiralParams {
    pub fn from_config(config: &CloudConfig) -> Self {
        Self {
            padding: config.padding,
            char_width_factor: config.char_width_factor,
            line_height_factor: config.line_height_factor,
            spiral_step: config.spiral_step,
            spiral_growth: config.spiral_growth,
            rotations: config.rotation.angles(),
        }
    }

    /// Unrotated `(width, height)` of a label.
    pub fn measure(&self, item: &LayoutItem) -> (f64, f64) {
        let columns = UnicodeWidthStr::width(item.text.as_str()).max(1) as f64;
        (
            columns * item.font_size * self.char_width_factor,
            item.font_size * self.line_height_factor,
        )
    }
}

/// Places `items` inside a `region_width` x `region_height` region.
///
/// # Errors
/// - [`LayoutError::DegenerateRegion`] when either dimension is <= 0.
/// - [`LayoutError::InvalidSpiral`] when the spiral would never expand.
pub fn layout<R: Rng>(
    items: &[LayoutItem],
    region_width: f64,
    region_height: f64,
    params: &SpiralParams,
    rng: &mut R,
) -> Result<RegionLayout, LayoutError> {
    if !(region_width > 0.0) || !(region_height > 0.0) {
        return Err(LayoutError::DegenerateRegion {
            width: region_width,
            height: region_height,
        });
    }
    if !(params.spiral_step > 0.0) || !(params.spiral_growth > 0.0) {
        return Err(LayoutError::InvalidSpiral {
            step: params.spiral_step,
            growth: params.spiral_growth,
        });
    }

    let region = Rect::centered(0.0, 0.0, region_width, region_height);
    let max_radius = (region_width / 2.0).hypot(region_height / 2.0);
    let mut occupied = QuadTree::new(region.inflate(params.padding));
    let mut result = RegionLayout::default();

    let mut order = (0..items.len()).collect::<Vec<_>>();
    order.sort_by(|&left, &right| items[right].font_size.total_cmp(&items[left].font_size));

    for index in order {
        let item = &items[index];
        let rotation_degrees = pick_rotation(params.rotations, rng);
        let (width, height) = params.measure(item);
        let (box_width, box_height) = rotated_extent(width, height, rotation_degrees);

        if box_width > region_width || box_height > region_height {
            result.dropped.push(item.text.clone());
            continue;
        }

        match search_position(&occupied, &region, box_width, box_height, max_radius, params) {
            Some(bounds) => {
                occupied.insert(bounds.inflate(params.padding));
                result.placed.push(Placement {
                    text: item.text.clone(),
                    font_size: item.font_size,
                    x: (bounds.left + bounds.right) / 2.0,
                    y: (bounds.top + bounds.bottom) / 2.0,
                    rotation_degrees,
                    bounds,
                });
            }
            None => result.dropped.push(item.text.clone()),
        }
    }

    Ok(result)
}

fn search_position(
    occupied: &QuadTree,
    region: &Rect,
    box_width: f64,
    box_height: f64,
    max_radius: f64,
    params: &SpiralParams,
) -> Option<Rect> {
    let mut theta = 0.0_f64;
    loop {
        let radius = params.spiral_growth * theta;
        if radius > max_radius {
            return None;
        }
        let candidate = Rect::centered(
            radius * theta.cos(),
            radius * theta.sin(),
            box_width,
            box_height,
        );
        if region.contains(&candidate)
            && !occupied.intersects_any(&candidate.inflate(params.padding))
        {
            return Some(candidate);
        }
        theta += params.spiral_step;
    }
}

fn pick_rotation<R: Rng>(rotations: &[f64], rng: &mut R) -> f64 {
    match rotations.len() {
        0 => 0.0,
        1 => rotations[0],
        len => rotations[rng.gen_range(0..len)],
    }
}

/// Axis-aligned extent of a `width` x `height` box rotated by `degrees`.
pub fn rotated_extent(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    (width * cos + height * sin, width * sin + height * cos)
}

#[cfg(test)]
mod tests {
    use super::{rotated_extent, SpiralParams};
    use crate::config::CloudConfig;

    #[test]
    fn quarter_turn_swaps_extent() {
        let (width, height) = rotated_extent(40.0, 10.0, 90.0);
        assert!((width - 10.0).abs() < 1e-9);
        assert!((height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn measure_uses_display_columns() {
        let params = SpiralParams::from_config(&CloudConfig::default());
        let (ascii, _) = params.measure(&super::LayoutItem::new("ab", 10.0));
        let (wide, _) = params.measure(&super::LayoutItem::new("😀", 10.0));
        assert_eq!(ascii, wide);
    }
}
