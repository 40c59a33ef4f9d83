//! Axis-aligned boxes and a region quadtree for collision queries.
//!
//! # Invariants
//! - Overlap is strict: boxes that only share an edge do not collide.
//! - A non-root node only stores boxes fully inside its bounds, so subtrees
//!   whose bounds miss a query box are skipped.
//! - The root also holds boxes that stick out of the indexed region.

use serde::Serialize;

const NODE_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 8;

/// Axis-aligned box; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }
}

/// Region quadtree over placed boxes.
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: Node,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Rect,
    depth: usize,
    items: Vec<Rect>,
    children: Option<Box<[Node; 4]>>,
}

impl QuadTree {
    pub fn new(bounds: Rect) -> Self {
        Self {
            root: Node::new(bounds, 0),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, rect: Rect) {
        self.root.insert(rect);
        self.len += 1;
    }

    /// Returns whether `rect` strictly overlaps any stored box.
    pub fn intersects_any(&self, rect: &Rect) -> bool {
        self.root.intersects_any(rect)
    }
}

impl Node {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, rect: Rect) {
        if let Some(children) = self.children.as_mut() {
            if let Some(quadrant) = quadrant_for(&self.bounds, &rect) {
                children[quadrant].insert(rect);
                return;
            }
        }

        self.items.push(rect);
        if self.children.is_none() && self.items.len() > NODE_CAPACITY && self.depth < MAX_DEPTH {
            self.split();
        }
    }

    fn split(&mut self) {
        let Rect {
            left,
            top,
            right,
            bottom,
        } = self.bounds;
        let mid_x = (left + right) / 2.0;
        let mid_y = (top + bottom) / 2.0;
        let depth = self.depth + 1;
        let mut children = Box::new([
            Node::new(Rect::new(left, top, mid_x, mid_y), depth),
            Node::new(Rect::new(mid_x, top, right, mid_y), depth),
            Node::new(Rect::new(left, mid_y, mid_x, bottom), depth),
            Node::new(Rect::new(mid_x, mid_y, right, bottom), depth),
        ]);

        let mut kept = Vec::new();
        for item in self.items.drain(..) {
            match quadrant_for(&self.bounds, &item) {
                Some(quadrant) => children[quadrant].insert(item),
                None => kept.push(item),
            }
        }
        self.items = kept;
        self.children = Some(children);
    }

    fn intersects_any(&self, rect: &Rect) -> bool {
        if self.items.iter().any(|item| item.intersects(rect)) {
            return true;
        }
        self.children.as_ref().is_some_and(|children| {
            children
                .iter()
                .any(|child| child.bounds.intersects(rect) && child.intersects_any(rect))
        })
    }
}

/// Child quadrant fully containing `rect`, if any.
fn quadrant_for(bounds: &Rect, rect: &Rect) -> Option<usize> {
    if !bounds.contains(rect) {
        return None;
    }
    let mid_x = (bounds.left + bounds.right) / 2.0;
    let mid_y = (bounds.top + bounds.bottom) / 2.0;
    let horizontal = if rect.right <= mid_x {
        0
    } else if rect.left >= mid_x {
        1
    } else {
        return None;
    };
    let vertical = if rect.bottom <= mid_y {
        0
    } else if rect.top >= mid_y {
        2
    } else {
        return None;
    };
    Some(horizontal + vertical)
}

#[cfg(test)]
mod tests {
    use super::{QuadTree, Rect};

    #[test]
    fn touching_edges_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&Rect::new(9.5, 9.5, 12.0, 12.0)));
    }

    #[test]
    fn quadtree_matches_linear_scan_after_splits() {
        let mut tree = QuadTree::new(Rect::new(-100.0, -100.0, 100.0, 100.0));
        let mut stored = Vec::new();
        for row in 0..6 {
            for col in 0..6 {
                let rect = Rect::centered(
                    -90.0 + col as f64 * 35.0,
                    -90.0 + row as f64 * 35.0,
                    12.0,
                    8.0,
                );
                tree.insert(rect);
                stored.push(rect);
            }
        }
        // Sticks out of the indexed region; must still be found.
        let outside = Rect::new(95.0, 95.0, 140.0, 120.0);
        tree.insert(outside);
        stored.push(outside);
        assert_eq!(tree.len(), 37);

        for probe_y in (-110..=130).step_by(7) {
            for probe_x in (-110..=130).step_by(7) {
                let probe = Rect::centered(probe_x as f64, probe_y as f64, 9.0, 5.0);
                let expected = stored.iter().any(|rect| rect.intersects(&probe));
                assert_eq!(tree.intersects_any(&probe), expected, "probe {probe:?}");
            }
        }
    }
}
