//! Grid hash for O(1) furniture hit-testing and rectangle queries.
//!
//! Rebuilt from scratch whenever the furniture list identity changes
//! (spec §4.5); rebuild cost is `O(n*k)` where `k` is the average cell
//! coverage, typically 1-4 for realistic scenes.

use std::collections::HashMap;

use crate::geometry::Pt;
use crate::scene::Furniture;

pub const DEFAULT_CELL_SIZE: f64 = 4.0;

type Cell = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f64,
    buckets: HashMap<Cell, Vec<usize>>,
    /// Index -> furniture id, kept so callers can map back without holding
    /// a borrow of the original furniture slice.
    ids: Vec<String>,
    rects: Vec<crate::geometry::Rect>,
}

fn cell_range(min: Pt, max: Pt, cell_size: f64) -> (Cell, Cell) {
    let to_cell = |p: Pt| {
        (
            (p.x / cell_size).floor() as i32,
            (p.y / cell_size).floor() as i32,
        )
    };
    (to_cell(min), to_cell(max))
}

impl SpatialHash {
    pub fn new(furniture: &[Furniture]) -> Self {
        Self::with_cell_size(furniture, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(furniture: &[Furniture], cell_size: f64) -> Self {
        let mut buckets: HashMap<Cell, Vec<usize>> = HashMap::new();
        let mut ids = Vec::with_capacity(furniture.len());
        let mut rects = Vec::with_capacity(furniture.len());

        for (idx, f) in furniture.iter().enumerate() {
            let rect = f.rect();
            let (min_cell, max_cell) = cell_range(rect.min, rect.max, cell_size);
            for cx in min_cell.0..=max_cell.0 {
                for cy in min_cell.1..=max_cell.1 {
                    buckets.entry((cx, cy)).or_default().push(idx);
                }
            }
            ids.push(f.id.clone());
            rects.push(rect);
        }

        Self {
            cell_size,
            buckets,
            ids,
            rects,
        }
    }

    /// Returns the topmost (last in paint order, i.e. frontmost) item
    /// whose rectangle contains the point, or `None`.
    pub fn query(&self, x: f64, y: f64) -> Option<&str> {
        let p = Pt::new(x, y);
        let cell = (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        );
        let indices = self.buckets.get(&cell)?;
        indices
            .iter()
            .filter(|&&idx| self.rects[idx].contains(p))
            .max()
            .map(|&idx| self.ids[idx].as_str())
    }

    /// Every item whose center lies within the rectangle `[x1,y1]-[x2,y2]`.
    pub fn query_rect(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<&str> {
        let min = Pt::new(x1.min(x2), y1.min(y2));
        let max = Pt::new(x1.max(x2), y1.max(y2));
        let query_rect = crate::geometry::Rect::new(min, max);

        let mut hit: Vec<usize> = Vec::new();
        let (min_cell, max_cell) = cell_range(min, max, self.cell_size);
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(indices) = self.buckets.get(&(cx, cy)) {
                    for &idx in indices {
                        if !hit.contains(&idx) && query_rect.contains(self.rects[idx].center()) {
                            hit.push(idx);
                        }
                    }
                }
            }
        }
        hit.sort_unstable();
        hit.into_iter().map(|idx| self.ids[idx].as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Shape;

    fn item(id: &str, x: f64, y: f64, w: f64, h: f64) -> Furniture {
        Furniture {
            id: id.into(),
            product_id: "p".into(),
            x,
            y,
            w,
            h,
            rotation: 0.0,
            locked: false,
            color: "#000".into(),
            shape: Shape::Rect,
            label: "Item".into(),
            category: "misc".into(),
        }
    }

    #[test]
    fn query_returns_frontmost_overlapping_item() {
        let furniture = vec![item("back", 5.0, 5.0, 4.0, 4.0), item("front", 5.0, 5.0, 2.0, 2.0)];
        let hash = SpatialHash::new(&furniture);
        assert_eq!(hash.query(5.0, 5.0), Some("front"));
    }

    #[test]
    fn query_outside_any_rect_is_none() {
        let furniture = vec![item("a", 5.0, 5.0, 2.0, 2.0)];
        let hash = SpatialHash::new(&furniture);
        assert_eq!(hash.query(50.0, 50.0), None);
    }

    #[test]
    fn query_rect_collects_items_by_center() {
        let furniture = vec![
            item("a", 2.0, 2.0, 1.0, 1.0),
            item("b", 5.0, 5.0, 1.0, 1.0),
            item("c", 9.0, 9.0, 1.0, 1.0),
        ];
        let hash = SpatialHash::new(&furniture);
        let mut hit = hash.query_rect(1.0, 1.0, 6.0, 6.0);
        hit.sort();
        assert_eq!(hit, vec!["a", "b"]);
    }

    #[test]
    fn soundness_matches_naive_topmost_scan() {
        let furniture = vec![
            item("a", 1.0, 1.0, 3.0, 3.0),
            item("b", 2.0, 2.0, 3.0, 3.0),
            item("c", 20.0, 20.0, 2.0, 2.0),
        ];
        let hash = SpatialHash::new(&furniture);

        for (x, y) in [(1.0, 1.0), (2.5, 2.5), (20.0, 20.0), (100.0, 100.0)] {
            let naive = furniture
                .iter()
                .enumerate()
                .filter(|(_, f)| f.rect().contains(Pt::new(x, y)))
                .map(|(i, _)| i)
                .max()
                .map(|i| furniture[i].id.as_str());
            assert_eq!(hash.query(x, y), naive);
        }
    }
}
