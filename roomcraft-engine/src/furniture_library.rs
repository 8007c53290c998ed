//! The catalog of furniture products a user can drop into a scene.
//!
//! Each [`Product`] is a static footprint template; placing one creates a
//! [`crate::scene::Furniture`] with a fresh id, centered wherever the
//! caller chooses (typically the room's centroid, or the drop point under
//! the pointer).

use serde::{Deserialize, Serialize};

use crate::scene::{self, Furniture, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub w: f64,
    pub h: f64,
    pub shape: Shape,
    pub color: &'static str,
}

/// ~30 common residential items spanning the categories
/// [`crate::scene::clearance`] knows how to compute clearance zones for
/// (sofa, bed, chair, table) plus a handful of others that only ever get
/// a bounding-box collision rect.
pub const CATALOG: &[Product] = &[
    // Seating
    Product { id: "sofa-3seat", label: "3-Seat Sofa", category: "sofa", w: 7.0, h: 3.0, shape: Shape::Rect, color: "#8c6d4f" },
    Product { id: "sofa-loveseat", label: "Loveseat", category: "sofa", w: 5.0, h: 3.0, shape: Shape::Rect, color: "#8c6d4f" },
    Product { id: "sofa-sectional", label: "Sectional Sofa", category: "sofa", w: 9.0, h: 6.0, shape: Shape::L, color: "#70594a" },
    Product { id: "armchair", label: "Armchair", category: "chair", w: 3.0, h: 3.0, shape: Shape::Rect, color: "#a77e53" },
    Product { id: "dining-chair", label: "Dining Chair", category: "chair", w: 1.6, h: 1.6, shape: Shape::Rect, color: "#6b4b36" },
    Product { id: "office-chair", label: "Office Chair", category: "chair", w: 2.0, h: 2.0, shape: Shape::Round, color: "#333333" },
    Product { id: "bar-stool", label: "Bar Stool", category: "chair", w: 1.4, h: 1.4, shape: Shape::Round, color: "#5a5a5a" },
    Product { id: "bench", label: "Bench", category: "chair", w: 4.0, h: 1.5, shape: Shape::Rect, color: "#a0895f" },
    Product { id: "recliner", label: "Recliner", category: "chair", w: 3.2, h: 3.5, shape: Shape::Rect, color: "#805c3c" },
    // Tables
    Product { id: "coffee-table", label: "Coffee Table", category: "table", w: 4.0, h: 2.0, shape: Shape::Rect, color: "#4c3b2a" },
    Product { id: "dining-table-6", label: "Dining Table (6)", category: "table", w: 6.0, h: 3.5, shape: Shape::Rect, color: "#5a4430" },
    Product { id: "dining-table-round", label: "Round Dining Table", category: "table", w: 4.5, h: 4.5, shape: Shape::Round, color: "#5a4430" },
    Product { id: "side-table", label: "Side Table", category: "table", w: 1.5, h: 1.5, shape: Shape::Round, color: "#4c3b2a" },
    Product { id: "console-table", label: "Console Table", category: "table", w: 4.0, h: 1.3, shape: Shape::Rect, color: "#4c3b2a" },
    Product { id: "desk", label: "Desk", category: "table", w: 4.5, h: 2.3, shape: Shape::Rect, color: "#3e2f22" },
    // Beds
    Product { id: "bed-twin", label: "Twin Bed", category: "bed", w: 3.3, h: 6.5, shape: Shape::Bed, color: "#c9b8a3" },
    Product { id: "bed-full", label: "Full Bed", category: "bed", w: 4.5, h: 6.5, shape: Shape::Bed, color: "#c9b8a3" },
    Product { id: "bed-queen", label: "Queen Bed", category: "bed", w: 5.0, h: 6.6, shape: Shape::Bed, color: "#c9b8a3" },
    Product { id: "bed-king", label: "King Bed", category: "bed", w: 6.3, h: 6.6, shape: Shape::Bed, color: "#c9b8a3" },
    Product { id: "crib", label: "Crib", category: "bed", w: 3.0, h: 4.5, shape: Shape::Bed, color: "#d8cdbb" },
    // Storage
    Product { id: "dresser", label: "Dresser", category: "storage", w: 5.0, h: 1.8, shape: Shape::Rect, color: "#5a4430" },
    Product { id: "bookshelf", label: "Bookshelf", category: "storage", w: 3.0, h: 1.0, shape: Shape::Rect, color: "#4c3b2a" },
    Product { id: "wardrobe", label: "Wardrobe", category: "storage", w: 4.0, h: 2.0, shape: Shape::Rect, color: "#3e2f22" },
    Product { id: "nightstand", label: "Nightstand", category: "storage", w: 1.6, h: 1.6, shape: Shape::Rect, color: "#5a4430" },
    Product { id: "tv-stand", label: "TV Stand", category: "storage", w: 5.0, h: 1.3, shape: Shape::Rect, color: "#2b2b2b" },
    // Kitchen / appliances
    Product { id: "fridge", label: "Refrigerator", category: "appliance", w: 3.0, h: 2.8, shape: Shape::Rect, color: "#d9d9d9" },
    Product { id: "stove", label: "Range", category: "appliance", w: 2.5, h: 2.2, shape: Shape::Rect, color: "#cfcfcf" },
    Product { id: "kitchen-island", label: "Kitchen Island", category: "table", w: 6.0, h: 3.0, shape: Shape::Rect, color: "#e4ded2" },
    // Misc
    Product { id: "rug-rect", label: "Area Rug", category: "decor", w: 8.0, h: 5.0, shape: Shape::Rect, color: "#b23a48" },
    Product { id: "plant", label: "Potted Plant", category: "decor", w: 1.5, h: 1.5, shape: Shape::Round, color: "#3c7a3c" },
];

pub fn find_product(id: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Instantiates a catalog product as placed furniture centered at
/// `(x, y)` with no rotation, a fresh id, and the product's default
/// appearance.
pub fn place(product: &Product, x: f64, y: f64) -> Furniture {
    Furniture {
        id: scene::fresh_furniture_id(),
        product_id: product.id.to_string(),
        x,
        y,
        w: product.w,
        h: product.h,
        rotation: 0.0,
        locked: false,
        color: product.color.to_string(),
        shape: product.shape,
        label: product.label.to_string(),
        category: product.category.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<&str> = CATALOG.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn every_product_has_a_positive_footprint() {
        for p in CATALOG {
            assert!(p.w > 0.0 && p.h > 0.0, "{} has a non-positive footprint", p.id);
        }
    }

    #[test]
    fn place_copies_product_footprint_and_assigns_fresh_id() {
        let product = find_product("sofa-3seat").unwrap();
        let placed = place(product, 5.0, 5.0);
        assert_eq!(placed.w, product.w);
        assert_eq!(placed.h, product.h);
        assert_eq!(placed.category, "sofa");
        assert!(placed.id.starts_with("furn-"));
    }
}
