//! Advisory circulation-space rectangles in front of furniture items.

use serde::{Deserialize, Serialize};

use crate::geometry::Pt;
use crate::ids::Id;

use super::Furniture;

/// Front-of-object circulation depth, in feet, keyed by category. Spec
/// §4.2 calls out sofa/bed (2.5 ft) and chair/table (2 ft); everything
/// else gets no clearance zone.
fn clearance_depth(category: &str) -> Option<f64> {
    match category {
        "sofa" | "bed" => Some(2.5),
        "chair" | "table" => Some(2.0),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceZone {
    pub furniture_id: Id,
    /// Four corners of the (possibly rotated) clearance rectangle, in
    /// drawing order.
    pub corners: [Pt; 4],
}

/// Builds a clearance rectangle in front of the item's long edge,
/// rotated along with the item (rotation is visual for collision but
/// meaningful for "which way is the front" here).
///
/// The long edge of the footprint is the front: for a sofa (`w > h`) that
/// is the item's own `+y` edge; for a bed (`h > w`, true of every bed in
/// [`crate::furniture_library`]) the long edge runs along `y`, so the
/// front sticks out along `+x` instead.
pub fn compute_clearances(furniture: &[Furniture]) -> Vec<ClearanceZone> {
    furniture
        .iter()
        .filter_map(|f| {
            let depth = clearance_depth(&f.category)?;

            let (near_left, near_right, far_left, far_right) = if f.w >= f.h {
                let half_span = f.w / 2.0;
                let front = f.h / 2.0;
                (
                    Pt::new(-half_span, front),
                    Pt::new(half_span, front),
                    Pt::new(-half_span, front + depth),
                    Pt::new(half_span, front + depth),
                )
            } else {
                let half_span = f.h / 2.0;
                let front = f.w / 2.0;
                (
                    Pt::new(front, -half_span),
                    Pt::new(front, half_span),
                    Pt::new(front + depth, -half_span),
                    Pt::new(front + depth, half_span),
                )
            };

            let theta = f.rotation.to_radians();
            let (sin, cos) = theta.sin_cos();
            let rotate = |p: Pt| {
                Pt::new(
                    p.x * cos - p.y * sin + f.x,
                    p.x * sin + p.y * cos + f.y,
                )
            };

            Some(ClearanceZone {
                furniture_id: f.id.clone(),
                corners: [
                    rotate(near_left),
                    rotate(near_right),
                    rotate(far_right),
                    rotate(far_left),
                ],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Shape;

    fn sofa() -> Furniture {
        Furniture {
            id: "s1".into(),
            product_id: "p".into(),
            x: 0.0,
            y: 0.0,
            w: 7.0,
            h: 3.0,
            rotation: 0.0,
            locked: false,
            color: "#000".into(),
            shape: Shape::Rect,
            label: "Sofa".into(),
            category: "sofa".into(),
        }
    }

    #[test]
    fn sofa_gets_a_clearance_zone() {
        let zones = compute_clearances(&[sofa()]);
        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        // Near edge sits at the sofa's own front edge (y = h/2 = 1.5).
        assert!((zone.corners[0].y - 1.5).abs() < 1e-9);
        // Far edge sits depth (2.5 ft) beyond that.
        assert!((zone.corners[2].y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn misc_category_has_no_clearance() {
        let mut f = sofa();
        f.category = "lamp".into();
        assert!(compute_clearances(&[f]).is_empty());
    }

    #[test]
    fn bed_with_longer_h_gets_clearance_along_x_not_y() {
        // A queen bed: width (w) is shorter than length (h), unlike the
        // sofa fixture above. The front must stick out along +x.
        let bed = Furniture {
            id: "b1".into(),
            product_id: "p".into(),
            x: 0.0,
            y: 0.0,
            w: 5.0,
            h: 6.6,
            rotation: 0.0,
            locked: false,
            color: "#000".into(),
            shape: Shape::Bed,
            label: "Queen Bed".into(),
            category: "bed".into(),
        };
        let zones = compute_clearances(&[bed]);
        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        // Near edge sits at the bed's own side edge (x = w/2 = 2.5).
        assert!((zone.corners[0].x - 2.5).abs() < 1e-9);
        // Far edge sits depth (2.5 ft) beyond that.
        assert!((zone.corners[2].x - 5.0).abs() < 1e-9);
        // The span runs along y, from -h/2 to h/2.
        assert!((zone.corners[0].y - (-3.3)).abs() < 1e-9);
        assert!((zone.corners[1].y - 3.3).abs() < 1e-9);
    }
}
