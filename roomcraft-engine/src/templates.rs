//! Parametric room generators and the named template catalog.
//!
//! Applying a template replaces the room polygon, which implicitly resets
//! wall segments (they are derived, never stored) and prunes any opening
//! whose host wall disappears — callers should follow `apply_template`
//! with [`crate::scene::Scene::prune_orphaned_openings`].

use serde::{Deserialize, Serialize};

use crate::scene::{Room, RoomVertex};

/// A rectangular footprint, outer width x depth, starting at `(0, 0)`.
pub fn rectangular_room(width: f64, depth: f64) -> Room {
    Room {
        vertices: vec![
            RoomVertex::new(0.0, 0.0),
            RoomVertex::new(width, 0.0),
            RoomVertex::new(width, depth),
            RoomVertex::new(0.0, depth),
        ],
        wall_thickness: 0.5,
    }
}

/// An L-shaped footprint: an outer `width x depth` rectangle with a
/// `cut_w x cut_h` corner removed from the top-right.
pub fn l_shaped_room(width: f64, depth: f64, cut_w: f64, cut_h: f64) -> Room {
    let cut_w = cut_w.min(width);
    let cut_h = cut_h.min(depth);
    Room {
        vertices: vec![
            RoomVertex::new(0.0, 0.0),
            RoomVertex::new(width - cut_w, 0.0),
            RoomVertex::new(width - cut_w, cut_h),
            RoomVertex::new(width, cut_h),
            RoomVertex::new(width, depth),
            RoomVertex::new(0.0, depth),
        ],
        wall_thickness: 0.5,
    }
}

/// A U-shaped footprint: an outer `width x depth` rectangle with a
/// `cut_w x cut_h` notch removed from the top-center.
pub fn u_shaped_room(width: f64, depth: f64, cut_w: f64, cut_h: f64) -> Room {
    let cut_w = cut_w.min(width - 0.01).max(0.0);
    let cut_h = cut_h.min(depth);
    let left = (width - cut_w) / 2.0;
    let right = left + cut_w;

    Room {
        vertices: vec![
            RoomVertex::new(0.0, 0.0),
            RoomVertex::new(left, 0.0),
            RoomVertex::new(left, cut_h),
            RoomVertex::new(right, cut_h),
            RoomVertex::new(right, 0.0),
            RoomVertex::new(width, 0.0),
            RoomVertex::new(width, depth),
            RoomVertex::new(0.0, depth),
        ],
        wall_thickness: 0.5,
    }
}

/// A T-shaped footprint: a `cut_w`-wide top bar spanning the outer width,
/// with a `width`-wide stem dropping down `depth - cut_h` feet, centered.
pub fn t_shaped_room(width: f64, depth: f64, stem_w: f64, bar_h: f64) -> Room {
    let stem_w = stem_w.min(width - 0.01).max(0.0);
    let bar_h = bar_h.min(depth);
    let left = (width - stem_w) / 2.0;
    let right = left + stem_w;

    Room {
        vertices: vec![
            RoomVertex::new(0.0, 0.0),
            RoomVertex::new(width, 0.0),
            RoomVertex::new(width, bar_h),
            RoomVertex::new(right, bar_h),
            RoomVertex::new(right, depth),
            RoomVertex::new(left, depth),
            RoomVertex::new(left, bar_h),
            RoomVertex::new(0.0, bar_h),
        ],
        wall_thickness: 0.5,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generator {
    Rectangular,
    LShaped,
    UShaped,
    TShaped,
}

/// A named preset binding a generator to fixed dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Template {
    pub name: &'static str,
    pub generator: Generator,
    pub width: f64,
    pub depth: f64,
    pub cut_a: f64,
    pub cut_b: f64,
}

impl Template {
    pub fn build(&self) -> Room {
        match self.generator {
            Generator::Rectangular => rectangular_room(self.width, self.depth),
            Generator::LShaped => l_shaped_room(self.width, self.depth, self.cut_a, self.cut_b),
            Generator::UShaped => u_shaped_room(self.width, self.depth, self.cut_a, self.cut_b),
            Generator::TShaped => t_shaped_room(self.width, self.depth, self.cut_a, self.cut_b),
        }
    }
}

/// The fixed catalog of named room templates: living-room sizes,
/// bedrooms, studios, galley kitchens, and a couple of non-rectangular
/// shapes to exercise the L/U/T generators.
pub const CATALOG: &[Template] = &[
    Template {
        name: "Small Bedroom",
        generator: Generator::Rectangular,
        width: 10.0,
        depth: 10.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "Master Bedroom",
        generator: Generator::Rectangular,
        width: 14.0,
        depth: 16.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "Living Room — Compact",
        generator: Generator::Rectangular,
        width: 12.0,
        depth: 14.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "Living Room — Spacious",
        generator: Generator::Rectangular,
        width: 18.0,
        depth: 20.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "Studio",
        generator: Generator::Rectangular,
        width: 16.0,
        depth: 12.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "Galley Kitchen",
        generator: Generator::Rectangular,
        width: 8.0,
        depth: 14.0,
        cut_a: 0.0,
        cut_b: 0.0,
    },
    Template {
        name: "L-Shaped Living/Dining",
        generator: Generator::LShaped,
        width: 20.0,
        depth: 16.0,
        cut_a: 8.0,
        cut_b: 6.0,
    },
    Template {
        name: "U-Shaped Kitchen",
        generator: Generator::UShaped,
        width: 16.0,
        depth: 12.0,
        cut_a: 6.0,
        cut_b: 5.0,
    },
    Template {
        name: "T-Shaped Loft",
        generator: Generator::TShaped,
        width: 18.0,
        depth: 18.0,
        cut_a: 10.0,
        cut_b: 7.0,
    },
];

pub fn find_template(name: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;

    #[test]
    fn rectangular_room_is_simple_and_has_expected_area() {
        let room = rectangular_room(14.0, 12.0);
        let pts = room.points();
        assert!(geometry::is_simple_polygon(&pts));
        assert!((geometry::polygon_area(&pts) - 168.0).abs() < 1e-9);
    }

    #[test]
    fn every_catalog_entry_builds_a_simple_polygon() {
        for t in CATALOG {
            let room = t.build();
            assert!(
                geometry::is_simple_polygon(&room.points()),
                "template {:?} produced a non-simple polygon",
                t.name
            );
        }
    }

    #[test]
    fn l_shaped_has_smaller_area_than_bounding_rect() {
        let room = l_shaped_room(20.0, 16.0, 8.0, 6.0);
        let area = geometry::polygon_area(&room.points());
        assert!(area < 20.0 * 16.0);
        assert!((area - (20.0 * 16.0 - 8.0 * 6.0)).abs() < 1e-9);
    }

    #[test]
    fn s6_apply_template_prunes_door_on_vanished_wall() {
        use crate::scene::{Door, Scene, SwingDir};

        let mut scene = Scene::new(rectangular_room(14.0, 12.0));
        let south_wall = scene.wall_segments()[2].id.clone();
        scene.doors.push(Door {
            id: "d1".into(),
            wall_id: south_wall,
            position: 0.5,
            width: 2.8,
            swing_angle: 90.0,
            swing_dir: SwingDir::Left,
        });

        let template = find_template("L-Shaped Living/Dining").unwrap();
        scene.room = template.build();
        let pruned = scene.prune_orphaned_openings();

        assert!(pruned.doors.is_empty());
        assert!(crate::scene::validate::validate_placement(&pruned).is_empty());
    }
}
