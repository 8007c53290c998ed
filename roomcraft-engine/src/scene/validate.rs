//! Advisory placement validation. `validate_placement` never mutates the
//! scene; it only reports issues for the host's sidebar panel.

use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::ids::Id;

use super::Scene;

/// Margin within which a furniture item is considered to be straddling a
/// wall rather than merely near it.
pub const WALL_STRADDLE_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    OutsideRoom,
    OverlapsAnotherItem,
    StraddlesWall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: Id,
    pub issue: Issue,
}

pub fn validate_placement(scene: &Scene) -> Vec<ValidationIssue> {
    let room_points = scene.room.points();
    let segments = scene.room.segments();
    let mut issues = Vec::new();

    for (i, f) in scene.furniture.iter().enumerate() {
        let center = f.center();
        if !geometry::point_in_polygon(center.x, center.y, &room_points) {
            issues.push(ValidationIssue {
                id: f.id.clone(),
                issue: Issue::OutsideRoom,
            });
        }

        let rect = f.rect();
        for other in scene.furniture.iter().skip(i + 1) {
            if geometry::rects_overlap(&rect, &other.rect()) {
                issues.push(ValidationIssue {
                    id: f.id.clone(),
                    issue: Issue::OverlapsAnotherItem,
                });
                issues.push(ValidationIssue {
                    id: other.id.clone(),
                    issue: Issue::OverlapsAnotherItem,
                });
            }
        }

        for seg in &segments {
            if let Some((_, _, dist)) =
                geometry::nearest_wall(center.x, center.y, std::slice::from_ref(seg), f64::MAX)
            {
                let half_diag = (rect.width().powi(2) + rect.height().powi(2)).sqrt() / 2.0;
                if dist < half_diag + WALL_STRADDLE_MARGIN && dist > half_diag - WALL_STRADDLE_MARGIN
                {
                    issues.push(ValidationIssue {
                        id: f.id.clone(),
                        issue: Issue::StraddlesWall,
                    });
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Furniture, Room, RoomVertex, Scene, Shape};

    fn rect_room(w: f64, h: f64) -> Room {
        Room {
            vertices: vec![
                RoomVertex::new(0.0, 0.0),
                RoomVertex::new(w, 0.0),
                RoomVertex::new(w, h),
                RoomVertex::new(0.0, h),
            ],
            wall_thickness: 0.5,
        }
    }

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
            color: "#fff".into(),
            shape: Shape::Rect,
            label: "Item".into(),
            category: "misc".into(),
        }
    }

    #[test]
    fn flags_item_outside_room() {
        let mut scene = Scene::new(rect_room(10.0, 10.0));
        scene.furniture.push(item("a", 50.0, 50.0, 2.0, 2.0));
        let issues = validate_placement(&scene);
        assert!(issues
            .iter()
            .any(|i| i.id == "a" && i.issue == Issue::OutsideRoom));
    }

    #[test]
    fn flags_overlapping_items() {
        let mut scene = Scene::new(rect_room(10.0, 10.0));
        scene.furniture.push(item("a", 5.0, 5.0, 2.0, 2.0));
        scene.furniture.push(item("b", 5.5, 5.0, 2.0, 2.0));
        let issues = validate_placement(&scene);
        assert!(issues
            .iter()
            .any(|i| i.id == "a" && i.issue == Issue::OverlapsAnotherItem));
        assert!(issues
            .iter()
            .any(|i| i.id == "b" && i.issue == Issue::OverlapsAnotherItem));
    }

    #[test]
    fn clean_scene_reports_no_issues() {
        let mut scene = Scene::new(rect_room(14.0, 12.0));
        scene.furniture.push(item("a", 7.0, 6.0, 2.0, 2.0));
        assert!(validate_placement(&scene).is_empty());
    }
}
