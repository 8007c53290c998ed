//! Pure hit-testing helpers over world-space coordinates.
//!
//! Every tolerance here is expressed as `clamp(screen_px / zoom_factor,
//! min_ft, max_ft)` so handles stay clickable at any zoom level, per the
//! editor's own hit-testing rules.

use roomcraft_engine::geometry::{self, Pt};
use roomcraft_engine::scene::{Door, Room, Scene, Window};
use roomcraft_engine::spatial_hash::SpatialHash;

/// Converts a cursor position in screen pixels to world-space feet.
pub fn screen_to_world(cursor: Pt, pan: Pt, px_per_ft: f64, zoom: f64) -> Pt {
    (cursor - pan) / (px_per_ft * zoom)
}

pub fn world_to_screen(world: Pt, pan: Pt, px_per_ft: f64, zoom: f64) -> Pt {
    world * (px_per_ft * zoom) + pan
}

pub fn opening_hit_radius(zoom: f64) -> f64 {
    (0.6 / zoom).clamp(0.4, 1.0)
}

pub fn vertex_hit_radius(zoom: f64) -> f64 {
    (0.5 / zoom).clamp(0.3, 0.8)
}

pub fn resize_handle_hit_radius(px_per_ft: f64, zoom: f64) -> f64 {
    (8.0 / (px_per_ft * zoom)).clamp(0.2, 0.6)
}

pub fn rotation_handle_hit_radius(zoom: f64) -> f64 {
    (0.4 / zoom.sqrt()).clamp(0.3, 0.6)
}

pub fn hit_furniture<'a>(hash: &'a SpatialHash, world: Pt) -> Option<&'a str> {
    hash.query(world.x, world.y)
}

fn opening_world_position(wall_id: &str, position: f64, room: &Room) -> Option<Pt> {
    let segments = room.segments();
    let seg = segments.iter().find(|s| s.id == wall_id)?;
    Some(geometry::point_at(seg, position))
}

/// Returns the id of the door or window whose projected position on its
/// wall lies within [`opening_hit_radius`] of `world`.
pub fn hit_opening<'a>(
    doors: &'a [Door],
    windows: &'a [Window],
    room: &Room,
    world: Pt,
    zoom: f64,
) -> Option<&'a str> {
    let radius = opening_hit_radius(zoom);
    for d in doors {
        if let Some(p) = opening_world_position(&d.wall_id, d.position, room) {
            if (p - world).length() <= radius {
                return Some(&d.id);
            }
        }
    }
    for w in windows {
        if let Some(p) = opening_world_position(&w.wall_id, w.position, room) {
            if (p - world).length() <= radius {
                return Some(&w.id);
            }
        }
    }
    None
}

/// Returns the index of the nearest room vertex within
/// [`vertex_hit_radius`], if any (select tool, fullscreen only per spec).
pub fn hit_vertex(room: &Room, world: Pt, zoom: f64) -> Option<usize> {
    let radius = vertex_hit_radius(zoom);
    room.vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (i, (v.as_pt() - world).length()))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(i, _)| i)
}

/// The 8 resize handle positions around an axis-aligned bounding rect, in
/// clockwise order starting at the top-left corner.
pub fn resize_handle_positions(rect: geometry::Rect) -> [Pt; 8] {
    let geometry::Rect { min, max } = rect;
    let mid_x = (min.x + max.x) / 2.0;
    let mid_y = (min.y + max.y) / 2.0;
    [
        Pt::new(min.x, min.y),
        Pt::new(mid_x, min.y),
        Pt::new(max.x, min.y),
        Pt::new(max.x, mid_y),
        Pt::new(max.x, max.y),
        Pt::new(mid_x, max.y),
        Pt::new(min.x, max.y),
        Pt::new(min.x, mid_y),
    ]
}

pub fn hit_resize_handle(
    rect: geometry::Rect,
    world: Pt,
    px_per_ft: f64,
    zoom: f64,
) -> Option<usize> {
    let radius = resize_handle_hit_radius(px_per_ft, zoom);
    resize_handle_positions(rect)
        .iter()
        .enumerate()
        .find(|(_, p)| (**p - world).length() <= radius)
        .map(|(i, _)| i)
}

/// The rotation handle sits a fixed screen distance above the bounding
/// rect's top edge midpoint.
pub fn rotation_handle_position(rect: geometry::Rect, handle_offset_ft: f64) -> Pt {
    let mid_x = (rect.min.x + rect.max.x) / 2.0;
    Pt::new(mid_x, rect.min.y - handle_offset_ft)
}

pub fn hit_rotation_handle(
    rect: geometry::Rect,
    world: Pt,
    handle_offset_ft: f64,
    zoom: f64,
) -> bool {
    let p = rotation_handle_position(rect, handle_offset_ft);
    (p - world).length() <= rotation_handle_hit_radius(zoom)
}

/// Scans the scene's furniture list back-to-front for the selection
/// bounding box, used to position handles for a multi-item selection.
pub fn selection_bounds(scene: &Scene, ids: &[String]) -> Option<geometry::Rect> {
    let mut iter = ids.iter().filter_map(|id| scene.find_furniture(id));
    let first = iter.next()?.rect();
    let mut min = first.min;
    let mut max = first.max;
    for f in iter {
        let r = f.rect();
        min = min.min(r.min);
        max = max.max(r.max);
    }
    Some(geometry::Rect::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_radii_stay_within_their_clamp_bounds_at_extreme_zoom() {
        for zoom in [0.1, 0.4, 1.0, 3.0, 10.0] {
            assert!((0.3..=0.8).contains(&vertex_hit_radius(zoom)));
            assert!((0.4..=1.0).contains(&opening_hit_radius(zoom)));
            assert!((0.3..=0.6).contains(&rotation_handle_hit_radius(zoom)));
            assert!((0.2..=0.6).contains(&resize_handle_hit_radius(50.0, zoom)));
        }
    }

    #[test]
    fn screen_to_world_and_back_round_trips() {
        let pan = Pt::new(100.0, 50.0);
        let world = Pt::new(3.0, 4.0);
        let screen = world_to_screen(world, pan, 50.0, 1.5);
        let back = screen_to_world(screen, pan, 50.0, 1.5);
        assert!((back - world).length() < 1e-9);
    }

    #[test]
    fn resize_handles_are_centered_on_rect_corners_and_edges() {
        let rect = geometry::Rect::new(Pt::new(0.0, 0.0), Pt::new(4.0, 2.0));
        let handles = resize_handle_positions(rect);
        assert_eq!(handles[0], Pt::new(0.0, 0.0));
        assert_eq!(handles[4], Pt::new(4.0, 2.0));
        assert_eq!(handles[1], Pt::new(2.0, 0.0));
    }
}
