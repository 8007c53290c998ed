//! Pure edit operations over a [`Scene`].
//!
//! Every function here takes a scene (and sometimes a sub-list of ids) and
//! returns a new scene. None of them mutate their input. Locked furniture
//! silently rejects move/resize/rotate: the op returns its input unchanged
//! rather than erroring (spec §7 "Invalid operation on locked item").

use crate::geometry::{self, Pt};
use crate::ids::Id;

use super::{
    fresh_door_id, fresh_furniture_id, fresh_window_id, Door, Furniture, Room, RoomVertex, Scene,
    SwingDir, Window, DEFAULT_DOOR_WIDTH, DEFAULT_WINDOW_WIDTH, MIN_FURNITURE_SIZE,
    OPENING_EDGE_MARGIN,
};

fn map_furniture(scene: &Scene, id: &str, f: impl FnOnce(&Furniture) -> Furniture) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        if next.furniture[idx].locked {
            return scene.clone();
        }
        next.furniture[idx] = f(&next.furniture[idx]);
    }
    next
}

/// Moves a furniture item's center to `(x, y)`.
pub fn move_item(scene: &Scene, id: &str, x: f64, y: f64) -> Scene {
    map_furniture(scene, id, |f| Furniture { x, y, ..f.clone() })
}

/// Rotates a furniture item by `delta_deg`, normalized to `[0, 360)`.
pub fn rotate(scene: &Scene, id: &str, delta_deg: f64) -> Scene {
    map_furniture(scene, id, |f| Furniture {
        rotation: normalize_angle(f.rotation + delta_deg),
        ..f.clone()
    })
}

/// Resizes a furniture item, enforcing the 0.5 ft floor on both axes.
pub fn resize(scene: &Scene, id: &str, w: f64, h: f64) -> Scene {
    map_furniture(scene, id, |f| Furniture {
        w: w.max(MIN_FURNITURE_SIZE),
        h: h.max(MIN_FURNITURE_SIZE),
        ..f.clone()
    })
}

pub fn delete(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    next.furniture.retain(|f| f.id != id);
    next
}

/// Duplicates a furniture item, offsetting it by +0.5 ft on both axes and
/// assigning it a fresh id.
pub fn duplicate(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(src) = scene.find_furniture(id).cloned() {
        let copy = Furniture {
            id: fresh_furniture_id(),
            x: src.x + 0.5,
            y: src.y + 0.5,
            ..src
        };
        next.furniture.push(copy);
    }
    next
}

pub fn toggle_lock(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        next.furniture[idx].locked = !next.furniture[idx].locked;
    }
    next
}

fn normalize_angle(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

// --- Multi-item operations -------------------------------------------------

pub fn move_many(scene: &Scene, ids: &[Id], dx: f64, dy: f64) -> Scene {
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if ids.iter().any(|id| id == &f.id) && !f.locked {
            f.x += dx;
            f.y += dy;
        }
    }
    next
}

pub fn rotate_many(scene: &Scene, ids: &[Id], delta_deg: f64) -> Scene {
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if ids.iter().any(|id| id == &f.id) && !f.locked {
            f.rotation = normalize_angle(f.rotation + delta_deg);
        }
    }
    next
}

pub fn delete_many(scene: &Scene, ids: &[Id]) -> Scene {
    let mut next = scene.clone();
    next.furniture.retain(|f| !ids.iter().any(|id| id == &f.id));
    next
}

pub fn duplicate_many(scene: &Scene, ids: &[Id]) -> Scene {
    let mut next = scene.clone();
    for id in ids {
        if let Some(src) = scene.find_furniture(id).cloned() {
            next.furniture.push(Furniture {
                id: fresh_furniture_id(),
                x: src.x + 0.5,
                y: src.y + 0.5,
                ..src
            });
        }
    }
    next
}

pub fn lock_many(scene: &Scene, ids: &[Id]) -> Scene {
    set_locked_many(scene, ids, true)
}

pub fn unlock_many(scene: &Scene, ids: &[Id]) -> Scene {
    set_locked_many(scene, ids, false)
}

fn set_locked_many(scene: &Scene, ids: &[Id], locked: bool) -> Scene {
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if ids.iter().any(|id| id == &f.id) {
            f.locked = locked;
        }
    }
    next
}

fn selection_bounds(scene: &Scene, ids: &[Id]) -> Option<geometry::Rect> {
    let rects: Vec<_> = ids
        .iter()
        .filter_map(|id| scene.find_furniture(id))
        .map(Furniture::rect)
        .collect();
    if rects.is_empty() {
        return None;
    }
    let mut min = rects[0].min;
    let mut max = rects[0].max;
    for r in &rects[1..] {
        min = min.min(r.min);
        max = max.max(r.max);
    }
    Some(geometry::Rect::new(min, max))
}

pub fn flip_h(scene: &Scene, ids: &[Id]) -> Scene {
    let Some(bounds) = selection_bounds(scene, ids) else {
        return scene.clone();
    };
    let axis = bounds.center().x;
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if ids.iter().any(|id| id == &f.id) && !f.locked {
            f.x = 2.0 * axis - f.x;
        }
    }
    next
}

pub fn flip_v(scene: &Scene, ids: &[Id]) -> Scene {
    let Some(bounds) = selection_bounds(scene, ids) else {
        return scene.clone();
    };
    let axis = bounds.center().y;
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if ids.iter().any(|id| id == &f.id) && !f.locked {
            f.y = 2.0 * axis - f.y;
        }
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignEdge {
    Left,
    Right,
    Top,
    Bottom,
    CenterH,
    CenterV,
}

pub fn align(scene: &Scene, ids: &[Id], edge: AlignEdge) -> Scene {
    let Some(bounds) = selection_bounds(scene, ids) else {
        return scene.clone();
    };
    let mut next = scene.clone();
    for f in &mut next.furniture {
        if !ids.iter().any(|id| id == &f.id) || f.locked {
            continue;
        }
        let half_w = f.w / 2.0;
        let half_h = f.h / 2.0;
        match edge {
            AlignEdge::Left => f.x = bounds.min.x + half_w,
            AlignEdge::Right => f.x = bounds.max.x - half_w,
            AlignEdge::Top => f.y = bounds.min.y + half_h,
            AlignEdge::Bottom => f.y = bounds.max.y - half_h,
            AlignEdge::CenterH => f.x = bounds.center().x,
            AlignEdge::CenterV => f.y = bounds.center().y,
        }
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Distributes interior items at equal spacing between the two extreme
/// items along `axis`. Items are sorted by their center along that axis
/// first; the extreme items themselves do not move.
pub fn distribute(scene: &Scene, ids: &[Id], axis: Axis) -> Scene {
    let mut ordered: Vec<&Id> = ids.iter().collect();
    ordered.sort_by(|a, b| {
        let pa = scene.find_furniture(a).map(Furniture::center).unwrap_or(Pt::ZERO);
        let pb = scene.find_furniture(b).map(Furniture::center).unwrap_or(Pt::ZERO);
        let (ca, cb) = match axis {
            Axis::Horizontal => (pa.x, pb.x),
            Axis::Vertical => (pa.y, pb.y),
        };
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    if ordered.len() < 3 {
        return scene.clone();
    }

    let first = scene.find_furniture(ordered[0]).map(Furniture::center);
    let last = scene
        .find_furniture(ordered[ordered.len() - 1])
        .map(Furniture::center);
    let (Some(first), Some(last)) = (first, last) else {
        return scene.clone();
    };

    let (start, end) = match axis {
        Axis::Horizontal => (first.x, last.x),
        Axis::Vertical => (first.y, last.y),
    };
    let step = (end - start) / (ordered.len() - 1) as f64;

    let mut next = scene.clone();
    for (i, id) in ordered.iter().enumerate().skip(1).take(ordered.len() - 2) {
        if let Some(f) = next.furniture.iter_mut().find(|f| &&f.id == id) {
            if f.locked {
                continue;
            }
            let pos = start + step * i as f64;
            match axis {
                Axis::Horizontal => f.x = pos,
                Axis::Vertical => f.y = pos,
            }
        }
    }
    next
}

// --- Z-order -----------------------------------------------------------

pub fn bring_to_front(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        let item = next.furniture.remove(idx);
        next.furniture.push(item);
    }
    next
}

pub fn send_to_back(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        let item = next.furniture.remove(idx);
        next.furniture.insert(0, item);
    }
    next
}

pub fn bring_forward(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        if idx + 1 < next.furniture.len() {
            next.furniture.swap(idx, idx + 1);
        }
    }
    next
}

pub fn send_backward(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    if let Some(idx) = next.find_furniture_index(id) {
        if idx > 0 {
            next.furniture.swap(idx, idx - 1);
        }
    }
    next
}

// --- Room ops ------------------------------------------------------------

/// Inserts a new vertex at the midpoint between `index` and `index + 1`.
pub fn add_vertex(room: &Room, index: usize) -> Room {
    let n = room.vertices.len();
    if n == 0 {
        return room.clone();
    }
    let a = room.vertices[index % n];
    let b = room.vertices[(index + 1) % n];
    let mid = RoomVertex::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

    let mut vertices = room.vertices.clone();
    vertices.insert((index + 1) % n, mid);
    Room {
        vertices,
        ..room.clone()
    }
}

pub fn move_vertex(room: &Room, index: usize, x: f64, y: f64) -> Room {
    let mut vertices = room.vertices.clone();
    if let Some(v) = vertices.get_mut(index) {
        v.x = x;
        v.y = y;
    }
    Room {
        vertices,
        ..room.clone()
    }
}

/// Refuses (returns the input unchanged) if doing so would leave fewer
/// than 3 vertices.
pub fn remove_vertex(room: &Room, index: usize) -> Room {
    if room.vertices.len() <= 3 {
        return room.clone();
    }
    let mut vertices = room.vertices.clone();
    vertices.remove(index);
    Room {
        vertices,
        ..room.clone()
    }
}

// --- Door / window ops ---------------------------------------------------

fn clamp_opening_width(wall_length: f64, width: f64) -> f64 {
    let usable = (wall_length - 2.0 * OPENING_EDGE_MARGIN).max(0.0);
    width.min(usable)
}

pub fn add_door_to_wall(scene: &Scene, wall_id: &str, t: f64) -> Scene {
    let Some(seg) = scene.wall_segments().into_iter().find(|s| s.id == wall_id) else {
        return scene.clone();
    };
    let width = clamp_opening_width(seg.length, DEFAULT_DOOR_WIDTH);
    if width <= 0.0 {
        return scene.clone();
    }
    let mut next = scene.clone();
    next.doors.push(Door {
        id: fresh_door_id(),
        wall_id: wall_id.to_string(),
        position: t.clamp(0.0, 1.0),
        width,
        swing_angle: 90.0,
        swing_dir: SwingDir::Right,
    });
    next
}

pub fn add_window_to_wall(scene: &Scene, wall_id: &str, t: f64) -> Scene {
    let Some(seg) = scene.wall_segments().into_iter().find(|s| s.id == wall_id) else {
        return scene.clone();
    };
    let width = clamp_opening_width(seg.length, DEFAULT_WINDOW_WIDTH);
    if width <= 0.0 {
        return scene.clone();
    }
    let mut next = scene.clone();
    next.windows.push(Window {
        id: fresh_window_id(),
        wall_id: wall_id.to_string(),
        position: t.clamp(0.0, 1.0),
        width,
    });
    next
}

pub fn remove_door(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    next.doors.retain(|d| d.id != id);
    next
}

pub fn remove_window(scene: &Scene, id: &str) -> Scene {
    let mut next = scene.clone();
    next.windows.retain(|w| w.id != id);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, Shape};

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

    fn sofa(id: &str, x: f64, y: f64) -> Furniture {
        Furniture {
            id: id.to_string(),
            product_id: "sofa-001".into(),
            x,
            y,
            w: 7.0,
            h: 3.0,
            rotation: 0.0,
            locked: false,
            color: "#888".into(),
            shape: Shape::Rect,
            label: "Sofa".into(),
            category: "sofa".into(),
        }
    }

    #[test]
    fn s1_add_and_move_a_sofa() {
        let mut scene = Scene::new(rect_room(14.0, 12.0));
        scene.furniture.push(sofa("s1", 3.0, 3.0));

        let moved = move_item(&scene, "s1", 7.0, 6.0);
        let f = moved.find_furniture("s1").unwrap();
        assert_eq!((f.x, f.y), (7.0, 6.0));
    }

    #[test]
    fn locked_item_rejects_move_resize_rotate() {
        let mut scene = Scene::new(rect_room(14.0, 12.0));
        let mut item = sofa("s1", 3.0, 3.0);
        item.locked = true;
        scene.furniture.push(item);

        assert_eq!(move_item(&scene, "s1", 9.0, 9.0), scene);
        assert_eq!(resize(&scene, "s1", 1.0, 1.0), scene);
        assert_eq!(rotate(&scene, "s1", 45.0), scene);
    }

    #[test]
    fn resize_floors_at_half_foot() {
        let mut scene = Scene::new(rect_room(14.0, 12.0));
        scene.furniture.push(sofa("s1", 3.0, 3.0));
        let next = resize(&scene, "s1", 0.1, 0.2);
        let f = next.find_furniture("s1").unwrap();
        assert_eq!((f.w, f.h), (MIN_FURNITURE_SIZE, MIN_FURNITURE_SIZE));
    }

    #[test]
    fn duplicate_offsets_and_assigns_fresh_id() {
        let mut scene = Scene::new(rect_room(14.0, 12.0));
        scene.furniture.push(sofa("s1", 3.0, 3.0));
        let next = duplicate(&scene, "s1");
        assert_eq!(next.furniture.len(), 2);
        let copy = &next.furniture[1];
        assert_ne!(copy.id, "s1");
        assert_eq!((copy.x, copy.y), (3.5, 3.5));
    }

    #[test]
    fn move_many_translates_every_selected_item_by_exactly_dxdy() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(sofa("a", 2.0, 2.0));
        scene.furniture.push(sofa("b", 5.0, 5.0));
        scene.furniture.push(sofa("c", 9.0, 9.0));

        let ids = vec!["a".to_string(), "b".to_string()];
        let next = move_many(&scene, &ids, 1.5, -0.5);

        assert_eq!((next.find_furniture("a").unwrap().x, next.find_furniture("a").unwrap().y), (3.5, 1.5));
        assert_eq!((next.find_furniture("b").unwrap().x, next.find_furniture("b").unwrap().y), (6.5, 4.5));
        // Untouched.
        assert_eq!((next.find_furniture("c").unwrap().x, next.find_furniture("c").unwrap().y), (9.0, 9.0));
    }

    #[test]
    fn remove_vertex_refuses_below_three() {
        let room = Room {
            vertices: vec![
                RoomVertex::new(0.0, 0.0),
                RoomVertex::new(10.0, 0.0),
                RoomVertex::new(5.0, 8.0),
            ],
            wall_thickness: 0.5,
        };
        let next = remove_vertex(&room, 0);
        assert_eq!(next, room);
    }

    #[test]
    fn distribute_places_interior_items_evenly() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(sofa("a", 0.0, 5.0));
        scene.furniture.push(sofa("b", 1.0, 5.0));
        scene.furniture.push(sofa("c", 10.0, 5.0));
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let next = distribute(&scene, &ids, Axis::Horizontal);
        assert_eq!(next.find_furniture("b").unwrap().x, 5.0);
    }

    #[test]
    fn z_order_bring_to_front_moves_item_last() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(sofa("a", 0.0, 0.0));
        scene.furniture.push(sofa("b", 1.0, 1.0));
        let next = bring_to_front(&scene, "a");
        assert_eq!(next.furniture.last().unwrap().id, "a");
    }
}
