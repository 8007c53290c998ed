//! The pointer/keyboard/wheel-driven interaction state machine.
//!
//! Grounded on the host project's own input dispatch: a tagged-variant
//! mode enum that the pointer-down handler transitions into, rather than
//! a pile of `dragging: bool` / `resizing: bool` flags. Every `on_*`
//! function here is a pure transform from `(EditorState, Event) ->
//! EditorState`; the `eframe::App::update` loop in `app.rs` is the only
//! place side effects (repaint requests, history commits) happen.

use roomcraft_engine::geometry::Pt;
use roomcraft_engine::scene::mutations;
use roomcraft_engine::scene::Scene;
use roomcraft_engine::snap;
use roomcraft_engine::spatial_hash::SpatialHash;

use crate::hit_test;

/// The active tool, selected via toolbar or the V/H/D/W/M/X shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Pan,
    Door,
    Window,
    Measure,
    Eraser,
}

impl Tool {
    pub fn from_shortcut(key: char) -> Option<Tool> {
        match key.to_ascii_lowercase() {
            'v' => Some(Tool::Select),
            'h' => Some(Tool::Pan),
            'd' => Some(Tool::Door),
            'w' => Some(Tool::Window),
            'm' => Some(Tool::Measure),
            'x' => Some(Tool::Eraser),
            _ => None,
        }
    }
}

/// A resize handle identifier: the 8 positions returned by
/// [`hit_test::resize_handle_positions`], clockwise from top-left.
pub type HandleIndex = usize;

/// Exactly one of these is active during a pointer-down/move/up sequence.
/// Mirrors spec's `idle | pan | drag-single | drag-multi | resize |
/// rotate | vertex-drag | rubber-band | measure` enumeration directly,
/// carrying whatever per-mode state each variant needs instead of storing
/// it alongside in loose fields.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    Idle,
    Pan {
        last_cursor: Pt,
    },
    DragSingle {
        id: String,
        grab_offset: Pt,
        collision: bool,
        guides: Vec<snap::Guide>,
    },
    DragMulti {
        ids: Vec<String>,
        last_cursor: Pt,
    },
    Resize {
        id: String,
        handle: HandleIndex,
        original_rect: roomcraft_engine::geometry::Rect,
        lock_aspect: bool,
    },
    Rotate {
        id: String,
        pivot: Pt,
    },
    VertexDrag {
        index: usize,
    },
    RubberBand {
        start: Pt,
        current: Pt,
    },
    Measure {
        start: Pt,
        end: Pt,
    },
}

impl Default for InteractionMode {
    fn default() -> Self {
        InteractionMode::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Everything the dispatch functions need to read about the current
/// viewport/selection without threading a dozen separate parameters.
pub struct DispatchContext<'a> {
    pub scene: &'a Scene,
    pub spatial_hash: &'a SpatialHash,
    pub tool: Tool,
    pub selection: &'a [String],
    pub space_held: bool,
    pub shift_held: bool,
    pub fullscreen: bool,
}

pub struct PointerDownOutcome {
    pub mode: InteractionMode,
    pub scene: Scene,
    pub selection: Vec<String>,
    /// True if this press already committed a mutation (door/window
    /// insertion, eraser delete) and history should push immediately.
    pub commit: bool,
}

/// Implements the pointer-down priority list.
pub fn on_pointer_down(
    ctx: &DispatchContext,
    button: MouseButton,
    world: Pt,
    zoom: f64,
    px_per_ft: f64,
) -> PointerDownOutcome {
    let scene = ctx.scene;
    let unchanged = |mode: InteractionMode, selection: Vec<String>| PointerDownOutcome {
        mode,
        scene: scene.clone(),
        selection,
        commit: false,
    };

    if button == MouseButton::Right {
        // Context menu is a host-app UI concern; the engine just reports
        // what's under the cursor via a normal selection hit.
        return unchanged(InteractionMode::Idle, ctx.selection.to_vec());
    }

    if button == MouseButton::Middle || ctx.space_held || ctx.tool == Tool::Pan {
        return unchanged(
            InteractionMode::Pan { last_cursor: world },
            ctx.selection.to_vec(),
        );
    }

    if ctx.tool == Tool::Eraser {
        if let Some(id) = hit_test::hit_furniture(ctx.spatial_hash, world) {
            let next = mutations::delete(scene, id);
            return PointerDownOutcome {
                mode: InteractionMode::Idle,
                scene: next,
                selection: Vec::new(),
                commit: true,
            };
        }
        return unchanged(InteractionMode::Idle, ctx.selection.to_vec());
    }

    if ctx.tool == Tool::Measure {
        return PointerDownOutcome {
            mode: InteractionMode::Measure {
                start: world,
                end: world,
            },
            scene: scene.clone(),
            selection: ctx.selection.to_vec(),
            commit: false,
        };
    }

    if matches!(ctx.tool, Tool::Door | Tool::Window) {
        let segments = scene.wall_segments();
        if let Some((seg, t, _dist)) =
            roomcraft_engine::geometry::nearest_wall(world.x, world.y, &segments, 1.0)
        {
            let wall_id = seg.id.clone();
            let next = if ctx.tool == Tool::Door {
                mutations::add_door_to_wall(scene, &wall_id, t)
            } else {
                mutations::add_window_to_wall(scene, &wall_id, t)
            };
            return PointerDownOutcome {
                mode: InteractionMode::Idle,
                scene: next,
                selection: Vec::new(),
                commit: true,
            };
        }
        return unchanged(InteractionMode::Idle, ctx.selection.to_vec());
    }

    // select tool from here on.
    debug_assert_eq!(ctx.tool, Tool::Select);

    if !ctx.selection.is_empty() {
        if let Some(bounds) = hit_test::selection_bounds(scene, ctx.selection) {
            if hit_test::hit_rotation_handle(bounds, world, 0.6, zoom) {
                let pivot = bounds.center();
                return PointerDownOutcome {
                    mode: InteractionMode::Rotate {
                        id: ctx.selection[0].clone(),
                        pivot,
                    },
                    scene: scene.clone(),
                    selection: ctx.selection.to_vec(),
                    commit: false,
                };
            }
            if let Some(handle) = hit_test::hit_resize_handle(bounds, world, px_per_ft, zoom) {
                return PointerDownOutcome {
                    mode: InteractionMode::Resize {
                        id: ctx.selection[0].clone(),
                        handle,
                        original_rect: bounds,
                        lock_aspect: ctx.shift_held,
                    },
                    scene: scene.clone(),
                    selection: ctx.selection.to_vec(),
                    commit: false,
                };
            }
        }
    }

    if ctx.fullscreen {
        if let Some(index) = hit_test::hit_vertex(&scene.room, world, zoom) {
            return PointerDownOutcome {
                mode: InteractionMode::VertexDrag { index },
                scene: scene.clone(),
                selection: ctx.selection.to_vec(),
                commit: false,
            };
        }
    }

    if let Some(id) = hit_test::hit_furniture(ctx.spatial_hash, world) {
        let mut selection = ctx.selection.to_vec();
        if ctx.shift_held {
            if let Some(pos) = selection.iter().position(|s| s == id) {
                selection.remove(pos);
            } else {
                selection.push(id.to_string());
            }
            return unchanged(InteractionMode::Idle, selection);
        }

        let was_multi = selection.len() > 1 && selection.iter().any(|s| s == id);
        let locked = scene.find_furniture(id).map(|f| f.locked).unwrap_or(true);
        if !was_multi {
            selection = vec![id.to_string()];
        }

        if locked {
            return unchanged(InteractionMode::Idle, selection);
        }

        let mode = if was_multi {
            InteractionMode::DragMulti {
                ids: selection.clone(),
                last_cursor: world,
            }
        } else {
            let f = scene.find_furniture(id).unwrap();
            InteractionMode::DragSingle {
                id: id.to_string(),
                grab_offset: world - f.center(),
                collision: false,
                guides: Vec::new(),
            }
        };
        return PointerDownOutcome {
            mode,
            scene: scene.clone(),
            selection,
            commit: false,
        };
    }

    if let Some(id) = hit_test::hit_opening(&scene.doors, &scene.windows, &scene.room, world, zoom)
    {
        return unchanged(InteractionMode::Idle, vec![id.to_string()]);
    }

    PointerDownOutcome {
        mode: InteractionMode::RubberBand {
            start: world,
            current: world,
        },
        scene: scene.clone(),
        selection: Vec::new(),
        commit: false,
    }
}

/// Applies pointer-move behavior for the current mode, returning the
/// updated mode and scene. `threshold` is the world-space smart-snap
/// tolerance from [`snap::screen_to_world_threshold`].
pub fn on_pointer_move(
    mode: &InteractionMode,
    scene: &Scene,
    world: Pt,
    pan: &mut Pt,
    threshold: f64,
    shift_held: bool,
) -> (InteractionMode, Scene) {
    match mode {
        InteractionMode::Pan { last_cursor } => {
            // Caller passes screen-space cursor deltas as world deltas
            // scaled by the viewport transform; here we just track state.
            let delta = world - *last_cursor;
            *pan += delta;
            (
                InteractionMode::Pan { last_cursor: world },
                scene.clone(),
            )
        }
        InteractionMode::RubberBand { start, .. } => (
            InteractionMode::RubberBand {
                start: *start,
                current: world,
            },
            scene.clone(),
        ),
        InteractionMode::DragSingle { id, grab_offset, .. } => {
            let Some(f) = scene.find_furniture(id) else {
                return (mode.clone(), scene.clone());
            };
            let target = world - *grab_offset;
            let (gx, gy) = if scene.snap.snap_to_grid {
                snap::snap_to_grid(target.x, target.y, scene.snap.grid_size)
            } else {
                (target.x, target.y)
            };
            let others: Vec<_> = scene
                .furniture
                .iter()
                .filter(|other| other.id != *id)
                .cloned()
                .collect();
            let snapped = snap::apply_smart_snap(gx, gy, f.w, f.h, &others, &scene.room, threshold);
            let next = mutations::move_item(scene, id, snapped.x, snapped.y);
            let moved_rect = roomcraft_engine::geometry::Rect::from_center_size(
                Pt::new(snapped.x, snapped.y),
                f.w,
                f.h,
            );
            let collision = others
                .iter()
                .any(|o| roomcraft_engine::geometry::rects_overlap(&moved_rect, &o.rect()));
            (
                InteractionMode::DragSingle {
                    id: id.clone(),
                    grab_offset: *grab_offset,
                    collision,
                    guides: snapped.guides,
                },
                next,
            )
        }
        InteractionMode::DragMulti { ids, last_cursor } => {
            let delta = world - *last_cursor;
            let next = mutations::move_many(scene, ids, delta.x, delta.y);
            (
                InteractionMode::DragMulti {
                    ids: ids.clone(),
                    last_cursor: world,
                },
                next,
            )
        }
        InteractionMode::VertexDrag { index } => {
            let target = if scene.snap.snap_to_grid {
                snap::snap_to_grid(world.x, world.y, scene.snap.grid_size)
            } else {
                (world.x, world.y)
            };
            let room = mutations::move_vertex(&scene.room, *index, target.0, target.1);
            let mut next = scene.clone();
            next.room = room;
            let next = next.prune_orphaned_openings();
            (InteractionMode::VertexDrag { index: *index }, next)
        }
        InteractionMode::Rotate { id, pivot } => {
            let delta = world - *pivot;
            let raw_deg = delta.y.atan2(delta.x).to_degrees() + 90.0;
            // Shift quantizes to 15 degree steps; otherwise 1 degree.
            let step = if shift_held { 15.0 } else { 1.0 };
            let target_deg = (raw_deg / step).round() * step;
            let Some(f) = scene.find_furniture(id) else {
                return (mode.clone(), scene.clone());
            };
            let next = mutations::rotate(scene, id, target_deg - f.rotation);
            (
                InteractionMode::Rotate {
                    id: id.clone(),
                    pivot: *pivot,
                },
                next,
            )
        }
        InteractionMode::Resize {
            id,
            original_rect,
            handle,
            lock_aspect,
        } => {
            let next = resize_from_handle(scene, id, *original_rect, *handle, world, *lock_aspect);
            (
                InteractionMode::Resize {
                    id: id.clone(),
                    handle: *handle,
                    original_rect: *original_rect,
                    lock_aspect: *lock_aspect,
                },
                next,
            )
        }
        InteractionMode::Measure { start, .. } => (
            InteractionMode::Measure {
                start: *start,
                end: world,
            },
            scene.clone(),
        ),
        InteractionMode::Idle => (InteractionMode::Idle, scene.clone()),
    }
}

/// Grows/shrinks the item from one to two axes depending which of the 8
/// handles is being dragged; corner handles affect both axes, edge
/// handles only one.
fn resize_from_handle(
    scene: &Scene,
    id: &str,
    original: roomcraft_engine::geometry::Rect,
    handle: HandleIndex,
    world: Pt,
    lock_aspect: bool,
) -> Scene {
    if scene.find_furniture(id).is_none() {
        return scene.clone();
    }

    // Handle order: 0 TL, 1 TM, 2 TR, 3 MR, 4 BR, 5 BM, 6 BL, 7 ML.
    let affects_left = matches!(handle, 0 | 6 | 7);
    let affects_right = matches!(handle, 2 | 3 | 4);
    let affects_top = matches!(handle, 0 | 1 | 2);
    let affects_bottom = matches!(handle, 4 | 5 | 6);

    let mut min = original.min;
    let mut max = original.max;
    if affects_left {
        min.x = world.x;
    }
    if affects_right {
        max.x = world.x;
    }
    if affects_top {
        min.y = world.y;
    }
    if affects_bottom {
        max.y = world.y;
    }

    let mut w = (max.x - min.x).abs();
    let mut h = (max.y - min.y).abs();
    if lock_aspect && original.height() > 0.0 {
        let aspect = original.width() / original.height();
        if affects_left || affects_right {
            h = w / aspect;
        } else {
            w = h * aspect;
        }
    }

    let center = Pt::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let resized = mutations::resize(scene, id, w, h);
    mutations::move_item(&resized, id, center.x, center.y)
}

/// Finalizes a pointer-up: rubber-band selects every item whose center
/// lies inside, everything else just clears back to idle.
pub fn on_pointer_up(mode: &InteractionMode, scene: &Scene) -> (InteractionMode, Vec<String>) {
    match mode {
        InteractionMode::RubberBand { start, current } => {
            let selected: Vec<String> = scene
                .furniture
                .iter()
                .filter(|f| {
                    let c = f.center();
                    let (min_x, max_x) = (start.x.min(current.x), start.x.max(current.x));
                    let (min_y, max_y) = (start.y.min(current.y), start.y.max(current.y));
                    c.x >= min_x && c.x <= max_x && c.y >= min_y && c.y <= max_y
                })
                .map(|f| f.id.clone())
                .collect();
            (InteractionMode::Idle, selected)
        }
        _ => (InteractionMode::Idle, Vec::new()),
    }
}

/// True if the mode mutates the scene and thus needs a history push on
/// pointer-up (as opposed to `Pan`/`RubberBand`/`Measure`, which are
/// viewport- or selection-only).
pub fn is_mutating(mode: &InteractionMode) -> bool {
    matches!(
        mode,
        InteractionMode::DragSingle { .. }
            | InteractionMode::DragMulti { .. }
            | InteractionMode::VertexDrag { .. }
            | InteractionMode::Rotate { .. }
            | InteractionMode::Resize { .. }
    )
}

/// Wheel zoom toward the cursor: adjusts `zoom` and `pan` together so the
/// world point under the cursor stays fixed on screen.
pub fn zoom_toward_cursor(
    cursor_screen: Pt,
    pan: Pt,
    zoom: f64,
    px_per_ft: f64,
    factor: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> (f64, Pt) {
    let world_before = hit_test::screen_to_world(cursor_screen, pan, px_per_ft, zoom);
    let new_zoom = (zoom * factor).clamp(min_zoom, max_zoom);
    let screen_after = hit_test::world_to_screen(world_before, pan, px_per_ft, new_zoom);
    let new_pan = pan + (cursor_screen - screen_after);
    (new_zoom, new_pan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcraft_engine::scene::{Room, RoomVertex, Shape};

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

    fn chair(id: &str, x: f64, y: f64) -> roomcraft_engine::scene::Furniture {
        roomcraft_engine::scene::Furniture {
            id: id.into(),
            product_id: "p".into(),
            x,
            y,
            w: 2.0,
            h: 2.0,
            rotation: 0.0,
            locked: false,
            color: "#000".into(),
            shape: Shape::Rect,
            label: "Chair".into(),
            category: "chair".into(),
        }
    }

    #[test]
    fn s5_rubber_band_selects_only_items_inside_rect() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(chair("a", 2.0, 2.0));
        scene.furniture.push(chair("b", 5.0, 5.0));
        scene.furniture.push(chair("c", 18.0, 18.0));

        let mode = InteractionMode::RubberBand {
            start: Pt::new(0.0, 0.0),
            current: Pt::new(10.0, 10.0),
        };
        let (_, selected) = on_pointer_up(&mode, &scene);
        let mut selected = selected;
        selected.sort();
        assert_eq!(selected, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn zoom_toward_cursor_keeps_world_point_fixed_on_screen() {
        let cursor = Pt::new(400.0, 300.0);
        let pan = Pt::new(50.0, 20.0);
        let world_before = hit_test::screen_to_world(cursor, pan, 50.0, 1.0);

        let (new_zoom, new_pan) = zoom_toward_cursor(cursor, pan, 1.0, 50.0, 1.2, 0.4, 3.0);
        let world_after = hit_test::screen_to_world(cursor, new_pan, 50.0, new_zoom);

        assert!((world_after - world_before).length() < 1e-9);
    }

    #[test]
    fn property_7_zoom_correctness_holds_across_repeated_zoom_in() {
        let cursor = Pt::new(250.0, 180.0);
        let mut pan = Pt::new(0.0, 0.0);
        let mut zoom = 1.0;
        let world_before = hit_test::screen_to_world(cursor, pan, 50.0, zoom);

        for _ in 0..5 {
            let (z, p) = zoom_toward_cursor(cursor, pan, zoom, 50.0, 1.04, 0.4, 3.0);
            zoom = z;
            pan = p;
            let world_after = hit_test::screen_to_world(cursor, pan, 50.0, zoom);
            assert!((world_after - world_before).length() < 1e-6);
        }
    }

    #[test]
    fn pointer_down_on_locked_item_selects_but_does_not_drag() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        let mut item = chair("a", 5.0, 5.0);
        item.locked = true;
        scene.furniture.push(item);
        let hash = SpatialHash::new(&scene.furniture);

        let ctx = DispatchContext {
            scene: &scene,
            spatial_hash: &hash,
            tool: Tool::Select,
            selection: &[],
            space_held: false,
            shift_held: false,
            fullscreen: false,
        };
        let outcome = on_pointer_down(&ctx, MouseButton::Left, Pt::new(5.0, 5.0), 1.0, 50.0);
        assert_eq!(outcome.mode, InteractionMode::Idle);
        assert_eq!(outcome.selection, vec!["a".to_string()]);
    }

    #[test]
    fn rotate_without_shift_snaps_to_one_degree_steps() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(chair("a", 5.0, 5.0));
        let mode = InteractionMode::Rotate {
            id: "a".to_string(),
            pivot: Pt::new(5.0, 5.0),
        };
        // Slightly off a whole degree; cursor above-right of the pivot.
        let world = Pt::new(5.0 + 10.0, 5.0 - 5.7735);
        let mut pan = Pt::ZERO;
        let (_, next) = on_pointer_move(&mode, &scene, world, &mut pan, 0.25, false);
        let rotation = next.find_furniture("a").unwrap().rotation;
        assert!((rotation - rotation.round()).abs() < 1e-9);
    }

    #[test]
    fn rotate_with_shift_snaps_to_fifteen_degree_steps() {
        let mut scene = Scene::new(rect_room(20.0, 20.0));
        scene.furniture.push(chair("a", 5.0, 5.0));
        let mode = InteractionMode::Rotate {
            id: "a".to_string(),
            pivot: Pt::new(5.0, 5.0),
        };
        let world = Pt::new(5.0 + 10.0, 5.0 - 5.7735);
        let mut pan = Pt::ZERO;
        let (_, next) = on_pointer_move(&mode, &scene, world, &mut pan, 0.25, true);
        let rotation = next.find_furniture("a").unwrap().rotation;
        assert_eq!(rotation % 15.0, 0.0);
    }
}
