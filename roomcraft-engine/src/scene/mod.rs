//! The scene data model: rooms, openings, furniture, and the viewport and
//! snap settings that travel with a document.
//!
//! Every mutation in [`mutations`] takes a `&Scene` and returns a new
//! `Scene` by value. Structural sharing is deliberately not attempted here
//! (unlike the host project's `Rc`-shared layout tree) because scenes in
//! this domain are small (spec.md's own perf target is "<500 items"); a
//! plain clone-on-write keeps the mutation code trivial to read.

pub mod clearance;
pub mod mutations;
pub mod traffic;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Pt, Segment};
use crate::ids::{self, Id};

/// Furniture draw shape, independent of category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rect,
    Round,
    Oval,
    L,
    Bed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingDir {
    Left,
    Right,
}

/// A single vertex of the room polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomVertex {
    pub x: f64,
    pub y: f64,
}

impl RoomVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_pt(&self) -> Pt {
        Pt::new(self.x, self.y)
    }

    pub fn from_pt(p: Pt) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// The closed polygonal footprint of the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub vertices: Vec<RoomVertex>,
    /// Rendering-only; has no effect on geometry or collision.
    pub wall_thickness: f64,
}

impl Room {
    pub fn points(&self) -> Vec<Pt> {
        self.vertices.iter().map(RoomVertex::as_pt).collect()
    }

    pub fn segments(&self) -> Vec<Segment> {
        geometry::segments_of(&self.points())
    }

    pub fn is_simple(&self) -> bool {
        geometry::is_simple_polygon(&self.points())
    }

    pub fn area(&self) -> f64 {
        geometry::polygon_area(&self.points())
    }
}

/// A door or window opening hosted on a wall segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: Id,
    pub wall_id: Id,
    pub position: f64,
    pub width: f64,
    pub swing_angle: f64,
    pub swing_dir: SwingDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: Id,
    pub wall_id: Id,
    pub position: f64,
    pub width: f64,
}

pub const DEFAULT_DOOR_WIDTH: f64 = 2.8;
pub const DEFAULT_WINDOW_WIDTH: f64 = 3.0;
/// Openings must stay clear of the wall ends by this much on either side.
pub const OPENING_EDGE_MARGIN: f64 = 0.25;
pub const MIN_FURNITURE_SIZE: f64 = 0.5;

/// A placed furniture item. `(x, y)` is the item's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: Id,
    pub product_id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Degrees, purely visual — collision uses the unrotated rect.
    pub rotation: f64,
    pub locked: bool,
    pub color: String,
    pub shape: Shape,
    pub label: String,
    pub category: String,
}

impl Furniture {
    pub fn center(&self) -> Pt {
        Pt::new(self.x, self.y)
    }

    pub fn rect(&self) -> geometry::Rect {
        geometry::Rect::from_center_size(self.center(), self.w, self.h)
    }
}

/// Snap and grid preferences; part of the scene so they travel with a
/// saved document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    pub grid_size: f64,
    pub snap_to_grid: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid_size: 1.0,
            snap_to_grid: true,
        }
    }
}

/// Viewport state: screen transform only, never part of history snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

pub const MIN_ZOOM: f64 = 0.4;
pub const MAX_ZOOM: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayToggles {
    pub show_grid: bool,
    pub show_dimensions: bool,
    pub show_clearances: bool,
    pub show_traffic_flow: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_dimensions: true,
            show_clearances: false,
            show_traffic_flow: false,
        }
    }
}

/// The engine's root value. Every edit operation in [`mutations`] takes a
/// scene by reference and returns a new one; there is no in-place
/// mutation anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub room: Room,
    /// Back-to-front paint order; index 0 is drawn first (furthest back).
    pub furniture: Vec<Furniture>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub viewport: Viewport,
    pub snap: SnapSettings,
    pub overlays: OverlayToggles,
}

impl Scene {
    /// An empty rectangular room with no furniture or openings.
    pub fn new(room: Room) -> Self {
        Self {
            room,
            furniture: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            viewport: Viewport::default(),
            snap: SnapSettings::default(),
            overlays: OverlayToggles::default(),
        }
    }

    pub fn wall_segments(&self) -> Vec<Segment> {
        self.room.segments()
    }

    pub fn find_furniture(&self, id: &str) -> Option<&Furniture> {
        self.furniture.iter().find(|f| f.id == id)
    }

    pub fn find_furniture_index(&self, id: &str) -> Option<usize> {
        self.furniture.iter().position(|f| f.id == id)
    }

    /// A structural copy of the edit-relevant state, used for undo
    /// snapshots. Viewport is intentionally excluded (spec §4.3).
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            room: self.room.clone(),
            furniture: self.furniture.clone(),
            doors: self.doors.clone(),
            windows: self.windows.clone(),
        }
    }

    /// Restores edit-relevant state from a snapshot, keeping this scene's
    /// viewport, snap settings and overlay toggles untouched.
    pub fn restore(&self, snap: &Snapshot) -> Scene {
        Scene {
            room: snap.room.clone(),
            furniture: snap.furniture.clone(),
            doors: snap.doors.clone(),
            windows: snap.windows.clone(),
            viewport: self.viewport,
            snap: self.snap,
            overlays: self.overlays,
        }
    }

    /// Re-establishes invariant 1 (spec §3): drops any door/window whose
    /// host wall no longer exists. Called after every room-shape edit.
    pub fn prune_orphaned_openings(&self) -> Scene {
        let wall_ids: std::collections::HashSet<&str> =
            self.wall_segments().iter().map(|s| s.id.as_str()).collect();

        let mut next = self.clone();
        next.doors.retain(|d| wall_ids.contains(d.wall_id.as_str()));
        next.windows
            .retain(|w| wall_ids.contains(w.wall_id.as_str()));
        next
    }

    /// Checks the structural invariants from spec §3. Used by the
    /// deserializer (which must refuse, not repair) and by history
    /// (which must refuse to advance on a non-simple polygon).
    pub fn check_invariants(&self) -> Result<(), crate::error::SceneError> {
        use crate::error::SceneError;

        if self.room.vertices.len() < 3 {
            return Err(SceneError::InvalidRoom("fewer than 3 vertices".into()));
        }
        if !self.room.is_simple() {
            return Err(SceneError::NonSimplePolygon);
        }

        let segments = self.wall_segments();
        let wall_lengths: std::collections::HashMap<&str, f64> =
            segments.iter().map(|s| (s.id.as_str(), s.length)).collect();
        // Spec §3 invariant 2: a door/window width must fit within its wall
        // length minus a 0.25 ft margin on each end.
        let fits_wall = |wall_id: &str, width: f64| {
            wall_lengths
                .get(wall_id)
                .map_or(false, |len| width <= len - 2.0 * OPENING_EDGE_MARGIN)
        };

        for d in &self.doors {
            if !wall_lengths.contains_key(d.wall_id.as_str()) {
                return Err(SceneError::OrphanedOpening(d.id.clone()));
            }
            if !(0.0..=1.0).contains(&d.position) {
                return Err(SceneError::InvalidOpeningPosition(d.id.clone()));
            }
            if !fits_wall(&d.wall_id, d.width) {
                return Err(SceneError::OpeningTooWide(d.id.clone()));
            }
        }
        for w in &self.windows {
            if !wall_lengths.contains_key(w.wall_id.as_str()) {
                return Err(SceneError::OrphanedOpening(w.id.clone()));
            }
            if !(0.0..=1.0).contains(&w.position) {
                return Err(SceneError::InvalidOpeningPosition(w.id.clone()));
            }
            if !fits_wall(&w.wall_id, w.width) {
                return Err(SceneError::OpeningTooWide(w.id.clone()));
            }
        }

        for f in &self.furniture {
            if f.w < MIN_FURNITURE_SIZE || f.h < MIN_FURNITURE_SIZE {
                return Err(SceneError::FurnitureTooSmall(f.id.clone()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for f in &self.furniture {
            if !seen.insert(f.id.as_str()) {
                return Err(SceneError::DuplicateId(f.id.clone()));
            }
        }

        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.viewport.zoom) {
            return Err(SceneError::ZoomOutOfRange(self.viewport.zoom));
        }

        Ok(())
    }
}

/// An immutable copy of the editable portion of the scene, pushed onto the
/// undo stack by [`crate::history::History`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub room: Room,
    pub furniture: Vec<Furniture>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
}

/// Serializes every entity except derived caches (wall segments are never
/// stored, so this is just `serde_json::to_string`, but kept as a named
/// entry point per spec §6).
pub fn serialize(scene: &Scene) -> String {
    serde_json::to_string(scene).expect("Scene serialization is infallible")
}

/// Parses and validates a scene document. Rejects (rather than repairs)
/// any document that fails the spec §3 invariants, per spec §7.
pub fn deserialize(data: &str) -> Result<Scene, crate::error::SceneError> {
    let scene: Scene =
        serde_json::from_str(data).map_err(|e| crate::error::SceneError::Parse(e.to_string()))?;
    scene.check_invariants()?;
    Ok(scene)
}

pub fn fresh_furniture_id() -> Id {
    ids::fresh("furn")
}

pub fn fresh_door_id() -> Id {
    ids::fresh("door")
}

pub fn fresh_window_id() -> Id {
    ids::fresh("win")
}
