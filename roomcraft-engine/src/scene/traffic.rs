//! Advisory traffic-path polylines from each door into the room, routed
//! around furniture with a grid-based shortest-path search.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Pt, Segment};
use crate::ids::Id;

use super::{Door, Furniture, Room};

/// Cell size for the routing grid, in feet.
pub const CELL_SIZE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPath {
    pub door_id: Id,
    pub points: Vec<Pt>,
}

type Cell = (i32, i32);

fn cell_of(p: Pt, origin: Pt) -> Cell {
    (
        ((p.x - origin.x) / CELL_SIZE).round() as i32,
        ((p.y - origin.y) / CELL_SIZE).round() as i32,
    )
}

fn cell_center(c: Cell, origin: Pt) -> Pt {
    Pt::new(
        origin.x + c.0 as f64 * CELL_SIZE,
        origin.y + c.1 as f64 * CELL_SIZE,
    )
}

fn blocked(p: Pt, room_points: &[Pt], furniture: &[Furniture]) -> bool {
    if !geometry::point_in_polygon(p.x, p.y, room_points) {
        return true;
    }
    furniture.iter().any(|f| f.rect().contains(p))
}

/// Polygon centroid approximated as the mean of vertices; good enough as
/// an advisory routing target, not a true area centroid.
fn vertex_centroid(points: &[Pt]) -> Pt {
    let sum = points.iter().fold(Pt::ZERO, |acc, &p| acc + p);
    sum / points.len().max(1) as f64
}

/// `BinaryHeap` is a max-heap; wrapping the cost in `Reverse<NotNan<f64>>`
/// turns it into the min-heap A* wants, the same `NotNan`-for-ordering
/// idiom the host project uses wherever an `f64` needs to sit in an
/// ordered collection.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Node {
    cost: Reverse<NotNan<f64>>,
    cell: Cell,
}

fn cost(v: f64) -> Reverse<NotNan<f64>> {
    Reverse(NotNan::new(v).unwrap_or(NotNan::new(f64::MAX).unwrap()))
}

/// A* over the routing grid from `start` to `goal`, treating cells inside
/// furniture or outside the room as impassable. Returns `None` if no path
/// exists (e.g. the door is boxed in).
fn shortest_path(
    start: Pt,
    goal: Pt,
    room_points: &[Pt],
    furniture: &[Furniture],
) -> Option<Vec<Pt>> {
    let origin = start;
    let start_cell = (0, 0);
    let goal_cell = cell_of(goal, origin);

    let heuristic = |c: Cell| {
        (((c.0 - goal_cell.0) as f64).powi(2) + ((c.1 - goal_cell.1) as f64).powi(2)).sqrt()
    };

    let mut open = BinaryHeap::new();
    open.push(Node {
        cost: cost(heuristic(start_cell)),
        cell: start_cell,
    });
    let mut g_score: HashMap<Cell, f64> = HashMap::from([(start_cell, 0.0)]);
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();

    const MAX_EXPANSIONS: usize = 20_000;
    let mut expansions = 0;

    while let Some(Node { cell, .. }) = open.pop() {
        if cell == goal_cell {
            let mut path = vec![cell];
            let mut cur = cell;
            while let Some(&prev) = came_from.get(&cur) {
                path.push(prev);
                cur = prev;
            }
            path.reverse();
            return Some(path.into_iter().map(|c| cell_center(c, origin)).collect());
        }

        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return None;
        }

        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (cell.0 + dx, cell.1 + dy);
            let p = cell_center(next, origin);
            if blocked(p, room_points, furniture) {
                continue;
            }
            let tentative = g_score.get(&cell).copied().unwrap_or(f64::MAX) + 1.0;
            if tentative < g_score.get(&next).copied().unwrap_or(f64::MAX) {
                came_from.insert(next, cell);
                g_score.insert(next, tentative);
                open.push(Node {
                    cost: cost(tentative + heuristic(next)),
                    cell: next,
                });
            }
        }
    }
    None
}

fn door_world_position(door: &Door, segments: &[Segment]) -> Option<Pt> {
    let seg = segments.iter().find(|s| s.id == door.wall_id)?;
    Some(geometry::point_at(seg, door.position))
}

pub fn compute_traffic_paths(
    furniture: &[Furniture],
    doors: &[Door],
    room: &Room,
) -> Vec<TrafficPath> {
    let room_points = room.points();
    let segments = room.segments();
    let goal = vertex_centroid(&room_points);

    doors
        .iter()
        .filter_map(|d| {
            let start = door_world_position(d, &segments)?;
            let points = shortest_path(start, goal, &room_points, furniture)?;
            Some(TrafficPath {
                door_id: d.id.clone(),
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{RoomVertex, SwingDir};

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

    #[test]
    fn routes_from_door_toward_room_center_with_no_obstacles() {
        let room = rect_room(14.0, 12.0);
        let wall_id = room.segments()[0].id.clone();
        let door = Door {
            id: "d1".into(),
            wall_id,
            position: 0.5,
            width: 2.8,
            swing_angle: 90.0,
            swing_dir: SwingDir::Right,
        };
        let paths = compute_traffic_paths(&[], &[door], &room);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].points.len() >= 2);
    }
}
