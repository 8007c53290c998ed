//! Converts a pre-generated layout from an external layout engine into an
//! editor [`Scene`] (spec.md §6, `createEditorStateFromAuto`).
//!
//! This is the embedding boundary: a host hands the engine a room outline
//! and a list of placed items it computed by whatever means (a separate
//! auto-layout solver, a template library, a saved design), and the engine
//! turns that into a scene it can then edit interactively. Mirrors
//! `niri-ipc`'s role of taking an external, host-shaped request and
//! producing the compositor's own internal state rather than assuming the
//! caller already speaks the engine's types.

use serde::{Deserialize, Serialize};

use crate::furniture_library;
use crate::scene::{Room, RoomVertex, Scene};

/// The room outline and metadata an external layout engine produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLayout {
    pub vertices: Vec<(f64, f64)>,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
}

fn default_wall_thickness() -> f64 {
    0.5
}

/// One item an external layout engine placed. `product_id` is looked up in
/// [`furniture_library::CATALOG`]; items whose id is not in the catalog are
/// dropped rather than guessed at (same "refuse, don't repair" posture as
/// [`crate::scene::deserialize`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoItem {
    pub product_id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Room type and visual style the host's auto-layout ran under. The engine
/// does not branch on these internally (it has no style-aware rendering),
/// but they are recorded in the trace so a host-side layout defect can be
/// traced back to the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMetadata {
    pub room_type: String,
    pub style_name: String,
}

/// Builds a [`Scene`] from a host-supplied layout and item placement list.
///
/// Unknown product ids are skipped with a `tracing::warn!` rather than
/// failing the whole conversion: a partially-furnished scene the user can
/// keep editing is more useful than none at all, and this is the one
/// conversion boundary where the input is assumed untrusted (unlike
/// [`crate::scene::deserialize`], which refuses outright, because a
/// malformed *saved document* is a bug while a malformed *auto-layout item*
/// is an expected, recoverable mismatch between two independently evolving
/// catalogs).
pub fn create_editor_state_from_auto(
    layout: AutoLayout,
    items: Vec<AutoItem>,
    meta: RoomMetadata,
) -> Scene {
    tracing::info!(
        room_type = %meta.room_type,
        style = %meta.style_name,
        item_count = items.len(),
        "building editor scene from auto layout"
    );

    let room = Room {
        vertices: layout
            .vertices
            .iter()
            .map(|&(x, y)| RoomVertex::new(x, y))
            .collect(),
        wall_thickness: layout.wall_thickness,
    };

    let mut scene = Scene::new(room);

    for item in items {
        match furniture_library::find_product(&item.product_id) {
            Some(product) => {
                let mut furniture = furniture_library::place(product, item.x, item.y);
                furniture.rotation = item.rotation;
                scene.furniture.push(furniture);
            }
            None => {
                tracing::warn!(product_id = %item.product_id, "unknown product in auto layout, skipping");
            }
        }
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_layout() -> AutoLayout {
        AutoLayout {
            vertices: vec![(0.0, 0.0), (12.0, 0.0), (12.0, 10.0), (0.0, 10.0)],
            wall_thickness: 0.5,
        }
    }

    #[test]
    fn known_products_are_placed_with_given_position_and_rotation() {
        let product_id = furniture_library::CATALOG[0].id.to_string();
        let scene = create_editor_state_from_auto(
            square_layout(),
            vec![AutoItem {
                product_id: product_id.clone(),
                x: 3.0,
                y: 4.0,
                rotation: 90.0,
            }],
            RoomMetadata {
                room_type: "bedroom".into(),
                style_name: "modern".into(),
            },
        );

        assert_eq!(scene.furniture.len(), 1);
        let f = &scene.furniture[0];
        assert_eq!(f.product_id, product_id);
        assert_eq!((f.x, f.y), (3.0, 4.0));
        assert_eq!(f.rotation, 90.0);
    }

    #[test]
    fn unknown_products_are_dropped_not_fabricated() {
        let scene = create_editor_state_from_auto(
            square_layout(),
            vec![AutoItem {
                product_id: "does-not-exist".into(),
                x: 0.0,
                y: 0.0,
                rotation: 0.0,
            }],
            RoomMetadata {
                room_type: "living-room".into(),
                style_name: "minimal".into(),
            },
        );
        assert!(scene.furniture.is_empty());
    }

    #[test]
    fn resulting_scene_satisfies_invariants() {
        let product_id = furniture_library::CATALOG[0].id.to_string();
        let scene = create_editor_state_from_auto(
            square_layout(),
            vec![AutoItem {
                product_id,
                x: 2.0,
                y: 2.0,
                rotation: 0.0,
            }],
            RoomMetadata {
                room_type: "office".into(),
                style_name: "industrial".into(),
            },
        );
        scene.check_invariants().unwrap();
    }
}
