//! Hand-rolled error type for scene validation and parsing failures.
//!
//! Kept dependency-free (no `thiserror`) to match the host project's own
//! error types, which implement `Display`/`Error` by hand.

use std::fmt;

use crate::ids::Id;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    InvalidRoom(String),
    NonSimplePolygon,
    OrphanedOpening(Id),
    InvalidOpeningPosition(Id),
    OpeningTooWide(Id),
    FurnitureTooSmall(Id),
    DuplicateId(Id),
    ZoomOutOfRange(f64),
    Parse(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidRoom(reason) => write!(f, "invalid room: {reason}"),
            SceneError::NonSimplePolygon => {
                write!(f, "room polygon is self-intersecting")
            }
            SceneError::OrphanedOpening(id) => {
                write!(f, "opening {id} references a wall that does not exist")
            }
            SceneError::InvalidOpeningPosition(id) => {
                write!(f, "opening {id} has a position outside [0, 1]")
            }
            SceneError::OpeningTooWide(id) => {
                write!(f, "opening {id} is wider than its wall allows")
            }
            SceneError::FurnitureTooSmall(id) => {
                write!(f, "furniture {id} is smaller than the minimum footprint")
            }
            SceneError::DuplicateId(id) => write!(f, "duplicate furniture id {id}"),
            SceneError::ZoomOutOfRange(zoom) => write!(f, "zoom {zoom} is out of range"),
            SceneError::Parse(reason) => write!(f, "failed to parse scene: {reason}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_offending_id() {
        let err = SceneError::OrphanedOpening("door-1".to_string());
        assert!(err.to_string().contains("door-1"));
    }
}
