//! Ambient editor configuration: rendering scale, snap tolerances and
//! history limits, all collected in one place per spec §9 ("tunables
//! should live beside the code that reads them, not scattered as magic
//! numbers").
//!
//! Grounded on the host project's config module: a plain struct with a
//! `Default` impl, loadable from a small JSON document via `serde` so a
//! host app can ship a `roomcraft.json` without the engine knowing
//! anything about file paths.

use serde::{Deserialize, Serialize};

use crate::history;
use crate::scene::{MAX_ZOOM, MIN_ZOOM};

/// Screen pixels per foot at zoom 1.0. Purely a rendering concern; the
/// engine's geometry kernel never uses it.
pub const DEFAULT_PX_PER_FT: f64 = 50.0;

/// Pointer hit tolerance for smart snapping, in screen pixels, before
/// conversion to world units via [`crate::snap::screen_to_world_threshold`].
pub const DEFAULT_SNAP_PX: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub px_per_ft: f64,
    pub snap_px: f64,
    pub grid_size: f64,
    pub history_capacity: usize,
    pub nudge_debounce_ms: u64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            px_per_ft: DEFAULT_PX_PER_FT,
            snap_px: DEFAULT_SNAP_PX,
            grid_size: 1.0,
            history_capacity: history::CAPACITY,
            nudge_debounce_ms: history::NUDGE_DEBOUNCE.as_millis() as u64,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Config {
    /// Parses a JSON document, falling back to defaults for any field
    /// left unset.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn nudge_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.nudge_debounce_ms)
    }
}
