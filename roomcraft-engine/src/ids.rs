//! Engine-scoped opaque ids.
//!
//! Ids are never reused (spec §3 invariant 5); `fresh` mints a new one from
//! a process-local random source rather than a counter, so ids stay stable
//! across serialize/deserialize round-trips without the caller needing to
//! thread a counter through.

/// An opaque, engine-scoped entity id.
pub type Id = String;

/// Mints a fresh id with the given entity-kind prefix (`"furn"`, `"door"`,
/// `"win"`, ...).
pub fn fresh(prefix: &str) -> Id {
    format!("{prefix}-{:016x}", fastrand::u64(..))
}
