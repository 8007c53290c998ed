//! Bounded undo/redo stack with debounced coalescing of arrow-key nudges.
//!
//! Grounded on the host project's animation clock: an overridable
//! monotonic time source makes the 400 ms nudge debounce deterministically
//! testable without actually sleeping.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::scene::Snapshot;

pub const CAPACITY: usize = 60;
pub const NUDGE_DEBOUNCE: Duration = Duration::from_millis(400);

/// Clock that can have its time value overridden, for deterministic tests.
/// Can be cloned to share the same clock.
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    time_override: Rc<Cell<Option<Duration>>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            time_override: Rc::new(Cell::new(None)),
        }
    }
}

impl Clock {
    pub fn with_override(time: Duration) -> Self {
        let clock = Self::default();
        clock.set_time_override(Some(time));
        clock
    }

    pub fn set_time_override(&self, time: Option<Duration>) {
        self.time_override.set(time);
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.time_override.get().unwrap_or_else(|| self.start.elapsed())
    }
}

/// Bounded undo/redo stack over [`Snapshot`]s.
///
/// `entries[cursor]` is always the currently-live snapshot. `push`
/// truncates everything past the cursor (discarding any redo line),
/// appends, and drops the oldest entry once `entries.len()` exceeds
/// [`CAPACITY`].
pub struct History {
    clock: Clock,
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
    nudge_debounce: Duration,
    pending_nudge_deadline: Option<Duration>,
}

impl History {
    pub fn new(clock: Clock, initial: Snapshot) -> Self {
        Self::with_capacity(clock, initial, CAPACITY, NUDGE_DEBOUNCE)
    }

    /// As [`History::new`], but with the capacity and nudge-debounce
    /// window taken from [`crate::config::Config`] rather than the
    /// built-in defaults.
    pub fn with_capacity(
        clock: Clock,
        initial: Snapshot,
        capacity: usize,
        nudge_debounce: Duration,
    ) -> Self {
        Self {
            clock,
            entries: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
            nudge_debounce,
            pending_nudge_deadline: None,
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Pushes a new snapshot, discarding the redo line. A no-op if the
    /// snapshot is identical to the current one (a drag or nudge that
    /// changed nothing shouldn't grow history).
    pub fn push(&mut self, snapshot: Snapshot) {
        if &snapshot == self.current() {
            return;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        self.pending_nudge_deadline = None;
    }

    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Records that a nudge happened now; (re)starts the 400 ms debounce
    /// window. Call this on every coalesced arrow-key move, without
    /// pushing the intermediate scene.
    pub fn note_nudge(&mut self) {
        self.pending_nudge_deadline = Some(self.clock.now() + self.nudge_debounce);
    }

    pub fn has_pending_nudge(&self) -> bool {
        self.pending_nudge_deadline.is_some()
    }

    /// True once the debounce window has elapsed and a commit is due.
    pub fn nudge_commit_due(&self) -> bool {
        self.pending_nudge_deadline
            .is_some_and(|deadline| self.clock.now() >= deadline)
    }

    /// Commits the debounced nudge run as a single snapshot.
    pub fn commit_nudge(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
        self.pending_nudge_deadline = None;
    }

    /// Commits any pending nudge immediately, regardless of the debounce
    /// window. Call this on scene teardown so an in-flight nudge run
    /// isn't silently lost (spec §5 "Suspension").
    pub fn flush_pending_nudge(&mut self, snapshot: Snapshot) {
        if self.pending_nudge_deadline.is_some() {
            self.commit_nudge(snapshot);
        }
    }
}
