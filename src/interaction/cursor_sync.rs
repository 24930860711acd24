use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Period at which hosts are expected to call the overlay tick.
pub const DEFAULT_OVERLAY_TICK: Duration = Duration::from_millis(16);

/// Minimum change, in pixels, before cursor and crosshair events fire again.
pub const DEFAULT_CURSOR_THRESHOLD_PX: f64 = 1.0;

/// Cursor time shared by a group of viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCursorState {
    pub cursor_time: DateTime<Utc>,
    pub has_cursor: bool,
}

impl Default for SharedCursorState {
    fn default() -> Self {
        Self {
            cursor_time: DateTime::<Utc>::UNIX_EPOCH,
            has_cursor: false,
        }
    }
}

/// Cloneable handle to one externally owned [`SharedCursorState`].
///
/// Every viewport of a group holds a clone. Writers store synchronously and
/// readers poll once per overlay tick, so viewports never notify each other.
/// Last write wins.
#[derive(Debug, Clone, Default)]
pub struct SharedCursor {
    state: Rc<Cell<SharedCursorState>>,
}

impl SharedCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> SharedCursorState {
        self.state.get()
    }

    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let state = self.state.get();
        state.has_cursor.then_some(state.cursor_time)
    }

    /// Publishes `time` and returns the state now held by the group.
    pub fn set_time(&self, time: DateTime<Utc>) -> SharedCursorState {
        let state = SharedCursorState {
            cursor_time: time,
            has_cursor: true,
        };
        self.state.set(state);
        state
    }

    /// Hides the cursor while keeping the last time for inspection.
    pub fn clear(&self) {
        let mut state = self.state.get();
        state.has_cursor = false;
        self.state.set(state);
    }

    /// Hides the cursor only while the group still holds `written`.
    ///
    /// Returns `false` when another writer replaced it in the meantime.
    pub fn clear_if_unchanged(&self, written: SharedCursorState) -> bool {
        if self.state.get() != written {
            return false;
        }
        self.clear();
        true
    }

    /// Whether both handles point at the same shared state.
    #[must_use]
    pub fn same_group(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Suppresses repeated notifications for sub-threshold jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdGate {
    threshold: f64,
    last: Option<f64>,
}

impl ThresholdGate {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
            last: None,
        }
    }

    /// Returns `true` and records `value` when it moved past the threshold.
    pub fn should_emit(&mut self, value: f64) -> bool {
        let emit = match self.last {
            None => true,
            Some(last) => (value - last).abs() > self.threshold,
        };
        if emit {
            self.last = Some(value);
        }
        emit
    }

    /// Forgets the last value; returns whether one was recorded.
    pub fn reset(&mut self) -> bool {
        self.last.take().is_some()
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

impl Default for ThresholdGate {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_THRESHOLD_PX)
    }
}
