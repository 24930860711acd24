pub mod cursor_sync;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use cursor_sync::{
    DEFAULT_CURSOR_THRESHOLD_PX, DEFAULT_OVERLAY_TICK, SharedCursor, SharedCursorState,
    ThresholdGate,
};
pub use selection::{SelectionController, TimeSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Selecting,
}

/// Last pointer position known to one viewport, in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PointerState {
    pub inside: bool,
    pub x: f64,
    pub y: f64,
}

impl PointerState {
    pub fn on_move(&mut self, x: f64, y: f64, inside: bool) {
        self.x = x;
        self.y = y;
        self.inside = inside;
    }

    pub fn on_leave(&mut self) {
        self.inside = false;
    }
}

/// What the cursor layer should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CrosshairState {
    /// Horizontal time line, from the shared cursor.
    pub cursor_y: Option<f64>,
    /// Vertical line at the local pointer.
    pub crosshair_x: Option<f64>,
}

impl CrosshairState {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.cursor_y.is_none() && self.crosshair_x.is_none()
    }
}
