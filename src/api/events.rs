use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RenderState;

/// Notifications a viewport publishes to its host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaterfallEvent {
    /// A drag selection finished with a non-empty time range.
    SelectionFinalized {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    CursorTimeChanged {
        time: DateTime<Utc>,
        screen_y: f64,
    },
    CursorCleared,
    CrosshairXChanged {
        x: f64,
    },
    /// A non-clean render pass completed.
    Rendered {
        state: RenderState,
        series_redrawn: usize,
    },
}

/// Receiver of [`WaterfallEvent`]s.
///
/// Any `FnMut(&WaterfallEvent)` closure is a listener.
pub trait WaterfallListener {
    fn on_event(&mut self, event: &WaterfallEvent);
}

impl<F> WaterfallListener for F
where
    F: FnMut(&WaterfallEvent),
{
    fn on_event(&mut self, event: &WaterfallEvent) {
        self(event);
    }
}
