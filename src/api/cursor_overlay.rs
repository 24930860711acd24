use chrono::{DateTime, Utc};
use tracing::trace;

use crate::interaction::CrosshairState;
use crate::render::{CanvasLayerKind, Color, DrawingSurface, Shape, ShapeId, ShapeStyle};

use super::WaterfallViewport;

const CURSOR_COLOR: Color = Color::rgba(1.0, 1.0, 1.0, 0.8);
const CROSSHAIR_COLOR: Color = Color::rgba(1.0, 1.0, 1.0, 0.4);
const CURSOR_LABEL_FONT_PX: f64 = 11.0;

/// Shapes currently drawn on the cursor layer.
#[derive(Debug, Clone, Default)]
pub(super) struct CursorOverlay {
    drawn: CrosshairState,
    ids: Vec<ShapeId>,
    stale: bool,
}

impl CursorOverlay {
    pub(super) fn drawn(&self) -> CrosshairState {
        self.drawn
    }

    /// Forces the next tick to redraw.
    pub(super) fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Forgets ids of shapes already wiped by a surface clear.
    pub(super) fn reset_after_clear(&mut self) {
        self.ids.clear();
        self.drawn = CrosshairState::default();
        self.stale = true;
    }
}

impl<S: DrawingSurface> WaterfallViewport<S> {
    /// Publishes a cursor time to the whole group; `None` hides it.
    pub fn set_cursor_time(&mut self, time: Option<DateTime<Utc>>) {
        match time {
            Some(time) => {
                self.cursor.set_time(time);
            }
            None => self.cursor.clear(),
        }
    }

    /// Refreshes the cursor layer from the shared cursor and local pointer.
    ///
    /// Hosts call this every [`crate::interaction::DEFAULT_OVERLAY_TICK`].
    /// Returns whether the surface was touched.
    pub fn on_tick(&mut self) -> bool {
        let desired = self.desired_crosshair();
        if desired == self.overlay.drawn && !self.overlay.stale {
            return false;
        }

        for id in self.overlay.ids.drain(..) {
            self.surface.remove(id);
        }

        let shapes = self.crosshair_shapes(desired);
        for shape in shapes {
            if let Some(id) = self.insert_shape(shape) {
                self.overlay.ids.push(id);
            }
        }
        trace!(
            cursor_y = ?desired.cursor_y,
            crosshair_x = ?desired.crosshair_x,
            "cursor layer redrawn"
        );
        self.overlay.drawn = desired;
        self.overlay.stale = false;
        true
    }

    fn desired_crosshair(&self) -> CrosshairState {
        let mapper = self.mapper();
        let cursor_y = self
            .cursor
            .time()
            .filter(|time| !mapper.is_time_degenerate() && mapper.contains_time(*time))
            .map(|time| mapper.time_to_screen_y(time));
        let crosshair_x = self.pointer.inside.then_some(self.pointer.x);
        CrosshairState {
            cursor_y,
            crosshair_x,
        }
    }

    fn crosshair_shapes(&self, crosshair: CrosshairState) -> Vec<Shape> {
        let rect = self.config.rect;
        let z = CanvasLayerKind::Cursor.z();
        let mut shapes = Vec::with_capacity(3);
        if let Some(y) = crosshair.cursor_y {
            shapes.push(Shape::line(
                rect.left,
                y,
                rect.right(),
                y,
                z,
                ShapeStyle::stroke(CURSOR_COLOR, 1.0),
            ));
            if let Some(time) = self.cursor.time() {
                shapes.push(Shape::text(
                    time.format("%H:%M:%S").to_string(),
                    rect.left + 4.0,
                    y - 2.0,
                    CURSOR_LABEL_FONT_PX,
                    z + 1.0,
                    ShapeStyle::fill(CURSOR_COLOR),
                ));
            }
        }
        if let Some(x) = crosshair.crosshair_x {
            shapes.push(Shape::line(
                x,
                rect.top,
                x,
                rect.bottom(),
                z,
                ShapeStyle::stroke(CROSSHAIR_COLOR, 1.0).with_dash(&[3.0, 3.0]),
            ));
        }
        shapes
    }
}
