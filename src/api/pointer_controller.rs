use tracing::{debug, trace};

use crate::interaction::TimeSelection;
use crate::render::DrawingSurface;

use super::{WaterfallEvent, WaterfallViewport};

impl<S: DrawingSurface> WaterfallViewport<S> {
    /// Starts a time selection when the press lands inside the drawing area.
    pub fn pointer_press(&mut self, x: f64, y: f64) -> bool {
        let mapper = self.mapper();
        if !self.selection.begin(x, y, &mapper) {
            return false;
        }
        self.redraw_selection_shape();
        true
    }

    /// Tracks the pointer: publishes the cursor time to the group, updates the
    /// local crosshair, and stretches a selection in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let mapper = self.mapper();
        let inside = mapper.contains_point(x, y);
        self.pointer.on_move(x, y, inside);

        if inside {
            let time = mapper.screen_y_to_time(y);
            self.published_cursor = Some(self.cursor.set_time(time));
            if self.cursor_gate.should_emit(y) {
                self.emit(WaterfallEvent::CursorTimeChanged { time, screen_y: y });
            }
            if self.crosshair_gate.should_emit(x) {
                self.emit(WaterfallEvent::CrosshairXChanged { x });
            }
        } else {
            self.clear_local_cursor();
        }

        if self.selection.update(x, y, &mapper).is_some() {
            self.redraw_selection_shape();
        }
    }

    /// Finishes a selection and reports its time range when it is valid.
    pub fn pointer_release(&mut self, x: f64, y: f64) -> Option<TimeSelection> {
        if !self.selection.is_selecting() {
            return None;
        }
        let mapper = self.mapper();
        self.selection.update(x, y, &mapper);
        let finalized = self.selection.end(&mapper);
        self.redraw_selection_shape();

        let selection = finalized?;
        debug!(
            start = %selection.start,
            end = %selection.end,
            "selection finalized"
        );
        self.emit(WaterfallEvent::SelectionFinalized {
            start: selection.start,
            end: selection.end,
        });
        Some(selection)
    }

    /// Pointer left the widget: aborts any selection and hides the cursor.
    pub fn pointer_leave(&mut self) {
        if self.selection.cancel() {
            trace!("selection cancelled on pointer leave");
        }
        self.redraw_selection_shape();
        self.pointer.on_leave();
        self.clear_local_cursor();
    }

    /// Drops the local pointer cursor. The group's cursor is hidden only when
    /// it still holds this viewport's last write.
    fn clear_local_cursor(&mut self) {
        let had_cursor = self.cursor_gate.reset();
        self.crosshair_gate.reset();
        if let Some(written) = self.published_cursor.take() {
            if !self.cursor.clear_if_unchanged(written) {
                trace!("shared cursor owned by another writer, left in place");
            }
        }
        if had_cursor {
            self.emit(WaterfallEvent::CursorCleared);
        }
    }
}
