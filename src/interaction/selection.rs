use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ScreenRect, ViewportMapper};

use super::InteractionMode;

/// Finalized time-range selection, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Turns a pointer drag into a clamped selection rectangle and a time range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionController {
    mode: InteractionMode,
    start_x: f64,
    start_y: f64,
    rect: Option<ScreenRect>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            start_x: 0.0,
            start_y: 0.0,
            rect: None,
        }
    }
}

impl SelectionController {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.mode == InteractionMode::Selecting
    }

    /// Visual rectangle of the selection in progress.
    #[must_use]
    pub fn rect(&self) -> Option<ScreenRect> {
        self.rect
    }

    /// Starts a selection when the press lands inside the drawing area.
    pub fn begin(&mut self, x: f64, y: f64, mapper: &ViewportMapper) -> bool {
        if !mapper.contains_point(x, y) {
            return false;
        }
        self.mode = InteractionMode::Selecting;
        self.start_x = x;
        self.start_y = y;
        self.rect = Some(ScreenRect::new(x, y, 0.0, 0.0));
        trace!(x, y, "selection started");
        true
    }

    /// Recomputes the rectangle spanned from the start corner to the pointer.
    ///
    /// The rectangle never leaves the drawing area. When the mapper cannot
    /// produce a time range the whole drawing area is used instead of the raw
    /// pointer position.
    pub fn update(&mut self, x: f64, y: f64, mapper: &ViewportMapper) -> Option<ScreenRect> {
        if !self.is_selecting() {
            return None;
        }
        let area = mapper.rect();
        let rect = if mapper.is_time_degenerate() {
            area
        } else {
            let (x, y) = area.clamp_point(x, y);
            let (start_x, start_y) = area.clamp_point(self.start_x, self.start_y);
            ScreenRect::new(
                start_x.min(x),
                start_y.min(y),
                (x - start_x).abs(),
                (y - start_y).abs(),
            )
        };
        self.rect = Some(rect);
        self.rect
    }

    /// Ends the selection and maps its vertical extent to a time range.
    ///
    /// Returns `None` when the range is degenerate or empty. The visual
    /// rectangle is cleared either way.
    pub fn end(&mut self, mapper: &ViewportMapper) -> Option<TimeSelection> {
        if !self.is_selecting() {
            return None;
        }
        let rect = self.rect.take();
        self.mode = InteractionMode::Idle;

        let rect = rect?;
        if mapper.is_time_degenerate() {
            trace!("selection dropped: degenerate time mapping");
            return None;
        }
        let mut start = mapper.screen_y_to_time(rect.top);
        let mut end = mapper.screen_y_to_time(rect.bottom());
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        if start == end {
            trace!("selection dropped: empty time range");
            return None;
        }
        Some(TimeSelection { start, end })
    }

    /// Aborts any selection in progress. Returns whether visuals were shown.
    pub fn cancel(&mut self) -> bool {
        self.mode = InteractionMode::Idle;
        self.rect.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::{SelectionController, TimeSelection};
    use crate::core::{ScreenRect, ViewportMapper};
    use crate::interaction::InteractionMode;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(10)
    }

    fn mapper(window: TimeDelta) -> ViewportMapper {
        ViewportMapper::new(
            ScreenRect::from_size(400.0, 300.0),
            0.0,
            360.0,
            t0() + TimeDelta::minutes(15),
            window,
        )
    }

    #[test]
    fn drag_maps_to_swapped_time_range() {
        let mapper = mapper(TimeDelta::minutes(15));
        let mut selection = SelectionController::default();
        assert!(selection.begin(100.0, 50.0, &mapper));
        selection.update(120.0, 150.0, &mapper);
        let finalized = selection.end(&mapper).expect("selection");
        assert_eq!(
            finalized,
            TimeSelection {
                start: t0() + TimeDelta::seconds(450),
                end: t0() + TimeDelta::seconds(750),
            }
        );
        assert_eq!(selection.mode(), InteractionMode::Idle);
        assert!(selection.rect().is_none());
    }

    #[test]
    fn update_clamps_to_drawing_area() {
        let mapper = mapper(TimeDelta::minutes(15));
        let mut selection = SelectionController::default();
        selection.begin(10.0, 10.0, &mapper);
        let rect = selection.update(-50.0, 900.0, &mapper).expect("rect");
        assert_eq!(rect, ScreenRect::new(0.0, 10.0, 10.0, 290.0));
    }

    #[test]
    fn zero_height_drag_emits_nothing_but_clears_visuals() {
        let mapper = mapper(TimeDelta::minutes(15));
        let mut selection = SelectionController::default();
        selection.begin(10.0, 10.0, &mapper);
        selection.update(200.0, 10.0, &mapper);
        assert!(selection.end(&mapper).is_none());
        assert!(selection.rect().is_none());
    }

    #[test]
    fn degenerate_mapper_uses_full_area_and_suppresses_event() {
        let mapper = mapper(TimeDelta::zero());
        let mut selection = SelectionController::default();
        selection.begin(10.0, 10.0, &mapper);
        let rect = selection.update(20.0, 20.0, &mapper).expect("rect");
        assert_eq!(rect, ScreenRect::from_size(400.0, 300.0));
        assert!(selection.end(&mapper).is_none());
        assert!(selection.rect().is_none());
    }

    #[test]
    fn press_outside_area_does_not_start() {
        let mapper = mapper(TimeDelta::minutes(15));
        let mut selection = SelectionController::default();
        assert!(!selection.begin(-1.0, 10.0, &mapper));
        assert!(!selection.is_selecting());
        assert!(!selection.cancel());
    }
}
