use chrono::{DateTime, TimeDelta, Utc};

use crate::core::primitives::{delta_to_seconds, seconds_between, seconds_to_delta, window_start};
use crate::core::types::{Sample, ScreenRect};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

/// Coordinate transform between data space (value x time) and screen space.
///
/// Values grow left to right. Time runs top to bottom from `time_max` (top
/// edge) down to `time_max - time_window` (bottom edge). Forward mappings do
/// not clip; inverse mappings clamp into the drawing area first.
///
/// A zero value span or a non-positive window never divides: the affected
/// axis maps to the rectangle origin and inverts to `value_min` / `time_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapper {
    rect: ScreenRect,
    value_min: f64,
    value_max: f64,
    time_max: DateTime<Utc>,
    time_window: TimeDelta,
}

impl ViewportMapper {
    #[must_use]
    pub fn new(
        rect: ScreenRect,
        value_min: f64,
        value_max: f64,
        time_max: DateTime<Utc>,
        time_window: TimeDelta,
    ) -> Self {
        Self {
            rect,
            value_min,
            value_max,
            time_max,
            time_window,
        }
    }

    #[must_use]
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    #[must_use]
    pub fn time_max(&self) -> DateTime<Utc> {
        self.time_max
    }

    #[must_use]
    pub fn time_min(&self) -> DateTime<Utc> {
        window_start(self.time_max, self.time_window)
    }

    #[must_use]
    pub fn is_value_degenerate(&self) -> bool {
        let span = self.value_max - self.value_min;
        !span.is_finite() || span == 0.0 || !self.rect.width.is_finite() || self.rect.width <= 0.0
    }

    #[must_use]
    pub fn is_time_degenerate(&self) -> bool {
        self.time_window <= TimeDelta::zero()
            || !self.rect.height.is_finite()
            || self.rect.height <= 0.0
    }

    #[must_use]
    pub fn value_to_screen_x(&self, value: f64) -> f64 {
        if self.is_value_degenerate() || !value.is_finite() {
            return self.rect.left;
        }
        let normalized = (value - self.value_min) / (self.value_max - self.value_min);
        self.rect.left + normalized * self.rect.width
    }

    #[must_use]
    pub fn time_to_screen_y(&self, timestamp: DateTime<Utc>) -> f64 {
        if self.is_time_degenerate() {
            return self.rect.top;
        }
        let age = seconds_between(timestamp, self.time_max);
        let normalized = age / delta_to_seconds(self.time_window);
        self.rect.top + normalized * self.rect.height
    }

    #[must_use]
    pub fn data_to_screen(&self, value: f64, timestamp: DateTime<Utc>) -> (f64, f64) {
        (
            self.value_to_screen_x(value),
            self.time_to_screen_y(timestamp),
        )
    }

    /// Inverse of the y mapping; always within `[time_min, time_max]`.
    #[must_use]
    pub fn screen_y_to_time(&self, y: f64) -> DateTime<Utc> {
        if self.is_time_degenerate() || !y.is_finite() {
            return self.time_max;
        }
        let normalized = ((y - self.rect.top) / self.rect.height).clamp(0.0, 1.0);
        let window_seconds = delta_to_seconds(self.time_window);
        let age = seconds_to_delta(window_seconds * normalized);
        // rounding to whole nanoseconds may step one tick past the window
        window_start(self.time_max, age).clamp(self.time_min(), self.time_max)
    }

    /// Inverse of the x mapping; always within `[value_min, value_max]`.
    #[must_use]
    pub fn screen_x_to_value(&self, x: f64) -> f64 {
        if self.is_value_degenerate() || !x.is_finite() {
            return self.value_min;
        }
        let normalized = ((x - self.rect.left) / self.rect.width).clamp(0.0, 1.0);
        self.value_min + normalized * (self.value_max - self.value_min)
    }

    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.rect.contains(x, y)
    }

    #[must_use]
    pub fn contains_time(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.time_min() && timestamp <= self.time_max
    }

    /// Maps every sample to screen space, preserving order.
    #[must_use]
    pub fn project(&self, samples: &[Sample]) -> Vec<(f64, f64)> {
        #[cfg(feature = "parallel-projection")]
        {
            samples
                .par_iter()
                .map(|sample| self.data_to_screen(sample.value, sample.timestamp))
                .collect()
        }

        #[cfg(not(feature = "parallel-projection"))]
        {
            samples
                .iter()
                .map(|sample| self.data_to_screen(sample.value, sample.timestamp))
                .collect()
        }
    }
}
