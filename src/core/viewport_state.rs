use chrono::{DateTime, TimeDelta, Utc};

use crate::core::mapper::ViewportMapper;
use crate::core::primitives::window_start;
use crate::core::types::{ScreenRect, ValueRange};
use crate::error::{WaterfallError, WaterfallResult};

/// Time window and value range a waterfall viewport currently displays.
///
/// `time_min` is always derived as `time_max - time_window`, saturating at
/// the oldest representable time. The displayed
/// value range (`value_min`/`value_max`) is resolved from the custom bounds,
/// the auto-range flags, and the data range via [`ViewportState::apply_data_range`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    time_window: TimeDelta,
    time_max: DateTime<Utc>,
    value_min: f64,
    value_max: f64,
    auto_range: bool,
    range_limit_enabled: bool,
    custom_value_min: f64,
    custom_value_max: f64,
}

impl ViewportState {
    /// Creates a state showing `custom` until data arrives.
    pub fn new(
        time_window: TimeDelta,
        time_max: DateTime<Utc>,
        custom: ValueRange,
    ) -> WaterfallResult<Self> {
        let custom = normalize_custom_range(custom.min, custom.max)?;
        Ok(Self {
            time_window,
            time_max,
            value_min: custom.min,
            value_max: custom.max,
            auto_range: false,
            range_limit_enabled: false,
            custom_value_min: custom.min,
            custom_value_max: custom.max,
        })
    }

    #[must_use]
    pub fn time_window(&self) -> TimeDelta {
        self.time_window
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
    pub fn displayed_value_range(&self) -> ValueRange {
        ValueRange::new(self.value_min, self.value_max)
    }

    #[must_use]
    pub fn custom_value_range(&self) -> ValueRange {
        ValueRange::new(self.custom_value_min, self.custom_value_max)
    }

    #[must_use]
    pub fn auto_range(&self) -> bool {
        self.auto_range
    }

    #[must_use]
    pub fn range_limit_enabled(&self) -> bool {
        self.range_limit_enabled
    }

    /// Returns whether the window changed.
    pub fn set_time_window(&mut self, time_window: TimeDelta) -> bool {
        let changed = self.time_window != time_window;
        self.time_window = time_window;
        changed
    }

    /// Returns whether the newest displayed time changed.
    pub fn set_time_max(&mut self, time_max: DateTime<Utc>) -> bool {
        let changed = self.time_max != time_max;
        self.time_max = time_max;
        changed
    }

    pub fn set_custom_value_range(&mut self, min: f64, max: f64) -> WaterfallResult<bool> {
        let range = normalize_custom_range(min, max)?;
        let changed = range != self.custom_value_range();
        self.custom_value_min = range.min;
        self.custom_value_max = range.max;
        Ok(changed)
    }

    pub fn set_auto_range(&mut self, enabled: bool) -> bool {
        let changed = self.auto_range != enabled;
        self.auto_range = enabled;
        changed
    }

    pub fn set_range_limiting(&mut self, enabled: bool) -> bool {
        let changed = self.range_limit_enabled != enabled;
        self.range_limit_enabled = enabled;
        changed
    }

    /// Resolves the displayed value range for a given combined data range.
    ///
    /// - auto-range off: custom bounds, regardless of data
    /// - auto-range with limiting: custom bounds intersected with data, or the
    ///   raw data range when the overlap is empty or inverted
    /// - auto-range without limiting: the raw data range
    ///
    /// An empty store (sentinel data range) keeps the custom bounds.
    #[must_use]
    pub fn resolve_value_range(&self, data: ValueRange) -> ValueRange {
        let custom = self.custom_value_range();
        if !self.auto_range || data.is_sentinel() {
            return custom;
        }
        if self.range_limit_enabled {
            return custom.intersection(data).unwrap_or(data);
        }
        data
    }

    /// Applies the resolved range and returns whether the displayed range moved.
    pub fn apply_data_range(&mut self, data: ValueRange) -> bool {
        let resolved = self.resolve_value_range(data);
        let changed = resolved != self.displayed_value_range();
        self.value_min = resolved.min;
        self.value_max = resolved.max;
        changed
    }

    #[must_use]
    pub fn mapper(&self, rect: ScreenRect) -> ViewportMapper {
        ViewportMapper::new(
            rect,
            self.value_min,
            self.value_max,
            self.time_max,
            self.time_window,
        )
    }
}

fn normalize_custom_range(min: f64, max: f64) -> WaterfallResult<ValueRange> {
    if !min.is_finite() || !max.is_finite() {
        return Err(WaterfallError::InvalidData(
            "custom value range must be finite".to_owned(),
        ));
    }
    Ok(ValueRange::new(min.min(max), min.max(max)))
}
