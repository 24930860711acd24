use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, trace, warn};

use crate::core::primitives::checked_window_start;
use crate::core::{ScreenRect, SeriesChange, TimeSeriesStore};
use crate::error::{WaterfallError, WaterfallResult};
use crate::render::DrawingSurface;

use super::{GridConfig, SeriesStyle, WaterfallViewport};

impl<S: DrawingSurface> WaterfallViewport<S> {
    /// Replaces a series wholesale.
    pub fn set_series(
        &mut self,
        name: &str,
        values: Vec<f64>,
        timestamps: Vec<DateTime<Utc>>,
    ) -> WaterfallResult<()> {
        let change = self.store.set_series(name, values, timestamps)?;
        self.schedule_series_change(name, change);
        Ok(())
    }

    /// Appends samples to a series, creating it when missing.
    pub fn append_to_series(
        &mut self,
        name: &str,
        values: &[f64],
        timestamps: &[DateTime<Utc>],
    ) -> WaterfallResult<()> {
        let change = self.store.append_to_series(name, values, timestamps)?;
        self.schedule_series_change(name, change);
        Ok(())
    }

    pub fn append_sample(
        &mut self,
        name: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> WaterfallResult<()> {
        self.append_to_series(name, &[value], &[timestamp])
    }

    /// Empties a series; its name and style stay registered.
    pub fn clear_series(&mut self, name: &str) {
        let change = self.store.clear_series(name);
        self.schedule_series_change(name, change);
    }

    /// Drops a series and its style. Returns whether it existed.
    pub fn remove_series(&mut self, name: &str) -> bool {
        if !self.store.remove_series(name) {
            return false;
        }
        self.styles.shift_remove(name);
        self.request_full_redraw();
        true
    }

    pub fn clear_all_series(&mut self) {
        self.store.clear_all();
        self.styles.clear();
        self.request_full_redraw();
    }

    /// Swaps in a new data source and returns the previous one.
    pub fn attach_store(&mut self, store: TimeSeriesStore) -> TimeSeriesStore {
        let previous = std::mem::replace(&mut self.store, store);
        debug!(
            series_count = self.store.len(),
            total_samples = self.store.total_samples(),
            "attached series store"
        );
        self.request_full_redraw();
        previous
    }

    pub fn set_time_window(&mut self, time_window: TimeDelta) -> WaterfallResult<()> {
        if time_window <= TimeDelta::zero() {
            warn!(?time_window, "rejected non-positive time window");
            return Err(WaterfallError::InvalidData(
                "time window must be > 0".to_owned(),
            ));
        }
        if checked_window_start(self.state.time_max(), time_window).is_none() {
            warn!(?time_window, "rejected time window reaching past the oldest representable time");
            return Err(WaterfallError::InvalidData(
                "time window reaches past the oldest representable time".to_owned(),
            ));
        }
        if self.state.set_time_window(time_window) {
            debug!(?time_window, "time window changed");
            self.request_full_redraw();
        }
        Ok(())
    }

    pub fn set_time_max(&mut self, time_max: DateTime<Utc>) {
        if self.state.set_time_max(time_max) {
            trace!(%time_max, "time max changed");
            self.request_full_redraw();
        }
    }

    /// Rolls the window forward to `now`; older times are ignored.
    ///
    /// Returns whether the window moved.
    pub fn advance_time_max(&mut self, now: DateTime<Utc>) -> bool {
        if now <= self.state.time_max() {
            return false;
        }
        self.set_time_max(now);
        true
    }

    pub fn set_custom_value_range(&mut self, min: f64, max: f64) -> WaterfallResult<()> {
        let changed = self.state.set_custom_value_range(min, max).inspect_err(|err| {
            warn!(error = %err, "rejected custom value range");
        })?;
        if changed {
            self.request_range_refresh();
        }
        Ok(())
    }

    pub fn set_auto_range(&mut self, enabled: bool) {
        if self.state.set_auto_range(enabled) {
            self.request_range_refresh();
        }
    }

    pub fn set_range_limiting(&mut self, enabled: bool) {
        if self.state.set_range_limiting(enabled) {
            self.request_range_refresh();
        }
    }

    pub fn set_grid(&mut self, grid: GridConfig) -> WaterfallResult<()> {
        grid.validate()?;
        if self.config.grid != grid {
            self.config.grid = grid;
            self.request_full_redraw();
        }
        Ok(())
    }

    pub fn set_screen_rect(&mut self, rect: ScreenRect) -> WaterfallResult<()> {
        let rect = rect.validate().inspect_err(|err| {
            warn!(error = %err, "rejected screen rect");
        })?;
        if self.config.rect != rect {
            self.config.rect = rect;
            self.selection.cancel();
            self.request_full_redraw();
        }
        Ok(())
    }

    /// Sets presentation overrides of one series; the series need not exist yet.
    pub fn set_series_style(&mut self, name: &str, style: SeriesStyle) -> WaterfallResult<()> {
        if let Some(color) = style.color {
            color.validate()?;
        }
        if let Some(size) = style.point_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(WaterfallError::InvalidData(
                    "point size must be finite and > 0".to_owned(),
                ));
            }
        }
        self.store_series_style(name, style);
        Ok(())
    }

    pub fn set_series_visible(&mut self, name: &str, visible: bool) {
        let style = self.series_style(name).with_visible(visible);
        self.store_series_style(name, style);
    }

    fn store_series_style(&mut self, name: &str, style: SeriesStyle) {
        if self.styles.get(name) == Some(&style) {
            return;
        }
        self.styles.insert(name.to_owned(), style);
        if self.store.contains_series(name) {
            trace!(series = name, visible = style.visible, "series style changed");
            self.render_state.mark_series_dirty(name);
        }
    }

    fn schedule_series_change(&mut self, name: &str, change: SeriesChange) {
        match change {
            SeriesChange::Created => self.request_full_redraw(),
            SeriesChange::Appended => self.render_state.note_samples_appended(name),
            SeriesChange::Replaced => {
                self.render_state.mark_series_dirty(name);
                self.render_state.request_range_update();
            }
            SeriesChange::Unchanged => {}
        }
    }

    fn request_range_refresh(&mut self) {
        self.render_state.mark_all_dirty(self.store.series_names());
        self.render_state.request_range_update();
    }
}
