use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::series::{Series, check_shape};
use crate::core::types::{TimeRange, ValueRange};
use crate::error::WaterfallResult;

/// What a successful store mutation did to the set of series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesChange {
    /// A new series name was created.
    Created,
    /// An existing series had samples appended.
    Appended,
    /// An existing series content was replaced or emptied.
    Replaced,
    /// The call had no effect.
    Unchanged,
}

/// Named time-series data model shared by a waterfall viewport.
///
/// Range queries scan every stored sample. Callers cache the result for the
/// duration of one redraw pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesStore {
    series: IndexMap<String, Series>,
}

impl TimeSeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a series wholesale.
    ///
    /// Mismatched array lengths are rejected and leave the store untouched.
    pub fn set_series(
        &mut self,
        name: &str,
        values: Vec<f64>,
        timestamps: Vec<DateTime<Utc>>,
    ) -> WaterfallResult<SeriesChange> {
        let series = match Series::from_parts(name, values, timestamps) {
            Ok(series) => series,
            Err(err) => {
                warn!(series = name, error = %err, "rejected set_series");
                return Err(err);
            }
        };
        debug!(series = name, len = series.len(), "set series");
        let change = if self.series.contains_key(name) {
            SeriesChange::Replaced
        } else {
            SeriesChange::Created
        };
        self.series.insert(name.to_owned(), series);
        Ok(change)
    }

    /// Appends samples in the given order, creating the series when missing.
    pub fn append_to_series(
        &mut self,
        name: &str,
        values: &[f64],
        timestamps: &[DateTime<Utc>],
    ) -> WaterfallResult<SeriesChange> {
        if let Err(err) = check_shape(name, values.len(), timestamps.len()) {
            warn!(series = name, error = %err, "rejected append_to_series");
            return Err(err);
        }

        let change = match self.series.get_mut(name) {
            Some(series) => {
                if values.is_empty() {
                    return Ok(SeriesChange::Unchanged);
                }
                series.extend(name, values, timestamps)?;
                SeriesChange::Appended
            }
            None => {
                self.series.insert(
                    name.to_owned(),
                    Series::from_parts(name, values.to_vec(), timestamps.to_vec())?,
                );
                SeriesChange::Created
            }
        };
        trace!(series = name, appended = values.len(), "append to series");
        Ok(change)
    }

    /// Empties a series while keeping its name registered.
    pub fn clear_series(&mut self, name: &str) -> SeriesChange {
        match self.series.get_mut(name) {
            Some(series) if !series.is_empty() => {
                series.clear();
                debug!(series = name, "cleared series");
                SeriesChange::Replaced
            }
            _ => SeriesChange::Unchanged,
        }
    }

    /// Drops a series name and its samples. Returns whether it existed.
    pub fn remove_series(&mut self, name: &str) -> bool {
        let removed = self.series.shift_remove(name).is_some();
        if removed {
            debug!(series = name, "removed series");
        }
        removed
    }

    pub fn clear_all(&mut self) {
        debug!(series_count = self.series.len(), "cleared all series");
        self.series.clear();
    }

    /// Returns the parallel arrays of a series; unknown names yield empty slices.
    #[must_use]
    pub fn get_series(&self, name: &str) -> (&[f64], &[DateTime<Utc>]) {
        match self.series.get(name) {
            Some(series) => (series.values(), series.timestamps()),
            None => (&[] as &[f64], &[] as &[DateTime<Utc>]),
        }
    }

    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    #[must_use]
    pub fn contains_series(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> + '_ {
        self.series.iter().map(|(name, series)| (name.as_str(), series))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.series.values().map(Series::len).sum()
    }

    #[must_use]
    pub fn series_value_range(&self, name: &str) -> ValueRange {
        self.series
            .get(name)
            .and_then(Series::value_range)
            .unwrap_or(ValueRange::EMPTY)
    }

    #[must_use]
    pub fn series_time_range(&self, name: &str) -> TimeRange {
        self.series
            .get(name)
            .and_then(Series::time_range)
            .unwrap_or(TimeRange::EMPTY)
    }

    /// Union of every series value range; `(0, 0)` when nothing is stored.
    #[must_use]
    pub fn combined_value_range(&self) -> ValueRange {
        self.series
            .values()
            .filter_map(Series::value_range)
            .reduce(ValueRange::union)
            .unwrap_or(ValueRange::EMPTY)
    }

    /// Union of every series time range; the epoch sentinel when nothing is stored.
    #[must_use]
    pub fn combined_time_range(&self) -> TimeRange {
        self.series
            .values()
            .filter_map(Series::time_range)
            .reduce(TimeRange::union)
            .unwrap_or(TimeRange::EMPTY)
    }
}
