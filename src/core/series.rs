use chrono::{DateTime, Utc};

use crate::core::types::{Sample, TimeRange, ValueRange};
use crate::error::{WaterfallError, WaterfallResult};

/// One named ordered sequence of samples stored as parallel arrays.
///
/// The two arrays always have equal length: every mutating entry point checks
/// shapes before touching either array. Order is insertion order and is never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    values: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
}

impl Series {
    pub fn from_parts(
        name: &str,
        values: Vec<f64>,
        timestamps: Vec<DateTime<Utc>>,
    ) -> WaterfallResult<Self> {
        check_shape(name, values.len(), timestamps.len())?;
        Ok(Self { values, timestamps })
    }

    pub fn extend(
        &mut self,
        name: &str,
        values: &[f64],
        timestamps: &[DateTime<Utc>],
    ) -> WaterfallResult<()> {
        check_shape(name, values.len(), timestamps.len())?;
        self.values.extend_from_slice(values);
        self.timestamps.extend_from_slice(timestamps);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.timestamps.clear();
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.values
            .iter()
            .zip(&self.timestamps)
            .map(|(value, timestamp)| Sample::new(*value, *timestamp))
    }

    #[must_use]
    pub fn value_range(&self) -> Option<ValueRange> {
        ValueRange::scan(&self.values)
    }

    #[must_use]
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::scan(&self.timestamps)
    }
}

pub(crate) fn check_shape(name: &str, values: usize, timestamps: usize) -> WaterfallResult<()> {
    if values != timestamps {
        return Err(WaterfallError::ShapeMismatch {
            series: name.to_owned(),
            values,
            timestamps,
        });
    }
    Ok(())
}
