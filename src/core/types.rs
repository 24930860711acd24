use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WaterfallError, WaterfallResult};

/// One stored `(value, timestamp)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    #[must_use]
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// Drawing area of a viewport in local screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn validate(self) -> WaterfallResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(WaterfallError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Clamps a point onto the rectangle bounds.
    #[must_use]
    pub fn clamp_point(self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(self.left, self.right()),
            y.clamp(self.top, self.bottom()),
        )
    }
}

/// Inclusive `(min, max)` pair over sample values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Sentinel returned for empty series and stores.
    pub const EMPTY: Self = Self { min: 0.0, max: 0.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::EMPTY
    }

    /// Scans values, skipping non-finite entries.
    #[must_use]
    pub fn scan(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied().filter(|value| value.is_finite());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        Some(Self { min, max })
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlap of both ranges, `None` when empty or inverted.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min < max).then_some(Self { min, max })
    }
}

/// Inclusive `(min, max)` pair over sample timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeRange {
    /// Sentinel returned for empty series and stores.
    pub const EMPTY: Self = Self {
        min: DateTime::<Utc>::UNIX_EPOCH,
        max: DateTime::<Utc>::UNIX_EPOCH,
    };

    #[must_use]
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::EMPTY
    }

    #[must_use]
    pub fn scan(timestamps: &[DateTime<Utc>]) -> Option<Self> {
        let min = timestamps.iter().min()?;
        let max = timestamps.iter().max()?;
        Some(Self {
            min: *min,
            max: *max,
        })
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
