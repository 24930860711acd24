use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{checked_window_start, seconds_to_delta};
use crate::core::{BinStrategy, ScreenRect, ValueRange};
use crate::error::{WaterfallError, WaterfallResult};
use crate::interaction::DEFAULT_CURSOR_THRESHOLD_PX;

use super::WaterfallKind;

const MAX_GRID_DIVISIONS: u32 = 64;

/// Background grid drawn on every full redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_visible")]
    pub visible: bool,
    /// Number of horizontal bands along the time axis.
    #[serde(default = "default_time_divisions")]
    pub time_divisions: u32,
    /// Number of vertical bands along the value axis.
    #[serde(default = "default_value_divisions")]
    pub value_divisions: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: default_grid_visible(),
            time_divisions: default_time_divisions(),
            value_divisions: default_value_divisions(),
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    pub fn validate(self) -> WaterfallResult<()> {
        if self.time_divisions > MAX_GRID_DIVISIONS || self.value_divisions > MAX_GRID_DIVISIONS {
            return Err(WaterfallError::InvalidData(format!(
                "grid divisions must be <= {MAX_GRID_DIVISIONS}"
            )));
        }
        Ok(())
    }
}

/// Serializable bootstrap configuration of one waterfall viewport.
///
/// Hosts can persist it as JSON with [`WaterfallConfig::to_json_pretty`] and
/// restore it with [`WaterfallConfig::from_json_str`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterfallConfig {
    pub rect: ScreenRect,
    #[serde(default)]
    pub kind: WaterfallKind,
    #[serde(default = "default_time_window_secs")]
    pub time_window_secs: f64,
    /// Newest displayed time; the Unix epoch when absent.
    #[serde(default)]
    pub time_max: Option<DateTime<Utc>>,
    /// Manual value bounds; the variant's default range when absent.
    #[serde(default)]
    pub custom_value_range: Option<ValueRange>,
    #[serde(default)]
    pub auto_range: bool,
    #[serde(default)]
    pub range_limit_enabled: bool,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default = "default_max_markers_per_series")]
    pub max_markers_per_series: usize,
    #[serde(default)]
    pub bin_strategy: BinStrategy,
    #[serde(default = "default_cursor_threshold_px")]
    pub cursor_threshold_px: f64,
}

impl WaterfallConfig {
    #[must_use]
    pub fn new(rect: ScreenRect, kind: WaterfallKind) -> Self {
        Self {
            rect,
            kind,
            time_window_secs: default_time_window_secs(),
            time_max: None,
            custom_value_range: None,
            auto_range: false,
            range_limit_enabled: false,
            grid: GridConfig::default(),
            max_markers_per_series: default_max_markers_per_series(),
            bin_strategy: BinStrategy::default(),
            cursor_threshold_px: default_cursor_threshold_px(),
        }
    }

    #[must_use]
    pub fn with_time_window_secs(mut self, seconds: f64) -> Self {
        self.time_window_secs = seconds;
        self
    }

    #[must_use]
    pub fn with_time_max(mut self, time_max: DateTime<Utc>) -> Self {
        self.time_max = Some(time_max);
        self
    }

    #[must_use]
    pub fn with_custom_value_range(mut self, min: f64, max: f64) -> Self {
        self.custom_value_range = Some(ValueRange::new(min, max));
        self
    }

    #[must_use]
    pub fn with_auto_range(mut self, auto_range: bool) -> Self {
        self.auto_range = auto_range;
        self
    }

    #[must_use]
    pub fn with_range_limiting(mut self, enabled: bool) -> Self {
        self.range_limit_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn with_max_markers_per_series(mut self, max_markers: usize) -> Self {
        self.max_markers_per_series = max_markers;
        self
    }

    #[must_use]
    pub fn with_bin_strategy(mut self, strategy: BinStrategy) -> Self {
        self.bin_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_cursor_threshold_px(mut self, threshold: f64) -> Self {
        self.cursor_threshold_px = threshold;
        self
    }

    #[must_use]
    pub fn time_window(&self) -> TimeDelta {
        seconds_to_delta(self.time_window_secs)
    }

    #[must_use]
    pub fn initial_time_max(&self) -> DateTime<Utc> {
        self.time_max.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    #[must_use]
    pub fn resolved_custom_value_range(&self) -> ValueRange {
        self.custom_value_range
            .unwrap_or_else(|| self.kind.descriptor().default_value_range)
    }

    pub fn validate(&self) -> WaterfallResult<()> {
        self.rect.validate()?;
        if !self.time_window_secs.is_finite() || self.time_window_secs <= 0.0 {
            return Err(WaterfallError::InvalidData(
                "time window must be finite and > 0 seconds".to_owned(),
            ));
        }
        if checked_window_start(self.initial_time_max(), self.time_window()).is_none() {
            return Err(WaterfallError::InvalidData(
                "time window reaches past the oldest representable time".to_owned(),
            ));
        }
        if let Some(range) = self.custom_value_range {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(WaterfallError::InvalidData(
                    "custom value range must be finite".to_owned(),
                ));
            }
        }
        if self.max_markers_per_series == 0 {
            return Err(WaterfallError::InvalidData(
                "max markers per series must be >= 1".to_owned(),
            ));
        }
        if !self.cursor_threshold_px.is_finite() || self.cursor_threshold_px < 0.0 {
            return Err(WaterfallError::InvalidData(
                "cursor threshold must be finite and >= 0".to_owned(),
            ));
        }
        self.grid.validate()
    }

    pub fn to_json_pretty(&self) -> WaterfallResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            WaterfallError::Config(format!("failed to serialize waterfall config: {err}"))
        })
    }

    pub fn from_json_str(input: &str) -> WaterfallResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|err| {
            WaterfallError::Config(format!("failed to parse waterfall config: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn default_grid_visible() -> bool {
    true
}

fn default_time_divisions() -> u32 {
    6
}

fn default_value_divisions() -> u32 {
    4
}

fn default_time_window_secs() -> f64 {
    15.0 * 60.0
}

fn default_max_markers_per_series() -> usize {
    2_000
}

fn default_cursor_threshold_px() -> f64 {
    DEFAULT_CURSOR_THRESHOLD_PX
}
