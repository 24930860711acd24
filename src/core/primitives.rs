use chrono::{DateTime, TimeDelta, Utc};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Converts a duration into fractional seconds.
///
/// Falls back to millisecond precision for spans that overflow `i64`
/// nanoseconds (roughly 292 years).
#[must_use]
pub fn delta_to_seconds(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_SECOND,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Converts fractional seconds into a duration rounded to the nearest nanosecond.
///
/// Non-finite input maps to a zero duration.
#[must_use]
pub fn seconds_to_delta(seconds: f64) -> TimeDelta {
    if !seconds.is_finite() {
        return TimeDelta::zero();
    }
    let nanos = (seconds * NANOS_PER_SECOND).round();
    if nanos.abs() >= i64::MAX as f64 {
        let saturated = if seconds > 0.0 {
            TimeDelta::MAX
        } else {
            TimeDelta::MIN
        };
        return TimeDelta::try_milliseconds((seconds * 1_000.0).round() as i64)
            .unwrap_or(saturated);
    }
    TimeDelta::nanoseconds(nanos as i64)
}

/// Signed seconds elapsed from `origin` to `time`.
#[must_use]
pub fn seconds_between(origin: DateTime<Utc>, time: DateTime<Utc>) -> f64 {
    delta_to_seconds(time.signed_duration_since(origin))
}

/// Oldest time of a window ending at `time_max`, or `None` when it falls
/// outside the representable `DateTime` range.
#[must_use]
pub fn checked_window_start(time_max: DateTime<Utc>, window: TimeDelta) -> Option<DateTime<Utc>> {
    time_max.checked_sub_signed(window)
}

/// Oldest time of a window ending at `time_max`, saturating at
/// [`DateTime::<Utc>::MIN_UTC`].
#[must_use]
pub fn window_start(time_max: DateTime<Utc>, window: TimeDelta) -> DateTime<Utc> {
    checked_window_start(time_max, window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
