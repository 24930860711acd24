use chrono::{DateTime, Utc};

use crate::core::series::Series;
use crate::core::types::Sample;

/// Returns samples whose timestamp falls inside an inclusive time window.
///
/// Scans the whole series so out-of-order insertions are still found.
#[must_use]
pub fn samples_in_time_window(
    series: &Series,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Sample> {
    let (min_t, max_t) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    series
        .samples()
        .filter(|sample| sample.timestamp >= min_t && sample.timestamp <= max_t)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::samples_in_time_window;
    use crate::core::series::Series;

    fn t(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(seconds)
    }

    #[test]
    fn window_filter_keeps_insertion_order_and_tolerates_unsorted_input() {
        let series = Series::from_parts(
            "s",
            vec![1.0, 2.0, 3.0, 4.0],
            vec![t(50), t(5), t(20), t(10)],
        )
        .expect("series");

        let visible = samples_in_time_window(&series, t(25), t(5));
        let times: Vec<_> = visible.iter().map(|sample| sample.timestamp).collect();
        assert_eq!(times, vec![t(5), t(20), t(10)]);
    }
}
