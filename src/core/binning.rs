use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::Sample;

/// Representative picked for each non-empty time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinStrategy {
    /// First sample of the bucket in insertion order.
    #[default]
    First,
    /// Mean value placed at the mean timestamp of the bucket.
    Mean,
}

#[derive(Debug)]
enum Bucket {
    First(Sample),
    Mean {
        value_sum: f64,
        value_count: usize,
        offset_nanos_sum: i128,
        count: usize,
    },
}

/// Down-samples samples into fixed-duration time buckets.
///
/// Buckets are half-open `[anchor + k*bucket, anchor + (k+1)*bucket)` where
/// `anchor` is the earliest input timestamp, so the grid follows the data and
/// not the wall clock. Input order does not need to be sorted. Output is in
/// ascending bucket order with one entry per non-empty bucket, which bounds it
/// to `ceil(span / bucket) + 1` entries.
///
/// A non-positive bucket returns every sample unchanged. Mismatched array
/// lengths are rejected with an empty result.
#[must_use]
pub fn bin_by_time(
    values: &[f64],
    timestamps: &[DateTime<Utc>],
    bucket: TimeDelta,
    strategy: BinStrategy,
) -> Vec<Sample> {
    if values.len() != timestamps.len() {
        warn!(
            values = values.len(),
            timestamps = timestamps.len(),
            "bin_by_time called with mismatched arrays"
        );
        return Vec::new();
    }

    let samples = values
        .iter()
        .zip(timestamps)
        .map(|(value, timestamp)| Sample::new(*value, *timestamp));

    let Some(anchor) = timestamps.iter().min().copied() else {
        return Vec::new();
    };
    let bucket_nanos = bucket_nanos(bucket);
    if bucket_nanos <= 0 {
        return samples.collect();
    }

    let mut buckets: BTreeMap<i128, Bucket> = BTreeMap::new();
    for sample in samples {
        let offset = offset_nanos(anchor, sample.timestamp);
        let index = offset / bucket_nanos;
        match strategy {
            BinStrategy::First => {
                buckets.entry(index).or_insert(Bucket::First(sample));
            }
            BinStrategy::Mean => {
                let entry = buckets.entry(index).or_insert(Bucket::Mean {
                    value_sum: 0.0,
                    value_count: 0,
                    offset_nanos_sum: 0,
                    count: 0,
                });
                if let Bucket::Mean {
                    value_sum,
                    value_count,
                    offset_nanos_sum,
                    count,
                } = entry
                {
                    if sample.value.is_finite() {
                        *value_sum += sample.value;
                        *value_count += 1;
                    }
                    *offset_nanos_sum += offset;
                    *count += 1;
                }
            }
        }
    }

    buckets
        .into_values()
        .map(|bucket| match bucket {
            Bucket::First(sample) => sample,
            Bucket::Mean {
                value_sum,
                value_count,
                offset_nanos_sum,
                count,
            } => {
                let value = if value_count == 0 {
                    f64::NAN
                } else {
                    value_sum / value_count as f64
                };
                let mean_offset = offset_nanos_sum / count as i128;
                Sample::new(value, anchor + nanos_to_delta(mean_offset))
            }
        })
        .collect()
}

fn bucket_nanos(bucket: TimeDelta) -> i128 {
    bucket
        .num_nanoseconds()
        .map_or_else(|| i128::from(bucket.num_milliseconds()) * 1_000_000, i128::from)
}

fn offset_nanos(anchor: DateTime<Utc>, time: DateTime<Utc>) -> i128 {
    let delta = time.signed_duration_since(anchor);
    bucket_nanos(delta)
}

fn nanos_to_delta(nanos: i128) -> TimeDelta {
    let seconds = nanos.div_euclid(1_000_000_000);
    let subsec = nanos.rem_euclid(1_000_000_000);
    TimeDelta::seconds(seconds as i64) + TimeDelta::nanoseconds(subsec as i64)
}
