use chrono::{DateTime, TimeDelta, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use waterfall_rs::api::{WaterfallConfig, WaterfallKind, WaterfallViewport};
use waterfall_rs::core::{BinStrategy, ScreenRect, ViewportMapper, bin_by_time};
use waterfall_rs::render::RecordingSurface;

fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(19_000)
}

fn bench_mapper_round_trip(c: &mut Criterion) {
    let mapper = ViewportMapper::new(
        ScreenRect::from_size(1920.0, 1080.0),
        -180.0,
        180.0,
        t0(),
        TimeDelta::minutes(15),
    );
    let timestamp = t0() - TimeDelta::seconds(321);

    c.bench_function("mapper_round_trip", |b| {
        b.iter(|| {
            let (x, y) = mapper.data_to_screen(black_box(42.5), black_box(timestamp));
            let _ = mapper.screen_x_to_value(x);
            let _ = mapper.screen_y_to_time(y);
        })
    });
}

fn bench_bin_by_time_100k(c: &mut Criterion) {
    let values: Vec<f64> = (0..100_000_i32).map(|i| f64::from(i % 360)).collect();
    let timestamps: Vec<DateTime<Utc>> = (0..100_000_i32)
        .map(|i| t0() + TimeDelta::milliseconds(i64::from(i) * 9))
        .collect();

    c.bench_function("bin_by_time_100k_first", |b| {
        b.iter(|| {
            let _ = bin_by_time(
                black_box(&values),
                black_box(&timestamps),
                TimeDelta::milliseconds(450),
                BinStrategy::First,
            );
        })
    });
}

fn bench_append_and_incremental_pass(c: &mut Criterion) {
    let config = WaterfallConfig::new(ScreenRect::from_size(1600.0, 900.0), WaterfallKind::Bearing)
        .with_time_window_secs(900.0)
        .with_time_max(t0() + TimeDelta::seconds(900));
    let mut viewport =
        WaterfallViewport::new(RecordingSurface::new(), config).expect("viewport init");

    for series in ["a", "b", "c", "d"] {
        let values: Vec<f64> = (0..1_500_i32).map(|i| f64::from(i % 360) - 180.0).collect();
        let timestamps: Vec<DateTime<Utc>> = (0..1_500_i64)
            .map(|i| t0() + TimeDelta::milliseconds(i * 600))
            .collect();
        viewport
            .set_series(series, values, timestamps)
            .expect("seed series");
    }
    viewport.render();

    let mut tick = 0_i64;
    c.bench_function("append_one_sample_incremental_pass", |b| {
        b.iter(|| {
            tick += 1;
            viewport
                .append_sample("a", black_box(12.0), t0() + TimeDelta::milliseconds(tick % 900_000))
                .expect("append");
            let _ = viewport.render();
        })
    });
}

criterion_group!(
    benches,
    bench_mapper_round_trip,
    bench_bin_by_time_100k,
    bench_append_and_incremental_pass
);
criterion_main!(benches);
