use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;
use waterfall_rs::core::{ScreenRect, ViewportMapper};

fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(19_000)
}

proptest! {
    #[test]
    fn data_to_screen_round_trips(
        left in -500.0f64..500.0,
        top in -500.0f64..500.0,
        width in 10.0f64..4_000.0,
        height in 10.0f64..4_000.0,
        value_min in -1.0e4f64..1.0e4,
        value_span in 1.0e-3f64..1.0e5,
        value_fraction in 0.0f64..=1.0,
        window_ms in 1_000i64..86_400_000,
        age_fraction in 0.0f64..=1.0
    ) {
        let window = TimeDelta::milliseconds(window_ms);
        let time_max = t0();
        let mapper = ViewportMapper::new(
            ScreenRect::new(left, top, width, height),
            value_min,
            value_min + value_span,
            time_max,
            window,
        );

        let value = value_min + value_span * value_fraction;
        let age_ms = (window_ms as f64 * age_fraction).floor() as i64;
        let timestamp = time_max - TimeDelta::milliseconds(age_ms);

        let (x, y) = mapper.data_to_screen(value, timestamp);
        prop_assert!(x.is_finite() && y.is_finite());

        let back_value = mapper.screen_x_to_value(x);
        prop_assert!((back_value - value).abs() <= 1.0e-9 * value_span.max(value.abs()).max(1.0));

        let back_time = mapper.screen_y_to_time(y);
        let error_nanos = (back_time - timestamp).num_nanoseconds().expect("small error").abs();
        prop_assert!(error_nanos <= 1_000, "round trip drifted {error_nanos} ns");
    }

    #[test]
    fn inverse_time_is_always_inside_window(
        y in -10_000.0f64..10_000.0,
        window_s in 1i64..100_000
    ) {
        let mapper = ViewportMapper::new(
            ScreenRect::from_size(300.0, 300.0),
            0.0,
            1.0,
            t0(),
            TimeDelta::seconds(window_s),
        );
        let time = mapper.screen_y_to_time(y);
        prop_assert!(time >= mapper.time_min());
        prop_assert!(time <= mapper.time_max());
    }
}

#[test]
fn zero_value_span_maps_to_left_edge() {
    let mapper = ViewportMapper::new(
        ScreenRect::new(25.0, 0.0, 200.0, 100.0),
        7.0,
        7.0,
        t0(),
        TimeDelta::minutes(1),
    );
    for value in [-1.0e9, 7.0, 42.0, f64::NAN] {
        assert_relative_eq!(mapper.value_to_screen_x(value), 25.0);
    }
    assert_relative_eq!(mapper.screen_x_to_value(180.0), 7.0);
}

#[test]
fn non_positive_window_maps_to_top_edge() {
    let mapper = ViewportMapper::new(
        ScreenRect::new(0.0, 40.0, 200.0, 100.0),
        0.0,
        1.0,
        t0(),
        TimeDelta::zero(),
    );
    assert_relative_eq!(mapper.time_to_screen_y(t0() - TimeDelta::hours(1)), 40.0);
    assert_eq!(mapper.screen_y_to_time(90.0), t0());
}
