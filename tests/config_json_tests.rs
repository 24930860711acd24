use chrono::{DateTime, TimeDelta, Utc};
use waterfall_rs::api::{GridConfig, WaterfallConfig, WaterfallKind, WaterfallViewport};
use waterfall_rs::core::{BinStrategy, ScreenRect, ValueRange};
use waterfall_rs::render::RecordingSurface;
use waterfall_rs::WaterfallError;

#[test]
fn config_survives_json_round_trip() {
    let time_max = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(20_100);
    let config = WaterfallConfig::new(ScreenRect::new(10.0, 20.0, 640.0, 480.0), WaterfallKind::Frequency)
        .with_time_window_secs(120.0)
        .with_time_max(time_max)
        .with_custom_value_range(50.0, 500.0)
        .with_auto_range(true)
        .with_range_limiting(true)
        .with_grid(GridConfig {
            visible: true,
            time_divisions: 12,
            value_divisions: 8,
        })
        .with_max_markers_per_series(500)
        .with_bin_strategy(BinStrategy::Mean)
        .with_cursor_threshold_px(2.5);

    let json = config.to_json_pretty().expect("serialize");
    let restored = WaterfallConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
    assert_eq!(restored.time_window(), TimeDelta::minutes(2));
}

#[test]
fn viewport_uses_variant_defaults_when_config_is_sparse() {
    let config = WaterfallConfig::from_json_str(
        r#"{ "rect": { "left": 0.0, "top": 0.0, "width": 300.0, "height": 200.0 }, "kind": "BitRate" }"#,
    )
    .expect("parse");
    let viewport = WaterfallViewport::new(RecordingSurface::new(), config).expect("viewport init");

    assert_eq!(viewport.kind(), WaterfallKind::BitRate);
    assert_eq!(
        viewport.state().custom_value_range(),
        ValueRange::new(0.0, 1_000_000.0)
    );
    assert_eq!(viewport.state().time_max(), DateTime::<Utc>::UNIX_EPOCH);
    assert!(!viewport.state().auto_range());
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_width = WaterfallConfig::new(ScreenRect::from_size(0.0, 100.0), WaterfallKind::Generic);
    let err = WaterfallViewport::new(RecordingSurface::new(), zero_width)
        .err()
        .expect("zero width must fail");
    assert!(matches!(err, WaterfallError::InvalidViewport { .. }));

    let negative_window = r#"{ "rect": { "left": 0.0, "top": 0.0, "width": 10.0, "height": 10.0 }, "time_window_secs": -5.0 }"#;
    let err = WaterfallConfig::from_json_str(negative_window).expect_err("negative window");
    assert!(matches!(err, WaterfallError::InvalidData(_)));

    let bad_grid = WaterfallConfig::new(ScreenRect::from_size(10.0, 10.0), WaterfallKind::Generic)
        .with_grid(GridConfig {
            visible: true,
            time_divisions: 1_000,
            value_divisions: 4,
        });
    assert!(bad_grid.validate().is_err());
}
