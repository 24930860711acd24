use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, Utc};
use waterfall_rs::api::{WaterfallConfig, WaterfallEvent, WaterfallKind, WaterfallViewport};
use waterfall_rs::core::ScreenRect;
use waterfall_rs::interaction::{SharedCursor, TimeSelection};
use waterfall_rs::render::{CanvasLayerKind, RecordingSurface};

fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(19_600)
}

fn viewport_with_window(window_secs: f64) -> WaterfallViewport<RecordingSurface> {
    let config = WaterfallConfig::new(ScreenRect::from_size(400.0, 300.0), WaterfallKind::Range)
        .with_time_window_secs(window_secs)
        .with_time_max(t0() + TimeDelta::minutes(15));
    let mut viewport =
        WaterfallViewport::new(RecordingSurface::new(), config).expect("viewport init");
    viewport.render();
    viewport
}

fn record_events(
    viewport: &mut WaterfallViewport<RecordingSurface>,
) -> Rc<RefCell<Vec<WaterfallEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    viewport.add_listener(move |event: &WaterfallEvent| sink.borrow_mut().push(*event));
    events
}

fn selections(events: &[WaterfallEvent]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    events
        .iter()
        .filter_map(|event| match event {
            WaterfallEvent::SelectionFinalized { start, end } => Some((*start, *end)),
            _ => None,
        })
        .collect()
}

#[test]
fn drag_selection_emits_time_range_and_clears_visuals() {
    let mut viewport = viewport_with_window(900.0);
    let events = record_events(&mut viewport);

    assert!(viewport.pointer_press(100.0, 50.0));
    assert_eq!(
        viewport
            .surface()
            .count_in_layer(CanvasLayerKind::Selection),
        1
    );
    viewport.pointer_move(120.0, 150.0);
    assert_eq!(
        viewport.selection_rect(),
        Some(ScreenRect::new(100.0, 50.0, 20.0, 100.0))
    );
    assert_eq!(
        viewport
            .surface()
            .count_in_layer(CanvasLayerKind::Selection),
        1
    );

    let selection = viewport.pointer_release(120.0, 150.0);
    assert_eq!(
        selection,
        Some(TimeSelection {
            start: t0() + TimeDelta::seconds(450),
            end: t0() + TimeDelta::seconds(750),
        })
    );
    assert_eq!(
        selections(&events.borrow()),
        vec![(t0() + TimeDelta::seconds(450), t0() + TimeDelta::seconds(750))]
    );
    assert!(!viewport.is_selecting());
    assert_eq!(
        viewport
            .surface()
            .count_in_layer(CanvasLayerKind::Selection),
        0
    );
}

#[test]
fn zero_height_selection_is_suppressed() {
    let mut viewport = viewport_with_window(900.0);
    let events = record_events(&mut viewport);

    viewport.pointer_press(100.0, 80.0);
    assert_eq!(viewport.pointer_release(300.0, 80.0), None);
    assert!(selections(&events.borrow()).is_empty());
    assert_eq!(
        viewport
            .surface()
            .count_in_layer(CanvasLayerKind::Selection),
        0
    );
}

#[test]
fn pointer_leave_cancels_selection_without_event() {
    let mut viewport = viewport_with_window(900.0);
    let events = record_events(&mut viewport);

    viewport.pointer_press(100.0, 50.0);
    viewport.pointer_move(150.0, 200.0);
    viewport.pointer_leave();

    assert!(!viewport.is_selecting());
    assert!(viewport.selection_rect().is_none());
    assert_eq!(
        viewport
            .surface()
            .count_in_layer(CanvasLayerKind::Selection),
        0
    );
    assert_eq!(viewport.pointer_release(150.0, 200.0), None);
    assert!(selections(&events.borrow()).is_empty());
    assert!(events.borrow().contains(&WaterfallEvent::CursorCleared));
}

#[test]
fn press_outside_drawing_area_does_not_select() {
    let mut viewport = viewport_with_window(900.0);
    assert!(!viewport.pointer_press(500.0, 50.0));
    assert!(!viewport.is_selecting());
}

#[test]
fn cursor_events_are_rate_limited_by_pixel_threshold() {
    let mut viewport = viewport_with_window(900.0);
    let events = record_events(&mut viewport);

    viewport.pointer_move(100.0, 150.0);
    viewport.pointer_move(100.5, 150.4);
    viewport.pointer_move(100.0, 152.0);

    let cursor_moves: Vec<f64> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            WaterfallEvent::CursorTimeChanged { screen_y, .. } => Some(*screen_y),
            _ => None,
        })
        .collect();
    assert_eq!(cursor_moves, vec![150.0, 152.0]);

    let crosshair_moves = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, WaterfallEvent::CrosshairXChanged { .. }))
        .count();
    assert_eq!(crosshair_moves, 1);

    match events.borrow().first() {
        Some(WaterfallEvent::CursorTimeChanged { time, .. }) => {
            assert_eq!(*time, t0() + TimeDelta::seconds(450));
        }
        other => panic!("unexpected first event {other:?}"),
    }
}

#[test]
fn cursor_is_shared_across_viewports_with_different_windows() {
    let mut source = viewport_with_window(900.0);
    let mut follower = viewport_with_window(1_800.0).with_shared_cursor(source.shared_cursor());
    assert!(source.shared_cursor().same_group(&follower.shared_cursor()));

    source.pointer_move(100.0, 150.0);
    assert!(follower.on_tick());
    let crosshair = follower.displayed_crosshair();
    // 450 s old in an 1800 s window over 300 px
    assert_relative_eq!(crosshair.cursor_y.expect("cursor line"), 75.0);
    assert_eq!(crosshair.crosshair_x, None);
    assert_eq!(
        follower
            .surface()
            .count_in_layer(CanvasLayerKind::Cursor),
        2
    );
    assert!(!follower.on_tick(), "unchanged state must not touch the surface");

    assert!(source.on_tick());
    let local = source.displayed_crosshair();
    assert_relative_eq!(local.cursor_y.expect("cursor line"), 150.0);
    assert_eq!(local.crosshair_x, Some(100.0));

    source.pointer_leave();
    assert!(follower.on_tick());
    assert!(follower.displayed_crosshair().is_empty());
    assert_eq!(
        follower
            .surface()
            .count_in_layer(CanvasLayerKind::Cursor),
        0
    );
}

#[test]
fn leaving_keeps_a_cursor_time_written_later_by_another_viewport() {
    let mut first = viewport_with_window(900.0);
    let second = viewport_with_window(900.0).with_shared_cursor(first.shared_cursor());

    first.pointer_move(100.0, 100.0);
    let later = t0() - TimeDelta::minutes(3);
    second.shared_cursor().set_time(later);
    first.pointer_move(900.0, 100.0);
    assert_eq!(second.shared_cursor().time(), Some(later));

    first.pointer_move(100.0, 100.0);
    first.pointer_leave();
    assert_eq!(second.shared_cursor().time(), None);
}

#[test]
fn external_cursor_time_is_drawn_only_inside_the_window() {
    let cursor = SharedCursor::new();
    let mut viewport = viewport_with_window(900.0).with_shared_cursor(cursor.clone());

    viewport.set_cursor_time(Some(t0() - TimeDelta::hours(1)));
    viewport.on_tick();
    assert_eq!(viewport.displayed_crosshair().cursor_y, None);

    cursor.set_time(t0() + TimeDelta::minutes(5));
    assert!(viewport.on_tick());
    assert_relative_eq!(
        viewport
            .displayed_crosshair()
            .cursor_y
            .expect("cursor line"),
        200.0
    );

    viewport.set_cursor_time(None);
    assert!(viewport.on_tick());
    assert!(viewport.displayed_crosshair().is_empty());
}

#[test]
fn full_redraw_restores_the_cursor_layer_on_next_tick() {
    let mut viewport = viewport_with_window(900.0);
    viewport.set_cursor_time(Some(t0() + TimeDelta::minutes(10)));
    assert!(viewport.on_tick());
    assert_eq!(viewport.surface().count_in_layer(CanvasLayerKind::Cursor), 2);

    viewport.set_time_max(t0() + TimeDelta::minutes(16));
    viewport.render();
    assert_eq!(viewport.surface().count_in_layer(CanvasLayerKind::Cursor), 0);

    assert!(viewport.on_tick());
    assert_eq!(viewport.surface().count_in_layer(CanvasLayerKind::Cursor), 2);
}
