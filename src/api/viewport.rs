use indexmap::IndexMap;
use tracing::debug;

use crate::core::{ScreenRect, TimeSeriesStore, ValueRange, ViewportMapper, ViewportState};
use crate::error::WaterfallResult;
use crate::interaction::{
    CrosshairState, PointerState, SelectionController, SharedCursor, SharedCursorState,
    ThresholdGate,
};
use crate::render::{DrawingSurface, ShapeId};

use super::cursor_overlay::CursorOverlay;
use super::{
    OverlayHook, RenderState, RenderStateMachine, SeriesStyle, VariantDescriptor,
    WaterfallConfig, WaterfallEvent, WaterfallKind, WaterfallListener,
};

/// Composition root of one waterfall display.
///
/// Owns the series store, the displayed window, the render state machine and
/// the interaction controllers, and draws into a host-provided
/// [`DrawingSurface`]. Time runs top (newest, `time_max`) to bottom (oldest,
/// `time_min`); values run left to right.
///
/// Mutations only schedule work. Call [`WaterfallViewport::render`] to run
/// the pending pass and [`WaterfallViewport::on_tick`] at the overlay rate to
/// refresh the cursor layer.
pub struct WaterfallViewport<S: DrawingSurface> {
    pub(super) surface: S,
    pub(super) config: WaterfallConfig,
    pub(super) descriptor: VariantDescriptor,
    pub(super) state: ViewportState,
    pub(super) store: TimeSeriesStore,
    pub(super) styles: IndexMap<String, SeriesStyle>,
    pub(super) render_state: RenderStateMachine,
    /// Combined value range scanned at the start of the last pass.
    pub(super) data_value_range: ValueRange,
    pub(super) redraw_in_progress: bool,
    pub(super) series_shapes: IndexMap<String, Vec<ShapeId>>,
    pub(super) static_shapes: Vec<ShapeId>,
    pub(super) hook_shapes: Vec<ShapeId>,
    pub(super) selection: SelectionController,
    pub(super) selection_shape: Option<ShapeId>,
    pub(super) pointer: PointerState,
    pub(super) cursor: SharedCursor,
    /// Last cursor state this viewport's pointer wrote to the group.
    pub(super) published_cursor: Option<SharedCursorState>,
    pub(super) cursor_gate: ThresholdGate,
    pub(super) crosshair_gate: ThresholdGate,
    pub(super) overlay: CursorOverlay,
    pub(super) overlay_hook: Option<Box<dyn OverlayHook>>,
    pub(super) listeners: Vec<Box<dyn WaterfallListener>>,
}

impl<S: DrawingSurface> WaterfallViewport<S> {
    /// Creates a viewport with its own cursor group and an empty store.
    ///
    /// The first [`render`](Self::render) performs a full redraw.
    pub fn new(surface: S, config: WaterfallConfig) -> WaterfallResult<Self> {
        config.validate()?;
        let descriptor = config.kind.descriptor();
        let mut state = ViewportState::new(
            config.time_window(),
            config.initial_time_max(),
            config.resolved_custom_value_range(),
        )?;
        state.set_auto_range(config.auto_range);
        state.set_range_limiting(config.range_limit_enabled);

        let mut render_state = RenderStateMachine::new();
        render_state.force_full_redraw(std::iter::empty());

        debug!(
            kind = ?config.kind,
            width = config.rect.width,
            height = config.rect.height,
            time_window_secs = config.time_window_secs,
            "created waterfall viewport"
        );

        Ok(Self {
            surface,
            descriptor,
            state,
            store: TimeSeriesStore::new(),
            styles: IndexMap::new(),
            render_state,
            data_value_range: ValueRange::EMPTY,
            redraw_in_progress: false,
            series_shapes: IndexMap::new(),
            static_shapes: Vec::new(),
            hook_shapes: Vec::new(),
            selection: SelectionController::default(),
            selection_shape: None,
            pointer: PointerState::default(),
            cursor: SharedCursor::new(),
            published_cursor: None,
            cursor_gate: ThresholdGate::new(config.cursor_threshold_px),
            crosshair_gate: ThresholdGate::new(config.cursor_threshold_px),
            overlay: CursorOverlay::default(),
            overlay_hook: config.kind.default_overlay_hook(),
            listeners: Vec::new(),
            config,
        })
    }

    /// Joins the cursor group behind `cursor`.
    #[must_use]
    pub fn with_shared_cursor(mut self, cursor: SharedCursor) -> Self {
        self.set_shared_cursor(cursor);
        self
    }

    pub fn set_shared_cursor(&mut self, cursor: SharedCursor) {
        self.cursor = cursor;
        self.published_cursor = None;
        self.overlay.invalidate();
    }

    /// Handle of this viewport's cursor group; clone it into other viewports.
    #[must_use]
    pub fn shared_cursor(&self) -> SharedCursor {
        self.cursor.clone()
    }

    pub fn add_listener(&mut self, listener: impl WaterfallListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the variant overlay hook; `None` removes it.
    pub fn set_overlay_hook(&mut self, hook: Option<Box<dyn OverlayHook>>) {
        self.overlay_hook = hook;
        self.request_full_redraw();
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    #[must_use]
    pub fn config(&self) -> &WaterfallConfig {
        &self.config
    }

    #[must_use]
    pub fn kind(&self) -> WaterfallKind {
        self.config.kind
    }

    #[must_use]
    pub fn descriptor(&self) -> VariantDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    #[must_use]
    pub fn screen_rect(&self) -> ScreenRect {
        self.config.rect
    }

    #[must_use]
    pub fn mapper(&self) -> ViewportMapper {
        self.state.mapper(self.config.rect)
    }

    #[must_use]
    pub fn pending_render_state(&self) -> RenderState {
        self.render_state.pending_state()
    }

    #[must_use]
    pub fn render_state_machine(&self) -> &RenderStateMachine {
        &self.render_state
    }

    /// Combined value range of the store as of the last pass.
    #[must_use]
    pub fn data_value_range(&self) -> ValueRange {
        self.data_value_range
    }

    #[must_use]
    pub fn series_style(&self, name: &str) -> SeriesStyle {
        self.styles.get(name).copied().unwrap_or_default()
    }

    /// Surface ids currently drawn for a series.
    #[must_use]
    pub fn series_shape_ids(&self, name: &str) -> &[ShapeId] {
        match self.series_shapes.get(name) {
            Some(ids) => ids,
            None => &[],
        }
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    #[must_use]
    pub fn selection_rect(&self) -> Option<ScreenRect> {
        self.selection.rect()
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Cursor and crosshair lines shown by the last overlay tick.
    #[must_use]
    pub fn displayed_crosshair(&self) -> CrosshairState {
        self.overlay.drawn()
    }

    /// Name of the topmost series drawn under a point.
    #[must_use]
    pub fn series_at(&self, x: f64, y: f64) -> Option<&str> {
        self.surface.hit_test(x, y).into_iter().find_map(|id| {
            self.series_shapes
                .iter()
                .find(|(_, ids)| ids.contains(&id))
                .map(|(name, _)| name.as_str())
        })
    }

    pub(super) fn request_full_redraw(&mut self) {
        self.render_state
            .force_full_redraw(self.store.series_names());
    }

    pub(super) fn emit(&mut self, event: WaterfallEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}
