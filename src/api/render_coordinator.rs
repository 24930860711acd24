use tracing::{debug, trace, warn};

use crate::core::{Sample, Series, bin_by_time, samples_in_time_window};
use crate::render::{CanvasLayerKind, Color, DrawingSurface, Shape, ShapeId, ShapeStyle};

use super::{RenderPass, RenderState, SeriesDrawMode, SeriesStyle, WaterfallEvent, WaterfallViewport};

const BACKGROUND_COLOR: Color = Color::rgb(0.04, 0.06, 0.09);
const GRID_COLOR: Color = Color::rgba(0.55, 0.6, 0.65, 0.35);
const SELECTION_FILL: Color = Color::rgba(0.3, 0.6, 1.0, 0.2);
const SELECTION_STROKE: Color = Color::rgba(0.3, 0.6, 1.0, 0.9);
const GRID_DASH: [f64; 2] = [2.0, 4.0];

/// Result of one [`WaterfallViewport::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No work was pending.
    Clean,
    /// Another pass was already running on this viewport.
    Skipped,
    Rendered {
        state: RenderState,
        series_redrawn: usize,
    },
}

impl<S: DrawingSurface> WaterfallViewport<S> {
    /// Runs the pending render pass.
    ///
    /// - `RangeUpdateOnly`: rescans ranges; every visible series is redrawn
    ///   when the displayed value range moved
    /// - `IncrementalUpdate`: additionally replaces the shapes of dirty series
    /// - `FullRedraw`: clears the surface and rebuilds every layer
    ///
    /// The in-progress flag stays set through listener dispatch, so a host
    /// that reaches back into the viewport through interior mutability gets
    /// [`RenderOutcome::Skipped`].
    pub fn render(&mut self) -> RenderOutcome {
        if self.redraw_in_progress {
            warn!("rejected re-entrant redraw");
            return RenderOutcome::Skipped;
        }
        if self.render_state.pending_state() == RenderState::Clean {
            return RenderOutcome::Clean;
        }

        self.redraw_in_progress = true;
        let pass = self.render_state.take_pass();
        let state = pass.state;
        let series_redrawn = match state {
            RenderState::Clean => 0,
            RenderState::RangeUpdateOnly | RenderState::IncrementalUpdate => {
                self.partial_redraw(pass)
            }
            RenderState::FullRedraw => self.full_redraw(),
        };
        self.emit(WaterfallEvent::Rendered {
            state,
            series_redrawn,
        });
        self.redraw_in_progress = false;

        RenderOutcome::Rendered {
            state,
            series_redrawn,
        }
    }

    fn full_redraw(&mut self) -> usize {
        debug!(
            series_count = self.store.len(),
            total_samples = self.store.total_samples(),
            "full redraw"
        );
        self.surface.clear();
        self.series_shapes.clear();
        self.static_shapes.clear();
        self.hook_shapes.clear();
        self.selection_shape = None;
        self.overlay.reset_after_clear();

        self.refresh_ranges();
        self.draw_static_layers();
        self.draw_overlay_hook();

        let names: Vec<String> = self.store.series_names().map(str::to_owned).collect();
        let mut series_redrawn = 0;
        for name in &names {
            if self.draw_series(name) {
                series_redrawn += 1;
            }
        }

        self.redraw_selection_shape();
        series_redrawn
    }

    fn partial_redraw(&mut self, pass: RenderPass) -> usize {
        let mut targets = pass.dirty;
        if pass.range_update && self.refresh_ranges() {
            targets.extend(self.store.series_names().map(str::to_owned));
            self.draw_overlay_hook();
        }
        trace!(
            state = ?pass.state,
            targets = targets.len(),
            "partial redraw"
        );

        let mut series_redrawn = 0;
        for name in &targets {
            self.remove_series_shapes(name);
            if self.draw_series(name) {
                series_redrawn += 1;
            }
        }
        series_redrawn
    }

    /// Rescans the store and returns whether the displayed value range moved.
    fn refresh_ranges(&mut self) -> bool {
        self.data_value_range = self.store.combined_value_range();
        let changed = self.state.apply_data_range(self.data_value_range);
        if changed {
            let displayed = self.state.displayed_value_range();
            debug!(
                min = displayed.min,
                max = displayed.max,
                "displayed value range changed"
            );
        }
        changed
    }

    fn draw_static_layers(&mut self) {
        let rect = self.config.rect;
        let grid = self.config.grid;
        let mut shapes = vec![Shape::rect(
            rect.left,
            rect.top,
            rect.width,
            rect.height,
            CanvasLayerKind::Background.z(),
            ShapeStyle::fill(BACKGROUND_COLOR),
        )];

        if grid.visible {
            let style = ShapeStyle::stroke(GRID_COLOR, 1.0).with_dash(&GRID_DASH);
            let z = CanvasLayerKind::Grid.z();
            for step in 1..grid.time_divisions {
                let y = rect.top + rect.height * f64::from(step) / f64::from(grid.time_divisions);
                shapes.push(Shape::line(rect.left, y, rect.right(), y, z, style.clone()));
            }
            for step in 1..grid.value_divisions {
                let x = rect.left + rect.width * f64::from(step) / f64::from(grid.value_divisions);
                shapes.push(Shape::line(x, rect.top, x, rect.bottom(), z, style.clone()));
            }
        }

        for shape in shapes {
            if let Some(id) = self.insert_shape(shape) {
                self.static_shapes.push(id);
            }
        }
    }

    fn draw_overlay_hook(&mut self) {
        for id in std::mem::take(&mut self.hook_shapes) {
            self.surface.remove(id);
        }
        let shapes = match &self.overlay_hook {
            Some(hook) => hook.overlay_shapes(&self.mapper()),
            None => return,
        };
        for shape in shapes {
            if let Some(id) = self.insert_shape(shape) {
                self.hook_shapes.push(id);
            }
        }
    }

    /// Draws one series from scratch. Returns `false` when it is hidden or
    /// unknown.
    fn draw_series(&mut self, name: &str) -> bool {
        let style = self.series_style(name);
        if !style.visible {
            return false;
        }
        let Some(series) = self.store.series(name) else {
            return false;
        };
        let shapes = self.build_series_shapes(series, style);

        let mut ids = Vec::with_capacity(shapes.len());
        for shape in shapes {
            if let Some(id) = self.insert_shape(shape) {
                ids.push(id);
            }
        }
        trace!(series = name, shapes = ids.len(), "series drawn");
        self.series_shapes.insert(name.to_owned(), ids);
        true
    }

    fn build_series_shapes(&self, series: &Series, style: SeriesStyle) -> Vec<Shape> {
        let mapper = self.mapper();
        let mut visible = samples_in_time_window(series, mapper.time_min(), mapper.time_max());
        if visible.is_empty() {
            return Vec::new();
        }

        let color = style.color.unwrap_or(self.descriptor.marker_color);
        let point_size = style.point_size.unwrap_or(self.descriptor.point_size);
        let radius = point_size / 2.0;
        let z = CanvasLayerKind::Series.z();
        let rect = mapper.rect();

        match style.mode {
            SeriesDrawMode::Markers => {
                if visible.len() > self.config.max_markers_per_series {
                    visible = self.downsample(&visible);
                }
                mapper
                    .project(&visible)
                    .into_iter()
                    .filter(|(x, _)| *x >= rect.left && *x <= rect.right())
                    .map(|(x, y)| Shape::ellipse(x, y, radius, radius, z, ShapeStyle::fill(color)))
                    .collect()
            }
            SeriesDrawMode::Line => {
                visible.sort_by_key(|sample| sample.timestamp);
                let points: Vec<(f64, f64)> = mapper
                    .project(&visible)
                    .into_iter()
                    .map(|(x, y)| (x.clamp(rect.left, rect.right()), y))
                    .collect();
                if let [(x, y)] = points[..] {
                    return vec![Shape::ellipse(x, y, radius, radius, z, ShapeStyle::fill(color))];
                }
                vec![Shape::path(
                    points,
                    z,
                    ShapeStyle::stroke(color, radius.max(1.0)),
                )]
            }
        }
    }

    fn downsample(&self, samples: &[Sample]) -> Vec<Sample> {
        let markers = i32::try_from(self.config.max_markers_per_series).unwrap_or(i32::MAX);
        let bucket = self.state.time_window() / markers;
        let (values, timestamps): (Vec<_>, Vec<_>) = samples
            .iter()
            .map(|sample| (sample.value, sample.timestamp))
            .unzip();
        let binned = bin_by_time(&values, &timestamps, bucket, self.config.bin_strategy);
        trace!(
            input = samples.len(),
            output = binned.len(),
            "down-sampled dense series"
        );
        binned
    }

    fn remove_series_shapes(&mut self, name: &str) {
        if let Some(ids) = self.series_shapes.shift_remove(name) {
            for id in ids {
                self.surface.remove(id);
            }
        }
    }

    /// Replaces the selection rectangle shape with the controller's current one.
    pub(super) fn redraw_selection_shape(&mut self) {
        if let Some(id) = self.selection_shape.take() {
            self.surface.remove(id);
        }
        if let Some(rect) = self.selection.rect() {
            let shape = Shape::rect(
                rect.left,
                rect.top,
                rect.width,
                rect.height,
                CanvasLayerKind::Selection.z(),
                ShapeStyle::stroke(SELECTION_STROKE, 1.0).with_fill(SELECTION_FILL),
            );
            self.selection_shape = self.insert_shape(shape);
        }
    }

    pub(super) fn insert_shape(&mut self, shape: Shape) -> Option<ShapeId> {
        match shape.validate() {
            Ok(()) => Some(self.surface.insert(shape)),
            Err(err) => {
                warn!(error = %err, z = shape.z, "skipping invalid shape");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::RenderOutcome;
    use crate::api::{RenderState, WaterfallConfig, WaterfallKind, WaterfallViewport};
    use crate::core::ScreenRect;
    use crate::render::RecordingSurface;

    #[test]
    fn pass_in_progress_rejects_nested_render() {
        let config = WaterfallConfig::new(ScreenRect::from_size(100.0, 100.0), WaterfallKind::Generic)
            .with_time_max(DateTime::<Utc>::UNIX_EPOCH);
        let mut viewport =
            WaterfallViewport::new(RecordingSurface::new(), config).expect("viewport init");

        viewport.redraw_in_progress = true;
        assert_eq!(viewport.render(), RenderOutcome::Skipped);
        assert_eq!(viewport.pending_render_state(), RenderState::FullRedraw);
        assert_eq!(viewport.surface().clear_count, 0);

        viewport.redraw_in_progress = false;
        assert!(matches!(viewport.render(), RenderOutcome::Rendered { .. }));
        assert!(!viewport.redraw_in_progress);
    }
}
