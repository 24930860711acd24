use serde::{Deserialize, Serialize};

use crate::core::{ValueRange, ViewportMapper};
use crate::render::{CanvasLayerKind, Color, Shape, ShapeStyle};

/// Telemetry flavor of a waterfall viewport.
///
/// Every kind shares the same state machine and drawing algorithm; the kind
/// only selects a [`VariantDescriptor`] and an optional overlay hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WaterfallKind {
    Bearing,
    Range,
    Frequency,
    BitRate,
    #[default]
    Generic,
}

/// Small per-variant constants used when a series has no explicit style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantDescriptor {
    pub kind: WaterfallKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub marker_color: Color,
    pub point_size: f64,
    pub default_value_range: ValueRange,
}

impl WaterfallKind {
    #[must_use]
    pub fn descriptor(self) -> VariantDescriptor {
        match self {
            Self::Bearing => VariantDescriptor {
                kind: self,
                label: "Bearing",
                unit: "deg",
                marker_color: Color::rgb(0.2, 0.9, 0.3),
                point_size: 4.0,
                default_value_range: ValueRange::new(-180.0, 180.0),
            },
            Self::Range => VariantDescriptor {
                kind: self,
                label: "Range",
                unit: "m",
                marker_color: Color::rgb(0.95, 0.8, 0.2),
                point_size: 4.0,
                default_value_range: ValueRange::new(0.0, 10_000.0),
            },
            Self::Frequency => VariantDescriptor {
                kind: self,
                label: "Frequency",
                unit: "Hz",
                marker_color: Color::rgb(0.2, 0.8, 0.95),
                point_size: 3.0,
                default_value_range: ValueRange::new(0.0, 1_000.0),
            },
            Self::BitRate => VariantDescriptor {
                kind: self,
                label: "Bit rate",
                unit: "bit/s",
                marker_color: Color::rgb(0.9, 0.3, 0.9),
                point_size: 3.0,
                default_value_range: ValueRange::new(0.0, 1_000_000.0),
            },
            Self::Generic => VariantDescriptor {
                kind: self,
                label: "Value",
                unit: "",
                marker_color: Color::rgb(0.9, 0.9, 0.9),
                point_size: 3.0,
                default_value_range: ValueRange::new(0.0, 1.0),
            },
        }
    }

    /// Overlay hook installed when a viewport of this kind is created.
    #[must_use]
    pub fn default_overlay_hook(self) -> Option<Box<dyn OverlayHook>> {
        match self {
            Self::Bearing => Some(Box::new(ReferenceLineHook::new(
                0.0,
                Color::rgba(0.8, 0.8, 0.8, 0.6),
            ))),
            _ => None,
        }
    }
}

/// Strategy object adding variant-specific shapes to the static overlay
/// layer. Called once per full redraw.
pub trait OverlayHook {
    fn overlay_shapes(&self, mapper: &ViewportMapper) -> Vec<Shape>;
}

/// Dashed vertical line marking one value, e.g. bearing 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLineHook {
    pub value: f64,
    pub color: Color,
}

impl ReferenceLineHook {
    #[must_use]
    pub fn new(value: f64, color: Color) -> Self {
        Self { value, color }
    }
}

impl OverlayHook for ReferenceLineHook {
    fn overlay_shapes(&self, mapper: &ViewportMapper) -> Vec<Shape> {
        if mapper.is_value_degenerate() {
            return Vec::new();
        }
        let rect = mapper.rect();
        let x = mapper.value_to_screen_x(self.value);
        if x < rect.left || x > rect.right() {
            return Vec::new();
        }
        vec![Shape::line(
            x,
            rect.top,
            x,
            rect.bottom(),
            CanvasLayerKind::Overlay.z(),
            ShapeStyle::stroke(self.color, 1.0).with_dash(&[6.0, 4.0]),
        )]
    }
}

/// How a series is turned into shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeriesDrawMode {
    /// One glyph per sample, down-sampled when dense.
    #[default]
    Markers,
    /// One polyline through the visible samples in time order.
    Line,
}

/// Per-series presentation overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub point_size: Option<f64>,
    #[serde(default)]
    pub mode: SeriesDrawMode,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: None,
            point_size: None,
            mode: SeriesDrawMode::Markers,
            visible: true,
        }
    }
}

impl SeriesStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_point_size(mut self, point_size: f64) -> Self {
        self.point_size = Some(point_size);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SeriesDrawMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

fn default_visible() -> bool {
    true
}
