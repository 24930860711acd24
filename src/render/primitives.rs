use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{WaterfallError, WaterfallResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> WaterfallResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(WaterfallError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Dash lengths in pixels; empty means a solid stroke.
pub type DashPattern = SmallVec<[f64; 4]>;

/// Stroke and fill applied to one inserted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub dash: DashPattern,
}

impl ShapeStyle {
    #[must_use]
    pub fn stroke(color: Color, stroke_width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            stroke_width,
            dash: DashPattern::new(),
        }
    }

    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            stroke_width: 0.0,
            dash: DashPattern::new(),
        }
    }

    #[must_use]
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = DashPattern::from_slice(dash);
        self
    }

    pub fn validate(&self) -> WaterfallResult<()> {
        if self.stroke.is_none() && self.fill.is_none() {
            return Err(WaterfallError::InvalidData(
                "shape style needs a stroke or a fill".to_owned(),
            ));
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
            if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
                return Err(WaterfallError::InvalidData(
                    "stroke width must be finite and > 0".to_owned(),
                ));
            }
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if self
            .dash
            .iter()
            .any(|segment| !segment.is_finite() || *segment <= 0.0)
        {
            return Err(WaterfallError::InvalidData(
                "dash segments must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Geometry of one drawing-surface primitive in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Path {
        points: Vec<(f64, f64)>,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font_size_px: f64,
    },
}

impl ShapeKind {
    fn coordinates_finite(&self) -> bool {
        match self {
            Self::Line { x1, y1, x2, y2 } => [x1, y1, x2, y2].iter().all(|v| v.is_finite()),
            Self::Rect {
                x,
                y,
                width,
                height,
            } => [x, y, width, height].iter().all(|v| v.is_finite()),
            Self::Ellipse { cx, cy, rx, ry } => [cx, cy, rx, ry].iter().all(|v| v.is_finite()),
            Self::Path { points } => points.iter().all(|(x, y)| x.is_finite() && y.is_finite()),
            Self::Text {
                x, y, font_size_px, ..
            } => [x, y, font_size_px].iter().all(|v| v.is_finite()),
        }
    }
}

/// Draw command inserted into a [`crate::render::DrawingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Stacking order; higher values draw on top.
    pub z: f64,
    pub style: ShapeStyle,
}

impl Shape {
    #[must_use]
    pub fn new(kind: ShapeKind, z: f64, style: ShapeStyle) -> Self {
        Self { kind, z, style }
    }

    #[must_use]
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, z: f64, style: ShapeStyle) -> Self {
        Self::new(ShapeKind::Line { x1, y1, x2, y2 }, z, style)
    }

    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64, z: f64, style: ShapeStyle) -> Self {
        Self::new(
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
            },
            z,
            style,
        )
    }

    #[must_use]
    pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, z: f64, style: ShapeStyle) -> Self {
        Self::new(ShapeKind::Ellipse { cx, cy, rx, ry }, z, style)
    }

    #[must_use]
    pub fn path(points: Vec<(f64, f64)>, z: f64, style: ShapeStyle) -> Self {
        Self::new(ShapeKind::Path { points }, z, style)
    }

    #[must_use]
    pub fn text(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        z: f64,
        style: ShapeStyle,
    ) -> Self {
        Self::new(
            ShapeKind::Text {
                text: text.into(),
                x,
                y,
                font_size_px,
            },
            z,
            style,
        )
    }

    pub fn validate(&self) -> WaterfallResult<()> {
        if !self.z.is_finite() {
            return Err(WaterfallError::InvalidData(
                "shape z-value must be finite".to_owned(),
            ));
        }
        if !self.kind.coordinates_finite() {
            return Err(WaterfallError::InvalidData(
                "shape coordinates must be finite".to_owned(),
            ));
        }
        match &self.kind {
            ShapeKind::Rect { width, height, .. } if *width < 0.0 || *height < 0.0 => {
                return Err(WaterfallError::InvalidData(
                    "rect size must be >= 0".to_owned(),
                ));
            }
            ShapeKind::Ellipse { rx, ry, .. } if *rx <= 0.0 || *ry <= 0.0 => {
                return Err(WaterfallError::InvalidData(
                    "ellipse radii must be > 0".to_owned(),
                ));
            }
            ShapeKind::Path { points } if points.len() < 2 => {
                return Err(WaterfallError::InvalidData(
                    "path needs at least two points".to_owned(),
                ));
            }
            ShapeKind::Text {
                text, font_size_px, ..
            } if text.is_empty() || *font_size_px <= 0.0 => {
                return Err(WaterfallError::InvalidData(
                    "text must be non-empty with a font size > 0".to_owned(),
                ));
            }
            _ => {}
        }
        self.style.validate()
    }

    /// Whether the point touches the shape, with `tolerance` extra pixels
    /// around strokes.
    #[must_use]
    pub fn hit(&self, px: f64, py: f64, tolerance: f64) -> bool {
        let half_stroke = self.style.stroke_width / 2.0 + tolerance;
        match &self.kind {
            ShapeKind::Line { x1, y1, x2, y2 } => {
                distance_to_segment(px, py, *x1, *y1, *x2, *y2) <= half_stroke
            }
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
            } => {
                px >= x - half_stroke
                    && px <= x + width + half_stroke
                    && py >= y - half_stroke
                    && py <= y + height + half_stroke
            }
            ShapeKind::Ellipse { cx, cy, rx, ry } => {
                let rx = rx + half_stroke;
                let ry = ry + half_stroke;
                let dx = (px - cx) / rx;
                let dy = (py - cy) / ry;
                dx * dx + dy * dy <= 1.0
            }
            ShapeKind::Path { points } => points.windows(2).any(|segment| {
                let (x1, y1) = segment[0];
                let (x2, y2) = segment[1];
                distance_to_segment(px, py, x1, y1, x2, y2) <= half_stroke
            }),
            ShapeKind::Text {
                text,
                x,
                y,
                font_size_px,
            } => {
                // approximate advance of 0.6em per character, baseline at `y`
                let width = text.chars().count() as f64 * font_size_px * 0.6;
                px >= x - tolerance
                    && px <= x + width + tolerance
                    && py >= y - font_size_px - tolerance
                    && py <= y + tolerance
            }
        }
    }
}

fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
    }
    let t = (((px - x1) * dx + (py - y1) * dy) / length_sq).clamp(0.0, 1.0);
    let cx = x1 + t * dx;
    let cy = y1 + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{Color, Shape, ShapeStyle};

    #[test]
    fn validate_rejects_non_finite_geometry_and_empty_style() {
        let style = ShapeStyle::stroke(Color::rgb(1.0, 0.0, 0.0), 1.0);
        assert!(Shape::line(0.0, 0.0, 1.0, f64::NAN, 1.0, style.clone()).validate().is_err());
        assert!(Shape::line(0.0, 0.0, 1.0, 1.0, 1.0, style.clone()).validate().is_ok());

        let mut empty = style;
        empty.stroke = None;
        assert!(Shape::rect(0.0, 0.0, 1.0, 1.0, 0.0, empty).validate().is_err());
        assert!(
            Shape::rect(0.0, 0.0, 1.0, 1.0, 0.0, ShapeStyle::fill(Color::rgb(0.0, 0.0, 0.0)))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn hit_testing_follows_geometry() {
        let style = ShapeStyle::stroke(Color::rgb(0.0, 1.0, 0.0), 2.0);
        let line = Shape::line(0.0, 0.0, 10.0, 0.0, 1.0, style.clone());
        assert!(line.hit(5.0, 0.9, 0.0));
        assert!(!line.hit(5.0, 3.0, 0.0));

        let dot = Shape::ellipse(50.0, 50.0, 3.0, 3.0, 1.0, ShapeStyle::fill(Color::rgb(0.0, 0.0, 1.0)));
        assert!(dot.hit(52.0, 50.0, 0.0));
        assert!(!dot.hit(60.0, 50.0, 0.0));

        let path = Shape::path(vec![(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)], 1.0, style);
        assert!(path.hit(15.0, 5.0, 0.5));
        assert!(!path.hit(10.0, 0.0, 0.5));
    }

    #[test]
    fn dashed_style_rejects_zero_segments() {
        let style = ShapeStyle::stroke(Color::rgb(0.0, 0.0, 0.0), 1.0).with_dash(&[4.0, 0.0]);
        assert!(style.validate().is_err());
    }
}
