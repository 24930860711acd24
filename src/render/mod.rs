mod layer_stack;
mod primitives;
mod recording_surface;

pub use layer_stack::CanvasLayerKind;
pub use primitives::{Color, DashPattern, Shape, ShapeKind, ShapeStyle};
pub use recording_surface::RecordingSurface;

use serde::{Deserialize, Serialize};

/// Opaque handle of a shape retained by a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl ShapeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Contract implemented by any retained-mode drawing backend.
///
/// The viewport inserts fully styled shapes and keeps the returned ids so it
/// can replace them in place. Nothing inserted is assumed to survive
/// [`DrawingSurface::clear`]. A backend that cannot honor these calls is a
/// broken precondition, so the methods are infallible.
pub trait DrawingSurface {
    fn insert(&mut self, shape: Shape) -> ShapeId;

    /// Removes one shape. Returns `false` for unknown ids.
    fn remove(&mut self, id: ShapeId) -> bool;

    fn clear(&mut self);

    /// Shapes under a point, topmost first.
    fn hit_test(&self, x: f64, y: f64) -> Vec<ShapeId>;
}
