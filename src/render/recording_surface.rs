use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::render::{CanvasLayerKind, DrawingSurface, Shape, ShapeId};

/// In-memory drawing surface used by tests and headless hosts.
///
/// It retains every inserted shape and counts surface operations so callers
/// can assert how much work a pass performed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    shapes: BTreeMap<ShapeId, Shape>,
    next_id: u64,
    pub insert_count: usize,
    pub remove_count: usize,
    pub clear_count: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    pub fn shapes_in_layer(&self, layer: CanvasLayerKind) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes
            .values()
            .filter(move |shape| CanvasLayerKind::from_z(shape.z) == Some(layer))
    }

    #[must_use]
    pub fn count_in_layer(&self, layer: CanvasLayerKind) -> usize {
        self.shapes_in_layer(layer).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId::new(self.next_id);
        self.next_id += 1;
        self.insert_count += 1;
        self.shapes.insert(id, shape);
        id
    }

    fn remove(&mut self, id: ShapeId) -> bool {
        let removed = self.shapes.remove(&id).is_some();
        if removed {
            self.remove_count += 1;
        }
        removed
    }

    fn clear(&mut self) {
        self.clear_count += 1;
        self.shapes.clear();
    }

    fn hit_test(&self, x: f64, y: f64) -> Vec<ShapeId> {
        let mut hits: Vec<(OrderedFloat<f64>, ShapeId)> = self
            .shapes
            .iter()
            .filter(|(_, shape)| shape.hit(x, y, 1.0))
            .map(|(id, shape)| (OrderedFloat(shape.z), *id))
            .collect();
        // topmost first, later insertions win ties
        hits.sort_by(|a, b| b.cmp(a));
        hits.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingSurface;
    use crate::render::{CanvasLayerKind, Color, DrawingSurface, Shape, ShapeStyle};

    #[test]
    fn hit_test_orders_topmost_first() {
        let mut surface = RecordingSurface::new();
        let fill = ShapeStyle::fill(Color::rgb(0.2, 0.2, 0.2));
        let background = surface.insert(Shape::rect(
            0.0,
            0.0,
            100.0,
            100.0,
            CanvasLayerKind::Background.z(),
            fill.clone(),
        ));
        let marker = surface.insert(Shape::ellipse(
            10.0,
            10.0,
            2.0,
            2.0,
            CanvasLayerKind::Series.z(),
            fill,
        ));

        assert_eq!(surface.hit_test(10.0, 10.0), vec![marker, background]);
        assert_eq!(surface.hit_test(50.0, 50.0), vec![background]);
        assert!(surface.hit_test(500.0, 500.0).is_empty());
    }

    #[test]
    fn counters_track_operations() {
        let mut surface = RecordingSurface::new();
        let style = ShapeStyle::stroke(Color::rgb(1.0, 1.0, 1.0), 1.0);
        let id = surface.insert(Shape::line(0.0, 0.0, 1.0, 1.0, 0.0, style.clone()));
        surface.insert(Shape::line(0.0, 0.0, 1.0, 1.0, 0.0, style));
        assert!(surface.remove(id));
        assert!(!surface.remove(id));
        surface.clear();
        assert_eq!(surface.insert_count, 2);
        assert_eq!(surface.remove_count, 1);
        assert_eq!(surface.clear_count, 1);
        assert!(surface.is_empty());
    }
}
