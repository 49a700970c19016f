//! Scene storage: shapes keyed by id with a stable draw order.

use crate::shapes::{Shape, ShapeId, ShapeTrait};
use kurbo::Rect;
use std::collections::HashMap;

/// The shapes of the editor.
///
/// Draw order is insertion order: later shapes are drawn on top and are
/// found first by front-to-back queries.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the draw order.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        id
    }

    /// Remove a shape.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        self.z_order.retain(|&z| z != id);
        Some(shape)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Get shapes in draw order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Get shapes front to back.
    pub fn shapes_front_to_back(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().rev().filter_map(|id| self.shapes.get(id))
    }

    /// Ids in draw order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Bounding box of all shapes in world space.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(|s| s.node().world_bounds())
            .reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Properties;
    use crate::shapes::{Circle, Rectangle};

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Circle::default().into());
        assert!(scene.contains(id));
        assert_eq!(scene.len(), 1);

        assert!(scene.remove_shape(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.ids().is_empty());
        assert!(scene.remove_shape(id).is_none());
    }

    #[test]
    fn test_order() {
        let mut scene = Scene::new();
        let a = scene.add_shape(Circle::default().into());
        let b = scene.add_shape(Rectangle::default().into());

        let ordered: Vec<ShapeId> = scene.shapes_ordered().map(|s| s.id()).collect();
        assert_eq!(ordered, vec![a, b]);
        let front: Vec<ShapeId> = scene.shapes_front_to_back().map(|s| s.id()).collect();
        assert_eq!(front, vec![b, a]);
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::new();
        assert_eq!(scene.bounds(), None);
        scene.add_shape(Circle::new(1.0, Properties::new().with_position(-2.0, 0.0)).into());
        scene.add_shape(Rectangle::new(2.0, 2.0, Properties::new().with_position(3.0, 3.0)).into());
        assert_eq!(scene.bounds(), Some(Rect::new(-3.0, -1.0, 4.0, 4.0)));
    }
}
