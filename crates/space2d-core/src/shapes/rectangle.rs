//! Rectangle shape.

use super::{ShapeColor, ShapeId, ShapeTrait};
use crate::node::{Material, Node, Primitive};
use crate::properties::Properties;
use uuid::Uuid;

/// A filled axis-aligned rectangle centered on its position.
#[derive(Debug, Clone)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    width: f64,
    height: f64,
    node: Node,
    properties: Properties,
    selected: bool,
}

impl Rectangle {
    pub const DEFAULT_COLOR: u32 = 0x0000FF;
    const BASE_MATERIAL: Material = Material::Solid(ShapeColor::from_hex(Self::DEFAULT_COLOR));

    /// Create a new rectangle and apply the initial properties.
    pub fn new(width: f64, height: f64, properties: Properties) -> Self {
        let node = Node::new(Primitive::Plane { width, height }, Self::BASE_MATERIAL);
        let mut rect = Self {
            id: Uuid::new_v4(),
            width,
            height,
            node,
            properties: Properties::new(),
            selected: false,
        };
        rect.apply_properties(&properties);
        rect
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(1.0, 1.0, Properties::new())
    }
}

impl_shape_trait!(Rectangle);

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Vec2};

    #[test]
    fn test_defaults() {
        let rect = Rectangle::default();
        assert_eq!((rect.width(), rect.height()), (1.0, 1.0));
        assert_eq!(rect.node().color(), Some(ShapeColor::from_hex(0x0000ff)));
    }

    #[test]
    fn test_scale_changes_bounds() {
        let rect = Rectangle::new(2.0, 1.0, Properties::new().with_scale(2.0, 3.0));
        assert_eq!(rect.node().transform.scale, Vec2::new(2.0, 3.0));
        assert_eq!(rect.node().world_bounds(), Rect::new(-2.0, -1.5, 2.0, 1.5));
    }
}
