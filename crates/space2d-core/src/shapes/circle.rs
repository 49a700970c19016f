//! Circle shape.

use super::{ShapeColor, ShapeId, ShapeTrait};
use crate::node::{Material, Node, Primitive};
use crate::properties::Properties;
use uuid::Uuid;

/// A filled circle centered on its position.
#[derive(Debug, Clone)]
pub struct Circle {
    pub(crate) id: ShapeId,
    radius: f64,
    node: Node,
    properties: Properties,
    selected: bool,
}

impl Circle {
    pub const DEFAULT_COLOR: u32 = 0x00FF00;
    /// Edges used to approximate the outline.
    pub const SEGMENTS: u32 = 32;
    const BASE_MATERIAL: Material = Material::Solid(ShapeColor::from_hex(Self::DEFAULT_COLOR));

    /// Create a new circle and apply the initial properties.
    pub fn new(radius: f64, properties: Properties) -> Self {
        let node = Node::new(
            Primitive::Circle {
                radius,
                segments: Self::SEGMENTS,
            },
            Self::BASE_MATERIAL,
        );
        let mut circle = Self {
            id: Uuid::new_v4(),
            radius,
            node,
            properties: Properties::new(),
            selected: false,
        };
        circle.apply_properties(&properties);
        circle
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(1.0, Properties::new())
    }
}

impl_shape_trait!(Circle);

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_defaults() {
        let circle = Circle::default();
        assert_eq!(circle.radius(), 1.0);
        assert_eq!(circle.node().color(), Some(ShapeColor::from_hex(0x00ff00)));
        assert_eq!(circle.node().transform.position, Point::ZERO);
        assert!(circle.properties().is_empty());
    }

    #[test]
    fn test_initial_properties() {
        let circle = Circle::new(
            2.0,
            Properties::new().with_position(-3.0, 4.0).with_color(0xabcdef),
        );
        assert_eq!(circle.node().transform.position, Point::new(-3.0, 4.0));
        assert_eq!(circle.node().color(), Some(ShapeColor::from_hex(0xabcdef)));
        assert_eq!(circle.properties().len(), 2);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Circle::default().id(), Circle::default().id());
    }
}
