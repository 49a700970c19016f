//! Line shape.

use super::{ShapeColor, ShapeId, ShapeTrait};
use crate::node::{Material, Node, Primitive};
use crate::properties::Properties;
use kurbo::Point;
use uuid::Uuid;

/// An open polyline through points relative to its position.
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) id: ShapeId,
    node: Node,
    properties: Properties,
    selected: bool,
}

impl Line {
    pub const DEFAULT_COLOR: u32 = 0xFF0000;
    const BASE_MATERIAL: Material = Material::Solid(ShapeColor::from_hex(Self::DEFAULT_COLOR));

    /// Create a new line and apply the initial properties.
    pub fn new(points: Vec<Point>, properties: Properties) -> Self {
        let mut line = Self {
            id: Uuid::new_v4(),
            node: Node::new(Primitive::Polyline { points }, Self::BASE_MATERIAL),
            properties: Properties::new(),
            selected: false,
        };
        line.apply_properties(&properties);
        line
    }

    /// Points in the line's own coordinates.
    pub fn points(&self) -> &[Point] {
        match &self.node.primitive {
            Primitive::Polyline { points } => points,
            _ => &[],
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new(
            vec![Point::new(-1.0, 0.0), Point::new(1.0, 0.0)],
            Properties::new(),
        )
    }
}

impl_shape_trait!(Line);
