//! Group shape for combining multiple shapes.

use super::{Shape, ShapeId, ShapeTrait};
use crate::node::{Material, Node, Primitive};
use crate::properties::Properties;
use uuid::Uuid;

/// A group of shapes that moves, scales and selects as one unit.
///
/// Children are deep copies of the source shapes' nodes taken at creation
/// time. The sources stay independent and later edits to them do not reach
/// the group. Groups can contain other groups.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) id: ShapeId,
    node: Node,
    properties: Properties,
    selected: bool,
}

impl Group {
    const BASE_MATERIAL: Material = Material::Inherit;

    /// Create a new group from copies of the given shapes.
    pub fn new<'a>(children: impl IntoIterator<Item = &'a Shape>, properties: Properties) -> Self {
        let children: Vec<Node> = children.into_iter().map(|s| s.node().clone()).collect();
        let mut group = Self {
            id: Uuid::new_v4(),
            node: Node::new(Primitive::Group { children }, Self::BASE_MATERIAL),
            properties: Properties::new(),
            selected: false,
        };
        group.apply_properties(&properties);
        group
    }

    /// Get the children of this group.
    pub fn children(&self) -> &[Node] {
        match &self.node.primitive {
            Primitive::Group { children } => children,
            _ => &[],
        }
    }
}

impl_shape_trait!(Group);
