//! Text label shape.

use super::{ShapeColor, ShapeId, ShapeTrait};
use crate::node::{Material, Node, Primitive};
use crate::properties::Properties;
use kurbo::Vec2;
use uuid::Uuid;

/// A text label drawn on a camera-facing quad.
///
/// The quad is sized from the character count: `0.5` world units per
/// character wide and `0.5` tall. Rasterizing the glyphs is left to the
/// renderer.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) id: ShapeId,
    content: String,
    node: Node,
    properties: Properties,
    selected: bool,
}

impl Text {
    pub const DEFAULT_COLOR: u32 = 0xFFFFFF;
    /// World units per character and quad height.
    pub const CHAR_SIZE: f64 = 0.5;
    const BASE_MATERIAL: Material = Material::Solid(ShapeColor::from_hex(Self::DEFAULT_COLOR));

    /// Create a new text label and apply the initial properties.
    pub fn new(content: impl Into<String>, properties: Properties) -> Self {
        let content = content.into();
        let mut node = Node::new(
            Primitive::Sprite {
                label: content.clone(),
            },
            Self::BASE_MATERIAL,
        );
        node.transform.scale = Vec2::new(
            content.chars().count() as f64 * Self::CHAR_SIZE,
            Self::CHAR_SIZE,
        );
        let mut text = Self {
            id: Uuid::new_v4(),
            content,
            node,
            properties: Properties::new(),
            selected: false,
        };
        text.apply_properties(&properties);
        text
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new("Text", Properties::new())
    }
}

impl_shape_trait!(Text);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_sized_by_length() {
        let text = Text::new("Hello", Properties::new());
        assert_eq!(text.content(), "Hello");
        assert_eq!(text.node().transform.scale, Vec2::new(2.5, 0.5));
    }

    #[test]
    fn test_scale_property_overrides_size() {
        let text = Text::new("Hi", Properties::new().with_scale_y(2.0));
        assert_eq!(text.node().transform.scale, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_empty_text() {
        let text = Text::new("", Properties::new());
        assert_eq!(text.node().transform.scale.x, 0.0);
        assert!(!text.node().transform.is_invertible());
    }
}
