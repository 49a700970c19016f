//! Shape definitions for the scene.

macro_rules! impl_shape_trait {
    ($ty:ty) => {
        impl $crate::shapes::ShapeTrait for $ty {
            fn id(&self) -> $crate::shapes::ShapeId {
                self.id
            }

            fn node(&self) -> &$crate::node::Node {
                &self.node
            }

            fn node_mut(&mut self) -> &mut $crate::node::Node {
                &mut self.node
            }

            fn properties(&self) -> &$crate::properties::Properties {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut $crate::properties::Properties {
                &mut self.properties
            }

            fn base_material(&self) -> $crate::node::Material {
                Self::BASE_MATERIAL
            }

            fn is_selected(&self) -> bool {
                self.selected
            }

            fn set_selected_flag(&mut self, selected: bool) {
                self.selected = selected;
            }
        }
    };
}

mod circle;
mod group;
mod line;
mod rectangle;
mod text;

pub use circle::Circle;
pub use group::Group;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::node::{Material, Node};
use crate::properties::Properties;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Color a selected shape is painted with.
pub const HIGHLIGHT_COLOR: u32 = 0xFFFF00;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Errors from parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Missing '#' or '0x' prefix: {0}")]
    MissingPrefix(String),
    #[error("Expected 3, 6 or 8 hex digits: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digit: {0}")]
    InvalidDigit(String),
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// Packed `0xRRGGBB` value (alpha dropped).
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn highlight() -> Self {
        Self::from_hex(HIGHLIGHT_COLOR)
    }
}

impl From<Color> for ShapeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<ShapeColor> for Color {
    fn from(color: ShapeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for ShapeColor {
    type Err = ColorParseError;

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `0xrrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, short_allowed) = if let Some(hex) = trimmed.strip_prefix('#') {
            (hex, true)
        } else if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            (hex, false)
        } else {
            return Err(ColorParseError::MissingPrefix(s.to_string()));
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };

        match digits.len() {
            3 if short_allowed => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 if short_allowed => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

/// Common trait for all shapes.
///
/// Each variant owns one renderable [`Node`] and a property bag. The bag is
/// the source of truth: the node's transform and color always reflect the
/// last properties applied, except while the selection highlight is shown.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the renderable node.
    fn node(&self) -> &Node;

    /// Get the mutable renderable node.
    fn node_mut(&mut self) -> &mut Node;

    /// Get the stored property bag.
    fn properties(&self) -> &Properties;

    /// Get the mutable property bag.
    fn properties_mut(&mut self) -> &mut Properties;

    /// Material the node was built with.
    fn base_material(&self) -> Material;

    /// Whether the selection highlight is active.
    fn is_selected(&self) -> bool;

    /// Set the selection flag without touching the node.
    fn set_selected_flag(&mut self, selected: bool);

    /// Merge a patch into the stored bag and apply its recognized keys
    /// (`color`, `position`, `scale`) to the node. A selected shape keeps
    /// its highlight until deselected.
    fn apply_properties(&mut self, patch: &Properties) {
        self.properties_mut().merge(patch);
        patch.apply_to(self.node_mut());
        if self.is_selected() {
            self.node_mut().set_color(ShapeColor::highlight());
        }
    }

    /// Toggle the selection highlight.
    ///
    /// Selecting paints the node with [`HIGHLIGHT_COLOR`] and leaves the bag
    /// untouched. Deselecting resets the node to its base material and
    /// re-applies the whole stored bag, position and scale included.
    fn set_selected(&mut self, selected: bool) {
        self.set_selected_flag(selected);
        if selected {
            self.node_mut().set_color(ShapeColor::highlight());
        } else {
            let base = self.base_material();
            self.node_mut().material = base;
            let stored = self.properties().clone();
            stored.apply_to(self.node_mut());
        }
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone)]
pub enum Shape {
    Circle(Circle),
    Rectangle(Rectangle),
    Line(Line),
    Text(Text),
    Group(Group),
}

impl Shape {
    fn as_dyn(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Circle(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Line(s) => s,
            Shape::Text(s) => s,
            Shape::Group(s) => s,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Circle(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Line(s) => s,
            Shape::Text(s) => s,
            Shape::Group(s) => s,
        }
    }

    /// Human readable name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "Circle",
            Shape::Rectangle(_) => "Rectangle",
            Shape::Line(_) => "Line",
            Shape::Text(_) => "Text",
            Shape::Group(_) => "Group",
        }
    }

    /// Get the group if this shape is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl ShapeTrait for Shape {
    fn id(&self) -> ShapeId {
        self.as_dyn().id()
    }

    fn node(&self) -> &Node {
        self.as_dyn().node()
    }

    fn node_mut(&mut self) -> &mut Node {
        self.as_dyn_mut().node_mut()
    }

    fn properties(&self) -> &Properties {
        self.as_dyn().properties()
    }

    fn properties_mut(&mut self) -> &mut Properties {
        self.as_dyn_mut().properties_mut()
    }

    fn base_material(&self) -> Material {
        self.as_dyn().base_material()
    }

    fn is_selected(&self) -> bool {
        self.as_dyn().is_selected()
    }

    fn set_selected_flag(&mut self, selected: bool) {
        self.as_dyn_mut().set_selected_flag(selected);
    }
}

impl From<Circle> for Shape {
    fn from(shape: Circle) -> Self {
        Shape::Circle(shape)
    }
}

impl From<Rectangle> for Shape {
    fn from(shape: Rectangle) -> Self {
        Shape::Rectangle(shape)
    }
}

impl From<Line> for Shape {
    fn from(shape: Line) -> Self {
        Shape::Line(shape)
    }
}

impl From<Text> for Shape {
    fn from(shape: Text) -> Self {
        Shape::Text(shape)
    }
}

impl From<Group> for Shape {
    fn from(shape: Group) -> Self {
        Shape::Group(shape)
    }
}
