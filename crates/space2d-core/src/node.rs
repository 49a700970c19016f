//! Renderable nodes: geometry, material and transform of a shape.

use crate::shapes::ShapeColor;
use kurbo::{Affine, Point, Rect, Vec2};

/// Geometry of a node, in node-local units.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled disc approximated by `segments` edges.
    Circle { radius: f64, segments: u32 },
    /// Filled rectangle centered on the origin.
    Plane { width: f64, height: f64 },
    /// Open polyline through the given points.
    Polyline { points: Vec<Point> },
    /// Unit quad centered on the origin carrying a text label.
    Sprite { label: String },
    /// Container of independently transformed children.
    Group { children: Vec<Node> },
}

/// How a node is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Solid(ShapeColor),
    /// Use the parent tint, or the node's own children colors for groups.
    Inherit,
}

impl Material {
    pub fn color(&self) -> Option<ShapeColor> {
        match self {
            Material::Solid(color) => Some(*color),
            Material::Inherit => None,
        }
    }
}

/// Placement of a node in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Point,
    /// Offset along the view axis.
    pub depth: f64,
    pub scale: Vec2,
    pub depth_scale: f64,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            depth: 0.0,
            scale: Vec2::new(1.0, 1.0),
            depth_scale: 1.0,
        }
    }
}

impl NodeTransform {
    /// Local-to-parent transform in the plane.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    pub fn is_invertible(&self) -> bool {
        self.to_affine().determinant().abs() > f64::EPSILON
    }
}

/// A renderable, pickable node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub primitive: Primitive,
    pub material: Material,
    pub transform: NodeTransform,
}

impl Node {
    pub fn new(primitive: Primitive, material: Material) -> Self {
        Self {
            primitive,
            material,
            transform: NodeTransform::default(),
        }
    }

    pub fn color(&self) -> Option<ShapeColor> {
        self.material.color()
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.material = Material::Solid(color);
    }

    /// Color used to paint this node under an optional parent tint.
    pub fn resolved_color(&self, tint: Option<ShapeColor>) -> ShapeColor {
        tint.or_else(|| self.color()).unwrap_or(ShapeColor::white())
    }

    /// Tint passed down to children of a group node.
    pub fn child_tint(&self, tint: Option<ShapeColor>) -> Option<ShapeColor> {
        tint.or_else(|| self.color())
    }

    /// Bounds in node-local coordinates.
    pub fn local_bounds(&self) -> Rect {
        match &self.primitive {
            Primitive::Circle { radius, .. } => Rect::new(-radius, -radius, *radius, *radius),
            Primitive::Plane { width, height } => {
                Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
            }
            Primitive::Polyline { points } => points_bounds(points.iter().copied()),
            Primitive::Sprite { .. } => Rect::new(-0.5, -0.5, 0.5, 0.5),
            Primitive::Group { children } => children
                .iter()
                .map(Node::world_bounds)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO),
        }
    }

    /// Bounds in the parent's coordinates.
    pub fn world_bounds(&self) -> Rect {
        self.transform.to_affine().transform_rect_bbox(self.local_bounds())
    }
}

fn points_bounds(points: impl Iterator<Item = Point>) -> Rect {
    points
        .map(|p| Rect::from_points(p, p))
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_affine() {
        let transform = NodeTransform {
            position: Point::new(2.0, 3.0),
            scale: Vec2::new(2.0, 0.5),
            ..Default::default()
        };
        assert_eq!(transform.to_affine() * Point::new(1.0, 2.0), Point::new(4.0, 4.0));
    }

    #[test]
    fn test_zero_scale_not_invertible() {
        let transform = NodeTransform {
            scale: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        assert!(!transform.is_invertible());
        assert!(NodeTransform::default().is_invertible());
    }

    #[test]
    fn test_bounds() {
        let mut circle = Node::new(
            Primitive::Circle {
                radius: 1.0,
                segments: 32,
            },
            Material::Inherit,
        );
        circle.transform.position = Point::new(5.0, 0.0);
        assert_eq!(circle.world_bounds(), Rect::new(4.0, -1.0, 6.0, 1.0));

        let line = Node::new(
            Primitive::Polyline {
                points: vec![Point::new(-1.0, 2.0), Point::new(3.0, -1.0)],
            },
            Material::Inherit,
        );
        assert_eq!(line.local_bounds(), Rect::new(-1.0, -1.0, 3.0, 2.0));

        let group = Node::new(
            Primitive::Group {
                children: vec![circle, line],
            },
            Material::Inherit,
        );
        assert_eq!(group.local_bounds(), Rect::new(-1.0, -1.0, 6.0, 2.0));
    }

    #[test]
    fn test_tint_resolution() {
        let red = ShapeColor::from_hex(0xff0000);
        let blue = ShapeColor::from_hex(0x0000ff);
        let node = Node::new(Primitive::Sprite { label: "a".into() }, Material::Solid(red));

        assert_eq!(node.resolved_color(None), red);
        assert_eq!(node.resolved_color(Some(blue)), blue);
        assert_eq!(node.child_tint(None), Some(red));

        let bare = Node::new(Primitive::Sprite { label: "b".into() }, Material::Inherit);
        assert_eq!(bare.resolved_color(None), ShapeColor::white());
        assert_eq!(bare.child_tint(None), None);
    }
}
