//! Renderer trait abstraction.

use kurbo::{Affine, Rect, Size};
use peniko::Color;
use space2d_core::controller::SceneController;
use space2d_core::node::{Node, Primitive};
use space2d_core::shapes::{ShapeColor, ShapeTrait};

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only dots at intersections.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene, camera and selection to render.
    pub controller: &'a SceneController,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Marquee outline color.
    pub selection_color: Color,
    /// Selection rectangle (marquee) in viewport pixels.
    pub selection_rect: Option<Rect>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(controller: &'a SceneController, viewport_size: Size) -> Self {
        Self {
            controller,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(0, 0, 0, 255),
            grid_style: GridStyle::Lines,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            selection_rect: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the selection rectangle.
    pub fn with_selection_rect(mut self, rect: Option<Rect>) -> Self {
        self.selection_rect = rect;
        self
    }

    /// World-to-viewport transform for this frame.
    pub fn view_transform(&self) -> Affine {
        self.controller.camera.view_transform(self.viewport_size)
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// A text label to be drawn by a glyph-capable layer on top of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub text: String,
    /// Quad the label fills, in viewport pixels.
    pub screen_rect: Rect,
    pub color: ShapeColor,
}

/// Collect sprite labels in draw order, with their on-screen quads.
pub fn collect_labels(controller: &SceneController, viewport_size: Size) -> Vec<LabelPlacement> {
    let view = controller.camera.view_transform(viewport_size);
    let mut labels = Vec::new();
    for shape in controller.scene().shapes_ordered() {
        push_labels(shape.node(), view, None, &mut labels);
    }
    labels
}

fn push_labels(
    node: &Node,
    parent: Affine,
    tint: Option<ShapeColor>,
    labels: &mut Vec<LabelPlacement>,
) {
    let transform = parent * node.transform.to_affine();
    match &node.primitive {
        Primitive::Sprite { label } if !label.is_empty() => labels.push(LabelPlacement {
            text: label.clone(),
            screen_rect: transform.transform_rect_bbox(node.local_bounds()),
            color: node.resolved_color(tint),
        }),
        Primitive::Group { children } => {
            let tint = node.child_tint(tint);
            for child in children {
                push_labels(child, transform, tint, labels);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use space2d_core::properties::Properties;
    use space2d_core::shapes::{Circle, Group, Shape, Text};

    #[test]
    fn test_grid_style_cycle() {
        assert_eq!(GridStyle::None.next(), GridStyle::Lines);
        assert_eq!(GridStyle::Dots.next(), GridStyle::None);
        assert_eq!(GridStyle::default().name(), "Lines");
    }

    #[test]
    fn test_collect_labels() {
        let mut controller = SceneController::new();
        controller.attach(Size::new(800.0, 800.0));
        controller.add(Circle::default());
        let text = controller.add(Text::new("Hello", Properties::new().with_position(0.0, 5.0)));

        let labels = collect_labels(&controller, controller.viewport_size());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Hello");
        // 2.5 x 0.5 world units at 40 px per unit, centered on (400, 200)
        assert_eq!(labels[0].screen_rect, Rect::new(350.0, 190.0, 450.0, 210.0));
        assert_eq!(labels[0].color, ShapeColor::white());

        controller.select(text);
        let labels = collect_labels(&controller, controller.viewport_size());
        assert_eq!(labels[0].color, ShapeColor::highlight());
    }

    #[test]
    fn test_group_labels_take_group_tint() {
        let mut controller = SceneController::new();
        controller.attach(Size::new(800.0, 800.0));
        let text: Shape = Text::new("ab", Properties::new()).into();
        let group = controller.add(Group::new([&text], Properties::new()));
        controller.select(group);

        let labels = collect_labels(&controller, controller.viewport_size());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].color, ShapeColor::highlight());
        assert!(labels[0].screen_rect.contains(Point::new(400.0, 400.0)));
    }
}
