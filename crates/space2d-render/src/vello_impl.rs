//! Vello-based renderer implementation.

use crate::renderer::{GridStyle, RenderContext, Renderer};
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use peniko::{Color, Fill};
use space2d_core::node::{Node, Primitive};
use space2d_core::shapes::{ShapeColor, ShapeTrait};
use std::f64::consts::TAU;
use vello::Scene;

/// Half of the grid's side length, in world units.
const GRID_HALF_EXTENT: f64 = 10.0;
/// Spacing between grid lines, in world units.
const GRID_SPACING: f64 = 1.0;
/// Line stroke width in pixels.
const LINE_WIDTH: f64 = 2.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Marquee outline color.
    selection_color: Color,
    /// Device pixel ratio of the current frame.
    scale_factor: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            scale_factor: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the built scene.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Draw a node and its descendants. `parent` maps the node's parent
    /// space to viewport pixels.
    fn render_node(&mut self, node: &Node, parent: Affine, tint: Option<ShapeColor>) {
        let transform = parent * node.transform.to_affine();
        let color: Color = node.resolved_color(tint).into();

        match &node.primitive {
            Primitive::Circle { radius, segments } => {
                let path = circle_path(*radius, *segments);
                self.scene.fill(Fill::NonZero, transform, color, None, &path);
            }
            Primitive::Plane { width, height } => {
                let rect = Rect::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
                self.scene.fill(Fill::NonZero, transform, color, None, &rect);
            }
            Primitive::Polyline { points } => {
                // Stroked in screen space so the width ignores zoom and scale.
                let Some(path) = polyline_path(points.iter().map(|p| transform * *p)) else {
                    return;
                };
                let stroke = Stroke::new(LINE_WIDTH * self.scale_factor);
                self.scene.stroke(&stroke, Affine::IDENTITY, color, None, &path);
            }
            Primitive::Sprite { .. } => {
                // Glyphs are drawn by the UI layer; this is the quad behind them.
                let quad = transform.transform_rect_bbox(node.local_bounds());
                let fill = color.with_alpha(0.15);
                self.scene.fill(Fill::NonZero, Affine::IDENTITY, fill, None, &quad);
                let stroke = Stroke::new(self.scale_factor);
                self.scene.stroke(&stroke, Affine::IDENTITY, color, None, &quad);
            }
            Primitive::Group { children } => {
                let tint = node.child_tint(tint);
                for child in children {
                    self.render_node(child, transform, tint);
                }
            }
        }
    }

    /// Render a selection rectangle (marquee) given in viewport pixels.
    fn render_selection_rect(&mut self, rect: Rect) {
        let fill_color = Color::from_rgba8(59, 130, 246, 25);
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, fill_color, None, &rect);

        let dash_len = 4.0 * self.scale_factor;
        let stroke = Stroke::new(self.scale_factor).with_dashes(0.0, &[dash_len, dash_len]);
        self.scene
            .stroke(&stroke, Affine::IDENTITY, self.selection_color, None, &rect);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.scale_factor = ctx.scale_factor;

        let view = ctx.view_transform();

        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Lines => self.render_grid_lines(view),
            GridStyle::Dots => self.render_grid_dots(view),
        }

        for shape in ctx.controller.scene().shapes_ordered() {
            self.render_node(shape.node(), view, None);
        }

        if let Some(rect) = ctx.selection_rect {
            self.render_selection_rect(rect);
        }
    }
}

impl VelloRenderer {
    /// Render the finite grid with highlighted center lines.
    fn render_grid_lines(&mut self, view: Affine) {
        let grid_color = Color::from_rgba8(0x88, 0x88, 0x88, 255);
        let center_color = Color::from_rgba8(0x44, 0x44, 0x44, 255);
        let stroke = Stroke::new(self.scale_factor);

        let mut grid = BezPath::new();
        let mut center = BezPath::new();
        for offset in grid_offsets() {
            let path = if offset == 0.0 { &mut center } else { &mut grid };
            path.move_to(view * Point::new(offset, -GRID_HALF_EXTENT));
            path.line_to(view * Point::new(offset, GRID_HALF_EXTENT));
            path.move_to(view * Point::new(-GRID_HALF_EXTENT, offset));
            path.line_to(view * Point::new(GRID_HALF_EXTENT, offset));
        }

        self.scene.stroke(&stroke, Affine::IDENTITY, grid_color, None, &grid);
        self.scene
            .stroke(&stroke, Affine::IDENTITY, center_color, None, &center);
    }

    /// Render grid as dots at intersections.
    fn render_grid_dots(&mut self, view: Affine) {
        let grid_color = Color::from_rgba8(0x88, 0x88, 0x88, 255);
        let dot_size = 1.5 * self.scale_factor;

        let mut path = BezPath::new();
        for x in grid_offsets() {
            for y in grid_offsets() {
                let p = view * Point::new(x, y);
                path.move_to(Point::new(p.x - dot_size, p.y - dot_size));
                path.line_to(Point::new(p.x + dot_size, p.y - dot_size));
                path.line_to(Point::new(p.x + dot_size, p.y + dot_size));
                path.line_to(Point::new(p.x - dot_size, p.y + dot_size));
                path.close_path();
            }
        }

        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, grid_color, None, &path);
    }
}

fn grid_offsets() -> impl Iterator<Item = f64> {
    let steps = (GRID_HALF_EXTENT / GRID_SPACING).round() as i32;
    (-steps..=steps).map(|i| i as f64 * GRID_SPACING)
}

/// Closed polygon approximating a circle.
fn circle_path(radius: f64, segments: u32) -> BezPath {
    let segments = segments.max(3);
    let mut path = BezPath::new();
    for i in 0..segments {
        let angle = TAU * i as f64 / segments as f64;
        let p = Point::new(radius * angle.cos(), radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

fn polyline_path(mut points: impl Iterator<Item = Point>) -> Option<BezPath> {
    let mut path = BezPath::new();
    path.move_to(points.next()?);
    for p in points {
        path.line_to(p);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use space2d_core::controller::SceneController;
    use space2d_core::properties::Properties;
    use space2d_core::shapes::{Circle, Group, Line, Rectangle, Shape, Text};

    fn controller() -> SceneController {
        let mut controller = SceneController::new();
        controller.attach(Size::new(800.0, 600.0));
        controller
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene_without_grid() {
        let mut renderer = VelloRenderer::new();
        let controller = controller();
        let ctx = RenderContext::new(&controller, Size::new(800.0, 600.0)).with_grid(GridStyle::None);

        renderer.build_scene(&ctx);
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_grid() {
        let mut renderer = VelloRenderer::new();
        let controller = controller();
        for style in [GridStyle::Lines, GridStyle::Dots] {
            let ctx = RenderContext::new(&controller, Size::new(800.0, 600.0)).with_grid(style);
            renderer.build_scene(&ctx);
            assert!(!renderer.scene().encoding().is_empty());
        }
    }

    #[test]
    fn test_build_scene_with_shapes() {
        let mut renderer = VelloRenderer::new();
        let mut controller = controller();
        controller.add(Circle::default());
        controller.add(Rectangle::new(2.0, 1.0, Properties::new().with_position(3.0, 0.0)));
        controller.add(Line::default());
        let text: Shape = Text::new("Label", Properties::new()).into();
        let group = controller.add(Group::new([&text], Properties::new()));
        controller.select(group);

        let ctx = RenderContext::new(&controller, Size::new(800.0, 600.0)).with_grid(GridStyle::None);
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());

        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_marquee_is_drawn() {
        let mut renderer = VelloRenderer::new();
        let controller = controller();
        let ctx = RenderContext::new(&controller, Size::new(800.0, 600.0))
            .with_grid(GridStyle::None)
            .with_selection_rect(Some(Rect::new(10.0, 10.0, 100.0, 80.0)));

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_circle_path_segments() {
        let path = circle_path(1.0, 32);
        assert_eq!(path.elements().len(), 33);
        assert_eq!(circle_path(1.0, 1).elements().len(), 4);
    }

    #[test]
    fn test_polyline_path_empty() {
        assert!(polyline_path(std::iter::empty()).is_none());
        let path = polyline_path([Point::ZERO, Point::new(1.0, 1.0)].into_iter());
        assert_eq!(path.map(|p| p.elements().len()), Some(2));
    }

    #[test]
    fn test_grid_offsets() {
        let offsets: Vec<f64> = grid_offsets().collect();
        assert_eq!(offsets.len(), 21);
        assert_eq!(offsets.first(), Some(&-10.0));
        assert_eq!(offsets.last(), Some(&10.0));
    }
}
