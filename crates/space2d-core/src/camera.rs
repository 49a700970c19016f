//! Orthographic camera and the screen/NDC/world coordinate pipeline.
//!
//! Screen space is in pixels with the origin at the top-left of the viewport.
//! Normalized device coordinates (NDC) span `[-1, 1]` on both axes with +y up.
//! World space is the scene plane, +y up.

use crate::raycast::Ray;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default half of the visible world height at zoom 1.
pub const DEFAULT_HALF_HEIGHT: f64 = 10.0;

/// Default depth of the camera above the scene plane.
pub const DEFAULT_EYE_DEPTH: f64 = 5.0;

/// Orthographic camera looking down the negative depth axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World point at the center of the viewport.
    pub center: Point,
    /// Half of the visible world height at zoom 1.
    pub half_height: f64,
    /// Viewport width over height.
    pub aspect: f64,
    /// Current zoom level.
    pub zoom: f64,
    /// Depth of the camera.
    pub eye_depth: f64,
    /// Near clip distance, relative to the camera.
    pub near: f64,
    /// Far clip distance, relative to the camera.
    pub far: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            half_height: DEFAULT_HALF_HEIGHT,
            aspect: 1.0,
            zoom: 1.0,
            eye_depth: DEFAULT_EYE_DEPTH,
            near: -1000.0,
            far: 1000.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a viewport pixel position to NDC.
    ///
    /// A degenerate viewport maps everything to the center.
    pub fn viewport_to_ndc(screen: Point, viewport: Size) -> Point {
        let x = if viewport.width > 0.0 {
            screen.x / viewport.width * 2.0 - 1.0
        } else {
            0.0
        };
        let y = if viewport.height > 0.0 {
            -(screen.y / viewport.height * 2.0) + 1.0
        } else {
            0.0
        };
        Point::new(x, y)
    }

    /// Convert NDC to a viewport pixel position.
    pub fn ndc_to_viewport(ndc: Point, viewport: Size) -> Point {
        Point::new(
            (ndc.x + 1.0) / 2.0 * viewport.width,
            (1.0 - ndc.y) / 2.0 * viewport.height,
        )
    }

    /// Half of the visible world extents.
    pub fn half_extents(&self) -> Vec2 {
        let half_height = self.half_height / self.zoom;
        Vec2::new(half_height * self.aspect, half_height)
    }

    /// Unproject NDC onto the scene plane.
    pub fn ndc_to_world(&self, ndc: Point) -> Point {
        let half = self.half_extents();
        self.center + Vec2::new(ndc.x * half.x, ndc.y * half.y)
    }

    /// Project a world point to NDC.
    pub fn world_to_ndc(&self, world: Point) -> Point {
        let half = self.half_extents();
        let offset = world - self.center;
        Point::new(offset.x / half.x, offset.y / half.y)
    }

    /// Project a world point to normalized screen coordinates.
    pub fn project_to_screen(&self, world: Point) -> Point {
        self.world_to_ndc(world)
    }

    /// Pick ray through an NDC position, starting on the near plane.
    pub fn ray_from_ndc(&self, ndc: Point) -> Ray {
        Ray::new(self.ndc_to_world(ndc), self.eye_depth - self.near)
    }

    /// Pixels per world unit for the given viewport.
    pub fn pixels_per_unit(&self, viewport: Size) -> f64 {
        viewport.height / 2.0 / self.half_extents().y
    }

    /// World-to-viewport transform for rendering.
    pub fn view_transform(&self, viewport: Size) -> Affine {
        let half = self.half_extents();
        Affine::translate(Vec2::new(viewport.width / 2.0, viewport.height / 2.0))
            * Affine::scale_non_uniform(
                viewport.width / 2.0 / half.x,
                -viewport.height / 2.0 / half.y,
            )
            * Affine::translate(-self.center.to_vec2())
    }

    /// Convert a viewport pixel position to world coordinates.
    pub fn screen_to_world(&self, screen: Point, viewport: Size) -> Point {
        self.ndc_to_world(Self::viewport_to_ndc(screen, viewport))
    }

    /// Convert a world point to a viewport pixel position.
    pub fn world_to_screen(&self, world: Point, viewport: Size) -> Point {
        Self::ndc_to_viewport(self.world_to_ndc(world), viewport)
    }

    /// Match the aspect ratio to the viewport.
    pub fn set_aspect_from(&mut self, viewport: Size) {
        if viewport.width > 0.0 && viewport.height > 0.0 {
            self.aspect = viewport.width / viewport.height;
        }
    }

    /// Pan the camera so content follows a pixel drag.
    pub fn pan_pixels(&mut self, delta: Vec2, viewport: Size) {
        let ppu = self.pixels_per_unit(viewport);
        if ppu <= 0.0 || !ppu.is_finite() {
            return;
        }
        self.center.x -= delta.x / ppu;
        self.center.y += delta.y / ppu;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64, viewport: Size) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let before = self.screen_to_world(screen, viewport);
        self.zoom = new_zoom;
        let after = self.screen_to_world(screen, viewport);
        self.center += before - after;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.center = Point::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the camera to show the given world rectangle.
    ///
    /// A flat rectangle is fitted along its non-zero side. A single point is
    /// centered at the current zoom.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        let padded = bounds.inflate(padding, padding);
        self.center = bounds.center();

        let fit = |extent: f64, span: f64| {
            if span > 0.0 { extent * 2.0 / span } else { f64::INFINITY }
        };
        let zoom = fit(self.half_height * self.aspect, padded.width())
            .min(fit(self.half_height, padded.height()));
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(800.0, 800.0);

    fn assert_close(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.center, Point::ZERO);
        assert_eq!(camera.half_extents(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_viewport_to_ndc() {
        assert_close(Camera::viewport_to_ndc(Point::new(0.0, 0.0), VIEWPORT), Point::new(-1.0, 1.0));
        assert_close(Camera::viewport_to_ndc(Point::new(400.0, 400.0), VIEWPORT), Point::ZERO);
        assert_close(Camera::viewport_to_ndc(Point::new(800.0, 800.0), VIEWPORT), Point::new(1.0, -1.0));
    }

    #[test]
    fn test_ndc_roundtrip() {
        let screen = Point::new(123.0, 456.0);
        let ndc = Camera::viewport_to_ndc(screen, VIEWPORT);
        assert_close(Camera::ndc_to_viewport(ndc, VIEWPORT), screen);
    }

    #[test]
    fn test_degenerate_viewport() {
        let ndc = Camera::viewport_to_ndc(Point::new(10.0, 10.0), Size::ZERO);
        assert_eq!(ndc, Point::ZERO);
    }

    #[test]
    fn test_project_to_screen() {
        let camera = Camera::new();
        assert_close(camera.project_to_screen(Point::new(0.0, 0.0)), Point::ZERO);
        assert_close(camera.project_to_screen(Point::new(5.0, 5.0)), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_view_transform_matches_pipeline() {
        let mut camera = Camera::new();
        camera.center = Point::new(2.0, -3.0);
        camera.zoom = 2.0;
        camera.set_aspect_from(Size::new(1000.0, 500.0));
        let viewport = Size::new(1000.0, 500.0);

        let world = Point::new(4.0, 1.0);
        assert_close(
            camera.view_transform(viewport) * world,
            camera.world_to_screen(world, viewport),
        );
        assert_close(camera.view_transform(viewport) * camera.center, Point::new(500.0, 250.0));
    }

    #[test]
    fn test_pan_pixels() {
        let mut camera = Camera::new();
        camera.pan_pixels(Vec2::new(40.0, 40.0), VIEWPORT);
        assert_close(camera.center, Point::new(-1.0, 1.0));
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::new();
        let screen = Point::new(600.0, 200.0);
        let before = camera.screen_to_world(screen, VIEWPORT);
        camera.zoom_at(screen, 2.0, VIEWPORT);
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);
        assert_close(camera.screen_to_world(screen, VIEWPORT), before);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 1000.0, VIEWPORT);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
        camera.zoom_at(Point::ZERO, 0.0001, VIEWPORT);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ray_starts_in_front_of_scene() {
        let camera = Camera::new();
        let ray = camera.ray_from_ndc(Point::new(0.5, 0.5));
        assert_close(ray.origin, Point::new(5.0, 5.0));
        assert!(ray.depth > 0.0);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
        assert_eq!(camera.center, Point::new(5.0, 5.0));
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_flat_bounds() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(20.0, 0.0, 40.0, 0.0), 0.0);
        assert_eq!(camera.center, Point::new(30.0, 0.0));
        assert!((camera.zoom - 1.0).abs() < 1e-9);
        for end in [Point::new(20.0, 0.0), Point::new(40.0, 0.0)] {
            let ndc = camera.project_to_screen(end);
            assert!(ndc.x.abs() <= 1.0 + 1e-9 && ndc.y.abs() <= 1.0);
        }

        let zoom = camera.zoom;
        camera.fit_to_bounds(Rect::new(3.0, 4.0, 3.0, 4.0), 0.0);
        assert_eq!(camera.center, Point::new(3.0, 4.0));
        assert_eq!(camera.zoom, zoom);
    }
}
