//! Ray picking against nodes and planes.
//!
//! The scene is orthographic and viewed along the negative depth axis, so a
//! ray is a point in the plane plus the depth it starts from. A hit records
//! how far along the ray the node lies.

use crate::node::{Node, Primitive};
use kurbo::{Line, ParamCurveNearest, Point};

/// Default pick tolerance for polylines, in world units.
pub const DEFAULT_LINE_THRESHOLD: f64 = 1.0;

/// A pick ray travelling toward negative depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub depth: f64,
}

impl Ray {
    pub fn new(origin: Point, depth: f64) -> Self {
        Self { origin, depth }
    }
}

/// A plane facing the camera at the given depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub offset: f64,
}

impl Plane {
    pub fn view_aligned(offset: f64) -> Self {
        Self { offset }
    }
}

/// A node hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<K> {
    pub key: K,
    /// Intersection point in the plane.
    pub point: Point,
    /// Distance from the ray origin.
    pub distance: f64,
}

/// Intersect a ray with a plane. `None` when the plane is behind the ray.
pub fn intersect_ray_plane(ray: &Ray, plane: &Plane) -> Option<Point> {
    let distance = ray.depth - plane.offset;
    (distance.is_finite() && distance >= 0.0).then_some(ray.origin)
}

/// Intersect a ray with a node and its descendants.
///
/// Returns the hit point and distance. Polylines are hit when the ray passes
/// within `line_threshold` of any segment.
pub fn intersect_node(node: &Node, ray: &Ray, line_threshold: f64) -> Option<(Point, f64)> {
    let distance = ray.depth - node.transform.depth;
    if distance.is_nan() || distance < 0.0 || !node.transform.is_invertible() {
        return None;
    }

    let to_parent = node.transform.to_affine();
    let local = to_parent.inverse() * ray.origin;

    let hit = match &node.primitive {
        Primitive::Circle { radius, .. } => local.to_vec2().hypot() <= *radius,
        Primitive::Plane { width, height } => {
            local.x.abs() <= width / 2.0 && local.y.abs() <= height / 2.0
        }
        Primitive::Sprite { .. } => local.x.abs() <= 0.5 && local.y.abs() <= 0.5,
        Primitive::Polyline { points } => {
            let world: Vec<Point> = points.iter().map(|p| to_parent * *p).collect();
            polyline_distance(ray.origin, &world) <= line_threshold
        }
        Primitive::Group { children } => {
            let child_ray = Ray::new(local, distance);
            children
                .iter()
                .any(|child| intersect_node(child, &child_ray, line_threshold).is_some())
        }
    };

    hit.then_some((ray.origin, distance))
}

/// Cast a ray through keyed nodes and return every hit, nearest first.
///
/// Hits at equal distance keep the order in which `nodes` yielded them.
pub fn cast_ray<'a, K>(
    ray: &Ray,
    nodes: impl IntoIterator<Item = (K, &'a Node)>,
    line_threshold: f64,
) -> Vec<RayHit<K>> {
    let mut hits: Vec<RayHit<K>> = nodes
        .into_iter()
        .filter_map(|(key, node)| {
            intersect_node(node, ray, line_threshold)
                .map(|(point, distance)| RayHit { key, point, distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn polyline_distance(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => only.distance(point),
        _ => points
            .windows(2)
            .map(|w| Line::new(w[0], w[1]).nearest(point, 1e-9).distance_sq.sqrt())
            .fold(f64::INFINITY, f64::min),
    }
}
