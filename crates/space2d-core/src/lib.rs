//! Space2D Core Library
//!
//! Platform-agnostic scene model, picking and selection logic for the
//! Space2D editor shell.

pub mod camera;
pub mod controller;
pub mod input;
pub mod node;
pub mod properties;
pub mod raycast;
pub mod scene;
pub mod selection;
pub mod shapes;

pub use camera::Camera;
pub use controller::{InteractionConfig, PointerResponse, SceneController};
pub use input::{ModifierKey, Modifiers, MouseButton, PointerEvent};
pub use node::{Material, Node, NodeTransform, Primitive};
pub use properties::{AxisPatch, Properties, PropertyError};
pub use raycast::{Plane, Ray, RayHit, cast_ray, intersect_ray_plane};
pub use scene::Scene;
pub use selection::{DragSession, InteractionState, MarqueeSession, NdcRect};
pub use shapes::{
    Circle, ColorParseError, Group, HIGHLIGHT_COLOR, Line, Rectangle, Shape, ShapeColor, ShapeId,
    ShapeTrait, Text,
};
