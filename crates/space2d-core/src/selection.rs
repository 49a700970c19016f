//! Interaction state: drag and marquee sessions.

use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Vec2};

/// State of an in-progress shape drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// The shape being dragged.
    pub target: ShapeId,
    /// Hit point minus the shape position at press time.
    pub grab_offset: Vec2,
    /// Shape position at press time.
    pub origin: Point,
    /// Pointer position at press time, in pixels.
    pub press_position: Point,
    /// Whether the pointer has travelled past the drag threshold.
    pub moved: bool,
}

impl DragSession {
    pub fn new(target: ShapeId, grab_offset: Vec2, origin: Point, press_position: Point) -> Self {
        Self {
            target,
            grab_offset,
            origin,
            press_position,
            moved: false,
        }
    }

    /// Mark the session as moved once the pointer leaves the threshold.
    /// Returns whether the session counts as moved.
    pub fn update(&mut self, position: Point, threshold: f64) -> bool {
        if !self.moved && (position - self.press_position).hypot() > threshold {
            self.moved = true;
        }
        self.moved
    }
}

/// State of an in-progress marquee selection.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeSession {
    /// Corner where the press happened, in pixels.
    pub anchor: Point,
    /// Opposite corner following the pointer, in pixels.
    pub current: Point,
    /// Whether the pointer has travelled past the drag threshold.
    pub moved: bool,
}

impl MarqueeSession {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            current: anchor,
            moved: false,
        }
    }

    pub fn update(&mut self, position: Point, threshold: f64) {
        self.current = position;
        if !self.moved && (position - self.anchor).hypot() > threshold {
            self.moved = true;
        }
    }

    /// Normalized rectangle in pixels.
    pub fn screen_rect(&self) -> Rect {
        Rect::from_points(self.anchor, self.current)
    }
}

/// What the pointer is doing. Drag and marquee never overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragSession),
    MarqueeSelecting(MarqueeSession),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Shape targeted by a drag, if any.
    pub fn drag_target(&self) -> Option<ShapeId> {
        match self {
            InteractionState::Dragging(session) => Some(session.target),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdcRect {
    pub min: Point,
    pub max: Point,
}

impl NdcRect {
    /// Build from two corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
