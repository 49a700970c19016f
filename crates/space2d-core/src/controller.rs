//! Scene controller: selection set and pointer interaction state machine.
//!
//! The controller owns the [`Scene`] and [`Camera`] and turns raw pointer
//! events into clicks, drags and marquee selections:
//!
//! - A primary press on a shape starts a drag. A press on empty space starts
//!   a marquee. Only one of the two can be active.
//! - Moving less than [`InteractionConfig::drag_threshold`] pixels before
//!   release makes the gesture a click.
//! - A click or a marquee replaces the selection, unless the multi-select
//!   modifier is held, in which case it adds to it.
//! - A context-menu request clears the selection.

use crate::camera::Camera;
use crate::input::{ModifierKey, Modifiers, MouseButton, PointerEvent};
use crate::properties::Properties;
use crate::raycast::{DEFAULT_LINE_THRESHOLD, Plane, RayHit, cast_ray, intersect_ray_plane};
use crate::scene::Scene;
use crate::selection::{DragSession, InteractionState, MarqueeSession, NdcRect};
use crate::shapes::{Shape, ShapeId, ShapeTrait};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tunables for pointer interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Pixels the pointer must travel before a press becomes a drag.
    pub drag_threshold: f64,
    /// Modifier that makes clicks and marquees additive.
    pub multi_select_modifier: ModifierKey,
    /// Pick tolerance for lines, in world units.
    pub line_pick_threshold: f64,
    /// Depth of the plane drags are projected onto.
    pub drag_plane_offset: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            multi_select_modifier: ModifierKey::Ctrl,
            line_pick_threshold: DEFAULT_LINE_THRESHOLD,
            drag_plane_offset: 0.0,
        }
    }
}

/// Outcome of handling a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerResponse {
    /// The host should suppress its default handling (e.g. a native menu).
    pub prevent_default: bool,
    /// The set of selected shapes changed.
    pub selection_changed: bool,
}

/// Owns the scene, camera, selection and interaction state.
#[derive(Debug, Clone)]
pub struct SceneController {
    scene: Scene,
    /// Camera used for picking and rendering.
    pub camera: Camera,
    selection: HashSet<ShapeId>,
    interaction: InteractionState,
    modifiers: Modifiers,
    viewport_size: Size,
    config: InteractionConfig,
    attached: bool,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    pub fn new() -> Self {
        Self::with_config(InteractionConfig::default())
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(),
            selection: HashSet::new(),
            interaction: InteractionState::Idle,
            modifiers: Modifiers::default(),
            viewport_size: Size::ZERO,
            config,
            attached: false,
        }
    }

    /// Start receiving pointer events for a viewport of the given size.
    pub fn attach(&mut self, viewport: Size) {
        self.attached = true;
        self.set_viewport_size(viewport);
        log::info!("Controller attached to {}x{} viewport", viewport.width, viewport.height);
    }

    /// Stop receiving pointer events. Any gesture in progress is cancelled.
    pub fn detach(&mut self) {
        if self.attached {
            self.cancel_interaction();
            self.attached = false;
            log::info!("Controller detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        self.camera.set_aspect_from(size);
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Add a shape on top of the scene.
    pub fn add(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let shape = shape.into();
        let kind = shape.kind_name();
        let id = self.scene.add_shape(shape);
        log::debug!("Added {} {}", kind, id);
        id
    }

    /// Remove a shape, evicting it from the selection and any drag.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.scene.remove_shape(id)?;
        self.selection.remove(&id);
        if self.interaction.drag_target() == Some(id) {
            self.interaction = InteractionState::Idle;
        }
        log::debug!("Removed {} {}", shape.kind_name(), id);
        Some(shape)
    }

    /// Remove every selected shape. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let ids: Vec<ShapeId> = self.selection.iter().copied().collect();
        ids.into_iter().filter(|id| self.remove(*id).is_some()).count()
    }

    /// Add a shape to the selection and highlight it.
    ///
    /// Unknown ids are ignored. Returns whether the selection changed.
    pub fn select(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.scene.get_shape_mut(id) else {
            log::debug!("Ignoring selection of unknown shape {}", id);
            return false;
        };
        shape.set_selected(true);
        self.selection.insert(id)
    }

    /// Remove a shape from the selection and restore its appearance.
    pub fn deselect(&mut self, id: ShapeId) -> bool {
        if !self.selection.remove(&id) {
            return false;
        }
        if let Some(shape) = self.scene.get_shape_mut(id) {
            shape.set_selected(false);
        }
        true
    }

    /// Deselect everything. Returns whether the selection changed.
    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        for id in self.selection.drain() {
            if let Some(shape) = self.scene.get_shape_mut(id) {
                shape.set_selected(false);
            }
        }
        true
    }

    /// Select every shape in the scene.
    pub fn select_all(&mut self) -> bool {
        let ids: Vec<ShapeId> = self.scene.ids().to_vec();
        ids.into_iter().fold(false, |changed, id| self.select(id) | changed)
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.selection.iter().copied()
    }

    /// Selected ids in draw order.
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.scene
            .ids()
            .iter()
            .copied()
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Apply a property patch to every selected shape.
    pub fn update_properties(&mut self, patch: &Properties) {
        if patch.is_empty() {
            return;
        }
        for id in &self.selection {
            if let Some(shape) = self.scene.get_shape_mut(*id) {
                shape.apply_properties(patch);
            }
        }
    }

    /// Every shape under an NDC position, nearest first.
    ///
    /// Ties go to the shape drawn last.
    pub fn hits_at(&self, ndc: Point) -> Vec<RayHit<ShapeId>> {
        let ray = self.camera.ray_from_ndc(ndc);
        cast_ray(
            &ray,
            self.scene.shapes_front_to_back().map(|s| (s.id(), s.node())),
            self.config.line_pick_threshold,
        )
    }

    /// The nearest shape under an NDC position.
    pub fn pick(&self, ndc: Point) -> Option<RayHit<ShapeId>> {
        self.hits_at(ndc).into_iter().next()
    }

    /// Select every shape whose projected position lies in the rectangle.
    ///
    /// Returns how many shapes matched. Existing selection is kept.
    pub fn select_in_rect(&mut self, rect: NdcRect) -> usize {
        let ids: Vec<ShapeId> = self
            .scene
            .shapes_ordered()
            .filter(|s| rect.contains(self.camera.project_to_screen(s.node().transform.position)))
            .map(|s| s.id())
            .collect();
        for id in &ids {
            self.select(*id);
        }
        ids.len()
    }

    /// Marquee rectangle in pixels while one is being dragged out.
    pub fn marquee_screen_rect(&self) -> Option<Rect> {
        match &self.interaction {
            InteractionState::MarqueeSelecting(session) if session.moved => {
                Some(session.screen_rect())
            }
            _ => None,
        }
    }

    /// Frame all shapes in the camera.
    pub fn fit_to_content(&mut self) {
        match self.scene.bounds() {
            Some(bounds) => self.camera.fit_to_bounds(bounds, 1.0),
            None => self.camera.reset(),
        }
    }

    /// Handle a pointer event from the host.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> PointerResponse {
        if !self.attached {
            log::trace!("Ignoring {:?} while detached", event);
            return PointerResponse::default();
        }

        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::ContextMenu { .. } => self.context_menu(),
            PointerEvent::Cancel => {
                self.cancel_interaction();
                PointerResponse::default()
            }
        }
    }

    /// Abort the gesture in progress. A moved drag target returns to where
    /// it was pressed.
    pub fn cancel_interaction(&mut self) {
        if let InteractionState::Dragging(session) = std::mem::take(&mut self.interaction) {
            if session.moved {
                if let Some(shape) = self.scene.get_shape_mut(session.target) {
                    shape.apply_properties(
                        &Properties::new().with_position(session.origin.x, session.origin.y),
                    );
                }
            }
        }
    }

    fn multi_select_held(&self) -> bool {
        self.modifiers.is_held(self.config.multi_select_modifier)
    }

    fn to_ndc(&self, position: Point) -> Point {
        Camera::viewport_to_ndc(position, self.viewport_size)
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) -> PointerResponse {
        if button != MouseButton::Left {
            return PointerResponse::default();
        }

        let hit = self.pick(self.to_ndc(position));
        self.interaction = match hit {
            Some(hit) => {
                let origin = self
                    .scene
                    .get_shape(hit.key)
                    .map_or(hit.point, |s| s.node().transform.position);
                InteractionState::Dragging(DragSession::new(
                    hit.key,
                    hit.point - origin,
                    origin,
                    position,
                ))
            }
            None => InteractionState::MarqueeSelecting(MarqueeSession::new(position)),
        };
        PointerResponse::default()
    }

    fn pointer_move(&mut self, position: Point) -> PointerResponse {
        let threshold = self.config.drag_threshold;
        let ndc = self.to_ndc(position);

        match &mut self.interaction {
            InteractionState::Idle => {}
            InteractionState::Dragging(session) => {
                let was_moved = session.moved;
                if !session.update(position, threshold) {
                    return PointerResponse::default();
                }
                if !was_moved {
                    log::debug!("Drag started on {}", session.target);
                }

                let ray = self.camera.ray_from_ndc(ndc);
                let plane = Plane::view_aligned(self.config.drag_plane_offset);
                if let Some(point) = intersect_ray_plane(&ray, &plane) {
                    let target = point - session.grab_offset;
                    if let Some(shape) = self.scene.get_shape_mut(session.target) {
                        shape.apply_properties(&Properties::new().with_position(target.x, target.y));
                    }
                }
            }
            InteractionState::MarqueeSelecting(session) => session.update(position, threshold),
        }
        PointerResponse::default()
    }

    fn pointer_up(&mut self, position: Point, button: MouseButton) -> PointerResponse {
        if button != MouseButton::Left {
            return PointerResponse::default();
        }

        match std::mem::take(&mut self.interaction) {
            InteractionState::Idle => PointerResponse::default(),
            InteractionState::Dragging(session) => {
                if session.moved {
                    log::debug!("Drag finished on {}", session.target);
                    PointerResponse::default()
                } else {
                    self.click(Some(session.target))
                }
            }
            InteractionState::MarqueeSelecting(mut session) => {
                session.update(position, self.config.drag_threshold);
                if session.moved {
                    self.finish_marquee(&session)
                } else {
                    self.click(None)
                }
            }
        }
    }

    fn click(&mut self, hit: Option<ShapeId>) -> PointerResponse {
        let before = self.selection.clone();
        if !self.multi_select_held() {
            self.clear_selection();
        }
        if let Some(id) = hit {
            self.select(id);
        }
        PointerResponse {
            prevent_default: false,
            selection_changed: before != self.selection,
        }
    }

    fn finish_marquee(&mut self, session: &MarqueeSession) -> PointerResponse {
        let before = self.selection.clone();
        if !self.multi_select_held() {
            self.clear_selection();
        }
        let rect = NdcRect::from_corners(self.to_ndc(session.anchor), self.to_ndc(session.current));
        let count = self.select_in_rect(rect);
        log::debug!("Marquee matched {} shapes", count);
        PointerResponse {
            prevent_default: false,
            selection_changed: before != self.selection,
        }
    }

    fn context_menu(&mut self) -> PointerResponse {
        self.cancel_interaction();
        PointerResponse {
            prevent_default: true,
            selection_changed: self.clear_selection(),
        }
    }
}
