//! Core application state and lifecycle.

use kurbo::{Point, Size, Vec2};
use peniko::Color;
use space2d_core::{InteractionConfig, Modifiers, PointerEvent, SceneController};
use space2d_render::{GridStyle, RenderContext, Renderer, VelloRenderer, collect_labels};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::demo;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{SelectedShapeProps, UiAction, UiState, render_labels, render_ui};

/// Zoom factor applied per wheel step.
const ZOOM_STEP: f64 = 1.1;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub background_color: Color,
    pub interaction: InteractionConfig,
    /// Populate the scene with one shape of each kind at start-up.
    pub demo_scene: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Space2D".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            background_color: Color::from_rgba8(0, 0, 0, 255),
            interaction: InteractionConfig::default(),
            demo_scene: true,
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Converts the Rgba8 render target to the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    controller: SceneController,
    config: AppConfig,
    /// Last cursor position in physical pixels.
    cursor: Point,
    /// Cursor position at the last pan step while the middle button is down.
    pan_anchor: Option<Point>,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface is usually Bgra8Unorm.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut controller = SceneController::with_config(self.config.interaction.clone());
        controller.attach(Size::new(
            surface.config.width as f64,
            surface.config.height as f64,
        ));
        if self.config.demo_scene {
            demo::populate(&mut controller);
        }

        log::info!(
            "Space2D initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!("Press F1 for keyboard shortcuts");

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState {
                grid_style: self.config.grid_style,
                ..UiState::default()
            },
            controller,
            config: self.config.clone(),
            cursor: Point::ZERO,
            pan_anchor: None,
        });

        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    fn viewport(&self) -> Size {
        Size::new(
            self.surface.config.width as f64,
            self.surface.config.height as f64,
        )
    }

    fn apply_ui_action(&mut self, action: UiAction) {
        if let Some(patch) = action.property_patch() {
            self.controller.update_properties(&patch);
            return;
        }

        match action {
            UiAction::DeleteSelected => self.apply_shortcut(ShortcutAction::DeleteSelected),
            UiAction::ClearSelection => {
                self.controller.clear_selection();
            }
            UiAction::SetGridStyle(style) => {
                self.ui_state.grid_style = style;
            }
            UiAction::ResetCamera => self.apply_shortcut(ShortcutAction::ResetCamera),
            UiAction::FitContent => self.apply_shortcut(ShortcutAction::FitContent),
            UiAction::ToggleShortcuts => {
                self.ui_state.shortcuts_open = !self.ui_state.shortcuts_open;
            }
            UiAction::SetColor(_) | UiAction::SetPosition { .. } | UiAction::SetScale { .. } => {}
        }
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SelectAll => {
                self.controller.select_all();
            }
            ShortcutAction::DeleteSelected => {
                let removed = self.controller.remove_selected();
                if removed > 0 {
                    log::info!("Deleted {} shape(s)", removed);
                }
            }
            ShortcutAction::Cancel => {
                self.controller.cancel_interaction();
                self.controller.clear_selection();
                self.ui_state.shortcuts_open = false;
            }
            ShortcutAction::CycleGrid => {
                self.ui_state.grid_style = self.ui_state.grid_style.next();
                log::info!("Grid style: {}", self.ui_state.grid_style.name());
            }
            ShortcutAction::ResetCamera => self.controller.camera.reset(),
            ShortcutAction::FitContent => self.controller.fit_to_content(),
            ShortcutAction::ShowHelp => {
                ShortcutRegistry::print_all();
                self.ui_state.shortcuts_open = true;
            }
        }
    }

    fn render(&mut self, render_cx: &vello::util::RenderContext) {
        let viewport = self.viewport();
        let selected_props = SelectedShapeProps::from_controller(&self.controller);
        let labels = collect_labels(&self.controller, viewport);

        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut ui_action = None;
        let ui_state = &mut self.ui_state;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            render_labels(ctx, &labels);
            ui_action = render_ui(ctx, ui_state, &selected_props);
        });
        if let Some(action) = ui_action {
            self.apply_ui_action(action);
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let render_ctx = RenderContext::new(&self.controller, viewport)
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.config.background_color)
            .with_grid(self.ui_state.grid_style)
            .with_selection_rect(self.controller.marquee_screen_rect());
        self.shape_renderer.build_scene(&render_ctx);
        let scene = self.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a storage-bindable Rgba8Unorm target.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass.
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        self.window.request_redraw();
    }
}

/// Shortcut name for a logical key, matching `Shortcut::key`.
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(c) => Some(c.to_uppercase()),
        Key::Named(NamedKey::Delete) => Some("Delete".to_string()),
        Key::Named(NamedKey::Backspace) => Some("Backspace".to_string()),
        Key::Named(NamedKey::Escape) => Some("Escape".to_string()),
        Key::Named(NamedKey::F1) => Some("F1".to_string()),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        // SAFETY: the surface's window is an Arc kept alive in AppState.
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.controller.detach();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                state
                    .controller
                    .set_viewport_size(Size::new(size.width as f64, size.height as f64));

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.render(render_cx);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x, position.y);
                state.cursor = point;

                if let Some(anchor) = state.pan_anchor {
                    let viewport = state.viewport();
                    state.controller.camera.pan_pixels(point - anchor, viewport);
                    state.pan_anchor = Some(point);
                    return;
                }

                // Moves keep flowing during a gesture so a drag can cross the panel.
                if egui_wants_input && state.controller.interaction().is_idle() {
                    return;
                }
                state
                    .controller
                    .handle_pointer_event(PointerEvent::Move { position: point });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let position = state.cursor;
                let pressed = btn_state == ElementState::Pressed;

                // Releases always reach the controller so gestures can finish.
                if egui_wants_input && pressed {
                    return;
                }

                match (button, pressed) {
                    (MouseButton::Left, true) => {
                        state.controller.handle_pointer_event(PointerEvent::Down {
                            position,
                            button: space2d_core::MouseButton::Left,
                        });
                    }
                    (MouseButton::Left, false) => {
                        state.controller.handle_pointer_event(PointerEvent::Up {
                            position,
                            button: space2d_core::MouseButton::Left,
                        });
                    }
                    (MouseButton::Right, true) => {
                        let response = state
                            .controller
                            .handle_pointer_event(PointerEvent::ContextMenu { position });
                        if response.prevent_default {
                            log::debug!("Context menu suppressed");
                        }
                    }
                    (MouseButton::Middle, true) => state.pan_anchor = Some(position),
                    (MouseButton::Middle, false) => state.pan_anchor = None,
                    _ => {}
                }
            }

            WindowEvent::CursorLeft { .. } => {
                state.pan_anchor = None;
                state.controller.handle_pointer_event(PointerEvent::Cancel);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_input {
                    return;
                }

                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(x as f64 * 20.0, y as f64 * 20.0),
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x, pos.y),
                };
                if scroll.y == 0.0 {
                    return;
                }

                let factor = if scroll.y > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                let viewport = state.viewport();
                state.controller.camera.zoom_at(state.cursor, factor, viewport);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let m = modifiers.state();
                state.controller.set_modifiers(Modifiers {
                    shift: m.shift_key(),
                    ctrl: m.control_key(),
                    alt: m.alt_key(),
                    meta: m.super_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed || event.repeat {
                    return;
                }

                let Some(key) = key_name(&event.logical_key) else {
                    return;
                };
                let modifiers = state.controller.modifiers();
                let ctrl = modifiers.ctrl || modifiers.meta;
                if let Some(action) = ShortcutRegistry::find(&key, ctrl, modifiers.shift) {
                    log::debug!("Shortcut {:?}", action);
                    state.apply_shortcut(action);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Space2D");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.grid_style, GridStyle::Lines);
        assert!(config.demo_scene);
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(&Key::Character("a".into())), Some("A".to_string()));
        assert_eq!(
            key_name(&Key::Named(NamedKey::Escape)),
            Some("Escape".to_string())
        );
        assert_eq!(key_name(&Key::Named(NamedKey::Tab)), None);
    }
}
