//! egui overlay: property panel, bottom toolbar, text labels and the
//! shortcuts modal.

use crate::shortcuts::ShortcutRegistry;
use egui::{Align2, Color32, Context, CornerRadius, FontId, Frame, Margin, Pos2, Stroke, Vec2};
use space2d_core::{Properties, SceneController, ShapeColor, ShapeTrait};
use space2d_render::{GridStyle, LabelPlacement};

/// Swatches offered by the color picker.
pub const COLOR_PALETTE: [(u32, &str); 8] = [
    (0x00ff00, "Green"),
    (0x0000ff, "Blue"),
    (0xff0000, "Red"),
    (0xffffff, "White"),
    (0xffa500, "Orange"),
    (0x800080, "Purple"),
    (0x00ffff, "Cyan"),
    (0x000000, "Black"),
];

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetColor(ShapeColor),
    /// Move the selection. Only the edited axes are set.
    SetPosition { x: Option<f64>, y: Option<f64> },
    /// Rescale the selection. Only the edited axes are set.
    SetScale { x: Option<f64>, y: Option<f64> },
    DeleteSelected,
    ClearSelection,
    SetGridStyle(GridStyle),
    ResetCamera,
    FitContent,
    ToggleShortcuts,
}

impl UiAction {
    /// Property patch for actions that edit the selected shapes.
    pub fn property_patch(&self) -> Option<Properties> {
        match self {
            UiAction::SetColor(color) => Some(Properties::new().with_color(color.to_hex())),
            UiAction::SetPosition { x, y } => match (*x, *y) {
                (Some(x), Some(y)) => Some(Properties::new().with_position(x, y)),
                (Some(x), None) => Some(Properties::new().with_position_x(x)),
                (None, Some(y)) => Some(Properties::new().with_position_y(y)),
                (None, None) => None,
            },
            UiAction::SetScale { x, y } => match (*x, *y) {
                (Some(x), Some(y)) => Some(Properties::new().with_scale(x, y)),
                (Some(x), None) => Some(Properties::new().with_scale_x(x)),
                (None, Some(y)) => Some(Properties::new().with_scale_y(y)),
                (None, None) => None,
            },
            _ => None,
        }
    }
}

/// UI state that persists across frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub grid_style: GridStyle,
    pub shortcuts_open: bool,
}

/// Snapshot of the primary selected shape, shown in the right panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedShapeProps {
    pub count: usize,
    pub kind: Option<&'static str>,
    /// Stored color, not the highlight the shape is drawn with.
    pub color: Option<ShapeColor>,
    pub position: kurbo::Point,
    pub scale: kurbo::Vec2,
}

impl SelectedShapeProps {
    pub fn from_controller(controller: &SceneController) -> Self {
        let ids = controller.selected_ids();
        let Some(shape) = ids.first().and_then(|id| controller.scene().get_shape(*id)) else {
            return Self::default();
        };

        let color = match shape.properties().color() {
            Some(Ok(color)) => Some(color),
            _ => shape.base_material().color(),
        };
        let transform = &shape.node().transform;
        Self {
            count: ids.len(),
            kind: Some(shape.kind_name()),
            color,
            position: transform.position,
            scale: transform.scale,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.count > 0
    }
}

/// Render the UI and return any triggered action.
pub fn render_ui(
    ctx: &Context,
    ui_state: &mut UiState,
    selected_props: &SelectedShapeProps,
) -> Option<UiAction> {
    let mut action = render_bottom_toolbar(ctx, ui_state);

    if let Some(panel_action) = render_right_panel(ctx, selected_props) {
        action = Some(panel_action);
    }

    if ui_state.shortcuts_open {
        render_shortcuts_modal(ctx, ui_state);
    }

    action
}

/// Draw text shape content. Rects are in physical pixels.
pub fn render_labels(ctx: &Context, labels: &[LabelPlacement]) {
    let ppp = ctx.pixels_per_point();
    let painter = ctx.layer_painter(egui::LayerId::background());

    for label in labels {
        let rect = label.screen_rect;
        let center = Pos2::new((rect.center().x as f32) / ppp, (rect.center().y as f32) / ppp);
        let size = (rect.height() as f32 / ppp * 0.8).max(1.0);
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &label.text,
            FontId::proportional(size),
            to_color32(label.color),
        );
    }
}

fn to_color32(color: ShapeColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(Color32::from_rgba_unmultiplied(250, 250, 252, 250))
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, Color32::from_gray(220)))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [0, 2],
            color: Color32::from_black_alpha(10),
        })
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(11.0).color(Color32::from_gray(100)));
}

fn render_bottom_toolbar(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let margin = 12.0;

    egui::Area::new(egui::Id::new("bottom_toolbar"))
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -margin))
        .interactable(true)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame()
                .inner_margin(Margin::symmetric(12, 6))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);

                        let grid_label = format!("Grid: {}", ui_state.grid_style.name());
                        if ui
                            .button(grid_label)
                            .on_hover_text("Cycle grid style (G)")
                            .clicked()
                        {
                            action = Some(UiAction::SetGridStyle(ui_state.grid_style.next()));
                        }
                        if ui.button("Reset view").on_hover_text("Reset view (0)").clicked() {
                            action = Some(UiAction::ResetCamera);
                        }
                        if ui.button("Fit").on_hover_text("Fit view to shapes (F)").clicked() {
                            action = Some(UiAction::FitContent);
                        }
                        if ui.button("?").on_hover_text("Keyboard shortcuts (F1)").clicked() {
                            action = Some(UiAction::ToggleShortcuts);
                        }
                    });
                });
        });

    action
}

fn render_right_panel(ctx: &Context, props: &SelectedShapeProps) -> Option<UiAction> {
    if !props.has_selection() {
        return None;
    }

    let mut action = None;
    let panel_width = 200.0;
    let margin = 12.0;

    egui::Area::new(egui::Id::new("right_panel"))
        .anchor(Align2::RIGHT_CENTER, Vec2::new(-margin, 0.0))
        .interactable(true)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().inner_margin(Margin::same(12)).show(ui, |ui| {
                ui.set_width(panel_width - 24.0);

                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 8.0);

                    ui.label(
                        egui::RichText::new("Properties")
                            .size(14.0)
                            .strong()
                            .color(Color32::from_gray(60)),
                    );
                    let summary = match (props.kind, props.count) {
                        (Some(kind), 1) => kind.to_string(),
                        (Some(kind), n) => format!("{kind} + {} more", n - 1),
                        (None, _) => String::new(),
                    };
                    ui.label(egui::RichText::new(summary).size(12.0).color(Color32::from_gray(80)));

                    section_label(ui, "Color");
                    if let Some(color) = color_swatches(ui, props.color) {
                        action = Some(UiAction::SetColor(color));
                    }

                    section_label(ui, "Position");
                    let mut position = props.position;
                    let changed = ui
                        .horizontal(|ui| {
                            let x = ui.add(egui::DragValue::new(&mut position.x).speed(0.1).prefix("x "));
                            let y = ui.add(egui::DragValue::new(&mut position.y).speed(0.1).prefix("y "));
                            (x.changed(), y.changed())
                        })
                        .inner;
                    if changed.0 || changed.1 {
                        action = Some(UiAction::SetPosition {
                            x: changed.0.then_some(position.x),
                            y: changed.1.then_some(position.y),
                        });
                    }

                    section_label(ui, "Scale");
                    let mut scale = props.scale;
                    let changed = ui
                        .horizontal(|ui| {
                            let x = ui.add(
                                egui::DragValue::new(&mut scale.x)
                                    .speed(0.05)
                                    .range(0.01..=100.0)
                                    .prefix("x "),
                            );
                            let y = ui.add(
                                egui::DragValue::new(&mut scale.y)
                                    .speed(0.05)
                                    .range(0.01..=100.0)
                                    .prefix("y "),
                            );
                            (x.changed(), y.changed())
                        })
                        .inner;
                    if changed.0 || changed.1 {
                        action = Some(UiAction::SetScale {
                            x: changed.0.then_some(scale.x),
                            y: changed.1.then_some(scale.y),
                        });
                    }

                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        if ui.button("Delete").on_hover_text("Delete (Del)").clicked() {
                            action = Some(UiAction::DeleteSelected);
                        }
                        if ui.button("Deselect").on_hover_text("Deselect (Esc)").clicked() {
                            action = Some(UiAction::ClearSelection);
                        }
                    });
                });
            });
        });

    action
}

/// Row of clickable color circles. Returns the clicked color.
fn color_swatches(ui: &mut egui::Ui, current: Option<ShapeColor>) -> Option<ShapeColor> {
    let mut picked = None;
    let size = 18.0;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(4.0, 4.0);
        for (hex, name) in COLOR_PALETTE {
            let color = ShapeColor::from_hex(hex);
            let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), egui::Sense::click());
            ui.painter().circle_filled(rect.center(), size / 2.0, to_color32(color));

            let ring = if current.map(ShapeColor::to_hex) == Some(hex) {
                Stroke::new(2.0, Color32::from_gray(60))
            } else {
                Stroke::new(1.0, Color32::from_gray(180))
            };
            ui.painter().circle_stroke(rect.center(), size / 2.0, ring);

            if response.on_hover_text(name).clicked() {
                picked = Some(color);
            }
        }
    });

    picked
}

fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    egui::Area::new(egui::Id::new("shortcuts_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.shortcuts_open = false;
            }
        });

    egui::Area::new(egui::Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().inner_margin(Margin::same(16)).show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Keyboard Shortcuts").size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            ui_state.shortcuts_open = false;
                        }
                    });
                });
                ui.add_space(12.0);

                egui::Grid::new("shortcuts_grid")
                    .num_columns(2)
                    .spacing(Vec2::new(24.0, 6.0))
                    .show(ui, |ui| {
                        for shortcut in ShortcutRegistry::all() {
                            ui.label(
                                egui::RichText::new(shortcut.format())
                                    .size(12.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(Color32::from_rgb(100, 116, 139)),
                            );
                            ui.label(
                                egui::RichText::new(shortcut.description)
                                    .size(12.0)
                                    .color(Color32::from_gray(60)),
                            );
                            ui.end_row();
                        }
                    });
            });
        });
}
