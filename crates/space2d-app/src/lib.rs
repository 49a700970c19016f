//! Space2D Application
//!
//! The desktop shell: windowing, input mapping, and the egui overlay
//! around the scene controller.

mod app;
pub mod demo;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use ui::{SelectedShapeProps, UiAction, UiState, render_labels, render_ui};
