//! Space2D Render Library
//!
//! Renderer abstraction and implementations for the Space2D editor.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{GridStyle, LabelPlacement, RenderContext, Renderer, collect_labels};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
