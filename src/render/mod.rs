//! Rendering
//!
//! The scene never talks to the graphics library directly. It goes through
//! `RenderBackend`, which owns the two operations a model needs: draw it with
//! a placement and tint, and release it.

mod gpu;
pub mod overlay;

pub use gpu::{GpuModel, MacroquadRenderer};

use macroquad::color::Color;

use crate::scene::Transform;

/// Draw/release operations for backend-owned model handles.
pub trait RenderBackend {
    /// Model handle owned by a game object
    type Model;

    /// Draw `model` once with the given placement and tint.
    fn draw_model(&mut self, model: &mut Self::Model, transform: &Transform, tint: Color);

    /// Release a model's resources. Takes ownership, so each model is
    /// released at most once.
    fn release_model(&mut self, model: Self::Model);
}
