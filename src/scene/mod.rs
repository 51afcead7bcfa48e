//! Scene Module
//!
//! Tagged game objects and the registry that owns them.
//!
//! Key concepts:
//! - Tags: capability bitmask (model, player, solid, light)
//! - GameObject: placement + tint + optional owned model
//! - Scene: bounded, insertion-ordered registry; order is draw order
//!
//! The scene is generic over the backend's model handle, so the same code
//! drives the macroquad renderer and the recording backend used in tests.

pub mod tag;
pub mod transform;
pub mod object;
pub mod registry;

pub use tag::Tags;
pub use transform::Transform;
pub use object::GameObject;
pub use registry::{Scene, SceneError};
