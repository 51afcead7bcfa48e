//! Viewer frame loop
//!
//! Drives the window through `Initializing -> Running -> ShuttingDown`.
//! Everything that touches the GPU happens between the first and last frame
//! of `run`, so the scene is always unloaded while the context is alive.

pub mod frame;

use std::fmt::Display;
use std::path::Path;

use macroquad::camera::{set_camera, set_default_camera};
use macroquad::color::Color;
use macroquad::input::{is_key_pressed, is_quit_requested, mouse_position, prevent_quit, KeyCode};
use macroquad::math::{Vec2, Vec3};
use macroquad::time::{get_frame_time, get_time};
use macroquad::window::{clear_background, next_frame};

use crate::asset::load_model;
use crate::camera::{OrbitCamera, OrbitInput};
use crate::config::{ObjectSettings, ViewerConfig};
use crate::render::overlay::{draw_fps, draw_reference_grid};
use crate::render::{GpuModel, MacroquadRenderer};
use crate::scene::{GameObject, Scene, SceneError, Tags};
use frame::FrameLimiter;

/// Lifecycle of the viewer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Window open, scene being built
    Initializing,
    /// Drawing frames until a close is requested
    Running,
    /// Releasing scene resources
    ShuttingDown,
    /// Nothing left to do; the window closes
    Terminated,
}

impl ViewerState {
    /// Next state after one step. `close_requested` only matters while running.
    pub fn next(self, close_requested: bool) -> Self {
        match self {
            ViewerState::Initializing => ViewerState::Running,
            ViewerState::Running if close_requested => ViewerState::ShuttingDown,
            ViewerState::Running => ViewerState::Running,
            ViewerState::ShuttingDown | ViewerState::Terminated => ViewerState::Terminated,
        }
    }
}

fn rgba(c: [u8; 4]) -> Color {
    Color::from_rgba(c[0], c[1], c[2], c[3])
}

/// Build the scene from the configured objects.
///
/// `load` turns a model path into a backend model. An object tagged `MODEL`
/// is only kept once its model is loaded: a missing path (which config
/// validation already rejects) or a failed load skips the object. Objects
/// past the scene capacity are skipped too. Every skip is logged.
pub fn populate_scene<M, E, F>(config: &ViewerConfig, mut load: F) -> Scene<M>
where
    E: Display,
    F: FnMut(&Path) -> Result<M, E>,
{
    let mut scene = Scene::with_capacity(config.max_objects);

    for (index, settings) in config.objects.iter().enumerate() {
        let Some(object) = build_object(index, settings, &mut load) else {
            continue;
        };
        log::debug!(
            "Object {}: tags {:?} at {:?}",
            index,
            object.tags(),
            object.transform.position()
        );
        if let Err(SceneError::Full { capacity }) = scene.add(object) {
            log::error!("Object {} not added: scene is full ({} objects)", index, capacity);
        }
    }

    let models = scene.iter().filter(|o| o.model().is_some()).count();
    log::info!(
        "Scene ready: {} of {} objects, {} with models (capacity {})",
        scene.len(),
        config.objects.len(),
        models,
        scene.capacity()
    );
    scene
}

fn build_object<M, E, F>(index: usize, settings: &ObjectSettings, load: &mut F) -> Option<GameObject<M>>
where
    E: Display,
    F: FnMut(&Path) -> Result<M, E>,
{
    let object = GameObject::new(Vec3::from_array(settings.position), settings.tags)
        .with_transform(settings.transform())
        .with_tint(rgba(settings.tint));

    if !settings.tags.has(Tags::MODEL) {
        return Some(object);
    }
    let Some(path) = settings.model.as_deref() else {
        log::error!("Object {} is tagged MODEL but has no model path, skipped", index);
        return None;
    };

    match load(path) {
        Ok(model) => Some(object.with_model(model)),
        Err(e) => {
            log::error!("Failed to load model {}: {}", path.display(), e);
            None
        }
    }
}

/// Load a model file and upload it. Needs a live macroquad context.
fn load_gpu_model(path: &Path) -> Result<GpuModel, crate::asset::AssetError> {
    let data = load_model(path)?;
    log::info!("meshcount {}", data.mesh_count());
    log::debug!(
        "{}: {} vertices, {} triangles, {} textures",
        path.display(),
        data.vertex_count(),
        data.triangle_count(),
        data.textures.len()
    );
    Ok(GpuModel::upload(&data))
}

fn close_requested() -> bool {
    is_quit_requested() || is_key_pressed(KeyCode::Escape)
}

/// Run the viewer until the window is closed.
pub async fn run(config: ViewerConfig) {
    let mut state = ViewerState::Initializing;

    // Initializing
    prevent_quit();
    if config.window.topmost {
        log::warn!("Always-on-top windows are not supported, ignoring window.topmost");
    }
    let mut camera = OrbitCamera::from_settings(&config.camera);
    log::debug!(
        "Camera orbiting {:?} at distance {:.1}, {:.2} rad from up",
        camera.target,
        camera.distance(),
        camera.polar_angle()
    );
    let mut renderer = MacroquadRenderer::new();
    let mut scene = populate_scene(&config, load_gpu_model);
    if scene.is_empty() {
        log::warn!("Scene is empty, only the grid will be drawn");
    }
    let limiter = FrameLimiter::new(config.fps_limit);
    log::info!("Frame limit: {}", config.fps_limit.label());

    let clear_color = rgba(config.clear_color);
    let mut last_mouse = Vec2::from(mouse_position());
    state = state.next(false);

    // Running
    while state == ViewerState::Running {
        let frame_start = get_time();
        let delta = get_frame_time();

        state = state.next(close_requested());
        if state != ViewerState::Running {
            break;
        }

        let input = OrbitInput::poll(&mut last_mouse);
        camera.update(&input, delta);

        clear_background(clear_color);

        set_camera(&camera.to_camera3d());
        scene.draw_all(delta, &mut renderer);
        draw_reference_grid(&config.grid);

        set_default_camera();
        draw_fps(&config.fps_overlay);

        limiter.wait(frame_start);
        next_frame().await;
    }

    // ShuttingDown
    let count = scene.len();
    scene.unload_all(&mut renderer);
    state = state.next(false);
    log::info!("Unloaded {} objects ({:?})", count, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::object::tests::RecordingBackend;
    use std::path::PathBuf;

    fn object(model: &str) -> ObjectSettings {
        ObjectSettings {
            model: Some(PathBuf::from(model)),
            tags: Tags::MODEL,
            ..Default::default()
        }
    }

    fn fake_load(path: &Path) -> Result<&'static str, String> {
        match path.to_str() {
            Some("a.gltf") => Ok("a"),
            Some("b.gltf") => Ok("b"),
            Some("c.gltf") => Ok("c"),
            _ => Err(format!("no such model: {}", path.display())),
        }
    }

    #[test]
    fn test_state_transitions() {
        use ViewerState::*;
        assert_eq!(Initializing.next(false), Running);
        assert_eq!(Initializing.next(true), Running);
        assert_eq!(Running.next(false), Running);
        assert_eq!(Running.next(true), ShuttingDown);
        assert_eq!(ShuttingDown.next(false), Terminated);
        assert_eq!(Terminated.next(true), Terminated);
    }

    #[test]
    fn test_populate_keeps_config_order() {
        let config = ViewerConfig {
            objects: vec![object("a.gltf"), object("b.gltf"), object("c.gltf")],
            ..Default::default()
        };
        let mut scene = populate_scene(&config, fake_load);
        assert_eq!(scene.len(), 3);

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        assert_eq!(backend.draw_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_load_is_skipped() {
        let config = ViewerConfig {
            objects: vec![object("a.gltf"), object("missing.gltf"), object("c.gltf")],
            ..Default::default()
        };
        let mut scene = populate_scene(&config, fake_load);
        assert_eq!(scene.len(), 2);

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        assert_eq!(backend.draw_order(), vec!["a", "c"]);
    }

    #[test]
    fn test_untagged_object_is_not_loaded() {
        let config = ViewerConfig {
            objects: vec![ObjectSettings {
                model: Some(PathBuf::from("missing.gltf")),
                tags: Tags::SOLID,
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut calls = 0;
        let scene = populate_scene(&config, |p| {
            calls += 1;
            fake_load(p)
        });
        assert_eq!(calls, 0);
        assert_eq!(scene.len(), 1);
        assert!(scene.iter().all(|o| o.model().is_none()));
    }

    #[test]
    fn test_model_object_without_path_is_skipped() {
        let config = ViewerConfig {
            objects: vec![
                object("a.gltf"),
                ObjectSettings { model: None, ..object("b.gltf") },
                object("c.gltf"),
            ],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut scene = populate_scene(&config, fake_load);
        assert_eq!(scene.len(), 2);
        assert!(scene.iter().all(|o| o.model().is_some()));

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        assert_eq!(backend.draw_order(), vec!["a", "c"]);
    }

    #[test]
    fn test_capacity_overflow_is_skipped() {
        let config = ViewerConfig {
            max_objects: 2,
            objects: vec![object("a.gltf"), object("b.gltf"), object("c.gltf")],
            ..Default::default()
        };
        let scene = populate_scene(&config, fake_load);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.capacity(), 2);

        let mut backend = RecordingBackend::default();
        scene.unload_all(&mut backend);
        assert_eq!(backend.releases(), 2);
    }

    #[test]
    fn test_object_placement_comes_from_settings() {
        let config = ViewerConfig {
            objects: vec![ObjectSettings {
                position: [1.0, 2.0, 3.0],
                tint: [255, 0, 0, 255],
                ..object("a.gltf")
            }],
            ..Default::default()
        };
        let scene = populate_scene(&config, fake_load);
        let obj = scene.iter().next().unwrap();
        assert_eq!(obj.transform.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.tint, Color::from_rgba(255, 0, 0, 255));
    }
}
