//! scene-viewer: a minimal 3D model viewer
//!
//! Opens a window, loads the models listed in `viewer.ron` (or the stock
//! `assets/scene.gltf`), and orbits a camera around them over a reference
//! grid until the window is closed.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod asset;
mod camera;
mod config;
mod render;
mod scene;
mod viewer;

use macroquad::miniquad::conf::Platform;
use macroquad::window::Conf;

use config::ViewerConfig;

fn window_conf(config: &ViewerConfig) -> Conf {
    let window = &config.window;
    Conf {
        window_title: window.title.clone(),
        window_width: window.width,
        window_height: window.height,
        window_resizable: window.resizable,
        high_dpi: window.high_dpi,
        platform: Platform {
            swap_interval: Some(if window.vsync { 1 } else { 0 }),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Warning: Could not initialize logger: {}", e);
    }
    log::info!("scene-viewer v{}", VERSION);

    let config = config::load_or_default(config::CONFIG_PATH);
    macroquad::Window::from_config(window_conf(&config), viewer::run(config));
    log::info!("Window closed");
}
