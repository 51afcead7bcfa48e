//! Viewer configuration
//!
//! Uses RON (Rusty Object Notation) for a human-readable settings file.
//! Every field is optional; missing fields take the built-in defaults, which
//! describe the stock scene: one `assets/scene.gltf` model, an orbiting
//! camera, a 20-slice grid and an FPS counter.
//!
//! ```ron
//! (
//!     window: (title: "My scene", width: 1280, height: 720),
//!     camera: (position: (30.0, 20.0, 30.0), fovy: 60.0),
//!     objects: [
//!         (model: Some("assets/ship.glb"), tags: "MODEL | SOLID", scale: (2.0, 2.0, 2.0)),
//!     ],
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scene::registry::MAX_OBJECTS;
use crate::scene::{Tags, Transform};
use crate::viewer::frame::FpsLimit;

/// Settings file looked up in the working directory
pub const CONFIG_PATH: &str = "viewer.ron";

/// Model loaded by the stock scene
pub const DEFAULT_MODEL_PATH: &str = "assets/scene.gltf";

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Window creation flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
    /// Wait for vertical sync (swap interval 1)
    pub vsync: bool,
    /// Keep the window above others (not supported by every backend)
    pub topmost: bool,
    pub resizable: bool,
    pub high_dpi: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "scene viewer - models loading".to_string(),
            width: 800,
            height: 450,
            vsync: true,
            topmost: true,
            resizable: true,
            high_dpi: false,
        }
    }
}

/// Camera projection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

/// Initial camera placement and orbit controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees (perspective) or view height in
    /// world units (orthographic)
    pub fovy: f32,
    pub projection: ProjectionKind,
    /// Automatic orbit speed around the up axis, radians per second
    pub orbit_speed: f32,
    /// Fraction of the distance covered by one wheel notch
    pub zoom_step: f32,
    /// Radians per pixel of right-button drag
    pub drag_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [50.0, 50.0, 50.0],
            target: [0.0, 10.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fovy: 80.0,
            projection: ProjectionKind::Perspective,
            orbit_speed: 0.5,
            zoom_step: 0.1,
            drag_sensitivity: 0.005,
            min_distance: 0.5,
            max_distance: 1000.0,
        }
    }
}

/// Ground-plane grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub visible: bool,
    pub slices: u32,
    pub spacing: f32,
    pub axes_color: [u8; 4],
    pub line_color: [u8; 4],
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            slices: 20,
            spacing: 1.0,
            axes_color: [128, 128, 128, 255],
            line_color: [191, 191, 191, 255],
        }
    }
}

/// Frame-rate readout in the top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsOverlaySettings {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl Default for FpsOverlaySettings {
    fn default() -> Self {
        Self {
            visible: true,
            x: 10.0,
            y: 10.0,
            font_size: 20.0,
        }
    }
}

/// One object placed in the scene at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSettings {
    /// Model file (`.gltf` / `.glb`); ignored unless tagged `MODEL`
    pub model: Option<PathBuf>,
    pub tags: Tags,
    pub position: [f32; 3],
    pub rotation_axis: [f32; 3],
    /// Degrees
    pub rotation_angle: f32,
    pub scale: [f32; 3],
    pub tint: [u8; 4],
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self {
            model: None,
            tags: Tags::empty(),
            position: [0.0, 0.0, 0.0],
            rotation_axis: [0.0, 0.0, 0.0],
            rotation_angle: 0.0,
            scale: [1.0, 1.0, 1.0],
            tint: [255, 255, 255, 255],
        }
    }
}

impl ObjectSettings {
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            scale: self.scale,
            rotation_axis: self.rotation_axis,
            rotation_angle: self.rotation_angle,
        }
    }

    /// The stock scene model: Z-up asset turned upright and scaled down.
    pub fn stock_model() -> Self {
        Self {
            model: Some(PathBuf::from(DEFAULT_MODEL_PATH)),
            tags: Tags::MODEL,
            rotation_axis: [1.0, 0.0, 0.0],
            rotation_angle: 270.0,
            scale: [0.3, 0.3, 0.3],
            ..Default::default()
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub fps_limit: FpsLimit,
    /// Background color behind the scene
    pub clear_color: [u8; 4],
    pub grid: GridSettings,
    pub fps_overlay: FpsOverlaySettings,
    /// Upper bound on scene objects
    pub max_objects: usize,
    pub objects: Vec<ObjectSettings>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            fps_limit: FpsLimit::default(),
            clear_color: [102, 191, 255, 255],
            grid: GridSettings::default(),
            fps_overlay: FpsOverlaySettings::default(),
            max_objects: MAX_OBJECTS,
            objects: vec![ObjectSettings::stock_model()],
        }
    }
}

/// Check a float is usable (not NaN or Inf)
fn is_valid_float(f: f32) -> bool {
    f.is_finite()
}

fn validate_vec3(v: &[f32; 3], context: &str) -> Result<(), String> {
    if v.iter().all(|c| is_valid_float(*c)) {
        Ok(())
    } else {
        Err(format!("{}: non-finite component in {:?}", context, v))
    }
}

impl ViewerConfig {
    /// Reject settings that would produce a broken window or camera.
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width <= 0 || self.window.height <= 0 {
            return Err(format!(
                "window size must be positive ({}x{})",
                self.window.width, self.window.height
            ));
        }

        let cam = &self.camera;
        validate_vec3(&cam.position, "camera.position")?;
        validate_vec3(&cam.target, "camera.target")?;
        validate_vec3(&cam.up, "camera.up")?;
        let up_len: f32 = cam.up.iter().map(|c| c * c).sum();
        if up_len < 1e-12 {
            return Err("camera.up must not be zero".to_string());
        }
        match cam.projection {
            ProjectionKind::Perspective if !(cam.fovy > 0.0 && cam.fovy < 180.0) => {
                return Err(format!("camera.fovy must be in (0, 180) degrees, got {}", cam.fovy));
            }
            ProjectionKind::Orthographic if !(cam.fovy > 0.0 && cam.fovy.is_finite()) => {
                return Err(format!("camera.fovy must be a positive view height, got {}", cam.fovy));
            }
            _ => {}
        }
        if !(cam.min_distance > 0.0 && cam.min_distance <= cam.max_distance && cam.max_distance.is_finite()) {
            return Err(format!(
                "camera distance range is invalid ({}..{})",
                cam.min_distance, cam.max_distance
            ));
        }
        if !is_valid_float(cam.orbit_speed) || !is_valid_float(cam.zoom_step) || !is_valid_float(cam.drag_sensitivity) {
            return Err("camera speeds must be finite".to_string());
        }

        if !(self.grid.spacing > 0.0 && self.grid.spacing.is_finite()) {
            return Err(format!("grid.spacing must be positive, got {}", self.grid.spacing));
        }

        if self.max_objects == 0 {
            return Err("max_objects must be at least 1".to_string());
        }
        if self.objects.len() > self.max_objects {
            return Err(format!(
                "{} objects configured but max_objects is {}",
                self.objects.len(), self.max_objects
            ));
        }
        for (i, obj) in self.objects.iter().enumerate() {
            let context = format!("objects[{}]", i);
            validate_vec3(&obj.position, &context)?;
            validate_vec3(&obj.rotation_axis, &context)?;
            validate_vec3(&obj.scale, &context)?;
            if !is_valid_float(obj.rotation_angle) {
                return Err(format!("{}: non-finite rotation_angle", context));
            }
            if obj.tags.has(Tags::MODEL) && obj.model.is_none() {
                return Err(format!("{}: tagged MODEL but no model path given", context));
            }
        }

        Ok(())
    }
}

/// Parse configuration from a RON string.
pub fn load_config_from_str(s: &str) -> Result<ViewerConfig, ConfigError> {
    let config: ViewerConfig = ron::from_str(s)?;
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

/// Load configuration from a RON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ViewerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load configuration, falling back to defaults.
///
/// A missing file is normal; anything else is logged as an error.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> ViewerConfig {
    let path = path.as_ref();
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(ConfigError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No {} found, using default scene", path.display());
            ViewerConfig::default()
        }
        Err(e) => {
            log::error!("Failed to load {}: {}; using default scene", path.display(), e);
            ViewerConfig::default()
        }
    }
}
