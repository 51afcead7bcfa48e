//! Orbit camera
//!
//! The camera circles a fixed target point. It turns on its own at a steady
//! rate, right-button drag adds yaw and pitch, and the wheel (or keypad +/-)
//! zooms toward or away from the target.

use macroquad::camera::{Camera3D, Projection};
use macroquad::input::{is_key_down, is_mouse_button_down, mouse_position, mouse_wheel, KeyCode, MouseButton};
use macroquad::math::{Quat, Vec2, Vec3};

use crate::config::{CameraSettings, ProjectionKind};

/// Closest the camera may get to looking straight along the up axis (radians)
const MIN_POLAR_ANGLE: f32 = 0.05;

/// Wheel notches per second while a zoom key is held
const KEY_ZOOM_RATE: f32 = 5.0;

/// Input gathered for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitInput {
    /// Mouse movement in pixels while the right button is held
    pub drag: Vec2,
    /// Wheel notches this frame (positive zooms in)
    pub scroll: f32,
    /// Held zoom keys: +1 in, -1 out, 0 none
    pub zoom_keys: f32,
}

impl OrbitInput {
    /// Read mouse and keyboard state. `last_mouse` carries the previous
    /// cursor position between frames.
    pub fn poll(last_mouse: &mut Vec2) -> Self {
        let mouse = Vec2::from(mouse_position());
        let drag = if is_mouse_button_down(MouseButton::Right) {
            mouse - *last_mouse
        } else {
            Vec2::ZERO
        };
        *last_mouse = mouse;

        let mut zoom_keys = 0.0;
        if is_key_down(KeyCode::KpAdd) || is_key_down(KeyCode::Equal) {
            zoom_keys += 1.0;
        }
        if is_key_down(KeyCode::KpSubtract) || is_key_down(KeyCode::Minus) {
            zoom_keys -= 1.0;
        }

        Self {
            drag,
            scroll: mouse_wheel().1,
            zoom_keys,
        }
    }
}

/// Camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Unit up vector; also the automatic orbit axis
    pub up: Vec3,
    pub fovy: f32,
    pub projection: ProjectionKind,
    pub orbit_speed: f32,
    pub zoom_step: f32,
    pub drag_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: Vec3::from_array(settings.position),
            target: Vec3::from_array(settings.target),
            up: Vec3::from_array(settings.up).normalize_or_zero(),
            fovy: settings.fovy,
            projection: settings.projection,
            orbit_speed: settings.orbit_speed,
            zoom_step: settings.zoom_step,
            drag_sensitivity: settings.drag_sensitivity,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
        }
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Angle between the up axis and the target-to-camera direction.
    pub fn polar_angle(&self) -> f32 {
        (self.position - self.target).angle_between(self.up)
    }

    /// Advance the camera by one frame.
    pub fn update(&mut self, input: &OrbitInput, dt: f32) {
        let mut offset = self.position - self.target;
        if offset.length_squared() < 1e-12 {
            // Camera sits on the target; nothing sensible to orbit
            return;
        }

        // Yaw: automatic orbit plus horizontal drag
        let yaw = self.orbit_speed * dt - input.drag.x * self.drag_sensitivity;
        if yaw != 0.0 {
            offset = Quat::from_axis_angle(self.up, yaw) * offset;
        }

        // Pitch: dragging down raises the camera
        if input.drag.y != 0.0 {
            let axis = self.up.cross(offset);
            if axis.length_squared() > 1e-12 {
                let polar = offset.angle_between(self.up);
                let wanted = (polar - input.drag.y * self.drag_sensitivity)
                    .clamp(MIN_POLAR_ANGLE, std::f32::consts::PI - MIN_POLAR_ANGLE);
                offset = Quat::from_axis_angle(axis.normalize(), wanted - polar) * offset;
            }
        }

        // Zoom: multiplicative, clamped
        let notches = input.scroll.clamp(-1.0, 1.0) + input.zoom_keys * KEY_ZOOM_RATE * dt;
        let distance = (offset.length() * (1.0 - notches * self.zoom_step))
            .clamp(self.min_distance, self.max_distance);

        self.position = self.target + offset.normalize() * distance;
    }

    /// macroquad camera for this frame.
    pub fn to_camera3d(&self) -> Camera3D {
        let (fovy, projection) = match self.projection {
            ProjectionKind::Perspective => (self.fovy.to_radians(), Projection::Perspective),
            ProjectionKind::Orthographic => (self.fovy, Projection::Orthographics),
        };
        Camera3D {
            position: self.position,
            target: self.target,
            up: self.up,
            fovy,
            projection,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_settings(&CameraSettings::default())
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_idle_orbit_keeps_distance_and_height() {
        let mut cam = camera();
        let start_distance = cam.distance();
        let start_height = cam.position.y;

        for _ in 0..120 {
            cam.update(&OrbitInput::default(), 1.0 / 60.0);
        }
        assert!((cam.distance() - start_distance).abs() < 1e-3);
        assert!((cam.position.y - start_height).abs() < 1e-3);
        assert_ne!(cam.position, Vec3::new(50.0, 50.0, 50.0));
    }

    #[test]
    fn test_half_turn() {
        let mut cam = camera();
        // 0.5 rad/s for 2*PI seconds = PI radians
        cam.update(&OrbitInput::default(), 2.0 * PI);
        assert!(approx(cam.position, Vec3::new(-50.0, 50.0, -50.0)), "got {:?}", cam.position);
    }

    #[test]
    fn test_horizontal_drag_cancels_orbit() {
        let mut cam = camera();
        cam.orbit_speed = 0.0;
        let start = cam.position;

        let input = OrbitInput { drag: Vec2::new(100.0, 0.0), ..Default::default() };
        cam.update(&input, 0.0);
        assert!(!approx(cam.position, start));

        let input = OrbitInput { drag: Vec2::new(-100.0, 0.0), ..Default::default() };
        cam.update(&input, 0.0);
        assert!(approx(cam.position, start));
    }

    #[test]
    fn test_pitch_is_clamped_away_from_poles() {
        let mut cam = camera();
        cam.orbit_speed = 0.0;

        let input = OrbitInput { drag: Vec2::new(0.0, 10_000.0), ..Default::default() };
        cam.update(&input, 0.016);
        assert!(cam.polar_angle() >= MIN_POLAR_ANGLE - 1e-4);

        let input = OrbitInput { drag: Vec2::new(0.0, -10_000.0), ..Default::default() };
        cam.update(&input, 0.016);
        assert!(cam.polar_angle() <= PI - MIN_POLAR_ANGLE + 1e-4);
    }

    #[test]
    fn test_zoom_in_and_clamp() {
        let mut cam = camera();
        cam.orbit_speed = 0.0;
        let start = cam.distance();

        let input = OrbitInput { scroll: 1.0, ..Default::default() };
        cam.update(&input, 0.016);
        assert!((cam.distance() - start * 0.9).abs() < 1e-3);

        for _ in 0..500 {
            cam.update(&input, 0.016);
        }
        assert!((cam.distance() - cam.min_distance).abs() < 1e-4);

        let out = OrbitInput { scroll: -1.0, ..Default::default() };
        for _ in 0..500 {
            cam.update(&out, 0.016);
        }
        assert!((cam.distance() - cam.max_distance).abs() < 1e-2);
    }

    #[test]
    fn test_large_wheel_values_count_as_one_notch() {
        let mut a = camera();
        let mut b = camera();
        a.orbit_speed = 0.0;
        b.orbit_speed = 0.0;

        a.update(&OrbitInput { scroll: 1.0, ..Default::default() }, 0.0);
        b.update(&OrbitInput { scroll: 120.0, ..Default::default() }, 0.0);
        assert!((a.distance() - b.distance()).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_keys_scale_with_time() {
        let mut cam = camera();
        cam.orbit_speed = 0.0;
        let start = cam.distance();

        let input = OrbitInput { zoom_keys: 1.0, ..Default::default() };
        cam.update(&input, 0.1);
        // 5 notches/s * 0.1s = half a notch
        assert!((cam.distance() - start * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_camera3d_conversion() {
        let cam = camera();
        let c3d = cam.to_camera3d();
        assert_eq!(c3d.position, Vec3::new(50.0, 50.0, 50.0));
        assert_eq!(c3d.target, Vec3::new(0.0, 10.0, 0.0));
        assert!((c3d.fovy - 80f32.to_radians()).abs() < 1e-6);
        assert!(matches!(c3d.projection, Projection::Perspective));

        let mut ortho = camera();
        ortho.projection = ProjectionKind::Orthographic;
        ortho.fovy = 40.0;
        let c3d = ortho.to_camera3d();
        assert_eq!(c3d.fovy, 40.0);
        assert!(matches!(c3d.projection, Projection::Orthographics));
    }
}
