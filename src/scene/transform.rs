//! Object placement in the world
//!
//! Position, scale and an axis-angle rotation. The angle is stored in
//! degrees because that is what scene files use.

use macroquad::math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Placement of a game object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    /// Rotation axis (need not be normalized; zero means no rotation)
    pub rotation_axis: [f32; 3],
    /// Rotation angle in degrees
    pub rotation_angle: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            rotation_axis: [0.0, 0.0, 0.0],
            rotation_angle: 0.0,
        }
    }
}

impl Transform {
    /// Transform at a position with unit scale and no rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Rotation as a quaternion. Degenerate axes yield identity.
    pub fn rotation(&self) -> Quat {
        let axis = Vec3::from_array(self.rotation_axis);
        if axis.length_squared() < 1e-12 || self.rotation_angle == 0.0 {
            return Quat::IDENTITY;
        }
        Quat::from_axis_angle(axis.normalize(), self.rotation_angle.to_radians())
    }

    /// Model matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            self.rotation(),
            Vec3::from_array(self.position),
        )
    }
}
