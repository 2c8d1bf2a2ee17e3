//! Player-related components and the camera rig.

use bevy::prelude::*;

use crate::core::GameConfig;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks player movement state for physics.
#[derive(Component, Debug)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
    /// Whether the last frame had horizontal input.
    pub is_walking: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            vertical_velocity: 0.0,
            is_walking: false,
        }
    }
}

/// Marker for the third-person camera.
#[derive(Component)]
pub struct PlayerCamera;

/// Orbit parameters of the third-person camera around the player.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Radians around the world Y axis.
    pub yaw: f32,
    /// Radians above the horizon, clamped so the camera never flips.
    pub pitch: f32,
    /// Desired distance from the orbit target.
    pub distance: f32,
}

/// About 80 degrees.
const MAX_PITCH: f32 = 1.4;

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 5.0,
        }
    }
}

impl CameraRig {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            distance: config
                .camera_distance
                .clamp(config.camera_min_distance, config.camera_max_distance),
            ..default()
        }
    }

    /// Orbit by a mouse delta in pixels.
    pub fn rotate(&mut self, delta: Vec2, sensitivity: f32) {
        let scale = sensitivity * 0.005;
        self.yaw -= delta.x * scale;
        self.pitch = (self.pitch + delta.y * scale).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move closer for positive scroll, within `[min, max]`.
    pub fn zoom(&mut self, scroll: f32, min: f32, max: f32) {
        self.distance = (self.distance - scroll * 0.5).clamp(min, max);
    }

    /// Unit vector from the orbit target toward the camera.
    pub fn offset_direction(&self) -> Vec3 {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0) * Vec3::Z
    }

    /// Yaw-only rotation used to make movement camera-relative.
    pub fn heading(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped() {
        let mut rig = CameraRig::default();
        rig.rotate(Vec2::new(0.0, 100_000.0), 1.5);
        assert!((rig.pitch - MAX_PITCH).abs() < 1e-6);
        rig.rotate(Vec2::new(0.0, -200_000.0), 1.5);
        assert!((rig.pitch + MAX_PITCH).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut rig = CameraRig::default();
        rig.zoom(100.0, 1.5, 12.0);
        assert_eq!(rig.distance, 1.5);
        rig.zoom(-100.0, 1.5, 12.0);
        assert_eq!(rig.distance, 12.0);
    }

    #[test]
    fn test_offset_is_behind_and_above() {
        let rig = CameraRig::default();
        let dir = rig.offset_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.0, "positive pitch lifts the camera: {dir}");
        assert!(dir.z > 0.0, "zero yaw looks down -Z: {dir}");
    }
}
