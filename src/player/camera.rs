//! Third-person orbit camera that avoids clipping into level geometry.

use bevy::prelude::*;

use super::components::{CameraRig, Player, PlayerCamera};
use crate::world::{ray_cast, LevelScene, Ray, Triangle};

/// Height above the player's center the camera looks at.
const TARGET_HEIGHT: f32 = 0.8;

/// Gap kept between the camera and any wall it backs into.
const WALL_MARGIN: f32 = 0.2;

/// Never pull in closer than this.
const MIN_PULL_IN: f32 = 0.3;

/// How far the camera can back away from `target` along `direction`.
pub fn camera_distance(target: Vec3, direction: Vec3, desired: f32, collision: &[Triangle]) -> f32 {
    match ray_cast(&Ray::new(target, direction), collision, desired) {
        Some(hit) => (hit.distance - WALL_MARGIN).max(MIN_PULL_IN),
        None => desired,
    }
}

pub fn update_camera(
    rig: Res<CameraRig>,
    scene: Res<LevelScene>,
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(mut camera) = camera_query.get_single_mut() else {
        return;
    };

    let target = player.translation + Vec3::Y * TARGET_HEIGHT;
    let direction = rig.offset_direction();
    let distance = camera_distance(target, direction, rig.distance, &scene.collision);

    camera.translation = target + direction * distance;
    camera.look_at(target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_z(z: f32) -> Vec<Triangle> {
        vec![
            Triangle::new(
                Vec3::new(-10.0, -10.0, z),
                Vec3::new(10.0, -10.0, z),
                Vec3::new(10.0, 10.0, z),
            ),
            Triangle::new(
                Vec3::new(-10.0, -10.0, z),
                Vec3::new(10.0, 10.0, z),
                Vec3::new(-10.0, 10.0, z),
            ),
        ]
    }

    #[test]
    fn test_open_space_keeps_distance() {
        let distance = camera_distance(Vec3::ZERO, Vec3::Z, 5.0, &[]);
        assert_eq!(distance, 5.0);
    }

    #[test]
    fn test_wall_pulls_camera_in() {
        let distance = camera_distance(Vec3::ZERO, Vec3::Z, 5.0, &wall_at_z(3.0));
        assert!((distance - (3.0 - WALL_MARGIN)).abs() < 1e-4);
    }

    #[test]
    fn test_wall_beyond_desired_is_ignored() {
        let distance = camera_distance(Vec3::ZERO, Vec3::Z, 5.0, &wall_at_z(8.0));
        assert_eq!(distance, 5.0);
    }

    #[test]
    fn test_pull_in_has_floor() {
        let distance = camera_distance(Vec3::ZERO, Vec3::Z, 5.0, &wall_at_z(0.1));
        assert_eq!(distance, MIN_PULL_IN);
    }
}
