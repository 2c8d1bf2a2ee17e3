//! Third-person player movement and spawning.

use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::GameConfig;
use crate::rendering::{billboard, Billboard, BillboardAnimation, BILLBOARD_SIZE};
use crate::world::{AnimType, Animation, Character, LevelGeometry};

/// Where the player appears when a level loads.
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Marker for the player's billboard child.
#[derive(Component)]
pub struct PlayerSprite;

/// Sprite frames of the player character.
pub fn player_character() -> Character {
    let mut character = Character::with_idle("Player", PLAYER_SPAWN);
    for (kind, frame_count) in [(AnimType::Walk, 4), (AnimType::Jump, 1), (AnimType::Fall, 1)] {
        character.animations.insert(
            kind,
            Animation {
                kind,
                start_frame: 0,
                frame_count,
            },
        );
    }
    character
}

/// Which clip the player's sprite should show.
pub fn player_animation(state: &MovementState) -> AnimType {
    if !state.is_grounded {
        if state.vertical_velocity > 0.0 {
            AnimType::Jump
        } else {
            AnimType::Fall
        }
    } else if state.is_walking {
        AnimType::Walk
    } else {
        AnimType::Idle
    }
}

/// Unit movement direction from the pressed keys, relative to the camera heading.
pub fn input_direction(keyboard: &ButtonInput<KeyCode>, config: &GameConfig, heading: Quat) -> Vec3 {
    let keys = &config.keys;
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(keys.forward) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(keys.backward) {
        direction.z += 1.0;
    }
    if keyboard.pressed(keys.left) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(keys.right) {
        direction.x += 1.0;
    }
    heading * direction.normalize_or_zero()
}

/// Handle WASD movement and jumping.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    rig: Res<CameraRig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &mut MovementState,
            &mut KinematicCharacterController,
        ),
        With<Player>,
    >,
) {
    let Ok((player_entity, transform, mut movement_state, mut controller)) =
        player_query.get_single_mut()
    else {
        return;
    };

    // Capsule is capsule_y(0.5, 0.3), so its bottom is 0.8 below center
    let is_grounded = match rapier_context.get_single() {
        Ok(context) => context
            .cast_ray(
                transform.translation - Vec3::Y * 0.75,
                Vec3::NEG_Y,
                0.15,
                true,
                QueryFilter::default().exclude_collider(player_entity),
            )
            .is_some(),
        Err(_) => true,
    };
    movement_state.is_grounded = is_grounded;

    if is_grounded {
        if movement_state.vertical_velocity < 0.0 {
            movement_state.vertical_velocity = 0.0;
        }
        if keyboard.just_pressed(config.keys.jump) {
            movement_state.vertical_velocity = config.jump_force;
        }
    } else {
        movement_state.vertical_velocity -= config.gravity * time.delta_secs();
    }

    let direction = input_direction(&keyboard, &config, rig.heading());
    movement_state.is_walking = direction != Vec3::ZERO;

    let horizontal = direction * config.move_speed * time.delta_secs();
    let vertical = Vec3::Y * movement_state.vertical_velocity * time.delta_secs();
    controller.translation = Some(horizontal + vertical);
}

/// Swap the player's sprite clip to match its movement.
pub fn animate_player(
    player_query: Query<&MovementState, With<Player>>,
    mut sprite_query: Query<&mut BillboardAnimation, With<PlayerSprite>>,
) {
    let Ok(state) = player_query.get_single() else {
        return;
    };
    let wanted = player_animation(state);
    for mut animation in sprite_query.iter_mut() {
        if animation.current() != wanted {
            animation.play(wanted);
        }
    }
}

/// Spawn the player body, its sprite and light, and the orbit camera.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    position: Vec3,
    skybox: Option<Handle<Image>>,
) -> Entity {
    let animation = BillboardAnimation::for_character(&player_character(), asset_server);
    let material = materials.add(billboard::billboard_material(animation.texture().cloned()));
    let quad = meshes.add(Rectangle::from_size(BILLBOARD_SIZE));

    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerSprite,
                Billboard,
                animation,
                Mesh3d(quad),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, 0.2, 0.0),
            ));
            // Lamp carried just above the player's head
            parent.spawn((
                PointLight {
                    intensity: 200_000.0,
                    range: 15.0,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_xyz(0.0, 1.5, 0.0),
            ));
        })
        .id();

    let mut camera = commands.spawn((
        Camera3d::default(),
        PlayerCamera,
        Transform::from_translation(position + Vec3::new(0.0, 2.0, 5.0))
            .looking_at(position, Vec3::Y),
        LevelGeometry,
    ));
    if let Some(image) = skybox {
        camera.insert(Skybox {
            image,
            brightness: 1000.0,
            rotation: Quat::IDENTITY,
        });
    }

    info!("Spawned player at {}", position);
    player
}
