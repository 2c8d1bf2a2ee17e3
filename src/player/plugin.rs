//! Player plugin - movement, sprite animation and the orbit camera.

use bevy::prelude::*;

use super::camera::update_camera;
use super::components::CameraRig;
use super::movement::{animate_player, player_movement};
use crate::core::{FrameSet, GameState};

/// Player plugin - handles player movement and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>().add_systems(
            Update,
            (
                (player_movement, animate_player)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
                update_camera.run_if(not(in_state(GameState::Loading))),
            )
                .chain()
                .in_set(FrameSet::Tick),
        );
    }
}
