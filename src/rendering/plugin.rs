//! Rendering plugin - billboards and the level skybox.

use bevy::prelude::*;

use super::billboard::{animate_billboards, face_camera};
use crate::core::{FrameSet, GameState};

/// Rendering plugin - keeps billboards facing the camera and animated.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK)).add_systems(
            Update,
            (face_camera, animate_billboards)
                .after(FrameSet::Draw)
                .run_if(not(in_state(GameState::Loading))),
        );
    }
}
