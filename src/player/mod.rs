//! Player module - player entity, movement, and camera control.

mod camera;
mod components;
mod movement;
mod plugin;

pub use camera::camera_distance;
pub use components::*;
pub use movement::{player_animation, spawn_player, PlayerSprite, PLAYER_SPAWN};
pub use plugin::PlayerPlugin;
