//! Outrospection - a third-person 3D game in Bevy.
//!
//! Levels are plain-text `.lvl` files listing static objects, billboard
//! characters, a skybox and collision meshes. Input flows through a stack of
//! layers (gameplay, progress bar, control overlay, pause and welcome
//! screens) before it reaches the game.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, config, events, deferred tasks
//! - **World**: Level parsing, collision triangles, skybox, level spawning
//! - **Player**: Third-person movement and orbit camera
//! - **Rendering**: Camera-facing character billboards
//! - **Audio**: Named sounds, loaded on first use
//! - **UI**: Layer stack, buttons, animated sprites

pub mod audio;
pub mod core;
pub mod player;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct OutrospectionPlugin;

impl Plugin for OutrospectionPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(world::WorldPlugin)
            .add_plugins(rendering::RenderingPlugin)
            .add_plugins(audio::GameAudioPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
