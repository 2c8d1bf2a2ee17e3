//! Outrospection - Entry Point
//!
//! Controls (rebindable in `res/config.ron`):
//! - WASD: Move
//! - Space: Jump
//! - Right mouse drag: Orbit camera
//! - Scroll: Zoom
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use outrospection::core::GameConfig;

fn main() {
    let (config, report) = GameConfig::load();
    let (width, height) = config.resolution;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window_title.clone(),
                        resolution: WindowResolution::new(width, height),
                        resizable: false,
                        ..default()
                    }),
                    // Close requests are routed through the layer stack
                    close_when_requested: false,
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: config.resource_root.to_string_lossy().into_owned(),
                    ..default()
                })
                // Sound goes through kira instead
                .disable::<bevy::audio::AudioPlugin>(),
        )
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Audio backend
        .add_plugins(bevy_kira_audio::AudioPlugin)
        .insert_resource(config)
        // Logged by a startup system once LogPlugin is running
        .insert_resource(report)
        .add_plugins(outrospection::OutrospectionPlugin)
        .run();
}
