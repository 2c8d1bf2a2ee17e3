//! World plugin - level loading and reloading.

use bevy::prelude::*;

use crate::core::{GameConfig, GameState};
use crate::player::{spawn_player, CameraRig, Player, PLAYER_SPAWN};

use super::builder::{build_level, LevelGeometry};
use super::scene::{LevelPaths, LevelScene};

/// World plugin - builds the current level every time the game enters `Loading`.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .init_resource::<LevelScene>()
            .add_systems(
                OnEnter(GameState::Loading),
                (cleanup_level, setup_level, finish_loading).chain(),
            );
    }
}

/// Name of the level to load on the next `Loading` pass.
#[derive(Resource, Debug, Clone)]
pub struct CurrentLevel {
    pub name: String,
}

impl FromWorld for CurrentLevel {
    fn from_world(world: &mut World) -> Self {
        let name = world
            .get_resource::<GameConfig>()
            .map(|config| config.start_level.clone())
            .unwrap_or_else(|| GameConfig::default().start_level);
        Self { name }
    }
}

/// Read the current level from disk and spawn it with the player.
///
/// A level that fails to parse is logged and replaced by an empty scene.
#[allow(clippy::too_many_arguments)]
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    current_level: Res<CurrentLevel>,
    mut rig: ResMut<CameraRig>,
) {
    let paths = LevelPaths::new(&config.resource_root);
    let scene = LevelScene::load(&current_level.name, &paths).unwrap_or_else(|e| {
        error!("Failed to load level '{}': {}", current_level.name, e);
        LevelScene::empty(&current_level.name)
    });

    if !scene.diagnostics.missing_files.is_empty() {
        warn!(
            "Level '{}' is missing {} file(s): {:?}",
            scene.name,
            scene.diagnostics.missing_files.len(),
            scene.diagnostics.missing_files
        );
    }

    let built = build_level(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut images,
        &asset_server,
        &scene,
    );

    *rig = CameraRig::from_config(&config);
    spawn_player(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        PLAYER_SPAWN,
        built.skybox,
    );
    commands.insert_resource(scene);
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Despawn the previous level and player before a (re)load.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelGeometry>>,
    player_query: Query<Entity, With<Player>>,
) {
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    for entity in player_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_level_defaults_to_config() {
        let mut world = World::new();
        world.insert_resource(GameConfig {
            start_level: "Cave".to_string(),
            ..default()
        });
        world.init_resource::<CurrentLevel>();
        assert_eq!(world.resource::<CurrentLevel>().name, "Cave");

        let mut bare = World::new();
        bare.init_resource::<CurrentLevel>();
        assert_eq!(bare.resource::<CurrentLevel>().name, "TestLevel000");
    }
}
