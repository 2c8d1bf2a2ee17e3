//! Core plugin that sets up game states, config and deferred tasks.

use bevy::prelude::*;

use super::config::{log_config_report, GameConfig};
use super::scheduler::{run_deferred_tasks, DeferredTasks};
use super::states::GameState;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused)
/// - The [`GameConfig`] resource (unless the app already inserted one)
/// - The world-level deferred task queue, ticked once per gameplay frame
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            let (config, report) = GameConfig::load();
            app.insert_resource(config).insert_resource(report);
        }

        app.init_state::<GameState>()
            .add_systems(Startup, log_config_report)
            .init_resource::<DeferredTasks>()
            // Gameplay tasks only advance while the game runs, as ticks are skipped when paused
            .add_systems(
                Update,
                run_deferred_tasks
                    .in_set(FrameSet::Deferred)
                    .run_if(in_state(GameState::InGame)),
            )
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Dispatch,
                    FrameSet::Tick,
                    FrameSet::Deferred,
                    FrameSet::Draw,
                )
                    .chain(),
            );
    }
}

/// Fixed per-frame order: collect input, dispatch it, tick, run deferred tasks, draw.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Dispatch,
    Tick,
    Deferred,
    Draw,
}
