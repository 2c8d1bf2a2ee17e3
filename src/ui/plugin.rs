//! UI plugin - layer stack, input routing and sprite presentation.

use bevy::prelude::*;

use super::draw::{present_draw_list, DrawList, UiTextures};
use super::input::{
    collect_input_events, dispatch_pending_events, draw_layers, tick_layers, PendingEvents,
    PointerState,
};
use super::layer::{apply_layer_commands, LayerCommands, LayerStack};
use super::layers::{
    ControlOverlay, EyeControl, GameplayLayer, PauseLayer, Progress, ProgressBarLayer,
    WelcomeOverlay,
};
use crate::core::{run_deferred_tasks, FrameSet, GameConfig, GameState};

/// UI plugin - owns the layer stack and drives it once per frame.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LayerStack>()
            .init_resource::<LayerCommands>()
            .init_resource::<PendingEvents>()
            .init_resource::<PointerState>()
            .init_resource::<DrawList>()
            .init_resource::<UiTextures>()
            .init_resource::<Progress>()
            .init_resource::<EyeControl>()
            .add_systems(Startup, push_game_layers)
            // Pause menu
            .add_systems(OnEnter(GameState::Paused), push_pause_layer)
            .add_systems(OnExit(GameState::Paused), pop_pause_layer)
            // Window close must be seen in every state
            .add_systems(
                Update,
                (
                    collect_input_events.in_set(FrameSet::Input),
                    dispatch_pending_events.in_set(FrameSet::Dispatch),
                ),
            )
            .add_systems(
                Update,
                (
                    tick_layers.in_set(FrameSet::Tick),
                    // Deferred tasks may queue stack changes
                    apply_layer_commands
                        .in_set(FrameSet::Deferred)
                        .after(run_deferred_tasks),
                    (draw_layers, present_draw_list)
                        .chain()
                        .in_set(FrameSet::Draw),
                )
                    .run_if(layers_active),
            );
    }
}

fn layers_active(state: Res<State<GameState>>) -> bool {
    state.get().layers_active()
}

/// Build the initial stack: gameplay and progress below, overlays on top.
fn push_game_layers(world: &mut World) {
    let config = world.resource::<GameConfig>().clone();
    {
        let mut commands = world.resource_mut::<LayerCommands>();
        commands.push_layer(GameplayLayer::new());
        commands.push_layer(ProgressBarLayer::new());
        commands.push_overlay(ControlOverlay::new(&config));
        commands.push_overlay(WelcomeOverlay::new());
    }
    apply_layer_commands(world);
    info!(
        "Layer stack ready: {:?}",
        world.resource::<LayerStack>().names()
    );
}

fn push_pause_layer(world: &mut World) {
    let config = world.resource::<GameConfig>().clone();
    world
        .resource_mut::<LayerCommands>()
        .push_overlay(PauseLayer::new(&config));
    apply_layer_commands(world);
}

fn pop_pause_layer(world: &mut World) {
    world
        .resource_mut::<LayerCommands>()
        .pop_overlay(PauseLayer::NAME);
    apply_layer_commands(world);
}
