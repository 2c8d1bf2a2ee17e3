//! Game state definitions that control the overall flow of the game.
//!
//! States decide which systems run. Gameplay ticks only in `InGame`, while
//! the layer stack keeps ticking in `Paused` so the pause menu stays live.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while config and the first level are read
/// - `InGame` is active play
/// - `Paused` freezes gameplay but keeps the world and UI visible
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
    Paused,
}

impl GameState {
    /// Whether the layer stack should tick and receive input.
    pub fn layers_active(&self) -> bool {
        matches!(self, GameState::InGame | GameState::Paused)
    }

    /// State reached by toggling pause, if pausing applies here.
    pub fn toggled_pause(&self) -> Option<GameState> {
        match self {
            GameState::InGame => Some(GameState::Paused),
            GameState::Paused => Some(GameState::InGame),
            GameState::Loading => None,
        }
    }
}

/// Queue a transition from inside an exclusive context such as a layer.
pub fn request_state(world: &mut World, state: GameState) -> bool {
    let Some(mut next) = world.get_resource_mut::<NextState<GameState>>() else {
        warn!("No state machine to move to {:?}", state);
        return false;
    };
    next.set(state);
    true
}

/// Flip between `InGame` and `Paused`. Does nothing while loading.
pub fn request_pause_toggle(world: &mut World) -> bool {
    let Some(target) = world
        .get_resource::<State<GameState>>()
        .and_then(|current| current.get().toggled_pause())
    else {
        return false;
    };
    info!("Toggling pause -> {:?}", target);
    request_state(world, target)
}
