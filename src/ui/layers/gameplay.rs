use bevy::prelude::*;

use crate::core::{
    request_pause_toggle, EventDispatcher, GameConfig, GameEvent, KeyPressed, MouseButtonPressed,
    MouseButtonReleased, MouseMoved, MouseScrolled,
};
use crate::player::CameraRig;
use crate::ui::input::PointerState;
use crate::ui::layer::Layer;

/// Bottom layer: pause key and camera orbit.
///
/// Holding the right mouse button grabs the camera; while it is held,
/// pointer motion orbits and is consumed here. A release swallowed by an
/// overlay still ends the drag, since motion checks [`PointerState`].
#[derive(Default)]
pub struct GameplayLayer {
    dragging: bool,
}

impl GameplayLayer {
    pub const NAME: &'static str = "Gameplay";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Layer for GameplayLayer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_event(&mut self, event: &mut GameEvent, world: &mut World) {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        let dragging = &mut self.dragging;
        let mut dispatcher = EventDispatcher::new(event);

        dispatcher.dispatch::<KeyPressed>(|e| {
            e.key == config.keys.pause && !e.repeat && request_pause_toggle(world)
        });

        dispatcher.dispatch::<MouseButtonPressed>(|e| {
            if e.button != MouseButton::Right {
                return false;
            }
            *dragging = true;
            true
        });

        dispatcher.dispatch::<MouseButtonReleased>(|e| {
            if e.button != MouseButton::Right || !*dragging {
                return false;
            }
            *dragging = false;
            true
        });

        dispatcher.dispatch::<MouseMoved>(|e| {
            let right_held = world
                .get_resource::<PointerState>()
                .map_or(true, |pointer| pointer.is_held(MouseButton::Right));
            if !right_held {
                *dragging = false;
            }
            if !*dragging {
                return false;
            }
            if let Some(mut rig) = world.get_resource_mut::<CameraRig>() {
                rig.rotate(e.delta, config.mouse_sensitivity);
            }
            true
        });

        dispatcher.dispatch::<MouseScrolled>(|e| {
            let Some(mut rig) = world.get_resource_mut::<CameraRig>() else {
                return false;
            };
            rig.zoom(
                e.offset.y,
                config.camera_min_distance,
                config.camera_max_distance,
            );
            true
        });
    }
}
