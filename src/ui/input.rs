//! Bridges Bevy's input events into [`GameEvent`]s and drives the layer stack.

use bevy::app::AppExit;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::input::ButtonState as PressState;
use bevy::prelude::*;
use bevy::window::{CursorMoved, WindowCloseRequested};

use super::draw::DrawList;
use super::layer::{apply_layer_commands, LayerStack};
use crate::core::{
    EventData, EventKind, GameEvent, KeyPressed, KeyReleased, MouseButtonPressed,
    GameState, MouseButtonReleased, MouseMoved, MouseScrolled, WindowClose,
};

/// Pixels per scroll "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

/// Events collected this frame, waiting for dispatch.
#[derive(Resource, Default)]
pub struct PendingEvents(pub Vec<GameEvent>);

/// Last known pointer position in window pixels, plus the buttons held down.
///
/// Updated from every dispatched event, including those an overlay swallows.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerState {
    pub position: Vec2,
    held: Vec<MouseButton>,
}

impl PointerState {
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }

    pub fn observe(&mut self, event: &GameEvent) {
        match event.data() {
            EventData::MouseButtonPressed(e) => {
                if !self.held.contains(&e.button) {
                    self.held.push(e.button);
                }
            }
            EventData::MouseButtonReleased(e) => self.held.retain(|held| *held != e.button),
            EventData::MouseMoved(e) => self.position = e.position,
            _ => {}
        }
    }
}

/// Translate this frame's Bevy input into queued [`GameEvent`]s.
pub fn collect_input_events(
    mut keys: EventReader<KeyboardInput>,
    mut buttons: EventReader<MouseButtonInput>,
    mut cursor: EventReader<CursorMoved>,
    mut wheel: EventReader<MouseWheel>,
    mut close: EventReader<WindowCloseRequested>,
    mut pointer: ResMut<PointerState>,
    mut pending: ResMut<PendingEvents>,
) {
    for event in keys.read() {
        let game_event = match event.state {
            PressState::Pressed => GameEvent::new(KeyPressed {
                key: event.key_code,
                repeat: event.repeat,
            }),
            PressState::Released => GameEvent::new(KeyReleased {
                key: event.key_code,
            }),
        };
        pending.0.push(game_event);
    }

    for event in cursor.read() {
        pointer.position = event.position;
        pending.0.push(GameEvent::new(MouseMoved {
            position: event.position,
            delta: event.delta.unwrap_or_default(),
        }));
    }

    for event in buttons.read() {
        let position = pointer.position;
        let game_event = match event.state {
            PressState::Pressed => GameEvent::new(MouseButtonPressed {
                button: event.button,
                position,
            }),
            PressState::Released => GameEvent::new(MouseButtonReleased {
                button: event.button,
                position,
            }),
        };
        pending.0.push(game_event);
    }

    for event in wheel.read() {
        let offset = match event.unit {
            MouseScrollUnit::Line => Vec2::new(event.x, event.y),
            MouseScrollUnit::Pixel => Vec2::new(event.x, event.y) / PIXELS_PER_LINE,
        };
        pending.0.push(GameEvent::new(MouseScrolled { offset }));
    }

    if close.read().count() > 0 {
        pending.0.push(GameEvent::new(WindowClose));
    }
}

/// Exclusive system: offer each pending event to the layer stack.
///
/// A window close nobody handled exits the app. While the stack is inactive
/// (level loading) input is dropped and a window close exits directly.
pub fn dispatch_pending_events(world: &mut World) {
    let events = std::mem::take(&mut world.resource_mut::<PendingEvents>().0);
    if events.is_empty() {
        return;
    }

    let layers_active = world
        .get_resource::<State<GameState>>()
        .map_or(true, |state| state.get().layers_active());
    if !layers_active {
        if events.iter().any(|event| event.kind() == EventKind::WindowClose) {
            info!("Window close requested while loading, exiting");
            world.send_event(AppExit::Success);
        }
        return;
    }

    world.resource_scope(|world, mut stack: Mut<LayerStack>| {
        for mut event in events {
            if let Some(mut pointer) = world.get_resource_mut::<PointerState>() {
                pointer.observe(&event);
            }
            stack.dispatch(&mut event, world);
            if event.kind() == EventKind::WindowClose && !event.is_handled() {
                info!("Window close requested, exiting");
                world.send_event(AppExit::Success);
            }
        }
    });

    apply_layer_commands(world);
}

/// Exclusive system: tick every layer bottom-up.
pub fn tick_layers(world: &mut World) {
    world.resource_scope(|world, mut stack: Mut<LayerStack>| {
        stack.tick(world);
    });
    apply_layer_commands(world);
}

/// Exclusive system: rebuild the [`DrawList`] from the stack.
pub fn draw_layers(world: &mut World) {
    let mut frame = DrawList::default();
    world.resource::<LayerStack>().draw(&mut frame);
    world.insert_resource(frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventDispatcher;
    use crate::ui::layer::{Layer, LayerCommands};

    struct Swallow;

    impl Layer for Swallow {
        fn name(&self) -> &str {
            "Swallow"
        }

        fn on_event(&mut self, event: &mut GameEvent, _world: &mut World) {
            EventDispatcher::new(event).dispatch::<KeyPressed>(|_| true);
        }
    }

    fn world_with_stack() -> World {
        let mut world = World::new();
        world.init_resource::<LayerStack>();
        world.init_resource::<LayerCommands>();
        world.init_resource::<PendingEvents>();
        world.init_resource::<Events<AppExit>>();
        world
    }

    #[test]
    fn test_unhandled_close_exits() {
        let mut world = world_with_stack();
        world
            .resource_mut::<PendingEvents>()
            .0
            .push(GameEvent::new(WindowClose));

        dispatch_pending_events(&mut world);
        assert_eq!(world.resource::<Events<AppExit>>().len(), 1);
        assert!(world.resource::<PendingEvents>().0.is_empty());
    }

    #[test]
    fn test_events_reach_layers() {
        let mut world = world_with_stack();
        world.resource_mut::<LayerCommands>().push_layer(Swallow);
        apply_layer_commands(&mut world);

        world.resource_mut::<PendingEvents>().0.push(GameEvent::new(KeyPressed {
            key: KeyCode::KeyQ,
            repeat: false,
        }));
        dispatch_pending_events(&mut world);

        assert_eq!(world.resource::<Events<AppExit>>().len(), 0);
        assert!(world.contains_resource::<LayerStack>());
    }

    #[test]
    fn test_draw_layers_replaces_list() {
        let mut world = world_with_stack();
        world.insert_resource(DrawList::default());
        draw_layers(&mut world);
        assert!(world.resource::<DrawList>().commands().is_empty());
    }

    #[test]
    fn test_close_while_loading_exits() {
        let mut world = world_with_stack();
        world.insert_resource(State::new(GameState::Loading));
        world.resource_mut::<LayerCommands>().push_layer(Swallow);
        apply_layer_commands(&mut world);

        {
            let mut pending = world.resource_mut::<PendingEvents>();
            pending.0.push(GameEvent::new(KeyPressed {
                key: KeyCode::KeyQ,
                repeat: false,
            }));
            pending.0.push(GameEvent::new(WindowClose));
        }
        dispatch_pending_events(&mut world);

        assert_eq!(world.resource::<Events<AppExit>>().len(), 1);
        assert!(world.resource::<PendingEvents>().0.is_empty());
    }

    #[test]
    fn test_pointer_tracks_held_buttons() {
        let mut pointer = PointerState::default();
        pointer.observe(&GameEvent::new(MouseButtonPressed {
            button: MouseButton::Right,
            position: Vec2::ZERO,
        }));
        pointer.observe(&GameEvent::new(MouseButtonPressed {
            button: MouseButton::Right,
            position: Vec2::ZERO,
        }));
        assert!(pointer.is_held(MouseButton::Right));
        assert!(!pointer.is_held(MouseButton::Left));

        pointer.observe(&GameEvent::new(MouseButtonReleased {
            button: MouseButton::Right,
            position: Vec2::ZERO,
        }));
        assert!(!pointer.is_held(MouseButton::Right));

        pointer.observe(&GameEvent::new(MouseMoved {
            position: Vec2::new(3.0, 4.0),
            delta: Vec2::ZERO,
        }));
        assert_eq!(pointer.position, Vec2::new(3.0, 4.0));
    }
}
