use bevy::prelude::*;

use crate::core::{EventCategory, EventKind, GameConfig, GameEvent};
use crate::ui::draw::{screen_rect, DrawList};
use crate::ui::layer::{Layer, LayerCommands};

/// Full-screen welcome card, dismissed by any key press or click.
pub struct WelcomeOverlay {
    rect: Rect,
    dismissed: bool,
}

impl WelcomeOverlay {
    pub const NAME: &'static str = "Welcome Overlay";

    pub fn new() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            dismissed: false,
        }
    }
}

impl Default for WelcomeOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether this event should close the card.
fn dismisses(event: &GameEvent) -> bool {
    matches!(
        event.kind(),
        EventKind::KeyPressed | EventKind::MouseButtonPressed
    )
}

impl Layer for WelcomeOverlay {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_attach(&mut self, world: &mut World) {
        if let Some(config) = world.get_resource::<GameConfig>() {
            self.rect = screen_rect(config, 0.0, 0.0, 1.0, 1.0);
        }
        self.dismissed = false;
        info!("Showing welcome screen");
    }

    fn draw(&self, frame: &mut DrawList) {
        frame.push("welcome", self.rect);
    }

    fn on_event(&mut self, event: &mut GameEvent, world: &mut World) {
        if !event.in_category(EventCategory::INPUT) {
            return;
        }
        if dismisses(event) && !self.dismissed {
            self.dismissed = true;
            world.resource_mut::<LayerCommands>().pop_overlay(Self::NAME);
        }
        // Nothing reaches the game while the card is up.
        event.mark_handled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KeyPressed, MouseMoved};
    use crate::ui::layer::{apply_layer_commands, LayerStack};

    fn world_with_welcome() -> World {
        let mut world = World::new();
        world.init_resource::<LayerStack>();
        world.init_resource::<LayerCommands>();
        world
            .resource_mut::<LayerCommands>()
            .push_overlay(WelcomeOverlay::new());
        apply_layer_commands(&mut world);
        world
    }

    fn send(world: &mut World, event: &mut GameEvent) {
        world.resource_scope(|world, mut stack: Mut<LayerStack>| stack.dispatch(event, world));
        apply_layer_commands(world);
    }

    #[test]
    fn test_key_dismisses_and_is_consumed() {
        let mut world = world_with_welcome();
        let mut event = GameEvent::new(KeyPressed {
            key: KeyCode::Space,
            repeat: false,
        });
        send(&mut world, &mut event);

        assert!(event.is_handled());
        assert!(!world.resource::<LayerStack>().contains(WelcomeOverlay::NAME));
    }

    #[test]
    fn test_motion_is_swallowed_but_keeps_card() {
        let mut world = world_with_welcome();
        let mut event = GameEvent::new(MouseMoved {
            position: Vec2::new(10.0, 10.0),
            delta: Vec2::ONE,
        });
        send(&mut world, &mut event);

        assert!(event.is_handled());
        assert!(world.resource::<LayerStack>().contains(WelcomeOverlay::NAME));
    }
}
