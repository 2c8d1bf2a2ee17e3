use bevy::app::AppExit;
use bevy::prelude::*;

use crate::audio::play_sound;
use crate::core::{
    request_pause_toggle, request_state, EventCategory, EventDispatcher, GameConfig, GameEvent,
    GameState, KeyPressed, MouseButtonPressed,
};
use crate::ui::button::{ButtonClick, UiButton};
use crate::ui::draw::{screen_rect, DrawList};
use crate::ui::input::PointerState;
use crate::ui::layer::Layer;
use crate::ui::sprite::AnimatedSprite;

fn resume_click(click: &mut ButtonClick) {
    play_sound(click.world, "click", 1.0);
    request_state(click.world, GameState::InGame);
}

fn quit_click(click: &mut ButtonClick) {
    info!("Quit from pause menu");
    click.world.send_event(AppExit::Success);
}

/// Pause menu. Lives on top of the stack while the game is paused and
/// swallows all input.
pub struct PauseLayer {
    backdrop: Rect,
    pause_key: KeyCode,
    buttons: Vec<UiButton>,
}

impl PauseLayer {
    pub const NAME: &'static str = "Pause";

    pub fn new(config: &GameConfig) -> Self {
        Self {
            backdrop: screen_rect(config, 0.0, 0.0, 1.0, 1.0),
            pause_key: config.keys.pause,
            buttons: vec![
                UiButton::rect(
                    "resume",
                    screen_rect(config, 0.4, 0.4, 0.2, 0.08),
                    AnimatedSprite::new("resume"),
                    resume_click,
                ),
                UiButton::rect(
                    "quit",
                    screen_rect(config, 0.4, 0.52, 0.2, 0.08),
                    AnimatedSprite::new("quit"),
                    quit_click,
                ),
            ],
        }
    }
}

impl Layer for PauseLayer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tick(&mut self, world: &mut World) {
        let pointer = world
            .get_resource::<PointerState>()
            .map(|state| state.position)
            .unwrap_or_default();
        for button in &mut self.buttons {
            button.tick(pointer, world);
        }
    }

    fn draw(&self, frame: &mut DrawList) {
        frame.push_tinted("pauseBackground", self.backdrop, Color::srgba(0.0, 0.0, 0.0, 0.6));
        for button in &self.buttons {
            button.draw(frame);
        }
    }

    fn on_event(&mut self, event: &mut GameEvent, world: &mut World) {
        if !event.in_category(EventCategory::INPUT) {
            return;
        }

        let pause_key = self.pause_key;
        let buttons = &mut self.buttons;
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch::<KeyPressed>(|e| {
            if e.key == pause_key && !e.repeat {
                request_pause_toggle(world);
            }
            true
        });
        dispatcher.dispatch::<MouseButtonPressed>(|e| {
            for button in buttons.iter_mut() {
                if button.click(e.position, e.button, world) {
                    break;
                }
            }
            true
        });

        event.mark_handled();
    }
}
