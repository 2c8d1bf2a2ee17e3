use std::collections::HashSet;

use bevy::prelude::*;
use rand::Rng;

use super::progress::Progress;
use super::welcome::WelcomeOverlay;
use crate::audio::{play_sound, toggle_mute};
use crate::core::{
    request_state, DeferredTasks, EventDispatcher, GameConfig, GameEvent, GameState,
    MouseButtonPressed,
};
use crate::ui::button::{Bounds, ButtonClick, ButtonHover, UiButton};
use crate::ui::draw::{screen_rect, DrawList};
use crate::ui::input::PointerState;
use crate::ui::layer::{Layer, LayerCommands, LayerStack};
use crate::ui::sprite::{AnimatedSprite, SpriteAnimation, DEFAULT_ANIMATION};

/// Ticks before a blink, reset or welcome click takes effect.
const CLICK_DELAY: u32 = 100;

/// Number of `Eye_Poke_<n>` sound variants.
const POKE_SOUNDS: u32 = 3;

/// The octopus' three eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    Circle,
    Square,
    Triangle,
}

impl Eye {
    pub const ALL: [Eye; 3] = [Eye::Circle, Eye::Square, Eye::Triangle];

    /// Texture stem under `UI/eyes/`.
    pub fn stem(self) -> &'static str {
        match self {
            Eye::Circle => "eyeCircle",
            Eye::Square => "eyeSquare",
            Eye::Triangle => "eyeTriangle",
        }
    }

    /// Normalized circle `(x, y, radius)` of the eye's hit area.
    fn hit_circle(self) -> (f32, f32, f32) {
        match self {
            Eye::Circle => (0.73, 0.1, 0.07),
            Eye::Square => (0.88, 0.05, 0.07),
            Eye::Triangle => (0.93, 0.3, 0.07),
        }
    }
}

/// Which eyes have been poked, which one the right mouse button picked,
/// and which one the pointer rests on.
#[derive(Resource, Debug, Clone, Default)]
pub struct EyeControl {
    pub selected: Option<Eye>,
    hovered: Option<Eye>,
    poked: HashSet<Eye>,
}

impl EyeControl {
    /// Record a poke. Returns the new progress fraction.
    pub fn poke(&mut self, eye: Eye) -> f32 {
        self.poked.insert(eye);
        self.progress()
    }

    pub fn progress(&self) -> f32 {
        self.poked.len() as f32 / Eye::ALL.len() as f32
    }

    pub fn is_poked(&self, eye: Eye) -> bool {
        self.poked.contains(&eye)
    }

    pub fn hovered(&self) -> Option<Eye> {
        self.hovered
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn eye_click(eye: Eye, click: &mut ButtonClick) {
    info!("Poked the {:?} eye with {:?}", eye, click.mouse_button);

    click.sprite.set_animation("blink");
    click.later.do_later(CLICK_DELAY, |sprite| {
        sprite.set_animation(DEFAULT_ANIMATION);
    });

    let variant = rand::thread_rng().gen_range(0..POKE_SOUNDS);
    play_sound(click.world, &format!("Eye_Poke_{variant}"), 1.0);

    let world = &mut *click.world;
    if click.mouse_button == MouseButton::Right {
        world.get_resource_or_insert_with(EyeControl::default).selected = Some(eye);
        return;
    }

    let progress = world
        .get_resource_or_insert_with(EyeControl::default)
        .poke(eye);
    world.get_resource_or_insert_with(Progress::default).set(progress);
}

fn eye_hover(eye: Eye, hover: &mut ButtonHover) {
    debug!("Previewing the {:?} eye", eye);
    hover.world.get_resource_or_insert_with(EyeControl::default).hovered = Some(eye);
}

fn eye_unhover(eye: Eye, hover: &mut ButtonHover) {
    let mut eyes = hover.world.get_resource_or_insert_with(EyeControl::default);
    if eyes.hovered == Some(eye) {
        eyes.hovered = None;
    }
}

fn mute_click(click: &mut ButtonClick) {
    let muted = toggle_mute(click.world);
    click
        .sprite
        .set_animation(if muted { "unmute" } else { DEFAULT_ANIMATION });
}

fn reset_click(click: &mut ButtonClick) {
    play_sound(click.world, "click", 1.0);
    click.world.resource_mut::<DeferredTasks>().do_later(CLICK_DELAY, |world| {
        info!("Resetting level");
        if let Some(mut eyes) = world.get_resource_mut::<EyeControl>() {
            eyes.reset();
        }
        if let Some(mut progress) = world.get_resource_mut::<Progress>() {
            progress.set(0.0);
        }
        request_state(world, GameState::Loading);
    });
}

fn welcome_click(click: &mut ButtonClick) {
    play_sound(click.world, "click", 1.0);
    click.world.resource_mut::<DeferredTasks>().do_later(CLICK_DELAY, |world| {
        let showing = world
            .get_resource::<LayerStack>()
            .is_some_and(|stack| stack.contains(WelcomeOverlay::NAME));
        if !showing {
            world.resource_mut::<LayerCommands>().push_overlay(WelcomeOverlay::new());
        }
    });
}

/// The octopus overlay: clickable eyes plus reset, mute and welcome buttons.
pub struct ControlOverlay {
    backdrop: Rect,
    buttons: Vec<UiButton>,
}

impl ControlOverlay {
    pub const NAME: &'static str = "Octopus Overlay";

    pub fn new(config: &GameConfig) -> Self {
        let (width, height) = config.resolution;
        let full = screen_rect(config, 0.0, 0.0, 1.0, 1.0);

        let mut buttons: Vec<UiButton> = Eye::ALL
            .into_iter()
            .map(|eye| {
                let (x, y, r) = eye.hit_circle();
                let sprite = AnimatedSprite::new(format!("eyes/{}0", eye.stem())).with_animation(
                    "blink",
                    SpriteAnimation::sequence(&format!("eyes/{}", eye.stem()), 1, 5, 4),
                );
                UiButton::new(
                    eye.stem(),
                    full,
                    Bounds::Circle {
                        center: Vec2::new(x * width, y * height),
                        radius: r * height,
                    },
                    sprite,
                    move |click| eye_click(eye, click),
                )
                .with_hover(move |hover| eye_hover(eye, hover))
                .with_unhover(move |hover| eye_unhover(eye, hover))
            })
            .collect();

        buttons.push(UiButton::rect(
            "showWelcome",
            screen_rect(config, 0.95, 0.92, 0.05, 0.08),
            AnimatedSprite::new("showWelcome"),
            welcome_click,
        ));
        buttons.push(UiButton::rect(
            "reset",
            screen_rect(config, 0.90, 0.92, 0.05, 0.08),
            AnimatedSprite::new("reset"),
            reset_click,
        ));
        buttons.push(UiButton::rect(
            "mute",
            screen_rect(config, 0.85, 0.92, 0.05, 0.08),
            AnimatedSprite::new("mute").with_animation("unmute", SpriteAnimation::still("unmute")),
            mute_click,
        ));

        Self {
            backdrop: full,
            buttons,
        }
    }

    pub fn button(&self, name: &str) -> Option<&UiButton> {
        self.buttons.iter().find(|button| button.name() == name)
    }
}

impl Layer for ControlOverlay {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_attach(&mut self, world: &mut World) {
        world.init_resource::<EyeControl>();
        world.init_resource::<Progress>();
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
        frame.push("octopusOverlay", self.backdrop);
        for button in &self.buttons {
            button.draw(frame);
        }
    }

    fn on_event(&mut self, event: &mut GameEvent, world: &mut World) {
        let buttons = &mut self.buttons;
        EventDispatcher::new(event).dispatch::<MouseButtonPressed>(|e| {
            buttons
                .iter_mut()
                .any(|button| button.click(e.position, e.button, world))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{GlobalVolume, SoundQueue};

    fn overlay_world() -> (World, ControlOverlay) {
        let config = GameConfig::default();
        let mut world = World::new();
        world.init_resource::<DeferredTasks>();
        world.init_resource::<SoundQueue>();
        world.init_resource::<GlobalVolume>();
        world.init_resource::<LayerStack>();
        world.init_resource::<LayerCommands>();
        world.insert_resource(State::new(GameState::InGame));
        world.init_resource::<NextState<GameState>>();
        let mut overlay = ControlOverlay::new(&config);
        overlay.on_attach(&mut world);
        world.insert_resource(config);
        (world, overlay)
    }

    fn click_at(overlay: &mut ControlOverlay, world: &mut World, at: Vec2, button: MouseButton) -> bool {
        let mut event = GameEvent::new(MouseButtonPressed {
            button,
            position: at,
        });
        overlay.on_event(&mut event, world);
        event.is_handled()
    }

    fn circle_eye_center() -> Vec2 {
        let (w, h) = GameConfig::default().resolution;
        Vec2::new(0.73 * w, 0.1 * h)
    }

    #[test]
    fn test_eye_click_blinks_then_reverts() {
        let (mut world, mut overlay) = overlay_world();
        let center = circle_eye_center();

        assert!(click_at(&mut overlay, &mut world, center, MouseButton::Left));
        let eye = overlay.button("eyeCircle").unwrap();
        assert_eq!(eye.sprite().current_animation(), "blink");
        assert_eq!(world.resource::<SoundQueue>().len(), 1);
        assert!(world.resource::<EyeControl>().is_poked(Eye::Circle));
        assert!((world.resource::<Progress>().target - 1.0 / 3.0).abs() < 1e-6);

        for _ in 0..CLICK_DELAY {
            overlay.tick(&mut world);
        }
        let eye = overlay.button("eyeCircle").unwrap();
        assert_eq!(eye.sprite().current_animation(), DEFAULT_ANIMATION);
    }

    #[test]
    fn test_right_click_selects_eye() {
        let (mut world, mut overlay) = overlay_world();
        assert!(click_at(&mut overlay, &mut world, circle_eye_center(), MouseButton::Right));

        let eyes = world.resource::<EyeControl>();
        assert_eq!(eyes.selected, Some(Eye::Circle));
        assert!(!eyes.is_poked(Eye::Circle));
    }

    #[test]
    fn test_click_outside_passes_through() {
        let (mut world, mut overlay) = overlay_world();
        assert!(!click_at(&mut overlay, &mut world, Vec2::new(5.0, 700.0), MouseButton::Left));
        assert_eq!(world.resource::<DeferredTasks>().0.pending(), 0);
    }

    #[test]
    fn test_reset_reloads_after_delay() {
        let (mut world, mut overlay) = overlay_world();
        let (w, h) = GameConfig::default().resolution;
        world.resource_mut::<EyeControl>().poke(Eye::Square);

        assert!(click_at(&mut overlay, &mut world, Vec2::new(0.92 * w, 0.95 * h), MouseButton::Left));
        let mut tasks = std::mem::take(&mut world.resource_mut::<DeferredTasks>().0);
        for _ in 0..CLICK_DELAY - 1 {
            tasks.tick(&mut world);
        }
        assert!(matches!(
            *world.resource::<NextState<GameState>>(),
            NextState::Unchanged
        ));

        tasks.tick(&mut world);
        assert!(matches!(
            *world.resource::<NextState<GameState>>(),
            NextState::Pending(GameState::Loading)
        ));
        assert_eq!(world.resource::<EyeControl>().progress(), 0.0);
    }

    #[test]
    fn test_welcome_pushed_after_delay() {
        let (mut world, mut overlay) = overlay_world();
        let (w, h) = GameConfig::default().resolution;

        assert!(click_at(&mut overlay, &mut world, Vec2::new(0.97 * w, 0.95 * h), MouseButton::Left));
        let mut tasks = std::mem::take(&mut world.resource_mut::<DeferredTasks>().0);
        for _ in 0..CLICK_DELAY {
            tasks.tick(&mut world);
        }
        assert!(!world.resource::<LayerCommands>().is_empty());
    }

    #[test]
    fn test_mute_button_toggles_volume_and_sprite() {
        let (mut world, mut overlay) = overlay_world();
        let (w, h) = GameConfig::default().resolution;
        let mute = Vec2::new(0.87 * w, 0.95 * h);

        assert!(click_at(&mut overlay, &mut world, mute, MouseButton::Left));
        assert!(world.resource::<GlobalVolume>().is_muted());
        assert_eq!(overlay.button("mute").unwrap().sprite().current_animation(), "unmute");

        assert!(click_at(&mut overlay, &mut world, mute, MouseButton::Left));
        assert!(!world.resource::<GlobalVolume>().is_muted());
        assert_eq!(
            overlay.button("mute").unwrap().sprite().current_animation(),
            DEFAULT_ANIMATION
        );
    }

    #[test]
    fn test_hovering_an_eye_previews_it() {
        let (mut world, mut overlay) = overlay_world();
        world.init_resource::<PointerState>();

        world.resource_mut::<PointerState>().position = circle_eye_center();
        overlay.tick(&mut world);
        assert_eq!(world.resource::<EyeControl>().hovered(), Some(Eye::Circle));

        world.resource_mut::<PointerState>().position = Vec2::new(5.0, 700.0);
        overlay.tick(&mut world);
        assert_eq!(world.resource::<EyeControl>().hovered(), None);
    }
}
