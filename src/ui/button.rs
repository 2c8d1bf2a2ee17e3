//! Clickable UI buttons with hover tracking and click callbacks.

use bevy::prelude::*;

use super::draw::DrawList;
use super::sprite::AnimatedSprite;
use crate::core::Scheduler;

/// Hit area of a button, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
}

impl Bounds {
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Bounds::Rect(rect) => rect.contains(point),
            Bounds::Circle { center, radius } => center.distance_squared(point) <= radius * radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    /// Only observable from inside the click callback.
    Pressed,
}

/// Everything a click callback may touch.
pub struct ButtonClick<'a> {
    pub name: &'a str,
    pub mouse_button: MouseButton,
    pub state: ButtonState,
    pub sprite: &'a mut AnimatedSprite,
    /// Deferred changes to this button's sprite, run on its own ticks.
    pub later: &'a mut Scheduler<AnimatedSprite>,
    pub world: &'a mut World,
}

pub type ButtonCallback = Box<dyn Fn(&mut ButtonClick) + Send + Sync>;

/// Everything a hover or unhover hook may touch.
pub struct ButtonHover<'a> {
    pub name: &'a str,
    pub sprite: &'a mut AnimatedSprite,
    pub world: &'a mut World,
}

pub type HoverCallback = Box<dyn Fn(&mut ButtonHover) + Send + Sync>;

pub struct UiButton {
    name: String,
    rect: Rect,
    bounds: Bounds,
    state: ButtonState,
    sprite: AnimatedSprite,
    later: Scheduler<AnimatedSprite>,
    on_click: ButtonCallback,
    on_hover: Option<HoverCallback>,
    on_unhover: Option<HoverCallback>,
}

impl UiButton {
    /// A button drawn in `rect` that reacts inside `bounds`.
    pub fn new(
        name: impl Into<String>,
        rect: Rect,
        bounds: Bounds,
        sprite: AnimatedSprite,
        on_click: impl Fn(&mut ButtonClick) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            rect,
            bounds,
            state: ButtonState::Idle,
            sprite,
            later: Scheduler::new(),
            on_click: Box::new(on_click),
            on_hover: None,
            on_unhover: None,
        }
    }

    /// Run `hook` when the pointer enters the button.
    pub fn with_hover(mut self, hook: impl Fn(&mut ButtonHover) + Send + Sync + 'static) -> Self {
        self.on_hover = Some(Box::new(hook));
        self
    }

    /// Run `hook` when the pointer leaves the button.
    pub fn with_unhover(mut self, hook: impl Fn(&mut ButtonHover) + Send + Sync + 'static) -> Self {
        self.on_unhover = Some(Box::new(hook));
        self
    }

    /// A button whose hit area is its drawn rect.
    pub fn rect(
        name: impl Into<String>,
        rect: Rect,
        sprite: AnimatedSprite,
        on_click: impl Fn(&mut ButtonClick) + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, rect, Bounds::Rect(rect), sprite, on_click)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    pub fn is_on_button(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    /// Idle <-> Hovered as the pointer enters or leaves, firing the
    /// matching hook once per transition.
    pub fn update_hover(&mut self, pointer: Vec2, world: &mut World) {
        let inside = self.bounds.contains(pointer);
        let hook = match (self.state, inside) {
            (ButtonState::Idle, true) => {
                self.state = ButtonState::Hovered;
                self.on_hover.as_ref()
            }
            (ButtonState::Hovered, false) => {
                self.state = ButtonState::Idle;
                self.on_unhover.as_ref()
            }
            _ => None,
        };

        if let Some(hook) = hook {
            hook(&mut ButtonHover {
                name: &self.name,
                sprite: &mut self.sprite,
                world,
            });
        }
    }

    /// Handle a click at `pointer`. Returns whether the button consumed it.
    ///
    /// The callback runs synchronously in the Pressed state; afterwards the
    /// button settles to Hovered or Idle based on where the pointer is.
    pub fn click(&mut self, pointer: Vec2, mouse_button: MouseButton, world: &mut World) -> bool {
        if !self.bounds.contains(pointer) {
            return false;
        }

        self.state = ButtonState::Pressed;
        let mut click = ButtonClick {
            name: &self.name,
            mouse_button,
            state: self.state,
            sprite: &mut self.sprite,
            later: &mut self.later,
            world,
        };
        (self.on_click)(&mut click);

        self.state = if self.bounds.contains(pointer) {
            ButtonState::Hovered
        } else {
            ButtonState::Idle
        };
        true
    }

    pub fn tick(&mut self, pointer: Vec2, world: &mut World) {
        self.update_hover(pointer, world);
        self.sprite.tick();
        self.later.tick(&mut self.sprite);
    }

    pub fn draw(&self, frame: &mut DrawList) {
        let color = match self.state {
            ButtonState::Hovered => Color::srgb(1.0, 1.0, 0.85),
            _ => Color::WHITE,
        };
        frame.push_tinted(self.sprite.texture(), self.rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::sprite::SpriteAnimation;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn circle_button(clicks: Arc<AtomicU32>) -> UiButton {
        UiButton::new(
            "eyeCircle",
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Bounds::Circle {
                center: Vec2::new(50.0, 50.0),
                radius: 10.0,
            },
            AnimatedSprite::new("eyes/eyeCircle0"),
            move |click| {
                assert_eq!(click.state, ButtonState::Pressed);
                clicks.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[test]
    fn test_bounds() {
        let rect = Bounds::Rect(Rect::new(10.0, 10.0, 20.0, 30.0));
        assert!(rect.contains(Vec2::new(15.0, 25.0)));
        assert!(!rect.contains(Vec2::new(25.0, 25.0)));

        let circle = Bounds::Circle {
            center: Vec2::ZERO,
            radius: 5.0,
        };
        assert!(circle.contains(Vec2::new(3.0, 4.0)));
        assert!(!circle.contains(Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_hover_transitions() {
        let mut button = circle_button(Arc::default());
        let mut world = World::new();
        assert_eq!(button.state(), ButtonState::Idle);

        button.update_hover(Vec2::new(52.0, 50.0), &mut world);
        assert_eq!(button.state(), ButtonState::Hovered);

        // Inside the drawn rect but outside the circle
        button.update_hover(Vec2::new(5.0, 5.0), &mut world);
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn test_click_runs_callback_once() {
        let clicks = Arc::new(AtomicU32::new(0));
        let mut button = circle_button(clicks.clone());
        let mut world = World::new();

        assert!(!button.click(Vec2::new(0.0, 0.0), MouseButton::Left, &mut world));
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
        assert_eq!(button.state(), ButtonState::Idle);

        assert!(button.click(Vec2::new(50.0, 50.0), MouseButton::Left, &mut world));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_deferred_blink_reverts() {
        let mut button = UiButton::rect(
            "eye",
            Rect::new(0.0, 0.0, 10.0, 10.0),
            AnimatedSprite::new("eye0").with_animation("blink", SpriteAnimation::still("eye_closed")),
            |click| {
                click.sprite.set_animation("blink");
                click.later.do_later(3, |sprite| {
                    sprite.set_animation("default");
                });
            },
        );
        let mut world = World::new();
        let pointer = Vec2::new(5.0, 5.0);

        button.click(pointer, MouseButton::Left, &mut world);
        assert_eq!(button.sprite().texture(), "eye_closed");

        button.tick(pointer, &mut world);
        button.tick(pointer, &mut world);
        assert_eq!(button.sprite().texture(), "eye_closed");
        button.tick(pointer, &mut world);
        assert_eq!(button.sprite().texture(), "eye0");
    }

    #[test]
    fn test_hover_hooks_fire_once_per_transition() {
        let hovers = Arc::new(AtomicU32::new(0));
        let unhovers = Arc::new(AtomicU32::new(0));
        let (on, off) = (hovers.clone(), unhovers.clone());
        let mut button = circle_button(Arc::default())
            .with_hover(move |hover| {
                assert_eq!(hover.name, "eyeCircle");
                on.fetch_add(1, Ordering::SeqCst);
            })
            .with_unhover(move |_| {
                off.fetch_add(1, Ordering::SeqCst);
            });
        let mut world = World::new();
        let inside = Vec2::new(50.0, 50.0);
        let outside = Vec2::new(0.0, 0.0);

        button.update_hover(outside, &mut world);
        assert_eq!(hovers.load(Ordering::SeqCst), 0);
        assert_eq!(unhovers.load(Ordering::SeqCst), 0);

        button.update_hover(inside, &mut world);
        button.update_hover(inside, &mut world);
        assert_eq!(hovers.load(Ordering::SeqCst), 1);
        assert_eq!(unhovers.load(Ordering::SeqCst), 0);

        button.update_hover(outside, &mut world);
        button.update_hover(outside, &mut world);
        assert_eq!(hovers.load(Ordering::SeqCst), 1);
        assert_eq!(unhovers.load(Ordering::SeqCst), 1);

        button.update_hover(inside, &mut world);
        assert_eq!(hovers.load(Ordering::SeqCst), 2);
    }
}
