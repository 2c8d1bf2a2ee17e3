//! Tick-driven texture animations for UI widgets.

use std::collections::HashMap;

use bevy::prelude::*;

/// Name of the animation every sprite starts with.
pub const DEFAULT_ANIMATION: &str = "default";

/// An ordered list of texture names, each held for `ticks_per_frame` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    frames: Vec<String>,
    ticks_per_frame: u32,
}

impl SpriteAnimation {
    /// A single texture that never changes.
    pub fn still(texture: impl Into<String>) -> Self {
        Self {
            frames: vec![texture.into()],
            ticks_per_frame: 1,
        }
    }

    /// Frames `{prefix}{first}` through `{prefix}{last}` inclusive.
    pub fn sequence(prefix: &str, first: u32, last: u32, ticks_per_frame: u32) -> Self {
        Self {
            frames: (first..=last).map(|n| format!("{prefix}{n}")).collect(),
            ticks_per_frame: ticks_per_frame.max(1),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// A sprite that plays one named animation at a time, looping.
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    animations: HashMap<String, SpriteAnimation>,
    current: String,
    frame: usize,
    ticks: u32,
}

impl AnimatedSprite {
    pub fn new(default_texture: impl Into<String>) -> Self {
        Self {
            animations: HashMap::from([(
                DEFAULT_ANIMATION.to_string(),
                SpriteAnimation::still(default_texture),
            )]),
            current: DEFAULT_ANIMATION.to_string(),
            frame: 0,
            ticks: 0,
        }
    }

    pub fn with_animation(mut self, name: impl Into<String>, animation: SpriteAnimation) -> Self {
        self.add_animation(name, animation);
        self
    }

    pub fn add_animation(&mut self, name: impl Into<String>, animation: SpriteAnimation) {
        self.animations.insert(name.into(), animation);
    }

    /// Switch animation and restart it. Unknown names are logged and ignored.
    pub fn set_animation(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            warn!("Sprite has no animation named '{}'", name);
            return false;
        }
        self.current = name.to_string();
        self.frame = 0;
        self.ticks = 0;
        true
    }

    pub fn current_animation(&self) -> &str {
        &self.current
    }

    pub fn tick(&mut self) {
        let Some(animation) = self.animations.get(&self.current) else {
            return;
        };
        self.ticks += 1;
        if self.ticks >= animation.ticks_per_frame {
            self.ticks = 0;
            self.frame = (self.frame + 1) % animation.frames.len().max(1);
        }
    }

    /// Texture name of the current frame.
    pub fn texture(&self) -> &str {
        self.animations
            .get(&self.current)
            .and_then(|animation| animation.frames.get(self.frame))
            .map_or("", String::as_str)
    }
}
