use bevy::prelude::*;

use crate::core::GameConfig;
use crate::ui::draw::DrawList;
use crate::ui::layer::Layer;

/// How far the shown value moves toward the target each tick.
const PROGRESS_LERP: f32 = 0.1;

/// Ink sprites are laid out against a 1080 pixel tall screen.
const REFERENCE_HEIGHT: f32 = 1080.0;

/// Target value of the progress bar, in `[0, 1]`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub target: f32,
}

impl Progress {
    pub fn set(&mut self, value: f32) {
        self.target = value.clamp(0.0, 1.0);
    }
}

/// One ink strip: rests at `x`, rises by `rise` pixels at full progress.
struct InkStrip {
    texture: &'static str,
    x: f32,
    size: Vec2,
    rise: f32,
}

const INK: [InkStrip; 3] = [
    InkStrip {
        texture: "ink/leftInk",
        x: 0.0,
        size: Vec2::new(116.0, 984.0),
        rise: 270.0,
    },
    InkStrip {
        texture: "ink/middleInk",
        x: 84.0,
        size: Vec2::new(169.0, 1061.0),
        rise: 300.0,
    },
    InkStrip {
        texture: "ink/rightInk",
        x: 206.0,
        size: Vec2::new(102.0, 937.0),
        rise: 200.0,
    },
];

/// Three ink strips that rise toward [`Progress::target`].
pub struct ProgressBarLayer {
    shown: f32,
    scale: f32,
}

impl ProgressBarLayer {
    pub const NAME: &'static str = "Progress Bar";

    pub fn new() -> Self {
        Self {
            shown: 0.0,
            scale: 1.0,
        }
    }

    pub fn shown(&self) -> f32 {
        self.shown
    }

    fn strip_rect(&self, strip: &InkStrip) -> Rect {
        let top = strip.rise * self.shown - 760.0;
        let min = Vec2::new(strip.x, top) * self.scale;
        Rect::from_corners(min, min + strip.size * self.scale)
    }
}

impl Default for ProgressBarLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for ProgressBarLayer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_attach(&mut self, world: &mut World) {
        if let Some(config) = world.get_resource::<GameConfig>() {
            self.scale = config.resolution.1 / REFERENCE_HEIGHT;
        }
        world.init_resource::<Progress>();
    }

    fn tick(&mut self, world: &mut World) {
        let target = world.get_resource::<Progress>().map_or(0.0, |p| p.target);
        self.shown += (target - self.shown) * PROGRESS_LERP;
    }

    fn draw(&self, frame: &mut DrawList) {
        for strip in &INK {
            frame.push(strip.texture, self.strip_rect(strip));
        }
    }
}
