//! UI module - layer stack, widgets and the game's layers.

pub mod button;
pub mod draw;
pub mod input;
pub mod layer;
pub mod layers;
mod plugin;
pub mod sprite;

pub use button::{Bounds, ButtonClick, ButtonHover, ButtonState, UiButton};
pub use draw::{DrawCommand, DrawList};
pub use input::{PendingEvents, PointerState};
pub use layer::{apply_layer_commands, Layer, LayerCommands, LayerStack};
pub use plugin::UiPlugin;
pub use sprite::{AnimatedSprite, SpriteAnimation};
