//! Rendering module - camera-facing character sprites.

pub mod billboard;
mod plugin;

pub use billboard::{Billboard, BillboardAnimation, BILLBOARD_SIZE};
pub use plugin::RenderingPlugin;
