//! World module - level files, collision and the scene they build.

mod builder;
pub mod collision;
mod error;
pub mod parser;
mod plugin;
mod scene;
pub mod skybox;

pub use builder::{build_level, collision_collider, LevelCharacter, LevelGeometry, LevelObject};
pub use collision::{ray_cast, Ray, RayHit, Triangle};
pub use error::LevelError;
pub use plugin::{setup_level, CurrentLevel, WorldPlugin};
pub use scene::{
    AnimType, Animation, Character, LevelPaths, LevelScene, LightRecord, LoadDiagnostics,
    StaticObject,
};
pub use skybox::{CubeFace, Cubemap};
