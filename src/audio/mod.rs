//! Audio module - sounds keyed by name, loaded on first use.

mod plugin;
mod sounds;

pub use plugin::GameAudioPlugin;
pub use sounds::{
    play_sound, sound_path, toggle_mute, GlobalVolume, SoundCache, SoundQueue, SoundRequest,
};
