//! Named sound effects, queued by game code and played by a system.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource};

use crate::core::GameConfig;

/// One queued playback.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    pub name: String,
    pub volume: f32,
    pub looped: bool,
}

/// Sounds requested this frame.
#[derive(Resource, Debug, Default)]
pub struct SoundQueue {
    requests: Vec<SoundRequest>,
}

impl SoundQueue {
    pub fn play(&mut self, name: impl Into<String>, volume: f32, looped: bool) {
        self.requests.push(SoundRequest {
            name: name.into(),
            volume: volume.max(0.0),
            looped,
        });
    }

    pub fn drain(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Queue a one-shot sound from an exclusive context such as a layer.
pub fn play_sound(world: &mut World, name: &str, volume: f32) {
    match world.get_resource_mut::<SoundQueue>() {
        Some(mut queue) => queue.play(name, volume, false),
        None => warn!("No sound queue, dropping '{}'", name),
    }
}

/// Master volume in effect right now. Starts at the configured level.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GlobalVolume {
    level: f32,
    muted: bool,
}

impl GlobalVolume {
    pub fn new(level: f32) -> Self {
        Self {
            level: level.max(0.0),
            muted: false,
        }
    }

    /// Volume every sound is scaled by.
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level.max(0.0);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute. Returns whether sound is now muted.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}

impl GlobalVolume {
    /// Unconfigured full volume. Not a `Default` impl: that would clash with `FromWorld` below.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(1.0)
    }
}

impl FromWorld for GlobalVolume {
    fn from_world(world: &mut World) -> Self {
        world
            .get_resource::<GameConfig>()
            .map(|config| Self::new(config.master_volume))
            .unwrap_or_else(Self::default)
    }
}

/// Toggle global mute from an exclusive context. Returns whether sound is now muted.
pub fn toggle_mute(world: &mut World) -> bool {
    let muted = world
        .get_resource_or_insert_with(GlobalVolume::default)
        .toggle_mute();
    info!("Sound {}", if muted { "muted" } else { "unmuted" });
    muted
}

/// Asset path of a named sound, relative to the resource root.
pub fn sound_path(name: &str) -> String {
    format!("SoundData/{name}.mp3")
}

/// Handles of sounds loaded so far, keyed by name.
#[derive(Resource, Default)]
pub struct SoundCache {
    handles: HashMap<String, Handle<AudioSource>>,
}

impl SoundCache {
    pub fn get_or_load(&mut self, name: &str, asset_server: &AssetServer) -> Handle<AudioSource> {
        self.handles
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Loading sound '{}'", name);
                asset_server.load(sound_path(name))
            })
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }
}

/// Push a changed [`GlobalVolume`] onto sounds already playing.
pub fn apply_global_volume(global: Res<GlobalVolume>, audio: Res<Audio>) {
    if global.is_changed() && !global.is_added() {
        audio.set_volume(f64::from(global.effective()));
    }
}

/// Play everything in the [`SoundQueue`], scaled by the global volume.
pub fn play_queued_sounds(
    mut queue: ResMut<SoundQueue>,
    mut cache: ResMut<SoundCache>,
    asset_server: Res<AssetServer>,
    audio: Res<Audio>,
    global: Res<GlobalVolume>,
) {
    if queue.is_empty() {
        return;
    }

    for request in queue.drain() {
        let handle = cache.get_or_load(&request.name, &asset_server);
        let volume = f64::from(request.volume * global.effective());
        let mut playback = audio.play(handle);
        playback.with_volume(volume);
        if request.looped {
            playback.looped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = SoundQueue::default();
        queue.play("poke", 1.0, false);
        queue.play("music", 0.5, true);
        assert_eq!(queue.len(), 2);

        let names: Vec<_> = queue.drain().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["poke", "music"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_negative_volume_is_silenced() {
        let mut queue = SoundQueue::default();
        queue.play("poke", -2.0, false);
        assert_eq!(queue.drain()[0].volume, 0.0);
    }

    #[test]
    fn test_play_sound_without_queue() {
        let mut world = World::new();
        play_sound(&mut world, "poke", 1.0);

        world.init_resource::<SoundQueue>();
        play_sound(&mut world, "poke", 1.0);
        assert_eq!(world.resource::<SoundQueue>().len(), 1);
    }

    #[test]
    fn test_sound_path() {
        assert_eq!(sound_path("poke"), "SoundData/poke.mp3");
    }

    #[test]
    fn test_mute_toggles_effective_volume() {
        let mut volume = GlobalVolume::new(0.8);
        assert_eq!(volume.effective(), 0.8);

        assert!(volume.toggle_mute());
        assert_eq!(volume.effective(), 0.0);

        volume.set_level(0.5);
        assert_eq!(volume.effective(), 0.0);

        assert!(!volume.toggle_mute());
        assert_eq!(volume.effective(), 0.5);
    }

    #[test]
    fn test_global_volume_seeded_from_config() {
        let mut world = World::new();
        world.insert_resource(GameConfig {
            master_volume: 0.25,
            ..Default::default()
        });
        world.init_resource::<GlobalVolume>();
        assert_eq!(world.resource::<GlobalVolume>().effective(), 0.25);

        assert!(toggle_mute(&mut world));
        assert!(world.resource::<GlobalVolume>().is_muted());
    }
}
