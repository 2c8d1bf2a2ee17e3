//! Audio plugin - named sound playback.

use bevy::prelude::*;

use super::sounds::{
    apply_global_volume, play_queued_sounds, GlobalVolume, SoundCache, SoundQueue,
};
use crate::core::FrameSet;

/// Audio plugin - plays sounds queued during the frame.
///
/// Expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundQueue>()
            .init_resource::<SoundCache>()
            .init_resource::<GlobalVolume>()
            .add_systems(
                Update,
                (apply_global_volume, play_queued_sounds)
                    .chain()
                    .after(FrameSet::Draw),
            );
    }
}
