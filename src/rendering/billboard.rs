//! Camera-facing sprite quads for level characters and the player.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;

use crate::world::{AnimType, Character};

/// Seconds each billboard frame stays on screen.
const FRAME_SECONDS: f32 = 0.15;

/// Size of a character quad in world units.
pub const BILLBOARD_SIZE: Vec2 = Vec2::new(1.0, 2.0);

/// Rotates about Y to face the active 3D camera.
#[derive(Component)]
pub struct Billboard;

/// Asset path of one character frame: `ObjectData/<id>/<anim><frame>.png`.
pub fn frame_path(id: &str, kind: AnimType, frame: u32) -> String {
    format!("ObjectData/{id}/{}{frame}.png", kind.as_str())
}

/// Frame textures per animation, and which one is playing.
#[derive(Component)]
pub struct BillboardAnimation {
    clips: HashMap<AnimType, Vec<Handle<Image>>>,
    current: AnimType,
    frame: usize,
    timer: Timer,
}

impl BillboardAnimation {
    pub fn new(clips: HashMap<AnimType, Vec<Handle<Image>>>) -> Self {
        Self {
            clips,
            current: AnimType::Idle,
            frame: 0,
            timer: Timer::from_seconds(FRAME_SECONDS, TimerMode::Repeating),
        }
    }

    /// Load every frame a character declares.
    pub fn for_character(character: &Character, asset_server: &AssetServer) -> Self {
        let clips = character
            .animations
            .values()
            .map(|anim| {
                let frames = (anim.start_frame..anim.start_frame + anim.frame_count)
                    .map(|frame| asset_server.load(frame_path(&character.id, anim.kind, frame)))
                    .collect();
                (anim.kind, frames)
            })
            .collect();
        Self::new(clips)
    }

    pub fn current(&self) -> AnimType {
        self.current
    }

    /// Switch clips. Returns false if unchanged or the clip doesn't exist.
    pub fn play(&mut self, kind: AnimType) -> bool {
        if kind == self.current || !self.clips.contains_key(&kind) {
            return false;
        }
        self.current = kind;
        self.frame = 0;
        self.timer.reset();
        true
    }

    /// Advance by `delta`. Returns whether the frame changed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let len = self.clips.get(&self.current).map_or(0, Vec::len);
        self.timer.tick(delta);
        let steps = self.timer.times_finished_this_tick() as usize;
        if len < 2 || steps == 0 {
            return false;
        }
        self.frame = (self.frame + steps) % len;
        true
    }

    pub fn texture(&self) -> Option<&Handle<Image>> {
        self.clips.get(&self.current)?.get(self.frame)
    }
}

/// Unlit, alpha-masked material for a billboard quad.
pub fn billboard_material(texture: Option<Handle<Image>>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: texture,
        alpha_mode: AlphaMode::Mask(0.5),
        unlit: true,
        cull_mode: None,
        ..default()
    }
}

/// Yaw that turns a +Z facing quad at `from` toward `to`.
///
/// `None` when `to` is directly above or below.
pub fn facing_yaw(from: Vec3, to: Vec3) -> Option<f32> {
    let flat = Vec2::new(to.x - from.x, to.z - from.z);
    (flat.length_squared() > 1e-6).then(|| flat.x.atan2(flat.y))
}

pub fn face_camera(
    camera_query: Query<&GlobalTransform, With<Camera3d>>,
    mut billboards: Query<(&GlobalTransform, &mut Transform), With<Billboard>>,
) {
    let Ok(camera) = camera_query.get_single() else {
        return;
    };
    let eye = camera.translation();

    for (global, mut transform) in billboards.iter_mut() {
        if let Some(yaw) = facing_yaw(global.translation(), eye) {
            transform.rotation = Quat::from_rotation_y(yaw);
        }
    }
}

pub fn animate_billboards(
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&mut BillboardAnimation, &MeshMaterial3d<StandardMaterial>)>,
) {
    for (mut animation, material) in query.iter_mut() {
        let switched = animation.is_changed();
        if !animation.advance(time.delta()) && !switched {
            continue;
        }
        let Some(texture) = animation.texture().cloned() else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color_texture = Some(texture);
        }
    }
}
