//! Spawns a parsed [`LevelScene`] into the ECS world.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::Triangle;
use super::scene::{Character, LevelScene, StaticObject};
use crate::rendering::{billboard, Billboard, BillboardAnimation, BILLBOARD_SIZE};

/// Marker for all level entities that should be cleaned up on reload.
#[derive(Component)]
pub struct LevelGeometry;

/// A static model placed by the level file.
#[derive(Component, Debug)]
pub struct LevelObject {
    pub name: String,
}

/// A billboard character placed by the level file.
#[derive(Component, Debug)]
pub struct LevelCharacter {
    pub id: String,
}

/// Handles produced while building, needed by later spawns.
#[derive(Debug, Default)]
pub struct BuiltLevel {
    pub skybox: Option<Handle<Image>>,
}

/// Asset path of a static object's model, relative to the resource root.
pub fn model_path(name: &str) -> String {
    format!("ObjectData/{name}/{name}.glb")
}

/// Spawn every part of `scene`.
pub fn build_level(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    asset_server: &AssetServer,
    scene: &LevelScene,
) -> BuiltLevel {
    setup_environment(commands);

    for object in &scene.objects {
        spawn_static_object(commands, asset_server, object);
    }

    if !scene.characters.is_empty() {
        let quad = meshes.add(Rectangle::from_size(BILLBOARD_SIZE));
        for character in &scene.characters {
            spawn_character(commands, materials, asset_server, quad.clone(), character);
        }
    }

    if let Some(collider) = collision_collider(&scene.collision) {
        commands.spawn((
            collider,
            RigidBody::Fixed,
            Transform::default(),
            LevelGeometry,
            Name::new("LevelCollision"),
        ));
    }

    let skybox = scene
        .skybox
        .as_ref()
        .and_then(|cubemap| cubemap.to_image())
        .map(|image| images.add(image));

    BuiltLevel { skybox }
}

fn setup_environment(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 3000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelGeometry,
    ));
}

fn spawn_static_object(commands: &mut Commands, asset_server: &AssetServer, object: &StaticObject) {
    let model = asset_server.load(GltfAssetLabel::Scene(0).from_asset(model_path(&object.name)));
    commands.spawn((
        SceneRoot(model),
        object.transform(),
        LevelObject {
            name: object.name.clone(),
        },
        LevelGeometry,
    ));
}

fn spawn_character(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    quad: Handle<Mesh>,
    character: &Character,
) {
    let animation = BillboardAnimation::for_character(character, asset_server);
    let material = materials.add(billboard::billboard_material(animation.texture().cloned()));

    // Quads are centered; lift so the feet sit on the recorded position
    let position = character.position + Vec3::Y * BILLBOARD_SIZE.y / 2.0;
    commands.spawn((
        Mesh3d(quad),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        Billboard,
        animation,
        LevelCharacter {
            id: character.id.clone(),
        },
        LevelGeometry,
    ));
}

/// One fixed compound collider from the level's triangles.
///
/// Degenerate triangles carry no surface and are skipped.
pub fn collision_collider(triangles: &[Triangle]) -> Option<Collider> {
    let shapes: Vec<_> = triangles
        .iter()
        .filter(|tri| tri.normal != Vec3::ZERO)
        .map(|tri| {
            (
                Vec3::ZERO,
                Quat::IDENTITY,
                Collider::triangle(tri.v0, tri.v1, tri.v2),
            )
        })
        .collect();

    if shapes.is_empty() {
        return None;
    }
    Some(Collider::compound(shapes))
}
