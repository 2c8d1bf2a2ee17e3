//! The in-memory level: records parsed from a `.lvl` file and its referenced files.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::collision::{load_collision_file, Triangle};
use super::error::LevelError;
use super::parser::{parse_character, parse_light, parse_object, SectionMode};
use super::skybox::{load_cubemap, Cubemap};

/// Resolves level, object and skybox paths under a resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPaths {
    root: PathBuf,
}

impl LevelPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/StageData/<name>/<name>.lvl`
    pub fn level_file(&self, name: &str) -> PathBuf {
        self.root
            .join("StageData")
            .join(name)
            .join(format!("{name}.lvl"))
    }

    /// `<root>/ObjectData/<name>/`
    pub fn object_dir(&self, name: &str) -> PathBuf {
        self.root.join("ObjectData").join(name)
    }

    /// `<root>/ObjectData/<name>/<name>.ocl`
    pub fn collision_file(&self, name: &str) -> PathBuf {
        self.object_dir(name).join(format!("{name}.ocl"))
    }
}

/// A placed static model.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticObject {
    pub name: String,
    pub position: Vec3,
    /// Euler XYZ angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl StaticObject {
    /// Serialize back to the `name|x y z|rx ry rz|sx sy sz` form.
    pub fn to_line(&self) -> String {
        let mut line = self.name.clone();
        for v in [self.position, self.rotation, self.scale] {
            let _ = write!(line, "|{} {} {}", v.x, v.y, v.z);
        }
        line
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        );
        Transform {
            translation: self.position,
            rotation,
            scale: self.scale,
        }
    }
}

/// Animation slots a billboard character can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimType {
    Idle,
    Walk,
    Jump,
    Fall,
}

impl AnimType {
    /// Texture name prefix, e.g. `idle` for `idle0.png`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimType::Idle => "idle",
            AnimType::Walk => "walk",
            AnimType::Jump => "jump",
            AnimType::Fall => "fall",
        }
    }
}

/// A run of frames for one [`AnimType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub kind: AnimType,
    pub start_frame: u32,
    pub frame_count: u32,
}

/// A billboard character placed in the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: String,
    pub position: Vec3,
    pub animations: HashMap<AnimType, Animation>,
}

impl Character {
    /// A character with a single one-frame idle animation.
    pub fn with_idle(id: &str, position: Vec3) -> Self {
        let idle = Animation {
            kind: AnimType::Idle,
            start_frame: 0,
            frame_count: 1,
        };
        Self {
            id: id.to_string(),
            position,
            animations: HashMap::from([(AnimType::Idle, idle)]),
        }
    }
}

/// A parsed light line. Not used by the scene yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRecord {
    pub name: String,
    pub position: Vec3,
    pub color: Vec3,
}

/// Non-fatal problems found while loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadDiagnostics {
    /// Referenced files that did not exist (level, collision).
    pub missing_files: Vec<PathBuf>,
    /// Faces of the kept skybox that failed to load.
    pub skybox_face_failures: usize,
    /// Lines accepted but discarded (lights, rail objects).
    pub discarded_lines: usize,
}

/// The active level.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelScene {
    pub name: String,
    pub objects: Vec<StaticObject>,
    pub characters: Vec<Character>,
    pub collision: Vec<Triangle>,
    pub skybox: Option<Cubemap>,
    pub diagnostics: LoadDiagnostics,
}

impl LevelScene {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..default()
        }
    }

    /// Load `name` from its `.lvl` file.
    ///
    /// A level file that cannot be opened is logged and yields an empty scene.
    /// Malformed lines fail the load with a line-numbered [`LevelError::Parse`].
    pub fn load(name: &str, paths: &LevelPaths) -> Result<Self, LevelError> {
        let path = paths.level_file(name);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                error!("Failed to open level {:?}: {}", path, e);
                let mut scene = Self::empty(name);
                scene.diagnostics.missing_files.push(path);
                return Ok(scene);
            }
        };

        let scene = Self::parse(name, &source, &path, paths)?;
        info!(
            "Loaded level '{}': {} objects, {} characters, {} collision triangles, skybox: {}",
            scene.name,
            scene.objects.len(),
            scene.characters.len(),
            scene.collision.len(),
            scene.skybox.as_ref().map_or("none", |sky| sky.name.as_str()),
        );
        Ok(scene)
    }

    /// Parse level source text. `source_path` is only used in diagnostics.
    pub fn parse(
        name: &str,
        source: &str,
        source_path: &Path,
        paths: &LevelPaths,
    ) -> Result<Self, LevelError> {
        let mut scene = Self::empty(name);
        let mut mode = SectionMode::default();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if let Some(next) = SectionMode::from_header(line) {
                mode = next;
                continue;
            }

            let parse_error = |details: String| LevelError::Parse {
                path: source_path.to_path_buf(),
                line: index + 1,
                details,
            };

            match mode {
                SectionMode::Object => {
                    scene.objects.push(parse_object(line).map_err(parse_error)?);
                }
                SectionMode::RailObject => {
                    debug!("Ignoring rail object line {}: {}", index + 1, line);
                    scene.diagnostics.discarded_lines += 1;
                }
                SectionMode::Light => {
                    let light = parse_light(line).map_err(parse_error)?;
                    debug!("Light '{}' parsed but lights are not supported", light.name);
                    scene.diagnostics.discarded_lines += 1;
                }
                SectionMode::Sky => {
                    let sky_name = line.trim();
                    if let Some(previous) = &scene.skybox {
                        warn!(
                            "Line {}: skybox '{}' replaces '{}'",
                            index + 1,
                            sky_name,
                            previous.name
                        );
                    }
                    let cubemap = load_cubemap(sky_name, &paths.object_dir(sky_name));
                    scene.diagnostics.skybox_face_failures = cubemap.failed_faces();
                    scene.skybox = Some(cubemap);
                }
                SectionMode::Character => {
                    scene
                        .characters
                        .push(parse_character(line).map_err(parse_error)?);
                }
                SectionMode::Collision => {
                    let object = line.trim();
                    let path = paths.collision_file(object);
                    match load_collision_file(&path) {
                        Ok(triangles) => scene.collision.extend(triangles),
                        Err(LevelError::FileNotFound(missing)) => {
                            warn!("Collision file for '{}' not found at {:?}", object, missing);
                            scene.diagnostics.missing_files.push(missing);
                        }
                        Err(LevelError::Read { path, details }) => {
                            warn!("Failed to read collision file {:?}: {}", path, details);
                            scene.diagnostics.missing_files.push(path);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        Ok(scene)
    }
}
