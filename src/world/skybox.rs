//! Six-face cubemap loading for the level skybox.
//!
//! Faces are decoded with the `image` crate so a load can be inspected
//! (and tested) without a render device. A face that fails to load is
//! left empty; the other faces still load.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};

/// Cubemap faces in GPU layer order: +X, -X, +Y, -Y, +Z, -Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Front,
        CubeFace::Back,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            CubeFace::Right => "right.png",
            CubeFace::Left => "left.png",
            CubeFace::Top => "top.png",
            CubeFace::Bottom => "bottom.png",
            CubeFace::Front => "front.png",
            CubeFace::Back => "back.png",
        }
    }
}

/// Decoded RGBA8 pixels of one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A skybox: name, source directory, and whichever faces loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubemap {
    pub name: String,
    pub directory: PathBuf,
    pub faces: [Option<FaceImage>; 6],
}

impl Cubemap {
    pub fn face(&self, face: CubeFace) -> Option<&FaceImage> {
        self.faces[face as usize].as_ref()
    }

    pub fn failed_faces(&self) -> usize {
        self.faces.iter().filter(|face| face.is_none()).count()
    }

    /// Build a cube texture for Bevy's `Skybox`.
    ///
    /// Face size comes from the first loaded face. Missing faces, and faces of
    /// a different size, are filled with black. Returns `None` if nothing loaded.
    pub fn to_image(&self) -> Option<Image> {
        let reference = self.faces.iter().flatten().next()?;
        let (width, height) = (reference.width, reference.height);
        let face_len = (width * height * 4) as usize;

        let mut data = Vec::with_capacity(face_len * 6);
        for (face, slot) in CubeFace::ALL.iter().zip(&self.faces) {
            match slot {
                Some(image) if image.width == width && image.height == height => {
                    data.extend_from_slice(&image.rgba);
                }
                Some(image) => {
                    warn!(
                        "Skybox '{}' face {:?} is {}x{}, expected {}x{}",
                        self.name, face, image.width, image.height, width, height
                    );
                    data.resize(data.len() + face_len, 0);
                }
                None => data.resize(data.len() + face_len, 0),
            }
        }

        let mut image = Image::new(
            Extent3d {
                width,
                height: height * 6,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD,
        );
        image.reinterpret_stacked_2d_as_array(6);
        image.texture_view_descriptor = Some(TextureViewDescriptor {
            dimension: Some(TextureViewDimension::Cube),
            ..default()
        });
        Some(image)
    }
}

fn load_face(path: &Path) -> Option<FaceImage> {
    match image::open(path) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            Some(FaceImage {
                width: rgba.width(),
                height: rgba.height(),
                rgba: rgba.into_raw(),
            })
        }
        Err(e) => {
            error!("Cubemap texture failed to load at path {:?}: {}", path, e);
            None
        }
    }
}

/// Load the six faces of skybox `name` from `directory`.
pub fn load_cubemap(name: &str, directory: &Path) -> Cubemap {
    let faces = CubeFace::ALL.map(|face| load_face(&directory.join(face.file_name())));
    let cubemap = Cubemap {
        name: name.to_string(),
        directory: directory.to_path_buf(),
        faces,
    };
    if cubemap.failed_faces() > 0 {
        warn!(
            "Skybox '{}' loaded with {} missing face(s)",
            name,
            cubemap.failed_faces()
        );
    }
    cubemap
}
