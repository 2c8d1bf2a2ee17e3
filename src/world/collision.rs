//! Collision triangles loaded from per-object `.ocl` files.
//!
//! Each line of an `.ocl` file is one triangle, written in the modelling
//! tool's Z-up convention:
//!
//! ```text
//! x1 y1 z1 | x2 y2 z2 | x3 y3 z3
//! ```
//!
//! Vertices are converted to the engine's Y-up space on load.

use std::fs;
use std::path::Path;

use bevy::math::Vec3;

use super::error::LevelError;
use super::parser::parse_float;

/// A collision triangle with its face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub normal: Vec3,
}

impl Triangle {
    /// Build a triangle, deriving `normal = normalize((v1 - v0) x (v2 - v0))`.
    ///
    /// Degenerate triangles get a zero normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self { v0, v1, v2, normal }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Möller-Trumbore intersection. Returns the distance along `ray`.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        const EPSILON: f32 = 1e-6;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = ray.origin - self.v0;
        let u = t_vec.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = t_vec.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > EPSILON).then_some(t)
    }
}

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Nearest triangle hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub triangle: Triangle,
}

/// Closest hit within `max_distance`, if any.
pub fn ray_cast(ray: &Ray, triangles: &[Triangle], max_distance: f32) -> Option<RayHit> {
    triangles
        .iter()
        .filter_map(|tri| {
            tri.intersect(ray)
                .filter(|&distance| distance <= max_distance)
                .map(|distance| RayHit {
                    distance,
                    triangle: *tri,
                })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Stored `(x, y, z)` becomes `(x, z, -y)`.
pub fn convert_vertex(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, z, -y)
}

/// Parse one `.ocl` line into a converted triangle.
pub fn parse_triangle(line: &str) -> Result<Triangle, String> {
    let vertices = line
        .split('|')
        .map(|group| {
            let values = group
                .split_whitespace()
                .map(parse_float)
                .collect::<Result<Vec<_>, _>>()?;
            match values.as_slice() {
                [x, y, z] => Ok(convert_vertex(*x, *y, *z)),
                _ => Err(format!(
                    "vertex needs 3 coordinates, found {}",
                    values.len()
                )),
            }
        })
        .collect::<Result<Vec<_>, String>>()?;

    match vertices.as_slice() {
        [v0, v1, v2] => Ok(Triangle::new(*v0, *v1, *v2)),
        _ => Err(format!("triangle needs 3 vertices, found {}", vertices.len())),
    }
}

/// Parse the contents of an `.ocl` file. Blank lines are skipped.
pub fn parse_collision(source: &str, path: &Path) -> Result<Vec<Triangle>, LevelError> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_triangle(line).map_err(|details| LevelError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                details,
            })
        })
        .collect()
}

/// Read and parse an `.ocl` file.
pub fn load_collision_file(path: &Path) -> Result<Vec<Triangle>, LevelError> {
    let source =
        fs::read_to_string(path).map_err(|e| LevelError::from_io(path.to_path_buf(), e))?;
    parse_collision(&source, path)
}
