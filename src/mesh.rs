//! Triangle meshes for the figure's primitives
//!
//! Vertex layouts follow three.js: boxes get four vertices per face so each
//! face has a flat normal, spheres are UV grids with duplicated seam
//! vertices, cylinders have a smooth side wall plus fanned caps. All
//! triangles wind counter-clockwise seen from outside.

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use std::ops::Range;

use crate::figure::Shape;
use crate::types::Vertex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn from_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder(radius_top, radius_bottom, height, radial_segments.max(3)),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(position.to_array(), normal.to_array()));
        index
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let half = Vec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u × v = normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = Mesh::default();
    for (normal, u, v) in faces {
        let centre = normal * half;
        let (u, v) = (u * half, v * half);
        let a = mesh.push(centre - u - v, normal);
        let b = mesh.push(centre + u - v, normal);
        let c = mesh.push(centre + u + v, normal);
        let d = mesh.push(centre - u + v, normal);
        mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push(normal * radius, normal.normalize_or_zero());
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // poles collapse one triangle of each quad
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let ring = |theta: f32| Vec3::new(theta.sin(), 0.0, theta.cos());

    // side wall: top row then bottom row
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for x in 0..=radial_segments {
            let dir = ring(x as f32 / radial_segments as f32 * TAU);
            let normal = Vec3::new(dir.x, slope, dir.z).normalize();
            mesh.push(dir * radius + Vec3::Y * y, normal);
        }
    }
    let row = radial_segments + 1;
    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let centre = mesh.push(Vec3::Y * y, normal);
        let first = mesh.vertices.len() as u32;
        for x in 0..=radial_segments {
            let dir = ring(x as f32 / radial_segments as f32 * TAU);
            mesh.push(dir * radius + Vec3::Y * y, normal);
        }
        for x in 0..radial_segments {
            let (i, j) = (first + x, first + x + 1);
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[centre, i, j]);
            } else {
                mesh.indices.extend_from_slice(&[centre, j, i]);
            }
        }
    }
    mesh
}

/// Where one mesh lives inside a packed buffer pair
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRange {
    pub indices: Range<u32>,
    pub base_vertex: i32,
}

/// Several meshes concatenated into one vertex and one index buffer
#[derive(Debug, Clone, Default)]
pub struct PackedMeshes {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub ranges: Vec<DrawRange>,
}

impl PackedMeshes {
    /// Indices stay relative to each mesh; `base_vertex` rebases them at draw time
    pub fn pack<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Self {
        let mut packed = Self::default();
        for mesh in meshes {
            let start = packed.indices.len() as u32;
            let base_vertex = packed.vertices.len() as i32;
            packed.vertices.extend_from_slice(&mesh.vertices);
            packed.indices.extend_from_slice(&mesh.indices);
            packed.ranges.push(DrawRange {
                indices: start..packed.indices.len() as u32,
                base_vertex,
            });
        }
        packed
    }
}
