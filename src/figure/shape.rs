/// Primitive a segment is tessellated from
///
/// Dimensions follow three.js geometry constructors: cuboids are centred on
/// the origin, spheres and cylinders are centred with their axis along +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl Shape {
    pub const fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid {
            width,
            height,
            depth,
        }
    }

    pub const fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub const fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }
}

