use glam::{Mat3, Mat4};
use crate::figure::Segment;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Mesh vertex: model-space position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Per-segment draw data, rewritten every frame
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix's upper 3x3, padded to vec4 columns
    pub normal: [[f32; 4]; 3],
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub emissive: [f32; 3],
    pub roughness: f32,
    /// 1.0 when the key light's shadow map darkens this segment
    pub receive_shadow: f32,
    pub _pad: [f32; 3],
}

impl InstanceData {
    pub fn new(world: Mat4, segment: &Segment) -> Self {
        let material = segment.material();
        let normal = Mat3::from_mat4(world).inverse().transpose();
        Self {
            model: world.to_cols_array_2d(),
            normal: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
            base_color: material.base_color_linear(),
            metalness: material.metalness(),
            emissive: material.emissive_linear(),
            roughness: material.roughness(),
            receive_shadow: if segment.shadows().receive { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }

    // model (4 columns), normal (3 columns), color + metalness, emissive + roughness, shadow flags
    const ATTRIBUTES: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4,
    ];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceData>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Single directional light, GPU layout
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightData {
    /// Unit vector pointing from the surface toward the light
    pub direction: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

/// Scene-wide lighting, fog and tone mapping parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Key light's orthographic view-projection for shadow lookups
    pub shadow_view_proj: [[f32; 4]; 4],
    pub lights: [DirectionalLightData; 3],
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub fog_color: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
    pub exposure: f32,
    pub shadow_bias: f32,
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Material, Role, Shadows, Shape, Transform};
    use glam::Vec3;
    use std::sync::Arc;

    fn segment(shadows: Shadows) -> Segment {
        Segment::new(
            "torso",
            Role::Torso,
            Shape::cuboid(1.2, 2.0, 0.6),
            Arc::new(Material::new("metal", 0xcccccc, 0.8, 0.2)),
            Transform::IDENTITY,
        )
        .with_shadows(shadows)
    }

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::size_of::<InstanceData>(), 160);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 208);
    }

    #[test]
    fn test_instance_normal_matrix_undoes_scale() {
        let world = Mat4::from_scale(Vec3::new(1.0, 1.25, 0.6));
        let instance = InstanceData::new(world, &segment(Shadows::CAST_AND_RECEIVE));
        assert!((instance.normal[1][1] - 0.8).abs() < 1e-6);
        assert!((instance.normal[2][2] - 1.0 / 0.6).abs() < 1e-5);
        assert_eq!(instance.metalness, 0.8);
        assert_eq!(instance.roughness, 0.2);
    }

    #[test]
    fn test_instance_carries_receive_flag() {
        let lit = InstanceData::new(Mat4::IDENTITY, &segment(Shadows::CAST_AND_RECEIVE));
        let trim = InstanceData::new(Mat4::IDENTITY, &segment(Shadows::CAST_ONLY));
        assert_eq!(lit.receive_shadow, 1.0);
        assert_eq!(trim.receive_shadow, 0.0);
    }

    #[test]
    fn test_lighting_uniform_field_offsets() {
        // Must match the WGSL struct layout
        assert_eq!(std::mem::offset_of!(LightingUniform, lights), 64);
        assert_eq!(std::mem::offset_of!(LightingUniform, ambient), 160);
        assert_eq!(std::mem::offset_of!(LightingUniform, fog_near), 188);
        assert_eq!(std::mem::offset_of!(LightingUniform, shadow_bias), 200);
    }
}
