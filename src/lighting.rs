use glam::{Mat4, Vec3};

use crate::math::hex_to_linear;
use crate::types::{DirectionalLightData, LightingUniform};

/// Light shining from `position` toward the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    pub const fn new(color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            position,
        }
    }

    fn to_data(self) -> DirectionalLightData {
        DirectionalLightData {
            direction: self.position.normalize_or_zero().to_array(),
            intensity: self.intensity,
            color: hex_to_linear(self.color),
            _pad: 0.0,
        }
    }
}

/// Orthographic shadow frustum of the key light, aimed at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Half-width and half-height of the frustum in world units
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    /// Depth-comparison offset that keeps lit faces from self-shadowing
    pub bias: f32,
    pub map_size: u32,
}

impl ShadowCamera {
    pub const fn studio() -> Self {
        Self {
            extent: 15.0,
            near: 0.5,
            far: 500.0,
            bias: 0.0005,
            map_size: 2048,
        }
    }

    pub fn view_proj(&self, light: &DirectionalLight) -> Mat4 {
        let view = Mat4::look_at_rh(light.position, Vec3::ZERO, Vec3::Y);
        let e = self.extent;
        Mat4::orthographic_rh(-e, e, -e, e, self.near, self.far) * view
    }
}

/// Studio rig around the figure plus background, fog and exposure
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub rim: DirectionalLight,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub background: u32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub exposure: f32,
    /// Only the key light casts shadows
    pub shadow: ShadowCamera,
}

impl Lighting {
    pub fn studio() -> Self {
        Self {
            key: DirectionalLight::new(0xffffff, 1.2, Vec3::new(5.0, 8.0, 5.0)),
            fill: DirectionalLight::new(0xccddff, 0.6, Vec3::new(-8.0, 4.0, -6.0)),
            rim: DirectionalLight::new(0xff6600, 0.5, Vec3::new(0.0, 5.0, -10.0)),
            ambient_color: 0xffffff,
            ambient_intensity: 0.3,
            background: 0x000000,
            fog_near: 100.0,
            fog_far: 1000.0,
            exposure: 1.2,
            shadow: ShadowCamera::studio(),
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = hex_to_linear(self.background);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    pub fn to_uniform(&self) -> LightingUniform {
        LightingUniform {
            shadow_view_proj: self.shadow.view_proj(&self.key).to_cols_array_2d(),
            lights: [self.key.to_data(), self.fill.to_data(), self.rim.to_data()],
            ambient: hex_to_linear(self.ambient_color),
            ambient_intensity: self.ambient_intensity,
            fog_color: hex_to_linear(self.background),
            fog_near: self.fog_near,
            fog_far: self.fog_far,
            exposure: self.exposure,
            shadow_bias: self.shadow.bias,
            _pad: 0.0,
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::studio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_directions_are_unit() {
        let uniform = Lighting::studio().to_uniform();
        for light in uniform.lights {
            let d = Vec3::from_array(light.direction);
            assert!((d.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rim_light_comes_from_behind() {
        let uniform = Lighting::studio().to_uniform();
        assert!(uniform.lights[2].direction[2] < 0.0);
        assert_eq!(uniform.lights[2].intensity, 0.5);
    }

    #[test]
    fn test_black_background() {
        let color = Lighting::studio().clear_color();
        assert_eq!((color.r, color.g, color.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_shadow_frustum_covers_the_figure() {
        let lighting = Lighting::studio();
        let view_proj = lighting.shadow.view_proj(&lighting.key);

        let origin = view_proj.project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
        assert!(origin.z > 0.0 && origin.z < 1.0);

        // head top and feet both land inside the map
        for p in [Vec3::new(0.0, 3.7, 0.0), Vec3::new(0.4, -3.9, 0.1)] {
            let ndc = view_proj.project_point3(p);
            assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0, "{p} maps to {ndc}");
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn test_shadow_depth_grows_away_from_key_light() {
        let lighting = Lighting::studio();
        let view_proj = lighting.shadow.view_proj(&lighting.key);
        let toward = lighting.key.position.normalize();
        let near = view_proj.project_point3(toward);
        let far = view_proj.project_point3(-toward);
        assert!(near.z < far.z);
    }

    #[test]
    fn test_uniform_carries_shadow_matrix() {
        let lighting = Lighting::studio();
        let uniform = lighting.to_uniform();
        assert_eq!(
            uniform.shadow_view_proj,
            lighting.shadow.view_proj(&lighting.key).to_cols_array_2d()
        );
        assert_eq!(uniform.shadow_bias, lighting.shadow.bias);
        assert_eq!(lighting.shadow.map_size, 2048);
    }
}
