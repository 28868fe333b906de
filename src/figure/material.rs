use crate::math::hex_to_linear;

/// Self-illumination added on top of lit shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emissive {
    pub color: u32,
    pub intensity: f32,
}

/// Metal/roughness surface description
///
/// Materials are built once and shared between segments through `Arc`;
/// there is no way to mutate one after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: &'static str,
    color: u32,
    metalness: f32,
    roughness: f32,
    emissive: Option<Emissive>,
}

impl Material {
    pub const fn new(name: &'static str, color: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            name,
            color,
            metalness,
            roughness,
            emissive: None,
        }
    }

    pub const fn with_emissive(mut self, color: u32, intensity: f32) -> Self {
        self.emissive = Some(Emissive { color, intensity });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Base color as packed `0xRRGGBB` (sRGB)
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn emissive(&self) -> Option<Emissive> {
        self.emissive
    }

    pub fn base_color_linear(&self) -> [f32; 3] {
        hex_to_linear(self.color)
    }

    /// Emissive radiance in linear space, already scaled by intensity
    pub fn emissive_linear(&self) -> [f32; 3] {
        match self.emissive {
            Some(e) => hex_to_linear(e.color).map(|c| c * e.intensity),
            None => [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_material_has_no_glow() {
        let m = Material::new("dark_metal", 0x333333, 0.9, 0.15);
        assert_eq!(m.emissive(), None);
        assert_eq!(m.emissive_linear(), [0.0; 3]);
    }

    #[test]
    fn test_emissive_scaled_by_intensity() {
        let m = Material::new("eye", 0x00ff00, 0.9, 0.1).with_emissive(0x00ff00, 0.5);
        let glow = m.emissive_linear();
        assert!(glow[0].abs() < 1e-6);
        assert!((glow[1] - 0.5).abs() < 1e-5);
        assert!(glow[2].abs() < 1e-6);
    }
}
