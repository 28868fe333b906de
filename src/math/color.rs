/// Splits a packed `0xRRGGBB` value into sRGB components in [0, 1]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse for a single channel
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed `0xRRGGBB` to linear RGB, the space lighting is computed in
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_srgb_channels() {
        let rgb = hex_to_srgb(0xff6600);
        assert!((rgb[0] - 1.0).abs() < 1e-6);
        assert!((rgb[1] - 0.4).abs() < 1e-6);
        assert!(rgb[2].abs() < 1e-6);
    }

    #[test]
    fn test_hex_to_linear_black_and_white() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_linear_is_darker_than_srgb_midtones() {
        let srgb = hex_to_srgb(0xcccccc);
        let linear = hex_to_linear(0xcccccc);
        assert!(linear[0] < srgb[0]);
        assert!((linear[0] - 0.6038).abs() < 1e-3);
    }
}
