mod color;

pub use color::{hex_to_linear, hex_to_srgb, srgb_to_linear};
