pub mod renderer;

pub use renderer::RenderBackend;
