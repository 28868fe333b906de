use crate::driver::SceneView;

/// Rendering backend - consumes one fully posed scene per frame
pub trait RenderBackend {
    type Error;

    /// Draw and present one frame. Nothing flows back into the scene.
    fn render(&mut self, scene: &SceneView<'_>) -> Result<(), Self::Error>;
}
