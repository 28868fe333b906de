use glam::{Mat4, Vec3};
use crate::animation::{Pose, LOOK_AT};
use crate::types::CameraUniform;

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Perspective camera that re-aims at a target every time it is placed.
///
/// No orientation is stored: the view matrix is derived from `position` and
/// `target` on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: LOOK_AT,
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
        }
    }

    /// Aspect ratio from a viewport size; a zero height (minimised window) keeps the old ratio
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Moves to the pose's eye position and looks at the fixed target
    pub fn apply_pose(&mut self, pose: &Pose) {
        self.position = pose.camera_position();
        self.target = LOOK_AT;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::map_pose;

    #[test]
    fn test_aspect_from_viewport() {
        let mut camera = Camera::default();
        camera.set_viewport(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimised_viewport_keeps_aspect() {
        let mut camera = Camera::new(2.0);
        camera.set_viewport(0, 0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_apply_start_pose() {
        let mut camera = Camera::default();
        camera.apply_pose(&map_pose(0.0));
        assert_eq!(camera.position, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(camera.target, Vec3::new(0.0, 1.0, 0.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let mut camera = Camera::default();
        camera.apply_pose(&map_pose(0.7));
        let clip = camera.view_projection().project_point3(camera.target);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
