//! Free-fly camera
//!
//! Yaw/pitch orientation with a world position. Input polling lives with the
//! application; the camera only does the math.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Maximum camera tilt in degrees, to prevent flipping over the poles
const MAX_PITCH_DEGREES: f32 = 70.0;

/// Free-fly perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    theta: f32,
    phi: f32,
    position: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            theta: -38.0,
            phi: -12.0,
            position: Vec3::new(-15.0, 8.0, 10.0),
        }
    }
}

impl Camera {
    /// Create a camera at the demo's default vantage point
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector the camera is looking along
    pub fn forward(&self) -> Vec3 {
        let theta = utils::deg_to_rad(self.theta);
        let phi = utils::deg_to_rad(self.phi);
        Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin())
    }

    /// Unit vector to the camera's right, in the horizontal plane
    pub fn right(&self) -> Vec3 {
        let theta = utils::deg_to_rad(self.theta);
        Vec3::new(-theta.sin(), 0.0, theta.cos())
    }

    /// Move the camera by a world-space offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Turn the camera by yaw/pitch deltas in degrees
    ///
    /// Pitch is clamped to ±70° so the view never flips.
    pub fn turn(&mut self, delta_theta: f32, delta_phi: f32) {
        self.theta += delta_theta;
        self.phi = (self.phi + delta_phi).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// View matrix looking along the camera's forward vector
    pub fn view_matrix(&self) -> Mat4 {
        let eye = Point3::from(self.position);
        let target = Point3::from(self.position + self.forward());
        Mat4::look_at_rh(&eye, &target, &Vec3::y())
    }

    /// Perspective projection for the given viewport size
    pub fn projection_matrix(&self, width: f32, height: f32) -> Mat4 {
        Mat4::new_perspective(width / height, std::f32::consts::PI * 0.25, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Vec4;

    #[test]
    fn test_forward_is_unit_length() {
        let camera = Camera::new();
        assert_relative_eq!(camera.forward().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.right().norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_clamp() {
        let mut camera = Camera::new();
        camera.turn(0.0, 500.0);
        assert_relative_eq!(camera.forward().y, utils::deg_to_rad(70.0).sin(), epsilon = 1e-6);
        camera.turn(0.0, -1000.0);
        assert_relative_eq!(camera.forward().y, utils::deg_to_rad(-70.0).sin(), epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let camera = Camera::new();
        let view = camera.view_matrix();
        let eye = view * Vec4::new(camera.position().x, camera.position().y, camera.position().z, 1.0);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_translate() {
        let mut camera = Camera::new();
        let start = camera.position();
        camera.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.position(), start + Vec3::new(1.0, 2.0, 3.0));
    }
}
