//! Pinhole / thin-lens camera driven by yaw and pitch.

use crate::Prng;
use glint_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// The orientation is stored as yaw (around +Y, 0 looks down +Z) and pitch
/// (positive looks up). The derived basis is refreshed by
/// [`Camera::update_basis`], which the tracer calls before every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Horizontal field of view in radians
    pub horizontal_fov: f32,
    /// Radius of the lens disc; zero for a pinhole
    pub aperture_size: f32,
    /// Distance to the plane of perfect focus
    pub focal_length: f32,

    // Derived by update_basis()
    direction: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Camera three units behind the origin looking down +Z with a 90
    /// degree horizontal field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, -3.0),
            yaw: 0.0,
            pitch: 0.0,
            horizontal_fov: std::f32::consts::FRAC_PI_2,
            aperture_size: 0.0,
            focal_length: 5.0,
            direction: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_basis();
        camera
    }

    /// Set camera position and orientation.
    pub fn with_position(mut self, position: Vec3, yaw: f32, pitch: f32) -> Self {
        self.position = position;
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_basis();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, horizontal_fov: f32, aperture_size: f32, focal_length: f32) -> Self {
        self.horizontal_fov = horizontal_fov;
        self.aperture_size = aperture_size;
        self.focal_length = focal_length;
        self
    }

    /// Recompute forward, right and up from yaw and pitch.
    pub fn update_basis(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.direction = Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch);
        self.right = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        self.up = self.direction.cross(self.right);
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Tangent of half the horizontal field of view.
    pub fn tan_half_fov(&self) -> f32 {
        (self.horizontal_fov * 0.5).tan()
    }

    /// Jittered primary ray through pixel (x, y) of a `width` x `height`
    /// image, row 0 at the top.
    ///
    /// The ray aims at the focal plane and starts from a random point on the
    /// lens disc, giving depth of field when the aperture is open.
    pub fn pixel_to_ray(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        tan_half_fov: f32,
        prng: &mut Prng,
    ) -> Ray {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let fx = (x as f32 + 0.5 + prng.uniform(-0.5, 0.5) - w * 0.5) / w;
        let fy = (h * 0.5 - y as f32 - 0.5 + prng.uniform(-0.5, 0.5)) / w;

        let target = self.position
            + (self.right * (tan_half_fov * 2.0 * fx)
                + self.up * (tan_half_fov * 2.0 * fy)
                + self.direction)
                * self.focal_length;

        let lens = prng.unit_disc() * self.aperture_size;
        let origin = self.position + self.right * lens.x + self.up * lens.y;
        Ray::new(origin, (target - origin).normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
