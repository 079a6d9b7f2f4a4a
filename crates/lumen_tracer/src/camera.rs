//! Camera for primary ray generation.
//!
//! Screen space maps onto a view window spanned by the `right` and `up`
//! vectors one unit along `view` from the camera position. The lengths of
//! `right` and `up` set the field of view and aspect ratio, POV-Ray style.

use lumen_core::CameraDescription;
use lumen_math::{Mat3, Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How the camera basis is derived from the scene description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisMode {
    /// Use `up` and `right` exactly as given.
    #[default]
    Verbatim,
    /// Rebuild an orthonormal basis from the look-at point, keeping the
    /// original `up`/`right` lengths and handedness.
    Reconstruct,
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    view: Vec3,
    up: Vec3,
    right: Vec3,
    look_at: Vec3,
    basis: BasisMode,
}

impl Camera {
    /// Create a camera at the origin looking down +z.
    pub fn new() -> Self {
        Self::from_description(&CameraDescription::default())
    }

    /// Create a camera from the parsed description using verbatim vectors.
    pub fn from_description(description: &CameraDescription) -> Self {
        Self::from_description_with_basis(description, BasisMode::Verbatim)
    }

    pub fn from_description_with_basis(description: &CameraDescription, basis: BasisMode) -> Self {
        let mut camera = Self {
            position: description.location,
            view: Vec3::Z,
            up: description.up,
            right: description.right,
            look_at: description.look_at,
            basis,
        };
        camera.update_basis();
        camera
    }

    /// Builder method to set the position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self.update_basis();
        self
    }

    /// Builder method to set the look-at point.
    pub fn with_look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = look_at;
        self.update_basis();
        self
    }

    /// Builder method to set the up and right vectors.
    pub fn with_up_right(mut self, up: Vec3, right: Vec3) -> Self {
        self.up = up;
        self.right = right;
        self.update_basis();
        self
    }

    /// Builder method to set the basis mode.
    pub fn with_basis(mut self, basis: BasisMode) -> Self {
        self.basis = basis;
        self.update_basis();
        self
    }

    /// Recompute `view` (and, when reconstructing, `right`/`up`).
    fn update_basis(&mut self) {
        let view = (self.look_at - self.position).normalize_or_zero();
        if view == Vec3::ZERO {
            return;
        }

        if self.basis == BasisMode::Reconstruct {
            let right_length = self.right.length();
            let up_length = self.up.length();
            let handedness = self.up.cross(view).dot(self.right);

            let right = Vec3::Y.cross(view).normalize_or_zero();
            // Looking straight up or down leaves no horizontal reference.
            if right != Vec3::ZERO {
                let up = view.cross(right).normalize_or_zero();
                self.right = if handedness < 0.0 {
                    -right * right_length
                } else {
                    right * right_length
                };
                self.up = up * up_length;
            }
        }

        self.view = view;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view(&self) -> Vec3 {
        self.view
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn basis(&self) -> BasisMode {
        self.basis
    }

    /// Map a pixel center to view-window coordinates in [-0.5, 0.5].
    pub fn pixel_to_view(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
        Self::sample_to_view(x, y, width, height, Vec2::splat(0.5))
    }

    /// Map a position inside a pixel (`offset` in [0, 1) on each axis) to
    /// view-window coordinates.
    pub fn sample_to_view(x: u32, y: u32, width: u32, height: u32, offset: Vec2) -> Vec2 {
        let pixel = Vec2::new(x as f32, y as f32) + offset;
        pixel / Vec2::new(width as f32, height as f32) - Vec2::splat(0.5)
    }

    /// Ray through a view-window point.
    pub fn view_ray(&self, view_point: Vec2) -> Ray {
        let direction =
            (self.right * view_point.x + self.up * view_point.y + self.view).normalize_or_zero();
        Ray::new(self.position, direction)
    }

    /// Primary ray through the center of pixel (x, y).
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        self.view_ray(Self::pixel_to_view(x, y, width, height))
    }

    /// Primary ray through an arbitrary position inside pixel (x, y).
    pub fn sample_ray(&self, x: u32, y: u32, width: u32, height: u32, offset: Vec2) -> Ray {
        self.view_ray(Self::sample_to_view(x, y, width, height, offset))
    }

    /// Unproject a ray direction back onto the view window.
    ///
    /// Returns `None` when the direction is parallel to the window or the
    /// basis is degenerate.
    pub fn ray_to_view(&self, direction: Vec3) -> Option<Vec2> {
        let basis = Mat3::from_cols(self.right, self.up, self.view);
        if basis.determinant().abs() < f32::EPSILON {
            return None;
        }

        let local = basis.inverse() * direction;
        if local.z.abs() < f32::EPSILON {
            return None;
        }
        Some(Vec2::new(local.x / local.z, local.y / local.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pov_camera() -> CameraDescription {
        CameraDescription {
            location: Vec3::new(0.0, 0.0, 14.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            right: Vec3::new(-1.333_333_3, 0.0, 0.0),
        }
    }

    #[test]
    fn test_pixel_to_view() {
        let v = Camera::pixel_to_view(0, 0, 4, 2);
        assert!((v - Vec2::new(0.5 / 4.0 - 0.5, 0.5 / 2.0 - 0.5)).length() < 1e-6);

        let v = Camera::pixel_to_view(3, 1, 4, 2);
        assert!((v - Vec2::new(0.375, 0.25)).length() < 1e-6);
    }

    #[test]
    fn test_center_pixel_looks_along_view() {
        let camera = Camera::new();
        let ray = camera.view_ray(Vec2::ZERO);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_pixel_ray_round_trip() {
        let camera = Camera::from_description(&pov_camera());
        let (width, height) = (640, 480);

        for &(x, y) in &[(0, 0), (639, 479), (320, 17), (5, 400)] {
            let ray = camera.pixel_ray(x, y, width, height);
            assert!((ray.direction().length() - 1.0).abs() < 1e-5);

            let view = camera.ray_to_view(ray.direction()).unwrap();
            let expected = Camera::pixel_to_view(x, y, width, height);
            assert!((view - expected).length() < 1e-4, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_verbatim_keeps_vectors() {
        let description = pov_camera();
        let camera = Camera::from_description(&description);

        assert_eq!(camera.right(), description.right);
        assert_eq!(camera.up(), description.up);
        assert!((camera.view() - -Vec3::Z).length() < 1e-6);
        assert_eq!(camera.look_at(), Vec3::ZERO);
    }

    #[test]
    fn test_reconstruct_preserves_lengths_and_handedness() {
        let description = CameraDescription {
            location: Vec3::new(5.0, 0.0, 0.0),
            look_at: Vec3::ZERO,
            up: Vec3::new(0.0, 2.0, 0.0),
            right: Vec3::new(0.0, 0.0, 1.5),
        };
        let camera = Camera::from_description_with_basis(&description, BasisMode::Reconstruct);

        assert!((camera.view() - -Vec3::X).length() < 1e-6);
        assert!((camera.right().length() - 1.5).abs() < 1e-5);
        assert!((camera.up().length() - 2.0).abs() < 1e-5);
        assert!(camera.right().dot(camera.view()).abs() < 1e-5);
        assert!(camera.up().dot(camera.right()).abs() < 1e-5);

        // The sign of up x view . right survives the rebuild
        let before = description.up.cross(camera.view()).dot(description.right);
        let after = camera.up().cross(camera.view()).dot(camera.right());
        assert_eq!(before.signum(), after.signum());
    }

    #[test]
    fn test_sample_ray_offsets_within_pixel() {
        let camera = Camera::new();
        let corner = camera.sample_ray(0, 0, 2, 2, Vec2::ZERO);
        let view = camera.ray_to_view(corner.direction()).unwrap();
        assert!((view - Vec2::new(-0.5, -0.5)).length() < 1e-5);
    }
}
