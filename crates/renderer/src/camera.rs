//! Orbit camera that frames the ring as it grows.
//!
//! The camera always looks at the origin (the ring's centre). Its distance eases toward
//! a target that is re-derived from the ring radius whenever the radius changes; the
//! mouse orbits and zooms on top of that.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Far clipping plane, large enough for the true-scale ring seen from its framing distance.
pub const FAR_CLIP: f32 = 100_000.0;
pub const NEAR_CLIP: f32 = 0.1;
/// Closest the user may zoom.
pub const MIN_DISTANCE: f32 = 5.0;
/// Farthest the user may zoom.
pub const MAX_DISTANCE: f32 = 5000.0;

/// Multiplier on ring radius in the framing distance.
const FRAMING_SCALE: f32 = 1.5;
/// Constant margin in the framing distance.
const FRAMING_MARGIN: f32 = 50.0;
/// Exponential approach rate toward the target distance, per second.
const DISTANCE_EASING: f32 = 6.0;
/// Zoom factor per scroll line.
const ZOOM_STEP: f32 = 0.9;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Distance at which a ring of `ring_radius` is framed: `radius · 1.5 + 50`.
pub fn framing_distance(ring_radius: f32) -> f32 {
    ring_radius * FRAMING_SCALE + FRAMING_MARGIN
}

/// Camera orbiting the origin with eased distance changes.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Mouse sensitivity for orbit drags (radians per pixel).
    pub sensitivity: f32,
    yaw: f32,
    pitch: f32,
    distance: f32,
    target_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: NEAR_CLIP,
            far: 20_000.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.005,
            yaw: 0.0,
            pitch: 0.0,
            distance: 50.0,
            target_distance: 50.0,
        }
    }
}

impl OrbitCamera {
    /// Camera already sitting at the framing distance for `ring_radius`.
    pub fn framing(ring_radius: f32) -> Self {
        let mut camera = Self::default();
        camera.retarget_for_radius(ring_radius);
        camera.distance = camera.target_distance;
        camera
    }

    /// Re-aim at a ring of `ring_radius`. Call on every radius change; the camera eases
    /// toward the new distance over the following frames rather than jumping.
    pub fn retarget_for_radius(&mut self, ring_radius: f32) {
        self.target_distance = framing_distance(ring_radius);
        self.far = FAR_CLIP;
    }

    /// Ease the current distance toward the target. Frame-rate independent.
    pub fn update(&mut self, dt: f32) {
        let blend = 1.0 - (-DISTANCE_EASING * dt.max(0.0)).exp();
        self.distance += (self.target_distance - self.distance) * blend;
    }

    /// Orbit from a mouse drag (pixels).
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * self.sensitivity;
        self.pitch = (self.pitch - delta_y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Zoom by scroll lines (positive = closer).
    pub fn zoom(&mut self, lines: f32) {
        self.target_distance =
            (self.target_distance * ZOOM_STEP.powf(lines)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    /// Eye position. With no orbit input this is `(0, 0, distance)`.
    pub fn position(&self) -> Vec3 {
        let rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
        rotation * Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU (must match `CameraUniform` in voxel.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &OrbitCamera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_distance_formula() {
        assert_eq!(framing_distance(15.0), 72.5);
        assert_eq!(framing_distance(350.0), 575.0);
    }

    #[test]
    fn retarget_caps_far_plane() {
        let mut camera = OrbitCamera::default();
        camera.retarget_for_radius(350.0);
        assert_eq!(camera.far, FAR_CLIP);
        assert_eq!(camera.target_distance(), 575.0);
    }

    #[test]
    fn retarget_eases_instead_of_jumping() {
        let mut camera = OrbitCamera::framing(15.0);
        let start = camera.distance();
        camera.retarget_for_radius(350.0);
        assert_eq!(camera.distance(), start);

        camera.update(1.0 / 60.0);
        let after_one = camera.distance();
        assert!(after_one > start && after_one < 575.0);

        for _ in 0..600 {
            camera.update(1.0 / 60.0);
        }
        assert!((camera.distance() - 575.0).abs() < 0.01);
    }

    #[test]
    fn easing_is_frame_rate_independent() {
        let mut fast = OrbitCamera::framing(15.0);
        let mut slow = fast.clone();
        fast.retarget_for_radius(200.0);
        slow.retarget_for_radius(200.0);
        for _ in 0..4 {
            fast.update(0.025);
        }
        slow.update(0.1);
        assert!((fast.distance() - slow.distance()).abs() < 1e-2);
    }

    #[test]
    fn default_eye_on_positive_z() {
        let camera = OrbitCamera::framing(15.0);
        let eye = camera.position();
        assert!(eye.x.abs() < 1e-5 && eye.y.abs() < 1e-5);
        assert!((eye.z - 72.5).abs() < 1e-4);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut camera = OrbitCamera::framing(100.0);
        camera.process_mouse(120.0, -40.0);
        assert!((camera.position().length() - camera.distance()).abs() < 1e-2);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.process_mouse(0.0, 1.0e6);
        assert!(camera.position().y.abs() < camera.distance());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1000.0);
        assert_eq!(camera.target_distance(), MIN_DISTANCE);
        camera.zoom(-1000.0);
        assert_eq!(camera.target_distance(), MAX_DISTANCE);
    }
}
