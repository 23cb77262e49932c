use glam::{Mat4, Vec3};

/// Pitch limit just short of straight up/down, where `look_at` degenerates.
const PITCH_LIMIT: f32 = 1.55;

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 100.0;

/// Perspective camera orbiting a target point.
///
/// The eye sits on a sphere of radius `distance` around `target`, placed by
/// `yaw` (around +Y, zero looking down -Z) and `pitch` (positive = above the
/// target).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,

    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 1.0, 2.0), Vec3::ZERO)
    }
}

impl Camera {
    /// Camera at `eye` looking at `target` with the default lens.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            target,
            distance,
            yaw,
            pitch,
            up: Vec3::Y,
            fov_y: 0.7,
            aspect: 16.0 / 9.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, self.up)
    }

    /// Right-handed perspective with wgpu's `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Updates the aspect ratio; zero-sized surfaces keep the previous value.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Rotates around the target by the given angles (radians).
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves toward (positive) or away from (negative) the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_eye_matches_viewer_start() {
        let cam = Camera::default();
        assert!(close(cam.eye(), Vec3::new(0.0, 1.0, 2.0)), "{}", cam.eye());
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.fov_y, 0.7);
    }

    #[test]
    fn look_at_round_trips() {
        let eye = Vec3::new(-3.0, 2.5, 4.0);
        let target = Vec3::new(1.0, 0.5, -1.0);
        let cam = Camera::look_at(eye, target);
        assert!(close(cam.eye(), eye), "{}", cam.eye());
    }

    #[test]
    fn target_projects_to_ndc_center() {
        let cam = Camera::look_at(Vec3::new(2.0, 3.0, 5.0), Vec3::new(0.5, 0.0, 0.0));
        let clip = cam.view_projection() * Vec4::new(0.5, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.orbit(0.0, 10.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.orbit(0.0, -20.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut cam = Camera::default();
        let before = cam.eye().distance(cam.target);
        cam.orbit(1.3, 0.2);
        assert!((cam.eye().distance(cam.target) - before).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::default();
        cam.zoom(1000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn zero_size_keeps_aspect() {
        let mut cam = Camera::default();
        cam.set_aspect(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_aspect(0, 400);
        assert_eq!(cam.aspect, 2.0);
    }
}
