//! Orbit/fly camera: basis vectors, view and projection matrices, and the
//! per-frame update driven by an [`InputSnapshot`] rather than polling the
//! windowing layer directly.

use crate::math::{clampf, Mat4, Vec3};

pub const MOVEMENT_SPEED: f32 = 30.0;
pub const MOUSE_SENSITIVITY: f32 = 0.2;
const FOV_MIN: f32 = 0.0;
const FOV_MAX: f32 = 180.0;
const DEFAULT_FOV: f32 = 45.0;

/// Mouse button state relevant to camera input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
}

/// Keyboard state relevant to camera input, already resolved to logical
/// actions (so WASD and the arrow keys collapse to one flag each) by the
/// window layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fov_decrease: bool,
    pub fov_increase: bool,
    pub fov_reset: bool,
}

/// A snapshot of all external input the camera needs for one `update` call,
/// assembled once per tick by the window layer. This decouples
/// `Camera::update` from any particular windowing crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSnapshot {
    pub mouse_delta: (i32, i32),
    pub buttons: MouseButtons,
    pub keys: KeySet,
    pub dt: f32,
}

impl InputSnapshot {
    fn any_input(&self) -> bool {
        self.mouse_delta != (0, 0)
            || self.buttons.left
            || self.buttons.right
            || self.keys.forward
            || self.keys.backward
            || self.keys.left
            || self.keys.right
            || self.keys.up
            || self.keys.down
            || self.keys.fov_decrease
            || self.keys.fov_increase
            || self.keys.fov_reset
    }
}

/// Camera state: origin, orientation (pitch/yaw in degrees, no roll), FOV,
/// and the derived view/projection matrices.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub origin: Vec3,
    pub fov_angle: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub total_pitch: f32,
    pub total_yaw: f32,

    forward: Vec3,
    right: Vec3,
    up: Vec3,

    view_matrix: Mat4,
    inv_view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(origin: Vec3, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            origin,
            fov_angle: DEFAULT_FOV,
            aspect_ratio,
            near: 1.0,
            far: 1000.0,
            total_pitch: 0.0,
            total_yaw: 0.0,
            forward: Vec3::UNIT_Z,
            right: Vec3::UNIT_X,
            up: Vec3::UNIT_Y,
            view_matrix: Mat4::identity(),
            inv_view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
        };
        camera.initialize(DEFAULT_FOV, origin, aspect_ratio, 1000.0, 1.0);
        camera
    }

    pub fn initialize(
        &mut self,
        fov_angle: f32,
        origin: Vec3,
        aspect_ratio: f32,
        far: f32,
        near: f32,
    ) {
        self.fov_angle = fov_angle;
        self.origin = origin;
        self.aspect_ratio = aspect_ratio;
        self.far = far;
        self.near = near;

        self.calculate_view_matrix();
        self.calculate_projection_matrix();
    }

    fn fov_value(&self) -> f32 {
        (self.fov_angle.to_radians() / 2.0).tan()
    }

    fn calculate_view_matrix(&mut self) {
        self.inv_view_matrix = Mat4::rotation_x(self.total_pitch.to_radians())
            * Mat4::rotation_y(self.total_yaw.to_radians())
            * Mat4::translation_vec3(self.origin);
        self.view_matrix = self
            .inv_view_matrix
            .inverse()
            .expect("camera view matrix must be invertible");

        let mut forward = self.view_matrix.transform_vector(-Vec3::UNIT_Z).normalize();
        forward.z *= -1.0;
        self.forward = forward;

        self.right = Vec3::UNIT_Y.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();
    }

    fn calculate_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_fov_lh(self.fov_value(), self.aspect_ratio, self.near, self.far);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.calculate_projection_matrix();
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Applies one tick of input, per the condition table in the design
    /// notes: recomputes the view/projection matrices only if anything
    /// actually changed this frame.
    pub fn update(&mut self, input: &InputSnapshot) {
        if !input.any_input() {
            return;
        }

        let (dx, dy) = (input.mouse_delta.0 as f32, input.mouse_delta.1 as f32);

        if input.buttons.left && input.buttons.right {
            self.origin = self.origin - Vec3::UNIT_Y * (dy * MOUSE_SENSITIVITY);
        } else if input.buttons.right {
            self.total_pitch += dy * MOUSE_SENSITIVITY;
            self.total_yaw += dx * MOUSE_SENSITIVITY;
        } else if input.buttons.left {
            self.origin = self.origin - Vec3::UNIT_Z * (dy * MOUSE_SENSITIVITY);
            self.total_yaw += dx * MOUSE_SENSITIVITY;
        }

        let speed = input.dt * MOVEMENT_SPEED;
        if input.keys.forward {
            self.origin = self.origin + self.forward * speed;
        }
        if input.keys.backward {
            self.origin = self.origin - self.forward * speed;
        }
        if input.keys.left {
            self.origin = self.origin - self.right * speed;
        }
        if input.keys.right {
            self.origin = self.origin + self.right * speed;
        }
        if input.keys.up {
            self.origin = self.origin + Vec3::UNIT_Y * speed;
        }
        if input.keys.down {
            self.origin = self.origin - Vec3::UNIT_Y * speed;
        }

        if input.keys.fov_decrease {
            self.fov_angle = clampf(self.fov_angle - 1.0, FOV_MIN, FOV_MAX);
        } else if input.keys.fov_increase {
            self.fov_angle = clampf(self.fov_angle + 1.0, FOV_MIN, FOV_MAX);
        } else if input.keys.fov_reset {
            self.fov_angle = DEFAULT_FOV;
        }

        self.calculate_view_matrix();
        self.calculate_projection_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot() -> InputSnapshot {
        InputSnapshot {
            dt: 1.0 / 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn no_input_leaves_matrices_unchanged() {
        let mut camera = Camera::new(Vec3::new(0.0, 5.0, -64.0), 640.0 / 480.0);
        let before = camera.view_matrix();
        camera.update(&InputSnapshot::default());
        assert_eq!(camera.view_matrix(), before);
    }

    #[test]
    fn forward_key_moves_along_forward_vector() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        let forward = camera.forward();
        let mut input = snapshot();
        input.keys.forward = true;
        camera.update(&input);
        let expected = forward * (input.dt * MOVEMENT_SPEED);
        assert_relative_eq!(camera.origin.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(camera.origin.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(camera.origin.z, expected.z, epsilon = 1e-4);
    }

    #[test]
    fn fov_clamps_at_bounds_and_resets() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        for _ in 0..200 {
            let mut input = snapshot();
            input.keys.fov_decrease = true;
            camera.update(&input);
        }
        assert_relative_eq!(camera.fov_angle, 0.0);

        let mut input = snapshot();
        input.keys.fov_reset = true;
        camera.update(&input);
        assert_relative_eq!(camera.fov_angle, 45.0);
    }

    #[test]
    fn right_mouse_rotates_pitch_and_yaw() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        let mut input = snapshot();
        input.buttons.right = true;
        input.mouse_delta = (10, 5);
        camera.update(&input);
        assert_relative_eq!(camera.total_yaw, 10.0 * MOUSE_SENSITIVITY, epsilon = 1e-4);
        assert_relative_eq!(camera.total_pitch, 5.0 * MOUSE_SENSITIVITY, epsilon = 1e-4);
    }
}
