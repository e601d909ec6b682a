//! 4x4 transformation matrix, row-vector-left convention.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v' = v * M`.
//! - Translation is stored in the **last row** (`data[3]`).
//! - Transforms chain **left-to-right**: `v * A * B` applies `A` first, then
//!   `B`, so `A * B` (as a matrix product) itself means "apply A, then B".
//!
//! # Example
//! ```ignore
//! let transform = scale * rotation; // scale applied first, then rotation
//! let world_pos = transform.transform_point(model_pos);
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`, rows are the basis/translation
/// row vectors described in the module doc comment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix. Translation lives in the last row.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    pub fn translation_vec3(t: Vec3) -> Self {
        Self::translation(t.x, t.y, t.z)
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling_vec3(s: Vec3) -> Self {
        Self::scaling(s.x, s.y, s.z)
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat4::new([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined pitch/yaw/roll rotation: `Rx(pitch) * Ry(yaw) * Rz(roll)`,
    /// all angles in radians.
    pub fn rotation_pyr(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self::rotation_x(pitch) * Self::rotation_y(yaw) * Self::rotation_z(roll)
    }

    /// Left-handed perspective projection with depth mapped to `[0, 1]`.
    ///
    /// `fov_value` is `tan(fovAngle / 2)`, not the angle itself - the
    /// camera is responsible for that conversion so this function stays a
    /// pure function of the four numbers that define the frustum.
    pub fn perspective_fov_lh(fov_value: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let a = far / (far - near);
        let b = -(far * near) / (far - near);
        Mat4::new([
            [1.0 / (aspect_ratio * fov_value), 0.0, 0.0, 0.0],
            [0.0, 1.0 / fov_value, 0.0, 0.0],
            [0.0, 0.0, a, 1.0],
            [0.0, 0.0, b, 0.0],
        ])
    }

    /// Transforms a direction: ignores the translation row.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            v.x * m[0][0] + v.y * m[1][0] + v.z * m[2][0],
            v.x * m[0][1] + v.y * m[1][1] + v.z * m[2][1],
            v.x * m[0][2] + v.y * m[1][2] + v.z * m[2][2],
        )
    }

    /// Transforms a point: applies the translation row, discards the
    /// resulting `w` (the fourth column is never consulted). This mirrors
    /// the source's `Vector3` overload, which is why it is used even for
    /// the non-affine world-view-projection matrix in the vertex stage.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            v.x * m[0][0] + v.y * m[1][0] + v.z * m[2][0] + m[3][0],
            v.x * m[0][1] + v.y * m[1][1] + v.z * m[2][1] + m[3][1],
            v.x * m[0][2] + v.y * m[1][2] + v.z * m[2][2] + m[3][2],
        )
    }

    /// Full homogeneous transform of a `Vec4` with an explicit `w`. No
    /// perspective divide is performed; the caller decides when to divide.
    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.data;
        Vec4::new(
            v.x * m[0][0] + v.y * m[1][0] + v.z * m[2][0] + v.w * m[3][0],
            v.x * m[0][1] + v.y * m[1][1] + v.z * m[2][1] + v.w * m[3][1],
            v.x * m[0][2] + v.y * m[1][2] + v.z * m[2][2] + v.w * m[3][2],
            v.x * m[0][3] + v.y * m[1][3] + v.z * m[2][3] + v.w * m[3][3],
        )
    }

    /// Returns a new matrix with translation applied: `self * Mat4::translation(x, y, z)`.
    pub fn translate(&self, x: f32, y: f32, z: f32) -> Self {
        *self * Mat4::translation(x, y, z)
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        Mat4 {
            data: [
                [
                    self.data[0][0],
                    self.data[1][0],
                    self.data[2][0],
                    self.data[3][0],
                ],
                [
                    self.data[0][1],
                    self.data[1][1],
                    self.data[2][1],
                    self.data[3][1],
                ],
                [
                    self.data[0][2],
                    self.data[1][2],
                    self.data[2][2],
                    self.data[3][2],
                ],
                [
                    self.data[0][3],
                    self.data[1][3],
                    self.data[2][3],
                    self.data[3][3],
                ],
            ],
        }
    }

    /// Computes the inverse of the matrix via the adjugate formula.
    /// Returns `None` if the matrix is singular (determinant is ~0).
    pub fn inverse(&self) -> Option<Mat4> {
        let m = &self.data;

        let c00 = m[1][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[1][2] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            + m[1][3] * (m[2][1] * m[3][2] - m[2][2] * m[3][1]);

        let c01 = -(m[1][0] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[1][2] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[1][3] * (m[2][0] * m[3][2] - m[2][2] * m[3][0]));

        let c02 = m[1][0] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            - m[1][1] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[1][3] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]);

        let c03 = -(m[1][0] * (m[2][1] * m[3][2] - m[2][2] * m[3][1])
            - m[1][1] * (m[2][0] * m[3][2] - m[2][2] * m[3][0])
            + m[1][2] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]));

        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02 + m[0][3] * c03;

        if det.abs() < f32::EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;

        let c10 = -(m[0][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[0][2] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            + m[0][3] * (m[2][1] * m[3][2] - m[2][2] * m[3][1]));

        let c11 = m[0][0] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[0][2] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[0][3] * (m[2][0] * m[3][2] - m[2][2] * m[3][0]);

        let c12 = -(m[0][0] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            - m[0][1] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[0][3] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]));

        let c13 = m[0][0] * (m[2][1] * m[3][2] - m[2][2] * m[3][1])
            - m[0][1] * (m[2][0] * m[3][2] - m[2][2] * m[3][0])
            + m[0][2] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]);

        let c20 = m[0][1] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
            - m[0][2] * (m[1][1] * m[3][3] - m[1][3] * m[3][1])
            + m[0][3] * (m[1][1] * m[3][2] - m[1][2] * m[3][1]);

        let c21 = -(m[0][0] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
            - m[0][2] * (m[1][0] * m[3][3] - m[1][3] * m[3][0])
            + m[0][3] * (m[1][0] * m[3][2] - m[1][2] * m[3][0]));

        let c22 = m[0][0] * (m[1][1] * m[3][3] - m[1][3] * m[3][1])
            - m[0][1] * (m[1][0] * m[3][3] - m[1][3] * m[3][0])
            + m[0][3] * (m[1][0] * m[3][1] - m[1][1] * m[3][0]);

        let c23 = -(m[0][0] * (m[1][1] * m[3][2] - m[1][2] * m[3][1])
            - m[0][1] * (m[1][0] * m[3][2] - m[1][2] * m[3][0])
            + m[0][2] * (m[1][0] * m[3][1] - m[1][1] * m[3][0]));

        let c30 = -(m[0][1] * (m[1][2] * m[2][3] - m[1][3] * m[2][2])
            - m[0][2] * (m[1][1] * m[2][3] - m[1][3] * m[2][1])
            + m[0][3] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]));

        let c31 = m[0][0] * (m[1][2] * m[2][3] - m[1][3] * m[2][2])
            - m[0][2] * (m[1][0] * m[2][3] - m[1][3] * m[2][0])
            + m[0][3] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]);

        let c32 = -(m[0][0] * (m[1][1] * m[2][3] - m[1][3] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][3] - m[1][3] * m[2][0])
            + m[0][3] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]));

        let c33 = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

        Some(Mat4::new([
            [c00 * inv_det, c10 * inv_det, c20 * inv_det, c30 * inv_det],
            [c01 * inv_det, c11 * inv_det, c21 * inv_det, c31 * inv_det],
            [c02 * inv_det, c12 * inv_det, c22 * inv_det, c32 * inv_det],
            [c03 * inv_det, c13 * inv_det, c23 * inv_det, c33 * inv_det],
        ]))
    }

    /// Access element at `[row][col]`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at `[row][col]`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: `A * B` means "apply `A`, then `B`" when used to
/// transform a row vector: `v * (A * B) == (v * A) * B`.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat4_approx_eq(a: Mat4, b: Mat4) {
        for r in 0..4 {
            for c in 0..4 {
                assert_relative_eq!(a.get(r, c), b.get(r, c), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn inverse_of_invertible_matrix_round_trips_to_identity() {
        let m = Mat4::rotation_pyr(0.3, 0.7, 0.0).translate(1.0, 2.0, 3.0);
        let inv = m.inverse().expect("matrix should be invertible");
        assert_mat4_approx_eq(m * inv, Mat4::identity());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Mat4::scaling(1.0, 0.0, 1.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn translation_only_affects_transform_point() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        let v = Vec3::new(5.0, 5.0, 5.0);
        assert_eq!(t.transform_vector(v), v);
        assert_eq!(t.transform_point(v), Vec3::new(6.0, 7.0, 8.0));
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_zero_and_one() {
        let fov_value = (45f32.to_radians() / 2.0).tan();
        let p = Mat4::perspective_fov_lh(fov_value, 1.0, 0.1, 100.0);

        let near_clip = p.transform_vec4(Vec4::new(0.0, 0.0, 0.1, 1.0));
        assert_relative_eq!(near_clip.z / near_clip.w, 0.0, epsilon = 1e-5);

        let far_clip = p.transform_vec4(Vec4::new(0.0, 0.0, 100.0, 1.0));
        assert_relative_eq!(far_clip.z / far_clip.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn chained_transform_applies_left_operand_first() {
        let scale = Mat4::scaling(2.0, 2.0, 2.0);
        let translate = Mat4::translation(10.0, 0.0, 0.0);
        let combined = scale * translate;

        let p = Vec3::new(1.0, 0.0, 0.0);
        let via_combined = combined.transform_point(p);
        let via_steps = translate.transform_point(scale.transform_point(p));
        assert_eq!(via_combined, via_steps);
    }
}
