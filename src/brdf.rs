//! Bidirectional reflectance distribution functions used by the shader.

use crate::color::ColorRgb;
use crate::math::{Vec3, PI};

/// Lambertian diffuse term: `cd * kd / pi`.
pub fn lambert(kd: ColorRgb, cd: ColorRgb) -> ColorRgb {
    cd * kd * (1.0 / PI)
}

/// Blinn-Phong-style specular term: `ks * max(0, dot(reflect(l,n), v))^exp`.
/// `l` is the incident light direction (pointing toward the surface).
pub fn phong(ks: ColorRgb, exponent: f32, l: Vec3, v: Vec3, n: Vec3) -> ColorRgb {
    let cos_alpha = l.reflect(n).dot(v);
    if cos_alpha < f32::EPSILON {
        return ColorRgb::BLACK;
    }
    ks * cos_alpha.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lambert_matches_closed_form() {
        let kd = ColorRgb::new(0.5, 0.5, 0.5);
        let cd = ColorRgb::new(1.0, 0.5, 0.25);
        let result = lambert(kd, cd);
        assert_relative_eq!(result.r, 1.0 * 0.5 / PI, epsilon = 1e-6);
        assert_relative_eq!(result.g, 0.5 * 0.5 / PI, epsilon = 1e-6);
        assert_relative_eq!(result.b, 0.25 * 0.5 / PI, epsilon = 1e-6);
    }

    #[test]
    fn phong_is_black_when_reflection_faces_away() {
        let ks = ColorRgb::WHITE;
        let l = Vec3::new(1.0, 0.0, 0.0);
        let n = Vec3::UNIT_Y;
        let v = Vec3::new(-1.0, 0.0, 0.0);
        let result = phong(ks, 25.0, l, v, n);
        assert_eq!(result, ColorRgb::BLACK);
    }

    #[test]
    fn phong_peaks_along_mirror_direction() {
        let ks = ColorRgb::WHITE;
        let n = Vec3::UNIT_Y;
        let l = Vec3::new(0.0, -1.0, 0.0);
        let v = l.reflect(n);
        let result = phong(ks, 25.0, l, v, n);
        assert_relative_eq!(result.r, 1.0, epsilon = 1e-4);
    }
}
