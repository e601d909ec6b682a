//! Per-pixel shading: tangent-space normal mapping, Lambert diffuse, Phong
//! specular, and the shading-mode multiplexer.

use std::fmt;

use crate::brdf;
use crate::color::ColorRgb;
use crate::math::{Mat4, Vec3};
use crate::mesh::VertexOut;
use crate::texture::Texture;

pub const LIGHT_INTENSITY: f32 = 7.0;
pub const SHININESS: f32 = 25.0;
pub const AMBIENT: ColorRgb = ColorRgb::new(0.03, 0.03, 0.03);

pub fn light_direction() -> Vec3 {
    Vec3::new(0.577, -0.577, 0.577).normalize()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingMode {
    ObservedArea,
    Diffused,
    Specular,
    Combined,
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffused,
            ShadingMode::Diffused => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingMode::ObservedArea => write!(f, "observed area"),
            ShadingMode::Diffused => write!(f, "diffused"),
            ShadingMode::Specular => write!(f, "specular"),
            ShadingMode::Combined => write!(f, "combined"),
        }
    }
}

/// The material's four textures, all sampled at the same UV.
pub struct Material<'a> {
    pub diffuse: &'a Texture,
    pub normal: &'a Texture,
    pub gloss: &'a Texture,
    pub specular: &'a Texture,
}

/// Shades one interpolated pixel. `vertex` carries the already-interpolated
/// normal/tangent/uv/view-direction for this pixel.
pub fn shade(
    vertex: &VertexOut,
    material: &Material,
    shading_mode: ShadingMode,
    normal_mapping_enabled: bool,
) -> ColorRgb {
    let light_dir = light_direction();

    let normal = if normal_mapping_enabled {
        sample_mapped_normal(vertex, material.normal)
    } else {
        vertex.normal
    };

    let observed_area = normal.dot(-light_dir);
    if observed_area < 0.0 {
        return AMBIENT;
    }

    let diffuse_sample = material.diffuse.sample(vertex.uv.x, vertex.uv.y);
    let lambert = lambert_term(diffuse_sample);

    let specular_sample = material.specular.sample(vertex.uv.x, vertex.uv.y);
    let glossiness = material.gloss.sample(vertex.uv.x, vertex.uv.y).r * SHININESS;
    let phong = brdf::phong(
        specular_sample,
        glossiness,
        -light_dir,
        vertex.view_direction,
        normal,
    );

    let mut color = AMBIENT;
    match shading_mode {
        ShadingMode::ObservedArea => color = color + ColorRgb::splat(observed_area),
        ShadingMode::Diffused => color = color + lambert * observed_area,
        ShadingMode::Specular => color = color + phong * observed_area,
        ShadingMode::Combined => color = color + (lambert + phong) * observed_area,
    }
    color
}

/// `sample(diffuse, uv) * lightIntensity / pi`, expressed directly rather
/// than round-tripping through [`brdf::lambert`]'s `kd` parameter, since the
/// "diffuse reflection coefficient" here is the light intensity itself.
fn lambert_term(diffuse_sample: ColorRgb) -> ColorRgb {
    diffuse_sample * (LIGHT_INTENSITY / std::f32::consts::PI)
}

fn sample_mapped_normal(vertex: &VertexOut, normal_map: &Texture) -> Vec3 {
    let tangent = vertex.tangent;
    let normal = vertex.normal;
    let binormal = normal.cross(tangent);

    let tbn = Mat4::new([
        [tangent.x, tangent.y, tangent.z, 0.0],
        [binormal.x, binormal.y, binormal.z, 0.0],
        [normal.x, normal.y, normal.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    let sample = normal_map.sample(vertex.uv.x, vertex.uv.y);
    let remapped = Vec3::new(
        2.0 * sample.r - 1.0,
        2.0 * sample.g - 1.0,
        2.0 * sample.b - 1.0,
    );

    tbn.transform_vector(remapped).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shading_mode_cycles_through_all_four() {
        let mode = ShadingMode::ObservedArea;
        assert_eq!(mode.next(), ShadingMode::Diffused);
        assert_eq!(mode.next().next(), ShadingMode::Specular);
        assert_eq!(mode.next().next().next(), ShadingMode::Combined);
        assert_eq!(mode.next().next().next().next(), ShadingMode::ObservedArea);
    }

    #[test]
    fn lambert_term_scales_by_intensity_over_pi() {
        let sample = ColorRgb::new(1.0, 1.0, 1.0);
        let result = lambert_term(sample);
        assert!((result.r - LIGHT_INTENSITY / std::f32::consts::PI).abs() < 1e-6);
    }
}
