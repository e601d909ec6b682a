//! Triangle rasterization: edge-function coverage test, perspective-correct
//! attribute interpolation, depth testing, and per-pixel shading dispatch.

use crate::color::ColorRgb;
use crate::framebuffer::FrameBuffer;
use crate::math::{remap, Vec2};
use crate::mesh::{Mesh, PrimitiveTopology, VertexOut};
use crate::shader::{self, Material, ShadingMode};

const BOUNDING_BOX_PADDING: i64 = 5;
const DEPTH_VIEW_NEAR: f32 = 0.985;
const DEPTH_VIEW_FAR: f32 = 1.0;

/// Toggleable render state the window layer flips in response to key input.
#[derive(Clone, Copy, Debug)]
pub struct RasterSettings {
    pub shading_mode: ShadingMode,
    pub normal_mapping_enabled: bool,
    pub depth_view_enabled: bool,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            shading_mode: ShadingMode::Combined,
            normal_mapping_enabled: true,
            depth_view_enabled: false,
        }
    }
}

/// Rasterizes every triangle of `mesh` (already vertex-transformed into
/// `mesh.vertices_out()`) into `framebuffer`.
pub fn render_mesh(
    mesh: &Mesh,
    material: &Material,
    settings: &RasterSettings,
    framebuffer: &mut FrameBuffer,
) {
    let vertices_out = mesh.vertices_out();
    for (i0, i1, i2) in triangle_indices(mesh.topology(), mesh.indices()) {
        let v0 = &vertices_out[i0 as usize];
        let v1 = &vertices_out[i1 as usize];
        let v2 = &vertices_out[i2 as usize];
        rasterize_triangle(v0, v1, v2, material, settings, framebuffer);
    }
}

/// Produces the `(i0, i1, i2)` vertex-index triples for one draw call.
///
/// Triangle strips skip degenerate triangles (any two shared indices) and
/// flip winding on every other triangle, since alternating strip triangles
/// are wound oppositely under a shared vertex order.
fn triangle_indices(topology: PrimitiveTopology, indices: &[u32]) -> Vec<(u32, u32, u32)> {
    match topology {
        PrimitiveTopology::TriangleList => indices
            .chunks_exact(3)
            .map(|c| (c[0], c[1], c[2]))
            .collect(),
        PrimitiveTopology::TriangleStrip => {
            let mut tris = Vec::new();
            if indices.len() < 3 {
                return tris;
            }
            for k in 0..indices.len() - 2 {
                let (a, b, c) = (indices[k], indices[k + 1], indices[k + 2]);
                if a == b || b == c || a == c {
                    continue;
                }
                if k % 2 == 0 {
                    tris.push((a, b, c));
                } else {
                    tris.push((b, a, c));
                }
            }
            tris
        }
    }
}

fn rasterize_triangle(
    v0: &VertexOut,
    v1: &VertexOut,
    v2: &VertexOut,
    material: &Material,
    settings: &RasterSettings,
    framebuffer: &mut FrameBuffer,
) {
    let p0 = Vec2::new(v0.position.x, v0.position.y);
    let p1 = Vec2::new(v1.position.x, v1.position.y);
    let p2 = Vec2::new(v2.position.x, v2.position.y);

    let screen_width = framebuffer.width() as i64;
    let screen_height = framebuffer.height() as i64;

    // Conservative screen cull: drop the whole triangle if any vertex lies
    // outside the unpadded screen rect, before the padded bbox is computed.
    let screen_width_f = framebuffer.width() as f32;
    let screen_height_f = framebuffer.height() as f32;
    for p in [p0, p1, p2] {
        if p.x < 0.0 || p.x > screen_width_f || p.y < 0.0 || p.y > screen_height_f {
            return;
        }
    }

    let min_x = p0.x.min(p1.x).min(p2.x).floor() as i64 - BOUNDING_BOX_PADDING;
    let max_x = p0.x.max(p1.x).max(p2.x).ceil() as i64 + BOUNDING_BOX_PADDING;
    let min_y = p0.y.min(p1.y).min(p2.y).floor() as i64 - BOUNDING_BOX_PADDING;
    let max_y = p0.y.max(p1.y).max(p2.y).ceil() as i64 + BOUNDING_BOX_PADDING;

    if max_x < 0 || min_x >= screen_width || max_y < 0 || min_y >= screen_height {
        return;
    }

    let min_x = min_x.max(0);
    let min_y = min_y.max(0);
    let max_x = max_x.min(screen_width - 1);
    let max_y = max_y.min(screen_height - 1);

    let edge01 = p1 - p0;
    let edge12 = p2 - p1;
    let edge20 = p0 - p2;

    let area = edge01.cross(p2 - p0);
    if area.abs() < f32::EPSILON {
        return;
    }

    let inv_w0 = 1.0 / v0.position.w;
    let inv_w1 = 1.0 / v1.position.w;
    let inv_w2 = 1.0 / v2.position.w;

    let uv0_over_w = v0.uv * inv_w0;
    let uv1_over_w = v1.uv * inv_w1;
    let uv2_over_w = v2.uv * inv_w2;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let w0 = (pixel - p1).cross(edge12);
            let w1 = (pixel - p2).cross(edge20);
            let w2 = (pixel - p0).cross(edge01);

            if !(w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0) {
                continue;
            }

            let b0 = w0 / area;
            let b1 = w1 / area;
            let b2 = w2 / area;

            let z = b0 * v0.position.z + b1 * v1.position.z + b2 * v2.position.z;

            let interpolated_inv_w = b0 * inv_w0 + b1 * inv_w1 + b2 * inv_w2;
            let uv = (uv0_over_w * b0 + uv1_over_w * b1 + uv2_over_w * b2) / interpolated_inv_w;

            // Preserved: an out-of-range UV abandons the rest of this
            // triangle's pixels rather than just skipping this one pixel.
            if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
                return;
            }

            let normal = (v0.normal * b0 + v1.normal * b1 + v2.normal * b2).normalize();
            let tangent = v0.tangent * b0 + v1.tangent * b1 + v2.tangent * b2;
            let view_direction =
                (v0.view_direction * b0 + v1.view_direction * b1 + v2.view_direction * b2)
                    .normalize();

            let x = x as u32;
            let y = y as u32;
            if z > framebuffer.depth_at(x, y) {
                continue;
            }

            let color = if settings.depth_view_enabled {
                ColorRgb::splat(remap(z, DEPTH_VIEW_NEAR, DEPTH_VIEW_FAR))
            } else {
                let fragment = VertexOut {
                    position: v0.position,
                    color: v0.color,
                    uv,
                    normal,
                    tangent,
                    view_direction,
                };
                shader::shade(
                    &fragment,
                    material,
                    settings.shading_mode,
                    settings.normal_mapping_enabled,
                )
            };

            framebuffer.test_and_write(x, y, z, color.max_to_one().to_packed_argb());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_strip_skips_degenerate_and_flips_winding() {
        let indices = vec![0u32, 1, 2, 2, 3, 2];
        let tris = triangle_indices(PrimitiveTopology::TriangleStrip, &indices);
        assert_eq!(tris, vec![(0, 1, 2)]);
    }

    #[test]
    fn triangle_list_groups_in_threes() {
        let indices = vec![0u32, 1, 2, 3, 4, 5];
        let tris = triangle_indices(PrimitiveTopology::TriangleList, &indices);
        assert_eq!(tris, vec![(0, 1, 2), (3, 4, 5)]);
    }

    #[test]
    fn pixel_strictly_inside_triangle_passes_coverage_test() {
        use crate::texture::Texture;

        let base = VertexOut {
            uv: Vec2::new(0.5, 0.5),
            ..VertexOut::default()
        };
        let v0 = VertexOut {
            position: crate::math::Vec4::new(0.0, 0.0, 0.5, 1.0),
            ..base
        };
        let v1 = VertexOut {
            position: crate::math::Vec4::new(10.0, 0.0, 0.5, 1.0),
            ..base
        };
        let v2 = VertexOut {
            position: crate::math::Vec4::new(0.0, 10.0, 0.5, 1.0),
            ..base
        };

        let diffuse = Texture::solid(ColorRgb::splat(1.0));
        let normal_tex = Texture::solid(ColorRgb::new(0.5, 0.5, 1.0));
        let gloss = Texture::solid(ColorRgb::splat(0.5));
        let specular = Texture::solid(ColorRgb::splat(0.5));
        let material = Material {
            diffuse: &diffuse,
            normal: &normal_tex,
            gloss: &gloss,
            specular: &specular,
        };
        let settings = RasterSettings::default();
        let mut framebuffer = FrameBuffer::new(20, 20);

        rasterize_triangle(&v0, &v1, &v2, &material, &settings, &mut framebuffer);

        assert!(framebuffer.depth_at(2, 2).is_finite());
    }
}
