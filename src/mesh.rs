//! Mesh representation: model-space vertices, the post-transform vertex
//! array the vertex stage writes into, and OBJ loading via `tobj`.

use std::fmt;
use std::path::Path;

use crate::color::ColorRgb;
use crate::math::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load OBJ: {0}")]
    Tobj(#[from] tobj::LoadError),
    #[error("OBJ file contains no models")]
    NoModels,
    #[error("mesh has no vertices")]
    NoVertices,
    #[error("mesh has no texture coordinates")]
    NoTexCoords,
    #[error("mesh has no normals")]
    NoNormals,
    #[error("face indices not divisible by 3")]
    InvalidFaces,
}

/// Primitive assembly mode for the index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

impl fmt::Display for PrimitiveTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveTopology::TriangleList => write!(f, "triangle list"),
            PrimitiveTopology::TriangleStrip => write!(f, "triangle strip"),
        }
    }
}

/// Model-space vertex as loaded from disk (or authored by a test).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: ColorRgb,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    /// Populated by the vertex stage, not the loader.
    pub view_direction: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            color: ColorRgb::MAGENTA,
            uv,
            normal,
            tangent,
            view_direction: Vec3::ZERO,
        }
    }
}

/// Post-vertex-stage vertex. `position.xy` are screen-space pixel
/// coordinates, `position.z` is depth in `[0,1]`, and `position.w` is the
/// clip-space `w` kept around for perspective-correct interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOut {
    pub position: Vec4,
    pub color: ColorRgb,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub view_direction: Vec3,
}

impl Default for VertexOut {
    fn default() -> Self {
        Self {
            position: Vec4::ZERO,
            color: ColorRgb::BLACK,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
            view_direction: Vec3::ZERO,
        }
    }
}

/// A single drawable mesh: model-space vertices, an index buffer, and the
/// per-frame world matrix and post-transform vertex array the vertex stage
/// writes into.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    topology: PrimitiveTopology,
    vertices_out: Vec<VertexOut>,
    world_matrix: Mat4,
    rotation_y: f32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        match topology {
            PrimitiveTopology::TriangleList => debug_assert_eq!(indices.len() % 3, 0),
            PrimitiveTopology::TriangleStrip => {
                debug_assert!(indices.is_empty() || indices.len() >= 3)
            }
        }
        let vertex_count = vertices.len();
        Self {
            vertices,
            indices,
            topology,
            vertices_out: vec![VertexOut::default(); vertex_count],
            world_matrix: Mat4::identity(),
            rotation_y: 0.0,
        }
    }

    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path.as_ref(), &load_options)?;

        let model = models.into_iter().next().ok_or(LoadError::NoModels)?;
        let raw = model.mesh;

        if raw.positions.is_empty() {
            return Err(LoadError::NoVertices);
        }
        if raw.texcoords.is_empty() {
            return Err(LoadError::NoTexCoords);
        }
        if raw.normals.is_empty() {
            return Err(LoadError::NoNormals);
        }
        if raw.indices.len() % 3 != 0 {
            return Err(LoadError::InvalidFaces);
        }

        let positions: Vec<Vec3> = raw
            .positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let normals: Vec<Vec3> = raw
            .normals
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let uvs: Vec<Vec2> = raw
            .texcoords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();

        let tangents = compute_tangents(&positions, &normals, &uvs, &raw.indices);

        let vertices: Vec<Vertex> = (0..positions.len())
            .map(|i| Vertex::new(positions[i], uvs[i], normals[i], tangents[i]))
            .collect();

        log::info!(
            "loaded mesh {} ({} vertices, {} indices)",
            path.as_ref().display(),
            vertices.len(),
            raw.indices.len()
        );

        Ok(Self::new(
            vertices,
            raw.indices,
            PrimitiveTopology::TriangleList,
        ))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn vertices_out(&self) -> &[VertexOut] {
        &self.vertices_out
    }

    pub fn vertices_out_mut(&mut self) -> &mut [VertexOut] {
        &mut self.vertices_out
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn set_world_matrix(&mut self, m: Mat4) {
        self.world_matrix = m;
    }

    /// Advances the mesh's own Y rotation and rebuilds its world matrix.
    /// `radians_per_second` is applied for `dt` seconds.
    pub fn advance_rotation(&mut self, radians_per_second: f32, dt: f32) {
        self.rotation_y += radians_per_second * dt;
        self.world_matrix = Mat4::rotation_y(self.rotation_y);
    }
}

/// Per-triangle tangent accumulation (Lengyel's method), averaged per
/// vertex and Gram-Schmidt orthogonalized against the vertex normal. `tobj`
/// does not compute tangents itself, so this runs as a post-load pass.
fn compute_tangents(
    positions: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
    indices: &[u32],
) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

        let edge1 = positions[i1] - positions[i0];
        let edge2 = positions[i2] - positions[i0];
        let duv1 = uvs[i1] - uvs[i0];
        let duv2 = uvs[i2] - uvs[i0];

        let denom = duv1.x * duv2.y - duv2.x * duv1.y;
        if denom.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / denom;
        let tangent = Vec3::new(
            r * (duv2.y * edge1.x - duv1.y * edge2.x),
            r * (duv2.y * edge1.y - duv1.y * edge2.y),
            r * (duv2.y * edge1.z - duv1.y * edge2.z),
        );

        accum[i0] = accum[i0] + tangent;
        accum[i1] = accum[i1] + tangent;
        accum[i2] = accum[i2] + tangent;
    }

    accum
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let n = normals[i];
            let orthogonal = t - n * n.dot(t);
            let normalized = orthogonal.normalize();
            if normalized.approx_eq(Vec3::ZERO) {
                let fallback = if n.x.abs() < 0.9 {
                    Vec3::UNIT_X
                } else {
                    Vec3::UNIT_Y
                };
                n.cross(fallback).normalize()
            } else {
                normalized
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_out_sized_to_vertex_count() {
        let v = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::UNIT_Y, Vec3::UNIT_X);
        let mesh = Mesh::new(
            vec![v; 4],
            vec![0, 1, 2, 1, 2, 3],
            PrimitiveTopology::TriangleList,
        );
        assert_eq!(mesh.vertices_out().len(), 4);
    }

    #[test]
    fn tangent_is_perpendicular_to_normal() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = vec![Vec3::UNIT_Z; 3];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        let indices = vec![0u32, 1, 2];

        let tangents = compute_tangents(&positions, &normals, &uvs, &indices);
        for (t, n) in tangents.iter().zip(normals.iter()) {
            assert!(t.dot(*n).abs() < 1e-4);
        }
    }
}
