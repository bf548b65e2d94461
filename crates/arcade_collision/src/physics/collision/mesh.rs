//! Source meshes and geometry merging
//!
//! Collision only needs positions. Source meshes are flattened into one
//! index-free triangle soup baked into a single reference frame; normals,
//! UVs and index buffers do not survive the merge.

use crate::foundation::math::{transform_point, Mat4, Vec2, Vec3};
use super::primitives::Triangle;

/// A named triangle mesh with a world transform.
///
/// This is the only thing the collider needs to know about scene content.
pub trait MeshSource {
    /// Mesh name, matched by include/exclude filters
    fn name(&self) -> &str;

    /// Vertex positions in the mesh's local space
    fn positions(&self) -> &[Vec3];

    /// Triangle list indices; `None` means consecutive position triples
    fn indices(&self) -> Option<&[u32]>;

    /// Local-to-world transform
    fn world_transform(&self) -> Mat4;
}

/// Vertex and index buffers for one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (local space)
    pub positions: Vec<Vec3>,
    /// Optional triangle list indices
    pub indices: Option<Vec<u32>>,
    /// Vertex normals (ignored by collision)
    pub normals: Vec<Vec3>,
    /// Texture coordinates (ignored by collision)
    pub uvs: Vec<Vec2>,
}

impl MeshData {
    /// Mesh from positions and triangle-list indices
    pub fn indexed(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices: Some(indices),
            ..Default::default()
        }
    }

    /// Mesh whose positions are already consecutive triangle corners
    pub fn non_indexed(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }
}

/// An owned mesh with a name and world transform
#[derive(Debug, Clone)]
pub struct SourceMesh {
    /// Mesh name
    pub name: String,
    /// Geometry buffers
    pub data: MeshData,
    /// Local-to-world transform
    pub world_transform: Mat4,
}

impl SourceMesh {
    /// Create a named mesh placed with `world_transform`
    pub fn new(name: impl Into<String>, data: MeshData, world_transform: Mat4) -> Self {
        Self {
            name: name.into(),
            data,
            world_transform,
        }
    }
}

impl MeshSource for SourceMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn positions(&self) -> &[Vec3] {
        &self.data.positions
    }

    fn indices(&self) -> Option<&[u32]> {
        self.data.indices.as_deref()
    }

    fn world_transform(&self) -> Mat4 {
        self.world_transform
    }
}

/// Flatten meshes into a triangle soup expressed in the frame whose
/// world-to-local matrix is `world_to_local`.
///
/// Degenerate triangles are dropped. Index triples that reference missing
/// vertices are skipped with a warning; a trailing partial triangle is
/// ignored.
pub fn merge_geometry<M: MeshSource>(meshes: &[M], world_to_local: &Mat4) -> Vec<Triangle> {
    let mut triangles = Vec::new();

    for mesh in meshes {
        let to_local = world_to_local * mesh.world_transform();
        let baked: Vec<Vec3> = mesh
            .positions()
            .iter()
            .map(|p| transform_point(&to_local, *p))
            .collect();

        let before = triangles.len();
        let mut skipped = 0usize;

        match mesh.indices() {
            Some(indices) => {
                for chunk in indices.chunks_exact(3) {
                    let corners = (
                        baked.get(chunk[0] as usize),
                        baked.get(chunk[1] as usize),
                        baked.get(chunk[2] as usize),
                    );
                    match corners {
                        (Some(a), Some(b), Some(c)) => push_triangle(&mut triangles, Triangle::new(*a, *b, *c)),
                        _ => skipped += 1,
                    }
                }
            }
            None => {
                for chunk in baked.chunks_exact(3) {
                    push_triangle(&mut triangles, Triangle::new(chunk[0], chunk[1], chunk[2]));
                }
            }
        }

        if skipped > 0 {
            log::warn!(
                "Mesh '{}': skipped {} triangles with out-of-range indices",
                mesh.name(),
                skipped
            );
        }
        log::trace!("Mesh '{}' contributed {} triangles", mesh.name(), triangles.len() - before);
    }

    triangles
}

fn push_triangle(triangles: &mut Vec<Triangle>, triangle: Triangle) {
    if !triangle.is_degenerate() {
        triangles.push(triangle);
    }
}
