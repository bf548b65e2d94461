//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Triangles and segments with closest-point queries
//! - [`mesh`] - Source mesh interface and the geometry merger
//!
//! Collision math runs in the collider's local space; only results are
//! mapped back to world space.

pub mod primitives;
pub mod mesh;

pub use primitives::{Segment, SegmentTriangleContact, Triangle};
pub use mesh::{merge_geometry, MeshData, MeshSource, SourceMesh};
