//! Scene description consumed by the collider factory
//!
//! The collision core only needs "a flat list of named, world-transformed
//! triangle meshes". This module provides a minimal node hierarchy that can
//! produce that list, plus the name filter applied while flattening it.
//!
//! ```text
//! SceneNode tree ──collect_meshes(filter)──▶ [SceneMesh] ──▶ Collider
//! ```

mod scene_graph;
mod filter;

pub use scene_graph::{SceneNode, SceneMesh, AABB};
pub use filter::MeshFilter;
