//! Spatial partitioning data structures
//!
//! Provides the static bounding volume hierarchy used to find candidate
//! triangles for collision queries.

mod bvh;

pub use bvh::{Bvh, BvhConfig, BvhNode, BvhNodeKind};
