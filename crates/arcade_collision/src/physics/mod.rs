//! Physics module for static-environment collision
//!
//! Resolves an agent's horizontal motion against a static triangle mesh:
//!
//! ```text
//! meshes ──merge──▶ triangle soup ──build──▶ BVH ──▶ Collider
//!                                                      │ read-only, per step
//!                              resolve_capsule / resolve_simple
//! ```
//!
//! The collider is built once; resolvers never mutate it, and keep all
//! scratch state on their own stack frame, so concurrent per-agent queries
//! need no synchronization.

pub mod collision;
pub mod collider;
pub mod capsule;
pub mod simple;
pub mod settings;
pub mod resolution;

#[cfg(test)]
mod tests;

pub use collision::{MeshData, MeshSource, Segment, SourceMesh, Triangle};
pub use collider::{Collider, ColliderConfig, ColliderError};
pub use capsule::resolve_capsule;
pub use simple::resolve_simple;
pub use settings::CollisionSettings;
pub use resolution::Resolution;
