//! # Arcade Collision
//!
//! Horizontal collision resolution for vehicle-like agents moving through a
//! static triangle-mesh environment.
//!
//! ## Features
//!
//! - **Geometry Merging**: Flattens named, transformed meshes into one triangle soup
//! - **BVH**: Static bounding volume hierarchy with a generic shapecast traversal
//! - **Capsule Resolver**: Pushes a vertical capsule out of penetrated triangles
//! - **Simple Resolver**: Cancels velocity into nearby faces
//! - **Scene Filtering**: Case-insensitive include/exclude filters on mesh names
//! - **Debug Geometry**: Wireframe boxes and cylinders for collision volumes
//!
//! Vertical motion (ground following) is not handled here: resolvers keep the
//! desired Y untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use arcade_collision::prelude::*;
//!
//! let wall = SourceMesh::new(
//!     "wall",
//!     MeshData::non_indexed(vec![
//!         Vec3::new(5.0, -10.0, -10.0),
//!         Vec3::new(5.0, -10.0, 10.0),
//!         Vec3::new(5.0, 20.0, 0.0),
//!     ]),
//!     Mat4::identity(),
//! );
//! let collider = Collider::from_meshes(&[wall], Mat4::identity(), &BvhConfig::default()).ok();
//!
//! let settings = CollisionSettings::new(0.8, 1.6);
//! let step = resolve_capsule(
//!     Vec3::new(4.0, 0.0, 0.0),
//!     Vec3::new(4.5, 0.0, 0.0),
//!     collider.as_ref(),
//!     &settings,
//! )?;
//! assert!(step.collided);
//! assert!(step.position.x < 4.5);
//! # Ok::<(), ColliderError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod spatial;
pub mod physics;
pub mod debug;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        debug::WireframeMesh,
        foundation::math::{Mat4, Vec3},
        physics::{
            resolve_capsule, resolve_simple, Collider, ColliderConfig, ColliderError,
            CollisionSettings, MeshData, MeshSource, Resolution, SourceMesh,
        },
        scene::{MeshFilter, SceneNode},
        spatial::BvhConfig,
    };
}
