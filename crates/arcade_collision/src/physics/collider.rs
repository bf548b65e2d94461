//! Static environment collider
//!
//! A [`Collider`] owns the merged triangle soup of the environment, the BVH
//! built over it, and the transform placing that soup in the world. It is
//! built once during level setup and then only read, so any number of
//! resolver calls may share it across threads.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{transform_point, Mat4, Vec3};
use crate::scene::{MeshFilter, SceneNode, AABB};
use crate::spatial::{Bvh, BvhConfig};
use super::collision::{merge_geometry, MeshSource, Triangle};

/// Collider construction and query errors
#[derive(thiserror::Error, Debug)]
pub enum ColliderError {
    /// No triangles left after filtering and merging
    #[error("no collision geometry: mesh set is empty or contains no triangles")]
    NoGeometry,

    /// The collider's world transform cannot be inverted
    #[error("collider world transform is not invertible")]
    SingularTransform,

    /// A collision setting is out of range
    #[error("invalid collision setting {field} = {value}")]
    InvalidSettings {
        /// Setting name
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Options for building a collider from a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Which scene meshes become collision geometry
    pub filter: MeshFilter,
    /// Hierarchy build options
    pub bvh: BvhConfig,
}

impl Config for ColliderConfig {}

/// Merged static geometry plus its acceleration structure.
///
/// The BVH is not serialized: a deserialized collider carries no index until
/// [`Collider::rebuild_index`] is called, and resolvers treat it as having
/// no obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    triangles: Vec<Triangle>,
    #[serde(skip)]
    bvh: Option<Bvh>,
    world_transform: Mat4,
    inverse_transform: Mat4,
}

impl Collider {
    /// Build a collider over a triangle soup already in local space
    pub fn new(
        mut triangles: Vec<Triangle>,
        world_transform: Mat4,
        bvh_config: &BvhConfig,
    ) -> Result<Self, ColliderError> {
        let inverse_transform = world_transform
            .try_inverse()
            .ok_or(ColliderError::SingularTransform)?;

        if triangles.is_empty() {
            log::warn!("Collider construction produced no triangles; no collider created");
            return Err(ColliderError::NoGeometry);
        }

        let bvh = Bvh::build(&mut triangles, bvh_config);
        log::info!(
            "Built collider: {} triangles, {} BVH nodes, depth {}",
            triangles.len(),
            bvh.node_count(),
            bvh.depth()
        );

        Ok(Self {
            triangles,
            bvh: Some(bvh),
            world_transform,
            inverse_transform,
        })
    }

    /// Build from an explicit mesh list (no filtering).
    ///
    /// Geometry is baked into the frame of `world_transform`; pass the
    /// identity to keep it in world space.
    pub fn from_meshes<M: MeshSource>(
        meshes: &[M],
        world_transform: Mat4,
        bvh_config: &BvhConfig,
    ) -> Result<Self, ColliderError> {
        if meshes.is_empty() {
            log::warn!("No meshes supplied for collider");
            return Err(ColliderError::NoGeometry);
        }

        let world_to_local = world_transform
            .try_inverse()
            .ok_or(ColliderError::SingularTransform)?;
        let triangles = merge_geometry(meshes, &world_to_local);
        Self::new(triangles, world_transform, bvh_config)
    }

    /// Build from a scene subtree, keeping meshes accepted by the filter
    pub fn from_scene(root: &SceneNode, config: &ColliderConfig) -> Result<Self, ColliderError> {
        Self::from_scene_with_transform(root, Mat4::identity(), config)
    }

    /// Build from a scene subtree into the frame of `world_transform`
    pub fn from_scene_with_transform(
        root: &SceneNode,
        world_transform: Mat4,
        config: &ColliderConfig,
    ) -> Result<Self, ColliderError> {
        let meshes = root.collect_meshes(&config.filter);
        log::debug!(
            "Scene '{}': {} meshes passed the collision filter",
            root.name,
            meshes.len()
        );
        Self::from_meshes(&meshes, world_transform, &config.bvh)
    }

    /// Rebuild the BVH (e.g. after deserialization).
    ///
    /// The cached inverse is recomputed from `world_transform` so a loaded
    /// collider cannot carry a stale or hand-edited inverse into queries.
    /// Fails with `SingularTransform` and leaves the collider without an
    /// index when the world transform cannot be inverted.
    pub fn rebuild_index(&mut self, bvh_config: &BvhConfig) -> Result<(), ColliderError> {
        self.inverse_transform = self
            .world_transform
            .try_inverse()
            .ok_or(ColliderError::SingularTransform)?;
        self.bvh = Some(Bvh::build(&mut self.triangles, bvh_config));
        Ok(())
    }

    /// Whether the collider can answer queries
    pub fn has_index(&self) -> bool {
        self.bvh.is_some()
    }

    /// Run a shapecast over the collider's local-space triangles.
    ///
    /// Returns `None` when there is no BVH, otherwise whether the visitor
    /// stopped early. See [`Bvh::shapecast`].
    pub fn shapecast<A, B, T>(&self, intersects_bounds: B, intersects_triangle: T, accumulator: &mut A) -> Option<bool>
    where
        B: FnMut(&AABB, &A) -> bool,
        T: FnMut(&Triangle, usize, &mut A) -> ControlFlow<()>,
    {
        let bvh = self.bvh.as_ref()?;
        Some(bvh.shapecast(&self.triangles, intersects_bounds, intersects_triangle, accumulator))
    }

    /// Triangles in local space, in BVH order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The hierarchy, if built
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// Local-to-world transform
    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    /// World-to-local transform
    pub fn inverse_transform(&self) -> &Mat4 {
        &self.inverse_transform
    }

    /// Local-space bounds of all triangles
    pub fn local_bounds(&self) -> AABB {
        self.triangles
            .iter()
            .fold(AABB::empty(), |acc, tri| acc.union(&tri.bounds()))
    }

    /// World-space bounds (box around the transformed local box corners)
    pub fn bounds(&self) -> AABB {
        let local = self.local_bounds();
        if local.is_empty() {
            return local;
        }
        let corners = (0..8).map(|i| {
            let pick = |bit: usize, axis: usize| if i & bit == 0 { local.min[axis] } else { local.max[axis] };
            let corner = Vec3::new(pick(1, 0), pick(2, 1), pick(4, 2));
            transform_point(&self.world_transform, corner)
        });
        AABB::from_points(corners)
    }
}
