//! Scene node hierarchy and axis-aligned bounds

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};
use crate::physics::collision::{MeshData, MeshSource};
use super::filter::MeshFilter;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `grow` call will replace
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box enclosing all points (`empty()` for no points)
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), |mut acc, p| {
            acc.grow(p);
            acc
        })
    }

    /// True when no point has been added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extend the box to include a point
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Box enclosing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> AABB {
        let m = Vec3::repeat(margin);
        AABB::new(self.min - m, self.max + m)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Index (0 = X, 1 = Y, 2 = Z) of the longest side
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB (touching counts)
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

/// A node in the scene hierarchy.
///
/// Each node has a transform relative to its parent and optionally carries a
/// triangle mesh. The node's name is what mesh filters match against.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name (used by include/exclude filters)
    pub name: String,
    /// Transform relative to the parent node
    pub local_transform: Mat4,
    /// Mesh attached to this node, if any
    pub mesh: Option<MeshData>,
    /// Child nodes
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create an empty group node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_transform: Mat4::identity(),
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Attach a mesh
    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Set the parent-relative transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.local_transform = transform;
        self
    }

    /// Append a child node
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child node in place
    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Flatten this subtree into world-transformed meshes accepted by `filter`.
    ///
    /// The subtree root's own transform is treated as its world transform.
    /// Nodes are visited depth-first in child order.
    pub fn collect_meshes<'a>(&'a self, filter: &MeshFilter) -> Vec<SceneMesh<'a>> {
        let mut meshes = Vec::new();
        self.collect_into(&Mat4::identity(), filter, &mut meshes);
        meshes
    }

    fn collect_into<'a>(&'a self, parent: &Mat4, filter: &MeshFilter, out: &mut Vec<SceneMesh<'a>>) {
        let world = parent * self.local_transform;

        if let Some(mesh) = &self.mesh {
            if filter.accepts(&self.name) {
                out.push(SceneMesh {
                    name: &self.name,
                    data: mesh,
                    world_transform: world,
                });
            } else {
                log::trace!("Mesh '{}' rejected by filter", self.name);
            }
        }

        for child in &self.children {
            child.collect_into(&world, filter, out);
        }
    }
}

/// A mesh borrowed from the scene with its composed world transform
#[derive(Debug, Clone, Copy)]
pub struct SceneMesh<'a> {
    name: &'a str,
    data: &'a MeshData,
    world_transform: Mat4,
}

impl MeshSource for SceneMesh<'_> {
    fn name(&self) -> &str {
        self.name
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{transform_point, utils};
    use approx::assert_relative_eq;

    fn quad() -> MeshData {
        MeshData::indexed(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = AABB::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));
        let touching = AABB::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 2.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
        assert!(aabb1.intersects(&touching));
    }

    #[test]
    fn test_aabb_from_points_and_axis() {
        assert!(AABB::from_points(std::iter::empty()).is_empty());

        let aabb = AABB::from_points([Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 4.0, -2.0)]);
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 0.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.expanded(1.0).min, Vec3::new(-1.0, -1.0, -3.0));
    }

    #[test]
    fn test_collect_meshes_composes_transforms() {
        let root = SceneNode::new("level")
            .with_transform(utils::translation(10.0, 0.0, 0.0))
            .with_child(
                SceneNode::new("walls")
                    .with_transform(utils::translation(0.0, 0.0, 5.0))
                    .with_child(SceneNode::new("wall_north").with_mesh(quad())),
            );

        let meshes = root.collect_meshes(&MeshFilter::accept_all());
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name(), "wall_north");

        let origin = transform_point(&meshes[0].world_transform(), Vec3::zeros());
        assert_relative_eq!(origin, Vec3::new(10.0, 0.0, 5.0));
    }

    #[test]
    fn test_collect_meshes_applies_filter() {
        let root = SceneNode::new("level")
            .with_child(SceneNode::new("Ground_Main").with_mesh(quad()))
            .with_child(SceneNode::new("pillar_01").with_mesh(quad()));

        let meshes = root.collect_meshes(&MeshFilter::default());
        let names: Vec<&str> = meshes.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["pillar_01"]);
    }
}
