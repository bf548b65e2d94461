//! Bounding volume hierarchy over a static triangle soup
//!
//! Built once, top-down, by splitting at the centroid median along the
//! longest axis. Nodes live in a flat vector; the triangle soup is reordered
//! during the build so every leaf owns a contiguous range of it.
//!
//! The only query is [`Bvh::shapecast`]: a depth-first traversal that prunes
//! subtrees with a bounds predicate and hands candidate triangles to a
//! visitor together with a caller-owned accumulator.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::EPSILON;
use crate::physics::collision::Triangle;
use crate::scene::AABB;

/// Configuration for BVH construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhConfig {
    /// Maximum triangles per leaf before splitting
    pub max_leaf_triangles: usize,

    /// Maximum tree depth (root = 0)
    pub max_depth: u32,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 8,
            max_depth: 32,
        }
    }
}

impl Config for BvhConfig {}

/// Node payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhNodeKind {
    /// Triangles `start..start + count` of the soup
    Leaf {
        /// First triangle index
        start: usize,
        /// Number of triangles
        count: usize,
    },
    /// Two child node indices
    Branch {
        /// Left child
        left: usize,
        /// Right child
        right: usize,
    },
}

/// Single node in the hierarchy
#[derive(Debug, Clone)]
pub struct BvhNode {
    /// Bounds of every triangle below this node
    pub bounds: AABB,
    /// Leaf range or children
    pub kind: BvhNodeKind,
}

impl BvhNode {
    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, BvhNodeKind::Leaf { .. })
    }
}

/// Static bounding volume hierarchy (root is node 0)
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangle_count: usize,
    depth: u32,
}

impl Bvh {
    /// Build a hierarchy over `triangles`, reordering them in place
    pub fn build(triangles: &mut [Triangle], config: &BvhConfig) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * triangles.len() / config.max_leaf_triangles.max(1) + 1),
            triangle_count: triangles.len(),
            depth: 0,
        };
        bvh.build_recursive(triangles, 0, 0, config);
        bvh
    }

    fn build_recursive(
        &mut self,
        triangles: &mut [Triangle],
        start: usize,
        depth: u32,
        config: &BvhConfig,
    ) -> usize {
        let bounds = triangles
            .iter()
            .fold(AABB::empty(), |acc, tri| acc.union(&tri.bounds()));

        let index = self.nodes.len();
        self.nodes.push(BvhNode {
            bounds,
            kind: BvhNodeKind::Leaf { start, count: triangles.len() },
        });
        self.depth = self.depth.max(depth);

        if triangles.len() <= config.max_leaf_triangles.max(1) || depth >= config.max_depth {
            return index;
        }

        let centroid_bounds = AABB::from_points(triangles.iter().map(Triangle::centroid));
        let axis = centroid_bounds.longest_axis();

        // All centroids coincide: no split separates them
        if centroid_bounds.max[axis] - centroid_bounds.min[axis] <= EPSILON {
            return index;
        }

        let mid = triangles.len() / 2;
        triangles.select_nth_unstable_by(mid, |a, b| {
            a.centroid()[axis].total_cmp(&b.centroid()[axis])
        });

        let (lower, upper) = triangles.split_at_mut(mid);
        let left = self.build_recursive(lower, start, depth + 1, config);
        let right = self.build_recursive(upper, start + mid, depth + 1, config);
        self.nodes[index].kind = BvhNodeKind::Branch { left, right };

        index
    }

    /// Depth-first traversal with a caller-supplied pruning predicate and
    /// triangle visitor.
    ///
    /// `intersects_bounds` is asked about every reached node; returning
    /// `false` skips that whole subtree. `intersects_triangle` receives each
    /// triangle in surviving leaves with its index in `triangles`, and may
    /// update `accumulator`. Later predicate calls see those updates.
    /// Returning `ControlFlow::Break` ends the traversal.
    ///
    /// `triangles` must be the soup this hierarchy was built over. Returns
    /// `true` if the visitor stopped the traversal early.
    pub fn shapecast<A, B, T>(
        &self,
        triangles: &[Triangle],
        mut intersects_bounds: B,
        mut intersects_triangle: T,
        accumulator: &mut A,
    ) -> bool
    where
        B: FnMut(&AABB, &A) -> bool,
        T: FnMut(&Triangle, usize, &mut A) -> ControlFlow<()>,
    {
        if self.nodes.is_empty() || triangles.len() != self.triangle_count {
            log::warn!(
                "BVH shapecast skipped: built over {} triangles, given {}",
                self.triangle_count,
                triangles.len()
            );
            return false;
        }

        self.visit(0, triangles, &mut intersects_bounds, &mut intersects_triangle, accumulator)
            .is_break()
    }

    fn visit<A, B, T>(
        &self,
        node_index: usize,
        triangles: &[Triangle],
        intersects_bounds: &mut B,
        intersects_triangle: &mut T,
        accumulator: &mut A,
    ) -> ControlFlow<()>
    where
        B: FnMut(&AABB, &A) -> bool,
        T: FnMut(&Triangle, usize, &mut A) -> ControlFlow<()>,
    {
        let node = &self.nodes[node_index];
        if !intersects_bounds(&node.bounds, accumulator) {
            return ControlFlow::Continue(());
        }

        match node.kind {
            BvhNodeKind::Leaf { start, count } => {
                for (offset, triangle) in triangles[start..start + count].iter().enumerate() {
                    intersects_triangle(triangle, start + offset, accumulator)?;
                }
                ControlFlow::Continue(())
            }
            BvhNodeKind::Branch { left, right } => {
                self.visit(left, triangles, intersects_bounds, intersects_triangle, accumulator)?;
                self.visit(right, triangles, intersects_bounds, intersects_triangle, accumulator)
            }
        }
    }

    /// All nodes, root first
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (root = 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of triangles indexed
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Bounds of the whole soup
    pub fn root_bounds(&self) -> AABB {
        self.nodes.first().map_or_else(AABB::empty, |node| node.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    /// A row of small triangles along X, one per unit
    fn triangle_row(count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|i| {
                let x = i as f32;
                Triangle::new(
                    Vec3::new(x, 0.0, 0.0),
                    Vec3::new(x + 0.5, 0.0, 0.0),
                    Vec3::new(x, 0.5, 0.0),
                )
            })
            .collect()
    }

    fn collect_hits(bvh: &Bvh, triangles: &[Triangle], query: &AABB) -> Vec<usize> {
        let mut hits = Vec::new();
        bvh.shapecast(
            triangles,
            |bounds, _| bounds.intersects(query),
            |tri, index, hits: &mut Vec<usize>| {
                if tri.bounds().intersects(query) {
                    hits.push(index);
                }
                ControlFlow::Continue(())
            },
            &mut hits,
        );
        hits
    }

    #[test]
    fn test_bvh_build_splits() {
        let mut triangles = triangle_row(64);
        let config = BvhConfig { max_leaf_triangles: 4, max_depth: 32 };
        let bvh = Bvh::build(&mut triangles, &config);

        assert!(bvh.node_count() > 1);
        assert!(!bvh.nodes()[0].is_leaf());
        assert!(bvh.depth() >= 4);
        assert_eq!(bvh.triangle_count(), 64);

        // Every leaf respects the size limit and leaves cover the soup exactly once
        let mut covered = 0;
        for node in bvh.nodes() {
            if let BvhNodeKind::Leaf { count, .. } = node.kind {
                assert!(count <= 4);
                covered += count;
            }
        }
        assert_eq!(covered, 64);

        let root = bvh.root_bounds();
        assert_eq!(root.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(root.max, Vec3::new(63.5, 0.5, 0.0));
    }

    #[test]
    fn test_bvh_max_depth_limits_tree() {
        let mut triangles = triangle_row(64);
        let config = BvhConfig { max_leaf_triangles: 1, max_depth: 2 };
        let bvh = Bvh::build(&mut triangles, &config);
        assert_eq!(bvh.depth(), 2);
        assert_eq!(bvh.node_count(), 7);
    }

    #[test]
    fn test_shapecast_prunes_and_finds() {
        let mut triangles = triangle_row(100);
        let bvh = Bvh::build(&mut triangles, &BvhConfig::default());

        let query = AABB::new(Vec3::new(10.2, -1.0, -1.0), Vec3::new(12.2, 1.0, 1.0));
        let mut hits = collect_hits(&bvh, &triangles, &query);
        hits.sort_unstable();

        let mut xs: Vec<f32> = hits.iter().map(|&i| triangles[i].v0.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![10.0, 11.0, 12.0]);

        // Count visited triangles: pruning must avoid touching all 100
        let mut visited = 0usize;
        bvh.shapecast(
            &triangles,
            |bounds, _| bounds.intersects(&query),
            |_, _, visited: &mut usize| {
                *visited += 1;
                ControlFlow::Continue(())
            },
            &mut visited,
        );
        assert!(visited < 100);
        assert!(visited >= 3);
    }

    #[test]
    fn test_shapecast_break_stops() {
        let mut triangles = triangle_row(32);
        let bvh = Bvh::build(&mut triangles, &BvhConfig { max_leaf_triangles: 2, max_depth: 32 });

        let mut seen = 0usize;
        let stopped = bvh.shapecast(
            &triangles,
            |_, _| true,
            |_, _, seen: &mut usize| {
                *seen += 1;
                if *seen == 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
            },
            &mut seen,
        );
        assert!(stopped);
        assert_eq!(seen, 5);
    }

    #[test]
    fn test_shapecast_rejects_mismatched_soup() {
        let mut triangles = triangle_row(8);
        let bvh = Bvh::build(&mut triangles, &BvhConfig::default());

        let mut seen = 0usize;
        let stopped = bvh.shapecast(
            &triangles[..4],
            |_, _| true,
            |_, _, seen: &mut usize| {
                *seen += 1;
                ControlFlow::Continue(())
            },
            &mut seen,
        );
        assert!(!stopped);
        assert_eq!(seen, 0);
    }
}
