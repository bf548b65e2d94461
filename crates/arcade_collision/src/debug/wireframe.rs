//! Wireframe shape factories
//!
//! Produces line-list meshes (positions plus index pairs) that a renderer can
//! draw to show collision envelopes and query boxes.

use std::f32::consts::TAU;

use crate::foundation::math::Vec3;
use crate::physics::CollisionSettings;
use crate::scene::AABB;

/// Fewest sides a cylinder ring may have
pub const MIN_CYLINDER_SEGMENTS: u32 = 3;

/// Line-list mesh for debug drawing
#[derive(Debug, Clone, PartialEq)]
pub struct WireframeMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Pairs of indices into `positions`, one per line
    pub lines: Vec<[u32; 2]>,
    /// Whether the renderer should draw it
    pub visible: bool,
}

impl WireframeMesh {
    /// Axis-aligned box centred on the origin
    pub fn box_wireframe(width: f32, height: f32, depth: f32, visible: bool) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        Self::aabb(&AABB::from_center_extents(Vec3::zeros(), half), visible)
    }

    /// Box outlining an AABB (e.g. a broad-phase query box)
    pub fn aabb(bounds: &AABB, visible: bool) -> Self {
        let positions = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
                    if i & 2 == 0 { bounds.min.y } else { bounds.max.y },
                    if i & 4 == 0 { bounds.min.z } else { bounds.max.z },
                )
            })
            .collect();

        // Corners differing in exactly one bit share an edge
        let mut lines = Vec::with_capacity(12);
        for a in 0u32..8 {
            for bit in [1u32, 2, 4] {
                if a & bit == 0 {
                    lines.push([a, a | bit]);
                }
            }
        }

        Self { positions, lines, visible }
    }

    /// Upright cylinder standing on the origin, from y = 0 to y = `height`
    pub fn cylinder_wireframe(radius: f32, height: f32, segments: u32, visible: bool) -> Self {
        let segments = segments.max(MIN_CYLINDER_SEGMENTS);
        let mut positions = Vec::with_capacity(2 * segments as usize);
        for y in [0.0, height] {
            for i in 0..segments {
                let angle = TAU * i as f32 / segments as f32;
                positions.push(Vec3::new(radius * angle.cos(), y, radius * angle.sin()));
            }
        }

        let mut lines = Vec::with_capacity(3 * segments as usize);
        for i in 0..segments {
            let next = (i + 1) % segments;
            lines.push([i, next]);
            lines.push([segments + i, segments + next]);
            lines.push([i, segments + i]);
        }

        Self { positions, lines, visible }
    }

    /// Cylinder covering an agent's capsule envelope (base to top of the
    /// upper hemisphere)
    pub fn capsule_envelope(settings: &CollisionSettings, visible: bool) -> Self {
        Self::cylinder_wireframe(settings.radius, settings.height + settings.radius, 16, visible)
    }

    /// Move every vertex by `offset`
    pub fn translated(mut self, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Number of line segments
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
