//! Box/velocity resolver
//!
//! Cheaper alternative to the capsule resolver. A cube of side `2 * radius`
//! around the tentative position selects candidate triangles; any candidate
//! whose centroid lies within `2 * radius` of the cube centre removes the
//! velocity component heading into its face. The centroid test is a coarse
//! proxy for true distance, so large triangles may be missed.

use std::ops::ControlFlow;

use crate::foundation::math::{transform_normal, transform_point, Mat4, Vec3};
use crate::scene::AABB;
use super::collider::{Collider, ColliderError};
use super::collision::Triangle;
use super::resolution::Resolution;
use super::settings::require_positive;

/// Over-correction applied when cancelling velocity into a face
pub const OVER_CORRECTION: f32 = 1.1;

struct VelocityProbe<'a> {
    query_box: AABB,
    target: Vec3,
    agent: Vec3,
    reach: f32,
    world_transform: &'a Mat4,
    velocity: Vec3,
    collided: bool,
}

impl VelocityProbe<'_> {
    fn visit(&mut self, triangle: &Triangle) {
        let centroid = triangle.centroid();
        if (centroid - self.target).magnitude() >= self.reach {
            return;
        }
        self.collided = true;

        // Face the normal toward the agent so winding does not matter
        let mut normal = triangle.normal();
        if normal.dot(&(self.agent - centroid)) < 0.0 {
            normal = -normal;
        }
        let normal = transform_normal(self.world_transform, normal);

        let into_face = self.velocity.dot(&normal);
        if into_face < 0.0 {
            self.velocity -= normal * (into_face * OVER_CORRECTION);
        }
    }
}

/// Move `position` by `velocity`, cancelling velocity into nearby faces.
///
/// Corrections accumulate across all candidates; the position is advanced
/// once by the final velocity. Without a collider (or BVH) the motion is
/// applied unchanged. Fails only when `radius` is not a positive number.
///
/// Each face normal is flipped to point at the agent before the test, so an
/// agent already behind a face (past it along the outward normal) sees that
/// face as pointing back at itself. Velocity carrying it further away is not
/// corrected; such a hit still reports `collided`.
pub fn resolve_simple(
    position: Vec3,
    velocity: Vec3,
    collider: Option<&Collider>,
    radius: f32,
) -> Result<Resolution, ColliderError> {
    require_positive("radius", radius)?;

    let Some(collider) = collider else {
        log::debug!("No collider; velocity passes through");
        return Ok(Resolution::pass_through_with_velocity(position + velocity, velocity));
    };
    if !collider.has_index() {
        log::debug!("Collider has no BVH; velocity passes through");
        return Ok(Resolution::pass_through_with_velocity(position + velocity, velocity));
    }

    let to_local = collider.inverse_transform();
    let target = transform_point(to_local, position + velocity);

    let mut probe = VelocityProbe {
        query_box: AABB::from_center_extents(target, Vec3::repeat(radius)),
        target,
        agent: transform_point(to_local, position),
        reach: 2.0 * radius,
        world_transform: collider.world_transform(),
        velocity,
        collided: false,
    };

    collider.shapecast(
        |bounds, probe: &VelocityProbe| bounds.intersects(&probe.query_box),
        |triangle, _, probe: &mut VelocityProbe| {
            probe.visit(triangle);
            ControlFlow::Continue(())
        },
        &mut probe,
    );

    if probe.collided {
        log::trace!("Velocity corrected: {:?} -> {:?}", velocity, probe.velocity);
    }

    Ok(Resolution {
        position: position + probe.velocity,
        velocity: Some(probe.velocity),
        collided: probe.collided,
    })
}
