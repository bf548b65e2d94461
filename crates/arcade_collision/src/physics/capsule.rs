//! Capsule collision resolver
//!
//! The agent is a vertical capsule: a segment from `radius` to `height`
//! above its origin, swollen by `radius`. Each step the capsule is placed at
//! the desired position and pushed out of every triangle it penetrates.
//!
//! Push-out is a single pass in BVH traversal order. Each correction moves
//! the in-flight segment, so triangles visited later see the corrected
//! capsule. Nothing is re-queried afterwards; deep overlaps with several
//! triangles can leave residual penetration and the result depends on visit
//! order.
//!
//! Only X and Z of the result come from the correction. Y always equals the
//! desired Y because vertical placement belongs to ground following.

use std::ops::ControlFlow;

use crate::foundation::math::{transform_point, Vec3, EPSILON};
use crate::scene::AABB;
use super::collider::{Collider, ColliderError};
use super::collision::{Segment, SegmentTriangleContact, Triangle};
use super::resolution::Resolution;
use super::settings::CollisionSettings;

/// Extra separation added to each push so a corrected capsule sits just
/// outside `radius` instead of on it
pub const SEPARATION_SKIN: f32 = 1.0e-4;

/// Per-call traversal state, owned by one `resolve_capsule` call
#[derive(Debug)]
struct CapsuleSweep {
    segment: Segment,
    query_box: AABB,
    radius: f32,
    push_out_multiplier: f32,
    /// Agent's current capsule base, local space; orients pierced faces
    approach_point: Vec3,
    collided: bool,
    contacts: usize,
}

impl CapsuleSweep {
    fn visit(&mut self, triangle: &Triangle, index: usize) {
        let contact = triangle.closest_points_to_segment(&self.segment);
        if contact.distance >= self.radius {
            return;
        }

        let depth = self.radius - contact.distance;
        let direction = self.push_direction(triangle, &contact);
        let push = direction * ((depth + SEPARATION_SKIN) * self.push_out_multiplier);
        self.segment.translate(push);

        self.collided = true;
        self.contacts += 1;
        log::trace!(
            "Capsule hit triangle {}: distance {:.4}, depth {:.4}, push {:?}",
            index,
            contact.distance,
            depth,
            push
        );
    }

    fn push_direction(&self, triangle: &Triangle, contact: &SegmentTriangleContact) -> Vec3 {
        let separation = contact.on_segment - contact.on_triangle;
        if separation.magnitude_squared() > EPSILON * EPSILON {
            return separation.normalize();
        }

        // Segment touches or pierces the face: use the face normal on the
        // side the agent is coming from
        let normal = triangle.normal();
        if normal.dot(&(self.approach_point - contact.on_triangle)) < 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Resolve the agent's desired position against the collider.
///
/// Without a collider, or with one that has no BVH, the desired position is
/// returned unchanged with `collided == false`. Fails only on invalid
/// settings.
pub fn resolve_capsule(
    current_position: Vec3,
    desired_position: Vec3,
    collider: Option<&Collider>,
    settings: &CollisionSettings,
) -> Result<Resolution, ColliderError> {
    settings.validate()?;

    let Some(collider) = collider else {
        log::debug!("No collider; capsule passes through");
        return Ok(Resolution::pass_through(desired_position));
    };
    if !collider.has_index() {
        log::debug!("Collider has no BVH; capsule passes through");
        return Ok(Resolution::pass_through(desired_position));
    }

    let to_local = collider.inverse_transform();
    let base = Vec3::new(0.0, settings.radius, 0.0);
    let top = Vec3::new(0.0, settings.height, 0.0);
    let segment = Segment::new(
        transform_point(to_local, desired_position + base),
        transform_point(to_local, desired_position + top),
    );

    let mut sweep = CapsuleSweep {
        segment,
        query_box: segment.bounds().expanded(settings.radius),
        radius: settings.radius,
        push_out_multiplier: settings.push_out_multiplier,
        approach_point: transform_point(to_local, current_position + base),
        collided: false,
        contacts: 0,
    };

    collider.shapecast(
        |bounds, sweep: &CapsuleSweep| bounds.intersects(&sweep.query_box),
        |triangle, index, sweep: &mut CapsuleSweep| {
            sweep.visit(triangle, index);
            ControlFlow::Continue(())
        },
        &mut sweep,
    );

    if !sweep.collided {
        return Ok(Resolution::pass_through(desired_position));
    }

    let corrected = transform_point(collider.world_transform(), sweep.segment.start);
    log::debug!(
        "Capsule resolved {} contacts: ({:.3}, {:.3}) -> ({:.3}, {:.3})",
        sweep.contacts,
        desired_position.x,
        desired_position.z,
        corrected.x,
        corrected.z
    );

    Ok(Resolution {
        position: Vec3::new(corrected.x, desired_position.y, corrected.z),
        velocity: None,
        collided: true,
    })
}
