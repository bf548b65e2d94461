//! Resolver output

use crate::foundation::math::Vec3;

/// Result of one resolution step.
///
/// Always a fresh value; inputs are never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Corrected world-space position
    pub position: Vec3,
    /// Corrected velocity (simple resolver only)
    pub velocity: Option<Vec3>,
    /// Whether any triangle was hit this step
    pub collided: bool,
}

impl Resolution {
    /// Uncorrected position, no velocity
    pub fn pass_through(position: Vec3) -> Self {
        Self {
            position,
            velocity: None,
            collided: false,
        }
    }

    /// Uncorrected position and velocity
    pub fn pass_through_with_velocity(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity: Some(velocity),
            collided: false,
        }
    }
}
