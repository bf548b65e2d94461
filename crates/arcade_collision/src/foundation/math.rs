//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision code. All
//! collision math is done in `f32`.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Squared lengths below this are treated as zero
pub const EPSILON: f32 = 1.0e-6;

/// Transform a position by a homogeneous matrix (translation applies)
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(point)).coords
}

/// Transform a direction by a homogeneous matrix (translation ignored)
pub fn transform_vector(matrix: &Mat4, vector: Vec3) -> Vec3 {
    matrix.transform_vector(&vector)
}

/// Transform a surface normal by a matrix.
///
/// Uses the inverse-transpose of the upper 3x3 so non-uniform scale keeps
/// normals perpendicular to their surface. The result is normalized; a
/// degenerate input or singular matrix returns the zero vector.
pub fn transform_normal(matrix: &Mat4, normal: Vec3) -> Vec3 {
    let linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let Some(inverse) = linear.try_inverse() else {
        return Vec3::zeros();
    };
    let transformed = inverse.transpose() * normal;
    normalize_or_zero(transformed)
}

/// Normalize a vector, returning zero instead of NaN for degenerate input
pub fn normalize_or_zero(vector: Vec3) -> Vec3 {
    let length_sq = vector.magnitude_squared();
    if length_sq <= EPSILON * EPSILON {
        Vec3::zeros()
    } else {
        vector / length_sq.sqrt()
    }
}

/// Horizontal (XZ-plane) distance between two points
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Math utility functions
pub mod utils {
    use super::Mat4;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Translation matrix from components
    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&super::Vec3::new(x, y, z))
    }

    /// Rotation matrix around the Y (up) axis
    pub fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&super::Vec3::y_axis(), angle)
    }

    /// Non-uniform scale matrix
    pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&super::Vec3::new(x, y, z))
    }
}
