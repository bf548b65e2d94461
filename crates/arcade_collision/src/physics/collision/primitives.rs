//! Primitive collision shapes and distance algorithms
//!
//! Provides the triangle and line-segment primitives used by the narrow phase,
//! with closest-point queries between them.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{normalize_or_zero, Vec3, EPSILON};
use crate::scene::AABB;

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint
    pub start: Vec3,
    /// Second endpoint
    pub end: Vec3,
}

impl Segment {
    /// Creates a new segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + self.delta() * t
    }

    /// Move both endpoints by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Tight bounding box of the segment
    pub fn bounds(&self) -> AABB {
        AABB::new(self.start.inf(&self.end), self.start.sup(&self.end))
    }

    /// Closest point on the segment to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let d = self.delta();
        let length_sq = d.magnitude_squared();
        if length_sq <= EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(&d) / length_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }

    /// Closest pair of points between this segment and another.
    /// Returns (point on `self`, point on `other`).
    ///
    /// See Ericson, "Real-Time Collision Detection" 5.1.9.
    pub fn closest_points_to_segment(&self, other: &Segment) -> (Vec3, Vec3) {
        let d1 = self.delta();
        let d2 = other.delta();
        let r = self.start - other.start;
        let a = d1.magnitude_squared();
        let e = d2.magnitude_squared();
        let f = d2.dot(&r);

        // Both segments degenerate into points
        if a <= EPSILON && e <= EPSILON {
            return (self.start, other.start);
        }

        let (s, t) = if a <= EPSILON {
            (0.0, (f / e).clamp(0.0, 1.0))
        } else {
            let c = d1.dot(&r);
            if e <= EPSILON {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else {
                let b = d1.dot(&d2);
                let denom = a * e - b * b;

                // Parallel segments: pick an arbitrary s and let t clamp it
                let mut s = if denom.abs() > EPSILON {
                    ((b * f - c * e) / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let mut t = (b * s + f) / e;

                if t < 0.0 {
                    t = 0.0;
                    s = (-c / a).clamp(0.0, 1.0);
                } else if t > 1.0 {
                    t = 1.0;
                    s = ((b - c) / a).clamp(0.0, 1.0);
                }
                (s, t)
            }
        };

        (self.point_at(s), other.point_at(t))
    }
}

/// Closest points between a triangle and a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTriangleContact {
    /// Closest point on the triangle
    pub on_triangle: Vec3,
    /// Closest point on the segment
    pub on_segment: Vec3,
    /// Distance between the two points (0 when the segment pierces the triangle)
    pub distance: f32,
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized face normal (right-hand rule); length is twice the area
    pub fn scaled_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Calculates the normal of the triangle (right-hand rule).
    /// Zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        normalize_or_zero(self.scaled_normal())
    }

    /// True when the triangle has (numerically) no area
    pub fn is_degenerate(&self) -> bool {
        self.scaled_normal().magnitude_squared() <= EPSILON * EPSILON
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Bounding box of the three vertices
    pub fn bounds(&self) -> AABB {
        AABB::new(
            self.v0.inf(&self.v1).inf(&self.v2),
            self.v0.sup(&self.v1).sup(&self.v2),
        )
    }

    /// The three edges as segments: v0-v1, v1-v2, v2-v0
    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.v0, self.v1),
            Segment::new(self.v1, self.v2),
            Segment::new(self.v2, self.v0),
        ]
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        if self.is_degenerate() {
            return self.closest_point_on_edges(point);
        }

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let v0_to_point = point - self.v0;

        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);

        // Vertex region outside v0
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge regions
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + edge1 * v;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + edge2 * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Inside the face
        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + edge1 * v + edge2 * w
    }

    fn closest_point_on_edges(&self, point: Vec3) -> Vec3 {
        self.edges()
            .iter()
            .map(|edge| edge.closest_point(point))
            .min_by(|a, b| {
                (a - point)
                    .magnitude_squared()
                    .total_cmp(&(b - point).magnitude_squared())
            })
            .unwrap_or(self.v0)
    }

    /// Point where the segment crosses the triangle's face, if it does
    pub fn intersect_segment(&self, segment: &Segment) -> Option<Vec3> {
        let n = self.scaled_normal();
        if n.magnitude_squared() <= EPSILON * EPSILON {
            return None;
        }

        let d0 = n.dot(&(segment.start - self.v0));
        let d1 = n.dot(&(segment.end - self.v0));

        // Both endpoints strictly on the same side, or the segment lies in
        // the plane (coplanar contact is covered by the edge tests)
        if d0 * d1 > 0.0 || (d0 - d1).abs() <= f32::EPSILON {
            return None;
        }

        let t = d0 / (d0 - d1);
        let p = segment.point_at(t);

        // Inside test: p must be on the inner side of all three edges
        let inside = [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
            .iter()
            .all(|(a, b)| (b - a).cross(&(p - a)).dot(&n) >= 0.0);

        inside.then_some(p)
    }

    /// Closest points between this triangle and a segment.
    ///
    /// If the segment pierces the face the distance is zero. Otherwise the
    /// minimum is attained either at a segment endpoint against the face or
    /// between the segment and one of the triangle edges.
    pub fn closest_points_to_segment(&self, segment: &Segment) -> SegmentTriangleContact {
        if let Some(p) = self.intersect_segment(segment) {
            return SegmentTriangleContact {
                on_triangle: p,
                on_segment: p,
                distance: 0.0,
            };
        }

        let mut best = (self.v0, segment.start, f32::INFINITY);
        let mut consider = |on_triangle: Vec3, on_segment: Vec3| {
            let dist_sq = (on_segment - on_triangle).magnitude_squared();
            if dist_sq < best.2 {
                best = (on_triangle, on_segment, dist_sq);
            }
        };

        for endpoint in [segment.start, segment.end] {
            consider(self.closest_point(endpoint), endpoint);
        }
        for edge in self.edges() {
            let (on_edge, on_segment) = edge.closest_points_to_segment(segment);
            consider(on_edge, on_segment);
        }

        SegmentTriangleContact {
            on_triangle: best.0,
            on_segment: best.1,
            distance: best.2.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn wall_at_x(x: f32) -> Triangle {
        // Large vertical triangle in the plane x = const, facing -X
        Triangle::new(
            Vec3::new(x, -10.0, -10.0),
            Vec3::new(x, -10.0, 10.0),
            Vec3::new(x, 20.0, 0.0),
        )
    }

    #[test]
    fn test_triangle_normal_and_centroid() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(tri.normal(), Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(tri.centroid(), Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert_relative_eq!(wall_at_x(5.0).normal(), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert!(tri.is_degenerate());
        assert_eq!(tri.normal(), Vec3::zeros());
        let p = tri.closest_point(Vec3::new(1.5, 1.0, 0.0));
        assert_relative_eq!(p, Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_closest_point_regions() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        // Face
        assert_relative_eq!(tri.closest_point(Vec3::new(0.5, 0.5, 3.0)), Vec3::new(0.5, 0.5, 0.0));
        // Vertex
        assert_relative_eq!(tri.closest_point(Vec3::new(-1.0, -1.0, 0.0)), Vec3::new(0.0, 0.0, 0.0));
        // Edge
        assert_relative_eq!(tri.closest_point(Vec3::new(1.0, -1.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_segment_segment_closest_points() {
        let a = Segment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let b = Segment::new(Vec3::new(0.0, -1.0, 2.0), Vec3::new(0.0, 1.0, 2.0));
        let (pa, pb) = a.closest_points_to_segment(&b);
        assert_relative_eq!(pa, Vec3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(pb, Vec3::new(0.0, 0.0, 2.0));

        // Parallel, offset past the end
        let c = Segment::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(5.0, 1.0, 0.0));
        let (pa, pc) = a.closest_points_to_segment(&c);
        assert_relative_eq!(pa, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(pc, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_segment_parallel_to_wall() {
        let wall = wall_at_x(5.0);
        let segment = Segment::new(Vec3::new(4.5, 0.8, 0.0), Vec3::new(4.5, 1.6, 0.0));
        let contact = wall.closest_points_to_segment(&segment);

        assert_abs_diff_eq!(contact.distance, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(contact.on_triangle.x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(contact.on_segment.x, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_piercing_triangle() {
        let floor = Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let segment = Segment::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(floor.intersect_segment(&segment).unwrap(), Vec3::zeros());
        assert_eq!(floor.closest_points_to_segment(&segment).distance, 0.0);

        // Same line but outside the triangle's extent
        let outside = Segment::new(Vec3::new(3.0, -1.0, 0.0), Vec3::new(3.0, 1.0, 0.0));
        assert!(floor.intersect_segment(&outside).is_none());
        let contact = floor.closest_points_to_segment(&outside);
        assert_abs_diff_eq!(contact.distance, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(contact.on_triangle, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_segment_closest_to_edge() {
        // Segment passes beside the triangle's v2 corner, crossing over the edge line
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        );
        let segment = Segment::new(Vec3::new(2.0, 1.0, 2.0), Vec3::new(2.0, -1.0, 2.0));
        let contact = tri.closest_points_to_segment(&segment);
        // Closest point is the midpoint of the hypotenuse
        assert_abs_diff_eq!(contact.on_triangle, Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-5);
        assert_abs_diff_eq!(contact.on_segment, Vec3::new(2.0, 0.0, 2.0), epsilon = 1e-5);
        assert_abs_diff_eq!(contact.distance, 2.0f32.sqrt(), epsilon = 1e-5);
    }
}
