//! Math utilities and types
//!
//! Provides fundamental math types for 3D simulation, plus the small set of
//! geometric helpers shared by the collider and rigidbody code.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

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

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation between two scalars
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Linear interpolation between two vectors
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Largest component of a vector
    pub fn max_component(v: Vec3) -> f32 {
        v.x.max(v.y).max(v.z)
    }

    /// Component-wise absolute value
    pub fn abs_vec3(v: Vec3) -> Vec3 {
        Vec3::new(v.x.abs(), v.y.abs(), v.z.abs())
    }
}

/// Closest point to `point` on the segment from `start` to `end`
pub fn closest_point_on_segment(point: Vec3, start: Vec3, end: Vec3) -> Vec3 {
    let segment = end - start;
    let length_sq = segment.magnitude_squared();

    // Degenerate segment collapses to a point
    if length_sq <= f32::EPSILON {
        return start;
    }

    let t = ((point - start).dot(&segment) / length_sq).clamp(0.0, 1.0);
    utils::lerp_vec3(start, end, t)
}

/// Closest pair of points between two segments `(a0, a1)` and `(b0, b1)`
///
/// Standard clamped segment-segment distance; degenerate (point-like)
/// segments are handled by falling back to point-segment projection.
pub fn closest_points_between_segments(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (Vec3, Vec3) {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let len1_sq = d1.magnitude_squared();
    let len2_sq = d2.magnitude_squared();
    let f = d2.dot(&r);

    if len1_sq <= f32::EPSILON && len2_sq <= f32::EPSILON {
        return (a0, b0);
    }

    if len1_sq <= f32::EPSILON {
        let t = (f / len2_sq).clamp(0.0, 1.0);
        return (a0, b0 + d2 * t);
    }

    let c = d1.dot(&r);

    if len2_sq <= f32::EPSILON {
        let s = (-c / len1_sq).clamp(0.0, 1.0);
        return (a0 + d1 * s, b0);
    }

    let b = d1.dot(&d2);
    let denominator = len1_sq * len2_sq - b * b;

    // Parallel segments pick an arbitrary endpoint on the first segment
    let mut s = if denominator > f32::EPSILON {
        ((b * f - c * len2_sq) / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut t = (b * s + f) / len2_sq;

    // Clamping t may move the closest point off the second segment; recompute
    // s against the clamped t and clamp again
    if t < 0.0 {
        t = 0.0;
        s = (-c / len1_sq).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / len1_sq).clamp(0.0, 1.0);
    }

    (a0 + d1 * s, b0 + d2 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closest_point_on_segment_interior() {
        let closest = closest_point_on_segment(
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(closest, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_on_segment_clamps_to_endpoints() {
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(1.0, 0.0, 0.0);

        let before = closest_point_on_segment(Vec3::new(-2.0, 0.5, 0.0), start, end);
        assert_relative_eq!(before, start, epsilon = 1e-6);

        let after = closest_point_on_segment(Vec3::new(5.0, -1.0, 0.0), start, end);
        assert_relative_eq!(after, end, epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_on_degenerate_segment() {
        let point = Vec3::new(3.0, 4.0, 5.0);
        let closest = closest_point_on_segment(point, Vec3::zeros(), Vec3::zeros());
        assert_relative_eq!(closest, Vec3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_segment_segment_crossing() {
        // Perpendicular segments crossing at unit separation
        let (on_a, on_b) = closest_points_between_segments(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        assert_relative_eq!(on_a, Vec3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(on_b, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!((on_a - on_b).magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_segment_segment_parallel() {
        let (on_a, on_b) = closest_points_between_segments(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        );
        assert_relative_eq!((on_a - on_b).magnitude(), 2.0, epsilon = 1e-6);
    }
}
