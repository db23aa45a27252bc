//! Local transform with a cached matrix
//!
//! Position, rotation, and scale with the derived local matrix recomputed on
//! every mutation, so `local_matrix` is always consistent with the last-set
//! values. World-space derived state (the entity's world matrix) is owned by
//! the [`Scene`](crate::scene::Scene), which invalidates it whenever a
//! transform is mutated through the scene API.

use crate::foundation::math::{Mat4, Quat, Vec3};

/// Local position, rotation, and scale of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            matrix: Mat4::identity(),
        }
    }

    /// Create a transform from position only
    pub fn from_position(position: Vec3) -> Self {
        let mut transform = Self::identity();
        transform.set_position(position);
        transform
    }

    /// Create a transform from position, rotation, and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            matrix: Mat4::identity(),
        };
        transform.recompute_matrix();
        transform
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Current scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Cached local transformation matrix (TRS order)
    ///
    /// Always consistent with the last-set position/rotation/scale. A zero
    /// scale component is permitted but yields a non-invertible matrix;
    /// callers that need the inverse must guard against it.
    pub fn local_matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompute_matrix();
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.recompute_matrix();
    }

    /// Set the rotation from Euler angles (radians, XYZ order)
    pub fn set_euler(&mut self, x: f32, y: f32, z: f32) {
        self.set_rotation(Quat::from_euler_angles(x, y, z));
    }

    /// Set the scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.recompute_matrix();
    }

    /// Translate by an offset
    pub fn translate(&mut self, translation: Vec3) {
        self.position += translation;
        self.recompute_matrix();
    }

    /// Apply an additional rotation on top of the current one
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
        self.recompute_matrix();
    }

    /// Apply an additional Euler-angle rotation (radians, XYZ order)
    pub fn rotate_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotate(Quat::from_euler_angles(x, y, z));
    }

    /// Multiply the scale component-wise
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale.component_mul_assign(&factor);
        self.recompute_matrix();
    }

    /// Forward direction (-Z rotated by the current rotation)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Right direction (+X rotated by the current rotation)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::new(1.0, 0.0, 0.0)
    }

    /// Up direction (+Y rotated by the current rotation)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 1.0, 0.0)
    }

    fn recompute_matrix(&mut self) {
        self.matrix = Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity() {
        let transform = Transform::identity();
        assert_eq!(transform.position(), Vec3::zeros());
        assert_eq!(transform.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.local_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_tracks_mutations() {
        let mut transform = Transform::identity();

        transform.set_position(Vec3::new(1.0, 2.0, 3.0));
        let moved = transform.local_matrix().transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(moved.coords, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);

        transform.translate(Vec3::new(0.0, -2.0, 0.0));
        assert_relative_eq!(transform.position(), Vec3::new(1.0, 0.0, 3.0), epsilon = EPSILON);

        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        let scaled = transform.local_matrix().transform_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(scaled, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_direction_vectors() {
        let mut transform = Transform::identity();
        assert_relative_eq!(transform.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(transform.right(), Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(transform.up(), Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);

        // 90 degrees around Y turns forward toward -X
        transform.set_euler(0.0, PI / 2.0, 0.0);
        assert_relative_eq!(transform.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(transform.right(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_composes() {
        let mut transform = Transform::identity();
        transform.rotate_euler(0.0, PI / 4.0, 0.0);
        transform.rotate_euler(0.0, PI / 4.0, 0.0);
        assert_relative_eq!(transform.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_scale_is_permitted() {
        let mut transform = Transform::identity();
        transform.set_scale(Vec3::zeros());
        let collapsed = transform.local_matrix().transform_vector(&Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(collapsed, Vec3::zeros(), epsilon = EPSILON);
        // Non-invertible by design
        assert!(transform.local_matrix().try_inverse().is_none());
    }
}
