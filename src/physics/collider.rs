//! Collider component and collision geometry
//!
//! Colliders come in three shapes (box, sphere, capsule) expressed as a
//! tagged enum; pairwise narrow-phase tests dispatch on the shape-kind pair
//! instead of dynamic type inspection. Shape data is stored in local space
//! and resolved against the owner's world matrix on demand.
//!
//! Two layers of tests coexist deliberately:
//! - the broad phase (`check_*`) uses the world bounding sphere as a fast,
//!   shape-agnostic approximation;
//! - the narrow phase (`intersects`, `contains_point`, `intersect_ray`)
//!   performs exact per-shape-pair geometry.

use crate::foundation::math::{
    closest_point_on_segment, closest_points_between_segments,
    utils::{abs_vec3, max_component},
    Mat4, Point3, Vec3,
};
use crate::physics::raycast::Ray;
use crate::physics::PhysicsError;

/// Axis-aligned extent descriptor: center, box half-size, and an enclosing
/// sphere radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Center point
    pub center: Vec3,
    /// Half-size of the enclosing axis-aligned box
    pub half_size: Vec3,
    /// Radius of the enclosing sphere
    pub sphere_radius: f32,
}

impl Bounds {
    /// Minimum corner of the box
    pub fn min(&self) -> Vec3 {
        self.center - self.half_size
    }

    /// Maximum corner of the box
    pub fn max(&self) -> Vec3 {
        self.center + self.half_size
    }

    /// Axis-aligned box overlap test
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let min = self.min();
        let max = self.max();
        let other_min = other.min();
        let other_max = other.max();

        min.x <= other_max.x
            && max.x >= other_min.x
            && min.y <= other_max.y
            && max.y >= other_min.y
            && min.z <= other_max.z
            && max.z >= other_min.z
    }

    /// Whether a point lies inside the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x
            && point.x <= max.x
            && point.y >= min.y
            && point.y <= max.y
            && point.z >= min.z
            && point.z <= max.z
    }

    /// Closest point to `point` inside (or on) the box
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        let min = self.min();
        let max = self.max();
        Vec3::new(
            point.x.clamp(min.x, max.x),
            point.y.clamp(min.y, max.y),
            point.z.clamp(min.z, max.z),
        )
    }
}

/// Collision shape in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box with full extents `size` around `center`
    Box {
        /// Center offset from the owner's origin
        center: Vec3,
        /// Full box extents
        size: Vec3,
    },
    /// Sphere of `radius` around `center`
    Sphere {
        /// Center offset from the owner's origin
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Capsule: a segment of length `height` along `axis`, inflated by
    /// `radius`. `height` is the distance between the two hemisphere centers.
    Capsule {
        /// Center offset from the owner's origin
        center: Vec3,
        /// Normalized segment direction
        axis: Vec3,
        /// Distance between the hemisphere centers
        height: f32,
        /// Capsule radius
        radius: f32,
    },
}

/// World-space resolved shape used by the narrow phase
#[derive(Debug, Clone, Copy)]
enum WorldShape {
    Box(Bounds),
    Sphere { center: Vec3, radius: f32 },
    Capsule { start: Vec3, end: Vec3, radius: f32 },
}

/// Collider component: a local-space shape attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    shape: ColliderShape,
    local_bounds: Bounds,
}

impl Collider {
    /// Create a box collider with full extents `size` around `center`
    pub fn new_box(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            shape: ColliderShape::Box { center, size },
            local_bounds: Bounds {
                center,
                half_size,
                sphere_radius: half_size.magnitude(),
            },
        }
    }

    /// Create a sphere collider
    pub fn new_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { center, radius },
            local_bounds: Bounds {
                center,
                half_size: Vec3::new(radius, radius, radius),
                sphere_radius: radius,
            },
        }
    }

    /// Create a capsule collider
    ///
    /// `axis` must be non-degenerate; it is normalized internally.
    pub fn new_capsule(
        center: Vec3,
        axis: Vec3,
        height: f32,
        radius: f32,
    ) -> Result<Self, PhysicsError> {
        if axis.magnitude_squared() <= f32::EPSILON {
            return Err(PhysicsError::DegenerateDirection);
        }
        let axis = axis.normalize();
        let half_height = height * 0.5;
        let half_size = abs_vec3(axis) * half_height + Vec3::new(radius, radius, radius);
        Ok(Self {
            shape: ColliderShape::Capsule {
                center,
                axis,
                height,
                radius,
            },
            local_bounds: Bounds {
                center,
                half_size,
                sphere_radius: half_height + radius,
            },
        })
    }

    /// Local-space shape
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Local-space bounds
    pub fn local_bounds(&self) -> Bounds {
        self.local_bounds
    }

    /// World-space bounds derived from the owner's world matrix
    ///
    /// Center is transformed as a point, the half-size as a direction with
    /// component-wise absolute value, and the sphere radius is scaled by the
    /// largest world-scale axis. The sphere-radius scaling is a uniform-scale
    /// approximation for non-uniformly scaled owners.
    pub fn world_bounds(&self, owner_world: &Mat4) -> Bounds {
        let center = owner_world
            .transform_point(&Point3::from(self.local_bounds.center))
            .coords;
        let half_size = abs_vec3(owner_world.transform_vector(&self.local_bounds.half_size));
        let radius_scale = max_component(world_scale(owner_world));

        Bounds {
            center,
            half_size,
            sphere_radius: self.local_bounds.sphere_radius * radius_scale,
        }
    }

    // --- broad phase (bounding sphere) ---------------------------------

    /// Broad phase: whether `point` lies within the world bounding sphere
    pub fn check_point(&self, point: Vec3, owner_world: &Mat4) -> bool {
        let bounds = self.world_bounds(owner_world);
        (point - bounds.center).magnitude_squared() <= bounds.sphere_radius * bounds.sphere_radius
    }

    /// Broad phase: whether `ray` passes within the world bounding sphere
    ///
    /// Returns the hit flag and the squared distance from the ray origin to
    /// the closest-approach point (`f32::INFINITY` on a miss).
    pub fn check_ray(&self, ray: &Ray, owner_world: &Mat4) -> (bool, f32) {
        let bounds = self.world_bounds(owner_world);
        let closest = ray.closest_point(bounds.center);
        let colliding = (closest - bounds.center).magnitude_squared()
            <= bounds.sphere_radius * bounds.sphere_radius;
        let distance_sqr = if colliding {
            (closest - ray.origin).magnitude_squared()
        } else {
            f32::INFINITY
        };
        (colliding, distance_sqr)
    }

    /// Broad phase: world bounding-sphere overlap (sum-of-radii test)
    pub fn check_collider(
        &self,
        owner_world: &Mat4,
        other: &Collider,
        other_world: &Mat4,
    ) -> bool {
        let bounds = self.world_bounds(owner_world);
        let other_bounds = other.world_bounds(other_world);
        let total_radius = bounds.sphere_radius + other_bounds.sphere_radius;
        (bounds.center - other_bounds.center).magnitude_squared() <= total_radius * total_radius
    }

    // --- narrow phase --------------------------------------------------

    /// Exact shape-pair intersection test
    ///
    /// Dispatches on the (kind, kind) pair: box-box is an AABB overlap,
    /// box-sphere uses the closest in-box point, capsule pairs reduce to
    /// segment distances.
    pub fn intersects(&self, owner_world: &Mat4, other: &Collider, other_world: &Mat4) -> bool {
        let a = self.resolve(owner_world);
        let b = other.resolve(other_world);

        match (a, b) {
            (WorldShape::Box(box_a), WorldShape::Box(box_b)) => box_a.overlaps(&box_b),

            (WorldShape::Box(bounds), WorldShape::Sphere { center, radius })
            | (WorldShape::Sphere { center, radius }, WorldShape::Box(bounds)) => {
                let closest = bounds.clamp_point(center);
                (closest - center).magnitude_squared() <= radius * radius
            }

            (WorldShape::Box(bounds), WorldShape::Capsule { start, end, radius })
            | (WorldShape::Capsule { start, end, radius }, WorldShape::Box(bounds)) => {
                let on_segment = closest_segment_point_to_box(start, end, &bounds);
                let on_box = bounds.clamp_point(on_segment);
                (on_box - on_segment).magnitude_squared() <= radius * radius
            }

            (
                WorldShape::Sphere { center, radius },
                WorldShape::Sphere {
                    center: other_center,
                    radius: other_radius,
                },
            ) => {
                let total = radius + other_radius;
                (center - other_center).magnitude_squared() <= total * total
            }

            (WorldShape::Sphere { center, radius }, WorldShape::Capsule { start, end, radius: capsule_radius })
            | (WorldShape::Capsule { start, end, radius: capsule_radius }, WorldShape::Sphere { center, radius }) => {
                let closest = closest_point_on_segment(center, start, end);
                let total = radius + capsule_radius;
                (closest - center).magnitude_squared() <= total * total
            }

            (
                WorldShape::Capsule { start, end, radius },
                WorldShape::Capsule {
                    start: other_start,
                    end: other_end,
                    radius: other_radius,
                },
            ) => {
                let (on_a, on_b) =
                    closest_points_between_segments(start, end, other_start, other_end);
                let total = radius + other_radius;
                (on_a - on_b).magnitude_squared() <= total * total
            }
        }
    }

    /// Exact test: whether `point` lies inside the collider's world shape
    pub fn contains_point(&self, point: Vec3, owner_world: &Mat4) -> bool {
        match self.resolve(owner_world) {
            WorldShape::Box(bounds) => bounds.contains_point(point),
            WorldShape::Sphere { center, radius } => {
                (point - center).magnitude_squared() <= radius * radius
            }
            WorldShape::Capsule { start, end, radius } => {
                let closest = closest_point_on_segment(point, start, end);
                (point - closest).magnitude_squared() <= radius * radius
            }
        }
    }

    /// Nearest point to `point` that lies inside (or on) the collider
    pub fn closest_point(&self, point: Vec3, owner_world: &Mat4) -> Vec3 {
        match self.resolve(owner_world) {
            WorldShape::Box(bounds) => bounds.clamp_point(point),
            WorldShape::Sphere { center, radius } => clamp_to_sphere(point, center, radius),
            WorldShape::Capsule { start, end, radius } => {
                let on_segment = closest_point_on_segment(point, start, end);
                clamp_to_sphere(point, on_segment, radius)
            }
        }
    }

    /// Nearest point to `point` lying exactly on the collider's surface
    pub fn closest_point_on_surface(&self, point: Vec3, owner_world: &Mat4) -> Vec3 {
        match self.resolve(owner_world) {
            WorldShape::Box(bounds) => {
                if bounds.contains_point(point) {
                    project_to_box_surface(point, &bounds)
                } else {
                    bounds.clamp_point(point)
                }
            }
            WorldShape::Sphere { center, radius } => project_to_sphere(point, center, radius),
            WorldShape::Capsule { start, end, radius } => {
                let on_segment = closest_point_on_segment(point, start, end);
                project_to_sphere(point, on_segment, radius)
            }
        }
    }

    /// Exact ray intersection: distance to the entry point, if any
    pub fn intersect_ray(&self, ray: &Ray, owner_world: &Mat4) -> Option<f32> {
        match self.resolve(owner_world) {
            WorldShape::Box(bounds) => intersect_ray_box(ray, &bounds),
            WorldShape::Sphere { center, radius } => intersect_ray_sphere(ray, center, radius),
            WorldShape::Capsule { start, end, radius } => {
                intersect_ray_capsule(ray, start, end, radius)
            }
        }
    }

    fn resolve(&self, owner_world: &Mat4) -> WorldShape {
        let radius_scale = max_component(world_scale(owner_world));
        match self.shape {
            ColliderShape::Box { .. } => WorldShape::Box(self.world_bounds(owner_world)),
            ColliderShape::Sphere { center, radius } => WorldShape::Sphere {
                center: owner_world.transform_point(&Point3::from(center)).coords,
                radius: radius * radius_scale,
            },
            ColliderShape::Capsule {
                center,
                axis,
                height,
                radius,
            } => {
                let half = axis * (height * 0.5);
                WorldShape::Capsule {
                    start: owner_world.transform_point(&Point3::from(center - half)).coords,
                    end: owner_world.transform_point(&Point3::from(center + half)).coords,
                    radius: radius * radius_scale,
                }
            }
        }
    }
}

/// Per-axis world scale extracted from the matrix columns
fn world_scale(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude(),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude(),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude(),
    )
}

/// Nearest in-sphere point: `point` itself when inside, surface point otherwise
fn clamp_to_sphere(point: Vec3, center: Vec3, radius: f32) -> Vec3 {
    let offset = point - center;
    let distance_sq = offset.magnitude_squared();
    if distance_sq <= radius * radius {
        point
    } else {
        center + offset * (radius / distance_sq.sqrt())
    }
}

/// Projection of `point` onto the sphere surface
///
/// A point exactly at the center has no preferred direction; +X is used.
fn project_to_sphere(point: Vec3, center: Vec3, radius: f32) -> Vec3 {
    let offset = point - center;
    let distance_sq = offset.magnitude_squared();
    if distance_sq <= f32::EPSILON {
        return center + Vec3::new(radius, 0.0, 0.0);
    }
    center + offset * (radius / distance_sq.sqrt())
}

/// Projection of an interior point onto the nearest box face
fn project_to_box_surface(point: Vec3, bounds: &Bounds) -> Vec3 {
    let min = bounds.min();
    let max = bounds.max();

    let distances = [
        (point.x - min.x, 0, min.x),
        (max.x - point.x, 0, max.x),
        (point.y - min.y, 1, min.y),
        (max.y - point.y, 1, max.y),
        (point.z - min.z, 2, min.z),
        (max.z - point.z, 2, max.z),
    ];

    let mut projected = point;
    if let Some(&(_, axis, value)) = distances
        .iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    {
        match axis {
            0 => projected.x = value,
            1 => projected.y = value,
            _ => projected.z = value,
        }
    }
    projected
}

/// Point on the segment closest to the box
///
/// Two-pass refinement: project the box center onto the segment, clamp the
/// result into the box, then re-project onto the segment. Exact for face
/// contacts and a close approximation near edges and corners.
fn closest_segment_point_to_box(start: Vec3, end: Vec3, bounds: &Bounds) -> Vec3 {
    let first_pass = closest_point_on_segment(bounds.center, start, end);
    let on_box = bounds.clamp_point(first_pass);
    closest_point_on_segment(on_box, start, end)
}

/// Slab-method ray/AABB intersection returning the entry distance
fn intersect_ray_box(ray: &Ray, bounds: &Bounds) -> Option<f32> {
    let min = bounds.min();
    let max = bounds.max();

    let inv_dir = Vec3::new(
        if ray.direction.x != 0.0 { 1.0 / ray.direction.x } else { f32::INFINITY },
        if ray.direction.y != 0.0 { 1.0 / ray.direction.y } else { f32::INFINITY },
        if ray.direction.z != 0.0 { 1.0 / ray.direction.z } else { f32::INFINITY },
    );

    let t1 = (min.x - ray.origin.x) * inv_dir.x;
    let t2 = (max.x - ray.origin.x) * inv_dir.x;
    let t3 = (min.y - ray.origin.y) * inv_dir.y;
    let t4 = (max.y - ray.origin.y) * inv_dir.y;
    let t5 = (min.z - ray.origin.z) * inv_dir.z;
    let t6 = (max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax >= tmin && tmax >= 0.0 {
        Some(tmin.max(0.0))
    } else {
        None
    }
}

/// Quadratic ray/sphere intersection returning the closest positive distance
fn intersect_ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / 2.0;
    let t2 = (-b + sqrt_discriminant) / 2.0;

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray/capsule intersection: cylindrical body plus the two cap spheres
fn intersect_ray_capsule(ray: &Ray, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let axis = end - start;
    let oa = ray.origin - start;

    let axis_len_sq = axis.magnitude_squared();
    let axis_dot_dir = axis.dot(&ray.direction);
    let axis_dot_oa = axis.dot(&oa);

    let mut closest: Option<f32> = None;
    let mut consider = |candidate: Option<f32>| {
        if let Some(t) = candidate {
            if t >= 0.0 && closest.map_or(true, |best| t < best) {
                closest = Some(t);
            }
        }
    };

    // Infinite cylinder restricted to the segment span
    let a = axis_len_sq - axis_dot_dir * axis_dot_dir;
    if a.abs() > f32::EPSILON {
        let b = axis_len_sq * oa.dot(&ray.direction) - axis_dot_oa * axis_dot_dir;
        let c = axis_len_sq * oa.magnitude_squared()
            - axis_dot_oa * axis_dot_oa
            - radius * radius * axis_len_sq;
        let h = b * b - a * c;
        if h >= 0.0 {
            let t = (-b - h.sqrt()) / a;
            let along_axis = axis_dot_oa + t * axis_dot_dir;
            if along_axis >= 0.0 && along_axis <= axis_len_sq {
                consider(Some(t));
            }
        }
    }

    // Hemisphere caps
    consider(intersect_ray_sphere(ray, start, radius));
    consider(intersect_ray_sphere(ray, end, radius));

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn identity() -> Mat4 {
        Mat4::identity()
    }

    fn translation(v: Vec3) -> Mat4 {
        Mat4::new_translation(&v)
    }

    #[test]
    fn test_box_bounding_sphere_point_check() {
        let collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        // Bounding sphere radius is |half_size| = sqrt(3)
        assert_relative_eq!(
            collider.local_bounds().sphere_radius,
            3.0_f32.sqrt(),
            epsilon = 1e-5
        );
        assert!(collider.check_point(Vec3::new(0.4, 0.0, 0.0), &identity()));
        assert!(!collider.check_point(Vec3::new(5.0, 0.0, 0.0), &identity()));

        // The exact test agrees for these points
        assert!(collider.contains_point(Vec3::new(0.4, 0.0, 0.0), &identity()));
        assert!(!collider.contains_point(Vec3::new(5.0, 0.0, 0.0), &identity()));
    }

    #[test]
    fn test_broad_phase_wider_than_narrow_phase() {
        let collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        // A corner-adjacent point inside the bounding sphere but outside the box
        let point = Vec3::new(1.2, 1.2, 0.0);
        assert!(collider.check_point(point, &identity()));
        assert!(!collider.contains_point(point, &identity()));
    }

    #[test]
    fn test_sphere_sphere_overlap() {
        let a = Collider::new_sphere(Vec3::zeros(), 1.0);
        let b = Collider::new_sphere(Vec3::zeros(), 1.0);

        let near = translation(Vec3::new(1.5, 0.0, 0.0));
        assert!(a.check_collider(&identity(), &b, &near));
        assert!(a.intersects(&identity(), &b, &near));

        let far = translation(Vec3::new(3.0, 0.0, 0.0));
        assert!(!a.check_collider(&identity(), &b, &far));
        assert!(!a.intersects(&identity(), &b, &far));
    }

    #[test]
    fn test_box_box_aabb_overlap() {
        let a = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let b = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(a.intersects(&identity(), &b, &translation(Vec3::new(1.5, 0.0, 0.0))));
        assert!(!a.intersects(&identity(), &b, &translation(Vec3::new(2.5, 0.0, 0.0))));
    }

    #[test]
    fn test_box_sphere_closest_point_contact() {
        let box_collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let sphere = Collider::new_sphere(Vec3::zeros(), 0.5);

        // Sphere center 1.4 from the face, face at 1.0, gap 0.4 < 0.5
        assert!(box_collider.intersects(
            &identity(),
            &sphere,
            &translation(Vec3::new(1.4, 0.0, 0.0))
        ));
        // Gap 0.6 > 0.5
        assert!(!box_collider.intersects(
            &identity(),
            &sphere,
            &translation(Vec3::new(1.6, 0.0, 0.0))
        ));

        // Along the diagonal the AABB corner decides, not the bounding sphere
        let diagonal = translation(Vec3::new(1.3, 1.3, 0.0));
        assert!(box_collider.intersects(&identity(), &sphere, &diagonal));
        let outside_diagonal = translation(Vec3::new(1.4, 1.4, 0.0));
        assert!(!box_collider.intersects(&identity(), &sphere, &outside_diagonal));
    }

    #[test]
    fn test_box_capsule_contact() {
        let box_collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let capsule =
            Collider::new_capsule(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5).unwrap();

        // Vertical capsule next to the box face: gap 0.4 < radius 0.5
        assert!(box_collider.intersects(
            &identity(),
            &capsule,
            &translation(Vec3::new(1.4, 0.0, 0.0))
        ));
        assert!(!box_collider.intersects(
            &identity(),
            &capsule,
            &translation(Vec3::new(1.6, 0.0, 0.0))
        ));
    }

    #[test]
    fn test_capsule_capsule_segment_distance() {
        let a = Collider::new_capsule(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5).unwrap();
        let b = Collider::new_capsule(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), 2.0, 0.5).unwrap();

        // Crossing axes, centers 0.9 apart: 0.9 < 0.5 + 0.5
        assert!(a.intersects(&identity(), &b, &translation(Vec3::new(0.9, 0.0, 0.0))));
        assert!(!a.intersects(&identity(), &b, &translation(Vec3::new(1.1, 0.0, 0.0))));
    }

    #[test]
    fn test_sphere_capsule_contact() {
        let capsule =
            Collider::new_capsule(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5).unwrap();
        let sphere = Collider::new_sphere(Vec3::zeros(), 0.5);

        // Level with the top hemisphere center
        assert!(capsule.intersects(
            &identity(),
            &sphere,
            &translation(Vec3::new(0.9, 1.0, 0.0))
        ));
        assert!(!capsule.intersects(
            &identity(),
            &sphere,
            &translation(Vec3::new(1.1, 1.0, 0.0))
        ));
    }

    #[test]
    fn test_world_bounds_under_scale_and_translation() {
        let collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let matrix = translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));

        let bounds = collider.world_bounds(&matrix);
        assert_relative_eq!(bounds.center, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.half_size, Vec3::new(2.0, 1.0, 1.0), epsilon = 1e-5);
        // Sphere radius scales by the max axis scale (uniform approximation)
        assert_relative_eq!(bounds.sphere_radius, 3.0_f32.sqrt() * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_closest_point_inside_vs_surface() {
        let collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let inside = Vec3::new(0.2, 0.9, 0.0);

        // Nearest in-bounds point to an interior point is the point itself
        assert_relative_eq!(
            collider.closest_point(inside, &identity()),
            inside,
            epsilon = 1e-6
        );
        // Nearest surface point projects onto the closest face (+Y)
        assert_relative_eq!(
            collider.closest_point_on_surface(inside, &identity()),
            Vec3::new(0.2, 1.0, 0.0),
            epsilon = 1e-6
        );

        let outside = Vec3::new(3.0, 0.5, 0.0);
        assert_relative_eq!(
            collider.closest_point(outside, &identity()),
            Vec3::new(1.0, 0.5, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            collider.closest_point_on_surface(outside, &identity()),
            Vec3::new(1.0, 0.5, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_sphere_closest_points() {
        let collider = Collider::new_sphere(Vec3::zeros(), 2.0);

        let outside = Vec3::new(4.0, 0.0, 0.0);
        assert_relative_eq!(
            collider.closest_point(outside, &identity()),
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-6
        );

        let inside = Vec3::new(0.5, 0.0, 0.0);
        assert_relative_eq!(collider.closest_point(inside, &identity()), inside, epsilon = 1e-6);
        assert_relative_eq!(
            collider.closest_point_on_surface(inside, &identity()),
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_ray_sphere_exact_distance() {
        let collider = Collider::new_sphere(Vec3::zeros(), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let distance = collider.intersect_ray(&ray, &identity()).unwrap();
        assert_relative_eq!(distance, 9.0, epsilon = 1e-4);

        let offset_ray = Ray::new(Vec3::new(2.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(collider.intersect_ray(&offset_ray, &identity()).is_none());
    }

    #[test]
    fn test_ray_box_slab_distance() {
        let collider = Collider::new_box(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let distance = collider.intersect_ray(&ray, &identity()).unwrap();
        assert_relative_eq!(distance, 9.0, epsilon = 1e-4);

        // Ray starting inside reports distance zero
        let inside_ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(
            collider.intersect_ray(&inside_ray, &identity()).unwrap(),
            0.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_ray_capsule_body_and_caps() {
        let collider =
            Collider::new_capsule(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5).unwrap();

        // Through the cylindrical body
        let body_ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let distance = collider.intersect_ray(&body_ray, &identity()).unwrap();
        assert_relative_eq!(distance, 9.5, epsilon = 1e-4);

        // Down onto the top cap: entry at y = 1.5
        let cap_ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0)).unwrap();
        let cap_distance = collider.intersect_ray(&cap_ray, &identity()).unwrap();
        assert_relative_eq!(cap_distance, 8.5, epsilon = 1e-4);

        // Past the side
        let miss = Ray::new(Vec3::new(-10.0, 2.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(collider.intersect_ray(&miss, &identity()).is_none());
    }

    #[test]
    fn test_broad_phase_ray_distance_semantics() {
        let collider = Collider::new_sphere(Vec3::zeros(), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        // Broad phase reports the closest-approach distance (10), not the
        // entry distance (9) the narrow phase computes
        let (hit, distance_sqr) = collider.check_ray(&ray, &identity());
        assert!(hit);
        assert_relative_eq!(distance_sqr, 100.0, epsilon = 1e-3);

        let miss = Ray::new(Vec3::new(2.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let (hit, distance_sqr) = collider.check_ray(&miss, &identity());
        assert!(!hit);
        assert!(distance_sqr.is_infinite());
    }

    #[test]
    fn test_degenerate_capsule_axis_rejected() {
        let result = Collider::new_capsule(Vec3::zeros(), Vec3::zeros(), 2.0, 0.5);
        assert!(matches!(result, Err(PhysicsError::DegenerateDirection)));
    }
}
