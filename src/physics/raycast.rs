//! Ray queries against the scene's colliders
//!
//! A raycast runs the broad-phase bounding-sphere reject first, then the
//! exact per-shape intersection, and reports the closest hit as non-owning
//! handles into the scene.

use log::trace;

use crate::foundation::math::Vec3;
use crate::physics::collider::Collider;
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::scene::{ComponentId, EntityKey, Scene};

/// Ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    ///
    /// A zero-length direction is rejected rather than normalized into NaNs.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, PhysicsError> {
        if direction.magnitude_squared() <= f32::EPSILON {
            return Err(PhysicsError::DegenerateDirection);
        }
        Ok(Self {
            origin,
            direction: direction.normalize(),
        })
    }

    /// Closest point on the ray to `point` (clamped to the origin side)
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let t = (point - self.origin).dot(&self.direction).max(0.0);
        self.origin + self.direction * t
    }

    /// Squared distance from `point` to the ray
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        (self.closest_point(point) - point).magnitude_squared()
    }
}

/// Result of a successful raycast
///
/// Holds non-owning handles; both may go stale if the entity or collider is
/// destroyed after the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity owning the hit collider
    pub entity: EntityKey,
    /// Id of the hit collider component
    pub collider: ComponentId,
    /// Distance from the ray origin to the entry point
    pub distance: f32,
}

impl PhysicsWorld {
    /// Cast a ray against every live, active collider in the scene
    ///
    /// Candidates are pre-filtered by the broad-phase bounding-sphere test;
    /// survivors get the exact per-shape intersection. The closest entry
    /// point wins.
    pub fn raycast(&self, scene: &Scene, ray: &Ray) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for candidate in self.collider_set(scene) {
            let Ok(world) = scene.world_matrix(candidate.entity) else {
                continue;
            };
            let Some(collider) =
                scene.get_component_by_id::<Collider>(candidate.entity, candidate.id)
            else {
                continue;
            };

            let (possible, _) = collider.check_ray(ray, &world);
            if !possible {
                continue;
            }

            if let Some(distance) = collider.intersect_ray(ray, &world) {
                if best.map_or(true, |hit| distance < hit.distance) {
                    best = Some(RayHit {
                        entity: candidate.entity,
                        collider: candidate.id,
                        distance,
                    });
                }
            }
        }

        if let Some(hit) = &best {
            trace!("raycast hit entity {:?} at distance {}", hit.entity, hit.distance);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_direction_rejected() {
        assert!(matches!(
            Ray::new(Vec3::zeros(), Vec3::zeros()),
            Err(PhysicsError::DegenerateDirection)
        ));
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert_relative_eq!(ray.direction.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_clamps_behind_origin() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)).unwrap();

        let ahead = ray.closest_point(Vec3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(ahead, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-6);

        // Points behind the origin project onto the origin itself
        let behind = ray.closest_point(Vec3::new(-5.0, 2.0, 0.0));
        assert_relative_eq!(behind, Vec3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(
            ray.distance_squared_to(Vec3::new(-5.0, 2.0, 0.0)),
            29.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_raycast_reports_exact_entry_distance() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene
            .add_component(entity, Collider::new_sphere(Vec3::zeros(), 1.0))
            .unwrap();

        let physics = PhysicsWorld::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let hit = physics.raycast(&scene, &ray).unwrap();
        assert_eq!(hit.entity, entity);
        assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_raycast_misses_offset_target() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene
            .add_component(entity, Collider::new_sphere(Vec3::zeros(), 1.0))
            .unwrap();

        let physics = PhysicsWorld::new();
        let ray = Ray::new(Vec3::new(2.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(physics.raycast(&scene, &ray).is_none());
    }

    #[test]
    fn test_raycast_picks_closest_of_several() {
        let mut scene = Scene::new();

        let near = scene.create_entity();
        scene.set_position(near, Vec3::new(0.0, 0.0, -3.0)).unwrap();
        scene
            .add_component(near, Collider::new_sphere(Vec3::zeros(), 1.0))
            .unwrap();

        let far = scene.create_entity();
        scene.set_position(far, Vec3::new(0.0, 0.0, 4.0)).unwrap();
        scene
            .add_component(far, Collider::new_sphere(Vec3::zeros(), 1.0))
            .unwrap();

        let physics = PhysicsWorld::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let hit = physics.raycast(&scene, &ray).unwrap();
        assert_eq!(hit.entity, near);
        assert_relative_eq!(hit.distance, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_raycast_skips_inactive_colliders() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        let collider = scene
            .add_component(entity, Collider::new_sphere(Vec3::zeros(), 1.0))
            .unwrap();

        let physics = PhysicsWorld::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        scene.set_component_active(entity, collider, false).unwrap();
        assert!(physics.raycast(&scene, &ray).is_none());

        scene.set_component_active(entity, collider, true).unwrap();
        assert!(physics.raycast(&scene, &ray).is_some());
    }
}
