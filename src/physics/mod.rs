//! Collision and rigid-body physics
//!
//! [`PhysicsWorld`] is an explicit simulation context: it owns the tunables
//! and is threaded through every step and query, so there is no process-wide
//! registry. The collider set is derived from the scene arena on demand —
//! registry contents are exactly the live, active colliders, and a snapshot
//! taken at the start of a pass stays safe to iterate while entities are
//! mutated.

pub mod collider;
pub mod raycast;
pub mod rigidbody;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::{utils::abs_vec3, Vec3};
use crate::physics::collider::{Bounds, Collider};
use crate::physics::rigidbody::{CollisionDetectionMode, Rigidbody};
use crate::scene::{ComponentId, ComponentVariant, EntityKey, Scene};

/// Physics errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// Rigidbody mass must be strictly positive
    #[error("rigidbody mass must be positive, got {0}")]
    InvalidMass(f32),

    /// A direction vector with zero length cannot be normalized
    #[error("direction vector has zero length")]
    DegenerateDirection,
}

/// World-level simulation tunables
///
/// Mutable at runtime; read by every rigidbody step. Loadable and savable as
/// TOML or RON through [`Config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravitational acceleration applied to non-kinematic bodies
    pub gravity: Vec3,
    /// Tangential velocity damping applied on contact, in `[0, 1]`
    pub friction: f32,
    /// Sub-step count for continuous collision detection
    pub continuous_collision_steps: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            friction: 0.4,
            continuous_collision_steps: 8,
        }
    }
}

impl Config for PhysicsSettings {}

/// Handle to a live collider: the owning entity plus the component id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderRef {
    /// Owning entity
    pub entity: EntityKey,
    /// Collider component id on that entity
    pub id: ComponentId,
}

/// Explicit physics context: tunables plus the simulation and query entry
/// points
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    /// Simulation tunables
    pub settings: PhysicsSettings,
}

impl PhysicsWorld {
    /// Create a world with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with the given settings
    pub fn with_settings(settings: PhysicsSettings) -> Self {
        Self { settings }
    }

    /// Snapshot of every live, active collider on an effectively-active
    /// entity
    ///
    /// Derived from the arena each call, so the set can never contain a
    /// destroyed collider and needs no registration bookkeeping.
    pub fn collider_set(&self, scene: &Scene) -> Vec<ColliderRef> {
        let mut set = Vec::new();
        for entity in scene.active_entities() {
            for slot in scene.component_slots(entity) {
                if slot.is_active && Collider::from_component(&slot.component).is_some() {
                    set.push(ColliderRef { entity, id: slot.id });
                }
            }
        }
        set
    }

    /// Step one rigidbody: integrate velocity, move, resolve contacts, and
    /// apply the sleep check
    ///
    /// Skips kinematic and sleeping bodies (sleeping bodies stay collidable
    /// through the collider set). Bodies or colliders destroyed earlier in
    /// the same pass are skipped by the liveness lookups.
    pub fn simulate_body(
        &self,
        scene: &mut Scene,
        entity: EntityKey,
        body: ComponentId,
        colliders: &[ColliderRef],
        dt: f32,
    ) {
        let Some(state) = scene.get_component_by_id::<Rigidbody>(entity, body) else {
            return;
        };
        if state.is_kinematic() || state.is_sleeping() {
            return;
        }

        // Drag first, then gravity; the order is part of the step contract
        let mut velocity = state.velocity() * (1.0 - state.drag());
        if state.use_gravity() {
            velocity += self.settings.gravity * dt;
        }
        let detection_mode = state.detection_mode();
        let sleep_threshold = state.sleep_threshold();

        let displacement = velocity * dt;
        match detection_mode {
            CollisionDetectionMode::Discrete => {
                let _ = scene.translate(entity, displacement);
                self.resolve_contacts(scene, entity, colliders, &mut velocity);
            }
            CollisionDetectionMode::Continuous => {
                let steps = self.settings.continuous_collision_steps.max(1);
                let sub_step = displacement / steps as f32;
                for _ in 0..steps {
                    let _ = scene.translate(entity, sub_step);
                    if self.resolve_contacts(scene, entity, colliders, &mut velocity) {
                        break;
                    }
                }
            }
        }

        if let Some(state) = scene.get_component_by_id_mut::<Rigidbody>(entity, body) {
            state.store_velocity(velocity);
            if velocity.magnitude() < sleep_threshold {
                state.sleep();
            }
        }
    }

    /// Resolve the first contact between the entity's colliders and the rest
    /// of the set; returns whether a contact was found
    fn resolve_contacts(
        &self,
        scene: &mut Scene,
        entity: EntityKey,
        colliders: &[ColliderRef],
        velocity: &mut Vec3,
    ) -> bool {
        let Ok(entity_world) = scene.world_matrix(entity) else {
            return false;
        };

        let own: Vec<Collider> = scene
            .component_slots(entity)
            .iter()
            .filter(|slot| slot.is_active)
            .filter_map(|slot| Collider::from_component(&slot.component))
            .cloned()
            .collect();

        for own_collider in &own {
            for other in colliders {
                if other.entity == entity {
                    continue;
                }
                let Some(other_collider) =
                    scene.get_component_by_id::<Collider>(other.entity, other.id)
                else {
                    continue;
                };
                let Ok(other_world) = scene.world_matrix(other.entity) else {
                    continue;
                };

                if !own_collider.check_collider(&entity_world, other_collider, &other_world) {
                    continue;
                }
                if !own_collider.intersects(&entity_world, other_collider, &other_world) {
                    continue;
                }

                let own_bounds = own_collider.world_bounds(&entity_world);
                let other_bounds = other_collider.world_bounds(&other_world);
                let Some((normal, overlap)) = penetration_axis(&own_bounds, &other_bounds) else {
                    continue;
                };

                trace!(
                    "contact: entity {:?} against {:?}, normal {:?}, overlap {}",
                    entity,
                    other.entity,
                    normal,
                    overlap
                );

                // Project out of penetration, then kill the inward velocity
                // component and damp the tangential remainder
                let _ = scene.translate(entity, normal * overlap);

                let inward = velocity.dot(&normal);
                if inward < 0.0 {
                    *velocity -= normal * inward;
                    *velocity *= 1.0 - self.settings.friction;
                }
                return true;
            }
        }
        false
    }
}

/// Penetration normal and depth from two overlapping world-space bounds
///
/// Axis of least overlap between the boxes, signed by the center difference.
/// Returns `None` when the boxes do not overlap on some axis or when the
/// centers coincide on the chosen axis (no meaningful direction).
fn penetration_axis(a: &Bounds, b: &Bounds) -> Option<(Vec3, f32)> {
    let delta = a.center - b.center;
    let overlap = (a.half_size + b.half_size) - abs_vec3(delta);
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let (axis_delta, overlap_depth, axis) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (delta.x, overlap.x, Vec3::new(1.0, 0.0, 0.0))
    } else if overlap.y <= overlap.z {
        (delta.y, overlap.y, Vec3::new(0.0, 1.0, 0.0))
    } else {
        (delta.z, overlap.z, Vec3::new(0.0, 0.0, 1.0))
    };

    if axis_delta == 0.0 {
        return None;
    }
    Some((axis * axis_delta.signum(), overlap_depth))
}
