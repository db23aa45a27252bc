//! # scene-core
//!
//! Scene graph, entity-component framework, and collision/rigid-body physics
//! core for a 3D engine.
//!
//! ## Features
//!
//! - **Scene graph**: generation-checked entity arena with parent/child
//!   ownership and cached world transforms
//! - **Component framework**: runtime-attachable colliders and rigidbodies
//!   with enable/disable lifecycle hooks
//! - **Collision detection**: box, sphere, and capsule colliders with
//!   broad-phase bounding-sphere and exact narrow-phase tests
//! - **Rigid-body simulation**: gravity/drag integration, discrete and
//!   continuous collision modes, penetration resolution, sleep states
//! - **Raycasting**: closest-hit queries against all live colliders
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_core::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut physics = PhysicsWorld::new();
//!
//! let floor = scene.create_entity();
//! scene.add_component(floor, Collider::new_box(Vec3::zeros(), Vec3::new(10.0, 1.0, 10.0))).unwrap();
//!
//! let ball = scene.create_entity();
//! scene.set_position(ball, Vec3::new(0.0, 5.0, 0.0)).unwrap();
//! scene.add_component(ball, Collider::new_sphere(Vec3::zeros(), 0.5)).unwrap();
//! scene.add_component(ball, Rigidbody::new()).unwrap();
//!
//! for _ in 0..240 {
//!     scene.update(&mut physics, 1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{Mat4, Quat, Vec3},
        physics::{
            collider::{Bounds, Collider, ColliderShape},
            raycast::{Ray, RayHit},
            rigidbody::{CollisionDetectionMode, ForceMode, Rigidbody},
            PhysicsError, PhysicsSettings, PhysicsWorld,
        },
        scene::{
            component::{Component, ComponentId},
            EntityKey, Scene, SceneError,
        },
    };
}
