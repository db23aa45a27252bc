//! Rigid-body component
//!
//! Holds the per-body simulation state (velocity, mass, drag, detection mode,
//! sleep state). The stepping itself lives in
//! [`PhysicsWorld`](crate::physics::PhysicsWorld), which reads the world
//! tunables and the collider set; this type only owns body-local state and
//! the force/sleep API.

use crate::foundation::math::Vec3;
use crate::physics::PhysicsError;

/// Fixed timestep assumed by [`ForceMode::Force`]
///
/// Continuous forces are scaled by this step at call time instead of being
/// accumulated and integrated; both modes apply instantaneously.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// How [`Rigidbody::add_force`] converts a force into a velocity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force: scaled by the fixed timestep, divided by mass
    Force,
    /// Instantaneous impulse: divided by mass only
    Impulse,
}

/// Collision handling during a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionDetectionMode {
    /// Move the whole displacement, then resolve once
    #[default]
    Discrete,
    /// Sub-step the displacement and stop at the first contact
    Continuous,
}

/// Simulated rigid body attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    velocity: Vec3,
    mass: f32,
    drag: f32,
    use_gravity: bool,
    is_kinematic: bool,
    detection_mode: CollisionDetectionMode,
    sleep_threshold: f32,
    sleeping: bool,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::new()
    }
}

impl Rigidbody {
    /// Create a body with default state: unit mass, gravity on, discrete
    /// collision detection, awake
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            mass: 1.0,
            drag: 0.0,
            use_gravity: true,
            is_kinematic: false,
            detection_mode: CollisionDetectionMode::Discrete,
            sleep_threshold: 0.005,
            sleeping: false,
        }
    }

    /// Create a body with the given mass
    pub fn with_mass(mass: f32) -> Result<Self, PhysicsError> {
        let mut body = Self::new();
        body.set_mass(mass)?;
        Ok(body)
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set the velocity directly; wakes the body
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.sleeping = false;
    }

    /// Velocity write used by the simulation step, bypassing the wake
    pub(crate) fn store_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Body mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass; must be strictly positive
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(())
    }

    /// Linear drag factor applied each step
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set the linear drag factor
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    /// Whether gravity is applied to this body
    pub fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    /// Enable or disable gravity for this body
    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    /// Whether the body is kinematic (never simulated, moved externally)
    pub fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    /// Set the kinematic flag
    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.is_kinematic = kinematic;
    }

    /// Collision handling mode
    pub fn detection_mode(&self) -> CollisionDetectionMode {
        self.detection_mode
    }

    /// Set the collision handling mode
    pub fn set_detection_mode(&mut self, mode: CollisionDetectionMode) {
        self.detection_mode = mode;
    }

    /// Speed below which the body falls asleep
    pub fn sleep_threshold(&self) -> f32 {
        self.sleep_threshold
    }

    /// Set the sleep threshold
    pub fn set_sleep_threshold(&mut self, threshold: f32) {
        self.sleep_threshold = threshold;
    }

    /// Whether the body is asleep
    ///
    /// Sleeping bodies skip integration but remain collidable for others.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Put the body to sleep, zeroing its velocity
    pub fn sleep(&mut self) {
        self.velocity = Vec3::zeros();
        self.sleeping = true;
    }

    /// Wake the body up
    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }

    /// Apply a force as an immediate velocity change; wakes the body
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        let delta = match mode {
            ForceMode::Force => force * FIXED_TIMESTEP / self.mass,
            ForceMode::Impulse => force / self.mass,
        };
        self.velocity += delta;
        self.sleeping = false;
    }
}
