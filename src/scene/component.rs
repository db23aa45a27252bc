//! Component framework
//!
//! Components are behavior/data units attached to exactly one entity. The
//! component set is closed, so instead of a type-erased heterogeneous store
//! each entity holds a list of tagged variants; typed access goes through
//! [`ComponentVariant`], which plays the role of a compile-time `T: Component`
//! bound — attaching a non-component type simply does not compile.

use crate::physics::collider::Collider;
use crate::physics::rigidbody::Rigidbody;

/// Stable identifier distinguishing multiple same-type components on one
/// entity. Unique per scene, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

impl ComponentId {
    /// Raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Discriminant for the closed component set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Collision volume participating in physics queries
    Collider,
    /// Simulated rigid body
    Rigidbody,
}

/// A component attached to an entity
#[derive(Debug, Clone)]
pub enum Component {
    /// Collision volume participating in physics queries
    Collider(Collider),
    /// Simulated rigid body
    Rigidbody(Rigidbody),
}

impl Component {
    /// Discriminant of this component
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Collider(_) => ComponentKind::Collider,
            Self::Rigidbody(_) => ComponentKind::Rigidbody,
        }
    }

    /// Lifecycle hook fired when the component (or its entity) becomes active
    pub(crate) fn on_enable(&mut self) {
        match self {
            // Registry membership is derived from liveness, nothing to do
            Self::Collider(_) => {}
            // A re-enabled body resumes simulation immediately
            Self::Rigidbody(body) => body.wake_up(),
        }
    }

    /// Lifecycle hook fired when the component (or its entity) becomes
    /// inactive, and before the component is destroyed
    pub(crate) fn on_disable(&mut self) {
        match self {
            Self::Collider(_) => {}
            Self::Rigidbody(_) => {}
        }
    }
}

/// Attachment slot pairing a component with its per-scene id and active flag
#[derive(Debug, Clone)]
pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) is_active: bool,
    pub(crate) component: Component,
}

/// Typed view over the closed component set
///
/// Implemented for every concrete component type; generic scene accessors
/// (`add_component`, `get_component`, ...) are bounded by this trait.
pub trait ComponentVariant: Sized {
    /// Discriminant matching this variant
    const KIND: ComponentKind;

    /// Wrap into the tagged component
    fn into_component(self) -> Component;

    /// Downcast a shared reference
    fn from_component(component: &Component) -> Option<&Self>;

    /// Downcast a mutable reference
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

impl ComponentVariant for Collider {
    const KIND: ComponentKind = ComponentKind::Collider;

    fn into_component(self) -> Component {
        Component::Collider(self)
    }

    fn from_component(component: &Component) -> Option<&Self> {
        match component {
            Component::Collider(collider) => Some(collider),
            Component::Rigidbody(_) => None,
        }
    }

    fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
        match component {
            Component::Collider(collider) => Some(collider),
            Component::Rigidbody(_) => None,
        }
    }
}

impl ComponentVariant for Rigidbody {
    const KIND: ComponentKind = ComponentKind::Rigidbody;

    fn into_component(self) -> Component {
        Component::Rigidbody(self)
    }

    fn from_component(component: &Component) -> Option<&Self> {
        match component {
            Component::Rigidbody(body) => Some(body),
            Component::Collider(_) => None,
        }
    }

    fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
        match component {
            Component::Rigidbody(body) => Some(body),
            Component::Collider(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_kind_matches_variant() {
        let collider = Collider::new_sphere(Vec3::zeros(), 1.0).into_component();
        assert_eq!(collider.kind(), ComponentKind::Collider);

        let body = Rigidbody::new().into_component();
        assert_eq!(body.kind(), ComponentKind::Rigidbody);
    }

    #[test]
    fn test_downcast_rejects_wrong_variant() {
        let component = Rigidbody::new().into_component();
        assert!(Collider::from_component(&component).is_none());
        assert!(Rigidbody::from_component(&component).is_some());
    }

    #[test]
    fn test_enable_wakes_rigidbody() {
        let mut component = {
            let mut body = Rigidbody::new();
            body.sleep();
            body.into_component()
        };

        component.on_enable();
        let body = Rigidbody::from_component(&component).unwrap();
        assert!(!body.is_sleeping());
    }
}
