//! Entity storage
//!
//! Entities live in a generation-checked arena; parent/child and
//! component/owner relationships are stored as keys and ids rather than
//! references, so a stale handle can never dangle into freed storage.

use slotmap::new_key_type;

use super::component::ComponentSlot;
use super::transform::Transform;
use crate::foundation::math::Mat4;

new_key_type! {
    /// Generation-checked handle to an entity in a [`Scene`](super::Scene)
    pub struct EntityKey;
}

/// Per-entity record in the scene arena
#[derive(Debug, Clone)]
pub(crate) struct EntityData {
    /// Non-owning back-reference; `None` for roots
    pub(crate) parent: Option<EntityKey>,
    /// Ordered owned children
    pub(crate) children: Vec<EntityKey>,
    pub(crate) transform: Transform,
    /// Ordered component list, insertion order preserved
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) is_active: bool,
    /// Cached product of ancestor local matrices
    pub(crate) world_matrix: Mat4,
    pub(crate) world_dirty: bool,
}

impl EntityData {
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::identity(),
            components: Vec::new(),
            is_active: true,
            world_matrix: Mat4::identity(),
            // Born dirty: the cached world matrix is meaningless until the
            // first flush or on-demand read computes it from the parent chain
            world_dirty: true,
        }
    }
}
