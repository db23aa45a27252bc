//! Scene graph and entity-component framework
//!
//! A [`Scene`] owns a tree of entities stored in a generation-checked arena.
//! Every entity has a local [`Transform`], an ordered child list, and an
//! ordered list of attachable components (colliders, rigidbodies). World
//! matrices are cached per entity and invalidated for the whole subtree
//! whenever an ancestor transform changes or the tree is restructured.
//!
//! All scene mutation happens through `&mut Scene` on the simulation thread;
//! the physics step receives the scene explicitly, so there is no hidden
//! shared state to race on.

pub mod component;
pub mod entity;
pub mod transform;

pub use component::{Component, ComponentId, ComponentKind, ComponentVariant};
pub use entity::EntityKey;
pub use transform::Transform;

use log::debug;
use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::physics::rigidbody::Rigidbody;
use crate::physics::PhysicsWorld;
use component::ComponentSlot;
use entity::EntityData;

/// Errors from scene-tree operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The entity key refers to a destroyed or never-created entity
    #[error("entity key is stale or was destroyed")]
    StaleEntity,

    /// The requested reparenting would make an entity its own ancestor
    #[error("operation would create a cycle in the scene tree")]
    WouldCreateCycle,
}

/// Scene graph: entity arena, tree structure, and component storage
#[derive(Debug, Default)]
pub struct Scene {
    entities: SlotMap<EntityKey, EntityData>,
    next_component_id: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            next_component_id: 0,
        }
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether the key refers to a live entity
    pub fn contains(&self, entity: EntityKey) -> bool {
        self.entities.contains_key(entity)
    }

    /// Iterate over all live entity keys (arbitrary order)
    pub fn entities(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.entities.keys()
    }

    // --- tree structure ------------------------------------------------

    /// Create a new root entity
    pub fn create_entity(&mut self) -> EntityKey {
        self.entities.insert(EntityData::new())
    }

    /// Create a new entity attached under `parent`
    pub fn create_child(&mut self, parent: EntityKey) -> Result<EntityKey, SceneError> {
        if !self.entities.contains_key(parent) {
            return Err(SceneError::StaleEntity);
        }

        let child = self.entities.insert(EntityData::new());
        self.entities[child].parent = Some(parent);
        self.entities[parent].children.push(child);
        Ok(child)
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Fires `on_disable` for every active component being torn down.
    /// Returns `false` if the entity was already destroyed.
    pub fn destroy_entity(&mut self, entity: EntityKey) -> bool {
        if !self.entities.contains_key(entity) {
            return false;
        }

        self.detach_from_parent(entity);

        let subtree = self.collect_subtree(entity);
        debug!("destroying entity subtree of {} entities", subtree.len());

        for key in subtree {
            if let Some(mut data) = self.entities.remove(key) {
                for slot in &mut data.components {
                    if slot.is_active {
                        slot.component.on_disable();
                    }
                }
            }
        }
        true
    }

    /// Parent of an entity, `None` for roots and stale keys
    pub fn parent(&self, entity: EntityKey) -> Option<EntityKey> {
        self.entities.get(entity).and_then(|data| data.parent)
    }

    /// Children of an entity in attachment order (empty for stale keys)
    pub fn children(&self, entity: EntityKey) -> &[EntityKey] {
        self.entities.get(entity).map_or(&[], |data| &data.children)
    }

    /// Attach `child` under `parent`, reparenting it if it already has a
    /// different parent
    ///
    /// Attaching an entity under one of its own descendants (or itself) is
    /// rejected with [`SceneError::WouldCreateCycle`]. Attaching a child to
    /// its current parent is a no-op.
    pub fn add_child(&mut self, parent: EntityKey, child: EntityKey) -> Result<(), SceneError> {
        if !self.entities.contains_key(parent) || !self.entities.contains_key(child) {
            return Err(SceneError::StaleEntity);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle);
        }
        if self.entities[child].parent == Some(parent) {
            return Ok(());
        }

        if self.entities[child].parent.is_some() {
            debug!("reparenting entity under a new parent");
            self.detach_from_parent(child);
        }

        self.entities[child].parent = Some(parent);
        self.entities[parent].children.push(child);

        // World transform now derives from the new parent chain
        self.mark_subtree_dirty(child);
        Ok(())
    }

    /// Detach `child` from `parent`, turning it into a root
    ///
    /// Detaching never destroys the child; destruction is always explicit via
    /// [`Scene::destroy_entity`]. Returns `false` if `child` is not currently
    /// a child of `parent`.
    pub fn remove_child(&mut self, parent: EntityKey, child: EntityKey) -> bool {
        let is_child = self
            .entities
            .get(child)
            .is_some_and(|data| data.parent == Some(parent));
        if !is_child {
            return false;
        }

        self.entities[parent].children.retain(|&c| c != child);
        self.entities[child].parent = None;
        self.mark_subtree_dirty(child);
        true
    }

    /// Whether `ancestor` appears on `entity`'s parent chain
    fn is_ancestor(&self, ancestor: EntityKey, entity: EntityKey) -> bool {
        let mut current = self.parent(entity);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    fn detach_from_parent(&mut self, entity: EntityKey) {
        if let Some(parent) = self.entities[entity].parent.take() {
            if let Some(parent_data) = self.entities.get_mut(parent) {
                parent_data.children.retain(|&c| c != entity);
            }
        }
    }

    fn collect_subtree(&self, root: EntityKey) -> Vec<EntityKey> {
        let mut subtree = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(data) = self.entities.get(key) {
                subtree.push(key);
                stack.extend(data.children.iter().copied());
            }
        }
        subtree
    }

    // --- activity ------------------------------------------------------

    /// Whether the entity's own active flag is set (`false` for stale keys)
    ///
    /// An entity only participates in updates when every ancestor is active
    /// as well; see [`Scene::active_entities`].
    pub fn is_active(&self, entity: EntityKey) -> bool {
        self.entities.get(entity).is_some_and(|data| data.is_active)
    }

    /// Set the entity's active flag
    ///
    /// Idempotent: setting the current value runs no hooks. On a real change
    /// the entity's active components receive `on_enable`/`on_disable`.
    pub fn set_active(&mut self, entity: EntityKey, active: bool) -> Result<(), SceneError> {
        let data = self.entities.get_mut(entity).ok_or(SceneError::StaleEntity)?;
        if data.is_active == active {
            return Ok(());
        }

        data.is_active = active;
        for slot in &mut data.components {
            if slot.is_active {
                if active {
                    slot.component.on_enable();
                } else {
                    slot.component.on_disable();
                }
            }
        }
        Ok(())
    }

    /// All entities reachable from active roots through active children, in
    /// depth-first order
    pub fn active_entities(&self) -> Vec<EntityKey> {
        let mut order = Vec::new();
        let mut stack: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, data)| data.parent.is_none() && data.is_active)
            .map(|(key, _)| key)
            .collect();

        while let Some(key) = stack.pop() {
            order.push(key);
            if let Some(data) = self.entities.get(key) {
                for &child in data.children.iter().rev() {
                    if self.is_active(child) {
                        stack.push(child);
                    }
                }
            }
        }
        order
    }

    // --- transforms ----------------------------------------------------

    /// Local transform of an entity
    pub fn transform(&self, entity: EntityKey) -> Result<&Transform, SceneError> {
        self.entities
            .get(entity)
            .map(|data| &data.transform)
            .ok_or(SceneError::StaleEntity)
    }

    /// Mutate the local transform through a closure
    ///
    /// The world matrices of the entity and its whole subtree are invalidated
    /// afterwards, so mutation can never leave a stale world matrix behind.
    pub fn edit_transform<R>(
        &mut self,
        entity: EntityKey,
        edit: impl FnOnce(&mut Transform) -> R,
    ) -> Result<R, SceneError> {
        let data = self.entities.get_mut(entity).ok_or(SceneError::StaleEntity)?;
        let result = edit(&mut data.transform);
        self.mark_subtree_dirty(entity);
        Ok(result)
    }

    /// Set the local position
    pub fn set_position(&mut self, entity: EntityKey, position: Vec3) -> Result<(), SceneError> {
        self.edit_transform(entity, |t| t.set_position(position))
    }

    /// Translate the local position
    pub fn translate(&mut self, entity: EntityKey, translation: Vec3) -> Result<(), SceneError> {
        self.edit_transform(entity, |t| t.translate(translation))
    }

    /// Set the local rotation
    pub fn set_rotation(&mut self, entity: EntityKey, rotation: Quat) -> Result<(), SceneError> {
        self.edit_transform(entity, |t| t.set_rotation(rotation))
    }

    /// Set the local scale
    pub fn set_scale(&mut self, entity: EntityKey, scale: Vec3) -> Result<(), SceneError> {
        self.edit_transform(entity, |t| t.set_scale(scale))
    }

    /// World transformation matrix: product of ancestor local matrices
    ///
    /// Returns the cached matrix when valid; a dirty matrix is computed on
    /// the fly without touching the cache (the cache itself is refreshed once
    /// per invalidation during [`Scene::update`]).
    pub fn world_matrix(&self, entity: EntityKey) -> Result<Mat4, SceneError> {
        let data = self.entities.get(entity).ok_or(SceneError::StaleEntity)?;
        if !data.world_dirty {
            return Ok(data.world_matrix);
        }

        let parent_world = match data.parent {
            Some(parent) => self.world_matrix(parent)?,
            None => Mat4::identity(),
        };
        Ok(parent_world * data.transform.local_matrix())
    }

    fn mark_subtree_dirty(&mut self, root: EntityKey) {
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(data) = self.entities.get_mut(key) {
                data.world_dirty = true;
                stack.extend(data.children.iter().copied());
            }
        }
    }

    /// Recompute every invalidated world matrix exactly once, top-down
    fn flush_world_matrices(&mut self) {
        let mut stack: Vec<(EntityKey, Mat4)> = self
            .entities
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(key, _)| (key, Mat4::identity()))
            .collect();

        while let Some((key, parent_world)) = stack.pop() {
            let Some(data) = self.entities.get_mut(key) else {
                continue;
            };
            if data.world_dirty {
                data.world_matrix = parent_world * data.transform.local_matrix();
                data.world_dirty = false;
            }
            let world = data.world_matrix;
            for &child in &data.children {
                stack.push((child, world));
            }
        }
    }

    // --- components ----------------------------------------------------

    /// Attach a component to an entity, returning its stable id
    pub fn add_component<T: ComponentVariant>(
        &mut self,
        entity: EntityKey,
        component: T,
    ) -> Result<ComponentId, SceneError> {
        let data = self.entities.get_mut(entity).ok_or(SceneError::StaleEntity)?;
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        data.components.push(ComponentSlot {
            id,
            is_active: true,
            component: component.into_component(),
        });
        Ok(id)
    }

    /// First component of type `T` on the entity, if any
    pub fn get_component<T: ComponentVariant>(&self, entity: EntityKey) -> Option<&T> {
        self.entities.get(entity)?.components.iter().find_map(|slot| {
            T::from_component(&slot.component)
        })
    }

    /// Mutable access to the first component of type `T`
    pub fn get_component_mut<T: ComponentVariant>(&mut self, entity: EntityKey) -> Option<&mut T> {
        self.entities
            .get_mut(entity)?
            .components
            .iter_mut()
            .find_map(|slot| T::from_component_mut(&mut slot.component))
    }

    /// Component of type `T` with the given id, if present
    pub fn get_component_by_id<T: ComponentVariant>(
        &self,
        entity: EntityKey,
        id: ComponentId,
    ) -> Option<&T> {
        self.entities
            .get(entity)?
            .components
            .iter()
            .filter(|slot| slot.id == id)
            .find_map(|slot| T::from_component(&slot.component))
    }

    /// Mutable component of type `T` with the given id, if present
    pub fn get_component_by_id_mut<T: ComponentVariant>(
        &mut self,
        entity: EntityKey,
        id: ComponentId,
    ) -> Option<&mut T> {
        self.entities
            .get_mut(entity)?
            .components
            .iter_mut()
            .filter(|slot| slot.id == id)
            .find_map(|slot| T::from_component_mut(&mut slot.component))
    }

    /// All components of type `T` on the entity, in insertion order
    pub fn components_of<T: ComponentVariant>(&self, entity: EntityKey) -> Vec<&T> {
        self.entities.get(entity).map_or_else(Vec::new, |data| {
            data.components
                .iter()
                .filter_map(|slot| T::from_component(&slot.component))
                .collect()
        })
    }

    /// Ids of all components of type `T` on the entity, in insertion order
    pub fn component_ids_of<T: ComponentVariant>(&self, entity: EntityKey) -> Vec<ComponentId> {
        self.entities.get(entity).map_or_else(Vec::new, |data| {
            data.components
                .iter()
                .filter(|slot| T::from_component(&slot.component).is_some())
                .map(|slot| slot.id)
                .collect()
        })
    }

    /// Remove the first component of type `T`
    ///
    /// Fires `on_disable` (if the component was active) before it is dropped.
    /// Returns `false` when no component of that type exists; removing twice
    /// is a no-op.
    pub fn remove_component<T: ComponentVariant>(&mut self, entity: EntityKey) -> bool {
        let Some(data) = self.entities.get(entity) else {
            return false;
        };
        let Some(id) = data
            .components
            .iter()
            .find(|slot| T::from_component(&slot.component).is_some())
            .map(|slot| slot.id)
        else {
            return false;
        };
        self.remove_component_by_id(entity, id)
    }

    /// Remove the component with the given id
    ///
    /// Fires `on_disable` (if active) before dropping. Removing an id that is
    /// already gone is a no-op returning `false`.
    pub fn remove_component_by_id(&mut self, entity: EntityKey, id: ComponentId) -> bool {
        let Some(data) = self.entities.get_mut(entity) else {
            return false;
        };
        let Some(index) = data.components.iter().position(|slot| slot.id == id) else {
            return false;
        };

        let mut slot = data.components.remove(index);
        if slot.is_active {
            slot.component.on_disable();
        }
        true
    }

    /// Active flag of a component (`None` if entity or component is gone)
    pub fn component_is_active(&self, entity: EntityKey, id: ComponentId) -> Option<bool> {
        self.entities
            .get(entity)?
            .components
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| slot.is_active)
    }

    /// Set a component's active flag, firing `on_enable`/`on_disable` on a
    /// real change only
    pub fn set_component_active(
        &mut self,
        entity: EntityKey,
        id: ComponentId,
        active: bool,
    ) -> Result<(), SceneError> {
        let data = self.entities.get_mut(entity).ok_or(SceneError::StaleEntity)?;
        let slot = data
            .components
            .iter_mut()
            .find(|slot| slot.id == id)
            .ok_or(SceneError::StaleEntity)?;

        if slot.is_active == active {
            return Ok(());
        }
        slot.is_active = active;
        if active {
            slot.component.on_enable();
        } else {
            slot.component.on_disable();
        }
        Ok(())
    }

    pub(crate) fn component_slots(&self, entity: EntityKey) -> &[ComponentSlot] {
        self.entities.get(entity).map_or(&[], |data| &data.components)
    }

    // --- simulation step -----------------------------------------------

    /// Advance the scene by one frame
    ///
    /// Pipeline: flush world matrices, traverse active entities depth-first,
    /// integrate and resolve every active rigidbody against the collider set,
    /// then flush again so the renderer reads settled world matrices.
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        self.flush_world_matrices();

        let mut bodies: Vec<(EntityKey, ComponentId)> = Vec::new();
        for entity in self.active_entities() {
            for slot in self.component_slots(entity) {
                if slot.is_active && Rigidbody::from_component(&slot.component).is_some() {
                    bodies.push((entity, slot.id));
                }
            }
        }

        // Snapshot of the collider registry; bodies destroyed mid-pass are
        // skipped by the liveness check inside simulate_body
        let colliders = physics.collider_set(self);
        for (entity, body) in bodies {
            physics.simulate_body(self, entity, body, &colliders, dt);
        }

        self.flush_world_matrices();
    }
}
