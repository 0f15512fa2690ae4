//! # World — The Host Object Model
//!
//! The [`World`] owns every node, every component and every scene. The
//! helper modules ([`search`](crate::search), [`copy`](crate::copy),
//! [`dump`](crate::dump), [`persistent`](crate::persistent)) only go through
//! its public API, the same way they would sit on top of a third-party engine.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ World                                                    │
//! │                                                          │
//! │  allocator: generational entity ids                      │
//! │                                                          │
//! │  nodes: HashMap<u32, NodeRecord>                         │
//! │    name, parent, ordered children,                       │
//! │    ordered component slots, owning scene                 │
//! │                                                          │
//! │  scenes: SceneTable                                      │
//! │    name, loaded flag, ordered roots                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Children are stored in insertion order and components in attach order;
//! both orders are what traversal and dumps observe.

use std::collections::HashMap;

use super::component::{Bundle, Component, ComponentRef, ComponentSlot, upsert_slot};
use super::entity::{Entity, EntityAllocator};
use super::scene::{DEFAULT_SCENE_NAME, Scene, SceneTable};

/// Everything the world knows about one live node.
pub(crate) struct NodeRecord {
    name: String,
    parent: Option<Entity>,
    children: Vec<Entity>,
    components: Vec<ComponentSlot>,
    scene: Scene,
}

/// The central container for nodes, components and scenes.
pub struct World {
    allocator: EntityAllocator,
    nodes: HashMap<u32, NodeRecord>,
    scenes: SceneTable,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            nodes: HashMap::new(),
            scenes: SceneTable::new(),
        }
    }

    // ── Scenes ───────────────────────────────────────────────────────

    /// Create a new, loaded scene. The first scene created becomes active.
    pub fn create_scene(&mut self, name: &str) -> Scene {
        let scene = self.scenes.create(name);
        if self.scenes.active().is_none() {
            self.scenes.set_active(Some(scene));
        }
        log::debug!("created scene \"{}\" ({:?})", name, scene);
        scene
    }

    /// The scene new roots are spawned into. Creates a scene named `"Main"`
    /// if nothing is active yet.
    pub fn active_scene(&mut self) -> Scene {
        match self.scenes.active() {
            Some(scene) => scene,
            None => self.create_scene(DEFAULT_SCENE_NAME),
        }
    }

    /// Make `scene` the target of [`spawn`](Self::spawn).
    ///
    /// # Panics
    ///
    /// Panics if the scene is not loaded.
    pub fn set_active_scene(&mut self, scene: Scene) {
        assert!(
            self.is_scene_valid(scene),
            "Cannot activate unloaded scene {:?}",
            scene
        );
        self.scenes.set_active(Some(scene));
    }

    /// True while the scene is loaded.
    pub fn is_scene_valid(&self, scene: Scene) -> bool {
        self.scenes.loaded(scene).is_some()
    }

    /// The scene's name. Unloaded scenes keep their name.
    pub fn scene_name(&self, scene: Scene) -> Option<&str> {
        self.scenes.slot(scene).map(|slot| slot.name.as_str())
    }

    /// Root entities of a loaded scene, in spawn order. Empty for invalid
    /// scenes.
    pub fn root_entities(&self, scene: Scene) -> &[Entity] {
        self.scenes
            .loaded(scene)
            .map(|slot| slot.roots.as_slice())
            .unwrap_or(&[])
    }

    /// Loaded scenes in lookup order (creation order, persistent scene last).
    pub fn loaded_scenes(&self) -> Vec<Scene> {
        self.scenes.loaded_in_lookup_order().collect()
    }

    /// Despawn every root of `scene` and mark it unloaded.
    ///
    /// Returns `false` if the scene was already unloaded, or if it is the
    /// persistent scene, which cannot be unloaded.
    pub fn unload_scene(&mut self, scene: Scene) -> bool {
        if self.scenes.is_persistent(scene) {
            log::warn!("refusing to unload the persistent scene");
            return false;
        }
        let Some(slot) = self.scenes.loaded_mut(scene) else {
            return false;
        };
        let roots = std::mem::take(&mut slot.roots);
        slot.loaded = false;
        for root in roots {
            self.despawn(root);
        }
        if self.scenes.active() == Some(scene) {
            self.scenes.set_active(None);
        }
        log::debug!("unloaded scene {:?}", scene);
        true
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn a root node in the active scene.
    pub fn spawn<B: Bundle>(&mut self, name: &str, bundle: B) -> Entity {
        let scene = self.active_scene();
        self.spawn_in(scene, name, bundle)
    }

    /// Spawn a root in the active scene, or straight into the persistent
    /// scene when nothing is active. Never creates the `"Main"` scene.
    pub(crate) fn spawn_root_without_default<B: Bundle>(&mut self, name: &str, bundle: B) -> Entity {
        let scene = match self.scenes.active() {
            Some(scene) => scene,
            None => self.scenes.persistent_or_create(),
        };
        self.spawn_in(scene, name, bundle)
    }

    /// Spawn a root node in a specific scene.
    ///
    /// # Panics
    ///
    /// Panics if the scene is not loaded.
    pub fn spawn_in<B: Bundle>(&mut self, scene: Scene, name: &str, bundle: B) -> Entity {
        assert!(
            self.is_scene_valid(scene),
            "Cannot spawn \"{}\" into unloaded scene {:?}",
            name,
            scene
        );
        let entity = self.allocate_node(name, None, scene, bundle);
        if let Some(slot) = self.scenes.loaded_mut(scene) {
            slot.roots.push(entity);
        }
        entity
    }

    /// Spawn a node as the last child of `parent`. The child joins the
    /// parent's scene.
    ///
    /// # Panics
    ///
    /// Panics if the parent is not alive.
    pub fn spawn_child<B: Bundle>(&mut self, parent: Entity, name: &str, bundle: B) -> Entity {
        let scene = match self.record(parent) {
            Some(record) => record.scene,
            None => panic!("Cannot spawn child \"{}\" on dead parent {:?}", name, parent),
        };
        let child = self.allocate_node(name, Some(parent), scene, bundle);
        if let Some(record) = self.record_mut(parent) {
            record.children.push(child);
        }
        child
    }

    fn allocate_node<B: Bundle>(
        &mut self,
        name: &str,
        parent: Option<Entity>,
        scene: Scene,
        bundle: B,
    ) -> Entity {
        let entity = self.allocator.allocate();
        let mut components = Vec::new();
        bundle.push_into(&mut components);
        self.nodes.insert(
            entity.index,
            NodeRecord {
                name: name.to_string(),
                parent,
                children: Vec::new(),
                components,
                scene,
            },
        );
        entity
    }

    /// Despawn a node and its whole subtree, unlinking it from its parent or
    /// from its scene's root list.
    ///
    /// Returns `true` if the node was alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some(record) = self.record(entity) else {
            return false;
        };
        let (parent, scene) = (record.parent, record.scene);

        match parent {
            Some(parent) => {
                if let Some(parent_record) = self.record_mut(parent) {
                    parent_record.children.retain(|&c| c != entity);
                }
            }
            None => {
                if let Some(slot) = self.scenes.loaded_mut(scene) {
                    slot.roots.retain(|&r| r != entity);
                }
            }
        }

        // Collect the subtree breadth-first, then free everything.
        let mut to_despawn = vec![entity];
        let mut i = 0;
        while i < to_despawn.len() {
            if let Some(record) = self.record(to_despawn[i]) {
                to_despawn.extend_from_slice(&record.children);
            }
            i += 1;
        }
        for e in to_despawn {
            self.nodes.remove(&e.index);
            self.allocator.deallocate(e);
        }
        true
    }

    /// Number of live nodes across all scenes.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.record(entity).map(|r| r.name.as_str())
    }

    /// Rename a node. Returns `false` if the node is dead.
    pub fn set_name(&mut self, entity: Entity, name: &str) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                record.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.record(entity).and_then(|r| r.parent)
    }

    /// Children in insertion order. Empty for dead nodes.
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.record(entity)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, entity: Entity) -> usize {
        self.children(entity).len()
    }

    pub fn child(&self, entity: Entity, index: usize) -> Option<Entity> {
        self.children(entity).get(index).copied()
    }

    /// The scene a node belongs to.
    pub fn scene_of(&self, entity: Entity) -> Option<Scene> {
        self.record(entity).map(|r| r.scene)
    }

    /// Move a root node, with its subtree, into the persistent scene so that
    /// unloading its original scene leaves it alive.
    ///
    /// Only roots can be made persistent; for a child this logs a warning and
    /// does nothing. Returns `true` if the node is persistent afterwards.
    pub fn mark_persistent(&mut self, entity: Entity) -> bool {
        let Some(record) = self.record(entity) else {
            return false;
        };
        if record.parent.is_some() {
            log::warn!(
                "mark_persistent only works on root nodes; \"{}\" has a parent",
                record.name
            );
            return false;
        }
        let old_scene = record.scene;
        let persistent = self.scenes.persistent_or_create();
        if old_scene == persistent {
            return true;
        }

        if let Some(slot) = self.scenes.loaded_mut(old_scene) {
            slot.roots.retain(|&r| r != entity);
        }
        if let Some(slot) = self.scenes.loaded_mut(persistent) {
            slot.roots.push(entity);
        }

        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            if let Some(record) = self.record_mut(current) {
                record.scene = persistent;
                stack.extend_from_slice(&record.children);
            }
        }
        true
    }

    /// Global by-name lookup over every loaded scene.
    ///
    /// Scenes are visited in creation order (persistent scene last); each is
    /// walked pre-order across its roots. First exact match wins.
    pub fn find_global(&self, name: &str) -> Option<Entity> {
        self.scenes.loaded_in_lookup_order().find_map(|scene| {
            let mut stack: Vec<Entity> = self.root_entities(scene).iter().rev().copied().collect();
            while let Some(entity) = stack.pop() {
                let Some(record) = self.record(entity) else {
                    continue;
                };
                if record.name == name {
                    return Some(entity);
                }
                stack.extend(record.children.iter().rev().copied());
            }
            None
        })
    }

    // ── Components ───────────────────────────────────────────────────

    /// Get a component on a node. `None` if the node is dead or lacks it.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.record(entity)?
            .components
            .iter()
            .find_map(|slot| slot.get::<T>())
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.record_mut(entity)?
            .components
            .iter_mut()
            .find_map(|slot| slot.get_mut::<T>())
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Attach a component. If the node already has one of this type it is
    /// replaced in place, keeping its position in attach order.
    ///
    /// # Panics
    ///
    /// Panics if the node is dead.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        let Some(record) = self.record_mut(entity) else {
            panic!(
                "Cannot insert component `{}` on dead entity {:?}",
                std::any::type_name::<T>(),
                entity
            );
        };
        upsert_slot(&mut record.components, ComponentSlot::new(component));
    }

    /// Detach a component. Returns `true` if it was present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        let Some(record) = self.record_mut(entity) else {
            return false;
        };
        let before = record.components.len();
        record
            .components
            .retain(|slot| slot.type_id != std::any::TypeId::of::<T>());
        record.components.len() != before
    }

    /// Every component on a node, in attach order.
    pub fn components(&self, entity: Entity) -> impl Iterator<Item = ComponentRef<'_>> {
        self.record(entity)
            .map(|r| r.components.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(ComponentRef::new)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn record(&self, entity: Entity) -> Option<&NodeRecord> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get(&entity.index)
    }

    fn record_mut(&mut self, entity: Entity) -> Option<&mut NodeRecord> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get_mut(&entity.index)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
