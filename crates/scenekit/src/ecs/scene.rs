//! # Scenes — Named Containers of Root Nodes
//!
//! A [`Scene`] is a copyable handle into the world's scene table. Each slot
//! keeps the scene's name, whether it is still loaded, and its root entities
//! in spawn order. Unloading keeps the slot around so stale handles report
//! "invalid" rather than pointing at a different scene.
//!
//! One slot is special: the persistent scene that holds roots marked with
//! [`World::mark_persistent`](super::world::World::mark_persistent). It is
//! created on first use, never unloaded, and has no public accessor on the
//! world.

use super::entity::Entity;

/// Name given to the scene that holds persistent roots.
pub const PERSISTENT_SCENE_NAME: &str = "DontDestroyOnLoad";

/// Name given to the scene created on demand when nothing is active.
pub const DEFAULT_SCENE_NAME: &str = "Main";

/// Handle to a scene in a [`World`](super::world::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scene {
    pub(crate) id: u32,
}

impl Scene {
    /// Position of the scene in the world's scene table (creation order).
    pub fn id(self) -> u32 {
        self.id
    }
}

pub(crate) struct SceneSlot {
    pub(crate) name: String,
    pub(crate) loaded: bool,
    pub(crate) roots: Vec<Entity>,
}

pub(crate) struct SceneTable {
    slots: Vec<SceneSlot>,
    active: Option<Scene>,
    persistent: Option<Scene>,
}

impl SceneTable {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            active: None,
            persistent: None,
        }
    }

    pub fn create(&mut self, name: &str) -> Scene {
        let scene = Scene {
            id: self.slots.len() as u32,
        };
        self.slots.push(SceneSlot {
            name: name.to_string(),
            loaded: true,
            roots: Vec::new(),
        });
        scene
    }

    /// Slot for a scene, loaded or not.
    pub fn slot(&self, scene: Scene) -> Option<&SceneSlot> {
        self.slots.get(scene.id as usize)
    }

    /// Slot for a loaded scene.
    pub fn loaded(&self, scene: Scene) -> Option<&SceneSlot> {
        self.slot(scene).filter(|slot| slot.loaded)
    }

    pub fn loaded_mut(&mut self, scene: Scene) -> Option<&mut SceneSlot> {
        self.slots
            .get_mut(scene.id as usize)
            .filter(|slot| slot.loaded)
    }

    pub fn active(&self) -> Option<Scene> {
        self.active
    }

    pub fn set_active(&mut self, scene: Option<Scene>) {
        self.active = scene;
    }

    pub fn is_persistent(&self, scene: Scene) -> bool {
        self.persistent == Some(scene)
    }

    pub fn persistent_or_create(&mut self) -> Scene {
        if let Some(scene) = self.persistent {
            return scene;
        }
        let scene = self.create(PERSISTENT_SCENE_NAME);
        self.persistent = Some(scene);
        scene
    }

    /// Loaded scenes in creation order, with the persistent scene last.
    pub fn loaded_in_lookup_order(&self) -> impl Iterator<Item = Scene> + '_ {
        let ordinary = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.loaded)
            .map(|(id, _)| Scene { id: id as u32 })
            .filter(|&scene| !self.is_persistent(scene));
        ordinary.chain(self.persistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_scenes_are_loaded() {
        let mut table = SceneTable::new();
        let a = table.create("a");
        let b = table.create("b");
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert!(table.loaded(a).is_some());
        assert_eq!(table.slot(b).map(|s| s.name.as_str()), Some("b"));
    }

    #[test]
    fn persistent_scene_is_created_once_and_ordered_last() {
        let mut table = SceneTable::new();
        let a = table.create("a");
        let persistent = table.persistent_or_create();
        let b = table.create("b");
        assert_eq!(table.persistent_or_create(), persistent);
        let order: Vec<_> = table.loaded_in_lookup_order().collect();
        assert_eq!(order, vec![a, b, persistent]);
    }

    #[test]
    fn unloaded_scenes_are_skipped() {
        let mut table = SceneTable::new();
        let a = table.create("a");
        let b = table.create("b");
        if let Some(slot) = table.loaded_mut(a) {
            slot.loaded = false;
        }
        assert!(table.loaded(a).is_none());
        assert!(table.slot(a).is_some());
        assert_eq!(table.loaded_in_lookup_order().collect::<Vec<_>>(), vec![b]);
    }
}
