//! Access to the persistent ("do-not-destroy") scene.
//!
//! The world has no accessor for the scene that holds persistent roots. The
//! only way to learn its handle is to put something in it and ask where it
//! went, which is what [`persistent_scene`] does.

use crate::ecs::{Scene, World};

const PROBE_NAME: &str = "__persistent_scene_probe";

/// Handle to the scene holding persistent roots.
///
/// Spawns a throwaway root, marks it persistent, reads its scene and
/// despawns it again. The node count, the active scene and the set of loaded
/// scenes are the same before and after, except that the first call creates
/// the persistent scene itself.
pub fn persistent_scene(world: &mut World) -> Scene {
    let probe = world.spawn_root_without_default(PROBE_NAME, ());
    world.mark_persistent(probe);
    let scene = world.scene_of(probe);
    world.despawn(probe);
    log::trace!("persistent scene resolved to {:?}", scene);
    // A freshly spawned root is alive and has a scene until despawned.
    match scene {
        Some(scene) => scene,
        None => unreachable!("probe node vanished before its scene was read"),
    }
}
