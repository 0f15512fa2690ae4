//! # Tree Search — Finding Nodes by Name
//!
//! Name lookups over the scene graph. Matching is exact and case-sensitive;
//! names are not unique, so every function defines which match wins.
//!
//! - [`find_in_scene`]: a scene's roots, then a global fallback
//! - [`find_in_subtree`]: pre-order depth-first search below a node
//! - [`find_path`]: `"a/b/c"` resolved one child level at a time

use crate::ecs::{Entity, Scene, World};

/// Find a node named `name` among `scene`'s roots.
///
/// Roots are checked in order and the first match wins. If no root matches,
/// the world-wide [`World::find_global`] lookup runs once, so the result may
/// live deeper in this scene or in another loaded scene. A scene without
/// roots skips the fallback. Invalid scenes always return `None`.
pub fn find_in_scene(world: &World, scene: Scene, name: &str) -> Option<Entity> {
    if !world.is_scene_valid(scene) {
        return None;
    }
    let roots = world.root_entities(scene);
    if let Some(&root) = roots.iter().find(|&&root| world.name(root) == Some(name)) {
        return Some(root);
    }
    if roots.is_empty() {
        return None;
    }
    world.find_global(name)
}

/// Pre-order depth-first search below `node` (the node itself is not
/// considered).
///
/// At each level the children are scanned left to right. A matching child is
/// returned immediately; otherwise its subtree is searched before moving on
/// to the next sibling. Returns `None` for an absent or dead `node`.
pub fn find_in_subtree(world: &World, node: Option<Entity>, name: &str) -> Option<Entity> {
    let node = node.filter(|&n| world.is_alive(n))?;
    for &child in world.children(node) {
        if world.name(child) == Some(name) {
            return Some(child);
        }
        if let Some(found) = find_in_subtree(world, Some(child), name) {
            return Some(found);
        }
    }
    None
}

/// Resolve a `/`-separated path of child names starting at `node`.
///
/// Each segment picks the first direct child with that name. Empty segments
/// are ignored, so `""` resolves to `node` itself.
pub fn find_path(world: &World, node: Entity, path: &str) -> Option<Entity> {
    if !world.is_alive(node) {
        return None;
    }
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(node, |current, segment| {
            world
                .children(current)
                .iter()
                .copied()
                .find(|&child| world.name(child) == Some(segment))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;

    /// root
    /// ├── a
    /// │   └── Target      (pre-order #1)
    /// └── b
    ///     ├── b0
    ///     ├── b1
    ///     └── Target      (third child of the second child)
    fn build(world: &mut World) -> (Entity, Entity, Entity) {
        let root = world.spawn("root", (Transform::default(),));
        let a = world.spawn_child(root, "a", ());
        let early = world.spawn_child(a, "Target", ());
        let b = world.spawn_child(root, "b", ());
        world.spawn_child(b, "b0", ());
        world.spawn_child(b, "b1", ());
        let late = world.spawn_child(b, "Target", ());
        (root, early, late)
    }

    #[test]
    fn subtree_finds_third_child_of_second_child() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        world.spawn_child(root, "first", ());
        let second = world.spawn_child(root, "second", ());
        world.spawn_child(second, "x", ());
        world.spawn_child(second, "y", ());
        let target = world.spawn_child(second, "Target", ());

        assert_eq!(find_in_subtree(&world, Some(root), "Target"), Some(target));
    }

    #[test]
    fn subtree_earliest_preorder_match_wins() {
        let mut world = World::new();
        let (root, early, late) = build(&mut world);
        assert_eq!(find_in_subtree(&world, Some(root), "Target"), Some(early));

        world.despawn(early);
        assert_eq!(find_in_subtree(&world, Some(root), "Target"), Some(late));
    }

    #[test]
    fn subtree_prefers_deep_match_in_earlier_sibling() {
        // A grandchild under the first child beats a direct child that comes
        // later: the search recurses before moving to the next sibling.
        let mut world = World::new();
        let root = world.spawn("root", ());
        let first = world.spawn_child(root, "first", ());
        let deep = world.spawn_child(first, "hit", ());
        let _shallow = world.spawn_child(root, "hit", ());
        assert_eq!(find_in_subtree(&world, Some(root), "hit"), Some(deep));
    }

    #[test]
    fn subtree_does_not_match_start_node() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        assert_eq!(find_in_subtree(&world, Some(root), "root"), None);
    }

    #[test]
    fn subtree_absent_or_dead_node_is_not_found() {
        let mut world = World::new();
        let (root, _, _) = build(&mut world);
        assert_eq!(find_in_subtree(&world, None, "Target"), None);
        world.despawn(root);
        assert_eq!(find_in_subtree(&world, Some(root), "Target"), None);
    }

    #[test]
    fn subtree_match_is_case_sensitive() {
        let mut world = World::new();
        let (root, _, _) = build(&mut world);
        assert_eq!(find_in_subtree(&world, Some(root), "target"), None);
    }

    #[test]
    fn scene_matches_roots_in_order() {
        let mut world = World::new();
        let scene = world.create_scene("level");
        let _first = world.spawn_in(scene, "player", ());
        let dup = world.spawn_in(scene, "enemy", ());
        let _dup2 = world.spawn_in(scene, "enemy", ());
        assert_eq!(find_in_scene(&world, scene, "enemy"), Some(dup));
    }

    #[test]
    fn scene_falls_back_to_global_lookup() {
        let mut world = World::new();
        let level = world.create_scene("level");
        let other = world.create_scene("other");
        let root = world.spawn_in(level, "root", ());
        let nested = world.spawn_child(root, "door", ());
        let elsewhere = world.spawn_in(other, "lamp", ());

        assert_eq!(find_in_scene(&world, level, "door"), Some(nested));
        assert_eq!(find_in_scene(&world, level, "lamp"), Some(elsewhere));
        assert_eq!(find_in_scene(&world, level, "missing"), None);
    }

    #[test]
    fn invalid_scene_is_never_found() {
        let mut world = World::new();
        let level = world.create_scene("level");
        let other = world.create_scene("other");
        world.spawn_in(level, "root", ());
        world.spawn_in(other, "root", ());
        world.unload_scene(level);

        assert_eq!(find_in_scene(&world, level, "root"), None);
        assert_eq!(find_in_scene(&world, level, "anything"), None);
    }

    #[test]
    fn empty_scene_skips_global_fallback() {
        let mut world = World::new();
        let empty = world.create_scene("empty");
        let other = world.create_scene("other");
        world.spawn_in(other, "lamp", ());
        assert_eq!(find_in_scene(&world, empty, "lamp"), None);
    }

    #[test]
    fn path_walks_direct_children() {
        let mut world = World::new();
        let (root, _, late) = build(&mut world);
        assert_eq!(find_path(&world, root, "b/Target"), Some(late));
        assert_eq!(find_path(&world, root, ""), Some(root));
        assert_eq!(find_path(&world, root, "/b//Target/"), Some(late));
        assert_eq!(find_path(&world, root, "Target"), None);
        assert_eq!(find_path(&world, root, "b/missing"), None);
    }
}
