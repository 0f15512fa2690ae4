//! Structure Dump — Load a level, copy a component, print the hierarchy.
//!
//! Demonstrates scene descriptions, name lookups, the persistent scene,
//! reflective component copies and structure logging.
//!
//! Run with `RUST_LOG=info cargo run -p scenekit --example structure_dump`.

use std::sync::atomic::{AtomicU32, Ordering};

use scenekit::prelude::*;
use serde::{Deserialize, Serialize};

static SPAWNED: AtomicU32 = AtomicU32::new(0);

fn spawned() -> u32 {
    SPAWNED.load(Ordering::Relaxed)
}

fn set_spawned(value: u32) {
    SPAWNED.store(value, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Enemy {
    kind: String,
    health: u32,
    #[serde(skip)]
    aggro_seed: u64,
}

impl_reflect!(Enemy {
    pub kind: String,
    pub health: u32,
    private aggro_seed: u64,
    static spawned: u32 => spawned, set_spawned
});

const LEVEL: &str = r#"{
    "name": "forest",
    "nodes": [
        {
            "name": "player",
            "components": {
                "Transform": { "translation": [0.0, 1.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0], "scale": [1.0, 1.0, 1.0] }
            },
            "children": [ { "name": "camera" } ]
        },
        {
            "name": "spawner",
            "children": [
                { "name": "wolf", "components": { "Enemy": { "kind": "wolf", "health": 30 } } },
                { "name": "empty_slot" }
            ]
        }
    ]
}"#;

fn main() {
    env_logger::init();

    let mut world = World::new();
    let mut registry = SceneRegistry::with_defaults();
    registry.register::<Enemy>();

    let forest = match registry.load_str(&mut world, LEVEL) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };

    // Persistent UI root that survives the level.
    let hud = world.spawn("hud", ());
    world.mark_persistent(hud);
    world.spawn_child(hud, "minimap", ());
    let persistent = persistent_scene(&mut world);

    // "camera" is not a root: found through the global fallback.
    let camera = find_in_scene(&world, forest, "camera");
    log::info!("camera: {:?}", camera);
    let minimap = find_in_subtree(&world, find_in_scene(&world, persistent, "hud"), "minimap");
    log::info!("minimap: {:?}", minimap);

    let spawner = find_in_scene(&world, forest, "spawner");
    let (Some(wolf), Some(slot)) = (
        find_in_subtree(&world, spawner, "wolf"),
        find_in_subtree(&world, spawner, "empty_slot"),
    ) else {
        log::error!("level is missing its spawner slots");
        return;
    };
    if let Some(enemy) = world.get_mut::<Enemy>(wolf) {
        enemy.aggro_seed = 7;
    }
    set_spawned(1);

    let options = CopyOptions::new().private_fields(true).static_fields(true);
    if let Some((enemy, report)) = copy_from::<Enemy>(&mut world, wolf, slot, options) {
        log::info!("copied {:?} onto {}: {:?}", report.copied(), report.target, enemy);
    }

    log_scene(&world, forest, &mut LogTarget);
    log_scene(&world, persistent, &mut LogTarget);
    log_subtree(&world, slot, "", &mut LogTarget);

    match serde_json::to_string_pretty(&registry.describe(&world, forest)) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("describe failed: {e}"),
    }
}
