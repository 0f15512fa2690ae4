//! # Scene Descriptions — Building Hierarchies from JSON
//!
//! A [`SceneDescription`] is a nested, serde-friendly picture of one scene:
//! named nodes, their components as JSON values keyed by short type name,
//! and their children in order.
//!
//! ```json
//! {
//!   "name": "level",
//!   "nodes": [
//!     {
//!       "name": "player",
//!       "components": { "Transform": { "translation": [0, 1, 0], ... } },
//!       "children": [ { "name": "sword" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Components are (de)serialized through a [`SceneRegistry`], which maps a
//! short type name to typed serialize/insert functions. Only registered
//! component types appear in [`SceneRegistry::describe`] output.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ecs::component::short_type_name;
use crate::ecs::{Component, ComponentRef, Entity, Scene, World};
use crate::math::Transform;

// ── Wire format ──────────────────────────────────────────────────────────

/// One scene: a name and its root nodes in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

/// One node with its components and ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
}

// ── Errors ───────────────────────────────────────────────────────────────

/// Errors from loading a scene description.
#[derive(Debug)]
pub enum SceneFileError {
    /// Reading the file failed.
    Io(std::io::Error),
    /// The text is not a valid scene description.
    Json(serde_json::Error),
    /// A node names a component type that is not registered.
    UnknownComponent { node: String, component: String },
    /// A component's JSON does not deserialize into its type.
    InvalidComponent {
        node: String,
        component: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for SceneFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneFileError::Io(e) => write!(f, "scene file read failed: {e}"),
            SceneFileError::Json(e) => write!(f, "scene description is not valid JSON: {e}"),
            SceneFileError::UnknownComponent { node, component } => {
                write!(f, "node \"{node}\" uses unregistered component `{component}`")
            }
            SceneFileError::InvalidComponent {
                node,
                component,
                source,
            } => write!(f, "node \"{node}\": bad `{component}` data: {source}"),
        }
    }
}

impl std::error::Error for SceneFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneFileError::Io(e) => Some(e),
            SceneFileError::Json(e) => Some(e),
            SceneFileError::InvalidComponent { source, .. } => Some(source),
            SceneFileError::UnknownComponent { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SceneFileError {
    fn from(e: serde_json::Error) -> Self {
        SceneFileError::Json(e)
    }
}

impl From<std::io::Error> for SceneFileError {
    fn from(e: std::io::Error) -> Self {
        SceneFileError::Io(e)
    }
}

// ── SceneRegistry ────────────────────────────────────────────────────────

type SerializeFn = fn(ComponentRef<'_>) -> Option<serde_json::Value>;
type InsertFn = fn(&mut World, Entity, &serde_json::Value) -> Result<(), serde_json::Error>;

struct ComponentFns {
    serialize: SerializeFn,
    insert: InsertFn,
}

/// Maps short component type names to typed serialize/insert functions.
pub struct SceneRegistry {
    by_name: HashMap<String, ComponentFns>,
}

impl SceneRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// A registry with the crate's own components ([`Transform`]) registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Transform>();
        registry
    }

    /// Register a component type under its short type name.
    pub fn register<T>(&mut self)
    where
        T: Component + Serialize + DeserializeOwned,
    {
        let fns = ComponentFns {
            serialize: |component| {
                let value = component.downcast_ref::<T>()?;
                serde_json::to_value(value).ok()
            },
            insert: |world, entity, json| {
                let value: T = serde_json::from_value(json.clone())?;
                world.insert(entity, value);
                Ok(())
            },
        };
        self.by_name
            .insert(short_type_name(std::any::type_name::<T>()), fns);
    }

    /// Registered component names, sorted.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Create a new scene from `desc` and spawn its nodes.
    ///
    /// On error the partially built scene is unloaded again and the error
    /// returned; its handle stays invalid.
    pub fn load(&self, world: &mut World, desc: &SceneDescription) -> Result<Scene, SceneFileError> {
        let scene = world.create_scene(&desc.name);
        for node in &desc.nodes {
            if let Err(e) = self.spawn_node(world, scene, None, node) {
                world.unload_scene(scene);
                return Err(e);
            }
        }
        log::debug!(
            "loaded scene \"{}\" ({} roots)",
            desc.name,
            world.root_entities(scene).len()
        );
        Ok(scene)
    }

    /// Parse JSON text and [`load`](Self::load) it.
    pub fn load_str(&self, world: &mut World, json: &str) -> Result<Scene, SceneFileError> {
        let desc: SceneDescription = serde_json::from_str(json)?;
        self.load(world, &desc)
    }

    /// Read a JSON file and [`load`](Self::load) it.
    pub fn load_file(&self, world: &mut World, path: impl AsRef<Path>) -> Result<Scene, SceneFileError> {
        let json = std::fs::read_to_string(path)?;
        self.load_str(world, &json)
    }

    fn spawn_node(
        &self,
        world: &mut World,
        scene: Scene,
        parent: Option<Entity>,
        desc: &NodeDescription,
    ) -> Result<Entity, SceneFileError> {
        let entity = match parent {
            Some(parent) => world.spawn_child(parent, &desc.name, ()),
            None => world.spawn_in(scene, &desc.name, ()),
        };
        for (component, json) in &desc.components {
            let fns = self
                .by_name
                .get(component)
                .ok_or_else(|| SceneFileError::UnknownComponent {
                    node: desc.name.clone(),
                    component: component.clone(),
                })?;
            (fns.insert)(world, entity, json).map_err(|source| SceneFileError::InvalidComponent {
                node: desc.name.clone(),
                component: component.clone(),
                source,
            })?;
        }
        for child in &desc.children {
            self.spawn_node(world, scene, Some(entity), child)?;
        }
        Ok(entity)
    }

    /// Describe a loaded scene. Unregistered components are left out.
    pub fn describe(&self, world: &World, scene: Scene) -> SceneDescription {
        SceneDescription {
            name: world.scene_name(scene).unwrap_or_default().to_string(),
            nodes: world
                .root_entities(scene)
                .iter()
                .map(|&root| self.describe_node(world, root))
                .collect(),
        }
    }

    fn describe_node(&self, world: &World, entity: Entity) -> NodeDescription {
        let components = world
            .components(entity)
            .filter_map(|component| {
                let name = component.short_name();
                let fns = self.by_name.get(&name)?;
                Some((name, (fns.serialize)(component)?))
            })
            .collect();
        NodeDescription {
            name: world.name(entity).unwrap_or_default().to_string(),
            components,
            children: world
                .children(entity)
                .iter()
                .map(|&child| self.describe_node(world, child))
                .collect(),
        }
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
