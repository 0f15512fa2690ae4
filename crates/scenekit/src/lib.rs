//! # Scenekit — Scene-Graph Helpers
//!
//! Small utilities on top of a scene-graph object model: find nodes by name,
//! reach the persistent scene, copy a component's fields onto another node,
//! and dump a hierarchy as indented text through the `log` facade.
//!
//! Start with `use scenekit::prelude::*`.
//!
//! ## Module Overview
//!
//! - [`ecs`]: The host world of entities, named nodes, components and scenes
//! - [`search`]: Name lookups over scenes and subtrees
//! - [`persistent`]: Access to the scene that survives unloads
//! - [`reflect`]: Field-level reflection used by the cloner
//! - [`copy`]: Copy a component's fields onto another node
//! - [`dump`]: Indented structure logging
//! - `scene_file`: JSON scene descriptions (feature `scene-files`)

pub mod copy;
pub mod dump;
pub mod ecs;
pub mod math;
pub mod persistent;
pub mod prelude;
pub mod reflect;
pub mod search;

#[cfg(feature = "scene-files")]
pub mod scene_file;
