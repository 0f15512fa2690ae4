//! Convenience re-exports: `use scenekit::prelude::*` for the common items.

// Host world
pub use crate::ecs::{Bundle, Component, ComponentRef, Entity, Scene, World};
pub use crate::math::{Quat, Transform, Vec3};

// Helpers
pub use crate::copy::{CopyOptions, CopyReport, FieldOutcome, copy_from, copy_onto};
pub use crate::dump::{
    DumpOptions, LogSink, LogTarget, log_scene, log_scene_with, log_subtree, log_subtree_with,
};
pub use crate::persistent::persistent_scene;
pub use crate::reflect::{FieldError, FieldFilter, FieldInfo, FieldValue, Reflect, Storage, Visibility};
pub use crate::search::{find_in_scene, find_in_subtree, find_path};
pub use crate::impl_reflect;

// Scene descriptions (feature-gated)
#[cfg(feature = "scene-files")]
pub use crate::scene_file::{NodeDescription, SceneDescription, SceneFileError, SceneRegistry};
