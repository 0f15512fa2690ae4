//! # Host Object Model
//!
//! A small scene-graph runtime: generational [`Entity`] handles, named nodes
//! with ordered children and components, and [`Scene`]s holding ordered
//! roots. The helper modules of this crate are written purely against this
//! API.
//!
//! ## Module Overview
//!
//! - [`entity`]: Generational entity ids
//! - [`component`]: Type-erased per-node component slots and spawn bundles
//! - [`scene`]: Scene handles and the scene table
//! - [`world`]: The container tying nodes, components and scenes together

pub(crate) mod component;
pub mod entity;
pub mod scene;
pub mod world;

pub use component::{Bundle, Component, ComponentRef};
pub use entity::Entity;
pub use scene::Scene;
pub use world::World;
