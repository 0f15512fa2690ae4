//! # Component Copy — Reflective Field-by-Field Cloning
//!
//! [`copy_onto`] attaches a fresh, default-initialized `T` to a target node
//! and then copies the source's reflected fields onto it one by one:
//!
//! ```text
//! source: &T ──read_field──▶ snapshots ──attach T::default()──▶ target
//!                                 │                                │
//!                                 └─────────write_field────────────┘
//! ```
//!
//! Snapshots are taken before the world is touched, so the source may live
//! in the same world (see [`copy_from`]).
//!
//! The copy is shallow: an `Arc` field ends up pointing at the same value in
//! both components. Static fields are read from and written back to the same
//! process-wide storage; they are reported as [`FieldOutcome::SharedStatic`].
//! Rejected writes never abort the copy and are never rolled back: they are
//! logged at `debug` level and recorded as [`FieldOutcome::Skipped`].

use crate::ecs::{Entity, World};
use crate::reflect::{FieldError, FieldFilter, FieldInfo, FieldValue, Reflect, Storage};

/// Which fields to copy. Public instance fields are always copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub include_private: bool,
    pub include_static: bool,
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also copy non-public fields.
    pub fn private_fields(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    /// Also "copy" static fields (rewrites the shared value onto itself).
    pub fn static_fields(mut self, include: bool) -> Self {
        self.include_static = include;
        self
    }

    fn filter(self) -> FieldFilter {
        FieldFilter {
            include_private: self.include_private,
            include_static: self.include_static,
        }
    }
}

/// What happened to one field during a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The value now lives on the new instance.
    Copied,
    /// A static field: the shared value was read and written back.
    SharedStatic,
    /// The write was rejected; the field keeps its default value.
    Skipped(FieldError),
}

/// Per-field record of one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCopy {
    pub name: &'static str,
    pub outcome: FieldOutcome,
}

/// Result of [`copy_onto`] / [`copy_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// The node the new component was attached to.
    pub target: Entity,
    /// Every selected field, in declaration order.
    pub fields: Vec<FieldCopy>,
}

impl CopyReport {
    /// Names of the instance fields whose values were copied.
    pub fn copied(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.outcome == FieldOutcome::Copied)
            .map(|f| f.name)
            .collect()
    }

    /// Fields whose write was rejected, with the reason.
    pub fn skipped(&self) -> Vec<(&'static str, &FieldError)> {
        self.fields
            .iter()
            .filter_map(|f| match &f.outcome {
                FieldOutcome::Skipped(err) => Some((f.name, err)),
                _ => None,
            })
            .collect()
    }

    /// True when no field was skipped.
    pub fn is_complete(&self) -> bool {
        self.fields
            .iter()
            .all(|f| !matches!(f.outcome, FieldOutcome::Skipped(_)))
    }
}

/// A field value read off the source, waiting to be written.
struct Snapshot {
    field: &'static FieldInfo,
    value: Option<FieldValue>,
}

fn snapshot<T: Reflect>(source: &T, options: CopyOptions) -> Vec<Snapshot> {
    T::select_fields(options.filter())
        .into_iter()
        .map(|field| Snapshot {
            field,
            value: source.read_field(field.name),
        })
        .collect()
}

/// Attach a default `T` to `target` and copy `source`'s selected fields onto
/// it. An existing `T` on the target is replaced.
///
/// Returns the newly attached instance together with the per-field report,
/// or `None` if `target` is dead.
pub fn copy_onto<'w, T: Reflect + Default>(
    world: &'w mut World,
    source: &T,
    target: Entity,
    options: CopyOptions,
) -> Option<(&'w T, CopyReport)> {
    let snapshots = snapshot(source, options);
    write_snapshots::<T>(world, snapshots, target)
}

/// Like [`copy_onto`], reading the source component off `source` in the same
/// world. Returns `None` if `source` has no `T` or either node is dead.
pub fn copy_from<'w, T: Reflect + Default>(
    world: &'w mut World,
    source: Entity,
    target: Entity,
    options: CopyOptions,
) -> Option<(&'w T, CopyReport)> {
    let snapshots = snapshot(world.get::<T>(source)?, options);
    write_snapshots::<T>(world, snapshots, target)
}

fn write_snapshots<'w, T: Reflect + Default>(
    world: &'w mut World,
    snapshots: Vec<Snapshot>,
    target: Entity,
) -> Option<(&'w T, CopyReport)> {
    if !world.is_alive(target) {
        return None;
    }
    world.insert(target, T::default());
    let component = world.get_mut::<T>(target)?;

    let mut fields = Vec::with_capacity(snapshots.len());
    for Snapshot { field, value } in snapshots {
        let result = match value {
            Some(value) => component.write_field(field.name, value),
            None => Err(FieldError::NoSuchField {
                owner: std::any::type_name::<T>(),
                field: field.name.to_string(),
            }),
        };
        let outcome = match result {
            Ok(()) if field.storage == Storage::Static => FieldOutcome::SharedStatic,
            Ok(()) => FieldOutcome::Copied,
            Err(err) => {
                log::debug!(
                    "skipped field `{}` while copying `{}` onto {:?}: {}",
                    field.name,
                    std::any::type_name::<T>(),
                    target,
                    err
                );
                FieldOutcome::Skipped(err)
            }
        };
        fields.push(FieldCopy {
            name: field.name,
            outcome,
        });
    }

    let component: &'w T = component;
    Some((component, CopyReport { target, fields }))
}
