//! # Component — Type-Erased Per-Node Storage
//!
//! Every node keeps its components in a small ordered list of
//! [`ComponentSlot`]s. A slot holds the boxed value together with its
//! `TypeId`, its full type name and a formatter captured at insert time, so the
//! structure logger can print any component without a registry.
//!
//! Slots stay in attach order. Replacing a component keeps its position.

use std::any::{Any, TypeId};
use std::fmt;

/// Anything that can be attached to a node.
///
/// Blanket-implemented: plain data that is `'static + Send + Sync + Debug`
/// qualifies. The `Debug` output doubles as the component's string form in
/// structure dumps.
pub trait Component: Any + Send + Sync + fmt::Debug {}

impl<T: Any + Send + Sync + fmt::Debug> Component for T {}

/// One attached component, type-erased.
pub struct ComponentSlot {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) value: Box<dyn Any + Send + Sync>,
    describe: fn(&dyn Any) -> String,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
            describe: |any| match any.downcast_ref::<T>() {
                Some(value) => format!("{value:?}"),
                None => "<downcast failed>".to_string(),
            },
        }
    }

    pub(crate) fn get<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub(crate) fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut()
    }
}

/// Insert `slot` into `slots`, replacing an existing slot of the same type in
/// place. Returns `true` if a slot was replaced.
pub(crate) fn upsert_slot(slots: &mut Vec<ComponentSlot>, slot: ComponentSlot) -> bool {
    if let Some(existing) = slots.iter_mut().find(|s| s.type_id == slot.type_id) {
        *existing = slot;
        true
    } else {
        slots.push(slot);
        false
    }
}

/// A read-only view of one attached component, as yielded by
/// [`World::components`](super::world::World::components).
#[derive(Clone, Copy)]
pub struct ComponentRef<'w> {
    slot: &'w ComponentSlot,
}

impl<'w> ComponentRef<'w> {
    pub(crate) fn new(slot: &'w ComponentSlot) -> Self {
        Self { slot }
    }

    pub fn type_id(&self) -> TypeId {
        self.slot.type_id
    }

    /// Fully qualified type name, e.g. `scenekit::math::Transform`.
    pub fn type_name(&self) -> &'static str {
        self.slot.type_name
    }

    /// Type name without module path, e.g. `Transform` or `Vec<Item>`.
    pub fn short_name(&self) -> String {
        short_type_name(self.slot.type_name)
    }

    /// The component's `Debug` representation.
    pub fn describe(&self) -> String {
        (self.slot.describe)(&*self.slot.value)
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&'w T> {
        self.slot.get::<T>()
    }
}

impl fmt::Debug for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("type_name", &self.slot.type_name)
            .finish()
    }
}

/// A set of components spawned together: `()` or a tuple of up to eight
/// components.
pub trait Bundle {
    fn push_into(self, slots: &mut Vec<ComponentSlot>);
}

impl Bundle for () {
    fn push_into(self, _slots: &mut Vec<ComponentSlot>) {}
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn push_into(self, slots: &mut Vec<ComponentSlot>) {
                let ($($name,)+) = self;
                $(upsert_slot(slots, ComponentSlot::new($name));)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);

/// Strip module paths from a type name, generics included:
/// `alloc::vec::Vec<my::Item>` → `Vec<Item>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            out.push_str(last_path_segment(&full[segment_start..i]));
            out.push(c);
            segment_start = i + c.len_utf8();
        }
    }
    out.push_str(last_path_segment(&full[segment_start..]));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
