//! # Reflection — Field Introspection for Components
//!
//! Rust has no runtime reflection, so components opt in by implementing
//! [`Reflect`], normally through the [`impl_reflect!`](crate::impl_reflect)
//! macro. A reflected type describes its fields ([`FieldInfo`]), can read a
//! field into a type-erased [`FieldValue`], and can write one back through a
//! *safe write* that reports a [`FieldError`] instead of panicking.
//!
//! Field values are clones. A field holding an `Arc` clones the pointer, not
//! the pointee, so reading and writing it back shares the pointee between
//! the two instances (a shallow copy).
//!
//! Static fields live in process-wide storage owned by the component's
//! module. Reading or writing them never touches `self`.
//!
//! ```ignore
//! static SPAWNED: AtomicU32 = AtomicU32::new(0);
//! fn spawned() -> u32 { SPAWNED.load(Ordering::Relaxed) }
//! fn set_spawned(v: u32) { SPAWNED.store(v, Ordering::Relaxed) }
//!
//! #[derive(Debug, Default)]
//! struct Enemy { hp: u32, tag: String, seed: u64 }
//!
//! impl_reflect!(Enemy {
//!     pub hp: u32,
//!     pub tag: String,
//!     private seed: u64,
//!     static spawned: u32 => spawned, set_spawned,
//! });
//! ```

use std::any::Any;
use std::fmt;

use crate::ecs::Component;

/// Whether a field is part of the type's public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Whether a field lives on each instance or once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Instance,
    Static,
}

/// Description of one reflected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub visibility: Visibility,
    pub storage: Storage,
    /// Declared type of the field, e.g. `alloc::string::String`.
    pub type_name: &'static str,
}

impl FieldInfo {
    pub fn new<T: 'static>(name: &'static str, visibility: Visibility, storage: Storage) -> Self {
        Self {
            name,
            visibility,
            storage,
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Which fields an operation considers. Public instance fields are always
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFilter {
    pub include_private: bool,
    pub include_static: bool,
}

impl FieldFilter {
    pub fn matches(&self, field: &FieldInfo) -> bool {
        let visible = field.visibility == Visibility::Public || self.include_private;
        let storage_ok = field.storage == Storage::Instance || self.include_static;
        visible && storage_ok
    }
}

/// A type-erased field value read off an instance (or static storage).
pub struct FieldValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl FieldValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Type of the value held, e.g. `u32`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Unwrap into a concrete type, or report a mismatch against `field`.
    pub fn into_inner<T: 'static>(self, field: &str) -> Result<T, FieldError> {
        let found = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| FieldError::TypeMismatch {
                field: field.to_string(),
                expected: std::any::type_name::<T>(),
                found,
            })
    }

    /// Overwrite `slot` with this value. Leaves `slot` untouched on mismatch.
    pub fn assign_to<T: 'static>(self, field: &str, slot: &mut T) -> Result<(), FieldError> {
        *slot = self.into_inner(field)?;
        Ok(())
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Why a safe field write was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The type has no field with this name.
    NoSuchField {
        owner: &'static str,
        field: String,
    },
    /// The value's type differs from the field's declared type.
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::NoSuchField { owner, field } => {
                write!(f, "`{owner}` has no field `{field}`")
            }
            FieldError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` expects `{expected}` but the value is `{found}`"
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Runtime field access for a component type.
pub trait Reflect: Component {
    /// Every reflected field, instance and static, in declaration order.
    fn fields() -> &'static [FieldInfo]
    where
        Self: Sized;

    /// Clone the current value of a field. `None` if there is no such field.
    fn read_field(&self, name: &str) -> Option<FieldValue>;

    /// Safe write: never panics, reports what went wrong instead.
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Fields selected by `filter`, in declaration order.
    fn select_fields(filter: FieldFilter) -> Vec<&'static FieldInfo>
    where
        Self: Sized,
    {
        Self::fields().iter().filter(|f| filter.matches(f)).collect()
    }
}

/// Implement [`Reflect`] for a struct from a list of field declarations.
///
/// Each entry is one of
///
/// - `pub name: Type`: public instance field
/// - `private name: Type`: non-public instance field
/// - `static name: Type => getter, setter`: process-wide value accessed
///   through `fn() -> Type` and `fn(Type)`
///
/// Field types must be `Clone + Send + Sync + 'static`.
#[macro_export]
macro_rules! impl_reflect {
    // ── per-field bodies ──
    (@read_instance $this:ident, $name:ident, $field:ident, $fty:ty) => {
        if $name == stringify!($field) {
            return ::std::option::Option::Some($crate::reflect::FieldValue::new::<$fty>(
                ::std::clone::Clone::clone(&$this.$field),
            ));
        }
    };
    (@write_instance $this:ident, $name:ident, $value:ident, $field:ident, $fty:ty) => {
        if $name == stringify!($field) {
            return $value.assign_to::<$fty>(stringify!($field), &mut $this.$field);
        }
    };

    // ── field infos ──
    (@infos $fields:ident; $(,)*) => {};
    (@infos $fields:ident; , $($rest:tt)*) => {
        $crate::impl_reflect!(@infos $fields; $($rest)*);
    };
    (@infos $fields:ident; pub $field:ident : $fty:ty, $($rest:tt)*) => {
        $fields.push($crate::reflect::FieldInfo::new::<$fty>(
            stringify!($field),
            $crate::reflect::Visibility::Public,
            $crate::reflect::Storage::Instance,
        ));
        $crate::impl_reflect!(@infos $fields; $($rest)*);
    };
    (@infos $fields:ident; private $field:ident : $fty:ty, $($rest:tt)*) => {
        $fields.push($crate::reflect::FieldInfo::new::<$fty>(
            stringify!($field),
            $crate::reflect::Visibility::Private,
            $crate::reflect::Storage::Instance,
        ));
        $crate::impl_reflect!(@infos $fields; $($rest)*);
    };
    (@infos $fields:ident; static $field:ident : $fty:ty => $get:path, $set:path, $($rest:tt)*) => {
        $fields.push($crate::reflect::FieldInfo::new::<$fty>(
            stringify!($field),
            $crate::reflect::Visibility::Public,
            $crate::reflect::Storage::Static,
        ));
        $crate::impl_reflect!(@infos $fields; $($rest)*);
    };

    // ── reads ──
    (@read $this:ident, $name:ident; $(,)*) => {};
    (@read $this:ident, $name:ident; , $($rest:tt)*) => {
        $crate::impl_reflect!(@read $this, $name; $($rest)*);
    };
    (@read $this:ident, $name:ident; pub $field:ident : $fty:ty, $($rest:tt)*) => {
        $crate::impl_reflect!(@read_instance $this, $name, $field, $fty);
        $crate::impl_reflect!(@read $this, $name; $($rest)*);
    };
    (@read $this:ident, $name:ident; private $field:ident : $fty:ty, $($rest:tt)*) => {
        $crate::impl_reflect!(@read_instance $this, $name, $field, $fty);
        $crate::impl_reflect!(@read $this, $name; $($rest)*);
    };
    (@read $this:ident, $name:ident; static $field:ident : $fty:ty => $get:path, $set:path, $($rest:tt)*) => {
        if $name == stringify!($field) {
            return ::std::option::Option::Some($crate::reflect::FieldValue::new::<$fty>($get()));
        }
        $crate::impl_reflect!(@read $this, $name; $($rest)*);
    };

    // ── writes ──
    (@write $this:ident, $name:ident, $value:ident; $(,)*) => {};
    (@write $this:ident, $name:ident, $value:ident; , $($rest:tt)*) => {
        $crate::impl_reflect!(@write $this, $name, $value; $($rest)*);
    };
    (@write $this:ident, $name:ident, $value:ident; pub $field:ident : $fty:ty, $($rest:tt)*) => {
        $crate::impl_reflect!(@write_instance $this, $name, $value, $field, $fty);
        $crate::impl_reflect!(@write $this, $name, $value; $($rest)*);
    };
    (@write $this:ident, $name:ident, $value:ident; private $field:ident : $fty:ty, $($rest:tt)*) => {
        $crate::impl_reflect!(@write_instance $this, $name, $value, $field, $fty);
        $crate::impl_reflect!(@write $this, $name, $value; $($rest)*);
    };
    (@write $this:ident, $name:ident, $value:ident; static $field:ident : $fty:ty => $get:path, $set:path, $($rest:tt)*) => {
        if $name == stringify!($field) {
            return $value.into_inner::<$fty>(stringify!($field)).map($set);
        }
        $crate::impl_reflect!(@write $this, $name, $value; $($rest)*);
    };

    ($ty:ty { $($body:tt)* }) => {
        impl $crate::reflect::Reflect for $ty {
            fn fields() -> &'static [$crate::reflect::FieldInfo] {
                static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<$crate::reflect::FieldInfo>> =
                    ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    let mut fields = ::std::vec::Vec::new();
                    $crate::impl_reflect!(@infos fields; $($body)* ,);
                    fields
                })
            }

            fn read_field(&self, name: &str) -> ::std::option::Option<$crate::reflect::FieldValue> {
                $crate::impl_reflect!(@read self, name; $($body)* ,);
                ::std::option::Option::None
            }

            fn write_field(
                &mut self,
                name: &str,
                value: $crate::reflect::FieldValue,
            ) -> ::std::result::Result<(), $crate::reflect::FieldError> {
                $crate::impl_reflect!(@write self, name, value; $($body)* ,);
                let _ = value;
                ::std::result::Result::Err($crate::reflect::FieldError::NoSuchField {
                    owner: ::std::any::type_name::<Self>(),
                    field: name.to_string(),
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    static WAVE: AtomicU32 = AtomicU32::new(4);

    fn wave() -> u32 {
        WAVE.load(Ordering::Relaxed)
    }

    fn set_wave(value: u32) {
        WAVE.store(value, Ordering::Relaxed);
    }

    #[derive(Debug, Default)]
    struct Spawner {
        count: u32,
        label: String,
        seed: u64,
        shared: Arc<Vec<u8>>,
    }

    crate::impl_reflect!(Spawner {
        pub count: u32,
        pub label: String,
        private seed: u64,
        pub shared: Arc<Vec<u8>>,
        static wave: u32 => wave, set_wave
    });

    #[test]
    fn fields_are_listed_in_declaration_order() {
        let names: Vec<_> = Spawner::fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["count", "label", "seed", "shared", "wave"]);
        let seed = &Spawner::fields()[2];
        assert_eq!(seed.visibility, Visibility::Private);
        assert_eq!(seed.storage, Storage::Instance);
        assert_eq!(seed.type_name, "u64");
        assert_eq!(Spawner::fields()[4].storage, Storage::Static);
    }

    #[test]
    fn filter_selects_by_visibility_and_storage() {
        let names = |filter| -> Vec<&'static str> {
            Spawner::select_fields(filter).iter().map(|f| f.name).collect()
        };
        assert_eq!(names(FieldFilter::default()), vec!["count", "label", "shared"]);
        assert_eq!(
            names(FieldFilter {
                include_private: true,
                include_static: false,
            }),
            vec!["count", "label", "seed", "shared"]
        );
        assert_eq!(
            names(FieldFilter {
                include_private: false,
                include_static: true,
            }),
            vec!["count", "label", "shared", "wave"]
        );
    }

    #[test]
    fn read_and_write_instance_fields() {
        let mut spawner = Spawner {
            count: 3,
            label: "north".into(),
            ..Default::default()
        };
        let count = spawner.read_field("count").unwrap();
        assert_eq!(count.downcast_ref::<u32>(), Some(&3));

        spawner
            .write_field("label", FieldValue::new(String::from("south")))
            .unwrap();
        assert_eq!(spawner.label, "south");
        assert!(spawner.read_field("missing").is_none());
    }

    #[test]
    fn mismatched_write_is_reported_and_leaves_field_alone() {
        let mut spawner = Spawner {
            count: 3,
            ..Default::default()
        };
        let err = spawner
            .write_field("count", FieldValue::new("three"))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: "count".into(),
                expected: "u32",
                found: "&str",
            }
        );
        assert_eq!(spawner.count, 3);
    }

    #[test]
    fn unknown_field_write_is_reported() {
        let mut spawner = Spawner::default();
        let err = spawner
            .write_field("nope", FieldValue::new(1u32))
            .unwrap_err();
        assert!(matches!(err, FieldError::NoSuchField { ref field, .. } if field == "nope"));
        assert!(err.to_string().contains("has no field `nope`"));
    }

    #[test]
    fn static_field_reads_shared_storage() {
        let spawner = Spawner::default();
        let before = wave();
        let value = spawner.read_field("wave").unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&before));
    }

    #[test]
    fn arc_fields_are_read_shallowly() {
        let spawner = Spawner {
            shared: Arc::new(vec![1, 2, 3]),
            ..Default::default()
        };
        let value = spawner.read_field("shared").unwrap();
        let read = value.into_inner::<Arc<Vec<u8>>>("shared").unwrap();
        assert!(Arc::ptr_eq(&read, &spawner.shared));
    }
}
