//! Static property schemas.
//!
//! Every settings type declares its persisted fields once, as a static slice
//! of descriptors. Each descriptor carries plain `fn` accessors, so loading
//! and saving never look a field up by name at runtime.

use super::object::Persistable;
use super::value::{PropertyValue, SemanticType};

/// Typed access to one property of `T`.
pub enum Accessor<T> {
    /// A leaf value. `get` returns `None` when the property holds no value;
    /// `set` returns `false` when the value does not fit the field.
    Value { get: fn(&T) -> Option<PropertyValue>, set: fn(&mut T, PropertyValue) -> bool },
    /// A nested settings object that persists under its own scope.
    Nested { get: fn(&T) -> &dyn Persistable, get_mut: fn(&mut T) -> &mut dyn Persistable },
}

/// Name, declared type and accessors of one persisted property.
pub struct PropertyDescriptor<T> {
    pub name: &'static str,
    pub kind: SemanticType,
    pub accessor: Accessor<T>,
}

impl<T> PropertyDescriptor<T> {
    pub const fn value(
        name: &'static str,
        kind: SemanticType,
        get: fn(&T) -> Option<PropertyValue>,
        set: fn(&mut T, PropertyValue) -> bool,
    ) -> Self {
        Self { name, kind, accessor: Accessor::Value { get, set } }
    }

    pub const fn nested(
        name: &'static str,
        get: fn(&T) -> &dyn Persistable,
        get_mut: fn(&mut T) -> &mut dyn Persistable,
    ) -> Self {
        Self { name, kind: SemanticType::Nested, accessor: Accessor::Nested { get, get_mut } }
    }
}
