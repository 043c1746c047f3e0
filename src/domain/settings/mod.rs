//! Schema-driven settings objects persisted through two key-value backends.

pub mod codec;
mod object;
mod schema;
mod scope;
mod value;

pub use object::{ConfigObject, Persistable, SettingEntry};
pub use schema::{Accessor, PropertyDescriptor};
pub use scope::SettingsScope;
pub use value::{PropertyValue, SemanticType, StoredKind, StoredValue};
