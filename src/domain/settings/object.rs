//! Schema-driven persistence shared by every settings object.

use tracing::{debug, warn};

use super::codec;
use super::schema::{Accessor, PropertyDescriptor};
use super::scope::SettingsScope;
use super::value::{PropertyValue, SemanticType, StoredValue};
use crate::domain::AppError;
use crate::ports::{ParameterStore, SettingsStore};

/// A settings type with a fixed scope and a static property schema.
///
/// Implementing this trait is all a type needs to become [`Persistable`].
pub trait ConfigObject: Sized + 'static {
    fn scope(&self) -> &SettingsScope;

    fn schema() -> &'static [PropertyDescriptor<Self>];
}

/// One persisted property as listed by [`Persistable::describe`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingEntry {
    pub key: String,
    pub value: Option<PropertyValue>,
}

/// Load, save and delete operations against both settings backends.
pub trait Persistable {
    /// Read every property from the durable store.
    ///
    /// Missing keys and values of the wrong type leave the current value in
    /// place; this never fails.
    fn load_from_durable_store(&mut self, store: &dyn SettingsStore);

    /// Write every property. Properties without a value delete their key.
    fn save_to_durable_store(&self, store: &mut dyn SettingsStore) -> Result<(), AppError>;

    /// Remove the whole durable subtree owned by this object.
    fn delete_all(&self, store: &mut dyn SettingsStore) -> Result<(), AppError>;

    fn load_from_invocation_parameters(&mut self, params: &dyn ParameterStore);

    /// Write every property that holds a value. Absent properties are skipped.
    fn save_to_invocation_parameters(&self, params: &mut dyn ParameterStore)
    -> Result<(), AppError>;

    /// Durable keys and current values in schema order, nested objects inline.
    fn describe(&self) -> Vec<SettingEntry>;
}

impl<T: ConfigObject> Persistable for T {
    fn load_from_durable_store(&mut self, store: &dyn SettingsStore) {
        for descriptor in T::schema() {
            match &descriptor.accessor {
                Accessor::Nested { get_mut, .. } => get_mut(self).load_from_durable_store(store),
                Accessor::Value { set, .. } => {
                    let key = self.scope().settings_key(descriptor.name);
                    let Some(kind) = descriptor.kind.stored_kind() else {
                        report_schema_error(&key, descriptor.kind);
                        continue;
                    };
                    let Some(stored) = store.read(&key, kind) else {
                        debug!(key = %key, "no stored value, keeping current");
                        continue;
                    };
                    match decode_stored(descriptor.kind, stored) {
                        Some(value) => apply(self, *set, &key, value),
                        None => debug!(key = %key, "stored value is unreadable, keeping current"),
                    }
                }
            }
        }
    }

    fn save_to_durable_store(&self, store: &mut dyn SettingsStore) -> Result<(), AppError> {
        for descriptor in T::schema() {
            match &descriptor.accessor {
                Accessor::Nested { get, .. } => get(self).save_to_durable_store(store)?,
                Accessor::Value { get, .. } => {
                    let key = self.scope().settings_key(descriptor.name);
                    let encoded = match checked_value(descriptor, get(self), &key) {
                        Some(value) => encode_durable(value)?,
                        None => None,
                    };
                    match encoded {
                        Some(stored) => store.write(&key, stored)?,
                        None => store.remove(&key)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn delete_all(&self, store: &mut dyn SettingsStore) -> Result<(), AppError> {
        store.remove_subtree(&self.scope().settings_root())?;
        for descriptor in T::schema() {
            if let Accessor::Nested { get, .. } = &descriptor.accessor {
                get(self).delete_all(store)?;
            }
        }
        Ok(())
    }

    fn load_from_invocation_parameters(&mut self, params: &dyn ParameterStore) {
        for descriptor in T::schema() {
            match &descriptor.accessor {
                Accessor::Nested { get_mut, .. } => {
                    get_mut(self).load_from_invocation_parameters(params)
                }
                Accessor::Value { set, .. } => {
                    let key = self.scope().params_key(descriptor.name);
                    if !params.has(&key) {
                        continue;
                    }
                    match read_parameter(params, descriptor.kind, &key) {
                        Some(value) => apply(self, *set, &key, value),
                        None => debug!(key = %key, "parameter has the wrong type, keeping current"),
                    }
                }
            }
        }
    }

    fn save_to_invocation_parameters(
        &self,
        params: &mut dyn ParameterStore,
    ) -> Result<(), AppError> {
        for descriptor in T::schema() {
            match &descriptor.accessor {
                Accessor::Nested { get, .. } => get(self).save_to_invocation_parameters(params)?,
                Accessor::Value { get, .. } => {
                    let key = self.scope().params_key(descriptor.name);
                    let Some(value) = checked_value(descriptor, get(self), &key) else {
                        continue;
                    };
                    if let Some(stored) = encode_parameter(&key, value)? {
                        params.set(&key, stored)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn describe(&self) -> Vec<SettingEntry> {
        let mut entries = Vec::new();
        for descriptor in T::schema() {
            match &descriptor.accessor {
                Accessor::Nested { get, .. } => entries.extend(get(self).describe()),
                Accessor::Value { get, .. } => entries.push(SettingEntry {
                    key: self.scope().settings_key(descriptor.name),
                    value: get(self),
                }),
            }
        }
        entries
    }
}

fn apply<T>(
    target: &mut T,
    set: fn(&mut T, PropertyValue) -> bool,
    key: &str,
    value: PropertyValue,
) {
    if !set(target, value) {
        debug!(key = %key, "value rejected by property, keeping current");
    }
}

fn report_schema_error(key: &str, kind: SemanticType) {
    warn!(key = %key, ?kind, "schema error: property type cannot be persisted as a value");
}

/// Drop values whose runtime type disagrees with the declared type.
fn checked_value<T>(
    descriptor: &PropertyDescriptor<T>,
    value: Option<PropertyValue>,
    key: &str,
) -> Option<PropertyValue> {
    let value = value?;
    if value.semantic_type() != descriptor.kind {
        warn!(
            key = %key,
            declared = ?descriptor.kind,
            actual = ?value.semantic_type(),
            "schema error: property value does not match its declared type"
        );
        return None;
    }
    Some(value)
}

fn decode_stored(kind: SemanticType, stored: StoredValue) -> Option<PropertyValue> {
    match (kind, stored) {
        (SemanticType::Boolean, StoredValue::Boolean(value)) => Some(PropertyValue::Boolean(value)),
        (SemanticType::Integer, StoredValue::Integer(value)) => Some(PropertyValue::Integer(value)),
        (SemanticType::Real, StoredValue::Real(value)) => Some(PropertyValue::Real(value)),
        (SemanticType::Text, StoredValue::Text(value)) => Some(PropertyValue::Text(value)),
        (SemanticType::StringList, StoredValue::Text(value)) => {
            Some(PropertyValue::StringList(codec::decode_string_list(&value)))
        }
        (SemanticType::JsonBlob, StoredValue::Text(value)) => {
            codec::decode_json(&value).ok().map(PropertyValue::JsonBlob)
        }
        _ => None,
    }
}

fn encode_durable(value: PropertyValue) -> Result<Option<StoredValue>, AppError> {
    Ok(match value {
        PropertyValue::Boolean(value) => Some(StoredValue::Boolean(value)),
        PropertyValue::Integer(value) => Some(StoredValue::Integer(value)),
        PropertyValue::Real(value) => Some(StoredValue::Real(value)),
        PropertyValue::Text(value) => Some(StoredValue::Text(value)),
        PropertyValue::StringList(values) => {
            codec::encode_string_list(&values).map(StoredValue::Text)
        }
        PropertyValue::JsonBlob(value) => Some(StoredValue::Text(codec::encode_json(&value)?)),
    })
}

fn read_parameter(
    params: &dyn ParameterStore,
    kind: SemanticType,
    key: &str,
) -> Option<PropertyValue> {
    match kind {
        SemanticType::Boolean => params.get_boolean(key).map(PropertyValue::Boolean),
        SemanticType::Integer => params.get_integer(key).map(PropertyValue::Integer),
        SemanticType::Real => params.get_real(key).map(PropertyValue::Real),
        SemanticType::Text => params.get_string(key).map(PropertyValue::Text),
        SemanticType::StringList => params
            .get_string(key)
            .map(|text| PropertyValue::StringList(codec::decode_string_list(&text))),
        SemanticType::JsonBlob => params
            .get_string(key)
            .and_then(|text| codec::decode_json_from_parameters(&text).ok())
            .map(PropertyValue::JsonBlob),
        SemanticType::Nested => {
            report_schema_error(key, kind);
            None
        }
    }
}

fn encode_parameter(key: &str, value: PropertyValue) -> Result<Option<StoredValue>, AppError> {
    match value {
        PropertyValue::JsonBlob(value) => match codec::encode_json_for_parameters(&value) {
            Ok(text) => Ok(Some(StoredValue::Text(text))),
            Err(codec::ParameterJsonError::Json(err)) => Err(err.into()),
            Err(err @ codec::ParameterJsonError::EscapeCollision) => {
                Err(AppError::UnsafeParameterPayload { key: key.to_string(), reason: err.to_string() })
            }
        },
        other => encode_durable(other),
    }
}
