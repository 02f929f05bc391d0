use crate::{ItemSchema, SchemaError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// The validator an item kind registers for its data.
///
/// Stored data is checked against the guard when an item is set up; data that
/// fails is reconciled against a freshly generated template rather than
/// discarded.
#[derive(Clone)]
pub enum DataGuard {
    /// Accepts any JSON object.
    AnyObject,
    /// Declarative field constraints.
    Schema(ItemSchema),
    /// Arbitrary check, e.g. "data deserializes into my struct".
    Custom(Arc<CheckFn>),
}

impl DataGuard {
    pub fn schema(schema: ItemSchema) -> Self {
        Self::Schema(schema)
    }

    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(check))
    }

    /// Accepts data that deserializes into `D`.
    pub fn typed<D: DeserializeOwned + 'static>() -> Self {
        Self::custom(|value| {
            D::deserialize(value)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }

    /// Validates `data`.
    pub fn check(&self, data: &Value) -> Result<(), SchemaError> {
        match self {
            DataGuard::AnyObject => {
                if data.is_object() {
                    Ok(())
                } else {
                    Err(SchemaError::NotAnObject)
                }
            }
            DataGuard::Schema(schema) => schema.validate(data),
            DataGuard::Custom(check) => check(data).map_err(SchemaError::Rejected),
        }
    }

    pub fn accepts(&self, data: &Value) -> bool {
        self.check(data).is_ok()
    }
}

impl fmt::Debug for DataGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataGuard::AnyObject => f.write_str("AnyObject"),
            DataGuard::Schema(schema) => f.debug_tuple("Schema").field(schema).finish(),
            DataGuard::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
