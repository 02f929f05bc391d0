use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Describes the shape an item kind expects its data to have.
///
/// Data must be a JSON object. Fields are addressed by JSON pointer so nested
/// values can be checked too (e.g. `/upgrades/level`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSchema {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

/// A single field constraint within an [`ItemSchema`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    /// JSON pointer path (e.g., "/cash", "/upgrades/level").
    pub field_path: String,
    pub field_type: FieldType,
    /// When false the field may be absent, but must match its type if present.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Allowed values. Only meaningful when FieldType is Enum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "options")]
    pub enum_options: Option<Vec<String>>,
}

fn default_required() -> bool {
    true
}

impl SchemaField {
    fn simple(path: &str, field_type: FieldType) -> Self {
        Self {
            field_path: path.into(),
            field_type,
            required: true,
            enum_options: None,
        }
    }

    pub fn text(path: &str) -> Self {
        Self::simple(path, FieldType::Text)
    }

    pub fn number(path: &str) -> Self {
        Self::simple(path, FieldType::Number)
    }

    /// A number without a fractional part.
    pub fn integer(path: &str) -> Self {
        Self::simple(path, FieldType::Integer)
    }

    pub fn bool(path: &str) -> Self {
        Self::simple(path, FieldType::Bool)
    }

    pub fn array(path: &str) -> Self {
        Self::simple(path, FieldType::Array)
    }

    pub fn object(path: &str) -> Self {
        Self::simple(path, FieldType::Object)
    }

    /// A field that must exist but may hold any value.
    pub fn any(path: &str) -> Self {
        Self::simple(path, FieldType::Any)
    }

    /// Shorthand for a string field restricted to fixed options.
    pub fn enumeration(path: &str, options: Vec<String>) -> Self {
        Self {
            field_path: path.into(),
            field_type: FieldType::Enum,
            required: true,
            enum_options: Some(options),
        }
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn check(&self, data: &Value) -> Result<(), SchemaError> {
        let Some(value) = data.pointer(&self.field_path) else {
            if self.required {
                return Err(SchemaError::MissingField(self.field_path.clone()));
            }
            return Ok(());
        };

        if !self.field_type.matches(value) {
            return Err(SchemaError::WrongType {
                path: self.field_path.clone(),
                expected: self.field_type,
            });
        }

        if let (FieldType::Enum, Some(options)) = (self.field_type, &self.enum_options) {
            let s = value.as_str().unwrap_or_default();
            if !options.iter().any(|o| o == s) {
                return Err(SchemaError::NotInEnum {
                    path: self.field_path.clone(),
                    value: s.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// The JSON type a schema field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Integer,
    Bool,
    Array,
    Object,
    Enum,
    Any,
}

impl FieldType {
    /// Returns true if `value` is of this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Text | FieldType::Enum => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }
}

/// Why a piece of item data failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("item data is not an object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{path}' is not of type {expected:?}")]
    WrongType { path: String, expected: FieldType },

    #[error("field '{path}' has value '{value}' outside its options")]
    NotInEnum { path: String, value: String },

    #[error("rejected: {0}")]
    Rejected(String),
}

impl ItemSchema {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// Adds a field constraint.
    #[must_use]
    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Checks `data` against every field, reporting the first violation.
    pub fn validate(&self, data: &Value) -> Result<(), SchemaError> {
        if !data.is_object() {
            return Err(SchemaError::NotAnObject);
        }
        self.fields.iter().try_for_each(|f| f.check(data))
    }
}
