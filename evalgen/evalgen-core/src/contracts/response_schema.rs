use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("response schema must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid JSON Schema: {0}")]
    Invalid(String),

    #[error("value does not match schema: {0}")]
    Mismatch(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Structural output constraint passed to the model provider.
///
/// Only the schema itself is checked locally. Whether `name`, `description` and
/// `strict` are honoured depends on the provider; unsupported fields are
/// dropped by the adapter without error, and `strict` is a request rather
/// than a guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawResponseSchema")]
pub struct ResponseSchema {
    pub name: String,

    pub schema: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Wire shape of [`ResponseSchema`]; deserialized values go through the same
/// checks as [`ResponseSchema::new`].
#[derive(Deserialize)]
struct RawResponseSchema {
    name: String,
    schema: Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    strict: Option<bool>,
}

impl TryFrom<RawResponseSchema> for ResponseSchema {
    type Error = SchemaError;

    fn try_from(raw: RawResponseSchema) -> Result<Self, Self::Error> {
        check_schema(&raw.schema)?;
        Ok(Self {
            name: raw.name,
            schema: raw.schema,
            description: raw.description,
            strict: raw.strict,
        })
    }
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Result<Self, SchemaError> {
        check_schema(&schema)?;
        Ok(Self {
            name: name.into(),
            schema,
            description: None,
            strict: None,
        })
    }

    /// Builds the schema from a type deriving `schemars::JsonSchema`.
    ///
    /// The top-level `$schema` key and the schemars integer formats
    /// (`uint8`, `int32`, ...) are removed; strict structured output modes
    /// reject both. Range limits stay as `minimum`/`maximum`. Types that
    /// should produce closed objects use `#[serde(deny_unknown_fields)]`.
    pub fn for_type<T: schemars::JsonSchema>(name: impl Into<String>) -> Result<Self, SchemaError> {
        let generated = schemars::schema_for!(T);
        let mut schema = serde_json::to_value(&generated)?;
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        strip_integer_formats(&mut schema);
        Self::new(name, schema)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Checks a decoded model answer against the schema.
    ///
    /// Reports at most three violations.
    pub fn validate_instance(&self, instance: &Value) -> Result<(), SchemaError> {
        let compiled = jsonschema::validator_for(&self.schema)
            .map_err(|e| SchemaError::Invalid(e.to_string()))?;

        if compiled.is_valid(instance) {
            return Ok(());
        }

        let msgs: Vec<String> = compiled
            .iter_errors(instance)
            .take(3)
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect();
        Err(SchemaError::Mismatch(msgs.join("; ")))
    }
}

fn check_schema(schema: &Value) -> Result<(), SchemaError> {
    let kind = match schema {
        Value::Object(_) => None,
        Value::Null => Some("null"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(_) => Some("number"),
        Value::String(_) => Some("string"),
        Value::Array(_) => Some("array"),
    };
    if let Some(kind) = kind {
        return Err(SchemaError::NotAnObject(kind));
    }

    jsonschema::validator_for(schema)
        .map(|_| ())
        .map_err(|e| SchemaError::Invalid(e.to_string()))
}

fn strip_integer_formats(schema: &mut Value) {
    match schema {
        Value::Object(obj) => {
            let is_integer = match obj.get("type") {
                Some(Value::String(t)) => t == "integer",
                Some(Value::Array(types)) => types.iter().any(|t| t == "integer"),
                _ => false,
            };
            if is_integer {
                obj.remove("format");
            }
            for value in obj.values_mut() {
                strip_integer_formats(value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_integer_formats),
        _ => {}
    }
}
