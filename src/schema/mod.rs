//! JSON Schema documents for the products resource.
//!
//! Payloads are checked against a schema before they are turned into typed
//! models, so a shape mismatch is reported with every violation at once
//! instead of the first serde error.

use jsonschema::{Draft, Validator};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to compile schema `{schema}`: {message}")]
    Compile {
        schema: &'static str,
        message: String,
    },
    #[error("payload does not match schema `{schema}`: {}", .errors.join("; "))]
    Invalid {
        schema: &'static str,
        errors: Vec<String>,
    },
    #[error("failed to serialize payload: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize payload: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// JSON Schema of a single product.
pub fn product_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["id", "title", "price", "description", "category", "image"],
        "properties": product_properties(),
    })
}

/// JSON Schema of the `/products` collection.
pub fn product_list_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "array",
        "items": {
            "type": "object",
            "required": ["id", "title", "price", "description", "category", "image"],
            "properties": product_properties(),
        },
    })
}

/// JSON Schema of a partial product used for updates.
pub fn product_patch_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "minProperties": 1,
        "properties": product_properties(),
    })
}

fn product_properties() -> Value {
    json!({
        "id": { "type": "integer" },
        "title": { "type": "string" },
        "price": { "type": "number" },
        "description": { "type": "string" },
        "category": { "type": "string" },
        "image": { "type": "string", "format": "uri" },
        "rating": {
            "type": "object",
            "required": ["rate", "count"],
            "properties": {
                "rate": { "type": "number" },
                "count": { "type": "integer" },
            },
        },
    })
}

/// A compiled schema paired with the name used in error reports.
pub struct SchemaValidator {
    name: &'static str,
    validator: Validator,
}

impl SchemaValidator {
    /// Compiles `schema` as Draft 2020-12 with format assertions enabled.
    pub fn new(name: &'static str, schema: &Value) -> SchemaResult<Self> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                schema: name,
                message: e.to_string(),
            })?;
        Ok(Self { name, validator })
    }

    pub fn product() -> SchemaResult<Self> {
        Self::new("product", &product_schema())
    }

    pub fn product_list() -> SchemaResult<Self> {
        Self::new("product_list", &product_list_schema())
    }

    pub fn product_patch() -> SchemaResult<Self> {
        Self::new("product_patch", &product_patch_schema())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validates `instance`, collecting every violation.
    pub fn check(&self, instance: &Value) -> SchemaResult<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            return Ok(());
        }
        log::warn!("Schema `{}` rejected payload: {errors:?}", self.name);
        Err(SchemaError::Invalid {
            schema: self.name,
            errors,
        })
    }

    /// Validates an outgoing payload before it is sent.
    pub fn check_serialized<T: Serialize>(&self, payload: &T) -> SchemaResult<()> {
        let value = serde_json::to_value(payload).map_err(SchemaError::Serialize)?;
        self.check(&value)
    }

    /// Validates `instance` and converts it into the typed model.
    pub fn parse<T: DeserializeOwned>(&self, instance: Value) -> SchemaResult<T> {
        self.check(&instance)?;
        serde_json::from_value(instance).map_err(SchemaError::Deserialize)
    }
}
