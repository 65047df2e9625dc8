//! Build-time content schema registry.
//!
//! Each collection declares the type of its front-matter fields as a JSON
//! Schema. Checking an entry is delegated to the `jsonschema` crate; this
//! module only supplies the declarations and maps failures into
//! [`ContentError::Validation`].
//!
//! The `people` declaration is deliberately looser than the authoring schema:
//! every field is optional so incomplete entries never break a build.

use super::error::{ContentError, Violation};
use jsonschema::Validator;
use serde_json::{Value, json};

/// Name of the people collection.
pub const PEOPLE: &str = "people";

/// Front-matter declaration of the `people` collection.
///
/// Unknown keys are accepted and ignored downstream.
pub fn people_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": PEOPLE,
        "type": "object",
        "properties": {
            "name":   { "type": "string" },
            "role":   { "type": "string" },
            "email":  { "type": "string" },
            "avatar": { "type": "string" }
        }
    })
}

/// One compiled collection schema.
pub struct CollectionSchema {
    name: &'static str,
    validator: Validator,
}

impl CollectionSchema {
    /// Compile a declaration.
    pub fn compile(name: &'static str, declaration: Value) -> Result<Self, ContentError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&declaration)
            .map_err(|err| ContentError::Schema(name.to_owned(), err.to_string()))?;

        Ok(Self { name, validator })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check one entry's front-matter.
    ///
    /// `entry` identifies the file in the error (usually its slug).
    pub fn validate(&self, entry: &str, value: &Value) -> Result<(), ContentError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(value)
            .map(|err| Violation {
                field: err.instance_path.to_string().trim_start_matches('/').to_owned(),
                message: err.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ContentError::Validation {
                collection: self.name.to_owned(),
                entry: entry.to_owned(),
                violations,
            })
        }
    }
}

/// All collections known to the build.
pub struct Collections {
    schemas: Vec<CollectionSchema>,
}

impl Collections {
    /// Compile every registered collection schema.
    pub fn new() -> Result<Self, ContentError> {
        Ok(Self {
            schemas: vec![CollectionSchema::compile(PEOPLE, people_schema())?],
        })
    }

    pub fn get(&self, name: &str) -> Result<&CollectionSchema, ContentError> {
        self.schemas
            .iter()
            .find(|schema| schema.name == name)
            .ok_or_else(|| ContentError::UnknownCollection(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(|schema| schema.name)
    }

    /// Validate `value` as an entry of `collection`.
    pub fn validate(&self, collection: &str, entry: &str, value: &Value) -> Result<(), ContentError> {
        self.get(collection)?.validate(entry, value)
    }
}
