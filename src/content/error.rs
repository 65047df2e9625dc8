//! Content error types.

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// A single schema violation inside one content entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending field as a `/`-separated path (`role`, `hero/stats/0`).
    /// Empty when the whole entry has the wrong shape.
    pub field: String,
    /// Library message stating what was expected.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Editor-side rejections. Nothing is written when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthoringError {
    #[error("`{field}` is required")]
    Required { field: &'static str },

    #[error("`{0}` is not a valid slug")]
    InvalidSlug(String),

    #[error("an entry with slug `{0}` already exists")]
    SlugTaken(String),

    #[error("`{0}` is not a valid image file name")]
    InvalidImageName(String),
}

impl AuthoringError {
    /// Field the error refers to, for editor display.
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field } => field,
            Self::InvalidSlug(_) | Self::SlugTaken(_) => "name",
            Self::InvalidImageName(_) => "avatar",
        }
    }
}

/// Errors raised while reading, validating or writing content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed front-matter in `{path}`: {reason}")]
    FrontMatter { path: PathBuf, reason: String },

    #[error("invalid YAML in `{0}`")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("invalid JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("`{entry}` does not match the `{collection}` schema:\n{}", list(.violations))]
    Validation {
        collection: String,
        entry: String,
        violations: Vec<Violation>,
    },

    #[error("schema `{0}` could not be compiled: {1}")]
    Schema(String, String),

    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    #[error("`{0}` is not a valid entry file name, expected a lowercase slug")]
    InvalidFileName(PathBuf),

    #[error("no entry `{0}`")]
    NotFound(String),

    #[error(transparent)]
    Authoring(#[from] AuthoringError),
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_names_field() {
        let err = ContentError::Validation {
            collection: "people".into(),
            entry: "ada".into(),
            violations: vec![Violation {
                field: "role".into(),
                message: "42 is not of type \"string\"".into(),
            }],
        };
        let display = err.to_string();

        assert!(display.contains("`ada`"));
        assert!(display.contains("people"));
        assert!(display.contains("role: 42 is not of type \"string\""));
    }

    #[test]
    fn test_root_violation_display() {
        let v = Violation {
            field: String::new(),
            message: "expected object".into(),
        };
        assert_eq!(v.to_string(), "(root): expected object");
    }

    #[test]
    fn test_authoring_error_field() {
        assert_eq!(AuthoringError::Required { field: "role" }.field(), "role");
        assert_eq!(AuthoringError::InvalidSlug("..".into()).field(), "name");
    }
}
