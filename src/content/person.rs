//! People collection entries.
//!
//! Two views of the same file exist and are kept separate on purpose:
//!
//! - [`PersonRecord`] is what the build reads. Every front-matter field is
//!   optional; it is produced only after the entry passed the relaxed
//!   `people` schema.
//! - [`Person`] is what the editor reads and writes. `name` is slug-governed
//!   and, together with `role`, required before anything is saved.

use super::{
    document::{Document, DocumentOptions},
    error::{AuthoringError, ContentError},
    frontmatter,
};
use crate::utils::slug::{is_slug, slugify};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// File extension of people entries.
pub const EXTENSION: &str = "mdoc";

// ============================================================================
// Build-time Record
// ============================================================================

/// Front-matter fields as declared by the relaxed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonFields {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// A validated people entry as seen by the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub slug: String,
    pub fields: PersonFields,
    pub body: String,
}

impl PersonRecord {
    /// Build from front-matter that already passed schema validation.
    ///
    /// Unknown keys are dropped.
    pub fn from_validated(slug: &str, front_matter: Value, body: &str, path: &Path) -> Result<Self, ContentError> {
        let fields: PersonFields = serde_json::from_value(front_matter)
            .map_err(|err| ContentError::Json(path.to_path_buf(), err))?;
        Ok(Self {
            slug: slug.to_owned(),
            fields,
            body: body.to_owned(),
        })
    }

    /// Display name, falling back to the slug.
    pub fn display_name(&self) -> &str {
        self.fields
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.slug)
    }

    pub fn biography(&self, options: &DocumentOptions) -> Document {
        Document::parse(&self.body, options)
    }
}

// ============================================================================
// Authoring Entry
// ============================================================================

/// A people entry as edited in the authoring tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    /// Display name; governs the slug.
    pub name: String,
    /// File stem and URL segment. Derived from `name` when empty.
    pub slug: String,
    pub role: String,
    pub email: Option<String>,
    /// Biography in the document dialect (the file body).
    pub bio: String,
    /// Stored image reference, usually under the people public path.
    pub avatar: Option<String>,
}

/// Front-matter written for an authoring entry. Keys follow the field order
/// of the authoring schema.
#[derive(Serialize)]
struct WrittenFields<'a> {
    name: &'a str,
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<&'a str>,
}

impl Person {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            role: role.into(),
            ..Self::default()
        }
    }

    /// Fill in the slug from the name when missing and drop blank optionals.
    pub fn normalize(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.name);
        }
        for field in [&mut self.email, &mut self.avatar] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
    }

    /// Enforce the editor's required fields.
    pub fn check(&self) -> Result<(), AuthoringError> {
        if self.name.trim().is_empty() {
            return Err(AuthoringError::Required { field: "name" });
        }
        if !is_slug(&self.slug) {
            return Err(AuthoringError::InvalidSlug(self.slug.clone()));
        }
        if self.role.trim().is_empty() {
            return Err(AuthoringError::Required { field: "role" });
        }
        Ok(())
    }

    /// Read an entry leniently: missing fields become empty.
    pub fn from_file(slug: &str, source: &str, path: &Path) -> Result<Self, ContentError> {
        let split = frontmatter::split(source, path)?;
        let value = frontmatter::parse(split.front_matter, path)?;
        let fields: PersonFields = serde_json::from_value(value)
            .map_err(|err| ContentError::Json(path.to_path_buf(), err))?;

        Ok(Self {
            name: fields.name.unwrap_or_default(),
            slug: slug.to_owned(),
            role: fields.role.unwrap_or_default(),
            email: fields.email,
            bio: split.body.trim_start_matches(['\r', '\n']).to_owned(),
            avatar: fields.avatar,
        })
    }

    /// Serialize to the on-disk entry format.
    pub fn to_file(&self) -> Result<String, ContentError> {
        let fields = WrittenFields {
            name: &self.name,
            role: &self.role,
            email: self.email.as_deref(),
            avatar: self.avatar.as_deref(),
        };
        let yaml = serde_yaml::to_string(&fields)
            .map_err(|err| ContentError::Yaml(format!("{}.{EXTENSION}", self.slug).into(), err))?;

        let mut body = self.bio.clone();
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        Ok(frontmatter::join(&yaml, &body))
    }
}
