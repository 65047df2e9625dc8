//! The landing page singleton.
//!
//! Exactly one landing document exists per site. It is stored as a single
//! JSON file keyed by section and always read and written whole:
//!
//! ```text
//! Landing
//! ├── hero      eyebrow, title, lede, ctaPrimary, ctaSecondary, stats[], highlight
//! ├── why       eyebrow, title, lede, primary, secondary
//! ├── pillars[] title, body
//! ├── projects[] eyebrow, title, body, href, linkLabel
//! ├── team      eyebrow, title, lede, primary, secondary, ctaTitle, ctaBody
//! └── news[]    eyebrow, title, body, href, linkLabel
//! ```
//!
//! Missing fields read as empty strings / empty arrays, so any subset of a
//! document is valid. Arrays keep author order and may be empty.

use super::error::ContentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Derived list label shown by the editor for an array item.
///
/// The label is the governing field, or a fixed placeholder when that field
/// is empty. It is presentational and never stored.
pub trait ItemLabel {
    /// Label used when the governing field is empty.
    const PLACEHOLDER: &'static str;
    /// Key of the governing field in the stored document.
    const FIELD: &'static str;

    fn label_source(&self) -> &str;

    fn item_label(&self) -> &str {
        match self.label_source() {
            "" => Self::PLACEHOLDER,
            label => label,
        }
    }
}

// ============================================================================
// Shared Shapes
// ============================================================================

/// A call-to-action: link text plus target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cta {
    pub label: String,
    pub href: String,
}

impl Cta {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.href.is_empty()
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub eyebrow: String,
    pub title: String,
    pub lede: String,
    pub cta_primary: Cta,
    pub cta_secondary: Cta,
    pub stats: Vec<Stat>,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Highlight {
    pub title: String,
    pub body: String,
    pub items: Vec<String>,
    pub href: String,
    pub link_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Why {
    pub eyebrow: String,
    pub title: String,
    pub lede: String,
    pub primary: Cta,
    pub secondary: Cta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pillar {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub eyebrow: String,
    pub title: String,
    pub body: String,
    pub href: String,
    pub link_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    pub eyebrow: String,
    pub title: String,
    pub lede: String,
    pub primary: Cta,
    pub secondary: Cta,
    pub cta_title: String,
    pub cta_body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    pub eyebrow: String,
    pub title: String,
    pub body: String,
    pub href: String,
    pub link_label: String,
}

impl ItemLabel for Stat {
    const PLACEHOLDER: &'static str = "Stat";
    const FIELD: &'static str = "label";

    fn label_source(&self) -> &str {
        &self.label
    }
}

impl ItemLabel for Pillar {
    const PLACEHOLDER: &'static str = "Pillar";
    const FIELD: &'static str = "title";

    fn label_source(&self) -> &str {
        &self.title
    }
}

impl ItemLabel for Project {
    const PLACEHOLDER: &'static str = "Project";
    const FIELD: &'static str = "title";

    fn label_source(&self) -> &str {
        &self.title
    }
}

impl ItemLabel for NewsItem {
    const PLACEHOLDER: &'static str = "News Item";
    const FIELD: &'static str = "title";

    fn label_source(&self) -> &str {
        &self.title
    }
}

// ============================================================================
// Document
// ============================================================================

/// The landing singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landing {
    pub hero: Hero,
    pub why: Why,
    pub pillars: Vec<Pillar>,
    pub projects: Vec<Project>,
    pub team: Team,
    pub news: Vec<NewsItem>,
}

impl Landing {
    /// Parse a landing document. `path` is only used in errors.
    pub fn from_json(source: &str, path: &Path) -> Result<Self, ContentError> {
        serde_json::from_str(source).map_err(|err| ContentError::Json(path.to_path_buf(), err))
    }

    /// Serialize in the canonical on-disk form: two-space indent, keys in
    /// declaration order, trailing newline.
    pub fn to_json(&self) -> String {
        // Plain structs of strings and vectors cannot fail to serialize.
        let mut out = serde_json::to_string_pretty(self).unwrap_or_default();
        out.push('\n');
        out
    }
}
