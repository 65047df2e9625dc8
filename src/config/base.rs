//! `[base]` section configuration.
//!
//! Contains basic site information used by page templates and the sitemap.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in atrium.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Northwind Labs"
/// description = "Open tools for public infrastructure"
/// url = "https://northwind.example"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    #[serde(default)]
    pub title: String,

    /// Site description for SEO meta tags.
    #[serde(default)]
    pub description: String,

    /// Base URL for absolute links in the sitemap.
    /// Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code for the `<html lang>` attribute.
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Copyright notice for site footer.
    #[serde(default)]
    pub copyright: String,
}
