//! Rendered pages and template views.

use super::PEOPLE_URL;
use crate::{
    config::ImageStorage,
    content::{DocumentOptions, PersonRecord},
};
use serde::Serialize;
use std::path::PathBuf;

/// A rendered HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// URL path, always with a trailing slash (`/people/ada/`).
    pub url: String,
    /// Output file relative to the output directory.
    pub path: PathBuf,
    pub html: String,
}

impl Page {
    pub fn new(url: &str, html: String) -> Self {
        let path = PathBuf::from(url.trim_matches('/')).join("index.html");
        Self {
            url: url.to_owned(),
            path,
            html,
        }
    }
}

/// A person as templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    pub slug: String,
    pub name: String,
    pub role: String,
    pub email: String,
    /// Resolved avatar URL, empty when unset.
    pub avatar: String,
    pub url: String,
    pub bio_html: String,
    pub summary: String,
}

impl PersonView {
    pub fn new(record: &PersonRecord, images: &ImageStorage) -> Self {
        let fields = &record.fields;
        let bio = record.biography(&DocumentOptions::full(images.clone()));

        Self {
            slug: record.slug.clone(),
            name: record.display_name().to_owned(),
            role: fields.role.clone().unwrap_or_default(),
            email: fields.email.clone().unwrap_or_default(),
            avatar: fields
                .avatar
                .as_deref()
                .map(|avatar| images.resolve(avatar))
                .unwrap_or_default(),
            url: format!("{PEOPLE_URL}{}/", record.slug),
            bio_html: bio.to_html(),
            summary: bio.summary(),
        }
    }
}
