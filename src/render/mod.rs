//! HTML rendering with `tera`.
//!
//! Four templates make up the site. Each one is embedded in the binary and
//! may be replaced by a same-named file under `[build].templates`:
//!
//! | Template      | Page               |
//! |---------------|--------------------|
//! | `base.html`   | shared layout      |
//! | `index.html`  | `/`                |
//! | `people.html` | `/people/`         |
//! | `person.html` | `/people/<slug>/`  |
//!
//! Every template sees `site` (the `[base]` section), `extra` and `page`.
//! Attribute values go through the `attr` and `href` filters.

mod filters;
mod page;

pub use page::{Page, PersonView};

use crate::{
    config::SiteConfig,
    content::{Landing, PersonRecord},
    log,
    utils::minify::{Output, minify},
};
use anyhow::{Context, Result};
use std::fs;
use tera::Tera;

/// Built-in templates, `(name, source)`.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../embed/templates/base.html")),
    ("index.html", include_str!("../embed/templates/index.html")),
    ("people.html", include_str!("../embed/templates/people.html")),
    ("person.html", include_str!("../embed/templates/person.html")),
];

/// URL path of the people listing.
pub const PEOPLE_URL: &str = "/people/";

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load templates, preferring project overrides.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let dir = &config.build.templates;
        let mut sources = Vec::with_capacity(TEMPLATES.len());

        for &(name, builtin) in TEMPLATES {
            let path = dir.join(name);
            let source = if path.is_file() {
                log!("render"; "using {}", path.display());
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {}", path.display()))?
            } else {
                builtin.to_owned()
            };
            sources.push((name, source));
        }

        let mut tera = Tera::default();
        tera.register_filter("attr", filters::Attr);
        tera.register_filter("href", filters::Href);
        tera.add_raw_templates(sources)
            .context("Failed to parse templates")?;
        Ok(Self { tera })
    }

    fn context(config: &SiteConfig) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("site", &config.base);
        context.insert("extra", &config.extra);
        context.insert("people_url", PEOPLE_URL);
        context
    }

    fn render(&self, name: &str, context: &tera::Context, config: &SiteConfig) -> Result<String> {
        let html = self
            .tera
            .render(name, context)
            .with_context(|| format!("Failed to render {name}"))?;
        Ok(minify(Output::Html, &html, config).into_owned())
    }

    /// `/` from the landing document.
    pub fn index(&self, config: &SiteConfig, landing: &Landing, people: &[PersonView]) -> Result<Page> {
        let mut context = Self::context(config);
        context.insert("page", &landing);
        context.insert("people", people);
        let html = self.render("index.html", &context, config)?;
        Ok(Page::new("/", html))
    }

    /// `/people/` listing.
    pub fn people(&self, config: &SiteConfig, people: &[PersonView]) -> Result<Page> {
        let mut context = Self::context(config);
        context.insert("page", &serde_json::json!({ "title": "People" }));
        context.insert("people", people);
        let html = self.render("people.html", &context, config)?;
        Ok(Page::new(PEOPLE_URL, html))
    }

    /// `/people/<slug>/`.
    pub fn person(&self, config: &SiteConfig, person: &PersonView) -> Result<Page> {
        let mut context = Self::context(config);
        context.insert("page", person);
        let html = self.render("person.html", &context, config)?;
        Ok(Page::new(&person.url, html))
    }
}

/// Prepare template views for every people record.
pub fn person_views(config: &SiteConfig, records: &[PersonRecord]) -> Vec<PersonView> {
    records
        .iter()
        .map(|record| PersonView::new(record, &config.content.images))
        .collect()
}
