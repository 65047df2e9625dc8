//! Authoring schema for the local editor.
//!
//! Declares the editor-facing shape of every collection and singleton: which
//! file each one maps to, and the labelled field tree of its form. This is a
//! separate, richer description than the build-time schema in
//! [`crate::content::validation`]; the two are maintained independently.

pub mod fields;

use crate::{
    config::SiteConfig,
    content::{
        AuthoringError, DocumentOptions, Person,
        landing::{NewsItem, Pillar, Project, Stat},
        person::EXTENSION,
    },
};
use fields::{
    Field, NamedField, array, document, image, labelled_array, named, object, required_text, slug,
    text,
};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

/// Name of the landing singleton.
pub const LANDING: &str = "landing";
/// Name of the people collection.
pub const PEOPLE: &str = "people";

/// Editor storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Storage {
    pub kind: String,
}

/// How a document's data is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Format {
    /// Whole document in one data file.
    Data { data: &'static str },
    /// Front-matter plus one field stored as the file body.
    #[serde(rename_all = "camelCase")]
    Content {
        content_field: &'static str,
        extension: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Singleton {
    pub label: &'static str,
    pub path: String,
    pub format: Format,
    pub schema: Vec<NamedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub label: &'static str,
    pub slug_field: &'static str,
    pub path: String,
    pub format: Format,
    pub schema: Vec<NamedField>,
}

/// Complete authoring configuration handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthoringConfig {
    pub storage: Storage,
    pub singletons: BTreeMap<&'static str, Singleton>,
    pub collections: BTreeMap<&'static str, Collection>,
}

impl AuthoringConfig {
    /// Build the authoring schema for a site. Paths are relative to the root.
    pub fn new(config: &SiteConfig) -> Self {
        let root = config.get_root();

        let landing_path = config.landing_path().with_extension("");
        let people_path = config.people_dir().join("*");

        let singletons = BTreeMap::from([(
            LANDING,
            Singleton {
                label: "Landing",
                path: relative(root, &landing_path),
                format: Format::Data { data: "json" },
                schema: landing_schema(),
            },
        )]);

        let collections = BTreeMap::from([(
            PEOPLE,
            Collection {
                label: "People",
                slug_field: "name",
                path: relative(root, &people_path),
                format: Format::Content {
                    content_field: "bio",
                    extension: EXTENSION,
                },
                schema: people_schema(config),
            },
        )]);

        Self {
            storage: Storage {
                kind: config.admin.storage.clone(),
            },
            singletons,
            collections,
        }
    }

    /// Enforce the required fields the people form declares.
    pub fn check_person(&self, person: &Person) -> Result<(), AuthoringError> {
        if let Some(people) = self.collections.get(PEOPLE) {
            for key in fields::required_keys(&people.schema) {
                let value = match key {
                    "name" => person.name.as_str(),
                    "role" => person.role.as_str(),
                    "email" => person.email.as_deref().unwrap_or_default(),
                    _ => continue,
                };
                if value.trim().is_empty() {
                    return Err(AuthoringError::Required { field: key });
                }
            }
        }
        person.check()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// People form: slug-governed name, role, optional email, rich biography,
/// avatar image.
fn people_schema(config: &SiteConfig) -> Vec<NamedField> {
    let images = config.content.images.clone();
    named([
        ("name", slug("Name")),
        ("role", required_text("Role")),
        ("email", text("Email")),
        ("bio", document("Biography", DocumentOptions::full(images.clone()))),
        ("avatar", image("Avatar", images)),
    ])
}

fn cta(label: &'static str) -> Field {
    object(label, [("label", text("Label")), ("href", text("Href"))])
}

/// Landing form: one object per section, arrays for repeated cards.
fn landing_schema() -> Vec<NamedField> {
    let hero = object(
        "Hero",
        [
            ("eyebrow", text("Eyebrow")),
            ("title", text("Title")),
            ("lede", text("Lede")),
            ("ctaPrimary", cta("Primary CTA")),
            ("ctaSecondary", cta("Secondary CTA")),
            (
                "stats",
                labelled_array::<Stat>(
                    "Stats",
                    object("Stat", [("label", text("Label")), ("value", text("Value"))]),
                ),
            ),
            (
                "highlight",
                object(
                    "Highlight",
                    [
                        ("title", text("Title")),
                        ("body", text("Body")),
                        ("items", array("Items", text("Item"))),
                        ("href", text("Href")),
                        ("linkLabel", text("Link Label")),
                    ],
                ),
            ),
        ],
    );

    let why = object(
        "Why",
        [
            ("eyebrow", text("Eyebrow")),
            ("title", text("Title")),
            ("lede", text("Lede")),
            ("primary", cta("Primary CTA")),
            ("secondary", cta("Secondary CTA")),
        ],
    );

    let pillars = labelled_array::<Pillar>(
        "Pillars",
        object("Pillar", [("title", text("Title")), ("body", text("Body"))]),
    );

    let projects = labelled_array::<Project>("Projects", card("Project"));

    let team = object(
        "Team",
        [
            ("eyebrow", text("Eyebrow")),
            ("title", text("Title")),
            ("lede", text("Lede")),
            ("primary", cta("Primary CTA")),
            ("secondary", cta("Secondary CTA")),
            ("ctaTitle", text("CTA Title")),
            ("ctaBody", text("CTA Body")),
        ],
    );

    let news = labelled_array::<NewsItem>("News", card("News Item"));

    named([
        ("hero", hero),
        ("why", why),
        ("pillars", pillars),
        ("projects", projects),
        ("team", team),
        ("news", news),
    ])
}

/// Linked card shared by projects and news items.
fn card(label: &'static str) -> Field {
    object(
        label,
        [
            ("eyebrow", text("Eyebrow")),
            ("title", text("Title")),
            ("body", text("Body")),
            ("href", text("Href")),
            ("linkLabel", text("Link Label")),
        ],
    )
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Landing;
    use serde_json::Value;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.resolve_paths(Path::new("/srv/site"));
        config
    }

    fn keys(fields: &[NamedField]) -> Vec<&'static str> {
        fields.iter().map(|f| f.key).collect()
    }

    #[test]
    fn test_paths_and_formats() {
        let schema = AuthoringConfig::new(&config());

        let landing = &schema.singletons[LANDING];
        assert_eq!(landing.path, "content/site/landing");
        assert_eq!(landing.format, Format::Data { data: "json" });

        let people = &schema.collections[PEOPLE];
        assert_eq!(people.path, "content/people/*");
        assert_eq!(people.slug_field, "name");
        assert_eq!(schema.storage.kind, "local");
    }

    #[test]
    fn test_people_fields() {
        let schema = AuthoringConfig::new(&config());
        let people = &schema.collections[PEOPLE].schema;

        assert_eq!(keys(people), ["name", "role", "email", "bio", "avatar"]);
        assert_eq!(fields::required_keys(people), ["name", "role"]);

        let Some(Field::Image { storage, .. }) = fields::find(people, "avatar") else {
            panic!("avatar must be an image field");
        };
        assert_eq!(storage.public_path, "/images/people/");

        let Some(Field::Document { options, .. }) = fields::find(people, "bio") else {
            panic!("bio must be a document field");
        };
        assert!(options.formatting && options.dividers && options.links);
        assert_eq!(options.images.as_ref(), Some(storage));
    }

    #[test]
    fn test_landing_sections() {
        let schema = AuthoringConfig::new(&config());
        let landing = &schema.singletons[LANDING].schema;

        assert_eq!(keys(landing), ["hero", "why", "pillars", "projects", "team", "news"]);

        let hero = fields::find(landing, "hero").unwrap();
        assert!(hero.get("ctaPrimary").and_then(|c| c.get("href")).is_some());
        assert!(hero.get("highlight").and_then(|h| h.get("linkLabel")).is_some());

        let team = fields::find(landing, "team").unwrap();
        assert!(team.get("ctaBody").is_some());
    }

    #[test]
    fn test_landing_schema_keys_match_document() {
        // Every key the form declares exists in the stored landing document.
        let schema = AuthoringConfig::new(&config());
        let document = serde_json::to_value(Landing::default()).unwrap();

        fn walk(fields: &[NamedField], value: &Value) {
            for f in fields {
                let child = value.get(f.key).unwrap_or_else(|| panic!("missing `{}`", f.key));
                if let Field::Object { fields, .. } = &f.field {
                    walk(fields, child);
                }
            }
        }
        walk(&schema.singletons[LANDING].schema, &document);
    }

    #[test]
    fn test_item_label_rules() {
        let schema = AuthoringConfig::new(&config());
        let landing = &schema.singletons[LANDING].schema;

        let rule = |field: &Field| match field {
            Field::Array { item_label, .. } => item_label.map(|r| r.fallback),
            _ => None,
        };
        assert_eq!(rule(fields::find(landing, "pillars").unwrap()), Some("Pillar"));
        assert_eq!(rule(fields::find(landing, "projects").unwrap()), Some("Project"));
        assert_eq!(rule(fields::find(landing, "news").unwrap()), Some("News Item"));

        let hero = fields::find(landing, "hero").unwrap();
        assert_eq!(rule(hero.get("stats").unwrap()), Some("Stat"));
        assert_eq!(rule(hero.get("highlight").unwrap().get("items").unwrap()), None);
    }

    #[test]
    fn test_check_person() {
        let schema = AuthoringConfig::new(&config());

        assert!(schema.check_person(&Person::new("Ada", "Engineer")).is_ok());
        assert_eq!(
            schema.check_person(&Person::new("Ada", "")),
            Err(AuthoringError::Required { field: "role" })
        );
        assert_eq!(
            schema.check_person(&Person::new(" ", "Engineer")),
            Err(AuthoringError::Required { field: "name" })
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let json: Value = serde_json::from_str(&AuthoringConfig::new(&config()).to_json()).unwrap();

        assert_eq!(json["collections"]["people"]["slugField"], "name");
        assert_eq!(
            json["collections"]["people"]["format"],
            serde_json::json!({ "contentField": "bio", "extension": "mdoc" })
        );
        assert_eq!(json["singletons"]["landing"]["format"], serde_json::json!({ "data": "json" }));

        let avatar = &json["collections"]["people"]["schema"][4];
        assert_eq!(avatar["key"], "avatar");
        assert_eq!(avatar["publicPath"], "/images/people/");
        assert_eq!(json["collections"]["people"]["schema"][3]["images"]["publicPath"], "/images/people/");
        assert_eq!(json["singletons"]["landing"]["schema"][0]["key"], "hero");
    }
}
