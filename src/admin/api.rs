//! Authoring write path.
//!
//! JSON endpoints, relative to `/<admin.route>/api/`:
//!
//! | Method   | Path                          | Action                       |
//! |----------|-------------------------------|------------------------------|
//! | `GET`    | `schema`                      | authoring schema             |
//! | `GET`    | `singletons/landing`          | landing document             |
//! | `PUT`    | `singletons/landing`          | replace landing document     |
//! | `GET`    | `collections/people`          | all people                   |
//! | `GET`    | `collections/people/<slug>`   | one person                   |
//! | `PUT`    | `collections/people/<slug>`   | save (renames on new name)   |
//! | `DELETE` | `collections/people/<slug>`   | delete                       |
//! | `POST`   | `images/people/<file>`        | upload image, body = bytes   |
//!
//! Rejected edits answer `422` with the offending field.

use crate::{
    config::SiteConfig,
    content::{ContentError, Landing, Person},
    schema::{AuthoringConfig, LANDING, PEOPLE},
    store::ContentStore,
};
use anyhow::Result;
use serde_json::{Value, json};
use tiny_http::Method;

/// Result of one API call.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    /// Content on disk changed.
    pub wrote: bool,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            wrote: false,
        }
    }

    fn written(body: Value) -> Self {
        Self {
            status: 200,
            body,
            wrote: true,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
            wrote: false,
        }
    }
}

impl From<ContentError> for ApiResponse {
    fn from(err: ContentError) -> Self {
        match &err {
            ContentError::Authoring(authoring) => Self {
                status: 422,
                body: json!({ "error": authoring.to_string(), "field": authoring.field() }),
                wrote: false,
            },
            ContentError::NotFound(_) => Self::error(404, err.to_string()),
            _ => Self::error(500, format!("{err:#}")),
        }
    }
}

pub struct AdminApi {
    store: ContentStore,
    schema: AuthoringConfig,
}

impl AdminApi {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            store: ContentStore::new(config)?,
            schema: AuthoringConfig::new(config),
        })
    }

    /// Dispatch one request. `path` is relative to the API prefix.
    pub fn handle(&self, method: &Method, path: &str, body: &[u8]) -> ApiResponse {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        let result = match (method, segments.as_slice()) {
            (Method::Get, ["schema"]) => to_value(&self.schema).map(ApiResponse::ok),

            (Method::Get, ["singletons", LANDING]) => self.get_landing(),
            (Method::Put, ["singletons", LANDING]) => self.put_landing(body),

            (Method::Get, ["collections", PEOPLE]) => {
                self.store.list_people().and_then(|people| to_value(&people)).map(ApiResponse::ok)
            }
            (Method::Get, ["collections", PEOPLE, slug]) => {
                self.store.read_person(slug).and_then(|p| to_value(&p)).map(ApiResponse::ok)
            }
            (Method::Put, ["collections", PEOPLE, slug]) => self.put_person(slug, body),
            (Method::Delete, ["collections", PEOPLE, slug]) => self
                .store
                .delete_person(slug)
                .map(|()| ApiResponse::written(json!({ "deleted": slug }))),

            (Method::Post, ["images", PEOPLE, file]) => self
                .store
                .store_image(file, body)
                .map(|src| ApiResponse::written(json!({ "src": src }))),

            (
                _,
                ["schema"] | ["singletons", LANDING] | ["collections", PEOPLE, ..] | ["images", PEOPLE, _],
            ) => Ok(ApiResponse::error(405, format!("{method} not allowed on `{path}`"))),
            _ => Ok(ApiResponse::error(404, format!("no route `{path}`"))),
        };

        result.unwrap_or_else(ApiResponse::from)
    }

    /// A site without a landing file edits an empty one.
    fn get_landing(&self) -> Result<ApiResponse, ContentError> {
        let landing = match self.store.read_landing() {
            Err(ContentError::NotFound(_)) => Landing::default(),
            other => other?,
        };
        to_value(&landing).map(ApiResponse::ok)
    }

    fn put_landing(&self, body: &[u8]) -> Result<ApiResponse, ContentError> {
        let landing: Landing = match serde_json::from_slice(body) {
            Ok(landing) => landing,
            Err(err) => return Ok(ApiResponse::error(400, err.to_string())),
        };
        self.store.write_landing(&landing)?;
        to_value(&landing).map(ApiResponse::written)
    }

    /// `slug` is the entry being edited; a changed name moves the file.
    fn put_person(&self, slug: &str, body: &[u8]) -> Result<ApiResponse, ContentError> {
        let mut person: Person = match serde_json::from_slice(body) {
            Ok(person) => person,
            Err(err) => return Ok(ApiResponse::error(400, err.to_string())),
        };
        // The slug always follows the name.
        person.slug.clear();
        person.normalize();
        self.schema.check_person(&person)?;

        let saved = self.store.write_person(person, Some(slug))?;
        to_value(&saved).map(ApiResponse::written)
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ContentError> {
    serde_json::to_value(value).map_err(|err| ContentError::Json("response".into(), err))
}
