//! Site content: the people collection and the landing singleton.
//!
//! | Module        | Role                                              |
//! |---------------|---------------------------------------------------|
//! | `validation`  | Relaxed build-time schema registry (`jsonschema`) |
//! | `person`      | People entries, build and authoring views         |
//! | `landing`     | Landing singleton section tree and item labels    |
//! | `document`    | Rich-text biography parsing and rendering         |
//! | `frontmatter` | `---` fenced YAML splitting                       |

pub mod document;
mod error;
pub mod frontmatter;
pub mod landing;
pub mod person;
pub mod validation;

pub use document::{Document, DocumentOptions};
pub use error::{AuthoringError, ContentError, Violation};
pub use landing::{ItemLabel, Landing};
pub use person::{Person, PersonRecord};
pub use validation::Collections;
