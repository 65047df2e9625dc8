//! Front-matter splitting for collection entries.
//!
//! An entry file starts with a YAML block fenced by `---` lines, followed by
//! the free-text body:
//!
//! ```text
//! ---
//! name: Ada Lovelace
//! role: Engineer
//! ---
//! Ada writes the compilers.
//! ```
//!
//! A file without an opening fence is all body and has empty front-matter.

use super::error::ContentError;
use serde_json::{Map, Value};
use std::path::Path;

const FENCE: &str = "---";

/// A content file split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    pub front_matter: &'a str,
    pub body: &'a str,
}

/// Split `source` at the front-matter fences.
pub fn split<'a>(source: &'a str, path: &Path) -> Result<Split<'a>, ContentError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = strip_fence_line(source) else {
        return Ok(Split {
            front_matter: "",
            body: source,
        });
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok(Split {
                front_matter: &rest[..offset],
                body: &rest[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    Err(ContentError::FrontMatter {
        path: path.to_path_buf(),
        reason: "missing closing `---`".into(),
    })
}

/// Parse front-matter YAML into a JSON value for schema validation.
///
/// Empty front-matter is an empty object.
pub fn parse(front_matter: &str, path: &Path) -> Result<Value, ContentError> {
    if front_matter.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value: Value = serde_yaml::from_str(front_matter)
        .map_err(|err| ContentError::Yaml(path.to_path_buf(), err))?;
    Ok(match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

/// Assemble a file from serialized YAML and a body.
pub fn join(front_matter: &str, body: &str) -> String {
    let mut out = String::with_capacity(front_matter.len() + body.len() + 8);
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(front_matter);
    if !front_matter.is_empty() && !front_matter.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(body);
    out
}

/// Strip an opening `---` line, returning the remainder.
fn strip_fence_line(source: &str) -> Option<&str> {
    let rest = source.strip_prefix(FENCE)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p() -> &'static Path {
        Path::new("ada.mdoc")
    }

    #[test]
    fn test_split_with_front_matter() {
        let source = "---\nname: Ada\n---\nBody text\n";
        let split = split(source, p()).unwrap();

        assert_eq!(split.front_matter, "name: Ada\n");
        assert_eq!(split.body, "Body text\n");
    }

    #[test]
    fn test_split_crlf() {
        let source = "---\r\nname: Ada\r\n---\r\nBody";
        let split = split(source, p()).unwrap();

        assert_eq!(split.front_matter, "name: Ada\r\n");
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_split_without_front_matter() {
        let split = split("Just a body", p()).unwrap();

        assert_eq!(split.front_matter, "");
        assert_eq!(split.body, "Just a body");
    }

    #[test]
    fn test_split_empty_front_matter() {
        let split = split("---\n---\nBody", p()).unwrap();
        assert_eq!(split.front_matter, "");
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_split_body_divider_is_kept() {
        let source = "---\nname: Ada\n---\nIntro\n\n---\n\nMore";
        let split = split(source, p()).unwrap();
        assert_eq!(split.body, "Intro\n\n---\n\nMore");
    }

    #[test]
    fn test_split_unclosed_is_error() {
        let err = split("---\nname: Ada\n", p()).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_parse_yaml() {
        let value = parse("name: Ada\nrole: 42\n", p()).unwrap();
        assert_eq!(value, json!({ "name": "Ada", "role": 42 }));
    }

    #[test]
    fn test_parse_empty_is_object() {
        assert_eq!(parse("", p()).unwrap(), json!({}));
        assert_eq!(parse("# only a comment\n", p()).unwrap(), json!({}));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            parse("name: [unclosed", p()),
            Err(ContentError::Yaml(..))
        ));
    }

    #[test]
    fn test_join_then_split() {
        let file = join("name: Ada\n", "Bio\n");
        assert_eq!(file, "---\nname: Ada\n---\nBio\n");

        let split = split(&file, p()).unwrap();
        assert_eq!(split.front_matter, "name: Ada\n");
        assert_eq!(split.body, "Bio\n");
    }
}
