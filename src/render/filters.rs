//! Template filters for attribute values.
//!
//! Tera's autoescape also escapes `/`, which turns every URL into entity
//! soup. These filters escape only what attribute values need and mark their
//! output safe.

use crate::content::document::{escape_html, is_safe_href};
use std::collections::HashMap;
use tera::{Filter, Value};

/// `{{ value | attr }}`: escape for a quoted attribute.
pub struct Attr;

/// `{{ value | href }}`: like `attr`, with script URLs replaced by `#`.
pub struct Href;

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Filter for Attr {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        Ok(Value::String(escape_html(&as_text(value))))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

impl Filter for Href {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let href = as_text(value);
        let href = if is_safe_href(href.trim()) { href } else { "#".to_owned() };
        Ok(Value::String(escape_html(&href)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(filter: &dyn Filter, value: Value) -> Value {
        filter.filter(&value, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_attr_keeps_slashes() {
        assert_eq!(apply(&Attr, json!("/people/a&b/")), json!("/people/a&amp;b/"));
        assert_eq!(apply(&Attr, json!(null)), json!(""));
    }

    #[test]
    fn test_href_blocks_scripts() {
        assert_eq!(apply(&Href, json!("JavaScript:alert(1)")), json!("#"));
        assert_eq!(apply(&Href, json!("https://x.org/?a=\"b\"")), json!("https://x.org/?a=&quot;b&quot;"));
    }
}
