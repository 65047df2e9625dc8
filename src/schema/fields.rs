//! Editor field declarations.
//!
//! A field tree describes a form: scalar text inputs, nested objects that
//! group related inputs, ordered arrays of either, and the special slug,
//! document and image inputs. The tree is data only; the editor reads it as
//! JSON and the server uses it to enforce required fields.

use crate::{config::ImageStorage, content::{DocumentOptions, ItemLabel}};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One input in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Field {
    Text {
        label: &'static str,
        required: bool,
    },
    /// Text input that also derives the entry slug.
    #[serde(rename_all = "camelCase")]
    Slug {
        label: &'static str,
        slug_label: &'static str,
        required: bool,
    },
    Document {
        label: &'static str,
        #[serde(flatten)]
        options: DocumentOptions,
    },
    Image {
        label: &'static str,
        #[serde(flatten, serialize_with = "editor_storage")]
        storage: ImageStorage,
    },
    Object {
        label: &'static str,
        fields: Vec<NamedField>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        label: &'static str,
        item: Box<Field>,
        #[serde(skip_serializing_if = "Option::is_none")]
        item_label: Option<ItemLabelRule>,
    },
}

fn editor_storage<S: Serializer>(storage: &ImageStorage, serializer: S) -> Result<S::Ok, S::Error> {
    storage.for_editor().serialize(serializer)
}

/// A field bound to its key in the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedField {
    pub key: &'static str,
    #[serde(flatten)]
    pub field: Field,
}

/// How the editor labels array items: the value of `field`, or `fallback`
/// when that value is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemLabelRule {
    pub field: &'static str,
    pub fallback: &'static str,
}

impl ItemLabelRule {
    /// The rule matching an item type's [`ItemLabel`] implementation.
    pub const fn of<T: ItemLabel>() -> Self {
        Self {
            field: T::FIELD,
            fallback: T::PLACEHOLDER,
        }
    }

    /// Apply the rule to an untyped item.
    pub fn label_for<'a>(&self, item: &'a Value) -> &'a str {
        match item.get(self.field).and_then(Value::as_str) {
            Some(label) if !label.is_empty() => label,
            _ => self.fallback,
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn text(label: &'static str) -> Field {
    Field::Text {
        label,
        required: false,
    }
}

pub fn required_text(label: &'static str) -> Field {
    Field::Text {
        label,
        required: true,
    }
}

pub fn slug(label: &'static str) -> Field {
    Field::Slug {
        label,
        slug_label: "Slug",
        required: true,
    }
}

pub fn document(label: &'static str, options: DocumentOptions) -> Field {
    Field::Document { label, options }
}

pub fn image(label: &'static str, storage: ImageStorage) -> Field {
    Field::Image { label, storage }
}

pub fn object<const N: usize>(label: &'static str, fields: [(&'static str, Field); N]) -> Field {
    Field::Object {
        label,
        fields: named(fields),
    }
}

pub fn array(label: &'static str, item: Field) -> Field {
    Field::Array {
        label,
        item: Box::new(item),
        item_label: None,
    }
}

/// Array whose items are labelled by `T`'s [`ItemLabel`] rule.
pub fn labelled_array<T: ItemLabel>(label: &'static str, item: Field) -> Field {
    Field::Array {
        label,
        item: Box::new(item),
        item_label: Some(ItemLabelRule::of::<T>()),
    }
}

pub fn named<const N: usize>(fields: [(&'static str, Field); N]) -> Vec<NamedField> {
    fields
        .into_iter()
        .map(|(key, field)| NamedField { key, field })
        .collect()
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text { label, .. }
            | Self::Slug { label, .. }
            | Self::Document { label, .. }
            | Self::Image { label, .. }
            | Self::Object { label, .. }
            | Self::Array { label, .. } => *label,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Text { required: true, .. } | Self::Slug { required: true, .. }
        )
    }

    /// Child field at `key` of an object field.
    pub fn get(&self, key: &str) -> Option<&Field> {
        match self {
            Self::Object { fields, .. } => find(fields, key),
            _ => None,
        }
    }
}

/// Look up a field by key.
pub fn find<'a>(fields: &'a [NamedField], key: &str) -> Option<&'a Field> {
    fields.iter().find(|f| f.key == key).map(|f| &f.field)
}

/// Keys of every required top-level field.
pub fn required_keys(fields: &[NamedField]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|f| f.field.is_required())
        .map(|f| f.key)
        .collect()
}
