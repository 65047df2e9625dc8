//! `[content]` section configuration.
//!
//! Declares where each collection and singleton lives on disk and the
//! directory ↔ public-path pair used for uploaded images.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[content]` section in atrium.toml.
///
/// # Example
/// ```toml
/// [content]
/// people = "people"                 # relative to [build].content
/// landing = "site/landing.json"     # relative to [build].content
///
/// [content.images]
/// directory = "public/images/people"
/// public_path = "/images/people/"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// People collection directory, one file per person.
    #[serde(default = "defaults::content::people")]
    #[educe(Default = defaults::content::people())]
    pub people: PathBuf,

    /// Landing singleton JSON document.
    #[serde(default = "defaults::content::landing")]
    #[educe(Default = defaults::content::landing())]
    pub landing: PathBuf,

    /// Storage for avatars and biography images.
    #[serde(default)]
    pub images: ImageStorage,
}

/// A directory on disk paired with the public URL prefix it is served under.
///
/// Every image write lands in `directory`; every stored reference starts with
/// `public_path`.
#[derive(Debug, Clone, PartialEq, Eq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ImageStorage {
    #[serde(default = "defaults::content::image_directory")]
    #[educe(Default = defaults::content::image_directory())]
    pub directory: PathBuf,

    #[serde(default = "defaults::content::image_public_path")]
    #[educe(Default = defaults::content::image_public_path())]
    pub public_path: String,
}

impl ImageStorage {
    /// Resolve a stored image reference to the URL used in pages.
    ///
    /// Absolute paths and URLs pass through; bare file names are placed
    /// under `public_path`.
    pub fn resolve(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.is_empty()
            || reference.starts_with('/')
            || reference.starts_with("http://")
            || reference.starts_with("https://")
            || reference.starts_with("data:")
        {
            return reference.to_owned();
        }
        format!("{}{}", self.public_prefix(), reference.trim_start_matches("./"))
    }

    /// Public path with exactly one trailing slash.
    pub fn public_prefix(&self) -> String {
        format!("{}/", self.public_path.trim_end_matches('/'))
    }

    /// Camel-cased view of this storage for the editor schema.
    ///
    /// `atrium.toml` keeps `public_path`; the editor reads `publicPath`.
    pub fn for_editor(&self) -> EditorImageStorage<'_> {
        EditorImageStorage {
            directory: &self.directory,
            public_path: &self.public_path,
        }
    }

    /// Disk location of the file a reference points to, if it lives in this storage.
    pub fn disk_path(&self, root: &Path, reference: &str) -> Option<PathBuf> {
        let prefix = self.public_prefix();
        let name = reference.strip_prefix(&prefix).unwrap_or(reference);
        (!name.is_empty() && !name.contains("..") && !name.starts_with('/'))
            .then(|| root.join(&self.directory).join(name))
    }
}

/// [`ImageStorage`] as exported to the editor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorImageStorage<'a> {
    pub directory: &'a Path,
    pub public_path: &'a str,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_content_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.content.people, PathBuf::from("people"));
        assert_eq!(config.content.landing, PathBuf::from("site/landing.json"));
        assert_eq!(
            config.content.images.directory,
            PathBuf::from("public/images/people")
        );
        assert_eq!(config.content.images.public_path, "/images/people/");
    }

    #[test]
    fn test_editor_view_is_camel_cased() {
        let value = serde_json::to_value(ImageStorage::default().for_editor()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "directory": "public/images/people",
                "publicPath": "/images/people/",
            })
        );

        // The config file keeps its snake_case key.
        let toml = toml::to_string(&ImageStorage::default()).unwrap();
        assert!(toml.contains("public_path"));
    }

    #[test]
    fn test_image_resolve() {
        let images = ImageStorage::default();

        assert_eq!(images.resolve("ada.png"), "/images/people/ada.png");
        assert_eq!(images.resolve("./ada.png"), "/images/people/ada.png");
        assert_eq!(images.resolve("/images/people/ada.png"), "/images/people/ada.png");
        assert_eq!(images.resolve("https://cdn.example/a.png"), "https://cdn.example/a.png");
        assert_eq!(images.resolve(""), "");
    }

    #[test]
    fn test_public_prefix_normalizes_slash() {
        let images = ImageStorage {
            directory: "public/img".into(),
            public_path: "/img".into(),
        };
        assert_eq!(images.public_prefix(), "/img/");
        assert_eq!(images.resolve("a.png"), "/img/a.png");
    }

    #[test]
    fn test_disk_path() {
        let images = ImageStorage::default();
        let root = Path::new("/site");

        assert_eq!(
            images.disk_path(root, "/images/people/ada.png"),
            Some(PathBuf::from("/site/public/images/people/ada.png"))
        );
        assert_eq!(
            images.disk_path(root, "ada.png"),
            Some(PathBuf::from("/site/public/images/people/ada.png"))
        );
        assert_eq!(images.disk_path(root, "../secret"), None);
        assert_eq!(images.disk_path(root, "/elsewhere/a.png"), None);
    }
}
