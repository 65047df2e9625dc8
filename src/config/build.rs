//! `[build]` section configuration.
//!
//! Contains build paths, minification, the build mode switch and sitemap
//! settings.

use super::{defaults, error::ConfigError};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// Environment variable that selects the build mode when no CLI flag is given.
pub const MODE_ENV: &str = "ATRIUM_ENV";

// ============================================================================
// Enums
// ============================================================================

/// Which integrations get wired into the build.
///
/// `Development` registers the authoring tool (admin pages + write API);
/// `Production` emits the static site only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Read the mode from [`MODE_ENV`], if set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match std::env::var(MODE_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
            _ => Ok(None),
        }
    }
}

impl FromStr for BuildMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Mode(other.to_owned())),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in atrium.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"    # Collections and singletons
/// public = "public"      # Copied verbatim into the output
/// output = "dist"
/// mode = "production"
///
/// [build.sitemap]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content directory (people entries, landing document).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Static files copied as-is (images, fonts, CSS).
    #[serde(default = "defaults::build::public")]
    #[educe(Default = defaults::build::public())]
    pub public: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Template overrides directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Minify HTML output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Remove the output directory before building.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Build mode; overridden by `ATRIUM_ENV` and `--mode`.
    #[serde(default = "defaults::build::mode")]
    #[educe(Default = defaults::build::mode())]
    pub mode: BuildMode,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[build.sitemap]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap generation (requires `[base.url]`).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enable: bool,

    /// Output path of the sitemap, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.public, PathBuf::from("public"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert_eq!(config.build.mode, BuildMode::Development);
        assert!(!config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
    }

    #[test]
    fn test_build_config_custom() {
        let config = r#"
            [build]
            output = "site"
            minify = false
            mode = "production"

            [build.sitemap]
            enable = true
            path = "map.xml"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.output, PathBuf::from("site"));
        assert!(!config.build.minify);
        assert!(config.build.mode.is_production());
        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("map.xml"));
    }

    #[test]
    fn test_build_mode_rejects_unknown_value() {
        let result: Result<SiteConfig, _> = toml::from_str("[build]\nmode = \"staging\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_mode_from_str() {
        assert_eq!("production".parse::<BuildMode>().unwrap(), BuildMode::Production);
        assert_eq!(" PROD ".parse::<BuildMode>().unwrap(), BuildMode::Production);
        assert_eq!("dev".parse::<BuildMode>().unwrap(), BuildMode::Development);
        assert!("test".parse::<BuildMode>().is_err());
    }

    #[test]
    fn test_build_mode_display() {
        assert_eq!(BuildMode::Development.to_string(), "development");
        assert_eq!(BuildMode::Production.to_string(), "production");
    }
}
