//! Site configuration management for `atrium.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[base]`    | Site metadata (title, description, url)             |
//! | `[build]`   | Paths, minify, build mode, sitemap                  |
//! | `[content]` | Collection/singleton locations, image storage       |
//! | `[admin]`   | Authoring tool route and storage                    |
//! | `[serve]`   | Development server (port, interface, watch)         |
//! | `[extra]`   | User-defined fields exposed to templates            |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Northwind Labs"
//! url = "https://northwind.example"
//!
//! [build]
//! output = "dist"
//! mode = "production"
//!
//! [build.sitemap]
//! enable = true
//!
//! [extra]
//! contact = "hello@northwind.example"
//! ```

mod admin;
mod base;
mod build;
mod content;
pub mod defaults;
mod error;
mod handle;
mod serve;

pub use build::{BuildMode, MODE_ENV};
pub use content::ImageStorage;
pub use error::ConfigError;
pub use handle::{cfg, init_config, reload_config};

use admin::AdminConfig;
use base::BaseConfig;
use build::BuildConfig;
use content::ContentConfig;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing atrium.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Content locations
    #[serde(default)]
    pub content: ContentConfig,

    /// Authoring tool settings
    #[serde(default)]
    pub admin: AdminConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config file named by the CLI (or defaults when it is absent)
    /// and apply CLI and environment overrides.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli)?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute directory holding the people collection.
    pub fn people_dir(&self) -> PathBuf {
        self.build.content.join(&self.content.people)
    }

    /// Absolute path of the landing singleton.
    pub fn landing_path(&self) -> PathBuf {
        self.build.content.join(&self.content.landing)
    }

    /// Whether the authoring tool is wired into this build.
    pub fn admin_enabled(&self) -> bool {
        !self.build.mode.is_production()
    }

    /// Update configuration with CLI arguments and the mode environment variable.
    ///
    /// Mode precedence: `--mode`, then `ATRIUM_ENV`, then `[build].mode`.
    pub fn update_with_cli(&mut self, cli: &'static Cli) -> Result<()> {
        self.cli = Some(cli);

        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        self.config_path = normalize_path(&root.join(&cli.config));
        self.resolve_paths(&root);

        if let Some(mode) = build::BuildMode::from_env()? {
            self.build.mode = mode;
        }

        if let Some(args) = cli.build_args() {
            self.build.clean |= args.clean;
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.build.mode, args.mode.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
            if args.base_url.is_some() {
                self.base.url = args.base_url.clone();
            }
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            build_args,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
            if build_args.base_url.is_none() {
                self.base.url = Some(format!(
                    "http://{}:{}",
                    self.serve.interface, self.serve.port
                ));
            }
        }

        Ok(())
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Make every directory path absolute relative to `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.set_root(&root);

        self.build.content = normalize_path(&root.join(&self.build.content));
        self.build.public = normalize_path(&root.join(&self.build.public));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.build.templates = normalize_path(&root.join(&self.build.templates));
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.sitemap.enable && self.base.url.is_none() {
            bail!(ConfigError::Validation(
                "[base.url] is required for sitemap generation".into()
            ));
        }

        if self.admin.storage != "local" {
            bail!(ConfigError::Validation(format!(
                "[admin.storage] `{}` is not supported, only `local`",
                self.admin.storage
            )));
        }

        if self.admin.route().is_empty() {
            bail!(ConfigError::Validation("[admin.route] must not be empty".into()));
        }

        if !self.content.images.public_path.starts_with('/') {
            bail!(ConfigError::Validation(
                "[content.images.public_path] must start with `/`".into()
            ));
        }

        let images = normalize_path(&self.get_root().join(&self.content.images.directory));
        let escapes = images
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
        if escapes || images == self.build.public || !images.starts_with(&self.build.public) {
            bail!(ConfigError::Validation(
                "[content.images.directory] must be inside [build.public]".into()
            ));
        }

        if self.build.output == self.get_root() || self.build.output == self.build.content {
            bail!(ConfigError::Validation(
                "[build.output] must not be the project root or content directory".into()
            ));
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
