//! Site initialization module.
//!
//! Creates a new site with default configuration, an empty landing document
//! and the people collection directories.

use crate::{config::SiteConfig, content::Landing, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Default site directory structure
const SITE_DIRS: &[&str] = &["content/people", "content/site", "public/images/people", "templates"];

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name the site is created in place, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `atrium init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_default_config(config)?;
    init_landing(config)?;

    let output = config.build.output.strip_prefix(root).unwrap_or(&config.build.output);
    let ignored = Path::new("/").join(output);
    init_ignored_files(root, &[ignored.as_path()])?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(config: &SiteConfig) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(&config.config_path, content)
        .with_context(|| format!("Failed to write {}", config.config_path.display()))?;
    Ok(())
}

/// Write an empty landing document in canonical form
fn init_landing(config: &SiteConfig) -> Result<()> {
    let path = config.landing_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, Landing::default().to_json())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `atrium init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Initialize ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let mut content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");
    content.push('\n');

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::load_content;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.resolve_paths(root);
        config.config_path = root.join("atrium.toml");
        config
    }

    #[test]
    fn test_new_site_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let config = config_at(&root);

        new_site(&config, true).unwrap();

        assert!(root.join("atrium.toml").is_file());
        assert!(root.join("content/people").is_dir());
        assert!(root.join("public/images/people").is_dir());
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "/dist\n");

        let landing = fs::read_to_string(root.join("content/site/landing.json")).unwrap();
        assert_eq!(landing, Landing::default().to_json());

        // The written config parses back and the scaffold passes validation.
        SiteConfig::from_path(&root.join("atrium.toml")).unwrap();
        let content = load_content(&config).unwrap();
        assert!(content.people.is_empty());
    }

    #[test]
    fn test_new_site_in_place_requires_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let config = config_at(dir.path());
        assert!(new_site(&config, false).is_err());
    }

    #[test]
    fn test_new_site_refuses_existing_structure() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content/people")).unwrap();

        let config = config_at(dir.path());
        assert!(new_site(&config, true).is_err());
    }
}
