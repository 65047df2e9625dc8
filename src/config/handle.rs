//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so the
//! dev server and the watcher always see a consistent `SiteConfig` while
//! `atrium.toml` is being edited.
//!
//! ```text
//!   request handler ──► cfg()            (lock-free load)
//!   watcher         ──► reload_config()  (atomic replace)
//! ```

use super::SiteConfig;
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::{
    fs,
    sync::{Arc, LazyLock},
};

/// Global config storage, replaced with the loaded config in main.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content that produced `CONFIG`.
static CONFIG_HASH: Mutex<Option<blake3::Hash>> = Mutex::new(None);

/// Get current config as `Arc<SiteConfig>`.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
pub fn init_config(config: SiteConfig) {
    if let Ok(content) = fs::read(&config.config_path) {
        *CONFIG_HASH.lock() = Some(blake3::hash(&content));
    }
    CONFIG.store(Arc::new(config));
}

/// Reload config from disk if its content changed.
///
/// Returns `true` when a new config was stored. Readers holding the previous
/// `Arc` keep a valid snapshot.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let cli = current
        .cli
        .context("config was not loaded from the command line")?;

    let content = fs::read(&current.config_path)
        .with_context(|| format!("Failed to read {}", current.config_path.display()))?;
    let hash = blake3::hash(&content);

    let mut last = CONFIG_HASH.lock();
    if *last == Some(hash) {
        return Ok(false);
    }

    let config = SiteConfig::load(cli)?;
    config.validate()?;
    CONFIG.store(Arc::new(config));
    *last = Some(hash);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    // The only test touching the global handle, so it owns `CONFIG`.
    #[test]
    fn test_reload_only_when_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atrium.toml");
        fs::write(&path, "[base]\ntitle = \"First\"\n").unwrap();

        let root = dir.path().to_str().unwrap();
        let cli: &'static Cli = Box::leak(Box::new(
            Cli::try_parse_from(["atrium", "-r", root, "build"]).unwrap(),
        ));
        init_config(SiteConfig::load(cli).unwrap());
        assert_eq!(cfg().base.title, "First");

        // Same bytes: nothing is reloaded.
        assert!(!reload_config().unwrap());
        let before = cfg();

        fs::write(&path, "[base]\ntitle = \"Second\"\n").unwrap();
        assert!(reload_config().unwrap());
        assert_eq!(cfg().base.title, "Second");
        // Earlier snapshots stay valid.
        assert_eq!(before.base.title, "First");

        assert!(!reload_config().unwrap());
    }
}
