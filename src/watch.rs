//! File system watcher for live reload.
//!
//! Monitors content, public, template directories and the config file, and
//! rebuilds the site when they change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Event Loop                              │
//! │                                                              │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│    handle_changes()    │  │
//! │  │ events   │    │ (300ms)  │    │                        │  │
//! │  └──────────┘    └──────────┘    │  config → reload, then │  │
//! │                                  │  anything → rebuild    │  │
//! │                                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::{
    build::build_site,
    config::{SiteConfig, cfg, reload_config},
    log,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// File Categories
// =============================================================================

/// What a changed path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileCategory {
    Config,
    Content,
    Public,
    Template,
    Unknown,
}

impl FileCategory {
    const WATCHED: [Self; 4] = [Self::Config, Self::Content, Self::Public, Self::Template];

    fn path(self, config: &SiteConfig) -> Option<&Path> {
        match self {
            Self::Config => Some(config.config_path.as_path()),
            Self::Content => Some(config.build.content.as_path()),
            Self::Public => Some(config.build.public.as_path()),
            Self::Template => Some(config.build.templates.as_path()),
            Self::Unknown => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Content => "content",
            Self::Public => "public",
            Self::Template => "templates",
            Self::Unknown => "unknown",
        }
    }
}

fn categorize_path(path: &Path, config: &SiteConfig) -> FileCategory {
    if path == config.config_path {
        return FileCategory::Config;
    }
    [FileCategory::Content, FileCategory::Public, FileCategory::Template]
        .into_iter()
        .find(|cat| cat.path(config).is_some_and(|dir| path.starts_with(dir)))
        .unwrap_or(FileCategory::Unknown)
}

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Rebuild with the current config. Returns true on success.
fn try_rebuild(reason: &str) -> bool {
    log!("watch"; "{reason}");

    match build_site(&cfg()) {
        Ok(_) => true,
        Err(e) => {
            log!("watch"; "build failed");
            log!("error"; "{e:#}");
            false
        }
    }
}

/// Process file changes. Returns true if a rebuild succeeded (for cooldown).
fn handle_changes(paths: &[PathBuf]) -> bool {
    let config = cfg();
    let root = config.get_root();

    let mut config_changed = false;
    let mut triggers: Vec<&PathBuf> = Vec::new();
    for path in paths {
        match categorize_path(path, &config) {
            FileCategory::Config => config_changed = true,
            FileCategory::Unknown => {}
            _ => triggers.push(path),
        }
    }

    if config_changed {
        match reload_config() {
            Ok(true) => return try_rebuild("config changed, rebuilding..."),
            Ok(false) => {}
            Err(e) => {
                log!("error"; "config reload failed: {e:#}");
                return false;
            }
        }
    }

    if triggers.is_empty() {
        return false;
    }

    let names: Vec<_> = triggers.iter().map(|p| rel_path(p, root)).collect();
    try_rebuild(&format!("{} changed, rebuilding...", names.join(", ")))
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    let mut watched = Vec::new();

    for cat in FileCategory::WATCHED {
        if let Some(path) = cat.path(config)
            && path.exists()
        {
            let mode = if path.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };

            watcher
                .watch(path, mode)
                .with_context(|| format!("Failed to watch {}: {}", cat.name(), path.display()))?;
            watched.push(rel_path(path, root));
        }
    }

    log!("watch"; "{}", watched.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live rebuild.
pub fn watch_for_changes_blocking() -> Result<()> {
    let config = cfg();
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, &config)?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take()) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}
