//! Local authoring tool.
//!
//! Present only in development builds. The build side writes a static editor
//! shell and the authoring schema under `/<admin.route>/`; the serve side
//! mounts [`api::AdminApi`] under `/<admin.route>/api/` and writes content
//! files straight to disk.

pub mod api;

use crate::{
    build::BuildReport, config::SiteConfig, integrations::Integration, log,
    schema::AuthoringConfig,
};
use anyhow::{Context, Result};
use std::fs;

/// Editor shell page (embedded at compile time).
const SHELL_TEMPLATE: &str = include_str!("../embed/admin/index.html");

pub struct AdminIntegration;

impl Integration for AdminIntegration {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn emit(&self, config: &SiteConfig, _report: &BuildReport) -> Result<()> {
        let dir = config.build.output.join(config.admin.route());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        fs::write(dir.join("index.html"), shell(config))?;
        fs::write(dir.join("schema.json"), AuthoringConfig::new(config).to_json())?;

        log!("admin"; "/{}/", config.admin.route());
        Ok(())
    }
}

/// Delete an editor left in the output by an earlier development build.
///
/// Returns whether anything was removed.
pub fn remove_from_output(config: &SiteConfig) -> Result<bool> {
    let route = config.admin.route();
    let dir = config.build.output.join(route);
    if route.is_empty() || !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    log!("admin"; "removed /{route}/");
    Ok(true)
}

/// Render the editor shell for this site.
fn shell(config: &SiteConfig) -> String {
    let title = crate::content::document::escape_html(&config.base.title);
    SHELL_TEMPLATE
        .replace("{title}", &title)
        .replace("{route}", config.admin.route())
}
