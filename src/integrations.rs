//! Build integrations.
//!
//! An integration runs after pages are written and may add files to the
//! output. Which integrations run depends on the config, most importantly on
//! the build mode:
//!
//! | Integration | Registered when                 |
//! |-------------|---------------------------------|
//! | `sitemap`   | `[build.sitemap].enable`        |
//! | `admin`     | build mode is not `production`  |

use crate::{
    admin::AdminIntegration, build::BuildReport, config::SiteConfig,
    generator::sitemap::SitemapIntegration,
};
use anyhow::Result;

pub trait Integration: Send + Sync {
    fn name(&self) -> &'static str;

    /// Write this integration's output for a finished build.
    fn emit(&self, config: &SiteConfig, report: &BuildReport) -> Result<()>;
}

/// Integrations for the current config, in run order.
pub fn registered(config: &SiteConfig) -> Vec<Box<dyn Integration>> {
    let mut list: Vec<Box<dyn Integration>> = Vec::new();
    if config.build.sitemap.enable {
        list.push(Box::new(SitemapIntegration));
    }
    if config.admin_enabled() {
        list.push(Box::new(AdminIntegration));
    }
    list
}
