//! `[admin]` section configuration.
//!
//! Settings for the authoring tool that is wired in for development builds.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[admin]` section in atrium.toml.
///
/// # Example
/// ```toml
/// [admin]
/// route = "admin"    # served at /admin/, API at /admin/api/
/// storage = "local"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// URL segment the editor and its API are mounted under.
    #[serde(default = "defaults::admin::route")]
    #[educe(Default = defaults::admin::route())]
    pub route: String,

    /// Storage backend. Only `local` (write to the working tree) exists.
    #[serde(default = "defaults::admin::storage")]
    #[educe(Default = defaults::admin::storage())]
    pub storage: String,
}

impl AdminConfig {
    /// Route with surrounding slashes removed.
    pub fn route(&self) -> &str {
        self.route.trim_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_admin_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.admin.route(), "admin");
        assert_eq!(config.admin.storage, "local");
    }

    #[test]
    fn test_admin_route_trimmed() {
        let config: SiteConfig = toml::from_str("[admin]\nroute = \"/cms/\"").unwrap();
        assert_eq!(config.admin.route(), "cms");
    }
}
