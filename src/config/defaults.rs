//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use super::super::BuildMode;
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn public() -> PathBuf {
        "public".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn mode() -> BuildMode {
        BuildMode::default()
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn people() -> PathBuf {
        "people".into()
    }

    pub fn landing() -> PathBuf {
        "site/landing.json".into()
    }

    pub fn image_directory() -> PathBuf {
        "public/images/people".into()
    }

    pub fn image_public_path() -> String {
        "/images/people/".into()
    }
}

// ============================================================================
// [admin] Section Defaults
// ============================================================================

pub mod admin {
    pub fn route() -> String {
        "admin".into()
    }

    pub fn storage() -> String {
        "local".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        4321
    }
}
