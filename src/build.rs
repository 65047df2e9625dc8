//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── load_content()  ──► landing + people through the content schema
//!     │                       (every violation is reported, then the build fails)
//!     │
//!     ├── rayon::join
//!     │       ├── render_pages()  ──► index, people listing, one page per person
//!     │       └── copy_public()   ──► public/ copied verbatim
//!     │
//!     ├── admin::remove_from_output()  ──► production only, drops a stale editor
//!     │
//!     └── integrations::registered()  ──► sitemap, admin (development only)
//! ```

use crate::{
    admin,
    config::SiteConfig,
    content::{ContentError, Landing, PersonRecord},
    integrations, log,
    render::{Page, Renderer, person_views},
    store::ContentStore,
};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Validated content of the whole site.
#[derive(Debug)]
pub struct SiteContent {
    pub landing: Landing,
    pub people: Vec<PersonRecord>,
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// URL paths of every rendered page, in render order.
    pub pages: Vec<String>,
    /// Names of the integrations that ran.
    pub integrations: Vec<&'static str>,
}

/// Read and validate all content, logging every problem before failing.
pub fn load_content(config: &SiteConfig) -> Result<SiteContent> {
    let store = ContentStore::new(config)?;
    let mut errors: Vec<ContentError> = Vec::new();

    let landing = match store.read_landing() {
        Ok(landing) => Some(landing),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    let people = store.read_person_entries()?;
    errors.extend(people.errors);

    if !errors.is_empty() {
        for err in &errors {
            log!("invalid"; "{err}");
        }
        bail!("{} content error(s)", errors.len());
    }

    Ok(SiteContent {
        landing: landing.ok_or_else(|| anyhow!("landing document missing"))?,
        people: people.records,
    })
}

/// Build the entire site into `[build].output`.
///
/// If `config.build.clean` is true, clears the output directory first.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let output = &config.build.output;

    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let content = load_content(config)?;
    let renderer = Renderer::new(config)?;

    log!("build"; "{} mode, {} people", config.build.mode, content.people.len());

    let (pages, copied) = rayon::join(
        || render_pages(config, &renderer, &content),
        || copy_public(&config.build.public, output),
    );
    let pages = pages?;
    let copied = copied?;

    pages.par_iter().try_for_each(|page| write_page(output, page))?;

    let mut report = BuildReport {
        pages: pages.into_iter().map(|page| page.url).collect(),
        integrations: Vec::new(),
    };

    if !config.admin_enabled() {
        admin::remove_from_output(config)?;
    }

    for integration in integrations::registered(config) {
        integration
            .emit(config, &report)
            .with_context(|| format!("{} integration failed", integration.name()))?;
        report.integrations.push(integration.name());
    }

    log!("build"; "done: {} pages, {} public files", report.pages.len(), copied);
    Ok(report)
}

fn render_pages(config: &SiteConfig, renderer: &Renderer, content: &SiteContent) -> Result<Vec<Page>> {
    let people = person_views(config, &content.people);

    let (fixed, profiles) = rayon::join(
        || -> Result<Vec<Page>> {
            Ok(vec![
                renderer.index(config, &content.landing, &people)?,
                renderer.people(config, &people)?,
            ])
        },
        || {
            people
                .par_iter()
                .map(|person| renderer.person(config, person))
                .collect::<Result<Vec<Page>>>()
        },
    );

    let mut pages = fixed?;
    pages.extend(profiles?);
    Ok(pages)
}

fn write_page(output: &Path, page: &Page) -> Result<()> {
    let path = output.join(&page.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &page.html).with_context(|| format!("Failed to write {}", path.display()))
}

/// Copy `public/` into the output as-is. Returns the number of files copied.
fn copy_public(public: &Path, output: &Path) -> Result<usize> {
    if !public.is_dir() {
        return Ok(0);
    }

    let files: Vec<_> = WalkDir::new(public)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.par_iter().try_for_each(|src| -> Result<()> {
        let rel = src.strip_prefix(public)?;
        let dest = output.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, &dest)
            .with_context(|| format!("Failed to copy {}", src.display()))?;
        Ok(())
    })?;

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BuildMode, content::Person};
    use std::path::PathBuf;

    fn site(mode: BuildMode) -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.base.title = "Northwind".into();
        config.build.mode = mode;
        config.resolve_paths(dir.path());

        let store = ContentStore::new(&config).unwrap();
        let mut landing = Landing::default();
        landing.hero.title = "Welcome".into();
        store.write_landing(&landing).unwrap();

        let mut ada = Person::new("Ada Lovelace", "Engineer");
        ada.bio = "Writes **compilers**.".into();
        store.write_person(ada, None).unwrap();
        store.write_person(Person::new("Grace Hopper", "Admiral"), None).unwrap();

        fs::create_dir_all(config.build.public.join("images/people")).unwrap();
        fs::write(config.build.public.join("images/people/ada.png"), b"png").unwrap();
        fs::write(config.build.public.join("robots.txt"), "User-agent: *\n").unwrap();

        (dir, config)
    }

    fn tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_build_renders_pages_and_copies_public() {
        let (_dir, config) = site(BuildMode::Development);
        let report = build_site(&config).unwrap();

        assert_eq!(
            report.pages,
            ["/", "/people/", "/people/ada-lovelace/", "/people/grace-hopper/"]
        );
        let out = &config.build.output;
        assert!(out.join("index.html").is_file());
        assert!(out.join("people/ada-lovelace/index.html").is_file());
        assert!(out.join("images/people/ada.png").is_file());
        assert!(out.join("robots.txt").is_file());
    }

    #[test]
    fn test_admin_only_in_development() {
        let (_dev_dir, dev) = site(BuildMode::Development);
        let (_prod_dir, prod) = site(BuildMode::Production);

        let dev_report = build_site(&dev).unwrap();
        let prod_report = build_site(&prod).unwrap();

        assert_eq!(dev_report.integrations, ["admin"]);
        assert!(prod_report.integrations.is_empty());
        assert!(dev.build.output.join("admin/index.html").is_file());
        assert!(!prod.build.output.join("admin").exists());

        // Page output is identical apart from the admin directory.
        let dev_pages: Vec<_> = tree(&dev.build.output)
            .into_iter()
            .filter(|(path, _)| !path.starts_with("admin"))
            .collect();
        assert_eq!(dev_pages, tree(&prod.build.output));
    }

    #[test]
    fn test_production_rebuild_drops_admin_from_reused_output() {
        let (_dir, mut config) = site(BuildMode::Development);
        build_site(&config).unwrap();
        let admin_dir = config.build.output.join("admin");
        assert!(admin_dir.join("index.html").is_file());
        assert!(admin_dir.join("schema.json").is_file());

        config.build.mode = BuildMode::Production;
        assert!(!config.build.clean);
        let report = build_site(&config).unwrap();

        assert!(report.integrations.is_empty());
        assert!(!admin_dir.exists());
        assert!(config.build.output.join("index.html").is_file());
    }

    #[test]
    fn test_build_reports_every_violation() {
        let (_dir, config) = site(BuildMode::Development);
        let people = config.people_dir();
        fs::write(people.join("bad-one.mdoc"), "---\nrole: 1\n---\n").unwrap();
        fs::write(people.join("bad-two.mdoc"), "---\nemail: [a]\n---\n").unwrap();

        let err = build_site(&config).unwrap_err();
        assert_eq!(err.to_string(), "2 content error(s)");
    }

    #[test]
    fn test_missing_landing_fails() {
        let (_dir, config) = site(BuildMode::Production);
        fs::remove_file(config.landing_path()).unwrap();

        assert!(load_content(&config).is_err());
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let (_dir, mut config) = site(BuildMode::Production);
        fs::create_dir_all(&config.build.output).unwrap();
        fs::write(config.build.output.join("stale.html"), "old").unwrap();

        config.build.clean = true;
        build_site(&config).unwrap();
        assert!(!config.build.output.join("stale.html").exists());
    }

    #[test]
    fn test_entries_with_missing_optional_fields_build() {
        let (_dir, config) = site(BuildMode::Production);
        fs::write(config.people_dir().join("anon.mdoc"), "Just a body.\n").unwrap();

        let report = build_site(&config).unwrap();
        assert!(report.pages.contains(&"/people/anon/".to_owned()));
    }
}
