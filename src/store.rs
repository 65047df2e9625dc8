//! Content file store.
//!
//! Owns every read and write of content files on disk. The build uses the
//! read side; the authoring API uses both.
//!
//! ```text
//! <content>/site/landing.json      landing singleton (JSON, whole file)
//! <content>/people/<slug>.mdoc     one people entry per file
//! <images.directory>/<file>        uploaded images
//! ```
//!
//! Writes go through a single mutex: one writer at a time, last write wins.

use crate::{
    config::{ImageStorage, SiteConfig},
    content::{
        AuthoringError, Collections, ContentError, Landing, Person, PersonRecord, frontmatter,
        person::EXTENSION, validation::PEOPLE,
    },
    log,
    utils::slug::is_slug,
};
use parking_lot::Mutex;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Image file extensions accepted for upload.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"];

/// People entries read for a build.
///
/// Entries that failed to load land in `errors`; the rest are in `records`,
/// sorted by slug.
#[derive(Debug, Default)]
pub struct PeopleLoad {
    pub records: Vec<PersonRecord>,
    pub errors: Vec<ContentError>,
}

pub struct ContentStore {
    root: PathBuf,
    people_dir: PathBuf,
    landing_path: PathBuf,
    images: ImageStorage,
    collections: Collections,
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(config: &SiteConfig) -> Result<Self, ContentError> {
        Ok(Self {
            root: config.get_root().to_path_buf(),
            people_dir: config.people_dir(),
            landing_path: config.landing_path(),
            images: config.content.images.clone(),
            collections: Collections::new()?,
            write_lock: Mutex::new(()),
        })
    }

    // ========================================================================
    // Landing
    // ========================================================================

    pub fn landing_path(&self) -> &Path {
        &self.landing_path
    }

    pub fn read_landing(&self) -> Result<Landing, ContentError> {
        let path = &self.landing_path;
        if !path.is_file() {
            return Err(ContentError::NotFound(path.display().to_string()));
        }
        let source = read(path)?;
        Landing::from_json(&source, path)
    }

    /// Replace the landing document.
    pub fn write_landing(&self, landing: &Landing) -> Result<(), ContentError> {
        let _guard = self.write_lock.lock();
        write(&self.landing_path, landing.to_json().as_bytes())
    }

    // ========================================================================
    // People
    // ========================================================================

    pub fn people_dir(&self) -> &Path {
        &self.people_dir
    }

    pub fn person_path(&self, slug: &str) -> PathBuf {
        self.people_dir.join(format!("{slug}.{EXTENSION}"))
    }

    /// Stems of all entry files, sorted. A stem is not necessarily a valid slug.
    fn stems(&self) -> Result<Vec<String>, ContentError> {
        if !self.people_dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.people_dir)
            .map_err(|err| ContentError::Io(self.people_dir.clone(), err))?;

        let mut stems: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
            .collect();
        stems.sort_unstable();
        Ok(stems)
    }

    /// All people in authoring form, sorted by slug.
    ///
    /// Files whose name is not a slug cannot be edited and are skipped; the
    /// build reports them.
    pub fn list_people(&self) -> Result<Vec<Person>, ContentError> {
        self.stems()?
            .iter()
            .filter(|stem| {
                let valid = is_slug(stem);
                if !valid {
                    log!("store"; "skipping {}", self.person_path(stem).display());
                }
                valid
            })
            .map(|slug| self.read_person(slug))
            .collect()
    }

    pub fn read_person(&self, slug: &str) -> Result<Person, ContentError> {
        if !is_slug(slug) {
            return Err(AuthoringError::InvalidSlug(slug.to_owned()).into());
        }
        let path = self.person_path(slug);
        if !path.is_file() {
            return Err(ContentError::NotFound(format!("{PEOPLE}/{slug}")));
        }
        Person::from_file(slug, &read(&path)?, &path)
    }

    /// Save a person. Nothing is written when an authoring check fails.
    ///
    /// When `previous_slug` names a different entry (the name changed), the
    /// old file is removed after the new one is written.
    pub fn write_person(&self, mut person: Person, previous_slug: Option<&str>) -> Result<Person, ContentError> {
        person.normalize();
        person.check()?;

        let _guard = self.write_lock.lock();
        let path = self.person_path(&person.slug);
        let renamed = previous_slug.filter(|prev| *prev != person.slug);

        if let Some(prev) = renamed {
            if !is_slug(prev) {
                return Err(AuthoringError::InvalidSlug(prev.to_owned()).into());
            }
            if path.exists() {
                return Err(AuthoringError::SlugTaken(person.slug.clone()).into());
            }
        }

        write(&path, person.to_file()?.as_bytes())?;

        if let Some(prev) = renamed {
            let old = self.person_path(prev);
            if old.is_file() {
                fs::remove_file(&old).map_err(|err| ContentError::Io(old, err))?;
            }
        }
        Ok(person)
    }

    pub fn delete_person(&self, slug: &str) -> Result<(), ContentError> {
        if !is_slug(slug) {
            return Err(AuthoringError::InvalidSlug(slug.to_owned()).into());
        }
        let _guard = self.write_lock.lock();
        let path = self.person_path(slug);
        if !path.is_file() {
            return Err(ContentError::NotFound(format!("{PEOPLE}/{slug}")));
        }
        fs::remove_file(&path).map_err(|err| ContentError::Io(path, err))
    }

    /// Read every people entry through the relaxed build-time schema.
    pub fn read_person_entries(&self) -> Result<PeopleLoad, ContentError> {
        let schema = self.collections.get(PEOPLE)?;
        let mut load = PeopleLoad::default();

        for slug in self.stems()? {
            let path = self.person_path(&slug);
            if !is_slug(&slug) {
                load.errors.push(ContentError::InvalidFileName(path));
                continue;
            }
            let record = read(&path).and_then(|source| {
                let split = frontmatter::split(&source, &path)?;
                let value = frontmatter::parse(split.front_matter, &path)?;
                schema.validate(&slug, &value)?;
                PersonRecord::from_validated(&slug, value, split.body, &path)
            });
            match record {
                Ok(record) => load.records.push(record),
                Err(err) => load.errors.push(err),
            }
        }
        Ok(load)
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Store an uploaded image and return the reference to save in content.
    pub fn store_image(&self, file_name: &str, bytes: &[u8]) -> Result<String, ContentError> {
        if !is_image_name(file_name) {
            return Err(AuthoringError::InvalidImageName(file_name.to_owned()).into());
        }
        let path = self
            .images
            .disk_path(&self.root, file_name)
            .ok_or_else(|| AuthoringError::InvalidImageName(file_name.to_owned()))?;

        let _guard = self.write_lock.lock();
        write(&path, bytes)?;
        Ok(self.images.resolve(file_name))
    }
}

fn is_image_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
        && path.file_stem().is_some_and(|stem| !stem.is_empty())
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|err| ContentError::Io(path.to_path_buf(), err))
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), ContentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ContentError::Io(parent.to_path_buf(), err))?;
    }
    fs::write(path, bytes).map_err(|err| ContentError::Io(path.to_path_buf(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.resolve_paths(dir.path());
        let store = ContentStore::new(&config).unwrap();
        (dir, store)
    }

    fn write_entry(store: &ContentStore, slug: &str, source: &str) {
        fs::create_dir_all(store.people_dir()).unwrap();
        fs::write(store.person_path(slug), source).unwrap();
    }

    #[test]
    fn test_landing_round_trip() {
        let (_dir, store) = store();
        assert!(matches!(store.read_landing(), Err(ContentError::NotFound(_))));

        let mut landing = Landing::default();
        landing.hero.title = "Hello".into();
        store.write_landing(&landing).unwrap();

        assert_eq!(store.read_landing().unwrap(), landing);
        let on_disk = fs::read_to_string(store.landing_path()).unwrap();
        assert_eq!(on_disk, landing.to_json());
    }

    #[test]
    fn test_write_and_list_people() {
        let (_dir, store) = store();
        assert!(store.list_people().unwrap().is_empty());

        store.write_person(Person::new("Grace Hopper", "Admiral"), None).unwrap();
        store.write_person(Person::new("Ada Lovelace", "Engineer"), None).unwrap();

        let slugs: Vec<_> = store.list_people().unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["ada-lovelace", "grace-hopper"]);
        assert_eq!(store.read_person("ada-lovelace").unwrap().role, "Engineer");
    }

    #[test]
    fn test_write_person_rejects_missing_role() {
        let (_dir, store) = store();
        let err = store.write_person(Person::new("Ada", ""), None).unwrap_err();

        assert!(matches!(err, ContentError::Authoring(AuthoringError::Required { field: "role" })));
        assert!(!store.person_path("ada").exists());
    }

    #[test]
    fn test_write_person_derives_slug() {
        let (_dir, store) = store();
        let person = Person {
            name: "Zoë Quinn".into(),
            role: "Lead".into(),
            ..Person::default()
        };
        let saved = store.write_person(person, None).unwrap();

        assert_eq!(saved.slug, "zoe-quinn");
        assert!(store.person_path("zoe-quinn").is_file());
    }

    #[test]
    fn test_rename_moves_file() {
        let (_dir, store) = store();
        store.write_person(Person::new("Ada", "Engineer"), None).unwrap();

        let renamed = Person::new("Ada Lovelace", "Engineer");
        store.write_person(renamed, Some("ada")).unwrap();

        assert!(!store.person_path("ada").exists());
        assert!(store.person_path("ada-lovelace").is_file());
    }

    #[test]
    fn test_rename_onto_existing_slug_fails() {
        let (_dir, store) = store();
        store.write_person(Person::new("Ada", "Engineer"), None).unwrap();
        store.write_person(Person::new("Grace", "Admiral"), None).unwrap();

        let err = store.write_person(Person::new("Grace", "Engineer"), Some("ada")).unwrap_err();
        assert!(matches!(err, ContentError::Authoring(AuthoringError::SlugTaken(_))));
        assert!(store.person_path("ada").is_file());
        assert_eq!(store.read_person("grace").unwrap().role, "Admiral");
    }

    #[test]
    fn test_delete_person() {
        let (_dir, store) = store();
        store.write_person(Person::new("Ada", "Engineer"), None).unwrap();

        store.delete_person("ada").unwrap();
        assert!(matches!(store.delete_person("ada"), Err(ContentError::NotFound(_))));
        assert!(matches!(
            store.delete_person("../ada"),
            Err(ContentError::Authoring(AuthoringError::InvalidSlug(_)))
        ));
    }

    #[test]
    fn test_read_person_entries_relaxed() {
        let (_dir, store) = store();
        write_entry(&store, "ada", "---\nname: Ada\n---\nBio.\n");
        write_entry(&store, "bare", "Only a body.\n");
        write_entry(&store, "bad", "---\nname: Bad\nrole: 42\n---\n");

        let load = store.read_person_entries().unwrap();
        let slugs: Vec<_> = load.records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["ada", "bare"]);
        assert_eq!(load.records[0].body, "Bio.\n");

        assert_eq!(load.errors.len(), 1);
        let ContentError::Validation { entry, violations, .. } = &load.errors[0] else {
            panic!("expected a validation error");
        };
        assert_eq!(entry, "bad");
        assert_eq!(violations[0].field, "role");
    }

    #[test]
    fn test_non_slug_file_name() {
        let (_dir, store) = store();
        store.write_person(Person::new("Grace", "Admiral"), None).unwrap();
        write_entry(&store, "Ada Lovelace", "---\nname: Ada Lovelace\nrole: Engineer\n---\n");

        // The editor still lists every editable entry.
        let listed: Vec<_> = store.list_people().unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(listed, ["grace"]);

        // The build reports the file instead of rendering a page for it.
        let load = store.read_person_entries().unwrap();
        let slugs: Vec<_> = load.records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["grace"]);
        assert_eq!(load.errors.len(), 1);
        let ContentError::InvalidFileName(path) = &load.errors[0] else {
            panic!("expected a file name error");
        };
        assert!(path.ends_with("Ada Lovelace.mdoc"));
    }

    #[test]
    fn test_store_image() {
        let (dir, store) = store();
        let url = store.store_image("ada.png", b"\x89PNG").unwrap();

        assert_eq!(url, "/images/people/ada.png");
        let root = dir.path().canonicalize().unwrap();
        assert!(root.join("public/images/people/ada.png").is_file());
    }

    #[test]
    fn test_store_image_rejects_bad_names() {
        let (_dir, store) = store();
        for name in ["../x.png", "a/b.png", ".png", "notes.txt", "noext"] {
            assert!(
                matches!(
                    store.store_image(name, b""),
                    Err(ContentError::Authoring(AuthoringError::InvalidImageName(_)))
                ),
                "{name} should be rejected"
            );
        }
    }
}
