//! Persistence providers for sites
//!
//! The editing core never assumes where a site lives; it talks to a
//! [`SiteStorage`]. `FileStorage` keeps one pretty-printed JSON file per
//! site, `MemoryStorage` is for tests.

use crate::errors::EditorError;
use sitecraft_model::{Site, SiteExport, EXPORT_FORMAT_VERSION};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load/save abstraction over site persistence
pub trait SiteStorage {
    /// `Ok(None)` when no site with `site_id` exists
    fn load(&self, site_id: &str) -> Result<Option<Site>, EditorError>;

    fn save(&mut self, site: &Site) -> Result<(), EditorError>;
}

/// Sites stored as `<dir>/<site_id>.json`
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn site_path(&self, site_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", site_id))
    }
}

impl SiteStorage for FileStorage {
    fn load(&self, site_id: &str) -> Result<Option<Site>, EditorError> {
        let path = self.site_path(site_id);
        if !path.exists() {
            debug!(path = %path.display(), "no stored site");
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, site: &Site) -> Result<(), EditorError> {
        fs::create_dir_all(&self.root)?;
        let path = self.site_path(&site.id);
        fs::write(&path, serde_json::to_string_pretty(site)?)?;
        info!(path = %path.display(), pages = site.pages.len(), "saved site");
        Ok(())
    }
}

/// In-memory storage for testing
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub sites: HashMap<String, Site>,
    pub saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.sites.insert(site.id.clone(), site);
        self
    }
}

impl SiteStorage for MemoryStorage {
    fn load(&self, site_id: &str) -> Result<Option<Site>, EditorError> {
        Ok(self.sites.get(site_id).cloned())
    }

    fn save(&mut self, site: &Site) -> Result<(), EditorError> {
        self.sites.insert(site.id.clone(), site.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Serialize a site as a versioned export blob
pub fn export_site(site: &Site) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(&SiteExport::new(site.clone()))?)
}

/// Parse an export blob; `site` and `version` are required and the version
/// must match [`EXPORT_FORMAT_VERSION`]
pub fn import_site(json: &str) -> Result<Site, EditorError> {
    let export: SiteExport = serde_json::from_str(json)?;
    if export.version != EXPORT_FORMAT_VERSION {
        warn!(version = %export.version, "rejecting export with unsupported version");
        return Err(EditorError::UnsupportedExportVersion(export.version));
    }
    Ok(export.site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecraft_model::{Block, BlockType, Page};

    fn site() -> Site {
        let page = Page::new("home", "Home").with_content(vec![Block::new("b1", BlockType::Gallery)]);
        Site::new("demo", "Demo").with_pages(vec![page])
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("sites"));
        let site = site();

        assert!(storage.load("demo").unwrap().is_none());

        storage.save(&site).unwrap();
        assert!(storage.site_path("demo").exists());
        assert_eq!(storage.load("demo").unwrap(), Some(site));
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        fs::write(storage.site_path("bad"), "{ not json").unwrap();

        assert!(matches!(storage.load("bad"), Err(EditorError::Json(_))));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        let site = site();
        storage.save(&site).unwrap();
        assert_eq!(storage.saves, 1);
        assert_eq!(storage.load("demo").unwrap(), Some(site));
        assert_eq!(storage.load("other").unwrap(), None);
    }

    #[test]
    fn test_export_round_trip() {
        let site = site();
        let json = export_site(&site).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], EXPORT_FORMAT_VERSION);
        assert!(value.get("exportedAt").is_some());

        assert_eq!(import_site(&json).unwrap(), site);
    }

    #[test]
    fn test_import_checks_version_and_site() {
        let json = export_site(&site()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();

        value["version"] = serde_json::json!("9.9");
        assert!(matches!(
            import_site(&value.to_string()),
            Err(EditorError::UnsupportedExportVersion(v)) if v == "9.9"
        ));

        let mut missing_version = value.clone();
        missing_version.as_object_mut().unwrap().remove("version");
        assert!(matches!(import_site(&missing_version.to_string()), Err(EditorError::Json(_))));

        let mut missing_site = value;
        missing_site["version"] = serde_json::json!(EXPORT_FORMAT_VERSION);
        missing_site.as_object_mut().unwrap().remove("site");
        assert!(matches!(import_site(&missing_site.to_string()), Err(EditorError::Json(_))));
    }
}
