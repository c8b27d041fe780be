use crate::page::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version stamped into every [`SiteExport`]
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// A site: the unit of persistence and of undo/redo snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Theme is carried through untouched; the editor never interprets it
    #[serde(default)]
    pub theme: serde_json::Value,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pages: Vec::new(),
            theme: serde_json::Value::Null,
        }
    }

    pub fn with_pages(mut self, pages: Vec<Page>) -> Self {
        self.pages = pages;
        self
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }
}

/// Portable JSON blob handed to publishing/export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteExport {
    pub site: Site,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

impl SiteExport {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            exported_at: Utc::now(),
            version: EXPORT_FORMAT_VERSION.to_string(),
        }
    }
}
