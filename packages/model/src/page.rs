//! # Pages
//!
//! A page is a node in the site's navigation forest. `parent_id` is the
//! authoritative edge; `children` caches the same edge from the parent
//! side and must always agree with it. `order` sorts siblings and is
//! unique within one sibling group.
//!
//! [`PageSettings`] is the content-free projection the hierarchy editor
//! works with.

use crate::block::Block;
use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowercase `text`, collapse every run of non-alphanumeric characters to
/// a single `-` and trim dashes from both ends
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Lowercase alphanumeric runs joined by single dashes, e.g. `our-team-2`
pub fn is_valid_slug(slug: &str) -> bool {
    slug.split('-').all(|part| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

/// Check that `slug` is well formed and not one of `taken`
pub fn validate_slug<'a>(
    slug: &str,
    taken: impl IntoIterator<Item = &'a str>,
) -> Result<(), ModelError> {
    if !is_valid_slug(slug) {
        return Err(ModelError::InvalidSlug(slug.to_string()));
    }
    if taken.into_iter().any(|t| t == slug) {
        return Err(ModelError::SlugTaken(slug.to_string()));
    }
    Ok(())
}

/// `base`, or the first of `base-2`, `base-3`, ... not in `taken`
///
/// An empty `base` becomes `page`.
pub fn unique_slug<'a>(base: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let base = if base.is_empty() { "page" } else { base };
    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&base) {
        return base.to_string();
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    pub enabled: bool,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            height: 200,
            background_image: None,
            background_color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    pub enabled: bool,
    pub content: String,
}

/// A page of the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default = "default_true")]
    pub show_in_nav: bool,
    #[serde(default)]
    pub is_dummy: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub header_config: HeaderConfig,
    #[serde(default)]
    pub footer_config: FooterConfig,
    #[serde(default)]
    pub content: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Root-level page with an empty body and a slug derived from `title`
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: id.into(),
            slug: slugify(&title),
            title,
            url_prefix: None,
            order: 0,
            parent_id: None,
            children: Vec::new(),
            show_in_nav: true,
            is_dummy: false,
            is_published: false,
            header_config: HeaderConfig::default(),
            footer_config: FooterConfig::default(),
            content: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_content(mut self, content: Vec<Block>) -> Self {
        self.content = content;
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// URL segment: `url_prefix` when set, otherwise the slug
    pub fn path_segment(&self) -> &str {
        self.url_prefix.as_deref().unwrap_or(&self.slug)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Content-free projection for the hierarchy editor
    pub fn settings(&self) -> PageSettings {
        PageSettings::from(self)
    }
}

/// Partial edit of a page's non-structural settings
///
/// Parent, order and children are changed through the hierarchy
/// operations only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_in_nav: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dummy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_config: Option<HeaderConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_config: Option<FooterConfig>,
}

impl PagePatch {
    /// Merge into `page`; a new `url_prefix` also re-derives the slug
    pub fn apply_to(&self, page: &mut Page) {
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(prefix) = &self.url_prefix {
            page.slug = slugify(prefix);
            page.url_prefix = Some(prefix.clone());
        }
        if let Some(show) = self.show_in_nav {
            page.show_in_nav = show;
        }
        if let Some(dummy) = self.is_dummy {
            page.is_dummy = dummy;
        }
        if let Some(published) = self.is_published {
            page.is_published = published;
        }
        if let Some(header) = &self.header_config {
            page.header_config = header.clone();
        }
        if let Some(footer) = &self.footer_config {
            page.footer_config = footer.clone();
        }
        page.touch();
    }
}

/// Navigation/hierarchy projection of a [`Page`]
///
/// Drops content, publication state and timestamps; `url_prefix` is always
/// present (falls back to the page's slug).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub id: String,
    pub title: String,
    pub url_prefix: String,
    #[serde(default = "default_true")]
    pub show_in_nav: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_dummy: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub header_config: HeaderConfig,
    #[serde(default)]
    pub footer_config: FooterConfig,
}

impl From<&Page> for PageSettings {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            url_prefix: page.path_segment().to_string(),
            show_in_nav: page.show_in_nav,
            parent_id: page.parent_id.clone(),
            is_dummy: page.is_dummy,
            order: page.order,
            children: page.children.clone(),
            header_config: page.header_config.clone(),
            footer_config: page.footer_config.clone(),
        }
    }
}

impl From<PageSettings> for Page {
    /// Unpublished page with empty content and fresh timestamps
    fn from(settings: PageSettings) -> Self {
        let now = Utc::now();
        Self {
            id: settings.id,
            title: settings.title,
            slug: slugify(&settings.url_prefix),
            url_prefix: Some(settings.url_prefix),
            order: settings.order,
            parent_id: settings.parent_id,
            children: settings.children,
            show_in_nav: settings.show_in_nav,
            is_dummy: settings.is_dummy,
            is_published: false,
            header_config: settings.header_config,
            footer_config: settings.footer_config,
            content: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
