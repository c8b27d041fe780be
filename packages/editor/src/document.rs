//! # Site Document
//!
//! One editing session over a site.
//!
//! A `SiteDocument` owns the current [`Site`], the selected page, the
//! snapshot history and the collaborators mutations need (block library,
//! id source). Edits go through [`SiteDocument::apply`]; each one that
//! changes the site pushes a snapshot, so undo/redo simply swap whole
//! sites.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Undo/Redo → Save
//!   ↓      ↓        ↓         ↓
//! Storage Mutation Snapshot  Storage
//! ```
//!
//! The selected page always names an existing page (or nothing when the
//! site has no pages); when it disappears the first page in navigation
//! order takes over.

use crate::errors::EditorError;
use crate::hierarchy::{first_page, validate_hierarchy};
use crate::mutations::{ApplyContext, Mutation, MutationError};
use crate::registry::Registry;
use crate::storage::{export_site, SiteStorage};
use crate::undo_stack::{UndoStack, DEFAULT_MAX_LEVELS};
use sitecraft_model::{Block, IdGenerator, IdSource, Page, Site};
use tracing::{debug, info};

/// What an applied mutation did
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// Document version after the edit
    pub version: u64,

    /// Ids of created pages or root blocks
    pub created: Vec<String>,

    /// False when the mutation was a no-op
    pub changed: bool,
}

/// Editable site with history
pub struct SiteDocument {
    site: Site,
    current_page_id: Option<String>,
    history: UndoStack<Site>,
    registry: Registry,
    ids: Box<dyn IdSource>,

    /// Current version number (increments on each change)
    pub version: u64,

    dirty: bool,
}

impl SiteDocument {
    pub fn new(site: Site, registry: Registry, ids: Box<dyn IdSource>) -> Self {
        Self::with_history_depth(site, registry, ids, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_depth(
        site: Site,
        registry: Registry,
        ids: Box<dyn IdSource>,
        history_depth: usize,
    ) -> Self {
        let mut history = UndoStack::with_max_levels(history_depth);
        history.push(site.clone(), "Open site");
        let current_page_id = first_page(&site.pages).map(|p| p.id.clone());

        Self {
            site,
            current_page_id,
            history,
            registry,
            ids,
            version: 0,
            dirty: false,
        }
    }

    /// Load a site from storage, checking its page hierarchy
    pub fn open(
        storage: &dyn SiteStorage,
        site_id: &str,
        registry: Registry,
        history_depth: usize,
    ) -> Result<Self, EditorError> {
        let site = storage
            .load(site_id)?
            .ok_or_else(|| EditorError::SiteNotFound(site_id.to_string()))?;
        validate_hierarchy(&site.pages)?;

        info!(site_id = %site_id, pages = site.pages.len(), "opened site");
        let ids = Box::new(IdGenerator::new(site_id));
        Ok(Self::with_history_depth(site, registry, ids, history_depth))
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.current_page_id.as_deref()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page_id
            .as_deref()
            .and_then(|id| self.site.page(id))
    }

    /// Blocks of the selected page
    pub fn current_content(&self) -> Result<&[Block], EditorError> {
        self.current_page()
            .map(|p| p.content.as_slice())
            .ok_or(EditorError::NoCurrentPage)
    }

    pub fn select_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        if self.site.page(page_id).is_none() {
            return Err(MutationError::PageNotFound(page_id.to_string()).into());
        }
        self.current_page_id = Some(page_id.to_string());
        Ok(())
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: &Mutation) -> Result<ApplyOutcome, EditorError> {
        let mut ctx = ApplyContext {
            registry: &self.registry,
            ids: self.ids.as_mut(),
        };
        let result = mutation.apply(&self.site, &mut ctx)?;

        if result.site == self.site {
            debug!(mutation = mutation.name(), "mutation changed nothing");
            return Ok(ApplyOutcome {
                version: self.version,
                created: result.created,
                changed: false,
            });
        }

        self.site = result.site;
        self.history.push(self.site.clone(), mutation.description());
        self.mark_changed();

        info!(mutation = mutation.name(), version = self.version, "applied mutation");
        Ok(ApplyOutcome {
            version: self.version,
            created: result.created,
            changed: true,
        })
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    /// Revert the last edit; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo() else {
            return false;
        };
        self.site = previous.clone();
        self.mark_changed();
        debug!(version = self.version, "undo");
        true
    }

    /// Reapply the last undone edit; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo() else {
            return false;
        };
        self.site = next.clone();
        self.mark_changed();
        debug!(version = self.version, "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self, storage: &mut dyn SiteStorage) -> Result<(), EditorError> {
        storage.save(&self.site)?;
        self.dirty = false;
        Ok(())
    }

    /// Versioned JSON export of the current site
    pub fn export(&self) -> Result<String, EditorError> {
        export_site(&self.site)
    }

    fn mark_changed(&mut self) {
        self.version += 1;
        self.dirty = true;
        self.ensure_current_page();
    }

    /// Fall back to the first page when the selection no longer exists
    fn ensure_current_page(&mut self) {
        let exists = self
            .current_page_id
            .as_deref()
            .map_or(false, |id| self.site.page(id).is_some());
        if !exists {
            self.current_page_id = first_page(&self.site.pages).map(|p| p.id.clone());
            debug!(page_id = ?self.current_page_id, "selected fallback page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::OrphanPolicy;
    use crate::storage::MemoryStorage;
    use sitecraft_model::BlockType;

    fn document() -> SiteDocument {
        let pages = vec![
            Page::new("home", "Home").with_order(0),
            Page::new("about", "About").with_order(1),
        ];
        let site = Site::new("demo", "Demo").with_pages(pages);
        SiteDocument::new(site, Registry::builtin(), Box::new(IdGenerator::from_seed("d")))
    }

    fn add_text(page_id: &str) -> Mutation {
        Mutation::AddBlock {
            page_id: page_id.to_string(),
            block_type: BlockType::Text,
            placement: None,
        }
    }

    #[test]
    fn test_document_creation() {
        let doc = document();
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.current_page_id(), Some("home"));
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_apply_and_undo() {
        let mut doc = document();
        let outcome = doc.apply(&add_text("home")).unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.version, 1);
        assert_eq!(doc.current_content().unwrap().len(), 1);
        assert_eq!(doc.undo_description(), Some("Add text block"));

        assert!(doc.undo());
        assert!(doc.current_content().unwrap().is_empty());
        assert!(doc.redo());
        assert_eq!(doc.current_content().unwrap().len(), 1);
        assert!(!doc.redo());
    }

    #[test]
    fn test_noop_is_not_recorded() {
        let mut doc = document();
        let outcome = doc
            .apply(&Mutation::DeleteBlock {
                page_id: "home".to_string(),
                block_id: "missing".to_string(),
            })
            .unwrap();

        assert!(!outcome.changed);
        assert_eq!(doc.version, 0);
        assert!(!doc.can_undo());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_deleting_current_page_falls_back() {
        let mut doc = document();
        doc.apply(&Mutation::DeletePage {
            page_id: "home".to_string(),
            policy: OrphanPolicy::PromoteToParent,
        })
        .unwrap();

        assert_eq!(doc.current_page_id(), Some("about"));

        assert!(doc.undo());
        assert!(doc.site().page("home").is_some());
        assert_eq!(doc.current_page_id(), Some("about"));
    }

    #[test]
    fn test_undo_past_selected_page_creation() {
        let mut doc = document();
        let outcome = doc
            .apply(&Mutation::CreatePage {
                title: "Blog".to_string(),
                parent_id: None,
            })
            .unwrap();
        doc.select_page(&outcome.created[0]).unwrap();

        assert!(doc.undo());
        assert_eq!(doc.current_page_id(), Some("home"));
    }

    #[test]
    fn test_select_unknown_page() {
        let mut doc = document();
        assert!(matches!(
            doc.select_page("nope"),
            Err(EditorError::Mutation(MutationError::PageNotFound(_)))
        ));
    }

    #[test]
    fn test_batch_is_one_undo_step() {
        let mut doc = document();
        doc.begin_batch("Build layout");
        doc.apply(&add_text("home")).unwrap();
        doc.apply(&add_text("home")).unwrap();
        doc.end_batch();

        assert_eq!(doc.undo_description(), Some("Build layout"));
        assert!(doc.undo());
        assert!(doc.current_content().unwrap().is_empty());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_save_and_open() {
        let mut storage = MemoryStorage::new();
        let mut doc = document();
        doc.apply(&add_text("about")).unwrap();
        doc.save(&mut storage).unwrap();
        assert!(!doc.is_dirty());

        let reopened = SiteDocument::open(&storage, "demo", Registry::builtin(), 10).unwrap();
        assert_eq!(reopened.site(), doc.site());

        assert!(matches!(
            SiteDocument::open(&storage, "other", Registry::builtin(), 10),
            Err(EditorError::SiteNotFound(_))
        ));
    }
}
