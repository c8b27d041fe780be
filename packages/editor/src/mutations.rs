//! # Site Mutations
//!
//! One serializable command per user action. Applying a mutation never
//! modifies the input site; it returns a new one, which the editing
//! session snapshots for undo.
//!
//! ## Semantics
//!
//! ### Block edits
//! - Address a page explicitly: an unknown page id is `PageNotFound`
//! - Unknown block ids inside the page are silent no-ops
//! - Moving a block into its own subtree is a silent no-op
//! - Index-based moves report `IndexOutOfRange`
//!
//! ### Library inserts
//! - Unknown template id is `TemplateNotFound`
//! - Unknown combination id inserts nothing
//!
//! ### Page edits
//! - Reparent/reorder on unknown ids or into a page's own subtree are
//!   silent no-ops
//! - Creating a page under an unknown parent is `PageNotFound`

use crate::block_tree::{self, ForestRef};
use crate::hierarchy::{self, OrphanPolicy};
use crate::registry::{create_block, Registry};
use serde::{Deserialize, Serialize};
use sitecraft_model::{
    Block, BlockPatch, BlockType, DropPosition, IdSource, ModelError, Page, PagePatch, Site,
};
use thiserror::Error;
use tracing::debug;

/// Where newly created blocks go; `None` in a mutation means "append at root"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub target_id: String,
    pub position: DropPosition,
}

impl Placement {
    pub fn new(target_id: impl Into<String>, position: DropPosition) -> Self {
        Self {
            target_id: target_id.into(),
            position,
        }
    }
}

/// Semantic edits of a site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Add a default block of `block_type`
    AddBlock {
        page_id: String,
        block_type: BlockType,
        placement: Option<Placement>,
    },

    InsertTemplate {
        page_id: String,
        template_id: String,
        placement: Option<Placement>,
    },

    InsertCombination {
        page_id: String,
        combination_id: String,
        placement: Option<Placement>,
    },

    UpdateBlock {
        page_id: String,
        block_id: String,
        patch: BlockPatch,
    },

    /// Remove a block and its subtree
    DeleteBlock {
        page_id: String,
        block_id: String,
    },

    /// Drag and drop relative to another block
    MoveBlock {
        page_id: String,
        source_id: String,
        target_id: String,
        position: DropPosition,
    },

    MoveBlockIntoColumn {
        page_id: String,
        source_id: String,
        columns_block_id: String,
        column_id: String,
        index: usize,
    },

    /// Positional move inside one forest
    ReorderBlocks {
        page_id: String,
        forest: ForestRef,
        source_index: usize,
        destination_index: usize,
    },

    /// Positional move between two forests (drag across columns)
    MoveBlockToColumn {
        page_id: String,
        source: ForestRef,
        destination: ForestRef,
        source_index: usize,
        destination_index: usize,
    },

    CreatePage {
        title: String,
        parent_id: Option<String>,
    },

    UpdatePageSettings {
        page_id: String,
        patch: PagePatch,
    },

    ReparentPage {
        page_id: String,
        new_parent_id: Option<String>,
    },

    ReorderPages {
        source_id: String,
        target_id: String,
        position: DropPosition,
    },

    DeletePage {
        page_id: String,
        #[serde(default)]
        policy: OrphanPolicy,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Collaborators a mutation needs besides the site itself
pub struct ApplyContext<'a> {
    pub registry: &'a Registry,
    pub ids: &'a mut dyn IdSource,
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub site: Site,

    /// Ids of created pages, or of created root blocks
    pub created: Vec<String>,
}

impl Mutation {
    /// Apply to `site`, returning the edited copy
    pub fn apply(&self, site: &Site, ctx: &mut ApplyContext<'_>) -> Result<MutationResult, MutationError> {
        match self {
            Mutation::AddBlock {
                page_id,
                block_type,
                placement,
            } => {
                let block = create_block(*block_type, &mut *ctx.ids);
                Self::insert_new_blocks(site, page_id, vec![block], placement.as_ref())
            }

            Mutation::InsertTemplate {
                page_id,
                template_id,
                placement,
            } => {
                Self::page(site, page_id)?;
                let block = ctx
                    .registry
                    .create_block_from_template(template_id, &mut *ctx.ids)?;
                Self::insert_new_blocks(site, page_id, vec![block], placement.as_ref())
            }

            Mutation::InsertCombination {
                page_id,
                combination_id,
                placement,
            } => {
                Self::page(site, page_id)?;
                let blocks = ctx
                    .registry
                    .create_blocks_from_combination(combination_id, &mut *ctx.ids);
                Self::insert_new_blocks(site, page_id, blocks, placement.as_ref())
            }

            Mutation::UpdateBlock {
                page_id,
                block_id,
                patch,
            } => Self::edit_content(site, page_id, |tree| {
                Ok(block_tree::update_block(tree, block_id, patch))
            }),

            Mutation::DeleteBlock { page_id, block_id } => Self::edit_content(site, page_id, |tree| {
                Ok(block_tree::delete_block(tree, block_id))
            }),

            Mutation::MoveBlock {
                page_id,
                source_id,
                target_id,
                position,
            } => Self::edit_content(site, page_id, |tree| {
                Ok(block_tree::move_block(tree, source_id, target_id, *position))
            }),

            Mutation::MoveBlockIntoColumn {
                page_id,
                source_id,
                columns_block_id,
                column_id,
                index,
            } => Self::edit_content(site, page_id, |tree| {
                Ok(block_tree::move_block_into_column(
                    tree,
                    source_id,
                    columns_block_id,
                    column_id,
                    *index,
                ))
            }),

            Mutation::ReorderBlocks {
                page_id,
                forest,
                source_index,
                destination_index,
            } => Self::edit_content(site, page_id, |tree| {
                let mut updated = tree.to_vec();
                let blocks = Self::resolve_forest_mut(&mut updated, forest)?;
                *blocks = block_tree::reorder_blocks(blocks, *source_index, *destination_index)?;
                Ok(updated)
            }),

            Mutation::MoveBlockToColumn {
                page_id,
                source,
                destination,
                source_index,
                destination_index,
            } => Self::edit_content(site, page_id, |tree| {
                Self::move_between_forests(tree, source, destination, *source_index, *destination_index)
            }),

            Mutation::CreatePage { title, parent_id } => {
                let (pages, id) =
                    hierarchy::create_page(&site.pages, title, parent_id.as_deref(), &mut *ctx.ids)?;
                Ok(MutationResult {
                    site: Self::with_pages(site, pages),
                    created: vec![id],
                })
            }

            Mutation::UpdatePageSettings { page_id, patch } => {
                Self::page(site, page_id)?;
                let pages = hierarchy::update_page_settings(&site.pages, page_id, patch)?;
                Ok(Self::edited(site, pages))
            }

            Mutation::ReparentPage {
                page_id,
                new_parent_id,
            } => {
                let pages =
                    hierarchy::update_page_hierarchy(&site.pages, page_id, new_parent_id.as_deref());
                Ok(Self::edited(site, pages))
            }

            Mutation::ReorderPages {
                source_id,
                target_id,
                position,
            } => {
                let pages = hierarchy::reorder_pages(&site.pages, source_id, target_id, *position);
                Ok(Self::edited(site, pages))
            }

            Mutation::DeletePage { page_id, policy } => {
                let pages = hierarchy::delete_page(&site.pages, page_id, *policy);
                Ok(Self::edited(site, pages))
            }
        }
    }

    /// Human readable label used for undo/redo history
    pub fn description(&self) -> String {
        match self {
            Mutation::AddBlock { block_type, .. } => format!("Add {} block", block_type),
            Mutation::InsertTemplate { template_id, .. } => format!("Insert {}", template_id),
            Mutation::InsertCombination { combination_id, .. } => {
                format!("Insert {}", combination_id)
            }
            Mutation::UpdateBlock { .. } => "Edit block".to_string(),
            Mutation::DeleteBlock { .. } => "Delete block".to_string(),
            Mutation::MoveBlock { .. }
            | Mutation::MoveBlockIntoColumn { .. }
            | Mutation::MoveBlockToColumn { .. } => "Move block".to_string(),
            Mutation::ReorderBlocks { .. } => "Reorder blocks".to_string(),
            Mutation::CreatePage { title, .. } => format!("Create page \"{}\"", title),
            Mutation::UpdatePageSettings { .. } => "Edit page settings".to_string(),
            Mutation::ReparentPage { .. } | Mutation::ReorderPages { .. } => {
                "Move page".to_string()
            }
            Mutation::DeletePage { .. } => "Delete page".to_string(),
        }
    }

    /// Stable snake_case name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::InsertTemplate { .. } => "insert_template",
            Mutation::InsertCombination { .. } => "insert_combination",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::MoveBlockIntoColumn { .. } => "move_block_into_column",
            Mutation::ReorderBlocks { .. } => "reorder_blocks",
            Mutation::MoveBlockToColumn { .. } => "move_block_to_column",
            Mutation::CreatePage { .. } => "create_page",
            Mutation::UpdatePageSettings { .. } => "update_page_settings",
            Mutation::ReparentPage { .. } => "reparent_page",
            Mutation::ReorderPages { .. } => "reorder_pages",
            Mutation::DeletePage { .. } => "delete_page",
        }
    }

    fn page<'a>(site: &'a Site, page_id: &str) -> Result<&'a Page, MutationError> {
        site.page(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }

    fn with_pages(site: &Site, pages: Vec<Page>) -> Site {
        Site {
            pages,
            ..site.clone()
        }
    }

    fn edited(site: &Site, pages: Vec<Page>) -> MutationResult {
        MutationResult {
            site: Self::with_pages(site, pages),
            created: Vec::new(),
        }
    }

    /// Replace one page's content with `edit(content)`, touching the page
    /// only when the content actually changed
    fn edit_content<F>(site: &Site, page_id: &str, edit: F) -> Result<MutationResult, MutationError>
    where
        F: FnOnce(&[Block]) -> Result<Vec<Block>, MutationError>,
    {
        let content = edit(&Self::page(site, page_id)?.content)?;

        let mut updated = site.clone();
        if let Some(page) = updated.page_mut(page_id) {
            if page.content != content {
                page.content = content;
                page.touch();
            } else {
                debug!(page_id = %page_id, "content unchanged");
            }
        }

        Ok(MutationResult {
            site: updated,
            created: Vec::new(),
        })
    }

    fn insert_new_blocks(
        site: &Site,
        page_id: &str,
        blocks: Vec<Block>,
        placement: Option<&Placement>,
    ) -> Result<MutationResult, MutationError> {
        let created: Vec<String> = blocks.iter().map(|b| b.id.clone()).collect();
        let mut result = Self::edit_content(site, page_id, |tree| {
            Ok(match placement {
                Some(placement) => {
                    block_tree::insert_blocks(tree, &placement.target_id, placement.position, blocks)
                }
                None => block_tree::append_blocks(tree, blocks),
            })
        })?;

        // A missing placement target inserts nothing
        if let Some(page) = result.site.page(page_id) {
            result.created = created
                .into_iter()
                .filter(|id| block_tree::contains_block(&page.content, id))
                .collect();
        }
        Ok(result)
    }

    fn resolve_forest_mut<'a>(
        tree: &'a mut Vec<Block>,
        forest: &ForestRef,
    ) -> Result<&'a mut Vec<Block>, MutationError> {
        block_tree::forest_mut(tree, forest)
            .ok_or_else(|| MutationError::BlockNotFound(forest.owner().unwrap_or_default().to_string()))
    }

    fn move_between_forests(
        tree: &[Block],
        source: &ForestRef,
        destination: &ForestRef,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Vec<Block>, MutationError> {
        let not_found = |forest: &ForestRef| {
            MutationError::BlockNotFound(forest.owner().unwrap_or_default().to_string())
        };
        let source_blocks = block_tree::forest(tree, source).ok_or_else(|| not_found(source))?;
        let destination_blocks =
            block_tree::forest(tree, destination).ok_or_else(|| not_found(destination))?;

        let (moved_source, moved_destination) = if source == destination {
            block_tree::move_block_to_column(source_blocks, source_blocks, source_index, destination_index)?
        } else {
            block_tree::move_block_to_column(
                source_blocks,
                destination_blocks,
                source_index,
                destination_index,
            )?
        };

        if source == destination {
            let mut updated = tree.to_vec();
            *Self::resolve_forest_mut(&mut updated, source)? = moved_source;
            return Ok(updated);
        }

        let moved_id = source_blocks[source_index].id.as_str();
        if let Some(owner) = destination.owner() {
            if owner == moved_id || block_tree::is_descendant(tree, moved_id, owner) {
                debug!(block_id = %moved_id, "move_block_to_column: destination is inside moved block");
                return Ok(tree.to_vec());
            }
        }

        // Write the enclosing forest first so the nested write lands on top of it
        let destination_encloses_source = source
            .owner()
            .map_or(false, |owner| block_tree::contains_block(destination_blocks, owner));
        let writes = if destination_encloses_source {
            [(destination, moved_destination), (source, moved_source)]
        } else {
            [(source, moved_source), (destination, moved_destination)]
        };

        let mut updated = tree.to_vec();
        for (forest, blocks) in writes {
            *Self::resolve_forest_mut(&mut updated, forest)? = blocks;
        }
        Ok(updated)
    }
}
