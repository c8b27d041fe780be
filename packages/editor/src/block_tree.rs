//! # Block Tree Operations
//!
//! Pure transformations over a page's block forest. Every function takes
//! the current forest by reference and returns a new one; the input is
//! never modified, so callers can keep the previous value for undo.
//!
//! ## Traversal
//!
//! A block's nested forests are its `children` and, for columns blocks,
//! each column's `blocks` (see [`Block::child_forests`]). Every operation
//! here searches all of them, depth first, in document order.
//!
//! ## Failure modes
//!
//! - Unknown ids and structurally impossible moves are silent no-ops: the
//!   result equals the input. Drag and drop tries these speculatively.
//! - Out-of-range indices are caller bugs and return
//!   [`MutationError::IndexOutOfRange`].
//!
//! Ownership already rules out a block containing itself; the move guards
//! below keep a subtree from being moved into its own descendants, which
//! would otherwise silently drop it.

use crate::mutations::MutationError;
use serde::{Deserialize, Serialize};
use sitecraft_model::{Block, BlockContent, BlockPatch, DropPosition};
use std::collections::HashSet;
use tracing::debug;

/// Address of one flat forest inside a page's block tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ForestRef {
    /// The page's root blocks
    Root,
    /// `children` of a container block
    #[serde(rename_all = "camelCase")]
    Children { block_id: String },
    /// `blocks` of one column of a columns block
    #[serde(rename_all = "camelCase")]
    Column { block_id: String, column_id: String },
}

impl ForestRef {
    pub fn column(block_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        ForestRef::Column {
            block_id: block_id.into(),
            column_id: column_id.into(),
        }
    }

    /// Block owning the forest; `None` for the root
    pub fn owner(&self) -> Option<&str> {
        match self {
            ForestRef::Root => None,
            ForestRef::Children { block_id } | ForestRef::Column { block_id, .. } => {
                Some(block_id.as_str())
            }
        }
    }
}

/// Resolve a forest address against a tree
pub fn forest<'a>(tree: &'a [Block], forest: &ForestRef) -> Option<&'a [Block]> {
    match forest {
        ForestRef::Root => Some(tree),
        ForestRef::Children { block_id } => {
            find_block(tree, block_id).map(|b| b.children.as_slice())
        }
        ForestRef::Column { block_id, column_id } => match find_block(tree, block_id) {
            Some(Block {
                content: BlockContent::Columns(content),
                ..
            }) => content.column(column_id).map(|c| c.blocks.as_slice()),
            _ => None,
        },
    }
}

pub fn forest_mut<'a>(tree: &'a mut Vec<Block>, forest: &ForestRef) -> Option<&'a mut Vec<Block>> {
    match forest {
        ForestRef::Root => Some(tree),
        ForestRef::Children { block_id } => find_block_mut(tree, block_id).map(|b| &mut b.children),
        ForestRef::Column { block_id, column_id } => match find_block_mut(tree, block_id) {
            Some(Block {
                content: BlockContent::Columns(content),
                ..
            }) => content
                .columns
                .iter_mut()
                .find(|c| &c.id == column_id)
                .map(|c| &mut c.blocks),
            _ => None,
        },
    }
}

/// Visit every block in document order with its nesting depth
pub fn walk_blocks<'a>(tree: &'a [Block], visit: &mut impl FnMut(&'a Block, usize)) {
    fn walk<'a>(forest: &'a [Block], depth: usize, visit: &mut impl FnMut(&'a Block, usize)) {
        for block in forest {
            visit(block, depth);
            for child_forest in block.child_forests() {
                walk(child_forest, depth + 1, visit);
            }
        }
    }
    walk(tree, 0, visit);
}

/// Depth-first search for `id` at any depth
pub fn find_block<'a>(tree: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in tree {
        if block.id == id {
            return Some(block);
        }
        for forest in block.child_forests() {
            if let Some(found) = find_block(forest, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn find_block_mut<'a>(tree: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in tree.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        for forest in block.child_forests_mut() {
            if let Some(found) = find_block_mut(forest, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn contains_block(tree: &[Block], id: &str) -> bool {
    find_block(tree, id).is_some()
}

/// True when `id` sits somewhere below `ancestor_id` (not equal to it)
pub fn is_descendant(tree: &[Block], ancestor_id: &str, id: &str) -> bool {
    find_block(tree, ancestor_id).map_or(false, |ancestor| {
        ancestor
            .child_forests()
            .any(|forest| find_block(forest, id).is_some())
    })
}

/// All block ids in document order
pub fn collect_ids(tree: &[Block]) -> Vec<String> {
    let mut ids = Vec::new();
    walk_blocks(tree, &mut |block, _| ids.push(block.id.clone()));
    ids
}

pub fn block_count(tree: &[Block]) -> usize {
    tree.iter().map(Block::subtree_len).sum()
}

/// Check that every block id in the forest is unique
pub fn validate_tree(tree: &[Block]) -> Result<(), MutationError> {
    let mut seen = HashSet::new();
    for id in collect_ids(tree) {
        if !seen.insert(id.clone()) {
            return Err(MutationError::InvariantViolation(format!(
                "duplicate block id {}",
                id
            )));
        }
    }
    Ok(())
}

/// Forest that directly holds `id`, and the block's index in it
fn containing_forest_mut<'a>(
    forest: &'a mut Vec<Block>,
    id: &str,
) -> Option<(&'a mut Vec<Block>, usize)> {
    if let Some(index) = forest.iter().position(|b| b.id == id) {
        return Some((forest, index));
    }

    for block in forest.iter_mut() {
        for child_forest in block.child_forests_mut() {
            if let Some(found) = containing_forest_mut(child_forest, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Remove a block from wherever it occurs and return it
fn remove_block(tree: &mut Vec<Block>, id: &str) -> Option<Block> {
    let (forest, index) = containing_forest_mut(tree, id)?;
    Some(forest.remove(index))
}

/// Place `blocks` relative to `target_id`; false when there is nowhere to
/// put them (missing target, or a columns target without columns)
fn place_blocks(
    tree: &mut Vec<Block>,
    target_id: &str,
    position: DropPosition,
    blocks: Vec<Block>,
) -> bool {
    let Some((forest, index)) = containing_forest_mut(tree, target_id) else {
        return false;
    };

    match position {
        DropPosition::Before => {
            forest.splice(index..index, blocks);
        }
        DropPosition::After => {
            forest.splice(index + 1..index + 1, blocks);
        }
        DropPosition::Inside => {
            let target = &mut forest[index];
            match &mut target.content {
                BlockContent::Columns(content) => match content.columns.first_mut() {
                    Some(column) => column.blocks.extend(blocks),
                    None => return false,
                },
                _ => target.children.extend(blocks),
            }
        }
    }

    true
}

/// Merge `patch` into the block with `id`, wherever it is
pub fn update_block(tree: &[Block], id: &str, patch: &BlockPatch) -> Vec<Block> {
    let mut updated = tree.to_vec();
    match find_block_mut(&mut updated, id) {
        Some(block) => patch.apply_to(block),
        None => debug!(block_id = %id, "update_block: block not found"),
    }
    updated
}

/// Remove the block with `id` (and its subtree), wherever it is
pub fn delete_block(tree: &[Block], id: &str) -> Vec<Block> {
    let mut updated = tree.to_vec();
    if remove_block(&mut updated, id).is_none() {
        debug!(block_id = %id, "delete_block: block not found");
    }
    updated
}

/// Insert new blocks before, after or inside `target_id`
///
/// `Inside` appends to the target's children, or to the first column of a
/// columns block.
pub fn insert_blocks(
    tree: &[Block],
    target_id: &str,
    position: DropPosition,
    blocks: Vec<Block>,
) -> Vec<Block> {
    let mut updated = tree.to_vec();
    if !place_blocks(&mut updated, target_id, position, blocks) {
        debug!(target_id = %target_id, %position, "insert_blocks: no place for blocks");
    }
    updated
}

/// Append new blocks at the root of the forest
pub fn append_blocks(tree: &[Block], blocks: Vec<Block>) -> Vec<Block> {
    let mut updated = tree.to_vec();
    updated.extend(blocks);
    updated
}

/// Relocate `source_id` before, after or inside `target_id`
///
/// Moving a block relative to itself or into its own subtree is a no-op.
pub fn move_block(
    tree: &[Block],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Vec<Block> {
    if source_id == target_id {
        debug!(block_id = %source_id, "move_block: source and target are the same block");
        return tree.to_vec();
    }
    if !contains_block(tree, source_id) || !contains_block(tree, target_id) {
        debug!(source_id = %source_id, target_id = %target_id, "move_block: block not found");
        return tree.to_vec();
    }
    if is_descendant(tree, source_id, target_id) {
        debug!(source_id = %source_id, target_id = %target_id, "move_block: target is inside source");
        return tree.to_vec();
    }

    let mut updated = tree.to_vec();
    let Some(block) = remove_block(&mut updated, source_id) else {
        return tree.to_vec();
    };

    if place_blocks(&mut updated, target_id, position, vec![block]) {
        updated
    } else {
        debug!(target_id = %target_id, %position, "move_block: target cannot hold blocks");
        tree.to_vec()
    }
}

/// Move `source_id` into a specific column of a columns block at `index`
/// (clamped to the column length)
pub fn move_block_into_column(
    tree: &[Block],
    source_id: &str,
    columns_block_id: &str,
    column_id: &str,
    index: usize,
) -> Vec<Block> {
    let has_column = match find_block(tree, columns_block_id).map(|b| &b.content) {
        Some(BlockContent::Columns(content)) => content.column(column_id).is_some(),
        _ => false,
    };
    if !has_column || !contains_block(tree, source_id) {
        debug!(columns_block_id = %columns_block_id, column_id = %column_id, "move_block_into_column: column not found");
        return tree.to_vec();
    }
    if source_id == columns_block_id || is_descendant(tree, source_id, columns_block_id) {
        debug!(source_id = %source_id, "move_block_into_column: column is inside source");
        return tree.to_vec();
    }

    let mut updated = tree.to_vec();
    let Some(block) = remove_block(&mut updated, source_id) else {
        return tree.to_vec();
    };

    if let Some(Block {
        content: BlockContent::Columns(content),
        ..
    }) = find_block_mut(&mut updated, columns_block_id)
    {
        if let Some(column) = content.columns.iter_mut().find(|c| c.id == column_id) {
            let index = index.min(column.blocks.len());
            column.blocks.insert(index, block);
            return updated;
        }
    }

    tree.to_vec()
}

/// Positional move inside one flat forest
pub fn reorder_blocks(
    forest: &[Block],
    source_index: usize,
    destination_index: usize,
) -> Result<Vec<Block>, MutationError> {
    let len = forest.len();
    for index in [source_index, destination_index] {
        if index >= len {
            return Err(MutationError::IndexOutOfRange { index, len });
        }
    }

    let mut reordered = forest.to_vec();
    let block = reordered.remove(source_index);
    reordered.insert(destination_index, block);
    Ok(reordered)
}

/// Move one block from `source` to `destination` (drag across columns)
///
/// Returns `(source, destination)`. Passing the same slice for both is a
/// reorder within it and both results are that reordered forest.
pub fn move_block_to_column(
    source: &[Block],
    destination: &[Block],
    source_index: usize,
    destination_index: usize,
) -> Result<(Vec<Block>, Vec<Block>), MutationError> {
    if std::ptr::eq(source, destination) {
        let reordered = reorder_blocks(source, source_index, destination_index)?;
        return Ok((reordered.clone(), reordered));
    }

    if source_index >= source.len() {
        return Err(MutationError::IndexOutOfRange {
            index: source_index,
            len: source.len(),
        });
    }
    if destination_index > destination.len() {
        return Err(MutationError::IndexOutOfRange {
            index: destination_index,
            len: destination.len(),
        });
    }

    let mut source_blocks = source.to_vec();
    let block = source_blocks.remove(source_index);
    let mut destination_blocks = destination.to_vec();
    destination_blocks.insert(destination_index, block);

    Ok((source_blocks, destination_blocks))
}
