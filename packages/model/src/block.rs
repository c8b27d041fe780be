use crate::content::{BlockContent, Column, ColumnsContent};
use crate::error::ModelError;
use crate::id_generator::IdSource;
use crate::settings::BlockSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Heading,
    Image,
    Columns,
    Table,
    Video,
    Form,
    Embed,
    Gallery,
    Button,
    Spacer,
    Html,
    A,
    Div,
    Span,
}

impl BlockType {
    pub const ALL: [BlockType; 15] = [
        BlockType::Text,
        BlockType::Heading,
        BlockType::Image,
        BlockType::Columns,
        BlockType::Table,
        BlockType::Video,
        BlockType::Form,
        BlockType::Embed,
        BlockType::Gallery,
        BlockType::Button,
        BlockType::Spacer,
        BlockType::Html,
        BlockType::A,
        BlockType::Div,
        BlockType::Span,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Heading => "heading",
            BlockType::Image => "image",
            BlockType::Columns => "columns",
            BlockType::Table => "table",
            BlockType::Video => "video",
            BlockType::Form => "form",
            BlockType::Embed => "embed",
            BlockType::Gallery => "gallery",
            BlockType::Button => "button",
            BlockType::Spacer => "spacer",
            BlockType::Html => "html",
            BlockType::A => "a",
            BlockType::Div => "div",
            BlockType::Span => "span",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ModelError::UnknownBlockType(s.to_string()))
    }
}

/// A node in a page's content tree
///
/// Nested content lives in two places: `children` (generic containers) and
/// the `blocks` of each column when the content is `Columns`. Both are
/// ordered forests and are reached through [`Block::child_forests`].
///
/// Serialized as `{"id", "type", "content", "settings", "children"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub content: BlockContent,
    #[serde(default)]
    pub settings: BlockSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    /// Complete default block of `block_type`
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        let id = id.into();
        let content = match block_type {
            BlockType::Columns => BlockContent::Columns(ColumnsContent::evenly_split(2, &id)),
            other => BlockContent::default_for(other),
        };

        Self {
            id,
            content,
            settings: BlockSettings::default_for(block_type),
            children: Vec::new(),
        }
    }

    pub fn with_content(id: impl Into<String>, content: BlockContent) -> Self {
        let settings = BlockSettings::default_for(content.block_type());
        Self {
            id: id.into(),
            content,
            settings,
            children: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: BlockSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    /// Every nested forest: `children` first, then each column's blocks
    pub fn child_forests(&self) -> impl Iterator<Item = &Vec<Block>> + '_ {
        let columns: &[Column] = match &self.content {
            BlockContent::Columns(content) => content.columns.as_slice(),
            _ => &[],
        };
        std::iter::once(&self.children).chain(columns.iter().map(|c| &c.blocks))
    }

    pub fn child_forests_mut(&mut self) -> impl Iterator<Item = &mut Vec<Block>> + '_ {
        let Block {
            content, children, ..
        } = self;
        let columns: &mut [Column] = match content {
            BlockContent::Columns(content) => content.columns.as_mut_slice(),
            _ => Default::default(),
        };
        std::iter::once(children).chain(columns.iter_mut().map(|c| &mut c.blocks))
    }

    /// Number of blocks in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self
            .child_forests()
            .flat_map(|forest| forest.iter())
            .map(Block::subtree_len)
            .sum::<usize>()
    }

    /// Deep copy with every block id and column id replaced by a fresh one
    pub fn with_fresh_ids(&self, ids: &mut dyn IdSource) -> Block {
        let mut copy = self.clone();
        copy.reassign_ids(ids);
        copy
    }

    fn reassign_ids(&mut self, ids: &mut dyn IdSource) {
        self.id = ids.next_id();
        if let BlockContent::Columns(content) = &mut self.content {
            for column in &mut content.columns {
                column.id = ids.next_id();
            }
        }
        for forest in self.child_forests_mut() {
            for child in forest.iter_mut() {
                child.reassign_ids(ids);
            }
        }
    }
}

/// Partial update merged into a block by `update_block`
///
/// `None` leaves the field untouched. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<BlockSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

impl BlockPatch {
    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn settings(settings: BlockSettings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn children(children: Vec<Block>) -> Self {
        Self {
            children: Some(children),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.settings.is_none() && self.children.is_none()
    }

    pub fn apply_to(&self, block: &mut Block) {
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        if let Some(settings) = &self.settings {
            block.settings = settings.clone();
        }
        if let Some(children) = &self.children {
            block.children = children.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::IdGenerator;
    use crate::settings::Alignment;

    fn columns_block() -> Block {
        let content = ColumnsContent {
            columns: vec![
                Column::new("left", 0.5).with_blocks(vec![Block::new("l1", BlockType::Text)]),
                Column::new("right", 0.5).with_blocks(vec![
                    Block::new("r1", BlockType::Image),
                    Block::new("r2", BlockType::Text),
                ]),
            ],
        };
        Block::with_content("cols", BlockContent::Columns(content))
            .with_children(vec![Block::new("c1", BlockType::Spacer)])
    }

    #[test]
    fn test_new_block_has_complete_defaults() {
        let block = Block::new("img", BlockType::Image);
        assert_eq!(block.block_type(), BlockType::Image);
        assert_eq!(block.settings.alignment, Alignment::Center);
        assert!(block.children.is_empty());

        let columns = Block::new("cols", BlockType::Columns);
        match &columns.content {
            BlockContent::Columns(content) => {
                assert_eq!(content.columns[0].id, "cols-1");
                assert_eq!(content.columns[1].id, "cols-2");
            }
            other => panic!("expected columns, got {:?}", other),
        }
    }

    #[test]
    fn test_child_forests_cover_children_and_columns() {
        let block = columns_block();
        let sizes: Vec<usize> = block.child_forests().map(|f| f.len()).collect();
        assert_eq!(sizes, vec![1, 1, 2]);
        assert_eq!(block.subtree_len(), 5);
    }

    #[test]
    fn test_fresh_ids_replace_every_id() {
        let block = columns_block();
        let mut ids = IdGenerator::from_seed("t");
        let copy = block.with_fresh_ids(&mut ids);

        assert_eq!(copy.id, "t-1");
        match &copy.content {
            BlockContent::Columns(content) => {
                assert_eq!(content.columns[0].id, "t-2");
                assert_eq!(content.columns[1].id, "t-3");
            }
            other => panic!("expected columns, got {:?}", other),
        }
        assert_eq!(ids.count(), 7);
        // Original untouched
        assert_eq!(block.id, "cols");
    }

    #[test]
    fn test_block_type_from_str() {
        assert_eq!("Gallery".parse::<BlockType>().unwrap(), BlockType::Gallery);
        assert_eq!("div".parse::<BlockType>().unwrap(), BlockType::Div);
        assert!("marquee".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut block = Block::new("t", BlockType::Text);
        let before_settings = block.settings.clone();

        BlockPatch::content(BlockContent::text("Updated")).apply_to(&mut block);

        assert_eq!(block.content, BlockContent::text("Updated"));
        assert_eq!(block.settings, before_settings);
        assert!(BlockPatch::default().is_empty());
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::with_content("b1", BlockContent::text("Hi"));
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["id"], "b1");
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"]["text"], "Hi");
        assert!(json.get("children").is_none());

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }
}
