//! Typed block content, one shape per block type
//!
//! `BlockContent` is adjacently tagged: `"type"` names the block type and
//! `"content"` holds the matching shape. A block's type and the shape of
//! its content are the same value and can never disagree.

use crate::block::{Block, BlockType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum BlockContent {
    Text(TextContent),
    Heading(HeadingContent),
    Image(ImageContent),
    Columns(ColumnsContent),
    Table(TableContent),
    Video(VideoContent),
    Form(FormContent),
    Embed(EmbedContent),
    Gallery(GalleryContent),
    Button(ButtonContent),
    Spacer(SpacerContent),
    Html(HtmlContent),
    A(LinkContent),
    Div(MarkupContent),
    Span(MarkupContent),
}

impl BlockContent {
    /// Default content for a freshly created block of `block_type`
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => Self::Text(TextContent::default()),
            BlockType::Heading => Self::Heading(HeadingContent::default()),
            BlockType::Image => Self::Image(ImageContent::default()),
            BlockType::Columns => Self::Columns(ColumnsContent::evenly_split(2, "col")),
            BlockType::Table => Self::Table(TableContent::default()),
            BlockType::Video => Self::Video(VideoContent::default()),
            BlockType::Form => Self::Form(FormContent::default()),
            BlockType::Embed => Self::Embed(EmbedContent::default()),
            BlockType::Gallery => Self::Gallery(GalleryContent::default()),
            BlockType::Button => Self::Button(ButtonContent::default()),
            BlockType::Spacer => Self::Spacer(SpacerContent::default()),
            BlockType::Html => Self::Html(HtmlContent::default()),
            BlockType::A => Self::A(LinkContent::default()),
            BlockType::Div => Self::Div(MarkupContent::default()),
            BlockType::Span => Self::Span(MarkupContent::default()),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Text(_) => BlockType::Text,
            Self::Heading(_) => BlockType::Heading,
            Self::Image(_) => BlockType::Image,
            Self::Columns(_) => BlockType::Columns,
            Self::Table(_) => BlockType::Table,
            Self::Video(_) => BlockType::Video,
            Self::Form(_) => BlockType::Form,
            Self::Embed(_) => BlockType::Embed,
            Self::Gallery(_) => BlockType::Gallery,
            Self::Button(_) => BlockType::Button,
            Self::Spacer(_) => BlockType::Spacer,
            Self::Html(_) => BlockType::Html,
            Self::A(_) => BlockType::A,
            Self::Div(_) => BlockType::Div,
            Self::Span(_) => BlockType::Span,
        }
    }

    /// Shorthand for a text block's content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent {
            text: text.into(),
            format: TextFormat::default(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
    pub format: TextFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingContent {
    pub text: String,
    /// 1-6, as in `<h1>`..`<h6>`
    pub level: u8,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "21:9")]
    Ultrawide,
    #[serde(rename = "original")]
    Original,
}

/// Focal point in normalized image coordinates (0-1 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalPoint {
    pub x: f32,
    pub y: f32,
}

impl Default for FocalPoint {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageContent {
    pub url: String,
    pub alt: String,
    pub focal_point: FocalPoint,
    pub aspect_ratio: AspectRatio,
}

/// Fractional-width container of blocks inside a columns block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    /// Fraction of the parent width (0-1)
    pub width: f32,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(id: impl Into<String>, width: f32) -> Self {
        Self {
            id: id.into(),
            width,
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsContent {
    pub columns: Vec<Column>,
}

impl ColumnsContent {
    /// `count` empty columns of equal width, ids `<prefix>-1`..`<prefix>-n`
    pub fn evenly_split(count: usize, id_prefix: &str) -> Self {
        let width = if count == 0 { 0.0 } else { 1.0 / count as f32 };
        Self {
            columns: (1..=count)
                .map(|n| Column::new(format!("{}-{}", id_prefix, n), width))
                .collect(),
        }
    }

    /// Sum of column widths (expected to be at most 1)
    pub fn total_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableContent {
    pub rows: Vec<Vec<String>>,
    pub has_header: bool,
}

impl Default for TableContent {
    fn default() -> Self {
        Self {
            rows: vec![vec![String::new(); 2]; 2],
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub url: String,
    pub aspect_ratio: AspectRatio,
    pub autoplay: bool,
    pub controls: bool,
}

impl Default for VideoContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            aspect_ratio: AspectRatio::Widescreen,
            autoplay: false,
            controls: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// Input kind (`text`, `email`, `textarea`, ...)
    pub kind: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormContent {
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

impl Default for FormContent {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            submit_label: "Submit".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedContent {
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Masonry,
    Carousel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryContent {
    pub images: Vec<GalleryImage>,
    pub layout: GalleryLayout,
    pub column_count: u32,
}

impl Default for GalleryContent {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            layout: GalleryLayout::Grid,
            column_count: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonContent {
    pub label: String,
    pub href: String,
    pub open_in_new_tab: bool,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            label: "Button".to_string(),
            href: String::new(),
            open_in_new_tab: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerContent {
    /// Height in pixels
    pub height: u32,
}

impl Default for SpacerContent {
    fn default() -> Self {
        Self { height: 32 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlContent {
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkContent {
    pub text: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Content of generic `div`/`span` skeleton blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tagged_by_type() {
        let content = BlockContent::text("Hello");
        let json = serde_json::to_value(&content).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["content"]["text"], "Hello");
        assert_eq!(json["content"]["format"]["bold"], false);
    }

    #[test]
    fn test_partial_image_content_deserializes() {
        let content: BlockContent = serde_json::from_str(
            r#"{ "type": "image", "content": { "url": "", "alt": "Hero background", "aspectRatio": "21:9" } }"#,
        )
        .unwrap();

        match content {
            BlockContent::Image(image) => {
                assert_eq!(image.alt, "Hero background");
                assert_eq!(image.aspect_ratio, AspectRatio::Ultrawide);
                assert_eq!(image.focal_point, FocalPoint { x: 0.5, y: 0.5 });
            }
            other => panic!("expected image content, got {:?}", other),
        }
    }

    #[test]
    fn test_every_type_has_matching_default() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockContent::default_for(block_type).block_type(), block_type);
        }
    }

    #[test]
    fn test_evenly_split_columns() {
        let columns = ColumnsContent::evenly_split(4, "c");
        assert_eq!(columns.columns.len(), 4);
        assert_eq!(columns.columns[3].id, "c-4");
        assert!((columns.total_width() - 1.0).abs() < 1e-6);
        assert!(ColumnsContent::evenly_split(0, "c").columns.is_empty());
    }

    #[test]
    fn test_markup_tags_serialize_lowercase() {
        let json = serde_json::to_value(BlockContent::Div(MarkupContent::default())).unwrap();
        assert_eq!(json["type"], "div");
        let json = serde_json::to_value(BlockContent::A(LinkContent::default())).unwrap();
        assert_eq!(json["type"], "a");
    }
}
