//! Presentation attributes attached to every block
//!
//! Settings are data only. The render surface decides what `wide` or
//! `large` mean; the model just guarantees the required fields exist.

use crate::block::BlockType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    Full,
    Wide,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    None,
    Small,
    #[default]
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Bold,
}

/// Block presentation settings
///
/// Deserialization fills any missing required field with its default, so
/// partially specified library shapes still produce complete settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockSettings {
    pub width: Width,
    pub alignment: Alignment,
    pub padding: Padding,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,

    /// Free-form style overrides (`backgroundColor`, `borderRadius`, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
}

impl BlockSettings {
    /// Default settings for a freshly created block of `block_type`
    pub fn default_for(block_type: BlockType) -> Self {
        let mut settings = Self::default();
        match block_type {
            BlockType::Text => {
                settings.font_size = Some(FontSize::Normal);
            }
            BlockType::Heading => {
                settings.font_size = Some(FontSize::Large);
                settings.font_weight = Some(FontWeight::Bold);
            }
            BlockType::Image | BlockType::Button => {
                settings.alignment = Alignment::Center;
            }
            BlockType::Columns | BlockType::Gallery | BlockType::Table => {
                settings.width = Width::Wide;
            }
            BlockType::Spacer => {
                settings.padding = Padding::None;
            }
            _ => {}
        }
        settings
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.width = width;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_font(mut self, size: FontSize, weight: Option<FontWeight>) -> Self {
        self.font_size = Some(size);
        self.font_weight = weight;
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: BlockSettings =
            serde_json::from_str(r#"{ "width": "wide", "fontSize": "large" }"#).unwrap();

        assert_eq!(settings.width, Width::Wide);
        assert_eq!(settings.alignment, Alignment::Left);
        assert_eq!(settings.padding, Padding::Normal);
        assert_eq!(settings.font_size, Some(FontSize::Large));
        assert!(settings.style.is_empty());
    }

    #[test]
    fn test_heading_defaults() {
        let settings = BlockSettings::default_for(BlockType::Heading);
        assert_eq!(settings.font_size, Some(FontSize::Large));
        assert_eq!(settings.font_weight, Some(FontWeight::Bold));
    }

    #[test]
    fn test_style_overrides_serialize_camel_case() {
        let settings = BlockSettings::default().with_style("backgroundColor", "#fff");
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["style"]["backgroundColor"], "#fff");
        assert!(json.get("fontSize").is_none());
    }
}
