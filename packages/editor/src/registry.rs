//! # Block Library
//!
//! Read-only registry of single-block templates and multi-block
//! combinations. The registry is a plain value passed to the factories
//! below; nothing here is global, so tests can build fixture libraries
//! with [`Registry::new`] or load them from JSON.
//!
//! Prototype blocks carry placeholder ids. Instantiation deep-copies the
//! prototype and replaces every block id and column id through the
//! injected [`IdSource`], so two instances never share an id.
//!
//! Lookup failures are asymmetric on purpose: an unknown template id is a
//! [`MutationError::TemplateNotFound`], an unknown combination id yields an
//! empty block list.

use crate::mutations::MutationError;
use serde::{Deserialize, Serialize};
use sitecraft_model::{
    AspectRatio, Block, BlockContent, BlockSettings, BlockType, Column, ColumnsContent,
    Alignment, FontSize, FontWeight, GalleryContent, GalleryImage, GalleryLayout, IdSource,
    ImageContent, Padding, Width,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Basic,
    Media,
    Layout,
    Advanced,
}

/// Named single-block default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: TemplateCategory,
    pub prototype: Block,
}

/// Named multi-block fragment inserted as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCombination {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub blocks: Vec<Block>,
}

impl BlockCombination {
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub templates: Vec<BlockTemplate>,
    #[serde(default)]
    pub combinations: Vec<BlockCombination>,
}

impl Registry {
    pub fn new(templates: Vec<BlockTemplate>, combinations: Vec<BlockCombination>) -> Self {
        Self {
            templates,
            combinations,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The stock library shipped with the editor
    pub fn builtin() -> Self {
        Self::new(builtin_templates(), builtin_combinations())
    }

    pub fn template(&self, template_id: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn combination(&self, combination_id: &str) -> Option<&BlockCombination> {
        self.combinations.iter().find(|c| c.id == combination_id)
    }

    pub fn templates_in(&self, category: TemplateCategory) -> impl Iterator<Item = &BlockTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Combinations whose name, description or tags contain `query`
    pub fn search(&self, query: &str) -> Vec<&BlockCombination> {
        self.combinations.iter().filter(|c| c.matches(query)).collect()
    }

    /// New block from a registered template
    pub fn create_block_from_template(
        &self,
        template_id: &str,
        ids: &mut dyn IdSource,
    ) -> Result<Block, MutationError> {
        let template = self
            .template(template_id)
            .ok_or_else(|| MutationError::TemplateNotFound(template_id.to_string()))?;

        Ok(template.prototype.with_fresh_ids(ids))
    }

    /// New blocks from a registered combination; empty when the id is unknown
    pub fn create_blocks_from_combination(
        &self,
        combination_id: &str,
        ids: &mut dyn IdSource,
    ) -> Vec<Block> {
        match self.combination(combination_id) {
            Some(combination) => combination
                .blocks
                .iter()
                .map(|block| block.with_fresh_ids(ids))
                .collect(),
            None => {
                debug!(combination_id = %combination_id, "unknown combination");
                Vec::new()
            }
        }
    }
}

/// Complete default block of `block_type` with a fresh id
pub fn create_block(block_type: BlockType, ids: &mut dyn IdSource) -> Block {
    Block::new("prototype", block_type).with_fresh_ids(ids)
}

fn template(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: TemplateCategory,
    prototype: Block,
) -> BlockTemplate {
    BlockTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        prototype,
    }
}

fn text_block(id: &str, text: &str, settings: BlockSettings) -> Block {
    Block::with_content(id, BlockContent::text(text)).with_settings(settings)
}

fn builtin_templates() -> Vec<BlockTemplate> {
    let columns = ColumnsContent {
        columns: vec![Column::new("1", 0.5), Column::new("2", 0.5)],
    };

    vec![
        template(
            "text-basic",
            "Text",
            "Basic text block for content",
            "type",
            TemplateCategory::Basic,
            Block::new("text-basic", BlockType::Text),
        ),
        template(
            "text-heading",
            "Heading",
            "Large text for sections",
            "heading",
            TemplateCategory::Basic,
            Block::new("text-heading", BlockType::Heading),
        ),
        template(
            "image-basic",
            "Image",
            "Single responsive image",
            "image",
            TemplateCategory::Media,
            Block::new("image-basic", BlockType::Image),
        ),
        template(
            "gallery-grid",
            "Image Gallery",
            "Grid of images",
            "grid",
            TemplateCategory::Media,
            Block::new("gallery-grid", BlockType::Gallery),
        ),
        template(
            "video-youtube",
            "Video",
            "Embed video content",
            "video",
            TemplateCategory::Media,
            Block::new("video-youtube", BlockType::Video),
        ),
        template(
            "columns-2",
            "2 Columns",
            "Two column layout",
            "columns",
            TemplateCategory::Layout,
            Block::with_content("columns-2", BlockContent::Columns(columns)),
        ),
        template(
            "embed-html",
            "HTML Embed",
            "Custom HTML content",
            "code",
            TemplateCategory::Advanced,
            Block::new("embed-html", BlockType::Embed),
        ),
    ]
}

fn builtin_combinations() -> Vec<BlockCombination> {
    let hero_image = Block::with_content(
        "hero-image",
        BlockContent::Image(ImageContent {
            alt: "Hero background".to_string(),
            aspect_ratio: AspectRatio::Ultrawide,
            ..ImageContent::default()
        }),
    )
    .with_settings(
        BlockSettings::default()
            .with_width(Width::Full)
            .with_padding(Padding::None),
    );

    let hero = BlockCombination {
        id: "hero-section".to_string(),
        name: "Hero Section".to_string(),
        description: "Full-width hero with image, heading, and call to action".to_string(),
        category: "Headers".to_string(),
        tags: vec!["hero".into(), "header".into(), "banner".into(), "cta".into()],
        blocks: vec![
            hero_image,
            text_block(
                "hero-headline",
                "Your Compelling Headline",
                BlockSettings::default()
                    .with_width(Width::Wide)
                    .with_alignment(Alignment::Center)
                    .with_padding(Padding::Large)
                    .with_font(FontSize::Large, Some(FontWeight::Bold)),
            ),
            text_block(
                "hero-tagline",
                "A brief description of your value proposition",
                BlockSettings::default()
                    .with_alignment(Alignment::Center)
                    .with_padding(Padding::Small),
            ),
        ],
    };

    let feature_columns = (1..=6)
        .map(|n| {
            Column::new(format!("col{}", n), 0.33).with_blocks(vec![
                text_block(
                    &format!("feature-{}-title", n),
                    &format!("Feature {}", n),
                    BlockSettings::default()
                        .with_alignment(Alignment::Center)
                        .with_font(FontSize::Large, None),
                ),
                text_block(
                    &format!("feature-{}-description", n),
                    &format!("Description of feature {}", n),
                    BlockSettings::default()
                        .with_alignment(Alignment::Center)
                        .with_padding(Padding::Small),
                ),
            ])
        })
        .collect();

    let features = BlockCombination {
        id: "features-grid".to_string(),
        name: "Features Grid".to_string(),
        description: "3x2 grid of features with icons and descriptions".to_string(),
        category: "Features".to_string(),
        tags: vec!["features".into(), "grid".into(), "benefits".into()],
        blocks: vec![Block::with_content(
            "features",
            BlockContent::Columns(ColumnsContent {
                columns: feature_columns,
            }),
        )
        .with_settings(
            BlockSettings::default()
                .with_width(Width::Wide)
                .with_padding(Padding::Large),
        )],
    };

    let testimonial = GalleryImage {
        alt: "Testimonial".to_string(),
        caption: Some("Customer testimonial here".to_string()),
        ..GalleryImage::default()
    };

    let testimonials = BlockCombination {
        id: "testimonials-carousel".to_string(),
        name: "Testimonials Carousel".to_string(),
        description: "Scrollable testimonials with images and quotes".to_string(),
        category: "Social Proof".to_string(),
        tags: vec!["testimonials".into(), "reviews".into(), "quotes".into()],
        blocks: vec![Block::with_content(
            "testimonials",
            BlockContent::Gallery(GalleryContent {
                images: vec![testimonial; 3],
                layout: GalleryLayout::Carousel,
                ..GalleryContent::default()
            }),
        )
        .with_settings(
            BlockSettings::default()
                .with_width(Width::Wide)
                .with_padding(Padding::Large),
        )],
    };

    vec![hero, features, testimonials]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_tree::collect_ids;
    use sitecraft_model::IdGenerator;
    use std::collections::HashSet;

    /// Same block with ids renumbered from a fixed seed
    fn renumbered(block: &Block) -> Block {
        block.with_fresh_ids(&mut IdGenerator::from_seed("x"))
    }

    #[test]
    fn test_builtin_library_contents() {
        let registry = Registry::builtin();
        assert_eq!(registry.templates.len(), 7);
        assert_eq!(registry.combinations.len(), 3);
        assert!(registry.template("columns-2").is_some());
        assert_eq!(registry.templates_in(TemplateCategory::Media).count(), 3);
    }

    #[test]
    fn test_create_block_from_template() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");

        let block = registry.create_block_from_template("image-basic", &mut ids).unwrap();
        assert_eq!(block.id, "s-1");
        assert_eq!(block.block_type(), BlockType::Image);
        assert_eq!(block.settings.alignment, Alignment::Center);
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");
        assert_eq!(
            registry.create_block_from_template("nope", &mut ids),
            Err(MutationError::TemplateNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_unknown_combination_is_empty() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");
        assert!(registry.create_blocks_from_combination("nope", &mut ids).is_empty());
        assert_eq!(ids.count(), 0);
    }

    #[test]
    fn test_template_instances_share_nothing() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");

        let mut first = registry.create_block_from_template("columns-2", &mut ids).unwrap();
        let second = registry.create_block_from_template("columns-2", &mut ids).unwrap();

        if let BlockContent::Columns(content) = &mut first.content {
            content.columns[0].blocks.push(Block::new("x", BlockType::Text));
        }

        assert_ne!(first.id, second.id);
        match (&first.content, &second.content) {
            (BlockContent::Columns(a), BlockContent::Columns(b)) => {
                assert_ne!(a.columns[0].id, b.columns[0].id);
                assert!(b.columns[0].blocks.is_empty());
            }
            other => panic!("expected columns, got {:?}", other),
        }
        // The registry's prototype is untouched too
        assert_eq!(registry, Registry::builtin());
    }

    #[test]
    fn test_hero_section_expansion() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");
        let blocks = registry.create_blocks_from_combination("hero-section", &mut ids);
        let registered = &registry.combination("hero-section").unwrap().blocks;

        assert_eq!(blocks.len(), registered.len());
        let unique: HashSet<_> = blocks.iter().map(|b| b.id.clone()).collect();
        assert_eq!(unique.len(), blocks.len());

        for (created, prototype) in blocks.iter().zip(registered) {
            assert_eq!(created.content, prototype.content);
            assert_eq!(created.settings, prototype.settings);
        }
    }

    #[test]
    fn test_features_grid_keeps_nested_columns() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");
        let blocks = registry.create_blocks_from_combination("features-grid", &mut ids);

        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Columns(content) => {
                assert_eq!(content.columns.len(), 6);
                assert!(content.columns.iter().all(|c| c.blocks.len() == 2));
            }
            other => panic!("expected columns, got {:?}", other),
        }

        // 1 columns block + 6 columns + 12 text blocks
        assert_eq!(ids.count(), 19);
        let all = collect_ids(&blocks);
        assert_eq!(all.len(), 13);
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), 13);
        assert_eq!(renumbered(&blocks[0]), renumbered(&registry.combinations[1].blocks[0]));
    }

    #[test]
    fn test_ids_unique_across_batch() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("batch");
        let mut created = Vec::new();

        for template in &registry.templates {
            created.push(registry.create_block_from_template(&template.id, &mut ids).unwrap());
        }
        for combination in &registry.combinations {
            created.extend(registry.create_blocks_from_combination(&combination.id, &mut ids));
        }

        let all = collect_ids(&created);
        assert_eq!(all.len(), all.iter().collect::<HashSet<_>>().len());
    }

    #[test]
    fn test_search_matches_tags() {
        let registry = Registry::builtin();
        let found: Vec<_> = registry.search("CTA").into_iter().map(|c| c.id.as_str()).collect();
        assert_eq!(found, vec!["hero-section"]);
        assert_eq!(registry.search("reviews").len(), 1);
        assert!(registry.search("pricing").is_empty());
    }

    #[test]
    fn test_registry_from_json() {
        let json = serde_json::to_string(&Registry::builtin()).unwrap();
        let registry = Registry::from_json(&json).unwrap();
        assert_eq!(registry, Registry::builtin());

        let fixture = Registry::from_json(
            r#"{"templates":[{"id":"t","name":"T","category":"basic","prototype":{"id":"p","type":"spacer","content":{"height":10}}}]}"#,
        )
        .unwrap();
        let mut ids = IdGenerator::from_seed("f");
        let block = fixture.create_block_from_template("t", &mut ids).unwrap();
        assert_eq!(block.block_type(), BlockType::Spacer);
        assert!(fixture.combinations.is_empty());
    }

    #[test]
    fn test_create_block_fills_defaults() {
        let mut ids = IdGenerator::from_seed("d");
        for block_type in BlockType::ALL {
            let block = create_block(block_type, &mut ids);
            assert_eq!(block.block_type(), block_type);
            assert_eq!(block.settings, BlockSettings::default_for(block_type));
        }
    }
}
