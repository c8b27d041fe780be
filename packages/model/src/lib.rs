//! # Sitecraft Model
//!
//! Data model for the site editor: pages own a forest of typed content
//! blocks, and pages themselves form the site's navigation forest.
//!
//! ```text
//! Site
//!  └─ Page (parentId / children / order)
//!      └─ Block (content: BlockContent, settings, children)
//!          └─ Column (columns blocks only) ─ Block ...
//! ```
//!
//! Everything here is plain data. Structural edits live in
//! `sitecraft-editor`.

pub mod block;
pub mod content;
pub mod error;
pub mod id_generator;
pub mod page;
pub mod position;
pub mod settings;
pub mod site;

pub use block::{Block, BlockPatch, BlockType};
pub use content::*;
pub use error::ModelError;
pub use id_generator::{IdGenerator, IdSource};
pub use page::{
    is_valid_slug, slugify, unique_slug, validate_slug, FooterConfig, HeaderConfig, Page, PagePatch,
    PageSettings,
};
pub use position::DropPosition;
pub use settings::{Alignment, BlockSettings, FontSize, FontWeight, Padding, Width};
pub use site::{Site, SiteExport, EXPORT_FORMAT_VERSION};
