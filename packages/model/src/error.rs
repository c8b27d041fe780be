use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown drop position: {0} (expected before, after or inside)")]
    UnknownPosition(String),

    #[error("Invalid slug '{0}' (use lowercase letters, digits and single dashes)")]
    InvalidSlug(String),

    #[error("Slug '{0}' is already used by a sibling page")]
    SlugTaken(String),
}
