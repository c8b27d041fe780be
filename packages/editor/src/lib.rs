//! # Sitecraft Editor
//!
//! Editing engine for sitecraft sites.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Site → Page → Block data types       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: pure operations + editing session   │
//! │  - Block tree edits (find/update/move/...)  │
//! │  - Page hierarchy edits and derived views   │
//! │  - Template/combination expansion           │
//! │  - Mutations with snapshot undo/redo        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ storage: load/save/export sites             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Values in, values out**: operations never modify their inputs
//! 2. **Speculative edits are no-ops**: unknown ids return the input
//! 3. **Caller bugs are errors**: unknown templates, bad indices
//! 4. **Injected collaborators**: the block library and id source are
//!    passed in, never global
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitecraft_editor::{FileStorage, Mutation, Registry, SiteDocument};
//!
//! let mut storage = FileStorage::new("site");
//! let mut doc = SiteDocument::open(&storage, "site", Registry::builtin(), 50)?;
//!
//! doc.apply(&Mutation::InsertCombination {
//!     page_id: "home".to_string(),
//!     combination_id: "hero-section".to_string(),
//!     placement: None,
//! })?;
//!
//! doc.undo();
//! doc.save(&mut storage)?;
//! ```

pub mod block_tree;
pub mod hierarchy;
pub mod registry;

mod document;
mod errors;
mod mutations;
mod storage;
mod undo_stack;

pub use block_tree::ForestRef;
pub use document::{ApplyOutcome, SiteDocument};
pub use errors::EditorError;
pub use hierarchy::{Breadcrumb, NavigationItem, OrphanPolicy};
pub use mutations::{ApplyContext, Mutation, MutationError, MutationResult, Placement};
pub use registry::{BlockCombination, BlockTemplate, Registry, TemplateCategory};
pub use storage::{export_site, import_site, FileStorage, MemoryStorage, SiteStorage};
pub use undo_stack::{HistoryState, UndoStack, DEFAULT_MAX_LEVELS};

pub use sitecraft_model as model;
