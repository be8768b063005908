//! # Blueprint Editor
//!
//! Patch-based editing engine for Blueprint theme stylesheets.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: CSS text → tokens + components      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + patches                  │
//! │  - Validated edit intents (Patch)           │
//! │  - Linear undo/redo over patch sequences    │
//! │  - Span-preserving patching of the original │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ patched CSS text                            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Original text is the source of truth**: patched CSS is always derived
//! 2. **Edits are intents**: patches name their target, never an offset
//! 3. **Minimal diffs**: bytes outside patched spans are preserved exactly
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blueprint_editor::{Document, EditSession, Patch, Patcher, TokenScope};
//!
//! let mut session = EditSession::new(Patcher::default());
//! session.load(Document::load("theme.css")?);
//!
//! session.apply(Patch::token_set("--color-primary", TokenScope::Root, "#00ff00")?)?;
//! session.undo();
//! session.redo();
//!
//! session.write_patched("theme.patched.css")?;
//! ```

mod categories;
mod document;
mod errors;
mod history;
mod patch;
mod patcher;
mod session;

pub use categories::{categorize, ComponentCategory};
pub use document::Document;
pub use errors::EditorError;
pub use history::History;
pub use patch::{Patch, PatchError, PropertyEdit, TokenSet};
pub use patcher::{patch_css, PatchOutcome, PatchStrategy, Patcher, DEFAULT_INDENT};
pub use session::EditSession;

// Re-export parser types for convenience
pub use blueprint_parser::{
    extract, extract_strict, ComponentBlock, ComponentKey, ComponentProperty, ComponentScope, Extraction,
    ParseError, Span, Token, TokenScope,
};
