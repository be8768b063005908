//! # Document Handle
//!
//! A loaded stylesheet: the original text plus the token/component inventory
//! extracted from it.
//!
//! The original text is never modified. Edits live in the history as
//! patches and are applied on demand when rendering.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Extract → Patch* → Render → Write
//!   ↓       ↓        ↓         ↓        ↓
//! File  Inventory  History   CSS      File
//! ```

use crate::{EditorError, Patch, Patcher};
use blueprint_parser::{extract, extract_strict, ComponentBlock, Extraction, ParseError, Token};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Document {
    /// Path the source came from (display only for in-memory documents)
    pub path: PathBuf,

    source: String,
    extraction: Extraction,
}

impl Document {
    /// Create a document from source text, skipping malformed fragments
    pub fn from_source(path: PathBuf, source: String) -> Self {
        let extraction = extract(&source);
        Self {
            path,
            source,
            extraction,
        }
    }

    /// Create a document from source text, failing on malformed fragments
    pub fn from_source_strict(path: PathBuf, source: String) -> Result<Self, EditorError> {
        let extraction = extract_strict(&source)?;
        Ok(Self {
            path,
            source,
            extraction,
        })
    }

    /// Read and extract a stylesheet from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path)?;
        let doc = Self::from_source(path, source);

        info!(
            path = %doc.path.display(),
            tokens = doc.tokens().len(),
            components = doc.components().len(),
            "Loaded stylesheet"
        );
        Ok(doc)
    }

    /// Original, unpatched text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    pub fn tokens(&self) -> &[Token] {
        &self.extraction.tokens
    }

    pub fn components(&self) -> &[ComponentBlock] {
        &self.extraction.components
    }

    /// Fragments skipped while extracting
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.extraction.diagnostics
    }

    /// Original text with `patches` applied
    pub fn render(&self, patcher: &Patcher, patches: &[Patch]) -> String {
        patcher.patch(&self.source, patches)
    }
}
