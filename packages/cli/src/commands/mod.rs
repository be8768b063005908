pub mod edit;
pub mod inspect;
pub mod patch;

pub use edit::{edit, EditArgs};
pub use inspect::{inspect, InspectArgs};
pub use patch::{patch, PatchArgs};

use anyhow::{Context, Result};
use blueprint_editor::Document;
use std::path::Path;

/// Load a stylesheet, failing on malformed CSS when `strict`
pub(crate) fn load_document(path: &Path, strict: bool) -> Result<Document> {
    if !strict {
        return Document::load(path).with_context(|| format!("Failed to load {}", path.display()));
    }
    let source =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Document::from_source_strict(path.to_path_buf(), source)
        .with_context(|| format!("Malformed CSS in {}", path.display()))
}
