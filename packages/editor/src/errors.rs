//! Error types for the editor

use blueprint_parser::{ComponentKey, ParseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Patch error: {0}")]
    Patch(#[from] crate::patch::PatchError),

    #[error("Invalid patch file: {0}")]
    PatchFile(#[from] serde_json::Error),

    #[error("No document loaded")]
    NoDocument,

    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentKey),
}
