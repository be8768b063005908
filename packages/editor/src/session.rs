//! # Edit Session
//!
//! One designer's editing state: the loaded document, the patch history,
//! the selected component and the light/dark preview flag.
//!
//! Selection is tracked by [`ComponentKey`] and resolved against the
//! document on every lookup, so it survives reloading the same text.

use crate::{Document, EditorError, History, Patch, Patcher};
use blueprint_parser::{extract, ComponentBlock, ComponentKey, Extraction};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct EditSession {
    document: Option<Document>,
    history: History,
    patcher: Patcher,
    selected: Option<ComponentKey>,
    dark_mode: bool,
}

impl EditSession {
    pub fn new(patcher: Patcher) -> Self {
        Self {
            patcher,
            ..Self::default()
        }
    }

    /// Replace the document and start a fresh history.
    ///
    /// The selection is kept only if the new document has the same component.
    pub fn load(&mut self, document: Document) {
        info!(path = %document.path.display(), "Loading document into session");
        self.history.reset();
        if let Some(key) = &self.selected {
            if document.extraction().component_by_key(key).is_none() {
                self.selected = None;
            }
        }
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn patcher(&self) -> &Patcher {
        &self.patcher
    }

    /// Record an edit
    pub fn apply(&mut self, patch: Patch) -> Result<(), EditorError> {
        if self.document.is_none() {
            return Err(EditorError::NoDocument);
        }
        debug!(patch = %patch, "Recording patch");
        self.history.apply_patch(patch);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Drop every edit, keeping the document
    pub fn reset(&mut self) {
        self.history.reset();
    }

    pub fn current_patches(&self) -> &[Patch] {
        self.history.current_patches()
    }

    /// Live CSS: the original text with the current patches applied.
    /// Empty when nothing is loaded.
    pub fn patched_css(&self) -> String {
        match &self.document {
            Some(doc) => doc.render(&self.patcher, self.history.current_patches()),
            None => String::new(),
        }
    }

    /// Inventory of the live CSS, reflecting current edits
    pub fn live_extraction(&self) -> Option<Extraction> {
        self.document.as_ref().map(|_| extract(&self.patched_css()))
    }

    /// Write the live CSS to `path`
    pub fn write_patched(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        if self.document.is_none() {
            return Err(EditorError::NoDocument);
        }
        std::fs::write(path.as_ref(), self.patched_css())?;
        info!(path = %path.as_ref().display(), patches = self.current_patches().len(), "Wrote patched CSS");
        Ok(())
    }

    /// Select a component by identity
    pub fn select_component(&mut self, key: ComponentKey) -> Result<&ComponentBlock, EditorError> {
        let doc = self.document.as_ref().ok_or(EditorError::NoDocument)?;
        if doc.extraction().component_by_key(&key).is_none() {
            return Err(EditorError::UnknownComponent(key));
        }
        self.selected = Some(key);
        self.selected_component().ok_or(EditorError::NoDocument)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_key(&self) -> Option<&ComponentKey> {
        self.selected.as_ref()
    }

    /// First block in the loaded document matching the selected key
    pub fn selected_component(&self) -> Option<&ComponentBlock> {
        let key = self.selected.as_ref()?;
        self.document.as_ref()?.extraction().component_by_key(key)
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip the preview between light and dark, returning the new state
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_parser::{ComponentScope, TokenScope};
    use std::path::PathBuf;

    const SOURCE: &str = ":root { --gap: 4px; }\n.bp-card { padding: 4px; }\n.dark .bp-card { padding: 2px; }\n";

    fn loaded() -> EditSession {
        let mut session = EditSession::default();
        session.load(Document::from_source(PathBuf::from("theme.css"), SOURCE.to_string()));
        session
    }

    #[test]
    fn test_session_creation() {
        let session = EditSession::default();
        assert!(session.document().is_none());
        assert_eq!(session.patched_css(), "");
        assert!(session.live_extraction().is_none());
        assert!(!session.is_dark_mode());
    }

    #[test]
    fn test_apply_requires_document() {
        let mut session = EditSession::default();
        let patch = Patch::token_set("--gap", TokenScope::Root, "8px").unwrap();
        assert!(matches!(session.apply(patch), Err(EditorError::NoDocument)));
    }

    #[test]
    fn test_patched_css_follows_history() {
        let mut session = loaded();
        session
            .apply(Patch::token_set("--gap", TokenScope::Root, "8px").unwrap())
            .unwrap();
        assert!(session.patched_css().contains("--gap: 8px;"));

        assert!(session.undo());
        assert_eq!(session.patched_css(), SOURCE);

        assert!(session.redo());
        let live = session.live_extraction().unwrap();
        assert_eq!(live.tokens[0].raw_value, "8px");

        session.reset();
        assert_eq!(session.patched_css(), SOURCE);
        assert!(!session.redo());
    }

    #[test]
    fn test_selection_by_key() {
        let mut session = loaded();
        let key = ComponentKey::new(".dark .bp-card", ComponentScope::Dark);

        let block = session.select_component(key.clone()).unwrap();
        assert_eq!(block.properties[0].value, "2px");

        // Reloading the same text keeps the selection
        session.load(Document::from_source(PathBuf::from("theme.css"), SOURCE.to_string()));
        assert_eq!(session.selected_key(), Some(&key));
        assert_eq!(session.selected_component().unwrap().scope, ComponentScope::Dark);

        // A document without the component drops it
        session.load(Document::from_source(PathBuf::from("other.css"), ".bp-btn{}".to_string()));
        assert!(session.selected_component().is_none());
        assert!(session.selected_key().is_none());
    }

    #[test]
    fn test_select_unknown_component() {
        let mut session = loaded();
        let key = ComponentKey::new(".bp-missing", ComponentScope::Light);
        assert!(matches!(
            session.select_component(key),
            Err(EditorError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_load_resets_history() {
        let mut session = loaded();
        session
            .apply(Patch::token_set("--gap", TokenScope::Root, "8px").unwrap())
            .unwrap();
        session.load(Document::from_source(PathBuf::from("theme.css"), SOURCE.to_string()));
        assert_eq!(session.history().snapshot_count(), 1);
        assert!(session.current_patches().is_empty());
    }

    #[test]
    fn test_toggle_dark_mode() {
        let mut session = EditSession::default();
        assert!(session.toggle_dark_mode());
        assert!(!session.toggle_dark_mode());
    }
}
