use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range into the source document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice `source` by this span
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Block a design token was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Root,
    Dark,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Root => "root",
            TokenScope::Dark => "dark",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light or dark variant of a component rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentScope {
    Light,
    Dark,
}

impl ComponentScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentScope::Light => "light",
            ComponentScope::Dark => "dark",
        }
    }
}

impl fmt::Display for ComponentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom property declared in `:root` or `.dark`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Always starts with `--`
    pub name: String,
    pub raw_value: String,
    pub scope: TokenScope,
    /// Span of `raw_value` in the whole document
    pub span: Span,
}

/// One `name: value` declaration inside a component rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperty {
    pub name: String,
    pub value: String,
    #[serde(skip)]
    pub name_span: Span,
    #[serde(skip)]
    pub value_span: Span,
}

/// Identity of a component rule, stable across re-parses of the same text
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentKey {
    pub selector_name: String,
    pub scope: ComponentScope,
}

impl ComponentKey {
    pub fn new(selector_name: impl Into<String>, scope: ComponentScope) -> Self {
        Self {
            selector_name: selector_name.into(),
            scope,
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.selector_name, self.scope)
    }
}

/// A `.bp-*` rule block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBlock {
    /// `.bp-<name><modifiers>`, prefixed with `.dark ` for dark blocks
    pub selector_name: String,
    pub full_block_text: String,
    pub properties: Vec<ComponentProperty>,
    /// Selector start through the closing brace
    pub span: Span,
    /// Text between the braces, braces excluded
    #[serde(skip)]
    pub body_span: Span,
    pub scope: ComponentScope,
}

impl ComponentBlock {
    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(self.selector_name.clone(), self.scope)
    }

    pub fn matches(&self, selector_name: &str, scope: ComponentScope) -> bool {
        self.scope == scope && self.selector_name == selector_name
    }

    /// First property with the given name
    pub fn property(&self, name: &str) -> Option<&ComponentProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Bare component name, e.g. `btn` for `.dark .bp-btn.primary`
    pub fn component_name(&self) -> &str {
        let base = self
            .selector_name
            .rsplit_once(".bp-")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.selector_name);
        let end = base
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(base.len());
        &base[..end]
    }
}

/// Result of extracting one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Root tokens first, then dark tokens, each in textual order
    pub tokens: Vec<Token>,
    /// Light blocks first, then dark blocks, each in textual order
    pub components: Vec<ComponentBlock>,
    /// Fragments that were skipped as malformed
    #[serde(skip)]
    pub diagnostics: Vec<ParseError>,
}

impl Extraction {
    /// First token with this name in this scope
    pub fn token(&self, name: &str, scope: TokenScope) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.scope == scope && t.name == name)
    }

    /// First component block with this selector in this scope
    pub fn component(&self, selector_name: &str, scope: ComponentScope) -> Option<&ComponentBlock> {
        self.components
            .iter()
            .find(|c| c.matches(selector_name, scope))
    }

    pub fn component_by_key(&self, key: &ComponentKey) -> Option<&ComponentBlock> {
        self.component(&key.selector_name, key.scope)
    }

    pub fn tokens_in(&self, scope: TokenScope) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.scope == scope)
    }

    pub fn components_in(&self, scope: ComponentScope) -> impl Iterator<Item = &ComponentBlock> {
        self.components.iter().filter(move |c| c.scope == scope)
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
