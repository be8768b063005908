//! # CSS Patcher
//!
//! Produces patched CSS from the original text and an ordered patch list.
//!
//! Patches apply in order, each against the result of the previous ones.
//! Bytes outside the spans a patch touches are never changed, and the same
//! input always yields the same output.
//!
//! ## Strategies
//!
//! - **Scoped** (default): re-extracts the current text before every patch and
//!   resolves the target by identity (token name + scope, selector + scope),
//!   then splices only inside that span.
//! - **FirstMatch**: textual substitution on the first matching declaration
//!   anywhere in the document. Scope is advisory only, so an edit can land in
//!   an unrelated block that declares the same name earlier.
//!
//! A patch whose target does not exist leaves the text unchanged.

use crate::patch::{Patch, PropertyEdit};
use blueprint_parser::tokenizer::{tokenize, Token};
use blueprint_parser::{extract, Span};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

pub const DEFAULT_INDENT: &str = "  ";

/// How patch targets are located in the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchStrategy {
    #[default]
    Scoped,
    FirstMatch,
}

impl fmt::Display for PatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchStrategy::Scoped => f.write_str("scoped"),
            PatchStrategy::FirstMatch => f.write_str("first-match"),
        }
    }
}

impl FromStr for PatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scoped" => Ok(PatchStrategy::Scoped),
            "first-match" => Ok(PatchStrategy::FirstMatch),
            other => Err(format!("unknown patch strategy '{}' (expected scoped or first-match)", other)),
        }
    }
}

/// What a single patch did to the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchOutcome {
    Applied,
    /// Target already had this value
    Unchanged,
    /// Add-property target already declares the property
    AlreadyPresent,
    TargetNotFound,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, PatchOutcome::Applied)
    }
}

#[derive(Debug, Clone)]
pub struct Patcher {
    strategy: PatchStrategy,
    indent: String,
}

impl Patcher {
    pub fn new(strategy: PatchStrategy) -> Self {
        Self {
            strategy,
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// Indentation for added declarations in single-line blocks
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn strategy(&self) -> PatchStrategy {
        self.strategy
    }

    /// Apply `patches` in order to `original`
    pub fn patch(&self, original: &str, patches: &[Patch]) -> String {
        self.patch_with_outcomes(original, patches).0
    }

    /// Like [`Patcher::patch`], also reporting what each patch did
    #[instrument(skip_all, fields(strategy = %self.strategy, patches = patches.len()))]
    pub fn patch_with_outcomes(&self, original: &str, patches: &[Patch]) -> (String, Vec<PatchOutcome>) {
        let mut css = original.to_string();
        let outcomes = patches
            .iter()
            .map(|patch| self.apply_one(&mut css, patch))
            .collect();
        (css, outcomes)
    }

    /// Apply one patch to `css` in place
    pub fn apply_one(&self, css: &mut String, patch: &Patch) -> PatchOutcome {
        let outcome = match self.strategy {
            PatchStrategy::Scoped => self.apply_scoped(css, patch),
            PatchStrategy::FirstMatch => self.apply_first_match(css, patch),
        };
        debug!(patch = %patch, outcome = ?outcome, "Applied patch");
        outcome
    }

    fn apply_scoped(&self, css: &mut String, patch: &Patch) -> PatchOutcome {
        let extraction = extract(css);

        match patch {
            Patch::TokenSet(p) => match extraction.token(p.token_name(), p.scope()) {
                Some(token) => splice(css, token.span, p.new_value()),
                None => PatchOutcome::TargetNotFound,
            },

            Patch::ComponentEditProperty(p) => {
                let Some(block) = extraction.component(p.selector_name(), p.scope()) else {
                    return PatchOutcome::TargetNotFound;
                };
                match block.property(p.property()) {
                    Some(prop) => splice(css, prop.value_span, p.new_value()),
                    None => PatchOutcome::TargetNotFound,
                }
            }

            Patch::ComponentAddProperty(p) => {
                let Some(block) = extraction.component(p.selector_name(), p.scope()) else {
                    return PatchOutcome::TargetNotFound;
                };
                if block.property(p.property()).is_some() {
                    return PatchOutcome::AlreadyPresent;
                }
                self.insert_declaration(css, block.body_span, p);
                PatchOutcome::Applied
            }
        }
    }

    fn apply_first_match(&self, css: &mut String, patch: &Patch) -> PatchOutcome {
        match patch {
            Patch::TokenSet(p) => match first_declaration_value(css, p.token_name()) {
                Some(span) => splice(css, span, p.new_value()),
                None => PatchOutcome::TargetNotFound,
            },

            Patch::ComponentEditProperty(p) => match first_declaration_value(css, p.property()) {
                Some(span) => splice(css, span, p.new_value()),
                None => PatchOutcome::TargetNotFound,
            },

            Patch::ComponentAddProperty(p) => {
                let Some(body) = first_block_body(css, p.selector_name()) else {
                    return PatchOutcome::TargetNotFound;
                };
                if declares(body.slice(css), p.property()) {
                    return PatchOutcome::AlreadyPresent;
                }
                self.insert_declaration(css, body, p);
                PatchOutcome::Applied
            }
        }
    }

    /// Insert `property: value;` as the last declaration of the block body.
    ///
    /// Terminates an unterminated last declaration first, then replaces the
    /// whitespace before `}` with the new line.
    fn insert_declaration(&self, css: &mut String, body: Span, edit: &PropertyEdit) {
        let mut close = body.end;
        let newline = line_ending(body.slice(css), css);

        let unterminated_end = tokenize(body.slice(css))
            .last()
            .filter(|(token, _)| *token != Token::Semicolon)
            .map(|(_, span)| span.end);
        if let Some(end) = unterminated_end {
            css.insert(body.start + end, ';');
            close += 1;
        }

        let content_end = css[..close].trim_end().len();
        let indent = line_indent(css, body.start, content_end).unwrap_or(&self.indent);
        let line = format!(
            "{newline}{}{}: {};{newline}",
            indent,
            edit.property(),
            edit.new_value()
        );

        css.replace_range(content_end..close, &line);
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new(PatchStrategy::default())
    }
}

/// Apply patches with the default scoped patcher
pub fn patch_css(original: &str, patches: &[Patch]) -> String {
    Patcher::default().patch(original, patches)
}

fn splice(css: &mut String, span: Span, value: &str) -> PatchOutcome {
    if span.slice(css) == value {
        return PatchOutcome::Unchanged;
    }
    css.replace_range(span.start..span.end, value);
    PatchOutcome::Applied
}

/// Line ending of the block body, falling back to the document's
fn line_ending(body: &str, css: &str) -> &'static str {
    let sample = if body.contains('\n') { body } else { css };
    if sample.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Leading whitespace of the line holding `content_end`, if that line starts
/// inside the block body
fn line_indent(css: &str, body_start: usize, content_end: usize) -> Option<&str> {
    let newline = css[..content_end].rfind('\n')?;
    if newline < body_start {
        return None;
    }
    let line = &css[newline + 1..content_end];
    let indent = &line[..line.len() - line.trim_start().len()];
    (!indent.is_empty()).then_some(indent)
}

/// Value span of the first `<name>: <value>;` anywhere in the text.
///
/// `name` must not be preceded by an identifier character, so `color` does
/// not match inside `background-color`.
fn first_declaration_value(css: &str, name: &str) -> Option<Span> {
    let pattern = format!(r"(?:^|[^\w-]){}\s*:\s*([^;{{}}]+);", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(css)?.get(1)?;

    let raw = value.as_str();
    let end = value.start() + raw.trim_end().len();
    Some(Span::new(value.start(), end))
}

/// Body span of the first `<selector> { ... }` in the text
fn first_block_body(css: &str, selector: &str) -> Option<Span> {
    let pattern = format!(r"{}\s*\{{([^{{}}]*)\}}", regex::escape(selector));
    let re = Regex::new(&pattern).ok()?;
    let body = re.captures(css)?.get(1)?;
    Some(Span::new(body.start(), body.end()))
}

fn declares(body: &str, property: &str) -> bool {
    body.split(';')
        .filter_map(|fragment| fragment.split_once(':'))
        .any(|(name, _)| name.trim() == property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_parser::{ComponentScope, TokenScope};

    #[test]
    fn test_first_declaration_value_respects_name_boundary() {
        let css = ".a { background-color: red; color: blue; }";
        let span = first_declaration_value(css, "color").unwrap();
        assert_eq!(span.slice(css), "blue");
    }

    #[test]
    fn test_first_declaration_value_trims_trailing_space() {
        let css = ":root { --gap: 4px ; }";
        let span = first_declaration_value(css, "--gap").unwrap();
        assert_eq!(span.slice(css), "4px");
    }

    #[test]
    fn test_first_block_body() {
        let css = ".bp-btn-lg { a: b; } .bp-btn { c: d; }";
        let body = first_block_body(css, ".bp-btn").unwrap();
        assert_eq!(body.slice(css), " c: d; ");
    }

    #[test]
    fn test_declares() {
        assert!(declares(" color: red; gap: 4px ", "gap"));
        assert!(!declares(" row-gap: 4px; ", "gap"));
    }

    #[test]
    fn test_insert_reuses_line_indent() {
        let css = ".bp-btn {\n    color: red;\n}\n";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "4px").unwrap();
        let out = Patcher::default().patch(css, &[patch]);
        assert_eq!(out, ".bp-btn {\n    color: red;\n    gap: 4px;\n}\n");
    }

    #[test]
    fn test_insert_terminates_last_declaration() {
        let css = ".bp-btn { color: red }";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "4px").unwrap();
        let out = Patcher::default().patch(css, &[patch]);
        assert_eq!(out, ".bp-btn { color: red;\n  gap: 4px;\n}");
    }

    #[test]
    fn test_insert_keeps_crlf_line_endings() {
        let css = ".bp-btn {\r\n  padding: 4px;\r\n}\r\n";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "1px").unwrap();
        let out = Patcher::default().patch(css, &[patch]);
        assert_eq!(out, ".bp-btn {\r\n  padding: 4px;\r\n  gap: 1px;\r\n}\r\n");
    }

    #[test]
    fn test_insert_single_line_block_in_crlf_document() {
        let css = ":root { --gap: 4px; }\r\n.bp-btn { color: red; }\r\n";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "1px").unwrap();
        let out = Patcher::default().patch(css, &[patch]);
        assert_eq!(out, ":root { --gap: 4px; }\r\n.bp-btn { color: red;\r\n  gap: 1px;\r\n}\r\n");
    }

    #[test]
    fn test_insert_terminates_before_trailing_comment() {
        let css = ".bp-btn { color: red /* note */ }";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "1px").unwrap();
        let out = Patcher::default().patch(css, &[patch]);
        assert_eq!(out, ".bp-btn { color: red; /* note */\n  gap: 1px;\n}");
    }

    #[test]
    fn test_edit_property_with_comment_before_colon() {
        let css = ".bp-a { color /* c */ : red; }";
        let patch = Patch::edit_property(".bp-a", ComponentScope::Light, "color", "blue").unwrap();
        let (out, outcomes) = Patcher::default().patch_with_outcomes(css, &[patch]);
        assert_eq!(out, ".bp-a { color /* c */ : blue; }");
        assert_eq!(outcomes, vec![PatchOutcome::Applied]);
    }

    #[test]
    fn test_insert_into_empty_block_with_custom_indent() {
        let css = ".bp-btn {}";
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "4px").unwrap();
        let out = Patcher::default().with_indent("\t").patch(css, &[patch]);
        assert_eq!(out, ".bp-btn {\n\tgap: 4px;\n}");
    }

    #[test]
    fn test_strategy_names() {
        for strategy in [PatchStrategy::Scoped, PatchStrategy::FirstMatch] {
            assert_eq!(strategy.to_string().parse::<PatchStrategy>(), Ok(strategy));
        }
        assert!("regex".parse::<PatchStrategy>().is_err());
    }

    #[test]
    fn test_outcomes_reported() {
        let css = ":root { --gap: 4px; }";
        let patches = vec![
            Patch::token_set("--gap", TokenScope::Root, "4px").unwrap(),
            Patch::token_set("--gap", TokenScope::Root, "8px").unwrap(),
            Patch::token_set("--gap", TokenScope::Dark, "8px").unwrap(),
        ];
        let (out, outcomes) = Patcher::default().patch_with_outcomes(css, &patches);

        assert_eq!(out, ":root { --gap: 8px; }");
        assert_eq!(
            outcomes,
            vec![
                PatchOutcome::Unchanged,
                PatchOutcome::Applied,
                PatchOutcome::TargetNotFound
            ]
        );
    }
}
