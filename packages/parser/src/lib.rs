//! # Blueprint Parser
//!
//! Pulls design tokens and component blocks out of Blueprint-convention CSS:
//!
//! ```css
//! :root { --color-primary: #3366ff; }
//! .dark { --color-primary: #88aaff; }
//! .bp-btn { background: var(--color-primary); }
//! .dark .bp-btn { border: 1px solid white; }
//! ```
//!
//! This is deliberately not a CSS parser. Only top-level `:root` / `.dark`
//! custom-property blocks and `.bp-*` rules are recognized; everything else
//! is inert. Declaration values end at the first `;`, so a semicolon inside a
//! string or data URL is not supported, and recognized rule bodies must not
//! contain nested blocks.

pub mod ast;
pub mod error;
pub mod extractor;
pub mod tokenizer;

pub use ast::{
    ComponentBlock, ComponentKey, ComponentProperty, ComponentScope, Extraction, Span, Token,
    TokenScope,
};
pub use error::{ParseError, ParseResult};
pub use extractor::{component_selector, extract, extract_strict, is_custom_property, Extractor};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic() {
        let source = ":root{--gap:4px;} .bp-card{padding:4px;}";
        let extraction = extract(source);
        assert_eq!(extraction.tokens.len(), 1);
        assert_eq!(extraction.components.len(), 1);
    }
}
