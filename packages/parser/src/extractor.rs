use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;
use tracing::{debug, instrument, warn};

/// Extracts design tokens and `.bp-*` component blocks from CSS source.
///
/// Works on top-level rules only. Anything that is not a `:root` / `.dark`
/// token block or a component rule is left alone.
pub struct Extractor<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    diagnostics: Vec<ParseError>,
}

/// A top-level `selector { ... }` rule before classification
#[derive(Debug)]
struct RawRule<'src> {
    selector: &'src str,
    selector_span: Span,
    /// Token indices of the body, braces excluded
    body: Range<usize>,
    open_brace: usize,
    close_brace: usize,
    nested: bool,
}

/// One `name: value` pair with spans into the whole document
#[derive(Debug)]
struct Declaration<'src> {
    name: &'src str,
    name_span: Span,
    value: &'src str,
    value_span: Span,
}

impl<'src> Extractor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Run the extraction, consuming the extractor
    pub fn extract(mut self) -> Extraction {
        let rules = self.scan_rules();

        let mut root_tokens = Vec::new();
        let mut dark_tokens = Vec::new();
        let mut seen_root = false;
        let mut seen_dark = false;
        let mut light_components = Vec::new();
        let mut dark_components = Vec::new();

        for rule in &rules {
            let token_scope = match rule.selector {
                ":root" if !seen_root => Some(TokenScope::Root),
                ".dark" if !seen_dark => Some(TokenScope::Dark),
                _ => None,
            };

            if let Some(scope) = token_scope {
                if rule.nested {
                    self.report(ParseError::nested_block(rule.selector_span.start, rule.selector));
                    continue;
                }
                let tokens = self.collect_tokens(rule, scope);
                debug!(scope = %scope, count = tokens.len(), "Extracted token block");
                match scope {
                    TokenScope::Root => {
                        seen_root = true;
                        root_tokens = tokens;
                    }
                    TokenScope::Dark => {
                        seen_dark = true;
                        dark_tokens = tokens;
                    }
                }
                continue;
            }

            let Some((selector_name, scope)) = component_selector(rule.selector) else {
                continue;
            };
            if rule.nested {
                self.report(ParseError::nested_block(rule.selector_span.start, rule.selector));
                continue;
            }

            let block = self.build_component(rule, selector_name, scope);
            debug!(
                selector = %block.selector_name,
                scope = %scope,
                properties = block.properties.len(),
                "Extracted component block"
            );
            match scope {
                ComponentScope::Light => light_components.push(block),
                ComponentScope::Dark => dark_components.push(block),
            }
        }

        root_tokens.extend(dark_tokens);
        light_components.extend(dark_components);

        Extraction {
            tokens: root_tokens,
            components: light_components,
            diagnostics: self.diagnostics,
        }
    }

    /// Split the token stream into top-level rules by brace matching
    fn scan_rules(&mut self) -> Vec<RawRule<'src>> {
        let mut rules = Vec::new();
        let mut prelude_start: Option<usize> = None;

        while let Some((token, span)) = self.tokens.get(self.pos).cloned() {
            match token {
                Token::Word(_) | Token::Slash => {
                    prelude_start.get_or_insert(self.pos);
                    self.pos += 1;
                }
                Token::Semicolon => {
                    // Top-level statement such as `@import url(a.css);`
                    prelude_start = None;
                    self.pos += 1;
                }
                Token::RBrace => {
                    self.report(ParseError::unmatched_close(span.start));
                    prelude_start = None;
                    self.pos += 1;
                }
                Token::LBrace => {
                    let selector_span = match prelude_start.take() {
                        Some(first) => Span::new(self.tokens[first].1.start, self.tokens[self.pos - 1].1.end),
                        None => Span::new(span.start, span.start),
                    };

                    let Some((close_index, nested)) = self.find_close(self.pos) else {
                        self.report(ParseError::unterminated_block(span.start));
                        break;
                    };

                    rules.push(RawRule {
                        selector: selector_span.slice(self.source),
                        selector_span,
                        body: self.pos + 1..close_index,
                        open_brace: span.start,
                        close_brace: self.tokens[close_index].1.start,
                        nested,
                    });
                    self.pos = close_index + 1;
                }
            }
        }

        rules
    }

    /// Index of the `}` matching the `{` at `open`, and whether anything nested
    fn find_close(&self, open: usize) -> Option<(usize, bool)> {
        let mut depth = 0usize;
        let mut nested = false;

        for (index, (token, _)) in self.tokens.iter().enumerate().skip(open) {
            match token {
                Token::LBrace => {
                    depth += 1;
                    if depth > 1 {
                        nested = true;
                    }
                }
                Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((index, nested));
                    }
                }
                _ => {}
            }
        }

        None
    }

    /// Split a flat body on `;` into declarations
    fn declarations(&mut self, body: Range<usize>) -> Vec<Declaration<'src>> {
        let mut declarations = Vec::new();
        let mut fragment_start: Option<usize> = None;

        for index in body.clone() {
            match self.tokens[index].0 {
                Token::Semicolon => {
                    if let Some(first) = fragment_start.take() {
                        if let Some(decl) = self.declaration(first, index - 1) {
                            declarations.push(decl);
                        }
                    }
                }
                _ => {
                    fragment_start.get_or_insert(index);
                }
            }
        }

        // Last declaration may omit its `;`
        if let Some(first) = fragment_start {
            if let Some(decl) = self.declaration(first, body.end - 1) {
                declarations.push(decl);
            }
        }

        declarations
    }

    /// Build a declaration from the token run `first..=last`.
    ///
    /// The colon and the name/value boundaries come from tokens, so comments
    /// around the colon are never part of the name or the value start.
    fn declaration(&mut self, first: usize, last: usize) -> Option<Declaration<'src>> {
        let source = self.source;
        let start = self.tokens[first].1.start;
        let end = self.tokens[last].1.end;

        let colon = (first..=last).find_map(|index| match self.tokens[index] {
            (Token::Word(word), ref span) => word.find(':').map(|offset| (index, span.start + offset)),
            _ => None,
        });
        let Some((colon_token, colon)) = colon else {
            self.report(ParseError::missing_colon(start, &source[start..end]));
            return None;
        };

        let colon_span = self.tokens[colon_token].1.clone();
        let name_end = if colon_token == first || colon > colon_span.start {
            colon
        } else {
            self.tokens[colon_token - 1].1.end
        };
        let name = source[start..name_end].trim_end();
        if name.is_empty() {
            self.report(ParseError::empty_name(start));
            return None;
        }

        let value_start = if colon + 1 < colon_span.end {
            colon + 1
        } else if colon_token < last {
            self.tokens[colon_token + 1].1.start
        } else {
            self.report(ParseError::empty_value(start, name));
            return None;
        };

        Some(Declaration {
            name,
            name_span: Span::new(start, start + name.len()),
            value: &source[value_start..end],
            value_span: Span::new(value_start, end),
        })
    }

    fn collect_tokens(&mut self, rule: &RawRule<'src>, scope: TokenScope) -> Vec<crate::ast::Token> {
        self.declarations(rule.body.clone())
            .into_iter()
            .filter(|decl| is_custom_property(decl.name))
            .map(|decl| crate::ast::Token {
                name: decl.name.to_string(),
                raw_value: decl.value.to_string(),
                scope,
                span: decl.value_span,
            })
            .collect()
    }

    fn build_component(
        &mut self,
        rule: &RawRule<'src>,
        selector_name: String,
        scope: ComponentScope,
    ) -> ComponentBlock {
        let properties = self
            .declarations(rule.body.clone())
            .into_iter()
            .map(|decl| ComponentProperty {
                name: decl.name.to_string(),
                value: decl.value.to_string(),
                name_span: decl.name_span,
                value_span: decl.value_span,
            })
            .collect();

        let span = Span::new(rule.selector_span.start, rule.close_brace + 1);

        ComponentBlock {
            selector_name,
            full_block_text: span.slice(self.source).to_string(),
            properties,
            span,
            body_span: Span::new(rule.open_brace + 1, rule.close_brace),
            scope,
        }
    }

    fn report(&mut self, error: ParseError) {
        warn!(pos = error.pos(), "{}", error);
        self.diagnostics.push(error);
    }
}

/// Extract tokens and components, skipping and reporting malformed input
#[instrument(skip(source), fields(len = source.len()))]
pub fn extract(source: &str) -> Extraction {
    let extraction = Extractor::new(source).extract();
    debug!(
        tokens = extraction.tokens.len(),
        components = extraction.components.len(),
        diagnostics = extraction.diagnostics.len(),
        "Extraction complete"
    );
    extraction
}

/// Like [`extract`], but fails on the first malformed fragment
pub fn extract_strict(source: &str) -> ParseResult<Extraction> {
    let extraction = extract(source);
    match extraction.diagnostics.first() {
        Some(error) => Err(error.clone()),
        None => Ok(extraction),
    }
}

/// `--<ident>` where ident is letters, digits, `-` and `_`
pub fn is_custom_property(name: &str) -> bool {
    name.strip_prefix("--")
        .is_some_and(|ident| !ident.is_empty() && ident.chars().all(is_ident_char))
}

/// Classify a selector as a component and return its canonical name.
///
/// Light: `.bp-<ident>` followed by zero or more whitespace-separated or
/// chained `.<non-space>` fragments. Dark: `.dark` plus whitespace in front
/// of the same shape; the canonical name keeps the `.dark ` prefix.
pub fn component_selector(selector: &str) -> Option<(String, ComponentScope)> {
    let normalized = selector.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(base) = normalized.strip_prefix(".dark ") {
        return is_component_shape(base).then(|| (normalized.clone(), ComponentScope::Dark));
    }

    is_component_shape(&normalized).then_some((normalized.clone(), ComponentScope::Light))
}

fn is_component_shape(selector: &str) -> bool {
    let Some(rest) = selector.strip_prefix(".bp-") else {
        return false;
    };

    let ident_len = rest
        .find(|c: char| !is_ident_char(c))
        .unwrap_or(rest.len());
    if ident_len == 0 {
        return false;
    }

    let mut tail = &rest[ident_len..];
    loop {
        tail = tail.trim_start();
        if tail.is_empty() {
            return true;
        }
        let Some(after_dot) = tail.strip_prefix('.') else {
            return false;
        };
        let fragment_len = after_dot
            .find(char::is_whitespace)
            .unwrap_or(after_dot.len());
        if fragment_len == 0 {
            return false;
        }
        tail = &after_dot[fragment_len..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_selector_shapes() {
        assert_eq!(
            component_selector(".bp-btn"),
            Some((".bp-btn".to_string(), ComponentScope::Light))
        );
        assert_eq!(
            component_selector(".bp-btn.primary"),
            Some((".bp-btn.primary".to_string(), ComponentScope::Light))
        );
        assert_eq!(
            component_selector(".bp-btn   .icon"),
            Some((".bp-btn .icon".to_string(), ComponentScope::Light))
        );
        assert_eq!(
            component_selector(".dark\n  .bp-card"),
            Some((".dark .bp-card".to_string(), ComponentScope::Dark))
        );
    }

    #[test]
    fn test_non_component_selectors() {
        assert_eq!(component_selector(".bp-btn:hover"), None);
        assert_eq!(component_selector(".bp-a, .bp-b"), None);
        assert_eq!(component_selector(".bp-"), None);
        assert_eq!(component_selector(".dark"), None);
        assert_eq!(component_selector(".dark .card"), None);
        assert_eq!(component_selector("div .bp-btn"), None);
        assert_eq!(component_selector(".dark.bp-btn"), None);
    }

    #[test]
    fn test_is_custom_property() {
        assert!(is_custom_property("--color-primary"));
        assert!(is_custom_property("--space_2"));
        assert!(!is_custom_property("--"));
        assert!(!is_custom_property("color"));
        assert!(!is_custom_property("--a.b"));
    }

    #[test]
    fn test_declaration_spans() {
        let source = ".bp-card {  padding :  4px 8px ; }";
        let extraction = Extractor::new(source).extract();
        let prop = &extraction.components[0].properties[0];

        assert_eq!(prop.name, "padding");
        assert_eq!(prop.value, "4px 8px");
        assert_eq!(prop.name_span.slice(source), "padding");
        assert_eq!(prop.value_span.slice(source), "4px 8px");
    }

    #[test]
    fn test_trailing_comment_not_part_of_value() {
        let source = ":root { --gap: 4px /* base */; }";
        let extraction = Extractor::new(source).extract();
        assert_eq!(extraction.tokens[0].raw_value, "4px");
    }

    #[test]
    fn test_comments_around_colon() {
        let source = ".bp-a { color /* c */ : red; margin: /* m */ 0 auto; }";
        let extraction = Extractor::new(source).extract();
        let props = &extraction.components[0].properties;

        assert_eq!(props[0].name, "color");
        assert_eq!(props[0].value, "red");
        assert_eq!(props[1].name, "margin");
        assert_eq!(props[1].value, "0 auto");
        assert_eq!(props[1].value_span.slice(source), "0 auto");
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_colon_inside_comment_is_ignored() {
        let source = ".bp-a { color /* a:b */ red; }";
        let extraction = Extractor::new(source).extract();
        assert!(extraction.components[0].properties.is_empty());
        assert!(matches!(extraction.diagnostics[0], ParseError::MissingColon { .. }));
    }

    #[test]
    fn test_comment_line_in_body() {
        let source = ".bp-btn {\n  /* primary */\n  color: red;\n}";
        let extraction = Extractor::new(source).extract();
        assert_eq!(extraction.components[0].properties[0].name, "color");
    }

    #[test]
    fn test_empty_selector_rule_is_inert() {
        let extraction = Extractor::new("{ color: red; } .bp-a { b: c; }").extract();
        assert_eq!(extraction.components.len(), 1);
        assert!(extraction.diagnostics.is_empty());
    }
}
