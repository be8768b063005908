use logos::Logos;
use std::fmt;

/// Coarse CSS tokens.
///
/// Only block structure and declaration boundaries matter to the extractor,
/// so everything between braces and semicolons collapses into `Word` runs.
/// Whitespace and comments are trivia. Strings get no special treatment: a
/// `;` or brace inside quotes is still a boundary.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Token<'src> {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token("/")]
    Slash,

    #[regex(r"[^{};/ \t\r\n\f]+", |lex| lex.slice())]
    Word(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Slash => write!(f, "/"),
            Token::Word(w) => write!(f, "'{}'", w),
        }
    }
}

/// Tokenize a source string
pub fn tokenize(source: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
