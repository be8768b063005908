use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Malformed input found while extracting tokens and components.
///
/// Every variant names the byte offset where the problem starts. The
/// extractor never aborts on these: it skips the offending fragment and
/// records the error as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Declaration without ':' at {pos}: '{fragment}'")]
    MissingColon { pos: usize, fragment: String },

    #[error("Declaration with empty name at {pos}")]
    EmptyName { pos: usize },

    #[error("Declaration '{name}' has an empty value at {pos}")]
    EmptyValue { pos: usize, name: String },

    #[error("Unterminated block opened at {pos}")]
    UnterminatedBlock { pos: usize },

    #[error("Unmatched '}}' at {pos}")]
    UnmatchedClose { pos: usize },

    #[error("Nested block inside '{selector}' at {pos} is not supported")]
    NestedBlock { pos: usize, selector: String },
}

impl ParseError {
    pub fn missing_colon(pos: usize, fragment: impl Into<String>) -> Self {
        Self::MissingColon {
            pos,
            fragment: fragment.into(),
        }
    }

    pub fn empty_name(pos: usize) -> Self {
        Self::EmptyName { pos }
    }

    pub fn empty_value(pos: usize, name: impl Into<String>) -> Self {
        Self::EmptyValue {
            pos,
            name: name.into(),
        }
    }

    pub fn unterminated_block(pos: usize) -> Self {
        Self::UnterminatedBlock { pos }
    }

    pub fn unmatched_close(pos: usize) -> Self {
        Self::UnmatchedClose { pos }
    }

    pub fn nested_block(pos: usize, selector: impl Into<String>) -> Self {
        Self::NestedBlock {
            pos,
            selector: selector.into(),
        }
    }

    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            Self::MissingColon { pos, .. }
            | Self::EmptyName { pos }
            | Self::EmptyValue { pos, .. }
            | Self::UnterminatedBlock { pos }
            | Self::UnmatchedClose { pos }
            | Self::NestedBlock { pos, .. } => *pos,
        }
    }
}
