//! Parse error types.

use std::fmt;
use thiserror::Error;

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A line that is neither a header, an assignment, a comment nor blank.
    InvalidLine,
    /// `[[name]` or `[name]]`.
    MismatchedBrackets,
    /// Empty section name or key.
    EmptyName,
    /// A header more than one level deeper than its parent.
    NestingTooDeep,
    DuplicateKey,
    DuplicateSection,
    /// A name used both for a field and a subsection of the same parent.
    NameConflict,
    UnterminatedList,
    UnterminatedDict,
    UnterminatedString,
    UnexpectedCharacter,
    TrailingCharacters,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::InvalidLine => "invalid line",
            ParseErrorKind::MismatchedBrackets => "mismatched brackets",
            ParseErrorKind::EmptyName => "empty name",
            ParseErrorKind::NestingTooDeep => "section too nested",
            ParseErrorKind::DuplicateKey => "duplicate key",
            ParseErrorKind::DuplicateSection => "duplicate section",
            ParseErrorKind::NameConflict => "name conflict",
            ParseErrorKind::UnterminatedList => "unterminated list",
            ParseErrorKind::UnterminatedDict => "unterminated dict",
            ParseErrorKind::UnterminatedString => "unterminated string",
            ParseErrorKind::UnexpectedCharacter => "unexpected character",
            ParseErrorKind::TrailingCharacters => "trailing characters",
        };
        f.write_str(s)
    }
}

/// Parse error with source location.
///
/// `line` and `column` are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}, column {column}: {kind}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            line,
            column,
            message: message.into(),
        }
    }
}

/// Type alias for Result with ParseError.
pub type ParseResult<T> = Result<T, ParseError>;
