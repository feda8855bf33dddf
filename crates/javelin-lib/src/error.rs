//! Error types and failure rendering.
//!
//! Internal errors (`LexError`, `ParseError`, `ArenaError`) propagate with
//! `?` and are never caught inside the parser; the first one aborts the
//! parse. At the API boundary they collapse into [`SyntaxError`], a single
//! one-line, human-readable message carrying a line/column location.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use javelin_core::SourceText;
use serde::Serialize;

/// Maximum parser recursion depth before the parse is aborted.
pub const MAX_RECURSION_DEPTH: u32 = 1000;

/// Lexical error: unterminated literal, invalid escape, or a character no
/// token can begin with. `offset` is the byte offset where the defect was
/// detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub offset: u32,
    pub message: String,
}

impl LexError {
    pub fn new(offset: u32, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Parse error. The first one aborts the parse; callers receive it as a
/// [`SyntaxError`] and never see a partial tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Wrong token class at a position the grammar committed to.
    #[error("Expected {expected} but found {found} at line {line}, column {column}")]
    ExpectedToken {
        expected: String,
        found: &'static str,
        line: u32,
        column: u32,
    },

    /// The recursion-depth cap was breached.
    #[error("Maximum recursion depth exceeded ({limit}); possible stack overflow")]
    RecursionLimit { limit: u32, line: u32, column: u32 },

    /// The arena node-count or memory budget was breached.
    #[error("{message}")]
    ResourceLimit {
        message: String,
        line: u32,
        column: u32,
    },

    /// A syntactic feature the selected version does not enable.
    #[error("{message} at line {line}, column {column}")]
    Feature {
        message: String,
        line: u32,
        column: u32,
    },
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::ExpectedToken { line, .. }
            | ParseError::RecursionLimit { line, .. }
            | ParseError::ResourceLimit { line, .. }
            | ParseError::Feature { line, .. } => *line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            ParseError::ExpectedToken { column, .. }
            | ParseError::RecursionLimit { column, .. }
            | ParseError::ResourceLimit { column, .. }
            | ParseError::Feature { column, .. } => *column,
        }
    }
}

/// The public failure half of a parse result: one line of message plus a
/// 1-based line and UTF-16 column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    message: String,
    #[serde(skip)]
    offset: u32,
}

impl SyntaxError {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_lex(err: LexError, source: &SourceText<'_>) -> Self {
        let pos = source.position(err.offset);
        Self {
            line: pos.line,
            column: pos.column,
            message: format!("{} at line {}, column {}", err.message, pos.line, pos.column),
            offset: err.offset,
        }
    }

    pub(crate) fn from_parse(err: ParseError, offset: u32) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
            offset,
        }
    }

    /// Builder for rendering this error against its source.
    pub fn printer(&self) -> SyntaxErrorPrinter<'_, '_> {
        SyntaxErrorPrinter {
            error: self,
            source: None,
            path: None,
            colored: false,
        }
    }
}

/// Builder-pattern renderer for a [`SyntaxError`], with optional source
/// context and path.
pub struct SyntaxErrorPrinter<'e, 's> {
    error: &'e SyntaxError,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> SyntaxErrorPrinter<'e, 's> {
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let Some(source) = self.source else {
            return self.error.message.clone();
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let range = caret_range(self.error.offset, source.len());
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(range)
                .label(&self.error.message),
        );

        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report: Vec<Group> = vec![
            Level::ERROR
                .primary_title(&self.error.message)
                .element(snippet),
        ];

        renderer.render(&report).to_string()
    }
}

/// Widen an offset to a non-empty range so the caret is visible, clamped
/// to the source length.
fn caret_range(offset: u32, limit: usize) -> std::ops::Range<usize> {
    let start = (offset as usize).min(limit);
    start..(start + 1).min(limit).max(start)
}
