#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Javelin: a parser for Java source text (through Java 25) producing a
//! compact, queryable index-overlay syntax tree.
//!
//! The tree lives in a bump-allocated [`NodeArena`] of fixed-size records,
//! `(kind, start, end)` plus child links, with side tables for the few
//! attribute-bearing kinds. Nodes borrow nothing: keep the source string
//! around and slice text on demand.
//!
//! # Example
//!
//! ```
//! use javelin_lib::{parse, NodeKind};
//!
//! let source = "class Test {}";
//! let parse = parse(source).expect("valid source");
//!
//! let arena = &parse.arena;
//! assert_eq!(arena.kind(parse.root), NodeKind::CompilationUnit);
//!
//! let class = arena.children(parse.root).next().expect("one child");
//! assert_eq!(arena.kind(class), NodeKind::ClassDeclaration);
//! assert_eq!(arena.text(class, source), "class Test {}");
//! ```
//!
//! Positions in errors are 1-based lines and columns; columns count
//! UTF-16 code units, matching the language's own convention.

mod arena;
mod error;
mod lexer;
mod parser;
mod syntax;
mod version;


pub use arena::{ArenaError, ArenaLimits, Attribute, Children, NodeArena, NodeId, NodeRecord};
pub use error::{LexError, MAX_RECURSION_DEPTH, ParseError, SyntaxError, SyntaxErrorPrinter};
pub use javelin_core::{Interner, LineCol, SourceText, Symbol};
pub use lexer::{Token, token_text, tokenize};
pub use syntax::{NodeKind, TokenKind, TokenSet};
pub use version::{Feature, FeatureSet, JavaVersion};

/// The success half of a parse: the root node id plus the arena that owns
/// the tree. The source string stays with the caller.
#[derive(Debug)]
pub struct Parse {
    pub root: NodeId,
    pub arena: NodeArena,
}

/// Parse source at the latest defined language version.
pub fn parse(source: &str) -> Result<Parse, SyntaxError> {
    parse_with_version(source, JavaVersion::latest())
}

/// Parse source at an explicit language version. Feature-gated constructs
/// outside the version fail with a located error.
pub fn parse_with_version(source: &str, version: JavaVersion) -> Result<Parse, SyntaxError> {
    let tokens = lexer::tokenize_with(source, version.features())
        .map_err(|err| SyntaxError::from_lex(err, &SourceText::new(source)))?;
    let parser = parser::core::Parser::new(source, tokens, version);
    let (root, arena) = parser.parse()?;
    Ok(Parse { root, arena })
}
