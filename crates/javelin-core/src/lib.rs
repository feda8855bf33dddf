#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for the Javelin parser.
//!
//! Two foundations with no parser knowledge of their own:
//! - **`Interner`**: converts side-table names (type names, import paths,
//!   parameter names) into cheap `Symbol` handles
//! - **`SourceText`**: borrowed source plus a lazily built line index for
//!   translating byte offsets into line/column positions

mod interner;
mod source;


pub use interner::{Interner, Symbol};
pub use source::{LineCol, SourceText};
