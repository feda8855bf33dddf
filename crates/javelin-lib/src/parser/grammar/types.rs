//! Type productions.
//!
//! The type state machine: base (qualified name or primitive) → optional
//! type arguments → dotted tail (possibly annotated, possibly with more
//! arguments) → array suffix. The outer type name of a parameterized type
//! is always allocated as a `QualifiedName` child ahead of the argument
//! children; annotations after a `.` become children of the name node they
//! decorate, positioned by source offset.

use crate::arena::NodeId;
use crate::error::ParseError;
use crate::parser::core::Parser;
use crate::syntax::TokenKind::*;
use crate::syntax::{NodeKind, token_sets};

impl Parser<'_> {
    /// A full type, including array dims.
    pub(crate) fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_type_impl(true);
        self.exit_recursion();
        result
    }

    /// A type without its array dims (`new` headers own the dims).
    pub(crate) fn parse_type_no_dims(&mut self) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_type_impl(false);
        self.exit_recursion();
        result
    }

    fn parse_type_impl(&mut self, with_dims: bool) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let annotations = self.parse_type_annotations()?;
        self.parse_type_with(start, annotations, with_dims)
    }

    fn parse_type_with(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
        with_dims: bool,
    ) -> Result<NodeId, ParseError> {
        let mut ty = if self.at_set(token_sets::PRIMITIVE_TYPES) || self.at(KwVoid) {
            let token = self.advance();
            if annotations.is_empty() {
                self.leaf(NodeKind::PrimitiveType, token)?
            } else {
                self.finish_node(NodeKind::PrimitiveType, start, annotations)?
            }
        } else {
            self.parse_named_type(start, annotations)?
        };

        if with_dims {
            ty = self.parse_array_dims(start, ty)?;
        }
        Ok(ty)
    }

    pub(crate) fn parse_type_annotations(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut annotations = Vec::new();
        while self.at(At) && self.nth(1) == Identifier {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    /// `Name (. Name)* [<args>] (. @A* Name [<args>])*`
    fn parse_named_type(
        &mut self,
        start: u32,
        mut annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.expect_identifier()?;

        // Plain dotted prefix, annotations after dots allowed.
        loop {
            if self.at(Dot) && self.nth(1) == Identifier {
                self.advance();
                self.advance();
                continue;
            }
            if self.at(Dot) && self.nth(1) == At {
                self.advance();
                annotations.extend(self.parse_type_annotations()?);
                self.expect_identifier()?;
                continue;
            }
            break;
        }

        let mut ty = self.finish_node(NodeKind::QualifiedName, start, annotations)?;

        if self.at(Lt) {
            let args = self.parse_type_arguments()?;
            let mut children = vec![ty];
            children.extend(args);
            ty = self.finish_node(NodeKind::ParameterizedType, start, children)?;

            // Dotted tail after a parameterized prefix: Outer<T>.Inner<U>
            while self.at(Dot) && matches!(self.nth(1), Identifier | At) {
                self.advance();
                let annotations = self.parse_type_annotations()?;
                self.expect_identifier()?;
                if self.at(Lt) {
                    let args = self.parse_type_arguments()?;
                    let mut children = vec![ty];
                    children.extend(annotations);
                    children.extend(args);
                    ty = self.finish_node(NodeKind::ParameterizedType, start, children)?;
                } else {
                    let mut children = vec![ty];
                    children.extend(annotations);
                    ty = self.finish_node(NodeKind::QualifiedName, start, children)?;
                }
            }
        }

        Ok(ty)
    }

    /// Zero or more `[]`, each optionally annotated. Each dim wraps the
    /// element type in a fresh `ArrayType`.
    fn parse_array_dims(&mut self, start: u32, mut ty: NodeId) -> Result<NodeId, ParseError> {
        loop {
            if self.at(LBracket) && self.nth(1) == RBracket {
                self.advance();
                self.advance();
                ty = self.finish_node(NodeKind::ArrayType, start, vec![ty])?;
                continue;
            }
            if self.at(At) && self.nth(1) == Identifier {
                let snap = self.save();
                self.skip_annotations();
                let is_dim = self.at(LBracket) && self.nth(1) == RBracket;
                self.restore(snap);
                if !is_dim {
                    break;
                }
                let annotations = self.parse_type_annotations()?;
                self.expect(LBracket)?;
                self.expect(RBracket)?;
                let mut children = vec![ty];
                children.extend(annotations);
                ty = self.finish_node(NodeKind::ArrayType, start, children)?;
                continue;
            }
            break;
        }
        Ok(ty)
    }

    fn at_type_close(&self) -> bool {
        matches!(self.current(), Gt | Shr | UShr | Ge | ShrAssign | UShrAssign)
    }

    /// `<>` (diamond) or `<arg (, arg)*>`. Closing consumes one logical
    /// `>`, splitting compound tokens as needed.
    pub(crate) fn parse_type_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(Lt)?;
        let mut args = Vec::new();

        if self.at_type_close() {
            self.eat_type_close()?;
            return Ok(args);
        }

        loop {
            args.push(self.parse_type_argument()?);
            if self.eat(Comma) {
                continue;
            }
            break;
        }
        self.eat_type_close()?;
        Ok(args)
    }

    fn parse_type_argument(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let annotations = self.parse_type_annotations()?;

        if self.at(Question) {
            self.advance();
            let mut children = annotations;
            if self.at(KwExtends) || self.at(KwSuper) {
                self.advance();
                children.push(self.parse_type()?);
            }
            return self.finish_node(NodeKind::WildcardType, start, children);
        }

        self.parse_type_with(start, annotations, true)
    }

    /// Plain dotted name as a single `QualifiedName` leaf.
    pub(crate) fn parse_qualified_name_node(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect_identifier()?;
        while self.at(Dot) && self.nth(1) == Identifier {
            self.advance();
            self.advance();
        }
        self.finish_node(NodeKind::QualifiedName, start, Vec::new())
    }

    /// Plain dotted name, returned as its joined text.
    pub(crate) fn parse_dotted_name_text(&mut self) -> Result<String, ParseError> {
        let first = self.expect_identifier()?;
        let mut text = self.token_str(first).to_string();
        while self.at(Dot) && self.nth(1) == Identifier {
            self.advance();
            let segment = self.advance();
            text.push('.');
            text.push_str(self.token_str(segment));
        }
        Ok(text)
    }
}
