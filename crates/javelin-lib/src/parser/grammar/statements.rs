//! Statement productions.

use crate::arena::{Attribute, NodeId};
use crate::error::ParseError;
use crate::parser::core::Parser;
use crate::syntax::TokenKind::*;
use crate::syntax::{NodeKind, token_sets};
use crate::version::Feature;

impl Parser<'_> {
    pub(crate) fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(LBrace)?;
        let mut statements = Vec::new();
        while !self.at(RBrace) && !self.at(Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(RBrace)?;
        self.finish_node(NodeKind::Block, start, statements)
    }

    pub(crate) fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_statement_impl();
        self.exit_recursion();
        result
    }

    fn parse_statement_impl(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        match self.current() {
            LBrace => self.parse_block(),
            Semi => {
                let token = self.advance();
                self.leaf(NodeKind::EmptyStatement, token)
            }
            KwIf => {
                self.advance();
                self.expect(LParen)?;
                let condition = self.parse_expression()?;
                self.expect(RParen)?;
                let mut children = vec![condition, self.parse_statement()?];
                if self.eat(KwElse) {
                    children.push(self.parse_statement()?);
                }
                self.finish_node(NodeKind::IfStatement, start, children)
            }
            KwWhile => {
                self.advance();
                self.expect(LParen)?;
                let condition = self.parse_expression()?;
                self.expect(RParen)?;
                let body = self.parse_statement()?;
                self.finish_node(NodeKind::WhileStatement, start, vec![condition, body])
            }
            KwDo => {
                self.advance();
                let body = self.parse_statement()?;
                self.expect(KwWhile)?;
                self.expect(LParen)?;
                let condition = self.parse_expression()?;
                self.expect(RParen)?;
                self.expect(Semi)?;
                self.finish_node(NodeKind::DoStatement, start, vec![body, condition])
            }
            KwFor => self.parse_for(start),
            KwSwitch => self.parse_switch(false),
            KwTry => self.parse_try(start),
            KwSynchronized => {
                self.advance();
                self.expect(LParen)?;
                let monitor = self.parse_expression()?;
                self.expect(RParen)?;
                let body = self.parse_block()?;
                self.finish_node(NodeKind::SynchronizedStatement, start, vec![monitor, body])
            }
            KwReturn => {
                self.advance();
                let mut children = Vec::new();
                if !self.at(Semi) {
                    children.push(self.parse_expression()?);
                }
                self.expect(Semi)?;
                self.finish_node(NodeKind::ReturnStatement, start, children)
            }
            KwThrow => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect(Semi)?;
                self.finish_node(NodeKind::ThrowStatement, start, vec![value])
            }
            KwBreak => {
                self.advance();
                let mut children = Vec::new();
                if self.at(Identifier) {
                    let label = self.advance();
                    children.push(self.leaf(NodeKind::Identifier, label)?);
                }
                self.expect(Semi)?;
                self.finish_node(NodeKind::BreakStatement, start, children)
            }
            KwContinue => {
                self.advance();
                let mut children = Vec::new();
                if self.at(Identifier) {
                    let label = self.advance();
                    children.push(self.leaf(NodeKind::Identifier, label)?);
                }
                self.expect(Semi)?;
                self.finish_node(NodeKind::ContinueStatement, start, children)
            }
            KwAssert => {
                self.advance();
                let mut children = vec![self.parse_expression()?];
                if self.eat(Colon) {
                    children.push(self.parse_expression()?);
                }
                self.expect(Semi)?;
                self.finish_node(NodeKind::AssertStatement, start, children)
            }
            KwClass | KwInterface | KwEnum => self.parse_type_declaration(),
            KwAbstract | KwStatic | KwFinal | KwStrictfp | KwPublic | KwPrivate | KwProtected
            | At => {
                if self.statement_starts_type_decl() {
                    self.parse_type_declaration()
                } else {
                    self.parse_local_var_decl(true)
                }
            }
            Identifier => {
                if self.nth(1) == Colon {
                    let label = self.advance();
                    let label_node = self.leaf(NodeKind::Identifier, label)?;
                    self.advance(); // :
                    let body = self.parse_statement()?;
                    self.finish_node(NodeKind::LabeledStatement, start, vec![label_node, body])
                } else if self.at_contextual("yield")
                    && self.feature(Feature::YieldStatements)
                    && token_sets::YIELD_EXPR_FIRST.contains(self.nth(1))
                {
                    self.advance();
                    let value = self.parse_expression()?;
                    self.expect(Semi)?;
                    self.finish_node(NodeKind::YieldStatement, start, vec![value])
                } else if self.at_record_declaration() {
                    // Local record declaration.
                    self.parse_type_declaration()
                } else if self.looks_like_local_var_decl() {
                    self.parse_local_var_decl(true)
                } else {
                    self.parse_expression_statement(start)
                }
            }
            _ => {
                if self.looks_like_local_var_decl() {
                    self.parse_local_var_decl(true)
                } else if self.at_set(token_sets::EXPR_FIRST) {
                    self.parse_expression_statement(start)
                } else {
                    Err(self.expected("statement"))
                }
            }
        }
    }

    fn parse_expression_statement(&mut self, start: u32) -> Result<NodeId, ParseError> {
        let expression = self.parse_expression()?;
        self.expect(Semi)?;
        self.finish_node(NodeKind::ExpressionStatement, start, vec![expression])
    }

    /// Whether statement position (starting at modifiers/annotations)
    /// holds a local type declaration rather than a local variable.
    fn statement_starts_type_decl(&mut self) -> bool {
        let snap = self.save();
        loop {
            match self.current() {
                KwAbstract | KwStatic | KwFinal | KwStrictfp | KwPublic | KwPrivate
                | KwProtected => {
                    self.advance();
                }
                At if self.nth(1) == Identifier => self.skip_annotations(),
                Identifier
                    if self.feature(Feature::SealedTypes)
                        && (self.current_text() == "sealed"
                            || self.current_text() == "non-sealed") =>
                {
                    self.advance();
                }
                _ => break,
            }
        }
        let ok = matches!(self.current(), KwClass | KwInterface | KwEnum)
            || self.at_record_declaration();
        self.restore(snap);
        ok
    }

    // --- for ---

    fn parse_for(&mut self, start: u32) -> Result<NodeId, ParseError> {
        self.advance();
        self.expect(LParen)?;

        if self.looks_like_enhanced_for() {
            let variable = self.parse_for_variable()?;
            self.expect(Colon)?;
            let iterable = self.parse_expression()?;
            self.expect(RParen)?;
            let body = self.parse_statement()?;
            return self.finish_node(
                NodeKind::EnhancedForStatement,
                start,
                vec![variable, iterable, body],
            );
        }

        let mut children = Vec::new();
        if !self.at(Semi) {
            if self.looks_like_local_var_decl() {
                children.push(self.parse_local_var_decl(false)?);
            } else {
                loop {
                    children.push(self.parse_expression()?);
                    if self.eat(Comma) {
                        continue;
                    }
                    break;
                }
            }
        }
        self.expect(Semi)?;
        if !self.at(Semi) {
            children.push(self.parse_expression()?);
        }
        self.expect(Semi)?;
        if !self.at(RParen) {
            loop {
                children.push(self.parse_expression()?);
                if self.eat(Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(RParen)?;
        children.push(self.parse_statement()?);
        self.finish_node(NodeKind::ForStatement, start, children)
    }

    /// The `Type name` of an enhanced-for header, as a declaration without
    /// an initializer.
    fn parse_for_variable(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut children = Vec::new();
        self.parse_modifiers(&mut children)?;
        children.push(self.parse_type()?);

        let decl_start = self.peek_start();
        let name = self.expect_identifier()?;
        let name_node = self.leaf(NodeKind::Identifier, name)?;
        let declarator =
            self.finish_node(NodeKind::VariableDeclarator, decl_start, vec![name_node])?;
        children.push(declarator);

        self.finish_node(NodeKind::LocalVariableDeclaration, start, children)
    }

    // --- switch ---

    /// Shared by switch statements and switch expressions; colon and
    /// arrow case bodies are both handled here.
    pub(crate) fn parse_switch(&mut self, is_expression: bool) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(KwSwitch)?;
        self.expect(LParen)?;
        let selector = self.parse_expression()?;
        self.expect(RParen)?;
        self.expect(LBrace)?;
        let mut children = vec![selector];
        while !self.at(RBrace) && !self.at(Eof) {
            children.push(self.parse_switch_case()?);
        }
        self.expect(RBrace)?;
        let kind = if is_expression {
            NodeKind::SwitchExpression
        } else {
            NodeKind::SwitchStatement
        };
        self.finish_node(kind, start, children)
    }

    fn parse_switch_case(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut children = Vec::new();
        match self.current() {
            KwCase => {
                self.advance();
                loop {
                    if let Some(label) = self.parse_case_label()? {
                        children.push(label);
                    }
                    if self.eat(Comma) {
                        continue;
                    }
                    break;
                }
            }
            KwDefault => {
                self.advance();
            }
            _ => return Err(self.expected("'case' or 'default'")),
        }

        if self.eat(Colon) {
            while !matches!(self.current(), KwCase | KwDefault | RBrace | Eof) {
                children.push(self.parse_statement()?);
            }
        } else if self.at(Arrow) {
            self.check_feature(Feature::SwitchRules, "Switch rules")?;
            self.advance();
            if self.at(LBrace) {
                children.push(self.parse_block()?);
            } else if self.at(KwThrow) {
                children.push(self.parse_statement()?);
            } else {
                let value = self.parse_expression()?;
                self.expect(Semi)?;
                children.push(value);
            }
        } else {
            return Err(self.expected("':' or '->'"));
        }

        self.finish_node(NodeKind::SwitchCase, start, children)
    }

    /// One `case` label: a constant expression, a type pattern, or the
    /// `default` keyword (which contributes no node).
    fn parse_case_label(&mut self) -> Result<Option<NodeId>, ParseError> {
        if self.at(KwDefault) {
            self.advance();
            return Ok(None);
        }
        if self.feature(Feature::PatternsInSwitch) && self.looks_like_type_pattern() {
            let start = self.peek_start();
            if self.at(KwFinal) {
                self.advance();
            }
            let ty = self.parse_type()?;
            let binding = self.expect_identifier()?;
            let binding_node = self.leaf(NodeKind::Identifier, binding)?;
            let pattern =
                self.finish_node(NodeKind::TypePattern, start, vec![ty, binding_node])?;
            return Ok(Some(pattern));
        }
        Ok(Some(self.parse_expression()?))
    }

    // --- try ---

    fn parse_try(&mut self, start: u32) -> Result<NodeId, ParseError> {
        self.advance();
        let mut children = Vec::new();
        let mut has_handler = false;

        if self.at(LParen) {
            has_handler = true; // try-with-resources needs no catch/finally
            self.advance();
            while !self.at(RParen) && !self.at(Eof) {
                children.push(self.parse_resource()?);
                if !self.eat(Semi) {
                    break;
                }
            }
            self.expect(RParen)?;
        }

        children.push(self.parse_block()?);

        while self.at(KwCatch) {
            has_handler = true;
            children.push(self.parse_catch_clause()?);
        }
        if self.eat(KwFinally) {
            has_handler = true;
            children.push(self.parse_block()?);
        }
        if !has_handler {
            return Err(self.expected("'catch' or 'finally'"));
        }
        self.finish_node(NodeKind::TryStatement, start, children)
    }

    /// A resource: a variable declaration or an (effectively final)
    /// expression reference.
    fn parse_resource(&mut self) -> Result<NodeId, ParseError> {
        if self.looks_like_local_var_decl() {
            self.parse_local_var_decl(false)
        } else {
            self.parse_expression()
        }
    }

    fn parse_catch_clause(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(KwCatch)?;
        self.expect(LParen)?;

        let param_start = self.peek_start();
        let mut param_children = Vec::new();
        let modifiers = self.parse_modifiers(&mut param_children)?;

        let type_start = self.peek_start();
        let first = self.parse_type()?;
        if self.at(Pipe) {
            let mut types = vec![first];
            while self.eat(Pipe) {
                types.push(self.parse_type()?);
            }
            param_children.push(self.finish_node(NodeKind::UnionType, type_start, types)?);
        } else {
            param_children.push(first);
        }

        let name = self.expect_identifier()?;
        let symbol = self.intern(self.token_str(name));
        let param =
            self.finish_node(NodeKind::ParameterDeclaration, param_start, param_children)?;
        self.set_attribute(
            param,
            Attribute::Parameter {
                name: symbol,
                is_final: modifiers.is_final,
                is_var_args: false,
                is_receiver: false,
            },
        );

        self.expect(RParen)?;
        let body = self.parse_block()?;
        self.finish_node(NodeKind::CatchClause, start, vec![param, body])
    }

    // --- local variables ---

    pub(crate) fn parse_local_var_decl(&mut self, require_semi: bool) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut children = Vec::new();
        self.parse_modifiers(&mut children)?;
        children.push(self.parse_type()?);
        loop {
            children.push(self.parse_variable_declarator()?);
            if self.eat(Comma) {
                continue;
            }
            break;
        }
        if require_semi {
            self.expect(Semi)?;
        }
        self.finish_node(NodeKind::LocalVariableDeclaration, start, children)
    }

    pub(crate) fn parse_variable_declarator(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let name = self.expect_identifier()?;
        let name_node = self.leaf(NodeKind::Identifier, name)?;
        let mut children = vec![name_node];
        // C-style extra bracket dims on the declarator.
        while self.at(LBracket) && self.nth(1) == RBracket {
            self.advance();
            self.advance();
        }
        if self.eat(Assign) {
            children.push(self.parse_variable_initializer()?);
        }
        self.finish_node(NodeKind::VariableDeclarator, start, children)
    }
}
