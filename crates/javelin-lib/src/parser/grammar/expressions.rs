//! Expression productions.
//!
//! Operator-precedence climbing over the standard ladder: assignment <
//! ternary < logical-or < … < multiplicative < unary < postfix < primary.
//! Assignment and the ternary are right-associative, everything else
//! left-associative. Nodes are built bottom-up; a parent's span runs from
//! its first operand's start to the last consumed token.

use crate::arena::{Attribute, NodeId};
use crate::error::ParseError;
use crate::parser::core::Parser;
use crate::parser::grammar::probe::ParenShape;
use crate::syntax::TokenKind::*;
use crate::syntax::{NodeKind, TokenKind, token_sets};
use crate::version::Feature;

/// Precedence of the relational level (`<`, `instanceof`, …).
const REL_PREC: u8 = 7;

fn binary_prec(kind: TokenKind) -> Option<u8> {
    let prec = match kind {
        OrOr => 1,
        AndAnd => 2,
        Pipe => 3,
        Caret => 4,
        Amp => 5,
        Eq | Ne => 6,
        Lt | Gt | Le | Ge => REL_PREC,
        Shl | Shr | UShr => 8,
        Plus | Minus => 9,
        Star | Slash | Percent => 10,
        _ => return None,
    };
    Some(prec)
}

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_assignment();
        self.exit_recursion();
        result
    }

    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let lhs = self.parse_conditional(start)?;
        if self.current().is_assignment_op() {
            self.advance();
            let rhs = self.parse_expression()?;
            return self.finish_node(NodeKind::AssignmentExpression, start, vec![lhs, rhs]);
        }
        Ok(lhs)
    }

    fn parse_conditional(&mut self, start: u32) -> Result<NodeId, ParseError> {
        let condition = self.parse_binary(start, 1)?;
        if !self.at(Question) {
            return Ok(condition);
        }
        self.advance();
        let then_branch = self.parse_expression()?;
        self.expect(Colon)?;
        let else_start = self.peek_start();
        let else_branch = self.parse_conditional(else_start)?;
        self.finish_node(
            NodeKind::ConditionalExpression,
            start,
            vec![condition, then_branch, else_branch],
        )
    }

    fn parse_binary(&mut self, start: u32, min_prec: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let kind = self.current();

            if kind == KwInstanceof && REL_PREC >= min_prec {
                self.advance();
                let mut children = vec![lhs];
                if self.feature(Feature::PatternInstanceof) && self.at(KwFinal) {
                    self.advance();
                }
                children.push(self.parse_type()?);
                // Pattern instanceof: the binding extends the right span.
                if self.feature(Feature::PatternInstanceof) && self.at(Identifier) {
                    let binding = self.advance();
                    children.push(self.leaf(NodeKind::Identifier, binding)?);
                }
                lhs = self.finish_node(NodeKind::BinaryExpression, start, children)?;
                continue;
            }

            let Some(prec) = binary_prec(kind) else { break };
            if prec < min_prec {
                break;
            }
            self.advance();
            let rhs_start = self.peek_start();
            let rhs = self.parse_binary(rhs_start, prec + 1)?;
            lhs = self.finish_node(NodeKind::BinaryExpression, start, vec![lhs, rhs])?;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        match self.current() {
            Plus | Minus | Not | Tilde | PlusPlus | MinusMinus => {
                self.enter_recursion()?;
                let start = self.peek_start();
                self.advance();
                let result = self
                    .parse_unary()
                    .and_then(|operand| {
                        self.finish_node(NodeKind::UnaryExpression, start, vec![operand])
                    });
                self.exit_recursion();
                result
            }
            LParen => match self.classify_paren() {
                ParenShape::Cast => self.parse_cast_expression(),
                ParenShape::Lambda => self.parse_paren_lambda(),
                ParenShape::Expr => {
                    let start = self.peek_start();
                    self.advance();
                    let inner = self.parse_expression()?;
                    self.expect(RParen)?;
                    let node =
                        self.finish_node(NodeKind::ParenthesizedExpression, start, vec![inner])?;
                    self.parse_postfix(start, node)
                }
            },
            _ => {
                let start = self.peek_start();
                let primary = self.parse_primary()?;
                self.parse_postfix(start, primary)
            }
        }
    }

    fn parse_cast_expression(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(LParen)?;
        let mut children = vec![self.parse_type()?];
        // Intersection cast: (A & B) r
        while self.eat(Amp) {
            children.push(self.parse_type()?);
        }
        self.expect(RParen)?;
        children.push(self.parse_unary()?);
        self.finish_node(NodeKind::CastExpression, start, children)
    }

    fn parse_postfix(&mut self, start: u32, mut expr: NodeId) -> Result<NodeId, ParseError> {
        loop {
            match self.current() {
                PlusPlus | MinusMinus => {
                    self.advance();
                    expr = self.finish_node(NodeKind::PostfixExpression, start, vec![expr])?;
                }
                Dot => expr = self.parse_dot_suffix(start, expr)?,
                LBracket => {
                    if self.nth(1) == RBracket {
                        // Array-type qualifier: String[].class, int[]::new
                        while self.at(LBracket) && self.nth(1) == RBracket {
                            self.advance();
                            self.advance();
                            expr = self.finish_node(NodeKind::ArrayType, start, vec![expr])?;
                        }
                        if self.at(Dot) && self.nth(1) == KwClass {
                            self.advance();
                            self.advance();
                            expr = self.finish_node(NodeKind::FieldAccess, start, vec![expr])?;
                        }
                    } else {
                        self.advance();
                        let index = self.parse_expression()?;
                        self.expect(RBracket)?;
                        expr =
                            self.finish_node(NodeKind::ArrayAccess, start, vec![expr, index])?;
                    }
                }
                ColonColon => {
                    self.advance();
                    let mut children = vec![expr];
                    if self.at(Lt) {
                        children.extend(self.parse_type_arguments()?);
                    }
                    if self.at(KwNew) {
                        self.advance();
                    } else {
                        let name = self.expect_identifier()?;
                        children.push(self.leaf(NodeKind::Identifier, name)?);
                    }
                    expr = self.finish_node(NodeKind::MethodReference, start, children)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_dot_suffix(&mut self, start: u32, expr: NodeId) -> Result<NodeId, ParseError> {
        match self.nth(1) {
            Identifier => {
                self.advance(); // .
                let name = self.advance();
                let name_node = self.leaf(NodeKind::Identifier, name)?;
                if self.at(LParen) {
                    let mut children = vec![expr, name_node];
                    children.extend(self.parse_arguments()?);
                    self.finish_node(NodeKind::MethodInvocation, start, children)
                } else {
                    self.finish_node(NodeKind::FieldAccess, start, vec![expr, name_node])
                }
            }
            Lt => {
                // Explicit type arguments: recv.<T>method(args)
                self.advance(); // .
                let args = self.parse_type_arguments()?;
                let name = self.expect_identifier()?;
                let name_node = self.leaf(NodeKind::Identifier, name)?;
                let mut children = vec![expr];
                children.extend(args);
                children.push(name_node);
                children.extend(self.parse_arguments()?);
                self.finish_node(NodeKind::MethodInvocation, start, children)
            }
            KwClass => {
                self.advance();
                self.advance();
                self.finish_node(NodeKind::FieldAccess, start, vec![expr])
            }
            KwThis => {
                self.advance();
                self.advance();
                self.finish_node(NodeKind::ThisExpression, start, vec![expr])
            }
            KwSuper => {
                self.advance();
                self.advance();
                self.finish_node(NodeKind::SuperExpression, start, vec![expr])
            }
            KwNew => {
                // Qualified creation: outer.new Inner()
                self.advance(); // .
                self.parse_creation(start, Some(expr))
            }
            _ => Err(self.expected("identifier")),
        }
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let leaf_kind = match self.current() {
            IntLiteral => Some(NodeKind::IntegerLiteral),
            LongLiteral => Some(NodeKind::LongLiteral),
            FloatLiteral => Some(NodeKind::FloatLiteral),
            DoubleLiteral => Some(NodeKind::DoubleLiteral),
            CharLiteral => Some(NodeKind::CharLiteral),
            StringLiteral | TextBlock => Some(NodeKind::StringLiteral),
            KwTrue | KwFalse => Some(NodeKind::BooleanLiteral),
            KwNull => Some(NodeKind::NullLiteral),
            _ => None,
        };
        if let Some(kind) = leaf_kind {
            let token = self.advance();
            return self.leaf(kind, token);
        }

        match self.current() {
            KwThis => {
                let token = self.advance();
                let this_node = self.leaf(NodeKind::ThisExpression, token)?;
                if self.at(LParen) {
                    // Explicit constructor invocation: this(args)
                    let mut children = vec![this_node];
                    children.extend(self.parse_arguments()?);
                    return self.finish_node(NodeKind::MethodInvocation, start, children);
                }
                Ok(this_node)
            }
            KwSuper => {
                let token = self.advance();
                let super_node = self.leaf(NodeKind::SuperExpression, token)?;
                if self.at(LParen) {
                    // Explicit constructor invocation: super(args)
                    let mut children = vec![super_node];
                    children.extend(self.parse_arguments()?);
                    return self.finish_node(NodeKind::MethodInvocation, start, children);
                }
                Ok(super_node)
            }
            KwNew => self.parse_creation(start, None),
            KwSwitch => {
                self.check_feature(Feature::SwitchRules, "Switch expressions")?;
                self.parse_switch(true)
            }
            Identifier => {
                if self.nth(1) == Arrow {
                    return self.parse_single_param_lambda();
                }
                // `Name<T>::ref`, `Name[]::new`, `Name.class`: parse the
                // qualifier as a type; the postfix loop takes it from
                // there (see the generics-vs-less-than rule).
                if self.looks_like_type_qualifier() {
                    return self.parse_type();
                }
                let token = self.advance();
                let name_node = self.leaf(NodeKind::Identifier, token)?;
                if self.at(LParen) {
                    // Unqualified invocation: name(args)
                    let mut children = vec![name_node];
                    children.extend(self.parse_arguments()?);
                    return self.finish_node(NodeKind::MethodInvocation, start, children);
                }
                Ok(name_node)
            }
            KwVoid => {
                // void.class
                let token = self.advance();
                self.leaf(NodeKind::PrimitiveType, token)
            }
            k if token_sets::PRIMITIVE_TYPES.contains(k) => {
                // int.class, int[]::new: the qualifier is a type.
                self.parse_type()
            }
            _ => Err(self.expected("expression")),
        }
    }

    fn parse_single_param_lambda(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let token = self.advance();
        let param = self.leaf(NodeKind::ParameterDeclaration, token)?;
        let name = self.intern(self.token_str(token));
        self.set_attribute(
            param,
            Attribute::Parameter {
                name,
                is_final: false,
                is_var_args: false,
                is_receiver: false,
            },
        );
        self.expect(Arrow)?;
        let body = self.parse_lambda_body()?;
        self.finish_node(NodeKind::LambdaExpression, start, vec![param, body])
    }

    fn parse_paren_lambda(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(LParen)?;
        let mut children = Vec::new();
        if !self.at(RParen) {
            loop {
                if self.at(Identifier) && matches!(self.nth(1), Comma | RParen) {
                    let token = self.advance();
                    let param = self.leaf(NodeKind::ParameterDeclaration, token)?;
                    let name = self.intern(self.token_str(token));
                    self.set_attribute(
                        param,
                        Attribute::Parameter {
                            name,
                            is_final: false,
                            is_var_args: false,
                            is_receiver: false,
                        },
                    );
                    children.push(param);
                } else {
                    children.push(self.parse_formal_parameter()?);
                }
                if self.eat(Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(RParen)?;
        self.expect(Arrow)?;
        children.push(self.parse_lambda_body()?);
        self.finish_node(NodeKind::LambdaExpression, start, children)
    }

    pub(crate) fn parse_lambda_body(&mut self) -> Result<NodeId, ParseError> {
        if self.at(LBrace) {
            self.parse_block()
        } else {
            self.parse_expression()
        }
    }

    /// `new …`: object creation (with optional anonymous body) or array
    /// creation. `receiver` carries the qualifier of `outer.new Inner()`.
    pub(crate) fn parse_creation(
        &mut self,
        start: u32,
        receiver: Option<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.expect(KwNew)?;
        let mut children: Vec<NodeId> = receiver.into_iter().collect();
        if self.at(Lt) {
            children.extend(self.parse_type_arguments()?);
        }
        let ty = self.parse_type_no_dims()?;
        children.push(ty);

        if self.at(LBracket) {
            loop {
                if self.at(LBracket) && self.nth(1) == RBracket {
                    self.advance();
                    self.advance();
                    continue;
                }
                if self.at(LBracket) {
                    self.advance();
                    children.push(self.parse_expression()?);
                    self.expect(RBracket)?;
                    continue;
                }
                break;
            }
            if self.at(LBrace) {
                children.push(self.parse_array_initializer()?);
            }
            return self.finish_node(NodeKind::ArrayCreationExpression, start, children);
        }

        children.extend(self.parse_arguments()?);
        if self.at(LBrace) {
            self.parse_class_body_into(&mut children, false)?;
        }
        self.finish_node(NodeKind::ObjectCreationExpression, start, children)
    }

    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(LParen)?;
        let mut args = Vec::new();
        if !self.at(RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.eat(Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(RParen)?;
        Ok(args)
    }

    pub(crate) fn parse_array_initializer(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(LBrace)?;
        let mut values = Vec::new();
        while !self.at(RBrace) && !self.at(Eof) {
            values.push(self.parse_variable_initializer()?);
            if !self.eat(Comma) {
                break;
            }
        }
        self.expect(RBrace)?;
        self.finish_node(NodeKind::ArrayInitializer, start, values)
    }

    pub(crate) fn parse_variable_initializer(&mut self) -> Result<NodeId, ParseError> {
        if self.at(LBrace) {
            self.parse_array_initializer()
        } else {
            self.parse_expression()
        }
    }
}
