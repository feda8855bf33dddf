//! Non-allocating speculation scans.
//!
//! Each scan saves the cursor (and pending-comment queue), walks tokens to
//! classify an ambiguous construct, and restores. Nothing here allocates
//! nodes. The scans may over-accept: a wrong hypothesis surfaces as a
//! parse error during the real production, never as a retry.

use crate::parser::core::Parser;
use crate::syntax::TokenKind::*;
use crate::syntax::token_sets;

/// Classification of a `(` in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParenShape {
    Lambda,
    Cast,
    Expr,
}

impl Parser<'_> {
    /// Skip a run of annotations: `@Name(...)`*.
    pub(crate) fn skip_annotations(&mut self) {
        while self.at(At) && self.nth(1) == Identifier {
            self.advance(); // @
            self.advance(); // first name segment
            while self.at(Dot) && self.nth(1) == Identifier {
                self.advance();
                self.advance();
            }
            if self.at(LParen) {
                self.skip_balanced(LParen, RParen);
            }
        }
    }

    /// Skip past a balanced delimiter pair; cursor starts at the opener.
    pub(crate) fn skip_balanced(&mut self, open: crate::syntax::TokenKind, close: crate::syntax::TokenKind) -> bool {
        let mut depth = 0usize;
        while !self.at(Eof) {
            let kind = self.current();
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
        }
        false
    }

    /// Skip a type: annotations, primitive or qualified name, type
    /// arguments, nested `.Name` tails, and `[]` dims. Leaves the cursor
    /// after the type on success.
    pub(crate) fn skip_type(&mut self) -> bool {
        self.skip_annotations();

        if self.at_set(token_sets::PRIMITIVE_TYPES) {
            self.advance();
        } else if self.at(Identifier) {
            self.advance();
            loop {
                if self.at(Lt) {
                    if !self.skip_generic_args() {
                        return false;
                    }
                    continue;
                }
                if self.at(Dot) && self.nth(1) == Identifier {
                    self.advance();
                    self.advance();
                    continue;
                }
                if self.at(Dot) && self.nth(1) == At {
                    self.advance();
                    self.skip_annotations();
                    if self.at(Identifier) {
                        self.advance();
                        continue;
                    }
                    return false;
                }
                break;
            }
        } else {
            return false;
        }

        // Array dims, possibly annotated.
        loop {
            if self.at(LBracket) && self.nth(1) == RBracket {
                self.advance();
                self.advance();
                continue;
            }
            if self.at(At) && self.nth(1) == Identifier {
                let snap = self.save();
                self.skip_annotations();
                if self.at(LBracket) && self.nth(1) == RBracket {
                    self.advance();
                    self.advance();
                    continue;
                }
                self.restore(snap);
            }
            break;
        }
        true
    }

    /// Balanced `<...>` scan implementing the generics-vs-less-than rule.
    /// Cursor starts at `<`; compound `>` tokens close several levels at
    /// once. Returns false when the scan hits a token that cannot appear
    /// inside type arguments.
    pub(crate) fn skip_generic_args(&mut self) -> bool {
        let mut depth: i32 = 0;
        loop {
            match self.current() {
                Lt => {
                    depth += 1;
                    self.advance();
                }
                Gt => {
                    depth -= 1;
                    self.advance();
                    if depth <= 0 {
                        return depth == 0;
                    }
                }
                Shr => {
                    depth -= 2;
                    self.advance();
                    if depth <= 0 {
                        return depth == 0;
                    }
                }
                UShr => {
                    depth -= 3;
                    self.advance();
                    if depth <= 0 {
                        return depth == 0;
                    }
                }
                Ge => {
                    depth -= 1;
                    self.advance();
                    return depth == 0;
                }
                ShrAssign => {
                    depth -= 2;
                    self.advance();
                    return depth == 0;
                }
                UShrAssign => {
                    depth -= 3;
                    self.advance();
                    return depth == 0;
                }
                At if self.nth(1) == Identifier => self.skip_annotations(),
                Identifier | Dot | Comma | Question | KwExtends | KwSuper | LBracket | RBracket => {
                    self.advance();
                }
                k if token_sets::PRIMITIVE_TYPES.contains(k) => {
                    self.advance();
                }
                _ => return false,
            }
        }
    }

    /// Classify a `(` in expression position before committing to a
    /// production: typed/untyped lambda, cast, or parenthesized
    /// expression.
    pub(crate) fn classify_paren(&mut self) -> ParenShape {
        // `()` can only begin a lambda.
        if self.nth(1) == RParen {
            return if self.nth(2) == Arrow {
                ParenShape::Lambda
            } else {
                ParenShape::Expr
            };
        }

        let snap = self.save();
        self.advance(); // (
        let typed = self.scan_typed_lambda_params();
        self.restore(snap);
        if typed {
            return ParenShape::Lambda;
        }

        let snap = self.save();
        self.advance();
        let untyped = self.scan_untyped_lambda_params();
        self.restore(snap);
        if untyped {
            return ParenShape::Lambda;
        }

        let snap = self.save();
        self.advance();
        let cast = self.scan_cast();
        self.restore(snap);
        if cast {
            return ParenShape::Cast;
        }

        ParenShape::Expr
    }

    /// `final? @A* Type name` then `,`, or `)` followed by `->`.
    fn scan_typed_lambda_params(&mut self) -> bool {
        if self.at(KwFinal) {
            self.advance();
        }
        self.skip_annotations();
        if !self.skip_type() || !self.at(Identifier) {
            return false;
        }
        self.advance();
        if self.at(Comma) {
            return true;
        }
        if self.at(RParen) {
            self.advance();
            return self.at(Arrow);
        }
        false
    }

    /// `name (, name)* )` followed by `->`.
    fn scan_untyped_lambda_params(&mut self) -> bool {
        if !self.at(Identifier) {
            return false;
        }
        self.advance();
        while self.at(Comma) && self.nth(1) == Identifier {
            self.advance();
            self.advance();
        }
        if !self.at(RParen) {
            return false;
        }
        self.advance();
        self.at(Arrow)
    }

    /// `Type)` followed by a primary-starting token. `+`/`-` confirm a
    /// cast only for primitive insides: after a parenthesized *name* they
    /// stay binary operators.
    fn scan_cast(&mut self) -> bool {
        self.skip_annotations();
        let primitive = self.at_set(token_sets::PRIMITIVE_TYPES);
        if !self.skip_type() {
            return false;
        }
        // Intersection cast: (A & B) r
        while self.at(Amp) {
            self.advance();
            self.skip_annotations();
            if !self.skip_type() {
                return false;
            }
        }
        if !self.at(RParen) {
            return false;
        }
        self.advance();
        let next = self.current();
        token_sets::CAST_FOLLOW.contains(next) || (primitive && matches!(next, Plus | Minus))
    }

    /// Whether statement position holds a local variable declaration
    /// rather than an expression.
    pub(crate) fn looks_like_local_var_decl(&mut self) -> bool {
        if self.at(KwFinal) || (self.at(At) && self.nth(1) == Identifier) {
            return true;
        }
        let snap = self.save();
        let ok = self.skip_type() && self.at(Identifier);
        self.restore(snap);
        ok
    }

    /// Whether a `for (` header is the enhanced form
    /// `(final? @A* Type name : …)`.
    pub(crate) fn looks_like_enhanced_for(&mut self) -> bool {
        let snap = self.save();
        loop {
            if self.at(KwFinal) {
                self.advance();
                continue;
            }
            if self.at(At) && self.nth(1) == Identifier {
                self.skip_annotations();
                continue;
            }
            break;
        }
        let mut ok = false;
        if self.skip_type() && self.at(Identifier) {
            self.advance();
            ok = self.at(Colon);
        }
        self.restore(snap);
        ok
    }

    /// Whether a `case` label is a type pattern (`Type binding`).
    pub(crate) fn looks_like_type_pattern(&mut self) -> bool {
        let snap = self.save();
        if self.at(KwFinal) {
            self.advance();
        }
        let mut ok = false;
        if self.skip_type() && self.at(Identifier) {
            self.advance();
            ok = matches!(self.current(), Arrow | Colon | Comma);
        }
        self.restore(snap);
        ok
    }

    /// Whether a primary beginning with a name or primitive keyword is a
    /// type qualifier: `Name<T>::ref`, `Name[]::new`, or `Name.class`.
    pub(crate) fn looks_like_type_qualifier(&mut self) -> bool {
        let snap = self.save();
        let ok = self.skip_type()
            && (self.at(ColonColon) || (self.at(Dot) && self.nth(1) == KwClass));
        self.restore(snap);
        ok
    }
}
