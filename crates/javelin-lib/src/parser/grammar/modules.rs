//! Module declarations and directives.
//!
//! All module vocabulary (`module`, `open`, `requires`, `transitive`,
//! `exports`, `opens`, `to`, `uses`, `provides`, `with`) is contextual:
//! the lexer hands these over as identifiers and promotion happens here.

use crate::arena::NodeId;
use crate::error::ParseError;
use crate::parser::core::Parser;
use crate::syntax::NodeKind;
use crate::syntax::TokenKind::*;
use crate::version::Feature;

impl Parser<'_> {
    /// Whether the cursor sits on a module declaration head.
    pub(crate) fn at_module_declaration(&self) -> bool {
        if self.at_contextual("open")
            && self.nth_is_contextual(1, "module")
            && self.nth(2) == Identifier
        {
            return true;
        }
        self.at_contextual("module")
            && self.nth(1) == Identifier
            && matches!(self.nth(2), LBrace | Dot | Semi)
    }

    /// `[open] module a.b.c { directive* }`. A missing or unclosed body
    /// fails: the braces are not optional.
    pub(crate) fn parse_module_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.check_feature(Feature::Modules, "Module declarations")?;
        if self.at_contextual("open") {
            self.advance();
        }
        self.expect_contextual("module")?;

        let mut children = annotations;
        children.push(self.parse_qualified_name_node()?);

        self.expect(LBrace)?;
        while !self.at(RBrace) && !self.at(Eof) {
            children.push(self.parse_module_directive()?);
        }
        self.expect(RBrace)?;
        self.finish_node(NodeKind::ModuleDeclaration, start, children)
    }

    fn parse_module_directive(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();

        if self.at_contextual("requires") {
            self.advance();
            // `transitive` is itself contextual: `requires transitive;`
            // requires a module named transitive.
            if self.at_contextual("transitive") && !matches!(self.nth(1), Semi | Dot) {
                self.advance();
            } else if self.at(KwStatic) {
                self.advance();
            }
            let name = self.parse_qualified_name_node()?;
            self.expect(Semi)?;
            return self.finish_node(NodeKind::RequiresDirective, start, vec![name]);
        }

        if self.at_contextual("exports") || self.at_contextual("opens") {
            let kind = if self.current_text() == "exports" {
                NodeKind::ExportsDirective
            } else {
                NodeKind::OpensDirective
            };
            self.advance();
            let mut children = vec![self.parse_qualified_name_node()?];
            if self.at_contextual("to") {
                self.advance();
                loop {
                    children.push(self.parse_qualified_name_node()?);
                    if self.eat(Comma) {
                        continue;
                    }
                    break;
                }
            }
            self.expect(Semi)?;
            return self.finish_node(kind, start, children);
        }

        if self.at_contextual("uses") {
            self.advance();
            let name = self.parse_qualified_name_node()?;
            self.expect(Semi)?;
            return self.finish_node(NodeKind::UsesDirective, start, vec![name]);
        }

        if self.at_contextual("provides") {
            self.advance();
            let mut children = vec![self.parse_qualified_name_node()?];
            self.expect_contextual("with")?;
            loop {
                children.push(self.parse_qualified_name_node()?);
                if self.eat(Comma) {
                    continue;
                }
                break;
            }
            self.expect(Semi)?;
            return self.finish_node(NodeKind::ProvidesDirective, start, children);
        }

        Err(self.expected("module directive"))
    }
}
