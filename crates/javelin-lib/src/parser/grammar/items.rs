//! Compilation units, type declarations, and members.

use crate::arena::{Attribute, NodeId};
use crate::error::ParseError;
use crate::parser::core::Parser;
use crate::syntax::TokenKind::*;
use crate::syntax::{NodeKind, token_sets};
use crate::version::Feature;

/// What `parse_modifiers` observed. Modifier keywords are consumed as
/// plain tokens; only annotations become nodes.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ModifierSummary {
    pub(crate) is_final: bool,
}

impl Parser<'_> {
    pub(crate) fn parse_compilation_unit(&mut self) -> Result<NodeId, ParseError> {
        let mut children = Vec::new();

        // Leading annotations may belong to a package declaration, a
        // module declaration, or the first type declaration.
        let lead_start = self.peek_start();
        let mut leading = Vec::new();
        while self.at(At) && self.nth(1) == Identifier {
            leading.push(self.parse_annotation()?);
        }

        if self.at(KwPackage) {
            children.push(
                self.parse_package_declaration(lead_start, std::mem::take(&mut leading))?,
            );
        }

        if leading.is_empty() {
            while self.at(KwImport) {
                children.push(self.parse_import_declaration()?);
            }
        }

        if self.at_module_declaration() {
            let start = if leading.is_empty() {
                self.peek_start()
            } else {
                lead_start
            };
            children.push(self.parse_module_declaration(start, std::mem::take(&mut leading))?);
        }

        loop {
            match self.current() {
                Eof => break,
                Semi => {
                    self.advance();
                }
                _ => {
                    let (start, annotations) = if leading.is_empty() {
                        (self.peek_start(), Vec::new())
                    } else {
                        (lead_start, std::mem::take(&mut leading))
                    };
                    children.push(self.parse_type_declaration_with(start, annotations)?);
                }
            }
        }
        if !leading.is_empty() {
            return Err(self.expected("type declaration"));
        }

        self.skip_comments_to_pending();
        self.finish_node_spanned(NodeKind::CompilationUnit, 0, self.source_len(), children)
    }

    fn parse_package_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.expect(KwPackage)?;
        let name = self.parse_dotted_name_text()?;
        self.expect(Semi)?;
        let id = self.finish_node(NodeKind::PackageDeclaration, start, annotations)?;
        let symbol = self.intern_owned(name);
        self.set_attribute(id, Attribute::Package { name: symbol });
        Ok(id)
    }

    fn parse_import_declaration(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(KwImport)?;
        let is_static = self.eat(KwStatic);

        let first = self.expect_identifier()?;
        let mut name = self.token_str(first).to_string();
        loop {
            if self.at(Dot) && self.nth(1) == Identifier {
                self.advance();
                let segment = self.advance();
                name.push('.');
                name.push_str(self.token_str(segment));
                continue;
            }
            if self.at(Dot) && self.nth(1) == Star {
                self.advance();
                self.advance();
                name.push_str(".*");
            }
            break;
        }
        self.expect(Semi)?;

        let id = self.finish_node(NodeKind::ImportDeclaration, start, Vec::new())?;
        let symbol = self.intern_owned(name);
        self.set_attribute(
            id,
            Attribute::Import {
                qualified_name: symbol,
                is_static,
            },
        );
        Ok(id)
    }

    // --- type declarations ---

    pub(crate) fn parse_type_declaration(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.parse_type_declaration_with(start, Vec::new())
    }

    pub(crate) fn parse_type_declaration_with(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_type_declaration_inner(start, annotations);
        self.exit_recursion();
        result
    }

    fn parse_type_declaration_inner(
        &mut self,
        start: u32,
        mut annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.parse_modifiers(&mut annotations)?;
        match self.current() {
            KwClass => self.parse_class_declaration(start, annotations),
            KwInterface => self.parse_interface_declaration(start, annotations),
            KwEnum => self.parse_enum_declaration(start, annotations),
            At if self.nth(1) == KwInterface => {
                self.parse_annotation_declaration(start, annotations)
            }
            Identifier if self.at_record_declaration() => {
                self.parse_record_declaration(start, annotations)
            }
            _ => Err(self.expected("type declaration")),
        }
    }

    /// Whether the cursor sits on a `record` declaration head. `record`
    /// stays an ordinary identifier unless the feature is enabled and the
    /// shape matches.
    pub(crate) fn at_record_declaration(&self) -> bool {
        self.feature(Feature::Records)
            && self.at_contextual("record")
            && self.nth(1) == Identifier
            && matches!(self.nth(2), LParen | Lt)
    }

    /// Consume modifier keywords and annotations. Contextual `sealed` /
    /// `non-sealed` are promoted only when another declaration token
    /// follows.
    pub(crate) fn parse_modifiers(
        &mut self,
        annotations: &mut Vec<NodeId>,
    ) -> Result<ModifierSummary, ParseError> {
        let mut summary = ModifierSummary::default();
        loop {
            let kind = self.current();
            if token_sets::MODIFIER_KEYWORDS.contains(kind) {
                if kind == KwFinal {
                    summary.is_final = true;
                }
                self.advance();
                continue;
            }
            if kind == At && self.nth(1) == Identifier {
                annotations.push(self.parse_annotation()?);
                continue;
            }
            if kind == Identifier
                && self.feature(Feature::SealedTypes)
                && (self.current_text() == "sealed" || self.current_text() == "non-sealed")
                && matches!(
                    self.nth(1),
                    KwClass
                        | KwInterface
                        | KwAbstract
                        | KwFinal
                        | KwStatic
                        | KwStrictfp
                        | KwPublic
                        | KwPrivate
                        | KwProtected
                        | At
                )
            {
                self.advance();
                continue;
            }
            break;
        }
        Ok(summary)
    }

    fn parse_class_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.advance(); // class
        let name = self.expect_identifier()?;
        let name_text = self.token_str(name);

        let mut children = annotations;
        if self.at(Lt) {
            children.extend(self.parse_type_parameters()?);
        }
        if self.eat(KwExtends) {
            children.push(self.parse_type()?);
        }
        if self.eat(KwImplements) {
            self.parse_type_list(&mut children)?;
        }
        if self.feature(Feature::SealedTypes) && self.at_contextual("permits") {
            self.advance();
            self.parse_type_list(&mut children)?;
        }
        self.parse_class_body_into(&mut children, false)?;

        let id = self.finish_node(NodeKind::ClassDeclaration, start, children)?;
        let symbol = self.intern(name_text);
        self.set_attribute(id, Attribute::TypeDeclaration { name: symbol });
        Ok(id)
    }

    fn parse_interface_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.advance(); // interface
        let name = self.expect_identifier()?;
        let name_text = self.token_str(name);

        let mut children = annotations;
        if self.at(Lt) {
            children.extend(self.parse_type_parameters()?);
        }
        if self.eat(KwExtends) {
            self.parse_type_list(&mut children)?;
        }
        if self.feature(Feature::SealedTypes) && self.at_contextual("permits") {
            self.advance();
            self.parse_type_list(&mut children)?;
        }
        self.parse_class_body_into(&mut children, false)?;

        let id = self.finish_node(NodeKind::InterfaceDeclaration, start, children)?;
        let symbol = self.intern(name_text);
        self.set_attribute(id, Attribute::TypeDeclaration { name: symbol });
        Ok(id)
    }

    fn parse_enum_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.advance(); // enum
        let name = self.expect_identifier()?;
        let name_text = self.token_str(name);

        let mut children = annotations;
        if self.eat(KwImplements) {
            self.parse_type_list(&mut children)?;
        }

        self.expect(LBrace)?;

        // Constants first, comma-separated, optionally annotated.
        while self.at(Identifier) || (self.at(At) && self.nth(1) == Identifier) {
            children.push(self.parse_enum_constant()?);
            if !self.eat(Comma) {
                break;
            }
        }
        // Optional separator, then ordinary members.
        self.eat(Semi);
        while !self.at(RBrace) && !self.at(Eof) {
            if self.eat(Semi) {
                continue;
            }
            children.push(self.parse_member(false)?);
        }
        self.expect(RBrace)?;

        let id = self.finish_node(NodeKind::EnumDeclaration, start, children)?;
        let symbol = self.intern(name_text);
        self.set_attribute(id, Attribute::TypeDeclaration { name: symbol });
        Ok(id)
    }

    fn parse_enum_constant(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut children = Vec::new();
        while self.at(At) && self.nth(1) == Identifier {
            children.push(self.parse_annotation()?);
        }
        let name = self.expect_identifier()?;
        children.push(self.leaf(NodeKind::Identifier, name)?);
        if self.at(LParen) {
            children.extend(self.parse_arguments()?);
        }
        if self.at(LBrace) {
            self.parse_class_body_into(&mut children, false)?;
        }
        self.finish_node(NodeKind::EnumConstant, start, children)
    }

    fn parse_record_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.advance(); // record (contextual)
        let name = self.expect_identifier()?;
        let name_text = self.token_str(name);

        let mut children = annotations;
        if self.at(Lt) {
            children.extend(self.parse_type_parameters()?);
        }
        children.extend(self.parse_formal_parameters()?);
        if self.eat(KwImplements) {
            self.parse_type_list(&mut children)?;
        }
        self.parse_class_body_into(&mut children, true)?;

        let id = self.finish_node(NodeKind::RecordDeclaration, start, children)?;
        let symbol = self.intern(name_text);
        self.set_attribute(id, Attribute::TypeDeclaration { name: symbol });
        Ok(id)
    }

    fn parse_annotation_declaration(
        &mut self,
        start: u32,
        annotations: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.expect(At)?;
        self.expect(KwInterface)?;
        let name = self.expect_identifier()?;
        let name_text = self.token_str(name);

        let mut children = annotations;
        self.parse_class_body_into(&mut children, false)?;

        let id = self.finish_node(NodeKind::AnnotationDeclaration, start, children)?;
        let symbol = self.intern(name_text);
        self.set_attribute(id, Attribute::TypeDeclaration { name: symbol });
        Ok(id)
    }

    // --- members ---

    /// `{ member* }`, members appended to `children`.
    pub(crate) fn parse_class_body_into(
        &mut self,
        children: &mut Vec<NodeId>,
        in_record: bool,
    ) -> Result<(), ParseError> {
        self.expect(LBrace)?;
        while !self.at(RBrace) && !self.at(Eof) {
            if self.eat(Semi) {
                continue;
            }
            children.push(self.parse_member(in_record)?);
        }
        self.expect(RBrace)?;
        Ok(())
    }

    fn parse_member(&mut self, in_record: bool) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut annotations = Vec::new();
        self.parse_modifiers(&mut annotations)?;

        match self.current() {
            // Instance or static initializer.
            LBrace if annotations.is_empty() => return self.parse_block(),
            LBrace => return Err(self.expected("member declaration")),
            KwClass | KwInterface | KwEnum => {
                return self.parse_type_declaration_with(start, annotations);
            }
            At if self.nth(1) == KwInterface => {
                return self.parse_type_declaration_with(start, annotations);
            }
            Identifier if self.at_record_declaration() => {
                return self.parse_type_declaration_with(start, annotations);
            }
            _ => {}
        }

        let mut children = annotations;
        if self.at(Lt) {
            children.extend(self.parse_type_parameters()?);
        }

        // Compact canonical constructor: `Name {` in a record body.
        if in_record && self.at(Identifier) && self.nth(1) == LBrace {
            let name = self.advance();
            children.push(self.leaf(NodeKind::Identifier, name)?);
            children.push(self.parse_block()?);
            return self.finish_node(NodeKind::ConstructorDeclaration, start, children);
        }

        // Constructor: `Name (`. A method would carry a return type here.
        if self.at(Identifier) && self.nth(1) == LParen {
            let name = self.advance();
            children.push(self.leaf(NodeKind::Identifier, name)?);
            children.extend(self.parse_formal_parameters()?);
            if self.eat(KwThrows) {
                self.parse_type_list(&mut children)?;
            }
            children.push(self.parse_block()?);
            return self.finish_node(NodeKind::ConstructorDeclaration, start, children);
        }

        // Method or field: return type, then the name decides.
        children.push(self.parse_type()?);

        if self.at(Identifier) && self.nth(1) == LParen {
            let name = self.advance();
            children.push(self.leaf(NodeKind::Identifier, name)?);
            children.extend(self.parse_formal_parameters()?);
            // C-style dims after the parameter list apply to the return
            // type; tokens only.
            while self.at(LBracket) && self.nth(1) == RBracket {
                self.advance();
                self.advance();
            }
            if self.eat(KwThrows) {
                self.parse_type_list(&mut children)?;
            }
            if self.eat(KwDefault) {
                // Annotation member default value.
                children.push(self.parse_annotation_value()?);
                self.expect(Semi)?;
            } else if self.at(LBrace) {
                children.push(self.parse_block()?);
            } else {
                self.expect(Semi)?;
            }
            return self.finish_node(NodeKind::MethodDeclaration, start, children);
        }

        loop {
            children.push(self.parse_variable_declarator()?);
            if self.eat(Comma) {
                continue;
            }
            break;
        }
        self.expect(Semi)?;
        self.finish_node(NodeKind::FieldDeclaration, start, children)
    }

    // --- parameters, type parameters, shared lists ---

    pub(crate) fn parse_formal_parameters(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(LParen)?;
        let mut params = Vec::new();
        if !self.at(RParen) {
            loop {
                params.push(self.parse_formal_parameter()?);
                if self.eat(Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(RParen)?;
        Ok(params)
    }

    pub(crate) fn parse_formal_parameter(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        let mut children = Vec::new();
        let modifiers = self.parse_modifiers(&mut children)?;

        children.push(self.parse_type()?);

        let mut is_var_args = false;
        while self.at(At) && self.nth(1) == Identifier {
            // Type-use annotation on the varargs ellipsis.
            children.push(self.parse_annotation()?);
        }
        if self.eat(Ellipsis) {
            is_var_args = true;
        }

        let mut is_receiver = false;
        let name_text;
        if self.at(KwThis) {
            self.advance();
            is_receiver = true;
            name_text = "this".to_string();
        } else if self.at(Identifier) && self.nth(1) == Dot && self.nth(2) == KwThis {
            // Qualified receiver: Outer.this
            self.advance();
            self.advance();
            self.advance();
            is_receiver = true;
            name_text = "this".to_string();
        } else {
            let name = self.expect_identifier()?;
            name_text = self.token_str(name).to_string();
            while self.at(LBracket) && self.nth(1) == RBracket {
                self.advance();
                self.advance();
            }
        }

        let id = self.finish_node(NodeKind::ParameterDeclaration, start, children)?;
        let symbol = self.intern_owned(name_text);
        self.set_attribute(
            id,
            Attribute::Parameter {
                name: symbol,
                is_final: modifiers.is_final,
                is_var_args,
                is_receiver,
            },
        );
        Ok(id)
    }

    pub(crate) fn parse_type_parameters(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(Lt)?;
        let mut params = Vec::new();
        loop {
            let start = self.peek_start();
            let mut children = Vec::new();
            while self.at(At) && self.nth(1) == Identifier {
                children.push(self.parse_annotation()?);
            }
            let name = self.expect_identifier()?;
            children.push(self.leaf(NodeKind::Identifier, name)?);
            if self.eat(KwExtends) {
                children.push(self.parse_type()?);
                while self.eat(Amp) {
                    children.push(self.parse_type()?);
                }
            }
            params.push(self.finish_node(NodeKind::TypeParameter, start, children)?);
            if self.eat(Comma) {
                continue;
            }
            break;
        }
        self.eat_type_close()?;
        Ok(params)
    }

    pub(crate) fn parse_type_list(&mut self, children: &mut Vec<NodeId>) -> Result<(), ParseError> {
        loop {
            children.push(self.parse_type()?);
            if self.eat(Comma) {
                continue;
            }
            break;
        }
        Ok(())
    }

    // --- annotations ---

    pub(crate) fn parse_annotation(&mut self) -> Result<NodeId, ParseError> {
        self.enter_recursion()?;
        let result = self.parse_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_annotation_impl(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek_start();
        self.expect(At)?;
        let name = self.parse_qualified_name_node()?;
        let mut children = vec![name];

        if self.at(LParen) {
            self.advance();
            if !self.at(RParen) {
                if self.at(Identifier) && self.nth(1) == Assign {
                    loop {
                        let pair_start = self.peek_start();
                        let key = self.expect_identifier()?;
                        let key_node = self.leaf(NodeKind::Identifier, key)?;
                        self.expect(Assign)?;
                        let value = self.parse_annotation_value()?;
                        children.push(self.finish_node(
                            NodeKind::MemberValuePair,
                            pair_start,
                            vec![key_node, value],
                        )?);
                        if self.eat(Comma) {
                            continue;
                        }
                        break;
                    }
                } else {
                    children.push(self.parse_annotation_value()?);
                }
            }
            self.expect(RParen)?;
        }

        self.finish_node(NodeKind::Annotation, start, children)
    }

    /// An element value: nested annotation, value array, or expression.
    pub(crate) fn parse_annotation_value(&mut self) -> Result<NodeId, ParseError> {
        if self.at(At) {
            return self.parse_annotation();
        }
        if self.at(LBrace) {
            let start = self.peek_start();
            self.advance();
            let mut values = Vec::new();
            while !self.at(RBrace) && !self.at(Eof) {
                values.push(self.parse_annotation_value()?);
                if !self.eat(Comma) {
                    break;
                }
            }
            self.expect(RBrace)?;
            return self.finish_node(NodeKind::ArrayInitializer, start, values);
        }
        self.parse_expression()
    }
}
