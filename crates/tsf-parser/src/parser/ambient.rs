//! Ambient declarations and the `.d.ts` root production.
//!
//! Inside ambient declarations nothing carries a body: functions and
//! constructors expose only their call signatures, classes list body-less
//! members, and modules nest further ambient declarations. A `.d.ts` file
//! accepts only exports, imports, interfaces and ambient forms at the top
//! level.

use super::{ParseError, ParseResult, Parser};
use crate::ast::{NodeId, NodeKind};
use crate::scope::SymbolType;
use tsf_common::SourcePosition;
use tsf_scanner::TokenKind;

impl<'a> Parser<'a> {
    // DeclarationModule: the root production for `.d.ts` files.
    pub(crate) fn parse_declaration_module(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let scope = self.global_scope();
        let mut statements = Vec::new();
        while !self.cur.is(TokenKind::Eof) {
            let before = self.cur.pos.start_offset;
            let mut export_pos = None;
            if self.cur.is(TokenKind::Export) {
                export_pos = Some(self.cur.pos);
                self.next();
                if self.consume_if(TokenKind::Assign) {
                    // export = Expression
                    let result = self.parse_assignment_expression();
                    match self.skip_token_or(result, &[TokenKind::LineTerminator]) {
                        Ok(Some(clause)) => {
                            let node = self.node(
                                NodeKind::Export {
                                    default: true,
                                    clause: Some(clause),
                                    from: None,
                                },
                                export_pos.expect("export position recorded"),
                            );
                            statements.push(node);
                        }
                        Ok(None) => {}
                        Err(ParseError::Fatal) => break,
                        Err(ParseError::Failed) => {}
                    }
                    if self.is_line_termination() {
                        self.consume_line_terminator();
                    }
                    continue;
                }
            }

            let result = match self.cur.kind {
                TokenKind::Interface => self.parse_interface_declaration(),
                TokenKind::Import => self.parse_import_declaration(),
                _ => self.parse_ambient_declaration(true),
            };
            match self.skip_token_or(result, &[TokenKind::LineTerminator]) {
                Ok(Some(decl)) => {
                    if self.is_line_termination() {
                        self.consume_line_terminator();
                    }
                    let item = if let Some(pos) = export_pos {
                        self.node(
                            NodeKind::Export {
                                default: false,
                                clause: Some(decl),
                                from: None,
                            },
                            pos,
                        )
                    } else {
                        decl
                    };
                    statements.push(item);
                }
                Ok(None) => {}
                Err(ParseError::Fatal) => break,
                Err(ParseError::Failed) => {}
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            }
            if self.cur.pos.start_offset == before && !self.cur.is(TokenKind::Eof) {
                self.next();
            }
        }
        Ok(self.node(NodeKind::FileScope { scope, statements }, start))
    }

    // AmbientDeclaration: 'declare' (var | function | class | enum | module)
    pub(crate) fn parse_ambient_declaration(&mut self, module_allowed: bool) -> ParseResult {
        let declare_atom = self.ctx_atoms.declare;
        let module_atom = self.ctx_atoms.module;
        if !self.is_contextual(&self.cur.clone(), declare_atom) {
            return Err(self.err_cur("'declare' expected"));
        }
        let start = self.cur.pos;
        self.next();
        match self.cur.kind {
            TokenKind::Var => self.parse_ambient_variable_declaration(start),
            TokenKind::Function => self.parse_ambient_function_declaration(start),
            TokenKind::Class => self.parse_ambient_class_declaration(start),
            TokenKind::Enum => self.parse_ambient_enum_declaration(start),
            _ => {
                if self.is_contextual(&self.cur.clone(), module_atom)
                    || self.cur.is(TokenKind::Module)
                {
                    if !module_allowed {
                        let err = self.err_cur("ambient module declaration not allowed here");
                        self.skip_tokens_until(&[TokenKind::RightBrace], true);
                        return Err(err);
                    }
                    return self.parse_ambient_module_declaration(start);
                }
                Err(self.unexpected_token())
            }
        }
    }

    fn parse_ambient_variable_declaration(
        &mut self,
        start: SourcePosition,
    ) -> ParseResult {
        self.next(); // var
        let name = self.parse_binding_identifier()?;
        let type_expr = if self.consume_if(TokenKind::Colon) {
            Some(self.parse_type_expression()?)
        } else {
            None
        };
        let node = self.node(NodeKind::AmbientVariable { name, type_expr }, start);
        self.declare_binding(name, SymbolType::VariableName, node);
        Ok(node)
    }

    fn parse_ambient_function_declaration(
        &mut self,
        start: SourcePosition,
    ) -> ParseResult {
        self.next(); // function
        let name = self.parse_binding_identifier()?;
        let generator = self.consume_if(TokenKind::Mul);
        let call_sig = self.parse_call_signature(false, false)?;
        let node = self.node(
            NodeKind::AmbientFunction {
                generator,
                name,
                call_sig,
            },
            start,
        );
        self.declare_binding(name, SymbolType::VariableName, node);
        Ok(node)
    }

    fn parse_ambient_class_declaration(
        &mut self,
        start: SourcePosition,
    ) -> ParseResult {
        self.next(); // class
        let name = self.parse_identifier()?;
        let type_params = if self.cur.is(TokenKind::Less) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let bases = self.parse_ambient_class_bases()?;
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        let body = self.parse_ambient_class_body()?;
        let node = self.node(
            NodeKind::AmbientClass {
                name,
                type_params,
                bases,
                body,
            },
            start,
        );
        if let Some(atom) = self.arena.name_atom(name) {
            self.declare(atom, SymbolType::ClassName, node);
        }
        Ok(node)
    }

    fn parse_ambient_class_bases(&mut self) -> Result<Option<NodeId>, ParseError> {
        let start = self.cur.pos;
        let mut base = None;
        let mut impls = None;
        loop {
            match self.cur.kind {
                TokenKind::Extends => {
                    let heritage_start = self.cur.pos;
                    self.next();
                    let base_type = self.parse_referenced_type()?;
                    base = Some(self.node(
                        NodeKind::ClassHeritage { base: base_type },
                        heritage_start,
                    ));
                }
                TokenKind::Implements => {
                    let impls_start = self.cur.pos;
                    self.next();
                    let mut interfaces = vec![self.parse_referenced_type()?];
                    while self.consume_if(TokenKind::Comma) {
                        interfaces.push(self.parse_referenced_type()?);
                    }
                    impls = Some(self.node(NodeKind::ClassImpls { impls: interfaces }, impls_start));
                }
                _ => break,
            }
        }
        if base.is_none() && impls.is_none() {
            return Ok(None);
        }
        Ok(Some(self.node(NodeKind::ClassBases { base, impls }, start)))
    }

    fn parse_ambient_class_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_brace_found();
        self.next(); // {
        let mut fields = Vec::new();
        loop {
            if self.cur.is(TokenKind::RightBrace) {
                self.balancer.close_brace_found();
                self.next();
                return Ok(self.node(NodeKind::AmbientClassFields { fields }, start));
            }
            self.check_eof()?;
            let before = self.cur.pos.start_offset;
            let result = self.parse_ambient_class_element();
            if let Some(member) =
                self.skip_token_or(result, &[TokenKind::LineTerminator, TokenKind::RightBrace])?
            {
                fields.push(member);
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else if !self.cur.is(TokenKind::RightBrace) && !self.prev.is(TokenKind::RightBrace)
            {
                self.reporter.syntax_error(self.prev.pos, "';' expected");
            }
            if self.cur.pos.start_offset == before && !self.cur.is(TokenKind::RightBrace) {
                self.next();
            }
        }
    }

    fn parse_ambient_class_element(&mut self) -> ParseResult {
        if self.cur.is(TokenKind::LeftBracket) {
            return self.parse_index_signature();
        }
        let start = self.cur.pos;
        let mods = self.parse_field_modifiers()?;
        let accessor = self.parse_accessor();
        if self.cur.kind.is_keyword() {
            self.cur.kind = TokenKind::Identifier;
        }
        if self.cur.is(TokenKind::Identifier) {
            let constructor = self.ctx_atoms.constructor;
            if self.is_contextual(&self.cur.clone(), constructor) {
                self.next();
                let call_sig = self.parse_call_signature(true, false)?;
                return Ok(self.node(
                    NodeKind::AmbientConstructor {
                        modifiers: mods,
                        call_sig,
                    },
                    start,
                ));
            }
            let cp = self.checkpoint();
            self.next();
            let member_function = self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]);
            self.restore(&cp);
            if member_function {
                let name = self.parse_identifier()?;
                let call_sig = self.parse_call_signature(true, false)?;
                return Ok(self.node(
                    NodeKind::AmbientMemberFunction {
                        getter: accessor.getter,
                        setter: accessor.setter,
                        generator: false,
                        modifiers: mods,
                        name,
                        call_sig,
                    },
                    start,
                ));
            }
            let name = self.parse_identifier()?;
            let type_expr = if self.consume_if(TokenKind::Colon) {
                Some(self.parse_type_expression()?)
            } else {
                None
            };
            return Ok(self.node(
                NodeKind::AmbientMemberVariable {
                    modifiers: mods,
                    name,
                    type_expr,
                },
                start,
            ));
        }
        if self.consume_if(TokenKind::Mul) {
            let name = self.parse_identifier()?;
            let call_sig = self.parse_call_signature(true, false)?;
            return Ok(self.node(
                NodeKind::AmbientMemberFunction {
                    getter: false,
                    setter: false,
                    generator: true,
                    modifiers: mods,
                    name,
                    call_sig,
                },
                start,
            ));
        }
        Err(self.unexpected_token())
    }

    fn parse_ambient_enum_declaration(
        &mut self,
        start: SourcePosition,
    ) -> ParseResult {
        self.next(); // enum
        let name = self.parse_identifier()?;
        let body = self.parse_ambient_enum_body()?;
        let node = self.node(NodeKind::AmbientEnum { name, body }, start);
        if let Some(atom) = self.arena.name_atom(name) {
            self.declare(atom, SymbolType::ClassName, node);
        }
        Ok(node)
    }

    fn parse_ambient_enum_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_brace_found();
        self.expect(TokenKind::LeftBrace)?;
        let mut fields = Vec::new();
        if self.cur.is(TokenKind::RightBrace) {
            self.balancer.close_brace_found();
            self.next();
            return Ok(self.node(NodeKind::AmbientEnumBody { fields }, start));
        }
        loop {
            self.check_eof()?;
            let field_start = self.cur.pos;
            let name = self.parse_property_name()?;
            let value = if self.consume_if(TokenKind::Assign) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            fields.push(self.node(NodeKind::AmbientEnumField { name, value }, field_start));
            if self.consume_if(TokenKind::Comma) {
                if self.cur.is(TokenKind::RightBrace) {
                    self.balancer.close_brace_found();
                    self.next();
                    break;
                }
                continue;
            }
            if self.cur.is(TokenKind::RightBrace) {
                self.balancer.close_brace_found();
                self.next();
                break;
            }
            return Err(self.err_cur("',' or '}' expected"));
        }
        Ok(self.node(NodeKind::AmbientEnumBody { fields }, start))
    }

    // AmbientModuleDeclaration:
    //   module StringLiteral { ... }   (external)
    //   module Identifier { ... }      (internal)
    fn parse_ambient_module_declaration(
        &mut self,
        start: SourcePosition,
    ) -> ParseResult {
        self.next(); // module
        let external = self.cur.is(TokenKind::StringLiteral);
        let name = if external {
            self.parse_string_literal()?
        } else {
            self.parse_identifier()?
        };
        let body = self.parse_ambient_module_body(external)?;
        let node = self.node(
            NodeKind::AmbientModule {
                external,
                name,
                body,
            },
            start,
        );
        if let Some(atom) = self.arena.name_atom(name) {
            self.declare(atom, SymbolType::VariableName, node);
        }
        Ok(node)
    }

    fn parse_ambient_module_body(&mut self, external: bool) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        self.push_scope();
        self.balancer.open_brace_found();
        self.next();
        let mut statements = Vec::new();
        loop {
            if self.cur.is(TokenKind::RightBrace) {
                self.balancer.close_brace_found();
                self.next();
                break;
            }
            if self.cur.is(TokenKind::Eof) {
                self.pop_scope();
                return Err(self.unexpected_end_of_input());
            }
            let before = self.cur.pos.start_offset;
            let result = self.parse_ambient_module_element(external);
            match self.skip_token_or(result, &[TokenKind::LineTerminator, TokenKind::RightBrace])
            {
                Ok(Some(item)) => statements.push(item),
                Ok(None) => {}
                Err(fatal) => {
                    self.pop_scope();
                    return Err(fatal);
                }
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            }
            if self.cur.pos.start_offset == before && !self.cur.is(TokenKind::RightBrace) {
                self.next();
            }
        }
        self.pop_scope();
        Ok(self.node(NodeKind::AmbientModuleBody { statements }, start))
    }

    // Elements of an ambient module: the `declare` keyword is implied, and
    // `export =` is only allowed inside external modules.
    fn parse_ambient_module_element(&mut self, external: bool) -> ParseResult {
        let start = self.cur.pos;
        let mut exported = false;
        if self.cur.is(TokenKind::Export) {
            exported = true;
            self.next();
            if self.cur.is(TokenKind::Assign) {
                if !external {
                    return Err(self.err_cur("export assignment is not allowed here"));
                }
                self.next();
                let clause = self.parse_assignment_expression()?;
                return Ok(self.node(
                    NodeKind::Export {
                        default: true,
                        clause: Some(clause),
                        from: None,
                    },
                    start,
                ));
            }
        }

        let module_atom = self.ctx_atoms.module;
        let declare_atom = self.ctx_atoms.declare;
        let element_start = self.cur.pos;
        let element = match self.cur.kind {
            TokenKind::Var => self.parse_ambient_variable_declaration(element_start)?,
            TokenKind::Function => self.parse_ambient_function_declaration(element_start)?,
            TokenKind::Class => self.parse_ambient_class_declaration(element_start)?,
            TokenKind::Enum => self.parse_ambient_enum_declaration(element_start)?,
            TokenKind::Interface => self.parse_interface_declaration()?,
            TokenKind::Import => self.parse_import_declaration()?,
            _ => {
                if self.is_contextual(&self.cur.clone(), module_atom)
                    || self.cur.is(TokenKind::Module)
                {
                    self.parse_ambient_module_declaration(element_start)?
                } else if self.is_contextual(&self.cur.clone(), declare_atom) {
                    let err = self.err_cur("'declare' is implied inside ambient modules");
                    return Err(err);
                } else {
                    return Err(self.unexpected_token());
                }
            }
        };
        if exported {
            return Ok(self.node(
                NodeKind::Export {
                    default: false,
                    clause: Some(element),
                    from: None,
                },
                start,
            ));
        }
        Ok(element)
    }
}
