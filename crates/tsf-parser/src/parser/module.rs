//! Module-level grammar: the file root loop, import/export declarations,
//! internal modules and the ES6 `module x from "..."` shorthand.
//!
//! Every relative module specifier found in a from-clause or a
//! `require("...")` reference is reported through the driver's module-found
//! hook so the compilation can fan out to the referenced files.

use super::{ParseError, ParseResult, Parser};
use crate::ast::{NodeId, NodeKind};
use crate::scope::SymbolType;
use tsf_scanner::TokenKind;

impl<'a> Parser<'a> {
    // Module: the root production for `.ts` files.
    pub(crate) fn parse_module(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let scope = self.global_scope();
        let mut statements = Vec::new();
        while !self.cur.is(TokenKind::Eof) {
            let before = self.cur.pos.start_offset;
            let module_atom = self.ctx_atoms.module;
            let declare_atom = self.ctx_atoms.declare;
            let result = if self.cur.is(TokenKind::Import) {
                self.parse_import_declaration()
            } else if self.cur.is(TokenKind::Export) {
                self.parse_export_declaration()
            } else if self.is_contextual(&self.cur.clone(), module_atom)
                || self.cur.is(TokenKind::Module)
            {
                self.parse_module_statement()
            } else if self.is_contextual(&self.cur.clone(), declare_atom) {
                self.parse_ambient_declaration(true)
            } else {
                self.parse_statement_list_item()
            };
            match self.skip_token_or(result, &[TokenKind::LineTerminator]) {
                Ok(Some(item)) => statements.push(item),
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

    /// A `module` head: either the ES6 `module x from "..."` shorthand or
    /// an internal module declaration `module A.B { ... }`. In ES6 module
    /// mode the shorthand is preferred; the internal form is used whenever
    /// a `{` follows the module name.
    pub(crate) fn parse_module_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // module
        let cp = self.checkpoint();
        let mut binding = self.parse_binding_identifier()?;
        let mut member = false;
        if self.cur.is(TokenKind::Dot) {
            // Dotted internal module name.
            self.restore(&cp);
            binding = self.parse_member_expression()?;
            member = true;
        }
        if self.cur.is(TokenKind::LeftBrace) {
            let body = self.parse_internal_module_body()?;
            let node = self.node(
                NodeKind::ModuleDecl {
                    name: binding,
                    body,
                },
                start,
            );
            return Ok(node);
        }
        if member {
            return Err(self.unexpected_token());
        }
        let from = self.parse_from_clause()?;
        let node = self.node(NodeKind::ModuleImport { binding, from }, start);
        self.declare_binding(binding, SymbolType::VariableName, node);
        Ok(node)
    }

    // Internal module body: statements plus exported declarations.
    fn parse_internal_module_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let scope = self.push_scope();
        self.balancer.open_brace_found();
        self.next(); // {
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
            let result = self.parse_internal_module_element();
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
        Ok(self.node(NodeKind::Block { scope, statements }, start))
    }

    fn parse_internal_module_element(&mut self) -> ParseResult {
        let module_atom = self.ctx_atoms.module;
        let declare_atom = self.ctx_atoms.declare;
        if self.cur.is(TokenKind::Export) {
            let start = self.cur.pos;
            self.next();
            let clause = match self.cur.kind {
                TokenKind::Var => self.parse_variable_statement()?,
                TokenKind::Function
                | TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Enum
                | TokenKind::Let
                | TokenKind::Const => self.parse_declaration(true)?,
                TokenKind::Import => self.parse_import_declaration()?,
                _ => {
                    if self.is_contextual(&self.cur.clone(), module_atom) {
                        self.parse_module_statement()?
                    } else if self.is_contextual(&self.cur.clone(), declare_atom) {
                        self.parse_ambient_declaration(false)?
                    } else {
                        return Err(self.unexpected_token());
                    }
                }
            };
            return Ok(self.node(
                NodeKind::Export {
                    default: false,
                    clause: Some(clause),
                    from: None,
                },
                start,
            ));
        }
        if self.is_contextual(&self.cur.clone(), module_atom) || self.cur.is(TokenKind::Module) {
            return self.parse_module_statement();
        }
        if self.is_contextual(&self.cur.clone(), declare_atom) {
            return self.parse_ambient_declaration(false);
        }
        self.parse_statement_list_item()
    }

    // ImportDeclaration:
    //   import ImportClause FromClause
    //   import ImportClause = ExternalModuleReference
    //   import ModuleSpecifier
    pub(crate) fn parse_import_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::Import) {
            return Err(self.err_cur("'import' expected"));
        }
        self.next();
        if self.cur.one_of(&[TokenKind::Identifier, TokenKind::LeftBrace]) {
            let clause = self.parse_import_clause()?;
            if self.consume_if(TokenKind::Assign) {
                let reference = self.parse_external_module_reference()?;
                let node = self.node(
                    NodeKind::Import {
                        clause: Some(clause),
                        from: reference,
                    },
                    start,
                );
                self.declare_import_bindings(clause, node);
                return Ok(node);
            }
            let from = self.parse_from_clause()?;
            let node = self.node(
                NodeKind::Import {
                    clause: Some(clause),
                    from,
                },
                start,
            );
            self.declare_import_bindings(clause, node);
            return Ok(node);
        }
        if self.cur.is(TokenKind::StringLiteral) {
            // Side-effect import.
            let specifier = self.parse_string_literal()?;
            self.notify_module_specifier(specifier);
            return Ok(self.node(
                NodeKind::Import {
                    clause: None,
                    from: specifier,
                },
                start,
            ));
        }
        Err(self.err_cur("identifier or '{' or string literal expected"))
    }

    fn declare_import_bindings(&mut self, clause: NodeId, decl: NodeId) {
        for child in self.arena.children(clause) {
            match self.arena.kind(child) {
                NodeKind::Name { name } => {
                    let name = *name;
                    self.declare(name, SymbolType::VariableName, decl);
                }
                // `a as b` binds `b`.
                NodeKind::NamedImport { binding, .. } => {
                    let binding = *binding;
                    if let Some(atom) = self.arena.name_atom(binding) {
                        self.declare(atom, SymbolType::VariableName, decl);
                    }
                }
                NodeKind::NamedImportList { .. } => {
                    self.declare_import_bindings(child, decl);
                }
                _ => {}
            }
        }
    }

    // ExternalModuleReference: require ( StringLiteral )
    pub(crate) fn parse_external_module_reference(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let require = self.ctx_atoms.require;
        if !self.is_contextual(&self.cur.clone(), require) {
            return Err(self.err_cur("'require' expected"));
        }
        self.next();
        if !self.consume_if(TokenKind::LeftParen) {
            return Err(self.err_cur("'(' expected"));
        }
        if !self.cur.is(TokenKind::StringLiteral) {
            return Err(self.err_cur("string literal expected"));
        }
        let specifier = self.parse_string_literal()?;
        if !self.consume_if(TokenKind::RightParen) {
            return Err(self.err_cur("')' expected"));
        }
        self.notify_module_specifier(specifier);
        Ok(self.node(NodeKind::ExternalModuleReference { specifier }, start))
    }

    // ImportClause:
    //   ImportedDefaultBinding (, NamedImports)?
    //   NamedImports (, ImportedDefaultBinding)?
    fn parse_import_clause(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let mut default_binding = None;
        let mut named = None;
        if self.cur.is(TokenKind::Identifier) {
            default_binding = Some(self.parse_identifier()?);
            if self.consume_if(TokenKind::Comma) && self.cur.is(TokenKind::LeftBrace) {
                named = Some(self.parse_named_import_list()?);
            }
        } else if self.cur.is(TokenKind::LeftBrace) {
            named = Some(self.parse_named_import_list()?);
            if self.consume_if(TokenKind::Comma) && self.cur.is(TokenKind::Identifier) {
                default_binding = Some(self.parse_identifier()?);
            }
        }
        Ok(self.node(
            NodeKind::ImportList {
                default_binding,
                named,
            },
            start,
        ))
    }

    // NamedImports: { ImportSpecifier (, ImportSpecifier)* }
    fn parse_named_import_list(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        self.next();
        let mut imports = Vec::new();
        loop {
            let as_atom = self.ctx_atoms.as_;
            let name = self.parse_binding_identifier()?;
            if self.is_contextual(&self.cur.clone(), as_atom) {
                self.next();
                let binding = self.parse_binding_identifier()?;
                let name_pos = self.arena.pos(name);
                imports.push(self.node(NodeKind::NamedImport { name, binding }, name_pos));
            } else {
                imports.push(name);
            }
            if self.consume_if(TokenKind::Comma) {
                continue;
            }
            if self.cur.is(TokenKind::RightBrace) {
                self.next();
                break;
            }
            return Err(self.unexpected_token());
        }
        Ok(self.node(NodeKind::NamedImportList { imports }, start))
    }

    // FromClause: from ModuleSpecifier
    pub(crate) fn parse_from_clause(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let from_atom = self.ctx_atoms.from;
        if !self.is_contextual(&self.cur.clone(), from_atom) {
            return Err(self.err_cur("'from' expected"));
        }
        self.next();
        if !self.cur.is(TokenKind::StringLiteral) {
            return Err(self.err_cur("string literal expected"));
        }
        let specifier = self.parse_string_literal()?;
        self.notify_module_specifier(specifier);
        Ok(self.node(NodeKind::FromClause {
            module_specifier: specifier,
        }, start))
    }

    /// Report a relative module specifier to the driver.
    fn notify_module_specifier(&mut self, specifier: NodeId) {
        let Some(atom) = (match self.arena.kind(specifier) {
            NodeKind::StringLiteral { value } => Some(*value),
            _ => None,
        }) else {
            return;
        };
        let text = self.scanner.literals().utf8(atom);
        if !text.starts_with('.') {
            return;
        }
        let owned = text.to_string();
        if let Some(cb) = self.module_found_callback.as_mut() {
            cb(&owned);
        }
    }

    // ExportDeclaration:
    //   export * FromClause
    //   export ExportClause FromClause?
    //   export VariableStatement / Declaration
    //   export default AssignmentExpression
    //   export = AssignmentExpression
    pub(crate) fn parse_export_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::Export) {
            return Err(self.err_cur("'export' expected"));
        }
        self.next();
        if self.consume_if(TokenKind::Mul) {
            let from = self.parse_from_clause()?;
            return Ok(self.node(
                NodeKind::Export {
                    default: false,
                    clause: None,
                    from: Some(from),
                },
                start,
            ));
        }
        let declare_atom = self.ctx_atoms.declare;
        match self.cur.kind {
            TokenKind::LeftBrace => {
                let clause = self.parse_export_clause()?;
                let from_atom = self.ctx_atoms.from;
                let from = if self.is_contextual(&self.cur.clone(), from_atom) {
                    Some(self.parse_from_clause()?)
                } else {
                    None
                };
                Ok(self.node(
                    NodeKind::Export {
                        default: false,
                        clause: Some(clause),
                        from,
                    },
                    start,
                ))
            }
            TokenKind::Var => {
                let clause = self.parse_variable_statement()?;
                Ok(self.node(
                    NodeKind::Export {
                        default: false,
                        clause: Some(clause),
                        from: None,
                    },
                    start,
                ))
            }
            TokenKind::Const
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Let
            | TokenKind::Function
            | TokenKind::Enum => {
                let clause = self.parse_declaration(true)?;
                Ok(self.node(
                    NodeKind::Export {
                        default: false,
                        clause: Some(clause),
                        from: None,
                    },
                    start,
                ))
            }
            TokenKind::Default | TokenKind::Assign => {
                self.next();
                let clause = self.parse_assignment_expression()?;
                Ok(self.node(
                    NodeKind::Export {
                        default: true,
                        clause: Some(clause),
                        from: None,
                    },
                    start,
                ))
            }
            _ => {
                if self.is_contextual(&self.cur.clone(), declare_atom) {
                    // Exported ambient declarations count as default exports,
                    // the same as `export =` / `export default`.
                    let clause = self.parse_ambient_declaration(true)?;
                    return Ok(self.node(
                        NodeKind::Export {
                            default: true,
                            clause: Some(clause),
                            from: None,
                        },
                        start,
                    ));
                }
                Err(self.unexpected_token())
            }
        }
    }

    // ExportClause: { ExportSpecifier (, ExportSpecifier)* }
    fn parse_export_clause(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // {
        let mut exports = Vec::new();
        loop {
            let as_atom = self.ctx_atoms.as_;
            let result = self.parse_identifier();
            if let Some(name) = self.skip_token_or(result, &[TokenKind::RightBrace])? {
                if self.is_contextual(&self.cur.clone(), as_atom) {
                    self.next();
                    let binding = self.parse_identifier()?;
                    let name_pos = self.arena.pos(name);
                    exports.push(self.node(NodeKind::NamedExport { name, binding }, name_pos));
                } else {
                    exports.push(name);
                }
            }
            if self.consume_if(TokenKind::Comma) {
                continue;
            }
            if self.cur.is(TokenKind::RightBrace) {
                self.next();
                break;
            }
            return Err(self.err_cur("',' or '}' expected"));
        }
        Ok(self.node(NodeKind::NamedExportList { exports }, start))
    }
}
