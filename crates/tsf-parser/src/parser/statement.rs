//! Statement and declaration grammar.
//!
//! Covers the statement list productions, variable/lexical declarations with
//! binding patterns, the iteration statements (with the speculative
//! `for (X in/of ...)` head), switch/try/labelled statements, and the
//! class/interface/enum declarations including the member-overload chains
//! and their validation.

use super::{AccessorInfo, ParseError, ParseResult, Parser};
use crate::ast::{NodeFlags, NodeId, NodeKind};
use crate::scope::SymbolType;
use crate::state::ContextState;
use tsf_common::SourcePosition;
use tsf_scanner::TokenKind;

/// Keywords that may begin an expression statement.
fn keyword_starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::Delete
            | TokenKind::Void
            | TokenKind::Typeof
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Undefined
            | TokenKind::Nan
    )
}

impl<'a> Parser<'a> {
    // StatementListItem: Statement | Declaration
    pub(crate) fn parse_statement_list_item(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::Function
            | TokenKind::Class
            | TokenKind::Enum
            | TokenKind::Interface
            | TokenKind::Let
            | TokenKind::Const => self.parse_declaration(true),
            _ => self.parse_statement(),
        }
    }

    pub(crate) fn parse_declaration(&mut self, report_error: bool) -> ParseResult {
        match self.cur.kind {
            TokenKind::Function => self.parse_function_overloads(true),
            TokenKind::Class => self.parse_class_declaration(),
            TokenKind::Enum => self.parse_enum_declaration(),
            TokenKind::Interface => self.parse_interface_declaration(),
            TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_lexical_declaration()?;
                self.expect_statement_end();
                Ok(decl)
            }
            _ => {
                if report_error {
                    Err(self.unexpected_token())
                } else {
                    Err(ParseError::Failed)
                }
            }
        }
    }

    pub(crate) fn parse_statement(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::LeftBrace => self.parse_block_statement(),
            TokenKind::LineTerminator => self.parse_empty_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::Continue => {
                if !self.context.is_continuable() {
                    self.reporter
                        .context_error(self.cur.pos, "'continue' only allowed in loops");
                }
                self.parse_continue_statement()
            }
            TokenKind::Break => {
                if !self.context.is_breakable() {
                    self.reporter
                        .context_error(self.cur.pos, "'break' not allowed here");
                }
                let stmt = self.parse_break_statement()?;
                self.expect_statement_end();
                Ok(stmt)
            }
            TokenKind::Return => {
                if !self.context.is_returnable() {
                    self.reporter.context_error(
                        self.cur.pos,
                        "'return' statement only allowed in function",
                    );
                }
                self.parse_return_statement()
            }
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Debugger => self.parse_debugger_statement(),
            TokenKind::Var => {
                let stmt = self.parse_variable_statement()?;
                self.expect_statement_end();
                Ok(stmt)
            }
            TokenKind::Yield => {
                let start = self.cur.pos;
                let expr = self.parse_expression()?;
                Ok(self.node(NodeKind::ExpressionStatement { expr }, start))
            }
            TokenKind::Eof => Err(self.unexpected_end_of_input()),
            _ => {
                if self.cur.kind.is_keyword() && !keyword_starts_expression(self.cur.kind) {
                    let text = self.cur.kind.describe().to_string();
                    self.reporter
                        .syntax_error(self.cur.pos, format!("'{text}' is not allowed here"));
                    self.cur.kind = TokenKind::Identifier;
                }
                // Labelled statement and expression statement share a
                // prefix; look one token ahead for the colon.
                if self.cur.is(TokenKind::Identifier) {
                    let cp = self.checkpoint();
                    self.next();
                    let labelled = self.cur.is(TokenKind::Colon);
                    self.restore(&cp);
                    if labelled {
                        return self.parse_labelled_statement();
                    }
                }
                let start = self.cur.pos;
                let expr = self.parse_expression()?;
                Ok(self.node(NodeKind::ExpressionStatement { expr }, start))
            }
        }
    }

    pub(crate) fn parse_empty_statement(&mut self) -> ParseResult {
        let node = self.node_at(NodeKind::Empty, self.cur.pos);
        self.next();
        Ok(node)
    }

    // Block: { StatementList }
    pub(crate) fn parse_block_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let scope = self.push_scope();
        self.balancer.open_brace_found();
        self.next(); // {
        let mut statements = Vec::new();
        let result = self.parse_statement_list_into(&mut statements, TokenKind::RightBrace);
        self.pop_scope();
        result?;
        self.balancer.close_brace_found();
        self.next(); // }
        Ok(self.node(NodeKind::Block { scope, statements }, start))
    }

    /// Parse statement-list items until `end`, recovering per item.
    pub(crate) fn parse_statement_list_into(
        &mut self,
        statements: &mut Vec<NodeId>,
        end: TokenKind,
    ) -> Result<(), ParseError> {
        while !self.cur.is(end) {
            self.check_eof()?;
            let before = self.cur.pos.start_offset;
            let result = self.parse_statement_list_item();
            if let Some(stmt) = self.skip_token_or(result, &[TokenKind::LineTerminator, end])? {
                statements.push(stmt);
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            }
            if self.cur.pos.start_offset == before && !self.cur.is(end) {
                // No progress; drop the offending token.
                self.next();
            }
        }
        Ok(())
    }

    // LexicalDeclaration: (let | const) LexicalBinding (, LexicalBinding)*
    pub(crate) fn parse_lexical_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let is_const = self.cur.is(TokenKind::Const);
        self.next();
        let mut bindings = vec![self.parse_lexical_binding(is_const)?];
        while self.consume_if(TokenKind::Comma) {
            bindings.push(self.parse_lexical_binding(is_const)?);
        }
        Ok(self.node(NodeKind::LexicalDecl { is_const, bindings }, start))
    }

    fn parse_lexical_binding(&mut self, const_decl: bool) -> ParseResult {
        let start = self.cur.pos;
        let binding = match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_binding_pattern()?,
            _ => self.parse_binding_identifier()?,
        };
        let type_expr = if self.consume_if(TokenKind::Colon) {
            Some(self.parse_type_expression()?)
        } else {
            None
        };
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        if const_decl && initializer.is_none() {
            self.reporter
                .context_error(start, "'const' declarations must be initialized");
        }
        let node = self.node(
            NodeKind::Variable {
                binding,
                type_expr,
                initializer,
            },
            start,
        );
        self.declare_binding(binding, SymbolType::VariableName, node);
        Ok(node)
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> ParseResult {
        if !self.cur.is(TokenKind::Identifier) {
            return Err(self.err_cur("'identifier' expected"));
        }
        self.parse_identifier()
    }

    pub(crate) fn parse_binding_pattern(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::LeftBrace => self.parse_object_binding_pattern(),
            TokenKind::LeftBracket => self.parse_array_binding_pattern(),
            _ => Err(self.err_cur("'{' or '[' expected")),
        }
    }

    // ObjectBindingPattern: { BindingProperty (, BindingProperty)* }
    fn parse_object_binding_pattern(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // {
        let mut properties = Vec::new();
        while !self.cur.is(TokenKind::RightBrace) {
            self.check_eof()?;
            properties.push(self.parse_binding_property()?);
            if !self.consume_if(TokenKind::Comma) && !self.cur.is(TokenKind::RightBrace) {
                return Err(self.err_cur("',' expected"));
            }
        }
        self.next(); // }
        let node = self.node(NodeKind::BindingPropList { properties }, start);
        self.arena.get_mut(node).flags |= NodeFlags::VALID_LHS | NodeFlags::OBJECT_LITERAL;
        Ok(node)
    }

    // ArrayBindingPattern: [ BindingElement / elision / rest ... ]
    fn parse_array_binding_pattern(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // [
        let mut elements = Vec::new();
        loop {
            match self.cur.kind {
                TokenKind::RightBracket => {
                    self.next();
                    break;
                }
                TokenKind::Comma => {
                    elements.push(self.node_at(NodeKind::Empty, self.cur.pos));
                    self.next();
                    continue;
                }
                TokenKind::Rest => {
                    let rest_start = self.cur.pos;
                    self.next();
                    let target = self.parse_binding_identifier()?;
                    elements.push(self.node(NodeKind::RestParam { expr: target }, rest_start));
                    if !self.cur.is(TokenKind::RightBracket) {
                        return Err(self.err_cur("the rest element must be the last element"));
                    }
                    continue;
                }
                TokenKind::Eof => return Err(self.unexpected_end_of_input()),
                _ => elements.push(self.parse_binding_element()?),
            }
            if self.cur.is(TokenKind::Comma) {
                self.next();
            } else if self.cur.is(TokenKind::RightBracket) {
                self.next();
                break;
            } else {
                return Err(self.err_cur("unexpected token in 'array binding pattern'"));
            }
        }
        let node = self.node(NodeKind::BindingArray { elements }, start);
        self.arena.get_mut(node).flags |= NodeFlags::VALID_LHS | NodeFlags::ARRAY_LITERAL;
        Ok(node)
    }

    // BindingProperty:
    //   SingleNameBinding | PropertyName : BindingElement
    fn parse_binding_property(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let key = self.parse_property_name()?;
        if self.consume_if(TokenKind::Colon) {
            let value = self.parse_binding_element()?;
            return Ok(self.node(
                NodeKind::BindingElement {
                    name: Some(key),
                    value: Some(value),
                    initializer: None,
                },
                start,
            ));
        }
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        if initializer.is_none() {
            return Ok(key);
        }
        Ok(self.node(
            NodeKind::BindingElement {
                name: Some(key),
                value: None,
                initializer,
            },
            start,
        ))
    }

    // BindingElement: SingleNameBinding | BindingPattern Initializer?
    pub(crate) fn parse_binding_element(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let target = match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_binding_pattern()?,
            _ => self.parse_binding_identifier()?,
        };
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        if initializer.is_none() && self.arena.is_name(target) {
            return Ok(target);
        }
        Ok(self.node(
            NodeKind::BindingElement {
                name: None,
                value: Some(target),
                initializer,
            },
            start,
        ))
    }

    // VariableStatement: var VariableDeclaration (, VariableDeclaration)*
    pub(crate) fn parse_variable_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // var
        let mut bindings = vec![self.parse_variable_declaration()?];
        while self.consume_if(TokenKind::Comma) {
            bindings.push(self.parse_variable_declaration()?);
        }
        Ok(self.node(NodeKind::VariableDecl { bindings }, start))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let binding = match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                if !self.options.language_mode.is_es6() {
                    self.reporter.syntax_error(
                        self.cur.pos,
                        "destructuring declarations are only allowed in es6",
                    );
                }
                self.parse_binding_pattern()?
            }
            _ => self.parse_binding_identifier()?,
        };
        let type_expr = if self.consume_if(TokenKind::Colon) {
            Some(self.parse_type_expression()?)
        } else {
            None
        };
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        let node = self.node(
            NodeKind::Variable {
                binding,
                type_expr,
                initializer,
            },
            start,
        );
        self.declare_binding(binding, SymbolType::VariableName, node);
        Ok(node)
    }

    // ----- control flow ---------------------------------------------------

    pub(crate) fn parse_if_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // if
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let cond = self.parse_expression()?;
        self.balancer.close_paren_found();
        self.expect(TokenKind::RightParen)?;
        let then_stmt = self.parse_statement()?;
        if self.is_line_termination() {
            self.consume_line_terminator();
        }
        let else_stmt = if self.consume_if(TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.node(
            NodeKind::If {
                cond,
                then_stmt,
                else_stmt,
            },
            start,
        ))
    }

    pub(crate) fn parse_while_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // while
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let cond = self.parse_expression()?;
        let body = self.parse_iteration_body()?;
        Ok(self.node(NodeKind::While { cond, body }, start))
    }

    pub(crate) fn parse_do_while_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // do
        let body = self.with_context(ContextState::Iteration, |p| p.parse_statement())?;
        if self.is_line_termination() {
            self.consume_line_terminator();
        }
        self.expect(TokenKind::While)?;
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let cond = self.parse_expression()?;
        self.balancer.close_paren_found();
        self.expect(TokenKind::RightParen)?;
        if self.is_line_termination() {
            self.consume_line_terminator();
        }
        Ok(self.node(NodeKind::DoWhile { body, cond }, start))
    }

    // ForStatement: the head is parsed speculatively, then the `in` / `of`
    // / `;` token decides which iteration form this is.
    pub(crate) fn parse_for_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // for
        if !self.cur.is(TokenKind::LeftParen) {
            return Err(self.err_cur("'(' expected"));
        }
        self.balancer.open_paren_found();
        self.next();
        let receiver = match self.cur.kind {
            TokenKind::Var => {
                Some(self.with_context(ContextState::NoIn, |p| p.parse_variable_statement())?)
            }
            TokenKind::Let | TokenKind::Const => {
                Some(self.with_context(ContextState::NoIn, |p| p.parse_lexical_declaration())?)
            }
            TokenKind::LineTerminator => None,
            _ => {
                let cp = self.checkpoint();
                let expr =
                    self.with_context(ContextState::NoIn, |p| p.parse_expression())?;
                if self.cur.is(TokenKind::LineTerminator) {
                    Some(expr)
                } else {
                    // `for (x in y)` / `for (x of y)`: the receiver must be
                    // a plain left-hand-side expression.
                    self.restore(&cp);
                    Some(self.with_context(ContextState::NoIn, |p| {
                        p.parse_left_hand_side_expression()
                    })?)
                }
            }
        };
        self.parse_for_iteration(receiver, start)
    }

    fn parse_for_iteration(
        &mut self,
        receiver: Option<NodeId>,
        start: SourcePosition,
    ) -> ParseResult {
        let of_atom = self.ctx_atoms.of;
        let mut second = None;
        let mut third = None;
        let mut for_in = false;
        let mut for_of = false;

        if self.cur.is(TokenKind::LineTerminator) {
            // for (init; cond; update)
            self.next();
            if !self.cur.is(TokenKind::LineTerminator) && !self.cur.is(TokenKind::RightParen) {
                second = Some(self.parse_expression()?);
            }
            if self.cur.is(TokenKind::LineTerminator) {
                self.next();
                if !self.cur.is(TokenKind::RightParen) {
                    third = Some(self.parse_expression()?);
                }
            }
        } else if self.is_contextual(&self.cur.clone(), of_atom) {
            if !self.options.language_mode.is_es6() {
                self.reporter
                    .syntax_error(self.cur.pos, "'for-of' is only allowed in es6");
            }
            self.next();
            second = Some(self.parse_assignment_expression()?);
            for_of = true;
        } else if self.cur.is(TokenKind::In) {
            self.next();
            second =
                Some(self.with_context(ContextState::NoIn, |p| p.parse_assignment_expression())?);
            for_in = true;
        } else {
            self.reporter
                .syntax_error(self.cur.pos, "'in' or 'of' or ';' expected");
            self.skip_tokens_until(&[TokenKind::RightParen], false);
        }

        let body = self.parse_iteration_body()?;
        let empty_receiver = receiver.is_none() && (for_in || for_of);
        let lhs = if empty_receiver {
            self.node_at(NodeKind::Empty, start)
        } else {
            receiver.unwrap_or_else(|| self.arena.alloc(NodeKind::Empty, start))
        };
        let node = if for_in {
            let rhs = second.expect("for-in parses its target");
            self.node(NodeKind::ForIn { lhs, rhs, body }, start)
        } else if for_of {
            let rhs = second.expect("for-of parses its target");
            self.node(NodeKind::ForOf { lhs, rhs, body }, start)
        } else {
            self.node(
                NodeKind::For {
                    init: receiver,
                    cond: second,
                    update: third,
                    body,
                },
                start,
            )
        };
        Ok(node)
    }

    fn parse_iteration_body(&mut self) -> ParseResult {
        if !self.cur.is(TokenKind::RightParen) {
            return Err(self.err_cur("')' expected"));
        }
        self.balancer.close_paren_found();
        self.next();
        self.with_context(ContextState::Iteration, |p| p.parse_statement())
    }

    pub(crate) fn parse_continue_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let no_label = self.cur.line_break_before_next;
        self.next();
        let label = if !no_label && self.cur.is(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(self.node(NodeKind::Continue { label }, start))
    }

    pub(crate) fn parse_break_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let no_label = self.cur.line_break_before_next;
        self.next();
        let label = if !no_label && self.cur.is(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(self.node(NodeKind::Break { label }, start))
    }

    pub(crate) fn parse_return_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let bare = self.cur.line_break_before_next;
        self.next();
        if bare || self.is_line_termination() {
            self.consume_line_terminator();
            return Ok(self.node(NodeKind::Return { expr: None }, start));
        }
        let expr = self.parse_expression()?;
        Ok(self.node(NodeKind::Return { expr: Some(expr) }, start))
    }

    pub(crate) fn parse_with_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // with
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.balancer.close_paren_found();
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_statement()?;
        Ok(self.node(NodeKind::With { expr, body }, start))
    }

    pub(crate) fn parse_switch_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // switch
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let cond = self.parse_expression()?;
        self.balancer.close_paren_found();
        self.expect(TokenKind::RightParen)?;
        let cases = self.with_context(ContextState::CaseBlock, |p| p.parse_case_clauses())?;
        Ok(self.node(NodeKind::Switch { cond, cases }, start))
    }

    fn parse_case_clauses(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.balancer.open_brace_found();
        self.expect(TokenKind::LeftBrace)?;
        let mut cases = Vec::new();
        let mut default_seen = false;
        while !self.cur.is(TokenKind::RightBrace) {
            self.check_eof()?;
            let case_start = self.cur.pos;
            let test = match self.cur.kind {
                TokenKind::Case => {
                    self.next();
                    Some(self.parse_expression()?)
                }
                TokenKind::Default => {
                    if default_seen {
                        self.reporter
                            .syntax_error(self.cur.pos, "more than one 'default' clause");
                    }
                    default_seen = true;
                    self.next();
                    None
                }
                _ => return Err(self.err_cur("'case' or 'default' expected")),
            };
            self.expect(TokenKind::Colon)?;
            let body_start = self.cur.pos;
            let mut statements = Vec::new();
            while !self
                .cur
                .one_of(&[TokenKind::Case, TokenKind::Default, TokenKind::RightBrace])
            {
                self.check_eof()?;
                let before = self.cur.pos.start_offset;
                let result = self.parse_statement_list_item();
                if let Some(stmt) = self.skip_token_or(
                    result,
                    &[
                        TokenKind::LineTerminator,
                        TokenKind::Case,
                        TokenKind::Default,
                        TokenKind::RightBrace,
                    ],
                )? {
                    statements.push(stmt);
                }
                if self.is_line_termination() {
                    self.consume_line_terminator();
                }
                if self.cur.pos.start_offset == before
                    && !self
                        .cur
                        .one_of(&[TokenKind::Case, TokenKind::Default, TokenKind::RightBrace])
                {
                    self.next();
                }
            }
            let body = self.node(NodeKind::CaseBody { statements }, body_start);
            cases.push(self.node(NodeKind::Case { test, body }, case_start));
        }
        self.balancer.close_brace_found();
        self.next(); // }
        Ok(cases)
    }

    pub(crate) fn parse_labelled_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let label = self.parse_identifier()?;
        self.expect(TokenKind::Colon)?;
        if let Some(atom) = self.arena.name_atom(label) {
            self.declare(atom, SymbolType::LabelName, label);
        }
        let stmt = self.parse_statement()?;
        Ok(self.node(NodeKind::Labelled { label, stmt }, start))
    }

    pub(crate) fn parse_throw_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let bare = self.cur.line_break_before_next;
        self.next();
        if bare || self.is_line_termination() {
            return Err(self.err_cur("expression expected after 'throw'"));
        }
        let expr = self.parse_expression()?;
        Ok(self.node(NodeKind::Throw { expr }, start))
    }

    pub(crate) fn parse_try_statement(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // try
        let block = self.parse_block_statement()?;
        if self.is_line_termination() {
            self.consume_line_terminator();
        }
        let catch = if self.cur.is(TokenKind::Catch) {
            Some(self.parse_catch_block()?)
        } else {
            None
        };
        if self.is_line_termination() {
            self.consume_line_terminator();
        }
        let finally = if self.cur.is(TokenKind::Finally) {
            Some(self.parse_finally_block()?)
        } else {
            None
        };
        if catch.is_none() && finally.is_none() {
            return Err(self.err_cur("'catch' or 'finally' expected"));
        }
        Ok(self.node(
            NodeKind::Try {
                block,
                catch,
                finally,
            },
            start,
        ))
    }

    fn parse_catch_block(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // catch
        self.balancer.open_paren_found();
        self.expect(TokenKind::LeftParen)?;
        let param = match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_binding_pattern()?,
            _ => self.parse_binding_identifier()?,
        };
        self.balancer.close_paren_found();
        self.expect(TokenKind::RightParen)?;
        let block = self.parse_block_statement()?;
        Ok(self.node(NodeKind::Catch { param, block }, start))
    }

    fn parse_finally_block(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // finally
        let block = self.parse_block_statement()?;
        Ok(self.node(NodeKind::Finally { block }, start))
    }

    pub(crate) fn parse_debugger_statement(&mut self) -> ParseResult {
        let node = self.node_at(NodeKind::Debugger, self.cur.pos);
        self.next();
        self.expect_statement_end();
        Ok(node)
    }

    // ----- interface and enum ---------------------------------------------

    pub(crate) fn parse_interface_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // interface
        let name = self.parse_identifier()?;
        let type_params = if self.cur.is(TokenKind::Less) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let extends = if self.cur.is(TokenKind::Extends) {
            let extends_start = self.cur.pos;
            self.next();
            let mut interfaces = vec![self.parse_referenced_type()?];
            while self.consume_if(TokenKind::Comma) {
                interfaces.push(self.parse_referenced_type()?);
            }
            Some(self.node(NodeKind::InterfaceExtends { interfaces }, extends_start))
        } else {
            None
        };
        let body = self.parse_object_type_expression()?;
        let node = self.node(
            NodeKind::Interface {
                name,
                type_params,
                extends,
                body,
            },
            start,
        );
        if let Some(atom) = self.arena.name_atom(name) {
            self.declare(atom, SymbolType::InterfaceName, node);
        }
        Ok(node)
    }

    pub(crate) fn parse_enum_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // enum
        let name = self.parse_identifier()?;
        let body = self.parse_enum_body()?;
        let node = self.node(NodeKind::Enum { name, body }, start);
        if let Some(atom) = self.arena.name_atom(name) {
            self.declare(atom, SymbolType::ClassName, node);
        }
        Ok(node)
    }

    fn parse_enum_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_brace_found();
        self.expect(TokenKind::LeftBrace)?;
        let mut fields = Vec::new();
        if self.cur.is(TokenKind::RightBrace) {
            self.balancer.close_brace_found();
            self.next();
            return Ok(self.node(NodeKind::EnumBody { fields }, start));
        }
        loop {
            self.check_eof()?;
            fields.push(self.parse_enum_property()?);
            if self.consume_if(TokenKind::Comma) {
                if self.cur.is(TokenKind::RightBrace) {
                    // trailing comma
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
        Ok(self.node(NodeKind::EnumBody { fields }, start))
    }

    fn parse_enum_property(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let name = self.parse_property_name()?;
        let value = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(self.node(NodeKind::EnumField { name, value }, start))
    }

    // ----- classes --------------------------------------------------------

    pub(crate) fn parse_class_declaration(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // class
        let name = if self.cur.is(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let type_params = if self.cur.is(TokenKind::Less) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let bases = self.parse_class_bases()?;
        let field_list = self.parse_class_body()?;
        let node = self.node(
            NodeKind::Class {
                name,
                type_params,
                bases,
                field_list,
            },
            start,
        );
        if let Some(name_node) = name {
            if let Some(atom) = self.arena.name_atom(name_node) {
                self.declare(atom, SymbolType::ClassName, node);
            }
        }
        Ok(node)
    }

    // ClassHeritage: ('extends' TypeReference)? ('implements' TypeReference
    // (, TypeReference)*)?, in either order, each at most once.
    fn parse_class_bases(&mut self) -> Result<Option<NodeId>, ParseError> {
        let start = self.cur.pos;
        let mut base = None;
        let mut impls = None;
        loop {
            match self.cur.kind {
                TokenKind::Extends => {
                    if base.is_some() {
                        self.reporter
                            .syntax_error(self.cur.pos, "class can only extend a single class");
                    }
                    let heritage_start = self.cur.pos;
                    self.next();
                    let base_type = self.parse_referenced_type()?;
                    base = Some(self.node(
                        NodeKind::ClassHeritage { base: base_type },
                        heritage_start,
                    ));
                }
                TokenKind::Implements => {
                    if impls.is_some() {
                        self.reporter.syntax_error(
                            self.cur.pos,
                            "'implements' clause already seen",
                        );
                    }
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

    fn parse_class_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        self.push_scope();
        self.balancer.open_brace_found();
        self.next();
        let mut fields = Vec::new();
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
            let result = self.parse_class_element();
            match self.skip_token_or(result, &[TokenKind::LineTerminator, TokenKind::RightBrace])
            {
                Ok(Some(member)) => fields.push(member),
                Ok(None) => {}
                Err(fatal) => {
                    self.pop_scope();
                    return Err(fatal);
                }
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else if !self.cur.is(TokenKind::RightBrace) && !self.prev.is(TokenKind::RightBrace)
            {
                self.reporter.syntax_error(self.cur.pos, "';' expected");
            }
            if self.cur.pos.start_offset == before && !self.cur.is(TokenKind::RightBrace) {
                self.next();
            }
        }
        self.pop_scope();
        Ok(self.node(NodeKind::ClassFieldList { fields }, start))
    }

    fn parse_class_element(&mut self) -> ParseResult {
        if self.cur.is(TokenKind::LeftBracket) {
            return self.parse_index_signature();
        }
        let mods = self.parse_field_modifiers()?;
        let accessor = self.parse_accessor();
        if self.cur.kind.is_keyword() {
            self.cur.kind = TokenKind::Identifier;
        }
        if self.cur.is(TokenKind::Identifier) {
            let constructor = self.ctx_atoms.constructor;
            if self.is_contextual(&self.cur.clone(), constructor) {
                return self.parse_constructor_overloads(mods);
            }
            let cp = self.checkpoint();
            self.next();
            let member_function = self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]);
            self.restore(&cp);
            if member_function {
                return self.parse_member_function_overloads(mods, accessor);
            }
            return self.parse_member_variable(mods);
        }
        if self.cur.is(TokenKind::Mul) {
            self.next();
            return self.parse_generator_method_overloads(mods);
        }
        Err(self.unexpected_token())
    }

    /// `public` / `private` / `protected`.
    pub(crate) fn is_access_level_modifier(&self) -> bool {
        self.cur.one_of(&[
            TokenKind::Public,
            TokenKind::Protected,
            TokenKind::Private,
        ])
    }

    // FieldModifiers: ('static'? AccessLevel?) | (AccessLevel? 'static'?),
    // normalized so `static` comes first in the modifier list. A member
    // with no explicit access level is public.
    pub(crate) fn parse_field_modifiers(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let mut modifiers = Vec::new();
        if self.cur.is(TokenKind::Static) {
            modifiers.push(self.parse_field_modifier()?);
            if self.is_access_level_modifier() {
                modifiers.push(self.parse_field_modifier()?);
            }
        } else if self.is_access_level_modifier() {
            let access = self.parse_field_modifier()?;
            if self.cur.is(TokenKind::Static) {
                let stat = self.parse_field_modifier()?;
                modifiers.push(stat);
                modifiers.push(access);
            } else {
                modifiers.push(access);
            }
        } else {
            let public = self.node_at(
                NodeKind::ClassFieldAccessLevel {
                    level: TokenKind::Public,
                },
                start,
            );
            modifiers.push(public);
        }
        Ok(self.node(NodeKind::ClassFieldModifiers { modifiers }, start))
    }

    fn parse_field_modifier(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::Static
            | TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private => {
                let node = self.node_at(
                    NodeKind::ClassFieldAccessLevel {
                        level: self.cur.kind,
                    },
                    self.cur.pos,
                );
                self.next();
                Ok(node)
            }
            _ => Err(self.err_cur(
                "class field modifier is allowed one of 'public', 'private', 'protected', 'static'",
            )),
        }
    }

    /// Consume a `get`/`set` prefix when it really is an accessor prefix;
    /// a `get`/`set` that is itself the member name is left in place.
    pub(crate) fn parse_accessor(&mut self) -> AccessorInfo {
        let get = self.ctx_atoms.get;
        let set = self.ctx_atoms.set;
        let getter = self.is_contextual(&self.cur.clone(), get);
        let setter = self.is_contextual(&self.cur.clone(), set);
        if !getter && !setter {
            return AccessorInfo::none();
        }
        let cp = self.checkpoint();
        self.next();
        let followed_by_name = self.cur.is(TokenKind::Identifier)
            || self.cur.kind.is_keyword()
            || self.cur.one_of(&[
                TokenKind::StringLiteral,
                TokenKind::NumericLiteral,
                TokenKind::OctalLiteral,
                TokenKind::BinaryLiteral,
                TokenKind::LeftBracket,
            ]);
        if followed_by_name {
            return AccessorInfo { getter, setter };
        }
        self.restore(&cp);
        AccessorInfo::none()
    }

    // ----- member functions and overload chains ---------------------------

    fn is_member_function_overloads_begin(&self) -> bool {
        self.cur.one_of(&[TokenKind::Identifier, TokenKind::Static])
            || self.is_access_level_modifier()
            || self.cur.kind.is_keyword()
    }

    // Consecutive body-less `constructor(...)` signatures attach to the
    // following implementation.
    fn parse_constructor_overloads(&mut self, first_mods: NodeId) -> ParseResult {
        let start = self.cur.pos;
        let constructor = self.ctx_atoms.constructor;
        let mut overloads: Vec<NodeId> = Vec::new();
        let mut mods = first_mods;
        let mut first = true;
        loop {
            if !first {
                if !(self.is_contextual(&self.cur.clone(), constructor)
                    || self.is_access_level_modifier()
                    || self.cur.is(TokenKind::Static))
                {
                    let pos = overloads
                        .last()
                        .map_or(self.prev.pos, |&o| self.arena.pos(o));
                    return Err(self.err_at(pos, "incomplete constructor definition"));
                }
                mods = self.parse_field_modifiers()?;
            }
            if !self.is_contextual(&self.cur.clone(), constructor) {
                return Err(self.err_cur("'constructor' expected"));
            }
            let name = self.parse_identifier()?;
            let call_sig = match self.parse_call_signature(true, false) {
                Ok(sig) => sig,
                Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                Err(ParseError::Failed) => {
                    self.skip_tokens_until(
                        &[TokenKind::LeftBrace, TokenKind::LineTerminator],
                        false,
                    );
                    self.node_at(NodeKind::Empty, self.cur.pos)
                }
            };
            self.validate_overload_chain(name, mods, false, &overloads);
            if self.cur.is(TokenKind::LeftBrace) {
                let body =
                    self.with_context(ContextState::Function, |p| p.parse_function_body())?;
                let overloads_node = if overloads.is_empty() {
                    None
                } else {
                    Some(self.node(NodeKind::MemberFunctionOverloads { overloads }, start))
                };
                return Ok(self.node(
                    NodeKind::MemberFunction {
                        getter: false,
                        setter: false,
                        generator: false,
                        modifiers: mods,
                        name,
                        call_sig,
                        overloads: overloads_node,
                        body,
                    },
                    start,
                ));
            }
            let overload = self.node(
                NodeKind::MemberFunctionOverload {
                    getter: false,
                    setter: false,
                    generator: false,
                    modifiers: mods,
                    name,
                    call_sig,
                },
                start,
            );
            overloads.push(overload);
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else {
                return Err(self.err_cur("';' expected"));
            }
            first = false;
        }
    }

    fn parse_member_function_overloads(
        &mut self,
        first_mods: NodeId,
        first_accessor: AccessorInfo,
    ) -> ParseResult {
        let start = self.cur.pos;
        let mut overloads: Vec<NodeId> = Vec::new();
        let mut mods = first_mods;
        let mut accessor = first_accessor;
        let mut first = true;
        loop {
            if !first {
                if !self.is_member_function_overloads_begin() {
                    return Err(self.err_cur("incomplete member function definition"));
                }
                mods = self.parse_field_modifiers()?;
                accessor = self.parse_accessor();
            }
            if self.cur.kind.is_keyword() {
                self.cur.kind = TokenKind::Identifier;
            }
            if !self.cur.is(TokenKind::Identifier) {
                return Err(self.err_cur("'identifier' expected"));
            }
            let member_start = self.cur.pos;
            let name = self.parse_identifier()?;
            let call_sig = self.parse_call_signature(false, false)?;
            self.validate_overload_chain(name, mods, false, &overloads);
            if self.cur.is(TokenKind::LeftBrace) {
                self.validate_accessor_shape(accessor, call_sig);
                let body =
                    self.with_context(ContextState::Function, |p| p.parse_function_body())?;
                let overloads_node = if overloads.is_empty() {
                    None
                } else {
                    Some(self.node(NodeKind::MemberFunctionOverloads { overloads }, start))
                };
                return Ok(self.node(
                    NodeKind::MemberFunction {
                        getter: accessor.getter,
                        setter: accessor.setter,
                        generator: false,
                        modifiers: mods,
                        name,
                        call_sig,
                        overloads: overloads_node,
                        body,
                    },
                    start,
                ));
            }
            if accessor.getter || accessor.setter {
                self.reporter.overload_error(
                    member_start,
                    "overload is not allowed to getter and setter",
                );
            }
            let overload = self.node(
                NodeKind::MemberFunctionOverload {
                    getter: false,
                    setter: false,
                    generator: false,
                    modifiers: mods,
                    name,
                    call_sig,
                },
                member_start,
            );
            overloads.push(overload);
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else {
                return Err(self.err_cur("';' expected"));
            }
            first = false;
        }
    }

    // Generator methods: `*name(...)`. The leading `*` of the first member
    // is consumed by the caller.
    fn parse_generator_method_overloads(&mut self, first_mods: NodeId) -> ParseResult {
        let start = self.cur.pos;
        let mut overloads: Vec<NodeId> = Vec::new();
        let mut mods = first_mods;
        let mut first = true;
        loop {
            if !first {
                if !self.is_member_function_overloads_begin() && !self.cur.is(TokenKind::Mul) {
                    return Err(self.err_cur("incomplete generator method definition"));
                }
                mods = self.parse_field_modifiers()?;
                if !self.consume_if(TokenKind::Mul) {
                    self.reporter.overload_error(
                        self.cur.pos,
                        "a generator function overload must be a generator",
                    );
                }
            }
            if self.cur.kind.is_keyword() {
                self.cur.kind = TokenKind::Identifier;
            }
            let member_start = self.cur.pos;
            let name = self.parse_identifier()?;
            let call_sig = self.parse_call_signature(false, false)?;
            self.validate_overload_chain(name, mods, true, &overloads);
            if self.cur.is(TokenKind::LeftBrace) {
                let body =
                    self.with_context(ContextState::Generator, |p| p.parse_function_body())?;
                let overloads_node = if overloads.is_empty() {
                    None
                } else {
                    Some(self.node(NodeKind::MemberFunctionOverloads { overloads }, start))
                };
                return Ok(self.node(
                    NodeKind::MemberFunction {
                        getter: false,
                        setter: false,
                        generator: true,
                        modifiers: mods,
                        name,
                        call_sig,
                        overloads: overloads_node,
                        body,
                    },
                    start,
                ));
            }
            let overload = self.node(
                NodeKind::MemberFunctionOverload {
                    getter: false,
                    setter: false,
                    generator: true,
                    modifiers: mods,
                    name,
                    call_sig,
                },
                member_start,
            );
            overloads.push(overload);
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else {
                return Err(self.err_cur("';' expected"));
            }
            first = false;
        }
    }

    fn parse_member_variable(&mut self, mods: NodeId) -> ParseResult {
        let start = self.cur.pos;
        if self.cur.kind.is_keyword() {
            self.cur.kind = TokenKind::Identifier;
        }
        let name = self.parse_identifier()?;
        let type_expr = if self.consume_if(TokenKind::Colon) {
            Some(self.parse_type_expression()?)
        } else {
            None
        };
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(self.node(
            NodeKind::MemberVariable {
                modifiers: mods,
                name,
                type_expr,
                initializer,
            },
            start,
        ))
    }

    // ----- overload validation --------------------------------------------

    /// Collect the modifier levels of a `ClassFieldModifiers` node, sorted
    /// so comparison ignores the written order.
    fn modifier_levels(&self, mods: NodeId) -> Vec<TokenKind> {
        let mut levels: Vec<TokenKind> = self
            .arena
            .children(mods)
            .iter()
            .filter_map(|&child| match self.arena.kind(child) {
                NodeKind::ClassFieldAccessLevel { level } => Some(*level),
                _ => None,
            })
            .collect();
        levels.sort_by_key(|k| *k as u32);
        levels
    }

    /// Compare a new overload-chain member against the last recorded
    /// overload: exact name, exact modifier set, matching generator-ness.
    fn validate_overload_chain(
        &mut self,
        name: NodeId,
        mods: NodeId,
        generator: bool,
        overloads: &[NodeId],
    ) {
        let Some(&last) = overloads.last() else {
            return;
        };
        let NodeKind::MemberFunctionOverload {
            name: last_name,
            modifiers: last_mods,
            generator: last_generator,
            ..
        } = *self.arena.kind(last)
        else {
            return;
        };
        let name_pos = self.arena.pos(name);
        if self.arena.name_atom(name) != self.arena.name_atom(last_name) {
            self.reporter
                .overload_error(name_pos, "member function overload must have a same name");
        }
        if self.modifier_levels(mods) != self.modifier_levels(last_mods) {
            self.reporter
                .overload_error(name_pos, "member function overload must have same modifiers");
        }
        if generator != last_generator {
            self.reporter.overload_error(
                name_pos,
                "a generator function overload must be a generator",
            );
        }
    }

    /// Getters take no parameters and return a value; setters take exactly
    /// one parameter and return nothing.
    pub(crate) fn validate_accessor_shape(&mut self, accessor: AccessorInfo, call_sig: NodeId) {
        if !accessor.getter && !accessor.setter {
            return;
        }
        let pos = self.arena.pos(call_sig);
        let (param_count, return_name) = self.call_signature_shape(call_sig);
        let void_like = return_name == Some(self.ctx_atoms.void_)
            || return_name == Some(self.ctx_atoms.null);
        if accessor.getter {
            if param_count > 0 {
                self.reporter.overload_error(
                    pos,
                    "the formal parameter of getter function must be empty",
                );
            }
            if void_like {
                self.reporter
                    .overload_error(pos, "getter function must return value");
            }
        }
        if accessor.setter {
            if param_count != 1 {
                self.reporter
                    .overload_error(pos, "the setter function allowed only one parameter");
            }
            if return_name.is_some() && !void_like {
                self.reporter
                    .overload_error(pos, "setter function must not return value");
            }
        }
    }

    /// Parameter count and simple return-type name of a call signature.
    fn call_signature_shape(&self, call_sig: NodeId) -> (usize, Option<tsf_common::Atom>) {
        let NodeKind::CallSignature {
            params,
            return_type,
            ..
        } = self.arena.kind(call_sig)
        else {
            return (0, None);
        };
        let count = match self.arena.kind(*params) {
            NodeKind::ParamList { params } => params.len(),
            _ => 0,
        };
        let return_name = return_type.and_then(|ty| match self.arena.kind(ty) {
            NodeKind::SimpleTypeExpr { name } => self.arena.name_atom(*name),
            _ => None,
        });
        (count, return_name)
    }

    // ----- functions ------------------------------------------------------

    // FunctionOverloads: consecutive body-less `function name(...)`
    // signatures attached to the following implementation.
    pub(crate) fn parse_function_overloads(&mut self, declaration: bool) -> ParseResult {
        let start = self.cur.pos;
        let mut overloads: Vec<NodeId> = Vec::new();
        loop {
            if !self.cur.is(TokenKind::Function) {
                let pos = overloads
                    .last()
                    .map_or(self.prev.pos, |&o| self.arena.pos(o));
                return Err(self.err_at(pos, "incomplete function definition"));
            }
            let member_start = self.cur.pos;
            self.next(); // function
            let generator = self.consume_if(TokenKind::Mul);
            let name = if self.cur.is(TokenKind::Identifier) {
                Some(self.parse_identifier()?)
            } else {
                None
            };
            if declaration && name.is_none() {
                return Err(self.err_cur("function name required"));
            }
            let call_sig = self.parse_call_signature(false, false)?;
            self.validate_function_overload_chain(name, generator, &overloads);
            if self.cur.is(TokenKind::LeftBrace) {
                let context = if generator {
                    ContextState::Generator
                } else {
                    ContextState::Function
                };
                let body = self.with_context(context, |p| p.parse_function_body())?;
                let overloads_node = if overloads.is_empty() {
                    None
                } else {
                    Some(self.node(NodeKind::FunctionOverloads { overloads }, start))
                };
                let node = self.node(
                    NodeKind::Function {
                        getter: false,
                        setter: false,
                        generator,
                        overloads: overloads_node,
                        name,
                        call_sig,
                        body: Some(body),
                    },
                    start,
                );
                if declaration {
                    if let Some(name_node) = name {
                        self.declare_binding(name_node, SymbolType::VariableName, node);
                    }
                }
                return Ok(node);
            }
            if !declaration {
                return Err(self.err_cur("function body expected"));
            }
            let Some(name_node) = name else {
                return Err(self.err_cur("function name required"));
            };
            let overload = self.node(
                NodeKind::FunctionOverload {
                    generator,
                    name: name_node,
                    call_sig,
                },
                member_start,
            );
            overloads.push(overload);
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else {
                return Err(self.err_cur("';' expected"));
            }
        }
    }

    fn validate_function_overload_chain(
        &mut self,
        name: Option<NodeId>,
        generator: bool,
        overloads: &[NodeId],
    ) {
        let Some(&last) = overloads.last() else {
            return;
        };
        let NodeKind::FunctionOverload {
            name: last_name,
            generator: last_generator,
            ..
        } = *self.arena.kind(last)
        else {
            return;
        };
        let pos = name.map_or(self.cur.pos, |n| self.arena.pos(n));
        let name_atom = name.and_then(|n| self.arena.name_atom(n));
        if name_atom != self.arena.name_atom(last_name) {
            self.reporter
                .overload_error(pos, "function overload must have a same name");
        }
        if generator != last_generator {
            self.reporter
                .overload_error(pos, "a generator function overload must be a generator");
        }
    }

    /// Function body block. The function/generator context frame is pushed
    /// by the caller so arrow bodies and methods compose.
    pub(crate) fn parse_function_body(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        let scope = self.push_scope();
        self.balancer.open_brace_found();
        self.next();
        let mut statements = Vec::new();
        let result = self.parse_statement_list_into(&mut statements, TokenKind::RightBrace);
        self.pop_scope();
        result?;
        self.balancer.close_brace_found();
        self.next(); // }
        Ok(self.node(NodeKind::Block { scope, statements }, start))
    }
}
