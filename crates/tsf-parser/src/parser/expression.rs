//! Expression grammar.
//!
//! The speculative orderings here mirror the grammar's covered productions:
//! at `(` or `<` an arrow-function head is attempted before anything else;
//! object/array literals reparse as assignment patterns when an assignment
//! operator follows; `f<...>` commits to a generic call only when `(`
//! follows the type argument list. Every speculation runs between a
//! checkpoint and either a commit or a restore.

use super::{ParseError, ParseResult, Parser};
use crate::ast::{NodeFlags, NodeId, NodeKind};
use crate::scope::SymbolType;
use crate::state::ContextState;
use tsf_scanner::TokenKind;

impl<'a> Parser<'a> {
    // Expression[In, Yield]:
    //   AssignmentExpression
    //   Expression , AssignmentExpression
    pub(crate) fn parse_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let first = self.parse_assignment_expression()?;
        if !self.cur.is(TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.consume_if(TokenKind::Comma) {
            exprs.push(self.parse_assignment_expression()?);
        }
        Ok(self.node(NodeKind::CommaExpr { exprs }, start))
    }

    // AssignmentExpression[In, Yield]:
    //   ConditionalExpression
    //   [+Yield] YieldExpression
    //   ArrowFunction
    //   LeftHandSideExpression AssignmentOperator AssignmentExpression
    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult {
        let cp = self.checkpoint();
        let start = self.cur.pos;

        // An arrow function head also starts with `(` or `<`; try that
        // reading first and fall back on failure.
        if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
            match self.parse_arrow_function_parameters(None) {
                Ok(call_sig) => return self.parse_concise_body(call_sig, start),
                Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                Err(ParseError::Failed) => self.restore(&cp),
            }
        }

        let mut parsed_as_pattern = false;
        let mut expr = if self.cur.is(TokenKind::Yield) {
            if !self.context.is_in_generator() {
                return Err(self.context_err_cur("'yield' only allowed in generators"));
            }
            self.parse_yield_expression()?
        } else {
            match self.parse_conditional_expression() {
                Ok(expr) => {
                    if self.arena.is_name(expr) && self.cur.is(TokenKind::Arrow) {
                        return self.parse_arrow_function(expr, start);
                    }
                    expr
                }
                Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                Err(ParseError::Failed) => {
                    // In ES6 the covered production may still be a
                    // destructuring assignment pattern.
                    if !self.options.language_mode.is_es6() {
                        return Err(ParseError::Failed);
                    }
                    self.restore(&cp);
                    parsed_as_pattern = true;
                    self.parse_assignment_pattern()?
                }
            }
        };

        let op = self.cur.kind;
        if op.is_assignment_op() {
            if !parsed_as_pattern
                && (self.arena.has_object_literal_view(expr)
                    || self.arena.has_array_literal_view(expr))
            {
                self.restore(&cp);
                if !self.options.language_mode.is_es6() {
                    return Err(self.err_cur("invalid left-hand-side expression"));
                }
                expr = self.parse_assignment_pattern()?;
            }
            if !self.arena.is_valid_lhs(expr) {
                return Err(
                    self.err_cur("invalid left hand side expression in 'assignment expression'")
                );
            }
            self.next();
            let value = self.parse_assignment_expression()?;
            let node = self.node(
                NodeKind::Assignment {
                    op,
                    target: expr,
                    value,
                },
                start,
            );
            return Ok(node);
        }
        if parsed_as_pattern {
            return Err(self.err_cur("destructuring assignment must be initialized"));
        }
        Ok(expr)
    }

    // YieldExpression[In]:
    //   yield
    //   yield [no LineTerminator here] AssignmentExpression
    //   yield [no LineTerminator here] * AssignmentExpression
    pub(crate) fn parse_yield_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let line_break_after_yield = self.cur.line_break_before_next;
        self.next();
        if self.consume_if(TokenKind::Mul) {
            let expr = self.parse_assignment_expression()?;
            return Ok(self.node(
                NodeKind::Yield {
                    delegate: true,
                    expr: Some(expr),
                },
                start,
            ));
        }
        if line_break_after_yield || self.is_line_termination() || self.cur.is(TokenKind::RightParen)
        {
            return Ok(self.node(
                NodeKind::Yield {
                    delegate: false,
                    expr: None,
                },
                start,
            ));
        }
        let expr = self.parse_assignment_expression()?;
        Ok(self.node(
            NodeKind::Yield {
                delegate: false,
                expr: Some(expr),
            },
            start,
        ))
    }

    pub(crate) fn parse_arrow_function(&mut self, identifier: NodeId, start: tsf_common::SourcePosition) -> ParseResult {
        let call_sig = self.parse_arrow_function_parameters(Some(identifier))?;
        self.parse_concise_body(call_sig, start)
    }

    /// Parameter list (or single identifier) plus the `=>`.
    pub(crate) fn parse_arrow_function_parameters(
        &mut self,
        identifier: Option<NodeId>,
    ) -> ParseResult {
        let call_sig = if let Some(identifier) = identifier {
            let pos = self.arena.pos(identifier);
            let param = self.node_at(
                NodeKind::Parameter {
                    access_level: None,
                    name: identifier,
                    optional: false,
                    type_expr: None,
                    initializer: None,
                },
                pos,
            );
            let params = self.node_at(NodeKind::ParamList { params: vec![param] }, pos);
            self.node_at(
                NodeKind::CallSignature {
                    type_params: None,
                    params,
                    return_type: None,
                },
                pos,
            )
        } else {
            self.parse_call_signature(false, false)?
        };
        if !self.cur.is(TokenKind::Arrow) {
            return Err(self.err_cur("'=>' expected"));
        }
        self.next();
        Ok(call_sig)
    }

    pub(crate) fn parse_concise_body(
        &mut self,
        call_sig: NodeId,
        start: tsf_common::SourcePosition,
    ) -> ParseResult {
        let body = if self.cur.is(TokenKind::LeftBrace) {
            self.with_context(ContextState::Function, |p| p.parse_function_body())?
        } else {
            self.parse_assignment_expression()?
        };
        Ok(self.node(NodeKind::ArrowFunction { call_sig, body }, start))
    }

    // ConditionalExpression[In, Yield]:
    //   LogicalORExpression
    //   LogicalORExpression ? AssignmentExpression : AssignmentExpression
    pub(crate) fn parse_conditional_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let cond = self.parse_binary_expression(u8::MAX)?;
        if !self.consume_if(TokenKind::QuestionMark) {
            return Ok(cond);
        }
        let when_true = self.parse_assignment_expression()?;
        self.expect(TokenKind::Colon)?;
        let when_false = self.parse_assignment_expression()?;
        let node = self.node(
            NodeKind::Ternary {
                cond,
                when_true,
                when_false,
            },
            start,
        );
        self.arena.mark_invalid_lhs(node);
        Ok(node)
    }

    /// Precedence-climbing loop over the binary operator priority table.
    /// `max_priority` bounds which operators may be consumed at this level.
    pub(crate) fn parse_binary_expression(&mut self, max_priority: u8) -> ParseResult {
        let start = self.cur.pos;
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = self.cur.kind;
            if op == TokenKind::In && self.context.no_in() {
                break;
            }
            let priority = op.operand_priority();
            if priority == 0 || priority > max_priority {
                break;
            }
            self.next();
            // Left-associativity: the right side only takes strictly
            // tighter-binding operators.
            let right = self.parse_binary_expression(priority - 1)?;
            left = self.node(NodeKind::Binary { op, left, right }, start);
            self.arena.mark_invalid_lhs(left);
        }
        Ok(left)
    }

    // UnaryExpression[Yield]:
    //   PostfixExpression
    //   delete/void/typeof/++/--/+/-/~/! UnaryExpression
    //   < Type > UnaryExpression   (type assertion)
    pub(crate) fn parse_unary_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let op = self.cur.kind;
        match op {
            TokenKind::Delete
            | TokenKind::Void
            | TokenKind::Typeof
            | TokenKind::Increment
            | TokenKind::Decrement
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::BitNot
            | TokenKind::Not => {
                self.next();
                let operand = self.parse_unary_expression()?;
                Ok(self.node(NodeKind::Unary { op, operand }, start))
            }
            TokenKind::Less => {
                let target_type = self.parse_type_arguments()?;
                let expr = self.parse_unary_expression()?;
                Ok(self.node(NodeKind::Cast { target_type, expr }, start))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    // PostfixExpression[Yield]:
    //   LeftHandSideExpression (++ | --)?
    pub(crate) fn parse_postfix_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let operand = self.parse_left_hand_side_expression()?;
        if self.cur.one_of(&[TokenKind::Increment, TokenKind::Decrement]) {
            let op = self.cur.kind;
            self.next();
            let node = self.node(NodeKind::Postfix { operand, op }, start);
            self.arena.mark_invalid_lhs(node);
            return Ok(node);
        }
        Ok(operand)
    }

    // LeftHandSideExpression[Yield]:
    //   NewExpression | CallExpression
    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult {
        if self.cur.is(TokenKind::New) {
            let cp = self.checkpoint();
            self.next();
            let double_new = self.cur.is(TokenKind::New);
            self.restore(&cp);
            if double_new {
                return self.parse_new_expression();
            }
        }
        self.parse_call_expression()
    }

    // `new new ... X(...)` chains.
    pub(crate) fn parse_new_expression(&mut self) -> ParseResult {
        let cp = self.checkpoint();
        let start = self.cur.pos;
        self.next();
        if self.cur.is(TokenKind::New) {
            let target = self.parse_new_expression()?;
            return Ok(self.node(
                NodeKind::NewCall {
                    target,
                    type_args: None,
                    args: None,
                },
                start,
            ));
        }
        self.restore(&cp);
        self.parse_member_expression()
    }

    // CallExpression[Yield]:
    //   MemberExpression TypeArguments? Arguments
    //   super Arguments | super . IdentifierName
    //   CallExpression Arguments | [ Expression ] | . IdentifierName
    //   CallExpression TemplateLiteral
    pub(crate) fn parse_call_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let target = if self.cur.is(TokenKind::Super) {
            let sup = self.node_at(NodeKind::Super, self.cur.pos);
            self.next();
            if self.cur.is(TokenKind::Dot) {
                self.next();
                let prop = self.parse_identifier_name()?;
                self.node(
                    NodeKind::GetProp {
                        target: sup,
                        prop,
                    },
                    start,
                )
            } else {
                sup
            }
        } else {
            self.parse_member_expression()?
        };

        if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
            let (type_args, args) = match self.parse_arguments() {
                Ok(parsed) => parsed,
                Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                Err(ParseError::Failed) => return Ok(target),
            };
            self.arena.mark_invalid_lhs(target);
            let mut call = self.node(
                NodeKind::Call {
                    target,
                    type_args,
                    args,
                },
                start,
            );
            self.arena.mark_invalid_lhs(call);
            loop {
                match self.cur.kind {
                    TokenKind::LeftParen | TokenKind::Less => {
                        let (type_args, args) = match self.parse_arguments() {
                            Ok(parsed) => parsed,
                            Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                            Err(ParseError::Failed) => return Ok(call),
                        };
                        call = self.node(
                            NodeKind::Call {
                                target: call,
                                type_args,
                                args,
                            },
                            start,
                        );
                        self.arena.mark_invalid_lhs(call);
                    }
                    TokenKind::LeftBracket | TokenKind::Dot => {
                        call = self.parse_get_prop_or_elem(call, start, false)?;
                    }
                    _ => return Ok(call),
                }
            }
        } else if self
            .cur
            .one_of(&[TokenKind::TemplateLiteral, TokenKind::TemplateHead])
        {
            // Tagged template.
            let template = self.parse_template_literal()?;
            let call = self.node(
                NodeKind::Call {
                    target,
                    type_args: None,
                    args: vec![template],
                },
                start,
            );
            self.arena.mark_invalid_lhs(call);
            return Ok(call);
        }
        Ok(target)
    }

    // Arguments[Yield]:
    //   TypeArguments? ( ArgumentList? )
    //
    // A `<` head only commits when `(` follows the type argument list;
    // otherwise the whole attempt rolls back and fails so the caller can
    // treat `<` as less-than.
    pub(crate) fn parse_arguments(&mut self) -> Result<(Option<NodeId>, Vec<NodeId>), ParseError> {
        let cp = self.checkpoint();
        let type_args = if self.cur.is(TokenKind::Less) {
            match self.parse_type_arguments() {
                Ok(args) => {
                    if !self.cur.is(TokenKind::LeftParen) {
                        self.restore(&cp);
                        return Err(ParseError::Failed);
                    }
                    Some(args)
                }
                Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                Err(ParseError::Failed) => {
                    self.restore(&cp);
                    return Err(ParseError::Failed);
                }
            }
        } else {
            None
        };

        self.balancer.open_paren_found();
        self.next(); // (
        let mut args = Vec::new();
        if self.cur.is(TokenKind::RightParen) {
            self.balancer.close_paren_found();
            self.next();
            return Ok((type_args, args));
        }
        let mut has_rest = false;
        loop {
            if self.cur.is(TokenKind::Rest) {
                let rest_start = self.cur.pos;
                self.next();
                let result = self.parse_assignment_expression();
                if let Some(expr) = self.skip_token_or(result, &[TokenKind::RightParen])? {
                    args.push(self.node(NodeKind::RestParam { expr }, rest_start));
                    has_rest = true;
                }
            } else {
                let result = self.parse_assignment_expression();
                if let Some(expr) = self.skip_token_or(result, &[TokenKind::RightParen])? {
                    args.push(expr);
                }
            }
            if self.cur.is(TokenKind::Comma) {
                if has_rest {
                    return Err(self.err_cur("the spread argument must be the end of arguments"));
                }
                self.next();
                continue;
            }
            if self.cur.is(TokenKind::RightParen) {
                self.balancer.close_paren_found();
                self.next();
                return Ok((type_args, args));
            }
            return Err(self.err_cur("unexpected token in 'arguments'"));
        }
    }

    // MemberExpression[Yield]:
    //   PrimaryExpression suffixes | new MemberExpression Arguments?
    pub(crate) fn parse_member_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if self.cur.is(TokenKind::New) {
            self.next();
            let member = if self.cur.is(TokenKind::Super) {
                let sup = self.node_at(NodeKind::Super, self.cur.pos);
                self.next();
                sup
            } else {
                self.parse_member_expression()?
            };
            if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
                let (type_args, args) = match self.parse_arguments() {
                    Ok(parsed) => parsed,
                    Err(ParseError::Fatal) => return Err(ParseError::Fatal),
                    Err(ParseError::Failed) => return Ok(member),
                };
                let new_call = self.node(
                    NodeKind::NewCall {
                        target: member,
                        type_args,
                        args: Some(args),
                    },
                    start,
                );
                self.arena.mark_invalid_lhs(new_call);
                return self.parse_get_prop_or_elem(new_call, start, false);
            }
            // Parens omitted: `new Foo`.
            return Ok(self.node(
                NodeKind::NewCall {
                    target: member,
                    type_args: None,
                    args: None,
                },
                start,
            ));
        }
        if self.cur.is(TokenKind::Super) {
            let sup = self.node_at(NodeKind::Super, self.cur.pos);
            self.next();
            return self.parse_get_prop_or_elem(sup, start, false);
        }
        let primary = self.parse_primary_expression()?;
        self.parse_get_prop_or_elem(primary, start, false)
    }

    /// Member-access suffix chain: `.name` and `[expr]`. With `dot_only`
    /// only dotted access is consumed (type name positions).
    pub(crate) fn parse_get_prop_or_elem(
        &mut self,
        mut node: NodeId,
        start: tsf_common::SourcePosition,
        dot_only: bool,
    ) -> ParseResult {
        loop {
            match self.cur.kind {
                TokenKind::LeftBracket => {
                    if dot_only {
                        return Ok(node);
                    }
                    self.balancer.open_bracket_found();
                    self.next();
                    let index = self.parse_expression()?;
                    if !self.cur.is(TokenKind::RightBracket) {
                        return Err(self.err_cur("']' expected"));
                    }
                    self.balancer.close_bracket_found();
                    self.next();
                    node = self.node(NodeKind::GetElem { target: node, index }, start);
                }
                TokenKind::Dot => {
                    self.next();
                    let prop = self.parse_identifier_name()?;
                    node = self.node(NodeKind::GetProp { target: node, prop }, start);
                }
                _ => return Ok(node),
            }
        }
    }

    /// An identifier in a property position; keywords are demoted.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult {
        if self.cur.kind.is_keyword() {
            self.cur.kind = TokenKind::Identifier;
        }
        self.parse_identifier()
    }

    // PrimaryExpression[Yield], with regexp re-scan and memoization.
    pub(crate) fn parse_primary_expression(&mut self) -> ParseResult {
        // A `/` here is grammatically a regular expression.
        if let Some(regexp) = self
            .scanner
            .check_regular_expression(&self.cur, &mut self.reporter)
        {
            self.cur = regexp;
        }
        let start_offset = self.cur.pos.start_offset;
        if let Some(replayed) = self.memoized(start_offset) {
            return replayed;
        }
        let result = self.do_parse_primary_expression();
        self.memoize(start_offset, result);
        result
    }

    fn do_parse_primary_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        match self.cur.kind {
            TokenKind::Identifier => self.parse_identifier_reference(),
            TokenKind::This => {
                let node = self.node_at(NodeKind::This, start);
                self.next();
                Ok(node)
            }
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::LeftBracket => self.parse_array_initializer(),
            TokenKind::LeftParen => {
                let cp = self.checkpoint();
                self.next();
                if self.cur.is(TokenKind::For) {
                    self.restore(&cp);
                    return self.parse_generator_comprehension();
                }
                self.balancer.open_paren_found();
                let expr = self.parse_expression()?;
                if self.cur.is(TokenKind::RightParen) {
                    self.balancer.close_paren_found();
                    self.next();
                    return Ok(expr);
                }
                Err(self.err_cur("')' expected"))
            }
            TokenKind::RegexpLiteral => {
                let value = self.cur.value.expect("regexp token carries its text");
                let node = self.node_at(NodeKind::Regexp { value }, start);
                self.next();
                Ok(node)
            }
            TokenKind::TemplateLiteral | TokenKind::TemplateHead => self.parse_template_literal(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::Class => self.parse_class_declaration(),
            _ => self.parse_value_literal(),
        }
    }

    pub(crate) fn parse_value_literal(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let kind = match self.cur.kind {
            TokenKind::True => NodeKind::True,
            TokenKind::False => NodeKind::False,
            TokenKind::Null => NodeKind::Null,
            TokenKind::Undefined => NodeKind::Undefined,
            TokenKind::Nan => NodeKind::Nan,
            TokenKind::NumericLiteral | TokenKind::OctalLiteral | TokenKind::BinaryLiteral => {
                NodeKind::Number {
                    value: self.cur.value.expect("number token carries its text"),
                }
            }
            TokenKind::StringLiteral => NodeKind::StringLiteral {
                value: self.cur.value.expect("string token carries its text"),
            },
            _ => return Err(self.unexpected_token()),
        };
        let node = self.node_at(kind, start);
        self.next();
        Ok(node)
    }

    pub(crate) fn parse_identifier_reference(&mut self) -> ParseResult {
        self.parse_identifier()
    }

    /// A plain identifier token to a `Name` node.
    pub(crate) fn parse_identifier(&mut self) -> ParseResult {
        if !self.cur.is(TokenKind::Identifier) {
            return Err(self.err_cur("'identifier' expected"));
        }
        let name = self.cur.value.expect("identifier token carries its text");
        let node = self.node_at(NodeKind::Name { name }, self.cur.pos);
        self.next();
        Ok(node)
    }

    pub(crate) fn parse_string_literal(&mut self) -> ParseResult {
        if !self.cur.is(TokenKind::StringLiteral) {
            return Err(self.err_cur("string literal expected"));
        }
        let value = self.cur.value.expect("string token carries its text");
        let node = self.node_at(NodeKind::StringLiteral { value }, self.cur.pos);
        self.next();
        Ok(node)
    }

    // TemplateLiteral[Yield]: whole literals are one token; substitutions
    // re-enter the scanner for each continuation.
    pub(crate) fn parse_template_literal(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let mut parts = Vec::new();
        if self.cur.is(TokenKind::TemplateLiteral) {
            let value = self.cur.value.expect("template token carries its text");
            parts.push(self.node_at(NodeKind::TemplateChars { value }, start));
            self.next();
            return Ok(self.node(NodeKind::TemplateLiteral { parts }, start));
        }
        if !self.cur.is(TokenKind::TemplateHead) {
            return Err(self.err_cur("template literal expected"));
        }
        let value = self.cur.value.expect("template token carries its text");
        parts.push(self.node_at(NodeKind::TemplateChars { value }, self.cur.pos));
        loop {
            self.next(); // first token of the substitution expression
            let expr = self.parse_expression()?;
            parts.push(expr);
            if !self.cur.is(TokenKind::RightBrace) {
                return Err(self.err_cur("'}' expected in template substitution"));
            }
            let continuation = self
                .scanner
                .re_scan_template_continuation(&self.cur, &mut self.reporter);
            self.cur = continuation;
            if self.cur.is(TokenKind::Illegal) {
                return Err(ParseError::Failed);
            }
            let value = self.cur.value.expect("template token carries its text");
            parts.push(self.node_at(NodeKind::TemplateChars { value }, self.cur.pos));
            if self.cur.is(TokenKind::TemplateTail) {
                self.next();
                break;
            }
            // TemplateMiddle: next substitution follows.
        }
        Ok(self.node(NodeKind::TemplateLiteral { parts }, start))
    }

    // ----- array and object literals -------------------------------------

    // ArrayInitializer: literal or array comprehension.
    pub(crate) fn parse_array_initializer(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_bracket_found();
        self.next(); // [
        if self.cur.is(TokenKind::For) {
            let comprehension = self.parse_comprehension(false)?;
            if !self.cur.is(TokenKind::RightBracket) {
                return Err(self.err_cur("']' expected"));
            }
            self.balancer.close_bracket_found();
            self.next();
            return Ok(comprehension);
        }
        let mut elements = Vec::new();
        loop {
            match self.cur.kind {
                TokenKind::RightBracket => {
                    self.balancer.close_bracket_found();
                    self.next();
                    break;
                }
                TokenKind::Comma => {
                    // Elision hole.
                    elements.push(self.node_at(NodeKind::Empty, self.cur.pos));
                    self.next();
                    if self.cur.is(TokenKind::RightBracket) {
                        self.balancer.close_bracket_found();
                        self.next();
                        break;
                    }
                    continue;
                }
                TokenKind::Rest => {
                    let rest_start = self.cur.pos;
                    self.next();
                    let expr = self.parse_assignment_expression()?;
                    elements.push(self.node(NodeKind::RestParam { expr }, rest_start));
                }
                TokenKind::Eof => return Err(self.unexpected_end_of_input()),
                _ => {
                    elements.push(self.parse_assignment_expression()?);
                }
            }
            if self.cur.is(TokenKind::Comma) {
                self.next();
            } else if self.cur.is(TokenKind::RightBracket) {
                self.balancer.close_bracket_found();
                self.next();
                break;
            } else {
                return Err(self.err_cur("unexpected token in 'array literal'"));
            }
        }
        Ok(self.node(NodeKind::ArrayLiteral { elements }, start))
    }

    pub(crate) fn parse_object_literal(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_brace_found();
        self.next(); // {
        let mut properties = Vec::new();
        while !self.cur.is(TokenKind::RightBrace) {
            self.check_eof()?;
            let result = self.parse_property_definition();
            if let Some(prop) =
                self.skip_token_or(result, &[TokenKind::Comma, TokenKind::RightBrace])?
            {
                properties.push(prop);
            }
            if !self.consume_if(TokenKind::Comma) && !self.cur.is(TokenKind::RightBrace) {
                return Err(self.err_cur("',' expected"));
            }
        }
        self.balancer.close_brace_found();
        self.next(); // }
        Ok(self.node(NodeKind::ObjectLiteral { properties }, start))
    }

    // PropertyDefinition:
    //   PropertyName : AssignmentExpression
    //   PropertyName ( method )
    //   get/set PropertyName ( accessor )
    //   IdentifierReference (shorthand)
    pub(crate) fn parse_property_definition(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let accessor = self.parse_accessor();
        let generator = self.consume_if(TokenKind::Mul);
        let key = self.parse_property_name()?;
        if let Some(atom) = self.arena.name_atom(key) {
            self.declare(atom, SymbolType::PropertyName, key);
        }

        if self.cur.is(TokenKind::Colon) {
            self.next();
            let value = self.parse_assignment_expression()?;
            return Ok(self.node(
                NodeKind::Property {
                    key,
                    value: Some(value),
                },
                start,
            ));
        }
        if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
            let call_sig = self.parse_call_signature(false, false)?;
            self.validate_accessor_shape(accessor, call_sig);
            let context = if generator {
                ContextState::Generator
            } else {
                ContextState::Function
            };
            let body = self.with_context(context, |p| p.parse_function_body())?;
            let function = self.node(
                NodeKind::Function {
                    getter: accessor.getter,
                    setter: accessor.setter,
                    generator,
                    overloads: None,
                    name: None,
                    call_sig,
                    body: Some(body),
                },
                start,
            );
            return Ok(self.node(
                NodeKind::Property {
                    key,
                    value: Some(function),
                },
                start,
            ));
        }
        // Shorthand property.
        Ok(self.node(NodeKind::Property { key, value: None }, start))
    }

    pub(crate) fn parse_property_name(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::LeftBracket => self.parse_computed_property_name(),
            TokenKind::StringLiteral => self.parse_string_literal(),
            TokenKind::NumericLiteral | TokenKind::OctalLiteral | TokenKind::BinaryLiteral => {
                self.parse_value_literal()
            }
            _ => self.parse_identifier_name(),
        }
    }

    pub(crate) fn parse_computed_property_name(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // [
        let expr = self.parse_assignment_expression()?;
        if !self.cur.is(TokenKind::RightBracket) {
            return Err(self.err_cur("']' expected"));
        }
        self.next();
        Ok(self.node(NodeKind::ComputedPropertyName { expr }, start))
    }

    // ----- comprehensions -------------------------------------------------

    pub(crate) fn parse_generator_comprehension(&mut self) -> ParseResult {
        self.balancer.open_paren_found();
        self.next(); // (
        let comprehension = self.parse_comprehension(true)?;
        if !self.cur.is(TokenKind::RightParen) {
            return Err(self.err_cur("')' expected"));
        }
        self.balancer.close_paren_found();
        self.next();
        Ok(comprehension)
    }

    /// ComprehensionFor clause followed by any number of further for/if
    /// clauses and the body expression.
    pub(crate) fn parse_comprehension(&mut self, generator: bool) -> ParseResult {
        let start = self.cur.pos;
        let mut parts = vec![self.parse_comprehension_for()?];
        loop {
            match self.cur.kind {
                TokenKind::For => parts.push(self.parse_comprehension_for()?),
                TokenKind::If => parts.push(self.parse_comprehension_if()?),
                _ => {
                    parts.push(self.parse_assignment_expression()?);
                    break;
                }
            }
        }
        Ok(self.node(NodeKind::Comprehension { generator, parts }, start))
    }

    fn parse_comprehension_for(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;
        let binding = self.parse_for_binding()?;
        let of = self.ctx_atoms.of;
        if !self.is_contextual(&self.cur.clone(), of) {
            return Err(self.err_cur("'of' expected"));
        }
        self.next();
        let target = self.parse_assignment_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(self.node(NodeKind::ComprehensionFor { binding, target }, start))
    }

    fn parse_comprehension_if(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LeftParen)?;
        let cond = self.parse_assignment_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(self.node(NodeKind::ComprehensionIf { cond }, start))
    }

    /// Binding of a comprehension/for-in/for-of head without `var`.
    pub(crate) fn parse_for_binding(&mut self) -> ParseResult {
        match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_binding_pattern(),
            _ => {
                let binding = self.parse_binding_identifier()?;
                Ok(binding)
            }
        }
    }

    // ----- destructuring assignment patterns ------------------------------

    /// Reparse of a covered object/array literal as an assignment pattern.
    pub(crate) fn parse_assignment_pattern(&mut self) -> ParseResult {
        let node = match self.cur.kind {
            TokenKind::LeftBrace => self.parse_object_assignment_pattern()?,
            TokenKind::LeftBracket => self.parse_array_assignment_pattern()?,
            _ => return Err(self.err_cur("'{' or '[' expected")),
        };
        Ok(node)
    }

    fn parse_object_assignment_pattern(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // {
        let mut properties = Vec::new();
        while !self.cur.is(TokenKind::RightBrace) {
            self.check_eof()?;
            properties.push(self.parse_assignment_property()?);
            if !self.consume_if(TokenKind::Comma) && !self.cur.is(TokenKind::RightBrace) {
                return Err(self.err_cur("',' expected"));
            }
        }
        self.next(); // }
        let node = self.node(NodeKind::BindingPropList { properties }, start);
        self.arena.get_mut(node).flags |= NodeFlags::VALID_LHS | NodeFlags::OBJECT_LITERAL;
        Ok(node)
    }

    fn parse_array_assignment_pattern(&mut self) -> ParseResult {
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
                    let target = self.parse_destructuring_assignment_target()?;
                    elements.push(self.node(NodeKind::RestParam { expr: target }, rest_start));
                    if !self.cur.is(TokenKind::RightBracket) {
                        return Err(self.err_cur("rest element must be the last element"));
                    }
                    continue;
                }
                TokenKind::Eof => return Err(self.unexpected_end_of_input()),
                _ => {
                    elements.push(self.parse_assignment_element()?);
                }
            }
            if self.cur.is(TokenKind::Comma) {
                self.next();
            } else if self.cur.is(TokenKind::RightBracket) {
                self.next();
                break;
            } else {
                return Err(self.err_cur("unexpected token in 'array assignment pattern'"));
            }
        }
        let node = self.node(NodeKind::BindingArray { elements }, start);
        self.arena.get_mut(node).flags |= NodeFlags::VALID_LHS | NodeFlags::ARRAY_LITERAL;
        Ok(node)
    }

    // AssignmentProperty:
    //   IdentifierReference Initializer?
    //   PropertyName : AssignmentElement
    fn parse_assignment_property(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let key = self.parse_property_name()?;
        if self.consume_if(TokenKind::Colon) {
            let value = self.parse_assignment_element()?;
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
        Ok(self.node(
            NodeKind::BindingElement {
                name: Some(key),
                value: None,
                initializer,
            },
            start,
        ))
    }

    // AssignmentElement: DestructuringAssignmentTarget Initializer?
    fn parse_assignment_element(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let target = self.parse_destructuring_assignment_target()?;
        let initializer = if self.consume_if(TokenKind::Assign) {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        if initializer.is_none() {
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

    // DestructuringAssignmentTarget: LeftHandSideExpression that is a valid
    // target, or a nested pattern.
    pub(crate) fn parse_destructuring_assignment_target(&mut self) -> ParseResult {
        let cp = self.checkpoint();
        let target = self.parse_left_hand_side_expression()?;
        if self.arena.is_valid_lhs(target) {
            return Ok(target);
        }
        if self.arena.has_object_literal_view(target) || self.arena.has_array_literal_view(target)
        {
            self.restore(&cp);
            return self.parse_assignment_pattern();
        }
        Err(self.err_cur("invalid left-hand-side expression"))
    }

    // ----- function literal (expression position) -------------------------

    pub(crate) fn parse_function_literal(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // function
        let generator = self.consume_if(TokenKind::Mul);
        let name = if self.cur.is(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let call_sig = self.parse_call_signature(false, false)?;
        let context = if generator {
            ContextState::Generator
        } else {
            ContextState::Function
        };
        let body = self.with_context(context, |p| p.parse_function_body())?;
        let node = self.node(
            NodeKind::Function {
                getter: false,
                setter: false,
                generator,
                overloads: None,
                name,
                call_sig,
                body: Some(body),
            },
            start,
        );
        if let Some(name_node) = name {
            self.declare_binding(name_node, SymbolType::VariableName, node);
        }
        Ok(node)
    }
}
