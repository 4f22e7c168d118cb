//! Type expression grammar.
//!
//! Type parameter and argument lists run with generic-type scan mode
//! enabled so `>` never merges into shift operators; enter/exit pairs are
//! balanced on every path out.

use super::{ParseResult, Parser};
use crate::ast::{NodeId, NodeKind};
use crate::scope::SymbolType;
use tsf_common::SourcePosition;
use tsf_scanner::TokenKind;

impl<'a> Parser<'a> {
    // TypeParameters: < TypeParameter (, TypeParameter)* >
    // TypeParameter: Identifier ('extends' Type)?
    pub(crate) fn parse_type_parameters(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.scanner.enable_generic_type_scan();
        let result = self.parse_type_parameters_inner(start);
        self.scanner.disable_generic_type_scan();
        result
    }

    fn parse_type_parameters_inner(&mut self, start: SourcePosition) -> ParseResult {
        self.next(); // <
        let mut params = Vec::new();
        loop {
            match self.cur.kind {
                TokenKind::Identifier => {
                    let name = self.parse_identifier()?;
                    if self.cur.is(TokenKind::Extends) {
                        let constraint_start = self.arena.pos(name);
                        self.next();
                        let constraint = self.parse_type_expression()?;
                        params.push(self.node(
                            NodeKind::TypeConstraints { name, constraint },
                            constraint_start,
                        ));
                    } else {
                        params.push(name);
                    }
                }
                TokenKind::Greater => {
                    if params.is_empty() {
                        return Err(self.err_cur("type parameter expected"));
                    }
                    self.next();
                    return Ok(self.node(NodeKind::TypeParameters { params }, start));
                }
                TokenKind::Comma => {
                    self.next();
                }
                _ => return Err(self.unexpected_token()),
            }
        }
    }

    // TypeExpression: Type ('|' Type)*
    pub(crate) fn parse_type_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let first = self.parse_type()?;
        if !self.cur.is(TokenKind::BitOr) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.consume_if(TokenKind::BitOr) {
            types.push(self.parse_type()?);
        }
        Ok(self.node(NodeKind::UnionTypeExpr { types }, start))
    }

    // Type:
    //   TypeReference | TypeQuery | ObjectType | FunctionType |
    //   ConstructorType, each with array suffixes
    pub(crate) fn parse_type(&mut self) -> ParseResult {
        if self.cur.one_of(&[
            TokenKind::Void,
            TokenKind::Undefined,
            TokenKind::Null,
            TokenKind::Nan,
        ]) {
            // Predefined names usable in type positions.
            self.cur.kind = TokenKind::Identifier;
        }
        match self.cur.kind {
            TokenKind::New => {
                let start = self.cur.pos;
                self.next();
                let call_sig = self.parse_call_signature(false, true)?;
                Ok(self.node(NodeKind::ConstructSignature { call_sig }, start))
            }
            TokenKind::Typeof => {
                let query = self.parse_type_query_expression()?;
                self.parse_array_type(query)
            }
            TokenKind::Identifier => {
                let referenced = self.parse_referenced_type()?;
                self.parse_array_type(referenced)
            }
            TokenKind::LeftParen | TokenKind::Less => {
                let start = self.cur.pos;
                let type_params = if self.cur.is(TokenKind::Less) {
                    Some(self.parse_type_parameters()?)
                } else {
                    None
                };
                let params = self.parse_parameter_list(false)?;
                if !self.cur.is(TokenKind::Arrow) {
                    return Err(self.err_cur("'=>' expected"));
                }
                self.next();
                let return_type = self.parse_type_expression()?;
                let function_type = self.node(
                    NodeKind::FunctionTypeExpr {
                        type_params,
                        params,
                        return_type,
                    },
                    start,
                );
                self.parse_array_type(function_type)
            }
            TokenKind::LeftBrace => {
                let object_type = self.parse_object_type_expression()?;
                self.parse_array_type(object_type)
            }
            _ => Err(self.unexpected_token()),
        }
    }

    // TypeReference: TypeName TypeArguments?
    // TypeName: Identifier ('.' Identifier)*
    pub(crate) fn parse_referenced_type(&mut self) -> ParseResult {
        let start = self.cur.pos;
        let mut name = self.parse_identifier()?;
        if self.cur.is(TokenKind::Dot) {
            name = self.parse_get_prop_or_elem(name, start, true)?;
        }
        if self.cur.is(TokenKind::Less) && !self.prev.line_break_before_next {
            let type_args = self.parse_type_arguments()?;
            return Ok(self.node(NodeKind::GenericTypeExpr { name, type_args }, start));
        }
        Ok(self.node(NodeKind::SimpleTypeExpr { name }, start))
    }

    // TypeQuery: 'typeof' Identifier ('.' IdentifierName)*
    pub(crate) fn parse_type_query_expression(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.next(); // typeof
        if !self.cur.is(TokenKind::Identifier) {
            return Err(self.err_cur("'identifier' expected"));
        }
        let mut name = self.parse_identifier()?;
        if self.cur.is(TokenKind::Dot) {
            name = self.parse_get_prop_or_elem(name, start, true)?;
        }
        Ok(self.node(NodeKind::TypeQuery { name }, start))
    }

    // TypeArguments: < TypeExpression (, TypeExpression)* >
    pub(crate) fn parse_type_arguments(&mut self) -> ParseResult {
        let start = self.cur.pos;
        self.scanner.enable_generic_type_scan();
        let result = self.parse_type_arguments_inner(start);
        self.scanner.disable_generic_type_scan();
        result
    }

    fn parse_type_arguments_inner(&mut self, start: SourcePosition) -> ParseResult {
        self.next(); // <
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type_expression()?);
            if self.consume_if(TokenKind::Comma) {
                continue;
            }
            if self.cur.is(TokenKind::Greater) {
                self.next();
                return Ok(self.node(NodeKind::TypeArguments { args }, start));
            }
            return Err(self.err_cur("'>' or ',' expected"));
        }
    }

    // ArrayType: ElementType ('[' ']')*
    pub(crate) fn parse_array_type(&mut self, element: NodeId) -> ParseResult {
        if !self.cur.is(TokenKind::LeftBracket) {
            return Ok(element);
        }
        let start = self.arena.pos(element);
        self.next();
        if !self.cur.is(TokenKind::RightBracket) {
            return Err(self.err_cur("']' expected"));
        }
        self.next();
        let array = self.node(NodeKind::ArrayTypeExpr { element }, start);
        self.parse_array_type(array)
    }

    // ObjectType: '{' TypeMember* '}'
    pub(crate) fn parse_object_type_expression(&mut self) -> ParseResult {
        if !self.cur.is(TokenKind::LeftBrace) {
            return Err(self.err_cur("'{' expected"));
        }
        let start = self.cur.pos;
        self.balancer.open_brace_found();
        self.next();
        let mut members = Vec::new();
        while !self.cur.is(TokenKind::RightBrace) {
            self.check_eof()?;
            let result = self.parse_object_type_element();
            if let Some(member) =
                self.skip_token_or(result, &[TokenKind::RightBrace, TokenKind::Comma])?
            {
                members.push(member);
            }
            if self.is_line_termination() {
                self.consume_line_terminator();
            } else if self.consume_if(TokenKind::Comma) {
                // Comma separators are tolerated between members.
            } else if !self.cur.is(TokenKind::RightBrace)
                && !self.prev.is(TokenKind::RightBrace)
            {
                self.reporter.syntax_error(self.cur.pos, "';' expected");
                break;
            }
        }
        self.balancer.close_brace_found();
        self.expect(TokenKind::RightBrace)?;
        Ok(self.node(NodeKind::ObjectTypeExpr { members }, start))
    }

    // TypeMember: property, call, construct, index or method signature.
    pub(crate) fn parse_object_type_element(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if self.cur.is(TokenKind::New) {
            self.next();
            let call_sig = self.parse_call_signature(false, true)?;
            return Ok(self.node(NodeKind::ConstructSignature { call_sig }, start));
        }
        if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
            return self.parse_call_signature(false, true);
        }
        if self.cur.is(TokenKind::LeftBracket) {
            return self.parse_index_signature();
        }

        let accessor = self.parse_accessor();
        let generator = self.consume_if(TokenKind::Mul);
        let key = self.parse_property_name()?;
        if let Some(atom) = self.arena.name_atom(key) {
            self.declare(atom, SymbolType::PropertyName, key);
        }
        let optional = self.consume_if(TokenKind::QuestionMark);

        if self.cur.one_of(&[TokenKind::LeftParen, TokenKind::Less]) {
            if !self.arena.is_name(key) {
                let pos = self.arena.pos(key);
                return Err(self.err_at(pos, "invalid method name"));
            }
            let call_sig = self.parse_call_signature(false, false)?;
            return Ok(self.node(
                NodeKind::MethodSignature {
                    optional,
                    getter: accessor.getter,
                    setter: accessor.setter,
                    generator,
                    name: key,
                    call_sig,
                },
                start,
            ));
        }
        if self.consume_if(TokenKind::Colon) {
            let type_expr = self.parse_type_expression()?;
            return Ok(self.node(
                NodeKind::PropertySignature {
                    optional,
                    name: key,
                    type_expr: Some(type_expr),
                },
                start,
            ));
        }
        Ok(self.node(
            NodeKind::PropertySignature {
                optional,
                name: key,
                type_expr: None,
            },
            start,
        ))
    }

    // CallSignature: TypeParameters? ( ParameterList ) (':' Type)?
    //
    // With `arrow_annotation` the return type is written `=> Type` and is
    // mandatory (function type literals and ambient signatures).
    pub(crate) fn parse_call_signature(
        &mut self,
        accesslevel_allowed: bool,
        arrow_annotation: bool,
    ) -> ParseResult {
        let start = self.cur.pos;
        let type_params = if self.cur.is(TokenKind::Less) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        if !self.cur.is(TokenKind::LeftParen) {
            return Err(self.err_cur("'(' expected"));
        }
        let params = self.parse_parameter_list(accesslevel_allowed)?;
        let return_type = if self.consume_if(TokenKind::Colon) {
            Some(self.parse_type_expression()?)
        } else if arrow_annotation {
            if !self.cur.is(TokenKind::Arrow) {
                return Err(self.err_cur("'=>' expected"));
            }
            self.next();
            Some(self.parse_type_expression()?)
        } else {
            None
        };
        Ok(self.node(
            NodeKind::CallSignature {
                type_params,
                params,
                return_type,
            },
            start,
        ))
    }

    // ParameterList: ( Parameter (, Parameter)* (, RestParameter)? )
    pub(crate) fn parse_parameter_list(&mut self, accesslevel_allowed: bool) -> ParseResult {
        let start = self.cur.pos;
        self.balancer.open_paren_found();
        self.next(); // (
        let mut params = Vec::new();
        if self.cur.is(TokenKind::RightParen) {
            self.balancer.close_paren_found();
            self.next();
            return Ok(self.node(NodeKind::ParamList { params }, start));
        }
        let mut has_rest = false;
        loop {
            self.check_eof()?;
            if has_rest {
                let pos = self.prev.pos;
                return Err(self.err_at(pos, "the rest parameter must be the last parameter"));
            }
            if self.cur.is(TokenKind::Rest) {
                let rest_start = self.cur.pos;
                self.next();
                let param = self.parse_parameter(accesslevel_allowed)?;
                params.push(self.node(NodeKind::RestParam { expr: param }, rest_start));
                has_rest = true;
            } else {
                params.push(self.parse_parameter(accesslevel_allowed)?);
            }
            if self.consume_if(TokenKind::Comma) {
                continue;
            }
            if self.cur.is(TokenKind::RightParen) {
                self.balancer.close_paren_found();
                self.next();
                return Ok(self.node(NodeKind::ParamList { params }, start));
            }
            return Err(self.err_cur("')' or ',' expected in parameter list"));
        }
    }

    // Parameter: AccessLevel? BindingIdentifier '?'? (':' Type)? ('=' Expr)?
    pub(crate) fn parse_parameter(&mut self, accesslevel_allowed: bool) -> ParseResult {
        let start = self.cur.pos;
        let access_level = if self.cur.one_of(&[
            TokenKind::Public,
            TokenKind::Private,
            TokenKind::Protected,
        ]) {
            let level = self.cur.kind;
            if !accesslevel_allowed {
                self.reporter.syntax_error(
                    self.cur.pos,
                    "'public', 'private' and 'protected' not allowed in this context",
                );
            }
            self.next();
            Some(level)
        } else {
            None
        };
        let name = match self.cur.kind {
            TokenKind::LeftBrace | TokenKind::LeftBracket => self.parse_binding_pattern()?,
            _ => self.parse_binding_identifier()?,
        };
        let optional = self.consume_if(TokenKind::QuestionMark);
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
            NodeKind::Parameter {
                access_level,
                name,
                optional,
                type_expr,
                initializer,
            },
            start,
        );
        self.declare_binding(name, SymbolType::VariableName, node);
        Ok(node)
    }

    // IndexSignature: '[' Identifier ':' ('string' | 'number') ']' ':' Type
    pub(crate) fn parse_index_signature(&mut self) -> ParseResult {
        let start = self.cur.pos;
        if !self.cur.is(TokenKind::LeftBracket) {
            return Err(self.err_cur("'[' expected"));
        }
        self.next();
        let name = self.parse_identifier()?;
        if !self.consume_if(TokenKind::Colon) {
            return Err(self.err_cur("the index signature must have a type"));
        }
        let string_key = self.is_contextual(&self.cur.clone(), self.ctx_atoms.string);
        let number_key = self.is_contextual(&self.cur.clone(), self.ctx_atoms.number);
        if !string_key && !number_key {
            return Err(self.err_cur("the index signature must have a type 'string' or 'number'"));
        }
        self.next();
        if !self.consume_if(TokenKind::RightBracket) {
            return Err(self.err_cur("']' expected"));
        }
        if !self.consume_if(TokenKind::Colon) {
            return Err(self.err_cur("':' expected"));
        }
        let type_expr = self.parse_type_expression()?;
        Ok(self.node(
            NodeKind::IndexSignature {
                name,
                type_expr,
                string_key,
            },
            start,
        ))
    }
}
