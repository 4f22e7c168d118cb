use tsf_common::{CompilerOptions, ErrorKind, LanguageMode, ModuleKind};
use tsf_parser::{NodeId, NodeKind, ParseOutput, Parser, ScopeId, SymbolType};
use tsf_scanner::{Scanner, SourceStream, TokenKind};

fn parse(source: &str) -> ParseOutput {
    parse_with(source, CompilerOptions::default())
}

fn parse_with(source: &str, options: CompilerOptions) -> ParseOutput {
    let stream = SourceStream::from_source("test.ts", source);
    let scanner = Scanner::new(&stream, options);
    let mut parser = Parser::new(scanner, options, false);
    let root = parser.parse().ok();
    parser.into_output(root)
}

fn statements(output: &ParseOutput) -> Vec<NodeId> {
    let root = output.root.expect("parse should produce a root");
    match output.arena.kind(root) {
        NodeKind::FileScope { statements, .. } => statements.clone(),
        other => panic!("root is not a FileScope: {other:?}"),
    }
}

/// The expression of the first expression statement.
fn first_expression(output: &ParseOutput) -> NodeId {
    let stmts = statements(output);
    match output.arena.kind(stmts[0]) {
        NodeKind::ExpressionStatement { expr } => *expr,
        other => panic!("first statement is not an expression statement: {other:?}"),
    }
}

fn text(output: &ParseOutput, id: NodeId) -> String {
    match output.arena.kind(id) {
        NodeKind::Name { name } => output.literals.utf8(*name).to_string(),
        NodeKind::Number { value }
        | NodeKind::StringLiteral { value }
        | NodeKind::TemplateChars { value }
        | NodeKind::Regexp { value } => output.literals.utf8(*value).to_string(),
        other => panic!("node has no literal text: {other:?}"),
    }
}

#[test]
fn binary_expression_builds_left_associative_tree() {
    let output = parse("'a' + \"b\" + `c`;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::Binary { op, left, right } = output.arena.kind(expr) else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, TokenKind::Plus);
    assert!(matches!(
        output.arena.kind(*right),
        NodeKind::TemplateLiteral { .. }
    ));
    let NodeKind::Binary { left: ll, right: lr, .. } = output.arena.kind(*left) else {
        panic!("expected nested binary expression");
    };
    assert_eq!(text(&output, *ll), "a");
    assert_eq!(text(&output, *lr), "b");
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let output = parse("a + b * c;");
    let expr = first_expression(&output);
    let NodeKind::Binary { op, right, .. } = output.arena.kind(expr) else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, TokenKind::Plus);
    assert!(matches!(
        output.arena.kind(*right),
        NodeKind::Binary { op: TokenKind::Mul, .. }
    ));
}

#[test]
fn ternary_expression() {
    let output = parse("a ? 1 : 2;");
    let expr = first_expression(&output);
    assert!(matches!(output.arena.kind(expr), NodeKind::Ternary { .. }));
    assert!(!output.arena.is_valid_lhs(expr));
}

#[test]
fn assignment_is_right_associative() {
    let output = parse("x = y = 1;");
    let expr = first_expression(&output);
    let NodeKind::Assignment { op, value, .. } = output.arena.kind(expr) else {
        panic!("expected assignment");
    };
    assert_eq!(*op, TokenKind::Assign);
    assert!(matches!(
        output.arena.kind(*value),
        NodeKind::Assignment { .. }
    ));
}

#[test]
fn compound_assignment_operators() {
    let output = parse("x += 1;");
    let expr = first_expression(&output);
    assert!(matches!(
        output.arena.kind(expr),
        NodeKind::Assignment { op: TokenKind::AddAssign, .. }
    ));
}

#[test]
fn call_member_chains() {
    let output = parse("a.b.c(1)[0];");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::GetElem { target, .. } = output.arena.kind(expr) else {
        panic!("expected element access at the top");
    };
    assert!(matches!(output.arena.kind(*target), NodeKind::Call { .. }));
}

#[test]
fn comma_expression_collects_operands() {
    let output = parse("a, b, c;");
    let expr = first_expression(&output);
    let NodeKind::CommaExpr { exprs } = output.arena.kind(expr) else {
        panic!("expected comma expression");
    };
    assert_eq!(exprs.len(), 3);
}

#[test]
fn generic_call_commits_when_parens_follow() {
    let output = parse("f<number>(1);");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::Call { type_args, args, .. } = output.arena.kind(expr) else {
        panic!("expected call expression");
    };
    assert!(type_args.is_some());
    assert_eq!(args.len(), 1);
}

#[test]
fn less_than_chain_stays_relational() {
    let output = parse("a < b > c;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    assert!(matches!(
        output.arena.kind(expr),
        NodeKind::Binary { op: TokenKind::Greater, .. }
    ));
}

#[test]
fn new_with_and_without_arguments() {
    let output = parse("new Foo(1); new Bar;");
    let stmts = statements(&output);
    let NodeKind::ExpressionStatement { expr } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(*expr),
        NodeKind::NewCall { args: Some(_), .. }
    ));
    let NodeKind::ExpressionStatement { expr } = output.arena.kind(stmts[1]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(*expr),
        NodeKind::NewCall { args: None, .. }
    ));
}

#[test]
fn unary_and_postfix() {
    let output = parse("typeof x; i++;");
    let stmts = statements(&output);
    let NodeKind::ExpressionStatement { expr } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(*expr),
        NodeKind::Unary { op: TokenKind::Typeof, .. }
    ));
    let NodeKind::ExpressionStatement { expr } = output.arena.kind(stmts[1]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(*expr),
        NodeKind::Postfix { op: TokenKind::Increment, .. }
    ));
}

#[test]
fn identifier_arrow_function() {
    let output = parse("x => x + 1;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    assert!(matches!(
        output.arena.kind(expr),
        NodeKind::ArrowFunction { .. }
    ));
}

#[test]
fn parenthesized_arrow_function_with_types() {
    let output = parse("var f = (a: number, b: number): number => a + b;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn generic_arrow_function() {
    let output = parse("<T>(x: T) => x;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::ArrowFunction { call_sig, .. } = output.arena.kind(expr) else {
        panic!("expected arrow function");
    };
    let NodeKind::CallSignature { type_params, .. } = output.arena.kind(*call_sig) else {
        panic!("expected call signature");
    };
    assert!(type_params.is_some());
}

#[test]
fn lone_type_parameter_list_is_an_error() {
    let output = parse("<T>;");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn parenthesized_expression_is_not_an_arrow_function() {
    let output = parse("(a + 1) * 2;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    assert!(matches!(
        output.arena.kind(expr),
        NodeKind::Binary { op: TokenKind::Mul, .. }
    ));
}

#[test]
fn arrow_body_block_allows_return() {
    let output = parse("var f = (x) => { return x; };");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn regular_expression_in_expression_position() {
    let output = parse("var re = /ab+c/gi;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!("expected var statement");
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!("expected variable");
    };
    let init = initializer.expect("regexp initializer");
    assert_eq!(text(&output, init), "/ab+c/gi");
}

#[test]
fn division_is_not_a_regexp() {
    let output = parse("var q = a / b / c;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn template_literal_with_substitutions() {
    let output = parse("var t = `a${x} and ${y}b`;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!()
    };
    let NodeKind::TemplateLiteral { parts } = output.arena.kind(initializer.unwrap()) else {
        panic!("expected template literal");
    };
    // chars, expr, chars, expr, chars
    assert_eq!(parts.len(), 5);
    assert!(matches!(
        output.arena.kind(parts[1]),
        NodeKind::Name { .. }
    ));
}

#[test]
fn tagged_template_is_a_call() {
    let output = parse("tag`x`;");
    let expr = first_expression(&output);
    assert!(matches!(output.arena.kind(expr), NodeKind::Call { .. }));
}

#[test]
fn object_literal_shorthand_value_and_method() {
    let output = parse("var o = { a, b: 1, m() { return 2; }, 'c': 3, 4: d, [k]: e };");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

/// Property value of the `index`th property of the first `var` initializer.
fn object_property_value(output: &ParseOutput, index: usize) -> NodeId {
    let stmts = statements(output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!("expected var statement");
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!("expected variable");
    };
    let NodeKind::ObjectLiteral { properties } = output.arena.kind(initializer.unwrap())
    else {
        panic!("expected object literal");
    };
    let NodeKind::Property { value, .. } = output.arena.kind(properties[index]) else {
        panic!("expected property");
    };
    value.expect("property carries a value")
}

#[test]
fn object_literal_accessors_carry_their_flags() {
    let output = parse("var o = { get p() { return 1; }, set p(v) {}, m() {} };");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let NodeKind::Function { getter, setter, .. } =
        output.arena.kind(object_property_value(&output, 0))
    else {
        panic!("expected getter function");
    };
    assert!(*getter);
    assert!(!*setter);
    let NodeKind::Function { getter, setter, .. } =
        output.arena.kind(object_property_value(&output, 1))
    else {
        panic!("expected setter function");
    };
    assert!(!*getter);
    assert!(*setter);
    let NodeKind::Function { getter, setter, .. } =
        output.arena.kind(object_property_value(&output, 2))
    else {
        panic!("expected plain method");
    };
    assert!(!*getter);
    assert!(!*setter);
}

#[test]
fn object_literal_getter_shape_is_validated() {
    let output = parse("var o = { get p(x) { return 1; } };");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Overload)
    );
}

#[test]
fn object_literal_setter_shape_is_validated() {
    let output = parse("var o = { set p() {} };");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Overload)
    );
}

#[test]
fn object_literal_property_names_are_recorded() {
    let output = parse("var o = { a: 1, m() {} };");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    for name in ["a", "m"] {
        let atom = output.literals.lookup(name).unwrap();
        assert!(
            output
                .scopes
                .resolve(ScopeId::GLOBAL, atom, SymbolType::PropertyName)
                .is_some(),
            "{name} not recorded as a property name"
        );
    }
}

#[test]
fn array_literal_with_holes_and_spread() {
    let output = parse("var a = [1, , 2, ...rest];");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn object_destructuring_assignment() {
    let output = parse("({ a: x, b } = obj);");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::Assignment { target, .. } = output.arena.kind(expr) else {
        panic!("expected assignment");
    };
    assert!(matches!(
        output.arena.kind(*target),
        NodeKind::BindingPropList { .. }
    ));
}

#[test]
fn array_destructuring_assignment() {
    let output = parse("[a, b] = xs;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let expr = first_expression(&output);
    let NodeKind::Assignment { target, .. } = output.arena.kind(expr) else {
        panic!("expected assignment");
    };
    assert!(matches!(
        output.arena.kind(*target),
        NodeKind::BindingArray { .. }
    ));
}

#[test]
fn destructuring_assignment_rejected_in_es3() {
    let es3 = CompilerOptions::new(LanguageMode::Es3, ModuleKind::TypeScript);
    let output = parse_with("[a, b] = xs;", es3);
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn invalid_assignment_target_is_an_error() {
    let output = parse("a() = 1;");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn type_assertion_cast() {
    let output = parse("var n = <number>value;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(initializer.unwrap()),
        NodeKind::Cast { .. }
    ));
}

#[test]
fn yield_requires_a_generator() {
    let output = parse("function f() { yield 1; }");
    assert!(!output.diagnostics.is_empty());

    let output = parse("function* g() { yield 1; yield* h(); }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn array_comprehension() {
    let output = parse("var a = [for (x of xs) if (x) x];");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!()
    };
    let NodeKind::Comprehension { generator, parts } =
        output.arena.kind(initializer.unwrap())
    else {
        panic!("expected comprehension");
    };
    assert!(!generator);
    assert_eq!(parts.len(), 3); // for, if, body
}

#[test]
fn generator_comprehension() {
    let output = parse("var g = (for (x of xs) x);");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn spread_argument_must_be_last() {
    let output = parse("f(...xs, y);");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn function_expression_named_and_anonymous() {
    let output = parse("var f = function() { return 1; }; var g = function named() {};");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn super_member_access_and_call() {
    let output = parse("class C extends B { m() { super.m(); } }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn memoized_primary_replays_after_backtracking() {
    // The `(a, b)` head is first tried as arrow parameters, rolled back,
    // and reparsed as a parenthesized expression; memoized primaries must
    // replay identically.
    let output = parse("var r = (a, b);");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!()
    };
    let NodeKind::Variable { initializer, .. } = output.arena.kind(bindings[0]) else {
        panic!()
    };
    assert!(matches!(
        output.arena.kind(initializer.unwrap()),
        NodeKind::CommaExpr { .. }
    ));
}
