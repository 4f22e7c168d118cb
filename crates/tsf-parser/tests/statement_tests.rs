use tsf_common::{CompilerOptions, ErrorKind};
use tsf_parser::{NodeId, NodeKind, ParseOutput, Parser, ScopeId, SymbolType};
use tsf_scanner::{Scanner, SourceStream};

fn parse(source: &str) -> ParseOutput {
    let options = CompilerOptions::default();
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

#[test]
fn empty_input_is_an_empty_file_scope() {
    let output = parse("");
    assert!(output.diagnostics.is_empty());
    assert!(statements(&output).is_empty());
}

#[test]
fn comments_and_whitespace_only() {
    let output = parse("  // note\n/* block */\n");
    assert!(output.diagnostics.is_empty());
    assert!(statements(&output).is_empty());
}

#[test]
fn lexical_declaration_with_type_annotation() {
    let output = parse("let x: number = 100;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert_eq!(stmts.len(), 1);
    let NodeKind::LexicalDecl { is_const, bindings } = output.arena.kind(stmts[0]) else {
        panic!("expected lexical declaration");
    };
    assert!(!is_const);
    let NodeKind::Variable {
        binding,
        type_expr,
        initializer,
    } = output.arena.kind(bindings[0])
    else {
        panic!("expected variable binding");
    };
    let name = output.arena.name_atom(*binding).expect("binding is a name");
    assert_eq!(output.literals.utf8(name), "x");
    assert!(matches!(
        output.arena.kind(type_expr.unwrap()),
        NodeKind::SimpleTypeExpr { .. }
    ));
    assert!(matches!(
        output.arena.kind(initializer.unwrap()),
        NodeKind::Number { .. }
    ));
    // The declaration is recorded in the enclosing scope.
    let atom = output.literals.lookup("x").unwrap();
    assert!(
        output
            .scopes
            .resolve(ScopeId::GLOBAL, atom, SymbolType::VariableName)
            .is_some()
    );
}

#[test]
fn const_requires_an_initializer() {
    let output = parse("const c;");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Context)
    );
}

#[test]
fn var_statement_with_multiple_declarations() {
    let output = parse("var a = 1, b, c: string;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::VariableDecl { bindings } = output.arena.kind(stmts[0]) else {
        panic!("expected var statement");
    };
    assert_eq!(bindings.len(), 3);
}

#[test]
fn destructuring_declarations() {
    let output = parse("var [a, , b] = xs; var { c, d: e } = o; let { f = 1 } = o;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    // Every bound name lands in the global scope.
    for name in ["a", "b", "c", "e", "f"] {
        let atom = output.literals.lookup(name).unwrap();
        assert!(
            output
                .scopes
                .resolve(ScopeId::GLOBAL, atom, SymbolType::VariableName)
                .is_some(),
            "{name} not declared"
        );
    }
}

#[test]
fn if_else_chain() {
    let output = parse("if (a) b(); else if (c) d(); else e();");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::If { else_stmt, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected if statement");
    };
    assert!(matches!(
        output.arena.kind(else_stmt.unwrap()),
        NodeKind::If { .. }
    ));
}

#[test]
fn while_and_do_while() {
    let output = parse("while (x) { x--; } do { x++; } while (x < 10);");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(output.arena.kind(stmts[0]), NodeKind::While { .. }));
    assert!(matches!(
        output.arena.kind(stmts[1]),
        NodeKind::DoWhile { .. }
    ));
}

#[test]
fn c_style_for_statement() {
    let output = parse("for (var i = 0; i < 10; i++) { work(i); }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::For {
        init,
        cond,
        update,
        ..
    } = output.arena.kind(stmts[0])
    else {
        panic!("expected for statement");
    };
    assert!(init.is_some());
    assert!(cond.is_some());
    assert!(update.is_some());
}

#[test]
fn for_with_empty_head() {
    let output = parse("for (;;) { break; }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn for_in_statement() {
    let output = parse("for (k in obj) { use(k); }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(output.arena.kind(stmts[0]), NodeKind::ForIn { .. }));
}

#[test]
fn for_in_with_var_receiver() {
    let output = parse("for (var k in obj) {}");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::ForIn { lhs, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected for-in");
    };
    assert!(matches!(
        output.arena.kind(*lhs),
        NodeKind::VariableDecl { .. }
    ));
}

#[test]
fn for_of_statement() {
    let output = parse("for (var i of xs) { use(i); }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(output.arena.kind(stmts[0]), NodeKind::ForOf { .. }));
}

#[test]
fn for_of_inside_generator_with_yield() {
    let output = parse("function* g(xs) { for (var i of xs) { yield i; } }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn yield_outside_generator_is_a_context_error() {
    let output = parse("function f(xs) { for (var i of xs) { yield i; } }");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Context)
    );
}

#[test]
fn switch_with_cases_and_default() {
    let output = parse(
        "switch (v) { case 1: a(); break; case 2: b(); break; default: c(); }",
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::Switch { cases, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected switch");
    };
    assert_eq!(cases.len(), 3);
    let NodeKind::Case { test, .. } = output.arena.kind(cases[2]) else {
        panic!("expected case");
    };
    assert!(test.is_none());
}

#[test]
fn break_outside_loop_is_a_context_error() {
    let output = parse("break;");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Context)
    );
}

#[test]
fn continue_outside_loop_is_a_context_error() {
    let output = parse("continue;");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Context)
    );
}

#[test]
fn return_outside_function_is_a_context_error() {
    let output = parse("return 1;");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == ErrorKind::Context)
    );
}

#[test]
fn labelled_statement_with_break_to_label() {
    let output = parse("outer: for (;;) { break outer; }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(
        output.arena.kind(stmts[0]),
        NodeKind::Labelled { .. }
    ));
    let atom = output.literals.lookup("outer").unwrap();
    assert!(
        output
            .scopes
            .resolve(ScopeId::GLOBAL, atom, SymbolType::LabelName)
            .is_some()
    );
}

#[test]
fn try_catch_finally() {
    let output = parse("try { risky(); } catch (e) { handle(e); } finally { done(); }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::Try { catch, finally, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected try");
    };
    assert!(catch.is_some());
    assert!(finally.is_some());
}

#[test]
fn try_without_catch_or_finally_is_an_error() {
    let output = parse("try { risky(); }");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn throw_requires_expression_on_same_line() {
    let output = parse("throw new Error('x');");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let output = parse("function f() { throw\n1; }");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn return_asi_suppresses_the_argument() {
    let output = parse("function f() { return\n1; }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::Function { body, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected function");
    };
    let NodeKind::Block { statements, .. } = output.arena.kind(body.unwrap()) else {
        panic!("expected body block");
    };
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        output.arena.kind(statements[0]),
        NodeKind::Return { expr: None }
    ));
}

#[test]
fn with_and_debugger_statements() {
    let output = parse("with (o) { a(); } debugger;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(output.arena.kind(stmts[0]), NodeKind::With { .. }));
    assert!(matches!(output.arena.kind(stmts[1]), NodeKind::Debugger));
}

#[test]
fn block_introduces_a_nested_scope() {
    let output = parse("{ let inner = 1; }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let atom = output.literals.lookup("inner").unwrap();
    // Not visible from the global scope itself...
    assert!(
        output
            .scopes
            .get(ScopeId::GLOBAL)
            .find(atom, SymbolType::VariableName)
            .is_none()
    );
    // ...but recorded in the block scope.
    let stmts = statements(&output);
    let NodeKind::Block { scope, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected block");
    };
    assert!(
        output
            .scopes
            .get(*scope)
            .find(atom, SymbolType::VariableName)
            .is_some()
    );
}

#[test]
fn asi_between_statements_without_semicolons() {
    let output = parse("var a = 1\nvar b = 2\n");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(statements(&output).len(), 2);
}

#[test]
fn missing_semicolon_on_same_line_is_an_error() {
    let output = parse("var a = 1 var b = 2;");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn statement_recovery_continues_after_bad_initializer() {
    let output = parse("let x = ;\nlet y = 2;");
    assert!(!output.diagnostics.is_empty());
    let stmts = statements(&output);
    // The second declaration survives recovery.
    assert!(
        stmts
            .iter()
            .any(|&s| matches!(output.arena.kind(s), NodeKind::LexicalDecl { .. }))
    );
    let atom = output.literals.lookup("y").unwrap();
    assert!(
        output
            .scopes
            .resolve(ScopeId::GLOBAL, atom, SymbolType::VariableName)
            .is_some()
    );
}

#[test]
fn unterminated_string_reports_and_recovers() {
    let output = parse("var s = 'abc\nvar t = 1;");
    assert!(!output.diagnostics.is_empty());
    assert!(output.root.is_some());
}

#[test]
fn expression_statements_and_empty_statement() {
    let output = parse("f(); ; g();");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert_eq!(stmts.len(), 3);
    assert!(matches!(output.arena.kind(stmts[1]), NodeKind::Empty));
}

#[test]
fn bracket_counters_balance_at_top_level() {
    let options = CompilerOptions::default();
    let stream = SourceStream::from_source(
        "test.ts",
        "function f(a) { return [a, { b: (a + 1) }]; }",
    );
    let scanner = Scanner::new(&stream, options);
    let mut parser = Parser::new(scanner, options, false);
    parser.parse().expect("parse should succeed");
    assert_eq!(parser.bracket_counters(), (0, 0, 0));
}

#[test]
fn node_positions_contain_their_children() {
    let source = "function f(a: number) { if (a > 1) { return a * 2; } return 0; }";
    let output = parse(source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let root = output.root.unwrap();
    fn check(output: &ParseOutput, node: NodeId) {
        let parent = output.arena.pos(node);
        for child in output.arena.children(node) {
            let pos = output.arena.pos(child);
            assert!(
                parent.start_offset <= pos.start_offset && pos.end_offset <= parent.end_offset,
                "child {:?} at {pos:?} escapes parent {:?} at {parent:?}",
                output.arena.kind(child),
                output.arena.kind(node),
            );
            check(output, child);
        }
    }
    check(&output, root);
}
