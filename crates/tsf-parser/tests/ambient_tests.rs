use tsf_common::CompilerOptions;
use tsf_parser::{NodeId, NodeKind, ParseOutput, Parser};
use tsf_scanner::{Scanner, SourceStream};

fn parse(source: &str) -> ParseOutput {
    parse_as(source, false)
}

fn parse_declaration_file(source: &str) -> ParseOutput {
    parse_as(source, true)
}

fn parse_as(source: &str, declaration_file: bool) -> ParseOutput {
    let options = CompilerOptions::default();
    let stream = SourceStream::from_source(
        if declaration_file { "test.d.ts" } else { "test.ts" },
        source,
    );
    let scanner = Scanner::new(&stream, options);
    let mut parser = Parser::new(scanner, options, declaration_file);
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
fn ambient_variable_declaration() {
    let output = parse("declare var x: number;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::AmbientVariable { type_expr, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected ambient variable");
    };
    assert!(type_expr.is_some());
}

#[test]
fn ambient_function_has_no_body() {
    let output = parse("declare function greet(name: string): void;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert!(matches!(
        output.arena.kind(stmts[0]),
        NodeKind::AmbientFunction { .. }
    ));
}

#[test]
fn ambient_class_members_are_bodyless() {
    let output = parse(
        "declare class C extends B {\n\
         constructor(a: number);\n\
         m(x: string): void;\n\
         p: number;\n\
         static s(): C;\n\
         }",
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::AmbientClass { body, bases, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected ambient class");
    };
    assert!(bases.is_some());
    let NodeKind::AmbientClassFields { fields } = output.arena.kind(*body) else {
        panic!("expected ambient class fields");
    };
    assert_eq!(fields.len(), 4);
    assert!(matches!(
        output.arena.kind(fields[0]),
        NodeKind::AmbientConstructor { .. }
    ));
    assert!(matches!(
        output.arena.kind(fields[1]),
        NodeKind::AmbientMemberFunction { .. }
    ));
    assert!(matches!(
        output.arena.kind(fields[2]),
        NodeKind::AmbientMemberVariable { .. }
    ));
}

#[test]
fn ambient_enum_declaration() {
    let output = parse("declare enum E { A, B = 2 }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::AmbientEnum { body, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected ambient enum");
    };
    let NodeKind::AmbientEnumBody { fields } = output.arena.kind(*body) else {
        panic!("expected ambient enum body");
    };
    assert_eq!(fields.len(), 2);
}

#[test]
fn ambient_internal_module() {
    let output = parse("declare module M { var x: number; function f(): void; }");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::AmbientModule { external, body, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected ambient module");
    };
    assert!(!external);
    let NodeKind::AmbientModuleBody { statements } = output.arena.kind(*body) else {
        panic!("expected module body");
    };
    assert_eq!(statements.len(), 2);
}

#[test]
fn ambient_external_module_allows_export_assignment() {
    let output = parse(
        "declare module \"fs\" { var api: number; export = api; }",
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::AmbientModule { external, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected ambient module");
    };
    assert!(*external);
}

#[test]
fn export_assignment_rejected_in_internal_ambient_module() {
    let output = parse("declare module M { export = x; }");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn declaration_file_accepts_ambient_forms() {
    let output = parse_declaration_file(
        "interface I { a: string; }\n\
         declare var x: number;\n\
         declare function f(): void;\n\
         import helper = require(\"./helper\");\n\
         export = x;",
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert_eq!(stmts.len(), 5);
    assert!(matches!(
        output.arena.kind(stmts[0]),
        NodeKind::Interface { .. }
    ));
    let NodeKind::Export { default, .. } = output.arena.kind(stmts[4]) else {
        panic!("expected export assignment");
    };
    assert!(*default);
}

#[test]
fn declaration_file_rejects_plain_statements() {
    let output = parse_declaration_file("var x = 1;");
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn exported_ambient_declaration_in_declaration_file() {
    let output = parse_declaration_file("export declare var x: number;");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let NodeKind::Export { clause, .. } = output.arena.kind(stmts[0]) else {
        panic!("expected export");
    };
    assert!(matches!(
        output.arena.kind(clause.unwrap()),
        NodeKind::AmbientVariable { .. }
    ));
}

#[test]
fn declare_inside_ambient_module_is_an_error() {
    let output = parse("declare module M { declare var x: number; }");
    assert!(!output.diagnostics.is_empty());
}
