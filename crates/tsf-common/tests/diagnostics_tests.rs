use super::*;

#[test]
fn truncate_rolls_back_speculative_errors() {
    let mut reporter = ErrorReporter::new();
    reporter.syntax_error(SourcePosition::at(0, 1), "first");
    let mark = reporter.count();
    reporter.syntax_error(SourcePosition::at(5, 1), "speculative");
    reporter.truncate(mark);
    assert_eq!(reporter.count(), 1);
    assert_eq!(reporter.diagnostics()[0].message, "first");
}

#[test]
fn render_caret_points_at_span() {
    let source = "let x = ;\nlet y = 2;";
    let pos = SourcePosition::new(8, 9, 1, 1);
    let rendered = render_caret(source, pos).unwrap();
    assert_eq!(rendered, "let x = ;\n        ^");
}

#[test]
fn render_caret_on_second_line() {
    let source = "let a = 1;\nlet b = ;";
    let pos = SourcePosition::new(19, 20, 2, 2);
    let rendered = render_caret(source, pos).unwrap();
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("let b = ;"));
    assert_eq!(lines.next(), Some("        ^"));
}

#[test]
fn render_caret_rejects_out_of_range_offset() {
    assert!(render_caret("x", SourcePosition::new(9, 10, 1, 1)).is_none());
}

#[test]
fn error_kinds_have_wire_names() {
    assert_eq!(ErrorKind::Syntax.as_str(), "SyntaxError");
    assert_eq!(ErrorKind::Lexical.as_str(), "LexicalError");
}
