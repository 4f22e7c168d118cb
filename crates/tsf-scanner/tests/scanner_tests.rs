use tsf_common::{CompilerOptions, ErrorReporter, LanguageMode, ModuleKind};
use tsf_scanner::{Scanner, SourceStream, Token, TokenKind};

fn make(source: &str) -> (SourceStream, ErrorReporter) {
    (
        SourceStream::from_source("test.ts", source),
        ErrorReporter::new(),
    )
}

fn scan_kinds(source: &str, options: CompilerOptions) -> (Vec<TokenKind>, ErrorReporter) {
    let stream = SourceStream::from_source("test.ts", source);
    let mut scanner = Scanner::new(&stream, options);
    let mut reporter = ErrorReporter::new();
    let mut kinds = Vec::new();
    loop {
        let token = scanner.scan(&mut reporter);
        if token.kind == TokenKind::Eof {
            break;
        }
        kinds.push(token.kind);
        if kinds.len() > 256 {
            panic!("scanner failed to make progress on {source:?}");
        }
    }
    (kinds, reporter)
}

fn first_token(source: &str) -> (Token, Scanner<'_>, ErrorReporter) {
    // Leak the stream so the scanner can borrow it for the test's lifetime.
    let stream = Box::leak(Box::new(SourceStream::from_source("test.ts", source)));
    let mut scanner = Scanner::new(stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let token = scanner.scan(&mut reporter);
    (token, scanner, reporter)
}

#[test]
fn scans_numbers() {
    for source in ["0", "12345", "0.121", ".13", "3.1e+10", "3.1e-10", "0x20ef"] {
        let (kinds, reporter) = scan_kinds(source, CompilerOptions::default());
        assert_eq!(kinds, vec![TokenKind::NumericLiteral], "{source}");
        assert!(!reporter.has_errors(), "{source}");
    }
}

#[test]
fn number_value_preserves_written_text() {
    let (token, scanner, _) = first_token("3.1e+10");
    assert_eq!(scanner.literals().utf8(token.value.unwrap()), "3.1e+10");
}

#[test]
fn exponent_without_sign_is_accepted() {
    let (kinds, reporter) = scan_kinds("1e10", CompilerOptions::default());
    assert_eq!(kinds, vec![TokenKind::NumericLiteral]);
    assert!(!reporter.has_errors());
}

#[test]
fn malformed_numbers_are_illegal() {
    for source in ["1.3e+", "1.3e", "1.3.5", "1e"] {
        let (kinds, reporter) = scan_kinds(source, CompilerOptions::default());
        assert_eq!(kinds.first(), Some(&TokenKind::Illegal), "{source}");
        assert!(reporter.has_errors(), "{source}");
    }
}

#[test]
fn octal_literals_gated_to_es3() {
    let es3 = CompilerOptions::new(LanguageMode::Es3, ModuleKind::TypeScript);
    let (kinds, reporter) = scan_kinds("0777", es3);
    assert_eq!(kinds, vec![TokenKind::OctalLiteral]);
    assert!(!reporter.has_errors());

    let (kinds, reporter) = scan_kinds("0777", CompilerOptions::default());
    assert_eq!(kinds, vec![TokenKind::Illegal]);
    assert!(reporter.has_errors());
}

#[test]
fn binary_literals_gated_to_es6() {
    let (kinds, reporter) = scan_kinds("0b0101", CompilerOptions::default());
    assert_eq!(kinds, vec![TokenKind::BinaryLiteral]);
    assert!(!reporter.has_errors());

    let es3 = CompilerOptions::new(LanguageMode::Es3, ModuleKind::TypeScript);
    let (kinds, reporter) = scan_kinds("0b0101", es3);
    assert_eq!(kinds, vec![TokenKind::Illegal]);
    assert!(reporter.has_errors());
}

#[test]
fn modern_octal_literals_scan_in_es6() {
    let (kinds, reporter) = scan_kinds("0o777", CompilerOptions::default());
    assert_eq!(kinds, vec![TokenKind::OctalLiteral]);
    assert!(!reporter.has_errors());
}

#[test]
fn string_escapes_are_cooked() {
    let (token, scanner, reporter) = first_token(r#"'a\nb\tc\x41B\u{43}'"#);
    assert_eq!(token.kind, TokenKind::StringLiteral);
    assert_eq!(
        scanner.literals().utf8(token.value.unwrap()),
        "a\nb\tcABC"
    );
    assert!(!reporter.has_errors());
}

#[test]
fn double_quoted_strings_accept_single_quotes() {
    let (token, scanner, _) = first_token(r#""it's fine""#);
    assert_eq!(scanner.literals().utf8(token.value.unwrap()), "it's fine");
}

#[test]
fn unterminated_string_reports_one_diagnostic() {
    let (kinds, reporter) = scan_kinds("'abc", CompilerOptions::default());
    assert_eq!(kinds.first(), Some(&TokenKind::Illegal));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn identifier_with_unicode_escape() {
    let (token, scanner, reporter) = first_token(r"\u0061bc");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(scanner.literals().utf8(token.value.unwrap()), "abc");
    assert!(!reporter.has_errors());
}

#[test]
fn non_ascii_identifiers_scan() {
    let (token, scanner, reporter) = first_token("λx");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(scanner.literals().utf8(token.value.unwrap()), "λx");
    assert!(!reporter.has_errors());
}

#[test]
fn line_break_flag_set_across_newlines() {
    let stream = SourceStream::from_source("test.ts", "a\nb c");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let a = scanner.scan(&mut reporter);
    assert!(a.line_break_before_next);
    let b = scanner.scan(&mut reporter);
    assert!(!b.line_break_before_next);
}

#[test]
fn line_terminator_flag_set_before_semicolon() {
    let stream = SourceStream::from_source("test.ts", "a ;");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let a = scanner.scan(&mut reporter);
    assert!(a.line_terminator_before_next);
}

#[test]
fn token_positions_track_lines_and_offsets() {
    let stream = SourceStream::from_source("test.ts", "let x\nlet y");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let t1 = scanner.scan(&mut reporter);
    assert_eq!((t1.pos.start_offset, t1.pos.end_offset), (0, 3));
    assert_eq!(t1.pos.start_line, 1);
    let _x = scanner.scan(&mut reporter);
    let t2 = scanner.scan(&mut reporter);
    assert_eq!(t2.pos.start_line, 2);
    assert_eq!(t2.pos.start_offset, 6);
}

#[test]
fn comments_are_trivia_and_multiline_comment_attaches() {
    let stream = SourceStream::from_source("test.ts", "a // line\n/* doc */ b");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let a = scanner.scan(&mut reporter);
    assert!(a.multi_line_comment.is_none());
    assert!(a.line_break_before_next);
    let b = scanner.scan(&mut reporter);
    assert_eq!(b.kind, TokenKind::Identifier);
    let comment = b.multi_line_comment.expect("comment should attach");
    assert_eq!(scanner.literals().utf8(comment), "/* doc */");
}

#[test]
fn reference_path_directive_fires_callback() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let stream =
        SourceStream::from_source("test.ts", "/// <reference path=\"./other.ts\"/>\nvar x;");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let paths: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&paths);
    scanner.set_reference_path_callback(Box::new(move |p| sink.borrow_mut().push(p.to_string())));
    let mut reporter = ErrorReporter::new();
    let first = scanner.scan(&mut reporter);
    assert_eq!(first.kind, TokenKind::Var);
    assert_eq!(paths.borrow().as_slice(), ["./other.ts"]);
}

#[test]
fn reference_directive_tolerates_spacing() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let stream =
        SourceStream::from_source("test.ts", "///  <  reference  path = './a.d.ts'  /  >\n;");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let paths: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&paths);
    scanner.set_reference_path_callback(Box::new(move |p| sink.borrow_mut().push(p.to_string())));
    let mut reporter = ErrorReporter::new();
    scanner.scan(&mut reporter);
    assert_eq!(paths.borrow().as_slice(), ["./a.d.ts"]);
}

#[test]
fn plain_triple_slash_comment_is_skipped() {
    let (kinds, reporter) = scan_kinds("/// just a note\nvar x", CompilerOptions::default());
    assert_eq!(kinds, vec![TokenKind::Var, TokenKind::Identifier]);
    assert!(!reporter.has_errors());
}

#[test]
fn bom_and_shebang_are_skipped() {
    let source = format!("\u{FEFF}#!/usr/bin/env node\nvar x;");
    let (kinds, reporter) = scan_kinds(&source, CompilerOptions::default());
    assert_eq!(
        kinds,
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::LineTerminator
        ]
    );
    assert!(!reporter.has_errors());
}

#[test]
fn template_without_substitution_is_one_token() {
    let (token, scanner, reporter) = first_token("`plain text`");
    assert_eq!(token.kind, TokenKind::TemplateLiteral);
    assert_eq!(scanner.literals().utf8(token.value.unwrap()), "plain text");
    assert!(!reporter.has_errors());
}

#[test]
fn template_with_substitution_emits_head_and_tail() {
    let (stream, mut reporter) = make("`a${x}b`");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());

    let head = scanner.scan(&mut reporter);
    assert_eq!(head.kind, TokenKind::TemplateHead);
    assert_eq!(scanner.literals().utf8(head.value.unwrap()), "a");

    let x = scanner.scan(&mut reporter);
    assert_eq!(x.kind, TokenKind::Identifier);

    let rbrace = scanner.scan(&mut reporter);
    assert_eq!(rbrace.kind, TokenKind::RightBrace);

    let tail = scanner.re_scan_template_continuation(&rbrace, &mut reporter);
    assert_eq!(tail.kind, TokenKind::TemplateTail);
    assert_eq!(scanner.literals().utf8(tail.value.unwrap()), "b");
    assert!(!reporter.has_errors());
}

#[test]
fn template_middle_between_two_substitutions() {
    let (stream, mut reporter) = make("`a${x} mid ${y}z`");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());

    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::TemplateHead);
    scanner.scan(&mut reporter); // x
    let rbrace = scanner.scan(&mut reporter);
    let middle = scanner.re_scan_template_continuation(&rbrace, &mut reporter);
    assert_eq!(middle.kind, TokenKind::TemplateMiddle);
    assert_eq!(scanner.literals().utf8(middle.value.unwrap()), " mid ");
    scanner.scan(&mut reporter); // y
    let rbrace = scanner.scan(&mut reporter);
    let tail = scanner.re_scan_template_continuation(&rbrace, &mut reporter);
    assert_eq!(tail.kind, TokenKind::TemplateTail);
    assert_eq!(scanner.literals().utf8(tail.value.unwrap()), "z");
}

#[test]
fn unterminated_template_is_reported() {
    let (kinds, reporter) = scan_kinds("`abc", CompilerOptions::default());
    assert_eq!(kinds.first(), Some(&TokenKind::Illegal));
    assert!(reporter.has_errors());
}

#[test]
fn checkpoint_restore_replays_tokens() {
    let stream = SourceStream::from_source("test.ts", "a b c");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    scanner.scan(&mut reporter); // a
    let cp = scanner.checkpoint();
    let b1 = scanner.scan(&mut reporter);
    scanner.scan(&mut reporter); // c
    scanner.restore(cp);
    let b2 = scanner.scan(&mut reporter);
    assert_eq!(b1.kind, b2.kind);
    assert_eq!(b1.pos, b2.pos);
}

#[test]
fn illegal_byte_produces_illegal_token_and_continues() {
    let (kinds, reporter) = scan_kinds("a @ b", CompilerOptions::default());
    assert_eq!(
        kinds,
        vec![TokenKind::Identifier, TokenKind::Illegal, TokenKind::Identifier]
    );
    assert_eq!(reporter.count(), 1);
}

#[test]
fn empty_input_is_just_eof() {
    let (kinds, reporter) = scan_kinds("", CompilerOptions::default());
    assert!(kinds.is_empty());
    assert!(!reporter.has_errors());
}

#[test]
fn whitespace_and_comments_only_is_just_eof() {
    let (kinds, reporter) = scan_kinds("  // c\n/* d */  ", CompilerOptions::default());
    assert!(kinds.is_empty());
    assert!(!reporter.has_errors());
}
