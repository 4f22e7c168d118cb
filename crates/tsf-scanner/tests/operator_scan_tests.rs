use tsf_common::{CompilerOptions, ErrorReporter};
use tsf_scanner::{Scanner, SourceStream, TokenKind};

fn scan_all(source: &str) -> Vec<TokenKind> {
    let stream = SourceStream::from_source("test.ts", source);
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let mut kinds = Vec::new();
    loop {
        let token = scanner.scan(&mut reporter);
        if token.kind == TokenKind::Eof {
            break;
        }
        kinds.push(token.kind);
    }
    kinds
}

fn scan_one(source: &str) -> TokenKind {
    let kinds = scan_all(source);
    assert_eq!(kinds.len(), 1, "expected a single token for {source:?}");
    kinds[0]
}

#[test]
fn scans_single_operators() {
    let cases = [
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Mul),
        ("/", TokenKind::Div),
        ("%", TokenKind::Mod),
        ("~", TokenKind::BitNot),
        ("^", TokenKind::BitXor),
        ("&", TokenKind::BitAnd),
        ("|", TokenKind::BitOr),
        ("!", TokenKind::Not),
        ("=", TokenKind::Assign),
        ("<", TokenKind::Less),
        (">", TokenKind::Greater),
        (".", TokenKind::Dot),
        (",", TokenKind::Comma),
        ("?", TokenKind::QuestionMark),
        (":", TokenKind::Colon),
    ];
    for (source, expected) in cases {
        assert_eq!(scan_one(source), expected, "operator {source}");
    }
}

#[test]
fn scans_compound_operators_longest_match() {
    let cases = [
        ("++", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("+=", TokenKind::AddAssign),
        ("-=", TokenKind::SubAssign),
        ("*=", TokenKind::MulAssign),
        ("/=", TokenKind::DivAssign),
        ("%=", TokenKind::ModAssign),
        ("~=", TokenKind::BitNotAssign),
        ("^=", TokenKind::XorAssign),
        ("&=", TokenKind::AndAssign),
        ("|=", TokenKind::OrAssign),
        ("&&", TokenKind::LogicalAnd),
        ("||", TokenKind::LogicalOr),
        ("==", TokenKind::Equal),
        ("===", TokenKind::StrictEqual),
        ("!=", TokenKind::NotEqual),
        ("!==", TokenKind::StrictNotEqual),
        ("<<", TokenKind::ShiftLeft),
        ("<<=", TokenKind::ShiftLeftAssign),
        ("<=", TokenKind::LessEqual),
        (">>", TokenKind::ShiftRight),
        (">>=", TokenKind::ShiftRightAssign),
        (">>>", TokenKind::UShiftRight),
        (">>>=", TokenKind::UShiftRightAssign),
        (">=", TokenKind::GreaterEqual),
        ("=>", TokenKind::Arrow),
        ("...", TokenKind::Rest),
    ];
    for (source, expected) in cases {
        assert_eq!(scan_one(source), expected, "operator {source}");
    }
}

#[test]
fn semicolon_is_a_line_terminator_token() {
    assert_eq!(scan_one(";"), TokenKind::LineTerminator);
}

#[test]
fn generic_mode_never_merges_greater_than() {
    let stream = SourceStream::from_source("test.ts", "A<B<C>> x >> y");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();

    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier); // A
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Less);
    scanner.enable_generic_type_scan();
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier); // B
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Less);
    scanner.enable_generic_type_scan();
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier); // C
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Greater);
    scanner.disable_generic_type_scan();
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Greater);
    scanner.disable_generic_type_scan();

    // Out of generic mode `>>` merges again.
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier); // x
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::ShiftRight);
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier); // y
    assert!(!reporter.has_errors());
}

#[test]
fn division_stays_division_without_re_scan() {
    assert_eq!(
        scan_all("a / b"),
        vec![TokenKind::Identifier, TokenKind::Div, TokenKind::Identifier]
    );
}

#[test]
fn slash_re_scans_to_regexp_on_request() {
    let stream = SourceStream::from_source("test.ts", "/foo\\/bar/gim x");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();

    let slash = scanner.scan(&mut reporter);
    assert_eq!(slash.kind, TokenKind::Div);
    let regexp = scanner
        .check_regular_expression(&slash, &mut reporter)
        .expect("slash should re-scan");
    assert_eq!(regexp.kind, TokenKind::RegexpLiteral);
    let atom = regexp.value.unwrap();
    assert_eq!(scanner.literals().utf8(atom), "/foo\\/bar/gim");
    assert_eq!(scanner.scan(&mut reporter).kind, TokenKind::Identifier);
    assert!(!reporter.has_errors());
}

#[test]
fn slash_equals_re_scans_with_the_equals_in_the_pattern() {
    let stream = SourceStream::from_source("test.ts", "/=a/");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();

    let head = scanner.scan(&mut reporter);
    assert_eq!(head.kind, TokenKind::DivAssign);
    let regexp = scanner
        .check_regular_expression(&head, &mut reporter)
        .unwrap();
    assert_eq!(regexp.kind, TokenKind::RegexpLiteral);
    assert_eq!(scanner.literals().utf8(regexp.value.unwrap()), "/=a/");
}

#[test]
fn unterminated_regexp_reports_and_recovers() {
    let stream = SourceStream::from_source("test.ts", "/foo\nbar");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();

    let slash = scanner.scan(&mut reporter);
    let token = scanner
        .check_regular_expression(&slash, &mut reporter)
        .unwrap();
    assert_eq!(token.kind, TokenKind::Illegal);
    assert!(reporter.has_errors());
}

#[test]
fn non_slash_tokens_are_not_re_scanned() {
    let stream = SourceStream::from_source("test.ts", "ident");
    let mut scanner = Scanner::new(&stream, CompilerOptions::default());
    let mut reporter = ErrorReporter::new();
    let token = scanner.scan(&mut reporter);
    assert!(scanner
        .check_regular_expression(&token, &mut reporter)
        .is_none());
}
