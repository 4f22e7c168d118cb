use tsf_common::{CompilerOptions, ErrorReporter, LanguageMode, ModuleKind};
use tsf_scanner::{Scanner, SourceStream, TokenKind};

fn scan_one(source: &str, options: CompilerOptions) -> TokenKind {
    let stream = SourceStream::from_source("test.ts", source);
    let mut scanner = Scanner::new(&stream, options);
    let mut reporter = ErrorReporter::new();
    scanner.scan(&mut reporter).kind
}

fn es6() -> CompilerOptions {
    CompilerOptions::new(LanguageMode::Es6, ModuleKind::TypeScript)
}

fn es3() -> CompilerOptions {
    CompilerOptions::new(LanguageMode::Es3, ModuleKind::TypeScript)
}

#[test]
fn scans_every_unconditional_keyword() {
    let cases = [
        ("break", TokenKind::Break),
        ("case", TokenKind::Case),
        ("catch", TokenKind::Catch),
        ("class", TokenKind::Class),
        ("continue", TokenKind::Continue),
        ("debugger", TokenKind::Debugger),
        ("default", TokenKind::Default),
        ("delete", TokenKind::Delete),
        ("do", TokenKind::Do),
        ("else", TokenKind::Else),
        ("enum", TokenKind::Enum),
        ("export", TokenKind::Export),
        ("extends", TokenKind::Extends),
        ("false", TokenKind::False),
        ("finally", TokenKind::Finally),
        ("for", TokenKind::For),
        ("function", TokenKind::Function),
        ("if", TokenKind::If),
        ("implements", TokenKind::Implements),
        ("import", TokenKind::Import),
        ("in", TokenKind::In),
        ("instanceof", TokenKind::Instanceof),
        ("interface", TokenKind::Interface),
        ("NaN", TokenKind::Nan),
        ("new", TokenKind::New),
        ("null", TokenKind::Null),
        ("private", TokenKind::Private),
        ("protected", TokenKind::Protected),
        ("public", TokenKind::Public),
        ("return", TokenKind::Return),
        ("static", TokenKind::Static),
        ("super", TokenKind::Super),
        ("switch", TokenKind::Switch),
        ("this", TokenKind::This),
        ("throw", TokenKind::Throw),
        ("true", TokenKind::True),
        ("try", TokenKind::Try),
        ("typeof", TokenKind::Typeof),
        ("undefined", TokenKind::Undefined),
        ("var", TokenKind::Var),
        ("void", TokenKind::Void),
        ("while", TokenKind::While),
        ("with", TokenKind::With),
    ];
    for (source, expected) in cases {
        assert_eq!(scan_one(source, es6()), expected, "keyword {source}");
    }
}

#[test]
fn es6_only_keywords_downgrade_in_es3() {
    assert_eq!(scan_one("let", es6()), TokenKind::Let);
    assert_eq!(scan_one("let", es3()), TokenKind::Identifier);
    assert_eq!(scan_one("yield", es6()), TokenKind::Yield);
    assert_eq!(scan_one("yield", es3()), TokenKind::Identifier);
    assert_eq!(scan_one("const", es6()), TokenKind::Const);
    assert_eq!(scan_one("const", es3()), TokenKind::FutureReservedWord);
}

#[test]
fn module_keyword_only_in_typescript_module_mode() {
    assert_eq!(scan_one("module", es6()), TokenKind::Module);
    let es6_modules = CompilerOptions::new(LanguageMode::Es6, ModuleKind::Es6);
    assert_eq!(scan_one("module", es6_modules), TokenKind::Identifier);
}

#[test]
fn future_strict_reserved_words_outside_es3() {
    assert_eq!(scan_one("package", es6()), TokenKind::FutureStrictReservedWord);
    assert_eq!(scan_one("package", es3()), TokenKind::Identifier);
}

#[test]
fn contextual_keywords_scan_as_identifiers() {
    for word in ["declare", "of", "as", "from", "get", "set", "require", "constructor"] {
        assert_eq!(scan_one(word, es6()), TokenKind::Identifier, "{word}");
    }
}

#[test]
fn keyword_prefixes_are_identifiers() {
    assert_eq!(scan_one("breaker", es6()), TokenKind::Identifier);
    assert_eq!(scan_one("classy", es6()), TokenKind::Identifier);
    assert_eq!(scan_one("i", es6()), TokenKind::Identifier);
}

#[test]
fn keyword_tokens_carry_their_text() {
    let stream = SourceStream::from_source("test.ts", "return");
    let mut scanner = Scanner::new(&stream, es6());
    let mut reporter = ErrorReporter::new();
    let token = scanner.scan(&mut reporter);
    assert_eq!(token.kind, TokenKind::Return);
    let atom = token.value.expect("keyword should be interned");
    assert_eq!(scanner.literals().utf8(atom), "return");
}
