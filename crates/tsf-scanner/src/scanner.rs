//! The scanner: scalars in, tokens out.
//!
//! Three context switches drive the design:
//! - regular expression literals are only recognised when the parser asks
//!   for a re-scan at an expression-start position
//!   (`check_regular_expression`);
//! - inside type argument lists `>` is never merged with a following `>` or
//!   `=` (`enable_generic_type_scan` / `disable_generic_type_scan`);
//! - template substitutions re-enter the scanner between sections
//!   (`re_scan_template_continuation`).
//!
//! Trivia (whitespace, comments, line breaks) is consumed after every token
//! and recorded on that token as the `line_break_before_next` /
//! `line_terminator_before_next` flags. A `///<reference path="..."/>`
//! comment fires the reference-path callback installed by the driver.

use crate::source::{AdapterCheckpoint, Scalar, SourceStream, UnicodeIterAdapter};
use crate::token::{Token, TokenKind, keyword_kind, puncture_kind};
use crate::unicode::Uchar;
use tsf_common::{Atom, CompilerOptions, ErrorReporter, LiteralBuffer, SourcePosition};

/// Callback invoked with the decoded path of a reference-path directive.
pub type ReferencePathCallback<'a> = Box<dyn FnMut(&str) + 'a>;

/// Restorable scanner state, captured into parser checkpoints.
#[derive(Clone, Copy, Debug)]
pub struct ScannerCheckpoint {
    adapter: AdapterCheckpoint,
    current: Scalar,
    lookahead: Scalar,
    generic_type_depth: u32,
}

pub struct Scanner<'a> {
    options: CompilerOptions,
    adapter: UnicodeIterAdapter<'a>,
    literals: LiteralBuffer,
    current: Scalar,
    lookahead: Scalar,
    generic_type_depth: u32,
    token_start_offset: u32,
    token_start_line: u32,
    line_break_before_next: bool,
    line_terminator_before_next: bool,
    last_multi_line_comment: Option<Atom>,
    reference_path_callback: Option<ReferencePathCallback<'a>>,
    bootstrapped: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(stream: &'a SourceStream, options: CompilerOptions) -> Self {
        let mut adapter = UnicodeIterAdapter::new(stream.bytes());
        let current = adapter.advance();
        let lookahead = adapter.advance();
        Scanner {
            options,
            adapter,
            literals: LiteralBuffer::new(),
            current,
            lookahead,
            generic_type_depth: 0,
            token_start_offset: 0,
            token_start_line: 1,
            line_break_before_next: false,
            line_terminator_before_next: false,
            last_multi_line_comment: None,
            reference_path_callback: None,
            bootstrapped: false,
        }
    }

    pub fn set_reference_path_callback(&mut self, cb: ReferencePathCallback<'a>) {
        self.reference_path_callback = Some(cb);
    }

    /// While enabled, `>` is emitted alone so `Foo<Bar<Baz>>` tokenizes.
    /// Calls nest; each enable must be paired with a disable.
    pub fn enable_generic_type_scan(&mut self) {
        self.generic_type_depth += 1;
    }

    pub fn disable_generic_type_scan(&mut self) {
        debug_assert!(self.generic_type_depth > 0);
        self.generic_type_depth = self.generic_type_depth.saturating_sub(1);
    }

    #[must_use]
    pub fn is_generic_mode(&self) -> bool {
        self.generic_type_depth > 0
    }

    #[must_use]
    pub fn nested_generic_count(&self) -> u32 {
        self.generic_type_depth
    }

    #[must_use]
    pub fn literals(&self) -> &LiteralBuffer {
        &self.literals
    }

    pub fn literals_mut(&mut self) -> &mut LiteralBuffer {
        &mut self.literals
    }

    pub fn into_literals(self) -> LiteralBuffer {
        self.literals
    }

    #[must_use]
    pub fn checkpoint(&self) -> ScannerCheckpoint {
        ScannerCheckpoint {
            adapter: self.adapter.checkpoint(),
            current: self.current,
            lookahead: self.lookahead,
            generic_type_depth: self.generic_type_depth,
        }
    }

    pub fn restore(&mut self, cp: ScannerCheckpoint) {
        self.adapter.restore(cp.adapter);
        self.current = cp.current;
        self.lookahead = cp.lookahead;
        self.generic_type_depth = cp.generic_type_depth;
    }

    /// Scan the next token, consuming trailing trivia and recording the
    /// trivia flags on the returned token.
    pub fn scan(&mut self, reporter: &mut ErrorReporter) -> Token {
        if !self.bootstrapped {
            self.bootstrapped = true;
            self.skip_signature();
            self.skip_trivia(reporter);
            self.line_break_before_next = false;
            self.line_terminator_before_next = false;
        }
        let comment = self.last_multi_line_comment.take();
        self.begin_token();
        let mut token = self.do_scan(reporter);
        token.multi_line_comment = comment;
        self.finish_token(&mut token, reporter);
        token
    }

    /// If `token` is `/` or `/=`, re-scan from its start as a regular
    /// expression literal and return the regexp token. Any other kind is
    /// returned unchanged. Invoked by the parser at positions where a
    /// regexp is grammatically possible.
    pub fn check_regular_expression(
        &mut self,
        token: &Token,
        reporter: &mut ErrorReporter,
    ) -> Option<Token> {
        if !token.one_of(&[TokenKind::Div, TokenKind::DivAssign]) {
            return None;
        }
        self.reset_to(token.pos.end_offset, token.pos.end_line);
        self.begin_token();
        self.token_start_offset = token.pos.start_offset;
        self.token_start_line = token.pos.start_line;

        let mut expr = String::from("/");
        if token.is(TokenKind::DivAssign) {
            expr.push('=');
        }
        let mut escaped = false;
        let mut out = loop {
            let c = self.current.uchar;
            if c.is_null() || c.is_invalid() || c.is_line_break() {
                self.lexical_error(reporter, "unterminated regular expression");
                break self.build_token(TokenKind::Illegal);
            }
            if let Some(ch) = c.to_char() {
                expr.push(ch);
            }
            if c.is('\\') {
                escaped = !escaped;
            } else if c.is('/') && !escaped {
                self.advance();
                while matches!(self.current.uchar.value(), 0x67 | 0x69 | 0x6D) {
                    // g i m
                    if let Some(ch) = self.current.uchar.to_char() {
                        expr.push(ch);
                    }
                    self.advance();
                }
                break self.build_token_with_value(TokenKind::RegexpLiteral, &expr);
            } else {
                escaped = false;
            }
            self.advance();
        };
        self.finish_token(&mut out, reporter);
        Some(out)
    }

    /// Continue a template literal after the `}` that closed a substitution.
    /// `rbrace` is the RightBrace token the parser is currently looking at.
    pub fn re_scan_template_continuation(
        &mut self,
        rbrace: &Token,
        reporter: &mut ErrorReporter,
    ) -> Token {
        self.reset_to(rbrace.pos.end_offset, rbrace.pos.end_line);
        self.begin_token();
        let mut token = self.scan_template_part(TemplatePart::Continuation, reporter);
        self.finish_token(&mut token, reporter);
        token
    }

    fn begin_token(&mut self) {
        self.token_start_offset = self.current.offset;
        self.token_start_line = self.current.line;
        self.line_break_before_next = false;
        self.line_terminator_before_next = false;
    }

    fn finish_token(&mut self, token: &mut Token, reporter: &mut ErrorReporter) {
        if !token.is(TokenKind::Eof) {
            self.skip_trivia(reporter);
        } else {
            self.line_break_before_next = true;
        }
        token.line_break_before_next = self.line_break_before_next;
        token.line_terminator_before_next = self.line_terminator_before_next;
    }

    fn do_scan(&mut self, reporter: &mut ErrorReporter) -> Token {
        let c = self.current.uchar;
        if c.is_null() {
            return self.build_token(TokenKind::Eof);
        }
        if c.is_invalid() {
            self.advance();
            self.lexical_error(reporter, "illegal UTF-8 sequence");
            return self.build_token(TokenKind::Illegal);
        }
        if c.is(';') {
            self.advance();
            return self.build_token(TokenKind::LineTerminator);
        }
        if c.is_ascii() {
            if let Some(kind) = puncture_kind(c.value() as u8) {
                self.advance();
                return self.build_token(kind);
            }
        }
        if c.is_identifier_start() || (c.is('\\') && self.lookahead.uchar.is('u')) {
            return self.scan_identifier(reporter);
        }
        if c.is_string_literal_start() {
            return self.scan_string_literal(reporter);
        }
        if c.is_digit_start(self.lookahead.uchar) {
            return self.scan_digit(reporter);
        }
        if c.is('`') {
            self.advance();
            return self.scan_template_part(TemplatePart::Head, reporter);
        }
        if c.is_operator_start() {
            return self.scan_operator(reporter);
        }
        self.advance();
        self.lexical_error(reporter, "illegal character");
        self.build_token(TokenKind::Illegal)
    }

    // ----- identifiers ---------------------------------------------------

    fn scan_identifier(&mut self, reporter: &mut ErrorReporter) -> Token {
        let mut text = String::new();
        loop {
            let c = self.current.uchar;
            if c.is('\\') {
                if !self.scan_unicode_escape_sequence(&mut text, false, reporter) {
                    return self.build_token(TokenKind::Illegal);
                }
            } else if c.is_identifier_part() {
                if let Some(ch) = c.to_char() {
                    text.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
        let kind = keyword_kind(&text, &self.options).unwrap_or(TokenKind::Identifier);
        self.build_token_with_value(kind, &text)
    }

    /// Scan `\uXXXX` or `\u{...}` starting at the backslash. Appends the
    /// decoded character to `out`; outside string literals the character
    /// must be a valid identifier part.
    fn scan_unicode_escape_sequence(
        &mut self,
        out: &mut String,
        in_string_literal: bool,
        reporter: &mut ErrorReporter,
    ) -> bool {
        self.advance(); // backslash
        if !self.current.uchar.is('u') {
            self.lexical_error(reporter, "unicode escape sequence not started with 'u'");
            return false;
        }
        self.advance();
        let value = if self.current.uchar.is('{') {
            self.advance();
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.current.uchar.hex_value() {
                value = value.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.advance();
            }
            if digits == 0 || digits > 6 || !self.current.uchar.is('}') {
                self.lexical_error(reporter, "malformed unicode code point escape");
                return false;
            }
            self.advance(); // }
            value
        } else {
            match self.scan_hex_digits(4) {
                Some(v) => v,
                None => {
                    self.lexical_error(reporter, "not allowed token in unicode escape sequence");
                    return false;
                }
            }
        };
        let Some(ch) = char::from_u32(value) else {
            self.lexical_error(reporter, "unicode escape encodes a surrogate half");
            return false;
        };
        if !in_string_literal && !Uchar::new(value).is_identifier_part() {
            self.lexical_error(reporter, "not allowed token in unicode escape sequence");
            return false;
        }
        out.push(ch);
        true
    }

    /// Scan `len` hex digits starting at the current scalar.
    fn scan_hex_digits(&mut self, len: u32) -> Option<u32> {
        let mut result: u32 = 0;
        for _ in 0..len {
            let d = self.current.uchar.hex_value()?;
            result = result * 16 + d;
            self.advance();
        }
        Some(result)
    }

    // ----- strings -------------------------------------------------------

    fn scan_string_literal(&mut self, reporter: &mut ErrorReporter) -> Token {
        let quote = self.current.uchar;
        self.advance();
        let mut text = String::new();
        loop {
            let c = self.current.uchar;
            if c == quote {
                self.advance();
                return self.build_token_with_value(TokenKind::StringLiteral, &text);
            }
            if c.is_null() || c.is_invalid() || c.is_line_break() {
                self.lexical_error(reporter, "unterminated string literal");
                return self.build_token(TokenKind::Illegal);
            }
            if c.is('\\') {
                let escape = self.lookahead.uchar;
                if escape.is('u') {
                    if !self.scan_unicode_escape_sequence(&mut text, true, reporter) {
                        return self.build_token(TokenKind::Illegal);
                    }
                    continue;
                }
                if escape.is('x') {
                    if !self.scan_ascii_escape_sequence(&mut text, reporter) {
                        return self.build_token(TokenKind::Illegal);
                    }
                    continue;
                }
                self.advance(); // backslash
                let c = self.current.uchar;
                match c.value() {
                    0x6E => text.push('\n'), // n
                    0x72 => text.push('\r'), // r
                    0x74 => text.push('\t'), // t
                    0x62 => text.push('\u{8}'), // b
                    0x66 => text.push('\u{C}'), // f
                    0x76 => text.push('\u{B}'), // v
                    0x30 => text.push('\0'),
                    _ if c.is_line_break() => {
                        // Line continuation: swallow the terminator (CRLF as
                        // a pair) and contribute nothing to the value.
                        let cr = c.is('\r');
                        self.advance();
                        if cr && self.current.uchar.is('\n') {
                            self.advance();
                        }
                        continue;
                    }
                    _ => {
                        if let Some(ch) = c.to_char() {
                            text.push(ch);
                        }
                    }
                }
                self.advance();
                continue;
            }
            if let Some(ch) = c.to_char() {
                text.push(ch);
            }
            self.advance();
        }
    }

    /// Scan `\xHH` starting at the backslash.
    fn scan_ascii_escape_sequence(
        &mut self,
        out: &mut String,
        reporter: &mut ErrorReporter,
    ) -> bool {
        self.advance(); // backslash
        if !self.current.uchar.is('x') {
            self.lexical_error(reporter, "illegal escape sequence");
            return false;
        }
        self.advance();
        match self.scan_hex_digits(2) {
            Some(v) if v < 0x80 => {
                out.push(char::from_u32(v).unwrap_or('\u{FFFD}'));
                true
            }
            _ => {
                self.lexical_error(reporter, "illegal hex escape sequence");
                false
            }
        }
    }

    // ----- numbers -------------------------------------------------------

    fn scan_digit(&mut self, reporter: &mut ErrorReporter) -> Token {
        let c = self.current.uchar;
        let la = self.lookahead.uchar;
        if c.is('0') && (la.is('x') || la.is('X')) {
            return self.scan_hex_literal(reporter);
        }
        if c.is('0') {
            if la.is_decimal_digit() {
                if !self.options.language_mode.allows_octal_literals() {
                    self.lexical_error(
                        reporter,
                        format!(
                            "octal literals are not allowed in language mode {}",
                            self.options.language_mode.as_str()
                        ),
                    );
                    self.skip_decimal_digits();
                    return self.build_token(TokenKind::Illegal);
                }
                return self.scan_legacy_octal_literal();
            }
            if la.is('o') || la.is('O') {
                return self.scan_prefixed_literal(
                    TokenKind::OctalLiteral,
                    Uchar::is_octal_digit,
                    "invalid octal literal token",
                    reporter,
                );
            }
            if la.is('b') || la.is('B') {
                return self.scan_prefixed_literal(
                    TokenKind::BinaryLiteral,
                    Uchar::is_binary_digit,
                    "invalid binary literal token",
                    reporter,
                );
            }
        }
        self.scan_integer(reporter)
    }

    fn scan_hex_literal(&mut self, reporter: &mut ErrorReporter) -> Token {
        let mut text = String::new();
        self.push_current(&mut text); // 0
        self.push_current(&mut text); // x
        if !self.current.uchar.is_hex_digit() {
            self.lexical_error(reporter, "invalid hex literal token");
            return self.build_token(TokenKind::Illegal);
        }
        while self.current.uchar.is_hex_digit() {
            self.push_current(&mut text);
        }
        self.build_token_with_value(TokenKind::NumericLiteral, &text)
    }

    fn scan_legacy_octal_literal(&mut self) -> Token {
        let mut text = String::new();
        while self.current.uchar.is_decimal_digit() {
            self.push_current(&mut text);
        }
        self.build_token_with_value(TokenKind::OctalLiteral, &text)
    }

    /// `0o...` / `0b...` style literals, gated to ES6.
    fn scan_prefixed_literal(
        &mut self,
        kind: TokenKind,
        digit: fn(Uchar) -> bool,
        error: &str,
        reporter: &mut ErrorReporter,
    ) -> Token {
        if !self.options.language_mode.allows_binary_literals() {
            self.lexical_error(
                reporter,
                format!(
                    "{} literals are not allowed in language mode {}",
                    if kind == TokenKind::BinaryLiteral {
                        "binary"
                    } else {
                        "octal"
                    },
                    self.options.language_mode.as_str()
                ),
            );
            self.advance();
            self.advance();
            while digit(self.current.uchar) || self.current.uchar.is_decimal_digit() {
                self.advance();
            }
            return self.build_token(TokenKind::Illegal);
        }
        let mut text = String::new();
        self.push_current(&mut text); // 0
        self.push_current(&mut text); // o / b
        if !digit(self.current.uchar) {
            self.lexical_error(reporter, error);
            return self.build_token(TokenKind::Illegal);
        }
        while digit(self.current.uchar) {
            self.push_current(&mut text);
        }
        self.build_token_with_value(kind, &text)
    }

    fn scan_integer(&mut self, reporter: &mut ErrorReporter) -> Token {
        let mut text = String::new();
        let mut js_double = self.current.uchar.is('.');
        let mut exponent = false;
        let mut exponent_operator = false;
        self.push_current(&mut text);

        loop {
            let c = self.current.uchar;
            if c.is_decimal_digit() {
                self.push_current(&mut text);
                exponent = false;
                exponent_operator = false;
            } else if exponent && (c.is('+') || c.is('-')) {
                self.push_current(&mut text);
                exponent_operator = true;
            } else if exponent {
                // 'e' followed by something that is neither sign nor digit
                self.lexical_error(reporter, "illegal token in numeric literal");
                return self.build_token(TokenKind::Illegal);
            } else if c.is('.') && !js_double && self.lookahead.uchar.is_decimal_digit() {
                self.push_current(&mut text);
                self.push_current(&mut text);
                js_double = true;
            } else if c.is('.') && js_double {
                self.lexical_error(reporter, "illegal token in numeric literal");
                return self.build_token(TokenKind::Illegal);
            } else if c.is('e') || c.is('E') {
                exponent = true;
                self.push_current(&mut text);
            } else {
                break;
            }
        }
        if exponent || exponent_operator {
            // dangling exponent, e.g. `1e` or `1e+` at the end
            self.lexical_error(reporter, "illegal token in numeric literal");
            return self.build_token(TokenKind::Illegal);
        }
        self.build_token_with_value(TokenKind::NumericLiteral, &text)
    }

    fn skip_decimal_digits(&mut self) {
        while self.current.uchar.is_decimal_digit() {
            self.advance();
        }
    }

    // ----- templates -----------------------------------------------------

    fn scan_template_part(&mut self, part: TemplatePart, reporter: &mut ErrorReporter) -> Token {
        let mut text = String::new();
        loop {
            let c = self.current.uchar;
            if c.is_null() || c.is_invalid() {
                self.lexical_error(reporter, "unterminated template literal");
                return self.build_token(TokenKind::Illegal);
            }
            if c.is('`') {
                self.advance();
                let kind = match part {
                    TemplatePart::Head => TokenKind::TemplateLiteral,
                    TemplatePart::Continuation => TokenKind::TemplateTail,
                };
                return self.build_token_with_value(kind, &text);
            }
            if c.is('$') && self.lookahead.uchar.is('{') {
                self.advance();
                self.advance();
                let kind = match part {
                    TemplatePart::Head => TokenKind::TemplateHead,
                    TemplatePart::Continuation => TokenKind::TemplateMiddle,
                };
                return self.build_token_with_value(kind, &text);
            }
            if c.is('\\') {
                // Keep escapes raw so `\`` and `\${` do not terminate.
                self.push_current(&mut text);
                if !self.current.uchar.is_null() && !self.current.uchar.is_invalid() {
                    self.push_current(&mut text);
                }
                continue;
            }
            self.push_current(&mut text);
        }
    }

    // ----- operators -----------------------------------------------------

    fn scan_operator(&mut self, reporter: &mut ErrorReporter) -> Token {
        let c = self.current.uchar.value() as u8 as char;
        match c {
            '+' => self.scan_arithmetic_operator(
                Some(TokenKind::Increment),
                TokenKind::AddAssign,
                TokenKind::Plus,
            ),
            '-' => self.scan_arithmetic_operator(
                Some(TokenKind::Decrement),
                TokenKind::SubAssign,
                TokenKind::Minus,
            ),
            '*' => self.scan_arithmetic_operator(None, TokenKind::MulAssign, TokenKind::Mul),
            '/' => self.scan_arithmetic_operator(None, TokenKind::DivAssign, TokenKind::Div),
            '%' => self.scan_arithmetic_operator(None, TokenKind::ModAssign, TokenKind::Mod),
            '~' => self.scan_arithmetic_operator(None, TokenKind::BitNotAssign, TokenKind::BitNot),
            '^' => self.scan_arithmetic_operator(None, TokenKind::XorAssign, TokenKind::BitXor),
            '&' => self.scan_logical_operator(
                TokenKind::LogicalAnd,
                TokenKind::AndAssign,
                TokenKind::BitAnd,
            ),
            '|' => self.scan_logical_operator(
                TokenKind::LogicalOr,
                TokenKind::OrAssign,
                TokenKind::BitOr,
            ),
            ',' => {
                self.advance();
                self.build_token(TokenKind::Comma)
            }
            '.' => {
                self.advance();
                if self.current.uchar.is('.') && self.lookahead.uchar.is('.') {
                    self.advance();
                    self.advance();
                    return self.build_token(TokenKind::Rest);
                }
                if self.current.uchar.is('.') {
                    self.advance();
                    self.lexical_error(reporter, "illegal token");
                    return self.build_token(TokenKind::Illegal);
                }
                self.build_token(TokenKind::Dot)
            }
            '=' => self.scan_equality_or_arrow(false),
            '!' => {
                if self.lookahead.uchar.is('=') {
                    self.advance();
                    return self.scan_equality_or_arrow(true);
                }
                self.advance();
                self.build_token(TokenKind::Not)
            }
            '<' => self.scan_shift_or_comparison(
                TokenKind::ShiftLeft,
                TokenKind::ShiftLeftAssign,
                None,
                TokenKind::Less,
                TokenKind::LessEqual,
            ),
            '>' => {
                if self.is_generic_mode() {
                    self.advance();
                    return self.build_token(TokenKind::Greater);
                }
                self.scan_shift_or_comparison(
                    TokenKind::ShiftRight,
                    TokenKind::ShiftRightAssign,
                    Some(TokenKind::UShiftRight),
                    TokenKind::Greater,
                    TokenKind::GreaterEqual,
                )
            }
            _ => {
                self.advance();
                self.lexical_error(reporter, "illegal token");
                self.build_token(TokenKind::Illegal)
            }
        }
    }

    /// `X` / `XX` / `X=` family (`+`, `-`, `*`, `/`, `%`, `~`, `^`).
    fn scan_arithmetic_operator(
        &mut self,
        doubled: Option<TokenKind>,
        with_assign: TokenKind,
        normal: TokenKind,
    ) -> Token {
        let c = self.current.uchar;
        self.advance();
        if let Some(kind) = doubled {
            if self.current.uchar == c {
                self.advance();
                return self.build_token(kind);
            }
        }
        if self.current.uchar.is('=') {
            self.advance();
            return self.build_token(with_assign);
        }
        self.build_token(normal)
    }

    /// `&&` / `&=` / `&` family (also `|`).
    fn scan_logical_operator(
        &mut self,
        doubled: TokenKind,
        with_assign: TokenKind,
        normal: TokenKind,
    ) -> Token {
        let c = self.current.uchar;
        self.advance();
        if self.current.uchar == c {
            self.advance();
            return self.build_token(doubled);
        }
        if self.current.uchar.is('=') {
            self.advance();
            return self.build_token(with_assign);
        }
        self.build_token(normal)
    }

    /// `<` / `<<` / `<<=` / `<=` and `>` / `>>` / `>>>` / `>=` / `>>=` /
    /// `>>>=`.
    fn scan_shift_or_comparison(
        &mut self,
        shift: TokenKind,
        shift_assign: TokenKind,
        unsigned: Option<TokenKind>,
        normal: TokenKind,
        comparator: TokenKind,
    ) -> Token {
        let c = self.current.uchar;
        self.advance();
        if self.current.uchar == c {
            self.advance();
            if self.current.uchar.is('=') {
                self.advance();
                return self.build_token(shift_assign);
            }
            if let Some(unsigned) = unsigned {
                if self.current.uchar == c {
                    self.advance();
                    if self.current.uchar.is('=') {
                        self.advance();
                        return self.build_token(TokenKind::UShiftRightAssign);
                    }
                    return self.build_token(unsigned);
                }
            }
            return self.build_token(shift);
        }
        if self.current.uchar.is('=') {
            self.advance();
            return self.build_token(comparator);
        }
        self.build_token(normal)
    }

    /// `=` / `==` / `===` / `=>`, or with `not` set (cursor on the `=` of
    /// `!=`): `!=` / `!==`.
    fn scan_equality_or_arrow(&mut self, not: bool) -> Token {
        let c = self.current.uchar;
        self.advance();
        if self.current.uchar == c {
            self.advance();
            if !not && self.current.uchar == c {
                self.advance();
                return self.build_token(TokenKind::StrictEqual);
            }
            return self.build_token(if not {
                TokenKind::StrictNotEqual
            } else {
                TokenKind::Equal
            });
        }
        if !not && self.current.uchar.is('>') {
            self.advance();
            return self.build_token(TokenKind::Arrow);
        }
        self.build_token(if not {
            TokenKind::NotEqual
        } else {
            TokenKind::Assign
        })
    }

    // ----- trivia --------------------------------------------------------

    /// Skip a leading BOM and a `#!` line.
    fn skip_signature(&mut self) {
        if self.current.uchar.value() == 0xFEFF {
            self.advance();
        }
        if self.current.uchar.is('#') && self.lookahead.uchar.is('!') {
            while !self.current.uchar.is_null() && !self.current.uchar.is_line_break() {
                self.advance();
            }
        }
    }

    fn skip_trivia(&mut self, reporter: &mut ErrorReporter) {
        loop {
            let c = self.current.uchar;
            if c.is_line_break() {
                self.line_break_before_next = true;
                self.advance();
                continue;
            }
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            if c.is('/') && self.lookahead.uchar.is('/') {
                self.skip_single_line_comment();
                continue;
            }
            if c.is('/') && self.lookahead.uchar.is('*') {
                self.skip_multi_line_comment(reporter);
                continue;
            }
            break;
        }
        if self.current.uchar.is(';') {
            self.line_terminator_before_next = true;
        }
        if self.current.uchar.is_null() {
            self.line_break_before_next = true;
        }
    }

    fn skip_single_line_comment(&mut self) {
        self.advance();
        self.advance();
        if self.current.uchar.is('/') {
            self.advance();
            self.try_reference_path_directive();
        }
        while !self.current.uchar.is_null() && !self.current.uchar.is_line_break() {
            self.advance();
        }
    }

    /// Recognise `<reference path="..."/>` after a `///`. On a match the
    /// decoded path is handed to the reference-path callback; on a mismatch
    /// the cursor is simply left for the caller's skip-to-end-of-line.
    fn try_reference_path_directive(&mut self) {
        self.skip_inline_whitespace();
        if !self.current.uchar.is('<') {
            return;
        }
        self.advance();
        self.skip_inline_whitespace();
        if !self.consume_word("reference") {
            return;
        }
        self.skip_inline_whitespace();
        if !self.consume_word("path") {
            return;
        }
        self.skip_inline_whitespace();
        if !self.current.uchar.is('=') {
            return;
        }
        self.advance();
        self.skip_inline_whitespace();
        let quote = self.current.uchar;
        if !quote.is_string_literal_start() {
            return;
        }
        self.advance();
        let mut path = String::new();
        while self.current.uchar != quote {
            let c = self.current.uchar;
            if c.is_null() || c.is_line_break() {
                return;
            }
            if let Some(ch) = c.to_char() {
                path.push(ch);
            }
            self.advance();
        }
        self.advance(); // closing quote
        self.skip_inline_whitespace();
        if !self.current.uchar.is('/') {
            return;
        }
        self.advance();
        self.skip_inline_whitespace();
        if !self.current.uchar.is('>') {
            return;
        }
        self.advance();
        if let Some(cb) = self.reference_path_callback.as_mut() {
            cb(&path);
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while self.current.uchar.is_whitespace() && !self.current.uchar.is_line_break() {
            self.advance();
        }
    }

    fn consume_word(&mut self, word: &str) -> bool {
        for expected in word.chars() {
            if !self.current.uchar.is(expected) {
                return false;
            }
            self.advance();
        }
        true
    }

    fn skip_multi_line_comment(&mut self, reporter: &mut ErrorReporter) {
        let mut text = String::from("/*");
        self.advance();
        self.advance();
        loop {
            let c = self.current.uchar;
            if c.is_null() {
                self.lexical_error(reporter, "unterminated multi-line comment");
                return;
            }
            if c.is_line_break() {
                self.line_break_before_next = true;
            }
            if c.is('*') && self.lookahead.uchar.is('/') {
                self.advance();
                self.advance();
                text.push_str("*/");
                self.last_multi_line_comment = Some(self.literals.intern(&text));
                return;
            }
            if let Some(ch) = c.to_char() {
                text.push(ch);
            }
            self.advance();
        }
    }

    // ----- plumbing ------------------------------------------------------

    fn advance(&mut self) {
        self.current = self.lookahead;
        self.lookahead = self.adapter.advance();
    }

    /// Append the current scalar to `out` and advance past it.
    fn push_current(&mut self, out: &mut String) {
        if let Some(ch) = self.current.uchar.to_char() {
            out.push(ch);
        }
        self.advance();
    }

    fn reset_to(&mut self, offset: u32, line: u32) {
        self.adapter.seek(offset, line);
        self.current = self.adapter.advance();
        self.lookahead = self.adapter.advance();
    }

    fn token_position(&self) -> SourcePosition {
        SourcePosition::new(
            self.token_start_offset,
            self.current.offset,
            self.token_start_line,
            self.current.line,
        )
    }

    fn build_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_position())
    }

    fn build_token_with_value(&mut self, kind: TokenKind, text: &str) -> Token {
        let atom = self.literals.intern(text);
        let mut token = Token::new(kind, self.token_position());
        token.value = Some(atom);
        token
    }

    fn lexical_error(&self, reporter: &mut ErrorReporter, message: impl Into<String>) {
        reporter.lexical_error(self.token_position(), message);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TemplatePart {
    Head,
    Continuation,
}
