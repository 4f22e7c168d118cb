//! Parser core: token cursor, checkpoints, memoization and error recovery.
//!
//! The grammar itself is split the way the productions group:
//! [`expression`], [`statement`], [`types`], [`module`] and [`ambient`].
//! Every production returns a [`ParseResult`]; `Err(Failed)` lets the caller
//! decide between propagating and resynchronising on a sync token, while
//! `Err(Fatal)` unwinds the whole parse (end of input mid-construct).

mod ambient;
mod expression;
mod module;
mod statement;
mod types;

use crate::ast::{NodeArena, NodeId, NodeKind};
use crate::scope::{ScopeArena, ScopeId, SymbolType};
use crate::state::{ContextState, EnclosureBalancer, ParserContext};
use rustc_hash::FxHashMap;
use tracing::trace;
use tsf_common::{Atom, CompilerOptions, Diagnostic, ErrorReporter, LiteralBuffer, SourcePosition};
use tsf_scanner::{Scanner, ScannerCheckpoint, Token, TokenKind};

/// Why a production did not produce a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The production failed; a diagnostic has been recorded (or the caller
    /// is speculating and will roll back).
    Failed,
    /// End of input reached where recovery would not be sound.
    Fatal,
}

pub type ParseResult = Result<NodeId, ParseError>;

/// Callback invoked with the specifier of every referenced module.
pub type ModuleFoundCallback<'a> = Box<dyn FnMut(&str) + 'a>;

/// Everything a finished parse hands back to the driver.
pub struct ParseOutput {
    pub root: Option<NodeId>,
    pub arena: NodeArena,
    pub scopes: ScopeArena,
    pub literals: LiteralBuffer,
    pub diagnostics: Vec<Diagnostic>,
}

/// Full parser state snapshot. Restoring replays the same token stream and
/// rolls back scope selection, bracket accounting, context frames and any
/// diagnostics recorded after the snapshot.
#[derive(Clone)]
pub(crate) struct ParserCheckpoint {
    scanner: ScannerCheckpoint,
    cur: Token,
    prev: Token,
    scope: ScopeId,
    balancer: EnclosureBalancer,
    context_depth: usize,
    error_count: usize,
}

/// A memoized parse attempt: the result plus the parser state right after it.
#[derive(Clone)]
pub(crate) struct Memo {
    result: Result<NodeId, ParseError>,
    after: ParserCheckpoint,
}

/// Result of scanning the optional `get`/`set` prefix of a member.
#[derive(Clone, Copy)]
pub(crate) struct AccessorInfo {
    pub getter: bool,
    pub setter: bool,
}

impl AccessorInfo {
    pub(crate) const fn none() -> Self {
        AccessorInfo {
            getter: false,
            setter: false,
        }
    }
}

/// Atoms for the contextual keywords the scanner leaves as identifiers.
pub(crate) struct ContextualAtoms {
    pub declare: Atom,
    pub module: Atom,
    pub of: Atom,
    pub as_: Atom,
    pub from: Atom,
    pub get: Atom,
    pub set: Atom,
    pub require: Atom,
    pub constructor: Atom,
    pub string: Atom,
    pub number: Atom,
    pub void_: Atom,
    pub null: Atom,
}

impl ContextualAtoms {
    fn intern(literals: &mut LiteralBuffer) -> Self {
        ContextualAtoms {
            declare: literals.intern("declare"),
            module: literals.intern("module"),
            of: literals.intern("of"),
            as_: literals.intern("as"),
            from: literals.intern("from"),
            get: literals.intern("get"),
            set: literals.intern("set"),
            require: literals.intern("require"),
            constructor: literals.intern("constructor"),
            string: literals.intern("string"),
            number: literals.intern("number"),
            void_: literals.intern("void"),
            null: literals.intern("null"),
        }
    }
}

pub struct Parser<'a> {
    pub(crate) options: CompilerOptions,
    pub(crate) scanner: Scanner<'a>,
    pub(crate) arena: NodeArena,
    pub(crate) scopes: ScopeArena,
    pub(crate) reporter: ErrorReporter,
    pub(crate) context: ParserContext,
    pub(crate) balancer: EnclosureBalancer,
    pub(crate) memo: FxHashMap<u32, Memo>,
    pub(crate) cur: Token,
    pub(crate) prev: Token,
    pub(crate) scope: ScopeId,
    pub(crate) is_declaration_file: bool,
    pub(crate) ctx_atoms: ContextualAtoms,
    pub(crate) module_found_callback: Option<ModuleFoundCallback<'a>>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(
        mut scanner: Scanner<'a>,
        options: CompilerOptions,
        is_declaration_file: bool,
    ) -> Self {
        let ctx_atoms = ContextualAtoms::intern(scanner.literals_mut());
        let mut reporter = ErrorReporter::new();
        let cur = scanner.scan(&mut reporter);
        Parser {
            options,
            scanner,
            arena: NodeArena::new(),
            scopes: ScopeArena::new(),
            reporter,
            context: ParserContext::new(),
            balancer: EnclosureBalancer::new(),
            memo: FxHashMap::default(),
            cur,
            prev: Token::eof(),
            scope: ScopeId::GLOBAL,
            is_declaration_file,
            ctx_atoms,
            module_found_callback: None,
        }
    }

    /// Install the driver hook fired for every module specifier found in
    /// `import ... = require("...")` and from-clauses.
    pub fn set_module_found_callback(&mut self, cb: ModuleFoundCallback<'a>) {
        self.module_found_callback = Some(cb);
    }

    /// Parse the whole input. Dispatches on declaration-file mode.
    pub fn parse(&mut self) -> ParseResult {
        trace!(declaration_file = self.is_declaration_file, "parse start");
        if self.is_declaration_file {
            self.parse_declaration_module()
        } else {
            self.parse_module()
        }
    }

    pub fn into_output(self, root: Option<NodeId>) -> ParseOutput {
        ParseOutput {
            root,
            arena: self.arena,
            scopes: self.scopes,
            literals: self.scanner.into_literals(),
            diagnostics: self.reporter.into_diagnostics(),
        }
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[must_use]
    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    #[must_use]
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    #[must_use]
    pub fn literals(&self) -> &LiteralBuffer {
        self.scanner.literals()
    }

    #[must_use]
    pub fn global_scope(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Current `(paren, bracket, brace)` open/close differences. All three
    /// are zero at every completed top-level statement boundary.
    #[must_use]
    pub fn bracket_counters(&self) -> (i32, i32, i32) {
        (
            self.balancer.paren_difference(),
            self.balancer.bracket_difference(),
            self.balancer.brace_difference(),
        )
    }

    // ----- token cursor --------------------------------------------------

    /// Advance to the next token and return a copy of it.
    pub(crate) fn next(&mut self) -> Token {
        let token = self.scanner.scan(&mut self.reporter);
        self.prev = std::mem::replace(&mut self.cur, token);
        self.cur.clone()
    }

    #[inline]
    pub(crate) fn cur_kind(&self) -> TokenKind {
        self.cur.kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn consume_if(&mut self, kind: TokenKind) -> bool {
        if self.cur.is(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Require and consume a token, recording a syntax error on mismatch.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.cur.is(kind) {
            self.next();
            Ok(())
        } else {
            Err(self.err_cur(format!("'{}' expected", kind.describe())))
        }
    }

    /// The interned text of a token value.
    pub(crate) fn token_text(&self, token: &Token) -> Option<&str> {
        token.value.map(|atom| self.scanner.literals().utf8(atom))
    }

    /// True when the token is an identifier spelling the given atom.
    pub(crate) fn is_contextual(&self, token: &Token, atom: Atom) -> bool {
        token.is(TokenKind::Identifier) && token.value == Some(atom)
    }

    // ----- diagnostics ---------------------------------------------------

    pub(crate) fn err_cur(&mut self, message: impl Into<String>) -> ParseError {
        self.reporter.syntax_error(self.cur.pos, message);
        ParseError::Failed
    }

    pub(crate) fn err_at(&mut self, pos: SourcePosition, message: impl Into<String>) -> ParseError {
        self.reporter.syntax_error(pos, message);
        ParseError::Failed
    }

    pub(crate) fn context_err_cur(&mut self, message: impl Into<String>) -> ParseError {
        self.reporter.context_error(self.cur.pos, message);
        ParseError::Failed
    }

    pub(crate) fn unexpected_token(&mut self) -> ParseError {
        let text = self
            .token_text(&self.cur.clone())
            .map(str::to_string)
            .unwrap_or_else(|| self.cur.kind.describe().to_string());
        self.err_cur(format!("unexpected token '{text}'"))
    }

    /// End of input where recovery is unsound: record a fatal diagnostic.
    pub(crate) fn unexpected_end_of_input(&mut self) -> ParseError {
        self.reporter
            .report(tsf_common::ErrorKind::Fatal, self.prev.pos, "unexpected end of input");
        ParseError::Fatal
    }

    pub(crate) fn check_eof(&mut self) -> Result<(), ParseError> {
        if self.cur.is(TokenKind::Eof) {
            Err(self.unexpected_end_of_input())
        } else {
            Ok(())
        }
    }

    // ----- checkpoints and memoization -----------------------------------

    pub(crate) fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            scanner: self.scanner.checkpoint(),
            cur: self.cur.clone(),
            prev: self.prev.clone(),
            scope: self.scope,
            balancer: self.balancer,
            context_depth: self.context.depth(),
            error_count: self.reporter.count(),
        }
    }

    pub(crate) fn restore(&mut self, cp: &ParserCheckpoint) {
        self.scanner.restore(cp.scanner);
        self.cur = cp.cur.clone();
        self.prev = cp.prev.clone();
        self.scope = cp.scope;
        self.balancer = cp.balancer;
        self.context.truncate(cp.context_depth);
        self.reporter.truncate(cp.error_count);
    }

    /// Look up a memoized parse for the current position; a hit restores the
    /// recorded post-parse state and replays the result.
    pub(crate) fn memoized(&mut self, start: u32) -> Option<Result<NodeId, ParseError>> {
        let memo = self.memo.get(&start)?.clone();
        self.restore(&memo.after);
        Some(memo.result)
    }

    pub(crate) fn memoize(&mut self, start: u32, result: Result<NodeId, ParseError>) {
        let after = self.checkpoint();
        self.memo.insert(start, Memo { result, after });
    }

    // ----- scopes --------------------------------------------------------

    pub(crate) fn push_scope(&mut self) -> ScopeId {
        let scope = self.scopes.new_scope(self.scope);
        self.scope = scope;
        scope
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope = self
            .scopes
            .parent(self.scope)
            .unwrap_or(ScopeId::GLOBAL);
    }

    /// Record a declaration for `node` under `name` in the current scope.
    pub(crate) fn declare(&mut self, name: Atom, ty: SymbolType, node: NodeId) {
        self.scopes.declare(self.scope, name, ty, node);
    }

    /// Declare the name of a binding target: a plain name, or every bound
    /// name of a destructuring pattern. For `{ key: target }` properties the
    /// bound name is the target, not the property key.
    pub(crate) fn declare_binding(&mut self, binding: NodeId, ty: SymbolType, decl: NodeId) {
        match self.arena.kind(binding).clone() {
            NodeKind::Name { name } => self.declare(name, ty, decl),
            NodeKind::BindingElement { name, value, .. } => {
                if let Some(value) = value {
                    self.declare_binding(value, ty, decl);
                } else if let Some(name) = name {
                    self.declare_binding(name, ty, decl);
                }
            }
            NodeKind::BindingArray { elements } => {
                for element in elements {
                    self.declare_binding(element, ty, decl);
                }
            }
            NodeKind::BindingPropList { properties } => {
                for property in properties {
                    self.declare_binding(property, ty, decl);
                }
            }
            NodeKind::RestParam { expr } => self.declare_binding(expr, ty, decl),
            NodeKind::Parameter { name, .. } => self.declare_binding(name, ty, decl),
            _ => {}
        }
    }

    // ----- contexts ------------------------------------------------------

    pub(crate) fn with_context<T>(
        &mut self,
        state: ContextState,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.context.enter(state);
        let result = f(self);
        self.context.exit(state);
        result
    }

    // ----- automatic semicolon insertion ---------------------------------

    /// A statement may terminate here: explicit `;`, a line break before the
    /// current token, `}` or end of input.
    pub(crate) fn is_line_termination(&self) -> bool {
        self.cur.is(TokenKind::LineTerminator)
            || self.cur.is(TokenKind::Eof)
            || self.prev.line_break_before_next
            || self.cur.is(TokenKind::RightBrace)
    }

    /// Consume an explicit `;` if present.
    pub(crate) fn consume_line_terminator(&mut self) {
        if self.cur.is(TokenKind::LineTerminator) {
            self.next();
        }
    }

    /// Statement epilogue: accept ASI or report the missing `;`.
    pub(crate) fn expect_statement_end(&mut self) {
        if self.is_line_termination() {
            self.consume_line_terminator();
        } else if !self.cur.one_of(&[TokenKind::RightBrace, TokenKind::LeftBrace]) {
            self.reporter.syntax_error(self.cur.pos, "';' expected");
        }
    }

    // ----- error recovery ------------------------------------------------

    /// Skip tokens until one of `kinds` is found at bracket depth zero, or a
    /// close bracket that belongs to an enclosing construct comes up, or the
    /// input ends. With `advance_past` the sync token itself is consumed.
    pub(crate) fn skip_tokens_until(&mut self, kinds: &[TokenKind], advance_past: bool) {
        self.context.enter_error_recovery();
        let mut paren = 0i32;
        let mut brace = 0i32;
        let mut bracket = 0i32;
        loop {
            let kind = self.cur_kind();
            if kind == TokenKind::Eof {
                break;
            }
            let at_depth_zero = paren <= 0 && brace <= 0 && bracket <= 0;
            if at_depth_zero && kinds.contains(&kind) {
                if advance_past {
                    self.next();
                }
                break;
            }
            match kind {
                TokenKind::LeftParen => paren += 1,
                TokenKind::LeftBrace => brace += 1,
                TokenKind::LeftBracket => bracket += 1,
                TokenKind::RightParen => {
                    if paren == 0 {
                        break; // closes an enclosing construct
                    }
                    paren -= 1;
                }
                TokenKind::RightBrace => {
                    if brace == 0 {
                        break;
                    }
                    brace -= 1;
                }
                TokenKind::RightBracket => {
                    if bracket == 0 {
                        break;
                    }
                    bracket -= 1;
                }
                _ => {}
            }
            self.next();
        }
        self.context.exit_error_recovery();
    }

    /// Recovery combinator: on failure skip to a sync token and yield `None`
    /// (fatal errors still propagate).
    pub(crate) fn skip_token_or(
        &mut self,
        result: ParseResult,
        kinds: &[TokenKind],
    ) -> Result<Option<NodeId>, ParseError> {
        match result {
            Ok(node) => Ok(Some(node)),
            Err(ParseError::Fatal) => Err(ParseError::Fatal),
            Err(ParseError::Failed) => {
                self.skip_tokens_until(kinds, false);
                Ok(None)
            }
        }
    }

    // ----- node construction ---------------------------------------------

    /// Allocate a node spanning from `start` to the end of the previous
    /// token.
    pub(crate) fn node(&mut self, kind: NodeKind, start: SourcePosition) -> NodeId {
        let end = if self.prev.pos.end_offset >= start.start_offset {
            self.prev.pos
        } else {
            start
        };
        self.arena.alloc(kind, start.extend_to(end))
    }

    /// Allocate a node carrying exactly the position of one token.
    pub(crate) fn node_at(&mut self, kind: NodeKind, pos: SourcePosition) -> NodeId {
        self.arena.alloc(kind, pos)
    }
}
