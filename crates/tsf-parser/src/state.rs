//! Parser context stack and bracket-balance accounting.

/// One frame of the parser's context stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    Function,
    Generator,
    Iteration,
    CaseBlock,
    NoIn,
}

/// Explicit stack of grammar contexts plus the error-recovery flag.
///
/// Queries that depend on function boundaries (`is_breakable`,
/// `is_continuable`, `is_in_generator`) walk the stack from the top and stop
/// at the nearest `Function`/`Generator` frame.
#[derive(Clone, Debug, Default)]
pub struct ParserContext {
    stack: Vec<ContextState>,
    error_recovery: bool,
}

impl ParserContext {
    #[must_use]
    pub fn new() -> Self {
        ParserContext::default()
    }

    pub fn enter(&mut self, state: ContextState) {
        self.stack.push(state);
    }

    pub fn exit(&mut self, state: ContextState) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(state));
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn truncate(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    /// The innermost function-ish frame is a plain function.
    #[must_use]
    pub fn is_in_function(&self) -> bool {
        for state in self.stack.iter().rev() {
            match state {
                ContextState::Function => return true,
                ContextState::Generator => return false,
                _ => {}
            }
        }
        false
    }

    /// The innermost function-ish frame is a generator.
    #[must_use]
    pub fn is_in_generator(&self) -> bool {
        for state in self.stack.iter().rev() {
            match state {
                ContextState::Generator => return true,
                ContextState::Function => return false,
                _ => {}
            }
        }
        false
    }

    /// `return` is allowed: some function-ish frame encloses us.
    #[must_use]
    pub fn is_returnable(&self) -> bool {
        self.stack
            .iter()
            .any(|s| matches!(s, ContextState::Function | ContextState::Generator))
    }

    /// `break` is allowed: a loop or case block inside the current function.
    #[must_use]
    pub fn is_breakable(&self) -> bool {
        for state in self.stack.iter().rev() {
            match state {
                ContextState::Iteration | ContextState::CaseBlock => return true,
                ContextState::Function | ContextState::Generator => return false,
                ContextState::NoIn => {}
            }
        }
        false
    }

    /// `continue` is allowed: a loop inside the current function.
    #[must_use]
    pub fn is_continuable(&self) -> bool {
        for state in self.stack.iter().rev() {
            match state {
                ContextState::Iteration => return true,
                ContextState::Function | ContextState::Generator => return false,
                _ => {}
            }
        }
        false
    }

    #[must_use]
    pub fn is_in_iteration(&self) -> bool {
        self.stack.last() == Some(&ContextState::Iteration)
    }

    #[must_use]
    pub fn is_in_case_block(&self) -> bool {
        self.stack.last() == Some(&ContextState::CaseBlock)
    }

    /// `in` is currently disabled as a relational operator.
    #[must_use]
    pub fn no_in(&self) -> bool {
        self.stack.last() == Some(&ContextState::NoIn)
    }

    pub fn enter_error_recovery(&mut self) {
        self.error_recovery = true;
    }

    pub fn exit_error_recovery(&mut self) {
        self.error_recovery = false;
    }

    #[must_use]
    pub fn is_in_error_recovery(&self) -> bool {
        self.error_recovery
    }
}

/// Open/close counters per bracket kind, used by error recovery to avoid
/// skipping past the close of an enclosing construct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnclosureBalancer {
    open_brace: i32,
    open_bracket: i32,
    open_paren: i32,
}

impl EnclosureBalancer {
    #[must_use]
    pub fn new() -> Self {
        EnclosureBalancer::default()
    }

    pub fn open_brace_found(&mut self) {
        self.open_brace += 1;
    }

    pub fn close_brace_found(&mut self) {
        self.open_brace -= 1;
    }

    pub fn open_bracket_found(&mut self) {
        self.open_bracket += 1;
    }

    pub fn close_bracket_found(&mut self) {
        self.open_bracket -= 1;
    }

    pub fn open_paren_found(&mut self) {
        self.open_paren += 1;
    }

    pub fn close_paren_found(&mut self) {
        self.open_paren -= 1;
    }

    #[must_use]
    pub const fn brace_difference(&self) -> i32 {
        self.open_brace
    }

    #[must_use]
    pub const fn bracket_difference(&self) -> i32 {
        self.open_bracket
    }

    #[must_use]
    pub const fn paren_difference(&self) -> i32 {
        self.open_paren
    }

    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.open_brace == 0 && self.open_bracket == 0 && self.open_paren == 0
    }

    pub fn balance_brace(&mut self) {
        self.open_brace = 0;
    }

    pub fn balance_bracket(&mut self) {
        self.open_bracket = 0;
    }

    pub fn balance_paren(&mut self) {
        self.open_paren = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_and_generator_shadow_each_other() {
        let mut ctx = ParserContext::new();
        ctx.enter(ContextState::Function);
        assert!(ctx.is_in_function());
        assert!(!ctx.is_in_generator());
        ctx.enter(ContextState::Generator);
        assert!(ctx.is_in_generator());
        assert!(!ctx.is_in_function());
        ctx.exit(ContextState::Generator);
        assert!(ctx.is_in_function());
    }

    #[test]
    fn breakable_stops_at_function_boundary() {
        let mut ctx = ParserContext::new();
        ctx.enter(ContextState::Iteration);
        assert!(ctx.is_breakable());
        ctx.enter(ContextState::Function);
        assert!(!ctx.is_breakable());
        assert!(ctx.is_returnable());
    }

    #[test]
    fn continue_allowed_through_case_block() {
        let mut ctx = ParserContext::new();
        ctx.enter(ContextState::Function);
        ctx.enter(ContextState::Iteration);
        ctx.enter(ContextState::CaseBlock);
        assert!(ctx.is_breakable());
        assert!(ctx.is_continuable());
    }

    #[test]
    fn truncate_rolls_back_speculative_frames() {
        let mut ctx = ParserContext::new();
        ctx.enter(ContextState::Function);
        let depth = ctx.depth();
        ctx.enter(ContextState::Iteration);
        ctx.enter(ContextState::NoIn);
        ctx.truncate(depth);
        assert!(ctx.is_in_function());
        assert!(!ctx.no_in());
    }

    #[test]
    fn balancer_tracks_differences() {
        let mut b = EnclosureBalancer::new();
        b.open_paren_found();
        b.open_brace_found();
        assert_eq!(b.paren_difference(), 1);
        assert!(!b.is_balanced());
        b.close_paren_found();
        b.close_brace_found();
        assert!(b.is_balanced());
    }
}
