//! Compiler options shared by the scanner, parser and driver.
//!
//! The language mode decides which keyword set and literal forms the scanner
//! accepts; the module kind decides whether `module` is a keyword. Both are
//! resolved once per compilation and passed by value; they never change
//! while a file is being parsed.

/// ECMAScript language mode.
///
/// This determines which language features are available during scanning
/// and parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum LanguageMode {
    /// ECMAScript 3
    Es3 = 0,

    /// ECMAScript 5 strict mode
    Es5Strict = 1,

    /// ECMAScript 2015 (6th Edition)
    #[default]
    Es6 = 2,
}

impl LanguageMode {
    /// Check if ES6-only syntax is available (`let`, `const`, `yield`,
    /// binary literals, for-of, destructuring retries).
    #[must_use]
    pub const fn is_es6(self) -> bool {
        matches!(self, LanguageMode::Es6)
    }

    /// Legacy octal literals (`0777`) are only accepted in ES3.
    #[must_use]
    pub const fn allows_octal_literals(self) -> bool {
        matches!(self, LanguageMode::Es3)
    }

    /// Binary (`0b`) and modern octal (`0o`) literals are ES6-only.
    #[must_use]
    pub const fn allows_binary_literals(self) -> bool {
        matches!(self, LanguageMode::Es6)
    }

    /// Future reserved words (`package`, ...) are reported outside ES3.
    #[must_use]
    pub const fn reports_future_reserved_words(self) -> bool {
        !matches!(self, LanguageMode::Es3)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LanguageMode::Es3 => "es3",
            LanguageMode::Es5Strict => "es5",
            LanguageMode::Es6 => "es6",
        }
    }
}

/// Module dialect: decides how the `module` identifier is tokenized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ModuleKind {
    /// TypeScript internal modules: `module` is a keyword.
    #[default]
    TypeScript = 0,

    /// ES6 modules: `module` stays an identifier and the parser recognises
    /// the `module x from "..."` shorthand contextually.
    Es6 = 1,
}

impl ModuleKind {
    #[must_use]
    pub const fn module_is_keyword(self) -> bool {
        matches!(self, ModuleKind::TypeScript)
    }
}

/// Options resolved once per compilation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub language_mode: LanguageMode,
    pub module_kind: ModuleKind,
}

impl CompilerOptions {
    #[must_use]
    pub const fn new(language_mode: LanguageMode, module_kind: ModuleKind) -> Self {
        CompilerOptions {
            language_mode,
            module_kind,
        }
    }
}
