//! AST node definitions and the per-unit node arena.
//!
//! The tree is a pure ownership tree: every node lives in the `NodeArena` of
//! its compilation unit and edges are `NodeId` indices. Scope records point
//! back at declaration nodes by index only, so teardown is a single arena
//! drop. Each node carries its variant-specific children in a fixed order,
//! the source position copied from the token that started it, and flags for
//! assignment-target classification.

use crate::scope::ScopeId;
use bitflags::bitflags;
use smallvec::SmallVec;
use tsf_common::{Atom, SourcePosition};
use tsf_scanner::TokenKind;

/// Index of a node within its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// The node may appear as an assignment target.
        const VALID_LHS = 1 << 0;
        /// The node is (or reparses as) an object literal.
        const OBJECT_LITERAL = 1 << 1;
        /// The node is (or reparses as) an array literal.
        const ARRAY_LITERAL = 1 << 2;
    }
}

/// The fixed variant set of the AST.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // ----- names and literals -----
    Name { name: Atom },
    Number { value: Atom },
    StringLiteral { value: Atom },
    True,
    False,
    Null,
    Undefined,
    Nan,
    This,
    Super,
    Regexp { value: Atom },
    /// One textual section of a template literal.
    TemplateChars { value: Atom },
    /// Alternating `TemplateChars` and substitution expressions.
    TemplateLiteral { parts: Vec<NodeId> },
    ArrayLiteral { elements: Vec<NodeId> },
    ObjectLiteral { properties: Vec<NodeId> },
    Property { key: NodeId, value: Option<NodeId> },
    ComputedPropertyName { expr: NodeId },
    CommaExpr { exprs: Vec<NodeId> },

    // ----- expressions -----
    Binary { op: TokenKind, left: NodeId, right: NodeId },
    Unary { op: TokenKind, operand: NodeId },
    Postfix { operand: NodeId, op: TokenKind },
    Ternary { cond: NodeId, when_true: NodeId, when_false: NodeId },
    Assignment { op: TokenKind, target: NodeId, value: NodeId },
    Call { target: NodeId, type_args: Option<NodeId>, args: Vec<NodeId> },
    /// `new X(...)`; `args` is `None` when the parens are omitted.
    NewCall { target: NodeId, type_args: Option<NodeId>, args: Option<Vec<NodeId>> },
    GetProp { target: NodeId, prop: NodeId },
    GetElem { target: NodeId, index: NodeId },
    /// `<T>expr` type assertion.
    Cast { target_type: NodeId, expr: NodeId },
    ArrowFunction { call_sig: NodeId, body: NodeId },
    Function {
        getter: bool,
        setter: bool,
        generator: bool,
        overloads: Option<NodeId>,
        name: Option<NodeId>,
        call_sig: NodeId,
        body: Option<NodeId>,
    },
    FunctionOverload { generator: bool, name: NodeId, call_sig: NodeId },
    FunctionOverloads { overloads: Vec<NodeId> },
    Yield { delegate: bool, expr: Option<NodeId> },
    /// Array/generator comprehension: `parts` is one `ComprehensionFor`,
    /// any number of further for/if clauses, then the body expression.
    Comprehension { generator: bool, parts: Vec<NodeId> },
    ComprehensionFor { binding: NodeId, target: NodeId },
    ComprehensionIf { cond: NodeId },
    /// Rest parameters, spread arguments and spread elements.
    RestParam { expr: NodeId },

    // ----- classes, interfaces, enums -----
    Class {
        name: Option<NodeId>,
        type_params: Option<NodeId>,
        bases: Option<NodeId>,
        field_list: NodeId,
    },
    ClassBases { base: Option<NodeId>, impls: Option<NodeId> },
    ClassHeritage { base: NodeId },
    ClassImpls { impls: Vec<NodeId> },
    ClassFieldList { fields: Vec<NodeId> },
    ClassFieldModifiers { modifiers: Vec<NodeId> },
    ClassFieldAccessLevel { level: TokenKind },
    MemberFunction {
        getter: bool,
        setter: bool,
        generator: bool,
        modifiers: NodeId,
        name: NodeId,
        call_sig: NodeId,
        overloads: Option<NodeId>,
        body: NodeId,
    },
    MemberFunctionOverload {
        getter: bool,
        setter: bool,
        generator: bool,
        modifiers: NodeId,
        name: NodeId,
        call_sig: NodeId,
    },
    MemberFunctionOverloads { overloads: Vec<NodeId> },
    MemberVariable {
        modifiers: NodeId,
        name: NodeId,
        type_expr: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    IndexSignature { name: NodeId, type_expr: NodeId, string_key: bool },
    Interface {
        name: NodeId,
        type_params: Option<NodeId>,
        extends: Option<NodeId>,
        body: NodeId,
    },
    InterfaceExtends { interfaces: Vec<NodeId> },
    ObjectTypeExpr { members: Vec<NodeId> },
    PropertySignature { optional: bool, name: NodeId, type_expr: Option<NodeId> },
    MethodSignature {
        optional: bool,
        getter: bool,
        setter: bool,
        generator: bool,
        name: NodeId,
        call_sig: NodeId,
    },
    Enum { name: NodeId, body: NodeId },
    EnumBody { fields: Vec<NodeId> },
    EnumField { name: NodeId, value: Option<NodeId> },

    // ----- modules -----
    /// Internal module declaration `module A.B { ... }`.
    ModuleDecl { name: NodeId, body: NodeId },
    /// ES6 shorthand `module x from "path"`.
    ModuleImport { binding: NodeId, from: NodeId },
    Import { clause: Option<NodeId>, from: NodeId },
    ImportList { default_binding: Option<NodeId>, named: Option<NodeId> },
    NamedImport { name: NodeId, binding: NodeId },
    NamedImportList { imports: Vec<NodeId> },
    Export { default: bool, clause: Option<NodeId>, from: Option<NodeId> },
    NamedExport { name: NodeId, binding: NodeId },
    NamedExportList { exports: Vec<NodeId> },
    FromClause { module_specifier: NodeId },
    ExternalModuleReference { specifier: NodeId },

    // ----- statements -----
    FileScope { scope: ScopeId, statements: Vec<NodeId> },
    ExpressionStatement { expr: NodeId },
    Block { scope: ScopeId, statements: Vec<NodeId> },
    LexicalDecl { is_const: bool, bindings: Vec<NodeId> },
    VariableDecl { bindings: Vec<NodeId> },
    Variable {
        binding: NodeId,
        type_expr: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    If { cond: NodeId, then_stmt: NodeId, else_stmt: Option<NodeId> },
    While { cond: NodeId, body: NodeId },
    DoWhile { body: NodeId, cond: NodeId },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForIn { lhs: NodeId, rhs: NodeId, body: NodeId },
    ForOf { lhs: NodeId, rhs: NodeId, body: NodeId },
    Switch { cond: NodeId, cases: Vec<NodeId> },
    Case { test: Option<NodeId>, body: NodeId },
    CaseBody { statements: Vec<NodeId> },
    Try { block: NodeId, catch: Option<NodeId>, finally: Option<NodeId> },
    Catch { param: NodeId, block: NodeId },
    Finally { block: NodeId },
    Throw { expr: NodeId },
    Return { expr: Option<NodeId> },
    Continue { label: Option<NodeId> },
    Break { label: Option<NodeId> },
    Labelled { label: NodeId, stmt: NodeId },
    With { expr: NodeId, body: NodeId },
    Debugger,
    Empty,

    // ----- parameters and types -----
    ParamList { params: Vec<NodeId> },
    Parameter {
        access_level: Option<TokenKind>,
        name: NodeId,
        optional: bool,
        type_expr: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    CallSignature {
        type_params: Option<NodeId>,
        params: NodeId,
        return_type: Option<NodeId>,
    },
    ConstructSignature { call_sig: NodeId },
    SimpleTypeExpr { name: NodeId },
    GenericTypeExpr { name: NodeId, type_args: NodeId },
    ArrayTypeExpr { element: NodeId },
    UnionTypeExpr { types: Vec<NodeId> },
    FunctionTypeExpr {
        type_params: Option<NodeId>,
        params: NodeId,
        return_type: NodeId,
    },
    TypeQuery { name: NodeId },
    TypeParameters { params: Vec<NodeId> },
    TypeConstraints { name: NodeId, constraint: NodeId },
    TypeArguments { args: Vec<NodeId> },

    // ----- binding patterns -----
    BindingArray { elements: Vec<NodeId> },
    BindingPropList { properties: Vec<NodeId> },
    BindingElement {
        name: Option<NodeId>,
        value: Option<NodeId>,
        initializer: Option<NodeId>,
    },

    // ----- ambient declarations -----
    AmbientVariable { name: NodeId, type_expr: Option<NodeId> },
    AmbientFunction { generator: bool, name: NodeId, call_sig: NodeId },
    AmbientClass {
        name: NodeId,
        type_params: Option<NodeId>,
        bases: Option<NodeId>,
        body: NodeId,
    },
    AmbientClassFields { fields: Vec<NodeId> },
    AmbientConstructor { modifiers: NodeId, call_sig: NodeId },
    AmbientMemberFunction {
        getter: bool,
        setter: bool,
        generator: bool,
        modifiers: NodeId,
        name: NodeId,
        call_sig: NodeId,
    },
    AmbientMemberVariable { modifiers: NodeId, name: NodeId, type_expr: Option<NodeId> },
    AmbientEnum { name: NodeId, body: NodeId },
    AmbientEnumBody { fields: Vec<NodeId> },
    AmbientEnumField { name: NodeId, value: Option<NodeId> },
    AmbientModule { external: bool, name: NodeId, body: NodeId },
    AmbientModuleBody { statements: Vec<NodeId> },
}

/// One AST node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: SourcePosition,
    pub flags: NodeFlags,
}

/// Arena owning every node of one compilation unit.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        NodeArena::default()
    }

    /// Allocate a node, deriving the default flags from its kind.
    pub fn alloc(&mut self, kind: NodeKind, pos: SourcePosition) -> NodeId {
        let flags = match kind {
            NodeKind::Name { .. } | NodeKind::GetProp { .. } | NodeKind::GetElem { .. } => {
                NodeFlags::VALID_LHS
            }
            NodeKind::ObjectLiteral { .. } => NodeFlags::OBJECT_LITERAL,
            NodeKind::ArrayLiteral { .. } => NodeFlags::ARRAY_LITERAL,
            _ => NodeFlags::empty(),
        };
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { kind, pos, flags });
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    #[inline]
    #[must_use]
    pub fn pos(&self, id: NodeId) -> SourcePosition {
        self.get(id).pos
    }

    pub fn set_pos(&mut self, id: NodeId, pos: SourcePosition) {
        self.get_mut(id).pos = pos;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn mark_invalid_lhs(&mut self, id: NodeId) {
        self.get_mut(id).flags.remove(NodeFlags::VALID_LHS);
    }

    #[must_use]
    pub fn is_valid_lhs(&self, id: NodeId) -> bool {
        self.get(id).flags.contains(NodeFlags::VALID_LHS)
    }

    #[must_use]
    pub fn has_object_literal_view(&self, id: NodeId) -> bool {
        self.get(id).flags.contains(NodeFlags::OBJECT_LITERAL)
    }

    #[must_use]
    pub fn has_array_literal_view(&self, id: NodeId) -> bool {
        self.get(id).flags.contains(NodeFlags::ARRAY_LITERAL)
    }

    #[must_use]
    pub fn is_name(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Name { .. })
    }

    /// The interned name of a `Name` node.
    #[must_use]
    pub fn name_atom(&self, id: NodeId) -> Option<Atom> {
        match self.kind(id) {
            NodeKind::Name { name } => Some(*name),
            _ => None,
        }
    }

    /// The children of a node, in fixed source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        macro_rules! push {
            ($x:expr) => {
                out.push(*$x)
            };
        }
        macro_rules! push_opt {
            ($x:expr) => {
                if let Some(c) = $x {
                    out.push(*c);
                }
            };
        }
        macro_rules! push_all {
            ($x:expr) => {
                out.extend($x.iter().copied())
            };
        }
        match self.kind(id) {
            NodeKind::Name { .. }
            | NodeKind::Number { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::True
            | NodeKind::False
            | NodeKind::Null
            | NodeKind::Undefined
            | NodeKind::Nan
            | NodeKind::This
            | NodeKind::Super
            | NodeKind::Regexp { .. }
            | NodeKind::TemplateChars { .. }
            | NodeKind::ClassFieldAccessLevel { .. }
            | NodeKind::Debugger
            | NodeKind::Empty => {}

            NodeKind::TemplateLiteral { parts } => push_all!(parts),
            NodeKind::ArrayLiteral { elements } => push_all!(elements),
            NodeKind::ObjectLiteral { properties } => push_all!(properties),
            NodeKind::Property { key, value } => {
                push!(key);
                push_opt!(value);
            }
            NodeKind::ComputedPropertyName { expr } => push!(expr),
            NodeKind::CommaExpr { exprs } => push_all!(exprs),
            NodeKind::Binary { left, right, .. } => {
                push!(left);
                push!(right);
            }
            NodeKind::Unary { operand, .. } => push!(operand),
            NodeKind::Postfix { operand, .. } => push!(operand),
            NodeKind::Ternary {
                cond,
                when_true,
                when_false,
            } => {
                push!(cond);
                push!(when_true);
                push!(when_false);
            }
            NodeKind::Assignment { target, value, .. } => {
                push!(target);
                push!(value);
            }
            NodeKind::Call {
                target,
                type_args,
                args,
            } => {
                push!(target);
                push_opt!(type_args);
                push_all!(args);
            }
            NodeKind::NewCall {
                target,
                type_args,
                args,
            } => {
                push!(target);
                push_opt!(type_args);
                if let Some(args) = args {
                    push_all!(args);
                }
            }
            NodeKind::GetProp { target, prop } => {
                push!(target);
                push!(prop);
            }
            NodeKind::GetElem { target, index } => {
                push!(target);
                push!(index);
            }
            NodeKind::Cast { target_type, expr } => {
                push!(target_type);
                push!(expr);
            }
            NodeKind::ArrowFunction { call_sig, body } => {
                push!(call_sig);
                push!(body);
            }
            NodeKind::Function {
                overloads,
                name,
                call_sig,
                body,
                ..
            } => {
                push_opt!(overloads);
                push_opt!(name);
                push!(call_sig);
                push_opt!(body);
            }
            NodeKind::FunctionOverload { name, call_sig, .. } => {
                push!(name);
                push!(call_sig);
            }
            NodeKind::FunctionOverloads { overloads } => push_all!(overloads),
            NodeKind::Yield { expr, .. } => push_opt!(expr),
            NodeKind::Comprehension { parts, .. } => push_all!(parts),
            NodeKind::ComprehensionFor { binding, target } => {
                push!(binding);
                push!(target);
            }
            NodeKind::ComprehensionIf { cond } => push!(cond),
            NodeKind::RestParam { expr } => push!(expr),

            NodeKind::Class {
                name,
                type_params,
                bases,
                field_list,
            } => {
                push_opt!(name);
                push_opt!(type_params);
                push_opt!(bases);
                push!(field_list);
            }
            NodeKind::ClassBases { base, impls } => {
                push_opt!(base);
                push_opt!(impls);
            }
            NodeKind::ClassHeritage { base } => push!(base),
            NodeKind::ClassImpls { impls } => push_all!(impls),
            NodeKind::ClassFieldList { fields } => push_all!(fields),
            NodeKind::ClassFieldModifiers { modifiers } => push_all!(modifiers),
            NodeKind::MemberFunction {
                modifiers,
                name,
                call_sig,
                overloads,
                body,
                ..
            } => {
                push!(modifiers);
                push!(name);
                push!(call_sig);
                push_opt!(overloads);
                push!(body);
            }
            NodeKind::MemberFunctionOverload {
                modifiers,
                name,
                call_sig,
                ..
            } => {
                push!(modifiers);
                push!(name);
                push!(call_sig);
            }
            NodeKind::MemberFunctionOverloads { overloads } => push_all!(overloads),
            NodeKind::MemberVariable {
                modifiers,
                name,
                type_expr,
                initializer,
            } => {
                push!(modifiers);
                push!(name);
                push_opt!(type_expr);
                push_opt!(initializer);
            }
            NodeKind::IndexSignature {
                name, type_expr, ..
            } => {
                push!(name);
                push!(type_expr);
            }
            NodeKind::Interface {
                name,
                type_params,
                extends,
                body,
            } => {
                push!(name);
                push_opt!(type_params);
                push_opt!(extends);
                push!(body);
            }
            NodeKind::InterfaceExtends { interfaces } => push_all!(interfaces),
            NodeKind::ObjectTypeExpr { members } => push_all!(members),
            NodeKind::PropertySignature {
                name, type_expr, ..
            } => {
                push!(name);
                push_opt!(type_expr);
            }
            NodeKind::MethodSignature { name, call_sig, .. } => {
                push!(name);
                push!(call_sig);
            }
            NodeKind::Enum { name, body } => {
                push!(name);
                push!(body);
            }
            NodeKind::EnumBody { fields } => push_all!(fields),
            NodeKind::EnumField { name, value } => {
                push!(name);
                push_opt!(value);
            }

            NodeKind::ModuleDecl { name, body } => {
                push!(name);
                push!(body);
            }
            NodeKind::ModuleImport { binding, from } => {
                push!(binding);
                push!(from);
            }
            NodeKind::Import { clause, from } => {
                push_opt!(clause);
                push!(from);
            }
            NodeKind::ImportList {
                default_binding,
                named,
            } => {
                push_opt!(default_binding);
                push_opt!(named);
            }
            NodeKind::NamedImport { name, binding } => {
                push!(name);
                push!(binding);
            }
            NodeKind::NamedImportList { imports } => push_all!(imports),
            NodeKind::Export { clause, from, .. } => {
                push_opt!(clause);
                push_opt!(from);
            }
            NodeKind::NamedExport { name, binding } => {
                push!(name);
                push!(binding);
            }
            NodeKind::NamedExportList { exports } => push_all!(exports),
            NodeKind::FromClause { module_specifier } => push!(module_specifier),
            NodeKind::ExternalModuleReference { specifier } => push!(specifier),

            NodeKind::FileScope { statements, .. } => push_all!(statements),
            NodeKind::ExpressionStatement { expr } => push!(expr),
            NodeKind::Block { statements, .. } => push_all!(statements),
            NodeKind::LexicalDecl { bindings, .. } => push_all!(bindings),
            NodeKind::VariableDecl { bindings } => push_all!(bindings),
            NodeKind::Variable {
                binding,
                type_expr,
                initializer,
            } => {
                push!(binding);
                push_opt!(type_expr);
                push_opt!(initializer);
            }
            NodeKind::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                push!(cond);
                push!(then_stmt);
                push_opt!(else_stmt);
            }
            NodeKind::While { cond, body } => {
                push!(cond);
                push!(body);
            }
            NodeKind::DoWhile { body, cond } => {
                push!(body);
                push!(cond);
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                push_opt!(init);
                push_opt!(cond);
                push_opt!(update);
                push!(body);
            }
            NodeKind::ForIn { lhs, rhs, body } | NodeKind::ForOf { lhs, rhs, body } => {
                push!(lhs);
                push!(rhs);
                push!(body);
            }
            NodeKind::Switch { cond, cases } => {
                push!(cond);
                push_all!(cases);
            }
            NodeKind::Case { test, body } => {
                push_opt!(test);
                push!(body);
            }
            NodeKind::CaseBody { statements } => push_all!(statements),
            NodeKind::Try {
                block,
                catch,
                finally,
            } => {
                push!(block);
                push_opt!(catch);
                push_opt!(finally);
            }
            NodeKind::Catch { param, block } => {
                push!(param);
                push!(block);
            }
            NodeKind::Finally { block } => push!(block),
            NodeKind::Throw { expr } => push!(expr),
            NodeKind::Return { expr } => push_opt!(expr),
            NodeKind::Continue { label } | NodeKind::Break { label } => push_opt!(label),
            NodeKind::Labelled { label, stmt } => {
                push!(label);
                push!(stmt);
            }
            NodeKind::With { expr, body } => {
                push!(expr);
                push!(body);
            }

            NodeKind::ParamList { params } => push_all!(params),
            NodeKind::Parameter {
                name,
                type_expr,
                initializer,
                ..
            } => {
                push!(name);
                push_opt!(type_expr);
                push_opt!(initializer);
            }
            NodeKind::CallSignature {
                type_params,
                params,
                return_type,
            } => {
                push_opt!(type_params);
                push!(params);
                push_opt!(return_type);
            }
            NodeKind::ConstructSignature { call_sig } => push!(call_sig),
            NodeKind::SimpleTypeExpr { name } => push!(name),
            NodeKind::GenericTypeExpr { name, type_args } => {
                push!(name);
                push!(type_args);
            }
            NodeKind::ArrayTypeExpr { element } => push!(element),
            NodeKind::UnionTypeExpr { types } => push_all!(types),
            NodeKind::FunctionTypeExpr {
                type_params,
                params,
                return_type,
            } => {
                push_opt!(type_params);
                push!(params);
                push!(return_type);
            }
            NodeKind::TypeQuery { name } => push!(name),
            NodeKind::TypeParameters { params } => push_all!(params),
            NodeKind::TypeConstraints { name, constraint } => {
                push!(name);
                push!(constraint);
            }
            NodeKind::TypeArguments { args } => push_all!(args),

            NodeKind::BindingArray { elements } => push_all!(elements),
            NodeKind::BindingPropList { properties } => push_all!(properties),
            NodeKind::BindingElement {
                name,
                value,
                initializer,
            } => {
                push_opt!(name);
                push_opt!(value);
                push_opt!(initializer);
            }

            NodeKind::AmbientVariable { name, type_expr } => {
                push!(name);
                push_opt!(type_expr);
            }
            NodeKind::AmbientFunction { name, call_sig, .. } => {
                push!(name);
                push!(call_sig);
            }
            NodeKind::AmbientClass {
                name,
                type_params,
                bases,
                body,
            } => {
                push!(name);
                push_opt!(type_params);
                push_opt!(bases);
                push!(body);
            }
            NodeKind::AmbientClassFields { fields } => push_all!(fields),
            NodeKind::AmbientConstructor { modifiers, call_sig } => {
                push!(modifiers);
                push!(call_sig);
            }
            NodeKind::AmbientMemberFunction {
                modifiers,
                name,
                call_sig,
                ..
            } => {
                push!(modifiers);
                push!(name);
                push!(call_sig);
            }
            NodeKind::AmbientMemberVariable {
                modifiers,
                name,
                type_expr,
            } => {
                push!(modifiers);
                push!(name);
                push_opt!(type_expr);
            }
            NodeKind::AmbientEnum { name, body } => {
                push!(name);
                push!(body);
            }
            NodeKind::AmbientEnumBody { fields } => push_all!(fields),
            NodeKind::AmbientEnumField { name, value } => {
                push!(name);
                push_opt!(value);
            }
            NodeKind::AmbientModule { name, body, .. } => {
                push!(name);
                push!(body);
            }
            NodeKind::AmbientModuleBody { statements } => push_all!(statements),
        }
        out
    }
}
