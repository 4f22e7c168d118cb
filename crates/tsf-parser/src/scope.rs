//! Lexical scope records.
//!
//! Scopes form a chain from the global (file) scope down through function,
//! module, class and block scopes. Declarations are recorded at declaration
//! sites in source order; redeclaration rules are left to the later semantic
//! phase. Scope entries hold `NodeId`s only, never owning references, so the
//! chain is acyclic by construction.

use crate::ast::NodeId;
use indexmap::IndexMap;
use tsf_common::Atom;

/// Index of a scope within its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope of a unit.
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of symbol a declaration introduces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolType {
    VariableName,
    PropertyName,
    LabelName,
    ClassName,
    InterfaceName,
}

/// One lexical scope.
#[derive(Debug)]
pub struct Scope {
    parent: Option<ScopeId>,
    declarations: IndexMap<(Atom, SymbolType), NodeId>,
}

impl Scope {
    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Declarations in source order.
    pub fn declarations(&self) -> impl Iterator<Item = (Atom, SymbolType, NodeId)> + '_ {
        self.declarations
            .iter()
            .map(|(&(atom, ty), &node)| (atom, ty, node))
    }

    #[must_use]
    pub fn find(&self, name: Atom, ty: SymbolType) -> Option<NodeId> {
        self.declarations.get(&(name, ty)).copied()
    }
}

/// Arena owning every scope of one compilation unit.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        ScopeArena::new()
    }
}

impl ScopeArena {
    /// Create an arena holding just the global scope.
    #[must_use]
    pub fn new() -> Self {
        ScopeArena {
            scopes: vec![Scope {
                parent: None,
                declarations: IndexMap::new(),
            }],
        }
    }

    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent: Some(parent),
            declarations: IndexMap::new(),
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[must_use]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Record a declaration in `scope`. Later declarations of the same
    /// name/type pair win; the semantic phase reports redeclarations.
    pub fn declare(&mut self, scope: ScopeId, name: Atom, ty: SymbolType, node: NodeId) {
        self.scopes[scope.index()]
            .declarations
            .insert((name, ty), node);
    }

    /// Find a declaration, walking the parent chain.
    #[must_use]
    pub fn resolve(&self, scope: ScopeId, name: Atom, ty: SymbolType) -> Option<NodeId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(node) = self.get(id).find(name, ty) {
                return Some(node);
            }
            cursor = self.get(id).parent;
        }
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
