//! Declared entities, scopes, and the read-only queries the checkers need.
//!
//! Symbols and scopes live in keyed arenas owned by a [`SymbolTable`]; the
//! rest of the workspace only ever holds copies of the lightweight keys and
//! asks the table questions. Name resolution (use and host association) has
//! already happened by the time anything here is consulted, so the table
//! exposes an [`SymbolTable::ultimate`] link instead of a resolver.
use bitflags::bitflags;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use strum::EnumIs;

new_key_type! {
    /// Key of a declared entity inside a [`SymbolTable`].
    pub struct SymbolId;

    /// Key of a scope inside a [`SymbolTable`].
    pub struct ScopeId;
}

bitflags! {
    /// Declared attributes of a symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Attrs: u32 {
        /// Entity is a data pointer.
        const POINTER = 1 << 0;

        /// Entity has deferred shape and is allocated at run time.
        const ALLOCATABLE = 1 << 1;

        /// Entity may be the target of a pointer association.
        const TARGET = 1 << 2;

        /// Entity occupies statically allocated storage.
        const SAVE = 1 << 3;

        /// Entity is declared to occupy gap-free storage.
        const CONTIGUOUS = 1 << 4;

        /// Dummy argument that may be absent at the call site.
        const OPTIONAL = 1 << 5;

        /// Dummy argument that is undefined on entry.
        const INTENT_OUT = 1 << 6;

        /// Named constant; its value is fixed at compile time.
        const PARAMETER = 1 << 7;

        /// Entity is a dummy argument of the enclosing subprogram.
        const DUMMY = 1 << 8;
    }
}

/// Classification of an object's declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeClass {
    /// Bounds are declared explicitly.
    Explicit,
    /// Dummy array taking its shape from the actual argument.
    AssumedShape,
    /// Dummy array with an assumed final extent (`*`).
    AssumedSize,
    /// Dummy array whose rank itself comes from the actual argument.
    AssumedRank,
    /// Shape is deferred to allocation or pointer association.
    Deferred,
}

/// Details of a data object entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectDetails {
    pub shape: ShapeClass,
    /// Name of the common block this object is a member of, if any.
    pub common_block: Option<String>,
}

impl Default for ObjectDetails {
    fn default() -> Self {
        ObjectDetails {
            shape: ShapeClass::Explicit,
            common_block: None,
        }
    }
}

bitflags! {
    /// Attributes of a characterized function result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ResultAttrs: u8 {
        /// The result is a data pointer.
        const POINTER = 1 << 0;

        /// The result pointer is declared contiguous.
        const CONTIGUOUS = 1 << 1;
    }
}

/// Characterization of a procedure's result, as far as the checkers care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionResult {
    pub attrs: ResultAttrs,
    /// True when the result is a procedure pointer rather than a data pointer.
    pub procedure_pointer: bool,
}

/// Details of a procedure entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcedureDetails {
    /// Procedure is free of externally visible side effects.
    pub pure: bool,
    /// Characterized result; `None` for subroutines and dummy procedures
    /// whose interface is not known.
    pub result: Option<FunctionResult>,
}

/// Kind-specific payload of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolDetails {
    /// A data object (variable, named constant, dummy argument, ...).
    Object(ObjectDetails),
    /// A procedure (function or subroutine).
    Procedure(ProcedureDetails),
    /// Use-associated alias; the key is the next symbol in the chain.
    Use(SymbolId),
    /// Host-associated alias; the key is the next symbol in the chain.
    HostAssoc(SymbolId),
    /// Index variable of an implied-DO inside a data statement or
    /// array constructor.
    ImpliedDoIndex,
}

/// A declared entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    pub name: String,
    pub attrs: Attrs,
    pub rank: u8,
    pub corank: u8,
    pub details: SymbolDetails,
    /// Scope this symbol is declared in.
    pub owner: ScopeId,
}

impl Symbol {
    /// Scalar data object with explicit shape and no attributes.
    pub fn object(name: impl Into<String>, owner: ScopeId) -> Self {
        Symbol {
            name: name.into(),
            attrs: Attrs::empty(),
            rank: 0,
            corank: 0,
            details: SymbolDetails::Object(ObjectDetails::default()),
            owner,
        }
    }

    /// Procedure entity.
    pub fn procedure(name: impl Into<String>, owner: ScopeId, details: ProcedureDetails) -> Self {
        Symbol {
            name: name.into(),
            attrs: Attrs::empty(),
            rank: 0,
            corank: 0,
            details: SymbolDetails::Procedure(details),
            owner,
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs |= attrs;
        self
    }

    pub fn with_rank(mut self, rank: u8) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_corank(mut self, corank: u8) -> Self {
        self.corank = corank;
        self
    }

    pub fn with_shape(mut self, shape: ShapeClass) -> Self {
        if let SymbolDetails::Object(o) = &mut self.details {
            o.shape = shape;
        }
        self
    }

    pub fn in_common(mut self, block: impl Into<String>) -> Self {
        if let SymbolDetails::Object(o) = &mut self.details {
            o.common_block = Some(block.into());
        }
        self
    }
}

/// Kind tag of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScopeKind {
    /// The single universal root scope.
    Global,
    /// A module scope.
    Module,
    /// A main program, function, or subroutine scope.
    Subprogram,
    /// A BLOCK construct scope.
    BlockConstruct,
}

/// One scope in the ownership chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scope {
    pub kind: ScopeKind,
    /// Enclosing scope; `None` only for the global scope.
    pub parent: Option<ScopeId>,
}

/// Arena of scopes and symbols plus the read-only queries over them.
///
/// Construction is intentionally minimal: callers push scopes and symbols and
/// get keys back. Everything else is a query. The table is never mutated by
/// the checkers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolTable {
    scopes: SlotMap<ScopeId, Scope>,
    symbols: SlotMap<SymbolId, Symbol>,
    global: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table holding only the global scope.
    pub fn new() -> Self {
        let mut scopes = SlotMap::with_key();
        let global = scopes.insert(Scope {
            kind: ScopeKind::Global,
            parent: None,
        });
        SymbolTable {
            scopes,
            symbols: SlotMap::with_key(),
            global,
        }
    }

    /// Key of the universal root scope.
    pub fn global(&self) -> ScopeId {
        self.global
    }

    /// Register a new scope nested inside `parent`.
    pub fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = self.scopes.insert(Scope {
            kind,
            parent: Some(parent),
        });
        debug!("registered {:?} scope {:?} under {:?}", kind, id, parent);
        id
    }

    /// Register a symbol and return its key.
    pub fn declare(&mut self, symbol: Symbol) -> SymbolId {
        let name = symbol.name.clone();
        let id = self.symbols.insert(symbol);
        debug!("declared symbol `{}` as {:?}", name, id);
        id
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Final entity reached after resolving use and host association links.
    pub fn ultimate(&self, id: SymbolId) -> SymbolId {
        let mut id = id;
        loop {
            match self.symbols[id].details {
                SymbolDetails::Use(next) | SymbolDetails::HostAssoc(next) => id = next,
                _ => return id,
            }
        }
    }

    /// True when the symbol (after resolution) is a named constant.
    pub fn is_named_constant(&self, id: SymbolId) -> bool {
        self.symbols[self.ultimate(id)]
            .attrs
            .contains(Attrs::PARAMETER)
    }

    /// True when the symbol is the index of an implied DO loop.
    pub fn is_implied_do_index(&self, id: SymbolId) -> bool {
        self.symbols[id].details.is_implied_do_index()
    }

    pub fn is_allocatable(&self, id: SymbolId) -> bool {
        self.symbols[id].attrs.contains(Attrs::ALLOCATABLE)
    }

    pub fn is_pointer(&self, id: SymbolId) -> bool {
        self.symbols[id].attrs.contains(Attrs::POINTER)
    }

    /// True when the symbol occupies statically allocated storage: it carries
    /// SAVE, lives at module level, or is a member of a common block.
    pub fn is_saved(&self, id: SymbolId) -> bool {
        let symbol = &self.symbols[id];
        if symbol.attrs.contains(Attrs::SAVE) {
            return true;
        }
        if self.scopes[symbol.owner].kind.is_module() {
            return true;
        }
        self.in_common_block(id)
    }

    /// True when the symbol is a data object member of a common block.
    pub fn in_common_block(&self, id: SymbolId) -> bool {
        matches!(
            &self.symbols[id].details,
            SymbolDetails::Object(o) if o.common_block.is_some()
        )
    }

    /// True when the symbol (after resolution) denotes a pure procedure.
    pub fn is_pure_procedure(&self, id: SymbolId) -> bool {
        matches!(
            &self.symbols[self.ultimate(id)].details,
            SymbolDetails::Procedure(p) if p.pure
        )
    }

    /// Characterized result of a function symbol, if one is known.
    pub fn function_result(&self, id: SymbolId) -> Option<&FunctionResult> {
        match &self.symbols[self.ultimate(id)].details {
            SymbolDetails::Procedure(p) => p.result.as_ref(),
            _ => None,
        }
    }
}
