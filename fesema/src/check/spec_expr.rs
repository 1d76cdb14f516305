//! Specification-expression legality checking.
//!
//! Expressions used in declarative contexts (bounds, type parameters, ...)
//! may only reference entities whose values are guaranteed available when
//! the enclosing scope starts executing. The walk searches for the first
//! reason the expression is illegal; no finding means the expression is a
//! legal specification expression.
use log::debug;
use strum::EnumIs;
use thiserror::Error;

use feexpr::{
    expr::{
        CoarrayRef, Component, DescriptorInquiry, Expr, FunctionRef, ProcedureRef,
    },
    symbol::{Attrs, ScopeId, SymbolDetails, SymbolId, SymbolTable},
};

use crate::{
    check::constant::ConstantExprWalk,
    message::Messages,
    traverse::{ConjunctionWalk, SearchWalk},
};

/// Why an expression is not a legal specification expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum SpecExprReason {
    #[error("dummy procedure argument")]
    DummyProcedure,

    #[error("coindexed reference")]
    CoindexedReference,

    #[error("reference to OPTIONAL dummy argument '{name}'")]
    OptionalDummy { name: String },

    #[error("reference to INTENT(OUT) dummy argument '{name}'")]
    IntentOutDummy { name: String },

    #[error("reference to local entity '{name}'")]
    LocalEntity { name: String },

    #[error("reference to impure function '{name}'")]
    ImpureFunction { name: String },
}

struct SpecExprWalk<'a> {
    table: &'a SymbolTable,
    /// Scope the specification expression appears in.
    scope: ScopeId,
}

impl SearchWalk for SpecExprWalk<'_> {
    type Finding = SpecExprReason;

    fn procedure_designator(&mut self, _: &ProcedureRef) -> Option<SpecExprReason> {
        // A bare procedure used as a value can only be a dummy procedure.
        Some(SpecExprReason::DummyProcedure)
    }

    fn coarray_ref(&mut self, _: &CoarrayRef) -> Option<SpecExprReason> {
        Some(SpecExprReason::CoindexedReference)
    }

    fn symbol(&mut self, id: SymbolId) -> Option<SpecExprReason> {
        let table = self.table;
        let symbol = table.symbol(id);
        if table.is_named_constant(id) {
            return None;
        }
        if symbol.attrs.contains(Attrs::DUMMY) {
            if symbol.attrs.contains(Attrs::OPTIONAL) {
                return Some(SpecExprReason::OptionalDummy {
                    name: symbol.name.clone(),
                });
            }
            if symbol.attrs.contains(Attrs::INTENT_OUT) {
                return Some(SpecExprReason::IntentOutDummy {
                    name: symbol.name.clone(),
                });
            }
            if symbol.details.is_object() {
                return None;
            }
            return Some(SpecExprReason::DummyProcedure);
        }
        if symbol.details.is_use()
            || symbol.details.is_host_assoc()
            || table.scope(symbol.owner).kind.is_module()
        {
            return None;
        }
        if let SymbolDetails::Object(object) = &symbol.details {
            if object.common_block.is_some() {
                return None;
            }
        }
        // Entities declared in an enclosing scope are available; entities
        // local to the checking scope (or unrelated to it) are not.
        let mut scope = self.scope;
        loop {
            let record = table.scope(scope);
            if record.kind.is_global() {
                break;
            }
            let Some(parent) = record.parent else { break };
            scope = parent;
            if scope == symbol.owner {
                return None;
            }
        }
        Some(SpecExprReason::LocalEntity {
            name: symbol.name.clone(),
        })
    }

    fn component(&mut self, x: &Component) -> Option<SpecExprReason> {
        // The component symbol itself is irrelevant; only the base matters.
        self.expr(&x.base)
    }

    fn descriptor_inquiry(&mut self, _: &DescriptorInquiry) -> Option<SpecExprReason> {
        // SIZE()/LBOUND()-style uses that are legal here have already been
        // lowered to descriptor reads by folding, so the inquiry itself is
        // always fine.
        None
    }

    fn function_ref(&mut self, x: &FunctionRef) -> Option<SpecExprReason> {
        match &x.proc {
            ProcedureRef::Resolved(id) => {
                if !self.table.is_pure_procedure(*id) {
                    return Some(SpecExprReason::ImpureFunction {
                        name: self.table.symbol(self.table.ultimate(*id)).name.clone(),
                    });
                }
            }
            ProcedureRef::Intrinsic(intrinsic) => {
                if intrinsic.name == "present" {
                    // Inquires presence only; its argument need not itself
                    // be legal here.
                    return None;
                }
                let mut constant = ConstantExprWalk { table: self.table };
                if constant.function_ref(x) {
                    // Constant inquiry calls never touch argument values.
                    return None;
                }
            }
        }
        x.args.iter().find_map(|a| self.expr(a))
    }
}

/// First reason `expr` is not a legal specification expression in `scope`,
/// or `None` when it is legal.
pub fn check_specification_expr(
    table: &SymbolTable,
    scope: ScopeId,
    expr: &Expr,
) -> Option<SpecExprReason> {
    debug!("checking specification expression {}", expr.fmt(Some(table)));
    SpecExprWalk { table, scope }.expr(expr)
}

/// Check `expr` as a specification expression and report any failure into
/// `messages`. Returns true when the expression is legal.
pub fn require_specification_expr(
    table: &SymbolTable,
    scope: ScopeId,
    expr: &Expr,
    messages: &mut Messages,
) -> bool {
    match check_specification_expr(table, scope, expr) {
        None => true,
        Some(reason) => {
            messages.error(format!("invalid specification expression: {}", reason));
            false
        }
    }
}
