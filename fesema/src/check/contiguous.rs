//! Simple-contiguity classification.
//!
//! Decides whether a reference is guaranteed to address gap-free storage
//! using attributes and subscript shapes alone. Non-variables carry no
//! storage and are trivially contiguous. For variables the walk is
//! tri-state: a finding of `true` or `false` is definitive, no finding
//! means "not provably contiguous" and resolves to `false`.
use log::{debug, trace};

use feexpr::{
    expr::{
        ArrayRef, CoarrayRef, Component, ComplexPart, Expr, FunctionRef, ProcedureRef, Subscript,
        Substring,
    },
    symbol::{Attrs, ResultAttrs, SymbolDetails, SymbolId, SymbolTable},
};

use crate::traverse::SearchWalk;

struct ContiguityWalk<'a> {
    table: &'a SymbolTable,
}

impl ContiguityWalk<'_> {
    /// Whole-symbol contiguity. Scalars and declared-contiguous entities
    /// qualify; pointers without the attribute never do; otherwise any
    /// object that is not assumed-shape or assumed-rank qualifies
    /// (allocatables are deferred shape, hence covered).
    fn contiguous_symbol(&self, id: SymbolId) -> bool {
        let symbol = self.table.symbol(id);
        if symbol.attrs.contains(Attrs::CONTIGUOUS) || symbol.rank == 0 {
            true
        } else if self.table.is_pointer(id) {
            false
        } else if let SymbolDetails::Object(object) = &symbol.details {
            !object.shape.is_assumed_shape() && !object.shape.is_assumed_rank()
        } else {
            false
        }
    }
}

impl SearchWalk for ContiguityWalk<'_> {
    type Finding = bool;

    fn symbol(&mut self, id: SymbolId) -> Option<bool> {
        Some(self.contiguous_symbol(id))
    }

    fn array_ref(&mut self, x: &ArrayRef) -> Option<bool> {
        if !self.contiguous_symbol(x.base) {
            return Some(false);
        }
        match check_subscripts(self.table, &x.subscripts) {
            // `a(:)` is contiguous; `a(1)` is a single element.
            Some(rank) => Some(rank > 0 || x.rank(self.table) == 0),
            None => Some(false),
        }
    }

    fn coarray_ref(&mut self, x: &CoarrayRef) -> Option<bool> {
        Some(check_subscripts(self.table, &x.subscripts).is_some())
    }

    fn component(&mut self, x: &Component) -> Option<bool> {
        // a(:)%b is not contiguous no matter what b is; a(1)%b can be.
        Some(x.base.rank(self.table) == 0 && self.contiguous_symbol(x.component))
    }

    fn complex_part(&mut self, _: &ComplexPart) -> Option<bool> {
        Some(false)
    }

    fn substring(&mut self, _: &Substring) -> Option<bool> {
        Some(false)
    }

    fn function_ref(&mut self, x: &FunctionRef) -> Option<bool> {
        let result = match &x.proc {
            ProcedureRef::Resolved(id) => self.table.function_result(*id),
            ProcedureRef::Intrinsic(_) => None,
        };
        Some(result.is_some_and(|r| {
            !r.procedure_pointer
                && r.attrs
                    .contains(ResultAttrs::POINTER | ResultAttrs::CONTIGUOUS)
        }))
    }
}

/// Decide whether a subscript list can belong to a simply contiguous
/// section, and return the section's rank when it can.
///
/// Scanned right to left: every triplet must have stride one, only the
/// rightmost triplet dimension may carry explicit bounds (everything
/// further left must be a bare `:`), and no single-value subscript may
/// appear left of a triplet or be vector valued.
pub(crate) fn check_subscripts(table: &SymbolTable, subscripts: &[Subscript]) -> Option<u8> {
    let mut any_triplet = false;
    let mut rank = 0u8;
    for subscript in subscripts.iter().rev() {
        match subscript {
            Subscript::Triplet(triplet) => {
                if !triplet.is_stride_one() {
                    trace!("subscript check failed: stride is not one");
                    return None;
                }
                if any_triplet && (triplet.lower.is_some() || triplet.upper.is_some()) {
                    trace!("subscript check failed: bounded triplet left of another");
                    return None;
                }
                any_triplet = true;
                rank += 1;
            }
            Subscript::Element(value) => {
                if any_triplet || value.rank(table) > 0 {
                    trace!("subscript check failed: element left of a triplet, or vector valued");
                    return None;
                }
            }
        }
    }
    Some(rank)
}

/// True when `expr` is guaranteed to occupy contiguous storage.
pub fn is_simply_contiguous(table: &SymbolTable, expr: &Expr) -> bool {
    if !expr.is_variable(table) {
        debug!("{} is not a variable; trivially contiguous", expr.fmt(Some(table)));
        return true;
    }
    debug!("classifying contiguity of {}", expr.fmt(Some(table)));
    ContiguityWalk { table }.expr(expr).unwrap_or(false)
}
