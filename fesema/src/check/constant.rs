//! Constant-expression classification.
//!
//! Decides whether an expression is a constant expression in the language
//! sense. That is weaker than being foldable to a known value: a constant
//! expression may still mention derived-type kind parameters whose values
//! are not known yet.
use log::debug;
use num_bigint::BigInt;

use feexpr::{
    expr::{Binary, CoarrayRef, Expr, FunctionRef, ParamValue, ProcedureRef, TypeParamInquiry},
    symbol::{SymbolId, SymbolTable},
};

use crate::traverse::ConjunctionWalk;

pub(crate) struct ConstantExprWalk<'a> {
    pub(crate) table: &'a SymbolTable,
}

impl ConjunctionWalk for ConstantExprWalk<'_> {
    fn type_param_inquiry(&mut self, x: &TypeParamInquiry) -> bool {
        // Kind parameters are compile-time fixed; len parameters are not.
        x.which.is_kind()
    }

    fn symbol(&mut self, id: SymbolId) -> bool {
        self.table.is_named_constant(id) || self.table.is_implied_do_index(id)
    }

    fn coarray_ref(&mut self, _: &CoarrayRef) -> bool {
        false
    }

    fn param_value(&mut self, x: &ParamValue) -> bool {
        match x {
            ParamValue::Explicit(e) => self.expr(e),
            ParamValue::Deferred | ParamValue::Assumed => false,
        }
    }

    fn function_ref(&mut self, x: &FunctionRef) -> bool {
        match &x.proc {
            ProcedureRef::Intrinsic(intrinsic) => {
                // TODO: recognize the remaining inquiry intrinsics (len,
                // bit_size, ...); only kind() is accepted for now.
                intrinsic.name == "kind"
            }
            ProcedureRef::Resolved(_) => false,
        }
    }

    fn binary(&mut self, x: &Binary) -> bool {
        // Integer division by a divisor already known to be zero can never
        // be part of a constant. A divisor that cannot be evaluated yet is
        // not flagged here; the operands must still be constant themselves.
        if x.op.is_divide() && x.category.is_integer() {
            if let Some(divisor) = x.right.known_int() {
                if *divisor == BigInt::from(0) {
                    return false;
                }
            }
        }
        self.expr(&x.left) && self.expr(&x.right)
    }
}

/// True when `expr` is a constant expression.
pub fn is_constant_expr(table: &SymbolTable, expr: &Expr) -> bool {
    debug!("classifying constancy of {:?} node", expr.kind());
    ConstantExprWalk { table }.expr(expr)
}
