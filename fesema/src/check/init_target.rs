//! Pointer-initializer target validation.
//!
//! Decides whether an expression has the shape allowed on the right-hand
//! side of a static pointer association at declaration time (`=> x`), and
//! independently reports attribute violations for shapes that parse but are
//! statically illegal. Shape legality is the returned bool; attribute
//! problems go to the sink and never change the result.
use log::debug;
use strum::EnumIs;
use thiserror::Error;

use feexpr::{
    expr::{
        ArrayCtor, Binary, BozLiteral, CoarrayRef, DescriptorInquiry, Expr, FunctionRef, Literal,
        Relational, StaticDataObject, StructureCtor, Subscript, Substring, Triplet,
        TypeParamInquiry, Unary,
    },
    symbol::{Attrs, SymbolId, SymbolTable},
};

use crate::{
    check::constant::ConstantExprWalk, message::Messages, traverse::ConjunctionWalk,
};

/// Attribute violation of an otherwise well-shaped initial data target.
///
/// At most one is reported per symbol reference, in the order the variants
/// are declared here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum InitialTargetViolation {
    #[error("an initial data target may not be a reference to the ALLOCATABLE entity `{name}`")]
    Allocatable { name: String },

    #[error("an initial data target may not be a reference to the coarray `{name}`")]
    Coarray { name: String },

    #[error("an initial data target may not be a reference to `{name}`, which lacks the TARGET attribute")]
    MissingTarget { name: String },

    #[error("an initial data target may not be a reference to `{name}`, which lacks the SAVE attribute")]
    NotSaved { name: String },
}

struct InitialTargetWalk<'a> {
    table: &'a SymbolTable,
    messages: &'a mut Messages,
}

impl InitialTargetWalk<'_> {
    fn constant(&self, e: &Expr) -> bool {
        ConstantExprWalk { table: self.table }.expr(e)
    }

    fn constant_opt(&self, e: &Option<Box<Expr>>) -> bool {
        e.as_deref().is_none_or(|e| self.constant(e))
    }
}

impl ConjunctionWalk for InitialTargetWalk<'_> {
    // Shapes that can never be a data address.

    fn literal(&mut self, _: &Literal) -> bool {
        false
    }

    fn boz_literal(&mut self, _: &BozLiteral) -> bool {
        false
    }

    fn static_data_object(&mut self, _: &StaticDataObject) -> bool {
        false
    }

    fn type_param_inquiry(&mut self, _: &TypeParamInquiry) -> bool {
        false
    }

    fn descriptor_inquiry(&mut self, _: &DescriptorInquiry) -> bool {
        false
    }

    fn array_ctor(&mut self, _: &ArrayCtor) -> bool {
        false
    }

    fn structure_ctor(&mut self, _: &StructureCtor) -> bool {
        false
    }

    fn function_ref(&mut self, _: &FunctionRef) -> bool {
        false
    }

    fn unary(&mut self, _: &Unary) -> bool {
        false
    }

    fn binary(&mut self, _: &Binary) -> bool {
        false
    }

    fn relational(&mut self, _: &Relational) -> bool {
        false
    }

    fn coarray_ref(&mut self, _: &CoarrayRef) -> bool {
        false
    }

    // The one shape that is always allowed.

    fn null_pointer(&mut self) -> bool {
        true
    }

    // A symbol reference is a legal shape; report the first attribute
    // violation, if any, without affecting the result.

    fn symbol(&mut self, id: SymbolId) -> bool {
        let ultimate = self.table.ultimate(id);
        let symbol = self.table.symbol(ultimate);
        let name = || symbol.name.clone();

        let violation = if self.table.is_allocatable(ultimate) {
            Some(InitialTargetViolation::Allocatable { name: name() })
        } else if symbol.corank > 0 {
            Some(InitialTargetViolation::Coarray { name: name() })
        } else if !symbol.attrs.contains(Attrs::TARGET) {
            Some(InitialTargetViolation::MissingTarget { name: name() })
        } else if !self.table.is_saved(ultimate) {
            Some(InitialTargetViolation::NotSaved { name: name() })
        } else {
            None
        };
        if let Some(violation) = violation {
            debug!("initial data target attribute violation: {}", violation);
            self.messages.error(violation);
        }
        true
    }

    // Subscripts must be known at compile time.

    fn subscript(&mut self, s: &Subscript) -> bool {
        match s {
            Subscript::Triplet(t) => self.triplet(t),
            Subscript::Element(e) => e.rank(self.table) == 0 && self.constant(e),
        }
    }

    fn triplet(&mut self, t: &Triplet) -> bool {
        self.constant_opt(&t.lower) && self.constant_opt(&t.upper) && self.constant_opt(&t.stride)
    }

    fn substring(&mut self, x: &Substring) -> bool {
        self.constant_opt(&x.lower) && self.constant_opt(&x.upper) && self.expr(&x.parent)
    }
}

/// True when `expr` has the shape of a legal pointer-initializer target.
///
/// Attribute violations of referenced entities are appended to `messages`;
/// they do not affect the returned value.
pub fn is_initial_data_target(
    table: &SymbolTable,
    expr: &Expr,
    messages: &mut Messages,
) -> bool {
    debug!("validating initial data target {}", expr.fmt(Some(table)));
    InitialTargetWalk { table, messages }.expr(expr)
}
