//! The expression legality predicates.
//!
//! Four entry points over one shared pair of walks (see
//! [`crate::traverse`]): constancy, pointer-initializer shape,
//! specification-expression legality, and simple contiguity. Each is a pure
//! function of the expression and the passed-in context; the
//! initial-data-target validator and the specification-expression wrapper
//! additionally append to a [`crate::message::Messages`] sink.

mod constant;
mod contiguous;
mod init_target;
mod spec_expr;

pub use constant::is_constant_expr;
pub use contiguous::is_simply_contiguous;
pub use init_target::{InitialTargetViolation, is_initial_data_target};
pub use spec_expr::{
    SpecExprReason, check_specification_expr, require_specification_expr,
};
