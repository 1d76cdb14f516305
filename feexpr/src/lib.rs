//! Expression tree and symbol model for the semantic checkers.
//!
//! This crate owns the data the `fesema` classifiers walk: the closed
//! [`expr::Expr`] sum type, literal [`value::LiteralValue`] payloads, and the
//! [`symbol::SymbolTable`] arena with its read-only oracle queries. Nothing
//! here runs analysis; construction happens upstream and everything is
//! immutable once built.

pub mod expr;
pub mod symbol;
pub mod value;
