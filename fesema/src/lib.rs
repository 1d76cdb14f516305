//! Static expression-legality analysis.
//!
//! Answers four questions later compilation phases depend on: is an
//! expression a compile-time constant, is it a legal pointer-initializer
//! target, is it legal in a specification context, and is a reference
//! guaranteed contiguous storage. All four are instances of the same
//! problem — exhaustively walking the [`feexpr::expr::Expr`] tree — so the
//! crate is one small traversal engine plus four policies on top of it.
//!
//! Everything is synchronous and read-only; the only side channel is the
//! append-only [`message::Messages`] sink a caller can hand to the checks
//! that report diagnostics.

pub mod check;
pub mod message;
pub mod traverse;
