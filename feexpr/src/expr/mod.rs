//! The expression tree.
//!
//! One closed sum type over every node kind the semantic checkers have to
//! consider, built by upstream parsing/resolution phases and immutable from
//! then on. The enum is deliberately exhaustive: adding a node kind forces
//! every `match` in the workspace to be revisited.
use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

use crate::{
    symbol::{ResultAttrs, SymbolId, SymbolTable},
    value::LiteralValue,
};

pub mod fmt;

/// Subscript list of an array or coarray reference.
pub type Subscripts = SmallVec<[Subscript; 4]>;

/// A literal constant, scalar or (already folded) array valued.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Literal {
    pub value: LiteralValue,
    pub rank: u8,
}

impl Literal {
    /// Scalar literal.
    pub fn scalar(value: impl Into<LiteralValue>) -> Self {
        Literal {
            value: value.into(),
            rank: 0,
        }
    }
}

/// An untyped binary-or-hex bit-string literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BozLiteral {
    pub bits: BigInt,
}

/// Compiler-created static data, e.g. the storage backing a character
/// literal that had to be materialized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaticDataObject {
    pub name: String,
}

/// Lower:upper:stride section subscript; absent parts default to the
/// declared bound (or stride one).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triplet {
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
    pub stride: Option<Box<Expr>>,
}

impl Triplet {
    /// The unconstrained `:` section.
    pub fn full() -> Self {
        Triplet::default()
    }

    pub fn new(lower: Option<Expr>, upper: Option<Expr>, stride: Option<Expr>) -> Self {
        Triplet {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            stride: stride.map(Box::new),
        }
    }

    /// True when the stride is statically known to be exactly one. An absent
    /// stride defaults to one.
    pub fn is_stride_one(&self) -> bool {
        match &self.stride {
            None => true,
            Some(stride) => stride
                .known_int()
                .is_some_and(|v| *v == BigInt::from(1)),
        }
    }
}

/// One subscript of an array or coarray reference.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Subscript {
    /// Single subscript value (scalar, or a vector-valued index).
    Element(Box<Expr>),
    /// Section triplet.
    Triplet(Triplet),
}

impl Subscript {
    pub fn element(expr: Expr) -> Self {
        Subscript::Element(Box::new(expr))
    }

    /// Rank contributed by this subscript to the whole reference.
    pub fn rank(&self, table: &SymbolTable) -> u8 {
        match self {
            Subscript::Element(e) => e.rank(table),
            Subscript::Triplet(_) => 1,
        }
    }
}

/// Array element or section reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayRef {
    pub base: SymbolId,
    pub subscripts: Subscripts,
}

impl ArrayRef {
    pub fn new(base: SymbolId, subscripts: impl IntoIterator<Item = Subscript>) -> Self {
        ArrayRef {
            base,
            subscripts: subscripts.into_iter().collect(),
        }
    }

    pub fn rank(&self, table: &SymbolTable) -> u8 {
        self.subscripts.iter().map(|s| s.rank(table)).sum()
    }
}

/// Reference indexed across images: `a(subscripts)[cosubscripts]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoarrayRef {
    pub base: SymbolId,
    pub subscripts: Subscripts,
    pub cosubscripts: Vec<Expr>,
}

impl CoarrayRef {
    pub fn rank(&self, table: &SymbolTable) -> u8 {
        self.subscripts.iter().map(|s| s.rank(table)).sum()
    }
}

/// Record component reference `base%component`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    pub base: Box<Expr>,
    pub component: SymbolId,
}

/// Substring reference with optional bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Substring {
    pub parent: Box<Expr>,
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
}

/// Which part of a complex entity a [`ComplexPart`] designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComplexPartKind {
    Re,
    Im,
}

/// `%re`/`%im` part reference of a complex designator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComplexPart {
    pub complex: Box<Expr>,
    pub part: ComplexPartKind,
}

/// Type category an operation is performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeCategory {
    Integer,
    Real,
    Complex,
    Character,
    Logical,
}

/// Unary operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    Negate,
    Not,
}

/// Binary operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Concat,
    And,
    Or,
}

/// Relational comparison tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelationalOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Unary operation node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    pub op: UnaryOp,
    pub category: TypeCategory,
    pub operand: Box<Expr>,
}

/// Binary operation node, tagged with the type category it is performed in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    pub op: BinaryOp,
    pub category: TypeCategory,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Relational comparison node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relational {
    pub op: RelationalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A specific intrinsic procedure, identified by its lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecificIntrinsic {
    pub name: String,
}

impl SpecificIntrinsic {
    pub fn new(name: impl Into<String>) -> Self {
        SpecificIntrinsic { name: name.into() }
    }
}

/// Procedure designated by a call: either a resolved procedure symbol or a
/// specific intrinsic. A call with neither cannot be constructed.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(ProcedureRefKind))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcedureRef {
    /// Reference to a procedure symbol resolved by earlier phases.
    Resolved(SymbolId),
    /// Reference to a specific intrinsic.
    Intrinsic(SpecificIntrinsic),
}

/// Function call node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionRef {
    pub proc: ProcedureRef,
    pub args: Vec<Expr>,
}

/// Structure constructor `type(values...)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructureCtor {
    pub type_name: String,
    pub values: Vec<Expr>,
}

/// Array constructor `[elements...]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayCtor {
    pub elements: Vec<Expr>,
}

/// Which category of type parameter an inquiry asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeParamKind {
    /// Storage-representation parameter; fixed at compile time.
    Kind,
    /// Length parameter; may be deferred to run time.
    Len,
}

/// Inquiry of a derived-type parameter, e.g. `x%k`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeParamInquiry {
    pub base: Option<Box<Expr>>,
    pub parameter: String,
    pub which: TypeParamKind,
}

/// Field asked about by a lowered descriptor inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescriptorField {
    LowerBound,
    UpperBound,
    Extent,
    Rank,
    Len,
}

/// A SIZE/LBOUND-style inquiry already lowered by folding to a read of the
/// entity's descriptor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DescriptorInquiry {
    pub base: SymbolId,
    pub field: DescriptorField,
    /// Zero-based dimension, where the field is per-dimension.
    pub dimension: u8,
}

/// Value of a type parameter in a declaration.
#[derive(Debug, Clone, PartialEq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// `:` — decided at allocation time.
    Deferred,
    /// `*` — taken from the effective argument.
    Assumed,
    /// Explicitly given value.
    Explicit(Box<Expr>),
}

/// An expression node.
///
/// Every alternative either is a leaf or owns its children; the tree is
/// finite and acyclic by construction.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(derive(EnumIs, Hash))]
#[strum_discriminants(name(ExprKind))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    Literal(Literal),
    BozLiteral(BozLiteral),
    NullPointer,
    StaticDataObject(StaticDataObject),
    SymbolRef(SymbolId),
    ArrayRef(ArrayRef),
    CoarrayRef(CoarrayRef),
    Component(Component),
    Substring(Substring),
    ComplexPart(ComplexPart),
    Parentheses(Box<Expr>),
    Unary(Unary),
    Binary(Binary),
    Relational(Relational),
    FunctionRef(FunctionRef),
    StructureCtor(StructureCtor),
    ArrayCtor(ArrayCtor),
    TypeParamInquiry(TypeParamInquiry),
    DescriptorInquiry(DescriptorInquiry),
    ParamValue(ParamValue),
    /// A bare procedure designator used as a value.
    ProcedureDesignator(ProcedureRef),
}

impl Expr {
    /// Discriminant of this node.
    #[inline]
    pub fn kind(&self) -> ExprKind {
        self.into()
    }

    /// Scalar integer literal of the default kind.
    pub fn int(value: i64) -> Expr {
        Expr::Literal(Literal::scalar(value))
    }

    /// Scalar logical literal.
    pub fn logical(value: bool) -> Expr {
        Expr::Literal(Literal::scalar(value))
    }

    /// Scalar character literal.
    pub fn character(value: &str) -> Expr {
        Expr::Literal(Literal::scalar(value))
    }

    pub fn symbol(id: SymbolId) -> Expr {
        Expr::SymbolRef(id)
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Parentheses(Box::new(inner))
    }

    pub fn binary(op: BinaryOp, category: TypeCategory, left: Expr, right: Expr) -> Expr {
        Expr::Binary(Binary {
            op,
            category,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Integer division node.
    pub fn int_divide(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Divide, TypeCategory::Integer, left, right)
    }

    pub fn call(proc: ProcedureRef, args: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::FunctionRef(FunctionRef {
            proc,
            args: args.into_iter().collect(),
        })
    }

    /// Call of a specific intrinsic by name.
    pub fn intrinsic_call(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::call(
            ProcedureRef::Intrinsic(SpecificIntrinsic::new(name)),
            args,
        )
    }

    /// The value of this expression when it is a scalar integer constant,
    /// looking through parentheses. This is not a folder; anything that
    /// still requires evaluation yields `None`.
    pub fn known_int(&self) -> Option<&BigInt> {
        match self {
            Expr::Literal(lit) if lit.rank == 0 => lit.value.as_int(),
            Expr::Parentheses(inner) => inner.known_int(),
            _ => None,
        }
    }

    /// Rank of this expression.
    pub fn rank(&self, table: &SymbolTable) -> u8 {
        match self {
            Expr::Literal(lit) => lit.rank,
            Expr::BozLiteral(_)
            | Expr::NullPointer
            | Expr::StaticDataObject(_)
            | Expr::TypeParamInquiry(_)
            | Expr::DescriptorInquiry(_)
            | Expr::ParamValue(_)
            | Expr::StructureCtor(_)
            | Expr::ProcedureDesignator(_) => 0,
            Expr::SymbolRef(id) => table.symbol(*id).rank,
            Expr::ArrayRef(x) => x.rank(table),
            Expr::CoarrayRef(x) => x.rank(table),
            Expr::Component(x) => {
                let base = x.base.rank(table);
                if base > 0 {
                    base
                } else {
                    table.symbol(x.component).rank
                }
            }
            Expr::Substring(x) => x.parent.rank(table),
            Expr::ComplexPart(x) => x.complex.rank(table),
            Expr::Parentheses(inner) => inner.rank(table),
            Expr::Unary(x) => x.operand.rank(table),
            Expr::Binary(x) => x.left.rank(table).max(x.right.rank(table)),
            Expr::Relational(x) => x.left.rank(table).max(x.right.rank(table)),
            Expr::FunctionRef(x) => match &x.proc {
                ProcedureRef::Resolved(id) => table.symbol(table.ultimate(*id)).rank,
                ProcedureRef::Intrinsic(_) => 0,
            },
            Expr::ArrayCtor(_) => 1,
        }
    }

    /// True when this expression designates an object with storage — a
    /// "variable" in the storage sense. Named constants are not variables,
    /// and neither is anything wrapped in parentheses. A call to a function
    /// whose result is a data pointer designates the pointed-to storage and
    /// counts as well.
    pub fn is_variable(&self, table: &SymbolTable) -> bool {
        match self {
            Expr::SymbolRef(id) => {
                let ultimate = table.ultimate(*id);
                !table.is_named_constant(ultimate)
                    && table.symbol(ultimate).details.is_object()
            }
            Expr::ArrayRef(x) => !table.is_named_constant(x.base),
            Expr::CoarrayRef(_) => true,
            Expr::Component(x) => x.base.is_variable(table),
            Expr::Substring(x) => x.parent.is_variable(table),
            Expr::ComplexPart(x) => x.complex.is_variable(table),
            Expr::FunctionRef(x) => match &x.proc {
                ProcedureRef::Resolved(id) => table
                    .function_result(*id)
                    .is_some_and(|r| {
                        r.attrs.contains(ResultAttrs::POINTER) && !r.procedure_pointer
                    }),
                ProcedureRef::Intrinsic(_) => false,
            },
            _ => false,
        }
    }
}
