//! Generic recursive walks over the expression tree.
//!
//! Two strategies, both expressed as traits whose default methods perform the
//! structural recursion. A checker implements the trait, overrides the hooks
//! for the node kinds it has an opinion about, and inherits the recursion for
//! everything else. An override fully replaces the default for its kind; it
//! only descends into children if it recurses itself.
//!
//! [`ConjunctionWalk`] combines child results with a short-circuiting AND
//! (`true` for leaves). [`SearchWalk`] returns the first finding produced by
//! a left-to-right scan (`None` for leaves). Both visit children strictly
//! left to right and stop as soon as the combined result is decided, which
//! the checkers rely on for their first-violation semantics.
//!
//! The walks themselves never mutate anything; hooks take `&mut self` only
//! so that a checker can carry a diagnostic sink.
use feexpr::{
    expr::{
        ArrayCtor, ArrayRef, Binary, BozLiteral, CoarrayRef, Component, ComplexPart,
        DescriptorInquiry, Expr, FunctionRef, Literal, ParamValue, ProcedureRef, Relational,
        StaticDataObject, StructureCtor, Subscript, Substring, Triplet, TypeParamInquiry, Unary,
    },
    symbol::SymbolId,
};

/// Apply a hook to an optional child, defaulting absent children to `true`.
fn all_opt<V: ConjunctionWalk + ?Sized>(v: &mut V, child: &Option<Box<Expr>>) -> bool {
    child.as_deref().is_none_or(|e| v.expr(e))
}

/// Apply a hook to an optional child, defaulting absent children to no finding.
fn find_opt<V: SearchWalk + ?Sized>(
    v: &mut V,
    child: &Option<Box<Expr>>,
) -> Option<V::Finding> {
    child.as_deref().and_then(|e| v.expr(e))
}

/// Recursive walk whose result is the conjunction of its children's results.
pub trait ConjunctionWalk {
    /// Dispatch on the node kind. Not meant to be overridden.
    fn expr(&mut self, e: &Expr) -> bool {
        match e {
            Expr::Literal(x) => self.literal(x),
            Expr::BozLiteral(x) => self.boz_literal(x),
            Expr::NullPointer => self.null_pointer(),
            Expr::StaticDataObject(x) => self.static_data_object(x),
            Expr::SymbolRef(id) => self.symbol(*id),
            Expr::ArrayRef(x) => self.array_ref(x),
            Expr::CoarrayRef(x) => self.coarray_ref(x),
            Expr::Component(x) => self.component(x),
            Expr::Substring(x) => self.substring(x),
            Expr::ComplexPart(x) => self.complex_part(x),
            Expr::Parentheses(inner) => self.parentheses(inner),
            Expr::Unary(x) => self.unary(x),
            Expr::Binary(x) => self.binary(x),
            Expr::Relational(x) => self.relational(x),
            Expr::FunctionRef(x) => self.function_ref(x),
            Expr::StructureCtor(x) => self.structure_ctor(x),
            Expr::ArrayCtor(x) => self.array_ctor(x),
            Expr::TypeParamInquiry(x) => self.type_param_inquiry(x),
            Expr::DescriptorInquiry(x) => self.descriptor_inquiry(x),
            Expr::ParamValue(x) => self.param_value(x),
            Expr::ProcedureDesignator(x) => self.procedure_designator(x),
        }
    }

    // Leaves.

    fn literal(&mut self, _: &Literal) -> bool {
        true
    }

    fn boz_literal(&mut self, _: &BozLiteral) -> bool {
        true
    }

    fn null_pointer(&mut self) -> bool {
        true
    }

    fn static_data_object(&mut self, _: &StaticDataObject) -> bool {
        true
    }

    fn symbol(&mut self, _: SymbolId) -> bool {
        true
    }

    fn descriptor_inquiry(&mut self, _: &DescriptorInquiry) -> bool {
        true
    }

    fn procedure_designator(&mut self, _: &ProcedureRef) -> bool {
        true
    }

    // Interior nodes: AND over children, left to right, short-circuiting.

    fn array_ref(&mut self, x: &ArrayRef) -> bool {
        self.symbol(x.base) && x.subscripts.iter().all(|s| self.subscript(s))
    }

    fn coarray_ref(&mut self, x: &CoarrayRef) -> bool {
        self.symbol(x.base)
            && x.subscripts.iter().all(|s| self.subscript(s))
            && x.cosubscripts.iter().all(|e| self.expr(e))
    }

    fn component(&mut self, x: &Component) -> bool {
        self.expr(&x.base) && self.symbol(x.component)
    }

    fn substring(&mut self, x: &Substring) -> bool {
        self.expr(&x.parent) && all_opt(self, &x.lower) && all_opt(self, &x.upper)
    }

    fn complex_part(&mut self, x: &ComplexPart) -> bool {
        self.expr(&x.complex)
    }

    fn parentheses(&mut self, inner: &Expr) -> bool {
        self.expr(inner)
    }

    fn unary(&mut self, x: &Unary) -> bool {
        self.expr(&x.operand)
    }

    fn binary(&mut self, x: &Binary) -> bool {
        self.expr(&x.left) && self.expr(&x.right)
    }

    fn relational(&mut self, x: &Relational) -> bool {
        self.expr(&x.left) && self.expr(&x.right)
    }

    fn function_ref(&mut self, x: &FunctionRef) -> bool {
        x.args.iter().all(|a| self.expr(a))
    }

    fn structure_ctor(&mut self, x: &StructureCtor) -> bool {
        x.values.iter().all(|e| self.expr(e))
    }

    fn array_ctor(&mut self, x: &ArrayCtor) -> bool {
        x.elements.iter().all(|e| self.expr(e))
    }

    fn type_param_inquiry(&mut self, x: &TypeParamInquiry) -> bool {
        all_opt(self, &x.base)
    }

    fn param_value(&mut self, x: &ParamValue) -> bool {
        match x {
            ParamValue::Explicit(e) => self.expr(e),
            ParamValue::Deferred | ParamValue::Assumed => true,
        }
    }

    fn subscript(&mut self, s: &Subscript) -> bool {
        match s {
            Subscript::Element(e) => self.expr(e),
            Subscript::Triplet(t) => self.triplet(t),
        }
    }

    fn triplet(&mut self, t: &Triplet) -> bool {
        all_opt(self, &t.lower) && all_opt(self, &t.upper) && all_opt(self, &t.stride)
    }
}

/// Recursive walk that reports the first finding of a left-to-right scan.
pub trait SearchWalk {
    /// What a successful search produces.
    type Finding;

    /// Dispatch on the node kind. Not meant to be overridden.
    fn expr(&mut self, e: &Expr) -> Option<Self::Finding> {
        match e {
            Expr::Literal(x) => self.literal(x),
            Expr::BozLiteral(x) => self.boz_literal(x),
            Expr::NullPointer => self.null_pointer(),
            Expr::StaticDataObject(x) => self.static_data_object(x),
            Expr::SymbolRef(id) => self.symbol(*id),
            Expr::ArrayRef(x) => self.array_ref(x),
            Expr::CoarrayRef(x) => self.coarray_ref(x),
            Expr::Component(x) => self.component(x),
            Expr::Substring(x) => self.substring(x),
            Expr::ComplexPart(x) => self.complex_part(x),
            Expr::Parentheses(inner) => self.parentheses(inner),
            Expr::Unary(x) => self.unary(x),
            Expr::Binary(x) => self.binary(x),
            Expr::Relational(x) => self.relational(x),
            Expr::FunctionRef(x) => self.function_ref(x),
            Expr::StructureCtor(x) => self.structure_ctor(x),
            Expr::ArrayCtor(x) => self.array_ctor(x),
            Expr::TypeParamInquiry(x) => self.type_param_inquiry(x),
            Expr::DescriptorInquiry(x) => self.descriptor_inquiry(x),
            Expr::ParamValue(x) => self.param_value(x),
            Expr::ProcedureDesignator(x) => self.procedure_designator(x),
        }
    }

    // Leaves.

    fn literal(&mut self, _: &Literal) -> Option<Self::Finding> {
        None
    }

    fn boz_literal(&mut self, _: &BozLiteral) -> Option<Self::Finding> {
        None
    }

    fn null_pointer(&mut self) -> Option<Self::Finding> {
        None
    }

    fn static_data_object(&mut self, _: &StaticDataObject) -> Option<Self::Finding> {
        None
    }

    fn symbol(&mut self, _: SymbolId) -> Option<Self::Finding> {
        None
    }

    fn descriptor_inquiry(&mut self, _: &DescriptorInquiry) -> Option<Self::Finding> {
        None
    }

    fn procedure_designator(&mut self, _: &ProcedureRef) -> Option<Self::Finding> {
        None
    }

    // Interior nodes: first finding wins, left to right.

    fn array_ref(&mut self, x: &ArrayRef) -> Option<Self::Finding> {
        self.symbol(x.base)
            .or_else(|| x.subscripts.iter().find_map(|s| self.subscript(s)))
    }

    fn coarray_ref(&mut self, x: &CoarrayRef) -> Option<Self::Finding> {
        self.symbol(x.base)
            .or_else(|| x.subscripts.iter().find_map(|s| self.subscript(s)))
            .or_else(|| x.cosubscripts.iter().find_map(|e| self.expr(e)))
    }

    fn component(&mut self, x: &Component) -> Option<Self::Finding> {
        self.expr(&x.base).or_else(|| self.symbol(x.component))
    }

    fn substring(&mut self, x: &Substring) -> Option<Self::Finding> {
        self.expr(&x.parent)
            .or_else(|| find_opt(self, &x.lower))
            .or_else(|| find_opt(self, &x.upper))
    }

    fn complex_part(&mut self, x: &ComplexPart) -> Option<Self::Finding> {
        self.expr(&x.complex)
    }

    fn parentheses(&mut self, inner: &Expr) -> Option<Self::Finding> {
        self.expr(inner)
    }

    fn unary(&mut self, x: &Unary) -> Option<Self::Finding> {
        self.expr(&x.operand)
    }

    fn binary(&mut self, x: &Binary) -> Option<Self::Finding> {
        self.expr(&x.left).or_else(|| self.expr(&x.right))
    }

    fn relational(&mut self, x: &Relational) -> Option<Self::Finding> {
        self.expr(&x.left).or_else(|| self.expr(&x.right))
    }

    fn function_ref(&mut self, x: &FunctionRef) -> Option<Self::Finding> {
        x.args.iter().find_map(|a| self.expr(a))
    }

    fn structure_ctor(&mut self, x: &StructureCtor) -> Option<Self::Finding> {
        x.values.iter().find_map(|e| self.expr(e))
    }

    fn array_ctor(&mut self, x: &ArrayCtor) -> Option<Self::Finding> {
        x.elements.iter().find_map(|e| self.expr(e))
    }

    fn type_param_inquiry(&mut self, x: &TypeParamInquiry) -> Option<Self::Finding> {
        find_opt(self, &x.base)
    }

    fn param_value(&mut self, x: &ParamValue) -> Option<Self::Finding> {
        match x {
            ParamValue::Explicit(e) => self.expr(e),
            ParamValue::Deferred | ParamValue::Assumed => None,
        }
    }

    fn subscript(&mut self, s: &Subscript) -> Option<Self::Finding> {
        match s {
            Subscript::Element(e) => self.expr(e),
            Subscript::Triplet(t) => self.triplet(t),
        }
    }

    fn triplet(&mut self, t: &Triplet) -> Option<Self::Finding> {
        find_opt(self, &t.lower)
            .or_else(|| find_opt(self, &t.upper))
            .or_else(|| find_opt(self, &t.stride))
    }
}
