use feexpr::{
    expr::{ArrayRef, BinaryOp, Expr, Subscript, Triplet, TypeCategory},
    symbol::{Attrs, ProcedureDetails, ScopeKind, Symbol, SymbolTable},
};

#[test]
fn operations_are_never_known_integers() {
    let sum = Expr::binary(
        BinaryOp::Add,
        TypeCategory::Integer,
        Expr::int(1),
        Expr::int(2),
    );
    assert_eq!(sum.known_int(), None);
    assert_eq!(Expr::paren(sum).known_int(), None);
}

#[test]
fn vector_subscripts_contribute_their_rank() {
    let mut table = SymbolTable::new();
    let scope = table.push_scope(ScopeKind::Subprogram, table.global());
    let a = table.declare(Symbol::object("a", scope).with_rank(3));
    let v = table.declare(Symbol::object("v", scope).with_rank(1));

    let vector = Expr::ArrayRef(ArrayRef::new(
        a,
        [
            Subscript::element(Expr::symbol(v)),
            Subscript::element(Expr::int(1)),
            Subscript::Triplet(Triplet::full()),
        ],
    ));
    assert_eq!(vector.rank(&table), 2);
}

#[test]
fn pointer_valued_calls_are_variables() {
    use feexpr::expr::ProcedureRef;
    use feexpr::symbol::{FunctionResult, ResultAttrs};

    let mut table = SymbolTable::new();
    let scope = table.push_scope(ScopeKind::Subprogram, table.global());
    let pointer_fn = table.declare(Symbol::procedure(
        "view",
        scope,
        ProcedureDetails {
            pure: true,
            result: Some(FunctionResult {
                attrs: ResultAttrs::POINTER,
                procedure_pointer: false,
            }),
        },
    ));
    let plain_fn = table.declare(Symbol::procedure(
        "total",
        scope,
        ProcedureDetails {
            pure: true,
            result: None,
        },
    ));

    assert!(Expr::call(ProcedureRef::Resolved(pointer_fn), []).is_variable(&table));
    assert!(!Expr::call(ProcedureRef::Resolved(plain_fn), []).is_variable(&table));
    assert!(!Expr::intrinsic_call("kind", [Expr::int(0)]).is_variable(&table));
}

#[test]
fn substrings_inherit_variability_from_their_parent() {
    let mut table = SymbolTable::new();
    let scope = table.push_scope(ScopeKind::Subprogram, table.global());
    let s = table.declare(Symbol::object("s", scope));
    let c = table.declare(Symbol::object("c", scope).with_attrs(Attrs::PARAMETER));

    let of_variable = Expr::Substring(feexpr::expr::Substring {
        parent: Box::new(Expr::symbol(s)),
        lower: Some(Box::new(Expr::int(1))),
        upper: None,
    });
    let of_constant = Expr::Substring(feexpr::expr::Substring {
        parent: Box::new(Expr::symbol(c)),
        lower: Some(Box::new(Expr::int(1))),
        upper: None,
    });
    assert!(of_variable.is_variable(&table));
    assert!(!of_constant.is_variable(&table));
}

#[test]
fn rendering_matches_source_syntax() {
    let mut table = SymbolTable::new();
    let scope = table.push_scope(ScopeKind::Subprogram, table.global());
    let a = table.declare(Symbol::object("a", scope).with_rank(3));

    let section = Expr::ArrayRef(ArrayRef::new(
        a,
        [
            Subscript::Triplet(Triplet::full()),
            Subscript::Triplet(Triplet::full()),
            Subscript::Triplet(Triplet::new(Some(Expr::int(1)), Some(Expr::int(5)), None)),
        ],
    ));
    assert_eq!(section.fmt(Some(&table)).to_string(), "a(:,:,1:5)");
    assert_eq!(Expr::NullPointer.fmt(None).to_string(), "null()");
    assert_eq!(Expr::logical(false).fmt(None).to_string(), ".false.");
    assert_eq!(Expr::character("hi").fmt(None).to_string(), "'hi'");
    assert_eq!(
        Expr::intrinsic_call("kind", [Expr::int(0)])
            .fmt(None)
            .to_string(),
        "kind(0)"
    );
}
