use feexpr::{
    expr::{
        BinaryOp, CoarrayRef, DescriptorField, DescriptorInquiry, Expr, ProcedureRef,
        SpecificIntrinsic, TypeCategory,
    },
    symbol::{
        Attrs, ProcedureDetails, ScopeId, ScopeKind, Symbol, SymbolDetails, SymbolId, SymbolTable,
    },
};
use fesema::{
    check::{check_specification_expr, require_specification_expr, SpecExprReason},
    message::Messages,
};

struct Fixture {
    table: SymbolTable,
    /// Subprogram scope the checks run in.
    scope: ScopeId,
    parameter: SymbolId,
    dummy: SymbolId,
    optional_dummy: SymbolId,
    intent_out_dummy: SymbolId,
    module_var: SymbolId,
    common_var: SymbolId,
    local: SymbolId,
    pure_function: SymbolId,
    impure_function: SymbolId,
}

fn fixture() -> Fixture {
    let mut table = SymbolTable::new();
    let module = table.push_scope(ScopeKind::Module, table.global());
    let scope = table.push_scope(ScopeKind::Subprogram, module);

    let parameter = table.declare(Symbol::object("c", scope).with_attrs(Attrs::PARAMETER));
    let dummy = table.declare(Symbol::object("n", scope).with_attrs(Attrs::DUMMY));
    let optional_dummy =
        table.declare(Symbol::object("o", scope).with_attrs(Attrs::DUMMY | Attrs::OPTIONAL));
    let intent_out_dummy =
        table.declare(Symbol::object("out", scope).with_attrs(Attrs::DUMMY | Attrs::INTENT_OUT));
    let module_var = table.declare(Symbol::object("m", module));
    let common_var = table.declare(Symbol::object("cb", scope).in_common("blk"));
    let local = table.declare(Symbol::object("i", scope));
    let pure_function = table.declare(Symbol::procedure(
        "square",
        module,
        ProcedureDetails {
            pure: true,
            result: None,
        },
    ));
    let impure_function = table.declare(Symbol::procedure(
        "next_state",
        module,
        ProcedureDetails {
            pure: false,
            result: None,
        },
    ));

    Fixture {
        table,
        scope,
        parameter,
        dummy,
        optional_dummy,
        intent_out_dummy,
        module_var,
        common_var,
        local,
        pure_function,
        impure_function,
    }
}

fn check(f: &Fixture, expr: &Expr) -> Option<SpecExprReason> {
    check_specification_expr(&f.table, f.scope, expr)
}

#[test]
fn constants_and_plain_dummies_are_legal() {
    let f = fixture();
    assert_eq!(check(&f, &Expr::int(42)), None);
    assert_eq!(check(&f, &Expr::symbol(f.parameter)), None);
    assert_eq!(check(&f, &Expr::symbol(f.dummy)), None);
    let sum = Expr::binary(
        BinaryOp::Add,
        TypeCategory::Integer,
        Expr::symbol(f.dummy),
        Expr::int(1),
    );
    assert_eq!(check(&f, &sum), None);
}

#[test]
fn optional_dummies_are_rejected_with_their_name() {
    let f = fixture();
    assert_eq!(
        check(&f, &Expr::symbol(f.optional_dummy)),
        Some(SpecExprReason::OptionalDummy { name: "o".into() })
    );
}

#[test]
fn intent_out_dummies_are_rejected() {
    let f = fixture();
    assert_eq!(
        check(&f, &Expr::symbol(f.intent_out_dummy)),
        Some(SpecExprReason::IntentOutDummy {
            name: "out".into()
        })
    );
}

#[test]
fn module_and_common_block_entities_are_legal() {
    let f = fixture();
    assert_eq!(check(&f, &Expr::symbol(f.module_var)), None);
    assert_eq!(check(&f, &Expr::symbol(f.common_var)), None);
}

#[test]
fn local_entities_are_rejected() {
    let f = fixture();
    assert_eq!(
        check(&f, &Expr::symbol(f.local)),
        Some(SpecExprReason::LocalEntity { name: "i".into() })
    );
}

#[test]
fn host_scope_entities_are_legal_in_nested_subprograms() {
    let mut table = SymbolTable::new();
    let outer = table.push_scope(ScopeKind::Subprogram, table.global());
    let inner = table.push_scope(ScopeKind::Subprogram, outer);
    let host_var = table.declare(Symbol::object("h", outer));
    let inner_var = table.declare(Symbol::object("i", inner));

    assert_eq!(
        check_specification_expr(&table, inner, &Expr::symbol(host_var)),
        None
    );
    assert_eq!(
        check_specification_expr(&table, inner, &Expr::symbol(inner_var)),
        Some(SpecExprReason::LocalEntity { name: "i".into() })
    );
    // From the host's own point of view, `h` is local.
    assert_eq!(
        check_specification_expr(&table, outer, &Expr::symbol(host_var)),
        Some(SpecExprReason::LocalEntity { name: "h".into() })
    );
}

#[test]
fn block_constructs_see_their_enclosing_subprogram() {
    let mut table = SymbolTable::new();
    let subprogram = table.push_scope(ScopeKind::Subprogram, table.global());
    let block = table.push_scope(ScopeKind::BlockConstruct, subprogram);
    let outer_var = table.declare(Symbol::object("n", subprogram));
    let block_var = table.declare(Symbol::object("b", block));

    assert_eq!(
        check_specification_expr(&table, block, &Expr::symbol(outer_var)),
        None
    );
    assert_eq!(
        check_specification_expr(&table, block, &Expr::symbol(block_var)),
        Some(SpecExprReason::LocalEntity { name: "b".into() })
    );
}

#[test]
fn host_associated_names_are_legal() {
    let mut table = SymbolTable::new();
    let outer = table.push_scope(ScopeKind::Subprogram, table.global());
    let inner = table.push_scope(ScopeKind::Subprogram, outer);
    let host_var = table.declare(Symbol::object("h", outer));
    let associated = table.declare(Symbol {
        details: SymbolDetails::HostAssoc(host_var),
        ..Symbol::object("h", inner)
    });
    assert_eq!(
        check_specification_expr(&table, inner, &Expr::symbol(associated)),
        None
    );
}

#[test]
fn coindexed_references_are_rejected() {
    let f = fixture();
    let mut table = f.table;
    let coarray = table.declare(Symbol::object("co", f.scope).with_corank(1));
    let coref = Expr::CoarrayRef(CoarrayRef {
        base: coarray,
        subscripts: Default::default(),
        cosubscripts: vec![Expr::int(1)],
    });
    assert_eq!(
        check_specification_expr(&table, f.scope, &coref),
        Some(SpecExprReason::CoindexedReference)
    );
}

#[test]
fn bare_procedure_designators_are_rejected() {
    let f = fixture();
    let designator = Expr::ProcedureDesignator(ProcedureRef::Resolved(f.pure_function));
    assert_eq!(check(&f, &designator), Some(SpecExprReason::DummyProcedure));
}

#[test]
fn impure_function_references_are_rejected() {
    let f = fixture();
    let call = Expr::call(ProcedureRef::Resolved(f.impure_function), [Expr::int(1)]);
    assert_eq!(
        check(&f, &call),
        Some(SpecExprReason::ImpureFunction {
            name: "next_state".into()
        })
    );
}

#[test]
fn pure_function_arguments_are_still_checked() {
    let f = fixture();
    let good = Expr::call(ProcedureRef::Resolved(f.pure_function), [Expr::symbol(f.dummy)]);
    let bad = Expr::call(ProcedureRef::Resolved(f.pure_function), [Expr::symbol(f.local)]);
    assert_eq!(check(&f, &good), None);
    assert_eq!(
        check(&f, &bad),
        Some(SpecExprReason::LocalEntity { name: "i".into() })
    );
}

#[test]
fn present_is_legal_even_on_an_optional_dummy() {
    let f = fixture();
    let call = Expr::intrinsic_call("present", [Expr::symbol(f.optional_dummy)]);
    assert_eq!(check(&f, &call), None);
}

#[test]
fn constant_inquiry_intrinsics_skip_argument_checks() {
    let f = fixture();
    let kind = Expr::intrinsic_call("kind", [Expr::int(0)]);
    assert_eq!(check(&f, &kind), None);
    // A non-constant intrinsic call still has its arguments vetted.
    let abs = Expr::intrinsic_call("abs", [Expr::symbol(f.local)]);
    assert_eq!(
        check(&f, &abs),
        Some(SpecExprReason::LocalEntity { name: "i".into() })
    );
}

#[test]
fn descriptor_inquiries_are_always_legal() {
    let f = fixture();
    // size(i,dim=1) lowered to a descriptor read; legal even though a
    // direct reference to `i` would not be.
    let inquiry = Expr::DescriptorInquiry(DescriptorInquiry {
        base: f.local,
        field: DescriptorField::Extent,
        dimension: 0,
    });
    assert_eq!(check(&f, &inquiry), None);
}

#[test]
fn first_reason_in_traversal_order_wins() {
    let f = fixture();
    let e = Expr::binary(
        BinaryOp::Add,
        TypeCategory::Integer,
        Expr::symbol(f.optional_dummy),
        Expr::symbol(f.local),
    );
    assert_eq!(
        check(&f, &e),
        Some(SpecExprReason::OptionalDummy { name: "o".into() })
    );
}

#[test]
fn require_reports_a_formatted_error() {
    let f = fixture();
    let mut messages = Messages::new();
    assert!(require_specification_expr(
        &f.table,
        f.scope,
        &Expr::symbol(f.dummy),
        &mut messages
    ));
    assert!(messages.is_empty());

    assert!(!require_specification_expr(
        &f.table,
        f.scope,
        &Expr::symbol(f.optional_dummy),
        &mut messages
    ));
    let message = messages.iter().next().expect("one diagnostic");
    assert_eq!(
        message.text,
        "invalid specification expression: reference to OPTIONAL dummy argument 'o'"
    );
}

#[test]
fn intrinsic_designators_are_rejected_like_dummy_procedures() {
    let f = fixture();
    let designator = Expr::ProcedureDesignator(ProcedureRef::Intrinsic(SpecificIntrinsic::new(
        "sin",
    )));
    assert_eq!(check(&f, &designator), Some(SpecExprReason::DummyProcedure));
}
