//! Lambda target typing from declarations, calls and returns.

mod common;

use common::{method_body, static_method, statements};
use jresolve::base::Modifiers;
use jresolve::syntax::{BinaryOp, MethodParts, NodeId, TreeBuilder};

/// Overloads `submit(Runnable)` and `submit(Function<String, String>)`.
fn submit_overloads(b: &mut TreeBuilder) -> Vec<NodeId> {
    let runnable = b.type_ref("Runnable");
    let r = b.param("r", runnable);
    let by_runnable = static_method(b, "submit", "void", vec![r]);
    let s1 = b.type_ref("String");
    let s2 = b.type_ref("String");
    let function = b.generic_type("Function", vec![s1, s2]);
    let f = b.param("f", function);
    let by_function = static_method(b, "submit", "void", vec![f]);
    vec![by_runnable, by_function]
}

#[test]
fn test_lambda_typed_by_declaration() {
    let (fx, (lambda, s_use, call)) = statements(&["java.util.function.Function"], |b| {
        let s1 = b.type_ref("String");
        let i1 = b.type_ref("Integer");
        let ty = b.generic_type("Function", vec![s1, i1]);
        let s = b.lambda_param("s");
        let s_use = b.name("s");
        let call = b.call(Some(s_use), "length", Vec::new());
        let lambda = b.lambda(vec![s], call);
        let decl = b.local_var("f", ty, Some(lambda));
        (vec![decl], (lambda, s_use, call))
    });
    assert_eq!(
        fx.type_of(lambda).as_deref(),
        Some("java.util.function.Function<java.lang.String, java.lang.Integer>")
    );
    assert_eq!(
        fx.canonical(lambda).as_deref(),
        Some("java.util.function.Function#apply(java.lang.Object)")
    );
    assert_eq!(fx.type_of(s_use).as_deref(), Some("java.lang.String"));
    assert_eq!(fx.canonical(call).as_deref(), Some("java.lang.String#length()"));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_lambda_argument_of_inherited_default_method() {
    let (fx, (lambda, x_use)) = statements(&["java.util.List"], |b| {
        let string = b.type_ref("String");
        let list = b.generic_type("List", vec![string]);
        let null = b.null();
        let decl = b.local_var("xs", list, Some(null));
        let xs = b.name("xs");
        let x = b.lambda_param("x");
        let x_use = b.name("x");
        let body = b.call(Some(x_use), "isEmpty", Vec::new());
        let lambda = b.lambda(vec![x], body);
        let call = b.call(Some(xs), "forEach", vec![lambda]);
        let stmt = b.expr_stmt(call);
        (vec![decl, stmt], (lambda, x_use))
    });
    assert_eq!(
        fx.type_of(lambda).as_deref(),
        Some("java.util.function.Consumer<java.lang.String>")
    );
    assert_eq!(fx.type_of(x_use).as_deref(), Some("java.lang.String"));
}

#[test]
fn test_two_parameter_lambda() {
    let (fx, (k_use, v_use)) = statements(&["java.util.Map"], |b| {
        let string = b.type_ref("String");
        let integer = b.type_ref("Integer");
        let map = b.generic_type("Map", vec![string, integer]);
        let null = b.null();
        let decl = b.local_var("m", map, Some(null));
        let m = b.name("m");
        let k = b.lambda_param("k");
        let v = b.lambda_param("v");
        let k_use = b.name("k");
        let v_use = b.name("v");
        let body = b.binary(BinaryOp::Add, k_use, v_use);
        let lambda = b.lambda(vec![k, v], body);
        let call = b.call(Some(m), "forEach", vec![lambda]);
        let stmt = b.expr_stmt(call);
        (vec![decl, stmt], (k_use, v_use))
    });
    assert_eq!(fx.type_of(k_use).as_deref(), Some("java.lang.String"));
    assert_eq!(fx.type_of(v_use).as_deref(), Some("java.lang.Integer"));
}

#[test]
fn test_arity_selects_overload() {
    let (fx, (nullary, unary, x_use)) = method_body(&["java.util.function.Function"], |b| {
        let one = b.int(1);
        let no_params = b.lambda(Vec::new(), one);
        let nullary = b.call(None, "submit", vec![no_params]);
        let s1 = b.expr_stmt(nullary);

        let x = b.lambda_param("x");
        let x_use = b.name("x");
        let identity = b.lambda(vec![x], x_use);
        let unary = b.call(None, "submit", vec![identity]);
        let s2 = b.expr_stmt(unary);
        (vec![s1, s2], submit_overloads(b), (nullary, unary, x_use))
    });
    assert_eq!(fx.canonical(nullary).as_deref(), Some("Main#submit(java.lang.Runnable)"));
    assert_eq!(
        fx.canonical(unary).as_deref(),
        Some("Main#submit(java.util.function.Function)")
    );
    assert_eq!(fx.type_of(x_use).as_deref(), Some("java.lang.String"));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_no_overload_with_matching_arity() {
    let (fx, call) = method_body(&["java.util.function.Function"], |b| {
        let x = b.lambda_param("x");
        let y = b.lambda_param("y");
        let x_use = b.name("x");
        let lambda = b.lambda(vec![x, y], x_use);
        let call = b.call(None, "submit", vec![lambda]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], submit_overloads(b), call)
    });
    assert_eq!(fx.canonical(call), None);
    assert_eq!(fx.codes(), ["E0003"]);
}

#[test]
fn test_inherited_functional_method() {
    let (fx, s_use) = statements(&["java.util.function.UnaryOperator"], |b| {
        let string = b.type_ref("String");
        let ty = b.generic_type("UnaryOperator", vec![string]);
        let s = b.lambda_param("s");
        let s_use = b.name("s");
        let lambda = b.lambda(vec![s], s_use);
        let decl = b.local_var("op", ty, Some(lambda));
        (vec![decl], s_use)
    });
    assert_eq!(fx.type_of(s_use).as_deref(), Some("java.lang.String"));
}

#[test]
fn test_lambda_typed_by_return() {
    let (fx, lambda) = method_body(&["java.util.function.Supplier"], |b| {
        let a = b.string("a");
        let lambda = b.lambda(Vec::new(), a);
        let ret = b.ret(Some(lambda));
        let body = b.block(vec![ret]);
        let string = b.type_ref("String");
        let supplier = b.generic_type("Supplier", vec![string]);
        let make = b.method(
            MethodParts::new("make", supplier)
                .modifiers(Modifiers::PRIVATE)
                .body(body),
        );
        (Vec::new(), vec![make], lambda)
    });
    assert_eq!(
        fx.type_of(lambda).as_deref(),
        Some("java.util.function.Supplier<java.lang.String>")
    );
    assert_eq!(
        fx.canonical(lambda).as_deref(),
        Some("java.util.function.Supplier#get()")
    );
}
