//! Overload selection for methods, constructors and enum constants.

mod common;

use common::{method_body, static_method, statements, unit};
use jresolve::base::Modifiers;
use jresolve::syntax::{ClassParts, Literal, MethodParts};
use rstest::rstest;

#[rstest]
#[case(Literal::Int(-5), "java.lang.Math#abs(int)", "int")]
#[case(Literal::Long(-5), "java.lang.Math#abs(long)", "long")]
#[case(Literal::Double(-1.5), "java.lang.Math#abs(double)", "double")]
fn test_math_abs_picks_exact_overload(
    #[case] arg: Literal,
    #[case] canonical: &str,
    #[case] ty: &str,
) {
    let (fx, call) = statements(&[], |b| {
        let math = b.name("Math");
        let arg = b.literal(arg);
        let call = b.call(Some(math), "abs", vec![arg]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some(canonical));
    assert_eq!(fx.type_of(call).as_deref(), Some(ty));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_tied_overloads_pick_first_and_warn() {
    let (fx, call) = statements(&[], |b| {
        let math = b.name("Math");
        let c = b.literal(Literal::Char('c'));
        let call = b.call(Some(math), "abs", vec![c]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some("java.lang.Math#abs(int)"));
    assert_eq!(fx.codes(), ["W0002"]);
}

#[rstest]
#[case(Literal::Int(5), "java.lang.String#valueOf(int)")]
#[case(Literal::Char('x'), "java.lang.String#valueOf(char)")]
#[case(Literal::Bool(true), "java.lang.String#valueOf(java.lang.Object)")]
#[case(Literal::Null, "java.lang.String#valueOf(java.lang.Object)")]
fn test_string_value_of(#[case] arg: Literal, #[case] canonical: &str) {
    let (fx, call) = statements(&[], |b| {
        let string = b.name("String");
        let arg = b.literal(arg);
        let call = b.call(Some(string), "valueOf", vec![arg]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some(canonical));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
fn test_varargs_accepts_any_trailing_count(#[case] trailing: usize) {
    let (fx, call) = statements(&[], |b| {
        let string = b.name("String");
        let mut args = vec![b.string("%s")];
        for i in 0..trailing {
            args.push(b.int(i as i64));
        }
        let call = b.call(Some(string), "format", args);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(
        fx.canonical(call).as_deref(),
        Some("java.lang.String#format(java.lang.String,java.lang.Object[])")
    );
    assert_eq!(fx.type_of(call).as_deref(), Some("java.lang.String"));
}

#[test]
fn test_varargs_rejects_wrong_element_type() {
    let (fx, call) = statements(&[], |b| {
        let string = b.name("String");
        let first = b.string(",");
        let bad = b.int(1);
        let call = b.call(Some(string), "join", vec![first, bad]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.canonical(call), None);
    assert_eq!(fx.codes(), ["E0003"]);
}

#[rstest]
#[case(Literal::Str("a".into()), "Main#f(java.lang.String)")]
#[case(Literal::Int(1), "Main#f(java.lang.Object)")]
fn test_source_overloads(#[case] arg: Literal, #[case] canonical: &str) {
    let (fx, call) = method_body(&[], |b| {
        let arg = b.literal(arg);
        let call = b.call(None, "f", vec![arg]);
        let stmt = b.expr_stmt(call);

        let object = b.type_ref("Object");
        let o = b.param("o", object);
        let by_object = static_method(b, "f", "void", vec![o]);
        let string = b.type_ref("String");
        let s = b.param("s", string);
        let by_string = static_method(b, "f", "void", vec![s]);
        (vec![stmt], vec![by_object, by_string], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some(canonical));
}

#[rstest]
#[case("ArrayList", Some(Literal::Int(10)), "java.util.ArrayList#<init>(int)")]
#[case("ArrayList", None, "java.util.ArrayList#<init>()")]
#[case("StringBuilder", Some(Literal::Str("a".into())), "java.lang.StringBuilder#<init>(java.lang.String)")]
fn test_constructor_overloads(
    #[case] class: &str,
    #[case] arg: Option<Literal>,
    #[case] canonical: &str,
) {
    let (fx, new) = statements(&["java.util.ArrayList"], |b| {
        let ty = b.type_ref(class);
        let args = arg.into_iter().map(|lit| b.literal(lit)).collect();
        let new = b.new_object(ty, args);
        let stmt = b.expr_stmt(new);
        (vec![stmt], new)
    });
    assert_eq!(fx.canonical(new).as_deref(), Some(canonical));
}

#[test]
fn test_no_applicable_constructor() {
    let (fx, _) = statements(&[], |b| {
        let ty = b.type_ref("StringBuilder");
        let a = b.int(1);
        let c = b.int(2);
        let new = b.new_object(ty, vec![a, c]);
        let stmt = b.expr_stmt(new);
        (vec![stmt], ())
    });
    assert_eq!(fx.codes(), ["E0004"]);
}

#[test]
fn test_inner_class_constructor_takes_outer_instance() {
    let (fx, new) = unit(&[], |b| {
        let int = b.type_ref("int");
        let x = b.param("x", int);
        let ctor_body = b.block(Vec::new());
        let ctor = b.constructor(Modifiers::PUBLIC, vec![x], Some(ctor_body));
        let inner = b.class(ClassParts::class("Inner").members(vec![ctor]));

        let ty = b.type_ref("Inner");
        let one = b.int(1);
        let new = b.new_object(ty, vec![one]);
        let stmt = b.expr_stmt(new);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let make = b.method(MethodParts::new("make", void).body(body));
        let outer = b.class(ClassParts::class("Outer").members(vec![inner, make]));
        (vec![outer], new)
    });
    assert_eq!(fx.canonical(new).as_deref(), Some("Outer.Inner#<init>(Outer,int)"));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_enum_constant_constructor() {
    let (fx, (red, green)) = unit(&[], |b| {
        let one = b.int(1);
        let red = b.enum_constant("RED", vec![one]);
        let green = b.enum_constant("GREEN", Vec::new());
        let int = b.type_ref("int");
        let v = b.param("v", int);
        let with_value = b.constructor(Modifiers::PRIVATE, vec![v], None);
        let plain = b.constructor(Modifiers::PRIVATE, Vec::new(), None);
        let color = b.class(
            ClassParts::enumeration("Color").members(vec![red, green, with_value, plain]),
        );
        (vec![color], (red, green))
    });
    let sema = fx.sema();
    let r = fx.project.resolver();
    let canonical = |node| {
        sema.enum_constant_constructor(node)
            .map(|c| r.decl(c).canonical.to_string())
    };
    assert_eq!(
        canonical(red).as_deref(),
        Some("Color#<init>(java.lang.String,int,int)")
    );
    assert_eq!(
        canonical(green).as_deref(),
        Some("Color#<init>(java.lang.String,int)")
    );
    assert_eq!(fx.canonical(red).as_deref(), Some("Color#RED"));
}

#[test]
fn test_inner_class_calls_outer_method() {
    let (fx, call) = unit(&[], |b| {
        let void = b.type_ref("void");
        let helper_body = b.block(Vec::new());
        let helper = b.method(MethodParts::new("helper", void).body(helper_body));

        let call = b.call(None, "helper", Vec::new());
        let stmt = b.expr_stmt(call);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let m = b.method(MethodParts::new("m", void).body(body));
        let inner = b.class(ClassParts::class("Inner").members(vec![m]));
        let outer = b.class(ClassParts::class("Outer").members(vec![helper, inner]));
        (vec![outer], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some("Outer#helper()"));
}

#[test]
fn test_rating_orders_candidates() {
    let (fx, call) = statements(&[], |b| {
        let math = b.name("Math");
        let one = b.int(1);
        let call = b.call(Some(math), "abs", vec![one]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    let ratings: Vec<u32> = fx.sema().rate_call(call).iter().map(|r| r.rating).collect();
    assert_eq!(ratings, [1000, 100, 100]);
}
