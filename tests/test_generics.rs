//! Type arguments flowing through receivers, calls and allocations.

mod common;

use common::{statements, unit};
use jresolve::base::Modifiers;
use jresolve::syntax::{ClassParts, MethodParts, NodeId, TreeBuilder};

/// `<Raw><args...> name = null;` and a use of `name`.
fn declare(b: &mut TreeBuilder, raw: &str, args: &[&str], name: &str) -> (NodeId, NodeId) {
    let args = args.iter().map(|a| b.type_ref(a)).collect();
    let ty = b.generic_type(raw, args);
    let null = b.null();
    let decl = b.local_var(name, ty, Some(null));
    let use_site = b.name(name);
    (decl, use_site)
}

#[test]
fn test_receiver_type_arguments_substitute_results() {
    let (fx, (get, map_get, entries)) = statements(&["java.util.*"], |b| {
        let (list_decl, xs) = declare(b, "List", &["String"], "xs");
        let zero = b.int(0);
        let get = b.call(Some(xs), "get", vec![zero]);
        let s1 = b.expr_stmt(get);

        let (map_decl, m) = declare(b, "Map", &["String", "Integer"], "m");
        let key = b.string("k");
        let map_get = b.call(Some(m), "get", vec![key]);
        let s2 = b.expr_stmt(map_get);

        let m2 = b.name("m");
        let entries = b.call(Some(m2), "entrySet", Vec::new());
        let s3 = b.expr_stmt(entries);
        (vec![list_decl, s1, map_decl, s2, s3], (get, map_get, entries))
    });
    assert_eq!(fx.type_of(get).as_deref(), Some("java.lang.String"));
    assert_eq!(fx.type_of(map_get).as_deref(), Some("java.lang.Integer"));
    assert_eq!(
        fx.type_of(entries).as_deref(),
        Some("java.util.Set<java.util.Map.Entry<java.lang.String, java.lang.Integer>>")
    );
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_method_type_argument_inferred_from_varargs() {
    let (fx, call) = statements(&["java.util.Arrays"], |b| {
        let arrays = b.name("Arrays");
        let a = b.string("a");
        let c = b.string("b");
        let call = b.call(Some(arrays), "asList", vec![a, c]);
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.type_of(call).as_deref(), Some("java.util.List<java.lang.String>"));
}

#[test]
fn test_method_type_argument_boxes_primitives() {
    let (fx, get) = statements(&["java.util.Optional"], |b| {
        let optional = b.name("Optional");
        let five = b.int(5);
        let of = b.call(Some(optional), "of", vec![five]);
        let get = b.call(Some(of), "get", Vec::new());
        let stmt = b.expr_stmt(get);
        (vec![stmt], get)
    });
    assert_eq!(fx.type_of(get).as_deref(), Some("java.lang.Integer"));
}

#[test]
fn test_explicit_method_type_argument() {
    let (fx, call) = statements(&["java.util.Collections"], |b| {
        let collections = b.name("Collections");
        let string = b.type_ref("String");
        let call = b.generic_call(Some(collections), "emptyList", vec![string], Vec::new());
        let stmt = b.expr_stmt(call);
        (vec![stmt], call)
    });
    assert_eq!(fx.type_of(call).as_deref(), Some("java.util.List<java.lang.String>"));
}

#[test]
fn test_diamond_takes_declared_type_arguments() {
    let (fx, new) = statements(&["java.util.List", "java.util.ArrayList"], |b| {
        let string = b.type_ref("String");
        let list = b.generic_type("List", vec![string]);
        let diamond = b.diamond_type("ArrayList");
        let new = b.new_object(diamond, Vec::new());
        let decl = b.local_var("xs", list, Some(new));
        (vec![decl], new)
    });
    assert_eq!(fx.type_of(new).as_deref(), Some("java.util.ArrayList<java.lang.String>"));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_type_arguments_bound_in_supertype() {
    let (fx, get) = unit(&["java.util.ArrayList"], |b| {
        let string = b.type_ref("String");
        let sup = b.generic_type("ArrayList", vec![string]);
        let names = b.class(ClassParts::class("Names").extends(sup));

        let ty = b.type_ref("Names");
        let null = b.null();
        let decl = b.local_var("n", ty, Some(null));
        let n = b.name("n");
        let zero = b.int(0);
        let get = b.call(Some(n), "get", vec![zero]);
        let stmt = b.expr_stmt(get);
        let body = b.block(vec![decl, stmt]);
        let void = b.type_ref("void");
        let m = b.method(MethodParts::new("m", void).body(body));
        let main = b.class(ClassParts::class("Main").members(vec![m]));
        (vec![names, main], get)
    });
    assert_eq!(fx.type_of(get).as_deref(), Some("java.lang.String"));
    assert_eq!(fx.canonical(get).as_deref(), Some("java.util.ArrayList#get(int)"));
}

#[test]
fn test_members_of_bounded_type_variable() {
    let (fx, (value, call)) = unit(&[], |b| {
        let number = b.type_ref("Number");
        let t = b.type_param("T", Some(number));
        let t_ty = b.type_ref("T");
        let field = b.field(Modifiers::PRIVATE, "value", t_ty, None);

        let value = b.name("value");
        let call = b.call(Some(value), "intValue", Vec::new());
        let ret = b.ret(Some(call));
        let body = b.block(vec![ret]);
        let int = b.type_ref("int");
        let read = b.method(MethodParts::new("read", int).body(body));
        let holder = b.class(
            ClassParts::class("Holder")
                .type_params(vec![t])
                .members(vec![field, read]),
        );
        (vec![holder], (value, call))
    });
    assert_eq!(fx.type_of(value).as_deref(), Some("T"));
    assert_eq!(fx.canonical(call).as_deref(), Some("java.lang.Number#intValue()"));
    assert_eq!(fx.type_of(call).as_deref(), Some("int"));
    assert!(fx.diagnostics().is_empty());
}

#[test]
fn test_generic_method_declared_in_source() {
    let (fx, call) = common::method_body(&[], |b| {
        let hello = b.string("hello");
        let call = b.call(None, "identity", vec![hello]);
        let stmt = b.expr_stmt(call);

        let t = b.type_param("T", None);
        let t_param = b.type_ref("T");
        let x = b.param("x", t_param);
        let x_use = b.name("x");
        let ret = b.ret(Some(x_use));
        let body = b.block(vec![ret]);
        let t_ret = b.type_ref("T");
        let identity = b.method(
            MethodParts::new("identity", t_ret)
                .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
                .type_params(vec![t])
                .params(vec![x])
                .body(body),
        );
        (vec![stmt], vec![identity], call)
    });
    assert_eq!(fx.canonical(call).as_deref(), Some("Main#identity(java.lang.Object)"));
    assert_eq!(fx.type_of(call).as_deref(), Some("java.lang.String"));
}
