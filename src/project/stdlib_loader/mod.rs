//! The built-in core library and loaders for external symbol tables.
//!
//! [`core_library`] models the slice of the platform library that ordinary
//! code leans on: the root type, strings and boxes, the collection
//! interfaces and the functional interfaces used as lambda targets.

#[cfg(feature = "interchange")]
mod loader;

#[cfg(feature = "interchange")]
pub use loader::load_dir;

use crate::base::Modifiers;
use crate::hir::{ClassMeta, ConstructorMeta, MemoryTypeSource, MethodMeta};

fn method(name: &str, ret: &str) -> MethodMeta {
    MethodMeta::new(name, ret)
}

fn static_method(name: &str, ret: &str) -> MethodMeta {
    MethodMeta::new(name, ret).with_static()
}

/// A box class with its `valueOf` factory and `xxxValue` accessor.
fn boxed(canonical: &str, primitive: &str, numeric: bool) -> ClassMeta {
    let meta = ClassMeta::class(canonical)
        .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
        .implements(format!("java.lang.Comparable<{canonical}>").as_str())
        .method(static_method("valueOf", canonical).param(primitive))
        .method(method(&format!("{primitive}Value"), primitive))
        .method(method("compareTo", "int").param(canonical))
        .constructor(ConstructorMeta::new().param(primitive));
    if numeric {
        meta.extends("java.lang.Number")
            .static_field("MAX_VALUE", primitive)
            .static_field("MIN_VALUE", primitive)
    } else {
        meta
    }
}

fn java_lang() -> Vec<ClassMeta> {
    vec![
        ClassMeta::class("java.lang.Object")
            .method(method("toString", "java.lang.String"))
            .method(method("equals", "boolean").param("java.lang.Object"))
            .method(method("hashCode", "int"))
            .method(method("getClass", "java.lang.Class<java.lang.Object>"))
            .constructor(ConstructorMeta::new()),
        ClassMeta::interface("java.lang.CharSequence")
            .method(method("length", "int"))
            .method(method("charAt", "char").param("int")),
        ClassMeta::class("java.lang.String")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .implements("java.lang.CharSequence")
            .implements("java.lang.Comparable<java.lang.String>")
            .method(method("length", "int"))
            .method(method("charAt", "char").param("int"))
            .method(method("isEmpty", "boolean"))
            .method(method("substring", "java.lang.String").param("int"))
            .method(method("substring", "java.lang.String").param("int").param("int"))
            .method(method("indexOf", "int").param("java.lang.String"))
            .method(method("indexOf", "int").param("int"))
            .method(method("concat", "java.lang.String").param("java.lang.String"))
            .method(method("compareTo", "int").param("java.lang.String"))
            .method(method("split", "java.lang.String[]").param("java.lang.String"))
            .method(method("toCharArray", "char[]"))
            .method(static_method("valueOf", "java.lang.String").param("int"))
            .method(static_method("valueOf", "java.lang.String").param("char"))
            .method(static_method("valueOf", "java.lang.String").param("java.lang.Object"))
            .method(
                static_method("format", "java.lang.String")
                    .param("java.lang.String")
                    .varargs("java.lang.Object"),
            )
            .method(
                static_method("join", "java.lang.String")
                    .param("java.lang.CharSequence")
                    .varargs("java.lang.CharSequence"),
            )
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("char[]")),
        ClassMeta::class("java.lang.StringBuilder")
            .implements("java.lang.CharSequence")
            .method(method("append", "java.lang.StringBuilder").param("java.lang.String"))
            .method(method("append", "java.lang.StringBuilder").param("char"))
            .method(method("append", "java.lang.StringBuilder").param("int"))
            .method(method("append", "java.lang.StringBuilder").param("java.lang.Object"))
            .method(method("length", "int"))
            .method(method("charAt", "char").param("int"))
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.lang.String")),
        ClassMeta::interface("java.lang.Comparable")
            .type_param("T", None)
            .method(method("compareTo", "int").param("T")),
        ClassMeta::class("java.lang.Number")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .method(method("intValue", "int").with_abstract())
            .method(method("longValue", "long").with_abstract())
            .method(method("doubleValue", "double").with_abstract()),
        boxed("java.lang.Integer", "int", true)
            .method(static_method("parseInt", "int").param("java.lang.String")),
        boxed("java.lang.Long", "long", true)
            .method(static_method("parseLong", "long").param("java.lang.String")),
        boxed("java.lang.Double", "double", true)
            .method(static_method("parseDouble", "double").param("java.lang.String")),
        boxed("java.lang.Float", "float", true),
        boxed("java.lang.Short", "short", true),
        boxed("java.lang.Byte", "byte", true),
        boxed("java.lang.Character", "char", false)
            .method(static_method("isDigit", "boolean").param("char")),
        boxed("java.lang.Boolean", "boolean", false)
            .method(static_method("parseBoolean", "boolean").param("java.lang.String")),
        ClassMeta::interface("java.lang.Iterable")
            .type_param("T", None)
            .method(method("iterator", "java.util.Iterator<T>"))
            .method(
                method("forEach", "void")
                    .param("java.util.function.Consumer<T>")
                    .with_default(),
            ),
        ClassMeta::class("java.lang.Enum")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .type_param("E", Some("java.lang.Enum<E>"))
            .implements("java.lang.Comparable<E>")
            .method(method("name", "java.lang.String"))
            .method(method("ordinal", "int"))
            .method(method("compareTo", "int").param("E"))
            .constructor(
                ConstructorMeta::new()
                    .param("java.lang.String")
                    .param("int")
                    .modifiers(Modifiers::PROTECTED),
            ),
        ClassMeta::class("java.lang.Class")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .type_param("T", None)
            .method(method("getName", "java.lang.String"))
            .method(method("isInstance", "boolean").param("java.lang.Object")),
        ClassMeta::class("java.lang.Math")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .static_field("PI", "double")
            .method(static_method("abs", "int").param("int"))
            .method(static_method("abs", "long").param("long"))
            .method(static_method("abs", "double").param("double"))
            .method(static_method("max", "int").param("int").param("int"))
            .method(static_method("max", "long").param("long").param("long"))
            .method(static_method("max", "double").param("double").param("double"))
            .method(static_method("min", "int").param("int").param("int"))
            .method(static_method("min", "double").param("double").param("double"))
            .method(static_method("sqrt", "double").param("double"))
            .method(static_method("pow", "double").param("double").param("double")),
        ClassMeta::class("java.lang.System")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .static_field("out", "java.io.PrintStream")
            .static_field("err", "java.io.PrintStream")
            .method(static_method("currentTimeMillis", "long")),
        ClassMeta::interface("java.lang.Runnable").method(method("run", "void")),
        ClassMeta::interface("java.lang.Cloneable"),
        ClassMeta::class("java.lang.Throwable")
            .method(method("getMessage", "java.lang.String"))
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.lang.String")),
        ClassMeta::class("java.lang.Exception")
            .extends("java.lang.Throwable")
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.lang.String")),
        ClassMeta::class("java.lang.RuntimeException")
            .extends("java.lang.Exception")
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.lang.String")),
        ClassMeta::class("java.lang.IllegalArgumentException")
            .extends("java.lang.RuntimeException")
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.lang.String")),
    ]
}

fn java_io() -> Vec<ClassMeta> {
    let mut print_stream = ClassMeta::class("java.io.PrintStream").method(method("println", "void"));
    for ty in [
        "java.lang.String",
        "java.lang.Object",
        "int",
        "long",
        "double",
        "char",
        "boolean",
    ] {
        print_stream = print_stream
            .method(method("println", "void").param(ty))
            .method(method("print", "void").param(ty));
    }
    vec![
        ClassMeta::interface("java.io.Serializable"),
        print_stream.method(
            method("printf", "java.io.PrintStream")
                .param("java.lang.String")
                .varargs("java.lang.Object"),
        ),
    ]
}

fn java_util() -> Vec<ClassMeta> {
    vec![
        ClassMeta::interface("java.util.Iterator")
            .type_param("E", None)
            .method(method("hasNext", "boolean"))
            .method(method("next", "E")),
        ClassMeta::interface("java.util.Collection")
            .type_param("E", None)
            .implements("java.lang.Iterable<E>")
            .method(method("size", "int"))
            .method(method("isEmpty", "boolean"))
            .method(method("contains", "boolean").param("java.lang.Object"))
            .method(method("add", "boolean").param("E"))
            .method(method("remove", "boolean").param("java.lang.Object"))
            .method(method("addAll", "boolean").param("java.util.Collection<E>"))
            .method(
                method("removeIf", "boolean")
                    .param("java.util.function.Predicate<E>")
                    .with_default(),
            ),
        ClassMeta::interface("java.util.List")
            .type_param("E", None)
            .implements("java.util.Collection<E>")
            .method(method("get", "E").param("int"))
            .method(method("set", "E").param("int").param("E"))
            .method(method("add", "void").param("int").param("E"))
            .method(method("remove", "E").param("int"))
            .method(method("indexOf", "int").param("java.lang.Object"))
            .method(
                method("sort", "void")
                    .param("java.util.Comparator<E>")
                    .with_default(),
            )
            .method(
                static_method("of", "java.util.List<E>")
                    .type_param("E", None)
                    .varargs("E"),
            ),
        ClassMeta::class("java.util.ArrayList")
            .type_param("E", None)
            .implements("java.util.List<E>")
            .method(method("size", "int"))
            .method(method("get", "E").param("int"))
            .method(method("add", "boolean").param("E"))
            .method(method("trimToSize", "void"))
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("int"))
            .constructor(ConstructorMeta::new().param("java.util.Collection<E>")),
        ClassMeta::interface("java.util.Set")
            .type_param("E", None)
            .implements("java.util.Collection<E>")
            .method(
                static_method("of", "java.util.Set<E>")
                    .type_param("E", None)
                    .varargs("E"),
            ),
        ClassMeta::class("java.util.HashSet")
            .type_param("E", None)
            .implements("java.util.Set<E>")
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("java.util.Collection<E>")),
        ClassMeta::interface("java.util.Map")
            .type_param("K", None)
            .type_param("V", None)
            .inner("java.util.Map.Entry")
            .method(method("get", "V").param("java.lang.Object"))
            .method(method("put", "V").param("K").param("V"))
            .method(method("containsKey", "boolean").param("java.lang.Object"))
            .method(method("size", "int"))
            .method(method("keySet", "java.util.Set<K>"))
            .method(method("values", "java.util.Collection<V>"))
            .method(method("entrySet", "java.util.Set<java.util.Map.Entry<K,V>>"))
            .method(
                method("getOrDefault", "V")
                    .param("java.lang.Object")
                    .param("V")
                    .with_default(),
            )
            .method(
                method("computeIfAbsent", "V")
                    .param("K")
                    .param("java.util.function.Function<K,V>")
                    .with_default(),
            )
            .method(
                method("forEach", "void")
                    .param("java.util.function.BiConsumer<K,V>")
                    .with_default(),
            ),
        ClassMeta::interface("java.util.Map.Entry")
            .nested_in("java.util.Map")
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::ABSTRACT)
            .type_param("K", None)
            .type_param("V", None)
            .method(method("getKey", "K"))
            .method(method("getValue", "V")),
        ClassMeta::class("java.util.HashMap")
            .type_param("K", None)
            .type_param("V", None)
            .implements("java.util.Map<K,V>")
            .constructor(ConstructorMeta::new())
            .constructor(ConstructorMeta::new().param("int")),
        ClassMeta::interface("java.util.Comparator")
            .type_param("T", None)
            .method(method("compare", "int").param("T").param("T"))
            .method(method("equals", "boolean").param("java.lang.Object"))
            .method(method("reversed", "java.util.Comparator<T>").with_default()),
        ClassMeta::class("java.util.Optional")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .type_param("T", None)
            .method(
                static_method("of", "java.util.Optional<T>")
                    .type_param("T", None)
                    .param("T"),
            )
            .method(
                static_method("empty", "java.util.Optional<T>").type_param("T", None),
            )
            .method(method("isPresent", "boolean"))
            .method(method("get", "T"))
            .method(method("orElse", "T").param("T"))
            .method(
                method("map", "java.util.Optional<U>")
                    .type_param("U", None)
                    .param("java.util.function.Function<T,U>"),
            ),
        ClassMeta::class("java.util.Arrays")
            .method(
                static_method("asList", "java.util.List<T>")
                    .type_param("T", None)
                    .varargs("T"),
            )
            .method(static_method("sort", "void").param("int[]"))
            .method(static_method("toString", "java.lang.String").param("int[]")),
        ClassMeta::class("java.util.Collections")
            .method(
                static_method("emptyList", "java.util.List<T>").type_param("T", None),
            )
            .method(
                static_method("sort", "void")
                    .type_param("T", Some("java.lang.Comparable<T>"))
                    .param("java.util.List<T>"),
            ),
    ]
}

fn java_util_function() -> Vec<ClassMeta> {
    vec![
        ClassMeta::interface("java.util.function.Function")
            .type_param("T", None)
            .type_param("R", None)
            .method(method("apply", "R").param("T")),
        ClassMeta::interface("java.util.function.BiFunction")
            .type_param("T", None)
            .type_param("U", None)
            .type_param("R", None)
            .method(method("apply", "R").param("T").param("U")),
        ClassMeta::interface("java.util.function.UnaryOperator")
            .type_param("T", None)
            .implements("java.util.function.Function<T,T>"),
        ClassMeta::interface("java.util.function.Consumer")
            .type_param("T", None)
            .method(method("accept", "void").param("T")),
        ClassMeta::interface("java.util.function.BiConsumer")
            .type_param("T", None)
            .type_param("U", None)
            .method(method("accept", "void").param("T").param("U")),
        ClassMeta::interface("java.util.function.Supplier")
            .type_param("T", None)
            .method(method("get", "T")),
        ClassMeta::interface("java.util.function.Predicate")
            .type_param("T", None)
            .method(method("test", "boolean").param("T"))
            .method(
                method("negate", "java.util.function.Predicate<T>").with_default(),
            ),
    ]
}

/// Symbol table of the built-in core library.
pub fn core_library() -> MemoryTypeSource {
    let mut source = MemoryTypeSource::new();
    for meta in java_lang()
        .into_iter()
        .chain(java_io())
        .chain(java_util())
        .chain(java_util_function())
    {
        source.insert(meta);
    }
    source
}
