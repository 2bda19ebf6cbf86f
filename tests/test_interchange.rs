//! Symbol tables exported to JSON and loaded back from disk.
#![cfg(feature = "interchange")]

use std::sync::Arc;

use jresolve::hir::{ClassMeta, MemoryTypeSource, MethodMeta, TypeSource};
use jresolve::project::stdlib_loader::{core_library, load_dir};
use jresolve::syntax::{ClassParts, MethodParts, TreeBuilder};
use jresolve::Project;

#[test]
fn test_core_library_survives_json() {
    let core = core_library();
    let json = core.to_json().unwrap();
    let back = MemoryTypeSource::from_json(&json).unwrap();

    assert_eq!(back.len(), core.len());
    for meta in core.iter() {
        assert_eq!(back.get(meta.canonical()), Some(meta));
    }
    assert!(back.has_package("java.util.function"));
}

#[test]
fn test_project_over_loaded_tables() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("core.json"), core_library().to_json().unwrap()).unwrap();
    let extra = MemoryTypeSource::new().with(
        ClassMeta::class("org.acme.Clock")
            .method(MethodMeta::new("now", "long").with_static()),
    );
    std::fs::write(dir.path().join("extra.json"), extra.to_json().unwrap()).unwrap();

    let source = load_dir(dir.path()).unwrap();
    let mut project = Project::new(Arc::new(source));
    let file = project.file_id("Main.java");
    let mut b = TreeBuilder::new(file);
    let import = b.import("org.acme.Clock");
    let clock = b.name("Clock");
    let call = b.call(Some(clock), "now", Vec::new());
    let ret = b.ret(Some(call));
    let body = b.block(vec![ret]);
    let long = b.type_ref("long");
    let m = b.method(MethodParts::new("m", long).body(body));
    let class = b.class(ClassParts::class("Main").members(vec![m]));
    project.set_file(b.finish(vec![import, class]));

    let sema = project.semantics(file).unwrap();
    let method = sema.resolve_decl(call).unwrap();
    assert_eq!(project.resolver().decl(method).canonical, "org.acme.Clock#now()");
    assert!(project.diagnostics(file).is_empty());
}
