//! Shared fixtures: a project over the core library with one source file.

#![allow(dead_code)]

use jresolve::base::{FileId, Modifiers};
use jresolve::hir::{Diagnostic, Semantics};
use jresolve::syntax::{ClassParts, MethodParts, NodeId, TreeBuilder};
use jresolve::Project;
use tracing_subscriber::EnvFilter;

/// Route resolver logs to the test output; filter with `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Fixture {
    pub project: Project,
    pub file: FileId,
}

impl Fixture {
    pub fn sema(&self) -> Semantics<'_> {
        self.project
            .semantics(self.file)
            .expect("fixture file is registered")
    }

    /// Canonical id of the declaration `node` resolves to.
    pub fn canonical(&self, node: NodeId) -> Option<String> {
        let decl = self.sema().resolve_decl(node)?;
        Some(self.project.resolver().decl(decl).canonical.to_string())
    }

    /// Displayed type `node` evaluates to.
    pub fn type_of(&self, node: NodeId) -> Option<String> {
        let ty = self.sema().resolve_eval_type(node)?;
        Some(self.project.resolver().display(ty))
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.project.diagnostics(self.file)
    }

    /// Codes of every diagnostic, in report order.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics()
            .iter()
            .filter_map(|d| d.code.as_deref().map(str::to_string))
            .collect()
    }
}

/// Build `Main.java` from the top-level items `build` returns, after the
/// given imports.
pub fn unit<T>(
    imports: &[&str],
    build: impl FnOnce(&mut TreeBuilder) -> (Vec<NodeId>, T),
) -> (Fixture, T) {
    init_logging();
    let mut project = Project::with_core_library();
    let file = project.file_id("Main.java");
    let mut b = TreeBuilder::new(file);
    let mut items: Vec<NodeId> = imports
        .iter()
        .map(|path| match path.strip_prefix("static ") {
            Some(path) => b.static_import(path),
            None => b.import(path),
        })
        .collect();
    let (types, out) = build(&mut b);
    items.extend(types);
    project.set_file(b.finish(items));
    (Fixture { project, file }, out)
}

/// Build `class Main { void exercise() { <stmts> } <members> }`.
pub fn method_body<T>(
    imports: &[&str],
    build: impl FnOnce(&mut TreeBuilder) -> (Vec<NodeId>, Vec<NodeId>, T),
) -> (Fixture, T) {
    unit(imports, |b| {
        let (stmts, mut members, out) = build(b);
        let body = b.block(stmts);
        let void = b.type_ref("void");
        let method = b.method(MethodParts::new("exercise", void).body(body));
        members.insert(0, method);
        let class = b.class(ClassParts::class("Main").members(members));
        (vec![class], out)
    })
}

/// Statements only, no extra members.
pub fn statements<T>(
    imports: &[&str],
    build: impl FnOnce(&mut TreeBuilder) -> (Vec<NodeId>, T),
) -> (Fixture, T) {
    method_body(imports, |b| {
        let (stmts, out) = build(b);
        (stmts, Vec::new(), out)
    })
}

/// `static <ret> name(<params>) {}` as a member of `Main`.
pub fn static_method(b: &mut TreeBuilder, name: &str, ret: &str, params: Vec<NodeId>) -> NodeId {
    let ret = b.type_ref(ret);
    let body = b.block(Vec::new());
    b.method(
        MethodParts::new(name, ret)
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
            .params(params)
            .body(body),
    )
}
