//! Diagnostics: resolution failures reported against the syntax tree.
//!
//! The checker walks every node of a tree, asks [`Semantics`] for its
//! declaration and reports the nodes that should resolve but do not. A
//! failure is only reported where it originates: a member access on an
//! unresolved target is not reported again.

use std::sync::Arc;

use text_size::TextRange;

use super::overload::tied_count;
use super::semantics::Semantics;
use crate::base::FileId;
use crate::syntax::{NodeId, NodeKind};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: FileId,
    pub range: TextRange,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    pub fn warning(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, range, message)
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

pub mod codes {
    /// Name or member access that resolves to nothing.
    pub const UNRESOLVED_NAME: &str = "E0001";
    /// Type reference naming no known type.
    pub const UNRESOLVED_TYPE: &str = "E0002";
    /// Call with no applicable method.
    pub const NO_APPLICABLE_METHOD: &str = "E0003";
    /// Instance creation or enum constant with no applicable constructor.
    pub const NO_APPLICABLE_CONSTRUCTOR: &str = "E0004";

    pub const UNUSED_IMPORT: &str = "W0001";
    /// Several candidates share the best rating.
    pub const AMBIGUOUS_CALL: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// SEMANTIC CHECKER
// ============================================================================

/// Reports unresolved references and ambiguous calls in one tree.
pub struct SemanticChecker<'a> {
    sema: Semantics<'a>,
    collector: DiagnosticCollector,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(sema: Semantics<'a>) -> Self {
        Self {
            sema,
            collector: DiagnosticCollector::new(),
        }
    }

    pub fn check_file(&mut self) {
        for node in self.sema.tree().nodes() {
            self.check_node(node);
        }
        for import in self.sema.unused_imports() {
            let path = self.sema.tree().name(import).cloned().unwrap_or_default();
            self.warn(import, codes::UNUSED_IMPORT, format!("unused import: '{path}'"));
        }
    }

    fn check_node(&mut self, node: NodeId) {
        let sema = self.sema;
        match sema.kind(node) {
            NodeKind::Name { name } => {
                if sema.resolve_decl(node).is_none() {
                    self.error(node, codes::UNRESOLVED_NAME, format!("cannot resolve '{name}'"));
                }
            }
            NodeKind::FieldAccess { target, name } => {
                if sema.resolve_decl(node).is_none() && self.is_resolved(*target) {
                    self.error(node, codes::UNRESOLVED_NAME, format!("cannot resolve member '{name}'"));
                }
            }
            NodeKind::TypeRef { name, .. } => {
                if name != "?"
                    && !sema.is_inferred_type(node)
                    && sema.resolve_decl(node).is_none()
                {
                    self.error(node, codes::UNRESOLVED_TYPE, format!("cannot resolve type '{name}'"));
                }
            }
            NodeKind::MethodCall { target, name, .. } => {
                if target.is_some_and(|t| !self.is_resolved(t)) {
                    return;
                }
                let rated = sema.rate_call(node);
                if sema.resolve_decl(node).is_none() {
                    self.error(
                        node,
                        codes::NO_APPLICABLE_METHOD,
                        format!("no applicable method '{name}' among {} candidates", rated.len()),
                    );
                } else if tied_count(&rated) > 1 {
                    self.warn(node, codes::AMBIGUOUS_CALL, format!("ambiguous call to '{name}'"));
                }
            }
            NodeKind::New { ty, .. } => {
                if sema.resolve_decl(*ty).is_none() {
                    return;
                }
                let rated = sema.rate_new(node);
                if sema.resolve_decl(node).is_none() {
                    self.error(
                        node,
                        codes::NO_APPLICABLE_CONSTRUCTOR,
                        format!("no applicable constructor among {} candidates", rated.len()),
                    );
                } else if tied_count(&rated) > 1 {
                    self.warn(node, codes::AMBIGUOUS_CALL, "ambiguous constructor call");
                }
            }
            NodeKind::EnumConstant { name, .. } => {
                if sema.enum_constant_constructor(node).is_none() {
                    self.error(
                        node,
                        codes::NO_APPLICABLE_CONSTRUCTOR,
                        format!("no applicable constructor for constant '{name}'"),
                    );
                }
            }
            _ => {}
        }
    }

    fn is_resolved(&self, node: NodeId) -> bool {
        self.sema.resolve_decl(node).is_some() || self.sema.resolve_eval_type(node).is_some()
    }

    fn error(&mut self, node: NodeId, code: &str, message: impl Into<Arc<str>>) {
        let tree = self.sema.tree();
        self.collector
            .add(Diagnostic::error(tree.file(), tree.span(node), message).with_code(code));
    }

    fn warn(&mut self, node: NodeId, code: &str, message: impl Into<Arc<str>>) {
        let tree = self.sema.tree();
        self.collector
            .add(Diagnostic::warning(tree.file(), tree.span(node), message).with_code(code));
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.diagnostics
    }
}

/// Check one tree and return its diagnostics.
pub fn check_file(sema: Semantics<'_>) -> Vec<Diagnostic> {
    let mut checker = SemanticChecker::new(sema);
    checker.check_file();
    checker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{Resolver, lower_tree};
    use crate::hir::type_source::{ClassMeta, MemoryTypeSource, MethodMeta};
    use crate::syntax::{ClassParts, MethodParts, TreeBuilder};
    use text_size::TextSize;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            MemoryTypeSource::new()
                .with(ClassMeta::class("java.lang.Object"))
                .with(ClassMeta::class("java.lang.String"))
                .with(ClassMeta::class("java.util.Date"))
                .with(
                    ClassMeta::class("java.lang.Math")
                        .method(MethodMeta::new("abs", "int").param("int").with_static()),
                ),
        ))
    }

    fn at(offset: u32) -> TextRange {
        TextRange::empty(TextSize::new(offset))
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::error(FileId::new(0), at(0), "error 1"));
        collector.add(Diagnostic::error(FileId::new(1), at(0), "error 2"));
        collector.add(Diagnostic::warning(FileId::new(0), at(0), "warning 1"));

        assert_eq!(collector.error_count(), 2);
        assert_eq!(collector.warning_count(), 1);
        assert!(collector.has_errors());
        assert_eq!(collector.diagnostics_for_file(FileId::new(0)).len(), 2);
        assert_eq!(collector.take().len(), 3);
        assert!(collector.diagnostics().is_empty());
    }

    #[test]
    fn test_reports_origin_only() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let missing = b.name("missing");
        let access = b.field_access(missing, "field");
        let stmt = b.expr_stmt(access);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let m = b.method(MethodParts::new("m", void).body(body));
        let class = b.class(ClassParts::class("C").members(vec![m]));
        let tree = b.finish(vec![class]);

        let r = resolver();
        lower_tree(&tree, &r);
        let diagnostics = check_file(Semantics::new(&tree, &r));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNRESOLVED_NAME));
        assert_eq!(diagnostics[0].range, tree.span(missing));
    }

    #[test]
    fn test_unresolved_type_and_unused_import() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let import = b.import("java.util.Date");
        let ty = b.type_ref("Nope");
        let field = b.field(crate::base::Modifiers::PRIVATE, "f", ty, None);
        let class = b.class(ClassParts::class("C").members(vec![field]));
        let tree = b.finish(vec![import, class]);

        let r = resolver();
        lower_tree(&tree, &r);
        let diagnostics = check_file(Semantics::new(&tree, &r));
        let found: Vec<_> = diagnostics.iter().filter_map(|d| d.code.as_deref()).collect();
        assert_eq!(found, [codes::UNRESOLVED_TYPE, codes::UNUSED_IMPORT]);
    }

    #[test]
    fn test_inapplicable_call() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let math = b.name("Math");
        let s = b.string("x");
        let call = b.call(Some(math), "abs", vec![s]);
        let stmt = b.expr_stmt(call);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let m = b.method(MethodParts::new("m", void).body(body));
        let class = b.class(ClassParts::class("C").members(vec![m]));
        let tree = b.finish(vec![class]);

        let r = resolver();
        lower_tree(&tree, &r);
        let diagnostics = check_file(Semantics::new(&tree, &r));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some(codes::NO_APPLICABLE_METHOD));
    }
}
