//! Name resolution.
//!
//! Names are resolved by walking from the requesting node up the parent
//! chain. Each container is asked for a declaration of the name that is
//! visible to the child the walk came from:
//!
//! - blocks offer local variables and local classes declared before the
//!   requester
//! - `for` and for-each loops offer their loop variables, lambdas and
//!   callables their parameters and type parameters
//! - class declarations offer type parameters, member classes, inherited
//!   member classes, fields and `this`/`super`
//! - the compilation unit offers its own types, then imports
//!
//! Anything not found lexically falls back to a global lookup by name.

use smol_str::SmolStr;
use tracing::trace;

use super::ids::DeclId;
use super::semantics::Semantics;
use super::symbols::{DeclKind, PrimitiveKind};
use crate::base::RangeExt;
use crate::syntax::{NodeId, NodeKind};

/// What a name may denote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Variables, parameters, fields, `this` and `super`.
    Value,
    Type,
    Package,
}

impl Semantics<'_> {
    pub(crate) fn compute_decl(&self, node: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        match self.kind(node) {
            NodeKind::PackageDecl { path } => r.package(path),
            NodeKind::Import {
                path,
                is_static,
                on_demand,
            } => self.import_target(path, *is_static, *on_demand),
            NodeKind::ClassDecl { .. } => r.class(&self.class_canonical(node)?),
            NodeKind::FieldDecl { name, .. } | NodeKind::EnumConstant { name, .. } => {
                let class = self.resolve_decl(self.enclosing_class(node)?)?;
                r.body(class)
                    .fields
                    .iter()
                    .copied()
                    .find(|&f| r.decl(f).name == *name)
            }
            NodeKind::MethodDecl { .. } => self.method_decl(node),
            NodeKind::ConstructorDecl { .. } => self.constructor_decl(node),
            NodeKind::Param { name, ty, varargs } => {
                let declared = match ty {
                    Some(ty) => self
                        .resolve_decl(*ty)
                        .map(|t| if *varargs { r.array_of(t) } else { t }),
                    None => self.lambda_param_type(node),
                };
                Some(self.local(node, name, declared))
            }
            NodeKind::LocalVarDecl { name, ty, init } => {
                let declared = if self.is_inferred_type(*ty) {
                    match init {
                        Some(init) => self.resolve_eval_type(*init),
                        None => self.for_each_element(node),
                    }
                } else {
                    self.resolve_decl(*ty)
                };
                Some(self.local(node, name, declared))
            }
            NodeKind::TypeParameter { name, .. } => self.type_parameter_decl(node, name),
            NodeKind::TypeRef { .. } => self.resolve_type_ref(node),
            NodeKind::Name { name } => self.resolve_simple_name(node, name),
            NodeKind::FieldAccess { target, name } => self.resolve_member_access(*target, name),
            NodeKind::MethodCall { .. } => self.resolve_call(node),
            NodeKind::New { .. } => self.resolve_new(node),
            NodeKind::Lambda { .. } => self.lambda_target(node).map(|(_, method)| method),
            _ => None,
        }
    }

    fn local(&self, node: NodeId, name: &str, ty: Option<DeclId>) -> DeclId {
        let tree = self.tree();
        let offset = u32::from(tree.span(node).start());
        self.resolver().local_var(tree.file(), offset, name, ty)
    }

    /// `var` in a local declaration.
    pub(crate) fn is_inferred_type(&self, ty: NodeId) -> bool {
        matches!(
            self.kind(ty),
            NodeKind::TypeRef { name, args, dims: 0, .. } if name == "var" && args.is_empty()
        )
    }

    // ========================================================================
    // SCOPE WALK
    // ========================================================================

    /// Resolve `name` as seen from `requester`.
    pub fn lookup_name(&self, requester: NodeId, name: &str, ns: Namespace) -> Option<DeclId> {
        let tree = self.tree();
        let mut child = requester;
        while let Some(container) = tree.parent(child) {
            if let Some(found) = self.decl_for_child(container, child, requester, name, ns) {
                return Some(found);
            }
            child = container;
        }
        let r = self.resolver();
        let found = match ns {
            Namespace::Type => r.class(name),
            Namespace::Package => r.package(name),
            Namespace::Value => None,
        };
        if found.is_none() {
            trace!("{} not found as {:?}", name, ns);
        }
        found
    }

    fn decl_for_child(
        &self,
        container: NodeId,
        child: NodeId,
        requester: NodeId,
        name: &str,
        ns: Namespace,
    ) -> Option<DeclId> {
        let tree = self.tree();
        let before = |decl: NodeId| tree.span(decl).precedes(tree.span(requester));
        match (self.kind(container), ns) {
            (NodeKind::Block { stmts }, Namespace::Value) => stmts
                .iter()
                .rev()
                .copied()
                .find(|&s| self.is_local_named(s, name) && before(s))
                .and_then(|s| self.resolve_decl(s)),
            (NodeKind::Block { stmts }, Namespace::Type) => stmts
                .iter()
                .rev()
                .copied()
                .find(|&s| self.is_class_named(s, name) && before(s))
                .and_then(|s| self.resolve_decl(s)),
            (NodeKind::For { init, .. }, Namespace::Value) => init
                .iter()
                .copied()
                .find(|&s| self.is_local_named(s, name) && before(s))
                .and_then(|s| self.resolve_decl(s)),
            (NodeKind::ForEach { var, iterable, .. }, Namespace::Value) => {
                if child != *iterable && self.is_local_named(*var, name) {
                    self.resolve_decl(*var)
                } else {
                    None
                }
            }
            (NodeKind::Lambda { params, .. }, Namespace::Value)
            | (NodeKind::MethodDecl { params, .. }, Namespace::Value)
            | (NodeKind::ConstructorDecl { params, .. }, Namespace::Value) => params
                .iter()
                .copied()
                .find(|&p| self.has_name(p, name))
                .and_then(|p| self.resolve_decl(p)),
            (NodeKind::MethodDecl { type_params, .. }, Namespace::Type)
            | (NodeKind::ConstructorDecl { type_params, .. }, Namespace::Type) => type_params
                .iter()
                .copied()
                .find(|&tp| self.has_name(tp, name))
                .and_then(|tp| self.resolve_decl(tp)),
            (NodeKind::ClassDecl { .. }, _) => self.class_scope_lookup(container, child, name, ns),
            (NodeKind::CompilationUnit, Namespace::Type) => {
                let own = tree
                    .children(container)
                    .iter()
                    .copied()
                    .find(|&c| self.is_class_named(c, name));
                match own {
                    Some(class) => self.resolve_decl(class),
                    None => self.lookup_imported_type(container, name),
                }
            }
            (NodeKind::CompilationUnit, Namespace::Value) => {
                self.lookup_static_import(container, name)
            }
            _ => None,
        }
    }

    fn has_name(&self, node: NodeId, name: &str) -> bool {
        self.tree().name(node).is_some_and(|n| n == name)
    }

    fn is_local_named(&self, node: NodeId, name: &str) -> bool {
        matches!(self.kind(node), NodeKind::LocalVarDecl { name: n, .. } if n == name)
    }

    fn is_class_named(&self, node: NodeId, name: &str) -> bool {
        matches!(self.kind(node), NodeKind::ClassDecl { name: n, .. } if n == name)
    }

    fn class_scope_lookup(
        &self,
        class_node: NodeId,
        child: NodeId,
        name: &str,
        ns: Namespace,
    ) -> Option<DeclId> {
        let NodeKind::ClassDecl {
            type_params,
            extends,
            implements,
            members,
            ..
        } = self.kind(class_node)
        else {
            return None;
        };
        let r = self.resolver();
        match ns {
            Namespace::Type => {
                if let Some(&tp) = type_params.iter().find(|&&tp| self.has_name(tp, name)) {
                    return self.resolve_decl(tp);
                }
                if let Some(&member) = members.iter().find(|&&m| self.is_class_named(m, name)) {
                    return self.resolve_decl(member);
                }
                // Inherited member classes are not visible in the header that
                // names the supertypes.
                let in_header = *extends == Some(child)
                    || implements.contains(&child)
                    || type_params.contains(&child);
                if in_header {
                    return None;
                }
                let class = self.resolve_decl(class_node)?;
                r.inner_class_deep(class, name)
            }
            Namespace::Value => {
                let class = self.resolve_decl(class_node)?;
                match name {
                    "this" => Some(class),
                    "super" => r.body(class).superclass,
                    _ => r.field_deep(class, name),
                }
            }
            Namespace::Package => None,
        }
    }

    // ========================================================================
    // NAMES AND MEMBER ACCESS
    // ========================================================================

    /// A bare identifier: a value if one is visible, else a type, else a
    /// package.
    fn resolve_simple_name(&self, node: NodeId, name: &str) -> Option<DeclId> {
        self.lookup_name(node, name, Namespace::Value)
            .or_else(|| self.lookup_name(node, name, Namespace::Type))
            .or_else(|| self.lookup_name(node, name, Namespace::Package))
    }

    /// Whether `node` denotes a type (as in `Math.max` or `Outer.this`)
    /// rather than a value of that type.
    pub(crate) fn names_type(&self, node: NodeId) -> bool {
        let Some(decl) = self.resolve_decl(node) else {
            return false;
        };
        let is_type = matches!(
            self.resolver().decl(decl).kind,
            DeclKind::Class(_) | DeclKind::ParameterizedType(_)
        );
        is_type
            && match self.kind(node) {
                NodeKind::Name { name } => name != "this" && name != "super",
                NodeKind::FieldAccess { name, .. } => name != "this",
                _ => false,
            }
    }

    fn resolve_member_access(&self, target: NodeId, name: &str) -> Option<DeclId> {
        let r = self.resolver();
        if let Some(target_decl) = self.resolve_decl(target) {
            let decl = r.decl(target_decl);
            if decl.is_package() {
                let qualified = format!("{}.{}", decl.canonical, name);
                return r.class(&qualified).or_else(|| r.package(&qualified));
            }
            if self.names_type(target) {
                return match name {
                    "this" => r.raw_class(target_decl),
                    "class" => r.class(&r.config().class_type),
                    _ => r
                        .inner_class_deep(target_decl, name)
                        .or_else(|| r.field_deep(target_decl, name)),
                };
            }
        }
        let receiver = self.resolve_eval_type(target)?;
        if name == "length"
            && let Some(length) = r.array_length(receiver)
        {
            return Some(length);
        }
        r.field_deep(receiver, name)
    }

    fn import_target(&self, path: &str, is_static: bool, on_demand: bool) -> Option<DeclId> {
        let r = self.resolver();
        match (is_static, on_demand) {
            (false, true) => r.package(path).or_else(|| r.class(path)),
            (false, false) | (true, true) => r.class(path),
            (true, false) => {
                let (owner, member) = path.rsplit_once('.')?;
                let class = r.class(owner)?;
                r.field_deep(class, member)
                    .or_else(|| r.methods_deep(class, member).first().copied())
                    .or_else(|| r.inner_class_deep(class, member))
            }
        }
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    /// Resolve a possibly dotted type name written at `node`.
    pub(crate) fn resolve_type_path(&self, node: NodeId, path: &str) -> Option<DeclId> {
        let r = self.resolver();
        let Some((first, rest)) = path.split_once('.') else {
            return self.lookup_name(node, path, Namespace::Type);
        };
        if let Some(mut current) = self.lookup_name(node, first, Namespace::Type) {
            for segment in rest.split('.') {
                current = r.inner_class_deep(current, segment)?;
            }
            return Some(current);
        }
        r.class(path)
    }

    fn resolve_type_ref(&self, node: NodeId) -> Option<DeclId> {
        let NodeKind::TypeRef { name, args, dims, .. } = self.kind(node) else {
            return None;
        };
        let r = self.resolver();
        if name == "?" {
            return r.root();
        }
        if self.is_inferred_type(node) {
            return None;
        }

        let mut ty = match PrimitiveKind::from_name(name) {
            Some(kind) => r.primitive(kind),
            None => self.resolve_type_path(node, name)?,
        };
        if !args.is_empty() && r.decl(ty).as_class().is_some() {
            let resolved: Option<Vec<DeclId>> = args
                .iter()
                .map(|&a| self.resolve_decl(a).or_else(|| r.root()))
                .collect();
            if let Some(resolved) = resolved {
                ty = r.parameterized(ty, resolved);
            }
        }
        Some((0..*dims).fold(ty, |t, _| r.array_of(t)))
    }

    fn type_parameter_decl(&self, node: NodeId, name: &SmolStr) -> Option<DeclId> {
        let r = self.resolver();
        let owner = self.tree().parent(node)?;
        let owner_decl = self.resolve_decl(owner)?;
        match self.kind(owner) {
            NodeKind::ClassDecl { .. } => r.class_type_var(owner_decl, name),
            NodeKind::MethodDecl { .. } | NodeKind::ConstructorDecl { .. } => {
                let decl = r.decl(owner_decl);
                let vars = match &decl.kind {
                    DeclKind::Method(m) => &m.type_params,
                    DeclKind::Constructor(c) => &c.type_params,
                    _ => return None,
                };
                vars.iter().copied().find(|&tv| r.decl(tv).name == *name)
            }
            _ => None,
        }
    }

    // ========================================================================
    // DECLARED MEMBERS
    // ========================================================================

    fn method_decl(&self, node: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        let canonical = self.class_canonical(self.enclosing_class(node)?)?;
        let class = r.class(&canonical)?;
        let meta = r.source_class(&canonical)?;
        let method = self.lower_method(node)?;
        let key = r.method_canonical(&meta, &method);
        r.body(class);
        r.lookup_canonical(&key)
    }

    fn constructor_decl(&self, node: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        let class_node = self.enclosing_class(node)?;
        let canonical = self.class_canonical(class_node)?;
        let class = r.class(&canonical)?;
        let meta = r.source_class(&canonical)?;
        let ctor = self.lower_constructor(node, class_node)?;
        let key = r.constructor_canonical(&meta, &ctor);
        r.body(class);
        r.lookup_canonical(&key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::FileId;
    use crate::hir::type_source::{ClassMeta, MemoryTypeSource};
    use crate::hir::Resolver;
    use crate::syntax::{ClassParts, MethodParts, TreeBuilder};

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            MemoryTypeSource::new()
                .with(ClassMeta::class("java.lang.Object"))
                .with(ClassMeta::class("java.lang.String"))
                .with(ClassMeta::class("java.util.ArrayList").type_param("E", None)),
        ))
    }

    #[test]
    fn test_local_must_precede_use() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let early = b.name("x");
        let early_stmt = b.expr_stmt(early);
        let int = b.type_ref("int");
        let one = b.int(1);
        let decl = b.local_var("x", int, Some(one));
        let late = b.name("x");
        let late_stmt = b.expr_stmt(late);
        let block = b.block(vec![early_stmt, decl, late_stmt]);
        let tree = b.finish(vec![block]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        assert_eq!(sema.lookup_name(early, "x", Namespace::Value), None);
        let found = sema.lookup_name(late, "x", Namespace::Value).unwrap();
        assert_eq!(Some(found), sema.resolve_decl(decl));
    }

    #[test]
    fn test_global_type_fallback() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let ty = b.generic_type("java.util.ArrayList", vec![]);
        let tree = b.finish(vec![ty]);
        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        assert_eq!(sema.resolve_decl(ty), r.class("java.util.ArrayList"));
    }

    #[test]
    fn test_parameterized_and_array_type_refs() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let string = b.type_ref("java.lang.String");
        let list = b.generic_type("java.util.ArrayList", vec![string]);
        let ints = b.array_type("int", 2);
        let tree = b.finish(vec![list, ints]);
        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        let list_ty = sema.resolve_decl(list).unwrap();
        assert_eq!(r.display(list_ty), "java.util.ArrayList<java.lang.String>");
        assert_eq!(r.display(sema.resolve_decl(ints).unwrap()), "int[][]");
    }

    #[test]
    fn test_method_params_shadow_fields() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let int = b.type_ref("int");
        let param = b.param("x", int);
        let use_x = b.name("x");
        let stmt = b.expr_stmt(use_x);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let method = b.method(MethodParts::new("m", void).params(vec![param]).body(body));
        let class = b.class(ClassParts::class("C").members(vec![method]));
        let tree = b.finish(vec![class]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        let found = sema.resolve_decl(use_x).unwrap();
        assert_eq!(r.decl(found).canonical, "file#0@0:x");
        assert_eq!(sema.resolve_eval_type(use_x), Some(r.primitive(PrimitiveKind::Int)));
    }
}
