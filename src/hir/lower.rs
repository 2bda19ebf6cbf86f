//! Lowering of source class declarations into [`ClassMeta`].
//!
//! Source classes enter the resolver the same way external ones do: as
//! metadata in the overlay. Lowering runs in two passes over a set of trees.
//! The header pass registers every class name (and member class names) so
//! that the member pass can resolve signatures that mention classes
//! declared later or in other files.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::index::Resolver;
use super::semantics::Semantics;
use super::symbols::{DeclKind, PrimitiveKind};
use super::type_source::{
    ClassHeader, ClassMembers, ClassMeta, ConstructorMeta, FieldMeta, MethodMeta, TypeParamMeta,
    TypeSig,
};
use crate::base::{ClassKind, Modifiers};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

impl Semantics<'_> {
    /// Header of the class declared by `node`.
    ///
    /// Member interfaces and enums, and every member of an interface, are
    /// implicitly static.
    pub(crate) fn class_header_of(&self, node: NodeId) -> Option<ClassHeader> {
        let NodeKind::ClassDecl {
            name,
            kind,
            modifiers,
            type_params,
            ..
        } = self.kind(node)
        else {
            return None;
        };
        let canonical = self.class_canonical(node)?;
        let outer = self
            .enclosing_class(node)
            .filter(|&o| self.tree().parent(node) == Some(o));

        let mut modifiers = *modifiers;
        if let Some(outer) = outer
            && (*kind != ClassKind::Class || self.class_kind(outer) == Some(ClassKind::Interface))
        {
            modifiers |= Modifiers::STATIC;
        }
        if *kind == ClassKind::Interface {
            modifiers |= Modifiers::ABSTRACT;
        }

        Some(ClassHeader {
            canonical,
            name: name.clone(),
            package: self.package_name(),
            modifiers,
            kind: *kind,
            enclosing: outer.and_then(|o| self.class_canonical(o)),
            type_params: type_params
                .iter()
                .filter_map(|&tp| self.tree().name(tp).cloned())
                .collect(),
        })
    }

    fn member_class_names(&self, node: NodeId) -> Vec<SmolStr> {
        let NodeKind::ClassDecl { members, .. } = self.kind(node) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|&m| self.class_canonical(m))
            .collect()
    }

    /// Full metadata of the class declared by `node`.
    pub(crate) fn lower_class(&self, node: NodeId) -> Option<ClassMeta> {
        let header = self.class_header_of(node)?;
        let NodeKind::ClassDecl {
            kind,
            type_params,
            extends,
            implements,
            members,
            ..
        } = self.kind(node)
        else {
            return None;
        };
        let r = self.resolver();
        let this_class = TypeSig::Class(header.canonical.clone());

        let mut out = ClassMembers {
            type_param_bounds: type_params
                .iter()
                .map(|&tp| match self.kind(tp) {
                    NodeKind::TypeParameter { bound: Some(b), .. } => Some(self.type_sig(*b)),
                    _ => None,
                })
                .collect(),
            superclass: match kind {
                ClassKind::Class => extends.map(|t| self.type_sig(t)),
                ClassKind::Enum => Some(TypeSig::Parameterized(
                    r.config().enum_type.clone(),
                    vec![this_class.clone()],
                )),
                ClassKind::Interface => None,
            },
            interfaces: implements.iter().map(|&t| self.type_sig(t)).collect(),
            ..ClassMembers::default()
        };

        if let Some(sup) = &out.superclass
            && self.closes_cycle(&header.canonical, sup)
        {
            warn!("cyclic inheritance: {} extends {}", header.canonical, sup);
            out.superclass = None;
        }
        out.interfaces.retain(|sig| {
            let cyclic = self.closes_cycle(&header.canonical, sig);
            if cyclic {
                warn!("cyclic inheritance: {} implements {}", header.canonical, sig);
            }
            !cyclic
        });

        let constant = Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
        for &member in members {
            match self.kind(member) {
                NodeKind::FieldDecl {
                    name,
                    modifiers,
                    ty,
                    ..
                } => out.fields.push(FieldMeta {
                    name: name.clone(),
                    modifiers: if *kind == ClassKind::Interface {
                        *modifiers | constant
                    } else {
                        *modifiers
                    },
                    ty: self.type_sig(*ty),
                    enum_constant: false,
                }),
                NodeKind::EnumConstant { name, .. } => out.fields.push(FieldMeta {
                    name: name.clone(),
                    modifiers: constant,
                    ty: this_class.clone(),
                    enum_constant: true,
                }),
                NodeKind::MethodDecl { .. } => out.methods.extend(self.lower_method(member)),
                NodeKind::ConstructorDecl { .. } => {
                    out.constructors.extend(self.lower_constructor(member, node))
                }
                NodeKind::ClassDecl { .. } => out.inner_classes.extend(self.class_canonical(member)),
                _ => {}
            }
        }

        if *kind == ClassKind::Enum {
            let synthetic = Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::SYNTHETIC;
            out.methods.push(
                MethodMeta::new("values", TypeSig::array(this_class.clone())).modifiers(synthetic),
            );
            out.methods.push(
                MethodMeta::new("valueOf", this_class)
                    .param(TypeSig::Class(r.config().string_type.clone()))
                    .modifiers(synthetic),
            );
        }

        Some(ClassMeta {
            header,
            members: out,
        })
    }

    /// Whether `class` is reachable from the supertype `sig`.
    fn closes_cycle(&self, class: &str, sig: &TypeSig) -> bool {
        let r = self.resolver();
        let start = match sig {
            TypeSig::Class(name) | TypeSig::Parameterized(name, _) => name.clone(),
            _ => return false,
        };
        let mut seen = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(name) = stack.pop() {
            if name == class {
                return true;
            }
            if seen.insert(name.clone()) {
                stack.extend(r.supertype_names(&name));
            }
        }
        false
    }

    /// Metadata of a method declaration.
    pub(crate) fn lower_method(&self, node: NodeId) -> Option<MethodMeta> {
        let NodeKind::MethodDecl {
            name,
            modifiers,
            type_params,
            ret,
            params,
            body,
        } = self.kind(node)
        else {
            return None;
        };
        let mut modifiers = *modifiers;
        let in_interface = self
            .enclosing_class(node)
            .and_then(|c| self.class_kind(c))
            == Some(ClassKind::Interface);
        if in_interface {
            modifiers |= Modifiers::PUBLIC;
            if !modifiers.is_static() {
                modifiers |= if body.is_some() {
                    Modifiers::DEFAULT
                } else {
                    Modifiers::ABSTRACT
                };
            }
        }

        let (param_sigs, varargs) = self.lower_params(params);
        let mut method = MethodMeta::new(name, self.type_sig(*ret)).modifiers(modifiers);
        method.type_params = self.lower_type_params(type_params);
        method.params = param_sigs;
        method.varargs = varargs;
        Some(method)
    }

    /// Metadata of a constructor declaration of the class at `class_node`,
    /// including implicit leading parameters.
    pub(crate) fn lower_constructor(
        &self,
        node: NodeId,
        class_node: NodeId,
    ) -> Option<ConstructorMeta> {
        let NodeKind::ConstructorDecl {
            modifiers,
            type_params,
            params,
            ..
        } = self.kind(node)
        else {
            return None;
        };
        let header = self.class_header_of(class_node)?;
        let r = self.resolver();

        let mut ctor = ConstructorMeta::new().modifiers(*modifiers);
        ctor.type_params = self.lower_type_params(type_params);
        match header.kind {
            ClassKind::Enum => {
                ctor.params.push(TypeSig::Class(r.config().string_type.clone()));
                ctor.params
                    .push(TypeSig::Class(SmolStr::new(PrimitiveKind::Int.name())));
            }
            ClassKind::Class if !header.modifiers.is_static() => {
                ctor.params.extend(header.enclosing.map(TypeSig::Class));
            }
            _ => {}
        }
        let (param_sigs, varargs) = self.lower_params(params);
        ctor.params.extend(param_sigs);
        ctor.varargs = varargs;
        Some(ctor)
    }

    fn lower_params(&self, params: &[NodeId]) -> (Vec<TypeSig>, bool) {
        let mut varargs = false;
        let sigs = params
            .iter()
            .filter_map(|&p| match self.kind(p) {
                NodeKind::Param {
                    ty: Some(ty),
                    varargs: is_varargs,
                    ..
                } => {
                    varargs = *is_varargs;
                    let sig = self.type_sig(*ty);
                    Some(if *is_varargs { TypeSig::array(sig) } else { sig })
                }
                _ => None,
            })
            .collect();
        (sigs, varargs)
    }

    fn lower_type_params(&self, type_params: &[NodeId]) -> Vec<TypeParamMeta> {
        type_params
            .iter()
            .filter_map(|&tp| match self.kind(tp) {
                NodeKind::TypeParameter { name, bound } => Some(TypeParamMeta {
                    name: name.clone(),
                    bound: bound.map(|b| self.type_sig(b)),
                }),
                _ => None,
            })
            .collect()
    }

    /// Signature form of a written type. Unresolved names are kept as
    /// written so the resolver can report them later.
    pub(crate) fn type_sig(&self, node: NodeId) -> TypeSig {
        let r = self.resolver();
        let NodeKind::TypeRef {
            name, args, dims, ..
        } = self.kind(node)
        else {
            return TypeSig::Class(r.config().root_type.clone());
        };

        let base = if name == "?" {
            TypeSig::Class(r.config().root_type.clone())
        } else if PrimitiveKind::from_name(name).is_some() {
            TypeSig::Class(name.clone())
        } else if self.is_type_param_in_scope(node, name) {
            TypeSig::Var(name.clone())
        } else {
            let found = self.resolve_type_path(node, name).map(|d| r.decl(d));
            match found.as_deref().map(|d| (&d.kind, d)) {
                Some((DeclKind::Class(_), d)) => TypeSig::Class(d.canonical.clone()),
                Some((DeclKind::TypeVariable(_), d)) => TypeSig::Var(d.name.clone()),
                _ => {
                    debug!("keeping unresolved type {} in signature", name);
                    TypeSig::Class(name.clone())
                }
            }
        };
        let base = match base {
            TypeSig::Class(raw) if !args.is_empty() => {
                TypeSig::Parameterized(raw, args.iter().map(|&a| self.type_sig(a)).collect())
            }
            other => other,
        };
        (0..*dims).fold(base, |sig, _| TypeSig::array(sig))
    }

    fn is_type_param_in_scope(&self, node: NodeId, name: &str) -> bool {
        let tree = self.tree();
        for ancestor in tree.ancestors(node) {
            let type_params = match self.kind(ancestor) {
                NodeKind::MethodDecl { type_params, .. }
                | NodeKind::ConstructorDecl { type_params, .. } => type_params,
                NodeKind::ClassDecl {
                    type_params,
                    modifiers,
                    ..
                } => {
                    if type_params.iter().any(|&tp| tree.name(tp).is_some_and(|n| n == name)) {
                        return true;
                    }
                    if modifiers.is_static() {
                        return false;
                    }
                    continue;
                }
                _ => continue,
            };
            if type_params.iter().any(|&tp| tree.name(tp).is_some_and(|n| n == name)) {
                return true;
            }
        }
        false
    }
}

fn class_nodes(tree: &SyntaxTree) -> impl Iterator<Item = NodeId> + '_ {
    tree.nodes()
        .into_iter()
        .filter(|&n| matches!(tree.kind(n), NodeKind::ClassDecl { .. }))
}

/// Header pass: register every class declared in `tree`. Returns their
/// canonical names in declaration order.
pub fn declare_classes(tree: &SyntaxTree, resolver: &Resolver) -> Vec<SmolStr> {
    let sema = Semantics::new(tree, resolver);
    let mut declared = Vec::new();
    for node in class_nodes(tree) {
        let Some(header) = sema.class_header_of(node) else {
            continue;
        };
        declared.push(header.canonical.clone());
        resolver.declare_source_header(header, sema.member_class_names(node));
    }
    tree.clear_caches();
    declared
}

/// Member pass: lower and define every class declared in `tree`.
pub fn define_classes(tree: &SyntaxTree, resolver: &Resolver) {
    let sema = Semantics::new(tree, resolver);
    for node in class_nodes(tree) {
        if let Some(meta) = sema.lower_class(node) {
            resolver.define_source_class(meta);
        }
    }
    tree.clear_caches();
}

/// Both passes over a single tree.
pub fn lower_tree(tree: &SyntaxTree, resolver: &Resolver) -> Vec<SmolStr> {
    let declared = declare_classes(tree, resolver);
    define_classes(tree, resolver);
    declared
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::FileId;
    use crate::hir::type_source::MemoryTypeSource;
    use crate::syntax::{ClassParts, MethodParts, TreeBuilder};

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            MemoryTypeSource::new()
                .with(ClassMeta::class("java.lang.Object"))
                .with(ClassMeta::class("java.lang.String"))
                .with(ClassMeta::class("java.lang.Enum").type_param("E", None)),
        ))
    }

    #[test]
    fn test_interface_members_are_implicit() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let void = b.type_ref("void");
        let run = b.method(MethodParts::new("run", void).modifiers(Modifiers::empty()));
        let int = b.type_ref("int");
        let limit = b.field(Modifiers::empty(), "LIMIT", int, None);
        let iface = b.class(ClassParts::interface("Task").members(vec![run, limit]));
        let tree = b.finish(vec![iface]);

        let r = resolver();
        lower_tree(&tree, &r);
        let meta = r.source_class("Task").unwrap();
        assert!(meta.members.methods[0].modifiers.contains(Modifiers::ABSTRACT | Modifiers::PUBLIC));
        assert!(meta.members.fields[0].modifiers.contains(Modifiers::STATIC | Modifiers::FINAL));
    }

    #[test]
    fn test_enum_gets_synthetic_members() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let red = b.enum_constant("RED", vec![]);
        let color = b.class(ClassParts::enumeration("Color").members(vec![red]));
        let tree = b.finish(vec![color]);

        let r = resolver();
        lower_tree(&tree, &r);
        let meta = r.source_class("Color").unwrap();
        assert_eq!(
            meta.members.superclass,
            Some(TypeSig::generic("java.lang.Enum", vec![TypeSig::class("Color")]))
        );
        let names: Vec<_> = meta.members.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["values", "valueOf"]);
        assert!(meta.members.fields[0].enum_constant);
    }

    #[test]
    fn test_member_class_constructor_takes_outer() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let ctor = b.constructor(Modifiers::PUBLIC, vec![], None);
        let inner = b.class(ClassParts::class("Inner").members(vec![ctor]));
        let outer = b.class(ClassParts::class("Outer").members(vec![inner]));
        let tree = b.finish(vec![outer]);

        let r = resolver();
        let declared = lower_tree(&tree, &r);
        assert_eq!(declared, ["Outer", "Outer.Inner"]);
        let meta = r.source_class("Outer.Inner").unwrap();
        assert_eq!(meta.members.constructors[0].params, [TypeSig::class("Outer")]);
        assert_eq!(r.source_class("Outer").unwrap().members.inner_classes, ["Outer.Inner"]);
    }

    #[test]
    fn test_cyclic_supertype_is_dropped() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let to_b = b.type_ref("B");
        let a = b.class(ClassParts::class("A").extends(to_b));
        let to_a = b.type_ref("A");
        let bb = b.class(ClassParts::class("B").extends(to_a));
        let tree = b.finish(vec![a, bb]);

        let r = resolver();
        lower_tree(&tree, &r);
        assert_eq!(r.source_class("A").unwrap().members.superclass, Some(TypeSig::class("B")));
        assert_eq!(r.source_class("B").unwrap().members.superclass, None);
    }

    #[test]
    fn test_type_params_lower_to_vars() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let t = b.type_param("T", None);
        let ret = b.type_ref("T");
        let pt = b.type_ref("T");
        let p = b.varargs_param("items", pt);
        let m = b.method(MethodParts::new("first", ret).params(vec![p]));
        let box_ = b.class(ClassParts::class("Box").type_params(vec![t]).members(vec![m]));
        let tree = b.finish(vec![box_]);

        let r = resolver();
        lower_tree(&tree, &r);
        let method = &r.source_class("Box").unwrap().members.methods[0];
        assert_eq!(method.ret, TypeSig::var("T"));
        assert_eq!(method.params, [TypeSig::array(TypeSig::var("T"))]);
        assert!(method.varargs);
    }
}
