//! Method invocations and instance creation.

use tracing::debug;

use super::ids::DeclId;
use super::overload::{Rated, best};
use super::semantics::Semantics;
use super::symbols::{ClassFlavor, DeclKind, PrimitiveKind};
use crate::syntax::{NodeId, NodeKind};

impl Semantics<'_> {
    /// Methods a call may refer to and the type they are looked up on.
    ///
    /// Unqualified calls look in the innermost enclosing class that has a
    /// method of that name, then in static imports. `this(..)` and
    /// `super(..)` consider constructors.
    pub fn call_candidates(&self, call: NodeId) -> (Vec<DeclId>, Option<DeclId>) {
        let NodeKind::MethodCall { target, name, .. } = self.kind(call) else {
            return (Vec::new(), None);
        };
        let r = self.resolver();
        if let Some(target) = target {
            if self
                .resolve_decl(*target)
                .is_some_and(|d| r.decl(d).is_package())
            {
                return (Vec::new(), None);
            }
            return match self.resolve_eval_type(*target) {
                Some(receiver) => (r.methods_deep(receiver, name), Some(receiver)),
                None => (Vec::new(), None),
            };
        }

        if name == "this" || name == "super" {
            let class = self
                .enclosing_class(call)
                .and_then(|c| self.resolve_decl(c));
            let owner = match (class, name.as_str()) {
                (Some(class), "this") => Some(r.self_type(class)),
                (Some(class), _) => r.body(class).superclass,
                (None, _) => None,
            };
            return match owner.and_then(|o| Some((o, r.raw_class(o)?))) {
                Some((owner, raw)) => (r.body(raw).constructors.clone(), Some(owner)),
                None => (Vec::new(), None),
            };
        }

        let classes = self
            .tree()
            .ancestors(call)
            .filter(|&n| matches!(self.kind(n), NodeKind::ClassDecl { .. }));
        for class_node in classes {
            let Some(class) = self.resolve_decl(class_node) else {
                continue;
            };
            let methods = r.methods_deep(class, name);
            if !methods.is_empty() {
                return (methods, Some(r.self_type(class)));
            }
        }
        self.static_import_methods(call, name)
    }

    pub(crate) fn call_parts(&self, call: NodeId) -> Option<(Vec<Option<DeclId>>, Vec<DeclId>)> {
        let NodeKind::MethodCall {
            type_args, args, ..
        } = self.kind(call)
        else {
            return None;
        };
        let arg_types = self.arg_types(args);
        let explicit = type_args
            .iter()
            .filter_map(|&t| self.resolve_decl(t))
            .collect();
        Some((arg_types, explicit))
    }

    /// Every candidate of a method call with its rating.
    pub fn rate_call(&self, call: NodeId) -> Vec<Rated> {
        let NodeKind::MethodCall { args: arg_nodes, .. } = self.kind(call) else {
            return Vec::new();
        };
        let Some((args, explicit)) = self.call_parts(call) else {
            return Vec::new();
        };
        let (candidates, receiver) = self.call_candidates(call);
        let lambdas = self.lambda_args(arg_nodes);
        let r = self.resolver();
        candidates
            .into_iter()
            .map(|decl| {
                let mut rating = r.rate_member(decl, receiver, &args, &explicit);
                if rating > 0
                    && !self.accepts_lambdas(decl, receiver, &args, &explicit, &lambdas, 0)
                {
                    rating = 0;
                }
                Rated { decl, rating }
            })
            .collect()
    }

    pub(crate) fn resolve_call(&self, call: NodeId) -> Option<DeclId> {
        let rated = self.rate_call(call);
        let chosen = best(&rated);
        if chosen.is_none() && !rated.is_empty() {
            debug!("no compatible overload among {} candidates", rated.len());
        }
        chosen.map(|b| b.decl)
    }

    /// Result type of a call: the declared return type with method type
    /// variables inferred and class type variables taken from the receiver.
    pub(crate) fn call_type(&self, call: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        let method = self.resolve_decl(call)?;
        let ret = match &r.decl(method).kind {
            DeclKind::Method(m) => m.ret?,
            DeclKind::Constructor(_) => return Some(r.primitive(PrimitiveKind::Void)),
            _ => return None,
        };
        let (args, explicit) = self.call_parts(call)?;
        let (_, receiver) = self.call_candidates(call);
        let method_args = r.method_type_args(method, &args, &explicit);
        Some(r.instantiate(ret, receiver, &method_args))
    }

    // ========================================================================
    // INSTANCE CREATION
    // ========================================================================

    fn is_diamond(&self, ty: NodeId) -> bool {
        matches!(self.kind(ty), NodeKind::TypeRef { diamond: true, .. })
    }

    /// Type created by a `new` expression. Diamond type arguments are
    /// inferred from the type the context expects.
    pub(crate) fn new_type(&self, node: NodeId) -> Option<DeclId> {
        let NodeKind::New { ty, .. } = self.kind(node) else {
            return None;
        };
        let r = self.resolver();
        let declared = self.resolve_decl(*ty)?;
        if !self.is_diamond(*ty) {
            return Some(declared);
        }
        let raw = r.raw_class(declared)?;
        let inferred = self
            .expected_type(node)
            .and_then(|expected| self.infer_diamond(raw, expected));
        Some(inferred.unwrap_or(raw))
    }

    fn infer_diamond(&self, raw: DeclId, expected: DeclId) -> Option<DeclId> {
        let r = self.resolver();
        let vars = r.body(raw).type_params.clone();
        if vars.is_empty() {
            return None;
        }
        let viewed = r.as_super(r.self_type(raw), r.raw_class(expected)?)?;
        let args: Option<Vec<DeclId>> = vars
            .iter()
            .map(|&tv| r.infer_type_var(tv, viewed, expected).or_else(|| r.root()))
            .collect();
        Some(r.parameterized(raw, args?))
    }

    /// Created type, argument types and the number of implicit leading
    /// arguments of a `new` expression.
    ///
    /// Inner (non-static member) classes take the enclosing instance as an
    /// implicit first argument.
    pub(crate) fn new_site(&self, node: NodeId) -> Option<(DeclId, Vec<Option<DeclId>>, usize)> {
        let NodeKind::New { args, .. } = self.kind(node) else {
            return None;
        };
        let r = self.resolver();
        let class_type = self.new_type(node)?;
        let decl = r.decl(r.raw_class(class_type)?);
        let info = decl.as_class()?;

        let mut arg_types = Vec::with_capacity(args.len() + 1);
        if info.flavor == ClassFlavor::Class
            && !info.modifiers.is_static()
            && let Some(outer) = info.enclosing
        {
            arg_types.push(Some(outer));
        }
        let implicit = arg_types.len();
        arg_types.extend(self.arg_types(args));
        Some((class_type, arg_types, implicit))
    }

    /// Every constructor candidate of a `new` expression with its rating.
    pub fn rate_new(&self, node: NodeId) -> Vec<Rated> {
        let NodeKind::New { args: arg_nodes, .. } = self.kind(node) else {
            return Vec::new();
        };
        let Some((class_type, args, implicit)) = self.new_site(node) else {
            return Vec::new();
        };
        let lambdas = self.lambda_args(arg_nodes);
        self.resolver()
            .rate_constructors(class_type, &args)
            .into_iter()
            .map(|mut rated| {
                if rated.rating > 0
                    && !self.accepts_lambdas(rated.decl, Some(class_type), &args, &[], &lambdas, implicit)
                {
                    rated.rating = 0;
                }
                rated
            })
            .collect()
    }

    pub(crate) fn resolve_new(&self, node: NodeId) -> Option<DeclId> {
        best(&self.rate_new(node)).map(|b| b.decl)
    }

    /// Constructor invoked by an enum constant: the implicit name and
    /// ordinal come first.
    pub fn enum_constant_constructor(&self, node: NodeId) -> Option<DeclId> {
        let NodeKind::EnumConstant { args, .. } = self.kind(node) else {
            return None;
        };
        let r = self.resolver();
        let class = self.resolve_decl(self.enclosing_class(node)?)?;
        let mut arg_types = vec![r.string_type(), Some(r.primitive(PrimitiveKind::Int))];
        arg_types.extend(self.arg_types(args));
        r.find_compatible_constructor(class, &arg_types)
    }
}
