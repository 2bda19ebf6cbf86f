//! Type-variable substitution and inference.
//!
//! Everything here works on [`DeclId`]s of types: classes, parameterized
//! types, arrays and type variables. A "context" is the type through which a
//! member is seen, e.g. `List<String>` when calling `get` on a list of
//! strings.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::ids::DeclId;
use super::index::Resolver;
use super::symbols::{DeclKind, TypeVarOwner};

const MAX_DEPTH: u8 = 24;

impl Resolver {
    /// Value of the class type variable `tv` when seen through `context`.
    ///
    /// Walks from `context` up through its supertypes until it reaches the
    /// class that declared `tv`, substituting at each step. A raw context
    /// yields the variable's bound; an unrelated context yields `None`.
    pub fn lookup_type_var(&self, tv: DeclId, context: DeclId) -> Option<DeclId> {
        self.lookup_type_var_depth(tv, context, 0)
    }

    fn lookup_type_var_depth(&self, tv: DeclId, context: DeclId, depth: u8) -> Option<DeclId> {
        if depth > MAX_DEPTH {
            return None;
        }
        let tv_decl = self.decl(tv);
        let info = tv_decl.as_type_var()?;
        let TypeVarOwner::Class(owner) = &info.owner else {
            return None;
        };
        let owner = *owner;

        let ctx = self.decl(context);
        let (raw, args) = match &ctx.kind {
            DeclKind::ParameterizedType(p) => (p.raw, Some(p.args.clone())),
            DeclKind::Class(_) => (context, None),
            DeclKind::TypeVariable(_) => {
                let bound = self.type_var_bound(context)?;
                if bound == context {
                    return None;
                }
                return self.lookup_type_var_depth(tv, bound, depth + 1);
            }
            _ => return None,
        };

        if raw == owner {
            return match args {
                Some(args) => args.get(info.index).copied(),
                None => self.type_var_bound(tv),
            };
        }

        let body = self.body(raw);
        for &sup in body.superclass.iter().chain(&body.interfaces) {
            if let Some(found) = self.lookup_type_var_depth(tv, sup, depth + 1) {
                return Some(self.substitute_depth(
                    found,
                    &|var| self.lookup_type_var_depth(var, context, depth + 1),
                    depth + 1,
                ));
            }
        }
        None
    }

    /// Like [`lookup_type_var`](Self::lookup_type_var), falling back to the
    /// variable's bound.
    pub fn resolve_type_var(&self, tv: DeclId, context: DeclId) -> Option<DeclId> {
        self.lookup_type_var(tv, context)
            .or_else(|| self.type_var_bound(tv))
    }

    /// Replace the class type variables in `ty` by their values in
    /// `context`. Variables that do not belong to `context` stay as they are.
    pub fn substitute(&self, ty: DeclId, context: DeclId) -> DeclId {
        self.substitute_with(ty, &|tv| self.lookup_type_var(tv, context))
    }

    /// Rebuild `ty` with every type variable mapped through `map`.
    pub fn substitute_with(&self, ty: DeclId, map: &dyn Fn(DeclId) -> Option<DeclId>) -> DeclId {
        self.substitute_depth(ty, map, 0)
    }

    fn substitute_depth(
        &self,
        ty: DeclId,
        map: &dyn Fn(DeclId) -> Option<DeclId>,
        depth: u8,
    ) -> DeclId {
        if depth > MAX_DEPTH {
            return ty;
        }
        let decl = self.decl(ty);
        match &decl.kind {
            DeclKind::TypeVariable(_) => map(ty).unwrap_or(ty),
            DeclKind::ParameterizedType(p) => {
                let args: Vec<DeclId> = p
                    .args
                    .iter()
                    .map(|&a| self.substitute_depth(a, map, depth + 1))
                    .collect();
                if args == p.args {
                    ty
                } else {
                    self.parameterized(p.raw, args)
                }
            }
            DeclKind::Class(_) => match decl.array_element() {
                Some(element) => {
                    let substituted = self.substitute_depth(element, map, depth + 1);
                    if substituted == element {
                        ty
                    } else {
                        self.array_of(substituted)
                    }
                }
                None => ty,
            },
            _ => ty,
        }
    }

    /// Direct supertypes of `ty`, substituted through `ty`.
    pub fn supertypes(&self, ty: DeclId) -> Vec<DeclId> {
        let Some(raw) = self.raw_class(ty) else {
            return Vec::new();
        };
        let context = match self.decl(ty).kind {
            DeclKind::TypeVariable(_) => self.type_var_bound(ty).unwrap_or(raw),
            _ => ty,
        };
        let body = self.body(raw);
        body.superclass
            .iter()
            .chain(&body.interfaces)
            .map(|&s| self.substitute(s, context))
            .collect()
    }

    /// Superclass of `ty`, substituted through `ty`.
    pub fn superclass_of(&self, ty: DeclId) -> Option<DeclId> {
        let raw = self.raw_class(ty)?;
        let sup = self.body(raw).superclass?;
        Some(self.substitute(sup, ty))
    }

    /// `ty` viewed as an instance of the class `target`: the (possibly
    /// parameterized) supertype of `ty` whose raw class is `target`.
    pub fn as_super(&self, ty: DeclId, target: DeclId) -> Option<DeclId> {
        let mut queue = VecDeque::from([ty]);
        let mut seen = FxHashSet::default();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            let current = match self.decl(current).kind {
                DeclKind::TypeVariable(_) => match self.type_var_bound(current) {
                    Some(bound) => bound,
                    None => continue,
                },
                _ => current,
            };
            if self.raw_class(current) == Some(target) {
                return Some(current);
            }
            queue.extend(self.supertypes(current));
        }
        None
    }

    /// Infer a value for `tv` by matching the declared `param` type against
    /// the actual `arg` type.
    pub fn infer_type_var(&self, tv: DeclId, param: DeclId, arg: DeclId) -> Option<DeclId> {
        self.infer_depth(tv, param, arg, 0)
    }

    fn infer_depth(&self, tv: DeclId, param: DeclId, arg: DeclId, depth: u8) -> Option<DeclId> {
        if depth > MAX_DEPTH {
            return None;
        }
        let arg_decl = self.decl(arg);
        if arg_decl.is_null_type() {
            return None;
        }
        if param == tv {
            return Some(self.boxed(arg));
        }
        let param_decl = self.decl(param);
        match &param_decl.kind {
            DeclKind::ParameterizedType(p) => {
                let actual = self.as_super(arg, p.raw)?;
                let actual = self.decl(actual);
                let actual_args = &actual.as_parameterized()?.args;
                p.args
                    .iter()
                    .zip(actual_args)
                    .find_map(|(&pa, &aa)| self.infer_depth(tv, pa, aa, depth + 1))
            }
            DeclKind::Class(_) => {
                let element = param_decl.array_element()?;
                let actual = arg_decl.array_element()?;
                self.infer_depth(tv, element, actual, depth + 1)
            }
            _ => None,
        }
    }

    /// Values for the type variables of a method or constructor at a call.
    ///
    /// Each variable takes the explicit type argument, else a value inferred
    /// from the arguments, else its bound.
    pub fn method_type_args(
        &self,
        member: DeclId,
        args: &[Option<DeclId>],
        explicit: &[DeclId],
    ) -> FxHashMap<DeclId, DeclId> {
        let decl = self.decl(member);
        let (type_params, params, varargs) = match &decl.kind {
            DeclKind::Method(m) => (&m.type_params, &m.params, m.varargs),
            DeclKind::Constructor(c) => (&c.type_params, &c.params, c.varargs),
            _ => return FxHashMap::default(),
        };

        let mut out = FxHashMap::default();
        for (index, &tv) in type_params.iter().enumerate() {
            let value = explicit
                .get(index)
                .copied()
                .or_else(|| self.infer_from_args(tv, params, varargs, args))
                .or_else(|| self.type_var_bound(tv));
            if let Some(value) = value {
                trace!("{} inferred as {}", self.display(tv), self.display(value));
                out.insert(tv, value);
            }
        }
        out
    }

    fn infer_from_args(
        &self,
        tv: DeclId,
        params: &[Option<DeclId>],
        varargs: bool,
        args: &[Option<DeclId>],
    ) -> Option<DeclId> {
        for (index, arg) in args.iter().enumerate() {
            let Some(arg) = *arg else { continue };
            let param = match params.get(index) {
                Some(p) if !(varargs && index + 1 == params.len()) => *p,
                _ if varargs => {
                    let last = (*params.last()?)?;
                    let direct = args.len() == params.len()
                        && self.decl(arg).array_element().is_some();
                    if direct {
                        Some(last)
                    } else {
                        self.decl(last).array_element()
                    }
                }
                _ => None,
            };
            if let Some(param) = param
                && let Some(found) = self.infer_type_var(tv, param, arg)
            {
                return Some(found);
            }
        }
        None
    }

    /// `ty` as seen at a call: method type variables from `method_args`,
    /// class type variables through `receiver`.
    pub fn instantiate(
        &self,
        ty: DeclId,
        receiver: Option<DeclId>,
        method_args: &FxHashMap<DeclId, DeclId>,
    ) -> DeclId {
        self.substitute_with(ty, &|tv| {
            method_args
                .get(&tv)
                .copied()
                .or_else(|| receiver.and_then(|r| self.lookup_type_var(tv, r)))
        })
    }

    /// Parameter types of a method or constructor as seen at a call.
    pub fn instantiated_params(
        &self,
        member: DeclId,
        receiver: Option<DeclId>,
        method_args: &FxHashMap<DeclId, DeclId>,
    ) -> (Vec<Option<DeclId>>, bool) {
        let decl = self.decl(member);
        let (params, varargs) = match &decl.kind {
            DeclKind::Method(m) => (&m.params, m.varargs),
            DeclKind::Constructor(c) => (&c.params, c.varargs),
            _ => return (Vec::new(), false),
        };
        let params = params
            .iter()
            .map(|p| p.map(|p| self.instantiate(p, receiver, method_args)))
            .collect();
        (params, varargs)
    }
}
