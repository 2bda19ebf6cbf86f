//! Overload rating.
//!
//! Every candidate gets a compatibility score against the call-site argument
//! types; 0 means incompatible. Per argument: an exact type match scores
//! [`EXACT`], an assignable one [`ASSIGNABLE`], an unknown one [`UNKNOWN`].
//! The highest score wins; on ties the first candidate in lookup order wins.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::ids::DeclId;
use super::index::Resolver;
use super::symbols::{DeclKind, Declaration};
use crate::base::Modifiers;

pub const EXACT: u32 = 1000;
pub const ASSIGNABLE: u32 = 100;
pub const UNKNOWN: u32 = 10;

/// A candidate and its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rated {
    pub decl: DeclId,
    pub rating: u32,
}

/// The first candidate with the maximal positive rating.
pub fn best(rated: &[Rated]) -> Option<Rated> {
    let mut best: Option<Rated> = None;
    for r in rated {
        if r.rating > best.map_or(0, |b| b.rating) {
            best = Some(*r);
        }
    }
    best
}

/// Number of candidates sharing the maximal positive rating.
pub fn tied_count(rated: &[Rated]) -> usize {
    match best(rated) {
        Some(top) => rated.iter().filter(|r| r.rating == top.rating).count(),
        None => 0,
    }
}

/// The part of a member canonical id after `#`: name plus erased params.
fn signature_key(decl: &Declaration) -> SmolStr {
    match decl.canonical.split_once('#') {
        Some((_, sig)) => SmolStr::new(sig),
        None => decl.canonical.clone(),
    }
}

impl Resolver {
    /// Score a parameter list against argument types.
    pub fn rate(&self, params: &[Option<DeclId>], varargs: bool, args: &[Option<DeclId>]) -> u32 {
        if params.is_empty() {
            return if args.is_empty() { EXACT } else { 0 };
        }
        if !varargs {
            if args.len() != params.len() {
                return 0;
            }
            return self.rate_fixed(params, args).unwrap_or(0);
        }

        let fixed = params.len() - 1;
        if args.len() < fixed {
            return 0;
        }
        let Some(mut total) = self.rate_fixed(&params[..fixed], &args[..fixed]) else {
            return 0;
        };
        let trailing = &args[fixed..];
        let array = params[fixed];
        if trailing.is_empty() {
            return total + UNKNOWN;
        }
        if let [Some(arg)] = trailing {
            let arg_decl = self.decl(*arg);
            let direct = arg_decl.array_element().is_some() || arg_decl.is_null_type();
            if direct && self.is_assignable(Some(*arg), array) {
                return total + EXACT;
            }
        }
        let element = array.and_then(|a| self.decl(a).array_element());
        for arg in trailing {
            total += match (arg, element) {
                (None, _) | (_, None) => UNKNOWN,
                (Some(a), Some(e)) if self.is_assignable(Some(*a), Some(e)) => EXACT,
                _ => return 0,
            };
        }
        total
    }

    fn rate_fixed(&self, params: &[Option<DeclId>], args: &[Option<DeclId>]) -> Option<u32> {
        let mut total = 0;
        for (arg, param) in args.iter().zip(params) {
            let score = match (arg, param) {
                (None, _) | (_, None) => UNKNOWN,
                (Some(a), Some(p)) if a == p => EXACT,
                (Some(a), Some(p)) if self.is_assignable(Some(*a), Some(*p)) => ASSIGNABLE,
                _ => return None,
            };
            total += score;
        }
        Some(total)
    }

    /// Score one method or constructor at a call.
    pub fn rate_member(
        &self,
        member: DeclId,
        receiver: Option<DeclId>,
        args: &[Option<DeclId>],
        explicit: &[DeclId],
    ) -> u32 {
        let method_args = self.method_type_args(member, args, explicit);
        let (params, varargs) = self.instantiated_params(member, receiver, &method_args);
        self.rate(&params, varargs, args)
    }

    /// Classes consulted for members of `ty`, in lookup order: the class,
    /// its superclass chain, then interfaces breadth-first, then the root
    /// type if not reached yet.
    pub fn lineage(&self, ty: DeclId) -> Vec<DeclId> {
        let Some(start) = self.raw_class(ty) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();

        let mut current = Some(start);
        while let Some(class) = current {
            if !seen.insert(class) {
                break;
            }
            out.push(class);
            current = self
                .body(class)
                .superclass
                .and_then(|s| self.raw_class(s));
        }

        let mut queue: VecDeque<DeclId> = out
            .iter()
            .flat_map(|&c| self.body(c).interfaces.clone())
            .collect();
        while let Some(iface) = queue.pop_front() {
            let Some(raw) = self.raw_class(iface) else {
                continue;
            };
            if !seen.insert(raw) {
                continue;
            }
            out.push(raw);
            queue.extend(self.body(raw).interfaces.iter().copied());
        }

        if let Some(root) = self.root()
            && seen.insert(root)
        {
            out.push(root);
        }
        out
    }

    /// Methods named `name` visible on `ty`, most specific declaring class
    /// first. A method overridden lower in the hierarchy is listed once.
    pub fn methods_deep(&self, ty: DeclId, name: &str) -> Vec<DeclId> {
        let mut out = Vec::new();
        let mut signatures = FxHashSet::default();
        for class in self.lineage(ty) {
            for &method in &self.body(class).methods {
                let decl = self.decl(method);
                if decl.name == name && signatures.insert(signature_key(&decl)) {
                    out.push(method);
                }
            }
        }
        out
    }

    /// Field `name` of `ty` or of the nearest supertype declaring it.
    pub fn field_deep(&self, ty: DeclId, name: &str) -> Option<DeclId> {
        self.lineage(ty).into_iter().find_map(|class| {
            self.body(class)
                .fields
                .iter()
                .copied()
                .find(|&f| self.decl(f).name == name)
        })
    }

    /// Member class `name` of `ty` or of one of its supertypes.
    pub fn inner_class_deep(&self, ty: DeclId, name: &str) -> Option<DeclId> {
        self.lineage(ty).into_iter().find_map(|class| {
            self.body(class)
                .inner
                .iter()
                .copied()
                .find(|&c| self.decl(c).name == name)
        })
    }

    /// Rate every method named `name` on `receiver`.
    pub fn rate_methods(
        &self,
        receiver: DeclId,
        name: &str,
        args: &[Option<DeclId>],
        explicit: &[DeclId],
    ) -> Vec<Rated> {
        self.methods_deep(receiver, name)
            .into_iter()
            .map(|decl| Rated {
                decl,
                rating: self.rate_member(decl, Some(receiver), args, explicit),
            })
            .collect()
    }

    /// Compatible methods, best first. Equal ratings keep lookup order.
    pub fn find_compatible_methods(
        &self,
        receiver: DeclId,
        name: &str,
        args: &[Option<DeclId>],
    ) -> Vec<Rated> {
        let mut rated: Vec<Rated> = self
            .rate_methods(receiver, name, args, &[])
            .into_iter()
            .filter(|r| r.rating > 0)
            .collect();
        rated.sort_by(|a, b| b.rating.cmp(&a.rating));
        rated
    }

    /// Rate the constructors of the class behind `class_type`.
    pub fn rate_constructors(&self, class_type: DeclId, args: &[Option<DeclId>]) -> Vec<Rated> {
        let Some(raw) = self.raw_class(class_type) else {
            return Vec::new();
        };
        self.body(raw)
            .constructors
            .iter()
            .map(|&decl| Rated {
                decl,
                rating: self.rate_member(decl, Some(class_type), args, &[]),
            })
            .collect()
    }

    /// Best constructor of `class_type` for `args`, if any is compatible.
    pub fn find_compatible_constructor(
        &self,
        class_type: DeclId,
        args: &[Option<DeclId>],
    ) -> Option<DeclId> {
        best(&self.rate_constructors(class_type, args)).map(|r| r.decl)
    }

    /// The single abstract method of a functional interface, ignoring
    /// default and static methods and those the root type declares.
    pub fn functional_method(&self, ty: DeclId) -> Option<DeclId> {
        let raw = self.raw_class(ty)?;
        if !self.decl(raw).is_interface() {
            return None;
        }
        let root = self.root();
        let mut excluded: FxHashSet<SmolStr> = match root {
            Some(root) => self
                .body(root)
                .methods
                .iter()
                .map(|&m| signature_key(&self.decl(m)))
                .collect(),
            None => FxHashSet::default(),
        };

        let mut found = None;
        for class in self.lineage(raw) {
            if Some(class) == root {
                continue;
            }
            for &method in &self.body(class).methods {
                let decl = self.decl(method);
                let DeclKind::Method(info) = &decl.kind else {
                    continue;
                };
                if !excluded.insert(signature_key(&decl)) {
                    continue;
                }
                let is_abstract = info.modifiers.contains(Modifiers::ABSTRACT)
                    && !info.modifiers.intersects(Modifiers::STATIC | Modifiers::DEFAULT);
                if !is_abstract {
                    continue;
                }
                if found.is_some() {
                    return None;
                }
                found = Some(method);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::hir::symbols::PrimitiveKind;
    use crate::hir::type_source::{ClassMeta, MemoryTypeSource, MethodMeta};

    fn resolver() -> Resolver {
        let source = MemoryTypeSource::new()
            .with(
                ClassMeta::class("java.lang.Object")
                    .method(MethodMeta::new("equals", "boolean").param("java.lang.Object")),
            )
            .with(ClassMeta::class("java.lang.String"))
            .with(
                ClassMeta::class("p.Calc")
                    .method(MethodMeta::new("f", "void"))
                    .method(MethodMeta::new("f", "void").param("int"))
                    .method(MethodMeta::new("f", "void").param("int").param("int"))
                    .method(MethodMeta::new("g", "void").varargs("java.lang.String"))
                    .method(MethodMeta::new("h", "void").param("java.lang.Object"))
                    .method(MethodMeta::new("h", "void").param("java.lang.String")),
            )
            .with(ClassMeta::class("p.Sub").extends("p.Calc").method(MethodMeta::new("f", "void")))
            .with(
                ClassMeta::interface("p.Fn")
                    .method(MethodMeta::new("apply", "int").param("int"))
                    .method(MethodMeta::new("andThen", "p.Fn").with_default())
                    .method(MethodMeta::new("equals", "boolean").param("java.lang.Object")),
            );
        Resolver::new(Arc::new(source))
    }

    #[test]
    fn test_arity_and_exact_scores() {
        let r = resolver();
        let calc = r.class("p.Calc").unwrap();
        let int = Some(r.primitive(PrimitiveKind::Int));
        let ratings = |args: &[Option<DeclId>]| -> Vec<u32> {
            r.rate_methods(calc, "f", args, &[]).iter().map(|r| r.rating).collect()
        };
        assert_eq!(ratings(&[]), vec![1000, 0, 0]);
        assert_eq!(ratings(&[int]), vec![0, 1000, 0]);
        let rated = r.rate_methods(calc, "f", &[int, int], &[]);
        assert_eq!(ratings(&[int, int]), vec![0, 0, 2000]);
        let chosen = best(&rated).unwrap();
        assert_eq!(r.decl(chosen.decl).canonical, "p.Calc#f(int,int)");
    }

    #[test]
    fn test_varargs_scores() {
        let r = resolver();
        let calc = r.class("p.Calc").unwrap();
        let string = r.string_type();
        let strings = string.map(|s| r.array_of(s));
        assert_eq!(r.rate_methods(calc, "g", &[strings], &[])[0].rating, 1000);
        assert_eq!(r.rate_methods(calc, "g", &[string, string], &[])[0].rating, 2000);
        assert_eq!(r.rate_methods(calc, "g", &[], &[])[0].rating, 10);
        let int = Some(r.primitive(PrimitiveKind::Int));
        assert_eq!(r.rate_methods(calc, "g", &[int], &[])[0].rating, 0);
    }

    #[test]
    fn test_exact_beats_assignable() {
        let r = resolver();
        let calc = r.class("p.Calc").unwrap();
        let found = r.find_compatible_methods(calc, "h", &[r.string_type()]);
        assert_eq!(found.len(), 2);
        assert_eq!(r.decl(found[0].decl).canonical, "p.Calc#h(java.lang.String)");
        assert_eq!(found[1].rating, ASSIGNABLE);
    }

    #[test]
    fn test_unknown_argument_keeps_candidates() {
        let r = resolver();
        let calc = r.class("p.Calc").unwrap();
        let found = r.find_compatible_methods(calc, "h", &[None]);
        assert_eq!(found.len(), 2);
        assert_eq!(tied_count(&found), 2);
        assert_eq!(best(&found).map(|b| b.decl), Some(found[0].decl));
    }

    #[test]
    fn test_override_listed_once() {
        let r = resolver();
        let sub = r.class("p.Sub").unwrap();
        let methods = r.methods_deep(sub, "f");
        assert_eq!(methods.len(), 3);
        assert_eq!(r.decl(methods[0]).canonical, "p.Sub#f()");
    }

    #[test]
    fn test_functional_method_ignores_default_and_root_methods() {
        let r = resolver();
        let fun = r.class("p.Fn").unwrap();
        let method = r.functional_method(fun).unwrap();
        assert_eq!(r.decl(method).name, "apply");
        assert!(r.functional_method(r.class("p.Calc").unwrap()).is_none());
    }
}
