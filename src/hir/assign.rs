//! Assignability, boxing and least common ancestors.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use super::ids::DeclId;
use super::index::Resolver;
use super::symbols::{ClassFlavor, DeclKind, PrimitiveKind};

const MAX_DEPTH: u8 = 32;

impl Resolver {
    /// Whether a value of type `from` can be assigned to `to`.
    ///
    /// Unknown types on either side are assignable: resolution failures
    /// must not cascade into type errors.
    pub fn is_assignable(&self, from: Option<DeclId>, to: Option<DeclId>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => self.assignable(from, to, 0),
            _ => true,
        }
    }

    fn assignable(&self, from: DeclId, to: DeclId, depth: u8) -> bool {
        if from == to {
            return true;
        }
        if depth > MAX_DEPTH {
            return false;
        }

        let to_decl = self.decl(to);
        match &to_decl.kind {
            DeclKind::TypeVariable(_) => {
                return match self.type_var_bound(to) {
                    Some(bound) if bound != to => self.assignable(from, bound, depth + 1),
                    _ => true,
                };
            }
            DeclKind::ParameterizedType(p) => return self.assignable(from, p.raw, depth + 1),
            DeclKind::Class(_) => {}
            _ => return false,
        }
        let from_decl = self.decl(from);
        match &from_decl.kind {
            DeclKind::TypeVariable(_) => {
                return match self.type_var_bound(from) {
                    Some(bound) if bound != from => self.assignable(bound, to, depth + 1),
                    _ => Some(to) == self.root(),
                };
            }
            DeclKind::ParameterizedType(p) => return self.assignable(p.raw, to, depth + 1),
            DeclKind::Class(_) => {}
            _ => return false,
        }

        let (Some(from_info), Some(to_info)) = (from_decl.as_class(), to_decl.as_class()) else {
            return false;
        };
        match (from_info.flavor, to_info.flavor) {
            (ClassFlavor::Null, ClassFlavor::Primitive(_)) => false,
            (ClassFlavor::Null, _) => true,
            (ClassFlavor::Primitive(a), ClassFlavor::Primitive(b)) => {
                a != PrimitiveKind::Void && b != PrimitiveKind::Void && a.widens_to(b)
            }
            (ClassFlavor::Primitive(a), _) => match self.boxed_class(a) {
                Some(boxed) => self.assignable(boxed, to, depth + 1),
                None => false,
            },
            (_, ClassFlavor::Primitive(b)) => match self.unboxed(from) {
                Some(a) => a.widens_to(b),
                None => false,
            },
            (ClassFlavor::Array { element: fe }, ClassFlavor::Array { element: te }) => {
                let primitive = self.decl(fe).primitive().is_some()
                    || self.decl(te).primitive().is_some();
                if primitive {
                    fe == te
                } else {
                    self.assignable(fe, te, depth + 1)
                }
            }
            (ClassFlavor::Array { .. }, _) => {
                Some(to) == self.root()
                    || self
                        .config()
                        .array_interfaces
                        .iter()
                        .any(|name| self.class(name) == Some(to))
            }
            (_, ClassFlavor::Array { .. }) => false,
            _ => self.is_subclass(from, to),
        }
    }

    /// Whether the class `sub` extends or implements `sup`, transitively.
    /// Every reference type is a subclass of the root type.
    pub fn is_subclass(&self, sub: DeclId, sup: DeclId) -> bool {
        if sub == sup || Some(sup) == self.root() {
            return true;
        }
        let mut queue = VecDeque::from([sub]);
        let mut seen = FxHashSet::default();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            let body = self.body(current);
            for &next in body.superclass.iter().chain(&body.interfaces) {
                let Some(raw) = self.raw_class(next) else {
                    continue;
                };
                if raw == sup {
                    return true;
                }
                queue.push_back(raw);
            }
        }
        false
    }

    /// Wrapper class of a primitive.
    pub fn boxed_class(&self, kind: PrimitiveKind) -> Option<DeclId> {
        self.class(kind.boxed_name()?)
    }

    /// `ty` itself, or its wrapper class when it is a primitive.
    pub fn boxed(&self, ty: DeclId) -> DeclId {
        match self.decl(ty).primitive() {
            Some(kind) => self.boxed_class(kind).unwrap_or(ty),
            None => ty,
        }
    }

    /// Primitive behind `ty`: itself when primitive, or the unboxed form of
    /// a wrapper class.
    pub fn unboxed(&self, ty: DeclId) -> Option<PrimitiveKind> {
        let decl = self.decl(ty);
        match decl.primitive() {
            Some(kind) => Some(kind),
            None => {
                decl.as_class()?;
                PrimitiveKind::from_boxed_name(&decl.canonical)
            }
        }
    }

    /// Least common ancestor of two types, as used for `c ? a : b`.
    ///
    /// Primitives promote numerically; a primitive meeting a reference type
    /// is boxed first. For references the nearest common superclass (other
    /// than the root) wins, then a common interface, then the root type.
    pub fn common_ancestor(&self, a: Option<DeclId>, b: Option<DeclId>) -> Option<DeclId> {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (Some(x), None) | (None, Some(x)) => return Some(x),
            (None, None) => return None,
        };
        if a == b {
            return Some(a);
        }

        let (pa, pb) = (self.decl(a).primitive(), self.decl(b).primitive());
        if let (Some(pa), Some(pb)) = (pa, pb)
            && let Some(promoted) = pa.promote(pb)
        {
            return Some(self.primitive(promoted));
        }

        let (a, b) = (self.boxed(a), self.boxed(b));
        if self.decl(a).is_null_type() {
            return Some(b);
        }
        if self.decl(b).is_null_type() {
            return Some(a);
        }
        if self.assignable(a, b, 0) {
            return Some(b);
        }
        if self.assignable(b, a, 0) {
            return Some(a);
        }

        let root = self.root();
        let mut current = self.superclass_of(a);
        let mut steps = 0;
        while let Some(class) = current {
            if self.raw_class(class) == root || steps > MAX_DEPTH {
                break;
            }
            if self.assignable(b, class, 0) {
                return Some(class);
            }
            current = self.superclass_of(class);
            steps += 1;
        }

        let mut queue: VecDeque<DeclId> = self.supertypes(a).into();
        let mut seen = FxHashSet::default();
        while let Some(ty) = queue.pop_front() {
            if !seen.insert(ty) {
                continue;
            }
            let is_interface = self
                .raw_class(ty)
                .is_some_and(|raw| self.decl(raw).is_interface());
            if is_interface && self.assignable(b, ty, 0) {
                return Some(ty);
            }
            queue.extend(self.supertypes(ty));
        }

        root
    }
}
