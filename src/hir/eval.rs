//! Expression types.
//!
//! The evaluated type of a node is what the expression produces at run
//! time, as far as it can be known statically: a primitive, a class, a
//! parameterized type, an array or (for unresolved generic results) a type
//! variable. `None` means unknown.

use super::ids::DeclId;
use super::semantics::Semantics;
use super::symbols::{DeclKind, PrimitiveKind};
use crate::syntax::{BinaryOp, Literal, NodeId, NodeKind, UnaryOp};

impl Semantics<'_> {
    pub(crate) fn compute_eval(&self, node: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        match self.kind(node) {
            NodeKind::Literal(lit) => self.literal_type(lit),
            NodeKind::Name { name } => self.name_type(node, name),
            NodeKind::FieldAccess { target, name } => self.member_access_type(node, *target, name),
            NodeKind::MethodCall { .. } => self.call_type(node),
            NodeKind::New { .. } => self.new_type(node),
            NodeKind::TypeRef { .. } => {
                let decl = self.resolve_decl(node)?;
                match r.decl(decl).kind {
                    DeclKind::TypeVariable(_) => r.type_var_bound(decl),
                    _ => Some(decl),
                }
            }
            NodeKind::Binary { op, lhs, rhs } => self.binary_type(*op, *lhs, *rhs),
            NodeKind::Unary { op, operand } => self.unary_type(*op, *operand),
            NodeKind::Assign { target, .. } => self.resolve_eval_type(*target),
            NodeKind::Conditional {
                then_expr,
                else_expr,
                ..
            } => r.common_ancestor(
                self.resolve_eval_type(*then_expr),
                self.resolve_eval_type(*else_expr),
            ),
            NodeKind::Cast { ty, .. } => self.resolve_decl(*ty),
            NodeKind::InstanceOf { .. } => Some(r.primitive(PrimitiveKind::Boolean)),
            NodeKind::NewArray {
                elem,
                dims,
                extra_dims,
                ..
            } => {
                let element = self.resolve_decl(*elem)?;
                let depth = dims.len() + usize::from(*extra_dims);
                Some((0..depth).fold(element, |t, _| r.array_of(t)))
            }
            NodeKind::ArrayInit { .. } => self.array_init_type(node),
            NodeKind::ArrayAccess { array, .. } => {
                r.decl(self.resolve_eval_type(*array)?).array_element()
            }
            NodeKind::Lambda { .. } => self.lambda_target(node).map(|(iface, _)| iface),
            NodeKind::ClassDecl { .. } => self.resolve_decl(node).map(|c| r.self_type(c)),
            NodeKind::FieldDecl { .. }
            | NodeKind::EnumConstant { .. }
            | NodeKind::MethodDecl { .. }
            | NodeKind::ConstructorDecl { .. }
            | NodeKind::Param { .. }
            | NodeKind::LocalVarDecl { .. } => r.decl_eval_type(self.resolve_decl(node)?),
            _ => None,
        }
    }

    fn literal_type(&self, lit: &Literal) -> Option<DeclId> {
        let r = self.resolver();
        let kind = match lit {
            Literal::Int(_) => PrimitiveKind::Int,
            Literal::Long(_) => PrimitiveKind::Long,
            Literal::Float(_) => PrimitiveKind::Float,
            Literal::Double(_) => PrimitiveKind::Double,
            Literal::Char(_) => PrimitiveKind::Char,
            Literal::Bool(_) => PrimitiveKind::Boolean,
            Literal::Str(_) => return r.string_type(),
            Literal::Null => return Some(r.null_type()),
        };
        Some(r.primitive(kind))
    }

    fn name_type(&self, node: NodeId, name: &str) -> Option<DeclId> {
        let r = self.resolver();
        let decl = self.resolve_decl(node)?;
        match &r.decl(decl).kind {
            DeclKind::Class(_) if name == "this" => Some(r.self_type(decl)),
            DeclKind::Field(field) => {
                let ty = field.ty?;
                let class = self
                    .enclosing_class(node)
                    .and_then(|c| self.resolve_decl(c));
                Some(match class {
                    Some(class) => r.substitute(ty, r.self_type(class)),
                    None => ty,
                })
            }
            DeclKind::Package => None,
            _ => r.decl_eval_type(decl),
        }
    }

    fn member_access_type(&self, node: NodeId, target: NodeId, name: &str) -> Option<DeclId> {
        let r = self.resolver();
        let decl = self.resolve_decl(node)?;
        match &r.decl(decl).kind {
            DeclKind::Package => None,
            DeclKind::Class(info) if name == "class" => {
                if info.type_params.is_empty() {
                    return Some(decl);
                }
                let literal = r.boxed(self.resolve_decl(target)?);
                Some(r.parameterized(decl, vec![literal]))
            }
            DeclKind::Class(_) if name == "this" => Some(r.self_type(decl)),
            DeclKind::Field(field) => {
                let ty = field.ty?;
                if self.names_type(target) {
                    return Some(ty);
                }
                Some(match self.resolve_eval_type(target) {
                    Some(receiver) => r.substitute(ty, receiver),
                    None => ty,
                })
            }
            _ => r.decl_eval_type(decl),
        }
    }

    fn is_string(&self, ty: Option<DeclId>) -> bool {
        ty.is_some() && ty == self.resolver().string_type()
    }

    fn binary_type(&self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        if op.is_boolean_valued() {
            return Some(r.primitive(PrimitiveKind::Boolean));
        }
        let left = self.resolve_eval_type(lhs);
        let right = self.resolve_eval_type(rhs);
        if op == BinaryOp::Add && (self.is_string(left) || self.is_string(right)) {
            return r.string_type();
        }
        let left = left.and_then(|t| r.unboxed(t));
        if op.is_shift() {
            return left.map(|p| r.primitive(p));
        }
        let right = right.and_then(|t| r.unboxed(t));
        Some(r.primitive(left?.promote(right?)?))
    }

    fn unary_type(&self, op: UnaryOp, operand: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        match op {
            UnaryOp::Not => Some(r.primitive(PrimitiveKind::Boolean)),
            UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => {
                let kind = r.unboxed(self.resolve_eval_type(operand)?)?;
                Some(r.primitive(kind))
            }
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                self.resolve_eval_type(operand)
            }
        }
    }

    fn array_init_type(&self, node: NodeId) -> Option<DeclId> {
        let parent = self.tree().parent(node)?;
        match self.kind(parent) {
            NodeKind::NewArray { .. } => self.resolve_eval_type(parent),
            NodeKind::ArrayInit { .. } => {
                let outer = self.resolve_eval_type(parent)?;
                self.resolver().decl(outer).array_element()
            }
            _ => self.expected_type(node),
        }
    }

    /// Type the context of `node` requires: the declared type of the
    /// variable it initializes, the target it is assigned to, the return
    /// type it is returned as, or the type it is cast to.
    pub(crate) fn expected_type(&self, node: NodeId) -> Option<DeclId> {
        let parent = self.tree().parent(node)?;
        match self.kind(parent) {
            NodeKind::LocalVarDecl {
                ty, init: Some(init), ..
            }
            | NodeKind::FieldDecl {
                ty, init: Some(init), ..
            } if *init == node => {
                if self.is_inferred_type(*ty) {
                    None
                } else {
                    self.resolve_decl(*ty)
                }
            }
            NodeKind::Assign { target, value, .. } if *value == node => {
                self.resolve_eval_type(*target)
            }
            NodeKind::Return { .. } => self.return_type_at(parent),
            NodeKind::Lambda { body, .. } if *body == node => self.lambda_return_type(parent),
            NodeKind::Cast { ty, .. } => self.resolve_decl(*ty),
            NodeKind::Conditional {
                then_expr,
                else_expr,
                ..
            } if *then_expr == node || *else_expr == node => self.expected_type(parent),
            _ => None,
        }
    }

    /// Declared result type for a `return` at `node`: of the innermost
    /// lambda or method around it.
    fn return_type_at(&self, node: NodeId) -> Option<DeclId> {
        let owner = self.tree().ancestors(node).find(|&n| {
            matches!(
                self.kind(n),
                NodeKind::Lambda { .. } | NodeKind::MethodDecl { .. }
            )
        })?;
        match self.kind(owner) {
            NodeKind::MethodDecl { ret, .. } => self.resolve_decl(*ret),
            _ => self.lambda_return_type(owner),
        }
    }

    /// Element type of a for-each loop variable declared with `var`.
    pub(crate) fn for_each_element(&self, var: NodeId) -> Option<DeclId> {
        let parent = self.tree().parent(var)?;
        match self.kind(parent) {
            NodeKind::ForEach {
                var: v, iterable, ..
            } if *v == var => Some(self.iteration_element(self.resolve_eval_type(*iterable)?)),
            _ => None,
        }
    }

    /// Type of the elements produced by iterating over `ty`.
    pub fn iteration_element(&self, ty: DeclId) -> DeclId {
        let r = self.resolver();
        if let Some(element) = r.decl(ty).array_element() {
            return element;
        }
        let iterable = r.class(&r.config().iterable_type);
        let element = iterable
            .and_then(|it| r.as_super(ty, it))
            .and_then(|viewed| r.decl(viewed).as_parameterized()?.args.first().copied());
        element.or_else(|| r.root()).unwrap_or(ty)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::FileId;
    use crate::hir::type_source::{ClassMeta, MemoryTypeSource};
    use crate::hir::Resolver;
    use crate::syntax::TreeBuilder;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            MemoryTypeSource::new()
                .with(ClassMeta::class("java.lang.Object"))
                .with(ClassMeta::class("java.lang.String"))
                .with(ClassMeta::class("java.lang.Integer"))
                .with(ClassMeta::class("java.lang.Long")),
        ))
    }

    #[test]
    fn test_literal_and_arithmetic_types() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let one = b.int(1);
        let big = b.literal(Literal::Long(2));
        let sum = b.binary(BinaryOp::Add, one, big);
        let s = b.string("a");
        let two = b.int(2);
        let concat = b.binary(BinaryOp::Add, s, two);
        let three = b.int(3);
        let four = b.int(4);
        let less = b.binary(BinaryOp::Lt, three, four);
        let c = b.literal(Literal::Char('c'));
        let neg = b.unary(UnaryOp::Neg, c);
        let tree = b.finish(vec![sum, concat, less, neg]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        let prim = |k| Some(r.primitive(k));
        assert_eq!(sema.resolve_eval_type(sum), prim(PrimitiveKind::Long));
        assert_eq!(sema.resolve_eval_type(concat), r.string_type());
        assert_eq!(sema.resolve_eval_type(less), prim(PrimitiveKind::Boolean));
        assert_eq!(sema.resolve_eval_type(neg), prim(PrimitiveKind::Char));
    }

    #[test]
    fn test_conditional_uses_common_ancestor() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let cond = b.literal(Literal::Bool(true));
        let one = b.int(1);
        let null = b.null();
        let pick = b.conditional(cond, one, null);
        let tree = b.finish(vec![pick]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        assert_eq!(sema.resolve_eval_type(pick), r.class("java.lang.Integer"));
    }

    #[test]
    fn test_conditional_promotes_by_rank() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let cond = b.literal(Literal::Bool(false));
        let short = b.type_ref("short");
        let one = b.int(1);
        let narrowed = b.cast(short, one);
        let c = b.literal(Literal::Char('c'));
        let pick = b.conditional(cond, narrowed, c);
        let tree = b.finish(vec![pick]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        assert_eq!(sema.resolve_eval_type(pick), Some(r.primitive(PrimitiveKind::Short)));
    }

    #[test]
    fn test_array_expressions() {
        let mut b = TreeBuilder::new(FileId::new(0));
        let elem = b.type_ref("int");
        let n = b.int(3);
        let arr = b.new_array(elem, vec![n], 1, None);
        let zero = b.int(0);
        let access = b.array_access(arr, zero);
        let tree = b.finish(vec![access]);

        let r = resolver();
        let sema = Semantics::new(&tree, &r);
        assert_eq!(r.display(sema.resolve_eval_type(arr).unwrap()), "int[][]");
        assert_eq!(r.display(sema.resolve_eval_type(access).unwrap()), "int[]");
    }
}
