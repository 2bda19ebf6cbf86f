//! Node kinds of the syntax tree.
//!
//! Every node kind is a variant of [`NodeKind`]. Child references are typed
//! [`NodeId`] fields so resolution rules can pattern-match on structure
//! directly; the flat, source-ordered child list lives on the node itself.

use smol_str::SmolStr;

use super::tree::NodeId;
use crate::base::{ClassKind, Modifiers};

/// Literal values.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Char(char),
    Bool(bool),
    Str(SmolStr),
    Null,
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Comparison and logical operators always produce `boolean`.
    pub fn is_boolean_valued(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr)
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// The kind of a syntax node together with its typed child references.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A source file. Children: optional package, imports, type declarations.
    CompilationUnit,
    PackageDecl {
        path: SmolStr,
    },
    /// `import a.b.C;`, `import a.b.*;`, `import static a.b.C.m;`
    Import {
        path: SmolStr,
        is_static: bool,
        on_demand: bool,
    },
    /// Class, interface or enum. For interfaces the extended interfaces
    /// are listed in `implements`.
    ClassDecl {
        name: SmolStr,
        kind: ClassKind,
        modifiers: Modifiers,
        type_params: Vec<NodeId>,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    EnumConstant {
        name: SmolStr,
        args: Vec<NodeId>,
    },
    FieldDecl {
        name: SmolStr,
        modifiers: Modifiers,
        ty: NodeId,
        init: Option<NodeId>,
    },
    MethodDecl {
        name: SmolStr,
        modifiers: Modifiers,
        type_params: Vec<NodeId>,
        ret: NodeId,
        params: Vec<NodeId>,
        body: Option<NodeId>,
    },
    ConstructorDecl {
        modifiers: Modifiers,
        type_params: Vec<NodeId>,
        params: Vec<NodeId>,
        body: Option<NodeId>,
    },
    /// Formal parameter. `ty` is `None` for implicitly typed lambda parameters.
    Param {
        name: SmolStr,
        ty: Option<NodeId>,
        varargs: bool,
    },
    TypeParameter {
        name: SmolStr,
        bound: Option<NodeId>,
    },
    /// A type use. `name` may be dotted (`Map.Entry`); `var` is the
    /// inferred local type and `?` a wildcard argument.
    TypeRef {
        name: SmolStr,
        args: Vec<NodeId>,
        diamond: bool,
        dims: u8,
    },
    Block {
        stmts: Vec<NodeId>,
    },
    LocalVarDecl {
        name: SmolStr,
        ty: NodeId,
        init: Option<NodeId>,
    },
    ExprStmt {
        expr: NodeId,
    },
    Return {
        expr: Option<NodeId>,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    For {
        init: Vec<NodeId>,
        cond: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    /// `for (T x : iterable) body`; `var` is a `LocalVarDecl` without initializer.
    ForEach {
        var: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    /// A simple identifier, including `this` and `super`.
    Name {
        name: SmolStr,
    },
    /// `target.name`, also `X.class` and `Outer.this`.
    FieldAccess {
        target: NodeId,
        name: SmolStr,
    },
    MethodCall {
        target: Option<NodeId>,
        name: SmolStr,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    New {
        ty: NodeId,
        args: Vec<NodeId>,
    },
    /// `new T[n][]` has one `dims` expression and one `extra_dims`.
    NewArray {
        elem: NodeId,
        dims: Vec<NodeId>,
        extra_dims: u8,
        init: Option<NodeId>,
    },
    ArrayInit {
        elements: Vec<NodeId>,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    Literal(Literal),
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    /// Plain (`op == None`) or compound assignment.
    Assign {
        target: NodeId,
        op: Option<BinaryOp>,
        value: NodeId,
    },
    Conditional {
        cond: NodeId,
        then_expr: NodeId,
        else_expr: NodeId,
    },
    Cast {
        ty: NodeId,
        expr: NodeId,
    },
    InstanceOf {
        expr: NodeId,
        ty: NodeId,
    },
    Lambda {
        params: Vec<NodeId>,
        body: NodeId,
    },
}

impl NodeKind {
    /// The declared or referenced name, if the kind carries one.
    pub fn name(&self) -> Option<&SmolStr> {
        match self {
            NodeKind::PackageDecl { path } => Some(path),
            NodeKind::Import { path, .. } => Some(path),
            NodeKind::ClassDecl { name, .. }
            | NodeKind::EnumConstant { name, .. }
            | NodeKind::FieldDecl { name, .. }
            | NodeKind::MethodDecl { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::TypeParameter { name, .. }
            | NodeKind::TypeRef { name, .. }
            | NodeKind::LocalVarDecl { name, .. }
            | NodeKind::Name { name }
            | NodeKind::FieldAccess { name, .. }
            | NodeKind::MethodCall { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Typed child references in source order.
    pub fn child_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::CompilationUnit
            | NodeKind::PackageDecl { .. }
            | NodeKind::Import { .. }
            | NodeKind::Name { .. }
            | NodeKind::Literal(_) => {}
            NodeKind::ClassDecl {
                type_params,
                extends,
                implements,
                members,
                ..
            } => {
                out.extend(type_params);
                out.extend(extends);
                out.extend(implements);
                out.extend(members);
            }
            NodeKind::EnumConstant { args, .. } => out.extend(args),
            NodeKind::FieldDecl { ty, init, .. } => {
                out.push(*ty);
                out.extend(init);
            }
            NodeKind::MethodDecl {
                type_params,
                ret,
                params,
                body,
                ..
            } => {
                out.extend(type_params);
                out.push(*ret);
                out.extend(params);
                out.extend(body);
            }
            NodeKind::ConstructorDecl {
                type_params,
                params,
                body,
                ..
            } => {
                out.extend(type_params);
                out.extend(params);
                out.extend(body);
            }
            NodeKind::Param { ty, .. } => out.extend(ty),
            NodeKind::TypeParameter { bound, .. } => out.extend(bound),
            NodeKind::TypeRef { args, .. } => out.extend(args),
            NodeKind::Block { stmts } => out.extend(stmts),
            NodeKind::LocalVarDecl { ty, init, .. } => {
                out.push(*ty);
                out.extend(init);
            }
            NodeKind::ExprStmt { expr } => out.push(*expr),
            NodeKind::Return { expr } => out.extend(expr),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(*cond);
                out.push(*then_branch);
                out.extend(else_branch);
            }
            NodeKind::While { cond, body } => {
                out.push(*cond);
                out.push(*body);
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(cond);
                out.extend(update);
                out.push(*body);
            }
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => {
                out.push(*var);
                out.push(*iterable);
                out.push(*body);
            }
            NodeKind::FieldAccess { target, .. } => out.push(*target),
            NodeKind::MethodCall {
                target,
                type_args,
                args,
                ..
            } => {
                out.extend(target);
                out.extend(type_args);
                out.extend(args);
            }
            NodeKind::New { ty, args } => {
                out.push(*ty);
                out.extend(args);
            }
            NodeKind::NewArray {
                elem, dims, init, ..
            } => {
                out.push(*elem);
                out.extend(dims);
                out.extend(init);
            }
            NodeKind::ArrayInit { elements } => out.extend(elements),
            NodeKind::ArrayAccess { array, index } => {
                out.push(*array);
                out.push(*index);
            }
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::Unary { operand, .. } => out.push(*operand),
            NodeKind::Assign { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            NodeKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                out.push(*cond);
                out.push(*then_expr);
                out.push(*else_expr);
            }
            NodeKind::Cast { ty, expr } => {
                out.push(*ty);
                out.push(*expr);
            }
            NodeKind::InstanceOf { expr, ty } => {
                out.push(*expr);
                out.push(*ty);
            }
            NodeKind::Lambda { params, body } => {
                out.extend(params);
                out.push(*body);
            }
        }
        out
    }

    /// Rewrite every typed child reference equal to `old`.
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) {
        let swap = |slot: &mut NodeId| {
            if *slot == old {
                *slot = new;
            }
        };
        let swap_opt = |slot: &mut Option<NodeId>| {
            if *slot == Some(old) {
                *slot = Some(new);
            }
        };
        let swap_vec = |slots: &mut Vec<NodeId>| {
            for slot in slots.iter_mut() {
                if *slot == old {
                    *slot = new;
                }
            }
        };
        match self {
            NodeKind::CompilationUnit
            | NodeKind::PackageDecl { .. }
            | NodeKind::Import { .. }
            | NodeKind::Name { .. }
            | NodeKind::Literal(_) => {}
            NodeKind::ClassDecl {
                type_params,
                extends,
                implements,
                members,
                ..
            } => {
                swap_vec(type_params);
                swap_opt(extends);
                swap_vec(implements);
                swap_vec(members);
            }
            NodeKind::EnumConstant { args, .. } => swap_vec(args),
            NodeKind::FieldDecl { ty, init, .. } | NodeKind::LocalVarDecl { ty, init, .. } => {
                swap(ty);
                swap_opt(init);
            }
            NodeKind::MethodDecl {
                type_params,
                ret,
                params,
                body,
                ..
            } => {
                swap_vec(type_params);
                swap(ret);
                swap_vec(params);
                swap_opt(body);
            }
            NodeKind::ConstructorDecl {
                type_params,
                params,
                body,
                ..
            } => {
                swap_vec(type_params);
                swap_vec(params);
                swap_opt(body);
            }
            NodeKind::Param { ty, .. } => swap_opt(ty),
            NodeKind::TypeParameter { bound, .. } => swap_opt(bound),
            NodeKind::TypeRef { args, .. } => swap_vec(args),
            NodeKind::Block { stmts } => swap_vec(stmts),
            NodeKind::ExprStmt { expr } => swap(expr),
            NodeKind::Return { expr } => swap_opt(expr),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                swap(cond);
                swap(then_branch);
                swap_opt(else_branch);
            }
            NodeKind::While { cond, body } => {
                swap(cond);
                swap(body);
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                swap_vec(init);
                swap_opt(cond);
                swap_vec(update);
                swap(body);
            }
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => {
                swap(var);
                swap(iterable);
                swap(body);
            }
            NodeKind::FieldAccess { target, .. } => swap(target),
            NodeKind::MethodCall {
                target,
                type_args,
                args,
                ..
            } => {
                swap_opt(target);
                swap_vec(type_args);
                swap_vec(args);
            }
            NodeKind::New { ty, args } => {
                swap(ty);
                swap_vec(args);
            }
            NodeKind::NewArray {
                elem, dims, init, ..
            } => {
                swap(elem);
                swap_vec(dims);
                swap_opt(init);
            }
            NodeKind::ArrayInit { elements } => swap_vec(elements),
            NodeKind::ArrayAccess { array, index } => {
                swap(array);
                swap(index);
            }
            NodeKind::Binary { lhs, rhs, .. } => {
                swap(lhs);
                swap(rhs);
            }
            NodeKind::Unary { operand, .. } => swap(operand),
            NodeKind::Assign { target, value, .. } => {
                swap(target);
                swap(value);
            }
            NodeKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                swap(cond);
                swap(then_expr);
                swap(else_expr);
            }
            NodeKind::Cast { ty, expr } | NodeKind::InstanceOf { expr, ty } => {
                swap(ty);
                swap(expr);
            }
            NodeKind::Lambda { params, body } => {
                swap_vec(params);
                swap(body);
            }
        }
    }

    /// Drop `old` from optional and list slots. Required slots keep the
    /// stale reference; the caller is expected to `replace` those instead.
    pub(crate) fn remove_child(&mut self, old: NodeId) {
        let clear_opt = |slot: &mut Option<NodeId>| {
            if *slot == Some(old) {
                *slot = None;
            }
        };
        let clear_vec = |slots: &mut Vec<NodeId>| slots.retain(|s| *s != old);
        match self {
            NodeKind::ClassDecl {
                type_params,
                extends,
                implements,
                members,
                ..
            } => {
                clear_vec(type_params);
                clear_opt(extends);
                clear_vec(implements);
                clear_vec(members);
            }
            NodeKind::EnumConstant { args, .. } => clear_vec(args),
            NodeKind::FieldDecl { init, .. } | NodeKind::LocalVarDecl { init, .. } => {
                clear_opt(init)
            }
            NodeKind::MethodDecl {
                type_params,
                params,
                body,
                ..
            }
            | NodeKind::ConstructorDecl {
                type_params,
                params,
                body,
                ..
            } => {
                clear_vec(type_params);
                clear_vec(params);
                clear_opt(body);
            }
            NodeKind::Param { ty, .. } => clear_opt(ty),
            NodeKind::TypeParameter { bound, .. } => clear_opt(bound),
            NodeKind::TypeRef { args, .. } => clear_vec(args),
            NodeKind::Block { stmts } => clear_vec(stmts),
            NodeKind::Return { expr } => clear_opt(expr),
            NodeKind::If { else_branch, .. } => clear_opt(else_branch),
            NodeKind::For {
                init, cond, update, ..
            } => {
                clear_vec(init);
                clear_opt(cond);
                clear_vec(update);
            }
            NodeKind::MethodCall {
                target,
                type_args,
                args,
                ..
            } => {
                clear_opt(target);
                clear_vec(type_args);
                clear_vec(args);
            }
            NodeKind::New { args, .. } => clear_vec(args),
            NodeKind::NewArray { dims, init, .. } => {
                clear_vec(dims);
                clear_opt(init);
            }
            NodeKind::ArrayInit { elements } => clear_vec(elements),
            NodeKind::Lambda { params, .. } => clear_vec(params),
            _ => {}
        }
    }
}
