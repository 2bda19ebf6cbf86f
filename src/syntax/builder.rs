//! Construction API used by parsers (and tests) to build a [`SyntaxTree`].
//!
//! Children must be built before their parent. Unless overridden with
//! [`TreeBuilder::set_span`], every node consumes one offset unit in creation
//! order, and a parent spans from its first child to its own position. A
//! parser that emits nodes in source order therefore gets spans whose
//! relative order matches the text, which is all scoped lookup needs.

use smol_str::SmolStr;

use super::kind::{BinaryOp, Literal, NodeKind, UnaryOp};
use super::tree::{NodeId, SyntaxTree};
use crate::base::{ClassKind, FileId, Modifiers, TextRange, TextSize};

/// Pieces of a class, interface or enum declaration.
#[derive(Clone, Debug)]
pub struct ClassParts {
    pub name: SmolStr,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<NodeId>,
    pub extends: Option<NodeId>,
    pub implements: Vec<NodeId>,
    pub members: Vec<NodeId>,
}

impl ClassParts {
    fn with_kind(name: &str, kind: ClassKind) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            modifiers: Modifiers::PUBLIC,
            type_params: Vec::new(),
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    pub fn enumeration(name: &str) -> Self {
        Self::with_kind(name, ClassKind::Enum)
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn type_params(mut self, type_params: Vec<NodeId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn extends(mut self, ty: NodeId) -> Self {
        self.extends = Some(ty);
        self
    }

    pub fn implements(mut self, tys: Vec<NodeId>) -> Self {
        self.implements = tys;
        self
    }

    pub fn members(mut self, members: Vec<NodeId>) -> Self {
        self.members = members;
        self
    }
}

/// Pieces of a method declaration.
#[derive(Clone, Debug)]
pub struct MethodParts {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub type_params: Vec<NodeId>,
    pub ret: NodeId,
    pub params: Vec<NodeId>,
    pub body: Option<NodeId>,
}

impl MethodParts {
    pub fn new(name: &str, ret: NodeId) -> Self {
        Self {
            name: SmolStr::new(name),
            modifiers: Modifiers::PUBLIC,
            type_params: Vec::new(),
            ret,
            params: Vec::new(),
            body: None,
        }
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn type_params(mut self, type_params: Vec<NodeId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn params(mut self, params: Vec<NodeId>) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: NodeId) -> Self {
        self.body = Some(body);
        self
    }
}

/// Builds one [`SyntaxTree`].
pub struct TreeBuilder {
    tree: SyntaxTree,
    offset: u32,
}

impl TreeBuilder {
    pub fn new(file: FileId) -> Self {
        Self {
            tree: SyntaxTree::new(file),
            offset: 0,
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let own = self.offset;
        self.offset += 1;
        let start = kind
            .child_ids()
            .iter()
            .map(|&c| self.tree.span(c).start())
            .min()
            .unwrap_or(TextSize::from(own))
            .min(TextSize::from(own));
        let span = TextRange::new(start, TextSize::from(own + 1));
        self.tree.alloc(kind, span)
    }

    /// Override the span of an already built node.
    pub fn set_span(&mut self, node: NodeId, span: TextRange) {
        self.tree.set_span(node, span);
    }

    /// Wrap `items` (package, imports, types) in a compilation unit.
    pub fn finish(mut self, items: Vec<NodeId>) -> SyntaxTree {
        let root = self.push(NodeKind::CompilationUnit);
        let start = items
            .iter()
            .map(|&c| self.tree.span(c).start())
            .min()
            .unwrap_or(TextSize::from(0));
        let end = self.tree.span(root).end();
        self.tree.adopt(root, &items);
        self.tree.set_span(root, TextRange::new(start.min(end), end));
        self.tree.set_root(root);
        self.tree
    }

    // ========================================================================
    // FILE LEVEL
    // ========================================================================

    pub fn package(&mut self, path: &str) -> NodeId {
        self.push(NodeKind::PackageDecl {
            path: SmolStr::new(path),
        })
    }

    /// `import a.b.C;` or, with a trailing `.*`, `import a.b.*;`
    pub fn import(&mut self, path: &str) -> NodeId {
        self.import_kind(path, false)
    }

    pub fn static_import(&mut self, path: &str) -> NodeId {
        self.import_kind(path, true)
    }

    fn import_kind(&mut self, path: &str, is_static: bool) -> NodeId {
        let (path, on_demand) = match path.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (path, false),
        };
        self.push(NodeKind::Import {
            path: SmolStr::new(path),
            is_static,
            on_demand,
        })
    }

    // ========================================================================
    // DECLARATIONS
    // ========================================================================

    pub fn class(&mut self, parts: ClassParts) -> NodeId {
        self.push(NodeKind::ClassDecl {
            name: parts.name,
            kind: parts.kind,
            modifiers: parts.modifiers,
            type_params: parts.type_params,
            extends: parts.extends,
            implements: parts.implements,
            members: parts.members,
        })
    }

    pub fn enum_constant(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::EnumConstant {
            name: SmolStr::new(name),
            args,
        })
    }

    pub fn field(
        &mut self,
        modifiers: Modifiers,
        name: &str,
        ty: NodeId,
        init: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::FieldDecl {
            name: SmolStr::new(name),
            modifiers,
            ty,
            init,
        })
    }

    pub fn method(&mut self, parts: MethodParts) -> NodeId {
        self.push(NodeKind::MethodDecl {
            name: parts.name,
            modifiers: parts.modifiers,
            type_params: parts.type_params,
            ret: parts.ret,
            params: parts.params,
            body: parts.body,
        })
    }

    pub fn constructor(
        &mut self,
        modifiers: Modifiers,
        params: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::ConstructorDecl {
            modifiers,
            type_params: Vec::new(),
            params,
            body,
        })
    }

    pub fn param(&mut self, name: &str, ty: NodeId) -> NodeId {
        self.push(NodeKind::Param {
            name: SmolStr::new(name),
            ty: Some(ty),
            varargs: false,
        })
    }

    /// `T... name`; `ty` is the element type.
    pub fn varargs_param(&mut self, name: &str, ty: NodeId) -> NodeId {
        self.push(NodeKind::Param {
            name: SmolStr::new(name),
            ty: Some(ty),
            varargs: true,
        })
    }

    /// Implicitly typed lambda parameter.
    pub fn lambda_param(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Param {
            name: SmolStr::new(name),
            ty: None,
            varargs: false,
        })
    }

    pub fn type_param(&mut self, name: &str, bound: Option<NodeId>) -> NodeId {
        self.push(NodeKind::TypeParameter {
            name: SmolStr::new(name),
            bound,
        })
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    pub fn type_ref(&mut self, name: &str) -> NodeId {
        self.type_node(name, Vec::new(), false, 0)
    }

    pub fn generic_type(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        self.type_node(name, args, false, 0)
    }

    pub fn array_type(&mut self, name: &str, dims: u8) -> NodeId {
        self.type_node(name, Vec::new(), false, dims)
    }

    /// `Name<>` in an allocation.
    pub fn diamond_type(&mut self, name: &str) -> NodeId {
        self.type_node(name, Vec::new(), true, 0)
    }

    pub fn type_node(&mut self, name: &str, args: Vec<NodeId>, diamond: bool, dims: u8) -> NodeId {
        self.push(NodeKind::TypeRef {
            name: SmolStr::new(name),
            args,
            diamond,
            dims,
        })
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Block { stmts })
    }

    pub fn local_var(&mut self, name: &str, ty: NodeId, init: Option<NodeId>) -> NodeId {
        self.push(NodeKind::LocalVarDecl {
            name: SmolStr::new(name),
            ty,
            init,
        })
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.push(NodeKind::ExprStmt { expr })
    }

    pub fn ret(&mut self, expr: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Return { expr })
    }

    pub fn if_stmt(
        &mut self,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_stmt(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::While { cond, body })
    }

    pub fn for_stmt(
        &mut self,
        init: Vec<NodeId>,
        cond: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.push(NodeKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    pub fn for_each(&mut self, var: NodeId, iterable: NodeId, body: NodeId) -> NodeId {
        self.push(NodeKind::ForEach {
            var,
            iterable,
            body,
        })
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    pub fn name(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Name {
            name: SmolStr::new(name),
        })
    }

    pub fn field_access(&mut self, target: NodeId, name: &str) -> NodeId {
        self.push(NodeKind::FieldAccess {
            target,
            name: SmolStr::new(name),
        })
    }

    /// Build `a.b.c` as nested field accesses over a leading name.
    pub fn path(&mut self, dotted: &str) -> NodeId {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut node = self.name(first);
        for segment in segments {
            node = self.field_access(node, segment);
        }
        node
    }

    pub fn call(&mut self, target: Option<NodeId>, name: &str, args: Vec<NodeId>) -> NodeId {
        self.generic_call(target, name, Vec::new(), args)
    }

    pub fn generic_call(
        &mut self,
        target: Option<NodeId>,
        name: &str,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::MethodCall {
            target,
            name: SmolStr::new(name),
            type_args,
            args,
        })
    }

    pub fn new_object(&mut self, ty: NodeId, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::New { ty, args })
    }

    pub fn new_array(
        &mut self,
        elem: NodeId,
        dims: Vec<NodeId>,
        extra_dims: u8,
        init: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::NewArray {
            elem,
            dims,
            extra_dims,
            init,
        })
    }

    pub fn array_init(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ArrayInit { elements })
    }

    pub fn array_access(&mut self, array: NodeId, index: NodeId) -> NodeId {
        self.push(NodeKind::ArrayAccess { array, index })
    }

    pub fn literal(&mut self, literal: Literal) -> NodeId {
        self.push(NodeKind::Literal(literal))
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.literal(Literal::Int(value))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.literal(Literal::Str(SmolStr::new(value)))
    }

    pub fn null(&mut self) -> NodeId {
        self.literal(Literal::Null)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.push(NodeKind::Binary { op, lhs, rhs })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::Unary { op, operand })
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.push(NodeKind::Assign {
            target,
            op: None,
            value,
        })
    }

    pub fn compound_assign(&mut self, op: BinaryOp, target: NodeId, value: NodeId) -> NodeId {
        self.push(NodeKind::Assign {
            target,
            op: Some(op),
            value,
        })
    }

    pub fn conditional(&mut self, cond: NodeId, then_expr: NodeId, else_expr: NodeId) -> NodeId {
        self.push(NodeKind::Conditional {
            cond,
            then_expr,
            else_expr,
        })
    }

    pub fn cast(&mut self, ty: NodeId, expr: NodeId) -> NodeId {
        self.push(NodeKind::Cast { ty, expr })
    }

    pub fn instance_of(&mut self, expr: NodeId, ty: NodeId) -> NodeId {
        self.push(NodeKind::InstanceOf { expr, ty })
    }

    pub fn lambda(&mut self, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.push(NodeKind::Lambda { params, body })
    }
}
