//! Per-tree semantic queries.
//!
//! [`Semantics`] pairs one [`SyntaxTree`] with the project [`Resolver`] and
//! answers the two questions every node can be asked:
//!
//! - [`resolve_decl`](Semantics::resolve_decl): which declaration the node
//!   declares or refers to
//! - [`resolve_eval_type`](Semantics::resolve_eval_type): the type the node
//!   evaluates to
//!
//! Both are memoized in the tree. A request that re-enters a computation
//! still in progress gets `None`, which breaks cycles such as a lambda whose
//! target type depends on the call that contains it.

use smol_str::SmolStr;
use tracing::trace;

use super::ids::DeclId;
use super::index::Resolver;
use crate::base::ClassKind;
use crate::syntax::{Memo, NodeId, NodeKind, SyntaxTree};

/// Semantic view of one syntax tree.
#[derive(Clone, Copy, Debug)]
pub struct Semantics<'a> {
    tree: &'a SyntaxTree,
    resolver: &'a Resolver,
}

impl<'a> Semantics<'a> {
    pub fn new(tree: &'a SyntaxTree, resolver: &'a Resolver) -> Self {
        Self { tree, resolver }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    /// Declaration the node declares or refers to.
    pub fn resolve_decl(&self, node: NodeId) -> Option<DeclId> {
        match self.tree.decl_memo(node) {
            Some(Memo::Done(raw)) => return raw.map(DeclId::from_raw),
            Some(Memo::Pending) => {
                trace!("re-entrant declaration request for {:?}", node);
                return None;
            }
            None => {}
        }
        self.tree.set_decl_memo(node, Memo::Pending);
        let result = self.compute_decl(node);
        self.tree
            .set_decl_memo(node, Memo::Done(result.map(DeclId::into_raw)));
        result
    }

    /// Type the node evaluates to.
    pub fn resolve_eval_type(&self, node: NodeId) -> Option<DeclId> {
        match self.tree.eval_memo(node) {
            Some(Memo::Done(raw)) => return raw.map(DeclId::from_raw),
            Some(Memo::Pending) => {
                trace!("re-entrant type request for {:?}", node);
                return None;
            }
            None => {}
        }
        self.tree.set_eval_memo(node, Memo::Pending);
        let result = self.compute_eval(node);
        self.tree
            .set_eval_memo(node, Memo::Done(result.map(DeclId::into_raw)));
        result
    }

    // ========================================================================
    // SYNTACTIC HELPERS
    // ========================================================================

    pub(crate) fn kind(&self, node: NodeId) -> &'a NodeKind {
        self.tree.kind(node)
    }

    /// Package named by the compilation unit, empty for the default package.
    pub fn package_name(&self) -> SmolStr {
        let Some(root) = self.tree.root() else {
            return SmolStr::default();
        };
        self.tree
            .children(root)
            .iter()
            .find_map(|&c| match self.kind(c) {
                NodeKind::PackageDecl { path } => Some(path.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Canonical name of the class declared by a `ClassDecl` node.
    ///
    /// Member classes are `Outer.Inner`; classes declared inside a method
    /// body are `Outer$Local`.
    pub fn class_canonical(&self, node: NodeId) -> Option<SmolStr> {
        let NodeKind::ClassDecl { name, .. } = self.kind(node) else {
            return None;
        };
        let outer = self.enclosing_class(node);
        Some(match outer {
            Some(outer) => {
                let outer_name = self.class_canonical(outer)?;
                let sep = if self.tree.parent(node) == Some(outer) { '.' } else { '$' };
                SmolStr::new(format!("{outer_name}{sep}{name}"))
            }
            None => {
                let package = self.package_name();
                if package.is_empty() {
                    name.clone()
                } else {
                    SmolStr::new(format!("{package}.{name}"))
                }
            }
        })
    }

    /// Innermost class declaration strictly enclosing `node`.
    pub fn enclosing_class(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .enclosing(node, |k| matches!(k, NodeKind::ClassDecl { .. }))
    }

    pub(crate) fn class_kind(&self, class_node: NodeId) -> Option<ClassKind> {
        match self.kind(class_node) {
            NodeKind::ClassDecl { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Argument types at a call site. Lambdas count as unknown: their type
    /// depends on the candidate being chosen.
    pub(crate) fn arg_types(&self, args: &[NodeId]) -> Vec<Option<DeclId>> {
        args.iter()
            .map(|&a| match self.kind(a) {
                NodeKind::Lambda { .. } => None,
                _ => self.resolve_eval_type(a),
            })
            .collect()
    }
}
