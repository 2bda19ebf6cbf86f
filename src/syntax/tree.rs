//! Arena-backed syntax tree with per-node resolution caches.
//!
//! Nodes live in a [`la_arena::Arena`] and are addressed by [`NodeId`].
//! Each node stores its parent handle and its children in source order,
//! so resolution can walk up the parent chain without back-pointers.
//!
//! The tree also owns the memo tables the resolution engine fills in.
//! Every structural edit clears them.

use std::cell::RefCell;

use indexmap::IndexSet;
use la_arena::{Arena, ArenaMap, Idx};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::kind::NodeKind;
use crate::base::{FileId, RangeExt, TextRange, TextSize};

/// Handle of a node inside one [`SyntaxTree`].
pub type NodeId = Idx<NodeData>;

/// A single syntax node.
#[derive(Clone, Debug)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub span: TextRange,
}

/// State of one memo slot.
///
/// Values are opaque `u32` handles; the semantic layer owns their meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Memo {
    /// Computation in progress. A re-entrant request sees `None`.
    Pending,
    Done(Option<u32>),
}

#[derive(Default)]
struct Caches {
    decl: ArenaMap<NodeId, Memo>,
    eval: ArenaMap<NodeId, Memo>,
    /// Import node → simple names resolved through it.
    import_uses: FxHashMap<NodeId, IndexSet<SmolStr>>,
}

/// A parsed compilation unit.
pub struct SyntaxTree {
    file: FileId,
    nodes: Arena<NodeData>,
    root: Option<NodeId>,
    caches: RefCell<Caches>,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("file", &self.file)
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}

impl SyntaxTree {
    /// Create an empty tree for `file`.
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            nodes: Arena::default(),
            root: None,
            caches: RefCell::new(Caches::default()),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// The compilation unit, once the builder has finished.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Allocate a node and adopt its typed children.
    pub(crate) fn alloc(&mut self, kind: NodeKind, span: TextRange) -> NodeId {
        let children = kind.child_ids();
        let id = self.nodes.alloc(NodeData {
            kind,
            parent: None,
            children: children.clone(),
            span,
        });
        for child in children {
            self.nodes[child].parent = Some(id);
        }
        id
    }

    /// Attach extra (untyped) children, used for compilation-unit items.
    pub(crate) fn adopt(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.nodes[child].parent = Some(parent);
            self.nodes[parent].children.push(child);
        }
    }

    pub(crate) fn set_span(&mut self, node: NodeId, span: TextRange) {
        self.nodes[node].span = span;
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn span(&self, id: NodeId) -> TextRange {
        self.nodes[id].span
    }

    /// Declared or referenced name of the node.
    pub fn name(&self, id: NodeId) -> Option<&SmolStr> {
        self.nodes[id].kind.name()
    }

    /// Strict ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Innermost strict ancestor matching `pred`.
    pub fn enclosing(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&n| pred(self.kind(n)))
    }

    /// `node` and everything below it, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// All nodes reachable from the root, in pre-order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.root.map(|r| self.descendants(r)).unwrap_or_default()
    }

    /// True when `node` is `ancestor` or lies below it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Innermost attached node whose span covers `offset`.
    pub fn covering_node(&self, offset: TextSize) -> Option<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|&n| self.span(n).covers(offset))
            .min_by_key(|&n| self.span(n).len())
    }

    // ========================================================================
    // STRUCTURAL EDITS
    // ========================================================================

    /// Unlink `node` from its parent. The node stays in the arena but is no
    /// longer reachable. Required slots of the parent keep the stale handle;
    /// use [`replace`](Self::replace) for those.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            let data = &mut self.nodes[parent];
            data.kind.remove_child(node);
            data.children.retain(|&c| c != node);
        }
        if self.root == Some(node) {
            self.root = None;
        }
        self.clear_caches();
    }

    /// Put the freshly built `new` where `old` was.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let parent = self.nodes[old].parent.take();
        if let Some(parent) = parent {
            let data = &mut self.nodes[parent];
            data.kind.replace_child(old, new);
            for slot in data.children.iter_mut() {
                if *slot == old {
                    *slot = new;
                }
            }
        }
        self.nodes[new].parent = parent;
        if self.root == Some(old) {
            self.root = Some(new);
        }
        self.clear_caches();
    }

    /// Forget every memoized declaration, type and import use.
    pub fn clear_caches(&self) {
        *self.caches.borrow_mut() = Caches::default();
    }

    // ========================================================================
    // MEMO TABLES
    // ========================================================================

    pub(crate) fn decl_memo(&self, node: NodeId) -> Option<Memo> {
        self.caches.borrow().decl.get(node).copied()
    }

    pub(crate) fn set_decl_memo(&self, node: NodeId, memo: Memo) {
        self.caches.borrow_mut().decl.insert(node, memo);
    }

    pub(crate) fn eval_memo(&self, node: NodeId) -> Option<Memo> {
        self.caches.borrow().eval.get(node).copied()
    }

    pub(crate) fn set_eval_memo(&self, node: NodeId, memo: Memo) {
        self.caches.borrow_mut().eval.insert(node, memo);
    }

    /// Record that `name` was resolved through `import`.
    pub(crate) fn record_import_use(&self, import: NodeId, name: &str) {
        self.caches
            .borrow_mut()
            .import_uses
            .entry(import)
            .or_default()
            .insert(SmolStr::new(name));
    }

    /// Names resolved through `import` since the last cache clear.
    pub fn import_uses(&self, import: NodeId) -> Vec<SmolStr> {
        self.caches
            .borrow()
            .import_uses
            .get(&import)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TreeBuilder;

    fn sample() -> (SyntaxTree, NodeId, NodeId) {
        let mut b = TreeBuilder::new(FileId::new(0));
        let x = b.name("x");
        let stmt = b.expr_stmt(x);
        let block = b.block(vec![stmt]);
        (b.finish(vec![]), block, x)
    }

    #[test]
    fn test_parent_links() {
        let (tree, block, x) = sample();
        let stmt = tree.parent(x).unwrap();
        assert_eq!(tree.parent(stmt), Some(block));
        assert!(tree.is_within(x, block));
        assert_eq!(tree.ancestors(x).collect::<Vec<_>>(), vec![stmt, block]);
    }

    #[test]
    fn test_memo_cleared_by_edit() {
        let (mut tree, block, x) = sample();
        tree.set_decl_memo(x, Memo::Done(Some(7)));
        assert_eq!(tree.decl_memo(x), Some(Memo::Done(Some(7))));

        let stmt = tree.parent(x).unwrap();
        tree.detach(stmt);
        assert_eq!(tree.decl_memo(x), None);
        assert!(tree.children(block).is_empty());
        assert!(matches!(tree.kind(block), NodeKind::Block { stmts } if stmts.is_empty()));
    }

    #[test]
    fn test_replace_rewrites_typed_slot() {
        let (mut tree, _block, x) = sample();
        let stmt = tree.parent(x).unwrap();
        let y = tree.alloc(
            NodeKind::Name {
                name: SmolStr::new("y"),
            },
            TextRange::empty(TextSize::from(100)),
        );
        tree.replace(x, y);
        assert_eq!(tree.parent(y), Some(stmt));
        assert_eq!(tree.parent(x), None);
        assert!(matches!(tree.kind(stmt), NodeKind::ExprStmt { expr } if *expr == y));
    }

    #[test]
    fn test_import_uses_recorded() {
        let (tree, _block, x) = sample();
        tree.record_import_use(x, "List");
        tree.record_import_use(x, "List");
        assert_eq!(tree.import_uses(x), vec![SmolStr::new("List")]);
        tree.clear_caches();
        assert!(tree.import_uses(x).is_empty());
    }
}
