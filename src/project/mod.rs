//! Project: the source files of one program and the resolver over them.
//!
//! A [`Project`] owns the syntax trees handed over by the parser and keeps
//! the resolver's source overlay in step with them. Every change to the
//! file set re-lowers all class declarations (header pass over every tree,
//! then member pass), so cross-file references resolve regardless of the
//! order files were added in. Declarations whose header did not change keep
//! their identity across updates.

pub mod stdlib_loader;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::debug;

use crate::base::FileId;
use crate::hir::{
    Diagnostic, Resolver, ResolverConfig, Semantics, SourceRoot, TypeSource, check_file,
    declare_classes, define_classes,
};
use crate::syntax::{NodeId, SyntaxTree};

pub struct Project {
    resolver: Resolver,
    source_root: SourceRoot,
    trees: IndexMap<FileId, SyntaxTree>,
    /// Classes each file declared at the last lowering.
    declared: FxHashMap<FileId, Vec<SmolStr>>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("files", &self.trees.len())
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Project {
    pub fn new(source: Arc<dyn TypeSource>) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    pub fn with_config(source: Arc<dyn TypeSource>, config: ResolverConfig) -> Self {
        Self {
            resolver: Resolver::with_config(source, config),
            source_root: SourceRoot::new(),
            trees: IndexMap::new(),
            declared: FxHashMap::default(),
        }
    }

    /// A project over the built-in core library.
    pub fn with_core_library() -> Self {
        Self::new(Arc::new(stdlib_loader::core_library()))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn source_root(&self) -> &SourceRoot {
        &self.source_root
    }

    /// File id for `path`. Build the tree for that path with this id.
    pub fn file_id(&mut self, path: &str) -> FileId {
        self.source_root.file_for(path)
    }

    /// Add or replace the tree of `tree.file()`.
    pub fn set_file(&mut self, tree: SyntaxTree) {
        self.trees.insert(tree.file(), tree);
        self.relower();
    }

    pub fn remove_file(&mut self, file: FileId) -> Option<SyntaxTree> {
        let tree = self.trees.shift_remove(&file)?;
        self.source_root.remove(file);
        self.relower();
        Some(tree)
    }

    pub fn tree(&self, file: FileId) -> Option<&SyntaxTree> {
        self.trees.get(&file)
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.trees.keys().copied()
    }

    /// Resolution entry point for one file.
    pub fn semantics(&self, file: FileId) -> Option<Semantics<'_>> {
        self.tree(file).map(|tree| Semantics::new(tree, &self.resolver))
    }

    pub fn unused_imports(&self, file: FileId) -> Vec<NodeId> {
        self.semantics(file)
            .map(|sema| sema.unused_imports())
            .unwrap_or_default()
    }

    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        self.semantics(file).map(check_file).unwrap_or_default()
    }

    pub fn all_diagnostics(&self) -> Vec<Diagnostic> {
        self.files().flat_map(|file| self.diagnostics(file)).collect()
    }

    fn relower(&mut self) {
        let mut declared = FxHashMap::default();
        for (&file, tree) in &self.trees {
            declared.insert(file, declare_classes(tree, &self.resolver));
        }

        let live: FxHashSet<&SmolStr> = declared.values().flatten().collect();
        for stale in self.declared.values().flatten() {
            if !live.contains(stale) {
                self.resolver.remove_source_class(stale);
            }
        }

        for tree in self.trees.values() {
            define_classes(tree, &self.resolver);
        }
        for tree in self.trees.values() {
            tree.clear_caches();
        }
        debug!(
            "lowered {} classes from {} files",
            live.len(),
            self.trees.len()
        );
        self.declared = declared;
    }
}
