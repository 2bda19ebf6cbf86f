//! Import resolution and unused-import detection.
//!
//! Type names not declared in the compilation unit are looked up in this
//! order: single-type imports, the unit's own package, explicit on-demand
//! imports, then the configured implicit imports. Every successful lookup
//! through an import records the simple name on that import node, which is
//! what unused-import detection reads back.

use smol_str::SmolStr;
use tracing::debug;

use super::ids::DeclId;
use super::semantics::Semantics;
use crate::base::Modifiers;
use crate::syntax::{NodeId, NodeKind};

/// An import declaration, borrowed from the tree.
#[derive(Clone, Copy, Debug)]
struct ImportRef<'t> {
    node: NodeId,
    path: &'t SmolStr,
    is_static: bool,
    on_demand: bool,
}

impl ImportRef<'_> {
    /// Last segment of a single import.
    fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(self.path)
    }

    /// Everything before the last segment.
    fn owner(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(owner, _)| owner)
    }
}

impl<'a> Semantics<'a> {
    fn imports(&self, unit: NodeId) -> Vec<ImportRef<'a>> {
        let tree = self.tree();
        tree.children(unit)
            .iter()
            .filter_map(|&node| match tree.kind(node) {
                NodeKind::Import {
                    path,
                    is_static,
                    on_demand,
                } => Some(ImportRef {
                    node,
                    path,
                    is_static: *is_static,
                    on_demand: *on_demand,
                }),
                _ => None,
            })
            .collect()
    }

    fn record(&self, import: &ImportRef<'_>, name: &str) {
        self.tree().record_import_use(import.node, name);
    }

    /// Type `name` as visible through the imports of `unit`.
    pub(crate) fn lookup_imported_type(&self, unit: NodeId, name: &str) -> Option<DeclId> {
        let r = self.resolver();
        let imports = self.imports(unit);

        for import in imports.iter().filter(|i| !i.on_demand) {
            if import.simple_name() != name {
                continue;
            }
            let found = if import.is_static {
                import
                    .owner()
                    .and_then(|owner| r.class(owner))
                    .and_then(|class| r.inner_class_deep(class, name))
            } else {
                r.class(import.path)
            };
            if let Some(found) = found {
                self.record(import, name);
                return Some(found);
            }
        }

        let package = self.package_name();
        let local = if package.is_empty() {
            r.class(name)
        } else {
            r.class(&format!("{package}.{name}"))
        };
        if local.is_some() {
            return local;
        }

        for import in imports.iter().filter(|i| i.on_demand) {
            let found = if import.is_static {
                r.class(import.path)
                    .and_then(|class| r.inner_class_deep(class, name))
            } else {
                r.class(&format!("{}.{name}", import.path))
            };
            if let Some(found) = found {
                self.record(import, name);
                return Some(found);
            }
        }

        r.config()
            .implicit_imports
            .iter()
            .find_map(|package| r.class(&format!("{package}.{name}")))
    }

    /// Static field `name` imported into `unit`.
    pub(crate) fn lookup_static_import(&self, unit: NodeId, name: &str) -> Option<DeclId> {
        let r = self.resolver();
        let imports = self.imports(unit);
        let single = imports
            .iter()
            .filter(|i| i.is_static && !i.on_demand && i.simple_name() == name);
        let on_demand = imports.iter().filter(|i| i.is_static && i.on_demand);

        for import in single {
            let field = import
                .owner()
                .and_then(|owner| r.class(owner))
                .and_then(|class| r.field_deep(class, name));
            if let Some(field) = field {
                self.record(import, name);
                return Some(field);
            }
        }
        for import in on_demand {
            let field = r.class(import.path).and_then(|class| r.field_deep(class, name));
            if let Some(field) = field {
                self.record(import, name);
                return Some(field);
            }
        }
        None
    }

    /// Static methods named `name` imported into the unit containing `call`,
    /// with the class declaring them.
    pub(crate) fn static_import_methods(
        &self,
        call: NodeId,
        name: &str,
    ) -> (Vec<DeclId>, Option<DeclId>) {
        let Some(unit) = self.tree().root() else {
            return (Vec::new(), None);
        };
        let r = self.resolver();
        let imports = self.imports(unit);
        let single = imports
            .iter()
            .filter(|i| i.is_static && !i.on_demand && i.simple_name() == name)
            .filter_map(|i| Some((i, r.class(i.owner()?)?)));
        let on_demand = imports
            .iter()
            .filter(|i| i.is_static && i.on_demand)
            .filter_map(|i| Some((i, r.class(i.path)?)));

        for (import, class) in single.chain(on_demand) {
            let methods: Vec<DeclId> = r
                .methods_deep(class, name)
                .into_iter()
                .filter(|&m| r.decl(m).modifiers().contains(Modifiers::STATIC))
                .collect();
            if !methods.is_empty() {
                self.record(import, name);
                return (methods, Some(class));
            }
        }
        debug!("no method {} visible at {:?}", name, call);
        (Vec::new(), None)
    }

    /// Import declarations through which nothing in the unit resolves.
    ///
    /// Forces resolution of every node first, so the result is complete
    /// regardless of what was queried before.
    pub fn unused_imports(&self) -> Vec<NodeId> {
        let tree = self.tree();
        for node in tree.nodes() {
            self.resolve_decl(node);
            self.resolve_eval_type(node);
        }
        let Some(unit) = tree.root() else {
            return Vec::new();
        };
        self.imports(unit)
            .into_iter()
            .filter(|i| tree.import_uses(i.node).is_empty())
            .map(|i| i.node)
            .collect()
    }
}
