//! Go-to-declaration, hover types and reference search.

use text_size::{TextRange, TextSize};

use crate::base::FileId;
use crate::hir::DeclId;
use crate::project::Project;
use crate::syntax::{NodeId, NodeKind};

/// The declaration a reference under the cursor resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationAt {
    pub node: NodeId,
    /// Span of the resolved reference.
    pub range: TextRange,
    pub decl: DeclId,
    pub canonical: String,
}

/// The static type of the expression under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAt {
    pub node: NodeId,
    pub range: TextRange,
    pub ty: DeclId,
    /// Type as written in source (`java.util.List<java.lang.String>`).
    pub display: String,
}

fn is_reference(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Name { .. }
            | NodeKind::FieldAccess { .. }
            | NodeKind::MethodCall { .. }
            | NodeKind::New { .. }
            | NodeKind::TypeRef { .. }
            | NodeKind::Lambda { .. }
    )
}

/// Innermost reference covering `offset` that resolves.
pub fn declaration_at(project: &Project, file: FileId, offset: TextSize) -> Option<DeclarationAt> {
    let sema = project.semantics(file)?;
    let tree = sema.tree();
    let start = tree.covering_node(offset)?;
    std::iter::once(start)
        .chain(tree.ancestors(start))
        .filter(|&n| is_reference(tree.kind(n)))
        .find_map(|node| {
            let decl = sema.resolve_decl(node)?;
            Some(DeclarationAt {
                node,
                range: tree.span(node),
                decl,
                canonical: project.resolver().decl(decl).canonical.to_string(),
            })
        })
}

/// Innermost node covering `offset` that has a type.
pub fn type_at(project: &Project, file: FileId, offset: TextSize) -> Option<TypeAt> {
    let sema = project.semantics(file)?;
    let tree = sema.tree();
    let start = tree.covering_node(offset)?;
    std::iter::once(start)
        .chain(tree.ancestors(start))
        .find_map(|node| {
            let ty = sema.resolve_eval_type(node)?;
            Some(TypeAt {
                node,
                range: tree.span(node),
                ty,
                display: project.resolver().display(ty),
            })
        })
}

/// Every reference in the project that resolves to `decl`.
pub fn find_references(project: &Project, decl: DeclId) -> Vec<(FileId, TextRange)> {
    let mut found = Vec::new();
    for file in project.files() {
        let Some(sema) = project.semantics(file) else {
            continue;
        };
        let tree = sema.tree();
        for node in tree.nodes() {
            if is_reference(tree.kind(node)) && sema.resolve_decl(node) == Some(decl) {
                found.push((file, tree.span(node)));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::syntax::{ClassParts, MethodParts, TreeBuilder};

    /// `class C { int count; void m() { count = count + 1; } }`
    fn project() -> (Project, FileId, NodeId) {
        let mut project = Project::with_core_library();
        let file = project.file_id("C.java");
        let mut b = TreeBuilder::new(file);
        let int = b.type_ref("int");
        let field = b.field(Modifiers::PRIVATE, "count", int, None);
        let lhs = b.name("count");
        let rhs = b.name("count");
        let one = b.int(1);
        let sum = b.binary(crate::syntax::BinaryOp::Add, rhs, one);
        let assign = b.assign(lhs, sum);
        let stmt = b.expr_stmt(assign);
        let body = b.block(vec![stmt]);
        let void = b.type_ref("void");
        let m = b.method(MethodParts::new("m", void).body(body));
        let class = b.class(ClassParts::class("C").members(vec![field, m]));
        project.set_file(b.finish(vec![class]));
        (project, file, rhs)
    }

    #[test]
    fn test_declaration_and_type_at() {
        let (project, file, rhs) = project();
        let offset = project.tree(file).unwrap().span(rhs).start();

        let found = declaration_at(&project, file, offset).unwrap();
        assert_eq!(found.node, rhs);
        assert_eq!(found.canonical, "C#count");

        let ty = type_at(&project, file, offset).unwrap();
        assert_eq!(ty.display, "int");
    }

    #[test]
    fn test_find_references() {
        let (project, file, rhs) = project();
        let decl = declaration_at(&project, file, project.tree(file).unwrap().span(rhs).start())
            .unwrap()
            .decl;
        assert_eq!(find_references(&project, decl).len(), 2);
    }
}
