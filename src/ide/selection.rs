//! Selection ranges: the spans enclosing a position.

use text_size::{TextRange, TextSize};

use crate::base::FileId;
use crate::project::Project;

/// Spans of the nodes covering `offset`, innermost first.
///
/// Used for "Expand Selection". Nodes sharing a span collapse into one
/// entry.
pub fn selection_ranges(project: &Project, file: FileId, offset: TextSize) -> Vec<TextRange> {
    let Some(tree) = project.tree(file) else {
        return Vec::new();
    };
    let Some(node) = tree.covering_node(offset) else {
        return Vec::new();
    };
    let mut ranges: Vec<TextRange> = std::iter::once(node)
        .chain(tree.ancestors(node))
        .map(|n| tree.span(n))
        .collect();
    ranges.dedup();
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{BinaryOp, TreeBuilder};

    #[test]
    fn test_ranges_grow_outward() {
        let mut project = Project::with_core_library();
        let file = project.file_id("Expr.java");
        let mut b = TreeBuilder::new(file);
        let one = b.int(1);
        let two = b.int(2);
        let sum = b.binary(BinaryOp::Add, one, two);
        let stmt = b.expr_stmt(sum);
        project.set_file(b.finish(vec![stmt]));

        let tree = project.tree(file).unwrap();
        let ranges = selection_ranges(&project, file, tree.span(two).start());
        assert_eq!(ranges[0], tree.span(two));
        assert!(ranges.windows(2).all(|w| w[1].contains_range(w[0])));
        assert!(selection_ranges(&project, FileId::new(99), TextSize::new(0)).is_empty());
    }
}
