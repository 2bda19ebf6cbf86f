//! Offset-based queries over a [`Project`](crate::project::Project).
//!
//! Each function takes a file and a text offset, finds the syntax node
//! under it and answers from the semantic model. Results use plain text
//! ranges; conversion to an editor protocol happens elsewhere.

mod navigation;
mod selection;

pub use navigation::{DeclarationAt, TypeAt, declaration_at, find_references, type_at};
pub use selection::selection_ranges;
