//! Syntax tree consumed by the resolver.
//!
//! The tokenizer and grammar live outside this crate; a parser hands over
//! a [`SyntaxTree`] built through [`TreeBuilder`]. Nodes are a tagged union
//! ([`NodeKind`]) stored in an arena and linked to their parents by handle.

mod builder;
mod kind;
mod tree;

pub use builder::{ClassParts, MethodParts, TreeBuilder};
pub use kind::{BinaryOp, Literal, NodeKind, UnaryOp};
pub use tree::{Memo, NodeData, NodeId, SyntaxTree};
