//! # jresolve-base
//!
//! Core library for name, type and overload resolution of a class-based,
//! generic, statically-typed language with lambdas.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → offset queries (declaration, type, references, selection)
//!   ↓
//! project  → file set, cross-file lowering, core library
//!   ↓
//! hir      → declarations, resolver, semantics (scopes, generics, overloads)
//!   ↓
//! syntax   → arena syntax tree handed over by a parser
//!   ↓
//! base     → primitives (FileId, TextRange, Modifiers)
//! ```

/// Foundation types: FileId, spans, modifiers
pub mod base;

/// Semantic model: resolver registry and per-tree resolution
pub mod hir;

/// Offset-based queries for editor integrations
pub mod ide;

pub mod project;
pub mod syntax;

// Re-export the entry points
pub use base::{FileId, TextRange, TextSize};
pub use hir::{DeclId, Resolver, Semantics};
pub use project::Project;
