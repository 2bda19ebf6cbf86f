//! Semantic model: declarations, the resolver and node resolution.
//!
//! ## Layers
//!
//! ```text
//! Semantics  → per-tree resolution (names, expression types, calls, lambdas)
//!   ↓
//! Resolver   → declaration registry, class bodies, generics, overload rating
//!   ↓
//! TypeSource → class metadata for everything not declared in project sources
//! ```
//!
//! Project sources reach the resolver through [`lower_tree`], which turns
//! class declarations into the same [`ClassMeta`] external classes use.

mod assign;
mod calls;
mod config;
mod diagnostics;
mod eval;
mod generics;
mod ids;
mod imports;
mod index;
mod input;
mod lambda;
mod lower;
mod overload;
mod resolve;
mod semantics;
mod symbols;
mod type_source;

pub use config::ResolverConfig;
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, SemanticChecker, Severity, check_file, codes,
};
pub use ids::DeclId;
pub use index::{Resolver, SigScope};
pub use input::SourceRoot;
pub use lower::{declare_classes, define_classes, lower_tree};
pub use overload::{ASSIGNABLE, EXACT, Rated, UNKNOWN, best, tied_count};
pub use resolve::Namespace;
pub use semantics::Semantics;
pub use symbols::{
    ClassBody, ClassFlavor, ClassInfo, ConstructorInfo, DeclKind, Declaration, FieldInfo,
    LocalVarInfo, MethodInfo, ParameterizedInfo, PrimitiveKind, TypeVarOwner, TypeVariableInfo,
};
pub use type_source::{
    ClassHeader, ClassMembers, ClassMeta, ConstructorMeta, FieldMeta, MemoryTypeSource,
    MethodMeta, TypeParamMeta, TypeSig, TypeSource, TypeSourceError,
};
