//! Foundation types for the resolver.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned compilation-unit identifiers
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`Modifiers`], [`ClassKind`] - Declaration flags shared by syntax and HIR
//!
//! This module has NO dependencies on other crate modules.

mod file_id;
mod modifiers;
mod span;

pub use file_id::FileId;
pub use modifiers::{ClassKind, Modifiers};
pub use span::{RangeExt, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
