//! Declaration identifiers.

use std::fmt;

/// Handle of a [`Declaration`](super::Declaration) inside one
/// [`Resolver`](super::Resolver).
///
/// Ids are assigned sequentially and never reused, so comparing two ids is
/// the identity comparison for declarations. Ids from different resolvers
/// must not be mixed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw form stored in syntax-tree memo slots.
    #[inline]
    pub(crate) const fn into_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_id_raw_roundtrip() {
        let id = DeclId::from_index(42);
        assert_eq!(DeclId::from_raw(id.into_raw()), id);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn test_decl_id_debug() {
        assert_eq!(format!("{:?}", DeclId::from_index(3)), "DeclId(3)");
    }
}
