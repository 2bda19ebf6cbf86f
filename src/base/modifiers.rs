//! Declaration modifiers and class kinds shared by syntax and declarations.

use bitflags::bitflags;

bitflags! {
    /// Modifier set of a class or member.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        /// Interface method with a body.
        const DEFAULT = 1 << 6;
        /// Compiler-generated member (implicit enum methods, default constructors).
        const SYNTHETIC = 1 << 7;
    }
}

impl Modifiers {
    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn is_abstract(self) -> bool {
        self.contains(Modifiers::ABSTRACT)
    }
}

/// The three declarable class flavors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

impl ClassKind {
    /// Keyword used in source for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_queries() {
        let m = Modifiers::PUBLIC | Modifiers::STATIC;
        assert!(m.is_static());
        assert!(!m.is_abstract());
        assert!(Modifiers::ABSTRACT.is_abstract());
    }

    #[test]
    fn test_class_kind_keyword() {
        assert_eq!(ClassKind::Interface.keyword(), "interface");
        assert_eq!(ClassKind::Enum.keyword(), "enum");
    }
}
