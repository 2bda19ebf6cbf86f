//! The declaration model.
//!
//! A [`Declaration`] is the resolved form of a symbol: a class (including
//! primitives, arrays and the null type), a member, a package, a local
//! variable, a parameterized type or a type variable. Declarations are
//! owned by the [`Resolver`](super::Resolver) and referred to by [`DeclId`].
//!
//! The variant payloads hold only identity-defining data. Class bodies
//! (supertypes, members) are kept separately in [`ClassBody`] so they can be
//! populated lazily and refreshed without changing the class identity.

use smol_str::SmolStr;

use super::ids::DeclId;
use crate::base::{FileId, Modifiers};

// ============================================================================
// DECLARATION
// ============================================================================

/// A resolved symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub id: DeclId,
    /// Globally unique key within one resolver.
    pub canonical: SmolStr,
    /// Simple name.
    pub name: SmolStr,
    pub kind: DeclKind,
}

/// Variant payload of a [`Declaration`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Class(ClassInfo),
    Field(FieldInfo),
    Method(MethodInfo),
    Constructor(ConstructorInfo),
    Package,
    LocalVar(LocalVarInfo),
    ParameterizedType(ParameterizedInfo),
    TypeVariable(TypeVariableInfo),
}

impl DeclKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeclKind::Class(info) => match info.flavor {
                ClassFlavor::Class => "class",
                ClassFlavor::Interface => "interface",
                ClassFlavor::Enum => "enum",
                ClassFlavor::Primitive(_) => "primitive type",
                ClassFlavor::Array { .. } => "array type",
                ClassFlavor::Null => "null type",
            },
            DeclKind::Field(_) => "field",
            DeclKind::Method(_) => "method",
            DeclKind::Constructor(_) => "constructor",
            DeclKind::Package => "package",
            DeclKind::LocalVar(_) => "local variable",
            DeclKind::ParameterizedType(_) => "parameterized type",
            DeclKind::TypeVariable(_) => "type variable",
        }
    }
}

impl Declaration {
    pub fn as_class(&self) -> Option<&ClassInfo> {
        match &self.kind {
            DeclKind::Class(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldInfo> {
        match &self.kind {
            DeclKind::Field(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodInfo> {
        match &self.kind {
            DeclKind::Method(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&ConstructorInfo> {
        match &self.kind {
            DeclKind::Constructor(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedInfo> {
        match &self.kind {
            DeclKind::ParameterizedType(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_type_var(&self) -> Option<&TypeVariableInfo> {
        match &self.kind {
            DeclKind::TypeVariable(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, DeclKind::Package)
    }

    /// Primitive kind, if this is a primitive type.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.as_class()?.flavor {
            ClassFlavor::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Element type, if this is an array type.
    pub fn array_element(&self) -> Option<DeclId> {
        match self.as_class()?.flavor {
            ClassFlavor::Array { element } => Some(element),
            _ => None,
        }
    }

    pub fn is_null_type(&self) -> bool {
        matches!(self.as_class().map(|c| &c.flavor), Some(ClassFlavor::Null))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.as_class().map(|c| &c.flavor), Some(ClassFlavor::Interface))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.as_class().map(|c| &c.flavor), Some(ClassFlavor::Enum))
    }

    /// Modifiers of classes and members; empty for everything else.
    pub fn modifiers(&self) -> Modifiers {
        match &self.kind {
            DeclKind::Class(info) => info.modifiers,
            DeclKind::Field(info) => info.modifiers,
            DeclKind::Method(info) => info.modifiers,
            DeclKind::Constructor(info) => info.modifiers,
            _ => Modifiers::empty(),
        }
    }
}

// ============================================================================
// CLASSES
// ============================================================================

/// What sort of type a class declaration stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassFlavor {
    Class,
    Interface,
    Enum,
    Primitive(PrimitiveKind),
    Array { element: DeclId },
    /// Type of the `null` literal.
    Null,
}

/// Immutable class header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    pub modifiers: Modifiers,
    pub flavor: ClassFlavor,
    pub package: SmolStr,
    /// Lexically enclosing class for member classes.
    pub enclosing: Option<DeclId>,
    pub type_params: Vec<SmolStr>,
}

/// Lazily populated class members and supertypes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassBody {
    /// Direct superclass, possibly parameterized. `None` for the root type,
    /// interfaces and primitives.
    pub superclass: Option<DeclId>,
    pub interfaces: Vec<DeclId>,
    /// Class type variables, in declaration order.
    pub type_params: Vec<DeclId>,
    pub fields: Vec<DeclId>,
    pub methods: Vec<DeclId>,
    pub constructors: Vec<DeclId>,
    pub inner: Vec<DeclId>,
}

impl ClassBody {
    /// Every member id, used to diff refreshes.
    pub fn members(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.fields
            .iter()
            .chain(&self.methods)
            .chain(&self.constructors)
            .copied()
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub owner: DeclId,
    pub modifiers: Modifiers,
    pub ty: Option<DeclId>,
    pub enum_constant: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub owner: DeclId,
    pub modifiers: Modifiers,
    pub type_params: Vec<DeclId>,
    /// Parameter types; the last one is an array when `varargs` is set.
    pub params: Vec<Option<DeclId>>,
    pub ret: Option<DeclId>,
    pub varargs: bool,
}

impl MethodInfo {
    pub fn is_default(&self) -> bool {
        self.modifiers.contains(Modifiers::DEFAULT)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorInfo {
    pub owner: DeclId,
    pub modifiers: Modifiers,
    pub type_params: Vec<DeclId>,
    pub params: Vec<Option<DeclId>>,
    pub varargs: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVarInfo {
    pub file: FileId,
    pub ty: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterizedInfo {
    pub raw: DeclId,
    pub args: Vec<DeclId>,
}

/// Who declared a type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeVarOwner {
    Class(DeclId),
    /// Canonical id of the generic method or constructor.
    Method(SmolStr),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeVariableInfo {
    pub owner: TypeVarOwner,
    /// Position among the owner's type parameters.
    pub index: usize,
}

// ============================================================================
// PRIMITIVES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => PrimitiveKind::Boolean,
            "byte" => PrimitiveKind::Byte,
            "char" => PrimitiveKind::Char,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "void" => PrimitiveKind::Void,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    /// Canonical name of the wrapper class.
    pub fn boxed_name(self) -> Option<&'static str> {
        Some(match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
            PrimitiveKind::Void => return None,
        })
    }

    /// Inverse of [`boxed_name`](Self::boxed_name).
    pub fn from_boxed_name(canonical: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.boxed_name() == Some(canonical))
    }

    /// Position in the numeric order
    /// `byte < char < short < int < long < float < double`.
    /// `None` for `boolean` and `void`.
    pub fn rank(self) -> Option<u8> {
        Some(match self {
            PrimitiveKind::Byte => 0,
            PrimitiveKind::Char => 1,
            PrimitiveKind::Short => 2,
            PrimitiveKind::Int => 3,
            PrimitiveKind::Long => 4,
            PrimitiveKind::Float => 5,
            PrimitiveKind::Double => 6,
            PrimitiveKind::Boolean | PrimitiveKind::Void => return None,
        })
    }

    pub fn is_numeric(self) -> bool {
        self.rank().is_some()
    }

    /// Primitive widening: identity, or a numeric kind to one of higher rank.
    pub fn widens_to(self, to: PrimitiveKind) -> bool {
        if self == to {
            return true;
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }

    /// Binary promotion: the operand of higher rank.
    pub fn promote(self, other: PrimitiveKind) -> Option<PrimitiveKind> {
        if self == PrimitiveKind::Boolean && other == PrimitiveKind::Boolean {
            return Some(PrimitiveKind::Boolean);
        }
        Some(if self.rank()? >= other.rank()? { self } else { other })
    }
}
