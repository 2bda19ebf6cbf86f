//! The Type Source boundary.
//!
//! A [`TypeSource`] answers "given a canonical class name, what does the
//! class look like?". The resolver asks for the immutable [`ClassHeader`]
//! when a class is first named and for the [`ClassMembers`] when the body
//! is first needed. Member queries are fallible; a failure leaves the class
//! with an empty body instead of aborting resolution.
//!
//! Metadata follows the conventions of reflective class introspection:
//! - enum constructors take `(String name, int ordinal)` before the
//!   declared parameters
//! - constructors of non-static member classes take the enclosing instance
//!   as their first parameter
//! - a varargs parameter is declared with its array type
//! - a class without constructors gets a default one from the resolver
//!
//! [`MemoryTypeSource`] is the in-memory implementation used for the core
//! library, for tests, and (with the `interchange` feature) for symbol
//! tables loaded from JSON.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{ClassKind, Modifiers};
use super::symbols::PrimitiveKind;

// ============================================================================
// ERRORS
// ============================================================================

/// Failure reported by a type source.
#[derive(Debug, Error)]
pub enum TypeSourceError {
    #[error("cannot introspect class `{class}`: {reason}")]
    Introspection { class: SmolStr, reason: String },

    #[error("unknown class `{0}`")]
    UnknownClass(SmolStr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "interchange")]
    #[error("malformed symbol table: {0}")]
    Format(#[from] serde_json::Error),
}

// ============================================================================
// SIGNATURES
// ============================================================================

/// A type as written in class metadata.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeSig {
    /// Canonical class name or primitive keyword.
    Class(SmolStr),
    Parameterized(SmolStr, Vec<TypeSig>),
    Array(Box<TypeSig>),
    /// Type variable of the enclosing method or class.
    Var(SmolStr),
}

impl TypeSig {
    pub fn class(name: &str) -> Self {
        TypeSig::Class(SmolStr::new(name))
    }

    pub fn var(name: &str) -> Self {
        TypeSig::Var(SmolStr::new(name))
    }

    pub fn array(element: TypeSig) -> Self {
        TypeSig::Array(Box::new(element))
    }

    pub fn generic(raw: &str, args: Vec<TypeSig>) -> Self {
        TypeSig::Parameterized(SmolStr::new(raw), args)
    }

    /// Parse the compact notation used by hand-written tables.
    ///
    /// `java.util.List<E>`, `int[]`, `T`. A name without a dot that is not
    /// a primitive keyword is a type variable. Parsing never fails;
    /// malformed text becomes a class name that will not resolve.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(element) = text.strip_suffix("[]") {
            return TypeSig::array(TypeSig::parse(element));
        }
        if let Some(open) = text.find('<') {
            if let Some(inner) = text[open + 1..].strip_suffix('>') {
                let args = split_top_level(inner)
                    .into_iter()
                    .map(TypeSig::parse)
                    .collect();
                return TypeSig::Parameterized(SmolStr::new(&text[..open]), args);
            }
            return TypeSig::class(text);
        }
        if text.contains('.') || PrimitiveKind::from_name(text).is_some() {
            TypeSig::class(text)
        } else {
            TypeSig::var(text)
        }
    }

    /// Erased form used in member canonical ids. Type variables erase to
    /// the raw name of their bound, looked up in `bounds`, or to `root`.
    pub fn erasure(&self, bounds: &dyn Fn(&str) -> Option<TypeSig>, root: &str) -> SmolStr {
        self.erasure_depth(bounds, root, 0)
    }

    fn erasure_depth(
        &self,
        bounds: &dyn Fn(&str) -> Option<TypeSig>,
        root: &str,
        depth: u8,
    ) -> SmolStr {
        match self {
            TypeSig::Class(name) | TypeSig::Parameterized(name, _) => name.clone(),
            TypeSig::Array(element) => {
                SmolStr::new(format!("{}[]", element.erasure_depth(bounds, root, depth)))
            }
            TypeSig::Var(name) => match bounds(name) {
                Some(bound) if depth < 8 => bound.erasure_depth(bounds, root, depth + 1),
                _ => SmolStr::new(root),
            },
        }
    }
}

impl From<&str> for TypeSig {
    fn from(text: &str) -> Self {
        TypeSig::parse(text)
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Class(name) | TypeSig::Var(name) => write!(f, "{name}"),
            TypeSig::Array(element) => write!(f, "{element}[]"),
            TypeSig::Parameterized(raw, args) => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
        }
    }
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() {
        parts.push(&text[start..]);
    }
    parts
}

// ============================================================================
// CLASS METADATA
// ============================================================================

/// Identity-defining part of a class.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassHeader {
    pub canonical: SmolStr,
    pub name: SmolStr,
    pub package: SmolStr,
    pub modifiers: Modifiers,
    pub kind: ClassKind,
    pub enclosing: Option<SmolStr>,
    pub type_params: Vec<SmolStr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParamMeta {
    pub name: SmolStr,
    pub bound: Option<TypeSig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMeta {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub ty: TypeSig,
    pub enum_constant: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodMeta {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamMeta>,
    pub params: Vec<TypeSig>,
    pub ret: TypeSig,
    pub varargs: bool,
}

impl MethodMeta {
    pub fn new(name: &str, ret: impl Into<TypeSig>) -> Self {
        Self {
            name: SmolStr::new(name),
            modifiers: Modifiers::PUBLIC,
            type_params: Vec::new(),
            params: Vec::new(),
            ret: ret.into(),
            varargs: false,
        }
    }

    pub fn param(mut self, ty: impl Into<TypeSig>) -> Self {
        self.params.push(ty.into());
        self
    }

    /// Trailing varargs parameter; `element` is wrapped into an array.
    pub fn varargs(mut self, element: impl Into<TypeSig>) -> Self {
        self.params.push(TypeSig::array(element.into()));
        self.varargs = true;
        self
    }

    pub fn type_param(mut self, name: &str, bound: Option<&str>) -> Self {
        self.type_params.push(TypeParamMeta {
            name: SmolStr::new(name),
            bound: bound.map(TypeSig::parse),
        });
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.modifiers |= Modifiers::DEFAULT;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.modifiers |= Modifiers::ABSTRACT;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructorMeta {
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamMeta>,
    pub params: Vec<TypeSig>,
    pub varargs: bool,
}

impl ConstructorMeta {
    pub fn new() -> Self {
        Self {
            modifiers: Modifiers::PUBLIC,
            ..Self::default()
        }
    }

    pub fn param(mut self, ty: impl Into<TypeSig>) -> Self {
        self.params.push(ty.into());
        self
    }

    pub fn varargs(mut self, element: impl Into<TypeSig>) -> Self {
        self.params.push(TypeSig::array(element.into()));
        self.varargs = true;
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Members and supertypes of a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassMembers {
    pub superclass: Option<TypeSig>,
    pub interfaces: Vec<TypeSig>,
    /// One entry per header type parameter.
    pub type_param_bounds: Vec<Option<TypeSig>>,
    pub fields: Vec<FieldMeta>,
    pub methods: Vec<MethodMeta>,
    pub constructors: Vec<ConstructorMeta>,
    pub inner_classes: Vec<SmolStr>,
}

/// Complete metadata for one class, with a builder API.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassMeta {
    pub header: ClassHeader,
    pub members: ClassMembers,
}

impl ClassMeta {
    fn with_kind(canonical: &str, kind: ClassKind) -> Self {
        let simple = canonical.rsplit('.').next().unwrap_or(canonical);
        let simple = simple.rsplit('$').next().unwrap_or(simple);
        Self {
            header: ClassHeader {
                canonical: SmolStr::new(canonical),
                name: SmolStr::new(simple),
                package: package_of(canonical),
                modifiers: Modifiers::PUBLIC,
                kind,
                enclosing: None,
                type_params: Vec::new(),
            },
            members: ClassMembers::default(),
        }
    }

    /// A class. The package is the leading run of lower-case segments;
    /// use [`in_package`](Self::in_package) when that guess is wrong.
    pub fn class(canonical: &str) -> Self {
        Self::with_kind(canonical, ClassKind::Class)
    }

    pub fn interface(canonical: &str) -> Self {
        let mut meta = Self::with_kind(canonical, ClassKind::Interface);
        meta.header.modifiers |= Modifiers::ABSTRACT;
        meta
    }

    pub fn enumeration(canonical: &str) -> Self {
        let mut meta = Self::with_kind(canonical, ClassKind::Enum);
        meta.header.modifiers |= Modifiers::FINAL;
        meta
    }

    pub fn canonical(&self) -> &SmolStr {
        &self.header.canonical
    }

    pub fn in_package(mut self, package: &str) -> Self {
        self.header.package = SmolStr::new(package);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.header.modifiers = modifiers;
        self
    }

    /// Mark as a member class of `outer`.
    pub fn nested_in(mut self, outer: &str) -> Self {
        self.header.enclosing = Some(SmolStr::new(outer));
        self
    }

    pub fn type_param(mut self, name: &str, bound: Option<&str>) -> Self {
        self.header.type_params.push(SmolStr::new(name));
        self.members
            .type_param_bounds
            .push(bound.map(TypeSig::parse));
        self
    }

    pub fn extends(mut self, ty: impl Into<TypeSig>) -> Self {
        self.members.superclass = Some(ty.into());
        self
    }

    pub fn implements(mut self, ty: impl Into<TypeSig>) -> Self {
        self.members.interfaces.push(ty.into());
        self
    }

    pub fn field(mut self, name: &str, ty: impl Into<TypeSig>) -> Self {
        let modifiers = if self.header.kind == ClassKind::Interface {
            Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL
        } else {
            Modifiers::PUBLIC
        };
        self.members.fields.push(FieldMeta {
            name: SmolStr::new(name),
            modifiers,
            ty: ty.into(),
            enum_constant: false,
        });
        self
    }

    pub fn static_field(mut self, name: &str, ty: impl Into<TypeSig>) -> Self {
        self.members.fields.push(FieldMeta {
            name: SmolStr::new(name),
            modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
            ty: ty.into(),
            enum_constant: false,
        });
        self
    }

    pub fn enum_constant(mut self, name: &str) -> Self {
        let ty = TypeSig::Class(self.header.canonical.clone());
        self.members.fields.push(FieldMeta {
            name: SmolStr::new(name),
            modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
            ty,
            enum_constant: true,
        });
        self
    }

    /// Add a method. Interface methods that are neither static nor default
    /// become public abstract.
    pub fn method(mut self, mut method: MethodMeta) -> Self {
        if self.header.kind == ClassKind::Interface
            && !method
                .modifiers
                .intersects(Modifiers::STATIC | Modifiers::DEFAULT)
        {
            method.modifiers |= Modifiers::PUBLIC | Modifiers::ABSTRACT;
        }
        self.members.methods.push(method);
        self
    }

    pub fn constructor(mut self, ctor: ConstructorMeta) -> Self {
        self.members.constructors.push(ctor);
        self
    }

    pub fn inner(mut self, canonical: &str) -> Self {
        self.members.inner_classes.push(SmolStr::new(canonical));
        self
    }
}

/// Leading run of segments that start with a lower-case letter.
fn package_of(canonical: &str) -> SmolStr {
    let segments: Vec<&str> = canonical
        .split('.')
        .take_while(|s| s.chars().next().is_some_and(|c| c.is_ascii_lowercase()))
        .collect();
    let count = segments.len().min(canonical.split('.').count().saturating_sub(1));
    SmolStr::new(segments[..count].join("."))
}

// ============================================================================
// TYPE SOURCE
// ============================================================================

/// Provider of class metadata.
pub trait TypeSource: Send + Sync {
    /// Header of `canonical`, or `None` if no such class exists.
    fn class_header(&self, canonical: &str) -> Option<ClassHeader>;

    /// Members of `canonical`.
    fn class_members(&self, canonical: &str) -> Result<ClassMembers, TypeSourceError>;

    /// True when at least one class lives in `package` or below it.
    fn has_package(&self, package: &str) -> bool;
}

/// Insertion-ordered, in-memory symbol table.
#[derive(Clone, Debug, Default)]
pub struct MemoryTypeSource {
    classes: IndexMap<SmolStr, ClassMeta>,
    packages: FxHashSet<SmolStr>,
}

impl MemoryTypeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a class.
    pub fn insert(&mut self, meta: ClassMeta) {
        let mut package = meta.header.package.as_str();
        while !package.is_empty() {
            self.packages.insert(SmolStr::new(package));
            package = package.rsplit_once('.').map(|(p, _)| p).unwrap_or("");
        }
        self.classes.insert(meta.header.canonical.clone(), meta);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, meta: ClassMeta) -> Self {
        self.insert(meta);
        self
    }

    /// Merge every class of `other` into `self`.
    pub fn extend(&mut self, other: MemoryTypeSource) {
        for (_, meta) in other.classes {
            self.insert(meta);
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&ClassMeta> {
        self.classes.get(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassMeta> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Parse a JSON array of class metadata.
    #[cfg(feature = "interchange")]
    pub fn from_json(json: &str) -> Result<Self, TypeSourceError> {
        let metas: Vec<ClassMeta> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for meta in metas {
            source.insert(meta);
        }
        Ok(source)
    }

    /// Serialize to the format read by [`from_json`](Self::from_json).
    #[cfg(feature = "interchange")]
    pub fn to_json(&self) -> Result<String, TypeSourceError> {
        let metas: Vec<&ClassMeta> = self.classes.values().collect();
        Ok(serde_json::to_string_pretty(&metas)?)
    }

    /// Load a symbol table file.
    #[cfg(feature = "interchange")]
    pub fn load(path: &std::path::Path) -> Result<Self, TypeSourceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl TypeSource for MemoryTypeSource {
    fn class_header(&self, canonical: &str) -> Option<ClassHeader> {
        self.classes.get(canonical).map(|m| m.header.clone())
    }

    fn class_members(&self, canonical: &str) -> Result<ClassMembers, TypeSourceError> {
        self.classes
            .get(canonical)
            .map(|m| m.members.clone())
            .ok_or_else(|| TypeSourceError::UnknownClass(SmolStr::new(canonical)))
    }

    fn has_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }
}
