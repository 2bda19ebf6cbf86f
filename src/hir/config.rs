//! Resolver configuration.

use smol_str::SmolStr;

/// Well-known type names and implicit imports.
///
/// The defaults describe the modeled language's core library. A project
/// backed by a different core library can rename them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolverConfig {
    /// Universal root type: supertype of interfaces, arrays and missing bounds.
    pub root_type: SmolStr,
    /// Type of string literals and concatenation.
    pub string_type: SmolStr,
    /// Raw type of class literals (`X.class`).
    pub class_type: SmolStr,
    /// Interface consulted for for-each element types.
    pub iterable_type: SmolStr,
    /// Implicit generic superclass of every enum.
    pub enum_type: SmolStr,
    /// Packages every compilation unit imports on demand.
    pub implicit_imports: Vec<SmolStr>,
    /// Interfaces every array type implements.
    pub array_interfaces: Vec<SmolStr>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_type: SmolStr::new_static("java.lang.Object"),
            string_type: SmolStr::new_static("java.lang.String"),
            class_type: SmolStr::new_static("java.lang.Class"),
            iterable_type: SmolStr::new_static("java.lang.Iterable"),
            enum_type: SmolStr::new_static("java.lang.Enum"),
            implicit_imports: vec![SmolStr::new_static("java.lang")],
            array_interfaces: vec![
                SmolStr::new_static("java.lang.Cloneable"),
                SmolStr::new_static("java.io.Serializable"),
            ],
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root type name.
    pub fn with_root_type(mut self, name: &str) -> Self {
        self.root_type = SmolStr::new(name);
        self
    }

    /// Replace the implicit on-demand imports.
    pub fn with_implicit_imports(mut self, packages: &[&str]) -> Self {
        self.implicit_imports = packages.iter().map(|p| SmolStr::new(p)).collect();
        self
    }
}
