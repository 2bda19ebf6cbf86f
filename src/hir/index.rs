//! The Resolver: per-project declaration registry.
//!
//! The resolver owns every [`Declaration`] and hands out [`DeclId`]s. It is
//! the single place where identity is decided:
//!
//! - a class is interned once per canonical name (while its header stays
//!   the same)
//! - members are re-interned on every body (re)computation; an unchanged
//!   member maps back to the same id
//! - parameterized and array types are de-duplicated by their components
//!
//! Class bodies are populated lazily from the [`TypeSource`] on first use.
//! Classes declared in project sources are kept in an overlay that is
//! consulted before the external type source.
//!
//! Interior mutability uses a single `RwLock`: reads take the fast path,
//! writers double-check after acquiring the write lock. The lock is never
//! held while calling back into other resolver methods.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::config::ResolverConfig;
use super::ids::DeclId;
use super::symbols::{
    ClassBody, ClassFlavor, ClassInfo, ConstructorInfo, DeclKind, Declaration, FieldInfo,
    LocalVarInfo, MethodInfo, ParameterizedInfo, PrimitiveKind, TypeVarOwner, TypeVariableInfo,
};
use super::type_source::{
    ClassHeader, ClassMembers, ClassMeta, ConstructorMeta, MethodMeta, TypeParamMeta, TypeSig,
    TypeSource, TypeSourceError,
};
use crate::base::{ClassKind, FileId, Modifiers};

// ============================================================================
// SIGNATURE SCOPE
// ============================================================================

/// Type-variable names visible while resolving a member signature:
/// method type parameters, then the class's, then those of enclosing
/// classes reachable through non-static nesting.
#[derive(Clone, Debug, Default)]
pub struct SigScope {
    vars: Vec<(SmolStr, DeclId)>,
}

impl SigScope {
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    /// A scope with `vars` shadowing everything in `self`.
    pub fn nested(&self, vars: impl IntoIterator<Item = (SmolStr, DeclId)>) -> SigScope {
        let mut out: Vec<_> = vars.into_iter().collect();
        out.extend(self.vars.iter().cloned());
        SigScope { vars: out }
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Default)]
struct ResolverInner {
    decls: Vec<Arc<Declaration>>,
    by_canonical: FxHashMap<SmolStr, DeclId>,
    packages: FxHashMap<SmolStr, DeclId>,
    bodies: FxHashMap<DeclId, Arc<ClassBody>>,
    parameterized: FxHashMap<(DeclId, Vec<DeclId>), DeclId>,
    arrays: FxHashMap<DeclId, DeclId>,
    type_var_bounds: FxHashMap<DeclId, DeclId>,
    /// Names the type source does not know; cleared when the overlay changes.
    missing: FxHashSet<SmolStr>,
    overlay: IndexMap<SmolStr, ClassMeta>,
}

/// Registry and cache of declarations for one project.
pub struct Resolver {
    source: Arc<dyn TypeSource>,
    config: ResolverConfig,
    inner: RwLock<ResolverInner>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("decls", &self.len())
            .finish()
    }
}

impl Resolver {
    /// Create a resolver over `source` with the default configuration.
    pub fn new(source: Arc<dyn TypeSource>) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    pub fn with_config(source: Arc<dyn TypeSource>, config: ResolverConfig) -> Self {
        Self {
            source,
            config,
            inner: RwLock::new(ResolverInner::default()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Number of declarations ever created.
    pub fn len(&self) -> usize {
        self.inner.read().decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The declaration behind `id`.
    ///
    /// Panics if `id` came from another resolver.
    pub fn decl(&self, id: DeclId) -> Arc<Declaration> {
        self.inner.read().decls[id.index()].clone()
    }

    /// Current declaration registered under `canonical`.
    pub fn lookup_canonical(&self, canonical: &str) -> Option<DeclId> {
        self.inner.read().by_canonical.get(canonical).copied()
    }

    fn intern(&self, canonical: SmolStr, name: SmolStr, kind: DeclKind) -> DeclId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.by_canonical.get(&canonical)
                && inner.decls[id.index()].kind == kind
            {
                return id;
            }
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.by_canonical.get(&canonical)
            && inner.decls[id.index()].kind == kind
        {
            return id;
        }
        let id = DeclId::from_index(inner.decls.len());
        inner.decls.push(Arc::new(Declaration {
            id,
            canonical: canonical.clone(),
            name,
            kind,
        }));
        inner.by_canonical.insert(canonical, id);
        id
    }

    // ========================================================================
    // CLASSES AND PACKAGES
    // ========================================================================

    /// Look up a class (or primitive, or `T[]` array) by canonical name.
    pub fn class(&self, name: &str) -> Option<DeclId> {
        if let Some(element) = name.strip_suffix("[]") {
            let element = self.class(element)?;
            return Some(self.array_of(element));
        }
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Some(self.primitive(kind));
        }
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.by_canonical.get(name)
                && matches!(inner.decls[id.index()].kind, DeclKind::Class(_))
            {
                return Some(id);
            }
            if inner.missing.contains(name) {
                return None;
            }
        }

        match self.header_for(name) {
            Some(header) => Some(self.intern_class(&header)),
            None => {
                trace!("no class named {}", name);
                self.inner.write().missing.insert(SmolStr::new(name));
                None
            }
        }
    }

    fn header_for(&self, name: &str) -> Option<ClassHeader> {
        let overlay = self.inner.read().overlay.get(name).map(|m| m.header.clone());
        overlay.or_else(|| self.source.class_header(name))
    }

    fn intern_class(&self, header: &ClassHeader) -> DeclId {
        let enclosing = header.enclosing.as_deref().and_then(|e| self.class(e));
        let flavor = match header.kind {
            ClassKind::Class => ClassFlavor::Class,
            ClassKind::Interface => ClassFlavor::Interface,
            ClassKind::Enum => ClassFlavor::Enum,
        };
        let info = ClassInfo {
            modifiers: header.modifiers,
            flavor,
            package: header.package.clone(),
            enclosing,
            type_params: header.type_params.clone(),
        };
        self.intern(
            header.canonical.clone(),
            header.name.clone(),
            DeclKind::Class(info),
        )
    }

    /// The configured universal root type, if the type source provides it.
    pub fn root(&self) -> Option<DeclId> {
        self.class(&self.config.root_type)
    }

    pub fn string_type(&self) -> Option<DeclId> {
        self.class(&self.config.string_type)
    }

    /// Look up a package; packages exist when some class lives in them.
    pub fn package(&self, name: &str) -> Option<DeclId> {
        if let Some(&id) = self.inner.read().packages.get(name) {
            return Some(id);
        }
        let in_overlay = {
            let inner = self.inner.read();
            let prefix = format!("{name}.");
            inner
                .overlay
                .values()
                .any(|m| m.header.package == name || m.header.package.starts_with(&prefix))
        };
        if !in_overlay && !self.source.has_package(name) {
            return None;
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.packages.get(name) {
            return Some(id);
        }
        let id = DeclId::from_index(inner.decls.len());
        let simple = name.rsplit('.').next().unwrap_or(name);
        inner.decls.push(Arc::new(Declaration {
            id,
            canonical: SmolStr::new(name),
            name: SmolStr::new(simple),
            kind: DeclKind::Package,
        }));
        inner.packages.insert(SmolStr::new(name), id);
        Some(id)
    }

    // ========================================================================
    // BUILT-IN AND SYNTHESIZED TYPES
    // ========================================================================

    pub fn primitive(&self, kind: PrimitiveKind) -> DeclId {
        let info = ClassInfo {
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
            flavor: ClassFlavor::Primitive(kind),
            package: SmolStr::default(),
            enclosing: None,
            type_params: Vec::new(),
        };
        let name = SmolStr::new_static(kind.name());
        self.intern(name.clone(), name, DeclKind::Class(info))
    }

    /// Type of the `null` literal.
    pub fn null_type(&self) -> DeclId {
        let info = ClassInfo {
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
            flavor: ClassFlavor::Null,
            package: SmolStr::default(),
            enclosing: None,
            type_params: Vec::new(),
        };
        self.intern(
            SmolStr::new_static("<null>"),
            SmolStr::new_static("null"),
            DeclKind::Class(info),
        )
    }

    /// The array type with `element` as component.
    pub fn array_of(&self, element: DeclId) -> DeclId {
        if let Some(&id) = self.inner.read().arrays.get(&element) {
            return id;
        }
        let elem = self.decl(element);
        let info = ClassInfo {
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
            flavor: ClassFlavor::Array { element },
            package: SmolStr::default(),
            enclosing: None,
            type_params: Vec::new(),
        };
        let id = self.intern(
            SmolStr::new(format!("{}[]", elem.canonical)),
            SmolStr::new(format!("{}[]", elem.name)),
            DeclKind::Class(info),
        );
        self.inner.write().arrays.insert(element, id);
        id
    }

    /// The synthetic `length` field of an array type.
    pub fn array_length(&self, array: DeclId) -> Option<DeclId> {
        self.decl(array).array_element()?;
        self.body(array).fields.first().copied()
    }

    /// The de-duplicated instantiation `raw<args>`.
    pub fn parameterized(&self, raw: DeclId, args: Vec<DeclId>) -> DeclId {
        let key = (raw, args);
        if let Some(&id) = self.inner.read().parameterized.get(&key) {
            return id;
        }
        let (raw, args) = key;
        let raw_decl = self.decl(raw);
        let arg_decls: Vec<_> = args.iter().map(|&a| self.decl(a)).collect();
        let canonical = format!(
            "{}<{}>",
            raw_decl.canonical,
            arg_decls
                .iter()
                .map(|d| d.canonical.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        let name = format!(
            "{}<{}>",
            raw_decl.name,
            arg_decls
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        let id = self.intern(
            SmolStr::new(canonical),
            SmolStr::new(name),
            DeclKind::ParameterizedType(ParameterizedInfo {
                raw,
                args: args.clone(),
            }),
        );
        self.inner.write().parameterized.insert((raw, args), id);
        id
    }

    /// Type variable `name` declared by `class`.
    pub fn class_type_var(&self, class: DeclId, name: &str) -> Option<DeclId> {
        let decl = self.decl(class);
        if let Some(p) = decl.as_parameterized() {
            return self.class_type_var(p.raw, name);
        }
        let index = decl.as_class()?.type_params.iter().position(|t| t == name)?;
        Some(self.intern(
            SmolStr::new(format!("{}::{}", decl.canonical, name)),
            SmolStr::new(name),
            DeclKind::TypeVariable(TypeVariableInfo {
                owner: TypeVarOwner::Class(class),
                index,
            }),
        ))
    }

    /// Declared upper bound of a type variable, defaulting to the root type.
    pub fn type_var_bound(&self, tv: DeclId) -> Option<DeclId> {
        let decl = self.decl(tv);
        if let Some(TypeVariableInfo {
            owner: TypeVarOwner::Class(owner),
            ..
        }) = decl.as_type_var()
        {
            self.body(*owner);
        }
        let bound = self.inner.read().type_var_bounds.get(&tv).copied();
        bound.or_else(|| self.root())
    }

    /// A local variable or parameter declared at `offset` in `file`.
    pub fn local_var(&self, file: FileId, offset: u32, name: &str, ty: Option<DeclId>) -> DeclId {
        self.intern(
            SmolStr::new(format!("{file}@{offset}:{name}")),
            SmolStr::new(name),
            DeclKind::LocalVar(LocalVarInfo { file, ty }),
        )
    }

    // ========================================================================
    // TYPE QUERIES
    // ========================================================================

    /// The class behind a type: itself, the raw type of a parameterized
    /// type, or the class of a type variable's bound.
    pub fn raw_class(&self, ty: DeclId) -> Option<DeclId> {
        let mut current = ty;
        for _ in 0..16 {
            let decl = self.decl(current);
            match &decl.kind {
                DeclKind::Class(_) => return Some(current),
                DeclKind::ParameterizedType(p) => return Some(p.raw),
                DeclKind::TypeVariable(_) => current = self.type_var_bound(current)?,
                _ => return None,
            }
        }
        None
    }

    /// The type `this` has inside `class`: parameterized over its own type
    /// variables when generic.
    pub fn self_type(&self, class: DeclId) -> DeclId {
        let decl = self.decl(class);
        let Some(info) = decl.as_class() else {
            return class;
        };
        if info.type_params.is_empty() {
            return class;
        }
        let vars: Vec<DeclId> = info
            .type_params
            .iter()
            .filter_map(|name| self.class_type_var(class, name))
            .collect();
        self.parameterized(class, vars)
    }

    /// Type produced when `decl` is referenced.
    pub fn decl_eval_type(&self, decl: DeclId) -> Option<DeclId> {
        match &self.decl(decl).kind {
            DeclKind::Class(_) | DeclKind::ParameterizedType(_) | DeclKind::TypeVariable(_) => {
                Some(decl)
            }
            DeclKind::Field(f) => f.ty,
            DeclKind::Method(m) => m.ret,
            DeclKind::Constructor(c) => Some(c.owner),
            DeclKind::LocalVar(l) => l.ty,
            DeclKind::Package => None,
        }
    }

    /// Human-readable type name.
    pub fn display(&self, ty: DeclId) -> String {
        let decl = self.decl(ty);
        match &decl.kind {
            DeclKind::Class(info) => match info.flavor {
                ClassFlavor::Array { element } => format!("{}[]", self.display(element)),
                ClassFlavor::Null => "null".to_string(),
                _ => decl.canonical.to_string(),
            },
            DeclKind::ParameterizedType(p) => {
                let args: Vec<String> = p.args.iter().map(|&a| self.display(a)).collect();
                format!("{}<{}>", self.display(p.raw), args.join(", "))
            }
            DeclKind::TypeVariable(_) | DeclKind::LocalVar(_) => decl.name.to_string(),
            _ => decl.canonical.to_string(),
        }
    }

    // ========================================================================
    // SIGNATURES
    // ========================================================================

    /// Resolve a metadata type within `scope`. Unknown names yield `None`;
    /// unknown type arguments fall back to the root type.
    pub fn resolve_sig(&self, sig: &TypeSig, scope: &SigScope) -> Option<DeclId> {
        match sig {
            TypeSig::Class(name) => {
                let found = self.class(name);
                if found.is_none() {
                    debug!("unresolved type {} in signature", name);
                }
                found
            }
            TypeSig::Parameterized(raw, args) => {
                let raw = self.class(raw)?;
                let args: Option<Vec<DeclId>> = args
                    .iter()
                    .map(|a| self.resolve_sig(a, scope).or_else(|| self.root()))
                    .collect();
                match args {
                    Some(args) => Some(self.parameterized(raw, args)),
                    None => Some(raw),
                }
            }
            TypeSig::Array(element) => {
                let element = self.resolve_sig(element, scope)?;
                Some(self.array_of(element))
            }
            TypeSig::Var(name) => {
                let found = scope.lookup(name);
                if found.is_none() {
                    debug!("type variable {} not in scope", name);
                }
                found
            }
        }
    }

    /// Signature scope for members of `class`.
    pub fn class_scope(&self, class: DeclId) -> SigScope {
        let mut vars = Vec::new();
        let mut current = Some(class);
        while let Some(c) = current {
            let decl = self.decl(c);
            let Some(info) = decl.as_class() else { break };
            for name in &info.type_params {
                if let Some(tv) = self.class_type_var(c, name) {
                    vars.push((name.clone(), tv));
                }
            }
            current = if info.modifiers.is_static() {
                None
            } else {
                info.enclosing
            };
        }
        SigScope { vars }
    }

    /// Canonical id of a method of `class_canonical` described by `method`.
    pub fn method_canonical(&self, class: &ClassMeta, method: &MethodMeta) -> SmolStr {
        let erased = self.erase_params(class, &method.type_params, &method.params);
        SmolStr::new(format!("{}#{}({})", class.header.canonical, method.name, erased))
    }

    /// Canonical id of a constructor of `class`.
    pub fn constructor_canonical(&self, class: &ClassMeta, ctor: &ConstructorMeta) -> SmolStr {
        let erased = self.erase_params(class, &ctor.type_params, &ctor.params);
        SmolStr::new(format!("{}#<init>({})", class.header.canonical, erased))
    }

    fn erase_params(&self, class: &ClassMeta, tps: &[TypeParamMeta], params: &[TypeSig]) -> String {
        let bounds = |name: &str| -> Option<TypeSig> {
            if let Some(tp) = tps.iter().find(|tp| tp.name == name) {
                return tp.bound.clone();
            }
            let index = class.header.type_params.iter().position(|t| t == name)?;
            class.members.type_param_bounds.get(index).cloned().flatten()
        };
        params
            .iter()
            .map(|p| p.erasure(&bounds, &self.config.root_type).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    // ========================================================================
    // CLASS BODIES
    // ========================================================================

    /// Members and supertypes of `class`, populated on first use.
    ///
    /// Parameterized types share the body of their raw type. Anything that
    /// is not a class has an empty body.
    pub fn body(&self, class: DeclId) -> Arc<ClassBody> {
        if let Some(body) = self.inner.read().bodies.get(&class) {
            return body.clone();
        }
        let decl = self.decl(class);
        match &decl.kind {
            DeclKind::Class(_) => {}
            DeclKind::ParameterizedType(p) => return self.body(p.raw),
            _ => return Arc::new(ClassBody::default()),
        }
        let body = Arc::new(self.build_body(class));
        self.inner.write().bodies.entry(class).or_insert(body).clone()
    }

    /// Re-query the type source and apply the difference. Returns whether
    /// the body changed. Class identity is kept.
    pub fn refresh(&self, class: DeclId) -> bool {
        let old = self.inner.read().bodies.get(&class).cloned();
        let Some(old) = old else {
            return false;
        };
        let new = Arc::new(self.build_body(class));
        if *old == *new {
            return false;
        }

        let kept: FxHashSet<DeclId> = new.members().collect();
        let previous: FxHashSet<DeclId> = old.members().collect();
        let removed: Vec<DeclId> = old.members().filter(|m| !kept.contains(m)).collect();
        let added = new.members().filter(|m| !previous.contains(m)).count();

        let mut inner = self.inner.write();
        for id in &removed {
            let canonical = inner.decls[id.index()].canonical.clone();
            if inner.by_canonical.get(&canonical) == Some(id) {
                inner.by_canonical.remove(&canonical);
            }
        }
        let canonical = inner.decls[class.index()].canonical.clone();
        inner.bodies.insert(class, new);
        debug!(
            "refreshed {}: {} members added, {} removed",
            canonical,
            added,
            removed.len()
        );
        true
    }

    fn members_for(&self, canonical: &str) -> Result<ClassMembers, TypeSourceError> {
        let overlay = self
            .inner
            .read()
            .overlay
            .get(canonical)
            .map(|m| m.members.clone());
        match overlay {
            Some(members) => Ok(members),
            None => self.source.class_members(canonical),
        }
    }

    fn build_body(&self, class: DeclId) -> ClassBody {
        let decl = self.decl(class);
        let Some(info) = decl.as_class() else {
            return ClassBody::default();
        };
        match info.flavor {
            ClassFlavor::Primitive(_) | ClassFlavor::Null => return ClassBody::default(),
            ClassFlavor::Array { .. } => return self.array_body(class),
            _ => {}
        }

        let members = match self.members_for(&decl.canonical) {
            Ok(members) => members,
            Err(err) => {
                warn!("{}; {} keeps an empty member list", err, decl.canonical);
                ClassMembers::default()
            }
        };
        let body = self.lower_members(class, &decl, info, &members);
        debug!(
            "populated {}: {} fields, {} methods, {} constructors",
            decl.canonical,
            body.fields.len(),
            body.methods.len(),
            body.constructors.len()
        );
        body
    }

    fn array_body(&self, array: DeclId) -> ClassBody {
        let canonical = self.decl(array).canonical.clone();
        let int = self.primitive(PrimitiveKind::Int);
        let length = self.intern(
            SmolStr::new(format!("{canonical}#length")),
            SmolStr::new_static("length"),
            DeclKind::Field(FieldInfo {
                owner: array,
                modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
                ty: Some(int),
                enum_constant: false,
            }),
        );
        ClassBody {
            superclass: self.root(),
            interfaces: self
                .config
                .array_interfaces
                .iter()
                .filter_map(|name| self.class(name))
                .collect(),
            fields: vec![length],
            ..ClassBody::default()
        }
    }

    fn lower_members(
        &self,
        class: DeclId,
        decl: &Declaration,
        info: &ClassInfo,
        members: &ClassMembers,
    ) -> ClassBody {
        let canonical = decl.canonical.as_str();
        let scope = self.class_scope(class);
        let meta = ClassMeta {
            header: ClassHeader {
                canonical: decl.canonical.clone(),
                name: decl.name.clone(),
                package: info.package.clone(),
                modifiers: info.modifiers,
                kind: ClassKind::Class,
                enclosing: None,
                type_params: info.type_params.clone(),
            },
            members: members.clone(),
        };

        let type_params: Vec<DeclId> = info
            .type_params
            .iter()
            .filter_map(|name| self.class_type_var(class, name))
            .collect();
        for (tv, bound) in type_params.iter().zip(&members.type_param_bounds) {
            if let Some(bound) = bound.as_ref().and_then(|b| self.resolve_sig(b, &scope)) {
                self.inner.write().type_var_bounds.insert(*tv, bound);
            }
        }

        let is_root = canonical == self.config.root_type;
        let superclass = match (&members.superclass, info.flavor) {
            (Some(sig), _) => self.resolve_sig(sig, &scope),
            (None, ClassFlavor::Class | ClassFlavor::Enum) if !is_root => self.root(),
            _ => None,
        };
        let interfaces = members
            .interfaces
            .iter()
            .filter_map(|sig| self.resolve_sig(sig, &scope))
            .collect();

        let fields = members
            .fields
            .iter()
            .map(|f| {
                let ty = self.resolve_sig(&f.ty, &scope);
                self.intern(
                    SmolStr::new(format!("{canonical}#{}", f.name)),
                    f.name.clone(),
                    DeclKind::Field(FieldInfo {
                        owner: class,
                        modifiers: f.modifiers,
                        ty,
                        enum_constant: f.enum_constant,
                    }),
                )
            })
            .collect();

        let methods = members
            .methods
            .iter()
            .map(|m| self.intern_method(class, &meta, m, &scope))
            .collect();

        let mut ctor_metas = members.constructors.clone();
        if ctor_metas.is_empty() && matches!(info.flavor, ClassFlavor::Class | ClassFlavor::Enum) {
            ctor_metas.push(self.default_constructor(info));
        }
        let constructors = ctor_metas
            .iter()
            .map(|c| self.intern_constructor(class, &meta, c, &scope))
            .collect();

        let inner = members
            .inner_classes
            .iter()
            .filter_map(|name| self.class(name))
            .collect();

        ClassBody {
            superclass,
            interfaces,
            type_params,
            fields,
            methods,
            constructors,
            inner,
        }
    }

    fn default_constructor(&self, info: &ClassInfo) -> ConstructorMeta {
        let synthetic = Modifiers::SYNTHETIC;
        if info.flavor == ClassFlavor::Enum {
            return ConstructorMeta::new()
                .modifiers(Modifiers::PRIVATE | synthetic)
                .param(TypeSig::Class(self.config.string_type.clone()))
                .param(TypeSig::class("int"));
        }
        let ctor = ConstructorMeta::new().modifiers(Modifiers::PUBLIC | synthetic);
        match info.enclosing {
            Some(outer) if !info.modifiers.is_static() => {
                ctor.param(TypeSig::Class(self.decl(outer).canonical.clone()))
            }
            _ => ctor,
        }
    }

    fn intern_method_type_vars(
        &self,
        member: &SmolStr,
        tps: &[TypeParamMeta],
        scope: &SigScope,
    ) -> (Vec<DeclId>, SigScope) {
        let vars: Vec<DeclId> = tps
            .iter()
            .enumerate()
            .map(|(index, tp)| {
                self.intern(
                    SmolStr::new(format!("{member}::{}", tp.name)),
                    tp.name.clone(),
                    DeclKind::TypeVariable(TypeVariableInfo {
                        owner: TypeVarOwner::Method(member.clone()),
                        index,
                    }),
                )
            })
            .collect();
        let scope = scope.nested(tps.iter().map(|tp| tp.name.clone()).zip(vars.iter().copied()));
        for (tp, tv) in tps.iter().zip(&vars) {
            if let Some(bound) = tp.bound.as_ref().and_then(|b| self.resolve_sig(b, &scope)) {
                self.inner.write().type_var_bounds.insert(*tv, bound);
            }
        }
        (vars, scope)
    }

    fn intern_method(
        &self,
        class: DeclId,
        meta: &ClassMeta,
        method: &MethodMeta,
        scope: &SigScope,
    ) -> DeclId {
        let canonical = self.method_canonical(meta, method);
        let (type_params, scope) =
            self.intern_method_type_vars(&canonical, &method.type_params, scope);
        let params = method
            .params
            .iter()
            .map(|p| self.resolve_sig(p, &scope))
            .collect();
        let ret = self.resolve_sig(&method.ret, &scope);
        self.intern(
            canonical,
            method.name.clone(),
            DeclKind::Method(MethodInfo {
                owner: class,
                modifiers: method.modifiers,
                type_params,
                params,
                ret,
                varargs: method.varargs,
            }),
        )
    }

    fn intern_constructor(
        &self,
        class: DeclId,
        meta: &ClassMeta,
        ctor: &ConstructorMeta,
        scope: &SigScope,
    ) -> DeclId {
        let canonical = self.constructor_canonical(meta, ctor);
        let (type_params, scope) = self.intern_method_type_vars(&canonical, &ctor.type_params, scope);
        let params = ctor
            .params
            .iter()
            .map(|p| self.resolve_sig(p, &scope))
            .collect();
        self.intern(
            canonical,
            meta.header.name.clone(),
            DeclKind::Constructor(ConstructorInfo {
                owner: class,
                modifiers: ctor.modifiers,
                type_params,
                params,
                varargs: ctor.varargs,
            }),
        )
    }

    // ========================================================================
    // SOURCE OVERLAY
    // ========================================================================

    /// Register (or update) a class declared in project sources.
    ///
    /// An unchanged header keeps the class identity and refreshes its body;
    /// a changed header produces a new class declaration.
    pub fn define_source_class(&self, meta: ClassMeta) -> DeclId {
        let header = meta.header.clone();
        {
            let mut inner = self.inner.write();
            inner.missing.clear();
            inner.overlay.insert(header.canonical.clone(), meta);
        }
        let id = self.intern_class(&header);
        self.refresh(id);
        id
    }

    /// Register the header and member-class names of a source class,
    /// keeping any other members the overlay already holds. Used before
    /// member signatures can be resolved.
    pub fn declare_source_header(&self, header: ClassHeader, inner_classes: Vec<SmolStr>) -> DeclId {
        {
            let mut inner = self.inner.write();
            inner.missing.clear();
            match inner.overlay.get_mut(&header.canonical) {
                Some(meta) => {
                    meta.header = header.clone();
                    meta.members.inner_classes = inner_classes;
                }
                None => {
                    inner.overlay.insert(
                        header.canonical.clone(),
                        ClassMeta {
                            header: header.clone(),
                            members: ClassMembers {
                                inner_classes,
                                ..ClassMembers::default()
                            },
                        },
                    );
                }
            }
        }
        self.intern_class(&header)
    }

    /// Overlay metadata of a source class.
    pub fn source_class(&self, canonical: &str) -> Option<ClassMeta> {
        self.inner.read().overlay.get(canonical).cloned()
    }

    /// Forget a source class. Later lookups fall through to the type source.
    pub fn remove_source_class(&self, canonical: &str) {
        let mut inner = self.inner.write();
        if inner.overlay.shift_remove(canonical).is_none() {
            return;
        }
        inner.missing.clear();
        let Some(id) = inner.by_canonical.remove(canonical) else {
            return;
        };
        if let Some(body) = inner.bodies.remove(&id) {
            for member in body.members() {
                let name = inner.decls[member.index()].canonical.clone();
                if inner.by_canonical.get(&name) == Some(&member) {
                    inner.by_canonical.remove(&name);
                }
            }
        }
        debug!("removed source class {}", canonical);
    }

    /// Canonical names of the direct supertypes recorded for `canonical`,
    /// without resolving anything.
    pub fn supertype_names(&self, canonical: &str) -> Vec<SmolStr> {
        let members = match self.members_for(canonical) {
            Ok(members) => members,
            Err(_) => return Vec::new(),
        };
        members
            .superclass
            .iter()
            .chain(&members.interfaces)
            .filter_map(|sig| match sig {
                TypeSig::Class(name) | TypeSig::Parameterized(name, _) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::type_source::{MemoryTypeSource, TypeSourceError};

    fn source() -> MemoryTypeSource {
        MemoryTypeSource::new()
            .with(ClassMeta::class("java.lang.Object").method(MethodMeta::new("toString", "java.lang.String")))
            .with(ClassMeta::class("java.lang.String"))
            .with(
                ClassMeta::class("p.Box")
                    .type_param("T", None)
                    .field("value", "T")
                    .method(MethodMeta::new("get", "T")),
            )
    }

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(source()))
    }

    #[test]
    fn test_class_identity() {
        let r = resolver();
        let a = r.class("p.Box").unwrap();
        let b = r.class("p.Box").unwrap();
        assert_eq!(a, b);
        assert!(r.class("p.Missing").is_none());
        assert!(r.class("p.Missing").is_none());
    }

    #[test]
    fn test_body_is_idempotent() {
        let r = resolver();
        let boxed = r.class("p.Box").unwrap();
        let first = r.body(boxed);
        assert!(!r.refresh(boxed));
        let second = r.body(boxed);
        assert_eq!(first, second);
        assert_eq!(first.fields.len(), 1);
        assert_eq!(first.constructors.len(), 1, "default constructor");
        assert_eq!(first.superclass, r.root());
    }

    #[test]
    fn test_member_canonical_ids() {
        let r = resolver();
        let boxed = r.class("p.Box").unwrap();
        let body = r.body(boxed);
        assert_eq!(r.decl(body.fields[0]).canonical, "p.Box#value");
        assert_eq!(r.decl(body.methods[0]).canonical, "p.Box#get()");
        assert_eq!(r.decl(body.constructors[0]).canonical, "p.Box#<init>()");
        assert_eq!(r.decl(body.type_params[0]).canonical, "p.Box::T");
    }

    #[test]
    fn test_parameterized_dedup() {
        let r = resolver();
        let boxed = r.class("p.Box").unwrap();
        let string = r.string_type().unwrap();
        let a = r.parameterized(boxed, vec![string]);
        let b = r.parameterized(boxed, vec![string]);
        assert_eq!(a, b);
        assert_eq!(r.decl(a).canonical, "p.Box<java.lang.String>");
        assert_eq!(r.display(a), "p.Box<java.lang.String>");
    }

    #[test]
    fn test_arrays_have_length() {
        let r = resolver();
        let ints = r.class("int[]").unwrap();
        assert_eq!(r.decl(ints).array_element(), Some(r.primitive(PrimitiveKind::Int)));
        let length = r.array_length(ints).unwrap();
        assert_eq!(r.decl(length).name, "length");
        assert_eq!(r.decl_eval_type(length), Some(r.primitive(PrimitiveKind::Int)));
        assert_eq!(r.array_of(r.primitive(PrimitiveKind::Int)), ints);
    }

    #[test]
    fn test_overlay_refresh_keeps_identity() {
        let r = resolver();
        let meta = ClassMeta::class("q.Src").field("a", "int");
        let id = r.define_source_class(meta.clone());
        let a = r.body(id).fields[0];

        let id2 = r.define_source_class(meta.field("b", "int"));
        assert_eq!(id, id2);
        let body = r.body(id);
        assert_eq!(body.fields.len(), 2);
        assert_eq!(body.fields[0], a);

        let id3 = r.define_source_class(ClassMeta::class("q.Src").field("b", "int"));
        assert_eq!(id, id3);
        assert_eq!(r.body(id).fields.len(), 1);
        assert!(r.lookup_canonical("q.Src#a").is_none());
    }

    #[test]
    fn test_header_change_gives_new_identity() {
        let r = resolver();
        let id = r.define_source_class(ClassMeta::class("q.Src"));
        let id2 = r.define_source_class(ClassMeta::interface("q.Src"));
        assert_ne!(id, id2);
        assert_eq!(r.class("q.Src"), Some(id2));
    }

    #[test]
    fn test_removed_source_class_is_unresolved() {
        let r = resolver();
        r.define_source_class(ClassMeta::class("q.Gone"));
        assert!(r.package("q").is_some());
        r.remove_source_class("q.Gone");
        assert!(r.class("q.Gone").is_none());
    }

    struct Broken;

    impl TypeSource for Broken {
        fn class_header(&self, canonical: &str) -> Option<ClassHeader> {
            Some(ClassMeta::class(canonical).header)
        }

        fn class_members(&self, canonical: &str) -> Result<ClassMembers, TypeSourceError> {
            Err(TypeSourceError::Introspection {
                class: SmolStr::new(canonical),
                reason: "class loading failed".to_string(),
            })
        }

        fn has_package(&self, _package: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_introspection_failure_gives_empty_body() {
        let r = Resolver::new(Arc::new(Broken));
        let c = r.class("x.Y").unwrap();
        let body = r.body(c);
        assert!(body.fields.is_empty());
        assert!(body.methods.is_empty());
    }

    #[test]
    fn test_local_var_canonical() {
        let r = resolver();
        let x = r.local_var(FileId::new(2), 14, "x", None);
        assert_eq!(r.decl(x).canonical, "file#2@14:x");
        assert_eq!(r.local_var(FileId::new(2), 14, "x", None), x);
    }
}
