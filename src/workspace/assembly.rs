//! Assembly metadata: the types an assembly exports and their members.
//!
//! Assemblies are described by JSON manifests. A manifest lists every type
//! with its fully qualified name (nested types joined with `+`), its
//! visibility, base type and members.

use crate::error::AssistResult;
use crate::symbol::Visibility;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of an exported type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// Kind of a type member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Constructor,
    Event,
}

fn default_public() -> Visibility {
    Visibility::Public
}

fn default_true() -> bool {
    true
}

/// `get` or `set` accessor of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorInfo {
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_public")]
    pub access: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    /// Field or property type, method return type; empty for constructors
    #[serde(default)]
    pub type_name: String,
    #[serde(default = "default_public")]
    pub access: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<AccessorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<AccessorInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterInfo>,
}

impl MemberInfo {
    /// Static-ness of the member. Properties take it from their getter,
    /// falling back to the setter.
    pub fn effective_static(&self) -> bool {
        match self.kind {
            MemberKind::Property => self
                .getter
                .as_ref()
                .or(self.setter.as_ref())
                .map(|a| a.is_static)
                .unwrap_or(self.is_static),
            _ => self.is_static,
        }
    }

    /// `Write(System.Int32 value)`
    pub fn parameter_text(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// `System.Text.StringBuilder`, `System.Environment+SpecialFolder`
    pub full_name: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub kind: MetadataKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberInfo>,
}

impl TypeInfo {
    /// Outermost declaring type's full name, e.g. `System.Environment`
    fn outer_name(&self) -> &str {
        self.full_name.split('+').next().unwrap_or(&self.full_name)
    }

    /// Namespace of the type (of its outermost declaring type when nested)
    pub fn namespace(&self) -> &str {
        let outer = self.outer_name();
        outer.rfind('.').map(|i| &outer[..i]).unwrap_or("")
    }

    /// Simple name: last `.` or `+` segment
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit(['.', '+'])
            .next()
            .unwrap_or(&self.full_name)
    }

    pub fn is_nested(&self) -> bool {
        self.full_name.contains('+')
    }

    /// Full name of the type declaring this one, for nested types
    pub fn declaring_type(&self) -> Option<&str> {
        self.full_name.rfind('+').map(|i| &self.full_name[..i])
    }

    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    /// Members with the given name, across kinds
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberInfo> {
        self.members.iter().filter(move |m| m.name == name)
    }
}

/// On-disk description of an assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyManifest {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeInfo>,
}

/// A loaded assembly, types keyed by full name.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub name: String,
    types: HashMap<String, Arc<TypeInfo>>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: HashMap::new(),
        }
    }

    pub fn with_type(mut self, ty: TypeInfo) -> Self {
        self.insert(ty);
        self
    }

    pub fn insert(&mut self, ty: TypeInfo) {
        self.types.insert(ty.full_name.clone(), Arc::new(ty));
    }

    /// Exact lookup, regardless of visibility
    pub fn get_type(&self, full_name: &str) -> Option<Arc<TypeInfo>> {
        self.types.get(full_name).cloned()
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeInfo>> {
        self.types.values()
    }

    pub fn public_types(&self) -> impl Iterator<Item = &Arc<TypeInfo>> {
        self.types.values().filter(|t| t.is_public)
    }

    /// Every namespace declared by a type in this assembly
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.types
            .values()
            .map(|t| t.namespace())
            .filter(|ns| !ns.is_empty())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl From<AssemblyManifest> for Assembly {
    fn from(manifest: AssemblyManifest) -> Self {
        let mut assembly = Assembly::new(manifest.name);
        for ty in manifest.types {
            assembly.insert(ty);
        }
        assembly
    }
}

/// A public type found in a workspace assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub assembly: String,
    pub ty: Arc<TypeInfo>,
}

impl ResolvedType {
    pub fn full_name(&self) -> &str {
        &self.ty.full_name
    }
}

/// Loads assemblies by name and enumerates their types.
///
/// Implementations must be safe to probe from several threads at once:
/// assembly search may run candidates in parallel.
pub trait TypeLookup: Send + Sync {
    /// Load an assembly by name
    fn load_assembly(&self, name: &str) -> AssistResult<Arc<Assembly>>;

    /// Names of every assembly this lookup can load
    fn assembly_names(&self) -> Vec<String>;
}
