//! Workspace assemblies, namespaces and type search.
//!
//! [`WorkspaceContext`] is built once and passed explicitly to every
//! completion request. Its derived lists (assembly names, namespace sets)
//! are rebuilt only by [`WorkspaceContext::update_lists`]; a stale copy only
//! degrades completion quality.

pub mod assembly;
pub mod index;
pub mod namespaces;
pub mod search;

pub use assembly::{
    AccessorInfo, Assembly, AssemblyManifest, MemberInfo, MemberKind, MetadataKind, ParameterInfo,
    ResolvedType, TypeInfo, TypeLookup,
};
pub use index::SymbolIndex;
pub use namespaces::{NamespaceIndex, NamespaceVisibilitySet, enclosing_namespaces, using_in_progress};
pub use search::{qualify_and_resolve, search_assembly};

use crate::config::Settings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Tunables for type search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// How many trailing dots may be read as nested-type separators
    pub nested_type_depth: usize,
    /// Probe candidate assemblies on the rayon pool
    pub parallel_probe: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            nested_type_depth: 3,
            parallel_probe: false,
        }
    }
}

/// Lists derived from the workspace assemblies. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceLists {
    pub assemblies: Arc<Vec<String>>,
    pub namespaces: Arc<NamespaceIndex>,
}

#[derive(Clone)]
pub struct WorkspaceContext {
    lookup: Arc<dyn TypeLookup>,
    /// Workspace assemblies pinned by configuration; empty means all
    pinned: Vec<String>,
    namespace_assemblies: HashMap<String, Vec<String>>,
    lists: WorkspaceLists,
    options: SearchOptions,
}

impl std::fmt::Debug for WorkspaceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceContext")
            .field("assemblies", &self.lists.assemblies)
            .field("namespaces", &self.lists.namespaces.len())
            .field("options", &self.options)
            .finish()
    }
}

impl WorkspaceContext {
    /// Build a context over every assembly `lookup` knows.
    pub fn new(lookup: Arc<dyn TypeLookup>) -> Self {
        let mut ctx = Self {
            lookup,
            pinned: Vec::new(),
            namespace_assemblies: HashMap::new(),
            lists: WorkspaceLists::default(),
            options: SearchOptions::default(),
        };
        ctx.update_lists();
        ctx
    }

    /// Load manifests from the configured directories and apply settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let dirs = settings.resolved_manifest_dirs();
        let index = SymbolIndex::from_dirs(&dirs);
        debug!(assemblies = index.len(), "symbol index loaded");

        let mut ctx = Self::new(Arc::new(index))
            .with_namespace_assemblies(settings.workspace.namespace_assemblies.clone())
            .with_options(SearchOptions {
                nested_type_depth: settings.assist.nested_type_depth,
                parallel_probe: settings.assist.parallel_probe,
            });
        ctx.pinned = settings.workspace.assemblies.clone();
        ctx.update_lists();
        ctx
    }

    pub fn with_namespace_assemblies(mut self, map: HashMap<String, Vec<String>>) -> Self {
        self.namespace_assemblies = map;
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict the workspace to the named assemblies and rebuild the lists.
    pub fn with_assemblies(mut self, names: Vec<String>) -> Self {
        self.pinned = names;
        self.update_lists();
        self
    }

    /// Reuse lists computed by another context instead of rebuilding them.
    pub fn with_lists(mut self, lists: WorkspaceLists) -> Self {
        self.lists = lists;
        self
    }

    /// Recompute the assembly list and namespace sets from the lookup.
    pub fn update_lists(&mut self) {
        let assemblies = if self.pinned.is_empty() {
            self.lookup.assembly_names()
        } else {
            self.pinned.clone()
        };
        let namespaces = NamespaceIndex::build(self.lookup.as_ref());
        debug!(
            assemblies = assemblies.len(),
            namespaces = namespaces.len(),
            "workspace lists updated"
        );
        self.lists = WorkspaceLists {
            assemblies: Arc::new(assemblies),
            namespaces: Arc::new(namespaces),
        };
    }

    pub fn copy_lists(&self) -> WorkspaceLists {
        self.lists.clone()
    }

    pub fn lookup(&self) -> &dyn TypeLookup {
        self.lookup.as_ref()
    }

    pub fn assemblies(&self) -> &[String] {
        &self.lists.assemblies
    }

    pub fn namespaces(&self) -> &NamespaceIndex {
        &self.lists.namespaces
    }

    pub fn assemblies_for_namespace(&self, namespace: &str) -> &[String] {
        self.namespace_assemblies
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }
}
