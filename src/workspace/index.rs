//! In-memory symbol index built from assembly manifests.

use super::assembly::{Assembly, AssemblyManifest, TypeLookup};
use crate::error::{AssistError, AssistResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Assemblies known to the workspace, keyed by name.
///
/// Cloning is cheap: assemblies are shared.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    assemblies: HashMap<String, Arc<Assembly>>,
    /// Registration order, used whenever "all assemblies" are listed
    order: Vec<String>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an assembly, replacing any earlier one with the same name.
    pub fn insert(&mut self, assembly: Assembly) {
        let name = assembly.name.clone();
        if self.assemblies.insert(name.clone(), Arc::new(assembly)).is_none() {
            self.order.push(name);
        }
    }

    pub fn with_assembly(mut self, assembly: Assembly) -> Self {
        self.insert(assembly);
        self
    }

    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }

    /// Read and parse a single manifest file.
    pub fn load_manifest(path: &Path) -> AssistResult<Assembly> {
        let content = std::fs::read_to_string(path).map_err(|source| AssistError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: AssemblyManifest =
            serde_json::from_str(&content).map_err(|source| AssistError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(manifest.into())
    }

    /// Every `*.json` file below `dir`, sorted for a stable load order
    fn manifest_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files
    }

    /// Load every manifest found under `dirs`.
    ///
    /// A manifest that cannot be read or parsed is skipped with a warning;
    /// one bad reference must not block completion. Returns how many
    /// assemblies were loaded.
    pub fn load_dirs<P: AsRef<Path>>(&mut self, dirs: &[P]) -> usize {
        let mut loaded = 0;
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                warn!("manifest directory {} does not exist", dir.display());
                continue;
            }
            for path in Self::manifest_files(dir) {
                match Self::load_manifest(&path) {
                    Ok(assembly) => {
                        debug!(
                            assembly = %assembly.name,
                            types = assembly.len(),
                            "loaded manifest {}",
                            path.display()
                        );
                        self.insert(assembly);
                        loaded += 1;
                    }
                    Err(e) => warn!("skipping manifest: {e}"),
                }
            }
        }
        loaded
    }

    pub fn from_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut index = Self::new();
        index.load_dirs(dirs);
        index
    }
}

impl TypeLookup for SymbolIndex {
    fn load_assembly(&self, name: &str) -> AssistResult<Arc<Assembly>> {
        self.assemblies
            .get(name)
            .cloned()
            .ok_or_else(|| AssistError::AssemblyNotFound {
                name: name.to_string(),
            })
    }

    fn assembly_names(&self) -> Vec<String> {
        self.order.clone()
    }
}
