//! Configuration module for the code-assist engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.sharpassist/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SA_` and use double underscores
//! to separate nested levels:
//! - `SA_ASSIST__NESTED_TYPE_DEPTH=1` sets `assist.nested_type_depth`
//! - `SA_ASSIST__PARALLEL_PROBE=true` sets `assist.parallel_probe`
//! - `SA_DEBUG=true` sets `debug`

use crate::error::{AssistError, AssistResult};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding the settings file, looked up from the current directory
pub const CONFIG_DIR: &str = ".sharpassist";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .sharpassist is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Completion behaviour
    #[serde(default)]
    pub assist: AssistConfig,

    /// Assemblies and namespaces of the workspace
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssistConfig {
    /// Only offer locals whose scope contains the cursor
    #[serde(default = "default_true")]
    pub visible_scopes_only: bool,

    /// Trailing dots that may denote nested types (`Outer+Inner`)
    #[serde(default = "default_nested_type_depth")]
    pub nested_type_depth: usize,

    /// Base types followed when harvesting inherited members
    #[serde(default = "default_max_inheritance_depth")]
    pub max_inheritance_depth: usize,

    /// Probe candidate assemblies in parallel
    #[serde(default = "default_false")]
    pub parallel_probe: bool,

    /// Base type of markup pages without an `Inherits=` attribute
    #[serde(default = "default_page_base")]
    pub default_page_base: String,

    /// Offer C# keywords for bare identifiers
    #[serde(default = "default_true")]
    pub include_keywords: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkspaceConfig {
    /// Assemblies searched for every type; empty means all loaded manifests
    #[serde(default)]
    pub assemblies: Vec<String>,

    /// Directories scanned for `*.json` assembly manifests
    #[serde(default = "default_manifest_dirs")]
    pub manifest_dirs: Vec<PathBuf>,

    /// Namespaces visible from every source
    #[serde(default)]
    pub default_namespaces: Vec<String>,

    /// Namespace -> assemblies searched first for its types
    #[serde(default)]
    pub namespace_assemblies: HashMap<String, Vec<String>>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_nested_type_depth() -> usize {
    3
}
fn default_max_inheritance_depth() -> usize {
    16
}
fn default_page_base() -> String {
    "System.Web.UI.Page".to_string()
}
fn default_manifest_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(CONFIG_DIR).join("manifests")]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            assist: AssistConfig::default(),
            workspace: WorkspaceConfig::default(),
        }
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            visible_scopes_only: true,
            nested_type_depth: default_nested_type_depth(),
            max_inheritance_depth: default_max_inheritance_depth(),
            parallel_probe: false,
            default_page_base: default_page_base(),
            include_keywords: true,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            assemblies: Vec::new(),
            manifest_dirs: default_manifest_dirs(),
            default_namespaces: vec!["System".to_string()],
            namespace_assemblies: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file at `config_path`, then `SA_` variables
    fn figment(config_path: impl AsRef<Path>) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path.as_ref()))
            // Double underscore (__) separates nested levels
            .merge(Env::prefixed("SA_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .sharpassist directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Find the settings file by looking for .sharpassist directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .sharpassist is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path).extract().map_err(Box::new)
    }

    /// Manifest directories, relative entries resolved against the workspace root
    pub fn resolved_manifest_dirs(&self) -> Vec<PathBuf> {
        self.workspace
            .manifest_dirs
            .iter()
            .map(|dir| match &self.workspace_root {
                Some(root) if dir.is_relative() => root.join(dir),
                _ => dir.clone(),
            })
            .collect()
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> AssistResult<()> {
        let path = path.as_ref();
        let parent = path.parent().ok_or_else(|| AssistError::ConfigError {
            reason: format!("invalid settings path '{}'", path.display()),
        })?;
        std::fs::create_dir_all(parent).map_err(|e| AssistError::ConfigError {
            reason: format!("cannot create '{}': {e}", parent.display()),
        })?;

        let toml_string = toml::to_string_pretty(self).map_err(|e| AssistError::ConfigError {
            reason: e.to_string(),
        })?;
        std::fs::write(path, toml_string).map_err(|e| AssistError::ConfigError {
            reason: format!("cannot write '{}': {e}", path.display()),
        })
    }

    /// Check that a readable, valid settings file exists
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str::<Settings>(&content).map(|_| ()).map_err(|e| {
                format!(
                    "Configuration file is corrupted: {e}\nRun 'sharp-assist init --force' to regenerate."
                )
            }),
            Err(e) => Err(format!("Cannot read configuration file: {e}")),
        }
    }

    /// Create a default settings file with helpful comments in the current
    /// directory
    pub fn init_config_file(force: bool) -> AssistResult<PathBuf> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Create a default settings file under `dir`
    pub fn init_config_file_in(dir: &Path, force: bool) -> AssistResult<PathBuf> {
        let config_path = dir.join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err(AssistError::ConfigError {
                reason: "Configuration file already exists. Use --force to overwrite".to_string(),
            });
        }

        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(config_dir.join("manifests")).map_err(|e| {
            AssistError::ConfigError {
                reason: format!("cannot create '{}': {e}", config_dir.display()),
            }
        })?;

        let template = r#"# sharp-assist configuration file

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

[assist]
# Only offer local variables whose scope contains the cursor
visible_scopes_only = true

# How many trailing dots of a name may be nested-type separators
# (Outer.Inner -> Outer+Inner). 1 allows a single level of nesting.
nested_type_depth = 3

# Base types followed when collecting inherited fields and properties
max_inheritance_depth = 16

# Probe assemblies on a thread pool. The result is always the first match
# in priority order.
parallel_probe = false

# Base type of .aspx/.ascx/.master pages without an Inherits attribute
default_page_base = "System.Web.UI.Page"

# Offer C# keywords when completing a bare identifier
include_keywords = true

[workspace]
# Assemblies searched for every type. Empty: every loaded manifest.
assemblies = []

# Directories scanned for *.json assembly manifests (relative to the
# workspace root)
manifest_dirs = [".sharpassist/manifests"]

# Namespaces visible from every file, after its own using directives
default_namespaces = ["System"]

# Assemblies searched first for types of a namespace
[workspace.namespace_assemblies]
# "System.Web" = ["System.Web"]
"#;

        std::fs::write(&config_path, template).map_err(|e| AssistError::ConfigError {
            reason: format!("cannot write '{}': {e}", config_path.display()),
        })?;

        Ok(config_path)
    }
}
