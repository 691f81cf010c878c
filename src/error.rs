//! Error types for the code-assist engine
//!
//! Only the outer surface is fallible: reading source files, loading assembly
//! manifests and reading configuration. The completion core itself is total and
//! reports "nothing found" through `Option`/empty results instead of errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the code-assist engine
#[derive(Error, Debug)]
pub enum AssistError {
    /// File system errors
    #[error("Failed to read source file '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read assembly manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Manifest content errors
    #[error("Failed to parse assembly manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Lookup errors
    #[error("Assembly '{name}' is not loaded in the symbol index")]
    AssemblyNotFound { name: String },

    #[error("Cursor offset {offset} is past the end of the buffer ({len} bytes)")]
    CursorOutOfRange { offset: usize, len: usize },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl AssistError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::SourceRead { .. } => "SOURCE_READ_ERROR",
            Self::ManifestRead { .. } => "MANIFEST_READ_ERROR",
            Self::ManifestParse { .. } => "MANIFEST_PARSE_ERROR",
            Self::AssemblyNotFound { .. } => "ASSEMBLY_NOT_FOUND",
            Self::CursorOutOfRange { .. } => "CURSOR_OUT_OF_RANGE",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::SourceRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is valid UTF-8",
            ],
            Self::ManifestRead { .. } | Self::ManifestParse { .. } => vec![
                "Regenerate the manifest from the compiled assembly",
                "The assembly is skipped during completion until the manifest is fixed",
            ],
            Self::AssemblyNotFound { .. } => vec![
                "Add the manifest directory to 'workspace.manifest_dirs' in settings.toml",
                "Check the assembly name listed under 'workspace.assemblies'",
            ],
            Self::CursorOutOfRange { .. } => {
                vec!["Pass a byte offset between 0 and the file length"]
            }
            Self::ConfigError { .. } => vec![
                "Run 'sharp-assist init --force' to regenerate the settings file",
            ],
            Self::General(_) => vec![],
        }
    }
}

/// Result type alias for code-assist operations
pub type AssistResult<T> = Result<T, AssistError>;
