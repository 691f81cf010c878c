//! Heuristic code assist for C# sources and markup pages.
//!
//! Given a source buffer and a cursor offset, [`CompletionEngine`] finds the
//! locally declared variables, members inherited from base types, visible
//! types and namespaces, and produces ranked [`CompletionItem`]s. Type
//! metadata comes from assembly manifests loaded into a [`SymbolIndex`].

pub mod completion;
pub mod config;
pub mod display;
pub mod error;
pub mod parsing;
pub mod resolution;
pub mod source;
pub mod symbol;
pub mod types;
pub mod workspace;

// Explicit exports for better API clarity
pub use completion::{Completion, CompletionCategory, CompletionEngine, CompletionItem};
pub use config::Settings;
pub use error::{AssistError, AssistResult};
pub use parsing::{LookupTarget, normalize};
pub use source::{SourceBuffer, SourceKind};
pub use symbol::{MethodSignature, PropertySignature, TypeShape, Variable, Visibility};
pub use types::{DeclarationContext, Zone};
pub use workspace::{Assembly, SymbolIndex, TypeLookup, WorkspaceContext};
