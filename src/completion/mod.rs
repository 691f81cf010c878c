//! Completion items and the engine producing them.

pub mod engine;
pub mod items;

pub use engine::{AssistOptions, AssistState, Completion, CompletionEngine, KEYWORDS};
pub use items::{
    AccessLevel, CompletionCategory, CompletionItem, InsertionAction, collapse_overloads, rank,
};
