//! Symbols that come from outside the current source.

pub mod inherited;

pub use inherited::{InheritanceOptions, base_types, inheritance_chain, resolve as resolve_inherited};
