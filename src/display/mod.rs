//! Terminal display for the command-line front end.
//!
//! Completion lists and namespace listings are rendered as tables; status
//! lines go through the shared theme.

pub mod tables;
pub mod theme;

pub use tables::{create_completion_table, create_namespace_table};
pub use theme::{THEME, Theme};
