//! Namespaces known to the workspace and the ones visible from a source.

use super::assembly::TypeLookup;
use crate::parsing::normalize::normalize;
use crate::parsing::members::zone_end;
use crate::source::{SourceBuffer, SourceKind};
use crate::types::Zone;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

static USING_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?(?P<ns>[\w.]+)\s*;")
        .expect("valid using regex")
});

static USING_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(?P<alias>\w+)\s*=\s*(?P<target>[\w.]+)\s*;")
        .expect("valid using alias regex")
});

/// A directive still being typed: `using Sys` with nothing after it
static USING_IN_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:global\s+)?using\s+(?:static\s+)?(?P<partial>[\w.]*)$")
        .expect("valid using-in-progress regex")
});

static IMPORT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<%@\s*Import\s+Namespace\s*=\s*"(?P<ns>[^"]+)""#)
        .expect("valid import directive regex")
});

static NAMESPACE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnamespace\s+(?P<name>[\w.]+)\s*(?P<open>[{;])")
        .expect("valid namespace regex")
});

/// Every namespace exported by the workspace assemblies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceIndex {
    full: BTreeSet<String>,
    roots: BTreeSet<String>,
}

impl NamespaceIndex {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            index.add(name.into());
        }
        index
    }

    /// Collect namespaces from every loadable assembly; failures are skipped.
    pub fn build(lookup: &dyn TypeLookup) -> Self {
        let mut index = Self::default();
        for name in lookup.assembly_names() {
            match lookup.load_assembly(&name) {
                Ok(assembly) => {
                    for ns in assembly.namespaces() {
                        index.add(ns.to_string());
                    }
                }
                Err(e) => debug!("skipping assembly {name} while collecting namespaces: {e}"),
            }
        }
        index
    }

    fn add(&mut self, name: String) {
        if name.is_empty() {
            return;
        }
        if let Some(root) = name.split('.').next() {
            self.roots.insert(root.to_string());
        }
        self.full.insert(name);
    }

    pub fn full(&self) -> impl Iterator<Item = &str> {
        self.full.iter().map(String::as_str)
    }

    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    /// `name` is a namespace or the parent of one
    pub fn is_namespace(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let nested = format!("{name}.");
        self.full
            .iter()
            .any(|ns| ns == name || ns.starts_with(&nested))
    }

    /// First-level children of `prefix`, sorted and without duplicates.
    /// An empty prefix lists the root namespaces.
    pub fn immediate_child_namespaces(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim_end_matches('.');
        if prefix.is_empty() {
            return self.roots.iter().cloned().collect();
        }

        let nested = format!("{prefix}.");
        let children: BTreeSet<&str> = self
            .full
            .iter()
            .filter_map(|ns| ns.strip_prefix(&nested))
            .filter_map(|rest| rest.split('.').next())
            .filter(|child| !child.is_empty())
            .collect();
        children.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

/// Namespaces imported or enclosing the cursor, in search order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceVisibilitySet {
    /// `using` directives (or page imports) in source order
    pub usings: Vec<String>,
    /// Enclosing namespace first, then its parents
    pub enclosing: Vec<String>,
    pub defaults: Vec<String>,
    /// `using Alias = Target;`
    pub aliases: Vec<(String, String)>,
}

impl NamespaceVisibilitySet {
    pub fn for_source(source: &SourceBuffer, defaults: &[String]) -> Self {
        let normalized = normalize(source.text());
        let mut usings: Vec<String> = USING_DIRECTIVE
            .captures_iter(&normalized)
            .filter_map(|c| c.name("ns").map(|m| m.as_str().to_string()))
            .collect();
        if source.kind() == SourceKind::Markup {
            usings.extend(
                IMPORT_DIRECTIVE
                    .captures_iter(source.text())
                    .filter_map(|c| c.name("ns").map(|m| m.as_str().trim().to_string())),
            );
        }

        let aliases = USING_ALIAS
            .captures_iter(&normalized)
            .filter_map(|c| {
                Some((
                    c.name("alias")?.as_str().to_string(),
                    c.name("target")?.as_str().to_string(),
                ))
            })
            .collect();

        Self {
            usings,
            enclosing: enclosing_namespaces(&normalized, source.cursor()),
            defaults: defaults.to_vec(),
            aliases,
        }
    }

    /// The global namespace, then usings, enclosing namespaces and
    /// configured defaults. First occurrence wins.
    pub fn search_order(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        std::iter::once(String::new())
            .chain(self.usings.iter().cloned())
            .chain(self.enclosing.iter().cloned())
            .chain(self.defaults.iter().cloned())
            .filter(|ns| seen.insert(ns.clone()))
            .collect()
    }

    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, target)| target.as_str())
    }
}

/// Full name of the namespace around `offset`, followed by its parents.
///
/// Handles nested blocks (`namespace A { namespace B {`) and file-scoped
/// declarations (`namespace A.B;`).
pub fn enclosing_namespaces(text: &str, offset: usize) -> Vec<String> {
    let mut path: Vec<&str> = Vec::new();

    for caps in NAMESPACE_DECLARATION.captures_iter(text) {
        let (Some(whole), Some(name), Some(open)) = (caps.get(0), caps.name("name"), caps.name("open"))
        else {
            continue;
        };
        let zone = match open.as_str() {
            "{" => Zone::new(whole.start(), zone_end(text, whole.start())),
            _ => Zone::new(whole.start(), text.len()),
        };
        if zone.contains(offset) {
            path.push(name.as_str());
        }
    }

    let full = path.join(".");
    let mut chain = Vec::new();
    let mut current = full.as_str();
    while !current.is_empty() {
        chain.push(current.to_string());
        current = current.rfind('.').map(|i| &current[..i]).unwrap_or("");
    }
    chain
}

/// Partial namespace typed after `using` on the cursor line, if the cursor
/// is in a directive rather than a `using (...)` statement.
pub fn using_in_progress(source: &SourceBuffer) -> Option<String> {
    if !source.is_before_class_declaration() {
        return None;
    }
    USING_IN_PROGRESS
        .captures(source.line_before_cursor())
        .and_then(|c| c.name("partial"))
        .map(|m| m.as_str().to_string())
}
