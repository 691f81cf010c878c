//! Type declarations and the base types they inherit from.

use super::members::zone_end;
use super::normalize::normalize;
use crate::source::{SourceBuffer, SourceKind};
use crate::symbol::split_type_arguments;
use crate::types::Zone;
use regex::Regex;
use std::sync::LazyLock;

static TYPE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<kind>class|struct|interface|record)\s+(?P<name>[A-Za-z_]\w*)\s*(?:<[^<>{};]*>)?\s*(?:\([^)]*\))?\s*(?::\s*(?P<bases>[^{;]+?))?\s*(?:\bwhere\b[^{;]*)?(?P<open>[{;])",
    )
    .expect("valid type declaration regex")
});

static INHERITS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<%@\s*(?:Page|Control|Master)\b[^>]*?\bInherits\s*=\s*"(?P<base>[^"]+)""#)
        .expect("valid Inherits attribute regex")
});

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Record => "record",
        }
    }
}

/// A class, struct, interface or record declared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    /// Base class and interfaces, generic arguments stripped
    pub bases: Vec<String>,
    pub zone: Zone,
}

/// Find every type declaration in `text`.
pub fn type_declarations(text: &str) -> Vec<TypeDeclaration> {
    let text = normalize(text);

    TYPE_DECLARATION
        .captures_iter(&text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.name("name")?.as_str().to_string();
            let kind = match caps.name("kind")?.as_str() {
                "class" => TypeKind::Class,
                "struct" => TypeKind::Struct,
                "interface" => TypeKind::Interface,
                _ => TypeKind::Record,
            };
            let bases = caps
                .name("bases")
                .map(|b| parse_base_list(b.as_str()))
                .unwrap_or_default();
            let end = match caps.name("open").map(|m| m.as_str()) {
                Some("{") => zone_end(&text, whole.start()),
                _ => whole.end(),
            };

            Some(TypeDeclaration {
                name,
                kind,
                bases,
                zone: Zone::new(whole.start(), end),
            })
        })
        .collect()
}

/// `Base<T>, IFoo , IBar<int>` -> [`Base`, `IFoo`, `IBar`]
fn parse_base_list(bases: &str) -> Vec<String> {
    split_type_arguments(bases)
        .into_iter()
        .map(|b| match b.find('<') {
            Some(open) => b[..open].trim(),
            None => b.trim(),
        })
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Innermost type declaration containing `offset`, or the first declaration
/// of the file when the cursor is outside every type.
pub fn enclosing_type(declarations: &[TypeDeclaration], offset: usize) -> Option<&TypeDeclaration> {
    declarations
        .iter()
        .filter(|d| d.zone.contains(offset))
        .min_by_key(|d| d.zone.len())
        .or_else(|| declarations.first())
}

/// Base type names of the declaration enclosing the cursor.
///
/// Code files yield the enclosing type's base class and interfaces. Markup
/// pages yield their `Inherits=` attribute, or `default_page_base` when the
/// directive names none.
pub fn base_type_names(source: &SourceBuffer, default_page_base: &str) -> Vec<String> {
    match source.kind() {
        SourceKind::Markup => {
            let base = INHERITS_ATTRIBUTE
                .captures(source.text())
                .and_then(|c| c.name("base"))
                .map(|m| m.as_str().trim().to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| default_page_base.to_string());
            vec![base]
        }
        SourceKind::Code => {
            let declarations = type_declarations(source.text());
            enclosing_type(&declarations, source.cursor())
                .map(|d| d.bases.clone())
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_declarations_with_bases() {
        let src = "namespace N {\n  public class Form1 : Form, IDisposable, IList<int> where T : new() {\n    class Inner { }\n  }\n  struct Point { }\n}";
        let decls = type_declarations(src);
        assert_eq!(decls.len(), 3);

        assert_eq!(decls[0].name, "Form1");
        assert_eq!(decls[0].bases, vec!["Form", "IDisposable", "IList"]);
        assert_eq!(decls[1].name, "Inner");
        assert!(decls[1].bases.is_empty());
        assert_eq!(decls[2].kind, TypeKind::Struct);
        assert!(decls[0].zone.encloses(&decls[1].zone));
    }

    #[test]
    fn test_enclosing_type_prefers_innermost() {
        let src = "class Outer : A {\n  class Inner : B {\n    void F() { }\n  }\n}";
        let decls = type_declarations(src);
        let cursor = src.find("void F").unwrap();
        assert_eq!(enclosing_type(&decls, cursor).unwrap().name, "Inner");

        let source = SourceBuffer::new(src, cursor);
        assert_eq!(base_type_names(&source, "System.Web.UI.Page"), vec!["B"]);
    }

    #[test]
    fn test_markup_inherits() {
        let src = "<%@ Page Language=\"C#\" AutoEventWireup=\"true\" Inherits=\"MySite.Default\" %>\n<html></html>";
        let source = SourceBuffer::new(src, src.len()).with_kind(SourceKind::Markup);
        assert_eq!(
            base_type_names(&source, "System.Web.UI.Page"),
            vec!["MySite.Default"]
        );
    }

    #[test]
    fn test_markup_defaults_to_page_base() {
        let src = "<%@ Page Language=\"C#\" %>\n<html></html>";
        let source = SourceBuffer::new(src, 5).with_kind(SourceKind::Markup);
        assert_eq!(
            base_type_names(&source, "System.Web.UI.Page"),
            vec!["System.Web.UI.Page"]
        );
    }

    #[test]
    fn test_comments_do_not_declare_types() {
        let src = "// class Fake : Nope {}\nclass Real { }";
        let decls = type_declarations(src);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Real");
    }
}
