//! Declarations discovered by the scanners: variables, methods and properties.

pub mod cts;

use crate::types::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared accessibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Protected,
    Internal,
    ProtectedInternal,
}

impl Visibility {
    /// Read accessibility from a modifier list such as `"public static "`.
    ///
    /// Members without an access modifier are private, as in C#.
    pub fn from_modifiers(modifiers: &str) -> Self {
        let mut public = false;
        let mut protected = false;
        let mut internal = false;
        let mut private = false;
        for word in modifiers.split_whitespace() {
            match word {
                "public" => public = true,
                "protected" => protected = true,
                "internal" => internal = true,
                "private" => private = true,
                _ => {}
            }
        }

        match (public, protected, internal, private) {
            (true, ..) => Visibility::Public,
            (_, true, true, _) => Visibility::ProtectedInternal,
            // `private protected` is still only reachable from derived types
            (_, true, false, _) => Visibility::Protected,
            (_, false, true, _) => Visibility::Internal,
            _ => Visibility::Private,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::ProtectedInternal => "protected internal",
        }
    }
}

/// Shape of a declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeShape {
    Simple,
    Array { element: String },
    Generic1 { t1: String },
    Generic2 { t1: String, t2: String },
}

impl TypeShape {
    /// Split a written type into its base/template name and shape.
    ///
    /// `List<String>` -> (`List`, Generic1(`String`)), `int[]` -> (`int`,
    /// Array(`int`)). Generics with more than two arguments keep only the
    /// template name and are treated as simple.
    pub fn parse(type_text: &str) -> (String, TypeShape) {
        let text = type_text.trim().trim_end_matches('?');

        if let Some(element) = text.strip_suffix("[]") {
            let element = element.trim_end();
            return (
                element.to_string(),
                TypeShape::Array {
                    element: element.to_string(),
                },
            );
        }

        if let (Some(open), true) = (text.find('<'), text.ends_with('>')) {
            let template = text[..open].trim().to_string();
            let args = split_type_arguments(&text[open + 1..text.len() - 1]);
            let shape = match args.as_slice() {
                [t1] => TypeShape::Generic1 { t1: t1.to_string() },
                [t1, t2] => TypeShape::Generic2 {
                    t1: t1.to_string(),
                    t2: t2.to_string(),
                },
                _ => TypeShape::Simple,
            };
            return (template, shape);
        }

        (text.to_string(), TypeShape::Simple)
    }

    pub fn generic_arity(&self) -> usize {
        match self {
            TypeShape::Generic1 { .. } => 1,
            TypeShape::Generic2 { .. } => 2,
            _ => 0,
        }
    }
}

/// Split `A, B<C, D>` on top-level commas.
pub fn split_type_arguments(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = args[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// A declared variable or field, or a member harvested from a base type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Offset of the variable name in the source; synthetic entries use 0
    pub declaration_offset: usize,
    pub is_local: bool,
    pub is_static: bool,
    /// Base or generic-template name exactly as written
    pub declared_type_name: String,
    pub shape: TypeShape,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        declaration_offset: usize,
        declared_type_name: impl Into<String>,
        shape: TypeShape,
    ) -> Self {
        Self {
            name: name.into(),
            declaration_offset,
            is_local: false,
            is_static: false,
            declared_type_name: declared_type_name.into(),
            shape,
        }
    }

    /// Build a variable from a full written type such as `Dictionary<K, V>`.
    pub fn from_type_text(name: impl Into<String>, declaration_offset: usize, type_text: &str) -> Self {
        let (base, shape) = TypeShape::parse(type_text);
        Self::new(name, declaration_offset, base, shape)
    }

    pub fn local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn is_generic(&self) -> bool {
        self.shape.generic_arity() > 0
    }

    pub fn generic_arity(&self) -> usize {
        self.shape.generic_arity()
    }

    pub fn generic_type1(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Generic1 { t1 } | TypeShape::Generic2 { t1, .. } => Some(t1),
            _ => None,
        }
    }

    pub fn generic_type2(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Generic2 { t2, .. } => Some(t2),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array { .. })
    }

    /// Name used to look the variable's type up in assembly metadata:
    /// keyword aliases become CTS names, generics get their arity suffix,
    /// arrays are `System.Array`.
    pub fn lookup_type_name(&self) -> String {
        match &self.shape {
            TypeShape::Array { .. } => "System.Array".to_string(),
            shape => cts::generic_metadata_name(&self.declared_type_name, shape.generic_arity()),
        }
    }

    /// Type produced by indexing into this variable, if it is indexable.
    ///
    /// Arrays yield their element, single-argument generics their argument and
    /// two-argument generics (dictionaries) their value type.
    pub fn indexed_type_name(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Array { element } => Some(element),
            TypeShape::Generic1 { t1 } => Some(t1),
            TypeShape::Generic2 { t2, .. } => Some(t2),
            TypeShape::Simple => None,
        }
    }

    /// Full written type, e.g. `List<String>` or `int[]`
    pub fn type_name(&self) -> String {
        match &self.shape {
            TypeShape::Simple => self.declared_type_name.clone(),
            TypeShape::Array { element } => format!("{element}[]"),
            TypeShape::Generic1 { t1 } => format!("{}<{t1}>", self.declared_type_name),
            TypeShape::Generic2 { t1, t2 } => {
                format!("{}<{t1}, {t2}>", self.declared_type_name)
            }
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        write!(f, "{} {}", self.type_name(), self.name)
    }
}

/// A method or constructor declared in the current source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    /// `None` for constructors
    pub return_type: Option<String>,
    pub parameter_list_raw: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub declaration_start_offset: usize,
    pub declaration_end_offset: usize,
}

impl MethodSignature {
    pub fn zone(&self) -> Zone {
        Zone::new(self.declaration_start_offset, self.declaration_end_offset)
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// Methods whose name starts with a digit are internal markers and never
    /// offered for completion.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with(|c: char| c.is_ascii_digit())
    }

    /// Compact parameter list: whitespace collapsed, no surrounding spaces
    pub fn parameters(&self) -> String {
        self.parameter_list_raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tooltip form, e.g. `public static void Write(int value)`
    pub fn signature_text(&self) -> String {
        let mut sig = String::from(self.visibility.keyword());
        if self.is_static {
            sig.push_str(" static");
        }
        if let Some(ret) = &self.return_type {
            sig.push(' ');
            sig.push_str(ret);
        }
        sig.push(' ');
        sig.push_str(&self.name);
        sig.push('(');
        sig.push_str(&self.parameters());
        sig.push(')');
        sig
    }
}

/// A property declared in the current source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySignature {
    pub name: String,
    pub return_type: Option<String>,
    pub parameter_list_raw: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub declaration_start_offset: usize,
    pub declaration_end_offset: usize,
}

impl PropertySignature {
    pub fn zone(&self) -> Zone {
        Zone::new(self.declaration_start_offset, self.declaration_end_offset)
    }

    pub fn signature_text(&self) -> String {
        let mut sig = String::from(self.visibility.keyword());
        if self.is_static {
            sig.push_str(" static");
        }
        if let Some(ty) = &self.return_type {
            sig.push(' ');
            sig.push_str(ty);
        }
        sig.push(' ');
        sig.push_str(&self.name);
        sig
    }
}
