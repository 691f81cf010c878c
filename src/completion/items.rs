//! Completion items handed back to the editor.

use crate::symbol::{MethodSignature, PropertySignature, Variable, Visibility, cts};
use crate::workspace::assembly::{MemberInfo, MemberKind, MetadataKind, TypeInfo};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Access level as shown by editor icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    Private,
    Friend,
}

impl From<Visibility> for AccessLevel {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => AccessLevel::Public,
            Visibility::Protected | Visibility::ProtectedInternal => AccessLevel::Protected,
            Visibility::Internal => AccessLevel::Friend,
            Visibility::Private => AccessLevel::Private,
        }
    }
}

/// Icon and sort group of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "access", rename_all = "snake_case")]
pub enum CompletionCategory {
    Namespace,
    Type,
    Keyword,
    Variable,
    Field(AccessLevel),
    Property(AccessLevel),
    Method(AccessLevel),
    Overload(AccessLevel),
}

impl CompletionCategory {
    /// Sort group: variables and members before types, namespaces, keywords
    pub fn group(&self) -> u8 {
        match self {
            CompletionCategory::Variable => 0,
            CompletionCategory::Field(_) => 1,
            CompletionCategory::Property(_) => 2,
            CompletionCategory::Method(_) | CompletionCategory::Overload(_) => 3,
            CompletionCategory::Type => 4,
            CompletionCategory::Namespace => 5,
            CompletionCategory::Keyword => 6,
        }
    }

    pub fn access(&self) -> Option<AccessLevel> {
        match self {
            CompletionCategory::Field(a)
            | CompletionCategory::Property(a)
            | CompletionCategory::Method(a)
            | CompletionCategory::Overload(a) => Some(*a),
            _ => None,
        }
    }

    /// Items sharing a name and a shadowing class are duplicates. Locals,
    /// fields and properties all name a value, so the first one hides the
    /// rest.
    fn shadowing_class(&self) -> u8 {
        match self {
            CompletionCategory::Variable
            | CompletionCategory::Field(_)
            | CompletionCategory::Property(_) => 0,
            other => other.group(),
        }
    }

    fn into_overload(self) -> Self {
        match self {
            CompletionCategory::Method(a) => CompletionCategory::Overload(a),
            other => other,
        }
    }
}

impl fmt::Display for CompletionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletionCategory::Namespace => "namespace",
            CompletionCategory::Type => "type",
            CompletionCategory::Keyword => "keyword",
            CompletionCategory::Variable => "variable",
            CompletionCategory::Field(_) => "field",
            CompletionCategory::Property(_) => "property",
            CompletionCategory::Method(_) => "method",
            CompletionCategory::Overload(_) => "overload",
        };
        match self.access() {
            Some(access) => write!(f, "{name} ({})", format!("{access:?}").to_lowercase()),
            None => write!(f, "{name}"),
        }
    }
}

/// Alternate insertion for an item, one per overload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionAction {
    pub insert_text: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub display_text: String,
    pub insert_text: String,
    pub tooltip_text: String,
    pub category: CompletionCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<InsertionAction>,
}

fn modifiers(visibility: Visibility, is_static: bool) -> String {
    if is_static {
        format!("{} static", visibility.keyword())
    } else {
        visibility.keyword().to_string()
    }
}

impl CompletionItem {
    pub fn new(
        display_text: impl Into<String>,
        tooltip_text: impl Into<String>,
        category: CompletionCategory,
    ) -> Self {
        let display_text = display_text.into();
        Self {
            insert_text: display_text.clone(),
            display_text,
            tooltip_text: tooltip_text.into(),
            category,
            actions: Vec::new(),
        }
    }

    pub fn namespace(name: &str) -> Self {
        Self::new(name, format!("namespace {name}"), CompletionCategory::Namespace)
    }

    pub fn keyword(word: &str) -> Self {
        Self::new(word, word, CompletionCategory::Keyword)
    }

    pub fn type_item(ty: &TypeInfo) -> Self {
        let kind = match ty.kind {
            MetadataKind::Class => "class",
            MetadataKind::Struct => "struct",
            MetadataKind::Interface => "interface",
            MetadataKind::Enum => "enum",
            MetadataKind::Delegate => "delegate",
        };
        Self::new(
            ty.name(),
            format!("{kind} {}", ty.full_name),
            CompletionCategory::Type,
        )
    }

    pub fn variable(var: &Variable) -> Self {
        let category = if var.is_local {
            CompletionCategory::Variable
        } else {
            CompletionCategory::Field(AccessLevel::Protected)
        };
        Self::new(&var.name, var.to_string(), category)
    }

    /// Item for a member of an assembly type
    pub fn member(member: &MemberInfo) -> Option<Self> {
        let access = AccessLevel::from(member.access);
        let mods = modifiers(member.access, member.effective_static());
        let ty = cts::short_display(&member.type_name);

        let item = match member.kind {
            MemberKind::Field => Self::new(
                &member.name,
                format!("{mods} {ty} {}", member.name),
                CompletionCategory::Field(access),
            ),
            MemberKind::Property => Self::new(
                &member.name,
                format!("{mods} {ty} {}", member.name),
                CompletionCategory::Property(access),
            ),
            MemberKind::Method => {
                let params = member
                    .parameters
                    .iter()
                    .map(|p| format!("{} {}", cts::short_display(&p.type_name), p.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let signature = format!("{}({params})", member.name);
                let mut item = Self::new(
                    &member.name,
                    format!("{mods} {ty} {signature}"),
                    CompletionCategory::Method(access),
                );
                item.actions.push(InsertionAction {
                    insert_text: signature,
                    tooltip: item.tooltip_text.clone(),
                });
                item
            }
            MemberKind::Event => Self::new(
                &member.name,
                format!("{mods} event {ty} {}", member.name),
                CompletionCategory::Field(access),
            ),
            MemberKind::Constructor => return None,
        };
        Some(item)
    }

    /// Item for a method declared in the current source
    pub fn local_method(method: &MethodSignature) -> Self {
        let signature = format!("{}({})", method.name, method.parameters());
        let mut item = Self::new(
            &method.name,
            method.signature_text(),
            CompletionCategory::Method(method.visibility.into()),
        );
        item.actions.push(InsertionAction {
            insert_text: signature,
            tooltip: item.tooltip_text.clone(),
        });
        item
    }

    pub fn local_property(property: &PropertySignature) -> Self {
        Self::new(
            &property.name,
            property.signature_text(),
            CompletionCategory::Property(property.visibility.into()),
        )
    }
}

/// Merge methods sharing a display name into one overload item.
///
/// Groups keep the position of their first occurrence. A group of two or
/// more becomes an `Overload` item with one insertion action per overload
/// and a `(+N overload(s))` tooltip suffix; a single method keeps its
/// category and carries no actions.
pub fn collapse_overloads(items: Vec<CompletionItem>) -> Vec<CompletionItem> {
    let mut out: Vec<CompletionItem> = Vec::with_capacity(items.len());
    // (slot in `out`, one action per overload)
    let mut groups: Vec<(usize, Vec<InsertionAction>)> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for item in items {
        if !matches!(item.category, CompletionCategory::Method(_)) {
            out.push(item);
            continue;
        }

        let action = item.actions.first().cloned().unwrap_or_else(|| InsertionAction {
            insert_text: item.insert_text.clone(),
            tooltip: item.tooltip_text.clone(),
        });

        match group_of.get(&item.display_text) {
            Some(&group) => groups[group].1.push(action),
            None => {
                group_of.insert(item.display_text.clone(), groups.len());
                groups.push((out.len(), vec![action]));
                out.push(item);
            }
        }
    }

    for (slot, actions) in groups {
        let item = &mut out[slot];
        if actions.len() > 1 {
            item.tooltip_text = format!("{} (+{} overload(s))", item.tooltip_text, actions.len() - 1);
            item.category = item.category.into_overload();
            item.actions = actions;
        } else {
            item.actions.clear();
        }
    }

    out
}

/// Filter by case-insensitive prefix and order for display.
///
/// Case-sensitive prefix matches come first, then category groups, then
/// display text. Repeated entries keep their first occurrence, so a local
/// listed ahead of an inherited member of the same name hides it.
pub fn rank(items: Vec<CompletionItem>, look_ahead: &str) -> Vec<CompletionItem> {
    let needle = look_ahead.to_lowercase();
    let mut seen = HashSet::new();

    let mut ranked: Vec<CompletionItem> = items
        .into_iter()
        .filter(|item| item.display_text.to_lowercase().starts_with(&needle))
        .filter(|item| seen.insert((item.display_text.clone(), item.category.shadowing_class())))
        .collect();

    ranked.sort_by(|a, b| {
        let exact_a = !a.display_text.starts_with(look_ahead);
        let exact_b = !b.display_text.starts_with(look_ahead);
        exact_a
            .cmp(&exact_b)
            .then(a.category.group().cmp(&b.category.group()))
            .then_with(|| a.display_text.to_lowercase().cmp(&b.display_text.to_lowercase()))
            .then_with(|| a.display_text.cmp(&b.display_text))
    });
    ranked
}
