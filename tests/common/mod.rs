//! Shared fixtures: a small corlib and web assembly held in memory.

#![allow(dead_code)]

use sharp_assist::completion::{AssistOptions, Completion, CompletionEngine};
use sharp_assist::source::{SourceBuffer, SourceKind};
use sharp_assist::symbol::Visibility;
use sharp_assist::workspace::{
    AccessorInfo, Assembly, MemberInfo, MemberKind, MetadataKind, ParameterInfo, SymbolIndex,
    TypeInfo, WorkspaceContext,
};
use std::sync::Arc;

pub fn member(name: &str, kind: MemberKind, type_name: &str) -> MemberInfo {
    MemberInfo {
        name: name.to_string(),
        kind,
        type_name: type_name.to_string(),
        access: Visibility::Public,
        is_static: false,
        getter: None,
        setter: None,
        parameters: Vec::new(),
    }
}

pub fn static_member(name: &str, kind: MemberKind, type_name: &str) -> MemberInfo {
    MemberInfo {
        is_static: true,
        ..member(name, kind, type_name)
    }
}

pub fn property(name: &str, type_name: &str) -> MemberInfo {
    MemberInfo {
        getter: Some(AccessorInfo {
            is_static: false,
            access: Visibility::Public,
        }),
        ..member(name, MemberKind::Property, type_name)
    }
}

pub fn method(name: &str, return_type: &str, params: &[(&str, &str)]) -> MemberInfo {
    MemberInfo {
        parameters: params
            .iter()
            .map(|(name, type_name)| ParameterInfo {
                name: name.to_string(),
                type_name: type_name.to_string(),
            })
            .collect(),
        ..member(name, MemberKind::Method, return_type)
    }
}

pub fn class(full_name: &str, base_type: Option<&str>, members: Vec<MemberInfo>) -> TypeInfo {
    TypeInfo {
        full_name: full_name.to_string(),
        is_public: true,
        kind: MetadataKind::Class,
        base_type: base_type.map(str::to_string),
        members,
    }
}

pub fn corlib() -> Assembly {
    let mut write_line = method("WriteLine", "System.Void", &[("value", "System.String")]);
    write_line.is_static = true;
    let mut write_string = method("Write", "System.Void", &[("value", "System.String")]);
    write_string.is_static = true;
    let mut write_int = method("Write", "System.Void", &[("value", "System.Int32")]);
    write_int.is_static = true;

    Assembly::new("mscorlib")
        .with_type(class(
            "System.Object",
            None,
            vec![
                method("ToString", "System.String", &[]),
                method("GetHashCode", "System.Int32", &[]),
            ],
        ))
        .with_type(class(
            "System.String",
            Some("System.Object"),
            vec![
                property("Length", "System.Int32"),
                static_member("Empty", MemberKind::Field, "System.String"),
                method("Trim", "System.String", &[]),
            ],
        ))
        .with_type(TypeInfo {
            kind: MetadataKind::Struct,
            ..class(
                "System.Int32",
                Some("System.ValueType"),
                vec![static_member("MaxValue", MemberKind::Field, "System.Int32")],
            )
        })
        .with_type(class("System.ValueType", Some("System.Object"), vec![]))
        .with_type(class(
            "System.Array",
            Some("System.Object"),
            vec![property("Length", "System.Int32")],
        ))
        .with_type(class(
            "System.Console",
            Some("System.Object"),
            vec![write_string, write_int, write_line],
        ))
        .with_type(class(
            "System.Environment",
            Some("System.Object"),
            vec![static_member("NewLine", MemberKind::Property, "System.String")],
        ))
        .with_type(TypeInfo {
            kind: MetadataKind::Enum,
            ..class(
                "System.Environment+SpecialFolder",
                None,
                vec![static_member("Desktop", MemberKind::Field, "System.Environment+SpecialFolder")],
            )
        })
        .with_type(class(
            "System.Text.StringBuilder",
            Some("System.Object"),
            vec![
                method("Append", "System.Text.StringBuilder", &[("value", "System.String")]),
                method("Append", "System.Text.StringBuilder", &[("value", "System.Int32")]),
                property("Length", "System.Int32"),
            ],
        ))
        .with_type(class(
            "System.Collections.Generic.List`1",
            Some("System.Object"),
            vec![
                property("Count", "System.Int32"),
                method("Add", "System.Void", &[("item", "T")]),
            ],
        ))
        .with_type(class(
            "System.Collections.Generic.Dictionary`2",
            Some("System.Object"),
            vec![
                property("Keys", "System.Collections.Generic.Dictionary`2+KeyCollection"),
                method("ContainsKey", "System.Boolean", &[("key", "TKey")]),
            ],
        ))
        .with_type(class("System.IO.File", Some("System.Object"), vec![]))
        .with_type(class(
            "System.Text.RegularExpressions.Regex",
            Some("System.Object"),
            vec![],
        ))
}

pub fn web() -> Assembly {
    let mut view_state = property("ViewState", "System.Web.UI.StateBag");
    view_state.access = Visibility::Protected;
    let mut private_field = member("_events", MemberKind::Field, "System.Object");
    private_field.access = Visibility::Private;

    Assembly::new("System.Web")
        .with_type(class(
            "System.Web.UI.Control",
            Some("System.Object"),
            vec![property("ID", "System.String"), view_state, private_field],
        ))
        .with_type(class(
            "System.Web.UI.Page",
            Some("System.Web.UI.Control"),
            vec![
                property("IsPostBack", "System.Boolean"),
                property("Request", "System.Web.HttpRequest"),
                method("Validate", "System.Void", &[]),
            ],
        ))
        .with_type(class(
            "System.Web.HttpRequest",
            Some("System.Object"),
            vec![
                property("Url", "System.String"),
                property("QueryString", "System.String"),
            ],
        ))
        .with_type(class("System.Web.UI.StateBag", Some("System.Object"), vec![]))
}

pub fn index() -> SymbolIndex {
    SymbolIndex::new().with_assembly(corlib()).with_assembly(web())
}

pub fn workspace() -> WorkspaceContext {
    WorkspaceContext::new(Arc::new(index()))
}

pub fn engine() -> CompletionEngine {
    CompletionEngine::new(workspace(), AssistOptions::default())
}

/// Buffer with the cursor at the first `$` marker, which is removed.
pub fn buffer(marked: &str) -> SourceBuffer {
    let cursor = marked.find('$').unwrap_or(marked.len());
    SourceBuffer::new(marked.replacen('$', "", 1), cursor)
}

pub fn markup(marked: &str) -> SourceBuffer {
    buffer(marked).with_kind(SourceKind::Markup)
}

pub fn complete(source: &SourceBuffer) -> Completion {
    engine().complete(source)
}

pub fn texts(completion: &Completion) -> Vec<&str> {
    completion
        .items
        .iter()
        .map(|i| i.display_text.as_str())
        .collect()
}
