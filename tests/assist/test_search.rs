//! Assembly search priority, visibility and namespace listing.

use crate::common::{class, workspace};
use sharp_assist::workspace::search::{resolve_lookup_name, search_assembly};
use sharp_assist::workspace::{
    Assembly, NamespaceIndex, SearchOptions, SymbolIndex, TypeInfo, WorkspaceContext,
};
use std::collections::HashMap;
use std::sync::Arc;

fn hidden(full_name: &str) -> TypeInfo {
    TypeInfo {
        is_public: false,
        ..class(full_name, None, vec![])
    }
}

fn context(assemblies: Vec<Assembly>) -> WorkspaceContext {
    let index = assemblies
        .into_iter()
        .fold(SymbolIndex::new(), |index, a| index.with_assembly(a));
    WorkspaceContext::new(Arc::new(index))
}

#[test]
fn test_public_type_found_in_defining_assembly() {
    let ctx = context(vec![
        Assembly::new("A").with_type(class("Foo.Other", None, vec![])),
        Assembly::new("B").with_type(class("Foo.Bar", None, vec![])),
    ]);

    let found = search_assembly(&ctx, "Foo.Bar").unwrap();
    assert_eq!(found.assembly, "B");
    assert_eq!(found.full_name(), "Foo.Bar");
}

#[test]
fn test_non_public_type_is_skipped() {
    let ctx = context(vec![
        Assembly::new("A").with_type(hidden("Foo.Bar")),
        Assembly::new("B").with_type(class("Foo.Bar", None, vec![])),
    ]);
    assert_eq!(search_assembly(&ctx, "Foo.Bar").unwrap().assembly, "B");

    let ctx = context(vec![Assembly::new("B").with_type(hidden("Foo.Bar"))]);
    assert!(search_assembly(&ctx, "Foo.Bar").is_none());
}

#[test]
fn test_parallel_probe_keeps_priority_order() {
    let assemblies = || {
        (0..8)
            .map(|i| Assembly::new(format!("Lib{i}")).with_type(class("Foo.Bar", None, vec![])))
            .collect::<Vec<_>>()
    };
    let sequential = context(assemblies());
    let parallel = context(assemblies()).with_options(SearchOptions {
        parallel_probe: true,
        ..SearchOptions::default()
    });

    assert_eq!(search_assembly(&sequential, "Foo.Bar").unwrap().assembly, "Lib0");
    for _ in 0..16 {
        assert_eq!(search_assembly(&parallel, "Foo.Bar").unwrap().assembly, "Lib0");
    }
}

#[test]
fn test_registered_assemblies_are_searched_first() {
    let ctx = context(vec![
        Assembly::new("A").with_type(class("Foo.Bar", None, vec![])),
        Assembly::new("B").with_type(class("Foo.Bar", None, vec![])),
    ])
    .with_namespace_assemblies(HashMap::from([(
        "Foo".to_string(),
        vec!["B".to_string()],
    )]));

    assert_eq!(search_assembly(&ctx, "Foo.Bar").unwrap().assembly, "B");
}

#[test]
fn test_unloadable_assembly_does_not_block_search() {
    let ctx = context(vec![Assembly::new("B").with_type(class("Foo.Bar", None, vec![]))])
        .with_assemblies(vec!["Missing".to_string(), "B".to_string()]);

    assert_eq!(search_assembly(&ctx, "Foo.Bar").unwrap().assembly, "B");
}

#[test]
fn test_nested_type_resolution() {
    let ctx = workspace();
    let found = resolve_lookup_name(&ctx, "Environment.SpecialFolder", &["System".to_string()])
        .unwrap();
    assert_eq!(found.full_name(), "System.Environment+SpecialFolder");
}

#[test]
fn test_child_namespaces_have_no_duplicates() {
    let index = NamespaceIndex::from_names([
        "System.Text",
        "System.Text.RegularExpressions",
        "System.IO",
    ]);
    assert_eq!(index.immediate_child_namespaces("System"), vec!["IO", "Text"]);
    assert_eq!(index.immediate_child_namespaces(""), vec!["System"]);
}

#[test]
fn test_copied_lists_match_rebuilt_lists() {
    let ctx = workspace();
    let lists = ctx.copy_lists();
    let copy = WorkspaceContext::new(Arc::new(SymbolIndex::new())).with_lists(lists);

    assert_eq!(copy.assemblies(), ctx.assemblies());
    assert!(copy.namespaces().is_namespace("System.Web.UI"));
    assert!(copy.namespaces().is_namespace("System.Collections"));
}
