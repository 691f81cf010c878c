//! Declaration scanning through the public API.

use crate::common::buffer;
use sharp_assist::parsing::{LookupTarget, lookup, normalize, scan_declarations};
use sharp_assist::types::DeclarationContext;

#[test]
fn test_inner_declaration_shadows_outer() {
    let text = "int x = 1; { int x = 2; } ";
    let inner = text.rfind("x = 2").unwrap();
    // Cursor just after `int x = 2;`, still inside the block
    let cursor = inner + "x = 2;".len();
    let source = buffer(&format!("{}${}", &text[..cursor], &text[cursor..]));

    let vars = scan_declarations(&source, &[], false, DeclarationContext::Instance);
    let found = lookup(&vars, "x", source.cursor()).unwrap();

    assert_eq!(found.declaration_offset, inner);
    assert_eq!(found.declared_type_name, "int");
    // Every result is ordered closest-first
    assert!(
        vars.windows(2)
            .all(|w| w[0].declaration_offset >= w[1].declaration_offset)
    );
}

#[test]
fn test_declaration_shapes() {
    let source = buffer(
        "class A {\n  void F(String[] arr) {\n    var sb = new StringBuilder();\n    var list = new List<String>();\n    foreach (String s in arr) {\n      $\n    }\n  }\n}",
    );
    let vars = scan_declarations(&source, &[], true, DeclarationContext::Instance);

    let sb = vars.iter().find(|v| v.name == "sb").unwrap();
    assert_eq!(sb.declared_type_name, "StringBuilder");
    assert!(!sb.is_generic());

    let list = vars.iter().find(|v| v.name == "list").unwrap();
    assert_eq!(list.generic_arity(), 1);
    assert_eq!(list.generic_type1(), Some("String"));

    let s = vars.iter().find(|v| v.name == "s").unwrap();
    assert!(s.is_local);
    assert!(!s.is_static);
    assert_eq!(s.declared_type_name, "String");
}

#[test]
fn test_commented_declarations_are_ignored() {
    let text = "class A {\n  // int hidden = 1;\n  /* string alsoHidden; */\n  int shown;\n}";
    let normalized = normalize(text);
    assert_eq!(normalized.len(), text.len());
    assert_eq!(normalized.find("int shown"), text.find("int shown"));

    let vars = scan_declarations(&buffer(text), &[], false, DeclarationContext::Instance);
    let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["shown"]);
}

#[test]
fn test_only_first_of_multiple_declarators() {
    let source = buffer("class A {\n  void F() {\n    int a = 0, b, c;\n    $\n  }\n}");
    let vars = scan_declarations(&source, &[], true, DeclarationContext::Instance);
    let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["a"]);
}

#[test]
fn test_tokenize_entity_and_look_ahead() {
    let target = LookupTarget::tokenize("foo.Bar.Ba");
    assert_eq!(target.entity, "foo.Bar");
    assert_eq!(target.look_ahead, "Ba");

    let target = LookupTarget::tokenize("x = foo[");
    assert_eq!(target.entity, "foo");
    assert!(target.is_indexed);
}
