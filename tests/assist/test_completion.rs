//! End-to-end completion over the corlib fixture.

use crate::common::{buffer, complete, texts, workspace};
use sharp_assist::completion::{
    AccessLevel, AssistOptions, AssistState, CompletionCategory, CompletionEngine,
};

#[test]
fn test_overloads_collapse_into_one_item() {
    let completion = complete(&buffer(
        "using System;\nclass A {\n  void F() {\n    Console.Wri$\n  }\n}",
    ));

    assert_eq!(completion.state, AssistState::QualifiedAccess);
    assert_eq!(texts(&completion), vec!["Write", "WriteLine"]);

    let write = &completion.items[0];
    assert_eq!(write.category, CompletionCategory::Overload(AccessLevel::Public));
    assert_eq!(write.actions.len(), 2);
    assert!(write.tooltip_text.ends_with("(+1 overload(s))"));

    let write_line = &completion.items[1];
    assert_eq!(write_line.category, CompletionCategory::Method(AccessLevel::Public));
    assert!(write_line.actions.is_empty());
}

#[test]
fn test_using_directive_children() {
    let completion = complete(&buffer("using System.$"));
    assert_eq!(completion.state, AssistState::UsingDirective);
    assert_eq!(texts(&completion), vec!["Collections", "IO", "Text", "Web"]);

    let completion = complete(&buffer("using System.Te$"));
    assert_eq!(texts(&completion), vec!["Text"]);
}

#[test]
fn test_indexed_generic_element_members() {
    let src = "using System;\nusing System.Collections.Generic;\nclass A {\n  void F() {\n    List<String> names = new List<String>();\n    names[0].Le$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Length"]);

    let src = "using System.Collections.Generic;\nclass A {\n  void F() {\n    var names = new List<String>();\n    names.Cou$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Count"]);
}

#[test]
fn test_array_variable_members() {
    let src = "class A {\n  void F() {\n    var parts = new string[4];\n    parts.Len$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Length"]);
}

#[test]
fn test_nested_types_under_static_access() {
    let src = "using System;\nclass A {\n  void F() {\n    var f = Environment.Spe$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["SpecialFolder"]);

    let src = "using System;\nclass A {\n  void F() {\n    var f = Environment.SpecialFolder.De$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Desktop"]);
}

#[test]
fn test_using_alias_rewrites_entity() {
    let src = "using Con = System.Console;\nclass A {\n  void F() {\n    Con.Wr$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Write", "WriteLine"]);
}

#[test]
fn test_inherited_members_in_code_behind() {
    let src = "using System.Web.UI;\nnamespace Acme {\n  public class Default : Page {\n    void Page_Load() {\n      IsPost$\n    }\n  }\n}";
    let completion = complete(&buffer(src));
    assert_eq!(completion.state, AssistState::BareIdentifier);
    assert_eq!(texts(&completion), vec!["IsPostBack"]);

    // Members of the base's base are reachable too, private fields are not
    let src = "using System.Web.UI;\npublic class Default : Page {\n  void Page_Load() {\n    Vie$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["ViewState"]);
    let src = "using System.Web.UI;\npublic class Default : Page {\n  void Page_Load() {\n    _ev$\n  }\n}";
    assert!(complete(&buffer(src)).items.is_empty());
}

#[test]
fn test_inherited_member_chain() {
    let src = "using System.Web.UI;\npublic class Default : Page {\n  void Page_Load() {\n    Request.Ur$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Url"]);

    let src = "using System.Web.UI;\npublic class Default : Page {\n  void Page_Load() {\n    base.Val$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Validate"]);
}

#[test]
fn test_static_context_hides_instance_fields() {
    let src = "class A {\n  int count;\n  static int total;\n  static void Main() {\n    $\n  }\n}";
    let completion = complete(&buffer(src));
    let names = texts(&completion);
    assert!(names.contains(&"total"));
    assert!(!names.contains(&"count"));

    let src = "class A {\n  int count;\n  static int total;\n  void Run() {\n    $\n  }\n}";
    let completion = complete(&buffer(src));
    let names = texts(&completion);
    assert!(names.contains(&"total"));
    assert!(names.contains(&"count"));
}

#[test]
fn test_local_methods_and_properties() {
    let src = "class A {\n  public string Title { get; set; }\n  private void Refresh(int delay) {\n  }\n  void Run() {\n    Re$\n  }\n}";
    let completion = complete(&buffer(src));
    let refresh = completion
        .items
        .iter()
        .find(|i| i.display_text == "Refresh")
        .unwrap();
    assert_eq!(refresh.category, CompletionCategory::Method(AccessLevel::Private));

    let src = "class A {\n  public string Title { get; set; }\n  void Run() {\n    Tit$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["Title"]);
}

#[test]
fn test_keywords_follow_options() {
    let src = "class A {\n  void Run() {\n    whi$\n  }\n}";
    assert_eq!(texts(&complete(&buffer(src))), vec!["while"]);

    let engine = CompletionEngine::new(
        workspace(),
        AssistOptions {
            include_keywords: false,
            ..AssistOptions::default()
        },
    );
    assert!(engine.complete(&buffer(src)).items.is_empty());
}

#[test]
fn test_out_of_scope_locals_are_hidden() {
    let src = "class A {\n  void Run() {\n    {\n      int inner = 1;\n    }\n    inn$\n  }\n}";
    assert!(complete(&buffer(src)).items.is_empty());

    let engine = CompletionEngine::new(
        workspace(),
        AssistOptions {
            visible_scopes_only: false,
            ..AssistOptions::default()
        },
    );
    assert_eq!(texts(&engine.complete(&buffer(src))), vec!["inner"]);
}

#[test]
fn test_unresolvable_entity_is_empty_not_error() {
    let src = "class A {\n  void Run() {\n    missing.Thing.Ot$\n  }\n}";
    let completion = complete(&buffer(src));
    assert_eq!(completion.state, AssistState::QualifiedAccess);
    assert!(completion.items.is_empty());
}

#[test]
fn test_field_declared_after_method_resolves_as_entity() {
    let src = "using System.Text;\nclass A {\n  void F() {\n    sb.Ap$\n  }\n  StringBuilder sb;\n}";
    let completion = complete(&buffer(src));
    assert_eq!(completion.state, AssistState::QualifiedAccess);
    assert_eq!(texts(&completion), vec!["Append"]);

    let src = "using System.Text;\nclass A {\n  void F() {\n    s$\n  }\n  StringBuilder sb;\n}";
    assert!(texts(&complete(&buffer(src))).contains(&"sb"));
}

#[test]
fn test_local_shadows_later_field_as_entity() {
    let src = "using System;\nusing System.Text;\nclass A {\n  void F() {\n    String sb = \"\";\n    sb.$\n  }\n  StringBuilder sb;\n}";
    let completion = complete(&buffer(src));
    let names = texts(&completion);
    assert!(names.contains(&"Length"));
    assert!(!names.contains(&"Append"));
}

#[test]
fn test_open_indexer_completes_bare_identifiers() {
    let src = "class A {\n  void F() {\n    int count = 0;\n    String[] arr = null;\n    var x = arr[$";
    let completion = complete(&buffer(src));
    assert_eq!(completion.state, AssistState::BareIdentifier);
    assert!(completion.target.is_indexed);
    assert!(texts(&completion).contains(&"count"));
}

#[test]
fn test_local_hides_inherited_member_of_same_name() {
    let src = "using System.Web.UI;\npublic class Default : Page {\n  void Page_Load() {\n    bool IsPostBack = false;\n    IsPost$\n  }\n}";
    let completion = complete(&buffer(src));
    assert_eq!(texts(&completion), vec!["IsPostBack"]);
    assert_eq!(completion.items[0].category, CompletionCategory::Variable);
}
