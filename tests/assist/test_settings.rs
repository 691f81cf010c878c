//! Settings drive the workspace: manifests on disk, registered namespaces.

use sharp_assist::completion::CompletionEngine;
use sharp_assist::source::SourceBuffer;
use sharp_assist::workspace::WorkspaceContext;
use sharp_assist::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WIDGETS: &str = r#"{
  "name": "Acme.Widgets",
  "types": [
    {
      "full_name": "Acme.Widgets.Gauge",
      "base_type": "System.Object",
      "members": [
        { "name": "Reading", "kind": "property", "type_name": "System.Double",
          "getter": { "is_static": false } },
        { "name": "Reset", "kind": "method", "type_name": "System.Void" },
        { "name": "Default", "kind": "field", "type_name": "Acme.Widgets.Gauge", "is_static": true },
        { "name": "Gauge", "kind": "constructor" }
      ]
    },
    { "full_name": "Acme.Widgets.Internal.Cache", "is_public": false }
  ]
}"#;

fn settings_for(dir: &TempDir) -> Settings {
    let manifests = dir.path().join("refs");
    fs::create_dir_all(&manifests).unwrap();
    fs::write(manifests.join("widgets.json"), WIDGETS).unwrap();
    fs::write(manifests.join("broken.json"), "{ \"name\": ").unwrap();

    let mut settings = Settings::default();
    settings.workspace_root = Some(dir.path().to_path_buf());
    settings.workspace.manifest_dirs = vec![PathBuf::from("refs")];
    settings.workspace.default_namespaces = vec!["Acme.Widgets".to_string()];
    settings
}

#[test]
fn test_workspace_from_manifest_dirs() {
    let dir = TempDir::new().unwrap();
    let ctx = WorkspaceContext::from_settings(&settings_for(&dir));

    assert_eq!(ctx.assemblies(), ["Acme.Widgets".to_string()]);
    assert_eq!(ctx.namespaces().immediate_child_namespaces("Acme"), vec!["Widgets"]);
    assert!(ctx.namespaces().is_namespace("Acme.Widgets.Internal"));
}

#[test]
fn test_default_namespaces_resolve_types() {
    let dir = TempDir::new().unwrap();
    let engine = CompletionEngine::from_settings(&settings_for(&dir));

    let src = "class A {\n  void F() {\n    Gauge g = Gauge.Default;\n    g.Re";
    let completion = engine.complete(&SourceBuffer::new(src, src.len()));
    let names: Vec<&str> = completion.items.iter().map(|i| i.display_text.as_str()).collect();
    assert_eq!(names, vec!["Reading", "Reset"]);

    let src = "class A {\n  void F() {\n    var g = Gauge.";
    let completion = engine.complete(&SourceBuffer::new(src, src.len()));
    let names: Vec<&str> = completion.items.iter().map(|i| i.display_text.as_str()).collect();
    assert_eq!(names, vec!["Default"]);
}

#[test]
fn test_settings_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = Settings::init_config_file_in(dir.path(), false).unwrap();

    let mut settings = Settings::load_from(&path).unwrap();
    settings.workspace.assemblies = vec!["Acme.Widgets".to_string()];
    settings.assist.nested_type_depth = 1;
    settings.save(&path).unwrap();

    let reloaded = Settings::load_from(&path).unwrap();
    assert_eq!(reloaded.workspace.assemblies, vec!["Acme.Widgets"]);
    assert_eq!(reloaded.assist.nested_type_depth, 1);
}
