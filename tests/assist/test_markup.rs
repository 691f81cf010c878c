//! Markup pages inherit from their `Inherits=` type or the default page base.

use crate::common::{class, complete, corlib, markup, property, texts, web};
use sharp_assist::completion::{AssistOptions, CompletionEngine};
use sharp_assist::source::{SourceBuffer, SourceKind};
use sharp_assist::workspace::{Assembly, SymbolIndex, WorkspaceContext};
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_default_page_base_members() {
    let page = markup("<%@ Page Language=\"C#\" %>\n<html><body>\n<% if (IsPo$) { } %>\n</body></html>");
    assert_eq!(texts(&complete(&page)), vec!["IsPostBack"]);

    let page = markup("<%@ Page Language=\"C#\" %>\n<p><%= Request.Ur$ %></p>");
    assert_eq!(texts(&complete(&page)), vec!["Url"]);
}

#[test]
fn test_inherits_attribute_names_the_base() {
    let index = SymbolIndex::new()
        .with_assembly(corlib())
        .with_assembly(web())
        .with_assembly(Assembly::new("Acme.Site").with_type(class(
            "Acme.Site.Checkout",
            Some("System.Web.UI.Page"),
            vec![property("CartTotal", "System.Decimal")],
        )));
    let engine = CompletionEngine::new(
        WorkspaceContext::new(Arc::new(index)),
        AssistOptions::default(),
    );

    let page = markup("<%@ Page Language=\"C#\" Inherits=\"Acme.Site.Checkout\" %>\n<%= Cart$ %>");
    assert_eq!(texts(&engine.complete(&page)), vec!["CartTotal"]);

    // Ancestors of the named base still contribute
    let page = markup("<%@ Page Language=\"C#\" Inherits=\"Acme.Site.Checkout\" %>\n<%= IsPo$ %>");
    assert_eq!(texts(&engine.complete(&page)), vec!["IsPostBack"]);
}

#[test]
fn test_source_kind_detection() {
    let text = "<%@ Control Language=\"C#\" %>";
    assert_eq!(SourceKind::detect(Some(Path::new("Menu.ascx")), ""), SourceKind::Markup);
    assert_eq!(SourceKind::detect(Some(Path::new("Menu.cs")), text), SourceKind::Code);
    assert_eq!(SourceKind::detect(None, text), SourceKind::Markup);
    assert_eq!(SourceBuffer::new("class A {}", 0).kind(), SourceKind::Code);
}
