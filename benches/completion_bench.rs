//! Completion latency benchmarks
//!
//! Measures the two costs of a request on a growing source file:
//! 1. Declaration scanning (regex battery + scope zones)
//! 2. A full qualified-access completion against an in-memory index

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sharp_assist::completion::{AssistOptions, CompletionEngine};
use sharp_assist::parsing::scan_declarations;
use sharp_assist::source::SourceBuffer;
use sharp_assist::symbol::Visibility;
use sharp_assist::types::DeclarationContext;
use sharp_assist::workspace::{
    Assembly, MemberInfo, MemberKind, MetadataKind, SymbolIndex, TypeInfo, WorkspaceContext,
};
use std::hint::black_box;
use std::sync::Arc;

fn member(name: &str, kind: MemberKind, type_name: &str) -> MemberInfo {
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

/// An assembly with `types` classes spread over a handful of namespaces
fn create_index(types: usize) -> SymbolIndex {
    let mut assembly = Assembly::new("Bench").with_type(TypeInfo {
        full_name: "System.Text.StringBuilder".to_string(),
        is_public: true,
        kind: MetadataKind::Class,
        base_type: None,
        members: vec![
            member("Append", MemberKind::Method, "System.Text.StringBuilder"),
            member("Length", MemberKind::Property, "System.Int32"),
        ],
    });
    for i in 0..types {
        assembly.insert(TypeInfo {
            full_name: format!("Bench.Ns{}.Type{i}", i % 16),
            is_public: true,
            kind: MetadataKind::Class,
            base_type: None,
            members: (0..8)
                .map(|m| member(&format!("Member{m}"), MemberKind::Property, "System.Int32"))
                .collect(),
        });
    }
    SymbolIndex::new().with_assembly(assembly)
}

/// A class with `methods` methods, each declaring a few locals
fn create_source(methods: usize) -> String {
    let mut code = String::from("using System.Text;\n\nclass Generated {\n  private int counter;\n");
    for i in 0..methods {
        code.push_str(&format!(
            "  public void Method{i}(int arg{i}) {{\n    var sb{i} = new StringBuilder();\n    int local{i} = {i};\n    // comment with int fake{i} = 0;\n    foreach (string s in names) {{\n      sb{i}.Append(s);\n    }}\n  }}\n"
        ));
    }
    code.push_str("  void Last() {\n    var sb = new StringBuilder();\n    sb.App");
    code
}

fn bench_declaration_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("declaration_scan");

    for methods in [10, 100, 500] {
        let code = create_source(methods);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(methods), &code, |b, code| {
            let source = SourceBuffer::new(code.as_str(), code.len());
            b.iter(|| {
                black_box(scan_declarations(
                    black_box(&source),
                    &[],
                    true,
                    DeclarationContext::Instance,
                ))
            });
        });
    }

    group.finish();
}

fn bench_member_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("member_completion");

    for types in [100, 2_000] {
        let engine = CompletionEngine::new(
            WorkspaceContext::new(Arc::new(create_index(types))),
            AssistOptions::default(),
        );
        let code = create_source(100);
        let source = SourceBuffer::new(code.as_str(), code.len());

        group.bench_with_input(BenchmarkId::new("types", types), &source, |b, source| {
            b.iter(|| black_box(engine.complete(black_box(source))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_declaration_scan, bench_member_completion);
criterion_main!(benches);
