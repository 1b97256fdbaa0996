//! Template compilation benchmarks
//!
//! Measures each stage separately and the full pipeline:
//! - Splitting a template into sections
//! - Building the clause tree
//! - Rendering Go statements

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlgen_template::{
    CompileOptions, Renderer, TemplateScope, build_clauses, compile, tokenize,
};
use sqlgen_test_utils::TemplateFixtures;

fn scope() -> TemplateScope {
    TemplateScope::new("users")
        .with_params(TemplateFixtures::params())
        .with_structs(TemplateFixtures::structs())
}

fn templates() -> Vec<(&'static str, &'static str)> {
    vec![
        ("select", TemplateFixtures::select_table()),
        ("where_if", TemplateFixtures::where_if()),
        ("set_update", TemplateFixtures::set_update()),
        ("nested_for", TemplateFixtures::nested_users()),
    ]
}

fn bench_tokenize(c: &mut Criterion) {
    let scope = scope();
    let mut group = c.benchmark_group("template/tokenize");
    for (name, template) in templates() {
        group.bench_with_input(BenchmarkId::from_parameter(name), template, |b, t| {
            b.iter(|| black_box(tokenize(t, &scope)));
        });
    }
    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let scope = scope();
    let options = CompileOptions::default();
    let sections = tokenize(TemplateFixtures::nested_users(), &scope).unwrap();

    c.bench_function("template/build_clauses", |b| {
        b.iter(|| black_box(build_clauses(&sections, TemplateFixtures::nested_users())));
    });

    let clauses = build_clauses(&sections, TemplateFixtures::nested_users()).unwrap();
    c.bench_function("template/render", |b| {
        b.iter(|| black_box(Renderer::new(&options).render(&clauses)));
    });
}

fn bench_compile(c: &mut Criterion) {
    let scope = scope();
    let options = CompileOptions::default();
    let mut group = c.benchmark_group("template/compile");
    for (name, template) in templates() {
        group.bench_with_input(BenchmarkId::from_parameter(name), template, |b, t| {
            b.iter(|| black_box(compile(t, &scope, &options)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_build_and_render, bench_compile);
criterion_main!(benches);
