//! Rendering benchmarks
//!
//! Builds the users model and the Querier methods once, then measures the
//! per-table rendering of model and query files.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sqlgen_check::{BuildContext, MethodDescriptor, StructDescriptor, registry};
use sqlgen_codegen::emit::{GeneratedMethod, QueryFile, render_helper, render_model, render_query};
use sqlgen_extract::{extract_source, find_interface};
use sqlgen_ir::Import;
use sqlgen_template::CompileOptions;
use sqlgen_test_utils::{GoFixtures, MockCatalogBuilder};

fn model() -> StructDescriptor {
    let catalog = MockCatalogBuilder::new().with_standard_schema().build();
    let users = catalog.get_table("users").unwrap();
    StructDescriptor::from_table(users, "model").unwrap()
}

fn methods(model: &StructDescriptor) -> Vec<GeneratedMethod> {
    let file = extract_source(GoFixtures::querier_interface()).unwrap();
    let iface = find_interface(&file, "Querier").unwrap();
    let structs = registry([model]);
    let ctx = BuildContext::new(model.go_type(), &structs);
    let options = CompileOptions::default();

    iface
        .methods
        .iter()
        .map(|signature| {
            let descriptor = MethodDescriptor::build(&iface.name, signature, &ctx).unwrap();
            let compiled = descriptor.compile(&model.table, &structs, &options).unwrap();
            GeneratedMethod {
                descriptor,
                compiled,
                comment: signature.doc.clone(),
                imports: Vec::new(),
            }
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let model = model();
    let methods = methods(&model);

    c.bench_function("codegen/render_model", |b| {
        b.iter(|| black_box(render_model(&model)));
    });

    c.bench_function("codegen/render_query", |b| {
        b.iter(|| {
            let query = QueryFile {
                package: "query",
                model: &model,
                receiver: "u",
                model_import: Import::new("example.com/app/model"),
                gen_import: "gorm.io/gen",
                gen_package: "gen",
                methods: methods.clone(),
            };
            black_box(render_query(&query))
        });
    });

    c.bench_function("codegen/render_helper", |b| {
        b.iter(|| black_box(render_helper("query")));
    });
}

fn bench_compile_methods(c: &mut Criterion) {
    let model = model();
    c.bench_function("codegen/compile_querier", |b| {
        b.iter(|| black_box(methods(&model)));
    });
}

criterion_group!(benches, bench_render, bench_compile_methods);
criterion_main!(benches);
