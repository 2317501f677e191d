use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use markwright::Markdown;

fn build_document(sections: usize) -> String {
    let mut out = String::new();
    for index in 0..sections {
        out.push_str(&format!("## Section {index}\n\n"));
        out.push_str(
            "Some *emphasized* text with a [link](/target) and `code`, plus \
             **strong** content that keeps the inline parser busy.\n\n",
        );
        out.push_str("- item one\n- item two\n  - nested\n\n");
        out.push_str("> a quote\n> with two lines\n\n");
    }
    out
}

fn long_documents(c: &mut Criterion) {
    let md = Markdown::new();
    let small = build_document(10);
    let large = build_document(500);

    let mut group = c.benchmark_group("long documents");
    group.bench_function("10 sections", |b| {
        b.iter(|| md.convert(black_box(&small)).unwrap())
    });
    group.bench_function("500 sections", |b| {
        b.iter(|| md.convert(black_box(&large)).unwrap())
    });
    group.finish();
}

fn short_inlines(c: &mut Criterion) {
    let md = Markdown::new();
    let content = "*this ***has some* various things* that** [create multiple \
                   elements](while/inline 'but without') taking _too_ much \
                   ![effort] to parse, and should `be a decent` test` ``of \
                   ``whether this works quickly.";

    c.bench_function("short inlines", |b| {
        b.iter(|| md.convert(black_box(content)).unwrap())
    });
}

criterion_group!(benches, long_documents, short_inlines);
criterion_main!(benches);
