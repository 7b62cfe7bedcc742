//! Benchmarks for the per-stage cost of processing an HXL document.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hxl_lang::{parser, tokenizer, DataType, DeserializationProtocol, Schema, SchemaNodeProperty, SchemaNodeType};

fn sample_source(node_count: usize) -> String {
    let mut source = String::new();
    for i in 0..node_count {
        source.push_str(&format!("<Cube> Node{}\n\tsize: {}\n\tlabel: \"node {}\"\n", i, i, i));
    }
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_source(200);
    c.bench_function("tokenize_200_nodes", |b| {
        b.iter(|| tokenizer::tokenize(black_box(&source)).unwrap())
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = sample_source(200);
    let tokens = tokenizer::tokenize(&source).unwrap();
    c.bench_function("parse_200_nodes", |b| {
        b.iter(|| parser::parse(black_box(&tokens)).unwrap())
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let source = sample_source(200);
    let schema = Schema::new(vec![SchemaNodeType::new("Cube")
        .property(SchemaNodeProperty::new("size", DataType::Int))
        .property(SchemaNodeProperty::new("label", DataType::String))]);
    let protocol = DeserializationProtocol::new().on("Cube", |_| {});

    c.bench_function("process_200_nodes", |b| {
        b.iter(|| {
            let result = hxl_lang::process(black_box(&source), &schema, &protocol);
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_full_pipeline);
criterion_main!(benches);
