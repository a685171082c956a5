use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lamdef::{Expander, RewriteOptions};
use std::hint::black_box;

const CODE_WITHOUT_LAMDEF: &str = r#"
data = [1, 2, 3, 4, 5]
result = {
    "key": [x for x in data],
    "value": (1, 2, 3)
}
"#;

const FIXTURE: &str = include_str!("../tests/fixtures/multiline_lambda.py");

fn benchmark_source_without_lamdef(c: &mut Criterion) {
    let source = CODE_WITHOUT_LAMDEF.repeat(1000);
    let expander = Expander::default();

    let mut group = c.benchmark_group("without_lamdef");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("expand", |b| {
        b.iter(|| black_box(expander.expand(black_box(&source))))
    });

    // Mentions the keyword, so the whole source is scanned
    let mentioned = format!("# lamdef\n{source}");
    group.bench_function("expand_scanned", |b| {
        b.iter(|| black_box(expander.expand(black_box(&mentioned))))
    });

    group.finish();
}

fn benchmark_fixture(c: &mut Criterion) {
    let expander = Expander::new(RewriteOptions::default()).unwrap();

    c.bench_function("fixture_expand", |b| {
        b.iter(|| black_box(expander.expand(black_box(FIXTURE))))
    });

    c.bench_function("fixture_expand_line", |b| {
        b.iter(|| black_box(expander.expand_line(black_box(FIXTURE), 67)))
    });

    c.bench_function("fixture_list", |b| {
        b.iter(|| black_box(expander.list(black_box(FIXTURE))))
    });
}

fn benchmark_nested_blocks(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..50 {
        source.push_str(&format!(
            "result_{i} = outer(lamdef(a):\n    inner = sorted(a, key=lamdef(item):\n        return item.size\n    )\n    return inner\n)\n"
        ));
    }
    let expander = Expander::default();

    c.bench_function("nested_blocks_expand", |b| {
        b.iter(|| black_box(expander.expand(black_box(&source))))
    });
}

criterion_group!(
    benches,
    benchmark_source_without_lamdef,
    benchmark_fixture,
    benchmark_nested_blocks
);
criterion_main!(benches);
