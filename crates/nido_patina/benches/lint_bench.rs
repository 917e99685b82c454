//! Benchmark for nido_patina linter.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nido_patina::Linter;

/// Flat stylesheet where every third rule can be nested into its neighbour
fn generate_stylesheet(blocks: usize) -> String {
    let mut css = String::new();
    for i in 0..blocks {
        css.push_str(&format!(
            r#".card-{i} {{
  color: red;
}}
.card-{i} .title {{
  font-weight: bold;
}}
@media (min-width: 640px) {{
  .card-{i} {{
    color: blue;
  }}
}}
.other-{i} {{
  margin: 0;
}}
"#,
        ));
    }
    css
}

fn bench_lint_small(c: &mut Criterion) {
    let source = ".a { color: red; } .a .b { color: blue; } .x .a { top: 0; }";
    let linter = Linter::new();

    let mut group = c.benchmark_group("use_nesting");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("report_small", |b| {
        b.iter(|| linter.lint(black_box(source), "test.css"))
    });

    group.bench_function("fix_small", |b| {
        b.iter(|| linter.fix(black_box(source), "test.css"))
    });

    group.finish();
}

fn bench_lint_large(c: &mut Criterion) {
    let source = generate_stylesheet(200);
    let linter = Linter::new();

    let mut group = c.benchmark_group("use_nesting");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("report_large", |b| {
        b.iter(|| linter.lint(black_box(&source), "test.css"))
    });

    group.bench_function("fix_large", |b| {
        b.iter(|| linter.fix(black_box(&source), "test.css"))
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let source = generate_stylesheet(200);

    let mut group = c.benchmark_group("armature");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse_and_print", |b| {
        b.iter(|| {
            nido_armature::parse(black_box(&source))
                .map(|sheet| sheet.to_css())
                .unwrap_or_default()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_lint_small, bench_lint_large, bench_parse);
criterion_main!(benches);
