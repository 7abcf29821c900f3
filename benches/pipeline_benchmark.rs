//! Benchmarks for lessonkit pipeline performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic lessons mixing prose, code, tables and
//! numbered steps.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lessonkit::distribution::TableFamily;
use lessonkit::{Context, DistributionTables, Pipeline, PipelineOptions, RawDocument, TemplateEngine};

/// Creates a synthetic lesson with the given number of sections.
fn create_lesson(index: usize, sections: usize) -> String {
    let mut text = format!(
        "---\ntitle: Lesson {i}\nchapter: 3\nlesson_number: {i}\nlearning_objectives: [Read, Write, Run]\n---\n# Lesson {i}\n\nAn opening paragraph about the lesson.\n\n",
        i = index
    );

    for s in 0..sections {
        match s % 4 {
            0 => text.push_str(&format!(
                "## What is Concept {s}?\n\nA concept is a design pattern. It has a clear principle.\n\n- point one\n- point two\n\n"
            )),
            1 => text.push_str(&format!(
                "## Example {s}\n\n```python\nfor i in range({s}):\n    print(i)\n```\n\nCall `print` with `i`.\n\n"
            )),
            2 => text.push_str(&format!(
                "## How to Build Step {s}\n\n1. Open the editor\n2. Write the code\n3. Run it\n\n"
            )),
            _ => text.push_str(&format!(
                "## Compare Options {s}\n\n| Option | Speed |\n|---|---|\n| A | fast |\n| B | slow |\n\n"
            )),
        }
    }
    text
}

fn create_batch(documents: usize, sections: usize) -> Vec<RawDocument> {
    (1..=documents)
        .map(|i| RawDocument::from_text(format!("{:02}-lesson", i), create_lesson(i, sections)))
        .collect()
}

/// Benchmark the full pipeline at various batch sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for documents in [1, 10, 50].iter() {
        let inputs = create_batch(*documents, 12);
        let parallel = Pipeline::builtin(PipelineOptions::new()).unwrap();
        let sequential = Pipeline::builtin(PipelineOptions::new().sequential()).unwrap();

        group.bench_function(format!("{}_docs_parallel", documents), |b| {
            b.iter(|| parallel.run(black_box(&inputs)));
        });
        group.bench_function(format!("{}_docs_sequential", documents), |b| {
            b.iter(|| sequential.run(black_box(&inputs)));
        });
    }

    group.finish();
}

/// Benchmark classification of a single lesson.
fn bench_classify(c: &mut Criterion) {
    let lesson = create_lesson(1, 40);
    c.bench_function("classify_40_sections", |b| {
        b.iter(|| lessonkit::classify_texts(black_box(&[("01-lesson", lesson.as_str())])).unwrap());
    });
}

/// Benchmark allocation over the built-in slide table.
fn bench_allocate(c: &mut Criterion) {
    let tables = DistributionTables::default();
    let selection = tables.select(TableFamily::Slides, "coding").unwrap();
    c.bench_function("allocate_120", |b| {
        b.iter(|| lessonkit::allocate(black_box(120), selection.distribution).unwrap());
    });
}

/// Benchmark rendering a list-heavy unit.
fn bench_render(c: &mut Criterion) {
    let engine = TemplateEngine::default();
    let points: Vec<String> = (0..20).map(|i| format!("Point {}", i)).collect();
    let ctx = Context::new()
        .with("section_title", "Benchmark")
        .with("definition_text", "A definition.")
        .with("key_points", points);

    c.bench_function("render_concept_20_points", |b| {
        b.iter(|| engine.render(black_box("concept"), "L2", &ctx).unwrap());
    });
}

criterion_group!(
    benches,
    bench_pipeline,
    bench_classify,
    bench_allocate,
    bench_render,
);
criterion_main!(benches);
