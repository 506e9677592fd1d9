use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lseq_text::crdt::sequence::{apply_local_edit, generate_between, Operation, ReplicaDocument};
use lseq_text::protocol::{decode_message, encode_message, operation_to_message};
use lseq_text::sync::receive;

/// Document holding `size` characters typed by one site
fn typed_document(size: usize) -> (ReplicaDocument, Vec<Operation>) {
    let mut doc = ReplicaDocument::new("bench".to_string());
    let ops = apply_local_edit(&mut doc, "", &"a".repeat(size));
    (doc, ops)
}

/// Benchmark position generation between two adjacent positions
fn bench_generate_between(c: &mut Criterion) {
    let (doc, _) = typed_document(2);
    let left = doc.records()[0].id.clone();
    let right = doc.records()[1].id.clone();

    c.bench_function("lseq_generate_between", |b| {
        b.iter(|| black_box(generate_between(Some(&left), Some(&right), "bench", 1)));
    });
}

/// Benchmark typing one character at a time at the end
fn bench_sequential_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lseq_sequential_typing");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut doc = ReplicaDocument::new("bench".to_string());
                let mut text = String::new();
                for _ in 0..size {
                    let next = format!("{text}a");
                    black_box(apply_local_edit(&mut doc, &text, &next));
                    text = next;
                }
            });
        });
    }

    group.finish();
}

/// Benchmark a single-word replacement inside a large document
fn bench_edit_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("lseq_edit_translation");

    for size in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_batched(
                || {
                    let old = "word ".repeat(size / 5);
                    let mut doc = ReplicaDocument::new("bench".to_string());
                    apply_local_edit(&mut doc, "", &old);
                    let mid = old.len() / 2;
                    let new = format!("{}other{}", &old[..mid], &old[mid + 4..]);
                    (doc, old, new)
                },
                |(mut doc, old, new)| {
                    black_box(apply_local_edit(&mut doc, &old, &new));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark applying a peer's operations through the JSON wire
fn bench_remote_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("lseq_remote_apply");

    for size in [100, 1000].iter() {
        let (_, ops) = typed_document(*size);
        let lines: Vec<String> = ops
            .iter()
            .map(|op| encode_message(&operation_to_message(op)).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let mut doc = ReplicaDocument::new("peer".to_string());
                for line in lines {
                    let msg = decode_message(line).unwrap();
                    black_box(receive(&mut doc, msg, 0).unwrap());
                }
                assert_eq!(doc.len(), lines.len());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_between,
    bench_sequential_typing,
    bench_edit_translation,
    bench_remote_apply
);
criterion_main!(benches);
