//! Benchmark for extraction throughput on realistic model output.
//!
//! Measures the full strategy cascade on three input shapes: well-formed
//! tags (fast path), fuzzy markers (one failed strategy first), and plain
//! natural language (every strategy runs). Extraction sits on the hot path
//! of every submitted job, so regressions here are user-visible latency.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use switchboard_extract::Extractor;

fn tagged_text(index: usize) -> String {
    format!(
        "Of course, I can take care of both of those for you right away. \
         First I will work out the arithmetic you asked about and then store \
         the note so it is available next time you ask. \
         <calculator verb=\"calculate\" expression=\"{} * 3 + 7\"/> and then \
         <memory verb=\"remember\">reference number {} belongs to this thread</memory> \
         Let me know if you need anything else.",
        index, index
    )
}

fn fuzzy_text(index: usize) -> String {
    format!(
        "Sure thing, running that now. <calculator calculate>{} * 3 + 7 \
         and when that finishes I will follow up with the saved context you \
         asked about earlier in the conversation.",
        index
    )
}

fn natural_text(index: usize) -> String {
    format!(
        "I don't have a tool marker for this one, but you probably want me \
         to calculate {} * 3 + 7 and then remember that the rollout starts \
         Thursday morning. The deployment window was discussed in the \
         standup and the on-call rotation changes at the same time.",
        index
    )
}

fn bench_extraction(c: &mut Criterion) {
    let extractor = Extractor::new();

    let mut group = c.benchmark_group("extract");
    group.measurement_time(Duration::from_secs(5));

    let tagged: Vec<String> = (0..64).map(tagged_text).collect();
    group.bench_function("well_formed_tags", |b| {
        let mut i = 0;
        b.iter(|| {
            let out = extractor.extract(&tagged[i % tagged.len()]);
            i += 1;
            assert_eq!(out.len(), 2);
        });
    });

    let fuzzy: Vec<String> = (0..64).map(fuzzy_text).collect();
    group.bench_function("fuzzy_tags", |b| {
        let mut i = 0;
        b.iter(|| {
            let out = extractor.extract(&fuzzy[i % fuzzy.len()]);
            i += 1;
            assert!(!out.is_empty());
        });
    });

    let natural: Vec<String> = (0..64).map(natural_text).collect();
    group.bench_function("natural_language", |b| {
        let mut i = 0;
        b.iter(|| {
            let out = extractor.extract(&natural[i % natural.len()]);
            i += 1;
            assert!(!out.is_empty());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
