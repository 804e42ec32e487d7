// Index construction and query benchmarks over a synthetic corpus
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docmatch_core::{
    Corpus, Document, EmbeddingConfig, EmbeddingIndex, LexicalConfig, LexicalIndex,
    SimilarityIndex, StopwordSet,
};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

const WORDS: &[&str] = &[
    "cocoa", "grain", "wheat", "corn", "prices", "exports", "tonnes", "bahia", "crop", "market",
    "trade", "reserve", "department", "farmer", "stocks", "futures", "shipment", "harvest",
    "weather", "rain", "dollar", "yen", "bank", "rates", "oil", "crude", "barrel", "opec",
];

fn generate_corpus(size: usize, words_per_doc: usize) -> Corpus {
    let mut rng = StdRng::seed_from_u64(42);
    let stopwords = StopwordSet::new();
    let documents = (0..size)
        .map(|i| {
            let text: Vec<&str> = (0..words_per_doc)
                .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                .collect();
            Document::new(format!("training/{}", i), text.join(" "), BTreeSet::new(), &stopwords)
        })
        .collect();
    Corpus::new(documents).unwrap()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for size in [100, 1000].iter() {
        let corpus = generate_corpus(*size, 60);
        let texts: Vec<&str> = corpus.iter().map(|d| d.raw_text()).collect();
        let tokens: Vec<&[String]> = corpus.iter().map(|d| d.tokens()).collect();

        group.bench_with_input(BenchmarkId::new("tfidf", size), size, |b, _| {
            b.iter(|| LexicalIndex::fit(black_box(&texts), &LexicalConfig::default()).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("w2v", size), size, |b, _| {
            b.iter(|| EmbeddingIndex::build(black_box(&tokens), &EmbeddingConfig::default()).unwrap());
        });
    }

    group.finish();
}

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let corpus = generate_corpus(5000, 60);
    let texts: Vec<&str> = corpus.iter().map(|d| d.raw_text()).collect();
    let tokens: Vec<&[String]> = corpus.iter().map(|d| d.tokens()).collect();
    let lexical = LexicalIndex::fit(&texts, &LexicalConfig::default()).unwrap();
    let embedding = EmbeddingIndex::build(&tokens, &EmbeddingConfig::default()).unwrap();

    group.bench_function("tfidf_best", |b| {
        b.iter(|| lexical.best(black_box("cocoa prices in bahia")).unwrap());
    });
    group.bench_function("w2v_best", |b| {
        b.iter(|| embedding.best(black_box("cocoa prices in bahia")).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_query);
criterion_main!(benches);
