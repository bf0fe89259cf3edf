//! Benchmarks for the hot helpers of a harvest.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use harvest::artifacts::sanitize_locator;
use harvest::core::{ContentKind, Link, Payload};
use harvest::sites::demo;

fn classification_benchmark(c: &mut Criterion) {
    c.bench_function("sanitize_locator", |b| {
        b.iter(|| sanitize_locator(black_box("https://iba-world.com/cocktails/all-cocktails/page/2/")))
    });

    c.bench_function("classify", |b| {
        b.iter(|| ContentKind::classify(black_box(Some("application/vnd.harvest.iba-cocktail+json"))))
    });

    let payload = Payload::fetched(
        Link::external("https://example.test/list", "list"),
        "<ul></ul>",
        "text/html",
    );
    c.bench_function("payload_state", |b| b.iter(|| black_box(&payload).state().is_ok()));
}

fn demo_harvest_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    c.bench_function("demo_harvest", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let pipeline = harvest::engine::Pipeline::builder(demo::config())
                    .canned_responses(std::sync::Arc::new(demo::canned_fetcher()))
                    .build()
                    .expect("demo pipeline");
                pipeline
                    .run_from(demo::ENTRY_URL, demo::LISTING_PAGE_TYPE)
                    .await
                    .expect("demo harvest")
            })
        })
    });
}

criterion_group!(benches, classification_benchmark, demo_harvest_benchmark);
criterion_main!(benches);
