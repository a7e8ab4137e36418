//! Benchmarks for role resolution and tree queries.
//!
//! Run with: cargo bench

use std::fmt::Write;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use axquery::{Document, Query, get_role, query_selector, query_selector_all};

/// A page with `sections` article sections, each holding a heading, a form
/// and a list.
fn sample_page(sections: usize) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html><head><style>.collapsed { display: none }</style></head><body>",
    );
    html.push_str("<header><nav><a href=\"/\">Home</a></nav></header><main>");
    for i in 0..sections {
        let _ = write!(
            html,
            r#"<section aria-label="Section {i}">
                <h2>Section {i}</h2>
                <form>
                  <input name="q{i}" required>
                  <input type="checkbox" aria-checked="mixed">
                  <button aria-expanded="{expanded}">More</button>
                </form>
                <ul class="{class}"><li>One</li><li>Two</li><li><a href="/{i}">Three</a></li></ul>
              </section>"#,
            expanded = i % 2 == 0,
            class = if i % 3 == 0 { "collapsed" } else { "open" },
        );
    }
    html.push_str("</main><footer>Fine print</footer></body></html>");
    html
}

// ============================================================================
// Parsing
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let html = sample_page(200);
    c.bench_function("parse_document", |b| {
        b.iter(|| Document::parse(black_box(&html)));
    });
}

// ============================================================================
// Queries
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let html = sample_page(200);
    let doc = Document::parse(&html);

    c.bench_function("query_selector_all_command", |b| {
        b.iter(|| query_selector_all(doc.root(), black_box("command")).unwrap());
    });

    c.bench_function("query_selector_all_landmark", |b| {
        b.iter(|| query_selector_all(doc.root(), black_box("landmark")).unwrap());
    });

    c.bench_function("query_selector_all_state", |b| {
        b.iter(|| query_selector_all(doc.root(), black_box(":expanded")).unwrap());
    });

    c.bench_function("query_selector_all_level", |b| {
        b.iter(|| query_selector_all(doc.root(), black_box(r#"[level="2"]"#)).unwrap());
    });

    c.bench_function("query_selector_all_include_hidden", |b| {
        let query = Query::default().include_hidden(true);
        b.iter(|| query.query_selector_all(doc.root(), black_box("listitem")).unwrap());
    });

    c.bench_function("query_selector_banner", |b| {
        b.iter(|| query_selector(doc.root(), black_box("banner")).unwrap());
    });
}

fn bench_get_role(c: &mut Criterion) {
    let html = sample_page(200);
    let doc = Document::parse(&html);
    let elements: Vec<_> = doc.elements().collect();

    c.bench_function("get_role_all_elements", |b| {
        b.iter(|| {
            for el in &elements {
                black_box(get_role(el).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_queries, bench_get_role);
criterion_main!(benches);
