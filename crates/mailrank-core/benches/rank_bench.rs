//! Criterion benchmarks for index rebuild and ranked retrieval.
//!
//! Uses a synthetic mailbox of a few hundred emails, which is the size the
//! assistant sees in practice.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mailrank_core::{EmailDocument, EmailIndex, MailFilter, MailRetriever, RetrievalQuery};

const MAILBOX_SIZE: usize = 500;

const SUBJECTS: [&str; 6] = [
    "Invoice overdue for March",
    "Team lunch this Friday",
    "Budget approval request",
    "Quarterly report draft",
    "Security alert on your account",
    "Travel itinerary update",
];

fn mailbox(n: usize) -> Vec<EmailDocument> {
    (0..n)
        .map(|i| {
            let subject = SUBJECTS[i % SUBJECTS.len()];
            EmailDocument::new(format!("email_{i:04}"))
                .with_sender(format!("user{}@example.com", i % 17), format!("User {}", i % 17))
                .with_subject(subject)
                .with_body(format!("{subject}. Please review the attached notes, item {i}."))
                .with_timestamp("2025-03-01T10:00:00Z")
                .starred(i % 5 == 0)
                .important(i % 7 == 0)
                .read(i % 3 == 0)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Index rebuild
// ---------------------------------------------------------------------------

fn bench_index_rebuild(c: &mut Criterion) {
    let docs = mailbox(MAILBOX_SIZE);
    c.bench_function("index_rebuild_500", |b| {
        let index = EmailIndex::new();
        b.iter(|| black_box(index.index(docs.clone())));
    });
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

fn bench_retrieve(c: &mut Criterion) {
    let retriever = MailRetriever::default();
    retriever.index_emails(mailbox(MAILBOX_SIZE));

    let plain = RetrievalQuery::new("invoice overdue payment").with_top_k(10);
    c.bench_function("retrieve_plain_500", |b| {
        b.iter(|| black_box(retriever.retrieve(black_box(&plain))));
    });

    let filtered = RetrievalQuery::new("budget report")
        .with_top_k(10)
        .with_filters(MailFilter::default().with_unread(true).with_starred(true));
    c.bench_function("retrieve_filtered_500", |b| {
        b.iter(|| black_box(retriever.retrieve(black_box(&filtered))));
    });

    c.bench_function("stats_500", |b| b.iter(|| black_box(retriever.stats())));
}

criterion_group!(benches, bench_index_rebuild, bench_retrieve);
criterion_main!(benches);
