use std::collections::BTreeMap;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use selfassess_core::model::{Catalog, Session};
use selfassess_core::store::{format_record, parse_results_str, RecordFormat};

const CATEGORIES: [&str; 3] = ["mental", "technique", "physical"];

fn make_catalog(questions: usize) -> Catalog {
    Catalog::from_pairs((0..questions).map(|i| (format!("Question {i}"), CATEGORIES[i % 3])))
}

fn make_history(sessions: usize, questions: usize, format: RecordFormat) -> String {
    let mut out = String::new();
    for s in 0..sessions {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_micro_opt(8, 0, 0, 0)
            .unwrap()
            + chrono::Duration::days(s as i64);
        let answers: BTreeMap<_, _> = (0..questions).map(|q| (q, ((q + s) % 6) as i32)).collect();
        out.push_str(&format_record(&Session::new(timestamp, answers), format).unwrap());
        out.push('\n');
    }
    out
}

fn bench_parse_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_results");
    let catalog = make_catalog(30);

    for sessions in [10, 100, 1000] {
        let tokens = make_history(sessions, 30, RecordFormat::Tokens);
        let json = make_history(sessions, 30, RecordFormat::Json);

        group.bench_function(format!("tokens_{sessions}"), |b| {
            b.iter(|| parse_results_str(black_box(&tokens), "bench", &catalog).unwrap())
        });
        group.bench_function(format!("json_{sessions}"), |b| {
            b.iter(|| parse_results_str(black_box(&json), "bench", &catalog).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_results);
criterion_main!(benches);
