/*!
# Query Filter Benchmarks

Measures query string decoding, parsing against an allow-list, and applying the
resulting criteria onto a sea-query statement.

## Usage

```bash
# Run all benchmarks
cargo bench --bench query_benchmarks

# Run one group
cargo bench --bench query_benchmarks -- "Parsing"

# Quick benchmark with fewer samples
cargo bench --bench query_benchmarks -- --quick
```

HTML reports are generated in `target/criterion/report/index.html`.
*/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use queryfilter::{
    BetweenFilter, ForbiddenPolicy, QueryBag, QueryFilter, QueryParser, SimpleQueryParser,
};
use sea_orm::sea_query::{Alias, Query, SqliteQueryBuilder};

const QUERIES: [(&str, &str); 4] = [
    ("single_filter", "filter[name]=nils"),
    ("filter_list", "filter[name]=nils,refle,dukel,weg&filter[street]=Dukelweg"),
    ("sort_and_fields", "sort=-street,name,created_at&fields=name,email,street"),
    (
        "everything",
        "filter[name]=nils,refle&filter[street]=weg&filter[created_at]=2020-01-01,2020-01-31&sort=-street,name&fields=name,email",
    ),
];

fn users_filter() -> QueryFilter {
    let mut filter = QueryFilter::new();
    filter
        .allow_filters(["name", "street"])
        .allow([BetweenFilter::new("created_at")])
        .allow_sorts(["street", "name", "created_at"])
        .allow_fields(["name", "email", "street"]);
    filter
}

fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decoding");

    for (label, query) in QUERIES {
        group.bench_with_input(BenchmarkId::new("from_url", label), &query, |b, query| {
            b.iter(|| QueryBag::from_url(black_box(query)));
        });
    }

    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let filter = users_filter();
    let parser = SimpleQueryParser::default();
    let mut group = c.benchmark_group("Parsing");

    for (label, query) in QUERIES {
        let bag = QueryBag::from_url(query);
        group.bench_with_input(BenchmarkId::new("parse", label), &bag, |b, bag| {
            b.iter(|| {
                parser
                    .parse(black_box(bag), filter.allowed_criteria(), ForbiddenPolicy::Reject)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_applying(c: &mut Criterion) {
    let filter = users_filter();
    let mut group = c.benchmark_group("Applying");

    for (label, query) in QUERIES {
        let bag = QueryBag::from_url(query);
        group.bench_with_input(BenchmarkId::new("apply_to_sql", label), &bag, |b, bag| {
            b.iter(|| {
                let mut select = Query::select()
                    .column(Alias::new("id"))
                    .from(Alias::new("users"))
                    .to_owned();
                filter.apply_to(&mut select, Some(black_box(bag.clone()))).unwrap();
                select.to_string(SqliteQueryBuilder)
            });
        });
    }

    group.finish();
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(3))
        .warm_up_time(std::time::Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_decoding, bench_parsing, bench_applying
}
criterion_main!(benches);
