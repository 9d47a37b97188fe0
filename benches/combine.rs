use std::hint::black_box;
use std::path::PathBuf;

use criterion::{Criterion, criterion_group, criterion_main};

use csv_combine::combine::accept_rows;
use csv_combine::ingestion::csv::{parse_csv_from_reader, unify_headers};
use csv_combine::ingestion::{Dialect, LiteralSplitter};
use csv_combine::output::write_combined;

fn synthetic_csv(rows: usize, offset: usize) -> String {
    let mut out = format!("id,name,col{offset},score\n");
    for i in 0..rows {
        // Every tenth row has an empty cell.
        let name = if i % 10 == 0 { String::new() } else { format!("n{i}") };
        out.push_str(&format!("{i},{name},v{i},{}\n", i * 3));
    }
    out
}

fn bench_parse_and_write(c: &mut Criterion) {
    let inputs: Vec<String> = (0..4).map(|i| synthetic_csv(5_000, i)).collect();

    c.bench_function("parse_validate_write_4x5000", |b| {
        b.iter(|| {
            let sources: Vec<_> = inputs
                .iter()
                .enumerate()
                .filter_map(|(i, text)| {
                    parse_csv_from_reader(
                        text.as_bytes(),
                        PathBuf::from(format!("{i}.csv")),
                        &LiteralSplitter,
                    )
                    .unwrap()
                })
                .collect();
            let headers = unify_headers(&sources);
            let (batch, _) = accept_rows(&sources, None);

            let mut out = Vec::with_capacity(1 << 20);
            write_combined(&mut out, &headers, &batch, Dialect::Literal).unwrap();
            black_box(out.len())
        })
    });
}

criterion_group!(benches, bench_parse_and_write);
criterion_main!(benches);
