//! Table export performance benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scicat::export::{ExportConfig, ExportTable, Exporter};
use scicat::format::NumberFormat;
use scicat::Datum;

struct Table {
    values: Vec<Vec<Datum>>,
    errors: Vec<Vec<Option<f64>>>,
    notes: Vec<Vec<Option<String>>>,
    references: Vec<Vec<Option<String>>>,
}

/// Generate a star table: name, temperature with errors, mass without.
fn generate_table(rows: usize) -> Table {
    let mut table = Table {
        values: Vec::with_capacity(rows),
        errors: Vec::with_capacity(rows),
        notes: Vec::with_capacity(rows),
        references: Vec::with_capacity(rows),
    };

    for row in 0..rows {
        table.values.push(vec![
            Datum::Text(format!("GJ {}", 100 + row)),
            Datum::Number(3000.0 + (row % 700) as f64),
            Datum::Number(0.1 + (row % 50) as f64 * 0.01),
        ]);
        table.errors.push(vec![None, Some(15.0 + (row % 40) as f64), None]);
        table.notes.push(vec![
            (row % 7 == 0).then(|| format!("note {}", row % 5)),
            None,
            None,
        ]);
        table.references.push(vec![
            None,
            Some(format!("ref{}", row % 30)),
            (row % 3 == 0).then(|| format!("ref{},ref{}", row % 11, row % 13)),
        ]);
    }

    table
}

/// Benchmark rendering in both reference modes.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let formats = vec![None, None, Some(NumberFormat::Fixed(2))];

    for rows in [10, 100, 1000].iter() {
        let table = generate_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        for compact in [false, true] {
            let exporter = Exporter::with_config(
                ExportConfig::default()
                    .with_compact_refs(compact)
                    .with_column_formats(formats.clone()),
            );
            let name = if compact { "compact_rows" } else { "expanded_rows" };
            group.bench_with_input(BenchmarkId::new(name, rows), &table, |b, table| {
                b.iter(|| {
                    let export = ExportTable::new(&table.values)
                        .with_errors(&table.errors)
                        .with_notes(&table.notes)
                        .with_references(&table.references);
                    black_box(exporter.render(&export).unwrap())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
