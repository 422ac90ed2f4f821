//! Benchmarks for the filter, sort and render pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shls::config::DisplayConfig;
use shls::tokenizer::PathHints;
use shls::{filters, formatter, resolve, FileRecord, OptionTable};
use std::time::{Duration, UNIX_EPOCH};

/// Synthetic directory contents with varied names, sizes and times
fn create_entries(count: usize) -> Vec<FileRecord> {
    (0..count)
        .map(|i| {
            let mut entry = if i % 7 == 0 {
                FileRecord::dir(format!("dir_{}", i))
            } else {
                let ext = ["rs", "txt", "md", "toml"][i % 4];
                FileRecord::file(format!("file_{}.{}", i, ext), (i as u64 * 7919) % 100_000)
            };
            entry.modified = UNIX_EPOCH + Duration::from_secs((i as u64 * 104_729) % 1_000_000);
            entry.accessed = entry.modified;
            entry
        })
        .collect()
}

fn config_for(options: &[&str]) -> shls::EffectiveConfig {
    let table = OptionTable::from_options(options).unwrap();
    resolve(&table, &PathHints::default(), &DisplayConfig::default()).unwrap()
}

fn benchmark_sorts(c: &mut Criterion) {
    let entries = create_entries(5_000);

    for (name, options) in [
        ("sort_size", vec!["S"]),
        ("sort_time", vec!["t"]),
        ("sort_extension_reverse", vec!["X", "r"]),
    ] {
        let config = config_for(&options);
        c.bench_function(name, |b| {
            b.iter(|| filters::apply(black_box(entries.clone()), &config).unwrap());
        });
    }
}

fn benchmark_views(c: &mut Criterion) {
    let entries = create_entries(2_000);

    for (name, options) in [
        ("render_long", vec!["l", "h"]),
        ("render_vertical", vec![]),
        ("render_horizontal", vec!["x"]),
        ("render_comma", vec!["m", "s"]),
    ] {
        let config = config_for(&options);
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(256 * 1024);
                formatter::render(&mut out, "bench", black_box(&entries), &config).unwrap();
                out
            });
        });
    }
}

fn benchmark_resolve(c: &mut Criterion) {
    c.bench_function("resolve_options", |b| {
        b.iter(|| {
            let table = OptionTable::from_options(black_box([
                "l", "A", "t", "r", "h", "group-directories-first", "quoting-style=c",
            ]))
            .unwrap();
            resolve(&table, &PathHints::default(), &DisplayConfig::default()).unwrap()
        });
    });
}

criterion_group!(benches, benchmark_sorts, benchmark_views, benchmark_resolve);
criterion_main!(benches);
