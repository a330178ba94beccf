//! Benchmarks for TransitDB storage operations

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

use transitdb::{Line, OrderedIndex, RecordStore};

fn line_labels() -> Vec<String> {
    ["Code", "Card", "Name", "Color"]
        .map(str::to_string)
        .to_vec()
}

fn populated_store(dir: &TempDir, count: i32) -> RecordStore<Line> {
    let mut store = RecordStore::create(&dir.path().join("lines.bin"), line_labels()).unwrap();
    for code in 0..count {
        let line = Line::new(true, code, b'N', format!("Line {}", code), "Blue".into());
        store.append(&line).unwrap();
    }
    store.mark_clean().unwrap();
    store
}

fn storage_benchmarks(c: &mut Criterion) {
    c.bench_function("append_1000_records", |b| {
        b.iter_batched(
            TempDir::new,
            |dir| {
                let dir = dir.unwrap();
                populated_store(&dir, 1000)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("scan_10000_records", |b| {
        let dir = TempDir::new().unwrap();
        let mut store = populated_store(&dir, 10_000);
        b.iter(|| {
            store
                .records()
                .unwrap()
                .map(|r| r.unwrap().1.code)
                .sum::<i32>()
        })
    });

    c.bench_function("index_search_10000_keys", |b| {
        let dir = TempDir::new().unwrap();
        let mut index = OrderedIndex::create(&dir.path().join("lines.idx")).unwrap();
        // Balanced-ish insertion order: midpoint-first by stride halving.
        let mut stride = 8192;
        while stride >= 1 {
            let mut key = stride;
            while key < 10_000 {
                let _ = index.insert(key, key as i64);
                key += stride;
            }
            stride /= 2;
        }
        b.iter(|| index.search(7777))
    });
}

criterion_group!(benches, storage_benchmarks);
criterion_main!(benches);
