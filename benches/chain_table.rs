#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use chainmap::{HashTable, fnv::FnvBuildHasher};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn hash_table_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = proptest::collection::vec(("[a-z0-9]{4,24}", any::<u64>()), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash table comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained insert", |b| {
        b.iter(|| {
            let mut table = HashTable::new();
            for (key, value) in items.clone() {
                table.insert(key, value);
            }
            table
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            let mut map = HashMap::new();
            for (key, value) in items.clone() {
                map.insert(key, value);
            }
            map
        });
    });
    group.bench_function("rust std fnv insert", |b| {
        b.iter(|| {
            let mut map = HashMap::with_hasher(FnvBuildHasher);
            for (key, value) in items.clone() {
                map.insert(key, value);
            }
            map
        });
    });

    let table: HashTable<u64> = items.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let map: HashMap<String, u64> = items.iter().cloned().collect();
    group.bench_function("chained get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(table.get(key));
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(map.get(key));
            }
        });
    });
    group.bench_function("chained remove", |b| {
        b.iter(|| {
            let mut table = table.clone();
            for (key, _) in &items {
                table.remove(key);
            }
            table
        });
    });
    group.finish();
}

criterion_group!(benches, hash_table_benches);

criterion_main!(benches);
