//! Tests for the concurrent sample table

use std::sync::Arc;
use std::thread;

use crate::key::SampleKey;
use crate::sample::Sample;
use crate::table::SampleTable;

fn sample(host: &str, value: f64) -> Sample {
    let key = SampleKey::from_dimensions(&[("host", host)]);
    let mut s = Sample::new(key, 1);
    s.set_metric(0, value).unwrap();
    s
}

#[test]
fn test_insert_new_key() {
    let table = SampleTable::new();

    table.upsert_merge(sample("web-1", 111.0)).unwrap();
    assert_eq!(table.len(), 1);

    let mut seen = Vec::new();
    table.range(|s| seen.push(s.clone()));
    assert_eq!(seen.len(), 1);

    let m = seen[0].metric(0).unwrap();
    assert_eq!(m.count, 1.0);
    assert_eq!(m.sum, 111.0);
    assert_eq!(m.min, 111.0);
    assert_eq!(m.max, 111.0);
    assert_eq!(m.last, 111.0);
}

#[test]
fn test_merge_existing_key() {
    let table = SampleTable::new();

    table.upsert_merge(sample("web-1", 111.0)).unwrap();
    table.upsert_merge(sample("web-1", 111.0)).unwrap();
    table.upsert_merge(sample("web-2", 114.0)).unwrap();
    assert_eq!(table.len(), 2);

    let mut seen = Vec::new();
    table.range(|s| seen.push(s.clone()));
    seen.sort_by(|a, b| a.key().as_bytes().cmp(b.key().as_bytes()));

    let m1 = seen[0].metric(0).unwrap();
    assert_eq!(seen[0].hit_count(), 2);
    assert_eq!(m1.count, 2.0);
    assert_eq!(m1.sum, 222.0);

    let m2 = seen[1].metric(0).unwrap();
    assert_eq!(seen[1].hit_count(), 1);
    assert_eq!(m2.sum, 114.0);
}

#[test]
fn test_clear() {
    let table = SampleTable::new();
    table.upsert_merge(sample("web-1", 1.0)).unwrap();
    table.upsert_merge(sample("web-2", 2.0)).unwrap();

    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
}

#[test]
fn test_concurrent_upserts_no_lost_updates() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 125; // 1000 observations total

    let table = Arc::new(SampleTable::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let value = (t * PER_THREAD + i) as f64;
                    table.upsert_merge(sample("web-1", value)).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(table.len(), 1);

    let mut seen = Vec::new();
    table.range(|s| seen.push(s.clone()));

    let total: usize = THREADS * PER_THREAD;
    let expected_sum: f64 = (0..total).map(|v| v as f64).sum();

    let m = seen[0].metric(0).unwrap();
    assert_eq!(seen[0].hit_count(), total as u64);
    assert_eq!(m.count, total as f64);
    assert_eq!(m.sum, expected_sum);
    assert_eq!(m.min, 0.0);
    assert_eq!(m.max, (total - 1) as f64);
}

#[test]
fn test_concurrent_distinct_keys() {
    const THREADS: usize = 4;
    const KEYS_PER_THREAD: usize = 50;

    let table = Arc::new(SampleTable::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let host = format!("host-{t}-{i}");
                    table.upsert_merge(sample(&host, 1.0)).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(table.len(), THREADS * KEYS_PER_THREAD);
}
