//! Tests for sample records and slot-wise merging

use crate::key::SampleKey;
use crate::sample::{Sample, SampleError};

fn key(name: &str) -> SampleKey {
    SampleKey::from_dimensions(&[("host", name)])
}

#[test]
fn test_new_sample() {
    let s = Sample::new(key("web-1"), 3);

    assert_eq!(s.hit_count(), 1);
    assert_eq!(s.num_slots(), 3);
    assert!(s.metric(0).is_none());
    assert!(s.metric(2).is_none());
}

#[test]
fn test_set_metric_creates_singleton() {
    let mut s = Sample::new(key("web-1"), 2);
    s.set_metric(0, 111.0).unwrap();

    let m = s.metric(0).unwrap();
    assert_eq!(m.count, 1.0);
    assert_eq!(m.min, 111.0);
    assert_eq!(m.max, 111.0);
    assert_eq!(m.sum, 111.0);
    assert_eq!(m.last, 111.0);
    assert!(s.metric(1).is_none());
}

#[test]
fn test_set_metric_folds_repeated_values() {
    let mut s = Sample::new(key("web-1"), 1);
    s.set_metric(0, 4.0).unwrap();
    s.set_metric(0, 6.0).unwrap();

    let m = s.metric(0).unwrap();
    assert_eq!(m.count, 2.0);
    assert_eq!(m.sum, 10.0);
    assert_eq!(m.last, 6.0);
}

#[test]
fn test_set_metric_out_of_range() {
    let mut s = Sample::new(key("web-1"), 1);
    let err = s.set_metric(5, 1.0).unwrap_err();
    assert!(matches!(err, SampleError::SlotOutOfRange { slot: 5, slots: 1 }));
}

#[test]
fn test_merge_accumulates() {
    let mut a = Sample::new(key("web-1"), 2);
    a.set_metric(0, 111.0).unwrap();

    let mut b = Sample::new(key("web-1"), 2);
    b.set_metric(0, 111.0).unwrap();
    b.set_metric(1, 7.0).unwrap();

    a.merge(&b).unwrap();

    assert_eq!(a.hit_count(), 2);
    let m0 = a.metric(0).unwrap();
    assert_eq!(m0.count, 2.0);
    assert_eq!(m0.sum, 222.0);
    assert_eq!(m0.min, 111.0);
    assert_eq!(m0.max, 111.0);

    // slot only present on the other side is copied over
    let m1 = a.metric(1).unwrap();
    assert_eq!(m1.count, 1.0);
    assert_eq!(m1.sum, 7.0);
}

#[test]
fn test_merge_keeps_unmatched_slot() {
    let mut a = Sample::new(key("web-1"), 2);
    a.set_metric(1, 3.0).unwrap();

    let b = Sample::new(key("web-1"), 2);
    a.merge(&b).unwrap();

    assert_eq!(a.hit_count(), 2);
    assert_eq!(a.metric(1).unwrap().sum, 3.0);
    assert!(a.metric(0).is_none());
}

#[test]
fn test_merge_slot_count_mismatch() {
    let mut a = Sample::new(key("web-1"), 2);
    let b = Sample::new(key("web-1"), 3);

    let err = a.merge(&b).unwrap_err();
    assert!(matches!(
        err,
        SampleError::SlotCountMismatch { ours: 2, theirs: 3 }
    ));
}
