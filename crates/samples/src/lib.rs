//! Muster - Samples
//!
//! Online-aggregation primitives for the telemetry ingestion path.
//!
//! # Overview
//!
//! This crate provides:
//! - [`Metric`] - a mergeable count/last/min/max/sum summary statistic
//! - [`SampleKey`] - a deterministic identity for a dimension set
//! - [`Sample`] - one keyed observation record with per-slot metrics
//! - [`SampleTable`] - a concurrent upsert-or-merge store for samples
//!
//! # Design Principles
//!
//! - **Lock-scalable**: the table is sharded; upserts on distinct keys
//!   never contend on a single lock
//! - **Merge algebra**: count/sum/min/max are associative and commutative,
//!   so producers can fold observations in any interleaving without losing
//!   updates
//! - **Opaque keys**: the table never interprets key bytes; key derivation
//!   is fixed at the producer boundary
//!
//! # Example
//!
//! ```ignore
//! use muster_samples::{Sample, SampleKey, SampleTable};
//!
//! let table = SampleTable::new();
//!
//! let key = SampleKey::from_dimensions(&[("host", "web-1"), ("zone", "eu")]);
//! let mut sample = Sample::new(key, 2);
//! sample.set_metric(0, 42.0)?;
//! table.upsert_merge(sample)?;
//! ```

pub mod key;
pub mod metric;
pub mod sample;
pub mod table;

pub use key::SampleKey;
pub use metric::Metric;
pub use sample::{Sample, SampleError};
pub use table::{SampleTable, TableError};
