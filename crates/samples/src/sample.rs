//! Sample - one keyed observation record
//!
//! A sample pairs a [`SampleKey`] with a fixed number of metric slots. Slot
//! count comes from the decoder's schema; slot names live there too, the
//! table only ever sees indices. A slot stays empty until the record
//! carries a value for it, so sparse records merge correctly.

use thiserror::Error;

use crate::key::SampleKey;
use crate::metric::Metric;

/// Sample construction and merge errors
#[derive(Debug, Error)]
pub enum SampleError {
    /// Metric slot index outside the schema's slot count
    #[error("metric slot {slot} out of range ({slots} slots)")]
    SlotOutOfRange { slot: usize, slots: usize },

    /// Merging two samples with different slot counts
    #[error("slot count mismatch: {ours} vs {theirs}")]
    SlotCountMismatch { ours: usize, theirs: usize },
}

/// One aggregated record for a dimension-key identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    key: SampleKey,

    /// Raw observation records folded into this sample
    hit_count: u64,

    /// Schema-indexed metric slots; `None` until first observed
    metrics: Vec<Option<Metric>>,
}

impl Sample {
    /// Create a sample representing a single observation record with
    /// `num_metrics` empty slots.
    pub fn new(key: SampleKey, num_metrics: usize) -> Self {
        Self {
            key,
            hit_count: 1,
            metrics: vec![None; num_metrics],
        }
    }

    /// The sample's identity.
    pub fn key(&self) -> &SampleKey {
        &self.key
    }

    /// Number of raw observation records folded in.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Number of metric slots.
    pub fn num_slots(&self) -> usize {
        self.metrics.len()
    }

    /// Aggregate for one slot, if any value was observed for it.
    pub fn metric(&self, slot: usize) -> Option<&Metric> {
        self.metrics.get(slot).and_then(|m| m.as_ref())
    }

    /// Fold one raw value into a slot.
    pub fn set_metric(&mut self, slot: usize, value: f64) -> Result<(), SampleError> {
        let slots = self.metrics.len();
        let entry = self
            .metrics
            .get_mut(slot)
            .ok_or(SampleError::SlotOutOfRange { slot, slots })?;

        match entry {
            Some(metric) => metric.add(value),
            None => *entry = Some(Metric::new(value)),
        }
        Ok(())
    }

    /// Merge another sample for the same key into this one, slot by slot.
    ///
    /// `other` is the more recent operand: where both sides hold a slot,
    /// `last` is taken from `other`.
    pub fn merge(&mut self, other: &Sample) -> Result<(), SampleError> {
        if self.metrics.len() != other.metrics.len() {
            return Err(SampleError::SlotCountMismatch {
                ours: self.metrics.len(),
                theirs: other.metrics.len(),
            });
        }

        self.hit_count += other.hit_count;
        for (mine, theirs) in self.metrics.iter_mut().zip(&other.metrics) {
            match (mine.as_mut(), theirs) {
                (Some(m), Some(t)) => m.add_metric(t),
                (None, Some(t)) => *mine = Some(*t),
                (_, None) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;
