//! Metric - mergeable summary statistic
//!
//! A `Metric` is the smallest aggregation unit: count, last observed value,
//! min, max and sum. Two metrics combine with an associative, commutative
//! algebra (except `last`, which is taken from the more recently applied
//! operand), so observations can be folded in any order without losing data.

/// Summary statistics for one metric slot.
///
/// A freshly constructed metric represents a single observation, so
/// `min == max == last == sum` and `count == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    /// Number of raw observations folded in
    pub count: f64,

    /// Most recently observed value
    pub last: f64,

    /// Smallest observed value
    pub min: f64,

    /// Largest observed value
    pub max: f64,

    /// Sum of all observed values
    pub sum: f64,
}

impl Metric {
    /// Create a singleton aggregate from one observation.
    pub fn new(value: f64) -> Self {
        Self {
            count: 1.0,
            last: value,
            min: value,
            max: value,
            sum: value,
        }
    }

    /// Fold one more raw observation into this aggregate.
    pub fn add(&mut self, value: f64) {
        self.count += 1.0;
        self.last = value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    /// Fold a whole pre-aggregated metric into this one.
    ///
    /// `other` is treated as the more recent operand: its `last` wins.
    pub fn add_metric(&mut self, other: &Metric) {
        self.count += other.count;
        self.last = other.last;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
    }
}

#[cfg(test)]
#[path = "metric_test.rs"]
mod metric_test;
