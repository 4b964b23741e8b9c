//! SampleKey - deterministic identity for a dimension set
//!
//! Two semantically identical dimension sets must map to the same table
//! entry, so the encoding has to be canonical: pairs are sorted by
//! dimension name and encoded as `name=value` joined by the ASCII unit
//! separator (0x1F). The full encoding is retained rather than hashed, so
//! distinct dimension sets can never collide.

/// Joins encoded `name=value` pairs. Not a printable byte, so it cannot
/// appear inside wire-format fields.
const PAIR_SEPARATOR: u8 = 0x1F;

/// Canonical, opaque identity of one dimension set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey(Box<[u8]>);

impl SampleKey {
    /// Derive a key from dimension name/value pairs.
    ///
    /// Pair order does not matter; the encoding sorts by name (then value,
    /// for duplicate names) before joining.
    pub fn from_dimensions(dimensions: &[(&str, &str)]) -> Self {
        let mut pairs: Vec<&(&str, &str)> = dimensions.iter().collect();
        pairs.sort_unstable();

        let encoded_len: usize = pairs
            .iter()
            .map(|(name, value)| name.len() + 1 + value.len() + 1)
            .sum();
        let mut encoded = Vec::with_capacity(encoded_len);

        for (i, (name, value)) in pairs.iter().enumerate() {
            if i > 0 {
                encoded.push(PAIR_SEPARATOR);
            }
            encoded.extend_from_slice(name.as_bytes());
            encoded.push(b'=');
            encoded.extend_from_slice(value.as_bytes());
        }

        Self(encoded.into_boxed_slice())
    }

    /// Wrap pre-derived key bytes.
    ///
    /// Callers own determinism: the same dimension set must always produce
    /// the same bytes.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// The encoded key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
