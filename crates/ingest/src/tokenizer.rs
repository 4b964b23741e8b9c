//! FieldIter - lazy field splitter for one frame
//!
//! Single forward pass over a byte view with one cursor: each call yields
//! the next separator-delimited token as a borrowed slice. A field that
//! opens with the quote byte runs to the next quote byte instead, so a
//! quoted value may contain separators. Quotes are kept in the token and
//! are not escapable - a quote inside a quoted field ends it early, which
//! is a wire-format limitation, not something to paper over here.

/// Default field/record separator on the wire.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Default quote byte.
pub const DEFAULT_QUOTE: u8 = b'"';

/// Lazy, non-restartable iterator over the fields of one frame.
#[derive(Debug)]
pub struct FieldIter<'a> {
    data: &'a [u8],
    cursor: usize,
    separator: u8,
    quote: u8,
}

impl<'a> FieldIter<'a> {
    /// Iterate over `data` with the given separator and quote bytes.
    pub fn new(data: &'a [u8], separator: u8, quote: u8) -> Self {
        Self {
            data,
            cursor: 0,
            separator,
            quote,
        }
    }

    /// True while another token can be produced.
    pub fn has_next(&self) -> bool {
        self.cursor < self.data.len()
    }

    /// Scan the next token and advance the cursor past it and its trailing
    /// separator, if any.
    fn scan(&mut self) -> &'a [u8] {
        let start = self.cursor;

        let end = if self.data[start] == self.quote {
            // quoted field: runs to the next quote, inclusive; an
            // unterminated quote extends to the end of the frame
            match memchr(self.quote, &self.data[start + 1..]) {
                Some(i) => start + 1 + i + 1,
                None => self.data.len(),
            }
        } else {
            match memchr(self.separator, &self.data[start..]) {
                Some(i) => start + i,
                None => self.data.len(),
            }
        };

        let token = &self.data[start..end];
        self.cursor = if end < self.data.len() && self.data[end] == self.separator {
            end + 1
        } else {
            end
        };
        token
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(self.scan())
    }
}

fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Offset of the last occurrence of `needle`, used by the read loop to
/// find the trusted frame boundary in buffered data.
pub(crate) fn memrchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().rposition(|&b| b == needle)
}

#[cfg(test)]
#[path = "tokenizer_test.rs"]
mod tokenizer_test;
