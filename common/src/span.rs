//! Byte-offset spans into a document snapshot.

use std::ops::Range;

use thiserror::Error;

/// Errors produced when constructing spans.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    /// Indicates the begin offset occurs after the end offset.
    #[error("span begins at {begin} but ends at {end}")]
    BeginAfterEnd {
        /// Requested begin offset.
        begin: u32,
        /// Requested end offset.
        end: u32,
    },
}

/// Half-open byte range `[begin, end)` into the text that was linted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    begin: u32,
    end: u32,
}

impl SourceSpan {
    /// Constructs a span from two byte offsets.
    ///
    /// # Examples
    ///
    /// ```
    /// use common::span::SourceSpan;
    ///
    /// let span = SourceSpan::new(8, 19).unwrap();
    /// assert_eq!(span.len(), 11);
    /// assert!(SourceSpan::new(4, 2).is_err());
    /// ```
    pub const fn new(begin: u32, end: u32) -> Result<Self, SpanError> {
        if begin > end {
            return Err(SpanError::BeginAfterEnd { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Returns the inclusive begin offset.
    #[must_use]
    pub const fn begin(self) -> u32 {
        self.begin
    }

    /// Returns the exclusive end offset.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Number of bytes covered by the span.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.begin
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.begin == self.end
    }

    /// Converts the span into a `usize` range suitable for slicing.
    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.begin as usize..self.end as usize
    }

    /// Returns the bytes covered by the span, or `None` when the span does not
    /// fit inside `text`.
    #[must_use]
    pub fn slice(self, text: &[u8]) -> Option<&[u8]> {
        text.get(self.range())
    }
}
