//! Character offsets into source documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive character offset range in a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharOffsetSpan {
    pub start: usize,
    pub end: usize,
}

impl CharOffsetSpan {
    /// Create a span; reversed offsets are put back in order
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, other: &CharOffsetSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for CharOffsetSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A string together with the span it was taken from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KbpString {
    pub text: String,
    pub span: CharOffsetSpan,
}

impl KbpString {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            span: CharOffsetSpan::new(start, end),
        }
    }
}

impl fmt::Display for KbpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.text, self.span)
    }
}
