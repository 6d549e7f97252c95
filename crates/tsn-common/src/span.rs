//! Span - Source location tracking for IR nodes and diagnostics
//!
//! A span is a byte range into the original surface-language source file.
//! The transpiler never re-reads source text; spans travel with the IR so
//! diagnostics can point back at the front end's files.

use serde::{Deserialize, Serialize};

/// A span of source code, represented as a half-open byte range `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create an empty span at the given position.
    #[inline]
    pub const fn at(pos: u32) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Create a dummy span for synthesised nodes (specialised declarations,
    /// wrapper containers) that have no surface-source counterpart.
    #[inline]
    pub const fn synthetic() -> Self {
        Span {
            start: u32::MAX,
            end: u32::MAX,
        }
    }

    /// Check if this is a synthetic span.
    #[inline]
    pub const fn is_synthetic(&self) -> bool {
        self.start == u32::MAX && self.end == u32::MAX
    }

    /// Width of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        if self.end > self.start {
            self.end - self.start
        } else {
            0
        }
    }

    /// True when the span covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `offset` falls inside the half-open range.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The smallest span covering both `self` and `other`.
    #[inline]
    pub const fn merge(&self, other: Span) -> Span {
        Span {
            start: if other.start < self.start {
                other.start
            } else {
                self.start
            },
            end: if other.end > self.end {
                other.end
            } else {
                self.end
            },
        }
    }
}

impl From<(u32, u32)> for Span {
    fn from((start, end): (u32, u32)) -> Self {
        Span::new(start, end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A trait for IR nodes that carry a source span.
pub trait Spanned {
    /// Get the source span of this element.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
#[path = "tests/span.rs"]
mod tests;
