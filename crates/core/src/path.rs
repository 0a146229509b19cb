//! Dotted paths into a statistics document
//!
//! A path is split on `.` with empty fragments discarded, so `a..b` and
//! `.a.b.` both resolve to `a.b`. Classification is purely syntactic: a
//! fragment that parses as a non-negative integer is an index segment, no
//! matter what container actually sits at that position in the document.

use std::fmt;

use crate::error::{Error, Result};
use crate::limits::MAX_PATH_SEGMENTS;

/// One component of a dotted path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key: `totals` in `totals.visits`
    Field(String),
    /// Array index: `0` in `recent.0.name`
    Index(usize),
}

impl Segment {
    /// Classify a raw fragment: integer-like fragments become indexes
    pub fn classify(raw: &str) -> Segment {
        match raw.parse::<usize>() {
            Ok(idx) => Segment::Index(idx),
            Err(_) => Segment::Field(raw.to_string()),
        }
    }

    /// True if this segment addresses an array position
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(key) => write!(f, "{}", key),
            Segment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// Parse a dotted path string into segments
///
/// # Errors
///
/// Returns [`Error::Validation`] when the input is empty, contains only dots,
/// or exceeds [`MAX_PATH_SEGMENTS`].
pub fn parse_path(raw: &str) -> Result<Vec<Segment>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Missing or invalid path"));
    }

    let segments: Vec<Segment> = trimmed
        .split('.')
        .filter(|fragment| !fragment.is_empty())
        .map(Segment::classify)
        .collect();

    if segments.is_empty() {
        return Err(Error::validation("Missing or invalid path"));
    }
    if segments.len() > MAX_PATH_SEGMENTS {
        return Err(Error::validation(format!(
            "path length {} exceeds maximum of {} segments",
            segments.len(),
            MAX_PATH_SEGMENTS
        )));
    }

    Ok(segments)
}
