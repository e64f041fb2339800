//! Path segmentation shared by route registration and lookup.

/// Kind of a single path segment, inferred from its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Matches only identical text
    Static,
    /// `:name`, matches exactly one segment
    Param,
    /// `*name`, matches the rest of the path
    CatchAll,
}

impl SegmentKind {
    pub fn of(segment: &str) -> Self {
        match segment.as_bytes().first() {
            Some(b':') => SegmentKind::Param,
            Some(b'*') => SegmentKind::CatchAll,
            _ => SegmentKind::Static,
        }
    }

    pub fn is_wildcard(self) -> bool {
        !matches!(self, SegmentKind::Static)
    }
}

/// Split a path into its non-empty segments.
///
/// Repeated, leading and trailing slashes are collapsed. Segmentation stops
/// right after the first catch-all segment, so a catch-all is always last.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if SegmentKind::of(item) == SegmentKind::CatchAll {
            break;
        }
    }
    parts
}
