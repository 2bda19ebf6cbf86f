//! Source text positions and ranges.

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// Position queries used by scope resolution.
pub trait RangeExt {
    /// True when `self` ends at or before `other` starts.
    fn precedes(&self, other: TextRange) -> bool;

    /// True when `offset` lies inside `self` (end inclusive, so a cursor
    /// right after an identifier still hits it).
    fn covers(&self, offset: TextSize) -> bool;
}

impl RangeExt for TextRange {
    #[inline]
    fn precedes(&self, other: TextRange) -> bool {
        self.end() <= other.start()
    }

    #[inline]
    fn covers(&self, offset: TextSize) -> bool {
        self.start() <= offset && offset <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn test_precedes() {
        assert!(range(0, 4).precedes(range(4, 9)));
        assert!(range(0, 4).precedes(range(10, 12)));
        assert!(!range(0, 5).precedes(range(4, 9)));
        // A declaration never precedes a reference nested inside it.
        assert!(!range(0, 10).precedes(range(3, 4)));
    }

    #[test]
    fn test_covers_is_end_inclusive() {
        let r = range(2, 6);
        assert!(r.covers(TextSize::from(2)));
        assert!(r.covers(TextSize::from(6)));
        assert!(!r.covers(TextSize::from(7)));
        assert!(!r.covers(TextSize::from(1)));
    }
}
