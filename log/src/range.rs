//! Pagination over the retained window.
//!
//! Callers address reads by absolute offset, but the backing list is indexed
//! from its oldest retained element. [`resolve`] translates between the two
//! and drops the part of a request that falls outside the window.

use std::ops::Range;

use crate::model::{Offset, PageRequest};

/// The offsets currently held by the store: `[start, end)`.
///
/// `end` is the next offset to be assigned; `start` is the offset of the
/// oldest retained entry. The window is empty when `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainedWindow {
    pub start: Offset,
    pub end: Offset,
}

impl RetainedWindow {
    /// Builds the window from the next offset and the retained count.
    pub(crate) fn from_tail(next_offset: Offset, retained: u64) -> Self {
        Self {
            start: next_offset.saturating_sub(retained),
            end: next_offset,
        }
    }

    /// Number of retained entries.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Resolves a page request to the list-index range to fetch.
///
/// Returns `None` when `[offset, offset + limit)` does not intersect the
/// window. Offsets already evicted are silently skipped; the result never
/// holds more than `limit` indices.
pub(crate) fn resolve(request: &PageRequest, window: &RetainedWindow) -> Option<Range<u64>> {
    let requested_end = request.offset().saturating_add(request.limit());
    let start = request.offset().max(window.start);
    let end = requested_end.min(window.end);
    if start >= end {
        return None;
    }
    Some(start - window.start..end - window.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: u64, limit: u64) -> PageRequest {
        PageRequest::new(offset, limit).unwrap()
    }

    fn window(start: u64, end: u64) -> RetainedWindow {
        RetainedWindow { start, end }
    }

    #[test]
    fn should_resolve_request_inside_window() {
        assert_eq!(resolve(&page(0, 10), &window(0, 3)), Some(0..3));
        assert_eq!(resolve(&page(1, 1), &window(0, 3)), Some(1..2));
    }

    #[test]
    fn should_return_none_at_or_after_next_offset() {
        assert_eq!(resolve(&page(3, 5), &window(0, 3)), None);
        assert_eq!(resolve(&page(5, 5), &window(0, 3)), None);
    }

    #[test]
    fn should_skip_evicted_offsets() {
        // given - offsets 0..5 evicted, 5..10 retained
        let window = window(5, 10);

        // when
        let range = resolve(&page(2, 5), &window);

        // then - only offsets 5 and 6 remain, at indices 0 and 1
        assert_eq!(range, Some(0..2));
    }

    #[test]
    fn should_return_none_when_request_ends_before_window() {
        assert_eq!(resolve(&page(0, 5), &window(5, 10)), None);
    }

    #[test]
    fn should_translate_absolute_offsets_to_indices() {
        assert_eq!(resolve(&page(7, 2), &window(5, 10)), Some(2..4));
    }

    #[test]
    fn should_cap_large_limit_at_window_end() {
        assert_eq!(resolve(&page(6, u64::MAX), &window(5, 10)), Some(1..5));
    }

    #[test]
    fn should_return_none_for_empty_window() {
        assert_eq!(resolve(&page(0, 10), &window(0, 0)), None);
    }

    #[test]
    fn should_build_window_from_tail() {
        assert_eq!(RetainedWindow::from_tail(3, 3), window(0, 3));
        assert_eq!(RetainedWindow::from_tail(1500, 1024), window(476, 1500));
        assert_eq!(RetainedWindow::from_tail(1500, 1024).len(), 1024);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn should_stay_within_window_and_limit(
                start in 0u64..10_000,
                len in 0u64..2_048,
                offset in 0u64..20_000,
                limit in 1u64..4_096,
            ) {
                let window = RetainedWindow { start, end: start + len };
                let request = PageRequest::new(offset, limit).unwrap();

                if let Some(range) = resolve(&request, &window) {
                    prop_assert!(range.start < range.end);
                    prop_assert!(range.end <= window.len());
                    prop_assert!(range.end - range.start <= limit);
                    prop_assert!(window.start + range.start >= offset);
                }
            }
        }
    }
}
