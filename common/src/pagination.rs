//! Page arithmetic for list pages and infinite-scroll loaders.

use log::warn;
use std::fmt;

/// The `start–end / total` indicator shown above every table.
///
/// Built from the requested [`Paging`] by [`Paging::range`]: `start` is the
/// zero-based row offset `(page - 1) * size`, `end` is `min(offset + size,
/// total)`. Response envelopes are not consulted because the bulk reports
/// echo the page number in their `offset` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl PageRange {
    pub fn new(offset: u64, page_size: u64, total: u64) -> Self {
        Self {
            start: offset,
            end: offset.saturating_add(page_size).min(total),
            total,
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{} / {}", self.start, self.end, self.total)
    }
}

/// 1-based page number and page size as sent in the `p`/`l` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
}

impl Paging {
    /// Both values are clamped to at least one.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }

    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// Zero-based offset of the first row of this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    pub fn range(&self, total: u64) -> PageRange {
        PageRange::new(self.offset(), u64::from(self.size), total)
    }

    pub fn page_count(&self, total: u64) -> u32 {
        page_count(total, self.size)
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page < self.page_count(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.size)
    }

    /// A new page size restarts at the first page.
    pub fn with_size(self, size: u32) -> Self {
        Self::new(1, size)
    }
}

/// Number of pages needed for `total` rows; an empty set still has one page.
pub fn page_count(total: u64, size: u32) -> u32 {
    let size = u64::from(size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Guards an infinite-scroll list against duplicate and stale page fetches.
///
/// Call [`PageLoader::begin`] when the list scrolls near its end; it hands out
/// the next page number only when no fetch is in flight and more rows exist.
/// Pass the response to [`PageLoader::complete`] with the page it was issued
/// for; a response for any other page is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoader {
    page_size: u32,
    next_page: u32,
    pending: Option<u32>,
    loaded: u64,
    total: Option<u64>,
}

impl PageLoader {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            next_page: 1,
            pending: None,
            loaded: 0,
            total: None,
        }
    }

    /// Reserves the next page to fetch, or `None` when a fetch is in flight or
    /// every row is loaded.
    pub fn begin(&mut self) -> Option<Paging> {
        if self.pending.is_some() || self.is_exhausted() {
            return None;
        }
        self.pending = Some(self.next_page);
        Some(Paging::new(self.next_page, self.page_size))
    }

    /// Records a page response. Returns `false` when the response was not for
    /// the page in flight and must be dropped.
    pub fn complete(&mut self, page: u32, received: usize, total: u64) -> bool {
        if self.pending != Some(page) {
            warn!(
                "discarding page {page}; expected {:?}",
                self.pending
            );
            return false;
        }
        self.pending = None;
        self.next_page = page + 1;
        self.loaded += received as u64;
        self.total = Some(total);
        if received == 0 {
            // Guard against a total that overstates the rows actually served.
            self.total = Some(self.loaded);
        }
        true
    }

    /// Records a page of an endpoint that reports no usable total. The set
    /// ends with the first page that is not full.
    pub fn complete_open_ended(&mut self, page: u32, received: usize) -> bool {
        let full = received >= self.page_size as usize;
        if !self.complete(page, received, 0) {
            return false;
        }
        self.total = if full { None } else { Some(self.loaded) };
        true
    }

    /// Releases the in-flight reservation after a failed fetch so it can be
    /// retried by the next scroll.
    pub fn fail(&mut self, page: u32) {
        if self.pending == Some(page) {
            self.pending = None;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.total.is_some_and(|total| self.loaded >= total)
    }

    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 20, 45, 0, 20)]
    #[case(20, 20, 45, 20, 40)]
    #[case(40, 20, 45, 40, 45)]
    #[case(0, 20, 0, 0, 0)]
    #[case(0, 50, 7, 0, 7)]
    fn range_follows_offset_and_total(
        #[case] offset: u64,
        #[case] page_size: u64,
        #[case] total: u64,
        #[case] start: u64,
        #[case] end: u64,
    ) {
        let range = PageRange::new(offset, page_size, total);
        assert_eq!((range.start, range.end, range.total), (start, end, total));
    }

    #[test]
    fn range_comes_from_the_requested_page() {
        // Bulk reports answer page 3 with `offset: 3`; the indicator still
        // shows rows 40 to 45.
        assert_eq!(Paging::new(3, 20).range(45).to_string(), "40–45 / 45");
    }

    #[test]
    fn range_renders_indicator() {
        assert_eq!(PageRange::new(20, 20, 45).to_string(), "20–40 / 45");
    }

    #[test]
    fn paging_offsets_and_counts() {
        let paging = Paging::new(3, 20);

        assert_eq!(paging.offset(), 40);
        assert_eq!(paging.range(45), PageRange::new(40, 20, 45));
        assert_eq!(paging.page_count(45), 3);
        assert!(!paging.has_next(45));
        assert!(paging.has_previous());
        assert_eq!(paging.with_size(50), Paging::new(1, 50));
        assert_eq!(Paging::new(0, 0), Paging::new(1, 1));
        assert_eq!(page_count(0, 20), 1);
    }

    #[test]
    fn loader_never_issues_a_second_fetch_while_pending() {
        let mut loader = PageLoader::new(5);

        let first = loader.begin().unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(loader.begin(), None);

        assert!(loader.complete(1, 5, 12));
        assert_eq!(loader.begin().map(|p| p.page), Some(2));
    }

    #[test]
    fn loader_discards_responses_for_other_pages() {
        let mut loader = PageLoader::new(5);
        loader.begin();

        assert!(!loader.complete(2, 5, 12));
        assert!(loader.is_pending());
        assert_eq!(loader.loaded(), 0);
    }

    #[test]
    fn loader_stops_once_everything_is_loaded() {
        let mut loader = PageLoader::new(5);
        loader.begin();
        loader.complete(1, 5, 7);
        loader.begin();
        loader.complete(2, 2, 7);

        assert!(loader.is_exhausted());
        assert_eq!(loader.begin(), None);
    }

    #[test]
    fn loader_treats_an_empty_page_as_the_end() {
        let mut loader = PageLoader::new(5);
        loader.begin();
        loader.complete(1, 5, 20);
        loader.begin();
        loader.complete(2, 0, 20);

        assert!(loader.is_exhausted());
    }

    #[test]
    fn open_ended_loader_stops_at_first_short_page() {
        let mut loader = PageLoader::new(3);
        loader.begin();
        assert!(loader.complete_open_ended(1, 3));
        assert!(!loader.is_exhausted());

        loader.begin();
        assert!(loader.complete_open_ended(2, 1));
        assert!(loader.is_exhausted());
        assert_eq!(loader.loaded(), 4);
    }

    #[test]
    fn failed_fetch_can_be_retried() {
        let mut loader = PageLoader::new(5);
        let paging = loader.begin().unwrap();
        loader.fail(paging.page);

        assert_eq!(loader.begin().map(|p| p.page), Some(1));
    }
}
