//! Page arithmetic for the count-then-paginate protocol.
//!
//! The observations endpoint has no cursor mode and rejects page indexes past
//! the end of the result set, so the number of pages is fixed from a probed
//! total before the first data page is requested.

/// Number of pages to request for `total_results` matching observations.
///
/// Up to the cap, enough pages to cover every result (at least one, so an
/// empty result set still costs one request). Above the cap, a fixed number of
/// pages that depends only on the cap.
///
/// `page_size` must be non-zero; [`crate::config::FetchConfig::validate`]
/// guarantees it for fetchers.
pub fn page_count(total_results: u64, max_records: u64, page_size: u64) -> u64 {
    if total_results <= max_records {
        total_results.div_ceil(page_size).max(1)
    } else {
        max_records.div_ceil(page_size)
    }
}

/// The request plan derived from a count probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub total_results: u64,
    pub pages: u64,
    pub page_size: u64,
}

impl PagePlan {
    pub fn new(total_results: u64, max_records: u64, page_size: u64) -> Self {
        PagePlan {
            total_results,
            pages: page_count(total_results, max_records, page_size),
            page_size,
        }
    }

    /// Records the plan yields if the API returns full pages.
    pub fn expected_records(&self) -> u64 {
        self.total_results.min(self.pages * self.page_size)
    }

    /// 1-based page indexes in request order.
    pub fn page_indexes(&self) -> std::ops::RangeInclusive<u64> {
        1..=self.pages
    }
}
