/// Row offset for a 1-based page. The normalizer guarantees `page >= 1`,
/// but a zero page still maps to offset 0 rather than underflowing.
pub fn offset(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}

/// Number of pages needed for `total` rows, never less than 1 so UI pagers
/// always have a page to stand on. Pages past the end are not rejected
/// anywhere; they simply come back empty.
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 1;
    }
    total.div_ceil(u64::from(limit)).max(1)
}
