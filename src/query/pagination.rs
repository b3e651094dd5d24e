use serde::Serialize;

/// Page size of the two listing endpoints
pub const LIST_PAGE_SIZE: u64 = 50;

/// Largest offset a store accepts; MongoDB encodes `skip` as a signed 64-bit integer
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// The slice of matching records a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Window for a 1-based `page` of `size` records.
    ///
    /// A missing or zero `size` falls back to `default_size`; a missing or
    /// zero `page` starts at the first record. The offset never exceeds
    /// [`MAX_OFFSET`].
    pub fn with_default(page: Option<u64>, size: Option<u64>, default_size: u64) -> Self {
        let limit = size.filter(|size| *size > 0).unwrap_or(default_size);
        let offset = match page {
            Some(page) if page > 0 => (page - 1).saturating_mul(limit).min(MAX_OFFSET),
            _ => 0,
        };

        Self { limit, offset }
    }

    /// Shrink the window to at most `max` records; `None` leaves it unbounded.
    ///
    /// The offset is recomputed so that page N of the capped size is returned,
    /// rather than a window straddling two pages.
    pub fn capped(self, page: Option<u64>, max: Option<u64>) -> Self {
        match max {
            Some(max) if self.limit > max => Self::with_default(page, Some(max), max),
            _ => self,
        }
    }
}

/// Listing summary returned next to each page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(total_items: u64, limit: u64, current_page: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit)
        };

        Self {
            total_items,
            total_pages,
            current_page,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}
