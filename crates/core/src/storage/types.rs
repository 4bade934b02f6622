use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classroom::SheetStatus;

/// Default page number for list endpoints.
pub fn default_page() -> u32 {
    1
}

/// Default page size for list endpoints.
pub fn default_limit() -> u32 {
    10
}

/// Upper bound on page size to keep list responses small.
const MAX_LIMIT: u32 = 100;

/// A pagination request: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Page {
    /// Creates a page request, clamping out-of-range values.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(default_page(), default_limit())
    }
}

/// One page of results together with the unpaginated total.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// The pagination envelope returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl Pagination {
    /// Builds the envelope for a page request and total count.
    pub fn new(total: u64, page: Page) -> Self {
        Self {
            total,
            page: page.page,
            limit: page.limit,
            pages: total.div_ceil(page.limit as u64),
        }
    }
}

/// Filter for listing a teacher's answer sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetFilter {
    pub teacher_id: Uuid,
    pub status: Option<SheetStatus>,
}

/// Filter for listing performance records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PerformanceFilter {
    pub student_id: Option<Uuid>,
    pub subject: Option<String>,
}
