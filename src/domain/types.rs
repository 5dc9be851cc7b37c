// ==========================================
// spooltrack - shared value types
// ==========================================
// Filter, pagination and dashboard rollup types.
// ==========================================

use serde::{Deserialize, Serialize};

/// Default page size for spool listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Upper bound on page size, so a single request cannot pull the whole table.
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Fixed low-stock threshold in grams.
pub const LOW_STOCK_THRESHOLD_G: f64 = 300.0;

// ==========================================
// SpoolFilter - listing criteria
// ==========================================

/// Filter criteria for listing spools.
///
/// All provided filters AND together. `search` is itself an OR across
/// brand / material / color name (case-insensitive substring match).
///
/// Out-of-range paging values are clamped, not rejected: `page < 1` becomes 1,
/// `limit` is clamped into `1..=MAX_PAGE_LIMIT` with 0 meaning the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoolFilter {
    pub material: Option<String>,
    pub opened: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SpoolFilter {
    /// Effective page number (1-based).
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped.
    pub fn limit(&self) -> u32 {
        match self.limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(l) => l.min(MAX_PAGE_LIMIT),
        }
    }

    /// Row offset for the effective page.
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.limit()
    }
}

// ==========================================
// Pagination envelope
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit as u64 - 1) / limit as u64,
        }
    }
}

/// One page of results plus its pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

// ==========================================
// Dashboard rollups
// ==========================================

/// Fleet-wide counters for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_spools: u64,
    pub total_printers: u64,
    pub total_nozzles: u64,
    pub total_models: u64,
    /// Spools with remaining weight below LOW_STOCK_THRESHOLD_G.
    pub low_stock_spools: u64,
    pub unopened_spools: u64,
}

/// Per-material rollup over the current spool set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRollup {
    pub material: String,
    pub count: u64,
    /// Remaining weight of the group, in kilograms.
    pub total_weight: f64,
    /// Pro-rated residual value: sum of price * remaining/total per spool.
    pub total_value: f64,
    /// Distinct color hex values seen in the group, in first-seen order.
    pub colors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_clamping() {
        let f = SpoolFilter {
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(f.page(), 1);
        assert_eq!(f.limit(), DEFAULT_PAGE_LIMIT);

        let f = SpoolFilter {
            page: Some(3),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(f.limit(), MAX_PAGE_LIMIT);
        assert_eq!(f.offset(), 2 * MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(0, 1, 50).total_pages, 0);
        assert_eq!(Pagination::new(50, 1, 50).total_pages, 1);
        assert_eq!(Pagination::new(51, 1, 50).total_pages, 2);
    }
}
