// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde_json::{json, Value};

/// Query parameters shared by all paginated list endpoints.
///
/// `page` takes precedence over `offset` when both are supplied.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        let page = self.page();
        if page > 1 {
            (page - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Pagination metadata object included in list responses.
    pub fn meta(&self, total: i64) -> Value {
        let total_pages = (total as f64 / self.limit() as f64).ceil() as i64;
        json!({
            "total": total,
            "limit": self.limit(),
            "offset": self.offset(),
            "page": self.page(),
            "total_pages": total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> Pagination {
        Pagination {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 50);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(params(Some(5000), None, None).limit(), 100);
        assert_eq!(params(Some(0), None, None).limit(), 1);
    }

    #[test]
    fn test_page_overrides_offset() {
        let p = params(Some(20), Some(5), Some(3));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_negative_offset_clamped() {
        assert_eq!(params(None, Some(-10), None).offset(), 0);
    }

    #[test]
    fn test_meta_total_pages() {
        let p = params(Some(10), None, None);
        let meta = p.meta(25);
        assert_eq!(meta["total_pages"], 3);
        assert_eq!(meta["total"], 25);
    }
}
