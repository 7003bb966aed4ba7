// crates/quill-core/src/pagination.rs
//
// Page-number pagination over an already-ordered sequence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{ObjectReader, Schema, ValidationError};

/// Page used when the caller omits `page`.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the caller omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Largest accepted `pageSize`.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validated pagination parameters. Always satisfies `page >= 1` and
/// `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Half-open index range `[start, end)` covered by this page.
    pub fn bounds(&self) -> (u64, u64) {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        (start, start.saturating_add(self.page_size))
    }

    /// Cut one page out of `items`.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let (start, end) = self.bounds();
        let data: Vec<T> = items
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(self.page_size as usize)
            .collect();

        Page {
            data,
            page: self.page,
            page_size: self.page_size,
            total,
            has_more: end < total,
        }
    }
}

impl Schema for Pagination {
    /// A `null` input means "no parameters" and yields the defaults.
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        if raw.is_null() {
            return Ok(Self::default());
        }

        let mut reader = ObjectReader::new(raw);
        let page = reader.optional_positive_int("page", None);
        let page_size = reader.optional_positive_int("pageSize", Some(MAX_PAGE_SIZE));
        let violations = reader.finish();

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }
        Ok(Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    /// Number of items across all pages.
    pub total: u64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object_and_null() {
        assert_eq!(Pagination::decode(&json!({})).unwrap(), Pagination::default());
        assert_eq!(Pagination::decode(&Value::Null).unwrap(), Pagination::default());
        assert_eq!(Pagination::default().page, 1);
        assert_eq!(Pagination::default().page_size, 10);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = Pagination::decode(&json!({ "page": 0, "pageSize": 101 })).unwrap_err();
        assert!(err.has_violation("page"));
        assert!(err.has_violation("pageSize"));
        assert_eq!(err.violations.len(), 2);

        assert!(Pagination::decode(&json!({ "pageSize": 100 })).is_ok());
        let err = Pagination::decode(&json!({ "page": 1e20 })).unwrap_err();
        assert!(err.has_violation("page"));
        assert!(Pagination::decode(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_apply_matches_length_formula() {
        for n in 0u64..=25 {
            for page in 1u64..=5 {
                for page_size in [1u64, 3, 10] {
                    let items: Vec<u64> = (0..n).collect();
                    let p = Pagination { page, page_size };
                    let result = p.apply(items);

                    let skipped = (page - 1) * page_size;
                    let expected_len = page_size.min(n.saturating_sub(skipped));
                    assert_eq!(result.data.len() as u64, expected_len);
                    assert_eq!(result.total, n);
                    assert_eq!(result.has_more, page * page_size < n);
                    if expected_len > 0 {
                        assert_eq!(result.data[0], skipped);
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_error() {
        let p = Pagination {
            page: 50,
            page_size: 10,
        };
        let result = p.apply(vec![1, 2, 3]);
        assert!(result.data.is_empty());
        assert_eq!(result.total, 3);
        assert!(!result.has_more);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = Pagination {
            page: u64::MAX,
            page_size: 100,
        };
        let result = p.apply(vec![1, 2, 3]);
        assert!(result.data.is_empty());
        assert!(!result.has_more);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Pagination::default().apply(Vec::<u8>::new());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            json!({ "data": [], "page": 1, "pageSize": 10, "total": 0, "hasMore": false })
        );
    }
}
