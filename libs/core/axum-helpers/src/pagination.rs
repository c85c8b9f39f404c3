use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Largest accepted `pageSize`
pub const MAX_PAGE_SIZE: u64 = 1_000;
/// Largest accepted `currentPage`; keeps `skip()` well inside `i64`
pub const MAX_PAGE: u64 = 1_000_000;

/// Page selection sent in request bodies: `{ "pageSize": 20, "currentPage": 1 }`.
///
/// Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    pub page_size: u64,
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub current_page: u64,
}

impl Pagination {
    pub fn new(page_size: u64, current_page: u64) -> Self {
        Self {
            page_size,
            current_page,
        }
    }

    /// Documents to skip
    pub fn skip(&self) -> u64 {
        self.page_size
            .saturating_mul(self.current_page.saturating_sub(1))
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_and_limit() {
        let page = Pagination::new(10, 3);
        assert_eq!(page.skip(), 20);
        assert_eq!(page.limit(), 10);
        assert_eq!(Pagination::new(5, 1).skip(), 0);
    }

    #[test]
    fn test_zero_values_fail_validation() {
        assert!(Pagination::new(0, 1).validate().is_err());
        assert!(Pagination::new(10, 0).validate().is_err());
        assert!(Pagination::new(10, 1).validate().is_ok());
    }

    #[test]
    fn test_oversized_values_fail_validation() {
        assert!(Pagination::new(MAX_PAGE_SIZE, MAX_PAGE).validate().is_ok());
        assert!(Pagination::new(MAX_PAGE_SIZE + 1, 1).validate().is_err());
        assert!(Pagination::new(10, MAX_PAGE + 1).validate().is_err());

        let largest = Pagination::new(MAX_PAGE_SIZE, MAX_PAGE);
        assert!(i64::try_from(largest.skip()).is_ok());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let page: Pagination =
            serde_json::from_str(r#"{"pageSize": 4, "currentPage": 2}"#).unwrap();
        assert_eq!(page, Pagination::new(4, 2));
    }
}
