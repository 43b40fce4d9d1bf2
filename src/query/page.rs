//! Pagination defaulting.

use serde::{Deserialize, Serialize};

/// Default page size when the request does not paginate explicitly.
/// A policy choice, not a hard cap.
pub const DEFAULT_PER_PAGE: u64 = 1000;

/// A resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

/// Resolve pagination parameters: both present -> as given, otherwise
/// page 1 with the default page size.
pub fn resolve_pagination(page: Option<u64>, per_page: Option<u64>) -> Page {
    match (page, per_page) {
        (Some(page), Some(per_page)) => Page { page, per_page },
        _ => Page {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let page = resolve_pagination(None, None);
        assert_eq!(page, Page { page: 1, per_page: 1000 });
    }

    #[test]
    fn test_both_present_used_as_given() {
        let page = resolve_pagination(Some(2), Some(5));
        assert_eq!(page, Page { page: 2, per_page: 5 });
    }

    #[test]
    fn test_partial_params_fall_back_to_defaults() {
        assert_eq!(resolve_pagination(Some(2), None).per_page, 1000);
        assert_eq!(resolve_pagination(None, Some(5)).page, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(resolve_pagination(Some(1), Some(10)).offset(), 0);
        assert_eq!(resolve_pagination(Some(3), Some(10)).offset(), 20);
        assert_eq!(resolve_pagination(Some(0), Some(10)).offset(), 0);
    }
}
