//! Pagination descriptors for advanced list responses.

use serde::{Deserialize, Serialize};

/// A page reference: which page and how large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

/// Links to the neighbouring pages of a result set.
///
/// Absent links are omitted from the serialized form, never `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The following page, if any documents remain after this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,

    /// The preceding page, if this page does not start at the first document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    /// Computes the neighbouring pages.
    ///
    /// `next` is present iff `end_index < total`; `prev` iff `start_index > 0`.
    pub fn paginate(page: u64, limit: u64, start_index: u64, end_index: u64, total: u64) -> Self {
        let next = (end_index < total).then(|| PageLink {
            page: page.saturating_add(1),
            limit,
        });
        let prev = (start_index > 0).then(|| PageLink {
            page: page.saturating_sub(1),
            limit,
        });
        Self { next, prev }
    }

    /// Returns true if there is a following page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns true if there is a preceding page.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_middle_page() {
        let p = Pagination::paginate(2, 10, 10, 20, 25);
        assert_eq!(p.next, Some(PageLink { page: 3, limit: 10 }));
        assert_eq!(p.prev, Some(PageLink { page: 1, limit: 10 }));
    }

    #[test]
    fn test_single_page() {
        let p = Pagination::paginate(1, 100, 0, 100, 7);
        assert!(!p.has_next());
        assert!(!p.has_prev());
        assert_eq!(serde_json::to_value(p).unwrap(), json!({}));
    }

    #[test]
    fn test_exact_boundary_has_no_next() {
        let p = Pagination::paginate(2, 10, 10, 20, 20);
        assert!(!p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_serialize_omits_missing_link() {
        let p = Pagination::paginate(1, 5, 0, 5, 12);
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            json!({"next": {"page": 2, "limit": 5}})
        );
    }

    proptest! {
        #[test]
        fn next_present_iff_more_remain(page in 1u64..1000, limit in 1u64..1000, total in 0u64..1_000_000) {
            let p = Pagination::paginate(page, limit, (page - 1) * limit, page * limit, total);
            prop_assert_eq!(p.has_next(), total > page * limit);
            if let Some(next) = p.next {
                prop_assert_eq!(next.page, page + 1);
                prop_assert_eq!(next.limit, limit);
            }
        }

        #[test]
        fn prev_present_iff_past_first_page(page in 1u64..1000, limit in 1u64..1000, total in 0u64..1_000_000) {
            let p = Pagination::paginate(page, limit, (page - 1) * limit, page * limit, total);
            prop_assert_eq!(p.has_prev(), page > 1);
            if let Some(prev) = p.prev {
                prop_assert_eq!(prev.page, page - 1);
            }
        }
    }
}
