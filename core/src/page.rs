//! Pagination shared by the task and audit-log listings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

/// Parse a 1-based page number or page size from a raw query value.
///
/// Missing, non-numeric and zero values fall back to `default`.
pub fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    raw.map(str::trim)
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}

/// Slice one page out of an already filtered and ordered collection.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let data = items.into_iter().skip(start).take(limit).collect();

    Page {
        meta: PageMeta {
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        },
        data,
    }
}
