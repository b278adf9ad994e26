//! Task listing: search, sort and pagination

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::Task;
use crate::page::{paginate, parse_positive, Page};
use crate::timestamp;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 5;
const DEFAULT_SORT: &str = "-createdAt";

/// Raw listing parameters as they arrive in the query string.
///
/// Values are kept as strings so that garbage falls back to defaults instead
/// of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl TaskListQuery {
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SortSpec {
    field: String,
    descending: bool,
}

impl SortSpec {
    fn parse(raw: Option<&str>) -> Self {
        let raw = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SORT);
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: raw.to_string(),
                descending: false,
            },
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = if self.field == "createdAt" {
            a.created_at.cmp(&b.created_at)
        } else {
            sort_text(a, &self.field).cmp(&sort_text(b, &self.field))
        };

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Text a task sorts by for `field`; unknown fields sort as empty.
fn sort_text(task: &Task, field: &str) -> String {
    match field {
        "id" => task.id.to_string(),
        "title" => task.title.clone(),
        "description" => task.description.clone(),
        "updatedAt" => task
            .updated_at
            .as_ref()
            .map(timestamp::format)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Apply search, sort and pagination to a snapshot of the task collection.
pub(crate) fn select(mut tasks: Vec<Task>, query: &TaskListQuery) -> Page<Task> {
    let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive(query.limit.as_deref(), DEFAULT_LIMIT);

    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase);
    if let Some(needle) = needle {
        tasks.retain(|task| matches_search(task, &needle));
    }

    let sort = SortSpec::parse(query.sort.as_deref());
    tasks.sort_by(|a, b| sort.compare(a, b));

    paginate(tasks, page, limit)
}
