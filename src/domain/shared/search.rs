// src/domain/shared/search.rs
//
// The query contract every searchable repository honours: page, per_page,
// sort, sort_dir and an aggregate-specific filter in; a page of items plus
// pagination metadata out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `desc` (case-insensitive) reads as ascending
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Normalized search input. Invalid page/per_page values fall back to the
/// defaults instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams<F> {
    page: usize,
    per_page: usize,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F> Default for SearchParams<F> {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

impl<F> SearchParams<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = if page == 0 { DEFAULT_PAGE } else { page };
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        self
    }

    /// Blank sort fields are treated as absent
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        let sort = sort.into();
        self.sort = if sort.trim().is_empty() { None } else { Some(sort) };
        self
    }

    pub fn with_sort_dir(mut self, sort_dir: SortDirection) -> Self {
        self.sort_dir = Some(sort_dir);
        self
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_optional_filter(mut self, filter: Option<F>) -> Self {
        self.filter = filter;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// `None` when no sort field is set; ascending when a field is set
    /// without an explicit direction
    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort.as_ref()?;
        Some(self.sort_dir.unwrap_or_default())
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub current_page: usize,
    pub per_page: usize,
    pub last_page: usize,
}

impl<T> SearchResult<T> {
    pub fn new(items: Vec<T>, total: usize, current_page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        Self {
            items,
            total,
            current_page,
            per_page,
            last_page: total.div_ceil(per_page).max(1),
        }
    }

    pub fn map_items<U, M>(self, f: M) -> SearchResult<U>
    where
        M: FnMut(T) -> U,
    {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

/// A comparable value an aggregate exposes for one of its sortable fields
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Implemented by aggregates that can be searched by the in-memory engine
pub trait Searchable {
    type Filter;

    /// Fields a caller may sort by; any other field means "no sort"
    const SORTABLE_FIELDS: &'static [&'static str];

    fn sort_value(&self, field: &str) -> Option<SortValue>;

    /// True when the aggregate satisfies every dimension of the filter
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Sort applied when the caller does not ask for one
    fn default_sort() -> Option<(&'static str, SortDirection)> {
        None
    }
}

/// Case folding behind every name/title filter. SQLite connections register
/// it as `fold_case` so persisted searches fold exactly the same way.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive "contains" used by the name/title filters
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}
