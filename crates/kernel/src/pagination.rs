//! Pagination and sort normalization.
//!
//! Raw request parameters arrive as optional, possibly garbage strings.
//! These helpers turn them into bounded values and never fail: anything
//! unusable falls back to the caller's defaults.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Default sort field when a request does not supply one.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Raw page parameter as received from a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageParam<'a> {
    /// Parameter not supplied.
    Absent,
    /// Query-string text, parsed leniently.
    Text(&'a str),
    /// Already-numeric input.
    Number(f64),
}

impl PageParam<'_> {
    /// Numeric value of the parameter, if it parses at all.
    fn coerce(self) -> Option<f64> {
        match self {
            PageParam::Absent => None,
            PageParam::Text(text) => text.trim().parse().ok(),
            PageParam::Number(n) => Some(n),
        }
    }
}

impl<'a> From<&'a str> for PageParam<'a> {
    fn from(text: &'a str) -> Self {
        PageParam::Text(text)
    }
}

impl<'a> From<&'a String> for PageParam<'a> {
    fn from(text: &'a String) -> Self {
        PageParam::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for PageParam<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(PageParam::Absent, PageParam::Text)
    }
}

impl From<i64> for PageParam<'_> {
    fn from(n: i64) -> Self {
        PageParam::Number(n as f64)
    }
}

impl From<u32> for PageParam<'_> {
    fn from(n: u32) -> Self {
        PageParam::Number(f64::from(n))
    }
}

impl From<f64> for PageParam<'_> {
    fn from(n: f64) -> Self {
        PageParam::Number(n)
    }
}

impl From<Option<i64>> for PageParam<'_> {
    fn from(n: Option<i64>) -> Self {
        n.map_or(PageParam::Absent, Into::into)
    }
}

/// Page number and page size for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl Pagination {
    /// Number of items to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Normalize a raw page parameter.
///
/// A numeric value (text is trimmed and parsed) whose integer part is at
/// least 1 becomes the page; absent, non-numeric, non-finite, zero, and
/// negative input fall back to `default_page`. `limit` is passed through
/// unchanged.
pub fn pagination_params<'a>(
    page: impl Into<PageParam<'a>>,
    default_page: u32,
    limit: u32,
) -> Pagination {
    let page = page
        .into()
        .coerce()
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map_or(default_page, |n| n.min(f64::from(u32::MAX)) as u32);

    Pagination { page, limit }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Numeric form used by the content store: `1` ascending, `-1` descending.
    pub fn as_i8(self) -> i8 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }

    /// Parse `asc`/`ascending`/`desc`/`descending`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort on a single field. Serializes as `{ "<field>": 1 | -1 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// String form accepted by stores that take `-field` for descending.
    pub fn as_sort_string(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.direction.as_i8())?;
        map.end()
    }
}

/// Normalize a raw sort parameter.
///
/// A leading `-` means descending on the rest of the string; no prefix means
/// ascending. Absent or blank input, or a bare `-`, yields the defaults.
pub fn sort_params(
    sort: Option<&str>,
    default_field: &str,
    default_order: SortDirection,
) -> SortSpec {
    let fallback = || SortSpec::new(default_field, default_order);

    let Some(raw) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback();
    };

    match raw.strip_prefix('-') {
        Some("") => fallback(),
        Some(field) => SortSpec::new(field, SortDirection::Desc),
        None => SortSpec::new(raw, SortDirection::Asc),
    }
}

/// One page of results returned by the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,

    /// Total count (before paging).
    pub total: u64,

    /// Current page number (1-indexed).
    pub page: u32,

    /// Items per page.
    pub limit: u32,

    /// Total number of pages.
    pub total_pages: u32,

    /// Whether there's a next page.
    pub has_next: bool,

    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Create a page with paging calculations.
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let Pagination { page, limit } = pagination;
        // A zero limit means everything on one page.
        let total_pages = match (total, limit) {
            (0, _) => 0,
            (_, 0) => 1,
            (total, limit) => {
                u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
            }
        };

        Self {
            items,
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total > 0,
        }
    }

    /// Create an empty page.
    pub fn empty(pagination: Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }
}
