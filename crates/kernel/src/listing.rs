//! Listing query assembly.
//!
//! Turns raw listing parameters (search text, category, page, sort, page
//! size) plus the viewer's identity into a [`ContentQuery`] for the content
//! store. Identity is always passed in explicitly; nothing here reads
//! ambient session state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{QueryError, QueryResult};
use crate::pagination::{Page, Pagination, SortSpec, pagination_params, sort_params};
use crate::query::{PredicateBuilder, PredicateTree};

/// Status value that marks content as visible to everyone.
pub const PUBLISHED: &str = "published";

/// Raw listing parameters as they appear in a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingParams {
    /// Free-text search.
    pub q: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Requested page.
    pub page: Option<String>,
    /// Sort field, `-` prefix for descending.
    pub sort: Option<String>,
    /// Requested page size.
    pub limit: Option<String>,
}

impl ListingParams {
    /// Parse a raw query string (`q=tomato&category=5&page=2`).
    ///
    /// A leading `?` is ignored, `+` decodes to a space, and unknown keys
    /// are skipped. A key given twice is rejected.
    pub fn from_query_str(raw: &str) -> QueryResult<Self> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        serde_urlencoded::from_str(raw)
            .map_err(|e| QueryError::InvalidQueryString(format!("'{raw}': {e}")))
    }
}

/// Role claim of the requesting identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    Member,
    Admin,
}

/// Identity and role of whoever the query is built for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Authenticated user id; `None` for anonymous visitors.
    pub user_id: Option<String>,
    pub role: Role,
}

impl Viewer {
    /// Anonymous visitor.
    pub fn guest() -> Self {
        Self::default()
    }

    /// Signed-in member.
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Role::Member,
        }
    }

    /// Administrator; sees unpublished content.
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Query handed to the content-store client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentQuery {
    #[serde(rename = "where")]
    pub filter: PredicateTree,
    #[serde(flatten)]
    pub pagination: Pagination,
    pub sort: SortSpec,
}

/// Client for the external content store that executes listing queries.
pub trait ContentStore {
    /// Document type returned by the store.
    type Item;
    /// Store-specific failure.
    type Error;

    /// Count documents matching `filter`, ignoring pagination.
    fn count(&self, filter: &PredicateTree) -> Result<u64, Self::Error>;

    /// Fetch the documents for one page of `query`.
    fn find(&self, query: &ContentQuery) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Describes how one listing page maps request parameters onto fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    search_field: String,
    category_field: String,
    status_field: Option<String>,
    owner_field: Option<String>,
}

impl ListingQuery {
    /// Listing that searches `search_field` and filters on `category_field`.
    pub fn new(search_field: impl Into<String>, category_field: impl Into<String>) -> Self {
        Self {
            search_field: search_field.into(),
            category_field: category_field.into(),
            status_field: None,
            owner_field: None,
        }
    }

    /// Hide content whose `field` is not `published` from non-admins.
    pub fn with_status_field(mut self, field: impl Into<String>) -> Self {
        self.status_field = Some(field.into());
        self
    }

    /// Let members see their own unpublished content, matched on `field`.
    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = Some(field.into());
        self
    }

    /// Assemble the content query for one request.
    pub fn build(&self, params: &ListingParams, viewer: &Viewer, config: &Config) -> ContentQuery {
        let category = params
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let builder = PredicateBuilder::new()
            .like(&self.search_field, params.q.as_deref())
            .equals(&self.category_field, category);
        let builder = self.restrict_visibility(builder, viewer);

        let requested_limit = params
            .limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok());
        let pagination = pagination_params(
            params.page.as_deref(),
            config.default_page,
            config.clamp_limit(requested_limit),
        );
        let sort = sort_params(params.sort.as_deref(), &config.sort_field, config.sort_order);

        let filter = builder.build();
        debug!(
            page = pagination.page,
            limit = pagination.limit,
            sort = %sort.as_sort_string(),
            conditions = filter.len(),
            role = ?viewer.role,
            "built listing query"
        );

        ContentQuery {
            filter,
            pagination,
            sort,
        }
    }

    /// Build the query for one request and run it against `store`.
    ///
    /// The page is only fetched when the count shows there is something
    /// to fetch.
    pub fn fetch<S: ContentStore>(
        &self,
        store: &S,
        params: &ListingParams,
        viewer: &Viewer,
        config: &Config,
    ) -> Result<Page<S::Item>, S::Error> {
        let query = self.build(params, viewer, config);
        let total = store.count(&query.filter)?;
        if total == 0 {
            return Ok(Page::empty(query.pagination));
        }
        let items = store.find(&query)?;
        debug!(total, returned = items.len(), "fetched listing page");
        Ok(Page::new(items, total, query.pagination))
    }

    fn restrict_visibility(&self, builder: PredicateBuilder, viewer: &Viewer) -> PredicateBuilder {
        let Some(status_field) = self.status_field.as_deref() else {
            return builder;
        };
        if viewer.is_admin() {
            return builder;
        }

        match (self.owner_field.as_deref(), viewer.user_id.as_deref()) {
            (Some(owner_field), Some(user_id)) if viewer.role == Role::Member => builder.or([
                PredicateBuilder::new().equals(status_field, PUBLISHED),
                PredicateBuilder::new().equals(owner_field, user_id),
            ]),
            _ => builder.equals(status_field, PUBLISHED),
        }
    }
}
