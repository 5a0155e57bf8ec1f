#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Listing pipeline integration tests.
//!
//! Raw request input → normalized pagination/sort → predicate tree →
//! content-store query, the way a page handler drives it.

use pasar_kernel::pagination::DEFAULT_SORT_FIELD;
use pasar_kernel::{
    Config, ListingParams, ListingQuery, Page, PageParam, Pagination, PredicateBuilder,
    SortDirection, SortSpec, Viewer, pagination_params, sort_params,
};
use serde_json::json;

// -------------------------------------------------------------------------
// Normalizer
// -------------------------------------------------------------------------

#[test]
fn pagination_fallbacks() {
    assert_eq!(
        pagination_params(PageParam::Absent, 1, 10),
        Pagination { page: 1, limit: 10 }
    );
    assert_eq!(pagination_params("abc", 1, 10), Pagination { page: 1, limit: 10 });
    assert_eq!(pagination_params("3", 1, 10), Pagination { page: 3, limit: 10 });
    assert_eq!(pagination_params("-5", 1, 10), Pagination { page: 1, limit: 10 });
}

#[test]
fn sort_mapping_is_fixed() {
    assert_eq!(
        sort_params(Some("-createdAt"), DEFAULT_SORT_FIELD, SortDirection::Asc),
        SortSpec::new("createdAt", SortDirection::Desc)
    );
    assert_eq!(
        serde_json::to_value(sort_params(Some("name"), DEFAULT_SORT_FIELD, SortDirection::Desc))
            .unwrap(),
        json!({ "name": 1 })
    );
    assert_eq!(
        serde_json::to_value(sort_params(None, DEFAULT_SORT_FIELD, SortDirection::Desc)).unwrap(),
        json!({ "createdAt": -1 })
    );
    assert_eq!(
        serde_json::to_value(sort_params(None, DEFAULT_SORT_FIELD, SortDirection::Asc)).unwrap(),
        json!({ "createdAt": 1 })
    );
}

// -------------------------------------------------------------------------
// End to end
// -------------------------------------------------------------------------

#[test]
fn search_page_by_hand() {
    let search = Some("tomato");
    let category = Some("5");
    let raw_page = Some("2");

    let pagination = pagination_params(raw_page, 1, 12);
    let tree = PredicateBuilder::new()
        .like("name", search)
        .equals("category", category)
        .build();

    assert_eq!(
        tree.to_json(),
        json!({ "name": { "like": "tomato" }, "category": { "equals": "5" } })
    );
    assert_eq!(pagination, Pagination { page: 2, limit: 12 });
}

#[test]
fn search_page_from_query_string() {
    let params = ListingParams::from_query_str("q=tomato&category=5&page=2").unwrap();
    let query = ListingQuery::new("name", "category").build(
        &params,
        &Viewer::guest(),
        &Config::default(),
    );

    assert_eq!(
        query.filter.to_json(),
        json!({ "name": { "like": "tomato" }, "category": { "equals": "5" } })
    );
    assert_eq!(query.pagination, Pagination { page: 2, limit: 10 });
    assert_eq!(query.sort, SortSpec::new("createdAt", SortDirection::Desc));
}

#[test]
fn garbage_input_still_builds() {
    let params =
        ListingParams::from_query_str("q=&category=&page=-1&sort=-&limit=lots&junk").unwrap();
    let query = ListingQuery::new("name", "category")
        .with_status_field("_status")
        .build(&params, &Viewer::guest(), &Config::default());

    assert_eq!(
        serde_json::to_value(&query).unwrap(),
        json!({
            "where": { "_status": { "equals": "published" } },
            "page": 1,
            "limit": 10,
            "sort": { "createdAt": -1 }
        })
    );
}

#[test]
fn config_drives_defaults() {
    let config = Config {
        page_size: 24,
        sort_field: "title".to_string(),
        sort_order: SortDirection::Asc,
        ..Config::default()
    };
    let query = ListingQuery::new("name", "category").build(
        &ListingParams::default(),
        &Viewer::guest(),
        &config,
    );

    assert_eq!(query.pagination.limit, 24);
    assert_eq!(query.sort.as_sort_string(), "title");
}

#[test]
fn page_envelope_from_pagination() {
    let pagination = pagination_params("2", 1, 10);
    let page = Page::new(vec![json!({ "id": 11 })], 25, pagination);

    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(page.has_prev);
    assert_eq!(pagination.offset(), 10);
}
