//! Pasar Kernel Library
//!
//! Query construction for the Pasar marketplace: a fluent predicate builder
//! producing the filter trees the content store executes, plus lenient
//! pagination and sort normalization for raw request input.
//! The `pasar` binary exposes the same pipeline on the command line.

pub mod config;
pub mod error;
pub mod listing;
pub mod pagination;
pub mod query;

pub use config::Config;
pub use error::{QueryError, QueryResult};
pub use listing::{ContentQuery, ContentStore, ListingParams, ListingQuery, Role, Viewer};
pub use pagination::{
    Page, PageParam, Pagination, SortDirection, SortSpec, pagination_params, sort_params,
};
pub use query::{FieldCondition, FilterValue, Operator, PredicateBuilder, PredicateTree};
