//! Predicate builder for content-store queries.
//!
//! This module provides:
//! - Operator: closed set of comparison operators with their wire names
//! - FilterValue: operand values, with null and non-finite floats treated as absent
//! - PredicateTree: the filter structure handed to the content store
//! - PredicateBuilder: fluent, input-guarding construction of trees

mod builder;
mod operator;
mod tree;
mod value;

pub use builder::PredicateBuilder;
pub use operator::Operator;
pub use tree::{AND_KEY, FieldCondition, OR_KEY, PredicateTree, is_group_key};
pub use value::FilterValue;
