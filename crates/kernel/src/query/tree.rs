//! Predicate tree handed to the content store.
//!
//! The JSON shape is a map keyed by field name (or the reserved group keys
//! `and` / `or`). Field entries hold operator conditions and, for nested
//! paths, further path segments:
//!
//! ```json
//! {
//!   "name": { "like": "tomato" },
//!   "price": { "nominal": { "greater_than": 10, "less_than": 100 } },
//!   "or": [ { "category": { "equals": "5" } }, { "featured": { "equals": true } } ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::operator::Operator;
use super::value::FilterValue;
use crate::error::{QueryError, QueryResult, json_kind};

/// Group key for conjunctions.
pub const AND_KEY: &str = "and";

/// Group key for disjunctions.
pub const OR_KEY: &str = "or";

/// Returns `true` if `key` is reserved for groups.
pub fn is_group_key(key: &str) -> bool {
    key == AND_KEY || key == OR_KEY
}

/// Conditions attached to one field (or one nested path segment).
///
/// Operators on the same node form an implicit AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCondition {
    operators: BTreeMap<Operator, FilterValue>,
    paths: BTreeMap<String, FieldCondition>,
}

impl FieldCondition {
    /// Value set for `operator` on this node.
    pub fn get(&self, operator: Operator) -> Option<&FilterValue> {
        self.operators.get(&operator)
    }

    /// Child node for a nested path segment.
    pub fn path(&self, segment: &str) -> Option<&FieldCondition> {
        self.paths.get(segment)
    }

    /// Iterate over the operator conditions on this node.
    pub fn operators(&self) -> impl Iterator<Item = (Operator, &FilterValue)> {
        self.operators.iter().map(|(op, value)| (*op, value))
    }

    /// Returns `true` if the node holds neither operators nor children.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty() && self.paths.is_empty()
    }

    /// Set an operator value, replacing any previous value for it.
    pub(crate) fn set(&mut self, operator: Operator, value: FilterValue) {
        self.operators.insert(operator, value);
    }

    /// Child node for `segment`, created on first use.
    pub(crate) fn path_mut(&mut self, segment: &str) -> &mut FieldCondition {
        self.paths.entry(segment.to_string()).or_default()
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (op, value) in &self.operators {
            map.insert(op.as_str().to_string(), value.to_json());
        }
        for (segment, child) in &self.paths {
            map.insert(segment.clone(), child.to_json());
        }
        Value::Object(map)
    }

    fn from_json(field: &str, value: Value) -> QueryResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(QueryError::MalformedCondition {
                    field: field.to_string(),
                    reason: format!("expected object, got {}", json_kind(&other)),
                });
            }
        };

        let mut condition = FieldCondition::default();
        for (key, value) in map {
            if let Ok(op) = key.parse::<Operator>() {
                let kind = json_kind(&value);
                let operand = FilterValue::from_json(value)
                    .filter(|v| !v.is_absent())
                    .ok_or_else(|| QueryError::MalformedCondition {
                        field: field.to_string(),
                        reason: format!("'{op}' operand cannot be {kind}"),
                    })?;
                condition.operators.insert(op, operand);
            } else if value.is_object() {
                let child = Self::from_json(&format!("{field}.{key}"), value)?;
                condition.paths.insert(key, child);
            } else {
                return Err(QueryError::UnknownOperator(key));
            }
        }
        Ok(condition)
    }
}

/// Structured filter expression.
///
/// Build one with [`PredicateBuilder`](super::PredicateBuilder); decode a
/// stored one with [`PredicateTree::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub struct PredicateTree {
    fields: BTreeMap<String, FieldCondition>,
    and: Vec<PredicateTree>,
    or: Vec<PredicateTree>,
}

impl PredicateTree {
    /// Create an empty tree (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the tree has no conditions at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.and.is_empty() && self.or.is_empty()
    }

    /// Number of top-level keys, groups included.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(!self.and.is_empty()) + usize::from(!self.or.is_empty())
    }

    /// Conditions for a top-level field.
    pub fn field(&self, name: &str) -> Option<&FieldCondition> {
        self.fields.get(name)
    }

    /// Iterate over top-level field conditions in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldCondition)> {
        self.fields.iter().map(|(name, cond)| (name.as_str(), cond))
    }

    /// Members of the `and` group (empty if unset).
    pub fn and_group(&self) -> &[PredicateTree] {
        &self.and
    }

    /// Members of the `or` group (empty if unset).
    pub fn or_group(&self) -> &[PredicateTree] {
        &self.or
    }

    /// Walk a dotted path down to its node, if present.
    pub fn lookup(&self, path: &str) -> Option<&FieldCondition> {
        if let Some(cond) = self.fields.get(path) {
            return Some(cond);
        }
        let mut segments = path.split('.');
        let mut node = self.fields.get(segments.next()?)?;
        for segment in segments {
            node = node.path(segment)?;
        }
        Some(node)
    }

    /// Node for a top-level field, created on first use.
    pub(crate) fn field_mut(&mut self, name: &str) -> &mut FieldCondition {
        self.fields.entry(name.to_string()).or_default()
    }

    pub(crate) fn and_mut(&mut self) -> &mut Vec<PredicateTree> {
        &mut self.and
    }

    pub(crate) fn or_mut(&mut self) -> &mut Vec<PredicateTree> {
        &mut self.or
    }

    /// Shallow merge: top-level keys of `other` replace ours.
    pub(crate) fn merge(&mut self, other: PredicateTree) {
        self.fields.extend(other.fields);
        if !other.and.is_empty() {
            self.and = other.and;
        }
        if !other.or.is_empty() {
            self.or = other.or;
        }
    }

    /// Encode as the JSON object the content store accepts.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, cond) in &self.fields {
            map.insert(name.clone(), cond.to_json());
        }
        if !self.and.is_empty() {
            map.insert(AND_KEY.to_string(), group_json(&self.and));
        }
        if !self.or.is_empty() {
            map.insert(OR_KEY.to_string(), group_json(&self.or));
        }
        Value::Object(map)
    }

    /// Decode a tree from JSON, rejecting unknown operators and malformed
    /// nodes.
    pub fn from_json(value: Value) -> QueryResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(QueryError::NotAnObject(json_kind(&other))),
        };

        let mut tree = PredicateTree::default();
        for (key, value) in map {
            if is_group_key(&key) {
                let members = parse_group(&key, value)?;
                if key == AND_KEY {
                    tree.and = members;
                } else {
                    tree.or = members;
                }
            } else {
                let cond = FieldCondition::from_json(&key, value)?;
                tree.fields.insert(key, cond);
            }
        }
        Ok(tree)
    }
}

fn group_json(members: &[PredicateTree]) -> Value {
    Value::Array(members.iter().map(PredicateTree::to_json).collect())
}

fn parse_group(key: &str, value: Value) -> QueryResult<Vec<PredicateTree>> {
    let Value::Array(items) = value else {
        return Err(QueryError::MalformedGroup {
            key: key.to_string(),
        });
    };
    items
        .into_iter()
        .map(|item| {
            if item.is_object() {
                PredicateTree::from_json(item)
            } else {
                Err(QueryError::MalformedGroup {
                    key: key.to_string(),
                })
            }
        })
        .collect()
}

impl From<PredicateTree> for Value {
    fn from(tree: PredicateTree) -> Self {
        tree.to_json()
    }
}

impl From<&PredicateTree> for Value {
    fn from(tree: &PredicateTree) -> Self {
        tree.to_json()
    }
}

impl TryFrom<Value> for PredicateTree {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}
