//! Fluent predicate builder.
//!
//! Every setter guards its input and silently drops values that would
//! produce a broken or overly broad filter: null, `None`, non-finite floats,
//! blank search text, and empty lists. Dropping a condition always widens the result set,
//! so calling code can build filters conditionally without pre-validating.

use tracing::trace;

use super::operator::Operator;
use super::tree::{PredicateTree, is_group_key};
use super::value::FilterValue;

/// Accumulates conditions into a [`PredicateTree`].
///
/// Each method consumes the builder and returns it, so calls chain:
///
/// ```
/// use pasar_kernel::query::PredicateBuilder;
///
/// let search: Option<&str> = Some("tomato");
/// let tree = PredicateBuilder::new()
///     .like("name", search)
///     .equals("category", "5")
///     .greater_than("stock", 0)
///     .build();
///
/// assert_eq!(tree.len(), 3);
/// ```
///
/// `build` consumes the builder, so a returned tree can never be changed by
/// later builder calls. Use [`snapshot`](Self::snapshot) to keep building
/// after taking a copy.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    tree: PredicateTree,
}

impl PredicateBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operator condition on a top-level field.
    ///
    /// The field name is used as-is; use [`nested`](Self::nested) for dotted
    /// paths. Absent values (null, `None`, NaN, infinities) are skipped, and
    /// dropped from inside lists.
    pub fn filter(mut self, field: &str, operator: Operator, value: impl Into<FilterValue>) -> Self {
        let value = value.into().prune();
        if value.is_absent() {
            trace!(field, %operator, "skipping absent value");
            return self;
        }
        if field.is_empty() || is_group_key(field) {
            trace!(field, %operator, "skipping condition on reserved or blank field");
            return self;
        }
        self.tree.field_mut(field).set(operator, value);
        self
    }

    /// Add an `equals` condition.
    pub fn equals(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::Equals, value)
    }

    /// Add a `not_equals` condition.
    pub fn not_equals(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::NotEquals, value)
    }

    /// Add a `greater_than` condition.
    pub fn greater_than(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::GreaterThan, value)
    }

    /// Add a `greater_than_equal` condition.
    pub fn greater_than_equal(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::GreaterThanEqual, value)
    }

    /// Add a `less_than` condition.
    pub fn less_than(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::LessThan, value)
    }

    /// Add a `less_than_equal` condition.
    pub fn less_than_equal(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::LessThanEqual, value)
    }

    /// Add an `exists` condition.
    pub fn exists(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Operator::Exists, value)
    }

    /// Add a `like` condition when the search text is non-blank.
    ///
    /// The text is stored untrimmed.
    pub fn like<'a>(self, field: &str, value: impl Into<Option<&'a str>>) -> Self {
        match value.into() {
            Some(text) if !text.trim().is_empty() => self.filter(field, Operator::Like, text),
            _ => {
                trace!(field, "skipping blank search text");
                self
            }
        }
    }

    /// Add a `contains` condition when `values` is non-empty.
    pub fn contains<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.list_filter(field, Operator::Contains, values)
    }

    /// Add an `in` condition when `values` is non-empty.
    pub fn is_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.list_filter(field, Operator::In, values)
    }

    /// Add a `not_in` condition when `values` is non-empty.
    pub fn not_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.list_filter(field, Operator::NotIn, values)
    }

    fn list_filter<I, V>(self, field: &str, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        let values: Vec<FilterValue> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.is_absent())
            .collect();
        if values.is_empty() {
            // An empty list is ambiguous (match nothing vs. everything); drop it.
            trace!(field, %operator, "skipping empty list");
            return self;
        }
        self.filter(field, operator, FilterValue::List(values))
    }

    /// Add a condition on a dot-delimited path such as `price.nominal`.
    ///
    /// Intermediate nodes are created on demand and reused, so several
    /// operators can be attached to the same leaf. A single-segment path is
    /// the same as [`filter`](Self::filter). Paths with blank segments, or
    /// segments named like an operator, are skipped.
    pub fn nested(mut self, path: &str, operator: Operator, value: impl Into<FilterValue>) -> Self {
        let value = value.into().prune();
        let segments: Vec<&str> = path.split('.').collect();
        let Some((head, rest)) = segments.split_first() else {
            return self;
        };
        if rest.is_empty() {
            return self.filter(path, operator, value);
        }
        if value.is_absent() {
            trace!(path, %operator, "skipping absent value");
            return self;
        }
        if head.is_empty()
            || is_group_key(head)
            || rest
                .iter()
                .any(|segment| segment.is_empty() || Operator::is_operator_name(segment))
        {
            trace!(path, %operator, "skipping malformed path");
            return self;
        }

        let mut node = self.tree.field_mut(head);
        for segment in rest {
            node = node.path_mut(segment);
        }
        node.set(operator, value);
        self
    }

    /// Require every tree in `conditions` to match.
    ///
    /// Repeated calls append to the existing `and` group.
    pub fn and<I, T>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PredicateTree>,
    {
        let conditions = collect_group(conditions);
        if conditions.is_empty() {
            trace!("skipping empty and group");
            return self;
        }
        self.tree.and_mut().extend(conditions);
        self
    }

    /// Require at least one tree in `conditions` to match.
    ///
    /// The first call sets the `or` group. Later calls keep both
    /// disjunctions: the new group is appended to the `and` group as
    /// `{ "or": [...] }`, so `or([a, b])` then `or([c, d])` means
    /// `(a || b) && (c || d)`.
    pub fn or<I, T>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PredicateTree>,
    {
        let conditions = collect_group(conditions);
        if conditions.is_empty() {
            trace!("skipping empty or group");
            return self;
        }
        if self.tree.or_group().is_empty() {
            *self.tree.or_mut() = conditions;
        } else {
            let mut disjunction = PredicateTree::new();
            *disjunction.or_mut() = conditions;
            self.tree.and_mut().push(disjunction);
        }
        self
    }

    /// Shallow-merge another builder's top-level keys into this one.
    ///
    /// Keys in `other` replace same-named keys here; nothing is merged
    /// deeper than the top level.
    pub fn merge(self, other: PredicateBuilder) -> Self {
        self.merge_where(other.tree)
    }

    /// Shallow-merge a raw tree, with the same rules as [`merge`](Self::merge).
    pub fn merge_where(mut self, tree: PredicateTree) -> Self {
        self.tree.merge(tree);
        self
    }

    /// Returns `true` if no condition has been added.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Borrow the tree built so far.
    pub fn tree(&self) -> &PredicateTree {
        &self.tree
    }

    /// Deep copy of the tree built so far.
    pub fn snapshot(&self) -> PredicateTree {
        self.tree.clone()
    }

    /// Finish and return the tree. No validation pass runs here; each setter
    /// has already guarded its own input.
    pub fn build(self) -> PredicateTree {
        self.tree
    }
}

impl From<PredicateBuilder> for PredicateTree {
    fn from(builder: PredicateBuilder) -> Self {
        builder.build()
    }
}

fn collect_group<I, T>(conditions: I) -> Vec<PredicateTree>
where
    I: IntoIterator<Item = T>,
    T: Into<PredicateTree>,
{
    conditions.into_iter().map(Into::into).collect()
}
