//! Comparison operators understood by the content store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Operator attached to a field inside a predicate tree.
///
/// The serialized names are passed verbatim to the content store, so they
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Exact match.
    Equals,
    /// Not equal.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanEqual,
    /// Case-insensitive substring search.
    Like,
    /// Field contains any of the listed values.
    Contains,
    /// Value in list.
    In,
    /// Value not in list.
    NotIn,
    /// Field is (or is not) set.
    Exists,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 11] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LessThan,
        Operator::LessThanEqual,
        Operator::Like,
        Operator::Contains,
        Operator::In,
        Operator::NotIn,
        Operator::Exists,
    ];

    /// Wire name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanEqual => "greater_than_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanEqual => "less_than_equal",
            Operator::Like => "like",
            Operator::Contains => "contains",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Exists => "exists",
        }
    }

    /// Returns `true` if the operator expects a list operand.
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::Contains | Operator::In | Operator::NotIn)
    }

    /// Returns `true` if `name` is the wire name of any operator.
    pub fn is_operator_name(name: &str) -> bool {
        Self::ALL.iter().any(|op| op.as_str() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
    }

    #[test]
    fn parse_round_trips() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_operator_rejected() {
        let err = "between".parse::<Operator>().unwrap_err();
        assert!(matches!(err, QueryError::UnknownOperator(ref name) if name == "between"));
    }

    #[test]
    fn list_operators() {
        assert!(Operator::In.takes_list());
        assert!(Operator::NotIn.takes_list());
        assert!(Operator::Contains.takes_list());
        assert!(!Operator::Like.takes_list());
        assert!(!Operator::Exists.takes_list());
    }

    #[test]
    fn operator_names_detected() {
        assert!(Operator::is_operator_name("greater_than_equal"));
        assert!(!Operator::is_operator_name("nominal"));
        assert!(!Operator::is_operator_name("and"));
    }
}
