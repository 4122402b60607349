use thiserror::Error;

use crate::field::FieldKind;
use crate::operator::Operator;

/// Terminal failure of a parse. Carried inside `anyhow::Error`; recover it
/// with `err.downcast_ref::<FilterError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("filter expression is empty")]
    Empty,

    #[error("unbalanced parentheses in filter expression: {expression}")]
    UnbalancedGroup { expression: String },

    #[error("invalid operator in condition: {condition}")]
    InvalidCondition { condition: String },

    #[error("malformed condition '{condition}': {reason}")]
    MalformedCondition { condition: String, reason: &'static str },

    #[error("unsupported operator '{operator}' for {kind} field")]
    UnsupportedOperator { kind: FieldKind, operator: Operator },

    #[error("cannot cast '{value}' to a number for field '{field}'")]
    ValueCast { field: String, value: String },

    #[error("cannot parse '{value}' as a timestamp for field '{field}'")]
    ValueParse { field: String, value: String },

    #[error("filter expression nests deeper than {max_depth} groups")]
    DepthExceeded { max_depth: usize },

    #[error("filter expression is {length} bytes long, limit is {max_length}")]
    TooLong { length: usize, max_length: usize },
}

impl FilterError {
    pub fn malformed(condition: &str, reason: &'static str) -> Self {
        FilterError::MalformedCondition {
            condition: condition.to_string(),
            reason,
        }
    }

    pub fn unbalanced(expression: &str) -> Self {
        FilterError::UnbalancedGroup {
            expression: expression.to_string(),
        }
    }
}
