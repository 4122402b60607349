use anyhow::{
    Result,
    bail,
};

use crate::error::FilterError;
use crate::operator::Operator;

/// A condition cut into its three raw pieces, before any classification.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RawCondition<'a> {
    pub field: &'a str,
    pub operator: Operator,
    pub value: &'a str,
}

impl<'a> RawCondition<'a> {
    /// Finds the operator of `condition` and splits around it.
    pub fn read(condition: &'a str) -> Result<Self> {
        let operator = match Operator::scan(condition) {
            Some((operator, _)) => operator,
            None => bail!(FilterError::InvalidCondition {
                condition: condition.to_string(),
            }),
        };

        RawCondition::split(condition, operator)
    }

    /// Everything before the first standalone `operator` is the field,
    /// everything after it the value. Only `EXISTS` may go without a value.
    pub fn split(condition: &'a str, operator: Operator) -> Result<Self> {
        let position = match operator.find_in(condition) {
            Some(position) => position,
            None => bail!(FilterError::InvalidCondition {
                condition: condition.to_string(),
            }),
        };

        let field = condition[..position].trim();
        let value = condition[position + operator.symbol().len()..].trim();
        if field.is_empty() {
            bail!(FilterError::malformed(condition, "missing field"));
        }
        if value.is_empty() && operator != Operator::Exists {
            bail!(FilterError::malformed(condition, "missing value"));
        }

        Ok(RawCondition {
            field,
            operator,
            value,
        })
    }
}

#[cfg(test)]
mod condition_tests {
    use super::*;

    fn error_of(condition: &str) -> Option<FilterError> {
        RawCondition::read(condition)
            .err()
            .and_then(|err| err.downcast_ref::<FilterError>().cloned())
    }

    #[test]
    fn test_split_without_whitespace() -> Result<()> {
        let raw = RawCondition::read("salary_min>=3000")?;
        assert_eq!(raw, RawCondition { field: "salary_min", operator: Operator::GreaterThanOrEqual, value: "3000" });
        Ok(())
    }

    #[test]
    fn test_split_keeps_value_intact() -> Result<()> {
        let raw = RawCondition::read("languages HAS_ANY (PHP, JavaScript)")?;
        assert_eq!(raw.field, "languages");
        assert_eq!(raw.value, "(PHP, JavaScript)");

        let raw = RawCondition::read("title = a = b")?;
        assert_eq!(raw.field, "title");
        assert_eq!(raw.value, "a = b");
        Ok(())
    }

    #[test]
    fn test_exists_without_value() -> Result<()> {
        let raw = RawCondition::read("categories EXISTS")?;
        assert_eq!(raw.field, "categories");
        assert_eq!(raw.operator, Operator::Exists);
        assert_eq!(raw.value, "");
        Ok(())
    }

    #[test]
    fn test_errors() {
        assert!(matches!(error_of("salary_min 3000"), Some(FilterError::InvalidCondition { .. })));
        assert!(matches!(error_of(">= 3000"), Some(FilterError::MalformedCondition { reason: "missing field", .. })));
        assert!(matches!(error_of("status ="), Some(FilterError::MalformedCondition { reason: "missing value", .. })));
        assert!(matches!(error_of("languages IN"), Some(FilterError::MalformedCondition { .. })));
    }
}
