use anyhow::{
    Result,
    bail,
};

use crate::condition::RawCondition;
use crate::error::FilterError;
use crate::field::FieldRef;
use crate::operator::Operator;
use crate::predicate::{
    Annotation,
    Condition,
};
use crate::value::{
    self,
    Value,
};

/// Compiles one atomic condition into a kind-tagged predicate.
pub fn compile_condition(text: &str) -> Result<Condition> {
    let raw = RawCondition::read(text)?;
    let field = FieldRef::classify(raw.field);
    let kind = field.kind();
    if !kind.allows(raw.operator) {
        bail!(FilterError::UnsupportedOperator {
            kind,
            operator: raw.operator,
        });
    }

    let value = value::normalize(raw.value, &field, raw.operator)?;
    let annotation = annotate(&field, raw.operator, &value)?;
    log::trace!("compiled '{}' as {} condition on {}", text, kind, field);

    Ok(Condition {
        field,
        operator: raw.operator,
        value,
        annotation,
    })
}

fn annotate(field: &FieldRef, operator: Operator, normalized: &Value) -> Result<Option<Annotation>> {
    match field {
        FieldRef::Relationship(_) if operator == Operator::HasAny => Ok(Some(Annotation::CountGuard)),

        FieldRef::Attribute(name) if operator.is_ordering() => {
            let numeric = normalized.scalars().iter().all(|scalar| {
                scalar.as_text().and_then(value::parse_number).is_some()
            });
            if !numeric {
                bail!(FilterError::ValueCast {
                    field: name.clone(),
                    value: normalized.to_string(),
                });
            }

            Ok(Some(Annotation::NumericCast))
        }

        _ => Ok(None),
    }
}

#[cfg(test)]
mod compiler_tests {
    use super::*;
    use crate::field::{
        FieldKind,
        Relation,
    };
    use crate::value::Scalar;

    fn error_of(text: &str) -> Option<FilterError> {
        compile_condition(text)
            .err()
            .and_then(|err| err.downcast_ref::<FilterError>().cloned())
    }

    #[test]
    fn test_standard() -> Result<()> {
        let condition = compile_condition("salary_min>=3000")?;
        assert_eq!(condition.field, FieldRef::Standard("salary_min".to_string()));
        assert_eq!(condition.operator, Operator::GreaterThanOrEqual);
        assert_eq!(condition.value, Value::Single(Scalar::Number(3000.0)));
        assert_eq!(condition.annotation, None);
        Ok(())
    }

    #[test]
    fn test_relationship_has_any() -> Result<()> {
        let condition = compile_condition("languages HAS_ANY (PHP,JavaScript)")?;
        assert_eq!(condition.field, FieldRef::Relationship(Relation::Languages));
        assert_eq!(condition.operator, Operator::HasAny);
        assert_eq!(condition.value.labels(), vec!["PHP", "JavaScript"]);
        assert!(condition.has_annotation(Annotation::CountGuard));
        Ok(())
    }

    #[test]
    fn test_relationship_without_guard() -> Result<()> {
        for text in ["locations = Berlin", "locations IS_ANY (Berlin,Paris)", "categories != Sales", "languages EXISTS"] {
            assert_eq!(compile_condition(text)?.annotation, None, "{}", text);
        }
        Ok(())
    }

    #[test]
    fn test_attribute_numeric() -> Result<()> {
        let condition = compile_condition("attribute:years_experience>5")?;
        assert_eq!(condition.field, FieldRef::Attribute("years_experience".to_string()));
        assert_eq!(condition.operator, Operator::GreaterThan);
        assert_eq!(condition.value, Value::text("5"));
        assert!(condition.has_annotation(Annotation::NumericCast));
        Ok(())
    }

    #[test]
    fn test_attribute_text() -> Result<()> {
        let condition = compile_condition("attribute:seniority_level = Senior")?;
        assert_eq!(condition.value, Value::text("Senior"));
        assert_eq!(condition.annotation, None);

        assert!(matches!(error_of("attribute:seniority_level > Senior"), Some(FilterError::ValueCast { .. })));
        Ok(())
    }

    #[test]
    fn test_unknown_attribute_compiles() -> Result<()> {
        let condition = compile_condition("attribute:does_not_exist = anything")?;
        assert_eq!(condition.kind(), FieldKind::Attribute);
        Ok(())
    }

    #[test]
    fn test_symbol_operators_take_priority_over_words() -> Result<()> {
        let condition = compile_condition("title LIKE a = b")?;
        assert_eq!(condition.field, FieldRef::Standard("title LIKE a".to_string()));
        assert_eq!(condition.operator, Operator::Equal);
        assert_eq!(condition.value, Value::text("b"));
        Ok(())
    }

    #[test]
    fn test_empty_value_lists() {
        for text in ["languages != ()", "status IN ()", "salary_min IN (,)", "locations = ( )"] {
            assert!(
                matches!(error_of(text), Some(FilterError::MalformedCondition { reason: "missing value", .. })),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_illegal_operators() {
        assert_eq!(
            error_of("locations>5"),
            Some(FilterError::UnsupportedOperator { kind: FieldKind::Relationship, operator: Operator::GreaterThan })
        );
        assert_eq!(
            error_of("languages LIKE PH"),
            Some(FilterError::UnsupportedOperator { kind: FieldKind::Relationship, operator: Operator::Like })
        );
        assert_eq!(
            error_of("status HAS_ANY (draft)"),
            Some(FilterError::UnsupportedOperator { kind: FieldKind::Standard, operator: Operator::HasAny })
        );
        assert_eq!(
            error_of("attribute:remote_work EXISTS"),
            Some(FilterError::UnsupportedOperator { kind: FieldKind::Attribute, operator: Operator::Exists })
        );
    }
}
