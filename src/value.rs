use std::fmt;

use anyhow::{
    Result,
    bail,
};
use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    Utc,
};

use crate::error::FilterError;
use crate::field::FieldRef;
use crate::group::enclosing_group;
use crate::operator::Operator;

const NUMERIC_FIELDS: [&str; 2] = ["salary_min", "salary_max"];
const BOOLEAN_FIELDS: [&str; 1] = ["is_remote"];
const TEXT_FIELDS: [&str; 2] = ["job_type", "status"];
const TEMPORAL_MARKER: &str = "_at";
const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Number(number) => write!(f, "{}", number),
            Scalar::Boolean(flag) => write!(f, "{}", flag),
            Scalar::Timestamp(instant) => f.write_str(&instant.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Single(Scalar),
    List(Vec<Scalar>),
}

impl Value {
    pub fn text(text: &str) -> Self {
        Value::Single(Scalar::Text(text.to_string()))
    }

    /// Every scalar of the value; a single scalar is a list of one.
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            Value::Single(scalar) => std::slice::from_ref(scalar),
            Value::List(items) => items,
        }
    }

    /// Text members, used for relationship labels.
    pub fn labels(&self) -> Vec<&str> {
        self.scalars().iter().filter_map(Scalar::as_text).collect()
    }

    /// No scalar at all, or a single blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Single(Scalar::Text(text)) => text.trim().is_empty(),
            Value::Single(_) => false,
            Value::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Single(scalar) => write!(f, "{}", scalar),
            Value::List(items) => {
                let joined: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "({})", joined.join(","))
            }
        }
    }
}

/// Trims a raw value token and removes one enclosing pair of parentheses.
pub fn strip_value(raw: &str) -> &str {
    let trimmed = raw.trim();
    match enclosing_group(trimmed) {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Turns a raw value token into the typed value its field and operator expect.
pub fn normalize(raw: &str, field: &FieldRef, operator: Operator) -> Result<Value> {
    let text = strip_value(raw);
    if text.is_empty() && operator != Operator::Exists {
        bail!(FilterError::malformed(raw.trim(), "missing value"));
    }

    let value = match field {
        FieldRef::Relationship(_) => {
            Value::List(split_list(text).map(|label| Scalar::Text(label.to_string())).collect())
        }

        FieldRef::Attribute(_) if operator.expects_list() => {
            Value::List(split_list(text).map(|item| Scalar::Text(item.to_string())).collect())
        }

        FieldRef::Attribute(_) => Value::text(text),

        FieldRef::Standard(_) if operator == Operator::Like => Value::text(text),

        FieldRef::Standard(name) if operator.expects_list() => {
            let items = split_list(text)
                .map(|item| cast(name, item))
                .collect::<Result<Vec<_>>>()?;
            Value::List(items)
        }

        FieldRef::Standard(name) => Value::Single(cast(name, text)?),
    };

    if operator != Operator::Exists && value.is_empty() {
        bail!(FilterError::malformed(raw.trim(), "missing value"));
    }

    Ok(value)
}

/// Casts a value for a standard column according to the column's type.
pub fn cast(field: &str, text: &str) -> Result<Scalar> {
    if NUMERIC_FIELDS.contains(&field) {
        return match parse_number(text) {
            Some(number) => Ok(Scalar::Number(number)),
            None => bail!(FilterError::ValueCast {
                field: field.to_string(),
                value: text.to_string(),
            }),
        };
    }

    if BOOLEAN_FIELDS.contains(&field) {
        return Ok(Scalar::Boolean(is_truthy(text)));
    }

    if TEXT_FIELDS.contains(&field) {
        return Ok(Scalar::Text(text.to_string()));
    }

    if field.contains(TEMPORAL_MARKER) {
        return match parse_timestamp(text) {
            Some(instant) => Ok(Scalar::Timestamp(instant)),
            None => bail!(FilterError::ValueParse {
                field: field.to_string(),
                value: text.to_string(),
            }),
        };
    }

    Ok(Scalar::Text(text.to_string()))
}

pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

pub fn is_truthy(text: &str) -> bool {
    TRUTHY.iter().any(|truthy| truthy.eq_ignore_ascii_case(text.trim()))
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
