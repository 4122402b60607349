//! Reference translator evaluating compiled filters against jobs held in memory.

use std::cmp::Ordering;

use anyhow::{
    Result,
    bail,
};
use chrono::{
    DateTime,
    Utc,
};

use crate::field::Relation;
use crate::operator::Operator;
use crate::predicate::{
    Connective,
    PredicateNode,
};
use crate::translate::{
    Membership,
    QueryTranslator,
    translate,
};
use crate::value::{
    Scalar,
    Value,
    parse_number,
};

pub const COLUMNS: [&str; 11] = [
    "title",
    "description",
    "company_name",
    "salary_min",
    "salary_max",
    "is_remote",
    "job_type",
    "status",
    "published_at",
    "created_at",
    "updated_at",
];

/// One EAV row: the attribute's name and its value stored as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValue {
    pub name: String,
    pub value: String,
}

impl AttributeValue {
    pub fn new(name: &str, value: &str) -> Self {
        AttributeValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobRecord {
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub is_remote: bool,
    pub job_type: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub languages: Vec<String>,
    /// Cities of the linked locations.
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    pub attributes: Vec<AttributeValue>,
}

impl JobRecord {
    /// Column value, `None` for NULL or an unknown column.
    pub fn column(&self, name: &str) -> Option<Scalar> {
        let text = |text: &String| Some(Scalar::Text(text.clone()));
        match name {
            "title" => text(&self.title),
            "description" => text(&self.description),
            "company_name" => text(&self.company_name),
            "salary_min" => self.salary_min.map(Scalar::Number),
            "salary_max" => self.salary_max.map(Scalar::Number),
            "is_remote" => Some(Scalar::Boolean(self.is_remote)),
            "job_type" => text(&self.job_type),
            "status" => text(&self.status),
            "published_at" => self.published_at.map(Scalar::Timestamp),
            "created_at" => self.created_at.map(Scalar::Timestamp),
            "updated_at" => self.updated_at.map(Scalar::Timestamp),
            _ => None,
        }
    }

    /// Label column values of the records linked through `relation`.
    pub fn labels(&self, relation: Relation) -> &[String] {
        match relation {
            Relation::Languages => &self.languages,
            Relation::Locations => &self.locations,
            Relation::Categories => &self.categories,
        }
    }
}

pub struct JobMatcher {
    predicate: Box<dyn Fn(&JobRecord) -> bool + Send + Sync>,
}

impl JobMatcher {
    fn new<F>(predicate: F) -> Self
        where F: Fn(&JobRecord) -> bool + Send + Sync + 'static
    {
        JobMatcher {
            predicate: Box::new(predicate),
        }
    }

    pub fn compile(node: &PredicateNode) -> Result<Self> {
        translate(node, &mut MemoryTranslator)
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        (self.predicate)(job)
    }

    pub fn filter<'a>(&self, jobs: &'a [JobRecord]) -> Vec<&'a JobRecord> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }

    fn and(self, other: JobMatcher) -> Self {
        JobMatcher::new(move |job| self.matches(job) && other.matches(job))
    }

    fn or(self, other: JobMatcher) -> Self {
        JobMatcher::new(move |job| self.matches(job) || other.matches(job))
    }
}

pub struct MemoryTranslator;

impl QueryTranslator for MemoryTranslator {
    type Query = JobMatcher;

    fn scalar_comparison(&mut self, column: &str, operator: Operator, value: &Value) -> Result<JobMatcher> {
        if !COLUMNS.contains(&column) {
            bail!("unknown column '{}'", column);
        }

        let column = column.to_string();
        let value = value.clone();
        Ok(JobMatcher::new(move |job| {
            match job.column(&column) {
                None => false,
                Some(actual) => matches_value(&actual, operator, &value),
            }
        }))
    }

    fn relation_membership(&mut self, relation: Relation, membership: Membership, labels: &[&str]) -> Result<JobMatcher> {
        let labels: Vec<String> = labels.iter().map(|label| label.to_string()).collect();
        Ok(JobMatcher::new(move |job| {
            let linked = job.labels(relation);
            let matching = linked.iter().filter(|label| labels.contains(label)).count();
            match membership {
                Membership::AnyOf { .. } => matching > 0,
                Membership::NoneOf => matching == 0,
                Membership::Exists => !linked.is_empty(),
            }
        }))
    }

    fn attribute_comparison(&mut self, attribute: &str, operator: Operator, value: &Value, numeric: bool) -> Result<JobMatcher> {
        let attribute = attribute.to_string();
        let value = value.clone();
        Ok(JobMatcher::new(move |job| {
            job.attributes
                .iter()
                .filter(|row| row.name == attribute)
                .any(|row| {
                    if numeric {
                        matches_numeric_text(&row.value, operator, &value)
                    } else {
                        matches_value(&Scalar::Text(row.value.clone()), operator, &value)
                    }
                })
        }))
    }

    fn combine(&mut self, first: JobMatcher, rest: Vec<(Connective, JobMatcher)>) -> Result<JobMatcher> {
        // AND chains, later joined by OR
        let mut chains = Vec::new();
        let mut chain = first;
        for (connective, next) in rest {
            match connective {
                Connective::And => chain = chain.and(next),
                Connective::Or => {
                    chains.push(chain);
                    chain = next;
                }
            }
        }
        chains.push(chain);

        match chains.into_iter().reduce(JobMatcher::or) {
            Some(combined) => Ok(combined),
            None => bail!("cannot combine an empty group"),
        }
    }
}

fn ordering(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    match (left, right) {
        (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
        (Scalar::Number(a), Scalar::Number(b)) => a.partial_cmp(b),
        (Scalar::Boolean(a), Scalar::Boolean(b)) => Some(a.cmp(b)),
        (Scalar::Timestamp(a), Scalar::Timestamp(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare(left: &Scalar, operator: Operator, right: &Scalar) -> bool {
    let ordering = match ordering(left, right) {
        Some(ordering) => ordering,
        None => return false,
    };

    match operator {
        Operator::Equal => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::GreaterThanOrEqual => ordering != Ordering::Less,
        Operator::LessThanOrEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

fn matches_value(actual: &Scalar, operator: Operator, value: &Value) -> bool {
    match operator {
        Operator::Like => value.scalars().first().map_or(false, |pattern| {
            actual.to_string().to_lowercase().contains(&pattern.to_string().to_lowercase())
        }),
        Operator::In => value.scalars().iter().any(|expected| compare(actual, Operator::Equal, expected)),
        _ => value.scalars().first().map_or(false, |expected| compare(actual, operator, expected)),
    }
}

fn matches_numeric_text(stored: &str, operator: Operator, value: &Value) -> bool {
    let stored = match parse_number(stored) {
        Some(stored) => stored,
        None => return false,
    };

    value
        .scalars()
        .first()
        .and_then(|expected| expected.as_text().and_then(parse_number))
        .map_or(false, |expected| compare(&Scalar::Number(stored), operator, &Scalar::Number(expected)))
}
