use anyhow::{
    Result,
    bail,
};

use crate::field::{
    FieldRef,
    Relation,
};
use crate::operator::Operator;
use crate::predicate::{
    Annotation,
    Condition,
    Connective,
    PredicateNode,
};
use crate::value::Value;

/// How a relationship condition tests the linked records.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Membership {
    /// At least one linked record carries a listed label.
    AnyOf { count_guard: bool },
    /// No linked record carries a listed label.
    NoneOf,
    /// At least one linked record exists; labels are ignored.
    Exists,
}

impl Membership {
    pub fn of(condition: &Condition) -> Option<Membership> {
        let membership = match condition.operator {
            Operator::Equal | Operator::IsAny | Operator::HasAny => Membership::AnyOf {
                count_guard: condition.has_annotation(Annotation::CountGuard),
            },
            Operator::NotEqual => Membership::NoneOf,
            Operator::Exists => Membership::Exists,
            _ => return None,
        };

        Some(membership)
    }
}

/// Storage side of a compiled filter. Each method turns one piece of the
/// predicate tree into the backend's own query representation.
pub trait QueryTranslator {
    type Query;

    fn scalar_comparison(&mut self, column: &str, operator: Operator, value: &Value) -> Result<Self::Query>;

    fn relation_membership(&mut self, relation: Relation, membership: Membership, labels: &[&str]) -> Result<Self::Query>;

    /// Compares against the EAV rows whose attribute is named `attribute`.
    /// With `numeric` set the stored text is compared as a number.
    fn attribute_comparison(&mut self, attribute: &str, operator: Operator, value: &Value, numeric: bool) -> Result<Self::Query>;

    /// Joins the members of one group. The group carries no precedence of
    /// its own; translators read it the way SQL reads a chain of `where` and
    /// `orWhere` clauses, so `AND` binds tighter than `OR`.
    fn combine(&mut self, first: Self::Query, rest: Vec<(Connective, Self::Query)>) -> Result<Self::Query>;
}

pub fn translate<T>(node: &PredicateNode, translator: &mut T) -> Result<T::Query>
    where T: QueryTranslator
{
    match node {
        PredicateNode::Condition(condition) => translate_condition(condition, translator),
        PredicateNode::Group(members) => {
            let mut queries = Vec::with_capacity(members.len());
            for member in members {
                let query = translate(&member.node, translator)?;
                queries.push((member.connective.unwrap_or(Connective::And), query));
            }

            let mut queries = queries.into_iter();
            match queries.next() {
                Some((_, first)) => translator.combine(first, queries.collect()),
                None => bail!("cannot translate an empty group"),
            }
        }
    }
}

fn translate_condition<T>(condition: &Condition, translator: &mut T) -> Result<T::Query>
    where T: QueryTranslator
{
    match &condition.field {
        FieldRef::Standard(column) => translator.scalar_comparison(column, condition.operator, &condition.value),

        FieldRef::Relationship(relation) => {
            let membership = match Membership::of(condition) {
                Some(membership) => membership,
                None => bail!("operator '{}' has no membership test", condition.operator),
            };
            translator.relation_membership(*relation, membership, &condition.value.labels())
        }

        FieldRef::Attribute(attribute) => {
            let numeric = condition.has_annotation(Annotation::NumericCast);
            translator.attribute_comparison(attribute, condition.operator, &condition.value, numeric)
        }
    }
}
