use std::fmt;

use crate::field::{
    FieldKind,
    FieldRef,
};
use crate::operator::Operator;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn keyword(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Extra evaluation requirement attached to a compiled condition.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Annotation {
    /// Relationship `HAS_ANY`: confirm with a count of matching linked
    /// records that at least one exists, so join duplicates cannot match.
    CountGuard,
    /// EAV ordering comparison: the stored text value is compared as a number.
    NumericCast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: FieldRef,
    pub operator: Operator,
    pub value: Value,
    pub annotation: Option<Annotation>,
}

impl Condition {
    pub fn kind(&self) -> FieldKind {
        self.field.kind()
    }

    pub fn has_annotation(&self, annotation: Annotation) -> bool {
        self.annotation == Some(annotation)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operator, &self.value) {
            (Operator::Exists, value) if value.scalars().is_empty() => {
                write!(f, "{} {}", self.field, self.operator)
            }
            _ => write!(f, "{} {} {}", self.field, self.operator, self.value),
        }
    }
}

/// A group member and the connective joining it to the member before it.
/// Only the first member of a group has no connective.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    pub connective: Option<Connective>,
    pub node: PredicateNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    Condition(Condition),
    Group(Vec<GroupMember>),
}

impl PredicateNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            PredicateNode::Condition(_) => 1,
            PredicateNode::Group(members) => members.iter().map(|member| member.node.leaf_count()).sum(),
        }
    }

    /// Group nesting depth; a bare condition has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            PredicateNode::Condition(_) => 0,
            PredicateNode::Group(members) => {
                1 + members.iter().map(|member| member.node.depth()).max().unwrap_or(0)
            }
        }
    }

    /// All conditions, left to right.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut conditions = Vec::new();
        self.collect_conditions(&mut conditions);
        conditions
    }

    fn collect_conditions<'a>(&'a self, conditions: &mut Vec<&'a Condition>) {
        match self {
            PredicateNode::Condition(condition) => conditions.push(condition),
            PredicateNode::Group(members) => {
                for member in members {
                    member.node.collect_conditions(conditions);
                }
            }
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            PredicateNode::Condition(condition) => Some(condition),
            PredicateNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&[GroupMember]> {
        match self {
            PredicateNode::Group(members) => Some(members),
            PredicateNode::Condition(_) => None,
        }
    }
}

impl fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateNode::Condition(condition) => write!(f, "{}", condition),
            PredicateNode::Group(members) => {
                for member in members {
                    if let Some(connective) = member.connective {
                        write!(f, " {} ", connective)?;
                    }

                    match member.node {
                        PredicateNode::Group(_) => write!(f, "({})", member.node)?,
                        PredicateNode::Condition(_) => write!(f, "{}", member.node)?,
                    }
                }

                Ok(())
            }
        }
    }
}
