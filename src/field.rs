use std::fmt;

use crate::operator::Operator;

pub const ATTRIBUTE_PREFIX: &str = "attribute:";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Relation {
    Languages,
    Locations,
    Categories,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Relation::Languages, Relation::Locations, Relation::Categories];

    pub fn name(&self) -> &'static str {
        match self {
            Relation::Languages => "languages",
            Relation::Locations => "locations",
            Relation::Categories => "categories",
        }
    }

    /// Column of the related record that filter values are matched against.
    pub fn label_column(&self) -> &'static str {
        match self {
            Relation::Locations => "city",
            Relation::Languages | Relation::Categories => "name",
        }
    }

    pub fn from_name(name: &str) -> Option<Relation> {
        Relation::ALL.into_iter().find(|relation| relation.name() == name)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FieldKind {
    Standard,
    Relationship,
    Attribute,
}

impl FieldKind {
    pub fn legal_operators(&self) -> &'static [Operator] {
        match self {
            FieldKind::Standard | FieldKind::Attribute => &[
                Operator::Equal,
                Operator::NotEqual,
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::GreaterThanOrEqual,
                Operator::LessThanOrEqual,
                Operator::Like,
                Operator::In,
            ],
            FieldKind::Relationship => &[
                Operator::Equal,
                Operator::IsAny,
                Operator::HasAny,
                Operator::NotEqual,
                Operator::Exists,
            ],
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.legal_operators().contains(&operator)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Standard => "standard",
            FieldKind::Relationship => "relationship",
            FieldKind::Attribute => "attribute",
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum FieldRef {
    Standard(String),
    Relationship(Relation),
    Attribute(String),
}

impl FieldRef {
    /// The single point where a raw field token is routed to its kind. Depends
    /// on the token's spelling only.
    pub fn classify(token: &str) -> FieldRef {
        if let Some(name) = token.strip_prefix(ATTRIBUTE_PREFIX) {
            return FieldRef::Attribute(name.to_string());
        }

        match Relation::from_name(token) {
            Some(relation) => FieldRef::Relationship(relation),
            None => FieldRef::Standard(token.to_string()),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Standard(_) => FieldKind::Standard,
            FieldRef::Relationship(_) => FieldKind::Relationship,
            FieldRef::Attribute(_) => FieldKind::Attribute,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Standard(name) => f.write_str(name),
            FieldRef::Relationship(relation) => f.write_str(relation.name()),
            FieldRef::Attribute(name) => write!(f, "{}{}", ATTRIBUTE_PREFIX, name),
        }
    }
}

#[cfg(test)]
mod field_tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(FieldRef::classify("salary_min"), FieldRef::Standard("salary_min".to_string()));
        assert_eq!(FieldRef::classify("locations"), FieldRef::Relationship(Relation::Locations));
        assert_eq!(
            FieldRef::classify("attribute:years_experience"),
            FieldRef::Attribute("years_experience".to_string())
        );
        // exact match only
        assert_eq!(FieldRef::classify("Languages"), FieldRef::Standard("Languages".to_string()));
        assert_eq!(FieldRef::classify("attribute:languages").kind(), FieldKind::Attribute);
    }

    #[test]
    fn test_label_columns() {
        assert_eq!(Relation::Locations.label_column(), "city");
        assert_eq!(Relation::Languages.label_column(), "name");
        assert_eq!(Relation::Categories.label_column(), "name");
    }

    #[test]
    fn test_legality() {
        assert!(FieldKind::Standard.allows(Operator::Like));
        assert!(!FieldKind::Standard.allows(Operator::HasAny));
        assert!(FieldKind::Relationship.allows(Operator::Exists));
        assert!(!FieldKind::Relationship.allows(Operator::GreaterThan));
        assert!(!FieldKind::Attribute.allows(Operator::IsAny));
    }
}
