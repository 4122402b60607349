//! This library provides:
//! - FilterParser: Parses a job-listing filter expression such as
//!   `(salary_min>=3000 AND languages HAS_ANY (PHP,JavaScript)) OR status=published`
//!   into a tree of typed predicates over standard columns, relationships and EAV attributes
//! - QueryTranslator: The seam where a compiled predicate tree is turned into a storage query
//! - MemoryTranslator: A translator which evaluates predicate trees against jobs held in memory
//!
//! Note: A group without inner parentheses is kept flat; translators evaluate it like SQL, where AND binds tighter than OR.

mod peekable_codepoints;
mod group;
mod condition;
mod compiler;
mod error;
mod config;
mod field;
mod operator;
mod predicate;
mod value;
mod parser;
mod translate;
mod memory;

pub use crate::config::{
    ConnectiveCase,
    ParserConfig,
};
pub use crate::error::FilterError;
pub use crate::field::{
    FieldKind,
    FieldRef,
    Relation,
};
pub use crate::memory::{
    AttributeValue,
    JobMatcher,
    JobRecord,
    MemoryTranslator,
};
pub use crate::operator::Operator;
pub use crate::parser::{
    FILTER_PARAM,
    FilterParser,
};
pub use crate::predicate::{
    Annotation,
    Condition,
    Connective,
    GroupMember,
    PredicateNode,
};
pub use crate::translate::{
    Membership,
    QueryTranslator,
    translate,
};
pub use crate::value::{
    Scalar,
    Value,
};
