use std::collections::HashMap;

use anyhow::{
    Result,
    bail,
};

use crate::compiler::compile_condition;
use crate::config::ParserConfig;
use crate::error::FilterError;
use crate::group::{
    GroupPart,
    enclosing_group,
};
use crate::predicate::{
    GroupMember,
    PredicateNode,
};

/// Request parameter carrying the filter expression.
pub const FILTER_PARAM: &str = "filter";

/// Recursive descent over
///
/// ```text
/// Expr := Term (Connective Term)*
/// Term := '(' Expr ')' | Condition
/// ```
///
/// Holds no state besides its configuration, so one parser may serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    config: ParserConfig,
}

impl FilterParser {
    pub fn new(config: ParserConfig) -> Self {
        FilterParser {
            config
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, filter: &str) -> Result<PredicateNode> {
        if let Some(max_length) = self.config.max_length {
            if filter.len() > max_length {
                bail!(FilterError::TooLong {
                    length: filter.len(),
                    max_length,
                });
            }
        }

        let filter = filter.trim();
        if filter.is_empty() {
            bail!(FilterError::Empty);
        }

        log::debug!("parsing filter: {}", filter);
        let node = self.parse_expr(filter, 0)?;
        log::debug!("parsed {} conditions: {}", node.leaf_count(), node);

        Ok(node)
    }

    /// Reads the `filter` request parameter; a missing or blank parameter
    /// means no filtering at all.
    pub fn parse_params(&self, params: &HashMap<String, String>) -> Result<Option<PredicateNode>> {
        match params.get(FILTER_PARAM) {
            Some(filter) if !filter.trim().is_empty() => Ok(Some(self.parse(filter)?)),
            _ => Ok(None),
        }
    }

    fn parse_expr(&self, expr: &str, depth: usize) -> Result<PredicateNode> {
        let parts = GroupPart::split(expr, self.config.connective_case)?;
        let mut members = Vec::with_capacity(parts.len() / 2 + 1);
        let mut connective = None;
        for part in parts {
            match part {
                GroupPart::Connective(c) => connective = Some(c),
                GroupPart::Expression(term) => {
                    let node = self.parse_term(&term, depth)?;
                    members.push(GroupMember {
                        connective: connective.take(),
                        node,
                    });
                }
            }
        }

        if members.len() == 1 {
            if let Some(member) = members.pop() {
                return Ok(member.node);
            }
        }

        Ok(PredicateNode::Group(members))
    }

    fn parse_term(&self, term: &str, depth: usize) -> Result<PredicateNode> {
        match enclosing_group(term) {
            Some(inner) => {
                let depth = depth + 1;
                if let Some(max_depth) = self.config.max_depth {
                    if depth > max_depth {
                        bail!(FilterError::DepthExceeded {
                            max_depth,
                        });
                    }
                }

                if inner.trim().is_empty() {
                    bail!(FilterError::malformed(term, "empty group"));
                }

                self.parse_expr(inner, depth)
            }

            None => Ok(PredicateNode::Condition(compile_condition(term)?)),
        }
    }
}
