use std::io::Read;

use anyhow::{
    Result,
    bail,
};

use crate::config::ConnectiveCase;
use crate::error::FilterError;
use crate::peekable_codepoints::*;
use crate::predicate::Connective;

/// One piece of a split group: sub-expressions alternate with connectives.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GroupPart {
    Expression(String),
    Connective(Connective),
}

impl GroupPart {
    fn is_boundary_before(previous: Option<char>) -> bool {
        match previous {
            None => true,
            Some(c) => c.is_whitespace() || c == ')',
        }
    }

    fn is_boundary_after(next: Option<char>) -> bool {
        match next {
            None => true,
            Some(c) => c.is_whitespace() || c == '(',
        }
    }

    fn read_connective<R>(peekable_cp: &mut PeekableCodePoints<R>, case: ConnectiveCase) -> Result<Option<Connective>>
        where R: Read
    {
        for connective in [Connective::And, Connective::Or] {
            let keyword = connective.keyword();
            let len = keyword.len();
            let candidate = peekable_cp.peek(len)?;
            if !case.matches(&candidate, keyword) {
                continue;
            }

            if GroupPart::is_boundary_after(peekable_cp.peek_char(len)?) {
                peekable_cp.skip(len)?;
                return Ok(Some(connective));
            }
        }

        Ok(None)
    }

    fn push_expression(parts: &mut Vec<GroupPart>, current: &str, group: &str) -> Result<()> {
        let expression = current.trim();
        if expression.is_empty() {
            bail!(FilterError::malformed(group, "missing operand around connective"));
        }

        parts.push(GroupPart::Expression(expression.to_string()));
        Ok(())
    }

    /// Splits group content at its top-level connectives. Parenthesized
    /// sub-groups are never split; unbalanced parentheses fail.
    pub fn split(group: &str, case: ConnectiveCase) -> Result<Vec<GroupPart>> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut previous = None;
        let mut peekable_cp = PeekableCodePoints::new(group.as_bytes());
        loop {
            let c = match peekable_cp.peek_char(0)? {
                None => break,
                Some(c) => c,
            };

            match c {
                '(' => depth += 1,

                ')' => {
                    depth = match depth.checked_sub(1) {
                        Some(depth) => depth,
                        None => bail!(FilterError::unbalanced(group)),
                    };
                }

                _ if depth == 0 && GroupPart::is_boundary_before(previous) => {
                    if let Some(connective) = GroupPart::read_connective(&mut peekable_cp, case)? {
                        GroupPart::push_expression(&mut parts, &current, group)?;
                        parts.push(GroupPart::Connective(connective));

                        current.clear();
                        previous = None;
                        continue;
                    }
                }

                _ => (),
            }

            current.push(c);
            previous = Some(c);
            peekable_cp.skip(1)?;
        }

        if depth != 0 {
            bail!(FilterError::unbalanced(group));
        }

        GroupPart::push_expression(&mut parts, &current, group)?;
        log::trace!("split '{}' into {} parts", group, parts.len());

        Ok(parts)
    }
}

/// Inner text when the whole of `text` is one parenthesized group, so
/// `(a) AND (b)` is not enclosed while `((a) AND (b))` is.
pub fn enclosing_group(text: &str) -> Option<&str> {
    if !text.starts_with('(') || !text.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return if i == text.len() - 1 {
                        Some(&text[1..i])
                    } else {
                        None
                    };
                }
            }
            _ => (),
        }
    }

    None
}

#[cfg(test)]
mod group_tests {
    use super::*;

    fn expr(text: &str) -> GroupPart {
        GroupPart::Expression(text.to_string())
    }

    #[test]
    fn test_split_flat() -> Result<()> {
        let parts = GroupPart::split("status=published AND is_remote=true OR salary_min>=60000", ConnectiveCase::Insensitive)?;
        assert_eq!(
            parts,
            vec![
                expr("status=published"),
                GroupPart::Connective(Connective::And),
                expr("is_remote=true"),
                GroupPart::Connective(Connective::Or),
                expr("salary_min>=60000"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_split_keeps_nested_groups() -> Result<()> {
        let parts = GroupPart::split(
            "(salary_min>=3000 AND languages HAS_ANY (PHP,JavaScript)) OR status=published",
            ConnectiveCase::Insensitive,
        )?;
        assert_eq!(
            parts,
            vec![
                expr("(salary_min>=3000 AND languages HAS_ANY (PHP,JavaScript))"),
                GroupPart::Connective(Connective::Or),
                expr("status=published"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_split_single_element() -> Result<()> {
        assert_eq!(GroupPart::split("  title LIKE engineer ", ConnectiveCase::Insensitive)?, vec![expr("title LIKE engineer")]);
        Ok(())
    }

    #[test]
    fn test_connective_needs_boundaries() -> Result<()> {
        let parts = GroupPart::split("brand=ANDROID AND title=ORACLE", ConnectiveCase::Insensitive)?;
        assert_eq!(parts.len(), 3);

        let parts = GroupPart::split("(a=1)AND(b=2)", ConnectiveCase::Insensitive)?;
        assert_eq!(parts, vec![expr("(a=1)"), GroupPart::Connective(Connective::And), expr("(b=2)")]);
        Ok(())
    }

    #[test]
    fn test_connective_case() -> Result<()> {
        assert_eq!(GroupPart::split("a=1 and b=2", ConnectiveCase::Insensitive)?.len(), 3);
        assert_eq!(GroupPart::split("a=1 and b=2", ConnectiveCase::Sensitive)?, vec![expr("a=1 and b=2")]);
        Ok(())
    }

    #[test]
    fn test_missing_operand() {
        for group in ["AND a=1", "a=1 OR", "a=1 AND OR b=2"] {
            let err = GroupPart::split(group, ConnectiveCase::Insensitive).unwrap_err();
            assert!(matches!(err.downcast_ref::<FilterError>(), Some(FilterError::MalformedCondition { .. })), "{}", group);
        }
    }

    #[test]
    fn test_unbalanced() {
        for group in ["(a=1 AND (b=2)", "a=1) OR (b=2", "languages HAS_ANY (PHP"] {
            let err = GroupPart::split(group, ConnectiveCase::Insensitive).unwrap_err();
            assert!(matches!(err.downcast_ref::<FilterError>(), Some(FilterError::UnbalancedGroup { .. })), "{}", group);
        }
    }

    #[test]
    fn test_enclosing_group() {
        assert_eq!(enclosing_group("(a=1 AND b=2)"), Some("a=1 AND b=2"));
        assert_eq!(enclosing_group("((a=1) OR (b=2))"), Some("(a=1) OR (b=2)"));
        assert_eq!(enclosing_group("(a=1) OR (b=2)"), None);
        assert_eq!(enclosing_group("a=(1)"), None);
        assert_eq!(enclosing_group("()"), Some(""));
    }
}
