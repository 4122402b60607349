use std::fmt;
use std::iter;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Like,
    In,
    HasAny,
    IsAny,
    Exists,
}

impl Operator {
    /// Candidates in scan priority: multi-character symbols before their
    /// single-character prefixes, then the word operators.
    pub const SCAN_ORDER: [Operator; 11] = [
        Operator::NotEqual,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Equal,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::HasAny,
        Operator::IsAny,
        Operator::Exists,
        Operator::Like,
        Operator::In,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::HasAny => "HAS_ANY",
            Operator::IsAny => "IS_ANY",
            Operator::Exists => "EXISTS",
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::In | Operator::HasAny | Operator::IsAny | Operator::Exists
        )
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThanOrEqual
        )
    }

    pub fn expects_list(&self) -> bool {
        matches!(self, Operator::In | Operator::HasAny | Operator::IsAny)
    }

    /// Byte offset of the first standalone occurrence of this operator.
    ///
    /// Symbols only count when they form a whole run of `!<>=` characters, so
    /// `>=` never yields `=` or `>`. Words only count between word boundaries,
    /// so `increment` never yields `IN`.
    pub fn find_in(&self, condition: &str) -> Option<usize> {
        if self.is_word() {
            find_word(condition, self.symbol())
        } else {
            find_symbol(condition, self.symbol())
        }
    }

    /// Picks the operator of a condition: the first candidate of `SCAN_ORDER`
    /// present anywhere in it, with the offset of its first occurrence.
    pub fn scan(condition: &str) -> Option<(Operator, usize)> {
        Operator::SCAN_ORDER
            .into_iter()
            .find_map(|operator| operator.find_in(condition).map(|position| (operator, position)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn is_symbol_char(c: char) -> bool {
    matches!(c, '!' | '<' | '>' | '=')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

fn find_symbol(condition: &str, symbol: &str) -> Option<usize> {
    let mut run_start = None;
    let sentinel = iter::once((condition.len(), ' '));
    for (i, c) in condition.char_indices().chain(sentinel) {
        if is_symbol_char(c) {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            if &condition[start..i] == symbol {
                return Some(start);
            }
        }
    }

    None
}

fn find_word(condition: &str, word: &str) -> Option<usize> {
    condition
        .match_indices(word)
        .map(|(i, _)| i)
        .find(|&i| {
            let before = condition[..i].chars().next_back();
            let after = condition[i + word.len()..].chars().next();
            !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
        })
}

#[cfg(test)]
mod operator_tests {
    use super::*;

    #[test]
    fn test_symbols_without_whitespace() {
        assert_eq!(Operator::scan("salary_min>=3000"), Some((Operator::GreaterThanOrEqual, 10)));
        assert_eq!(Operator::scan("salary_max<=5000"), Some((Operator::LessThanOrEqual, 10)));
        assert_eq!(Operator::scan("status!=draft"), Some((Operator::NotEqual, 6)));
        assert_eq!(Operator::scan("status = draft"), Some((Operator::Equal, 7)));
        assert_eq!(Operator::scan("attribute:years_experience>5"), Some((Operator::GreaterThan, 26)));
    }

    #[test]
    fn test_words_need_boundaries() {
        assert_eq!(Operator::scan("increment IN (1,2)"), Some((Operator::In, 10)));
        assert_eq!(Operator::scan("languages HAS_ANY(PHP)"), Some((Operator::HasAny, 10)));
        assert_eq!(Operator::scan("title LIKE engineer"), Some((Operator::Like, 6)));
        assert_eq!(Operator::scan("locations EXISTS"), Some((Operator::Exists, 10)));
        assert_eq!(Operator::scan("INDEX LINKED"), None);
        assert_eq!(Operator::scan("attribute:IN"), None);
    }

    #[test]
    fn test_priority_order_beats_position() {
        assert_eq!(Operator::scan("title LIKE a = b"), Some((Operator::Equal, 13)));
        assert_eq!(Operator::scan("title = x IN y"), Some((Operator::Equal, 6)));
        assert_eq!(Operator::scan("status IN (a) OR x != y"), Some((Operator::NotEqual, 19)));
        assert_eq!(Operator::scan("tags IN (a) LIKE b"), Some((Operator::Like, 12)));
    }

    #[test]
    fn test_unknown_symbol_run() {
        assert_eq!(Operator::scan("salary_min => 3000"), None);
        assert_eq!(Operator::scan("salary_min 3000"), None);
    }
}
