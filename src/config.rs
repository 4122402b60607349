pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_LENGTH: usize = 8192;

/// How the `AND` / `OR` connectives are recognized.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ConnectiveCase {
    /// `and`, `And` and `AND` are all connectives.
    #[default]
    Insensitive,
    /// Only the upper case spelling is a connective; `and` is plain text.
    Sensitive,
}

impl ConnectiveCase {
    pub fn matches(&self, candidate: &str, keyword: &str) -> bool {
        match self {
            ConnectiveCase::Insensitive => candidate.eq_ignore_ascii_case(keyword),
            ConnectiveCase::Sensitive => candidate == keyword,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParserConfig {
    pub connective_case: ConnectiveCase,
    /// Deepest parenthesis nesting accepted; `None` accepts any.
    pub max_depth: Option<usize>,
    /// Longest expression accepted, in bytes; `None` accepts any.
    pub max_length: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            connective_case: ConnectiveCase::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_length: Some(DEFAULT_MAX_LENGTH),
        }
    }
}

impl ParserConfig {
    /// No limits at all.
    pub fn unbounded() -> Self {
        ParserConfig {
            connective_case: ConnectiveCase::default(),
            max_depth: None,
            max_length: None,
        }
    }

    pub fn with_connective_case(mut self, connective_case: ConnectiveCase) -> Self {
        self.connective_case = connective_case;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }
}
