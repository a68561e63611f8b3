use std::fmt;
use xpath2_node::NodeName;

/// An owned qualified name as it appears in expressions: variable names,
/// function names, type names and name tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_part: String,
}

impl QName {
    pub fn new(prefix: Option<&str>, local_part: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local_part: local_part.into(),
        }
    }

    pub fn local(local_part: impl Into<String>) -> Self {
        Self::new(None, local_part)
    }

    pub fn prefixed(prefix: &str, local_part: impl Into<String>) -> Self {
        Self::new(Some(prefix), local_part)
    }

    /// Splits a lexical `prefix:local` name.
    pub fn parse(lexical: &str) -> Self {
        match lexical.split_once(':') {
            Some((prefix, local)) => Self::prefixed(prefix, local),
            None => Self::local(lexical),
        }
    }

    /// An `xs:` name, as used for atomic type names.
    pub fn xs(local_part: impl Into<String>) -> Self {
        Self::prefixed("xs", local_part)
    }

    pub fn matches_node_name(&self, name: &NodeName<'_>) -> bool {
        self.local_part == name.local_part && self.prefix.as_deref() == name.prefix
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => f.write_str(&self.local_part),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = QName::parse("fo:block");
        assert_eq!(name.prefix.as_deref(), Some("fo"));
        assert_eq!(name.local_part, "block");
        assert_eq!(name.to_string(), "fo:block");
        assert_eq!(QName::parse("title").to_string(), "title");
    }

    #[test]
    fn test_matches_node_name() {
        let name = QName::local("title");
        assert!(name.matches_node_name(&NodeName::new(None, "title")));
        assert!(!name.matches_node_name(&NodeName::new(Some("x"), "title")));
    }
}
