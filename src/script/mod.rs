//! Script sources and the statements parsed out of them.

use std::fmt;

/// Locator for one script's content: an `http(s)://` URL, a `file://` URL or a local path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptSource(String);

impl ScriptSource {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScriptSource {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScriptSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered, non-empty statement lines of one script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    statements: Vec<String>,
}

impl Script {
    /// Split raw content into trimmed lines, dropping the ones left empty.
    pub fn parse(raw: &str) -> Self {
        let statements = raw
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { statements }
    }

    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
